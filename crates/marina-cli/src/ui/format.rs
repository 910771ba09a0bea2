//! String formatting utilities for UI rendering.

use marina_core::format_amount;
use rust_decimal::Decimal;

/// Shorten `s` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    let Some((cut, _)) = s.char_indices().nth(max_chars) else {
        return s.to_string();
    };
    if max_chars <= 3 {
        return s[..cut].to_string();
    }
    let keep = s
        .char_indices()
        .nth(max_chars - 3)
        .map_or(cut, |(index, _)| index);
    format!("{}...", &s[..keep])
}

/// Format a balance as dollars (e.g., "$750.00").
pub fn format_money(amount: Decimal) -> String {
    format!("${}", format_amount(&amount))
}

/// Format a boat length in feet (e.g., "20'").
pub fn format_feet(length: u32) -> String {
    format!("{}'", length)
}
