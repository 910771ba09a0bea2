//! Rendering primitives for shell output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table as ComfyTable};
use marina_core::Inventory;

use super::context::UiContext;
use super::format::{format_feet, format_money, truncate};
use super::theme::{styled, styles, Badge};

const BANNER: &str = "Welcome to the Boat Management System!";

/// Widest name shown in the pretty inventory table.
const TABLE_NAME_WIDTH: usize = 32;

/// Render the startup banner.
///
/// Pretty mode: bold "Marina · <banner>" followed by a divider
/// Plain mode: the banner followed by a dashed rule
pub fn banner(ctx: &UiContext) -> String {
    if ctx.mode.is_pretty() {
        let title = styled("Marina", styles::bold(), ctx.color);
        format!("{} \u{00B7} {}\n{}", title, BANNER, divider(ctx))
    } else {
        format!("{}\n{}", BANNER, "-".repeat(BANNER.len()))
    }
}

/// Render a divider line.
pub fn divider(ctx: &UiContext) -> String {
    if ctx.mode.is_pretty() && ctx.unicode {
        "\u{2500}".repeat(ctx.width.min(60))
    } else {
        "-".repeat(ctx.width.min(60))
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let badge_text = kind.display(ctx.unicode);
    let colored_badge = styled(badge_text, kind.style(), ctx.color);

    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    let label = styled("Hint:", styles::dim(), ctx.color);
    format!("{} {}", label, text)
}

/// Render a status message, or `None` when the mode stays silent about it.
///
/// Pretty mode: badge + message for every kind
/// Plain mode: bare message for warnings and errors; successes print nothing
pub fn notice(ctx: &UiContext, kind: Badge, message: &str) -> Option<String> {
    if ctx.mode.is_pretty() {
        Some(badge(ctx, kind, message))
    } else if kind.is_problem() {
        Some(message.to_string())
    } else {
        None
    }
}

/// Column definition for table rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
    pub align_right: bool,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self {
            header,
            align_right: false,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            align_right: true,
        }
    }
}

/// Render a bordered table using comfy-table.
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    let mut table = ComfyTable::new();

    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
    }

    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(ctx.width.min(u16::MAX as usize) as u16);

    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    table.set_header(headers);

    for row in rows {
        table.add_row(row);
    }

    for (i, col) in columns.iter().enumerate() {
        if col.align_right {
            if let Some(column) = table.column_mut(i) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
    }

    table.to_string()
}

/// Render the boat inventory.
///
/// Pretty mode: table with one row per boat, or a hint when empty
/// Plain mode: fixed-width rows, nothing when empty
pub fn inventory(ctx: &UiContext, rows: Inventory<'_>) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .map(|row| row.to_string())
            .collect::<Vec<_>>()
            .join("\n");
    }

    if rows.len() == 0 {
        return hint(ctx, "No boats on file. Choose (A)dd to register one.");
    }

    let columns = [
        Column::new("Name"),
        Column::right("Length"),
        Column::new("Placement"),
        Column::new("Spot"),
        Column::right("Owes"),
    ];
    let body: Vec<Vec<String>> = rows
        .map(|row| {
            let boat = row.record();
            let placement = boat.placement();
            vec![
                truncate(boat.name(), TABLE_NAME_WIDTH),
                format_feet(boat.length()),
                placement.kind().to_string(),
                placement.display_value(),
                format_money(boat.amount_owed()),
            ]
        })
        .collect();

    table(ctx, &columns, &body)
}
