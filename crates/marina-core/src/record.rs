//! Boat records, placements, and the comma-separated line codec.
//!
//! A persisted record is one line of five fields:
//!
//! ```text
//! <name>,<length>,<slip|land|trailor|storage|unassigned>,<placement value>,<amount owed>
//! ```
//!
//! Parsing is lenient by default: malformed numbers coerce to zero from their
//! leading numeric prefix and unknown placement keywords become
//! [`Placement::Unassigned`]. [`ParseMode::Strict`] rejects those lines instead.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::warn;

use crate::error::ParseError;

/// Longest boat name kept; longer names are truncated (lenient) or rejected (strict).
pub const MAX_NAME_LEN: usize = 127;

/// Longest trailer license plate.
pub const MAX_LICENSE_LEN: usize = 8;

/// Largest balance a record carries (999,999,999,999.99). Larger amounts are
/// clamped in lenient mode and rejected in strict mode.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Valid slip numbers.
pub const SLIP_NUMBERS: RangeInclusive<u32> = 1..=85;

/// Valid storage space numbers.
pub const STORAGE_NUMBERS: RangeInclusive<u32> = 1..=50;

const FIELD_COUNT: usize = 5;

/// How strictly record lines are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Coerce bad fields to zero/unset and keep going
    #[default]
    Lenient,
    /// Reject any line with a bad field
    Strict,
}

impl ParseMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Placement kind without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    Slip,
    Land,
    Trailer,
    Storage,
    Unassigned,
}

impl PlacementKind {
    /// Keyword written to the data file.
    ///
    /// Trailers use the historical `trailor` spelling so existing files keep loading.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Slip => "slip",
            Self::Land => "land",
            Self::Trailer => "trailor",
            Self::Storage => "storage",
            Self::Unassigned => "unassigned",
        }
    }

    /// Resolve a keyword from the data file (ASCII case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.to_ascii_lowercase();
        match keyword.as_str() {
            "slip" => Some(Self::Slip),
            "land" => Some(Self::Land),
            "trailor" | "trailer" => Some(Self::Trailer),
            "storage" => Some(Self::Storage),
            "unassigned" => Some(Self::Unassigned),
            _ => None,
        }
    }

    /// Monthly charge per foot of boat length.
    pub fn monthly_rate(&self) -> Decimal {
        match self {
            Self::Slip => dec!(12.50),
            Self::Land => dec!(14.00),
            Self::Trailer => dec!(25.00),
            Self::Storage => dec!(11.20),
            Self::Unassigned => Decimal::ZERO,
        }
    }
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Where a boat is kept, with the identifier that belongs to that kind of spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Slip { number: u32 },
    Land { bay: Option<char> },
    Trailer { license: String },
    Storage { number: u32 },
    /// Placement keyword was not recognized when the record was parsed
    Unassigned,
}

impl Placement {
    pub fn kind(&self) -> PlacementKind {
        match self {
            Self::Slip { .. } => PlacementKind::Slip,
            Self::Land { .. } => PlacementKind::Land,
            Self::Trailer { .. } => PlacementKind::Trailer,
            Self::Storage { .. } => PlacementKind::Storage,
            Self::Unassigned => PlacementKind::Unassigned,
        }
    }

    /// Value as stored in the fourth field of a record line.
    pub fn value_field(&self) -> String {
        match self {
            Self::Slip { number } | Self::Storage { number } => number.to_string(),
            Self::Land { bay } => bay.map(String::from).unwrap_or_default(),
            Self::Trailer { license } => license.clone(),
            Self::Unassigned => String::new(),
        }
    }

    /// Value as shown in the inventory listing.
    pub fn display_value(&self) -> String {
        match self {
            Self::Slip { number } | Self::Storage { number } => format!("# {}", number),
            Self::Land { bay: Some(bay) } => bay.to_string(),
            Self::Trailer { license } => license.clone(),
            Self::Land { bay: None } | Self::Unassigned => "-".to_string(),
        }
    }
}

/// A boat berthed at the marina and what it owes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoatRecord {
    name: String,
    length: u32,
    placement: Placement,
    amount_owed: Decimal,
}

impl BoatRecord {
    /// Build a record. Negative balances are clamped to zero and the amount is
    /// rounded to cents.
    pub fn new(
        name: impl Into<String>,
        length: u32,
        placement: Placement,
        amount_owed: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            placement,
            amount_owed: to_cents(amount_owed.clamp(Decimal::ZERO, MAX_AMOUNT)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in feet.
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn amount_owed(&self) -> Decimal {
        self.amount_owed
    }

    /// Charge for one billing cycle: length times the placement's rate.
    pub fn monthly_charge(&self) -> Decimal {
        Decimal::from(self.length) * self.placement.kind().monthly_rate()
    }

    /// Add `amount` to the balance, saturating at [`MAX_AMOUNT`].
    pub(crate) fn charge(&mut self, amount: Decimal) {
        let owed = self.amount_owed.saturating_add(amount);
        if owed > MAX_AMOUNT {
            warn!(name = %self.name, "balance clamped to maximum");
        }
        self.amount_owed = to_cents(owed.min(MAX_AMOUNT));
    }

    /// Caller guarantees `amount <= amount_owed`.
    pub(crate) fn credit(&mut self, amount: Decimal) {
        debug_assert!(amount <= self.amount_owed);
        self.amount_owed = to_cents(self.amount_owed - amount);
    }

    /// Parse one record line.
    ///
    /// Surrounding whitespace (including a trailing newline) is ignored on
    /// every field. The line must split into exactly five fields and the name
    /// must not be blank; beyond that, lenient mode never fails.
    pub fn parse_line(line: &str, mode: ParseMode) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.trim_end_matches(&['\r', '\n'][..]).split(',').collect();
        if fields.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let name = parse_name(fields[0], mode)?;
        let length = parse_count(fields[1], "length", mode)?;
        let placement = parse_placement(fields[2], fields[3], mode)?;
        let amount_owed = parse_amount(fields[4], mode)?;

        Ok(Self {
            name,
            length,
            placement,
            amount_owed,
        })
    }

    /// Render as a record line (without the trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.name,
            self.length,
            self.placement.kind().keyword(),
            self.placement.value_field(),
            format_amount(&self.amount_owed)
        )
    }
}

impl FromStr for BoatRecord {
    type Err = ParseError;

    /// Lenient parse of a record line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s, ParseMode::Lenient)
    }
}

/// Format a currency amount with exactly two decimal digits.
pub fn format_amount(amount: &Decimal) -> String {
    to_cents(*amount).to_string()
}

pub(crate) fn to_cents(amount: Decimal) -> Decimal {
    let mut cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    cents
}

fn parse_name(raw: &str, mode: ParseMode) -> Result<String, ParseError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        if mode.is_strict() {
            return Err(ParseError::NameTooLong {
                name: name.to_string(),
                max: MAX_NAME_LEN,
            });
        }
        warn!(name, max = MAX_NAME_LEN, "boat name truncated");
        return Ok(name.chars().take(MAX_NAME_LEN).collect());
    }
    Ok(name.to_string())
}

fn parse_count(raw: &str, field: &'static str, mode: ParseMode) -> Result<u32, ParseError> {
    let value = raw.trim();
    if mode.is_strict() {
        return value.parse().map_err(|_| ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(coerce_count(value, field))
}

fn parse_amount(raw: &str, mode: ParseMode) -> Result<Decimal, ParseError> {
    let value = raw.trim();
    if mode.is_strict() {
        let amount = Decimal::from_str(value).map_err(|_| ParseError::InvalidNumber {
            field: "amount owed",
            value: value.to_string(),
        })?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ParseError::NegativeAmount(value.to_string()));
        }
        if amount > MAX_AMOUNT {
            return Err(ParseError::AmountTooLarge {
                value: value.to_string(),
                max: MAX_AMOUNT,
            });
        }
        return Ok(to_cents(amount));
    }

    let prefix = numeric_prefix(value, true);
    // Only a prefix too long for a Decimal fails to parse here.
    let amount = Decimal::from_str(&prefix).unwrap_or(if prefix.starts_with('-') {
        Decimal::ZERO
    } else {
        MAX_AMOUNT
    });
    if amount.is_sign_negative() && !amount.is_zero() {
        warn!(value, "negative amount owed clamped to zero");
        return Ok(to_cents(Decimal::ZERO));
    }
    if amount > MAX_AMOUNT {
        warn!(value, max = %MAX_AMOUNT, "amount owed clamped to maximum");
        return Ok(MAX_AMOUNT);
    }
    Ok(to_cents(amount))
}

/// Parse a payment amount typed at the prompt.
///
/// Lenient mode keeps the leading numeric prefix (sign included), else zero.
/// Sign checks are left to [`crate::BoatLedger::pay`].
pub fn parse_payment(raw: &str, mode: ParseMode) -> Result<Decimal, ParseError> {
    let value = raw.trim();
    if mode.is_strict() {
        return Decimal::from_str(value).map_err(|_| ParseError::InvalidNumber {
            field: "payment",
            value: value.to_string(),
        });
    }
    Ok(Decimal::from_str(&numeric_prefix(value, true)).unwrap_or(Decimal::ZERO))
}

fn parse_placement(kind: &str, raw: &str, mode: ParseMode) -> Result<Placement, ParseError> {
    let kind = kind.trim();
    let value = raw.trim();
    let Some(parsed) = PlacementKind::from_keyword(kind) else {
        if mode.is_strict() {
            return Err(ParseError::UnknownPlacement(kind.to_string()));
        }
        warn!(kind, "unknown placement kind, leaving boat unassigned");
        return Ok(Placement::Unassigned);
    };

    let placement = match parsed {
        PlacementKind::Slip => Placement::Slip {
            number: parse_spot(value, "slip", &SLIP_NUMBERS, mode)?,
        },
        PlacementKind::Storage => Placement::Storage {
            number: parse_spot(value, "storage", &STORAGE_NUMBERS, mode)?,
        },
        PlacementKind::Land => {
            let bay = value.chars().next();
            if mode.is_strict() && !matches!(bay, Some('A'..='Z') if value.len() == 1) {
                return Err(ParseError::InvalidPlacementValue {
                    kind: "land",
                    value: value.to_string(),
                });
            }
            Placement::Land { bay }
        }
        PlacementKind::Trailer => {
            let too_long = value.chars().count() > MAX_LICENSE_LEN;
            if mode.is_strict() && (value.is_empty() || too_long) {
                return Err(ParseError::InvalidPlacementValue {
                    kind: "trailor",
                    value: value.to_string(),
                });
            }
            if too_long {
                warn!(license = value, max = MAX_LICENSE_LEN, "license plate truncated");
            }
            Placement::Trailer {
                license: value.chars().take(MAX_LICENSE_LEN).collect(),
            }
        }
        PlacementKind::Unassigned => Placement::Unassigned,
    };
    Ok(placement)
}

fn parse_spot(
    value: &str,
    kind: &'static str,
    range: &RangeInclusive<u32>,
    mode: ParseMode,
) -> Result<u32, ParseError> {
    if mode.is_strict() {
        return value
            .parse()
            .ok()
            .filter(|number| range.contains(number))
            .ok_or_else(|| ParseError::InvalidPlacementValue {
                kind,
                value: value.to_string(),
            });
    }
    Ok(coerce_count(value, kind))
}

/// Best-effort integer coercion: the leading numeric prefix, else zero.
/// Negative values clamp to zero.
fn coerce_count(value: &str, field: &'static str) -> u32 {
    let number = numeric_prefix(value, false).parse::<i64>().unwrap_or(0);
    if number.to_string() != value {
        warn!(field, value, coerced = number.max(0), "non-numeric field coerced");
    }
    u32::try_from(number.max(0)).unwrap_or(u32::MAX)
}

/// Leading `[+-]digits[.digits]` of `value`, normalized so it always parses
/// when non-empty. Returns `"0"` when there is no numeric prefix.
fn numeric_prefix(value: &str, allow_fraction: bool) -> String {
    let mut chars = value.trim_start().chars().peekable();
    let mut sign = String::new();
    if let Some(&(c @ ('+' | '-'))) = chars.peek() {
        if c == '-' {
            sign.push('-');
        }
        chars.next();
    }

    let mut whole = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        whole.push(c);
        chars.next();
    }

    let mut fraction = String::new();
    if allow_fraction && chars.peek() == Some(&'.') {
        chars.next();
        fraction.extend(chars.take_while(char::is_ascii_digit));
    }

    if whole.is_empty() && fraction.is_empty() {
        return "0".to_string();
    }
    if whole.is_empty() {
        whole.push('0');
    }
    if fraction.is_empty() {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}.{}", sign, whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slip_line() {
        let boat: BoatRecord = "Betty,20,slip,1,500.00".parse().unwrap();
        assert_eq!(boat.name(), "Betty");
        assert_eq!(boat.length(), 20);
        assert_eq!(boat.placement(), &Placement::Slip { number: 1 });
        assert_eq!(boat.amount_owed(), dec!(500.00));
    }

    #[test]
    fn test_parse_each_placement_kind() {
        let land: BoatRecord = "Big Brother,30,land,B,0.00\n".parse().unwrap();
        assert_eq!(land.placement(), &Placement::Land { bay: Some('B') });

        let trailer: BoatRecord = "Mermaid,28,trailor,BRTRSH,0".parse().unwrap();
        assert_eq!(
            trailer.placement(),
            &Placement::Trailer {
                license: "BRTRSH".into()
            }
        );

        let storage: BoatRecord = "Pickle,12,storage,14,9.5".parse().unwrap();
        assert_eq!(storage.placement(), &Placement::Storage { number: 14 });
        assert_eq!(format_amount(&storage.amount_owed()), "9.50");
    }

    #[test]
    fn test_trailer_alias_is_accepted() {
        let boat: BoatRecord = "Tow,18,Trailer,ABC123,0".parse().unwrap();
        assert_eq!(boat.placement().kind(), PlacementKind::Trailer);
        assert_eq!(boat.to_line(), "Tow,18,trailor,ABC123,0.00");
    }

    #[test]
    fn test_unknown_placement_is_unassigned() {
        let boat: BoatRecord = "Drifter,22,dock,7,10.00".parse().unwrap();
        assert_eq!(boat.placement(), &Placement::Unassigned);
        assert_eq!(boat.monthly_charge(), Decimal::ZERO);
        assert_eq!(boat.to_line(), "Drifter,22,unassigned,,10.00");
    }

    #[test]
    fn test_malformed_numbers_coerce_to_zero() {
        let boat: BoatRecord = "Oops,abc,slip,xx,lots".parse().unwrap();
        assert_eq!(boat.length(), 0);
        assert_eq!(boat.placement(), &Placement::Slip { number: 0 });
        assert_eq!(boat.amount_owed(), Decimal::ZERO);
    }

    #[test]
    fn test_numeric_prefix_is_kept() {
        let boat: BoatRecord = "Prefix,25ft,storage,3b,12.345abc".parse().unwrap();
        assert_eq!(boat.length(), 25);
        assert_eq!(boat.placement(), &Placement::Storage { number: 3 });
        assert_eq!(boat.amount_owed(), dec!(12.35));
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let boat: BoatRecord = "Neg,-5,slip,-1,-20.00".parse().unwrap();
        assert_eq!(boat.length(), 0);
        assert_eq!(boat.placement(), &Placement::Slip { number: 0 });
        assert_eq!(boat.amount_owed(), Decimal::ZERO);
    }

    #[test]
    fn test_wrong_field_count_fails() {
        assert_eq!(
            "Betty,20,slip,1".parse::<BoatRecord>(),
            Err(ParseError::FieldCount(4))
        );
        assert_eq!(
            "Betty,20,slip,1,5.00,extra".parse::<BoatRecord>(),
            Err(ParseError::FieldCount(6))
        );
    }

    #[test]
    fn test_empty_name_fails() {
        assert_eq!(
            " ,20,slip,1,5.00".parse::<BoatRecord>(),
            Err(ParseError::EmptyName)
        );
    }

    #[test]
    fn test_long_values_truncate() {
        let name = "x".repeat(200);
        let line = format!("{},20,trailor,ABCDEFGHIJK,0", name);
        let boat: BoatRecord = line.parse().unwrap();
        assert_eq!(boat.name().len(), MAX_NAME_LEN);
        assert_eq!(
            boat.placement(),
            &Placement::Trailer {
                license: "ABCDEFGH".into()
            }
        );
    }

    #[test]
    fn test_empty_bay_round_trips() {
        let boat: BoatRecord = "Bare,10,land,,0".parse().unwrap();
        assert_eq!(boat.placement(), &Placement::Land { bay: None });
        assert_eq!(boat.placement().display_value(), "-");
        let again: BoatRecord = boat.to_line().parse().unwrap();
        assert_eq!(again, boat);
    }

    #[test]
    fn test_strict_rejects_bad_fields() {
        let strict = |line: &str| BoatRecord::parse_line(line, ParseMode::Strict);

        assert!(matches!(
            strict("Oops,abc,slip,1,0"),
            Err(ParseError::InvalidNumber { field: "length", .. })
        ));
        assert!(matches!(
            strict("Oops,20,dock,1,0"),
            Err(ParseError::UnknownPlacement(_))
        ));
        assert!(matches!(
            strict("Oops,20,slip,86,0"),
            Err(ParseError::InvalidPlacementValue { kind: "slip", .. })
        ));
        assert!(matches!(
            strict("Oops,20,storage,0,0"),
            Err(ParseError::InvalidPlacementValue { kind: "storage", .. })
        ));
        assert!(matches!(
            strict("Oops,20,land,b,0"),
            Err(ParseError::InvalidPlacementValue { kind: "land", .. })
        ));
        assert!(matches!(
            strict("Oops,20,trailor,ABCDEFGHI,0"),
            Err(ParseError::InvalidPlacementValue { kind: "trailor", .. })
        ));
        assert!(matches!(
            strict("Oops,20,slip,1,-3.00"),
            Err(ParseError::NegativeAmount(_))
        ));
        assert!(strict("Fine,20,land,Q,3.10").is_ok());
    }

    #[test]
    fn test_to_line_formats_two_decimals() {
        let boat = BoatRecord::new("Betty", 20, Placement::Slip { number: 1 }, dec!(500));
        assert_eq!(boat.to_line(), "Betty,20,slip,1,500.00");
    }

    #[test]
    fn test_new_clamps_negative_balance() {
        let boat = BoatRecord::new("Debt", 10, Placement::Unassigned, dec!(-4.20));
        assert_eq!(boat.amount_owed(), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rates() {
        let charge = |placement| BoatRecord::new("b", 20, placement, Decimal::ZERO).monthly_charge();
        assert_eq!(charge(Placement::Slip { number: 1 }), dec!(250.00));
        assert_eq!(charge(Placement::Land { bay: Some('A') }), dec!(280.00));
        assert_eq!(
            charge(Placement::Trailer {
                license: "X".into()
            }),
            dec!(500.00)
        );
        assert_eq!(charge(Placement::Storage { number: 1 }), dec!(224.00));
    }

    #[test]
    fn test_max_amount_value() {
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
        assert_eq!(MAX_AMOUNT.scale(), 2);
    }

    #[test]
    fn test_huge_amount_clamps_in_lenient_mode() {
        let record =
            BoatRecord::parse_line("Rich,20,slip,1,79228162514264337593543950335", ParseMode::Lenient)
                .unwrap();
        assert_eq!(record.amount_owed(), MAX_AMOUNT);
        assert_eq!(record.to_line(), "Rich,20,slip,1,999999999999.99");

        let overlong = format!("Rich,20,slip,1,{}", "9".repeat(40));
        let record = BoatRecord::parse_line(&overlong, ParseMode::Lenient).unwrap();
        assert_eq!(record.amount_owed(), MAX_AMOUNT);
    }

    #[test]
    fn test_huge_amount_rejected_in_strict_mode() {
        let err = BoatRecord::parse_line("Rich,20,slip,1,1000000000000.00", ParseMode::Strict)
            .unwrap_err();
        assert!(matches!(err, ParseError::AmountTooLarge { .. }));
    }

    #[test]
    fn test_charge_saturates_at_max_amount() {
        let mut record = BoatRecord::new("Rich", 20, Placement::Slip { number: 1 }, MAX_AMOUNT);
        record.charge(record.monthly_charge());
        assert_eq!(record.amount_owed(), MAX_AMOUNT);

        record.charge(Decimal::MAX);
        assert_eq!(record.amount_owed(), MAX_AMOUNT);
    }

    #[test]
    fn test_parse_payment() {
        assert_eq!(parse_payment(" 120.25\n", ParseMode::Lenient), Ok(dec!(120.25)));
        assert_eq!(parse_payment("40 dollars", ParseMode::Lenient), Ok(dec!(40)));
        assert_eq!(parse_payment("lots", ParseMode::Lenient), Ok(Decimal::ZERO));
        assert_eq!(parse_payment("-5", ParseMode::Lenient), Ok(dec!(-5)));
        assert!(matches!(
            parse_payment("40 dollars", ParseMode::Strict),
            Err(ParseError::InvalidNumber { field: "payment", .. })
        ));
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("  42abc", false), "42");
        assert_eq!(numeric_prefix("-7", false), "-7");
        assert_eq!(numeric_prefix(".5", true), "0.5");
        assert_eq!(numeric_prefix("3.", true), "3");
        assert_eq!(numeric_prefix("x1", true), "0");
        assert_eq!(numeric_prefix("12.5", false), "12");
    }
}
