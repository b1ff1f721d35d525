use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::core::{AppError, Result};

/// Parse a spreadsheet cell into a decimal amount.
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace and `,`
/// thousands separators are tolerated). Returns `None` for blanks and for
/// anything that is not a number; callers treat that as a null amount.
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_text(&n.to_string())
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                None
            } else {
                parse_decimal_text(&cleaned)
            }
        }
        _ => None,
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Render a cell as trimmed text, `None` for null or blank cells
pub fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Whether a cell counts as blank for row-dropping purposes
pub fn is_blank(value: &Value) -> bool {
    cell_text(value).is_none()
}

/// Format a decimal rate as a percentage label, e.g. `0.30` -> `"30%"`
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Sum amounts, failing with a validation error where plain addition would overflow
pub fn checked_sum<I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value).ok_or_else(|| {
            AppError::validation(format!("{} exceeds the representable amount range", what))
        })
    })
}
