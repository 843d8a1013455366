//! Amount text as typed by a user, and yen display

use nencho::engine::InputError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse free-form amount text such as "250,000" or "２５００００". Only
/// digits (ASCII or full-width), commas and whitespace are allowed; empty
/// text is 0.
pub fn parse_amount(text: &str) -> Result<Decimal, InputError> {
    let mut digits = String::with_capacity(text.len());
    for c in text.chars() {
        match digit_value(c) {
            Some(d) => digits.push(char::from(b'0' + d)),
            None if c == ',' || c.is_whitespace() => {}
            None => return Err(InputError::Unparseable(text.to_string())),
        }
    }
    if digits.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&digits).map_err(|_| InputError::Unparseable(text.to_string()))
}

fn digit_value(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        '０'..='９' => Some((c as u32 - '０' as u32) as u8),
        _ => None,
    }
}

/// Format as "¥ 1,234,567", dropping any fraction of a yen
pub fn format_yen(amount: Decimal) -> String {
    let digits = amount.trunc().abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount.trunc() < Decimal::ZERO {
        format!("-¥ {}", grouped)
    } else {
        format!("¥ {}", grouped)
    }
}
