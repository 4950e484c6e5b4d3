//! Price text normalization and change math

use crate::shared::errors::ParseError;

/// Parse scraped price text into a number.
///
/// Accepts the formats stores actually render: currency symbols and
/// whitespace around the number, `.` or `,` as either thousands grouping
/// or decimal mark ("$199.99", "€ 1 234,56", "1.234.567,89", "1,299").
/// When both separators appear, the rightmost one is the decimal mark;
/// a lone separator followed by exactly three digits is read as grouping.
pub fn parse_price(raw: &str) -> Result<f64, ParseError> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let kept = kept.trim_matches(|c: char| c == ',' || c == '.');
    if kept.is_empty() {
        return Err(ParseError::NoNumber(raw.to_string()));
    }

    // kept is pure ASCII here, so byte positions are char positions
    let normalized = match (kept.rfind(','), kept.rfind('.')) {
        (Some(comma), Some(dot)) => {
            let decimal_pos = comma.max(dot);
            let mut out = String::with_capacity(kept.len());
            for (i, ch) in kept.char_indices() {
                if ch.is_ascii_digit() {
                    out.push(ch);
                } else if i == decimal_pos {
                    out.push('.');
                }
            }
            out
        }
        (Some(pos), None) | (None, Some(pos)) => {
            let sep = kept.as_bytes()[pos] as char;
            let occurrences = kept.matches(sep).count();
            let digits_after = kept.len() - pos - 1;
            if occurrences == 1 && digits_after != 3 {
                kept.replace(sep, ".")
            } else {
                kept.chars().filter(char::is_ascii_digit).collect()
            }
        }
        (None, None) => kept.to_string(),
    };

    normalized
        .parse::<f64>()
        .map_err(|_| ParseError::NoNumber(raw.to_string()))
}

/// Percentage change from old to new, signed
pub fn percent_change(old_price: f64, new_price: f64) -> f64 {
    if old_price > 0.0 {
        ((new_price - old_price) / old_price) * 100.0
    } else {
        0.0
    }
}
