//! Digit grouping for the two locales prediction values are shown in.

use super::fixed::round_decimal;

/// Thousands-grouping convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// `1,234,567`
    EnUs,
    /// `12,34,567`: last three digits, then pairs.
    EnIn,
}

/// Format `value` with grouped integer digits and between `min_decimals`
/// and `max_decimals` fraction digits (trailing zeroes beyond the minimum
/// are dropped). Rounds the shortest decimal form half away from zero.
pub fn grouped(
    value: f64,
    grouping: Grouping,
    min_decimals: usize,
    max_decimals: usize,
) -> String {
    let repr = format!("{}", value.abs());
    let (int_part, mut frac) = round_decimal(&repr, max_decimals);
    while frac.len() > min_decimals && frac.ends_with('0') {
        frac.pop();
    }
    while frac.len() < min_decimals {
        frac.push('0');
    }

    let nonzero = |s: &str| s.bytes().any(|b| b != b'0');
    let negative = value < 0.0 && (nonzero(&int_part) || nonzero(&frac));

    let mut out = String::with_capacity(repr.len() + repr.len() / 2 + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(&int_part, grouping));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let group = match grouping {
        Grouping::EnUs => 3,
        Grouping::EnIn => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_grouping() {
        assert_eq!(grouped(1234567.891, Grouping::EnUs, 2, 2), "1,234,567.89");
        assert_eq!(grouped(650.5, Grouping::EnUs, 2, 2), "650.50");
        assert_eq!(grouped(1000.0, Grouping::EnUs, 0, 0), "1,000");
        assert_eq!(grouped(999.0, Grouping::EnUs, 0, 0), "999");
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(grouped(559000.0, Grouping::EnIn, 0, 3), "5,59,000");
        assert_eq!(grouped(12345678.0, Grouping::EnIn, 0, 3), "1,23,45,678");
        assert_eq!(grouped(1234.5, Grouping::EnIn, 0, 3), "1,234.5");
        assert_eq!(grouped(100000.1234, Grouping::EnIn, 0, 3), "1,00,000.123");
    }

    #[test]
    fn negative_values_keep_sign_outside_grouping() {
        assert_eq!(grouped(-1234.5, Grouping::EnUs, 2, 2), "-1,234.50");
        assert_eq!(grouped(-0.001, Grouping::EnUs, 2, 2), "0.00");
    }

    #[test]
    fn ties_round_up_in_both_locales() {
        assert_eq!(grouped(650.125, Grouping::EnUs, 2, 2), "650.13");
        assert_eq!(grouped(999.995, Grouping::EnUs, 2, 2), "1,000.00");
        assert_eq!(grouped(100000.0005, Grouping::EnIn, 0, 3), "1,00,000.001");
        assert_eq!(grouped(2.5, Grouping::EnUs, 0, 0), "3");
    }
}
