//! Fixed-point rendering with browser rounding.
//!
//! `format!("{:.N}")` breaks exact ties to even; a page breaks them away
//! from zero (`23.125` → `"23.13"`). Non-tie values round identically, so
//! only exact binary ties take the integer path below.

/// Render `value` with exactly `decimals` fraction digits, rounding exact
/// ties away from zero.
pub fn to_fixed(value: f64, decimals: u32) -> String {
    match away_from_zero_tie(value.abs(), decimals) {
        Some(scaled) => {
            let sign = if value.is_sign_negative() { "-" } else { "" };
            let digits = with_point(&scaled.to_string(), decimals as usize);
            format!("{sign}{digits}")
        }
        None => format!("{:.*}", decimals as usize, value),
    }
}

/// If `abs * 10^decimals` lies exactly halfway between two integers,
/// return the larger one.
fn away_from_zero_tie(abs: f64, decimals: u32) -> Option<u128> {
    if !abs.is_finite() || abs == 0.0 {
        return None;
    }
    let bits = abs.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exponent += zeros as i32;

    // abs = odd * 2^exponent; a tie means abs * 10^d * 2 is an odd integer.
    if exponent + 1 + decimals as i32 != 0 {
        return None;
    }
    Some((u128::from(mantissa) * 5u128.pow(decimals) + 1) / 2)
}

/// Round a decimal digit string half away from zero at `decimals` places.
/// Used for locale formatting, which rounds the shortest decimal form of a
/// number rather than its exact binary value (`1.005` → `"1.01"`).
pub(crate) fn round_decimal(repr: &str, decimals: usize) -> (String, String) {
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr, ""));
    if frac_part.len() <= decimals {
        return (int_part.to_string(), frac_part.to_string());
    }

    let round_up = frac_part.as_bytes()[decimals] >= b'5';
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();
    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - decimals;
    let digits = String::from_utf8_lossy(&digits).into_owned();
    (digits[..split].to_string(), digits[split..].to_string())
}

fn with_point(digits: &str, decimals: usize) -> String {
    if decimals == 0 {
        return digits.to_string();
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    format!("{int_part}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(to_fixed(23.125, 2), "23.13");
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
    }

    #[test]
    fn near_ties_follow_the_binary_value() {
        // 1.005 and 10.235 are stored slightly below the midpoint.
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(10.235, 2), "10.23");
        assert_eq!(to_fixed(23.4567, 2), "23.46");
    }

    #[test]
    fn pads_fraction_digits() {
        assert_eq!(to_fixed(5.0, 2), "5.00");
        assert_eq!(to_fixed(87.0, 1), "87.0");
        assert_eq!(to_fixed(0.0, 2), "0.00");
    }

    #[test]
    fn decimal_rounding_carries() {
        assert_eq!(round_decimal("650.125", 2), ("650".into(), "13".into()));
        assert_eq!(round_decimal("9.995", 2), ("10".into(), "00".into()));
        assert_eq!(round_decimal("1.005", 2), ("1".into(), "01".into()));
        assert_eq!(round_decimal("12.5", 0), ("13".into(), String::new()));
        assert_eq!(round_decimal("3.1", 2), ("3".into(), "1".into()));
    }
}
