// src/utils/answer.rs

use crate::config::NUMERIC_TOLERANCE;

/// Approximate answer comparison used for grading and for option checks.
///
/// Tries, in order: whitespace/case-insensitive string match, numeric match
/// within `NUMERIC_TOLERANCE`, then a match ignoring parentheses.
/// The numeric step reads only the leading number of each side, so "2x" and "2"
/// compare equal. This is not symbolic equality: "2x+5" and "5+2x" compare unequal.
pub fn equivalent(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return true;
    }

    if let (Some(x), Some(y)) = (parse_float_prefix(&a), parse_float_prefix(&b)) {
        return (x - y).abs() < NUMERIC_TOLERANCE;
    }

    simplify(&a) == simplify(&b)
}

/// Trim, lowercase, and drop every whitespace character.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Reads the longest leading decimal number (optional sign, digits with an optional
/// fraction, optional exponent) and ignores whatever follows. `None` when `s` does
/// not start with a number.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // An exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn simplify(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '(' && *c != ')' && !c.is_whitespace())
        .collect()
}
