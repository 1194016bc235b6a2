// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick value formatting.

extern crate alloc;

use alloc::format;
use alloc::string::String;

/// Formats `value` with exactly `precision` decimals and `,` thousands separators.
///
/// Values that round to zero never print a sign.
pub(crate) fn format_number(value: f64, precision: u8) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let raw = format!("{:.*}", usize::from(precision), value);
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) if rest.bytes().any(|b| b.is_ascii_digit() && b != b'0') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(raw.len() + int_part.len() / 3);
    out.push_str(sign);
    let lead = int_part.len() % 3;
    for (i, ch) in int_part.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::format_number;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
        assert_eq!(format_number(1234.5, 1), "1,234.5");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-12_000.25, 2), "-12,000.25");
    }

    #[test]
    fn negative_zero_is_unsigned() {
        assert_eq!(format_number(-0.0001, 2), "0.00");
        assert_eq!(format_number(-0.0, 0), "0");
    }

    #[test]
    fn non_finite_is_blank() {
        assert_eq!(format_number(f64::NAN, 2), "");
    }
}
