//! # Display Formatting
//!
//! Formatting helpers for public keys, amounts, and large totals.
//!
//! ```rust
//! use lib_utils::format::{abbreviate_total, format_pubkey};
//!
//! assert_eq!(format_pubkey("8W6QginkhTTxoP2deQjq7rZ9YMwN5FH9JYuLfSKuJKAL", 4), "8W6Q...JKAL");
//! assert_eq!(abbreviate_total(1500.0, false), "1.5K");
//! ```

const ONE_BILLION: f64 = 1_000_000_000.0;
const ONE_MILLION: f64 = 1_000_000.0;
const ONE_THOUSAND: f64 = 1_000.0;

/// Shorten a public key to `first half_len` + `...` + `last half_len` characters.
///
/// Strings shorter than `2 * half_len` are returned unchanged.
pub fn format_pubkey(pubkey: &str, half_len: usize) -> String {
    let chars: Vec<char> = pubkey.chars().collect();
    if chars.len() < half_len * 2 {
        return pubkey.to_string();
    }

    let prefix: String = chars[..half_len].iter().collect();
    let suffix: String = chars[chars.len() - half_len..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

/// Fixed-decimal number with thousands separators.
///
/// Dollar amounts always use two decimals and a `$` prefix.
pub fn format_number(value: f64, decimals: usize, is_dollars: bool) -> String {
    let decimals = if is_dollars { 2 } else { decimals };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed.clone(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    let body = match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    };

    if is_dollars {
        format!("{}${}", sign, body)
    } else {
        format!("{}{}", sign, body)
    }
}

/// Abbreviate a large total with a `K`, `M`, or `B` suffix and one decimal of precision.
pub fn abbreviate_total(value: f64, is_dollars: bool) -> String {
    let mut value = value;
    let mut abbrev = "";

    if value >= ONE_BILLION {
        abbrev = "B";
        value /= ONE_BILLION;
    }
    if value >= ONE_MILLION {
        abbrev = "M";
        value /= ONE_MILLION;
    }
    if value >= ONE_THOUSAND {
        abbrev = "K";
        value /= ONE_THOUSAND;
    }

    let mut str_value = format!("{:.1}", value);
    if str_value.contains('.') {
        while str_value.ends_with('0') {
            str_value.pop();
        }
        if str_value.ends_with('.') {
            str_value.pop();
        }
    }

    format!("{}{}{}", if is_dollars { "$" } else { "" }, str_value, abbrev)
}
