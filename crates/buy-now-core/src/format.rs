//! Currency formatting following `en-US` locale rules
//!
//! Mirrors what `Intl.NumberFormat('en-US', { style: 'currency' })` prints for
//! the currencies a storefront realistically uses: a symbol (or code) prefix,
//! comma thousands grouping and the currency's minor-unit digits.

use crate::config::DEFAULT_CURRENCY;

const NBSP: char = '\u{a0}';

/// Currencies `en-US` prints with a symbol instead of the ISO code
const SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("INR", "₹"),
    ("KRW", "₩"),
    ("ILS", "₪"),
    ("VND", "₫"),
    ("CAD", "CA$"),
    ("AUD", "A$"),
    ("NZD", "NZ$"),
    ("MXN", "MX$"),
    ("HKD", "HK$"),
    ("BRL", "R$"),
    ("CNY", "CN¥"),
    ("TWD", "NT$"),
    ("PHP", "₱"),
    ("XAF", "FCFA"),
];

/// Currencies without minor units
const ZERO_DECIMAL: &[&str] = &[
    "JPY", "KRW", "VND", "CLP", "ISK", "UGX", "XAF", "XOF", "PYG", "RWF",
];

/// Currencies with three minor-unit digits
const THREE_DECIMAL: &[&str] = &["BHD", "JOD", "KWD", "OMR", "TND", "IQD", "LYD"];

/// Format `amount` in `currency`, e.g. `9.99, "USD"` -> `"$9.99"`.
///
/// Ties round away from zero. Blank codes format as USD. Codes that are not three ASCII letters also
/// fall back to USD.
pub fn format_price(amount: f64, currency: &str) -> String {
    let code = normalize_code(currency);
    let digits = minor_digits(&code);
    let number = group_thousands(&round_half_expand(amount, digits));
    let sign = if amount < 0.0 && number.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    match SYMBOLS.iter().find(|(c, _)| *c == code) {
        Some((_, symbol)) if symbol.chars().all(|c| c.is_ascii_uppercase()) => {
            format!("{sign}{symbol}{NBSP}{number}")
        }
        Some((_, symbol)) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{code}{NBSP}{number}"),
    }
}

fn normalize_code(currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    if code.is_empty() {
        return DEFAULT_CURRENCY.to_string();
    }
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        code
    } else {
        tracing::warn!(currency, "invalid currency code, formatting as USD");
        DEFAULT_CURRENCY.to_string()
    }
}

fn minor_digits(code: &str) -> usize {
    if ZERO_DECIMAL.contains(&code) {
        0
    } else if THREE_DECIMAL.contains(&code) {
        3
    } else {
        2
    }
}

/// Decimal text of `|value|` rounded to `digits` places, ties away from zero.
///
/// Rounds the shortest decimal form of the float, so `1.005` is treated as
/// written rather than as its binary neighbour `1.00499...`.
fn round_half_expand(value: f64, digits: usize) -> String {
    let repr = if value.is_finite() {
        value.abs().to_string()
    } else {
        "0".to_string()
    };
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    if frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let (int_digits, frac_digits) = kept.split_at(kept.len() - digits);
    let mut out: String = int_digits.iter().map(|&b| char::from(b)).collect();
    if digits > 0 {
        out.push('.');
        out.extend(frac_digits.iter().map(|&b| char::from(b)));
    }
    out
}

fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let mut grouped = String::with_capacity(number.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
