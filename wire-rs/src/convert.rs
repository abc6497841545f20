//! Text conversion for symbol values.
//!
//! Every symbol is a string at heart.  [`IntoSymbol`] renders a scalar to its
//! canonical text when it is stored; [`FromSymbol`] parses it back on demand.
//!
//! Parsing mirrors stream extraction: leading whitespace is skipped and the
//! longest valid numeric *prefix* is used, so `"99.95"` read as an integer is
//! `99`.  Text with no usable prefix falls back to a truthiness test:
//!
//! | Text                         | Numeric result |
//! |------------------------------|----------------|
//! | `""`, `"0"`, `"false"`       | `0`            |
//! | anything else unparsable     | `1`            |
//!
//! Decimal rendering of floats is shortest-round-trip but is not promised to
//! be exact everywhere; [`to_hex_float`] / [`from_hex_float`] are.

/// Conversion of a scalar into canonical symbol text.
pub trait IntoSymbol {
    fn into_symbol(self) -> String;
}

/// Best-effort conversion of symbol text into a typed value.  Never fails.
pub trait FromSymbol: Sized {
    fn from_symbol(text: &str) -> Self;
}

/// `true` unless the text is empty, `"0"` or `"false"`.
pub fn is_truthy(text: &str) -> bool {
    !text.is_empty() && text != "0" && text != "false"
}

// ── IntoSymbol ────────────────────────────────────────────────────────────────

impl IntoSymbol for bool {
    fn into_symbol(self) -> String {
        if self { "true" } else { "false" }.to_owned()
    }
}

impl IntoSymbol for char {
    fn into_symbol(self) -> String {
        self.to_string()
    }
}

impl IntoSymbol for &str {
    fn into_symbol(self) -> String {
        self.to_owned()
    }
}

impl IntoSymbol for String {
    fn into_symbol(self) -> String {
        self
    }
}

impl IntoSymbol for &String {
    fn into_symbol(self) -> String {
        self.clone()
    }
}

macro_rules! int_into_symbol {
    ($($t:ty),*) => {
        $(impl IntoSymbol for $t {
            fn into_symbol(self) -> String {
                self.to_string()
            }
        })*
    };
}

int_into_symbol!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_into_symbol {
    ($($t:ty),*) => {
        $(impl IntoSymbol for $t {
            fn into_symbol(self) -> String {
                if self.is_nan() {
                    "NaN".to_owned()
                } else if self.is_infinite() {
                    if self > 0.0 { "INF" } else { "-INF" }.to_owned()
                } else {
                    format!("{self}")
                }
            }
        })*
    };
}

float_into_symbol!(f32, f64);

// ── FromSymbol ────────────────────────────────────────────────────────────────

impl FromSymbol for String {
    fn from_symbol(text: &str) -> Self {
        text.to_owned()
    }
}

impl FromSymbol for bool {
    fn from_symbol(text: &str) -> Self {
        match int_prefix(text) {
            Some(n) => n != 0,
            None => is_truthy(text),
        }
    }
}

impl FromSymbol for char {
    fn from_symbol(text: &str) -> Self {
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return c;
        }
        int_prefix(text)
            .and_then(|n| u32::try_from(n).ok())
            .and_then(char::from_u32)
            .unwrap_or(if is_truthy(text) { '\u{1}' } else { '\0' })
    }
}

macro_rules! int_from_symbol {
    ($($t:ty),*) => {
        $(impl FromSymbol for $t {
            fn from_symbol(text: &str) -> Self {
                int_prefix(text)
                    .and_then(|n| <$t>::try_from(n).ok())
                    .unwrap_or_else(|| <$t>::from(is_truthy(text)))
            }
        })*
    };
}

int_from_symbol!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_from_symbol {
    ($($t:ty),*) => {
        $(impl FromSymbol for $t {
            fn from_symbol(text: &str) -> Self {
                float_prefix(text)
                    .and_then(|s| parse_float_token::<$t>(s))
                    .unwrap_or(if is_truthy(text) { 1.0 } else { 0.0 })
            }
        })*
    };
}

float_from_symbol!(f32, f64);

/// Skip leading whitespace, then read an optionally signed run of decimal
/// digits.  Returns `None` when there are no digits or the value overflows.
fn int_prefix(text: &str) -> Option<i128> {
    let bytes = text.trim_start().as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let run = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    if run == 0 {
        return None;
    }
    let mut n: i128 = 0;
    for &d in &digits[..run] {
        n = n.checked_mul(10)?.checked_add(i128::from(d - b'0'))?;
    }
    Some(if negative { -n } else { n })
}

/// Skip leading whitespace and return the longest prefix that reads as a
/// decimal float (`[sign] digits [. digits] [e [sign] digits]`), or one of
/// the `inf` / `nan` spellings.
fn float_prefix(text: &str) -> Option<&str> {
    let s = text.trim_start();
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let rest = &s[i..];
    for word in ["infinity", "inf", "nan"] {
        if rest.get(..word.len()).is_some_and(|p| p.eq_ignore_ascii_case(word)) {
            return Some(&s[..i + word.len()]);
        }
    }

    let int_start = i;
    while matches!(b.get(i), Some(b'0'..=b'9')) {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if b.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while matches!(b.get(j), Some(b'0'..=b'9')) {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while matches!(b.get(j), Some(b'0'..=b'9')) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    Some(&s[..i])
}

fn parse_float_token<T>(token: &str) -> Option<T>
where
    T: std::str::FromStr + std::ops::Neg<Output = T> + From<f32>,
{
    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let value = if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity") {
        T::from(f32::INFINITY)
    } else if body.eq_ignore_ascii_case("nan") {
        T::from(f32::NAN)
    } else {
        body.parse::<T>().ok()?
    };
    Some(if negative { -value } else { value })
}

// ── Precise and exact renderings ──────────────────────────────────────────────

/// Fixed-point rendering with 16 fractional digits; `INF`, `-INF` and `NaN`
/// for the special values.
pub fn precise(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_owned()
    } else if x.is_infinite() {
        if x > 0.0 { "INF" } else { "-INF" }.to_owned()
    } else {
        format!("{x:.16}")
    }
}

const MANTISSA_BITS: u32 = 52;
const MANTISSA_MASK: u64 = (1 << MANTISSA_BITS) - 1;
const EXPONENT_BIAS: i64 = 1023;
/// Any non-zero 64-bit mantissa scaled past this overflows or underflows.
const EXPONENT_CLAMP: i64 = 1200;

/// Exact hexadecimal rendering in the style of C's `%a`, e.g. `0x1.8p+1`
/// for `3.0`.  [`from_hex_float`] reads it back bit for bit.
pub fn to_hex_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    let sign = if x.is_sign_negative() { "-" } else { "" };
    if x.is_infinite() {
        return format!("{sign}inf");
    }
    if x == 0.0 {
        return format!("{sign}0x0p+0");
    }

    let bits = x.to_bits();
    let biased = ((bits >> MANTISSA_BITS) & 0x7ff) as i64;
    let mantissa = bits & MANTISSA_MASK;
    let (lead, exp) = if biased == 0 {
        (0, 1 - EXPONENT_BIAS)
    } else {
        (1, biased - EXPONENT_BIAS)
    };

    let frac = format!("{mantissa:013x}");
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{sign}0x{lead}p{exp:+}")
    } else {
        format!("{sign}0x{lead}.{frac}p{exp:+}")
    }
}

/// Parse a C-style hexadecimal float (`[-]0xH[.HHH]p[+-]D`) or one of the
/// `inf` / `nan` spellings.  Returns `None` on malformed input or when the
/// mantissa carries more than 64 significant bits.
pub fn from_hex_float(text: &str) -> Option<f64> {
    let s = text.trim();
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let apply_sign = |v: f64| if negative { -v } else { v };

    if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity") {
        return Some(apply_sign(f64::INFINITY));
    }
    if body.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }

    let digits = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"))?;
    let (mantissa_src, exp_src) = digits.split_once(['p', 'P'])?;
    let (int_src, frac_src) = mantissa_src.split_once('.').unwrap_or((mantissa_src, ""));
    if int_src.is_empty() && frac_src.is_empty() {
        return None;
    }

    let mut mantissa: u64 = 0;
    for c in int_src.chars().chain(frac_src.chars()) {
        let d = c.to_digit(16)?;
        mantissa = mantissa.checked_mul(16)?.checked_add(u64::from(d))?;
    }
    let exp: i64 = exp_src.parse().ok()?;
    if mantissa == 0 {
        return Some(apply_sign(0.0));
    }
    let exp = exp
        .checked_sub(4 * i64::try_from(frac_src.len()).ok()?)?
        .clamp(-EXPONENT_CLAMP, EXPONENT_CLAMP);

    // Split the mantissa so each half converts to f64 without rounding.
    let high = (mantissa >> 32) as f64 * 4_294_967_296.0;
    let low = (mantissa & 0xffff_ffff) as f64;
    let value = if mantissa >> 53 == 0 {
        scale_by_pow2(mantissa as f64, exp)
    } else {
        scale_by_pow2(high, exp) + scale_by_pow2(low, exp)
    };
    Some(apply_sign(value))
}

/// Multiply by `2^exp`, stepping through intermediate powers that stay
/// representable.
fn scale_by_pow2(mut value: f64, mut exp: i64) -> f64 {
    let two_pow_max = f64::from_bits(0x7fe0_0000_0000_0000); // 2^1023
    let two_pow_min = f64::from_bits(0x0010_0000_0000_0000); // 2^-1022
    while exp > EXPONENT_BIAS {
        value *= two_pow_max;
        exp -= EXPONENT_BIAS;
        if value.is_infinite() {
            return value;
        }
    }
    while exp < 1 - EXPONENT_BIAS {
        value *= two_pow_min;
        exp += EXPONENT_BIAS - 1;
        if value == 0.0 {
            return value;
        }
    }
    value * f64::from_bits(((exp + EXPONENT_BIAS) as u64) << MANTISSA_BITS)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
