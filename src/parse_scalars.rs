//! Parsers for the textual scalars handled by the built-in decoders.
use std::fmt;

/// A raw string that does not spell the expected kind of scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarError {
    pub expected: &'static str,
    pub value: String,
}

impl ScalarError {
    fn new(expected: &'static str, value: &str) -> Self {
        Self {
            expected,
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: `{}`", self.expected, self.value)
    }
}

impl std::error::Error for ScalarError {}

/// Parse a boolean, accepting the YAML 1.1 literal set.
///
/// Accepted TRUE literals (case-insensitive): "y", "yes", "true", "on", "1"
/// Accepted FALSE literals (case-insensitive): "n", "no", "false", "off", "0"
pub fn parse_bool(s: &str) -> Result<bool, ScalarError> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("true")
        || t.eq_ignore_ascii_case("yes")
        || t.eq_ignore_ascii_case("y")
        || t.eq_ignore_ascii_case("on")
        || t == "1"
    {
        Ok(true)
    } else if t.eq_ignore_ascii_case("false")
        || t.eq_ignore_ascii_case("no")
        || t.eq_ignore_ascii_case("n")
        || t.eq_ignore_ascii_case("off")
        || t == "0"
    {
        Ok(false)
    } else {
        Err(ScalarError::new("bool", s))
    }
}

/// Accumulate `digits` in `radix`, skipping `_` separators. `None` on overflow, on an
/// invalid digit, or when no digit is present.
fn parse_digits_u128(digits: &str, radix: u32) -> Option<u128> {
    let mut val: u128 = 0;
    let mut saw = false;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix)?;
        val = val.checked_mul(radix as u128)?;
        val = val.checked_add(d as u128)?;
        saw = true;
    }
    if saw { Some(val) } else { None }
}

/// Split a radix prefix (`0x`, `0o`, `0b`) off an unsigned magnitude.
fn split_radix(rest: &str) -> (u32, &str) {
    if let Some(r) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, r)
    } else if let Some(r) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8, r)
    } else if let Some(r) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2, r)
    } else {
        (10, rest)
    }
}

/// Parse a signed integer with optional sign, radix prefix and `_` separators.
pub fn parse_int_signed<T>(s: &str, ty: &'static str) -> Result<T, ScalarError>
where
    T: TryFrom<i128>,
{
    let t = s.trim();
    let (neg, rest) = match t.strip_prefix('+') {
        Some(r) => (false, r),
        None => match t.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, t),
        },
    };
    let (radix, digits) = split_radix(rest);
    let invalid = || ScalarError::new(ty, s);

    let mag = parse_digits_u128(digits, radix).ok_or_else(invalid)?;
    let val: i128 = if neg {
        // i128::MIN has no positive counterpart
        if mag == i128::MIN.unsigned_abs() {
            i128::MIN
        } else {
            let mag: i128 = mag.try_into().map_err(|_| invalid())?;
            -mag
        }
    } else {
        mag.try_into().map_err(|_| invalid())?
    };
    T::try_from(val).map_err(|_| invalid())
}

/// Parse an unsigned integer with optional `+`, radix prefix and `_` separators.
pub fn parse_int_unsigned<T>(s: &str, ty: &'static str) -> Result<T, ScalarError>
where
    T: TryFrom<u128>,
{
    let t = s.trim();
    if t.starts_with('-') {
        return Err(ScalarError::new(ty, s));
    }
    let rest = t.strip_prefix('+').unwrap_or(t);
    let (radix, digits) = split_radix(rest);
    let mag = parse_digits_u128(digits, radix).ok_or_else(|| ScalarError::new(ty, s))?;
    T::try_from(mag).map_err(|_| ScalarError::new(ty, s))
}

/// Parse a float, accepting the YAML 1.2 spellings of NaN and infinities.
pub fn parse_f64(s: &str) -> Result<f64, ScalarError> {
    let t = s.trim();
    let lower = t.to_ascii_lowercase();
    match lower.as_str() {
        ".nan" | "+.nan" | "-.nan" | "nan" => Ok(f64::NAN),
        ".inf" | "+.inf" | "inf" | "+inf" => Ok(f64::INFINITY),
        "-.inf" | "-inf" => Ok(f64::NEG_INFINITY),
        _ => t
            .replace('_', "")
            .parse::<f64>()
            .map_err(|_| ScalarError::new("float", s)),
    }
}
