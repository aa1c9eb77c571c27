//! The number view (spec §4.F): a lazy numeric token that is only parsed
//! when a caller asks for a concrete representation, following a fixed
//! fallback order from narrowest to widest: narrow signed integer, wide
//! signed integer, arbitrary-precision integer, narrow float,
//! arbitrary-precision float — with `-0` special-cased before any widening
//! (spec §9, "Ambiguous source behaviours").

use alloc::string::{String, ToString};

use crate::{
    byte_source::ByteSource,
    error::{NumberTarget, ScanErrorKind},
    scanner,
};

/// A lazily-scanned JSON number token.
#[derive(Clone, Copy)]
pub struct NumberHandle<'a, S: ByteSource> {
    source: &'a S,
    offset: usize,
    end: usize,
}

impl<'a, S: ByteSource> NumberHandle<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Result<Self, ScanErrorKind> {
        let end = scanner::end_of_number(source, offset)?;
        Ok(Self { source, offset, end })
    }

    /// Offset of the number's first byte.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset of the number's last byte.
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.end
    }

    /// The verbatim source text of the number, exactly as written.
    #[must_use]
    pub fn as_text(&self) -> String {
        let mut out = alloc::vec::Vec::new();
        self.source.copy_range(self.offset, self.end, &mut out);
        // JSON numbers are always ASCII, so this is always valid UTF-8.
        String::from_utf8(out).unwrap_or_default()
    }

    fn is_integral(&self) -> bool {
        let text = self.as_text();
        !text.as_bytes().iter().any(|&b| b == b'.' || b == b'e' || b == b'E')
    }

    /// Parses the number, following the fixed fallback order described at
    /// module level.
    #[must_use]
    pub fn to_number(&self) -> Number {
        let text = self.as_text();
        if text == "-0" {
            return Number::Float(-0.0);
        }
        if self.is_integral() {
            if let Ok(v) = text.parse::<i64>() {
                return Number::I64(v);
            }
            if let Ok(v) = text.parse::<i128>() {
                return Number::I128(v);
            }
            return Number::Big(BigNumber::parse(&text));
        }
        if let Ok(v) = text.parse::<f64>() {
            // A finite result of exactly zero that wasn't spelled as zero
            // is an underflow, not a genuine zero; an infinite result is an
            // overflow. Both lose precision a narrow float can't recover,
            // so fall through to the arbitrary-precision representation.
            if v.is_finite() && (v != 0.0 || all_digits_are_zero(&text)) {
                return Number::Float(v);
            }
        }
        Number::Big(BigNumber::parse(&text))
    }

    /// Converts to `i64`, failing if the value is not an exact integer that
    /// fits.
    pub fn to_i64(&self) -> Result<i64, ScanErrorKind> {
        match self.to_number() {
            Number::I64(v) => Ok(v),
            Number::I128(v) => i64::try_from(v).map_err(|_| self.inexact(NumberTarget::Integer)),
            Number::Float(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 => {
                Ok(v as i64)
            }
            Number::Float(_) | Number::Big(_) => Err(self.inexact(NumberTarget::Integer)),
        }
    }

    /// Converts to `f64`, widening/approximating as needed. Always succeeds
    /// for any syntactically valid JSON number (out-of-range magnitudes
    /// saturate to `0.0`/infinity, per IEEE 754).
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_number().as_f64()
    }

    fn inexact(&self, target: NumberTarget) -> ScanErrorKind {
        ScanErrorKind::InexactConversion {
            offset: self.offset,
            target,
        }
    }
}

/// Whether every digit in `text` (ignoring sign, decimal point, and
/// exponent) is `0` — i.e. the number is truly zero rather than merely
/// having underflowed a narrow float parse.
fn all_digits_are_zero(text: &str) -> bool {
    text.bytes()
        .filter(u8::is_ascii_digit)
        .all(|b| b == b'0')
}

/// The parsed representation of a JSON number, chosen by the narrowest type
/// that can represent it exactly.
// Enable serde support for tests and when the optional `serde` feature is
// activated by downstream crates, matching the teacher's `Value` enum.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Fits in a signed 64-bit integer.
    I64(i64),
    /// An integer too wide for `i64` but not requiring arbitrary precision.
    I128(i128),
    /// Has a fractional part or exponent and fits in `f64` without losing
    /// the distinction between zero and a genuinely nonzero value.
    Float(f64),
    /// Too wide for `i128`, or a float whose magnitude under/overflows
    /// `f64`. Retains exact decimal digits and exponent; no arithmetic is
    /// implemented on this representation, only equality and display (spec
    /// §9: "sufficient for equality/display without implementing full
    /// bignum arithmetic").
    Big(BigNumber),
}

impl Number {
    /// The value as `f64`, widening integers and approximating big numbers
    /// as needed (saturating to `0.0`/infinity when the magnitude doesn't
    /// fit, exactly like a narrow float parse would).
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::I64(v) => *v as f64,
            Self::I128(v) => *v as f64,
            Self::Float(v) => *v,
            Self::Big(b) => b.approx,
        }
    }

    /// Widens this value to its [`BigNumber`] representation, regardless of
    /// which variant it started as.
    #[must_use]
    pub fn to_big(&self) -> BigNumber {
        match self {
            Self::Big(b) => b.clone(),
            Self::I64(v) => BigNumber::parse(&v.to_string()),
            Self::I128(v) => BigNumber::parse(&v.to_string()),
            Self::Float(v) => BigNumber::parse(&alloc::format!("{v}")),
        }
    }

    fn from_i128(v: i128) -> Self {
        match i64::try_from(v) {
            Ok(v) => Self::I64(v),
            Err(_) => Self::I128(v),
        }
    }

    /// Promotes both operands through `i128` when both are exact integers
    /// that fit, or through `f64` otherwise (spec §4.F: "Arithmetic
    /// operators... promote both operands through this parse once"). A
    /// `Big` operand on either side is rejected: this crate does not
    /// implement bignum arithmetic, so mixed-bigness arithmetic returns
    /// `InexactConversion` rather than silently losing precision.
    fn promote_pair(a: &Self, b: &Self) -> Result<Promoted, ScanErrorKind> {
        match (a, b) {
            (Self::Big(_), _) | (_, Self::Big(_)) => Err(ScanErrorKind::InexactConversion {
                offset: 0,
                target: NumberTarget::Integer,
            }),
            (Self::I64(x), Self::I64(y)) => Ok(Promoted::Int(i128::from(*x), i128::from(*y))),
            (Self::I64(x), Self::I128(y)) | (Self::I128(y), Self::I64(x)) => {
                Ok(Promoted::Int(i128::from(*x), *y))
            }
            (Self::I128(x), Self::I128(y)) => Ok(Promoted::Int(*x, *y)),
            _ => Ok(Promoted::Float(a.as_f64(), b.as_f64())),
        }
    }
}

/// Both operands of a pending arithmetic operation, promoted to a common
/// representation.
enum Promoted {
    Int(i128, i128),
    Float(f64, f64),
}

/// Applies `int_op` when both operands promoted to `i128`, falling back to
/// `float_op` on integer overflow or when either operand was already a
/// float.
fn checked_arith(
    a: Number,
    b: Number,
    int_op: impl Fn(i128, i128) -> Option<i128>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Number, ScanErrorKind> {
    match Number::promote_pair(&a, &b)? {
        Promoted::Int(x, y) => match int_op(x, y) {
            Some(v) => Ok(Number::from_i128(v)),
            None => Ok(Number::Float(float_op(x as f64, y as f64))),
        },
        Promoted::Float(x, y) => Ok(Number::Float(float_op(x, y))),
    }
}

impl core::ops::Add for Number {
    type Output = Result<Number, ScanErrorKind>;

    fn add(self, rhs: Self) -> Self::Output {
        checked_arith(self, rhs, i128::checked_add, |a, b| a + b)
    }
}

impl core::ops::Sub for Number {
    type Output = Result<Number, ScanErrorKind>;

    fn sub(self, rhs: Self) -> Self::Output {
        checked_arith(self, rhs, i128::checked_sub, |a, b| a - b)
    }
}

impl core::ops::Mul for Number {
    type Output = Result<Number, ScanErrorKind>;

    fn mul(self, rhs: Self) -> Self::Output {
        checked_arith(self, rhs, i128::checked_mul, |a, b| a * b)
    }
}

impl core::ops::Div for Number {
    type Output = Result<Number, ScanErrorKind>;

    /// Division always promotes through `f64`: integer division would
    /// silently truncate, and the spec's arithmetic contract names no
    /// separate integer-division operator.
    fn div(self, rhs: Self) -> Self::Output {
        match Number::promote_pair(&self, &rhs)? {
            Promoted::Int(x, y) => Ok(Number::Float(x as f64 / y as f64)),
            Promoted::Float(x, y) => Ok(Number::Float(x / y)),
        }
    }
}

/// An arbitrary-precision decimal number, retained as normalized
/// significant digits plus a power-of-ten exponent: the value is
/// `(-1)^sign * 0.<digits> * 10^(exponent + 1)`, i.e. `digits[0]` is the
/// first significant digit and `exponent` is the power of ten of that
/// digit (standard scientific-notation normalization).
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BigNumber {
    negative: bool,
    /// Significant digits with no leading or trailing zeros; `"0"` for a
    /// genuine zero value.
    digits: String,
    /// Power of ten of the first digit in `digits`.
    exponent: i64,
    /// Best-effort `f64` approximation (0.0 or infinity when the true
    /// magnitude doesn't fit).
    approx: f64,
}

impl BigNumber {
    /// Parses `text` (a syntactically valid JSON number, already rejected
    /// by the narrow/wide integer and narrow float paths) into normalized
    /// significant digits and an exponent, via plain string surgery — no
    /// bignum arithmetic is required for normalization.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let approx = text.parse::<f64>().unwrap_or(0.0);
        let negative = text.starts_with('-');
        let unsigned = text.strip_prefix('-').unwrap_or(text);

        let (mantissa, exp_part) = match unsigned.find(['e', 'E']) {
            Some(idx) => (&unsigned[..idx], unsigned[idx + 1..].parse::<i64>().unwrap_or(0)),
            None => (unsigned, 0),
        };
        let (int_part, frac_part) = match mantissa.find('.') {
            Some(idx) => (&mantissa[..idx], &mantissa[idx + 1..]),
            None => (mantissa, ""),
        };

        let mut combined = String::with_capacity(int_part.len() + frac_part.len());
        combined.push_str(int_part);
        combined.push_str(frac_part);
        // value = combined * 10^(exp_part - frac_part.len())
        let mut base_exponent = exp_part - frac_part.len() as i64;

        let leading_zeros = combined.bytes().take_while(|&b| b == b'0').count();
        let trimmed_front = &combined[leading_zeros..];
        let trimmed = trimmed_front.trim_end_matches('0');
        let trailing_zeros = trimmed_front.len() - trimmed.len();
        base_exponent += trailing_zeros as i64;

        if trimmed.is_empty() {
            return Self {
                negative: false,
                digits: "0".to_string(),
                exponent: 0,
                approx: if negative { -0.0 } else { 0.0 },
            };
        }

        let exponent = base_exponent + trimmed.len() as i64 - 1;
        Self {
            negative,
            digits: trimmed.to_string(),
            exponent,
            approx,
        }
    }

    /// Whether the value is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Normalized significant digits (no leading/trailing zeros).
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Power of ten of the first significant digit.
    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }
}

impl core::fmt::Display for BigNumber {
    /// Canonical scientific-notation text, e.g. `1.23456e-787`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let mut chars = self.digits.chars();
        let Some(first) = chars.next() else {
            return f.write_str("0");
        };
        write!(f, "{first}")?;
        let rest: String = chars.collect();
        if !rest.is_empty() {
            write!(f, ".{rest}")?;
        }
        write!(f, "e{}", self.exponent)
    }
}
