use core::fmt;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Num;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_BASE, MIN_BASE};

/// Errors raised while decoding a single raw share.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("share identifier {token:?} is not a decimal integer")]
    InvalidIdentifier { token: String },

    #[error("base {token:?} is not an integer in [2, 36]")]
    InvalidBase { token: String },

    #[error("value {value:?} is not a valid base-{base} number")]
    InvalidDigit {
        /// The value token as it was given.
        value: String,
        /// The radix the value was checked against.
        base: u32,
    },
}

/// The radix of a share value as it appears in a share file.
///
/// Share files carry the base either as a JSON string (`"base": "16"`) or as a
/// plain number (`"base": 16`); both are accepted. Anything else (a float, an integer past
/// `i64`, `null`) lands in `Other` and fails in [`BaseToken::radix`], so it stays a per-share
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseToken {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl BaseToken {
    /// Validates the token and returns the radix it names.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidBase`] if the token is not numeric or falls outside `[2, 36]`.
    pub fn radix(&self) -> Result<u32, DecodeError> {
        let parsed = match self {
            BaseToken::Number(n) => u32::try_from(*n).ok(),
            BaseToken::Text(s) => s.trim().parse::<u32>().ok(),
            BaseToken::Other(_) => None,
        };

        match parsed {
            Some(base) if (MIN_BASE..=MAX_BASE).contains(&base) => Ok(base),
            _ => Err(DecodeError::InvalidBase {
                token: self.to_string(),
            }),
        }
    }
}

impl fmt::Display for BaseToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BaseToken::Number(n) => write!(f, "{n}"),
            BaseToken::Text(s) => f.write_str(s),
            BaseToken::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<u32> for BaseToken {
    fn from(base: u32) -> Self {
        BaseToken::Number(i64::from(base))
    }
}

impl From<&str> for BaseToken {
    fn from(base: &str) -> Self {
        BaseToken::Text(base.to_string())
    }
}

/// A point `(x, y)` on the secret polynomial.
///
/// Both coordinates are arbitrary-precision integers; `x` is the interpolation abscissa and must
/// be unique among the shares of one reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Share {
    pub x: BigInt,
    pub y: BigInt,
}

impl Share {
    pub fn new(x: impl Into<BigInt>, y: impl Into<BigInt>) -> Self {
        Share {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Decodes a raw share into its canonical coordinates.
    ///
    /// # Arguments
    ///
    /// * `x_token` - The share identifier, always decimal.
    /// * `base` - The radix `value_token` is written in.
    /// * `value_token` - The y-coordinate, digits `0-9a-z` in any case.
    ///
    /// Every token is trimmed before it is validated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shardsolve::share::{BaseToken, Share};
    ///
    /// let share = Share::decode("6", &BaseToken::from("4"), "213").unwrap();
    /// assert_eq!(share, Share::new(6, 39));
    /// ```
    pub fn decode(x_token: &str, base: &BaseToken, value_token: &str) -> Result<Self, DecodeError> {
        let x = parse_identifier(x_token)?;
        let base = base.radix()?;
        let y = parse_value(value_token, base)?;
        Ok(Share { x, y })
    }

    /// Writes `y` back out in `base`, using lower-case digits and no leading zeros.
    pub fn encode_value(&self, base: u32) -> Result<String, DecodeError> {
        BaseToken::from(base).radix()?;
        Ok(self.y.to_str_radix(base))
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Free-function form of [`Share::decode`].
pub fn decode(x_token: &str, base: &BaseToken, value_token: &str) -> Result<Share, DecodeError> {
    Share::decode(x_token, base, value_token)
}

fn parse_identifier(token: &str) -> Result<BigInt, DecodeError> {
    let invalid = || DecodeError::InvalidIdentifier {
        token: token.to_string(),
    };

    let trimmed = token.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (Sign::Minus, rest),
        None => (Sign::Plus, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let magnitude = BigUint::from_str_radix(digits, 10).map_err(|_| invalid())?;
    Ok(BigInt::from_biguint(sign, magnitude))
}

fn parse_value(token: &str, base: u32) -> Result<BigInt, DecodeError> {
    let invalid = || DecodeError::InvalidDigit {
        value: token.to_string(),
        base,
    };

    let trimmed = token.trim();
    // from_str_radix alone would also take a sign and `_` separators
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_digit(base)) {
        return Err(invalid());
    }

    BigUint::from_str_radix(trimmed, base)
        .map(BigInt::from)
        .map_err(|_| invalid())
}
