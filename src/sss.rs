use core::fmt;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, trace};

use crate::share::{BaseToken, DecodeError, Share};

/// Errors raised while reconstructing a secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    #[error("threshold must be at least 1, got {threshold}")]
    InvalidThreshold { threshold: usize },

    #[error("not enough shares to reconstruct secret (need {threshold}, got {available})")]
    InsufficientShares {
        /// Required number of shares (k)
        threshold: usize,
        /// Number of shares supplied
        available: usize,
    },

    #[error("two shares have the same x-coordinate {x}")]
    DuplicateAbscissa { x: BigInt },

    #[error("interpolated value {value} at zero is not an integer")]
    NonIntegerResult { value: BigRational },
}

/// The unit of work handed to [`reconstruct`]: a threshold and the shares to draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionProblem {
    /// Minimum number of shares needed (k).
    pub threshold: usize,
    pub shares: Vec<Share>,
}

impl ReconstructionProblem {
    pub fn new(threshold: usize, shares: Vec<Share>) -> Self {
        ReconstructionProblem { threshold, shares }
    }
}

/// A reconstructed secret, the polynomial's value at `x = 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Secret(pub BigInt);

impl Secret {
    pub fn value(&self) -> &BigInt {
        &self.0
    }

    pub fn into_inner(self) -> BigInt {
        self.0
    }

    /// Renders the secret in `radix` with lower-case digits.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidBase`] if `radix` is outside `[2, 36]`.
    pub fn to_str_radix(&self, radix: u32) -> Result<String, DecodeError> {
        let radix = BaseToken::from(radix).radix()?;
        Ok(self.0.to_str_radix(radix))
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BigInt> for Secret {
    fn from(value: BigInt) -> Self {
        Secret(value)
    }
}

/// Picks the shares a reconstruction runs on: the `threshold` shares with the smallest `x`.
///
/// # Errors
///
/// * [`ReconstructError::InvalidThreshold`] if `threshold` is zero.
/// * [`ReconstructError::InsufficientShares`] if fewer than `threshold` shares are given.
pub fn select_shares(shares: &[Share], threshold: usize) -> Result<Vec<Share>, ReconstructError> {
    if threshold == 0 {
        return Err(ReconstructError::InvalidThreshold { threshold });
    }

    if shares.len() < threshold {
        return Err(ReconstructError::InsufficientShares {
            threshold,
            available: shares.len(),
        });
    }

    let mut sorted = shares.to_vec();
    sorted.sort_by(|a, b| a.x.cmp(&b.x));
    sorted.truncate(threshold);
    Ok(sorted)
}

/// Performs Lagrange interpolation on a set of points to find the value of the polynomial at `x`.
///
/// Every step is carried out over exact rationals, so the result is the exact value of the
/// unique polynomial of degree `< points.len()` through `points`.
///
/// # Errors
///
/// Returns [`ReconstructError::DuplicateAbscissa`] if two points share an `x`. The check runs
/// before any division.
///
/// # Examples
///
/// ```rust
/// use num_bigint::BigInt;
/// use num_rational::BigRational;
/// use shardsolve::share::Share;
/// use shardsolve::sss::interpolate;
///
/// let points = [Share::new(1, 3), Share::new(2, 5)];
/// let value = interpolate(&points, &BigInt::from(3)).unwrap();
/// assert_eq!(value, BigRational::from_integer(BigInt::from(7)));
/// ```
pub fn interpolate(points: &[Share], x: &BigInt) -> Result<BigRational, ReconstructError> {
    let mut seen = HashSet::with_capacity(points.len());
    for point in points {
        if !seen.insert(&point.x) {
            return Err(ReconstructError::DuplicateAbscissa {
                x: point.x.clone(),
            });
        }
    }

    let mut value = BigRational::zero();

    for (i, a) in points.iter().enumerate() {
        let mut top = BigInt::one();
        let mut bottom = BigInt::one();

        for (j, b) in points.iter().enumerate() {
            if i != j {
                top *= x - &b.x;
                bottom *= &a.x - &b.x;
            }
        }

        let weight = BigRational::new(top * &a.y, bottom);
        trace!("term {}: {}", i, weight);
        value += weight;
    }

    Ok(value)
}

/// Evaluates the polynomial through `points` at zero and requires the result to be an integer.
///
/// # Errors
///
/// * [`ReconstructError::DuplicateAbscissa`] if two points share an `x`.
/// * [`ReconstructError::NonIntegerResult`] if the value at zero has a denominator other than 1,
///   which means the points do not lie on one integer polynomial of degree `< points.len()`.
pub fn interpolate_at_zero(points: &[Share]) -> Result<Secret, ReconstructError> {
    let value = interpolate(points, &BigInt::zero())?;

    if !value.is_integer() {
        return Err(ReconstructError::NonIntegerResult { value });
    }

    Ok(Secret(value.to_integer()))
}

/// Reconstructs the secret of a [`ReconstructionProblem`].
///
/// The shares are ordered by ascending `x` and the first `threshold` of them are interpolated at
/// zero.
///
/// # Examples
///
/// ```rust
/// use num_bigint::BigInt;
/// use shardsolve::share::Share;
/// use shardsolve::sss::{reconstruct, ReconstructionProblem};
///
/// let shares = vec![Share::new(3, 12), Share::new(1, 4), Share::new(2, 7)];
/// let secret = reconstruct(&ReconstructionProblem::new(3, shares)).unwrap();
/// assert_eq!(secret.value(), &BigInt::from(3));
/// ```
pub fn reconstruct(problem: &ReconstructionProblem) -> Result<Secret, ReconstructError> {
    let selected = select_shares(&problem.shares, problem.threshold)?;
    debug!(
        "Interpolating {} of {} shares at zero",
        selected.len(),
        problem.shares.len()
    );
    interpolate_at_zero(&selected)
}
