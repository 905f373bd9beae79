//! # Exact Shamir Secret Reconstruction
//!
//! This library recovers a secret from a threshold set of Shamir shares whose coordinates are
//! arbitrarily large integers, with each share's value written in its own numeric base.
//!
//! ## The Mathematics
//!
//! A secret `S` is hidden as the constant term of a polynomial of degree `k-1`:
//!
//! ```ignore
//! f(x) = a0 + a1*x + a2*x^2 + ... + a(k-1)*x^(k-1)
//! ```
//!
//! where `a0 = S`. Each share is a point `(x, f(x))`. Any `k` distinct points fix the polynomial,
//! and Lagrange interpolation at zero gives back `a0`:
//!
//! ```ignore
//! S = sum_i y_i * prod_{j != i} (-x_j) / (x_i - x_j)
//! ```
//!
//! The sum is kept as an exact fraction of big integers. A result whose denominator is not 1 is
//! reported as an error instead of being rounded, since it can only come from shares that do not
//! lie on one integer polynomial of degree `< k`.
//!
//! ## Example
//!
//! ```rust
//! use shardsolve::share::{BaseToken, Share};
//! use shardsolve::sss::{reconstruct, ReconstructionProblem};
//!
//! let shares = vec![
//!     Share::decode("1", &BaseToken::from("10"), "4").unwrap(),
//!     Share::decode("2", &BaseToken::from("2"), "111").unwrap(),
//!     Share::decode("3", &BaseToken::from("10"), "12").unwrap(),
//!     Share::decode("6", &BaseToken::from("4"), "213").unwrap(),
//! ];
//! let secret = reconstruct(&ReconstructionProblem::new(3, shares)).unwrap();
//! assert_eq!(secret.to_string(), "3");
//! ```
//!
//! ## Modules
//!
//! - `share`: Decodes raw shares into big-integer coordinates.
//! - `sss`: Exact Lagrange interpolation and secret reconstruction.
//! - `input`: The JSON share-file schema.
//! - `solver`: Solves many share files concurrently.
//! - `config`: Loads the solver configuration.

/// The `config` module loads `conf.toml` and environment overrides for the command line tool.
pub mod config;

/// The `constants` module defines various constants used in the library.
pub mod constants;

/// The `input` module turns a JSON share file into a reconstruction problem. It tells the `keys`
/// record apart from share records and validates each before any share is decoded.
pub mod input;

/// The `share` module decodes a single share, an x identifier plus a value in a stated base.
pub mod share;

/// The `solver` module reads share files and reconstructs each one on its own task, so that one
/// bad file never keeps the others from being solved.
pub mod solver;

/// The `sss` (Shamir's Secret Sharing) module holds the reconstruction engine: subset selection
/// and exact Lagrange interpolation over big rationals.
pub mod sss;
