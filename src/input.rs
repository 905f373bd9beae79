use core::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::KEYS_RECORD;
use crate::share::{BaseToken, DecodeError, Share};
use crate::sss::{reconstruct, ReconstructError, ReconstructionProblem, Secret};

/// Errors raised while turning a share file into a secret.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed share file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("share file has no \"keys\" record")]
    MissingKeys,

    #[error("record {id:?} is malformed: {source}")]
    MalformedRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("share {id:?}: {source}")]
    InvalidShare {
        id: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Reconstruct(#[from] ReconstructError),

    #[error("solver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// What to do with a share record whose base or value does not decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePolicy {
    /// Fail the whole file.
    #[default]
    Abort,
    /// Drop the share and carry on with the others.
    Skip,
}

impl FromStr for SharePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(SharePolicy::Abort),
            "skip" => Ok(SharePolicy::Skip),
            other => Err(format!("unknown share policy {other:?}, expected \"abort\" or \"skip\"")),
        }
    }
}

impl fmt::Display for SharePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SharePolicy::Abort => f.write_str("abort"),
            SharePolicy::Skip => f.write_str("skip"),
        }
    }
}

/// The `keys` record of a share file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysRecord {
    /// Total number of shares handed out. Informational only.
    #[serde(default)]
    pub n: Option<u64>,
    /// Threshold needed to reconstruct.
    pub k: usize,
}

/// One share record, keyed in the file by its decimal `x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub base: BaseToken,
    pub value: String,
}

impl ShareRecord {
    pub fn decode(&self, id: &str) -> Result<Share, DecodeError> {
        Share::decode(id, &self.base, &self.value)
    }
}

/// A top-level entry of a share file, told apart by its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Keys(KeysRecord),
    Share { id: String, record: ShareRecord },
}

impl Record {
    /// Validates one `(key, value)` entry of a share file against its schema.
    pub fn from_entry(id: String, value: Value) -> Result<Self, Error> {
        if id == KEYS_RECORD {
            return serde_json::from_value(value)
                .map(Record::Keys)
                .map_err(|source| Error::MalformedRecord { id, source });
        }

        match serde_json::from_value(value) {
            Ok(record) => Ok(Record::Share { id, record }),
            Err(source) => Err(Error::MalformedRecord { id, source }),
        }
    }
}

/// A parsed share file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDocument {
    /// `keys.n`, if the file states it.
    pub total: Option<u64>,
    pub problem: ReconstructionProblem,
    /// Shares dropped under [`SharePolicy::Skip`], with the reason.
    pub skipped: Vec<(String, DecodeError)>,
}

impl ShareDocument {
    pub fn reconstruct(&self) -> Result<Secret, ReconstructError> {
        reconstruct(&self.problem)
    }
}

/// Parses a JSON share file into a [`ShareDocument`].
///
/// The file is an object holding one `keys` record (`{"n": .., "k": ..}`) and any number of
/// share records keyed by their decimal `x` (`{"base": .., "value": ..}`).
///
/// # Examples
///
/// ```rust
/// use shardsolve::input::{parse_document, SharePolicy};
///
/// let json = r#"{
///     "keys": { "n": 3, "k": 2 },
///     "1": { "base": "10", "value": "3" },
///     "2": { "base": "2", "value": "101" },
///     "3": { "base": 16, "value": "7" }
/// }"#;
/// let document = parse_document(json, SharePolicy::Abort).unwrap();
/// assert_eq!(document.reconstruct().unwrap().to_string(), "1");
/// ```
pub fn parse_document(json: &str, policy: SharePolicy) -> Result<ShareDocument, Error> {
    let entries: Map<String, Value> = serde_json::from_str(json)?;

    let mut keys = None;
    let mut shares = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (id, value) in entries {
        match Record::from_entry(id, value)? {
            Record::Keys(record) => keys = Some(record),
            Record::Share { id, record } => match record.decode(&id) {
                Ok(share) => shares.push(share),
                Err(source) if policy == SharePolicy::Skip => {
                    warn!("⚠️ Skipping share {}: {}", id, source);
                    skipped.push((id, source));
                }
                Err(source) => return Err(Error::InvalidShare { id, source }),
            },
        }
    }

    let keys = keys.ok_or(Error::MissingKeys)?;
    let records = shares.len() + skipped.len();
    if let Some(n) = keys.n {
        if usize::try_from(n).map_or(true, |n| n != records) {
            warn!("keys.n is {} but the file holds {} share records", n, records);
        }
    }

    debug!("Parsed {} shares, threshold {}", shares.len(), keys.k);
    Ok(ShareDocument {
        total: keys.n,
        problem: ReconstructionProblem::new(keys.k, shares),
        skipped,
    })
}

/// Parses a share file and reconstructs its secret.
pub fn solve_document(json: &str, policy: SharePolicy) -> Result<Secret, Error> {
    let document = parse_document(json, policy)?;
    Ok(document.reconstruct()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    const QUADRATIC: &str = r#"{
        "keys": { "n": 4, "k": 3 },
        "1": { "base": "10", "value": "4" },
        "2": { "base": "2", "value": "111" },
        "3": { "base": "10", "value": "12" },
        "6": { "base": "4", "value": "213" }
    }"#;

    #[test]
    fn test_parse_document() {
        let document = parse_document(QUADRATIC, SharePolicy::Abort).unwrap();
        assert_eq!(document.total, Some(4));
        assert_eq!(document.problem.threshold, 3);
        assert_eq!(document.problem.shares.len(), 4);
        assert!(document.problem.shares.contains(&Share::new(6, 39)));
        assert!(document.skipped.is_empty());
    }

    #[test]
    fn test_solve_document() {
        let secret = solve_document(QUADRATIC, SharePolicy::Abort).unwrap();
        assert_eq!(secret.into_inner(), BigInt::from(3));
    }

    #[test]
    fn test_numeric_base_and_missing_n() {
        let json = r#"{
            "keys": { "k": 2 },
            "1": { "base": 16, "value": "3" },
            "2": { "base": 16, "value": "5" }
        }"#;
        let document = parse_document(json, SharePolicy::Abort).unwrap();
        assert_eq!(document.total, None);
        assert_eq!(document.reconstruct().unwrap().to_string(), "1");
    }

    #[test]
    fn test_missing_keys() {
        let json = r#"{ "1": { "base": "10", "value": "4" } }"#;
        let err = parse_document(json, SharePolicy::Abort).unwrap_err();
        assert!(matches!(err, Error::MissingKeys));
    }

    #[test]
    fn test_not_an_object() {
        let err = parse_document("[1, 2, 3]", SharePolicy::Abort).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_malformed_records() {
        let json = r#"{ "keys": { "n": 1 }, "1": { "base": "10", "value": "4" } }"#;
        let err = parse_document(json, SharePolicy::Skip).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { ref id, .. } if id == "keys"));

        let json = r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "10" } }"#;
        let err = parse_document(json, SharePolicy::Skip).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { ref id, .. } if id == "1"));
    }

    #[test]
    fn test_float_base_aborts_as_invalid_share() {
        let json = r#"{
            "keys": { "n": 2, "k": 1 },
            "1": { "base": "10", "value": "4" },
            "2": { "base": 16.5, "value": "5" }
        }"#;
        let err = parse_document(json, SharePolicy::Abort).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidShare { ref id, source: DecodeError::InvalidBase { .. } } if id == "2"
        ));
    }

    #[test]
    fn test_share_count_mismatch_still_parses() {
        for n in [2, 9, u64::MAX] {
            let json = format!(
                r#"{{
                    "keys": {{ "n": {n}, "k": 2 }},
                    "1": {{ "base": "10", "value": "3" }},
                    "2": {{ "base": "10", "value": "5" }},
                    "3": {{ "base": "10", "value": "7" }}
                }}"#
            );
            let document = parse_document(&json, SharePolicy::Abort).unwrap();
            assert_eq!(document.total, Some(n));
            assert_eq!(document.problem.shares.len(), 3);
            assert_eq!(document.reconstruct().unwrap().to_string(), "1");
        }
    }

    #[test]
    fn test_invalid_share_aborts() {
        let json = r#"{
            "keys": { "n": 2, "k": 1 },
            "1": { "base": "10", "value": "4" },
            "2": { "base": "2", "value": "123" }
        }"#;
        let err = parse_document(json, SharePolicy::Abort).unwrap_err();
        match err {
            Error::InvalidShare { id, source } => {
                assert_eq!(id, "2");
                assert!(matches!(source, DecodeError::InvalidDigit { base: 2, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_share_skipped() {
        let json = r#"{
            "keys": { "n": 4, "k": 2 },
            "1": { "base": "10", "value": "3" },
            "2": { "base": "99", "value": "5" },
            "x": { "base": "10", "value": "5" },
            "3": { "base": "10", "value": "7" },
            "4": { "base": 16.5, "value": "9" },
            "5": { "base": 16.0, "value": "b" },
            "6": { "base": 18446744073709551615, "value": "d" }
        }"#;
        let document = parse_document(json, SharePolicy::Skip).unwrap();
        assert_eq!(document.problem.shares.len(), 2);
        assert_eq!(document.skipped.len(), 5);
        for id in ["2", "4", "5", "6"] {
            assert!(document
                .skipped
                .iter()
                .any(|(skipped, err)| skipped == id && matches!(err, DecodeError::InvalidBase { .. })));
        }
        assert!(document
            .skipped
            .iter()
            .any(|(id, err)| id == "x" && matches!(err, DecodeError::InvalidIdentifier { .. })));
        assert_eq!(document.reconstruct().unwrap().to_string(), "1");
    }

    #[test]
    fn test_equal_identifiers_are_duplicates() {
        let json = r#"{
            "keys": { "n": 2, "k": 2 },
            "1": { "base": "10", "value": "3" },
            "01": { "base": "10", "value": "8" }
        }"#;
        let err = solve_document(json, SharePolicy::Abort).unwrap_err();
        assert!(matches!(
            err,
            Error::Reconstruct(ReconstructError::DuplicateAbscissa { .. })
        ));
    }

    #[test]
    fn test_insufficient_shares() {
        let json = r#"{ "keys": { "n": 5, "k": 3 }, "1": { "base": "10", "value": "4" } }"#;
        let err = solve_document(json, SharePolicy::Abort).unwrap_err();
        assert!(matches!(
            err,
            Error::Reconstruct(ReconstructError::InsufficientShares {
                threshold: 3,
                available: 1
            })
        ));
    }

    #[test]
    fn test_demo_files() {
        let first = solve_document(include_str!("../demos/shares1.json"), SharePolicy::Abort).unwrap();
        assert_eq!(first.to_string(), "3");

        let second = solve_document(include_str!("../demos/shares2.json"), SharePolicy::Abort).unwrap();
        assert_eq!(
            second.to_string(),
            "113290930051451398541124007855224703922444404575131771778104"
        );
    }

    #[test]
    fn test_share_policy_from_str() {
        assert_eq!("Skip".parse::<SharePolicy>().unwrap(), SharePolicy::Skip);
        assert_eq!(" abort ".parse::<SharePolicy>().unwrap(), SharePolicy::Abort);
        assert!("drop".parse::<SharePolicy>().is_err());
    }
}
