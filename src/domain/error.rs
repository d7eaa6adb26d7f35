//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid RAM quota: {0} (expected \"default\", \"<n>kb\" or \"<n>mb\")")]
    InvalidRamQuota(String),

    #[error("invalid bandwidth weight: {0} (expected \"default\" or a positive integer)")]
    InvalidBandwidthWeight(String),

    #[error("cannot extract key pair from wallet output: {0:?}")]
    KeyOutputMismatch(String),

    #[error("account references unknown token: {0}")]
    UnknownToken(String),
}
