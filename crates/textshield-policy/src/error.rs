//! Guard construction errors
//!
//! Evaluation itself never fails; only building the compiled pattern sets can.

use textshield_pii::DetectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    #[error("Invalid heuristic pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid heuristic keywords: {0}")]
    Keywords(#[from] aho_corasick::BuildError),
}

pub type Result<T> = std::result::Result<T, GuardError>;
