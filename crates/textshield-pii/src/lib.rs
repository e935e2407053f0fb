//! TextShield PII Detection, Resolution and Redaction
//!
//! This crate provides the structural half of the moderation pipeline:
//! - Pattern library for contact data, financial and government identifiers,
//!   credentials and health keywords
//! - Checksum (Luhn) and keyword-window validation
//! - Deterministic overlap resolution across detectors
//! - Type-aware redaction that keeps surrounding text intact

pub mod detector;
pub mod redactor;
pub mod resolver;

pub use detector::{
    CustomPattern, DetectorConfig, DetectorError, Hit, HitKind, HitType, PIIDetector,
    RegexPIIDetector, Scan,
};
pub use redactor::{MaskStyle, PIIRedactor, RedactorConfig, StandardRedactor, TypeRedactionOverride};
pub use resolver::resolve;
