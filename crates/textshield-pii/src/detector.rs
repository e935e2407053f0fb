//! PII detectors

pub mod patterns;
mod regex_detector;

pub use regex_detector::RegexPIIDetector;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while compiling the pattern library
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid keyword set: {0}")]
    Keywords(#[from] aho_corasick::BuildError),

    #[error("Unknown hit type: {0}")]
    UnknownType(String),
}

/// Coarse kind of a detected occurrence
///
/// The serialized name is the prefix used in dotted hit types
/// (`api_key` in `api_key.jwt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// Email address
    Email,

    /// International phone number
    Phone,

    /// IBAN-shaped bank account number
    Iban,

    /// Government ID number (11 digits, Turkish TCKN layout)
    #[serde(rename = "tckn")]
    NationalId,

    /// US Social Security Number
    Ssn,

    /// Luhn-valid payment card number
    CreditCard,

    /// Date of birth
    #[serde(rename = "dob")]
    DateOfBirth,

    /// IPv4 address
    Ipv4,

    /// MAC address
    Mac,

    /// 15-digit device identifier
    Imei,

    /// Passport-like identifier
    Passport,

    /// Driver license token near a license keyword
    DriverLicense,

    /// Password assignment (`password: ...`)
    Password,

    /// Health-related keyword
    Health,

    /// Credential or secret material
    ApiKey,

    /// Operator-defined pattern
    Custom,
}

impl HitKind {
    /// Every kind with a built-in detector
    pub const BUILTIN: [HitKind; 15] = [
        HitKind::Email,
        HitKind::Phone,
        HitKind::Iban,
        HitKind::NationalId,
        HitKind::Ssn,
        HitKind::CreditCard,
        HitKind::DateOfBirth,
        HitKind::Ipv4,
        HitKind::Mac,
        HitKind::Imei,
        HitKind::Passport,
        HitKind::DriverLicense,
        HitKind::Password,
        HitKind::Health,
        HitKind::ApiKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HitKind::Email => "email",
            HitKind::Phone => "phone",
            HitKind::Iban => "iban",
            HitKind::NationalId => "tckn",
            HitKind::Ssn => "ssn",
            HitKind::CreditCard => "credit_card",
            HitKind::DateOfBirth => "dob",
            HitKind::Ipv4 => "ipv4",
            HitKind::Mac => "mac",
            HitKind::Imei => "imei",
            HitKind::Passport => "passport",
            HitKind::DriverLicense => "driver_license",
            HitKind::Password => "password",
            HitKind::Health => "health",
            HitKind::ApiKey => "api_key",
            HitKind::Custom => "custom",
        }
    }
}

impl fmt::Display for HitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HitKind {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HitKind::BUILTIN
            .iter()
            .chain(std::iter::once(&HitKind::Custom))
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| DetectorError::UnknownType(s.to_string()))
    }
}

/// Dotted hit type: a coarse kind plus an optional fine-grained tag
///
/// Policy and masking key off `kind`; `tag` is kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HitType {
    pub kind: HitKind,
    pub tag: Option<String>,
}

impl HitType {
    pub fn new(kind: HitKind) -> Self {
        Self { kind, tag: None }
    }

    pub fn tagged(kind: HitKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: Some(tag.into()),
        }
    }
}

impl From<HitKind> for HitType {
    fn from(kind: HitKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}.{}", self.kind, tag),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl From<HitType> for String {
    fn from(hit_type: HitType) -> Self {
        hit_type.to_string()
    }
}

impl TryFrom<String> for HitType {
    type Error = DetectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for HitType {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((kind, tag)) => Ok(HitType::tagged(kind.parse()?, tag)),
            None => Ok(HitType::new(s.parse()?)),
        }
    }
}

/// A detected occurrence in the normalized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Dotted type, e.g. `api_key.jwt`
    #[serde(rename = "type")]
    pub hit_type: HitType,

    /// Half-open byte range into the normalized text
    pub span: (usize, usize),

    /// The matched substring
    pub value: String,
}

impl Hit {
    pub fn new(hit_type: impl Into<HitType>, start: usize, end: usize, value: impl Into<String>) -> Self {
        Self {
            hit_type: hit_type.into(),
            span: (start, end),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> HitKind {
        self.hit_type.kind
    }

    pub fn start(&self) -> usize {
        self.span.0
    }

    pub fn end(&self) -> usize {
        self.span.1
    }

    pub fn len(&self) -> usize {
        self.span.1.saturating_sub(self.span.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the two half-open spans share at least one byte
    pub fn overlaps(&self, other: &Hit) -> bool {
        self.start() < other.end() && self.end() > other.start()
    }
}

/// Output of a detection pass
///
/// `text` is the whitespace-normalized input every hit span refers to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scan {
    pub text: String,
    pub hits: Vec<Hit>,
}

/// Trait for detecting PII in text
pub trait PIIDetector: Send + Sync {
    /// Normalize `text` and collect every candidate hit (overlaps included)
    fn scan(&self, text: &str) -> Scan;

    /// Get the types of PII this detector can find
    fn supported_types(&self) -> Vec<HitKind>;
}

/// Configuration for a PII detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Built-in kinds to run
    #[serde(default = "default_enabled")]
    pub enabled: Vec<HitKind>,

    /// Custom regex patterns to detect
    #[serde(default)]
    pub custom_patterns: Vec<CustomPattern>,
}

fn default_enabled() -> Vec<HitKind> {
    HitKind::BUILTIN.to_vec()
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            custom_patterns: Vec::new(),
        }
    }
}

impl DetectorConfig {
    pub fn is_enabled(&self, kind: HitKind) -> bool {
        self.enabled.contains(&kind)
    }
}

/// Custom regex pattern for detection
///
/// Matches are reported as `custom.<name>` hits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Name of the pattern
    pub name: String,

    /// Regex pattern
    pub pattern: String,

    /// Placeholder text used when redacting (e.g., "[API_KEY]")
    /// If None, defaults to "[CUS:name]"
    #[serde(default)]
    pub placeholder: Option<String>,
}
