//! PII redaction

mod standard_redactor;

pub use standard_redactor::StandardRedactor;

use crate::detector::{Hit, HitKind};
use serde::{Deserialize, Serialize};

/// How a single hit value is rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum MaskStyle {
    /// Remove the value completely
    Remove,

    /// Replace with a fixed, fully opaque placeholder
    Placeholder { text: String },

    /// Keep the first and last `keep` characters of the whitespace-stripped
    /// value when it is longer than `min_len`, otherwise use `fallback`
    KeepEnds {
        keep: usize,
        min_len: usize,
        fallback: String,
    },

    /// `prefix` followed by the last `keep` digits, or `fallback` when there
    /// are fewer digits than that
    LastDigits {
        prefix: String,
        keep: usize,
        fallback: String,
    },

    /// Fixed-width `mask` followed by the last `keep` characters
    MaskedSuffix { mask: String, keep: usize },
}

impl MaskStyle {
    pub fn placeholder(text: impl Into<String>) -> Self {
        MaskStyle::Placeholder { text: text.into() }
    }
}

/// Trait for redacting PII from text
pub trait PIIRedactor: Send + Sync {
    /// Replace every hit span in `text` with its masked value
    ///
    /// `hits` must be non-overlapping spans into `text` (a resolved set).
    fn redact(&self, text: &str, hits: &[Hit]) -> String;

    /// The replacement for a single hit
    fn mask_value(&self, hit: &Hit) -> String;
}

/// Configuration for PII redaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactorConfig {
    /// Replacement for kinds without a style
    #[serde(default = "default_placeholder")]
    pub default_placeholder: String,

    /// Per-type redaction overrides
    #[serde(default)]
    pub type_overrides: Vec<TypeRedactionOverride>,
}

fn default_placeholder() -> String {
    "[masked]".to_string()
}

impl Default for RedactorConfig {
    fn default() -> Self {
        Self {
            default_placeholder: default_placeholder(),
            type_overrides: Vec::new(),
        }
    }
}

impl RedactorConfig {
    /// Built-in style per kind
    ///
    /// Cards, credentials and ID numbers keep a short suffix for triage;
    /// everything else is fully opaque. Custom hits are handled by name.
    pub fn default_style(kind: HitKind) -> Option<MaskStyle> {
        let style = match kind {
            HitKind::ApiKey => MaskStyle::KeepEnds {
                keep: 4,
                min_len: 8,
                fallback: "[api_key masked]".to_string(),
            },
            HitKind::CreditCard => MaskStyle::LastDigits {
                prefix: "XXXX-XXXX-XXXX-".to_string(),
                keep: 4,
                fallback: "[card masked]".to_string(),
            },
            HitKind::NationalId => MaskStyle::MaskedSuffix {
                mask: "*******".to_string(),
                keep: 4,
            },
            HitKind::Ssn => MaskStyle::MaskedSuffix {
                mask: "***-**-".to_string(),
                keep: 4,
            },
            HitKind::Passport => MaskStyle::MaskedSuffix {
                mask: "*******".to_string(),
                keep: 3,
            },
            HitKind::Iban => MaskStyle::placeholder("[iban masked]"),
            HitKind::Phone => MaskStyle::placeholder("[phone masked]"),
            HitKind::Email => MaskStyle::placeholder("[email masked]"),
            HitKind::DateOfBirth => MaskStyle::placeholder("[date masked]"),
            HitKind::Ipv4 => MaskStyle::placeholder("[ip masked]"),
            HitKind::Mac => MaskStyle::placeholder("[mac masked]"),
            HitKind::Imei => MaskStyle::placeholder("[device id masked]"),
            HitKind::DriverLicense => MaskStyle::placeholder("[license masked]"),
            HitKind::Health => MaskStyle::placeholder("[health info masked]"),
            HitKind::Password => MaskStyle::placeholder("[password masked]"),
            HitKind::Custom => return None,
        };
        Some(style)
    }
}

/// Override redaction behavior for a specific PII type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRedactionOverride {
    /// PII type to override
    pub pii_type: HitKind,

    /// Style for this type
    pub style: MaskStyle,
}
