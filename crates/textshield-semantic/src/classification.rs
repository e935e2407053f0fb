//! Classification result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category reported when nothing sensitive was found
pub const GENERAL_CATEGORY: &str = "general";

/// Sensitivity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Sensitive,
    NonSensitive,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Sensitive => "sensitive",
            Label::NonSensitive => "non_sensitive",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exemplar and its similarity to the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub exemplar: String,
    pub similarity: f32,
}

/// Output of a semantic classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,

    pub category: String,

    /// `max positive similarity - alpha * max negative similarity`; not clamped
    pub score: f32,

    /// Closest positive exemplars of the winning category
    #[serde(default)]
    pub evidence: Vec<Evidence>,

    /// Closest negative exemplars of the winning category
    #[serde(default)]
    pub negative_evidence: Vec<Evidence>,
}

impl Classification {
    /// The result of an absent or failing classifier
    pub fn neutral() -> Self {
        Self {
            label: Label::NonSensitive,
            category: GENERAL_CATEGORY.to_string(),
            score: 0.0,
            evidence: Vec::new(),
            negative_evidence: Vec::new(),
        }
    }

    pub fn is_sensitive(&self) -> bool {
        self.label == Label::Sensitive
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral() {
        let neutral = Classification::neutral();
        assert_eq!(neutral.label, Label::NonSensitive);
        assert_eq!(neutral.category, "general");
        assert_eq!(neutral.score, 0.0);
        assert!(neutral.evidence.is_empty());
        assert!(!neutral.is_sensitive());
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&Label::NonSensitive).unwrap(), "\"non_sensitive\"");
        assert_eq!(serde_json::to_string(&Label::Sensitive).unwrap(), "\"sensitive\"");
        assert_eq!(Label::NonSensitive.to_string(), "non_sensitive");
    }
}
