//! Exemplar banks
//!
//! Loaded once at startup. Categories are kept in a `BTreeMap` so every
//! process iterates them in the same order.

use crate::{Result, SemanticError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const BUILTIN_BANKS: &str = include_str!("../exemplars.yaml");

/// Positive and negative phrases for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryExemplars {
    #[serde(default)]
    pub positives: Vec<String>,

    #[serde(default)]
    pub negatives: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExemplarBanks {
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryExemplars>,
}

impl ExemplarBanks {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let banks: Self = serde_yaml::from_str(source)?;
        banks.validate()?;
        Ok(banks)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let banks = Self::from_yaml_str(&content)?;
        debug!(
            path = %path.display(),
            categories = banks.categories.len(),
            "Loaded exemplar banks"
        );
        Ok(banks)
    }

    /// The bank compiled into the crate
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_BANKS)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for (name, bank) in &self.categories {
            if name.trim().is_empty() {
                return Err(SemanticError::Config(
                    "exemplar category name must not be empty".to_string(),
                ));
            }
            if bank.positives.iter().chain(&bank.negatives).any(|p| p.trim().is_empty()) {
                return Err(SemanticError::Config(format!(
                    "category '{name}' contains an empty exemplar"
                )));
            }
        }
        Ok(())
    }
}
