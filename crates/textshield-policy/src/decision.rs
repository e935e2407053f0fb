//! Decision engine: resolved hits plus heuristic and semantic signals in,
//! one action, label, category and warning list out

use serde::{Deserialize, Serialize};
use textshield_pii::Hit;
use textshield_semantic::{Classification, Label};

use crate::policy::{
    ADDRESS_CATEGORY, ADVERSARIAL_CATEGORY, CREDENTIAL_CATEGORY, EnforcementAction,
    GENERAL_CATEGORY, OTHER_CATEGORY, PolicyTable,
};

/// Semantic score at which an adversarial heuristic hit escalates to block
pub const DEFAULT_ADVERSARIAL_BLOCK_SCORE: f32 = 0.70;

const LOW_CONFIDENCE_WARNING: &str = "Low-confidence entity detected";

/// Final output of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: EnforcementAction,
    pub label: Label,
    pub category: String,

    /// Normalized input; redacted when the action is mask or block
    pub text: String,

    /// Resolved hits, ascending and non-overlapping
    pub hits: Vec<Hit>,

    pub warnings: Vec<String>,
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        self.action == EnforcementAction::Block
    }
}

/// Whole-text signals gathered next to the structural hits
#[derive(Debug, Clone, Copy)]
pub struct Signals<'a> {
    pub adversarial: bool,
    pub address_like: bool,
    pub semantic: &'a Classification,

    /// Add a `[SEM] ...` line after the type-driven warnings
    pub semantic_debug: bool,
}

/// Everything in a [`Decision`] except the text and hits
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub action: EnforcementAction,
    pub label: Label,
    pub category: String,
    pub warnings: Vec<String>,
}

pub struct DecisionEngine {
    table: PolicyTable,
    adversarial_block_score: f32,
}

impl DecisionEngine {
    pub fn new(table: PolicyTable) -> Self {
        Self {
            table,
            adversarial_block_score: DEFAULT_ADVERSARIAL_BLOCK_SCORE,
        }
    }

    pub fn with_adversarial_block_score(mut self, score: f32) -> Self {
        self.adversarial_block_score = score;
        self
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    pub fn decide(&self, hits: &[Hit], signals: &Signals<'_>) -> Verdict {
        let semantic = signals.semantic;
        let mut warnings = Vec::new();

        // Hardest action wins
        let mut action = EnforcementAction::Allow;
        for hit in hits {
            let hit_action = self.table.action_for(hit.kind());
            if hit_action == EnforcementAction::Warn {
                warnings.push(format!("Detected {} with low/medium confidence", hit.hit_type));
            }
            action = action.max(hit_action);
        }

        let (mut label, mut category) = self.label_and_category(hits);

        if signals.semantic_debug {
            warnings.push(format!(
                "[SEM] cat={} score={:.2} label={}",
                semantic.category, semantic.score, semantic.label
            ));
        }

        if signals.adversarial {
            label = Label::Sensitive;
            category = ADVERSARIAL_CATEGORY.to_string();

            if semantic.category == ADVERSARIAL_CATEGORY
                && semantic.score >= self.adversarial_block_score
            {
                action = EnforcementAction::Block;
                if hits.is_empty() {
                    warnings.push("Adversarial (heuristic, high confidence)".to_string());
                } else {
                    warnings.push(format!("Adversarial (semantic {:.2})", semantic.score));
                }
            } else {
                action = action.max(EnforcementAction::Warn);
                warnings.push("Adversarial (heuristic)".to_string());
            }
        } else if hits.is_empty() && signals.address_like {
            action = action.max(EnforcementAction::Warn);
            label = Label::Sensitive;
            category = ADDRESS_CATEGORY.to_string();
            warnings.push("Address-like (heuristic)".to_string());
        }

        // Semantic signal only lifts allow to warn
        if action == EnforcementAction::Allow && semantic.is_sensitive() {
            action = EnforcementAction::Warn;
            warnings.push(format!(
                "Semantic risk: {} ({:.2})",
                semantic.category, semantic.score
            ));
            if hits.is_empty() {
                label = semantic.label;
                category = semantic.category.clone();
            }
        }

        if action == EnforcementAction::Warn && warnings.is_empty() {
            warnings.push(LOW_CONFIDENCE_WARNING.to_string());
        }

        Verdict {
            action,
            label,
            category,
            warnings,
        }
    }

    /// Credential override first, then the priority walk, then `other`
    fn label_and_category(&self, hits: &[Hit]) -> (Label, String) {
        if hits.is_empty() {
            return (Label::NonSensitive, GENERAL_CATEGORY.to_string());
        }

        if hits.iter().any(|hit| self.table.is_credential(&hit.hit_type)) {
            return (Label::Sensitive, CREDENTIAL_CATEGORY.to_string());
        }

        let category = self
            .table
            .priority()
            .iter()
            .find(|category| {
                hits.iter()
                    .any(|hit| self.table.category_for(hit.kind()) == Some(category.as_str()))
            })
            .map(String::as_str)
            .unwrap_or(OTHER_CATEGORY);

        (Label::Sensitive, category.to_string())
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(PolicyTable::default())
    }
}
