//! Semantic classifiers
//!
//! The decision engine only talks to [`SemanticClassifier`]. Both
//! implementations are infallible per call: provider failures are logged and
//! turned into [`Classification::neutral`].

use crate::classification::{Classification, Evidence, GENERAL_CATEGORY, Label};
use crate::config::ClassifierConfig;
use crate::embedder::{Embedder, dot};
use crate::exemplars::ExemplarBanks;
use crate::{Result, SemanticError};
use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
pub trait SemanticClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Classification;

    /// False for the no-op classifier
    fn is_active(&self) -> bool {
        true
    }
}

/// Stand-in used when the semantic layer is disabled or unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClassifier;

#[async_trait]
impl SemanticClassifier for NullClassifier {
    async fn classify(&self, _text: &str) -> Classification {
        Classification::neutral()
    }

    fn is_active(&self) -> bool {
        false
    }
}

struct CategoryBank {
    name: String,
    positives: Vec<String>,
    negatives: Vec<String>,
    positive_vectors: Vec<Vec<f32>>,
    negative_vectors: Vec<Vec<f32>>,
}

/// Scores text against precomputed exemplar embeddings
pub struct EmbeddingClassifier<E> {
    embedder: E,
    banks: Vec<CategoryBank>,
    config: ClassifierConfig,
}

impl<E: Embedder> EmbeddingClassifier<E> {
    /// Encode every exemplar once; the vectors are read-only afterwards
    pub async fn new(embedder: E, banks: ExemplarBanks, config: ClassifierConfig) -> Result<Self> {
        let mut encoded = Vec::with_capacity(banks.categories.len());

        for (name, bank) in banks.categories {
            let positive_vectors = encode_all(&embedder, &bank.positives).await?;
            let negative_vectors = encode_all(&embedder, &bank.negatives).await?;
            debug!(
                category = %name,
                positives = positive_vectors.len(),
                negatives = negative_vectors.len(),
                "Encoded exemplar bank"
            );

            encoded.push(CategoryBank {
                name,
                positives: bank.positives,
                negatives: bank.negatives,
                positive_vectors,
                negative_vectors,
            });
        }

        Ok(Self {
            embedder,
            banks: encoded,
            config,
        })
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.banks.iter().map(|bank| bank.name.as_str())
    }

    fn score(&self, query: &[f32]) -> Classification {
        let mut best_category: &str = GENERAL_CATEGORY;
        let mut best_score = 0.0f32;
        let mut best_positive = Vec::new();
        let mut best_negative = Vec::new();

        for bank in &self.banks {
            let (positive, positive_max) =
                top_k(query, &bank.positive_vectors, &bank.positives, self.config.top_k);
            let (negative, negative_max) =
                top_k(query, &bank.negative_vectors, &bank.negatives, self.config.top_k);

            let score = positive_max - self.config.alpha * negative_max;
            if score > best_score {
                best_category = &bank.name;
                best_score = score;
                best_positive = positive;
                best_negative = negative;
            }
        }

        let sensitive = best_category != GENERAL_CATEGORY && best_score >= self.config.threshold;
        Classification {
            label: if sensitive {
                Label::Sensitive
            } else {
                Label::NonSensitive
            },
            category: if sensitive {
                best_category.to_string()
            } else {
                GENERAL_CATEGORY.to_string()
            },
            score: best_score,
            evidence: best_positive,
            negative_evidence: best_negative,
        }
    }
}

#[async_trait]
impl<E: Embedder> SemanticClassifier for EmbeddingClassifier<E> {
    async fn classify(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            return Classification::neutral();
        }

        let query = match self.embedder.encode(&[text.to_string()]).await {
            Ok(mut vectors) if vectors.len() == 1 => vectors.swap_remove(0),
            Ok(vectors) => {
                warn!(count = vectors.len(), "Embedder returned unexpected vector count");
                return Classification::neutral();
            }
            Err(e) => {
                warn!(error = %e, "Semantic classification failed, using neutral result");
                return Classification::neutral();
            }
        };

        let classification = self.score(&query);
        debug!(
            category = %classification.category,
            score = classification.score,
            label = ?classification.label,
            "Semantic classification"
        );
        classification
    }
}

async fn encode_all<E: Embedder>(embedder: &E, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let vectors = embedder.encode(texts).await?;
    if vectors.len() != texts.len() {
        return Err(SemanticError::InvalidResponse(format!(
            "expected {} exemplar embeddings, got {}",
            texts.len(),
            vectors.len()
        )));
    }
    Ok(vectors)
}

/// Closest `k` exemplars and the maximum similarity (0.0 for an empty bank)
fn top_k(query: &[f32], vectors: &[Vec<f32>], texts: &[String], k: usize) -> (Vec<Evidence>, f32) {
    if vectors.is_empty() {
        return (Vec::new(), 0.0);
    }

    let mut scored: Vec<(usize, f32)> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| (i, dot(query, v)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let max = scored[0].1;
    let evidence = scored
        .into_iter()
        .take(k)
        .map(|(i, similarity)| Evidence {
            exemplar: texts[i].clone(),
            similarity,
        })
        .collect();
    (evidence, max)
}
