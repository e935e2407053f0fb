//! TextShield Semantic Classifier
//!
//! Embedding-similarity scoring against curated per-category exemplar banks.
//! The decision engine only sees the [`SemanticClassifier`] trait; when no
//! embedding provider is available the [`NullClassifier`] stands in and every
//! text scores as `non_sensitive/general`.

pub mod classification;
pub mod classifier;
pub mod config;
pub mod embedder;
pub mod error;
pub mod exemplars;
mod loader;

pub use classification::{Classification, Evidence, GENERAL_CATEGORY, Label};
pub use classifier::{EmbeddingClassifier, NullClassifier, SemanticClassifier};
pub use config::{ClassifierConfig, EmbedderConfig, SemanticConfig};
pub use embedder::{Embedder, HttpEmbedder};
pub use error::{Result, SemanticError};
pub use exemplars::{CategoryExemplars, ExemplarBanks};
pub use loader::load_classifier;
