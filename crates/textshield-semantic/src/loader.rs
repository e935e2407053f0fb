use crate::Result;
use crate::classifier::{EmbeddingClassifier, NullClassifier, SemanticClassifier};
use crate::config::{EmbedderConfig, SemanticConfig};
use crate::embedder::HttpEmbedder;
use crate::exemplars::ExemplarBanks;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the process-wide classifier
///
/// Never fails: a disabled layer, a missing provider or any construction
/// error yields [`NullClassifier`].
pub async fn load_classifier(config: &SemanticConfig) -> Arc<dyn SemanticClassifier> {
    if !config.enabled {
        info!("Semantic layer disabled");
        return Arc::new(NullClassifier);
    }

    let Some(embeddings) = &config.embeddings else {
        info!("No embedding provider configured, semantic layer inactive");
        return Arc::new(NullClassifier);
    };

    match build(config, embeddings).await {
        Ok(classifier) => {
            info!(
                model = %embeddings.model,
                categories = classifier.categories().count(),
                "Semantic classifier ready"
            );
            Arc::new(classifier)
        }
        Err(e) => {
            warn!(error = %e, "Semantic classifier unavailable, continuing without it");
            Arc::new(NullClassifier)
        }
    }
}

async fn build(
    config: &SemanticConfig,
    embeddings: &EmbedderConfig,
) -> Result<EmbeddingClassifier<HttpEmbedder>> {
    let banks = match &config.exemplars_path {
        Some(path) => ExemplarBanks::from_file(path)?,
        None => ExemplarBanks::builtin()?,
    };
    let embedder = HttpEmbedder::new(embeddings.clone())?;
    EmbeddingClassifier::new(embedder, banks, config.classifier_config()).await
}
