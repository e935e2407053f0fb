//! Pipeline entry point
//!
//! `evaluate` runs: trim → normalize + detect → resolve → heuristics →
//! semantic classification → decision → redaction (mask/block only).

use std::sync::Arc;
use std::time::Duration;
use textshield_pii::{
    DetectorConfig, PIIDetector, PIIRedactor, RedactorConfig, RegexPIIDetector, Scan,
    StandardRedactor, resolve,
};
use textshield_semantic::{Classification, NullClassifier, SemanticClassifier};
use tracing::{info, warn};

use crate::Result;
use crate::decision::{DEFAULT_ADVERSARIAL_BLOCK_SCORE, Decision, DecisionEngine, Signals};
use crate::heuristics::Heuristics;
use crate::policy::PolicyTable;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub detector: DetectorConfig,
    pub redactor: RedactorConfig,

    /// Emit the `[SEM] ...` warning when a classifier is active
    pub semantic_debug: bool,

    /// Upper bound for one classification; elapsed → neutral signal
    pub semantic_timeout: Option<Duration>,

    pub adversarial_block_score: f32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            redactor: RedactorConfig::default(),
            semantic_debug: false,
            semantic_timeout: None,
            adversarial_block_score: DEFAULT_ADVERSARIAL_BLOCK_SCORE,
        }
    }
}

/// Detection, policy and redaction behind one `evaluate` call
///
/// Immutable after construction; share it through an `Arc`.
pub struct Guard {
    detector: RegexPIIDetector,
    redactor: StandardRedactor,
    heuristics: Heuristics,
    engine: DecisionEngine,
    classifier: Arc<dyn SemanticClassifier>,
    semantic_debug: bool,
    semantic_timeout: Option<Duration>,
}

impl Guard {
    pub fn new(config: GuardConfig, classifier: Arc<dyn SemanticClassifier>) -> Result<Self> {
        let redactor = StandardRedactor::with_custom_patterns(
            config.redactor,
            config.detector.custom_patterns.clone(),
        );
        let detector = RegexPIIDetector::new(config.detector)?;
        let engine = DecisionEngine::new(PolicyTable::default())
            .with_adversarial_block_score(config.adversarial_block_score);

        Ok(Self {
            detector,
            redactor,
            heuristics: Heuristics::new()?,
            engine,
            semantic_debug: config.semantic_debug && classifier.is_active(),
            semantic_timeout: config.semantic_timeout,
            classifier,
        })
    }

    /// Structural pipeline only
    pub fn without_semantic(config: GuardConfig) -> Result<Self> {
        Self::new(config, Arc::new(NullClassifier))
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    pub fn semantic_active(&self) -> bool {
        self.classifier.is_active()
    }

    /// Normalized text and its resolved hits
    pub fn detect(&self, text: &str) -> Scan {
        let scan = self.detector.scan(text.trim());
        let hits = resolve(&scan.hits);
        Scan {
            text: scan.text,
            hits,
        }
    }

    /// Normalized text with every resolved hit masked, whatever the policy says
    pub fn redact(&self, text: &str) -> String {
        let scan = self.detect(text);
        self.redactor.redact(&scan.text, &scan.hits)
    }

    pub async fn evaluate(&self, text: &str) -> Decision {
        let Scan { text, hits } = self.detect(text);

        let adversarial = self.heuristics.is_adversarial(&text);
        let address_like = self.heuristics.is_address_like(&text);
        let semantic = self.classify(&text).await;

        let verdict = self.engine.decide(
            &hits,
            &Signals {
                adversarial,
                address_like,
                semantic: &semantic,
                semantic_debug: self.semantic_debug,
            },
        );

        let text = if verdict.action.requires_redaction() {
            self.redactor.redact(&text, &hits)
        } else {
            text
        };

        info!(
            action = %verdict.action,
            label = %verdict.label,
            category = %verdict.category,
            hits = hits.len(),
            adversarial,
            address_like,
            semantic_category = %semantic.category,
            "Text evaluated"
        );

        Decision {
            action: verdict.action,
            label: verdict.label,
            category: verdict.category,
            text,
            hits,
            warnings: verdict.warnings,
        }
    }

    async fn classify(&self, text: &str) -> Classification {
        let Some(limit) = self.semantic_timeout else {
            return self.classifier.classify(text).await;
        };

        match tokio::time::timeout(limit, self.classifier.classify(text)).await {
            Ok(classification) => classification,
            Err(_) => {
                warn!(
                    timeout_ms = limit.as_millis() as u64,
                    "Semantic classification timed out, using neutral result"
                );
                Classification::neutral()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::EnforcementAction;
    use async_trait::async_trait;
    use mockall::mock;
    use textshield_pii::{CustomPattern, HitKind};
    use textshield_semantic::Label;

    mock! {
        pub TestClassifier {}

        #[async_trait]
        impl SemanticClassifier for TestClassifier {
            async fn classify(&self, text: &str) -> Classification;
            fn is_active(&self) -> bool;
        }
    }

    struct SlowClassifier;

    #[async_trait]
    impl SemanticClassifier for SlowClassifier {
        async fn classify(&self, _text: &str) -> Classification {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Classification {
                label: Label::Sensitive,
                category: "health".to_string(),
                score: 0.9,
                ..Classification::neutral()
            }
        }
    }

    fn guard() -> Guard {
        Guard::without_semantic(GuardConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_text() {
        let decision = guard().evaluate("   ").await;
        assert_eq!(decision.action, EnforcementAction::Allow);
        assert_eq!(decision.label, Label::NonSensitive);
        assert_eq!(decision.category, "general");
        assert_eq!(decision.text, "");
        assert!(decision.hits.is_empty());
        assert!(decision.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_allow_returns_normalized_text() {
        let decision = guard().evaluate("  hello \t  world  ").await;
        assert_eq!(decision.action, EnforcementAction::Allow);
        assert_eq!(decision.text, "hello world");
    }

    #[tokio::test]
    async fn test_mask_redacts_text() {
        let decision = guard().evaluate("reach me at jane.doe@example.com").await;
        assert_eq!(decision.action, EnforcementAction::Mask);
        assert_eq!(decision.category, "email");
        assert_eq!(decision.text, "reach me at [email masked]");
        assert_eq!(decision.hits.len(), 1);
        assert_eq!(decision.hits[0].value, "jane.doe@example.com");
    }

    #[tokio::test]
    async fn test_spans_refer_to_normalized_text() {
        let decision = guard().evaluate("mail:    a@b.com").await;
        let hit = &decision.hits[0];
        assert_eq!(hit.span, (6, 13));
        assert_eq!(hit.value, "a@b.com");
    }

    #[tokio::test]
    async fn test_classifier_sees_normalized_text() {
        let mut classifier = MockTestClassifier::new();
        classifier
            .expect_classify()
            .withf(|text: &str| text == "hello world")
            .times(1)
            .returning(|_| Classification::neutral());

        let guard = Guard::new(GuardConfig::default(), Arc::new(classifier)).unwrap();
        let decision = guard.evaluate(" hello   world ").await;
        assert_eq!(decision.action, EnforcementAction::Allow);
    }

    #[tokio::test]
    async fn test_semantic_debug_line() {
        let mut classifier = MockTestClassifier::new();
        classifier.expect_is_active().return_const(true);
        classifier.expect_classify().returning(|_| Classification::neutral());

        let config = GuardConfig {
            semantic_debug: true,
            ..GuardConfig::default()
        };
        let guard = Guard::new(config, Arc::new(classifier)).unwrap();
        let decision = guard.evaluate("hello").await;

        assert_eq!(
            decision.warnings,
            vec!["[SEM] cat=general score=0.00 label=non_sensitive"]
        );
    }

    #[tokio::test]
    async fn test_semantic_debug_needs_active_classifier() {
        let config = GuardConfig {
            semantic_debug: true,
            ..GuardConfig::default()
        };
        let guard = Guard::without_semantic(config).unwrap();
        assert!(!guard.semantic_active());
        assert!(guard.evaluate("hello").await.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_semantic_timeout_is_neutral() {
        let config = GuardConfig {
            semantic_timeout: Some(Duration::from_millis(20)),
            ..GuardConfig::default()
        };
        let guard = Guard::new(config, Arc::new(SlowClassifier)).unwrap();

        let decision = guard.evaluate("I feel unwell today").await;
        assert_eq!(decision.action, EnforcementAction::Allow);
        assert_eq!(decision.category, "general");
    }

    #[tokio::test]
    async fn test_custom_pattern_placeholder() {
        let config = GuardConfig {
            detector: DetectorConfig {
                custom_patterns: vec![CustomPattern {
                    name: "employee_id".to_string(),
                    pattern: r"EMP-\d{6}".to_string(),
                    placeholder: Some("[EMPLOYEE]".to_string()),
                }],
                ..DetectorConfig::default()
            },
            ..GuardConfig::default()
        };
        let guard = Guard::without_semantic(config).unwrap();

        let decision = guard.evaluate("badge EMP-123456 issued").await;
        assert_eq!(decision.action, EnforcementAction::Mask);
        assert_eq!(decision.category, "other");
        assert_eq!(decision.text, "badge [EMPLOYEE] issued");
    }

    #[tokio::test]
    async fn test_custom_pattern_matching_empty_leaves_text_alone() {
        let config = GuardConfig {
            detector: DetectorConfig {
                custom_patterns: vec![CustomPattern {
                    name: "order".to_string(),
                    pattern: r"ORD-\d*|x?".to_string(),
                    placeholder: None,
                }],
                ..DetectorConfig::default()
            },
            ..GuardConfig::default()
        };
        let guard = Guard::without_semantic(config).unwrap();

        let decision = guard.evaluate("hello there").await;
        assert_eq!(decision.action, EnforcementAction::Allow);
        assert!(decision.hits.is_empty());
        assert_eq!(decision.text, "hello there");
    }

    #[tokio::test]
    async fn test_invalid_custom_pattern() {
        let config = GuardConfig {
            detector: DetectorConfig {
                custom_patterns: vec![CustomPattern {
                    name: "broken".to_string(),
                    pattern: "(unclosed".to_string(),
                    placeholder: None,
                }],
                ..DetectorConfig::default()
            },
            ..GuardConfig::default()
        };
        assert!(Guard::without_semantic(config).is_err());
    }

    #[test]
    fn test_detect_and_redact_ignore_policy() {
        let guard = guard();
        let scan = guard.detect("ip 10.0.0.1 mac 00:1A:2B:3C:4D:5E");
        let kinds: Vec<HitKind> = scan.hits.iter().map(|h| h.kind()).collect();
        assert_eq!(kinds, vec![HitKind::Ipv4, HitKind::Mac]);

        assert_eq!(
            guard.redact("ip 10.0.0.1 mac 00:1A:2B:3C:4D:5E"),
            "ip [ip masked] mac [mac masked]"
        );
    }
}
