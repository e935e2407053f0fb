//! Standard PII redactor implementation

use crate::detector::{CustomPattern, Hit, HitKind};
use crate::redactor::{MaskStyle, PIIRedactor, RedactorConfig};
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// Standard implementation of PII redaction
pub struct StandardRedactor {
    config: RedactorConfig,
    styles: HashMap<HitKind, MaskStyle>,
    custom_placeholders: HashMap<String, String>,
}

impl StandardRedactor {
    /// Create a new standard redactor with the given configuration
    pub fn new(config: RedactorConfig) -> Self {
        Self::with_custom_patterns(config, Vec::new())
    }

    /// Create a new standard redactor with custom pattern configurations
    pub fn with_custom_patterns(config: RedactorConfig, custom_patterns: Vec<CustomPattern>) -> Self {
        let mut styles: HashMap<HitKind, MaskStyle> = HitKind::BUILTIN
            .iter()
            .filter_map(|kind| RedactorConfig::default_style(*kind).map(|style| (*kind, style)))
            .collect();

        for override_item in &config.type_overrides {
            styles.insert(override_item.pii_type, override_item.style.clone());
        }

        let custom_placeholders = custom_patterns
            .into_iter()
            .filter_map(|pattern| pattern.placeholder.map(|placeholder| (pattern.name, placeholder)))
            .collect();

        Self {
            config,
            styles,
            custom_placeholders,
        }
    }

    fn custom_placeholder(&self, hit: &Hit) -> String {
        let name = hit.hit_type.tag.as_deref().unwrap_or("UNKNOWN");
        self.custom_placeholders
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("[CUS:{}]", name))
    }
}

/// Apply a style to a single value
fn apply_style(style: &MaskStyle, value: &str) -> String {
    match style {
        MaskStyle::Remove => String::new(),

        MaskStyle::Placeholder { text } => text.clone(),

        MaskStyle::KeepEnds {
            keep,
            min_len,
            fallback,
        } => {
            let compact: Vec<char> = value.chars().filter(|c| !c.is_whitespace()).collect();
            if compact.len() > *min_len && compact.len() >= keep * 2 {
                let head: String = compact[..*keep].iter().collect();
                let tail: String = compact[compact.len() - keep..].iter().collect();
                format!("{}...{}", head, tail)
            } else {
                fallback.clone()
            }
        }

        MaskStyle::LastDigits {
            prefix,
            keep,
            fallback,
        } => {
            let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
            if *keep > 0 && digits.len() >= *keep {
                let tail: String = digits[digits.len() - keep..].iter().collect();
                format!("{}{}", prefix, tail)
            } else {
                fallback.clone()
            }
        }

        MaskStyle::MaskedSuffix { mask, keep } => {
            let chars: Vec<char> = value.chars().collect();
            // Never echo a value that is no longer than its visible suffix
            if chars.len() <= *keep {
                return mask.clone();
            }
            let tail: String = chars[chars.len() - keep..].iter().collect();
            format!("{}{}", mask, tail)
        }
    }
}

impl PIIRedactor for StandardRedactor {
    fn redact(&self, text: &str, hits: &[Hit]) -> String {
        if hits.is_empty() {
            return text.to_string();
        }

        // Walk from the end; segments are collected back to front
        let mut ordered: Vec<&Hit> = hits.iter().collect();
        ordered.sort_by_key(|hit| Reverse(hit.start()));

        let mut segments: Vec<Cow<'_, str>> = Vec::with_capacity(ordered.len() * 2 + 1);
        let mut limit = text.len();

        for hit in ordered {
            if hit.is_empty() || hit.end() > limit || text.get(hit.start()..hit.end()).is_none() {
                debug!(hit_type = %hit.hit_type, "Skipping empty, overlapping or out-of-range span");
                continue;
            }

            segments.push(Cow::Borrowed(&text[hit.end()..limit]));
            segments.push(Cow::Owned(self.mask_value(hit)));
            limit = hit.start();
        }
        segments.push(Cow::Borrowed(&text[..limit]));

        segments.into_iter().rev().collect()
    }

    fn mask_value(&self, hit: &Hit) -> String {
        if hit.kind() == HitKind::Custom {
            return self.custom_placeholder(hit);
        }

        match self.styles.get(&hit.kind()) {
            Some(style) => apply_style(style, &hit.value),
            None => self.config.default_placeholder.clone(),
        }
    }
}
