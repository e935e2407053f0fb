//! Regex-based PII detector implementation

use crate::detector::patterns::{
    self, JWT_WINDOW, PatternSet, SECRET_WINDOW, digit_count, luhn_valid, touches_at_sign,
    valid_ssn,
};
use crate::detector::{DetectorConfig, DetectorError, Hit, HitKind, HitType, PIIDetector, Scan};
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Regex-based PII detector
///
/// Detectors run most-specific first. The span resolver keeps the earliest
/// candidate when two detectors report the exact same span, so this order
/// decides ties (an 11-digit ID is a `tckn`, not a `phone`).
pub struct RegexPIIDetector {
    config: DetectorConfig,
    patterns: Arc<PatternSet>,
    custom_regexes: Vec<(String, Arc<Regex>)>,
}

impl RegexPIIDetector {
    /// Create a new regex-based PII detector with the given configuration
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        let patterns = Arc::new(PatternSet::compile()?);

        let mut custom_regexes = Vec::new();
        for pattern in &config.custom_patterns {
            let regex = Regex::new(&pattern.pattern)?;
            custom_regexes.push((pattern.name.clone(), Arc::new(regex)));
        }

        Ok(Self {
            config,
            patterns,
            custom_regexes,
        })
    }

    /// Collect candidate hits from already-normalized text
    pub fn detect(&self, text: &str) -> Vec<Hit> {
        let mut hits = Vec::new();
        let p = &self.patterns;

        for (name, regex) in &self.custom_regexes {
            push_all(&mut hits, regex, text, HitType::tagged(HitKind::Custom, name.as_str()));
        }

        if self.config.is_enabled(HitKind::ApiKey) {
            self.detect_secrets(text, &mut hits);
        }

        if self.config.is_enabled(HitKind::Password) {
            for capture in p.password.captures_iter(text) {
                if let Some(value) = capture.get(1) {
                    hits.push(Hit::new(HitKind::Password, value.start(), value.end(), value.as_str()));
                }
            }
        }

        if self.config.is_enabled(HitKind::CreditCard) {
            for m in p.credit_card.find_iter(text) {
                if luhn_valid(m.as_str()) {
                    hits.push(Hit::new(HitKind::CreditCard, m.start(), m.end(), m.as_str()));
                }
            }
        }

        if self.config.is_enabled(HitKind::Ssn) {
            for m in p.ssn.find_iter(text) {
                if valid_ssn(m.as_str()) {
                    hits.push(Hit::new(HitKind::Ssn, m.start(), m.end(), m.as_str()));
                }
            }
        }

        self.push_enabled(&mut hits, HitKind::NationalId, &p.national_id, text);
        self.push_enabled(&mut hits, HitKind::Imei, &p.imei, text);
        self.push_enabled(&mut hits, HitKind::Iban, &p.iban, text);
        self.push_enabled(&mut hits, HitKind::Email, &p.email, text);
        for dob in &p.dob {
            self.push_enabled(&mut hits, HitKind::DateOfBirth, dob, text);
        }
        self.push_enabled(&mut hits, HitKind::Ipv4, &p.ipv4, text);
        self.push_enabled(&mut hits, HitKind::Mac, &p.mac, text);
        self.push_enabled(&mut hits, HitKind::Passport, &p.passport, text);

        // Generic token, only meaningful next to a license keyword
        if self.config.is_enabled(HitKind::DriverLicense) {
            for m in p.driver_license.find_iter(text) {
                if p.license_context(text, m.start(), m.end()) {
                    hits.push(Hit::new(HitKind::DriverLicense, m.start(), m.end(), m.as_str()));
                }
            }
        }

        if self.config.is_enabled(HitKind::Health) {
            for m in p.health.find_iter(text) {
                hits.push(Hit::new(HitKind::Health, m.start(), m.end(), &text[m.start()..m.end()]));
            }
        }

        if self.config.is_enabled(HitKind::Phone) {
            for m in p.phone.find_iter(text) {
                if self.validate_phone(text, m.start(), m.end()) {
                    hits.push(Hit::new(HitKind::Phone, m.start(), m.end(), m.as_str()));
                }
            }
        }

        debug!(candidates = hits.len(), "PII detection pass complete");

        hits
    }

    /// Credential material; everything but AWS access keys needs a nearby keyword
    fn detect_secrets(&self, text: &str, hits: &mut Vec<Hit>) {
        let p = &self.patterns;

        push_all(hits, &p.aws_access_key, text, HitType::tagged(HitKind::ApiKey, "aws_access_key"));

        let gated: [(&Regex, &str, usize); 3] = [
            (&p.secret_40, "potential_secret", SECRET_WINDOW),
            (&p.hex_blob, "hex", SECRET_WINDOW),
            (&p.jwt, "jwt", JWT_WINDOW),
        ];

        for (regex, tag, window) in gated {
            for m in regex.find_iter(text) {
                if p.credential_context(text, m.start(), m.end(), window) {
                    hits.push(Hit::new(
                        HitType::tagged(HitKind::ApiKey, tag),
                        m.start(),
                        m.end(),
                        m.as_str(),
                    ));
                }
            }
        }
    }

    /// Reject phone candidates that are really cards or part of an email
    fn validate_phone(&self, text: &str, start: usize, end: usize) -> bool {
        let candidate = &text[start..end];
        let digits = digit_count(candidate);

        if !(8..=16).contains(&digits) {
            return false;
        }

        if (13..=19).contains(&digits) && luhn_valid(candidate) {
            return false;
        }

        !touches_at_sign(text, start, end)
    }

    fn push_enabled(&self, hits: &mut Vec<Hit>, kind: HitKind, regex: &Regex, text: &str) {
        if self.config.is_enabled(kind) {
            push_all(hits, regex, text, HitType::new(kind));
        }
    }
}

fn push_all(hits: &mut Vec<Hit>, regex: &Regex, text: &str, hit_type: HitType) {
    // Empty matches carry no value to mask
    for m in regex.find_iter(text).filter(|m| !m.is_empty()) {
        hits.push(Hit::new(hit_type.clone(), m.start(), m.end(), m.as_str()));
    }
}

impl PIIDetector for RegexPIIDetector {
    fn scan(&self, text: &str) -> Scan {
        let text = patterns::normalize_whitespace(text);
        let hits = self.detect(&text);
        Scan { text, hits }
    }

    fn supported_types(&self) -> Vec<HitKind> {
        let mut types: Vec<HitKind> = HitKind::BUILTIN
            .iter()
            .copied()
            .filter(|kind| self.config.is_enabled(*kind))
            .collect();

        if !self.custom_regexes.is_empty() {
            types.push(HitKind::Custom);
        }

        types
    }
}
