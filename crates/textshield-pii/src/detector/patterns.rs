//! Pattern library: compiled matchers and the validators that gate them
//!
//! Everything here is pure. The detector owns one compiled [`PatternSet`]
//! and shares it read-only across calls.

use crate::detector::DetectorError;
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;

/// Keyword window (characters) for 40-char secrets and hex blobs
pub const SECRET_WINDOW: usize = 60;

/// Keyword window (characters) for JWT-shaped triples
pub const JWT_WINDOW: usize = 80;

/// Keyword window (characters) for driver license tokens
pub const LICENSE_WINDOW: usize = 30;

pub const LICENSE_KEYWORDS: &[&str] = &["ehliyet", "license", "dl#"];

pub const HEALTH_KEYWORDS: &[&str] = &[
    "blood type",
    "allergy",
    "allergic",
    "diabetic",
    "diabetes",
    "cholesterol",
    "medical record",
    "diagnosis",
    "prescription",
];

/// Collapse runs of spaces and tabs into a single space
///
/// Line breaks and case are left alone.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

/// Count ASCII digits in a candidate
pub fn digit_count(candidate: &str) -> usize {
    candidate.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Luhn checksum over the digits of `number`; requires 13-19 digits
pub fn luhn_valid(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    checksum.is_multiple_of(10)
}

/// Validate a dashed US SSN candidate
pub fn valid_ssn(ssn: &str) -> bool {
    let digits: String = ssn.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 9 {
        return false;
    }

    // All zeros in any group
    if digits.starts_with("000") || digits[3..5] == *"00" || digits[5..9] == *"0000" {
        return false;
    }

    // 666 and the 9xx ITIN range are never issued
    !(digits.starts_with("666") || digits.starts_with('9'))
}

/// Slice of `text` reaching `chars` characters before `start` and after `end`
///
/// Offsets are byte offsets on char boundaries; the window is clamped to the text.
pub fn context_window(text: &str, start: usize, end: usize, chars: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);

    let to = text[end..]
        .char_indices()
        .nth(chars)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    &text[from..to]
}

/// True when an `@` sits directly before `start` or directly at `end`
pub fn touches_at_sign(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back() == Some('@');
    let after = text[end..].chars().next() == Some('@');
    before || after
}

/// All compiled matchers used by the detection engine
pub(crate) struct PatternSet {
    pub email: Regex,
    pub phone: Regex,
    pub iban: Regex,
    pub national_id: Regex,
    pub ssn: Regex,
    pub credit_card: Regex,
    pub dob: [Regex; 2],
    pub ipv4: Regex,
    pub mac: Regex,
    pub imei: Regex,
    pub passport: Regex,
    pub driver_license: Regex,
    pub license_keywords: AhoCorasick,
    pub password: Regex,
    pub health: AhoCorasick,
    pub aws_access_key: Regex,
    pub secret_40: Regex,
    pub hex_blob: Regex,
    pub jwt: Regex,
    pub credential_keywords: Regex,
}

impl PatternSet {
    pub fn compile() -> Result<Self, DetectorError> {
        Ok(Self {
            email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,

            // E.164-ish: optional plus, no leading zero, 8-15 digits
            phone: Regex::new(r"\+?[1-9]\d{7,14}")?,

            iban: Regex::new(r"(?i)\b[A-Z]{2}[0-9]{2}[A-Z0-9]{10,30}\b")?,
            national_id: Regex::new(r"\b\d{11}\b")?,
            ssn: Regex::new(r"\b\d{3}-\d{2}-\d{4}\b")?,

            // 13-19 digits with optional space/dash grouping
            credit_card: Regex::new(r"\b(?:\d[ \-]*?){13,19}\b")?,

            dob: [
                Regex::new(r"\b(?:19|20)\d{2}[-/.](?:0[1-9]|1[0-2])[-/.](?:0[1-9]|[12]\d|3[01])\b")?,
                Regex::new(r"\b(?:0[1-9]|[12]\d|3[01])[-/.](?:0[1-9]|1[0-2])[-/.](?:19|20)\d{2}\b")?,
            ],

            ipv4: Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b")?,
            mac: Regex::new(r"\b(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}\b")?,
            imei: Regex::new(r"\b\d{15}\b")?,
            passport: Regex::new(r"\b[A-PR-WY][0-9][0-9A-Z][0-9A-Z]{5,7}\b")?,
            driver_license: Regex::new(r"\b[A-Z0-9]{5,15}\b")?,
            license_keywords: keyword_matcher(LICENSE_KEYWORDS)?,
            password: Regex::new(r"(?i)\b(?:password|passwd|pwd|şifre|parola)\s*[:=]\s*(\S+)")?,
            health: keyword_matcher(HEALTH_KEYWORDS)?,

            aws_access_key: Regex::new(r"\b(?:AKIA|ASIA)[0-9A-Z]{16}\b")?,
            secret_40: Regex::new(r"\b[0-9a-zA-Z/+]{40}\b")?,
            hex_blob: Regex::new(r"\b[0-9a-fA-F]{32,64}\b")?,
            jwt: Regex::new(r"\b[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\b")?,
            credential_keywords: Regex::new(
                r"(?i)\b(?:api[_\- ]?key|secret|token|access[_\- ]?key|private[_\- ]?key|secret[_\- ]?key|bearer|authorization)\b",
            )?,
        })
    }

    /// Credential keyword within `chars` characters of the span
    pub fn credential_context(&self, text: &str, start: usize, end: usize, chars: usize) -> bool {
        self.credential_keywords
            .is_match(context_window(text, start, end, chars))
    }

    /// License keyword within the license window of the span
    pub fn license_context(&self, text: &str, start: usize, end: usize) -> bool {
        self.license_keywords
            .is_match(context_window(text, start, end, LICENSE_WINDOW))
    }
}

fn keyword_matcher(keywords: &[&str]) -> Result<AhoCorasick, DetectorError> {
    Ok(AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(keywords)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a  \t b"), "a b");
        assert_eq!(normalize_whitespace("line1  \n\n  line2"), "line1 \n\n line2");
        assert_eq!(normalize_whitespace("Keep CASE"), "Keep CASE");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_luhn() {
        assert!(luhn_valid("4111 1111 1111 1111"));
        assert!(luhn_valid("4532-0151-1283-0366"));
        assert!(!luhn_valid("4532-0151-1283-0367"));
        assert!(!luhn_valid("1234567812345678"));
        // Too short even though the checksum works
        assert!(!luhn_valid("18"));
    }

    #[test]
    fn test_valid_ssn() {
        assert!(valid_ssn("123-45-6789"));
        assert!(!valid_ssn("000-12-3456"));
        assert!(!valid_ssn("666-12-3456"));
        assert!(!valid_ssn("912-12-3456"));
        assert!(!valid_ssn("123-00-6789"));
    }

    #[test]
    fn test_context_window_clamps() {
        let text = "key: abc tail";
        assert_eq!(context_window(text, 5, 8, 60), text);
        assert_eq!(context_window(text, 5, 8, 2), ": abc t");
        assert_eq!(context_window(text, 5, 8, 0), "abc");
    }

    #[test]
    fn test_context_window_counts_chars_not_bytes() {
        let text = "şş abc";
        let start = text.find("abc").unwrap();
        assert_eq!(context_window(text, start, start + 3, 2), "ş abc");
    }

    #[test]
    fn test_touches_at_sign() {
        let text = "x@12345678 y";
        assert!(touches_at_sign(text, 2, 10));
        assert!(!touches_at_sign(text, 3, 10));
        assert!(touches_at_sign("12345678@x", 0, 8));
    }

    #[test]
    fn test_compile() {
        let set = PatternSet::compile().unwrap();
        assert!(set.credential_keywords.is_match("my API_KEY is"));
        assert!(set.credential_keywords.is_match("Authorization: Bearer"));
        assert!(!set.credential_keywords.is_match("tokens of appreciation"));
        assert!(set.health.is_match("Blood Type is A+"));
    }
}
