//! Enforcement actions and the fixed policy tables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use textshield_pii::{HitKind, HitType};

pub const GENERAL_CATEGORY: &str = textshield_semantic::GENERAL_CATEGORY;
pub const CREDENTIAL_CATEGORY: &str = "api_key";
pub const ADVERSARIAL_CATEGORY: &str = "adversarial";
pub const ADDRESS_CATEGORY: &str = "address";
pub const OTHER_CATEGORY: &str = "other";

/// What to do with the text, ordered by strictness
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementAction {
    Allow,
    Warn,
    Mask,
    Block,
}

impl EnforcementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnforcementAction::Allow => "allow",
            EnforcementAction::Warn => "warn",
            EnforcementAction::Mask => "mask",
            EnforcementAction::Block => "block",
        }
    }

    /// Mask and block both return a redacted text
    pub fn requires_redaction(&self) -> bool {
        *self >= EnforcementAction::Mask
    }
}

impl fmt::Display for EnforcementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const BLOCK_KINDS: &[HitKind] = &[
    HitKind::ApiKey,
    HitKind::CreditCard,
    HitKind::NationalId,
    HitKind::Iban,
    HitKind::Password,
    HitKind::Ssn,
];

const MASK_KINDS: &[HitKind] = &[
    HitKind::Email,
    HitKind::Phone,
    HitKind::DateOfBirth,
    HitKind::Health,
    HitKind::Ipv4,
    HitKind::Mac,
    HitKind::Imei,
    HitKind::Passport,
    HitKind::DriverLicense,
    HitKind::Custom,
];

const CATEGORY_PRIORITY: &[&str] = &[
    "api_key",
    "ssn",
    "credit_card",
    "bank_account",
    "tckn",
    "passport",
    "driver_license",
    "medical_record_number",
    "cryptocurrency_wallet",
    "2fa_link",
    "password",
    "pin",
    "vehicle_registration",
    "employment_id",
    "serial_number",
    "email",
    "phone",
    "address",
    "health",
    "other",
];

const SECRET_VENDOR_MARKERS: &[&str] = &["stripe"];

/// Type → action, type → category, category priority and vendor markers
///
/// Built once and handed to the decision engine; lookups key off the coarse
/// [`HitKind`].
#[derive(Debug, Clone)]
pub struct PolicyTable {
    actions: HashMap<HitKind, EnforcementAction>,
    categories: HashMap<HitKind, String>,
    priority: Vec<String>,
    secret_markers: Vec<String>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        let actions = BLOCK_KINDS
            .iter()
            .map(|kind| (*kind, EnforcementAction::Block))
            .chain(MASK_KINDS.iter().map(|kind| (*kind, EnforcementAction::Mask)))
            .collect();

        let categories = HitKind::BUILTIN
            .iter()
            .map(|kind| {
                let category = match kind {
                    HitKind::Iban => "bank_account",
                    HitKind::Ipv4 => "ip",
                    other => other.as_str(),
                };
                (*kind, category.to_string())
            })
            .collect();

        Self {
            actions,
            categories,
            priority: CATEGORY_PRIORITY.iter().map(|c| c.to_string()).collect(),
            secret_markers: SECRET_VENDOR_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl PolicyTable {
    /// Replace the action for one kind
    pub fn with_action(mut self, kind: HitKind, action: EnforcementAction) -> Self {
        self.actions.insert(kind, action);
        self
    }

    /// Unmapped kinds are allowed
    pub fn action_for(&self, kind: HitKind) -> EnforcementAction {
        self.actions
            .get(&kind)
            .copied()
            .unwrap_or(EnforcementAction::Allow)
    }

    pub fn category_for(&self, kind: HitKind) -> Option<&str> {
        self.categories.get(&kind).map(String::as_str)
    }

    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    /// Credential kinds and any type naming a known secret vendor
    pub fn is_credential(&self, hit_type: &HitType) -> bool {
        if hit_type.kind == HitKind::ApiKey {
            return true;
        }
        let dotted = hit_type.to_string().to_ascii_lowercase();
        self.secret_markers.iter().any(|marker| dotted.contains(marker.as_str()))
    }
}
