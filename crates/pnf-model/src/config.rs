//! Filter configuration: whitelists, required fields and validation policy.
//!
//! A [`FilterConfig`] is built once at start-up, either from the built-in
//! tables ([`FilterConfig::default`]) or from a TOML file that overrides some
//! of them, and is then passed by reference to everything that needs it.
//!
//! ```toml
//! policy = "strict"
//!
//! [whitelist]
//! client = ["id", "pregnancies"]
//!
//! [required.salvage]
//! pregnancy = [{ name = "birth", non_empty = true }]
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::{
    BIRTH, CARES_AFTER, CARES_AFTER_PHONE, CHILDREN, DATA_ENCR, EntityKind, ID, PREGNANCIES,
};
use crate::error::{ModelError, Result};
use crate::pattern::DynamicPattern;

/// How validation failures below the client level are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Any invalid pregnancy rejects the whole client.
    #[serde(alias = "strict")]
    StrictWholeClient,
    /// Invalid pregnancies are dropped; the client survives while one remains.
    #[default]
    #[serde(alias = "salvage")]
    SalvagePerPregnancy,
}

impl ValidationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationPolicy::StrictWholeClient => "strict",
            ValidationPolicy::SalvagePerPregnancy => "salvage",
        }
    }

    pub fn is_salvage(self) -> bool {
        matches!(self, ValidationPolicy::SalvagePerPregnancy)
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn keys(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Keys kept on each record type, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Whitelists {
    pub client: Vec<String>,
    pub pregnancy: Vec<String>,
    pub birth: Vec<String>,
    pub child: Vec<String>,
    pub care_after: Vec<String>,
    pub care_after_phone: Vec<String>,
}

impl Default for Whitelists {
    fn default() -> Self {
        Self {
            client: keys(&[ID, "created_at", "updated_at", PREGNANCIES]),
            pregnancy: keys(&[
                ID,
                "id_client",
                "expected_birth_date",
                "created_at",
                "updated_at",
                DATA_ENCR,
                BIRTH,
                CARES_AFTER,
                CARES_AFTER_PHONE,
            ]),
            birth: keys(&[
                ID,
                "id_pregnancy",
                "created_at",
                "updated_at",
                DATA_ENCR,
                CHILDREN,
            ]),
            child: keys(&[ID, "id_birth", "created_at", "updated_at", DATA_ENCR]),
            care_after: keys(&[
                ID,
                "id_pregnancy",
                "date",
                "created_at",
                "updated_at",
                DATA_ENCR,
            ]),
            care_after_phone: keys(&[
                ID,
                "id_pregnancy",
                "date",
                "duration",
                "created_at",
                "updated_at",
            ]),
        }
    }
}

impl Whitelists {
    pub fn for_kind(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Client => &self.client,
            EntityKind::Pregnancy => &self.pregnancy,
            EntityKind::Birth => &self.birth,
            EntityKind::Child => &self.child,
            EntityKind::CareAfter => &self.care_after,
            EntityKind::CareAfterPhone => &self.care_after_phone,
        }
    }
}

/// Keys kept inside `data_encr`, per owning record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptedAllowLists {
    pub pregnancy: Vec<String>,
    pub birth: Vec<String>,
    pub child: Vec<String>,
    pub care_after: Vec<String>,
    /// Per-child keys of care-after visits, e.g. `kind-{id}-nahrung`.
    pub care_after_patterns: Vec<DynamicPattern>,
}

impl Default for EncryptedAllowLists {
    fn default() -> Self {
        Self {
            pregnancy: keys(&[
                "gravida",
                "para",
                "mehrlingsschwangerschaft",
                "risikoschwangerschaft",
                "geburtsplanung",
            ]),
            birth: keys(&[
                "geburtsmodus",
                "geburtsort",
                "geburtsverlauf",
                "dammverletzung",
                "blutverlust",
            ]),
            child: keys(&[
                "geschlecht",
                "gewicht",
                "groesse",
                "kopfumfang",
                "apgar-1",
                "apgar-5",
                "apgar-10",
                "ph-wert",
            ]),
            care_after: keys(&[
                "stillt",
                "rueckbildung",
                "wochenbettverlauf",
                "lochien",
                "fundusstand",
            ]),
            care_after_patterns: default_care_after_patterns(),
        }
    }
}

fn default_care_after_patterns() -> Vec<DynamicPattern> {
    ["kind-{id}-nahrung", "kind-{id}-physiologisches-neugeborenes"]
        .into_iter()
        .filter_map(|pattern| DynamicPattern::new(pattern).ok())
        .collect()
}

impl EncryptedAllowLists {
    /// Fixed keys for `kind`; record types without a payload allow nothing.
    pub fn keys_for(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Pregnancy => &self.pregnancy,
            EntityKind::Birth => &self.birth,
            EntityKind::Child => &self.child,
            EntityKind::CareAfter => &self.care_after,
            EntityKind::Client | EntityKind::CareAfterPhone => &[],
        }
    }

    pub fn patterns_for(&self, kind: EntityKind) -> &[DynamicPattern] {
        match kind {
            EntityKind::CareAfter => &self.care_after_patterns,
            _ => &[],
        }
    }
}

/// One required key and whether an empty list counts as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredField {
    pub name: String,
    #[serde(default)]
    pub non_empty: bool,
}

impl RequiredField {
    pub fn present(name: &str) -> Self {
        Self {
            name: name.to_string(),
            non_empty: false,
        }
    }

    pub fn non_empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            non_empty: true,
        }
    }
}

/// Required fields for the three validated record types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFields {
    pub client: Vec<RequiredField>,
    pub pregnancy: Vec<RequiredField>,
    /// Checked on `pregnancy.birth` whenever the birth is present.
    pub birth: Vec<RequiredField>,
}

impl RequiredFields {
    pub fn strict() -> Self {
        Self {
            client: vec![RequiredField::non_empty(PREGNANCIES)],
            pregnancy: vec![RequiredField::present(BIRTH)],
            birth: vec![RequiredField::non_empty(CHILDREN)],
        }
    }

    pub fn salvage() -> Self {
        Self {
            client: vec![RequiredField::non_empty(PREGNANCIES)],
            pregnancy: vec![
                RequiredField::non_empty(BIRTH),
                RequiredField::non_empty(CARES_AFTER),
                RequiredField::non_empty(CARES_AFTER_PHONE),
            ],
            birth: vec![RequiredField::non_empty(CHILDREN)],
        }
    }
}

/// Required-field tables for each policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementTables {
    pub strict: RequiredFields,
    pub salvage: RequiredFields,
}

impl Default for RequirementTables {
    fn default() -> Self {
        Self {
            strict: RequiredFields::strict(),
            salvage: RequiredFields::salvage(),
        }
    }
}

impl RequirementTables {
    pub fn for_policy(&self, policy: ValidationPolicy) -> &RequiredFields {
        match policy {
            ValidationPolicy::StrictWholeClient => &self.strict,
            ValidationPolicy::SalvagePerPregnancy => &self.salvage,
        }
    }
}

/// Complete, immutable configuration of a filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub policy: ValidationPolicy,
    pub whitelist: Whitelists,
    pub encrypted: EncryptedAllowLists,
    pub required: RequirementTables,
}

impl FilterConfig {
    /// Parse a TOML document; tables it leaves out keep their defaults.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ModelError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Required fields of the active policy.
    pub fn required_fields(&self) -> &RequiredFields {
        self.required.for_policy(self.policy)
    }
}
