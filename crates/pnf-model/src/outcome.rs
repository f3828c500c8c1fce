//! Skip records and run statistics.
//!
//! Validation failures are outcomes, not errors: each one is recorded here
//! and surfaced in the processing report.

use std::fmt;

use serde::Serialize;

use crate::entity::EntityKind;
use crate::ids::RecordId;

/// A field on a record type, rendered as `pregnancy.birth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPath {
    pub entity: EntityKind,
    pub field: String,
}

impl FieldPath {
    pub fn new(entity: EntityKind, field: impl Into<String>) -> Self {
        Self {
            entity,
            field: field.into(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

/// Why a client or pregnancy was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// A required field was absent, null or an empty list.
    MissingField { path: FieldPath },
    /// Strict policy: a pregnancy of the client failed validation.
    InvalidPregnancy {
        pregnancy_id: RecordId,
        path: FieldPath,
    },
    /// Salvage policy: every pregnancy of the client was dropped.
    NoValidPregnancies,
}

impl SkipReason {
    pub fn missing(entity: EntityKind, field: impl Into<String>) -> Self {
        Self::MissingField {
            path: FieldPath::new(entity, field),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField { path } => write!(f, "missing or empty field `{path}`"),
            SkipReason::InvalidPregnancy { pregnancy_id, path } => {
                write!(f, "pregnancy {pregnancy_id}: missing or empty field `{path}`")
            }
            SkipReason::NoValidPregnancies => f.write_str("no valid pregnancies remaining"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedClient {
    pub client_id: RecordId,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPregnancy {
    pub client_id: RecordId,
    pub pregnancy_id: RecordId,
    pub reason: SkipReason,
}

/// Counters and skip lists accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub total_clients: usize,
    pub successful_clients: usize,
    /// Pregnancies written to the output.
    pub retained_pregnancies: usize,
    pub skipped_clients: Vec<SkippedClient>,
    pub skipped_pregnancies: Vec<SkippedPregnancy>,
}

impl ProcessingStats {
    pub fn skipped_client_count(&self) -> usize {
        self.skipped_clients.len()
    }

    pub fn skipped_pregnancy_count(&self) -> usize {
        self.skipped_pregnancies.len()
    }

    pub fn has_skips(&self) -> bool {
        !self.skipped_clients.is_empty() || !self.skipped_pregnancies.is_empty()
    }
}
