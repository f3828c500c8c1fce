//! Record model and filter configuration for perinatal care datasets.

pub mod config;
pub mod entity;
pub mod error;
pub mod ids;
pub mod node;
pub mod outcome;
pub mod pattern;

pub use config::{
    EncryptedAllowLists, FilterConfig, RequiredField, RequiredFields, RequirementTables,
    ValidationPolicy, Whitelists,
};
pub use entity::{
    Birth, CareAfter, CareAfterPhone, Child, Client, EncryptedBlob, Entity, EntityKind,
    EntityList, Pregnancy,
};
pub use error::{ModelError, Result};
pub use ids::RecordId;
pub use node::{Node, Probe, Shape};
pub use outcome::{FieldPath, ProcessingStats, SkipReason, SkippedClient, SkippedPregnancy};
pub use pattern::DynamicPattern;
