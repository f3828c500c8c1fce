//! Filtering core: projection, encrypted-field filtering, validation and the
//! dataset pipeline.

pub mod encrypted;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod projector;
pub mod validate;

pub use encrypted::{filter_blob, filter_encrypted};
pub use error::{PipelineError, Result};
pub use filter::EntityFilter;
pub use pipeline::{Pipeline, PipelineOutput, REDACTED_VALUE};
pub use projector::{project, project_with};
pub use validate::{ClientOutcome, ClientValidation, Validator, first_missing};
