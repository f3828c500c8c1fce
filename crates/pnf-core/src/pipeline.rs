//! Whole-dataset filter run.
//!
//! The pipeline walks the clients once, in input order. Each client is
//! validated under the configured policy; survivors are filtered and appended
//! to the output, rejections are recorded in [`ProcessingStats`].

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, info_span};

use pnf_model::{Client, Entity, FilterConfig, Node, ProcessingStats, RecordId, SkippedClient};

use crate::error::{PipelineError, Result};
use crate::filter::EntityFilter;
use crate::validate::{ClientOutcome, Validator};

/// Placeholder logged instead of record ids unless id logging is enabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Filtered clients and the statistics of the run that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub records: Vec<Value>,
    pub stats: ProcessingStats,
}

#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'c> {
    validator: Validator<'c>,
    filter: EntityFilter<'c>,
    log_ids: bool,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c FilterConfig) -> Self {
        Self {
            validator: Validator::new(config),
            filter: EntityFilter::new(config),
            log_ids: false,
        }
    }

    /// Include record ids in debug logs (they are redacted by default).
    #[must_use]
    pub fn with_id_logging(mut self, enable: bool) -> Self {
        self.log_ids = enable;
        self
    }

    /// Run over a parsed input document, which must be a JSON array.
    pub fn run(&self, input: Value) -> Result<PipelineOutput> {
        let Value::Array(items) = input else {
            return Err(PipelineError::RootNotArray {
                found: json_type(&input),
            });
        };
        let clients: Vec<Node<Client>> = items.into_iter().map(Client::from_value).collect();
        Ok(self.run_clients(&clients))
    }

    pub fn run_clients(&self, clients: &[Node<Client>]) -> PipelineOutput {
        let policy = self.validator.policy();
        let span = info_span!("run", policy = %policy, client_count = clients.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut output = PipelineOutput::default();
        for node in clients {
            output.stats.total_clients += 1;
            let validation = self.validator.validate_client(node);

            for skipped in &validation.skipped_pregnancies {
                debug!(
                    client_id = %self.loggable(&skipped.client_id),
                    pregnancy_id = %self.loggable(&skipped.pregnancy_id),
                    reason = %skipped.reason,
                    "pregnancy skipped"
                );
            }
            output
                .stats
                .skipped_pregnancies
                .extend(validation.skipped_pregnancies);

            match validation.outcome {
                ClientOutcome::Keep {
                    client,
                    pregnancies,
                } => {
                    output.stats.successful_clients += 1;
                    output.stats.retained_pregnancies += pregnancies.len();
                    output
                        .records
                        .push(self.filter.filter_retained(client, &pregnancies));
                }
                ClientOutcome::Skip(reason) => {
                    debug!(
                        client_id = %self.loggable(&validation.client_id),
                        reason = %reason,
                        "client skipped"
                    );
                    output.stats.skipped_clients.push(SkippedClient {
                        client_id: validation.client_id,
                        reason,
                    });
                }
            }
        }

        info!(
            total = output.stats.total_clients,
            successful = output.stats.successful_clients,
            skipped_clients = output.stats.skipped_client_count(),
            skipped_pregnancies = output.stats.skipped_pregnancy_count(),
            duration_ms = start.elapsed().as_millis(),
            "filter run complete"
        );
        output
    }

    fn loggable(&self, id: &RecordId) -> String {
        if self.log_ids {
            id.to_string()
        } else {
            REDACTED_VALUE.to_string()
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
