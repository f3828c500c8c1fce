//! Structural validation of clients and their pregnancies.
//!
//! Two policies share one core. Under [`ValidationPolicy::StrictWholeClient`]
//! the first invalid pregnancy rejects the whole client. Under
//! [`ValidationPolicy::SalvagePerPregnancy`] invalid pregnancies are dropped
//! and reported individually, and the client survives as long as one valid
//! pregnancy remains.
//!
//! Validation never fails: every rejection is returned as a [`SkipReason`].

use pnf_model::{
    Client, Entity, EntityKind, FieldPath, FilterConfig, Node, Pregnancy, Probe, RecordId,
    RequiredField, SkipReason, SkippedPregnancy, ValidationPolicy,
};

use pnf_model::entity::PREGNANCIES;

/// First required field that `entity` fails, in table order.
///
/// A field fails when it is absent or `null`, or, for fields flagged
/// `non_empty`, when it is an empty list. An entity that is itself missing or
/// not an object reads every field as absent. Later fields are not checked
/// once one fails.
pub fn first_missing<'r, E: Entity>(
    entity: &Node<E>,
    required: &'r [RequiredField],
) -> Option<&'r RequiredField> {
    required
        .iter()
        .find(|field| entity.probe_field(&field.name).fails(field.non_empty))
}

/// Result of validating one client.
#[derive(Debug)]
pub struct ClientValidation<'a> {
    pub client_id: RecordId,
    pub outcome: ClientOutcome<'a>,
    /// Pregnancies dropped under the salvage policy, in input order.
    pub skipped_pregnancies: Vec<SkippedPregnancy>,
}

#[derive(Debug)]
pub enum ClientOutcome<'a> {
    /// The client goes to the output with these pregnancies.
    Keep {
        client: &'a Client,
        pregnancies: Vec<&'a Node<Pregnancy>>,
    },
    Skip(SkipReason),
}

impl ClientOutcome<'_> {
    pub fn is_keep(&self) -> bool {
        matches!(self, ClientOutcome::Keep { .. })
    }
}

/// Applies the required-field tables of a [`FilterConfig`] under its policy.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    config: &'c FilterConfig,
}

impl<'c> Validator<'c> {
    pub fn new(config: &'c FilterConfig) -> Self {
        Self { config }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.config.policy
    }

    /// Validate a client and partition its pregnancies.
    pub fn validate_client<'a>(&self, node: &'a Node<Client>) -> ClientValidation<'a> {
        let client_id = node.record_id();
        let required = self.config.required_fields();

        if let Some(field) = first_missing(node, &required.client) {
            return ClientValidation::skipped(
                client_id,
                SkipReason::missing(EntityKind::Client, field.name.as_str()),
            );
        }
        // Without a pregnancy list there is nothing to keep.
        let Node::Typed(client) = node else {
            return ClientValidation::skipped(
                client_id,
                SkipReason::missing(EntityKind::Client, PREGNANCIES),
            );
        };
        let Node::Typed(pregnancies) = &client.pregnancies else {
            return ClientValidation::skipped(
                client_id,
                SkipReason::missing(EntityKind::Client, PREGNANCIES),
            );
        };

        match self.config.policy {
            ValidationPolicy::StrictWholeClient => {
                for pregnancy in pregnancies {
                    if let Some(path) = self.check_pregnancy(pregnancy) {
                        let reason = SkipReason::InvalidPregnancy {
                            pregnancy_id: pregnancy.record_id(),
                            path,
                        };
                        return ClientValidation::skipped(client_id, reason);
                    }
                }
                ClientValidation {
                    client_id,
                    outcome: ClientOutcome::Keep {
                        client,
                        pregnancies: pregnancies.iter().collect(),
                    },
                    skipped_pregnancies: Vec::new(),
                }
            }
            ValidationPolicy::SalvagePerPregnancy => {
                let mut kept = Vec::with_capacity(pregnancies.len());
                let mut skipped_pregnancies = Vec::new();
                for pregnancy in pregnancies {
                    match self.check_pregnancy(pregnancy) {
                        None => kept.push(pregnancy),
                        Some(path) => skipped_pregnancies.push(SkippedPregnancy {
                            client_id: client_id.clone(),
                            pregnancy_id: pregnancy.record_id(),
                            reason: SkipReason::MissingField { path },
                        }),
                    }
                }
                let outcome = if kept.is_empty() {
                    ClientOutcome::Skip(SkipReason::NoValidPregnancies)
                } else {
                    ClientOutcome::Keep {
                        client,
                        pregnancies: kept,
                    }
                };
                ClientValidation {
                    client_id,
                    outcome,
                    skipped_pregnancies,
                }
            }
        }
    }

    /// First failing field of a pregnancy or of its birth, if any.
    pub fn check_pregnancy(&self, pregnancy: &Node<Pregnancy>) -> Option<FieldPath> {
        let required = self.config.required_fields();
        if let Some(field) = first_missing(pregnancy, &required.pregnancy) {
            return Some(FieldPath::new(EntityKind::Pregnancy, field.name.as_str()));
        }
        let Node::Typed(pregnancy) = pregnancy else {
            return None;
        };
        if matches!(pregnancy.birth.probe(), Probe::Missing | Probe::Null) {
            return None;
        }
        first_missing(&pregnancy.birth, &required.birth)
            .map(|field| FieldPath::new(EntityKind::Birth, field.name.as_str()))
    }
}

impl ClientValidation<'_> {
    fn skipped(client_id: RecordId, reason: SkipReason) -> Self {
        Self {
            client_id,
            outcome: ClientOutcome::Skip(reason),
            skipped_pregnancies: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnf_model::entity::{BIRTH, CARES_AFTER, CHILDREN};
    use serde_json::{Value, json};

    fn client(value: Value) -> Node<Client> {
        Client::from_value(value)
    }

    fn complete_pregnancy(id: i64) -> Value {
        json!({
            "id": id,
            "birth": {"id": id * 10, "children": [{"id": id * 100}]},
            "cares_after": [{"id": 1}],
            "cares_after_phone": [{"id": 2}]
        })
    }

    fn strict() -> FilterConfig {
        FilterConfig::default().with_policy(ValidationPolicy::StrictWholeClient)
    }

    fn salvage() -> FilterConfig {
        FilterConfig::default().with_policy(ValidationPolicy::SalvagePerPregnancy)
    }

    #[test]
    fn first_missing_short_circuits_in_table_order() {
        let node = Pregnancy::from_value(json!({"birth": null, "cares_after": []}));
        let required = vec![
            RequiredField::non_empty(CARES_AFTER),
            RequiredField::present(BIRTH),
        ];
        assert_eq!(first_missing(&node, &required).unwrap().name, CARES_AFTER);
    }

    #[test]
    fn empty_list_passes_without_non_empty_flag() {
        let node = Pregnancy::from_value(json!({"cares_after": []}));
        assert!(first_missing(&node, &[RequiredField::present(CARES_AFTER)]).is_none());
    }

    #[test]
    fn missing_entity_reads_fields_as_absent() {
        let node: Node<Pregnancy> = Node::Raw(Value::Null);
        let required = [RequiredField::present(BIRTH)];
        assert_eq!(first_missing(&node, &required).unwrap().name, BIRTH);
    }

    #[test]
    fn client_without_pregnancies_is_skipped_in_both_policies() {
        for config in [strict(), salvage()] {
            let node = client(json!({"id": 3, "pregnancies": []}));
            let validation = Validator::new(&config).validate_client(&node);
            let ClientOutcome::Skip(reason) = validation.outcome else {
                panic!("client should be skipped");
            };
            assert_eq!(reason, SkipReason::missing(EntityKind::Client, "pregnancies"));
            assert!(reason.to_string().contains("client.pregnancies"));
        }
    }

    #[test]
    fn client_with_scalar_pregnancies_is_skipped() {
        let config = salvage();
        let node = client(json!({"id": 3, "pregnancies": "unknown"}));
        let validation = Validator::new(&config).validate_client(&node);
        assert!(!validation.outcome.is_keep());
    }

    #[test]
    fn strict_rejects_whole_client_on_first_invalid_pregnancy() {
        let config = strict();
        let node = client(json!({
            "id": 1,
            "pregnancies": [
                {"id": 10, "birth": {"children": [{"id": 1}]}},
                {"id": 11, "birth": null},
                {"id": 12, "birth": {"children": []}}
            ]
        }));
        let validation = Validator::new(&config).validate_client(&node);
        let ClientOutcome::Skip(reason) = validation.outcome else {
            panic!("client should be skipped");
        };
        assert_eq!(
            reason,
            SkipReason::InvalidPregnancy {
                pregnancy_id: RecordId::from(json!(11)),
                path: FieldPath::new(EntityKind::Pregnancy, BIRTH),
            }
        );
        assert!(validation.skipped_pregnancies.is_empty());
    }

    #[test]
    fn strict_checks_children_of_present_birth() {
        let config = strict();
        let node = client(json!({"id": 1, "pregnancies": [{"id": 10, "birth": {"children": []}}]}));
        let validation = Validator::new(&config).validate_client(&node);
        let ClientOutcome::Skip(SkipReason::InvalidPregnancy { path, .. }) = validation.outcome
        else {
            panic!("client should be skipped for its pregnancy");
        };
        assert_eq!(path, FieldPath::new(EntityKind::Birth, CHILDREN));
    }

    #[test]
    fn strict_does_not_require_after_care() {
        let config = strict();
        let node = client(json!({
            "id": 1,
            "pregnancies": [{"id": 10, "birth": {"children": [{}]}}]
        }));
        let validation = Validator::new(&config).validate_client(&node);
        let ClientOutcome::Keep { pregnancies, .. } = validation.outcome else {
            panic!("client should be kept");
        };
        assert_eq!(pregnancies.len(), 1);
    }

    #[test]
    fn salvage_drops_only_invalid_pregnancies() {
        let config = salvage();
        let mut incomplete = complete_pregnancy(11);
        incomplete.as_object_mut().unwrap().shift_remove("cares_after");
        let node = client(json!({"id": 1, "pregnancies": [complete_pregnancy(10), incomplete]}));
        let validation = Validator::new(&config).validate_client(&node);

        let ClientOutcome::Keep { pregnancies, .. } = &validation.outcome else {
            panic!("client should be kept");
        };
        assert_eq!(pregnancies.len(), 1);
        assert_eq!(pregnancies[0].record_id(), RecordId::from(json!(10)));
        assert_eq!(
            validation.skipped_pregnancies,
            vec![SkippedPregnancy {
                client_id: RecordId::from(json!(1)),
                pregnancy_id: RecordId::from(json!(11)),
                reason: SkipReason::missing(EntityKind::Pregnancy, CARES_AFTER),
            }]
        );
    }

    #[test]
    fn salvage_skips_client_when_nothing_remains() {
        let config = salvage();
        let node = client(json!({
            "id": 4,
            "pregnancies": [{
                "id": 40,
                "birth": {"children": [{}]},
                "cares_after": [{}],
                "cares_after_phone": []
            }]
        }));
        let validation = Validator::new(&config).validate_client(&node);
        let ClientOutcome::Skip(reason) = validation.outcome else {
            panic!("client should be skipped");
        };
        assert_eq!(reason, SkipReason::NoValidPregnancies);
        assert_eq!(validation.skipped_pregnancies.len(), 1);
        assert_eq!(
            validation.skipped_pregnancies[0].reason,
            SkipReason::missing(EntityKind::Pregnancy, "cares_after_phone")
        );
    }

    #[test]
    fn salvage_checks_birth_children() {
        let config = salvage();
        let node = Pregnancy::from_value(json!({
            "id": 5,
            "birth": {"children": []},
            "cares_after": [{}],
            "cares_after_phone": [{}]
        }));
        let path = Validator::new(&config).check_pregnancy(&node);
        assert_eq!(path, Some(FieldPath::new(EntityKind::Birth, CHILDREN)));
    }

    #[test]
    fn malformed_birth_fails_children_check() {
        let config = strict();
        let node = Pregnancy::from_value(json!({"id": 6, "birth": "born"}));
        let path = Validator::new(&config).check_pregnancy(&node);
        assert_eq!(path, Some(FieldPath::new(EntityKind::Birth, CHILDREN)));
    }

    #[test]
    fn strict_valid_complete_pregnancy_is_salvage_valid() {
        let strict = strict();
        let salvage = salvage();
        let node = Pregnancy::from_value(complete_pregnancy(7));
        assert!(Validator::new(&strict).check_pregnancy(&node).is_none());
        assert!(Validator::new(&salvage).check_pregnancy(&node).is_none());
    }
}
