//! Tests for pnf-model types.

use serde_json::json;

use pnf_model::{
    Client, Entity, EntityKind, FilterConfig, Node, Probe, ProcessingStats, RecordId, SkipReason,
    SkippedClient, SkippedPregnancy, ValidationPolicy,
};

#[test]
fn client_tree_exposes_nested_probes() {
    let node = Client::from_value(json!({
        "id": "c-1",
        "pregnancies": [
            {"id": 10, "birth": null, "cares_after": []},
            {"id": 11, "birth": {"children": [{"id": 1}]}}
        ]
    }));
    assert_eq!(node.probe_field("pregnancies"), Probe::Sequence(2));
    assert_eq!(node.record_id().to_string(), "c-1");

    let pregnancies = node.as_typed().unwrap().pregnancies.as_typed().unwrap();
    assert_eq!(pregnancies[0].probe_field("birth"), Probe::Null);
    assert_eq!(pregnancies[0].probe_field("cares_after"), Probe::Sequence(0));
    assert!(pregnancies[0].probe_field("cares_after").fails(true));
    assert!(!pregnancies[0].probe_field("cares_after").fails(false));
    assert_eq!(pregnancies[1].probe_field("birth"), Probe::Present);
    assert_eq!(pregnancies[1].probe_field("cares_after_phone"), Probe::Missing);
}

#[test]
fn non_object_client_has_unknown_id() {
    let node = Client::from_value(json!("garbage"));
    assert!(matches!(node, Node::Raw(_)));
    assert_eq!(node.record_id(), RecordId::unknown());
    assert_eq!(node.probe_field("pregnancies"), Probe::Missing);
}

#[test]
fn skip_reasons_render_for_the_report() {
    let reason = SkipReason::missing(EntityKind::Birth, "children");
    assert_eq!(reason.to_string(), "missing or empty field `birth.children`");

    let reason = SkipReason::InvalidPregnancy {
        pregnancy_id: RecordId::from(json!(42)),
        path: pnf_model::FieldPath::new(EntityKind::Pregnancy, "birth"),
    };
    assert_eq!(
        reason.to_string(),
        "pregnancy 42: missing or empty field `pregnancy.birth`"
    );
}

#[test]
fn stats_count_skips() {
    let stats = ProcessingStats {
        total_clients: 3,
        successful_clients: 1,
        retained_pregnancies: 1,
        skipped_clients: vec![
            SkippedClient {
                client_id: RecordId::from(json!(1)),
                reason: SkipReason::NoValidPregnancies,
            },
            SkippedClient {
                client_id: RecordId::unknown(),
                reason: SkipReason::missing(EntityKind::Client, "pregnancies"),
            },
        ],
        skipped_pregnancies: vec![SkippedPregnancy {
            client_id: RecordId::from(json!(1)),
            pregnancy_id: RecordId::from(json!(10)),
            reason: SkipReason::missing(EntityKind::Pregnancy, "birth"),
        }],
    };
    assert_eq!(stats.skipped_client_count(), 2);
    assert_eq!(stats.skipped_pregnancy_count(), 1);
    assert!(stats.has_skips());
    assert_eq!(
        stats.total_clients,
        stats.successful_clients + stats.skipped_client_count()
    );
}

#[test]
fn stats_serialize_with_tagged_reasons() {
    let stats = ProcessingStats {
        total_clients: 1,
        skipped_clients: vec![SkippedClient {
            client_id: RecordId::from(json!("c-9")),
            reason: SkipReason::NoValidPregnancies,
        }],
        ..ProcessingStats::default()
    };
    let value = serde_json::to_value(&stats).expect("serialize stats");
    assert_eq!(
        value["skipped_clients"][0],
        json!({"client_id": "c-9", "reason": {"kind": "no_valid_pregnancies"}})
    );
}

#[test]
fn config_file_switches_policy_tables() {
    let config = FilterConfig::from_toml_str("policy = \"strict\"\n").expect("parse config");
    assert_eq!(config.policy, ValidationPolicy::StrictWholeClient);
    assert_eq!(config.required_fields().pregnancy.len(), 1);
    let salvage = config.with_policy(ValidationPolicy::SalvagePerPregnancy);
    assert_eq!(salvage.required_fields().pregnancy.len(), 3);
}
