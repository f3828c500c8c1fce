//! Per-type record filters.
//!
//! Each filter projects one record onto its whitelist and recurses into the
//! nested slots that survive the projection. Filters build new values and
//! never fail: missing optional keys are omitted, malformed nested values are
//! copied unchanged.

use serde_json::Value;

use pnf_model::entity::{BIRTH, CARES_AFTER, CARES_AFTER_PHONE, CHILDREN, DATA_ENCR, PREGNANCIES};
use pnf_model::{
    Birth, CareAfter, CareAfterPhone, Child, Client, EncryptedBlob, EntityKind, EntityList,
    FilterConfig, Node, Pregnancy,
};

use crate::encrypted::filter_blob;
use crate::projector::project_with;

#[derive(Debug, Clone, Copy)]
pub struct EntityFilter<'c> {
    config: &'c FilterConfig,
}

impl<'c> EntityFilter<'c> {
    pub fn new(config: &'c FilterConfig) -> Self {
        Self { config }
    }

    fn whitelist(&self, kind: EntityKind) -> &'c [String] {
        self.config.whitelist.for_kind(kind)
    }

    /// Filter a client with all of its pregnancies.
    pub fn filter_client(&self, client: &Client) -> Value {
        let pregnancies = self.render_list(&client.pregnancies, |p| self.filter_pregnancy(p));
        self.project_client(client, pregnancies)
    }

    /// Filter a client keeping only `pregnancies`, the ones that passed validation.
    pub fn filter_retained(&self, client: &Client, pregnancies: &[&Node<Pregnancy>]) -> Value {
        let rendered = pregnancies
            .iter()
            .filter_map(|pregnancy| pregnancy.render(|p| self.filter_pregnancy(p)))
            .collect();
        self.project_client(client, Some(Value::Array(rendered)))
    }

    fn project_client(&self, client: &Client, pregnancies: Option<Value>) -> Value {
        let mut pregnancies = pregnancies;
        let projected = project_with(&client.fields, self.whitelist(EntityKind::Client), |key| {
            (key == PREGNANCIES).then(|| pregnancies.take())
        });
        Value::Object(projected)
    }

    pub fn filter_pregnancy(&self, pregnancy: &Pregnancy) -> Value {
        let projected = project_with(
            &pregnancy.fields,
            self.whitelist(EntityKind::Pregnancy),
            |key| match key {
                DATA_ENCR => Some(self.render_blob(&pregnancy.data_encr, EntityKind::Pregnancy)),
                BIRTH => Some(pregnancy.birth.render(|birth| self.filter_birth(birth))),
                CARES_AFTER => Some(
                    self.render_list(&pregnancy.cares_after, |care| self.filter_care_after(care)),
                ),
                CARES_AFTER_PHONE => Some(self.render_list(&pregnancy.cares_after_phone, |call| {
                    self.filter_care_after_phone(call)
                })),
                _ => None,
            },
        );
        Value::Object(projected)
    }

    pub fn filter_birth(&self, birth: &Birth) -> Value {
        let projected = project_with(&birth.fields, self.whitelist(EntityKind::Birth), |key| {
            match key {
                DATA_ENCR => Some(self.render_blob(&birth.data_encr, EntityKind::Birth)),
                CHILDREN => {
                    Some(self.render_list(&birth.children, |child| self.filter_child(child)))
                }
                _ => None,
            }
        });
        Value::Object(projected)
    }

    pub fn filter_child(&self, child: &Child) -> Value {
        let projected = project_with(&child.fields, self.whitelist(EntityKind::Child), |key| {
            (key == DATA_ENCR).then(|| self.render_blob(&child.data_encr, EntityKind::Child))
        });
        Value::Object(projected)
    }

    pub fn filter_care_after(&self, care: &CareAfter) -> Value {
        let projected = project_with(&care.fields, self.whitelist(EntityKind::CareAfter), |key| {
            (key == DATA_ENCR).then(|| self.render_blob(&care.data_encr, EntityKind::CareAfter))
        });
        Value::Object(projected)
    }

    pub fn filter_care_after_phone(&self, call: &CareAfterPhone) -> Value {
        Value::Object(project_with(
            &call.fields,
            self.whitelist(EntityKind::CareAfterPhone),
            |_| None,
        ))
    }

    fn render_blob(&self, blob: &Node<EncryptedBlob>, owner: EntityKind) -> Option<Value> {
        let encrypted = &self.config.encrypted;
        blob.render(|blob| {
            filter_blob(blob, encrypted.keys_for(owner), encrypted.patterns_for(owner))
        })
    }

    fn render_list<E>(&self, list: &EntityList<E>, filter: impl Fn(&E) -> Value) -> Option<Value> {
        list.render(|items| {
            Value::Array(items.iter().filter_map(|item| item.render(&filter)).collect())
        })
    }
}
