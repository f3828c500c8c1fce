//! Typed client records.
//!
//! Every entity keeps its scalar keys in an insertion-ordered map and lifts
//! the keys that carry nested structure (sub-records, lists of sub-records and
//! the `data_encr` payload) into explicit [`Node`] slots. Conversion from
//! JSON is total: a record that is not an object becomes [`Node::Raw`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::RecordId;
use crate::node::{Node, Probe, Shape};

pub const ID: &str = "id";
pub const PREGNANCIES: &str = "pregnancies";
pub const DATA_ENCR: &str = "data_encr";
pub const BIRTH: &str = "birth";
pub const CHILDREN: &str = "children";
pub const CARES_AFTER: &str = "cares_after";
pub const CARES_AFTER_PHONE: &str = "cares_after_phone";

/// The six record types of a client dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Pregnancy,
    Birth,
    Child,
    CareAfter,
    CareAfterPhone,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Client,
        EntityKind::Pregnancy,
        EntityKind::Birth,
        EntityKind::Child,
        EntityKind::CareAfter,
        EntityKind::CareAfterPhone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Pregnancy => "pregnancy",
            EntityKind::Birth => "birth",
            EntityKind::Child => "child",
            EntityKind::CareAfter => "care_after",
            EntityKind::CareAfterPhone => "care_after_phone",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of all record types.
pub trait Entity: Sized {
    const KIND: EntityKind;

    /// Build the entity from an object, lifting nested keys into slots.
    fn from_fields(fields: Map<String, Value>) -> Self;

    /// Scalar keys of the record (nested keys excluded).
    fn fields(&self) -> &Map<String, Value>;

    /// Probe for a nested slot, `None` when `field` is not nested for this kind.
    fn nested_probe(&self, _field: &str) -> Option<Probe> {
        None
    }

    fn from_value(value: Value) -> Node<Self> {
        match value {
            Value::Object(fields) => Node::Typed(Self::from_fields(fields)),
            other => Node::Raw(other),
        }
    }

    /// Presence of `field` on this record.
    fn probe(&self, field: &str) -> Probe {
        self.nested_probe(field)
            .unwrap_or_else(|| Probe::of_value(self.fields().get(field)))
    }

    fn id(&self) -> RecordId {
        RecordId::from_value(self.fields().get(ID))
    }
}

impl<E: Entity> Node<E> {
    /// Probe a field on a record that may itself be absent or malformed.
    ///
    /// Anything but an object reads every field as missing.
    pub fn probe_field(&self, field: &str) -> Probe {
        match self {
            Node::Typed(entity) => entity.probe(field),
            Node::Missing | Node::Raw(_) => Probe::Missing,
        }
    }

    pub fn record_id(&self) -> RecordId {
        match self {
            Node::Typed(entity) => entity.id(),
            Node::Missing | Node::Raw(_) => RecordId::unknown(),
        }
    }
}

/// A list of sub-records, e.g. `pregnancies` or `children`.
pub type EntityList<E> = Node<Vec<Node<E>>>;

fn take_list<E: Entity>(fields: &mut Map<String, Value>, key: &str) -> EntityList<E> {
    match fields.shift_remove(key) {
        None => Node::Missing,
        Some(Value::Array(items)) => Node::Typed(items.into_iter().map(E::from_value).collect()),
        Some(other) => Node::Raw(other),
    }
}

fn take_entity<E: Entity>(fields: &mut Map<String, Value>, key: &str) -> Node<E> {
    fields.shift_remove(key).map_or(Node::Missing, E::from_value)
}

fn take_blob(fields: &mut Map<String, Value>) -> Node<EncryptedBlob> {
    match fields.shift_remove(DATA_ENCR) {
        None => Node::Missing,
        Some(Value::Object(entries)) => Node::Typed(EncryptedBlob(entries)),
        Some(other) => Node::Raw(other),
    }
}

/// Free-form `data_encr` payload. Key order is the order of the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncryptedBlob(pub Map<String, Value>);

impl EncryptedBlob {
    pub fn entries(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl Shape for EncryptedBlob {
    fn slot_probe(&self) -> Probe {
        Probe::Present
    }
}

macro_rules! present_shape {
    ($($ty:ty),*) => {
        $(impl Shape for $ty {
            fn slot_probe(&self) -> Probe {
                Probe::Present
            }
        })*
    };
}

present_shape!(Client, Pregnancy, Birth, Child, CareAfter, CareAfterPhone);

/// One person with their pregnancies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Client {
    pub fields: Map<String, Value>,
    pub pregnancies: EntityList<Pregnancy>,
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Client;

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        let pregnancies = take_list(&mut fields, PREGNANCIES);
        Self {
            fields,
            pregnancies,
        }
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn nested_probe(&self, field: &str) -> Option<Probe> {
        (field == PREGNANCIES).then(|| self.pregnancies.probe())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pregnancy {
    pub fields: Map<String, Value>,
    pub data_encr: Node<EncryptedBlob>,
    pub birth: Node<Birth>,
    pub cares_after: EntityList<CareAfter>,
    pub cares_after_phone: EntityList<CareAfterPhone>,
}

impl Entity for Pregnancy {
    const KIND: EntityKind = EntityKind::Pregnancy;

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        let data_encr = take_blob(&mut fields);
        let birth = take_entity(&mut fields, BIRTH);
        let cares_after = take_list(&mut fields, CARES_AFTER);
        let cares_after_phone = take_list(&mut fields, CARES_AFTER_PHONE);
        Self {
            fields,
            data_encr,
            birth,
            cares_after,
            cares_after_phone,
        }
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn nested_probe(&self, field: &str) -> Option<Probe> {
        match field {
            DATA_ENCR => Some(self.data_encr.probe()),
            BIRTH => Some(self.birth.probe()),
            CARES_AFTER => Some(self.cares_after.probe()),
            CARES_AFTER_PHONE => Some(self.cares_after_phone.probe()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Birth {
    pub fields: Map<String, Value>,
    pub data_encr: Node<EncryptedBlob>,
    pub children: EntityList<Child>,
}

impl Entity for Birth {
    const KIND: EntityKind = EntityKind::Birth;

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        let data_encr = take_blob(&mut fields);
        let children = take_list(&mut fields, CHILDREN);
        Self {
            fields,
            data_encr,
            children,
        }
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn nested_probe(&self, field: &str) -> Option<Probe> {
        match field {
            DATA_ENCR => Some(self.data_encr.probe()),
            CHILDREN => Some(self.children.probe()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Child {
    pub fields: Map<String, Value>,
    pub data_encr: Node<EncryptedBlob>,
}

impl Entity for Child {
    const KIND: EntityKind = EntityKind::Child;

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        let data_encr = take_blob(&mut fields);
        Self { fields, data_encr }
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn nested_probe(&self, field: &str) -> Option<Probe> {
        (field == DATA_ENCR).then(|| self.data_encr.probe())
    }
}

/// A postnatal care visit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareAfter {
    pub fields: Map<String, Value>,
    pub data_encr: Node<EncryptedBlob>,
}

impl Entity for CareAfter {
    const KIND: EntityKind = EntityKind::CareAfter;

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        let data_encr = take_blob(&mut fields);
        Self { fields, data_encr }
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn nested_probe(&self, field: &str) -> Option<Probe> {
        (field == DATA_ENCR).then(|| self.data_encr.probe())
    }
}

/// A postnatal care phone call. Carries no encrypted payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareAfterPhone {
    pub fields: Map<String, Value>,
}

impl Entity for CareAfterPhone {
    const KIND: EntityKind = EntityKind::CareAfterPhone;

    fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
