//! Presence model for nested record slots.
//!
//! Source documents are heterogeneous: a nested key can be absent, hold the
//! expected structure, or hold something else entirely (`null`, a string, a
//! number where an object was expected). [`Node`] keeps those three cases
//! apart so filters and validators never probe raw JSON.

use serde_json::Value;

/// A nested slot of an entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node<T> {
    /// The key is not present on the owning record.
    #[default]
    Missing,
    /// The key holds the expected shape.
    Typed(T),
    /// The key is present but does not hold the expected shape (includes `null`).
    Raw(Value),
}

impl<T> Node<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_typed(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            _ => None,
        }
    }

    /// Produce the output value for this slot.
    ///
    /// Typed content goes through `filter`, raw values are copied unchanged
    /// and a missing slot yields `None`.
    pub fn render(&self, filter: impl FnOnce(&T) -> Value) -> Option<Value> {
        match self {
            Self::Missing => None,
            Self::Typed(value) => Some(filter(value)),
            Self::Raw(value) => Some(value.clone()),
        }
    }
}

impl<T: Shape> Node<T> {
    /// Presence of the slot itself, as seen by required-field checks.
    pub fn probe(&self) -> Probe {
        match self {
            Self::Missing => Probe::Missing,
            Self::Typed(value) => value.slot_probe(),
            Self::Raw(value) => Probe::of_value(Some(value)),
        }
    }
}

/// What a required-field check sees when it reads a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Missing,
    Null,
    Sequence(usize),
    Present,
}

impl Probe {
    pub fn of_value(value: Option<&Value>) -> Self {
        match value {
            None => Self::Missing,
            Some(Value::Null) => Self::Null,
            Some(Value::Array(items)) => Self::Sequence(items.len()),
            Some(_) => Self::Present,
        }
    }

    /// Whether a required field with this probe fails the check.
    ///
    /// Empty strings, zero and `false` are present values; only absence,
    /// `null` and (when `non_empty` is set) an empty sequence fail.
    pub fn fails(self, non_empty: bool) -> bool {
        match self {
            Self::Missing | Self::Null => true,
            Self::Sequence(0) => non_empty,
            Self::Sequence(_) | Self::Present => false,
        }
    }
}

/// Types that can report their own [`Probe`] when stored in a [`Node`].
pub trait Shape {
    fn slot_probe(&self) -> Probe;
}

impl<T> Shape for Vec<T> {
    fn slot_probe(&self) -> Probe {
        Probe::Sequence(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probe_failure_rules() {
        assert!(Probe::Missing.fails(false));
        assert!(Probe::Null.fails(false));
        assert!(!Probe::Sequence(0).fails(false));
        assert!(Probe::Sequence(0).fails(true));
        assert!(!Probe::Sequence(2).fails(true));
        assert!(!Probe::Present.fails(true));
    }

    #[test]
    fn falsy_scalars_are_present() {
        for value in [json!(""), json!(0), json!(false)] {
            assert_eq!(Probe::of_value(Some(&value)), Probe::Present);
        }
    }

    #[test]
    fn render_passes_raw_values_through() {
        let raw: Node<Vec<u8>> = Node::Raw(json!("not a list"));
        assert_eq!(raw.render(|_| json!("filtered")), Some(json!("not a list")));
        let missing: Node<Vec<u8>> = Node::Missing;
        assert_eq!(missing.render(|_| json!("filtered")), None);
        let typed = Node::Typed(vec![1u8]);
        assert_eq!(typed.render(|v| json!(v.len())), Some(json!(1)));
    }

    #[test]
    fn slot_probe_uses_shape() {
        assert_eq!(Node::Typed(Vec::<u8>::new()).probe(), Probe::Sequence(0));
        assert_eq!(Node::<Vec<u8>>::Raw(Value::Null).probe(), Probe::Null);
        assert_eq!(Node::<Vec<u8>>::Missing.probe(), Probe::Missing);
    }
}
