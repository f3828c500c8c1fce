//! Whitelist projection of records.

use serde_json::{Map, Value};

/// Copy the keys of `value` listed in `allowed`, in allow-list order.
///
/// Presence of the key is what counts, not its value: a `null` or `false`
/// value is copied like any other. The copy is shallow. Non-object values
/// are returned unchanged.
pub fn project(value: &Value, allowed: &[String]) -> Value {
    match value {
        Value::Object(fields) => Value::Object(project_with(fields, allowed, |_| None)),
        other => other.clone(),
    }
}

/// Project `fields`, asking `nested` first for every allowed key.
///
/// `nested` returns `Some(rendered)` for keys held outside `fields` (nested
/// slots of a typed record), where `rendered` is `None` when the slot is
/// missing, and `None` for plain keys, which are then copied from `fields`.
pub fn project_with<F>(
    fields: &Map<String, Value>,
    allowed: &[String],
    mut nested: F,
) -> Map<String, Value>
where
    F: FnMut(&str) -> Option<Option<Value>>,
{
    let mut projected = Map::new();
    for key in allowed {
        let value = match nested(key) {
            Some(rendered) => rendered,
            None => fields.get(key).cloned(),
        };
        if let Some(value) = value {
            projected.insert(key.clone(), value);
        }
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn keeps_allowed_keys_in_allow_list_order() {
        let value = json!({"b": 2, "secret": "x", "a": 1});
        let projected = project(&value, &keys(&["a", "b", "c"]));
        let order: Vec<&String> = projected.as_object().unwrap().keys().collect();
        assert_eq!(order, ["a", "b"]);
        assert_eq!(projected, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn copies_falsy_values() {
        let value = json!({"a": null, "b": false, "c": 0, "d": ""});
        let projected = project(&value, &keys(&["a", "b", "c", "d"]));
        assert_eq!(projected, value);
    }

    #[test]
    fn passes_non_objects_through() {
        for value in [Value::Null, json!(3), json!("text"), json!([1, 2])] {
            assert_eq!(project(&value, &keys(&["a"])), value);
        }
    }

    #[test]
    fn nested_slots_override_fields() {
        let fields = json!({"id": 1, "children": "stale"});
        let projected = project_with(
            fields.as_object().unwrap(),
            &keys(&["id", "children", "birth"]),
            |key| match key {
                "children" => Some(Some(json!(["fresh"]))),
                "birth" => Some(None),
                _ => None,
            },
        );
        assert_eq!(Value::Object(projected), json!({"id": 1, "children": ["fresh"]}));
    }
}
