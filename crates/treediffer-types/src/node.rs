//! Node access: identifiers, sort orders, children, and nested field paths.
//!
//! A [`Node`] is a JSON object. The diff engine reads it through the helpers
//! here so that identifier and ordering policy lives in one place:
//!
//! - identifiers are strings or numbers, normalised to `String`
//! - sort order is numeric and defaults to the 1-based position among siblings
//! - children live under [`CHILDREN_KEY`] and must be objects

use serde_json::{Map, Value};

use crate::error::TypeError;

/// A content node (topic, leaf item, or channel root).
pub type Node = Map<String, Value>;

/// Key holding the ordered list of child nodes.
pub const CHILDREN_KEY: &str = "children";

/// Key holding the list of file records attached to a node.
pub const FILES_KEY: &str = "files";

/// Name of the JSON type of `value`, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalise an identifier value. Strings pass through, numbers use their
/// JSON text form; anything else is not an identifier.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve a source field path on a node.
///
/// The path is first tried as a literal key. If that fails and it contains
/// dots, it is walked through nested objects, so `license.license_id` finds
/// `{"license": {"license_id": ...}}`.
pub fn lookup_path<'a>(node: &'a Node, path: &str) -> Option<&'a Value> {
    if let Some(value) = node.get(path) {
        return Some(value);
    }
    if !path.contains('.') {
        return None;
    }
    let mut segments = path.split('.');
    let mut current = node.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Read a required identifier stored at `key`.
pub fn required_id(node: &Node, key: &str) -> Result<String, TypeError> {
    optional_id(node, key)?.ok_or_else(|| TypeError::MissingIdentifier {
        key: key.to_string(),
    })
}

/// Read an optional identifier stored at `key`. Absent and `null` both
/// yield `None`.
pub fn optional_id(node: &Node, key: &str) -> Result<Option<String>, TypeError> {
    match lookup_path(node, key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => id_string(value)
            .map(Some)
            .ok_or_else(|| TypeError::InvalidIdentifier {
                key: key.to_string(),
                actual: value_kind(value),
            }),
    }
}

/// Sort order of a node at zero-based `index` among its siblings.
///
/// An explicit numeric value wins; otherwise the order is `index + 1`.
pub fn sort_order(node: &Node, key: &str, index: usize) -> Result<f64, TypeError> {
    match lookup_path(node, key) {
        None | Some(Value::Null) => Ok((index + 1) as f64),
        Some(value) => value.as_f64().ok_or_else(|| TypeError::InvalidSortOrder {
            key: key.to_string(),
            actual: value_kind(value),
        }),
    }
}

/// The children of a node, or `None` when the node has no children list.
pub fn child_nodes(node: &Node) -> Result<Option<Vec<&Node>>, TypeError> {
    let Some(value) = node.get(CHILDREN_KEY) else {
        return Ok(None);
    };
    let list = value.as_array().ok_or_else(|| TypeError::UnexpectedType {
        context: CHILDREN_KEY.to_string(),
        expected: "array",
        actual: value_kind(value),
    })?;
    list.iter()
        .map(|child| {
            child.as_object().ok_or_else(|| TypeError::UnexpectedType {
                context: "child node".to_string(),
                expected: "object",
                actual: value_kind(child),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> Node {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn ids_normalise_strings_and_numbers() {
        assert_eq!(id_string(&json!("abc")), Some("abc".to_string()));
        assert_eq!(id_string(&json!(42)), Some("42".to_string()));
        assert_eq!(id_string(&json!(true)), None);
    }

    #[test]
    fn required_id_reports_missing_field() {
        let n = node(json!({"title": "x"}));
        assert_eq!(
            required_id(&n, "node_id"),
            Err(TypeError::MissingIdentifier {
                key: "node_id".into()
            })
        );
    }

    #[test]
    fn optional_id_rejects_non_scalar() {
        let n = node(json!({"content_id": ["a"]}));
        assert!(matches!(
            optional_id(&n, "content_id"),
            Err(TypeError::InvalidIdentifier { actual: "array", .. })
        ));
        let n = node(json!({"content_id": null}));
        assert_eq!(optional_id(&n, "content_id"), Ok(None));
    }

    #[test]
    fn sort_order_defaults_to_position() {
        let n = node(json!({"node_id": "a"}));
        assert_eq!(sort_order(&n, "sort_order", 0).unwrap(), 1.0);
        assert_eq!(sort_order(&n, "sort_order", 4).unwrap(), 5.0);

        let n = node(json!({"sort_order": 2.5}));
        assert_eq!(sort_order(&n, "sort_order", 0).unwrap(), 2.5);

        let n = node(json!({"sort_order": "first"}));
        assert!(sort_order(&n, "sort_order", 0).is_err());
    }

    #[test]
    fn dotted_paths_walk_nested_objects() {
        let n = node(json!({
            "license": {"license_id": "CC BY", "description": "open"},
            "a.b": 1,
        }));
        assert_eq!(lookup_path(&n, "license.license_id"), Some(&json!("CC BY")));
        assert_eq!(lookup_path(&n, "a.b"), Some(&json!(1)));
        assert_eq!(lookup_path(&n, "license.missing"), None);
        assert_eq!(lookup_path(&n, "license"), n.get("license"));
    }

    #[test]
    fn child_nodes_distinguishes_absent_and_invalid() {
        let leaf = node(json!({"node_id": "a"}));
        assert_eq!(child_nodes(&leaf).unwrap(), None);

        let topic = node(json!({"children": [{"node_id": "b"}]}));
        assert_eq!(child_nodes(&topic).unwrap().unwrap().len(), 1);

        let broken = node(json!({"children": ["b"]}));
        assert!(matches!(
            child_nodes(&broken),
            Err(TypeError::UnexpectedType { expected: "object", .. })
        ));
    }
}
