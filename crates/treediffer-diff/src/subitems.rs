//! Diff of ordered sub-item lists (exercise questions).
//!
//! Sub-items are matched by id, never by position. A matched pair is
//! unchanged, moved (only the order changed), or modified (any other field or
//! its file list changed); modification wins over a move.

use std::borrow::Cow;

use serde_json::Value;

use treediffer_types::{
    contains, find_by, required_id, sort_order, value_kind, DiffConfig, Node, Record, TypeError,
    FILES_KEY,
};

use crate::attributes::diff_files;
use crate::error::DiffResult;

/// Canonical name of the sub-item id field.
pub const SUBITEM_ID: &str = "assessment_id";
/// Canonical name of the sub-item order field.
pub const SUBITEM_ORDER: &str = "order";

/// The result of comparing two sub-item lists. Entries are the raw sub-item
/// records: old-side for deletions, new-side otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubitemsDiff {
    pub added: Vec<Value>,
    pub deleted: Vec<Value>,
    pub moved: Vec<Value>,
    pub modified: Vec<Value>,
}

impl SubitemsDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.deleted.is_empty()
            && self.moved.is_empty()
            && self.modified.is_empty()
    }
}

struct SubItem<'a> {
    id: String,
    order: f64,
    item: &'a Node,
}

impl Record for SubItem<'_> {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        match key {
            "id" => Some(Cow::Owned(Value::from(self.id.as_str()))),
            "order" => Some(Cow::Owned(Value::from(self.order))),
            _ => None,
        }
    }
}

fn prepare<'a>(
    list: &'a [Value],
    id_key: &str,
    order_key: &str,
) -> Result<Vec<SubItem<'a>>, TypeError> {
    list.iter()
        .enumerate()
        .map(|(i, value)| {
            let item = value.as_object().ok_or_else(|| TypeError::UnexpectedType {
                context: "sub-item".to_string(),
                expected: "object",
                actual: value_kind(value),
            })?;
            Ok(SubItem {
                id: required_id(item, id_key)?,
                order: sort_order(item, order_key, i)?,
                item,
            })
        })
        .collect()
}

/// Compare sub-item lists `list_a` (old) and `list_b` (new).
///
/// Ids are read through `config.map_a`/`map_b` (`assessment_id`), as are
/// orders (`order`, defaulting to 1-based position). Fields excluded as
/// `<subitems_key>.<field>` are ignored, and nested file lists are compared
/// as unordered collections. Duplicate ids within one list are not supported.
pub fn diff_subitems(
    list_a: &[Value],
    list_b: &[Value],
    config: &DiffConfig,
) -> DiffResult<SubitemsDiff> {
    let order_key_a = config.map_a.resolve(SUBITEM_ORDER);
    let order_key_b = config.map_b.resolve(SUBITEM_ORDER);
    let items_a = prepare(list_a, config.map_a.resolve(SUBITEM_ID), order_key_a)?;
    let items_b = prepare(list_b, config.map_b.resolve(SUBITEM_ID), order_key_b)?;

    let excluded = config
        .subitems_key
        .as_deref()
        .map(|key| config.nested_exclusions(key))
        .unwrap_or_default();
    let file_exclusions = config.nested_exclusions(FILES_KEY);

    let mut diff = SubitemsDiff::default();
    for it in &items_b {
        if !contains(&items_a, it, &["id"])? {
            diff.added.push(Value::Object(it.item.clone()));
        }
    }
    for it in &items_a {
        if !contains(&items_b, it, &["id"])? {
            diff.deleted.push(Value::Object(it.item.clone()));
        }
    }

    for it_a in &items_a {
        let Some(it_b) = find_by(&items_b, it_a, &["id"])? else {
            continue;
        };
        let mut rest_a = it_a.item.clone();
        let mut rest_b = it_b.item.clone();
        rest_a.remove(order_key_a);
        rest_b.remove(order_key_b);
        for field in &excluded {
            rest_a.remove(*field);
            rest_b.remove(*field);
        }

        let mut files_changed = false;
        if let (Some(Value::Array(files_a)), Some(Value::Array(files_b))) =
            (rest_a.remove(FILES_KEY), rest_b.remove(FILES_KEY))
        {
            files_changed = !diff_files(&files_a, &files_b, &file_exclusions).is_empty();
        } else if !excluded.contains(&FILES_KEY) {
            // restore whatever was there so a one-sided file list still counts
            if let Some(files) = it_a.item.get(FILES_KEY) {
                rest_a.insert(FILES_KEY.to_string(), files.clone());
            }
            if let Some(files) = it_b.item.get(FILES_KEY) {
                rest_b.insert(FILES_KEY.to_string(), files.clone());
            }
        }

        let same_fields = rest_a == rest_b && !files_changed;
        if same_fields && it_a.order == it_b.order {
            continue;
        }
        let record = Value::Object(it_b.item.clone());
        if same_fields {
            diff.moved.push(record);
        } else {
            diff.modified.push(record);
        }
    }

    Ok(diff)
}
