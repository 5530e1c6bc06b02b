//! Membership and search helpers over sequences of keyed records.
//!
//! Records are matched on one or more fields (`by`). A single field matches
//! by identity (`["node_id"]`); several fields must all be equal
//! (`["node_id", "sort_order"]`). A field missing on either side never
//! matches.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::TypeError;
use crate::node::{id_string, value_kind, Node};

/// Anything whose fields can be read by name.
pub trait Record {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>>;
}

impl Record for Node {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl Record for Value {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.as_object()?.get(key).map(Cow::Borrowed)
    }
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        (**self).field(key)
    }
}

fn check_keys(by: &[&str]) -> Result<(), TypeError> {
    if by.is_empty() {
        return Err(TypeError::InvalidMatchKey);
    }
    Ok(())
}

fn matches<T: Record + ?Sized, U: Record + ?Sized>(el: &T, item: &U, by: &[&str]) -> bool {
    by.iter().all(|key| match (el.field(key), item.field(key)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    })
}

/// First record in `container` matching `item` on every field in `by`.
pub fn find_by<'a, T: Record, U: Record + ?Sized>(
    container: &'a [T],
    item: &U,
    by: &[&str],
) -> Result<Option<&'a T>, TypeError> {
    check_keys(by)?;
    Ok(container.iter().find(|el| matches(*el, item, by)))
}

/// All records in `container` matching `item` on every field in `by`.
pub fn find_all_by<'a, T: Record, U: Record + ?Sized>(
    container: &'a [T],
    item: &U,
    by: &[&str],
) -> Result<Vec<&'a T>, TypeError> {
    check_keys(by)?;
    Ok(container.iter().filter(|el| matches(*el, item, by)).collect())
}

/// Returns `true` if some record in `container` matches `item`.
pub fn contains<T: Record, U: Record + ?Sized>(
    container: &[T],
    item: &U,
    by: &[&str],
) -> Result<bool, TypeError> {
    Ok(find_by(container, item, by)?.is_some())
}

/// Index `list` by the identifier stored in field `by`. Later records with
/// the same key replace earlier ones.
pub fn list_to_map<'a, T: Record>(
    list: &'a [T],
    by: &str,
) -> Result<BTreeMap<String, &'a T>, TypeError> {
    let mut map = BTreeMap::new();
    for item in list {
        let value = item.field(by).ok_or_else(|| TypeError::MissingIdentifier {
            key: by.to_string(),
        })?;
        let key = id_string(&value).ok_or_else(|| TypeError::InvalidIdentifier {
            key: by.to_string(),
            actual: value_kind(&value),
        })?;
        map.insert(key, item);
    }
    Ok(map)
}
