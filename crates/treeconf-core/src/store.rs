//! In-memory property store
//!
//! The store maps dotted keys to leaf values. The whole map lives behind an
//! `Arc` that is swapped (on load) or copied-on-write (on mutation) under a
//! lock, so a reader always works on one consistent snapshot.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::coerce::FromValue;
use crate::error::{Error, Result};
use crate::flatten::{flatten_into, PropertyMap};
use crate::key::PropertyKey;
use crate::value::Value;

/// Shared backing store for a configuration and all of its subsets
#[derive(Debug, Default)]
pub struct PropertyStore {
    entries: RwLock<Arc<PropertyMap>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `entries`
    pub fn with_entries(entries: PropertyMap) -> Self {
        Self {
            entries: RwLock::new(Arc::new(entries)),
        }
    }

    /// The current contents, unaffected by later mutations
    pub fn snapshot(&self) -> Arc<PropertyMap> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Arc<PropertyMap>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exact-match lookup; `None` means the key is not stored
    pub fn get(&self, key: &PropertyKey) -> Option<Value> {
        self.snapshot().get(key).cloned()
    }

    /// Typed lookup: `Ok(None)` when absent, an error when not convertible
    pub fn get_typed<T: FromValue>(&self, key: &PropertyKey) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => T::from_value(&value).map(Some).ok_or_else(|| {
                Error::type_coercion(key.to_string(), value.to_string(), T::type_name())
            }),
        }
    }

    pub fn contains_key(&self, key: &PropertyKey) -> bool {
        self.snapshot().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Discard the current contents and install `entries` in one step
    pub fn replace_all(&self, entries: PropertyMap) {
        *self.write_guard() = Arc::new(entries);
    }

    /// Stored keys whose segments start with `prefix`, in store order
    pub fn keys_with_prefix(&self, prefix: &PropertyKey) -> Vec<PropertyKey> {
        self.snapshot()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Entries under `prefix` with the prefix stripped from their keys
    pub fn entries_under(&self, prefix: &PropertyKey) -> Vec<(PropertyKey, Value)> {
        self.snapshot()
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(prefix).map(|rel| (rel, v.clone())))
            .collect()
    }

    /// Store `value` at `key`
    ///
    /// A mapping is flattened beneath `key`. Stored leaves that would no
    /// longer fit into one tree (ancestors of `key`, or descendants of it
    /// that the new value does not replace) are removed.
    pub fn set(&self, key: &PropertyKey, value: Value) -> Result<()> {
        let mut guard = self.write_guard();
        set_entry(Arc::make_mut(&mut *guard), key, value)
    }

    /// Append `value` to the leaf at `key`
    ///
    /// An absent key simply stores the value. A scalar leaf becomes a
    /// sequence of the old and new values; a sequence leaf is extended.
    pub fn add(&self, key: &PropertyKey, value: Value) -> Result<()> {
        let mut guard = self.write_guard();
        let map = Arc::make_mut(&mut *guard);

        let combined = match map.get(key) {
            None => {
                if map.keys().any(|k| k.starts_with(key)) {
                    return Err(Error::invalid_structure(
                        "Cannot add a value to a key that has nested keys",
                    )
                    .with_path(key.to_string()));
                }
                value
            }
            Some(Value::Sequence(items)) => {
                let mut items = items.clone();
                match value {
                    Value::Sequence(more) => items.extend(more),
                    other => items.push(other),
                }
                Value::Sequence(items)
            }
            Some(existing) => {
                let mut items = vec![existing.clone()];
                match value {
                    Value::Sequence(more) => items.extend(more),
                    other => items.push(other),
                }
                Value::Sequence(items)
            }
        };

        set_entry(map, key, combined)
    }

    /// Remove the leaf stored exactly at `key`
    pub fn remove(&self, key: &PropertyKey) -> Option<Value> {
        let mut guard = self.write_guard();
        if !guard.contains_key(key) {
            return None;
        }
        Arc::make_mut(&mut *guard).shift_remove(key)
    }

    /// Remove every leaf at or below `prefix`; returns how many were removed
    pub fn remove_tree(&self, prefix: &PropertyKey) -> usize {
        let mut guard = self.write_guard();
        let before = guard.len();
        if guard.keys().any(|k| k.starts_with(prefix)) {
            Arc::make_mut(&mut *guard).retain(|k, _| !k.starts_with(prefix));
        }
        before - guard.len()
    }

    pub fn clear(&self) {
        self.replace_all(PropertyMap::new());
    }
}

fn set_entry(map: &mut PropertyMap, key: &PropertyKey, value: Value) -> Result<()> {
    let mut flat = PropertyMap::new();
    flatten_into(key, value, &mut flat);
    if flat.contains_key(&PropertyKey::root()) {
        return Err(Error::invalid_structure("Cannot store a value at the root key"));
    }

    let before = map.len();
    map.retain(|k, _| {
        let stale_descendant = k.starts_with(key) && !flat.contains_key(k);
        let leaf_ancestor = key.starts_with(k) && k != key;
        !(stale_descendant || leaf_ancestor)
    });
    let evicted = before - map.len();
    if evicted > 0 {
        log::warn!("Setting '{}' removed {} conflicting key(s)", key, evicted);
    }

    for (k, v) in flat {
        match map.get_mut(&k) {
            Some(slot) => *slot = v,
            None => {
                map.insert(k, v);
            }
        }
    }
    Ok(())
}
