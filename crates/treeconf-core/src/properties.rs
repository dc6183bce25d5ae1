//! Accessors shared by a configuration and its subsets
//!
//! Both [`Configuration`](crate::Configuration) and [`Subset`] are windows
//! onto a [`PropertyStore`] rooted at some key prefix. Every operation here
//! qualifies the caller's relative key with that prefix and delegates to
//! the store.

use std::sync::Arc;

use crate::coerce::FromValue;
use crate::error::{Error, Result};
use crate::flatten::rebuild;
use crate::key::PropertyKey;
use crate::store::PropertyStore;
use crate::subset::Subset;
use crate::value::Value;

/// Read and write access to dotted properties
pub trait Properties {
    /// The backing store
    fn store(&self) -> &Arc<PropertyStore>;

    /// The prefix all keys are relative to (root for a configuration)
    fn prefix(&self) -> &PropertyKey;

    /// Qualify a relative dotted key with this view's prefix
    fn full_key(&self, key: &str) -> PropertyKey {
        self.prefix().join(&PropertyKey::parse(key))
    }

    /// The value stored at `key`, or `None` if the key is absent
    fn get_property(&self, key: &str) -> Option<Value> {
        self.store().get(&self.full_key(key))
    }

    /// Typed value at `key`; an absent key is a `PathNotFound` error
    fn get<T: FromValue>(&self, key: &str) -> Result<T> {
        let full = self.full_key(key);
        self.store()
            .get_typed(&full)?
            .ok_or_else(|| Error::path_not_found(full.to_string()))
    }

    /// Typed value at `key`, `Ok(None)` if absent
    fn get_opt<T: FromValue>(&self, key: &str) -> Result<Option<T>> {
        self.store().get_typed(&self.full_key(key))
    }

    /// Typed value at `key`, or `default` if absent
    ///
    /// A present value that does not convert is still an error.
    fn get_or<T: FromValue>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get_opt(key)?.unwrap_or(default))
    }

    fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    fn get_i64(&self, key: &str) -> Result<i64> {
        self.get(key)
    }

    fn get_f64(&self, key: &str) -> Result<f64> {
        self.get(key)
    }

    fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    /// Every element of the list at `key` converted to `T`
    fn get_list<T: FromValue>(&self, key: &str) -> Result<Vec<T>> {
        self.get(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.store().contains_key(&self.full_key(key))
    }

    /// Dotted keys under this view, relative to its prefix, in store order
    fn keys(&self) -> Vec<String> {
        self.store()
            .keys_with_prefix(self.prefix())
            .iter()
            .filter_map(|k| k.strip_prefix(self.prefix()))
            .map(|k| k.to_string())
            .collect()
    }

    /// Whether no keys are stored under this view
    fn is_empty(&self) -> bool {
        self.store().keys_with_prefix(self.prefix()).is_empty()
    }

    /// Store `value` at `key`, replacing any conflicting keys
    fn set_property(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.store().set(&self.full_key(key), value.into())
    }

    /// Append `value` to whatever is stored at `key`
    fn add_property(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.store().add(&self.full_key(key), value.into())
    }

    /// Remove the value stored exactly at `key`
    fn clear_property(&self, key: &str) -> Option<Value> {
        self.store().remove(&self.full_key(key))
    }

    /// Remove every value at or below `key`
    fn clear_tree(&self, key: &str) -> usize {
        self.store().remove_tree(&self.full_key(key))
    }

    /// A view onto the keys under `prefix`, sharing this store
    fn subset(&self, prefix: &str) -> Subset {
        Subset::new(Arc::clone(self.store()), self.full_key(prefix))
    }

    /// Rebuild the nested document tree for this view
    ///
    /// A view whose prefix is itself a leaf rebuilds to that leaf.
    fn to_value(&self) -> Result<Value> {
        if let Some(leaf) = self.store().get(self.prefix()) {
            return Ok(leaf);
        }
        rebuild(self.store().entries_under(self.prefix()))
    }

    /// Serialize this view as a YAML document
    fn to_yaml(&self) -> Result<String> {
        let tree = self.to_value()?;
        serde_yaml::to_string(&tree).map_err(|e| Error::write(e.to_string()))
    }

    /// Serialize this view as pretty-printed JSON
    fn to_json(&self) -> Result<String> {
        let tree = self.to_value()?;
        serde_json::to_string_pretty(&tree).map_err(|e| Error::write(e.to_string()))
    }
}
