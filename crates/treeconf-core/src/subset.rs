//! Prefix-scoped views onto a configuration

use std::sync::Arc;

use crate::key::PropertyKey;
use crate::properties::Properties;
use crate::store::PropertyStore;

/// A window onto the keys under one prefix of a shared store
///
/// A subset never copies data: reads and writes go straight to the parent's
/// store with the prefix prepended. A prefix with nothing under it behaves
/// as an empty configuration.
#[derive(Debug, Clone)]
pub struct Subset {
    store: Arc<PropertyStore>,
    prefix: PropertyKey,
}

impl Subset {
    pub(crate) fn new(store: Arc<PropertyStore>, prefix: PropertyKey) -> Self {
        Self { store, prefix }
    }
}

impl Properties for Subset {
    fn store(&self) -> &Arc<PropertyStore> {
        &self.store
    }

    fn prefix(&self) -> &PropertyKey {
        &self.prefix
    }
}
