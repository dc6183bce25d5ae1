//! Main Configuration type for treeconf
//!
//! A [`Configuration`] reads a YAML document, flattens it into dotted keys
//! and serves typed lookups. Writing rebuilds the nested document from the
//! stored keys and serializes it back to YAML.

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::flatten::{flatten, rebuild};
use crate::key::PropertyKey;
use crate::properties::Properties;
use crate::store::PropertyStore;
use crate::value::Value;

/// A YAML-backed hierarchical configuration
///
/// All typed accessors, `subset` and the mutation methods come from the
/// [`Properties`] trait.
#[derive(Debug, Default)]
pub struct Configuration {
    store: Arc<PropertyStore>,
    root: PropertyKey,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config = Self::new();
        config.read_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::io(path.display().to_string(), e.to_string()))?;
        let config = Self::new();
        config.read(file)?;
        Ok(config)
    }

    /// Replace the contents with the YAML document read from `reader`
    ///
    /// On any failure the previous contents are left untouched.
    pub fn read<R: Read>(&self, mut reader: R) -> Result<()> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => Error::parse(format!("Input is not valid UTF-8: {}", e)),
            _ => Error::io("input stream", e.to_string()),
        })?;
        self.read_str(&text)
    }

    /// Replace the contents with the YAML document in `yaml`
    pub fn read_str(&self, yaml: &str) -> Result<()> {
        let entries = flatten(Value::from_yaml_str(yaml)?)?;
        log::debug!("Loaded {} properties", entries.len());
        self.store.replace_all(entries);
        Ok(())
    }

    /// Serialize the configuration as YAML into `writer`
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = self.store.snapshot();
        let tree = rebuild(snapshot.iter().map(|(k, v)| (k.clone(), v.clone())))?;
        serde_yaml::to_writer(writer, &tree).map_err(|e| Error::write(e.to_string()))?;
        log::debug!("Wrote {} properties", snapshot.len());
        Ok(())
    }

    /// Write the configuration to a YAML file, creating or truncating it
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| {
            Error::write(e.to_string()).with_help(format!(
                "Check that '{}' is writable",
                path.display()
            ))
        })?;
        let mut writer = io::BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush().map_err(|e| Error::write(e.to_string()))
    }

    /// Number of stored properties
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Remove every property
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl Properties for Configuration {
    fn store(&self) -> &Arc<PropertyStore> {
        &self.store
    }

    fn prefix(&self) -> &PropertyKey {
        &self.root
    }
}

/// Cloning copies the current properties into an independent store
impl Clone for Configuration {
    fn clone(&self) -> Self {
        Self {
            store: Arc::new(PropertyStore::with_entries((*self.store.snapshot()).clone())),
            root: PropertyKey::root(),
        }
    }
}
