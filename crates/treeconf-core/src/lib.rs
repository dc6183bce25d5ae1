//! treeconf-core: Hierarchical YAML configuration
//!
//! This crate loads YAML documents into a flat store of dotted keys, serves
//! typed lookups and prefix-scoped subsets, and writes the store back out
//! as a nested YAML document.
//!
//! # Example
//!
//! ```rust
//! use treeconf_core::{Configuration, Properties, Value};
//!
//! let yaml = r#"
//! database:
//!   host: localhost
//!   port: 5432
//!   replicas: [db1, db2]
//! "#;
//!
//! let config = Configuration::from_yaml(yaml).unwrap();
//! assert_eq!(config.get_string("database.host").unwrap(), "localhost");
//! assert_eq!(config.get_property("database.port"), Some(Value::Integer(5432)));
//!
//! let db = config.subset("database");
//! assert_eq!(db.get_list::<String>("replicas").unwrap(), vec!["db1", "db2"]);
//! ```

pub mod coerce;
pub mod error;
pub mod flatten;
pub mod key;
pub mod store;
pub mod value;

mod config;
mod properties;
mod subset;

pub use coerce::FromValue;
pub use config::Configuration;
pub use error::{Error, ErrorKind, Result};
pub use key::PropertyKey;
pub use properties::Properties;
pub use store::PropertyStore;
pub use subset::Subset;
pub use value::Value;
