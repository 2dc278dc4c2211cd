//! Refindex – index-backed shortcuts for lite-path queries over a configuration tree.
//!
//! A configuration store exposes its tree through lite-path queries, a
//! restricted XPath-like syntax. Some nodes carry a UUID in their `_.uuid`
//! attribute, and a handful of frequent queries ask "which device owns this
//! UUID?". Answered by the store's own evaluator such a query scans every
//! device. This crate answers them from a UUID → path index instead:
//! * [`shortcut`] – the catalogue of recognized query shapes and the matcher.
//! * [`resolver`] – [`resolver::ReferenceShortcuts`], a decorator over any
//!   [`configuration::Configuration`] that resolves recognized queries through
//!   a [`index::ReferenceIndex`] and passes everything else through.
//! * [`anchor`] – the shape check applied to index entries before they are trusted.
//!
//! ## Building blocks
//! * [`path`] – [`path::Path`], an immutable sequence of keys and list positions.
//! * [`litepath`] – the pest grammar, AST and canonical rendering of lite-path queries.
//! * [`pattern`] – [`pattern::PathPattern`], templates with `'{param}'` slots
//!   matched structurally against parsed queries.
//! * [`observe`] – the injected logging capability and counter hook.
//! * [`memory`] – [`memory::MemoryConfiguration`], a JSON-backed store that is
//!   both a `Configuration` and a `ReferenceIndex`.
//! * [`settings`] – layered settings through the `config` crate.
//!
//! ## Staleness
//! The index is maintained elsewhere and may lag behind the tree. Before an
//! index entry is used the resolver asks the index to probe the live tree;
//! if the two disagree the query is answered by a full search instead. Index
//! entries that are present but malformed give an empty result.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use refindex::configuration::Configuration;
//! use refindex::memory::MemoryConfiguration;
//! use refindex::resolver::ReferenceShortcuts;
//! use refindex::shortcut::Shortcut;
//!
//! let tree = serde_json::json!({
//!     "dicomConfigurationRoot": { "dicomDevicesRoot": {
//!         "dev1": { "_.uuid": "d-1", "dicomDeviceName": "dev1" }
//!     }}
//! });
//! let store = Arc::new(MemoryConfiguration::indexed(tree).unwrap());
//! let shortcuts = ReferenceShortcuts::new(Arc::clone(&store), Arc::clone(&store));
//! let query = Shortcut::DeviceNameByUuid.query("d-1").unwrap();
//! let names: Vec<_> = shortcuts.search(&query).unwrap().collect();
//! assert_eq!(names, vec![serde_json::json!("dev1")]);
//! ```

pub mod anchor;
pub mod configuration;
pub mod error;
pub mod index;
pub mod litepath;
pub mod memory;
pub mod observe;
pub mod path;
pub mod pattern;
pub mod resolver;
pub mod settings;
pub mod shortcut;

pub use error::{ConfError, Result};
