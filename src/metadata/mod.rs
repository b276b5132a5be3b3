//! Metadata parsing for .NET modules.
//!
//! This module reads the ECMA-335 metadata of a module straight from its bytes: the CLI header,
//! the metadata root, the heaps and the tables that name resolution needs.
//!
//! # Key Components
//!
//! - [`view`] - An opened module with its parsed metadata, namespace tree and nesting maps
//! - [`cache`] - Per-session cache of opened modules
//! - [`tables`] - Typed rows of the metadata tables
//! - [`streams`] - The `#~`, `#Strings` and `#Blob` streams
//! - [`signatures`] - Method signature decoding
//! - [`customattributes`] - Custom attribute value decoding
//! - [`token`] - Metadata table row references
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotnav::metadata::{tables::TypeDefRaw, view::ModuleView};
//! use std::path::Path;
//!
//! let view = ModuleView::from_file(Path::new("Tests.dll"))?;
//! let metadata = view.metadata();
//! if let Some(typedefs) = metadata.table::<TypeDefRaw>() {
//!     for typedef in &typedefs {
//!         println!("{}", metadata.type_full_name(typedef.rid)?);
//!     }
//! }
//! # Ok::<(), dotnav::Error>(())
//! ```

pub mod cache;
pub mod cor20header;
pub mod customattributes;
pub mod method;
pub mod namespace;
pub mod root;
pub mod signatures;
pub mod streams;
pub mod tables;
pub mod token;
pub mod view;
