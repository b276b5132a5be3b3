// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dotnav
//!
//! Source navigation for .NET test methods, driven by module metadata.
//!
//! A test framework reports a test as a type name and a method name. That pair is not always
//! where the method's source lives: an inherited test is declared by a base type, possibly in
//! another module, and the body of an `async` or iterator test is compiled into a generated
//! state machine type. `dotnav` reads the ECMA-335 metadata of the compiled modules directly,
//! without loading them into a runtime, to find the type and method a symbol reader should be
//! asked about.
//!
//! ## Features
//!
//! - **Memory-mapped module access** - Metadata is read in place with bounds checked parsing
//! - **Cross-module resolution** - Type references are followed into modules found next to the
//!   referencing module
//! - **Ambiguity averse** - Lookups that match by name more than once give no answer instead of a
//!   wrong one
//! - **Pluggable symbols** - Reading debug symbols is left to a [`navigation::SymbolProvider`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotnav::prelude::*;
//! use std::path::Path;
//!
//! # struct Pdb;
//! # impl SymbolSession for Pdb {
//! #     fn navigation_data(&mut self, _: &str, _: &str) -> Option<SourceLocation> { None }
//! # }
//! # struct PdbReader;
//! # impl SymbolProvider for PdbReader {
//! #     type Session = Pdb;
//! #     fn open_session(&mut self, _: &Path) -> dotnav::Result<Pdb> { Ok(Pdb) }
//! # }
//! let mut session = NavigationSession::new(PdbReader);
//! let data = session.get_navigation_data(
//!     Path::new("tests/Company.Tests.dll"),
//!     "Company.Tests.DerivedFixture",
//!     "InheritedTest",
//! );
//!
//! if let NavigationData::Found(location) = data {
//!     println!("{}:{}", location.file_path.display(), location.min_line_number);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`navigation`] - The lookup session and the symbol provider seam
//! - [`resolution`] - Type lookup, reference resolution, the declaring type and state machine walks
//! - [`metadata`] - ECMA-335 metadata reading and the session module cache
//! - [`Error`] and [`Result`] - Error handling
//!
//! ### Resolution order
//!
//! 1. The reported type and method are looked up in the symbols as they are
//! 2. The generated state machine type of the method is looked up with `MoveNext`
//! 3. The base type declaring the method is looked up with the original method name
//!
//! The first lookup that produces a source location wins. When none does, the answer is
//! [`navigation::NavigationData::Invalid`], never an error.

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotnav::prelude::*;
///
/// let config = NavigationConfig::default().with_max_inheritance_depth(16);
/// assert_eq!(config.state_machine_method, "MoveNext");
/// ```
pub mod prelude;

/// Definitions and parsing of CIL metadata based on ECMA-335
///
/// Only the parts of the metadata that navigation needs are read: the type, method, parameter,
/// reference and attribute tables, the `#Strings` and `#Blob` heaps, and the signatures and
/// attribute blobs stored in them.
///
/// # Key Components
///
/// - [`metadata::view::ModuleView`] - An opened module with its parsed metadata
/// - [`metadata::cache::ModuleCache`] - Modules opened during one session
/// - [`metadata::tables`] - Typed rows of the metadata tables
/// - [`metadata::signatures`] - Method signature blobs
/// - [`metadata::customattributes`] - Custom attribute value blobs
///
/// # Examples
///
/// ```rust,no_run
/// use dotnav::metadata::{tables::TypeDefRaw, view::ModuleView};
/// use std::path::Path;
///
/// let view = ModuleView::from_file(Path::new("Tests.dll"))?;
/// let metadata = view.metadata();
///
/// if let Some(types) = metadata.table::<TypeDefRaw>() {
///     for typedef in types.iter() {
///         println!("{}", metadata.type_full_name(typedef.rid)?);
///     }
/// }
/// # Ok::<(), dotnav::Error>(())
/// ```
pub mod metadata;

pub mod navigation;
pub mod resolution;

/// `dotnav` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotnav` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use dotnav::{metadata::view::ModuleView, Error};
///
/// match ModuleView::from_file(std::path::Path::new("Tests.dll")) {
///     Ok(_) => println!("Loaded successfully"),
///     Err(Error::NotSupported) => println!("File format not supported"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Metadata heaps and the tables stream header.
pub use metadata::streams::{Blob, StreamHeader, Strings, TablesHeader};

/// Low-level file and memory parsing utilities.
///
/// # Example
///
/// ```rust
/// use dotnav::Parser;
///
/// let data = [0x81, 0x02];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_compressed_uint()?, 0x102);
/// # Ok::<(), dotnav::Error>(())
/// ```
pub use file::{parser::Parser, File};

pub use navigation::{NavigationConfig, NavigationData, NavigationSession};
