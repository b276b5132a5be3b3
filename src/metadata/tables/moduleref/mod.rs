//! `ModuleRef` table support for .NET metadata.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.31:
//! > The ModuleRef table has the following column:
//! > - Name (an index into the String heap)

mod raw;
mod reader;

pub use raw::*;
