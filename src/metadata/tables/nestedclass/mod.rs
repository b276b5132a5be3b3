//! `NestedClass` table support for .NET metadata.
//!
//! Records which `TypeDef` is lexically enclosed in which other `TypeDef`.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.32:
//! > The NestedClass table has the following columns:
//! > - NestedClass (an index into the TypeDef table)
//! > - EnclosingClass (an index into the TypeDef table)

mod raw;
mod reader;

pub use raw::*;
