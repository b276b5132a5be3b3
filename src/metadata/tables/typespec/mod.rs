//! `TypeSpec` table support for .NET metadata.
//!
//! A `TypeSpec` describes a constructed type such as a generic instantiation or an array by a
//! signature blob (ECMA-335 II.23.2.14). It has no name of its own.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.39:
//! > The TypeSpec table has just one column:
//! > - Signature (index into the Blob heap)

mod raw;
mod reader;

pub use raw::*;
