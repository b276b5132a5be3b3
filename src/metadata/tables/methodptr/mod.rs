//! `MethodPtr` table support for .NET metadata.
//!
//! An indirection table only present in unoptimized (`#-`) metadata. When it has rows, the
//! `MethodList` column of `TypeDef` indexes this table instead of `MethodDef`.
//!
//! ## ECMA-335 Specification
//! The table is not part of the published column list, it has a single column:
//! > - Method (an index into the MethodDef table)

mod raw;
mod reader;

pub use raw::*;
