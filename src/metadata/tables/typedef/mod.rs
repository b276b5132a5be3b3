//! `TypeDef` table support for .NET metadata.
//!
//! Every type defined in a module has one row, including the pseudo type `<Module>` at row 1.
//! The `FieldList` and `MethodList` columns mark where the fields and methods owned by a type
//! start; a type owns everything up to the start of the next row's list.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.37:
//! > The TypeDef table has the following columns:
//! > - Flags (a 4-byte bitmask of type TypeAttributes)
//! > - TypeName (an index into the String heap)
//! > - TypeNamespace (an index into the String heap)
//! > - Extends (an index into the TypeDef, TypeRef, or TypeSpec table)
//! > - FieldList (an index into the Field table)
//! > - MethodList (an index into the MethodDef table)

mod raw;
mod reader;

pub use raw::*;
