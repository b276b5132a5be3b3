//! `MethodDef` table support for .NET metadata.
//!
//! One row per method defined in the module. The owning type is not stored in the row, it is
//! implied by the `MethodList` ranges of the `TypeDef` table.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.26:
//! > The MethodDef table has the following columns:
//! > - RVA (a 4-byte constant)
//! > - ImplFlags (a 2-byte bitmask of type MethodImplAttributes)
//! > - Flags (a 2-byte bitmask of type MethodAttributes)
//! > - Name (an index into the String heap)
//! > - Signature (an index into the Blob heap)
//! > - ParamList (an index into the Param table)

mod raw;
mod reader;

pub use raw::*;
