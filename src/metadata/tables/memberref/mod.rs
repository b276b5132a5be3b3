//! `MemberRef` table support for .NET metadata.
//!
//! References to fields and methods of other types, most commonly constructors of attribute
//! types defined in other assemblies.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.25:
//! > The MemberRef table has the following columns:
//! > - Class (an index into the MethodDef, ModuleRef, TypeDef, TypeRef, or TypeSpec tables)
//! > - Name (an index into the String heap)
//! > - Signature (an index into the Blob heap)

mod raw;
mod reader;

pub use raw::*;
