//! # ECMA-335 Metadata Tables
//!
//! Row decoding for the metadata tables consulted during type and method resolution. All other
//! tables are only sized, see [`TableId::columns`], so that the tables after them can be located.
//!
//! See each submodule for the column layout of its table.
//
/// The implementations of various types necessary to parse and process this metadata
mod types;
//
/// The implementation of the '`AssemblyRef`' table type
pub mod assemblyref;
/// The implementation of the '`CustomAttribute`' table type
pub mod customattribute;
/// The implementation of the '`MemberRef`' table type
pub mod memberref;
/// The implementation of the '`MethodDef`' table type
pub mod methoddef;
/// The implementation of the '`MethodPtr`' table type
pub mod methodptr;
/// The implementation of the '`ModuleRef`' table type
pub mod moduleref;
/// The implementation of the '`NestedClass`' table type
pub mod nestedclass;
/// The implementation of the '`Param`' table type
pub mod param;
/// The implementation of the '`TypeDef`' table type
pub mod typedef;
/// The implementation of the '`TypeRef`' table type
pub mod typeref;
/// The implementation of the '`TypeSpec`' table type
pub mod typespec;

pub use assemblyref::*;
pub use customattribute::*;
pub use memberref::*;
pub use methoddef::*;
pub use methodptr::*;
pub use moduleref::*;
pub use nestedclass::*;
pub use param::*;
pub use typedef::*;
pub use typeref::*;
pub use typespec::*;
pub use types::*;
