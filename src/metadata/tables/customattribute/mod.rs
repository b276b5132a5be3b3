//! `CustomAttribute` table support for .NET metadata.
//!
//! Each row attaches one attribute instance to a metadata entity. The attribute is identified by
//! its constructor, the arguments are stored as a blob (ECMA-335 II.23.3).
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.10:
//! > The CustomAttribute table has the following columns:
//! > - Parent (an index into a metadata table that has an associated HasCustomAttribute coded index)
//! > - Type (an index into the MethodDef or MemberRef table; more precisely, a CustomAttributeType coded index)
//! > - Value (an index into the Blob heap)

mod raw;
mod reader;

pub use raw::*;
