//! `Param` table support for .NET metadata.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.33:
//! > The Param table has the following columns:
//! > - Flags (a 2-byte bitmask of type ParamAttributes)
//! > - Sequence (a 2-byte constant)
//! > - Name (an index into the String heap)
//!
//! Sequence `0` describes the return value, parameters are numbered from `1`.

mod raw;
mod reader;

pub use raw::*;
