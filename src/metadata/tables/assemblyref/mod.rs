//! `AssemblyRef` table support for .NET metadata.
//!
//! One row per referenced assembly. The simple name is what a module locator uses to find the
//! referenced module on disk.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.5:
//! > The AssemblyRef table has the following columns:
//! > - MajorVersion, MinorVersion, BuildNumber, RevisionNumber (each being 2-byte constants)
//! > - Flags (a 4-byte bitmask of type AssemblyFlags)
//! > - PublicKeyOrToken (an index into the Blob heap)
//! > - Name (an index into the String heap)
//! > - Culture (an index into the String heap)
//! > - HashValue (an index into the Blob heap)

mod raw;
mod reader;

pub use raw::*;
