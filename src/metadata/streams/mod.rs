//! Metadata streams (ECMA-335 II.24.2).
//!
//! The metadata root lists a set of named streams. The ones used for resolution are:
//! - `#~` / `#-` - the metadata tables, see [`TablesHeader`]
//! - `#Strings` - identifier heap, see [`Strings`]
//! - `#Blob` - signatures and attribute values, see [`Blob`]
//!
//! `#US` and `#GUID` are accepted in the stream directory and otherwise ignored.

mod blob;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
