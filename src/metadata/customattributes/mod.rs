//! Custom attribute value blobs (ECMA-335 II.23.3).
//!
//! An attribute blob starts with the prolog `0x0001`, followed by the constructor's fixed
//! arguments in declaration order and then the named arguments. Fixed arguments carry no type
//! tags, so the parameter types of the constructor signature drive the decoding.
//!
//! # Example
//!
//! ```rust
//! use dotnav::metadata::customattributes::{
//!     parse_fixed_arguments, CustomAttributeArgument, FixedArgType,
//! };
//!
//! let blob = [0x01, 0x00, 0x04, b'I', b't', b'e', b'm', 0x00, 0x00];
//! let args = parse_fixed_arguments(&blob, &[FixedArgType::SystemType])?;
//! assert_eq!(args[0], CustomAttributeArgument::Type(Some("Item".to_string())));
//! # Ok::<(), dotnav::Error>(())
//! ```

mod parser;
mod types;

pub use parser::{parse_fixed_arguments, CustomAttributeParser};
pub use types::*;
