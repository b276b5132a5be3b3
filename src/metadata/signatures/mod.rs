//! Signature blob parsing (ECMA-335 II.23.2).
//!
//! Method signatures are needed to find out which parameters of an attribute constructor exist
//! and in which order their values are serialized into the attribute blob.
//!
//! # Example
//!
//! ```rust
//! use dotnav::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! // instance void .ctor(class [mscorlib]System.Type)
//! let sig = parse_method_signature(&[0x20, 0x01, 0x01, 0x12, 0x09])?;
//! assert!(sig.has_this);
//! assert_eq!(sig.params.len(), 1);
//! assert!(matches!(sig.params[0].base, TypeSignature::Class(_)));
//! # Ok::<(), dotnav::Error>(())
//! ```

mod parser;
mod types;

pub use parser::SignatureParser;
pub use types::*;

use crate::Result;

/// Parse a `MethodDefSig` or `MethodRefSig` blob
///
/// # Errors
/// Returns an error if the blob is truncated or contains an unknown element type.
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    let mut parser = SignatureParser::new(data);
    parser.parse_method_signature()
}
