//! CLI (Cor20) header parsing.
//!
//! The header lives at the start of the CLR runtime data directory and points at the metadata
//! root. Only the fields needed to reach the metadata are kept.
//!
//! # Reference
//! - [ECMA-335 II.25.3.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The CLI header of a managed PE image.
pub struct Cor20Header {
    /// Size of header in bytes
    pub cb: u32,
    /// The minimum version of runtime required to run this program
    pub major_runtime_version: u16,
    /// The minor portion of the version
    pub minor_runtime_version: u16,
    /// RVA of the `MetaData`
    pub meta_data_rva: u32,
    /// Size of the `MetaData`
    pub meta_data_size: u32,
    /// Flags describing this runtime
    pub flags: u32,
    /// Token for the `MethodDef` or File of the entry point for the image
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Create a `Cor20Header` object from a sequence of bytes
    ///
    /// # Arguments
    /// * `data` - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the data is too short or the header does not point at any metadata.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < 72 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb != 72 {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        } else if meta_data_size > 0x1000_0000 {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let flags = parser.read_le::<u32>()?;
        let entry_point_token = parser.read_le::<u32>()?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const HEADER: [u8; 72] = [
        0x48, 0x00, 0x00, 0x00, // cb = 72
        0x02, 0x00,             // major_runtime_version = 2
        0x05, 0x00,             // minor_runtime_version = 5
        0x48, 0x20, 0x00, 0x00, // meta_data_rva = 0x2048
        0x00, 0x04, 0x00, 0x00, // meta_data_size = 0x400
        0x01, 0x00, 0x00, 0x00, // flags = ILONLY
        0x00, 0x00, 0x00, 0x00, // entry_point_token
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // resources
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // strong name signature
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // code manager table
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // vtable fixups
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // export address table jumps
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // managed native header
    ];

    #[test]
    fn crafted() {
        let parsed_header = Cor20Header::read(&HEADER).unwrap();

        assert_eq!(parsed_header.cb, 72);
        assert_eq!(parsed_header.major_runtime_version, 2);
        assert_eq!(parsed_header.minor_runtime_version, 5);
        assert_eq!(parsed_header.meta_data_rva, 0x2048);
        assert_eq!(parsed_header.meta_data_size, 0x400);
        assert_eq!(parsed_header.flags, 1);
        assert_eq!(parsed_header.entry_point_token, 0);
    }

    #[test]
    fn invalid() {
        assert!(matches!(Cor20Header::read(&HEADER[..71]), Err(OutOfBounds)));

        let mut wrong_size = HEADER;
        wrong_size[0] = 0x40;
        assert!(Cor20Header::read(&wrong_size).is_err());

        let mut no_metadata = HEADER;
        no_metadata[8..12].copy_from_slice(&[0; 4]);
        assert!(Cor20Header::read(&no_metadata).is_err());

        let mut empty_metadata = HEADER;
        empty_metadata[12..16].copy_from_slice(&[0; 4]);
        assert!(Cor20Header::read(&empty_metadata).is_err());
    }
}
