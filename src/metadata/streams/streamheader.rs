use crate::{file::io::read_le, Error::OutOfBounds, Result};

/// A stream header gives the names, and the position and length of a particular table or heap.
/// The length of a stream header structure is not fixed, but depends on the length of its name
/// field (a variable length null-terminated string).
pub struct StreamHeader {
    /// Memory offset to start of this stream from start of the metadata root
    pub offset: u32,
    /// Size of this stream in bytes, shall be a multiple of 4.
    pub size: u32,
    /// Name of the stream as null-terminated variable length array of ASCII characters, padded to the next 4-byte
    /// boundary with \0 characters. The name is limited to 32 characters.
    pub name: String,
}

impl StreamHeader {
    /// Create a `StreamHeader` object from a sequence of bytes
    ///
    /// # Arguments
    /// * 'data' - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the data is too short or the stream name is not a known stream
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let name = data[8..]
            .iter()
            .take(32)
            .take_while(|byte| **byte != 0)
            .map(|byte| char::from(*byte))
            .collect::<String>();

        if !["#Strings", "#US", "#Blob", "#GUID", "#~", "#-"]
            .iter()
            .any(|valid_name| name == *valid_name)
        {
            return Err(malformed_error!("Invalid stream header name - {}", name));
        }

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x23, 0x7E, 0x00,
        ];

        let parsed_header = StreamHeader::from(&header_bytes).unwrap();

        assert_eq!(parsed_header.offset, 0x6C);
        assert_eq!(parsed_header.size, 0x45A4);
        assert_eq!(parsed_header.name, "#~");
    }

    #[test]
    fn uncompressed_tables() {
        let header_bytes = [0x6C, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x23, 0x2D, 0x00];

        assert_eq!(StreamHeader::from(&header_bytes).unwrap().name, "#-");
    }

    #[test]
    fn crafted_invalid() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x24, 0x7E, 0x00,
        ];

        assert!(StreamHeader::from(&header_bytes).is_err());
        assert!(StreamHeader::from(&header_bytes[..8]).is_err());
    }
}
