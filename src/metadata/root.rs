//! Metadata root and stream directory (ECMA-335 II.24.2.1).

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// The magic signature ('BSJB') at the start of every metadata root
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// The metadata root, holding the version string and the directory of metadata streams.
pub struct Root {
    /// Magic signature for physical metadata, always `0x424A5342`
    pub signature: u32,
    /// Major version, 1 (ignore on read)
    pub major_version: u16,
    /// Minor version, 1 (ignore on read)
    pub minor_version: u16,
    /// Reserved, always 0
    pub reserved: u32,
    /// Number of bytes allocated to hold the version string, including padding
    pub length: u32,
    /// Version string, without the NUL padding
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// Number of streams
    pub stream_number: u16,
    /// The stream headers, in directory order
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Parse the metadata root from the start of the metadata block
    ///
    /// # Arguments
    /// * `data` - The complete metadata block the CLI header points at
    ///
    /// # Errors
    /// Returns an error if the signature does not match, or the version string or a stream
    /// header points outside of `data`.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 36 {
            return Err(OutOfBounds);
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {}",
                signature
            ));
        }

        let version_string_length = read_le_at::<u32>(data, &mut 12)? as usize;
        let Some(version_end) = version_string_length.checked_add(16) else {
            return Err(malformed_error!(
                "Version string length causing integer overflow - {}",
                version_string_length
            ));
        };
        if version_end + 4 > data.len() {
            return Err(OutOfBounds);
        }

        let version = data[16..version_end]
            .iter()
            .take_while(|byte| **byte != 0)
            .map(|byte| char::from(*byte))
            .collect::<String>();

        let mut offset = version_end;
        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_count = read_le_at::<u16>(data, &mut offset)?;
        if stream_count == 0 || stream_count > 5 || usize::from(stream_count) * 9 > data.len() {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut streams = Vec::with_capacity(stream_count as usize);
        let mut stream_offset = offset;
        for _ in 0..stream_count {
            if stream_offset > data.len() {
                return Err(OutOfBounds);
            }

            let new_stream = StreamHeader::from(&data[stream_offset..])?;
            match u32::checked_add(new_stream.offset, new_stream.size) {
                Some(range) => {
                    if range as usize > data.len() {
                        return Err(OutOfBounds);
                    }
                }
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        new_stream.offset,
                        new_stream.size
                    ))
                }
            }

            let name_aligned = ((new_stream.name.len() + 1) + 3) & !3;
            stream_offset += 8 + name_aligned;
            streams.push(new_stream);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            reserved: read_le::<u32>(&data[8..])?,
            length: u32::try_from(version_string_length)
                .map_err(|_| malformed_error!("Version string length too large"))?,
            version,
            flags,
            stream_number: stream_count,
            stream_headers: streams,
        })
    }

    /// Find a stream header by name
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|stream| stream.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const ROOT: [u8; 60] = [
        0x42, 0x53, 0x4A, 0x42,             // signature
        0x01, 0x00,                         // major_version
        0x01, 0x00,                         // minor_version
        0x00, 0x00, 0x00, 0x00,             // reserved
        0x08, 0x00, 0x00, 0x00,             // length
        b'v', b'4', b'.', b'0', 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,                         // flags
        0x02, 0x00,                         // streams
        0x3C, 0x00, 0x00, 0x00,             // #~ offset
        0x04, 0x00, 0x00, 0x00,             // #~ size
        0x23, 0x7E, 0x00, 0x00,
        0x40, 0x00, 0x00, 0x00,             // #Strings offset
        0x08, 0x00, 0x00, 0x00,             // #Strings size
        b'#', b'S', b't', b'r', b'i', b'n', b'g', b's', 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn crafted() {
        let mut data = ROOT.to_vec();
        data.resize(0x48, 0);

        let parsed_header = Root::read(&data).unwrap();

        assert_eq!(parsed_header.signature, CIL_HEADER_MAGIC);
        assert_eq!(parsed_header.major_version, 1);
        assert_eq!(parsed_header.minor_version, 1);
        assert_eq!(parsed_header.length, 8);
        assert_eq!(parsed_header.version, "v4.0");
        assert_eq!(parsed_header.stream_number, 2);
        assert_eq!(parsed_header.stream_headers[0].name, "#~");
        assert_eq!(parsed_header.stream_headers[0].offset, 0x3C);
        assert_eq!(parsed_header.stream_headers[1].name, "#Strings");
        assert_eq!(parsed_header.stream("#Strings").unwrap().size, 8);
        assert!(parsed_header.stream("#Blob").is_none());
    }

    #[test]
    fn invalid() {
        let mut bad_magic = ROOT.to_vec();
        bad_magic.resize(0x48, 0);
        bad_magic[0] = 0x43;
        assert!(Root::read(&bad_magic).is_err());

        // Stream data past the end of the metadata block
        assert!(Root::read(&ROOT).is_err());

        assert!(matches!(Root::read(&ROOT[..20]), Err(OutOfBounds)));
    }
}
