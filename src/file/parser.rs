//! Cursor over a byte slice for signature and custom attribute blobs.
//!
//! [`Parser`] keeps a position into borrowed data and decodes the ECMA-335 encodings found in
//! blobs: compressed unsigned integers (II.23.2), compressed `TypeDefOrRefOrSpecEncoded` tokens
//! and the `SerString` format of custom attribute values (II.23.3).

use crate::{
    file::io::{read_le_at, CilIO},
    metadata::token::Token,
    Error::OutOfBounds,
    Result,
};

/// A generic binary data parser for reading metadata blobs.
///
/// # Examples
///
/// ```rust
/// use dotnav::Parser;
///
/// let data = [0x01, 0x00, 0x03, b'F', b'o', b'o'];
/// let mut parser = Parser::new(&data);
///
/// assert_eq!(parser.read_le::<u16>()?, 0x0001);
/// assert_eq!(parser.read_ser_string()?, Some("Foo"));
/// assert!(!parser.has_more_data());
/// # Ok::<(), dotnav::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new `Parser` positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Length of the underlying data
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether there are bytes left after the current position
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Current position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Move the position forward by `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if that would pass the end of the data.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        match self.position.checked_add(step) {
            Some(end) if end <= self.data.len() => {
                self.position = end;
                Ok(())
            }
            _ => Err(OutOfBounds),
        }
    }

    /// Look at the next byte without consuming it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data.get(self.position).copied().ok_or(OutOfBounds)
    }

    /// Read a little-endian value and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read `len` raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.position;
        self.advance_by(len)?;
        Ok(&self.data[start..self.position])
    }

    /// Read a compressed unsigned integer (1, 2 or 4 bytes).
    ///
    /// # Errors
    /// Returns an error if the data is truncated or the leading byte is not a valid encoding.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
        }

        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            return Ok(((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Read a `TypeDefOrRefOrSpecEncoded` compressed token.
    ///
    /// # Errors
    /// Returns an error if the encoding is truncated or carries an invalid table tag.
    pub fn read_compressed_token(&mut self) -> Result<Token> {
        let compressed_token = self.read_compressed_uint()?;

        let table: u32 = match compressed_token & 0x3 {
            0x0 => 0x0200_0000, // TypeDef
            0x1 => 0x0100_0000, // TypeRef
            0x2 => 0x1B00_0000, // TypeSpec
            _ => {
                return Err(malformed_error!(
                    "Invalid compressed token - {}",
                    compressed_token
                ))
            }
        };

        Ok(Token::new(table | (compressed_token >> 2)))
    }

    /// Read a `SerString`: `0xFF` for null, otherwise a compressed length and UTF-8 bytes.
    ///
    /// # Errors
    /// Returns an error if the string is truncated or not valid UTF-8.
    pub fn read_ser_string(&mut self) -> Result<Option<&'a str>> {
        if self.peek_byte()? == 0xFF {
            self.position += 1;
            return Ok(None);
        }

        let length = self.read_compressed_uint()? as usize;
        let start = self.position;
        let bytes = self.read_bytes(length)?;
        match std::str::from_utf8(bytes) {
            Ok(value) => Ok(Some(value)),
            Err(error) => Err(malformed_error!(
                "Invalid UTF-8 string at offset {}: {}",
                start,
                error
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_uint() {
        let test_cases = vec![
            (vec![0x03], 3),
            (vec![0x7F], 0x7F),
            (vec![0x80, 0x80], 0x80),
            (vec![0xAE, 0x57], 0x2E57),
            (vec![0xBF, 0xFF], 0x3FFF),
            (vec![0xC0, 0x00, 0x40, 0x00], 0x4000),
            (vec![0xDF, 0xFF, 0xFF, 0xFF], 0x1FFF_FFFF),
        ];

        for (input, expected) in test_cases {
            let mut parser = Parser::new(&input);
            assert_eq!(parser.read_compressed_uint().unwrap(), expected);
            assert!(!parser.has_more_data());
        }

        assert!(Parser::new(&[0xFF]).read_compressed_uint().is_err());
        assert!(Parser::new(&[0xC0, 0x00]).read_compressed_uint().is_err());
    }

    #[test]
    fn compressed_token() {
        let mut parser = Parser::new(&[0x49, 0x0A, 0x80, 0x83]);
        assert_eq!(parser.read_compressed_token().unwrap(), Token::new(0x0100_0012));
        assert_eq!(parser.read_compressed_token().unwrap(), Token::new(0x1B00_0002));
        assert!(parser.read_compressed_token().is_err());
    }

    #[test]
    fn ser_string() {
        let data = [0xFF, 0x00, 0x02, b'O', b'k', 0x05, b'a'];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_ser_string().unwrap(), None);
        assert_eq!(parser.read_ser_string().unwrap(), Some(""));
        assert_eq!(parser.read_ser_string().unwrap(), Some("Ok"));
        assert!(parser.read_ser_string().is_err());
    }

    #[test]
    fn bounds() {
        let data = [0x01, 0x02, 0x03];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(parser.peek_byte().unwrap(), 0x03);
        assert!(parser.advance_by(2).is_err());
        assert_eq!(parser.pos(), 2);
        assert!(parser.advance_by(1).is_ok());
        assert!(parser.peek_byte().is_err());
        assert!(parser.read_le::<u8>().is_err());
    }
}
