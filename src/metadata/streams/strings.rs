use std::{ffi::CStr, str};

use crate::{Error::OutOfBounds, Result};

/// The '#Strings' heap, holding NUL-terminated UTF-8 identifiers (ECMA-335 II.24.2.3).
///
/// Index `0` is always the empty string.
///
/// # Examples
///
/// ```rust
/// use dotnav::Strings;
///
/// let data = [0x00, b'T', b'e', b's', b't', 0x00];
/// let strings = Strings::from(&data)?;
///
/// assert_eq!(strings.get(0)?, "");
/// assert_eq!(strings.get(1)?, "Test");
/// # Ok::<(), dotnav::Error>(())
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a `Strings` object from a sequence of bytes
    ///
    /// # Arguments
    /// * 'data' - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with a NUL byte
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #String heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Get the string at the given heap index
    ///
    /// # Arguments
    /// * 'index' - The offset into the heap
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds or the string is not valid UTF-8
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = [
            0x00,
            b'<', b'M', b'o', b'd', b'u', b'l', b'e', b'>', 0x00,
            b'S', b'y', b's', b't', b'e', b'm', 0x00,
            b'M', b'o', b'v', b'e', b'N', b'e', b'x', b't', 0x00,
        ];

        let str_view = Strings::from(&data).unwrap();

        assert_eq!(str_view.get(0).unwrap(), "");
        assert_eq!(str_view.get(1).unwrap(), "<Module>");
        assert_eq!(str_view.get(10).unwrap(), "System");
        assert_eq!(str_view.get(17).unwrap(), "MoveNext");
        assert_eq!(str_view.get(21).unwrap(), "Next");
        assert!(str_view.get(data.len()).is_err());
    }

    #[test]
    fn invalid() {
        assert!(Strings::from(&[]).is_err());
        assert!(Strings::from(&[b'A', 0x00]).is_err());

        let unterminated = [0x00, b'A', b'B'];
        let strings = Strings::from(&unterminated).unwrap();
        assert!(strings.get(1).is_err());
    }
}
