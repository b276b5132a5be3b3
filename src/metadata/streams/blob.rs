use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The '#Blob' heap, holding length-prefixed binary data such as signatures and custom
/// attribute values (ECMA-335 II.24.2.4).
///
/// # Examples
///
/// ```rust
/// use dotnav::Blob;
///
/// let data = [0x00, 0x03, 0x20, 0x00, 0x01];
/// let blob = Blob::from(&data)?;
///
/// assert_eq!(blob.get(1)?, &[0x20, 0x00, 0x01]);
/// # Ok::<(), dotnav::Error>(())
/// ```
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a `Blob` object from a sequence of bytes
    ///
    /// # Arguments
    /// * 'data' - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with a NUL byte
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// Get the blob at the given heap index, without its length prefix
    ///
    /// # Arguments
    /// * 'index' - The offset into the heap
    ///
    /// # Errors
    /// Returns an error if the index or the encoded length point outside of the heap
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let len = parser.read_compressed_uint()? as usize;
        let skip = parser.pos();

        let Some(data_start) = index.checked_add(skip) else {
            return Err(OutOfBounds);
        };

        let Some(data_end) = data_start.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if data_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[data_start..data_end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = {
            let mut data = vec![0xCC; 600];
            /* i - 0    - should always be 0    */ data[0]          = 0b_00000000_u8;
            /* i - 1    - len 10                */ data[1]          = 0b_00001010_u8;
            /* i - 1    - len 10                */ data[2..12]      .copy_from_slice(&[0x0A; 10]);
            /* i - 12   - len 5                 */ data[12]         = 0b_00000101_u8;
            /* i - 12   - len 5                 */ data[13..18]     .copy_from_slice(&[0xAB; 5]);
            /* i - 18   - invalid               */ data[18]         = 0b_11111111_u8;
            /* i - 19   - len 257               */ data[19]         = 0b_10000001_u8;
            /* i - 19   - len 257               */ data[20]         = 0b_00000001_u8;
            /* i - 19   - len 257               */ data[21..278]    .copy_from_slice(&[0xBA; 257]);
            /* i - 278  - len 1024, truncated   */ data[278]        = 0b_10000100_u8;
            /* i - 278  - len 1024, truncated   */ data[279]        = 0b_00000000_u8;
            data
        };

        let blob = Blob::from(&data).unwrap();

        assert_eq!(blob.get(0).unwrap().len(), 0);
        assert_eq!(blob.get(1).unwrap(), &[0x0A; 10]);
        assert_eq!(blob.get(12).unwrap(), &[0xAB; 5]);
        assert!(blob.get(18).is_err());
        assert_eq!(blob.get(19).unwrap(), &[0xBA; 257]);
        assert!(blob.get(278).is_err());
        assert!(blob.get(600).is_err());
    }

    #[test]
    fn invalid() {
        assert!(Blob::from(&[]).is_err());
        assert!(Blob::from(&[0x01]).is_err());
    }
}
