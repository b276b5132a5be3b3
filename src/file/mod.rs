//! PE file access for .NET modules.
//!
//! [`File`] owns the raw bytes of a module, either memory-mapped from disk or held in memory,
//! together with the `goblin` parse of its PE headers. It exposes just what metadata parsing
//! needs: the CLR runtime header directory, section based RVA translation and bounds checked
//! slicing.

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr},
    Result,
};
use goblin::pe::{optional_header::OptionalHeader, PE};
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Backing storage for a [`File`].
pub trait Backend: Send + Sync {
    /// Returns a bounds checked slice of the data.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range passes the end of the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the full data
    fn data(&self) -> &[u8];

    /// Returns the length of the data
    fn len(&self) -> usize;
}

/// A parsed PE image with a CLR runtime header.
///
/// # Examples
///
/// ```rust,no_run
/// use dotnav::File;
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("Tests.dll"))?;
/// let (clr_rva, clr_size) = file.clr();
/// let clr_offset = file.rva_to_offset(clr_rva)?;
/// let cli_header = file.data_slice(clr_offset, clr_size)?;
/// # Ok::<(), dotnav::Error>(())
/// ```
#[self_referencing]
pub struct File {
    data: Box<dyn Backend>,
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

fn clr_directory(optional_header: &OptionalHeader) -> Option<(usize, usize)> {
    match optional_header.data_directories.get_clr_runtime_header() {
        Some(clr_dir) if clr_dir.virtual_address != 0 && clr_dir.size != 0 => {
            Some((clr_dir.virtual_address as usize, clr_dir.size as usize))
        }
        _ => None,
    }
}

impl File {
    /// Memory-map and parse the file at `file`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, or a parse error if it
    /// is not a PE image with a CLR runtime header.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Parse a module image held in memory.
    ///
    /// # Errors
    /// Returns a parse error if `data` is not a PE image with a CLR runtime header.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data: Box<dyn Backend> = Box::new(data);

        File::try_new(data, |data| {
            let pe = match PE::parse(data.data()) {
                Ok(pe) => pe,
                Err(error) => return Err(GoblinErr(error)),
            };

            match &pe.header.optional_header {
                Some(optional_header) => {
                    if clr_directory(optional_header).is_none() {
                        Err(malformed_error!(
                            "File does not have a CLR runtime header directory"
                        ))
                    } else {
                        Ok(pe)
                    }
                }
                None => Err(malformed_error!("File does not have an OptionalHeader")),
            }
        })
    }

    /// Returns the total size of the file
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if the file has a length of zero
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the RVA and size of the CLR runtime header
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            pe.header
                .optional_header
                .as_ref()
                .and_then(clr_directory)
                .unwrap_or((0, 0))
        })
    }

    /// Returns the full file data
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.borrow_data().data()
    }

    /// Returns a bounds checked slice of the file data.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range passes the end of the file.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.borrow_data().data_slice(offset, len)
    }

    /// Translate a relative virtual address into a file offset using the section table.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no section contains `rva`.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 = u32::try_from(rva)
            .map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let Some(section_max) = section.virtual_address.checked_add(section.virtual_size)
                else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section.virtual_size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
