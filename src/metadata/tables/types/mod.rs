//! # Metadata Table Types Module
//!
//! Generic infrastructure for reading rows out of the `#~` stream.
//!
//! ## Key Components
//!
//! - [`MetadataTable`]: Typed view over the bytes of one table, with 1-based row access
//! - [`RowReadable`]: Trait implemented by every decoded row type
//! - [`TableIterator`]: Sequential iterator over all rows of a table
//! - [`CodedIndex`] and [`CodedIndexType`]: Compact cross-table references
//! - [`TableId`]: Enumeration of all metadata tables
//! - [`TableInfo`] and [`TableInfoRef`]: Row counts and index widths
//! - [`Column`]: Column layout of every table, used to compute row sizes
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use dotnav::metadata::tables::{MetadataTable, TypeDefRaw};
//!
//! # fn example(data: &[u8], table_info: dotnav::metadata::tables::TableInfoRef) -> dotnav::Result<()> {
//! let table: MetadataTable<TypeDefRaw> = MetadataTable::new(data, 100, table_info)?;
//! for row in &table {
//!     println!("TypeDef {} name index {}", row.rid, row.type_name);
//! }
//! # Ok(())
//! # }
//! ```

mod codedindex;
mod schema;
mod tableid;
mod tableinfo;

use std::marker::PhantomData;

use crate::{Error::OutOfBounds, Result};

pub use codedindex::{CodedIndex, CodedIndexType};
pub use schema::Column;
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};

/// Decoding of a single table row.
///
/// Implementors describe one table of ECMA-335 II.22. The row size defaults to the size derived
/// from [`TableId::columns`], so a reader only has to consume the columns in order.
pub trait RowReadable: Sized {
    /// The table this row type belongs to
    const TABLE_ID: TableId;

    /// Size in bytes of one row, given the index widths in `sizes`
    fn row_size(sizes: &TableInfoRef) -> u32 {
        sizes.row_size(Self::TABLE_ID)
    }

    /// Read one row starting at `offset`, advancing `offset` past it.
    ///
    /// ## Arguments
    /// * `data`   - The bytes of the complete table
    /// * `offset` - Current read position, updated after reading
    /// * `rid`    - The 1-based row identifier of this row
    /// * `sizes`  - Index widths for the variable sized columns
    ///
    /// # Errors
    /// Returns an error if `data` is too short or a coded index carries an invalid tag.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// A typed view over the rows of one metadata table.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a table view over `data`
    ///
    /// ## Arguments
    /// * `data`      - The bytes of the table, starting at its first row
    /// * `row_count` - The number of rows, as declared in the tables header
    /// * `sizes`     - Index widths of this module
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `row_count` rows.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        let required = u64::from(row_count) * u64::from(row_size);
        if required > data.len() as u64 {
            return Err(OutOfBounds);
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Total size of the table in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Read the row with the 1-based identifier `rid`, `None` if it does not exist
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<T> {
        if rid == 0 || self.row_count < rid {
            return None;
        }

        T::row_read(
            self.data,
            &mut ((rid as usize - 1) * self.row_size as usize),
            rid,
            &self.sizes,
        )
        .ok()
    }

    /// Iterate over all rows in order
    #[must_use]
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
            current_offset: 0,
        }
    }
}

impl<'t, 'a, T: RowReadable> IntoIterator for &'t MetadataTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential iterator over the rows of a [`MetadataTable`]
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    current_row: u32,
    current_offset: usize,
}

impl<T: RowReadable> Iterator for TableIterator<'_, '_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        match T::row_read(
            self.table.data,
            &mut self.current_offset,
            self.current_row + 1,
            &self.table.sizes,
        ) {
            Ok(row) => {
                self.current_row += 1;
                Some(row)
            }
            Err(_) => None,
        }
    }
}
