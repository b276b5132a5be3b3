use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::{Column, CodedIndexType, TableId},
    Error::{NotSupported, OutOfBounds},
    Result,
};

/// Heap size flag: `#Strings` indexes are 4 bytes
const HEAP_LARGE_STRINGS: u8 = 0x01;
/// Heap size flag: `#GUID` indexes are 4 bytes
const HEAP_LARGE_GUID: u8 = 0x02;
/// Heap size flag: `#Blob` indexes are 4 bytes
const HEAP_LARGE_BLOB: u8 = 0x04;
/// Heap size flag: 4 extra bytes follow the row counts
const HEAP_EXTRA_DATA: u8 = 0x40;

/// Row count of a single table and the number of bits needed to index it
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to represent the largest row index
    pub bits: u8,
    /// Whether simple indexes into this table are 4 bytes wide
    pub is_large: bool,
}

impl TableRowInfo {
    /// Create the row information for a table with `rows` rows
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Size information for all tables and heaps, needed to decode rows of any table.
#[derive(Clone, Default, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
    tables_offset: usize,
}

/// Shared reference to a [`TableInfo`]
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Read the row counts and heap size flags from the start of the `#~` stream
    ///
    /// # Arguments
    /// * 'data'         - The `#~` stream
    /// * 'valid_bitvec' - The bit vector of present tables
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if a table outside `0x00..=0x2C` is present, or
    /// [`crate::Error::OutOfBounds`] if the row counts are truncated.
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        if valid_bitvec >> TableId::COUNT != 0 {
            return Err(NotSupported);
        }

        let mut table_info = vec![TableRowInfo::default(); TableId::COUNT];
        let mut next_row_offset = 24;

        for table_id in TableId::iter() {
            if (valid_bitvec & (1 << table_id as usize)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            table_info[table_id as usize] = TableRowInfo::new(row_count);
        }

        if data.len() < 7 {
            return Err(OutOfBounds);
        }
        let heap_size_flags = read_le::<u8>(&data[6..])?;
        if heap_size_flags & HEAP_EXTRA_DATA != 0 {
            next_row_offset += 4;
        }

        let mut table_info = TableInfo {
            rows: table_info,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & HEAP_LARGE_STRINGS != 0,
            is_large_index_guid: heap_size_flags & HEAP_LARGE_GUID != 0,
            is_large_index_blob: heap_size_flags & HEAP_LARGE_BLOB != 0,
            tables_offset: next_row_offset,
        };

        table_info.calculate_coded_index_bits();
        Ok(table_info)
    }

    /// Table info for unit tests with the given row counts and heap index widths
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::COUNT],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
            tables_offset: 24,
        };

        for valid_table in valid_tables {
            table_info.rows[valid_table.0 as usize] = TableRowInfo::new(valid_table.1);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Offset of the first table row within the `#~` stream
    #[must_use]
    pub fn tables_offset(&self) -> usize {
        self.tables_offset
    }

    /// Split a raw coded index into its table and row
    ///
    /// # Errors
    /// Returns an error if the tag is not valid for `coded_index_type`.
    pub fn decode_coded_index(
        &self,
        value: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<(TableId, u32)> {
        let tag_bits = coded_index_type.tag_bits();
        let tag = value & ((1 << tag_bits) - 1);
        let index = value >> tag_bits;

        match coded_index_type.table(tag) {
            Some(table) => Ok((table, index)),
            None => Err(malformed_error!(
                "Invalid tag {} for coded index {:?}",
                tag,
                coded_index_type
            )),
        }
    }

    /// Returns the row information of `table`
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Returns the number of rows in `table`
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows[table as usize].rows
    }

    /// Whether simple indexes into `id` are 4 bytes wide
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// Whether `#Strings` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Whether `#GUID` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// Whether `#Blob` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Width of a `#Strings` index in bytes
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index in bytes
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index in bytes
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of a simple index into `table_id` in bytes
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Width of a coded index of kind `coded_index_type` in bytes
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    /// Width of a single column in bytes
    #[must_use]
    pub fn column_bytes(&self, column: Column) -> u8 {
        match column {
            Column::Fixed(bytes) => bytes,
            Column::Str => self.str_bytes(),
            Column::Guid => self.guid_bytes(),
            Column::Blob => self.blob_bytes(),
            Column::Table(table) => self.table_index_bytes(table),
            Column::Coded(coded_index_type) => self.coded_index_bytes(coded_index_type),
        }
    }

    /// Size of one row of `table` in bytes
    #[must_use]
    pub fn row_size(&self, table: TableId) -> u32 {
        table
            .columns()
            .iter()
            .map(|column| u32::from(self.column_bytes(*column)))
            .sum()
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let max_bits = coded_index
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index as usize] = max_bits + coded_index.tag_bits();
        }
    }
}
