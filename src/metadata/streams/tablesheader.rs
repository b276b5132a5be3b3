//! The `#~` stream header (ECMA-335 II.24.2.6).
//!
//! The header lists which tables are present and how many rows each one holds. The rows follow
//! directly after the header, table after table in [`TableId`] order, so every table's location
//! is derived from the row sizes of all tables before it.

use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef},
    Error::OutOfBounds,
    Result,
};

/// The header of the `#~` stream, with the located bytes of every present table.
///
/// # Examples
///
/// ```rust,ignore
/// use dotnav::{metadata::tables::TypeDefRaw, TablesHeader};
///
/// let tables = TablesHeader::from(tables_stream)?;
/// if let Some(typedefs) = tables.table::<TypeDefRaw>() {
///     println!("{} types", typedefs.row_count());
/// }
/// ```
pub struct TablesHeader<'a> {
    /// Major version of the table schema, always 2
    pub major_version: u8,
    /// Minor version of the table schema, always 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    tables: Vec<Option<&'a [u8]>>,
}

impl<'a> TablesHeader<'a> {
    /// Parse the header of the `#~` stream and locate all tables
    ///
    /// # Arguments
    /// * 'data' - The complete `#~` stream
    ///
    /// # Errors
    /// Returns an error if no table is present, an unknown table is present, or the declared
    /// rows do not fit into `data`.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid_bitvec = read_le::<u64>(&data[8..])?;
        if valid_bitvec == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let info = Arc::new(TableInfo::new(data, valid_bitvec)?);
        let mut tables = vec![None; TableId::COUNT];

        let mut current_offset = info.tables_offset();
        for table_id in TableId::iter() {
            let rows = info.rows(table_id);
            if rows == 0 {
                continue;
            }

            let size = u64::from(rows) * u64::from(info.row_size(table_id));
            let Some(end) = usize::try_from(size)
                .ok()
                .and_then(|size| current_offset.checked_add(size))
            else {
                return Err(OutOfBounds);
            };
            if end > data.len() {
                return Err(OutOfBounds);
            }

            tables[table_id as usize] = Some(&data[current_offset..end]);
            current_offset = end;
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid: valid_bitvec,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            tables,
        })
    }

    /// Number of present tables
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Whether `table_id` is present and has at least one row
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.tables[table_id as usize].is_some()
    }

    /// Number of rows in `table_id`
    #[must_use]
    pub fn rows(&self, table_id: TableId) -> u32 {
        self.info.rows(table_id)
    }

    /// A typed view over the table of `T`, `None` if the table has no rows
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let data = self.tables[T::TABLE_ID as usize]?;
        MetadataTable::new(data, self.info.rows(T::TABLE_ID), self.info.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{ModuleRefRaw, TypeRefRaw};

    #[rustfmt::skip]
    const TABLES: [u8; 46] = [
        0x00, 0x00, 0x00, 0x00,                         // reserved
        0x02, 0x00,                                     // version
        0x00,                                           // heap sizes
        0x01,                                           // reserved
        0x02, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, // valid: TypeRef, ModuleRef
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
        0x02, 0x00, 0x00, 0x00,                         // TypeRef rows
        0x01, 0x00, 0x00, 0x00,                         // ModuleRef rows
        // TypeRef 1: scope AssemblyRef 1, name 0x10, namespace 0x20
        0x06, 0x00, 0x10, 0x00, 0x20, 0x00,
        // TypeRef 2: scope TypeRef 1, name 0x30, namespace 0
        0x07, 0x00, 0x30, 0x00, 0x00, 0x00,
        // ModuleRef 1
        0x40, 0x00,
    ];

    #[test]
    fn crafted() {
        let header = TablesHeader::from(&TABLES).unwrap();

        assert_eq!(header.major_version, 2);
        assert_eq!(header.minor_version, 0);
        assert_eq!(header.table_count(), 2);
        assert!(header.has_table(TableId::TypeRef));
        assert!(!header.has_table(TableId::TypeDef));
        assert_eq!(header.rows(TableId::TypeRef), 2);

        let typerefs = header.table::<TypeRefRaw>().unwrap();
        let second = typerefs.get(2).unwrap();
        assert_eq!(second.resolution_scope.tag, TableId::TypeRef);
        assert_eq!(second.resolution_scope.row, 1);
        assert_eq!(second.type_name, 0x30);

        let modulerefs = header.table::<ModuleRefRaw>().unwrap();
        assert_eq!(modulerefs.get(1).unwrap().name, 0x40);

        assert!(header
            .table::<crate::metadata::tables::TypeDefRaw>()
            .is_none());
    }

    #[test]
    fn truncated() {
        assert!(matches!(
            TablesHeader::from(&TABLES[..40]),
            Err(OutOfBounds)
        ));
        assert!(matches!(TablesHeader::from(&TABLES[..20]), Err(OutOfBounds)));

        let mut empty = TABLES;
        empty[8..16].fill(0);
        assert!(TablesHeader::from(&empty).is_err());
    }
}
