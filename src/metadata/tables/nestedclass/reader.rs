use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{NestedClassRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for NestedClassRaw {
    const TABLE_ID: TableId = TableId::NestedClass;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(NestedClassRaw {
            rid,
            token: Token::new(0x2900_0000 + rid),
            offset: *offset,
            nested_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
            enclosing_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::metadata::tables::{MetadataTable, TableInfo};

    use super::*;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x03, 0x00, 0x02, 0x00, // nested 3 in 2
            0x04, 0x00, 0x03, 0x00, // nested 4 in 3
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::NestedClass, 2), (TableId::TypeDef, 4)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<NestedClassRaw>::new(&data, 2, sizes).unwrap();

        let pairs: Vec<(u32, u32)> = table
            .iter()
            .map(|row| (row.nested_class, row.enclosing_class))
            .collect();
        assert_eq!(pairs, vec![(3, 2), (4, 3)]);
    }

    #[test]
    fn crafted_long() {
        let data = vec![0x03, 0x00, 0x01, 0x00, 0x02, 0x00, 0x01, 0x00];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::NestedClass, 1), (TableId::TypeDef, 0x1_0004)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<NestedClassRaw>::new(&data, 1, sizes).unwrap();
        let row = table.get(1).unwrap();

        assert_eq!(row.nested_class, 0x1_0003);
        assert_eq!(row.enclosing_class, 0x1_0002);
    }
}
