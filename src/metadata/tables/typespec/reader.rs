use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef, TypeSpecRaw},
        token::Token,
    },
    Result,
};

impl RowReadable for TypeSpecRaw {
    const TABLE_ID: TableId = TableId::TypeSpec;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(TypeSpecRaw {
            rid,
            token: Token::new(0x1B00_0000 + rid),
            offset: *offset,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::metadata::tables::{MetadataTable, TableInfo};

    use super::*;

    #[test]
    fn crafted() {
        let data = vec![0x01, 0x01, 0x02, 0x02, 0x02, 0x02];

        let short = Arc::new(TableInfo::new_test(&[(TableId::TypeSpec, 1)], false, false, false));
        let table = MetadataTable::<TypeSpecRaw>::new(&data[..2], 1, short).unwrap();
        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x1B000001);
        assert_eq!(row.signature, 0x0101);

        let long = Arc::new(TableInfo::new_test(&[(TableId::TypeSpec, 1)], false, true, false));
        let table = MetadataTable::<TypeSpecRaw>::new(&data[2..], 1, long).unwrap();
        assert_eq!(table.get(1).unwrap().signature, 0x02020202);
    }
}
