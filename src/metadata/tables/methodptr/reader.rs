use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{MethodPtrRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for MethodPtrRaw {
    const TABLE_ID: TableId = TableId::MethodPtr;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodPtrRaw {
            rid,
            token: Token::new(0x0500_0000 + rid),
            offset: *offset,
            method: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}
