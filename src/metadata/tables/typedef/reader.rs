use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfoRef, TypeDefRaw},
        token::Token,
    },
    Result,
};

impl RowReadable for TypeDefRaw {
    const TABLE_ID: TableId = TableId::TypeDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;

        let flags = read_le_at::<u32>(data, offset)?;
        let type_name = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        let type_namespace = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        let extends = CodedIndex::read(data, offset, sizes, CodedIndexType::TypeDefOrRef)?;
        let field_list = read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?;
        let method_list = read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?;

        Ok(TypeDefRaw {
            rid,
            token: Token::new(0x0200_0000 + rid),
            offset: offset_org,
            flags,
            type_name,
            type_namespace,
            extends,
            field_list,
            method_list,
        })
    }
}
