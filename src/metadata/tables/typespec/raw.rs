use crate::metadata::token::Token;

/// A row of the `TypeSpec` table.
#[derive(Clone, Debug)]
pub struct TypeSpecRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x1B000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// Index into the `#Blob` heap
    pub signature: u32,
}
