use crate::metadata::token::Token;

/// A row of the `MethodPtr` table.
#[derive(Clone, Debug)]
pub struct MethodPtrRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x05000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// The `MethodDef` row this entry stands for
    pub method: u32,
}
