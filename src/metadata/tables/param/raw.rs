use crate::metadata::token::Token;

/// A row of the `Param` table.
#[derive(Clone, Debug)]
pub struct ParamRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x08000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// `ParamAttributes` bitmask
    pub flags: u32,
    /// Position in the signature, `0` is the return value
    pub sequence: u32,
    /// Index into the `#Strings` heap
    pub name: u32,
}
