use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `CustomAttribute` table, with heap indexes left unresolved.
#[derive(Clone, Debug)]
pub struct CustomAttributeRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x0C000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// `HasCustomAttribute` coded index of the entity carrying the attribute
    pub parent: CodedIndex,
    /// `CustomAttributeType` coded index of the attribute constructor
    pub constructor: CodedIndex,
    /// Index into the `#Blob` heap, `0` if there are no arguments
    pub value: u32,
}
