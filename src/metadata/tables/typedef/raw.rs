use crate::metadata::{tables::CodedIndex, token::Token};

/// Visibility mask of `TypeAttributes`
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;
/// `TypeAttributes.Interface`
pub const TYPE_INTERFACE: u32 = 0x0000_0020;

/// A row of the `TypeDef` table, with heap indexes left unresolved.
#[derive(Clone, Debug)]
pub struct TypeDefRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x02000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// `TypeAttributes` bitmask
    pub flags: u32,
    /// Index into the `#Strings` heap
    pub type_name: u32,
    /// Index into the `#Strings` heap
    pub type_namespace: u32,
    /// `TypeDefOrRef` coded index of the base type, null for `System.Object` and interfaces
    pub extends: CodedIndex,
    /// First row of the `Field` (or `FieldPtr`) table owned by this type
    pub field_list: u32,
    /// First row of the `MethodDef` (or `MethodPtr`) table owned by this type
    pub method_list: u32,
}

impl TypeDefRaw {
    /// Whether this type is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags & TYPE_INTERFACE != 0
    }
}
