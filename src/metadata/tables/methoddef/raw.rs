use crate::metadata::{method::MethodAccessFlags, token::Token};

/// A row of the `MethodDef` table, with heap indexes left unresolved.
#[derive(Clone, Debug)]
pub struct MethodDefRaw {
    /// Row identifier (1-based)
    pub rid: u32,
    /// Metadata token, `0x06000000 + rid`
    pub token: Token,
    /// Byte offset of this row within the table
    pub offset: usize,
    /// RVA of the method body, `0` for abstract and extern methods
    pub rva: u32,
    /// `MethodImplAttributes` bitmask
    pub impl_flags: u32,
    /// `MethodAttributes` bitmask
    pub flags: u32,
    /// Index into the `#Strings` heap
    pub name: u32,
    /// Index into the `#Blob` heap
    pub signature: u32,
    /// First row of the `Param` table owned by this method
    pub param_list: u32,
}

impl MethodDefRaw {
    /// The member access of this method
    #[must_use]
    pub fn access(&self) -> MethodAccessFlags {
        MethodAccessFlags::from_method_flags(self.flags)
    }
}
