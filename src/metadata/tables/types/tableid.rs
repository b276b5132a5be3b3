use strum::{EnumCount, EnumIter};

/// Identifiers of the metadata tables in a module's `#~` stream (ECMA-335 II.22).
///
/// The discriminant is the table number used in tokens and in the `valid` bit vector of the
/// tables header. The tables are contiguous from `0x00` to `0x2C`, so the discriminant doubles as
/// an index into per-table arrays.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    /// `Module` table, `0x00`
    Module = 0x00,
    /// `TypeRef` table, `0x01`
    TypeRef = 0x01,
    /// `TypeDef` table, `0x02`
    TypeDef = 0x02,
    /// `FieldPtr` indirection table, `0x03`
    FieldPtr = 0x03,
    /// `Field` table, `0x04`
    Field = 0x04,
    /// `MethodPtr` indirection table, `0x05`
    MethodPtr = 0x05,
    /// `MethodDef` table, `0x06`
    MethodDef = 0x06,
    /// `ParamPtr` indirection table, `0x07`
    ParamPtr = 0x07,
    /// `Param` table, `0x08`
    Param = 0x08,
    /// `InterfaceImpl` table, `0x09`
    InterfaceImpl = 0x09,
    /// `MemberRef` table, `0x0A`
    MemberRef = 0x0A,
    /// `Constant` table, `0x0B`
    Constant = 0x0B,
    /// `CustomAttribute` table, `0x0C`
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table, `0x0D`
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table, `0x0E`
    DeclSecurity = 0x0E,
    /// `ClassLayout` table, `0x0F`
    ClassLayout = 0x0F,
    /// `FieldLayout` table, `0x10`
    FieldLayout = 0x10,
    /// `StandAloneSig` table, `0x11`
    StandAloneSig = 0x11,
    /// `EventMap` table, `0x12`
    EventMap = 0x12,
    /// `EventPtr` indirection table, `0x13`
    EventPtr = 0x13,
    /// `Event` table, `0x14`
    Event = 0x14,
    /// `PropertyMap` table, `0x15`
    PropertyMap = 0x15,
    /// `PropertyPtr` indirection table, `0x16`
    PropertyPtr = 0x16,
    /// `Property` table, `0x17`
    Property = 0x17,
    /// `MethodSemantics` table, `0x18`
    MethodSemantics = 0x18,
    /// `MethodImpl` table, `0x19`
    MethodImpl = 0x19,
    /// `ModuleRef` table, `0x1A`
    ModuleRef = 0x1A,
    /// `TypeSpec` table, `0x1B`
    TypeSpec = 0x1B,
    /// `ImplMap` table, `0x1C`
    ImplMap = 0x1C,
    /// `FieldRVA` table, `0x1D`
    FieldRVA = 0x1D,
    /// `EncLog` table, `0x1E`
    EncLog = 0x1E,
    /// `EncMap` table, `0x1F`
    EncMap = 0x1F,
    /// `Assembly` table, `0x20`
    Assembly = 0x20,
    /// `AssemblyProcessor` table, `0x21`
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table, `0x22`
    AssemblyOS = 0x22,
    /// `AssemblyRef` table, `0x23`
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table, `0x24`
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table, `0x25`
    AssemblyRefOS = 0x25,
    /// `File` table, `0x26`
    File = 0x26,
    /// `ExportedType` table, `0x27`
    ExportedType = 0x27,
    /// `ManifestResource` table, `0x28`
    ManifestResource = 0x28,
    /// `NestedClass` table, `0x29`
    NestedClass = 0x29,
    /// `GenericParam` table, `0x2A`
    GenericParam = 0x2A,
    /// `MethodSpec` table, `0x2B`
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table, `0x2C`
    GenericParamConstraint = 0x2C,
}
