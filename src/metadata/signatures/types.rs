use crate::metadata::token::Token;

#[allow(non_snake_case, dead_code, missing_docs)]
/// Possible bytes that represent various 'Types' for a signature - from coreclr
pub mod ELEMENT_TYPE {
    //Marks end of a list
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    pub const PTR: u8 = 0x0f;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1b;
    pub const OBJECT: u8 = 0x1c;
    pub const SZARRAY: u8 = 0x1d;
    pub const MVAR: u8 = 0x1e;
    pub const CMOD_REQD: u8 = 0x1f;
    pub const CMOD_OPT: u8 = 0x20;
    pub const INTERNAL: u8 = 0x21;
    pub const MODIFIER: u8 = 0x40;
    pub const SENTINEL: u8 = 0x41;
    pub const PINNED: u8 = 0x45;
    // Only in custom attribute blobs
    pub const TYPE: u8 = 0x50;
    pub const BOXED: u8 = 0x51;
    pub const FIELD: u8 = 0x53;
    pub const PROPERTY: u8 = 0x54;
    pub const ENUM: u8 = 0x55;
}

/// A type as it appears in a signature blob
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeSignature {
    #[default]
    /// Not defined
    Unknown,
    /// void
    Void,
    /// bool
    Boolean,
    /// char
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// System.String
    String,
    /// A pointer to a type
    Ptr(Box<TypeSignature>),
    /// Type by reference
    ByRef(Box<TypeSignature>),
    /// CIL value-type
    // TypeDefOrRefOrSpecEncoded
    ValueType(Token),
    /// CIL Class
    // TypeDefOrRefOrSpecEncoded
    Class(Token),
    /// Generic type parameter
    GenericParamType(u32),
    /// Multi dimensional array, bounds are skipped
    Array(Box<TypeSignature>, u32),
    /// Generic type and its arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// Type is referenced during runtime
    TypedByRef,
    /// signed integer, sized to executing platform
    I,
    /// unsigned integer, sized to executing platform
    U,
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    /// System.Object
    Object,
    /// Single dimension array
    SzArray(Box<TypeSignature>),
    /// Generic method parameter
    GenericParamMethod(u32),
    /// Pinned local
    Pinned(Box<TypeSignature>),
}

/// A parameter or the return type of a method signature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureParameter {
    /// Custom modifier tokens
    pub modifiers: Vec<Token>,
    /// Passed by reference
    pub by_ref: bool,
    /// The parameter type
    pub base: TypeSignature,
}

/// A `MethodDefSig` / `MethodRefSig`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureMethod {
    /// `HASTHIS`, an instance method
    pub has_this: bool,
    /// `EXPLICITTHIS`
    pub explicit_this: bool,
    /// `VARARG` calling convention
    pub vararg: bool,
    /// Number of generic parameters
    pub param_count_generic: u32,
    /// Number of declared parameters
    pub param_count: u32,
    /// The return type
    pub return_type: SignatureParameter,
    /// The fixed parameters, in order
    pub params: Vec<SignatureParameter>,
}
