use crate::metadata::signatures::TypeSignature;

/// A decoded custom attribute argument
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument {
    /// bool
    Bool(bool),
    /// char, as UTF-16 code unit
    Char(u16),
    /// signed 8bit integer
    I1(i8),
    /// unsigned 8bit integer
    U1(u8),
    /// signed 16bit integer
    I2(i16),
    /// unsigned 16bit integer
    U2(u16),
    /// signed 32bit integer
    I4(i32),
    /// unsigned 32bit integer
    U4(u32),
    /// signed 64bit integer
    I8(i64),
    /// unsigned 64bit integer
    U8(u64),
    /// 32bit floating-point
    R4(f32),
    /// 64bit floating-point
    R8(f64),
    /// System.String, `None` for a null reference
    String(Option<String>),
    /// System.Type as serialized type name, `None` for a null reference
    Type(Option<String>),
    /// Single dimension array, `None` for a null reference
    Array(Option<Vec<CustomAttributeArgument>>),
    /// Enum value with its underlying integer
    Enum(Box<CustomAttributeArgument>),
}

/// The type of a fixed argument, derived from a constructor parameter.
///
/// Signatures only carry tokens for class and value types, the caller decides whether such a
/// token names `System.Type`, `System.Object` or an enum.
#[derive(Debug, Clone, PartialEq)]
pub enum FixedArgType {
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
    /// System.Type
    SystemType,
    /// System.Object, stored with a type tag
    Object,
    /// An enum, assumed to have a 4 byte underlying type
    Enum,
    /// Single dimension array of the element type
    SzArray(Box<FixedArgType>),
    /// Not representable in an attribute blob
    Unsupported,
}

impl FixedArgType {
    /// Map a signature type to the argument type, classifying class and value type tokens with
    /// `classify`.
    pub fn from_signature<F>(signature: &TypeSignature, classify: &F) -> FixedArgType
    where
        F: Fn(&TypeSignature) -> FixedArgType,
    {
        match signature {
            TypeSignature::Boolean => FixedArgType::Boolean,
            TypeSignature::Char => FixedArgType::Char,
            TypeSignature::I1 => FixedArgType::I1,
            TypeSignature::U1 => FixedArgType::U1,
            TypeSignature::I2 => FixedArgType::I2,
            TypeSignature::U2 => FixedArgType::U2,
            TypeSignature::I4 => FixedArgType::I4,
            TypeSignature::U4 => FixedArgType::U4,
            TypeSignature::I8 => FixedArgType::I8,
            TypeSignature::U8 => FixedArgType::U8,
            TypeSignature::R4 => FixedArgType::R4,
            TypeSignature::R8 => FixedArgType::R8,
            TypeSignature::String => FixedArgType::String,
            TypeSignature::Object => FixedArgType::Object,
            TypeSignature::SzArray(element) => {
                FixedArgType::SzArray(Box::new(FixedArgType::from_signature(element, classify)))
            }
            TypeSignature::Class(_) | TypeSignature::ValueType(_) => classify(signature),
            _ => FixedArgType::Unsupported,
        }
    }
}

#[allow(non_snake_case, missing_docs)]
/// Type tags of boxed arguments and named arguments
pub mod SERIALIZATION_TYPE {
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const TYPE: u8 = 0x50;
    pub const TAGGED_OBJECT: u8 = 0x51;
    pub const ENUM: u8 = 0x55;
    pub const SZARRAY: u8 = 0x1D;
}
