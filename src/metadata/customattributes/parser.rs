use crate::{
    file::parser::Parser,
    metadata::customattributes::{CustomAttributeArgument, FixedArgType, SERIALIZATION_TYPE},
    Error::{NotSupported, RecursionLimit},
    Result,
};

/// The prolog every custom attribute blob starts with
const CUSTOM_ATTRIBUTE_PROLOG: u16 = 0x0001;
/// Maximum nesting of arrays and boxed values
const MAX_NESTING_DEPTH: usize = 16;

/// Decode all fixed arguments of an attribute blob.
///
/// # Errors
/// Returns an error if the prolog is missing, the blob is truncated, or an argument type is not
/// supported.
pub fn parse_fixed_arguments(
    data: &[u8],
    types: &[FixedArgType],
) -> Result<Vec<CustomAttributeArgument>> {
    let mut parser = CustomAttributeParser::new(data)?;
    types.iter().map(|arg_type| parser.fixed_arg(arg_type)).collect()
}

/// Sequential reader over the fixed arguments of an attribute blob.
///
/// Named arguments are not decoded.
pub struct CustomAttributeParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> CustomAttributeParser<'a> {
    /// Create a parser and consume the prolog
    ///
    /// # Errors
    /// Returns an error if `data` does not start with the prolog `0x0001`.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut parser = Parser::new(data);
        let prolog = parser.read_le::<u16>()?;
        if prolog != CUSTOM_ATTRIBUTE_PROLOG {
            return Err(malformed_error!(
                "Invalid custom attribute prolog - expected 0x0001, got {:#06x}",
                prolog
            ));
        }

        Ok(CustomAttributeParser { parser, depth: 0 })
    }

    /// Read the next fixed argument of type `arg_type`
    ///
    /// # Errors
    /// Returns an error if the blob is truncated or `arg_type` cannot be decoded.
    pub fn fixed_arg(&mut self, arg_type: &FixedArgType) -> Result<CustomAttributeArgument> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        let value = match arg_type {
            FixedArgType::Boolean => {
                CustomAttributeArgument::Bool(self.parser.read_le::<u8>()? != 0)
            }
            FixedArgType::Char => CustomAttributeArgument::Char(self.parser.read_le::<u16>()?),
            FixedArgType::I1 => CustomAttributeArgument::I1(self.parser.read_le::<i8>()?),
            FixedArgType::U1 => CustomAttributeArgument::U1(self.parser.read_le::<u8>()?),
            FixedArgType::I2 => CustomAttributeArgument::I2(self.parser.read_le::<i16>()?),
            FixedArgType::U2 => CustomAttributeArgument::U2(self.parser.read_le::<u16>()?),
            FixedArgType::I4 => CustomAttributeArgument::I4(self.parser.read_le::<i32>()?),
            FixedArgType::U4 => CustomAttributeArgument::U4(self.parser.read_le::<u32>()?),
            FixedArgType::I8 => CustomAttributeArgument::I8(self.parser.read_le::<i64>()?),
            FixedArgType::U8 => CustomAttributeArgument::U8(self.parser.read_le::<u64>()?),
            FixedArgType::R4 => CustomAttributeArgument::R4(self.parser.read_le::<f32>()?),
            FixedArgType::R8 => CustomAttributeArgument::R8(self.parser.read_le::<f64>()?),
            FixedArgType::String => CustomAttributeArgument::String(self.ser_string()?),
            FixedArgType::SystemType => CustomAttributeArgument::Type(self.ser_string()?),
            FixedArgType::Enum => CustomAttributeArgument::Enum(Box::new(
                CustomAttributeArgument::I4(self.parser.read_le::<i32>()?),
            )),
            FixedArgType::SzArray(element) => {
                let count = self.parser.read_le::<u32>()?;
                if count == u32::MAX {
                    CustomAttributeArgument::Array(None)
                } else {
                    let mut elements = Vec::with_capacity(count.min(256) as usize);
                    for _ in 0..count {
                        elements.push(self.fixed_arg(element)?);
                    }
                    CustomAttributeArgument::Array(Some(elements))
                }
            }
            FixedArgType::Object => {
                let tag = self.parser.read_le::<u8>()?;
                let boxed_type = self.tagged_type(tag)?;
                self.fixed_arg(&boxed_type)?
            }
            FixedArgType::Unsupported => return Err(NotSupported),
        };

        self.depth -= 1;
        Ok(value)
    }

    fn ser_string(&mut self) -> Result<Option<String>> {
        Ok(self.parser.read_ser_string()?.map(str::to_string))
    }

    fn tagged_type(&mut self, tag: u8) -> Result<FixedArgType> {
        let arg_type = match tag {
            SERIALIZATION_TYPE::BOOLEAN => FixedArgType::Boolean,
            SERIALIZATION_TYPE::CHAR => FixedArgType::Char,
            SERIALIZATION_TYPE::I1 => FixedArgType::I1,
            SERIALIZATION_TYPE::U1 => FixedArgType::U1,
            SERIALIZATION_TYPE::I2 => FixedArgType::I2,
            SERIALIZATION_TYPE::U2 => FixedArgType::U2,
            SERIALIZATION_TYPE::I4 => FixedArgType::I4,
            SERIALIZATION_TYPE::U4 => FixedArgType::U4,
            SERIALIZATION_TYPE::I8 => FixedArgType::I8,
            SERIALIZATION_TYPE::U8 => FixedArgType::U8,
            SERIALIZATION_TYPE::R4 => FixedArgType::R4,
            SERIALIZATION_TYPE::R8 => FixedArgType::R8,
            SERIALIZATION_TYPE::STRING => FixedArgType::String,
            SERIALIZATION_TYPE::TYPE => FixedArgType::SystemType,
            SERIALIZATION_TYPE::TAGGED_OBJECT => FixedArgType::Object,
            SERIALIZATION_TYPE::ENUM => {
                // The enum type name precedes the value
                self.parser.read_ser_string()?;
                FixedArgType::Enum
            }
            SERIALIZATION_TYPE::SZARRAY => {
                let element_tag = self.parser.read_le::<u8>()?;
                FixedArgType::SzArray(Box::new(self.tagged_type(element_tag)?))
            }
            _ => {
                return Err(malformed_error!(
                    "Invalid custom attribute type tag - {:#04x}",
                    tag
                ))
            }
        };

        Ok(arg_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_prolog() {
        assert!(CustomAttributeParser::new(&[0x02, 0x00]).is_err());
        assert!(CustomAttributeParser::new(&[0x01]).is_err());
        assert!(parse_fixed_arguments(&[0x01, 0x00], &[]).unwrap().is_empty());
    }

    #[test]
    fn primitives_and_strings() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x01,                               // true
            0x2A, 0x00, 0x00, 0x00,             // 42
            0x03, b'a', b'b', b'c',             // "abc"
            0xFF,                               // null string
            0x00, 0x00,                         // no named args
        ];

        let args = parse_fixed_arguments(
            &blob,
            &[
                FixedArgType::Boolean,
                FixedArgType::I4,
                FixedArgType::String,
                FixedArgType::String,
            ],
        )
        .unwrap();

        assert_eq!(
            args,
            vec![
                CustomAttributeArgument::Bool(true),
                CustomAttributeArgument::I4(42),
                CustomAttributeArgument::String(Some("abc".to_string())),
                CustomAttributeArgument::String(None),
            ]
        );
    }

    #[test]
    fn type_after_skipped_arguments() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x07, 0x00, 0x00, 0x00,             // enum value
            0x02, 0x00, 0x00, 0x00,             // int[] length
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x51, 0x08, 0x05, 0x00, 0x00, 0x00, // boxed int
            0x0C, b'N', b'.', b'C', b'+', b'<', b'R', b'>', b'd', b'_', b'_', b'0', b',',
        ];

        let mut parser = CustomAttributeParser::new(&blob).unwrap();
        assert_eq!(
            parser.fixed_arg(&FixedArgType::Enum).unwrap(),
            CustomAttributeArgument::Enum(Box::new(CustomAttributeArgument::I4(7)))
        );
        assert_eq!(
            parser
                .fixed_arg(&FixedArgType::SzArray(Box::new(FixedArgType::I4)))
                .unwrap(),
            CustomAttributeArgument::Array(Some(vec![
                CustomAttributeArgument::I4(1),
                CustomAttributeArgument::I4(2)
            ]))
        );
        assert_eq!(
            parser.fixed_arg(&FixedArgType::Object).unwrap(),
            CustomAttributeArgument::I4(5)
        );
        assert_eq!(
            parser.fixed_arg(&FixedArgType::SystemType).unwrap(),
            CustomAttributeArgument::Type(Some("N.C+<R>d__0,".to_string()))
        );
    }

    #[test]
    fn unsupported_and_truncated() {
        let blob = [0x01, 0x00, 0x01, 0x02];
        assert!(matches!(
            parse_fixed_arguments(&blob, &[FixedArgType::Unsupported]),
            Err(NotSupported)
        ));
        assert!(parse_fixed_arguments(&blob, &[FixedArgType::I8]).is_err());
        assert!(parse_fixed_arguments(&[0x01, 0x00, 0x05, b'a'], &[FixedArgType::SystemType])
            .is_err());
        assert!(parse_fixed_arguments(&[0x01, 0x00, 0x51, 0x99], &[FixedArgType::Object]).is_err());
    }
}
