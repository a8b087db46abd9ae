//! Property data types.

use crate::token::closed_set;

closed_set!(
    /// The declared data type of a property value.
    DataType, "data type" {
        Char => "char",
        Uchar => "uchar",
        Short => "short",
        Ushort => "ushort",
        Int => "int",
        Uint => "uint",
        Float => "float",
        Bool => "bool",
        String => "string",
        Enum => "enum",
        Date => "date",
        Time => "time",
        DateTime => "datetime",
        Color => "color",
        Button => "button",
        Switch => "switch",
        Unknown => "unknown",
    }
);

impl DataType {
    /// Inclusive bounds for the integer kinds, `None` for everything else.
    #[must_use]
    pub fn integer_bounds(self) -> Option<(i64, i64)> {
        match self {
            Self::Char => Some((i64::from(i8::MIN), i64::from(i8::MAX))),
            Self::Uchar => Some((0, i64::from(u8::MAX))),
            Self::Short => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
            Self::Ushort => Some((0, i64::from(u16::MAX))),
            Self::Int => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
            Self::Uint => Some((0, i64::from(u32::MAX))),
            _ => None,
        }
    }
}
