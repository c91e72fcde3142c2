//! One-byte type markers that prefix every encoded value.

use crate::types::Value;

/// Type marker written before each value.
///
/// Code 17 is unassigned and is rejected like any other unknown byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeCode {
    Empty = 0,
    Object = 1,
    DbNull = 2,
    Bool = 3,
    Char = 4,
    I8 = 5,
    U8 = 6,
    I16 = 7,
    U16 = 8,
    I32 = 9,
    U32 = 10,
    I64 = 11,
    U64 = 12,
    F32 = 13,
    F64 = 14,
    Decimal = 15,
    Timestamp = 16,
    String = 18,
    TimeSpan = 19,
}

impl TypeCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => TypeCode::Empty,
            1 => TypeCode::Object,
            2 => TypeCode::DbNull,
            3 => TypeCode::Bool,
            4 => TypeCode::Char,
            5 => TypeCode::I8,
            6 => TypeCode::U8,
            7 => TypeCode::I16,
            8 => TypeCode::U16,
            9 => TypeCode::I32,
            10 => TypeCode::U32,
            11 => TypeCode::I64,
            12 => TypeCode::U64,
            13 => TypeCode::F32,
            14 => TypeCode::F64,
            15 => TypeCode::Decimal,
            16 => TypeCode::Timestamp,
            18 => TypeCode::String,
            19 => TypeCode::TimeSpan,
            _ => return None,
        })
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Marker for a value before integer narrowing is applied.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Empty => TypeCode::Empty,
            Value::DbNull => TypeCode::DbNull,
            Value::Bool(_) => TypeCode::Bool,
            Value::Char(_) => TypeCode::Char,
            Value::I8(_) => TypeCode::I8,
            Value::U8(_) => TypeCode::U8,
            Value::I16(_) => TypeCode::I16,
            Value::U16(_) => TypeCode::U16,
            Value::I32(_) => TypeCode::I32,
            Value::U32(_) => TypeCode::U32,
            Value::I64(_) => TypeCode::I64,
            Value::U64(_) => TypeCode::U64,
            Value::F32(_) => TypeCode::F32,
            Value::F64(_) => TypeCode::F64,
            Value::Decimal(_) => TypeCode::Decimal,
            Value::Timestamp(_) => TypeCode::Timestamp,
            Value::TimeSpan(_) => TypeCode::TimeSpan,
            Value::String(_) => TypeCode::String,
            Value::Object(_) => TypeCode::Object,
        }
    }

    /// Smallest marker able to hold a signed integer.
    pub fn narrow_signed(value: i64) -> Self {
        if (0..=u8::MAX as i64).contains(&value) {
            TypeCode::U8
        } else if i16::try_from(value).is_ok() {
            TypeCode::I16
        } else if i32::try_from(value).is_ok() {
            TypeCode::I32
        } else {
            TypeCode::I64
        }
    }

    /// Smallest marker able to hold an unsigned integer.
    pub fn narrow_unsigned(value: u64) -> Self {
        if value <= u8::MAX as u64 {
            TypeCode::U8
        } else if value <= u16::MAX as u64 {
            TypeCode::U16
        } else if value <= u32::MAX as u64 {
            TypeCode::U32
        } else {
            TypeCode::U64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_round_trips_through_its_byte() {
        for byte in 0..=u8::MAX {
            if let Some(code) = TypeCode::from_byte(byte) {
                assert_eq!(code.as_byte(), byte);
            }
        }
        assert_eq!(TypeCode::from_byte(17), None);
        assert_eq!(TypeCode::from_byte(20), None);
    }

    #[test]
    fn signed_values_narrow_to_smallest_width() {
        assert_eq!(TypeCode::narrow_signed(0), TypeCode::U8);
        assert_eq!(TypeCode::narrow_signed(255), TypeCode::U8);
        assert_eq!(TypeCode::narrow_signed(256), TypeCode::I16);
        assert_eq!(TypeCode::narrow_signed(-1), TypeCode::I16);
        assert_eq!(TypeCode::narrow_signed(i16::MIN as i64 - 1), TypeCode::I32);
        assert_eq!(TypeCode::narrow_signed(i64::MAX), TypeCode::I64);
    }

    #[test]
    fn unsigned_values_narrow_to_smallest_width() {
        assert_eq!(TypeCode::narrow_unsigned(200), TypeCode::U8);
        assert_eq!(TypeCode::narrow_unsigned(60_000), TypeCode::U16);
        assert_eq!(TypeCode::narrow_unsigned(70_000), TypeCode::U32);
        assert_eq!(TypeCode::narrow_unsigned(u64::MAX), TypeCode::U64);
    }
}
