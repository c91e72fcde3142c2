//! Dynamically typed values handled by the binary codec.

use std::fmt;
use std::sync::Arc;

use super::{TimeSpan, Timestamp};
use crate::schema::Object;
use crate::{Result, TimingError};

/// A 96-bit signed decimal with a base-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

impl Decimal {
    /// Largest representable mantissa magnitude (96 bits).
    pub const MAX_MANTISSA: i128 = (1i128 << 96) - 1;
    pub const MAX_SCALE: u8 = 28;

    pub fn new(mantissa: i128, scale: u8) -> Result<Self> {
        if mantissa.unsigned_abs() > Self::MAX_MANTISSA as u128 {
            return Err(TimingError::domain("decimal", "mantissa exceeds 96 bits"));
        }
        if scale > Self::MAX_SCALE {
            return Err(TimingError::domain("decimal", format!("scale {scale} exceeds 28")));
        }
        Ok(Self { mantissa, scale })
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{whole}.{fraction}")
    }
}

/// A value as it appears on the wire.
///
/// Integers compare equal across widths when they hold the same number, since
/// the writer narrows integers to the smallest width that fits.
#[derive(Debug, Clone)]
pub enum Value {
    Empty,
    DbNull,
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Timestamp(Timestamp),
    TimeSpan(TimeSpan),
    String(String),
    Object(Arc<dyn Object>),
}

impl Value {
    /// Short name of the variant, used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::DbNull => "db-null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::U8(_) => "u8",
            Value::I16(_) => "i16",
            Value::U16(_) => "u16",
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Decimal(_) => "decimal",
            Value::Timestamp(_) => "timestamp",
            Value::TimeSpan(_) => "time span",
            Value::String(_) => "string",
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Integer payload widened to `i128`, or `None` for non-integers.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::I8(v) => Some(v.into()),
            Value::U8(v) => Some(v.into()),
            Value::I16(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            Value::I64(v) => Some(v.into()),
            Value::U64(v) => Some(v.into()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn Object>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrows the object payload as a concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_object().and_then(|object| object.as_any().downcast_ref::<T>())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Empty
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_i128(), other.as_i128()) {
            return a == b;
        }
        match (self, other) {
            (Value::Empty, Value::Empty) | (Value::DbNull, Value::DbNull) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::TimeSpan(a), Value::TimeSpan(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.object_eq(b.as_ref()),
            _ => false,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Timestamp => Timestamp,
    TimeSpan => TimeSpan,
    String => String,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}
