//! Conversions between field types and codec values.

use std::sync::Arc;

use super::Record;
use crate::types::{
    Decimal, DriverStatus, Gap, GridColumn, GridColumnColour, LapGap, Rank, SessionStatus,
    SessionType, TimeGap, TimeSpan, TimedResult, Timestamp, Value,
};
use crate::{Result, TimingError};

/// A type that can be stored in a record field.
///
/// Integer fields accept any integer width whose value fits, because the
/// writer narrows integers to the smallest width that can hold them.
pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! integer_field {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: Value) -> Result<Self> {
                    value
                        .as_i128()
                        .and_then(|v| $ty::try_from(v).ok())
                        .ok_or_else(|| TimingError::type_mismatch(stringify!($ty), value.kind_name()))
                }
            }
        )*
    };
}

integer_field! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

macro_rules! exact_field {
    ($($ty:ty => $variant:ident as $expected:literal),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(TimingError::type_mismatch($expected, other.kind_name())),
                    }
                }
            }
        )*
    };
}

exact_field! {
    bool => Bool as "bool",
    char => Char as "char",
    f32 => F32 as "f32",
    String => String as "string",
    Decimal => Decimal as "decimal",
    TimeSpan => TimeSpan as "time span",
    Timestamp => Timestamp as "timestamp",
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::F64(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::F32(v) => Ok(v.into()),
            other => other
                .as_i128()
                .map(|v| v as f64)
                .ok_or_else(|| TimingError::type_mismatch("f64", other.kind_name())),
        }
    }
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Empty,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Empty | Value::DbNull => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! enum_field {
    ($($ty:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::I32(self.code())
                }

                fn from_value(value: Value) -> Result<Self> {
                    i32::from_value(value).and_then($ty::from_code)
                }
            }
        )*
    };
}

enum_field!(SessionType, SessionStatus, DriverStatus, GridColumn, GridColumnColour, Rank);

/// Wraps a record in an object value.
pub(crate) fn record_value<T: Record>(record: &T) -> Value {
    Value::Object(Arc::new(record.clone()))
}

/// Clones a record of the expected type out of an object value.
pub(crate) fn record_from_value<T: Record>(value: &Value) -> Result<T> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| TimingError::type_mismatch(T::TYPE_NAME, value.kind_name()))
}

macro_rules! record_field {
    ($($ty:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    record_value(self)
                }

                fn from_value(value: Value) -> Result<Self> {
                    record_from_value(&value)
                }
            }
        )*
    };
}

record_field!(TimedResult, TimeGap, LapGap);

impl FieldValue for Gap {
    fn to_value(&self) -> Value {
        match self {
            Gap::Time(gap) => record_value(gap),
            Gap::Laps(gap) => record_value(gap),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        if let Some(gap) = value.downcast_ref::<TimeGap>() {
            return Ok(Gap::Time(*gap));
        }
        if let Some(gap) = value.downcast_ref::<LapGap>() {
            return Ok(Gap::Laps(*gap));
        }
        Err(TimingError::type_mismatch("gap", value.kind_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowed_integers_widen_back() {
        assert_eq!(i32::from_value(Value::U8(200)).ok(), Some(200));
        assert_eq!(i64::from_value(Value::I16(-3)).ok(), Some(-3));
        assert_eq!(u32::from_value(Value::U8(7)).ok(), Some(7));
    }

    #[test]
    fn out_of_range_integers_are_mismatches() {
        assert!(matches!(u8::from_value(Value::I16(-1)), Err(TimingError::TypeMismatch { .. })));
        assert!(matches!(i8::from_value(Value::U8(200)), Err(TimingError::TypeMismatch { .. })));
        assert!(i32::from_value(Value::String("1".into())).is_err());
    }

    #[test]
    fn options_map_empty_to_none() {
        assert_eq!(Option::<String>::from_value(Value::Empty).ok(), Some(None));
        assert_eq!(Option::<String>::None.to_value(), Value::Empty);
        assert_eq!(Some(5i32).to_value(), Value::I32(5));
    }

    #[test]
    fn enums_travel_as_codes() {
        assert_eq!(GridColumn::Q2.to_value(), Value::I32(11));
        assert_eq!(GridColumn::from_value(Value::U8(11)).ok(), Some(GridColumn::Q2));
        assert!(matches!(Rank::from_value(Value::U8(9)), Err(TimingError::Domain { .. })));
    }

    #[test]
    fn gaps_round_trip_through_both_shapes() {
        let laps = Gap::laps(2).expect("valid gap");
        let time = Gap::time(TimeSpan::from_millis(1_250)).expect("valid gap");

        assert_eq!(Gap::from_value(laps.to_value()).ok(), Some(laps));
        assert_eq!(Gap::from_value(time.to_value()).ok(), Some(time));
        assert!(Gap::from_value(Value::I32(3)).is_err());
    }
}
