//! Value writer.

use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use tracing::trace;

use super::TypeCode;
use crate::schema::{Object, Registry};
use crate::types::{Decimal, Value};
use crate::{Result, TimingError};

/// Writes values to a byte sink.
///
/// Each call to [`ObjectWriter::write`] tracks the objects it has visited. An
/// object reached twice within one call is reported as a cyclic graph; the set
/// is cleared between calls, so the same graph can be written any number of
/// times in sequence.
pub struct ObjectWriter<W> {
    inner: W,
    registry: Arc<Registry>,
    seen: HashSet<usize>,
}

impl<W: Write> ObjectWriter<W> {
    pub fn new(inner: W, registry: Arc<Registry>) -> Self {
        Self { inner, registry, seen: HashSet::new() }
    }

    /// Encodes one value.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        let result = self.write_value(value);
        self.seen.clear();
        result
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::I8(v) => {
                self.write_code(TypeCode::I8)?;
                self.inner.write_i8(*v)?;
            }
            Value::U8(v) => {
                self.write_code(TypeCode::U8)?;
                self.inner.write_u8(*v)?;
            }
            Value::I16(v) => self.write_signed((*v).into())?,
            Value::I32(v) => self.write_signed((*v).into())?,
            Value::I64(v) => self.write_signed(*v)?,
            Value::U16(v) => self.write_unsigned((*v).into())?,
            Value::U32(v) => self.write_unsigned((*v).into())?,
            Value::U64(v) => self.write_unsigned(*v)?,
            Value::Empty | Value::DbNull => self.write_code(TypeCode::of(value))?,
            Value::Bool(v) => {
                self.write_code(TypeCode::Bool)?;
                self.inner.write_u8(u8::from(*v))?;
            }
            Value::Char(v) => {
                self.write_code(TypeCode::Char)?;
                let mut buf = [0u8; 4];
                self.inner.write_all(v.encode_utf8(&mut buf).as_bytes())?;
            }
            Value::F32(v) => {
                self.write_code(TypeCode::F32)?;
                self.inner.write_f32::<LittleEndian>(*v)?;
            }
            Value::F64(v) => {
                self.write_code(TypeCode::F64)?;
                self.inner.write_f64::<LittleEndian>(*v)?;
            }
            Value::Decimal(v) => {
                self.write_code(TypeCode::Decimal)?;
                self.write_decimal(v)?;
            }
            Value::Timestamp(v) => {
                self.write_code(TypeCode::Timestamp)?;
                self.inner.write_i64::<LittleEndian>(v.ticks())?;
            }
            Value::TimeSpan(v) => {
                self.write_code(TypeCode::TimeSpan)?;
                self.inner.write_i64::<LittleEndian>(v.ticks())?;
            }
            Value::String(v) => {
                self.write_code(TypeCode::String)?;
                self.write_string(v)?;
            }
            Value::Object(object) => self.write_object(object)?,
        }
        Ok(())
    }

    fn write_code(&mut self, code: TypeCode) -> Result<()> {
        self.inner.write_u8(code.as_byte())?;
        Ok(())
    }

    fn write_signed(&mut self, value: i64) -> Result<()> {
        let code = TypeCode::narrow_signed(value);
        self.write_code(code)?;
        // narrow_signed guarantees each cast below is lossless
        match code {
            TypeCode::U8 => self.inner.write_u8(value as u8)?,
            TypeCode::I16 => self.inner.write_i16::<LittleEndian>(value as i16)?,
            TypeCode::I32 => self.inner.write_i32::<LittleEndian>(value as i32)?,
            _ => self.inner.write_i64::<LittleEndian>(value)?,
        }
        Ok(())
    }

    fn write_unsigned(&mut self, value: u64) -> Result<()> {
        let code = TypeCode::narrow_unsigned(value);
        self.write_code(code)?;
        match code {
            TypeCode::U8 => self.inner.write_u8(value as u8)?,
            TypeCode::U16 => self.inner.write_u16::<LittleEndian>(value as u16)?,
            TypeCode::U32 => self.inner.write_u32::<LittleEndian>(value as u32)?,
            _ => self.inner.write_u64::<LittleEndian>(value)?,
        }
        Ok(())
    }

    fn write_decimal(&mut self, value: &Decimal) -> Result<()> {
        let magnitude = value.mantissa().unsigned_abs();
        let mut flags = u32::from(value.scale()) << 16;
        if value.mantissa() < 0 {
            flags |= 1 << 31;
        }
        self.inner.write_u32::<LittleEndian>(magnitude as u32)?;
        self.inner.write_u32::<LittleEndian>((magnitude >> 32) as u32)?;
        self.inner.write_u32::<LittleEndian>((magnitude >> 64) as u32)?;
        self.inner.write_u32::<LittleEndian>(flags)?;
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        let mut length = value.len() as u64;
        while length >= 0x80 {
            self.inner.write_u8((length as u8) | 0x80)?;
            length >>= 7;
        }
        self.inner.write_u8(length as u8)?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }

    fn write_object(&mut self, object: &Arc<dyn Object>) -> Result<()> {
        let identity = Arc::as_ptr(object) as *const () as usize;
        if !self.seen.insert(identity) {
            return Err(TimingError::CyclicGraph { type_name: object.type_name() });
        }

        let shape = Arc::clone(self.registry.shape_of(object.as_ref())?);
        trace!("Writing {} (tag {})", shape.type_name(), shape.type_tag());

        self.write_code(TypeCode::Object)?;
        self.inner.write_i32::<LittleEndian>(shape.type_tag())?;
        // Registration caps field counts at u8::MAX
        self.inner.write_u8(shape.fields().len() as u8)?;
        for (index, field) in shape.fields().iter().enumerate() {
            self.inner.write_u8(field.tag)?;
            let value = shape.get(object.as_ref(), index)?;
            self.write_value(&value)?;
        }
        Ok(())
    }
}
