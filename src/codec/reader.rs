//! Value reader.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};
use std::sync::Arc;
use tracing::trace;

use super::TypeCode;
use crate::schema::Registry;
use crate::types::{Decimal, TimeSpan, Timestamp, Value};
use crate::{Result, TimingError};

/// Maps an I/O failure to an end-of-stream error when the input ran out.
fn eof(context: &'static str) -> impl FnOnce(io::Error) -> TimingError {
    move |err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            TimingError::UnexpectedEof { context }
        } else {
            err.into()
        }
    }
}

/// Deepest object nesting a reader accepts.
pub const MAX_DEPTH: usize = 64;

/// Reads values from a byte source.
///
/// Unknown type tags fail the read. Unknown field tags inside a known type are
/// decoded and discarded so older readers accept newer recordings. Objects
/// nested more than [`MAX_DEPTH`] levels deep fail the read.
pub struct ObjectReader<R> {
    inner: R,
    registry: Arc<Registry>,
    depth: usize,
}

impl<R: Read> ObjectReader<R> {
    pub fn new(inner: R, registry: Arc<Registry>) -> Self {
        Self { inner, registry, depth: 0 }
    }

    /// Decodes one value. Running out of input at any point is an error.
    pub fn read(&mut self) -> Result<Value> {
        let code = self.inner.read_u8().map_err(eof("type code"))?;
        self.read_payload(code)
    }

    /// Decodes the next value, or returns `None` when the input ends cleanly
    /// on a value boundary.
    pub fn read_next(&mut self) -> Result<Option<Value>> {
        let mut code = [0u8; 1];
        loop {
            match self.inner.read(&mut code) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        self.read_payload(code[0]).map(Some)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_payload(&mut self, byte: u8) -> Result<Value> {
        let code = TypeCode::from_byte(byte)
            .ok_or(TimingError::InvalidTypeCode { code: byte, context: "value" })?;

        let value = match code {
            TypeCode::Empty => Value::Empty,
            TypeCode::DbNull => Value::DbNull,
            TypeCode::Object => self.read_object()?,
            TypeCode::Bool => Value::Bool(self.inner.read_u8().map_err(eof("bool"))? != 0),
            TypeCode::Char => Value::Char(self.read_char()?),
            TypeCode::I8 => Value::I8(self.inner.read_i8().map_err(eof("i8"))?),
            TypeCode::U8 => Value::U8(self.inner.read_u8().map_err(eof("u8"))?),
            TypeCode::I16 => Value::I16(self.inner.read_i16::<LittleEndian>().map_err(eof("i16"))?),
            TypeCode::U16 => Value::U16(self.inner.read_u16::<LittleEndian>().map_err(eof("u16"))?),
            TypeCode::I32 => Value::I32(self.inner.read_i32::<LittleEndian>().map_err(eof("i32"))?),
            TypeCode::U32 => Value::U32(self.inner.read_u32::<LittleEndian>().map_err(eof("u32"))?),
            TypeCode::I64 => Value::I64(self.inner.read_i64::<LittleEndian>().map_err(eof("i64"))?),
            TypeCode::U64 => Value::U64(self.inner.read_u64::<LittleEndian>().map_err(eof("u64"))?),
            TypeCode::F32 => Value::F32(self.inner.read_f32::<LittleEndian>().map_err(eof("f32"))?),
            TypeCode::F64 => Value::F64(self.inner.read_f64::<LittleEndian>().map_err(eof("f64"))?),
            TypeCode::Decimal => Value::Decimal(self.read_decimal()?),
            TypeCode::Timestamp => Value::Timestamp(Timestamp::from_ticks(
                self.inner.read_i64::<LittleEndian>().map_err(eof("timestamp"))?,
            )),
            TypeCode::TimeSpan => Value::TimeSpan(TimeSpan::from_ticks(
                self.inner.read_i64::<LittleEndian>().map_err(eof("time span"))?,
            )),
            TypeCode::String => Value::String(self.read_string()?),
        };
        Ok(value)
    }

    fn read_object(&mut self) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(TimingError::NestingTooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let object = self.read_object_fields();
        self.depth -= 1;
        object
    }

    fn read_object_fields(&mut self) -> Result<Value> {
        let tag = self.inner.read_i32::<LittleEndian>().map_err(eof("type tag"))?;
        let shape = Arc::clone(self.registry.lookup(tag)?);
        let field_count = self.inner.read_u8().map_err(eof("field count"))?;
        trace!("Reading {} (tag {}, {} fields)", shape.type_name(), tag, field_count);

        let mut instance = shape.instantiate();
        for _ in 0..field_count {
            let field_tag = self.inner.read_u8().map_err(eof("field tag"))?;
            let value = self.read()?;
            match shape.field_index(field_tag) {
                Some(index) => shape.set(instance.as_mut(), index, value)?,
                None => trace!("Skipping unknown field {} on {}", field_tag, shape.type_name()),
            }
        }

        Ok(Value::Object(shape.complete(instance)?))
    }

    fn read_char(&mut self) -> Result<char> {
        let mut buf = [0u8; 4];
        buf[0] = self.inner.read_u8().map_err(eof("char"))?;
        let width = match buf[0] {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            other => {
                return Err(TimingError::type_mismatch("UTF-8 char", format!("lead byte {other:#x}")));
            }
        };
        self.inner.read_exact(&mut buf[1..width]).map_err(eof("char"))?;
        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| TimingError::type_mismatch("UTF-8 char", format!("{:?}", &buf[..width])))
    }

    fn read_decimal(&mut self) -> Result<Decimal> {
        let mut parts = [0u32; 4];
        for part in &mut parts {
            *part = self.inner.read_u32::<LittleEndian>().map_err(eof("decimal"))?;
        }
        let [lo, mid, hi, flags] = parts;
        let magnitude = i128::from(lo) | i128::from(mid) << 32 | i128::from(hi) << 64;
        let mantissa = if flags & (1 << 31) != 0 { -magnitude } else { magnitude };
        Decimal::new(mantissa, ((flags >> 16) & 0xFF) as u8)
    }

    fn read_string(&mut self) -> Result<String> {
        let mut length = 0u64;
        let mut shift = 0;
        loop {
            let byte = self.inner.read_u8().map_err(eof("string length"))?;
            length |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift >= 64 {
                return Err(TimingError::type_mismatch("string length", "overlong varint"));
            }
        }

        let mut bytes = Vec::new();
        (&mut self.inner).take(length).read_to_end(&mut bytes)?;
        if (bytes.len() as u64) < length {
            return Err(TimingError::UnexpectedEof { context: "string" });
        }
        String::from_utf8(bytes)
            .map_err(|err| TimingError::type_mismatch("UTF-8 string", err.to_string()))
    }
}
