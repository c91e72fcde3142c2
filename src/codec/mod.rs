//! Binary object codec.
//!
//! Values are written as a one-byte [`TypeCode`] followed by a payload. Objects
//! carry their registered type tag and a tagged field list instead of names:
//!
//! ```text
//! Object := 0x01, i32 type_tag, u8 field_count, field_count x (u8 field_tag, Value)
//! String := 0x12, 7-bit varint byte length, UTF-8 bytes
//! TimeSpan, Timestamp := i64 tick count
//! ```
//!
//! All fixed-width payloads are little-endian. Integers are narrowed to the
//! smallest width that holds them and readers accept any width that fits the
//! target field.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use livetiming::codec::{decode, encode};
//! use livetiming::schema::Registry;
//! use livetiming::types::{Rank, TimeSpan, TimedResult};
//! use livetiming::FieldValue;
//!
//! let registry = Arc::new(Registry::standard()?);
//! let lap = TimedResult::new(TimeSpan::from_millis(91_000), Rank::SessionBest, 7)?;
//!
//! let bytes = encode(&registry, &lap.to_value())?;
//! let decoded = TimedResult::from_value(decode(&registry, &bytes)?)?;
//! assert_eq!(decoded, lap);
//! # Ok::<(), livetiming::TimingError>(())
//! ```

mod reader;
mod type_code;
mod writer;

pub use reader::{MAX_DEPTH, ObjectReader};
pub use type_code::TypeCode;
pub use writer::ObjectWriter;

use std::sync::Arc;

use crate::Result;
use crate::schema::Registry;
use crate::types::Value;

/// Encodes a single value into a fresh buffer.
pub fn encode(registry: &Arc<Registry>, value: &Value) -> Result<Vec<u8>> {
    let mut writer = ObjectWriter::new(Vec::new(), Arc::clone(registry));
    writer.write(value)?;
    Ok(writer.into_inner())
}

/// Decodes the first value in `bytes`.
pub fn decode(registry: &Arc<Registry>, bytes: &[u8]) -> Result<Value> {
    ObjectReader::new(bytes, Arc::clone(registry)).read()
}
