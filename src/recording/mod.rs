//! Recorded message logs.
//!
//! A recording is a plain sequence of encoded message objects terminated by a
//! single `Empty` value. Pauses in the source feed are kept as
//! [`SetNextMessageDelay`](crate::messages::SetNextMessageDelay) messages
//! written just before the message that followed the pause.
//!
//! ```rust
//! use std::sync::Arc;
//! use livetiming::messages::{Message, SetDriverPosition};
//! use livetiming::recording::{RecordedReader, RecordingWriter};
//! use livetiming::schema::Registry;
//! use livetiming::types::TimeSpan;
//!
//! let registry = Arc::new(Registry::standard()?);
//! let mut writer = RecordingWriter::new(Vec::new(), Arc::clone(&registry));
//! writer.write_at(&SetDriverPosition::new(7, 1)?.into(), TimeSpan::ZERO)?;
//! writer.write_at(&SetDriverPosition::new(7, 2)?.into(), TimeSpan::from_secs(3))?;
//! let bytes = writer.finish()?;
//!
//! let messages = RecordedReader::new(bytes.as_slice(), registry)
//!     .collect::<livetiming::Result<Vec<Message>>>()?;
//! assert_eq!(messages.len(), 3);
//! assert_eq!(messages[1].name(), "SetNextMessageDelay");
//! # Ok::<(), livetiming::TimingError>(())
//! ```

mod reader;
mod writer;

pub use reader::RecordedReader;
pub use writer::{MIN_RECORDED_DELAY, RecordingWriter};
