use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::codec::ObjectReader;
use crate::messages::Message;
use crate::schema::Registry;
use crate::types::Value;
use crate::{Result, TimingError};

/// Reads messages back from a recording.
///
/// The reader stops at the end sentinel or at a clean end of input. After an
/// error the iterator is exhausted.
pub struct RecordedReader<R> {
    reader: ObjectReader<R>,
    finished: bool,
    read: u64,
}

impl RecordedReader<BufReader<File>> {
    /// Opens a recording file.
    pub fn open<P: AsRef<Path>>(path: P, registry: Arc<Registry>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TimingError::file_error(path.to_path_buf(), e))?;
        info!("Opened recording {}", path.display());
        Ok(Self::new(BufReader::new(file), registry))
    }
}

impl<R: Read> RecordedReader<R> {
    pub fn new(inner: R, registry: Arc<Registry>) -> Self {
        Self { reader: ObjectReader::new(inner, registry), finished: false, read: 0 }
    }

    /// Reads the next message, or `None` once the recording has ended.
    pub fn read(&mut self) -> Result<Option<Message>> {
        if self.finished {
            return Ok(None);
        }
        match self.reader.read_next()? {
            None | Some(Value::Empty) => {
                self.finished = true;
                debug!("Recording ended after {} messages", self.read);
                Ok(None)
            }
            Some(value) => {
                let message = Message::from_value(&value)?;
                self.read += 1;
                Ok(Some(message))
            }
        }
    }

    /// Messages read so far.
    pub fn messages_read(&self) -> u64 {
        self.read
    }
}

impl<R: Read> Iterator for RecordedReader<R> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(message) => message.map(Ok),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
