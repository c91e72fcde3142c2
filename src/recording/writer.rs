use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

use crate::Result;
use crate::codec::ObjectWriter;
use crate::messages::{Message, SetNextMessageDelay};
use crate::schema::Registry;
use crate::types::{TimeSpan, Value};

/// Shortest pause worth recording as a delay.
pub const MIN_RECORDED_DELAY: TimeSpan = TimeSpan::from_millis(5);

/// Appends messages to a recording.
pub struct RecordingWriter<W: Write> {
    writer: ObjectWriter<W>,
    started: Instant,
    last: Option<TimeSpan>,
    written: u64,
}

impl<W: Write> RecordingWriter<W> {
    pub fn new(inner: W, registry: Arc<Registry>) -> Self {
        Self { writer: ObjectWriter::new(inner, registry), started: Instant::now(), last: None, written: 0 }
    }

    /// Records a message at the current wall-clock offset.
    pub fn write(&mut self, message: &Message) -> Result<()> {
        let at = TimeSpan::from_std(self.started.elapsed());
        self.write_at(message, at)
    }

    /// Records a message at an explicit offset from the start of the recording.
    ///
    /// Offsets earlier than the previous message record no delay.
    pub fn write_at(&mut self, message: &Message, at: TimeSpan) -> Result<()> {
        if let Some(last) = self.last {
            let delay = at - last;
            if delay >= MIN_RECORDED_DELAY {
                let pause = Message::from(SetNextMessageDelay::new(delay)?);
                self.writer.write(&pause.to_value())?;
            }
        }
        self.last = Some(at);

        trace!("Recording {} at {}", message.name(), at);
        self.writer.write(&message.to_value())?;
        self.written += 1;
        Ok(())
    }

    /// Number of messages recorded, excluding delays.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Writes the end sentinel, flushes and returns the sink.
    pub fn finish(mut self) -> Result<W> {
        self.writer.write(&Value::Empty)?;
        self.writer.flush()?;
        debug!("Recording finished after {} messages", self.written);
        Ok(self.writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ObjectReader;
    use crate::messages::{EndOfSession, SetDriverPosition};

    fn registry() -> Arc<Registry> {
        Arc::new(Registry::standard().expect("standard registry"))
    }

    fn position(driver_id: i32) -> Message {
        SetDriverPosition::new(driver_id, 1).expect("valid").into()
    }

    #[test]
    fn short_pauses_are_not_recorded() {
        let registry = registry();
        let mut writer = RecordingWriter::new(Vec::new(), Arc::clone(&registry));
        writer.write_at(&position(1), TimeSpan::from_secs(10)).expect("write");
        writer.write_at(&position(2), TimeSpan::from_secs(10) + TimeSpan::from_millis(4)).expect("write");
        writer.write_at(&position(3), TimeSpan::from_secs(11)).expect("write");
        assert_eq!(writer.written(), 3);
        let bytes = writer.finish().expect("finish");

        let mut reader = ObjectReader::new(bytes.as_slice(), registry);
        let mut names = Vec::new();
        while let Some(value) = reader.read_next().expect("read") {
            if value.is_empty() {
                break;
            }
            names.push(Message::from_value(&value).expect("message").name());
        }
        assert_eq!(
            names,
            ["SetDriverPosition", "SetDriverPosition", "SetNextMessageDelay", "SetDriverPosition"]
        );
    }

    #[test]
    fn finish_appends_the_sentinel() {
        let mut writer = RecordingWriter::new(Vec::new(), registry());
        writer.write_at(&EndOfSession.into(), TimeSpan::ZERO).expect("write");
        let bytes = writer.finish().expect("finish");
        assert_eq!(bytes.last(), Some(&0u8));
    }

    #[test]
    fn wall_clock_writes_start_without_a_delay() {
        let mut writer = RecordingWriter::new(Vec::new(), registry());
        writer.write(&position(1)).expect("write");
        let bytes = writer.finish().expect("finish");
        let first = crate::codec::decode(&registry(), &bytes).expect("decode");
        assert_eq!(Message::from_value(&first).expect("message").name(), "SetDriverPosition");
    }
}
