//! Replay provider for recordings

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace};

use crate::Result;
use crate::config::PlaybackConfig;
use crate::messages::Message;
use crate::provider::Provider;
use crate::recording::RecordedReader;
use crate::schema::Registry;
use crate::types::TimeSpan;

/// Replays a recording, pausing where the recording paused.
///
/// Delay messages are consumed here and never reach the engine.
pub struct ReplayProvider<R = BufReader<File>> {
    /// Recording reader
    reader: RecordedReader<R>,

    /// Playback speed multiplier (1.0 = normal, 2.0 = double speed)
    speed: f64,

    /// Whether recorded delays are slept at all
    honour_delays: bool,

    /// Pending pause, kept across cancelled calls
    resume_at: Option<Instant>,

    /// Total recorded delay skipped or slept, unscaled
    recorded_time: TimeSpan,
}

impl ReplayProvider {
    /// Open a recording file for replay
    pub fn open<P: AsRef<Path>>(
        path: P,
        registry: Arc<Registry>,
        config: &PlaybackConfig,
    ) -> Result<Self> {
        let reader = RecordedReader::open(path, registry)?;
        Ok(Self::new(reader, config))
    }
}

impl<R: Read + Send + 'static> ReplayProvider<R> {
    pub fn new(reader: RecordedReader<R>, config: &PlaybackConfig) -> Self {
        info!(
            "Replay at {}x ({})",
            config.speed,
            if config.honour_delays { "paced" } else { "unpaced" }
        );
        Self {
            reader,
            speed: config.speed,
            honour_delays: config.honour_delays,
            resume_at: None,
            recorded_time: TimeSpan::ZERO,
        }
    }

    /// Set playback speed. Applies from the next recorded delay.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.1, 100.0);
        debug!("Playback speed set to {}x", self.speed);
    }

    /// Sum of the recorded delays passed so far
    pub fn recorded_time(&self) -> TimeSpan {
        self.recorded_time
    }

    fn schedule(&mut self, delay: TimeSpan) {
        self.recorded_time += delay;
        if !self.honour_delays {
            return;
        }
        if let Some(pause) = delay.mul_f64(1.0 / self.speed).to_std() {
            trace!("Pausing replay for {:?}", pause);
            self.resume_at = Some(Instant::now() + pause);
        }
    }
}

#[async_trait::async_trait]
impl<R: Read + Send + 'static> Provider for ReplayProvider<R> {
    async fn next_message(&mut self) -> Result<Option<Message>> {
        loop {
            if let Some(deadline) = self.resume_at {
                sleep_until(deadline).await;
                self.resume_at = None;
            }

            match self.reader.read()? {
                Some(Message::SetNextMessageDelay(delay)) => self.schedule(delay.delay()),
                Some(message) => return Ok(Some(message)),
                None => {
                    debug!("Reached end of replay after {} messages", self.reader.messages_read());
                    return Ok(None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::SetKeyframe;
    use crate::recording::RecordingWriter;

    fn recording(gaps_ms: &[i64]) -> Vec<u8> {
        let registry = Arc::new(Registry::standard().expect("standard registry"));
        let mut writer = RecordingWriter::new(Vec::new(), registry);
        let mut at = TimeSpan::ZERO;
        for (index, gap) in gaps_ms.iter().enumerate() {
            at += TimeSpan::from_millis(*gap);
            let keyframe = SetKeyframe::new(index as i32).expect("valid");
            writer.write_at(&keyframe.into(), at).expect("write");
        }
        writer.finish().expect("finish")
    }

    fn provider(bytes: Vec<u8>, config: &PlaybackConfig) -> ReplayProvider<std::io::Cursor<Vec<u8>>> {
        let registry = Arc::new(Registry::standard().expect("standard registry"));
        ReplayProvider::new(RecordedReader::new(std::io::Cursor::new(bytes), registry), config)
    }

    #[tokio::test(start_paused = true)]
    async fn delays_are_scaled_by_speed() {
        let config = PlaybackConfig::default().with_speed(2.0);
        let mut replay = provider(recording(&[0, 1_000, 3_000]), &config);

        let start = Instant::now();
        let mut keyframes = Vec::new();
        while let Some(message) = replay.next_message().await.expect("read") {
            match message {
                Message::SetKeyframe(keyframe) => keyframes.push(keyframe.keyframe()),
                other => panic!("unexpected {}", other.name()),
            }
        }
        assert_eq!(keyframes, vec![0, 1, 2]);
        assert_eq!(start.elapsed(), std::time::Duration::from_millis(2_000));
        assert_eq!(replay.recorded_time(), TimeSpan::from_millis(4_000));
    }

    #[tokio::test(start_paused = true)]
    async fn unpaced_replay_does_not_sleep() {
        let mut replay = provider(recording(&[0, 60_000]), &PlaybackConfig::immediate());
        let start = Instant::now();
        assert!(replay.next_message().await.expect("read").is_some());
        assert!(replay.next_message().await.expect("read").is_some());
        assert!(replay.next_message().await.expect("read").is_none());
        assert_eq!(start.elapsed(), std::time::Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reads_keep_their_pause() {
        let mut replay = provider(recording(&[0, 1_000]), &PlaybackConfig::default());
        let start = Instant::now();
        assert!(replay.next_message().await.expect("read").is_some());

        let early = tokio::time::timeout(std::time::Duration::from_millis(400), replay.next_message()).await;
        assert!(early.is_err(), "still paused");

        assert!(replay.next_message().await.expect("read").is_some());
        assert_eq!(start.elapsed(), std::time::Duration::from_millis(1_000));
    }
}
