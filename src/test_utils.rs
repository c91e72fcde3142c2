//! Test utilities shared by unit tests, integration tests and benches
//!
//! This module provides message fixtures, an in-memory provider and logging
//! setup so every test exercises the crate the same way.

#![cfg(any(test, feature = "benchmark"))]

use std::collections::VecDeque;
use std::sync::{Arc, Once};
use std::time::Duration;

use crate::messages::*;
use crate::provider::Provider;
use crate::recording::RecordingWriter;
use crate::schema::Registry;
use crate::types::{GridColumn, GridColumnColour, Rank, SessionType, TimeSpan, TimedResult};
use crate::{Result, TimingError};

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// A timed result from fractional seconds.
///
/// # Panics
///
/// Panics on a negative time.
pub fn timed(secs: f64, rank: Rank, lap_number: u32) -> TimedResult {
    TimedResult::new(TimeSpan::from_secs_f64(secs), rank, lap_number).expect("non-negative time")
}

/// A short race: three drivers, one lap each, sector bests adding up to a
/// 1:30.000 theoretical best against a 1:31.000 fastest lap.
pub fn race_fixture() -> Vec<Message> {
    try_race_fixture().expect("fixture messages are valid")
}

fn try_race_fixture() -> Result<Vec<Message>> {
    Ok(vec![
        SetSessionType::new(SessionType::Race, "race".into())?.into(),
        SetSessionStatus::new(crate::types::SessionStatus::Green)?.into(),
        SetRemainingSessionTime::new(TimeSpan::from_secs(3_600))?.into(),
        StartSessionTimeCountdown.into(),
        SetDriverName::new(7, "A. Leader".into())?.into(),
        SetDriverName::new(8, "B. Chaser".into())?.into(),
        SetDriverName::new(9, "C. Backmarker".into())?.into(),
        SetDriverPosition::new(7, 1)?.into(),
        SetDriverPosition::new(8, 2)?.into(),
        SetDriverPosition::new(9, 3)?.into(),
        SetAirTemperature::new(21.0)?.into(),
        SetDriverSectorTime::new(7, 1, timed(30.0, Rank::SessionBest, 1))?.into(),
        SetDriverSectorTime::new(8, 1, timed(30.4, Rank::PersonalBest, 1))?.into(),
        SetDriverSectorTime::new(7, 2, timed(29.0, Rank::SessionBest, 1))?.into(),
        SetDriverSectorTime::new(7, 3, timed(31.0, Rank::SessionBest, 1))?.into(),
        SetDriverLapTime::new(7, timed(91.0, Rank::SessionBest, 1))?.into(),
        SetGridColumnValue::new(7, GridColumn::LapTime, GridColumnColour::Magenta, Some("1:31.000".into()))?
            .into(),
        SetDriverLapTime::new(8, timed(92.3, Rank::PersonalBest, 1))?.into(),
        SetDriverGap::new(8, crate::types::Gap::time(TimeSpan::from_millis(1_300))?)?.into(),
        SetDriverPosition::new(9, 2)?.into(),
        SetDriverPosition::new(8, 3)?.into(),
        AddCommentary::new("Lap one complete.".into())?.into(),
    ])
}

/// Encode messages into a finished recording with no delays.
pub fn record_to_bytes(messages: &[Message]) -> Vec<u8> {
    let registry = Arc::new(Registry::standard().expect("standard registry"));
    let mut writer = RecordingWriter::new(Vec::new(), registry);
    for message in messages {
        writer.write_at(message, TimeSpan::ZERO).expect("record message");
    }
    writer.finish().expect("finish recording")
}

/// In-memory provider yielding a fixed list of messages.
pub struct VecProvider {
    messages: VecDeque<Message>,
    pace: Option<Duration>,
    fail_after: Option<usize>,
    delivered: usize,
    hold_open: bool,
}

impl VecProvider {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages: messages.into(), pace: None, fail_after: None, delivered: 0, hold_open: false }
    }

    /// Sleep before every message.
    pub fn paced(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    /// Fail once `count` messages have been delivered.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Never end the stream once the messages run out.
    pub fn holding_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

#[async_trait::async_trait]
impl Provider for VecProvider {
    async fn next_message(&mut self) -> Result<Option<Message>> {
        if self.fail_after == Some(self.delivered) {
            return Err(TimingError::UnexpectedEof { context: "test provider" });
        }
        if self.messages.is_empty() && self.hold_open {
            std::future::pending::<()>().await;
        }
        if let Some(pace) = self.pace {
            tokio::time::sleep(pace).await;
        }
        let message = self.messages.pop_front();
        if message.is_some() {
            self.delivered += 1;
        }
        Ok(message)
    }
}
