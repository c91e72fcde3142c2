//! End-to-end replay tests
//!
//! A recording is written to disk, replayed through the public entry point and
//! the final session is checked against what the feed described.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use livetiming::messages::*;
use livetiming::recording::{RecordedReader, RecordingWriter};
use livetiming::types::{Gap, Rank, SessionType, TimeSpan, TimedResult};
use livetiming::{LiveTiming, PlaybackConfig, Registry};

fn timed(millis: i64, rank: Rank, lap_number: u32) -> Result<TimedResult> {
    Ok(TimedResult::new(TimeSpan::from_millis(millis), rank, lap_number)?)
}

/// Two laps of a three-car qualifying session, two seconds apart.
fn qualifying() -> Result<Vec<(TimeSpan, Message)>> {
    let at = TimeSpan::from_secs;
    Ok(vec![
        (at(0), SetSessionType::new(SessionType::Qually, "Q".into())?.into()),
        (at(0), SetDriverName::new(1, "Alpha".into())?.into()),
        (at(0), SetDriverName::new(2, "Bravo".into())?.into()),
        (at(0), SetDriverName::new(3, "Charlie".into())?.into()),
        (at(0), SetElapsedSessionTime::new(at(60))?.into()),
        (at(1), SetDriverSectorTime::new(2, 1, timed(28_100, Rank::SessionBest, 1)?)?.into()),
        (at(1), SetDriverSectorTime::new(1, 2, timed(30_500, Rank::SessionBest, 1)?)?.into()),
        (at(1), SetDriverSectorTime::new(1, 3, timed(31_200, Rank::SessionBest, 1)?)?.into()),
        (at(2), SetDriverQuallyTime::new(1, 1, TimeSpan::from_millis(90_400))?.into()),
        (at(2), SetDriverPosition::new(1, 1)?.into()),
        (at(2), SetDriverPosition::new(2, 2)?.into()),
        (at(2), SetDriverGap::new(2, Gap::time(TimeSpan::from_millis(250))?)?.into()),
        (at(3), SetDriverPosition::new(3, 3)?.into()),
        (at(3), SetDriverGap::new(3, Gap::laps(1)?)?.into()),
        (at(4), SetTrackTemperature::new(31.5)?.into()),
        (at(4), SetTrackTemperature::new(33.0)?.into()),
        (at(4), AddCommentary::new("Alpha on provisional pole.".into())?.into()),
    ])
}

fn record(path: &std::path::Path, timeline: &[(TimeSpan, Message)]) -> Result<u64> {
    let registry = Arc::new(Registry::standard()?);
    let file = File::create(path).context("create recording")?;
    let mut writer = RecordingWriter::new(BufWriter::new(file), registry);
    for (at, message) in timeline {
        writer.write_at(message, *at)?;
    }
    let written = writer.written();
    writer.finish()?;
    Ok(written)
}

#[test]
fn recordings_carry_their_pacing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("qually.lt");
    let timeline = qualifying()?;
    record(&path, &timeline)?;

    let registry = Arc::new(Registry::standard()?);
    let messages = RecordedReader::open(&path, registry)?.collect::<livetiming::Result<Vec<_>>>()?;
    let delays: Vec<TimeSpan> = messages
        .iter()
        .filter_map(|message| match message {
            Message::SetNextMessageDelay(delay) => Some(delay.delay()),
            _ => None,
        })
        .collect();

    assert_eq!(delays, vec![TimeSpan::from_secs(1); 4]);
    assert_eq!(messages.len(), timeline.len() + delays.len());
    Ok(())
}

#[tokio::test]
async fn replaying_a_recording_rebuilds_the_session() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("qually.lt");
    let timeline = qualifying()?;
    record(&path, &timeline)?;

    let connection = LiveTiming::open_with(&path, PlaybackConfig::immediate())?;
    let session = connection.wait_for_end().await.context("no snapshot published")?;

    assert_eq!(session.session_type(), SessionType::Qually);
    assert_eq!(session.session_id(), "Q");

    let order: Vec<i32> = session.drivers().iter().map(|driver| driver.id).collect();
    assert_eq!(order, vec![1, 2, 3]);
    let alpha = session.driver(1).context("driver 1")?;
    assert_eq!(alpha.name.as_deref(), Some("Alpha"));
    assert_eq!(alpha.qually_times.get(1), Some(TimeSpan::from_millis(90_400)));
    assert_eq!(session.driver(3).and_then(|driver| driver.gap), Some(Gap::laps(1)?));

    assert_eq!(session.fastest().lap().map(|lap| lap.time), Some(TimeSpan::from_millis(90_400)));
    assert_eq!(session.theoretical_best(), Some(TimeSpan::from_millis(89_800)));
    assert_eq!(session.best_lap_delta(), Some(TimeSpan::from_millis(600)));

    let track = &session.weather().track_temperature;
    assert_eq!(track.current(), Some(33.0));
    assert_eq!(track.range(), Some(1.5));

    assert!(session.messages().commentary.starts_with("Alpha on provisional pole."));
    assert_eq!(session.feed().message_count as usize, timeline.len());
    Ok(())
}

#[tokio::test]
async fn paced_replays_publish_every_snapshot_in_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("qually.lt");
    record(&path, &qualifying()?)?;

    let config = PlaybackConfig { tick_clock: false, ..PlaybackConfig::default().with_speed(100.0) };
    let connection = LiveTiming::open_with(&path, config)?;
    let counts: Vec<u64> = connection
        .session_updates()
        .map(|session| session.feed().message_count)
        .collect()
        .await;

    assert!(counts.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(counts.last().copied(), Some(qualifying()?.len() as u64));
    Ok(())
}

#[tokio::test]
async fn missing_recordings_fail_to_open() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = LiveTiming::open(dir.path().join("absent.lt"));
    assert!(matches!(result, Err(livetiming::TimingError::File { .. })));
}
