//! Tests for the replay connection
//!
//! These verify that recorded messages reach subscribers as session snapshots
//! and that the engine task shuts down with the connection.

use super::*;
use crate::config::PlaybackConfig;
use crate::test_utils::{self, VecProvider};
use crate::types::{SessionType, UpdateRate};
use futures::StreamExt;
use std::io::Write;
use std::time::Duration;

fn recording_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&test_utils::record_to_bytes(&test_utils::race_fixture())).expect("write");
    file
}

#[tokio::test]
async fn replays_a_recording_to_the_final_session() {
    test_utils::init_tracing();
    let file = recording_file();
    let connection =
        ReplayConnection::open_with(file.path(), PlaybackConfig::immediate()).expect("open");

    let session = connection.wait_for_end().await.expect("final snapshot");
    assert!(connection.is_finished());
    assert_eq!(session.session_type(), SessionType::Race);
    assert_eq!(session.theoretical_best().map(|t| t.to_string()).as_deref(), Some("1:30.000"));
    assert_eq!(session.feed().message_count as usize, test_utils::race_fixture().len());
}

#[tokio::test]
async fn updates_end_with_the_replay() {
    let connection = ReplayConnection::from_provider(
        VecProvider::new(test_utils::race_fixture()),
        &PlaybackConfig::immediate(),
    );
    let snapshots: Vec<_> = connection.session_updates().collect().await;
    let last = snapshots.last().expect("at least one snapshot");
    assert_eq!(last.feed().message_count as usize, test_utils::race_fixture().len());
}

#[tokio::test(start_paused = true)]
async fn coalesced_updates_skip_intermediate_snapshots() {
    let config = PlaybackConfig { update_rate: UpdateRate::Max(1), ..PlaybackConfig::immediate() };
    let connection = ReplayConnection::from_provider(
        VecProvider::new(test_utils::race_fixture()).paced(Duration::from_millis(100)),
        &config,
    );
    let snapshots: Vec<_> = connection.session_updates().collect().await;
    assert!(snapshots.len() < test_utils::race_fixture().len());
    let last = snapshots.last().expect("final snapshot is delivered");
    assert_eq!(last.feed().message_count as usize, test_utils::race_fixture().len());
}

#[tokio::test]
async fn stopping_ends_the_engine() {
    let connection = ReplayConnection::from_provider(
        VecProvider::new(Vec::new()).holding_open(),
        &PlaybackConfig::immediate(),
    );
    assert!(connection.current_session().is_none());
    connection.stop();
    tokio::time::timeout(Duration::from_secs(1), connection.wait_for_end())
        .await
        .expect("engine stops");
    assert!(connection.is_finished());
}

#[test]
fn invalid_configuration_is_rejected_before_opening() {
    let config = PlaybackConfig::default().with_speed(0.0);
    let error = ReplayConnection::open_with("missing.lt", config).err().expect("invalid speed");
    assert!(matches!(error, crate::TimingError::Config { .. }));
}
