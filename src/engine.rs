//! Engine spawns and manages the session-building task

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::config::PlaybackConfig;
use crate::model::Session;
use crate::provider::Provider;
use crate::types::TimeSpan;

/// Session clock resolution.
const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Result of spawning the engine task
pub struct EngineChannels {
    /// Receiver for session snapshots, `None` until the first message
    pub sessions: watch::Receiver<Option<Arc<Session>>>,
    /// Flips to `true` once the task has stopped
    pub finished: watch::Receiver<bool>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Engine spawns and manages the session-building task
///
/// The task owns the [`Provider`] and the only mutable [`Session`]. It applies
/// messages strictly in arrival order and publishes an immutable snapshot after
/// every message and every clock tick, so readers never observe a session in
/// the middle of an update.
pub struct Engine;

impl Engine {
    /// Spawn the engine task for the given provider
    pub fn spawn<P>(provider: P, config: &PlaybackConfig) -> EngineChannels
    where
        P: Provider,
    {
        let (session_tx, session_rx) = watch::channel(None);
        let (finished_tx, finished_rx) = watch::channel(false);
        let cancel = CancellationToken::new();

        let cancel_task = cancel.clone();
        let tick_clock = config.tick_clock;
        tokio::spawn(async move {
            Self::run(provider, session_tx, tick_clock, cancel_task).await;
            let _ = finished_tx.send(true);
        });

        EngineChannels { sessions: session_rx, finished: finished_rx, cancel }
    }

    async fn run<P>(
        mut provider: P,
        session_tx: watch::Sender<Option<Arc<Session>>>,
        tick_clock: bool,
        cancel: CancellationToken,
    ) where
        P: Provider,
    {
        info!("Engine task started");
        let mut session = Session::default();
        let mut message_count = 0u64;
        let mut rejected = 0u64;

        let mut clock = interval(CLOCK_TICK);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        clock.tick().await;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Engine cancelled");
                    break;
                }
                _ = clock.tick(), if tick_clock => {
                    session.tick(TimeSpan::from_std(CLOCK_TICK));
                    if session_tx.send(Some(Arc::new(session.clone()))).is_err() {
                        debug!("Session receivers dropped, shutting down");
                        break;
                    }
                    continue;
                }
                result = provider.next_message() => result,
            };

            match result {
                Ok(Some(message)) => {
                    message_count += 1;
                    trace!("Message {}: {}", message_count, message.name());
                    if let Err(e) = session.process(&message) {
                        rejected += 1;
                        warn!("Rejected {} ({} so far): {}", message.name(), rejected, e);
                    }
                    if session_tx.send(Some(Arc::new(session.clone()))).is_err() {
                        debug!("Session receivers dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Provider stream ended after {} messages", message_count);
                    break;
                }
                Err(e) => {
                    error!("Replay aborted after {} messages: {}", message_count, e);
                    break;
                }
            }
        }

        info!("Engine task ended ({} messages, {} rejected)", message_count, rejected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Message, SetDriverPosition, SetElapsedSessionTime, SetSessionType};
    use crate::test_utils::VecProvider;
    use crate::types::SessionType;

    async fn wait_finished(channels: &mut EngineChannels) {
        channels.finished.wait_for(|finished| *finished).await.expect("engine finished");
    }

    #[tokio::test]
    async fn publishes_the_final_session() {
        let messages: Vec<Message> = vec![
            SetSessionType::new(SessionType::Race, "r".into()).expect("valid").into(),
            SetDriverPosition::new(4, 1).expect("valid").into(),
        ];
        let mut channels = Engine::spawn(VecProvider::new(messages), &PlaybackConfig::immediate());
        wait_finished(&mut channels).await;

        let session = channels.sessions.borrow().clone().expect("snapshot");
        assert_eq!(session.session_type(), SessionType::Race);
        assert_eq!(session.feed().message_count, 2);
    }

    #[tokio::test]
    async fn rejected_messages_do_not_stop_the_engine() {
        let messages: Vec<Message> = vec![
            crate::messages::ReplaceDriverLapTime::new(
                4,
                crate::test_utils::timed(90.0, crate::types::Rank::Normal, 1),
            )
            .expect("valid")
            .into(),
            SetDriverPosition::new(4, 2).expect("valid").into(),
        ];
        let mut channels = Engine::spawn(VecProvider::new(messages), &PlaybackConfig::immediate());
        wait_finished(&mut channels).await;

        let session = channels.sessions.borrow().clone().expect("snapshot");
        assert_eq!(session.driver(4).map(|driver| driver.position), Some(2));
    }

    #[tokio::test]
    async fn provider_errors_abort_the_replay() {
        let provider = VecProvider::new(vec![SetDriverPosition::new(4, 1).expect("valid").into()])
            .failing_after(1);
        let mut channels = Engine::spawn(provider, &PlaybackConfig::immediate());
        wait_finished(&mut channels).await;
        assert_eq!(channels.sessions.borrow().as_ref().map(|s| s.feed().message_count), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ticks_once_per_second() {
        let messages: Vec<Message> =
            vec![SetElapsedSessionTime::new(TimeSpan::from_secs(10)).expect("valid").into()];
        let config = PlaybackConfig { tick_clock: true, ..PlaybackConfig::immediate() };
        let mut channels = Engine::spawn(VecProvider::new(messages).holding_open(), &config);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        let elapsed = channels.sessions.borrow().as_ref().map(|s| s.clock().elapsed);
        assert_eq!(elapsed, Some(TimeSpan::from_secs(13)));

        channels.cancel.cancel();
        wait_finished(&mut channels).await;
    }
}
