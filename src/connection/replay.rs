//! Replay connection for recordings

use futures::{Stream, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::Result;
use crate::config::PlaybackConfig;
use crate::engine::Engine;
use crate::model::Session;
use crate::provider::Provider;
use crate::providers::ReplayProvider;
use crate::schema::Registry;
use crate::stream::CoalesceExt;
use crate::types::UpdateRate;

/// Replay connection from a recording file
pub struct ReplayConnection {
    /// Session snapshot receiver
    sessions: watch::Receiver<Option<Arc<Session>>>,

    /// Set once the engine has stopped
    finished: watch::Receiver<bool>,

    /// Subscriber snapshot rate
    update_rate: UpdateRate,

    /// Cancellation token for stopping the engine
    cancel: CancellationToken,
}

impl ReplayConnection {
    /// Open a recording with the default playback configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, PlaybackConfig::default())
    }

    /// Open a recording with an explicit playback configuration.
    pub fn open_with<P: AsRef<Path>>(path: P, config: PlaybackConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        info!("Opening recording: {}", path.display());

        let registry = Arc::new(Registry::standard()?);
        let provider = ReplayProvider::open(path, registry, &config)?;
        Ok(Self::from_provider(provider, &config))
    }

    /// Drive a connection from any provider.
    pub fn from_provider<P: Provider>(provider: P, config: &PlaybackConfig) -> Self {
        let channels = Engine::spawn(provider, config);
        Self {
            sessions: channels.sessions,
            finished: channels.finished,
            update_rate: config.update_rate.normalize(),
            cancel: channels.cancel,
        }
    }

    /// Get session snapshots as a stream
    ///
    /// The stream ends when the replay ends. With [`UpdateRate::Max`] bursts
    /// of snapshots collapse to the newest one.
    pub fn session_updates(&self) -> impl Stream<Item = Arc<Session>> + 'static {
        let sessions = WatchStream::new(self.sessions.clone()).filter_map(|opt| async move { opt });

        match self.update_rate.coalesce_interval() {
            None => sessions.boxed(),
            Some(period) => sessions.coalesce(period).boxed(),
        }
    }

    /// Get the latest session snapshot (if any message has been applied)
    pub fn current_session(&self) -> Option<Arc<Session>> {
        self.sessions.borrow().clone()
    }

    /// Wait until the replay ends and return the final snapshot
    pub async fn wait_for_end(&self) -> Option<Arc<Session>> {
        let mut finished = self.finished.clone();
        if finished.wait_for(|finished| *finished).await.is_err() {
            debug!("Engine task went away without finishing");
        }
        self.current_session()
    }

    /// Whether the replay has ended
    pub fn is_finished(&self) -> bool {
        *self.finished.borrow()
    }

    /// Stop the replay early
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ReplayConnection {
    fn drop(&mut self) {
        debug!("Dropping replay connection");
        self.cancel.cancel();
    }
}
