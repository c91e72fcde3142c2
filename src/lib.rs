//! Motorsport live-timing codec and race-state builder.
//!
//! livetiming reads the compact binary object stream a timing feed produces,
//! turns it into typed messages and folds those messages into a complete,
//! queryable picture of the session.
//!
//! # Features
//!
//! - **Schema-tolerant codec**: unknown fields are skipped and cyclic graphs
//!   are rejected before any byte is emitted
//! - **Message catalogue**: every timing update is a validated, typed payload
//! - **Incremental state**: drivers, the timing grid, fastest times, the
//!   theoretical best lap, weather and feed metadata
//! - **Replay**: recordings play back at their recorded pace or faster, with
//!   rate-limited snapshot streams for slow subscribers
//!
//! ## Example (recording replay)
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use livetiming::LiveTiming;
//!
//! #[tokio::main]
//! async fn main() -> livetiming::Result<()> {
//!     let connection = LiveTiming::open("/path/to/race.lt")?;
//!     let mut updates = connection.session_updates();
//!
//!     while let Some(session) = updates.next().await {
//!         if let Some(best) = session.theoretical_best() {
//!             println!("Theoretical best: {best}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod config;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Wire format
pub mod codec;
pub mod messages;
pub mod recording;
pub mod schema;

// Session state
pub mod model;

// Stream-based replay architecture
pub mod connection;
pub mod engine;
pub mod provider;
pub mod providers;
pub mod stream;

// Core exports
pub use error::*;
pub use schema::{FieldValue, Registry};

// Main API exports
pub use config::PlaybackConfig;
pub use connection::ReplayConnection;
pub use messages::{Message, MessageVisitor};
pub use model::Session;
pub use types::UpdateRate;

/// Unified entry point for live-timing replays.
///
/// # Examples
///
/// ```rust,no_run
/// use livetiming::{LiveTiming, PlaybackConfig};
///
/// #[tokio::main]
/// async fn main() -> livetiming::Result<()> {
///     let config = PlaybackConfig::default().with_speed(4.0);
///     let connection = LiveTiming::open_with("race.lt", config)?;
///     let session = connection.wait_for_end().await;
///     println!("{:?}", session.map(|s| s.feed().message_count));
///     Ok(())
/// }
/// ```
pub struct LiveTiming;

impl LiveTiming {
    /// Open a recording for replay at its recorded pace.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<ReplayConnection> {
        ReplayConnection::open(path)
    }

    /// Open a recording with explicit playback settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the file cannot be
    /// opened.
    pub fn open_with<P: AsRef<std::path::Path>>(
        path: P,
        config: PlaybackConfig,
    ) -> Result<ReplayConnection> {
        ReplayConnection::open_with(path, config)
    }
}
