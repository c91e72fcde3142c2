//! Provider trait for message sources

use crate::Result;
use crate::messages::Message;

/// Trait for timing message sources
///
/// Providers abstract over where messages come from (a recording, a test
/// fixture, a decoded live feed) and handle their own pacing internally.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next message
    ///
    /// Returns:
    /// - `Ok(Some(message))` - Next message in arrival order
    /// - `Ok(None)` - Stream ended (normal termination)
    /// - `Err(e)` - The source is unreadable; the engine stops
    ///
    /// Implementations must be cancel-safe: a call dropped while waiting must
    /// not lose a message or its pacing.
    async fn next_message(&mut self) -> Result<Option<Message>>;
}
