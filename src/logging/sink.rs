use async_trait::async_trait;

use super::error::LogError;

/// A destination that records serialized log events
///
/// Each call receives one newline-terminated JSON object.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Record one event, returning the number of bytes consumed
    async fn write(&self, buf: &[u8]) -> Result<usize, LogError>;
}
