//! Channel-backed message source.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::evaluation::ports::{MessageSource, SourceResult};

/// Message source fed through a bounded `tokio` channel.
///
/// The source is exhausted once every sender has been dropped and the
/// buffered payloads have been drained.
#[derive(Debug)]
pub struct ChannelMessageSource {
    receiver: mpsc::Receiver<Vec<u8>>,
}

impl ChannelMessageSource {
    /// Creates a source together with the sender that feeds it.
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self { receiver })
    }
}

#[async_trait]
impl MessageSource for ChannelMessageSource {
    async fn next_message(&mut self) -> SourceResult<Option<Vec<u8>>> {
        Ok(self.receiver.recv().await)
    }
}
