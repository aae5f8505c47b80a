//! The session event channel.
//!
//! Single-producer, single-consumer: the orchestrator is the sole writer,
//! the transport layer the sole reader. A failed send means the subscriber
//! disconnected; that is the cancellation signal, and the orchestrator must
//! abandon further provider work promptly.

use atelier_domain::PipelineEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// The subscriber hung up; no more events can be delivered.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("event channel closed by subscriber")]
pub struct ChannelClosed;

/// Writer half of a session's event channel.
pub struct EventSender {
    tx: mpsc::Sender<PipelineEvent>,
}

impl EventSender {
    /// Create a channel pair for one session.
    pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<PipelineEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (EventSender { tx }, rx)
    }

    /// Push one event, in order.
    pub async fn send(&self, event: PipelineEvent) -> Result<(), ChannelClosed> {
        self.tx.send(event).await.map_err(|_| ChannelClosed)
    }

    /// Whether the subscriber is still listening.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (sender, mut rx) = EventSender::channel(8);
        sender.send(PipelineEvent::status("one")).await.unwrap();
        sender.send(PipelineEvent::status("two")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), PipelineEvent::status("one"));
        assert_eq!(rx.recv().await.unwrap(), PipelineEvent::status("two"));
    }

    #[tokio::test]
    async fn dropped_receiver_surfaces_as_channel_closed() {
        let (sender, rx) = EventSender::channel(8);
        drop(rx);

        assert!(!sender.is_open());
        assert_eq!(
            sender.send(PipelineEvent::status("late")).await,
            Err(ChannelClosed)
        );
    }
}
