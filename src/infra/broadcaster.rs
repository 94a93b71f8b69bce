//! In-process fan-out of change notifications to SSE clients.
//!
//! Clients treat every event as a cache-invalidation hint and re-fetch.
//! Publishing never fails: with no subscribers the event is dropped, and a
//! subscriber that falls behind skips what it missed.

use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::domain::Theme;

/// Something clients should re-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    /// Personnel, departments, positions or extensions changed
    StaffUpdate,
    /// Announcements changed
    ImportantInfoUpdate,
    /// The site theme changed
    ThemeChange(Theme),
}

impl DirectoryEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            DirectoryEvent::StaffUpdate => "staffUpdate",
            DirectoryEvent::ImportantInfoUpdate => "importantInfoUpdate",
            DirectoryEvent::ThemeChange(_) => "themeChange",
        }
    }

    /// SSE data line. Only theme changes carry a payload.
    pub fn payload(&self) -> &'static str {
        match self {
            DirectoryEvent::ThemeChange(theme) => theme.as_str(),
            _ => "",
        }
    }

    fn to_sse(&self) -> Event {
        Event::default().event(self.name()).data(self.payload())
    }
}

/// Broadcast channel shared by every handler.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<DirectoryEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        tracing::info!(capacity, "Event broadcaster initialized");
        Self { tx }
    }

    /// Send to every connected client, ignoring the no-subscriber case.
    pub fn publish(&self, event: DirectoryEvent) {
        match self.tx.send(event) {
            Ok(count) => tracing::debug!(subscribers = count, "Event published"),
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(event = event.name(), "Event dropped, no subscribers")
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Raw receiver, mainly for tests.
    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.tx.subscribe()
    }

    /// Stream of SSE frames for one client.
    pub fn stream(&self) -> impl Stream<Item = Result<Event, Infallible>> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|result| async move {
            match result {
                Ok(event) => Some(Ok(event.to_sse())),
                Err(lagged) => {
                    tracing::warn!("SSE client lagging: {}", lagged);
                    None
                }
            }
        })
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(crate::config::EVENT_CHANNEL_CAPACITY)
    }
}
