use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::dto::ui::UiEvent;

/// Broadcast hub fanning session events out to whatever renders them.
pub struct UiHub {
    sender: broadcast::Sender<UiEvent>,
}

impl UiHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given
    /// capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    /// View the hub as a `Stream` of events for consumers that prefer one.
    pub fn stream(&self) -> BroadcastStream<UiEvent> {
        BroadcastStream::new(self.subscribe())
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: UiEvent) {
        let _ = self.sender.send(event);
    }
}
