use tokio::sync::mpsc::UnboundedSender;

use crate::SessionEvent;

/// Receiver of session events. Implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

pub struct ChannelEventSink {
    tx: UnboundedSender<SessionEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: SessionEvent) {
        // Receiver gone means nobody is watching; the session keeps running.
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: SessionEvent) {}
}
