//! Where session events go.
//!
//! The rule engine only ever pushes into an `EventSink`; nothing flows back.

use tokio::sync::broadcast;

use super::event::SessionEvent;

/// Fire-and-forget destination for session events.
pub trait EventSink {
    /// Deliver one event to every participant of the board.
    fn publish(&mut self, event: SessionEvent);
}

/// Recording sink, mostly for tests and replays.
impl EventSink for Vec<SessionEvent> {
    fn publish(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

/// Fan-out to subscribed viewers. A board with no viewers drops events.
impl EventSink for broadcast::Sender<SessionEvent> {
    fn publish(&mut self, event: SessionEvent) {
        let _ = self.send(event);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: SessionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut sink: Vec<SessionEvent> = Vec::new();
        sink.publish(SessionEvent::GameStart);
        sink.publish(SessionEvent::Draw { number: 2 });

        assert_eq!(
            sink,
            vec![SessionEvent::GameStart, SessionEvent::Draw { number: 2 }]
        );
    }

    #[test]
    fn test_broadcast_sink_without_receivers() {
        let (mut tx, _) = broadcast::channel::<SessionEvent>(4);
        // No subscribers left: publishing must not panic
        tx.publish(SessionEvent::EnoughPlayers);
    }

    #[test]
    fn test_broadcast_sink_delivers() {
        let (mut tx, mut rx) = broadcast::channel::<SessionEvent>(4);
        tx.publish(SessionEvent::Draw { number: 5 });
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Draw { number: 5 });
    }
}
