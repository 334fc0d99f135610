//! Event channel implementation using crossbeam-channel.
//!
//! The workflow runs on the async runtime while a front end may render
//! from its own thread; crossbeam lets either side block or poll.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends workflow events to whatever front end is listening.
#[derive(Clone, Debug)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { inner: sender }
    }

    /// Send an event without blocking.
    ///
    /// Events are dropped when nobody listens.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives workflow events on the front-end side.
#[derive(Debug)]
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Everything queued right now
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }

    /// Iterate until every sender is gone
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Creates connected sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose events go nowhere, for headless use.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Page, WorkflowEvent};
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Workflow(WorkflowEvent::PageChanged {
                page: Page::Progress,
            }));
        });

        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Workflow(WorkflowEvent::PageChanged { page }) => {
                assert_eq!(page, Page::Progress);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Workflow(WorkflowEvent::Reset));
    }

    #[test]
    fn drain_returns_queued_events_in_order() {
        let (sender, receiver) = EventChannel::new();

        sender.send(Event::Workflow(WorkflowEvent::PageChanged { page: Page::Scan }));
        sender.send(Event::Workflow(WorkflowEvent::Reset));

        let events = receiver.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Event::Workflow(WorkflowEvent::Reset)));
        assert!(receiver.try_recv().is_none());
    }
}
