//! Events published by the supervisor and the dispatcher.
//!
//! Observers subscribe by taking an unbounded receiver. Delivery order
//! between different subscribers is not defined.

use std::sync::Mutex;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::command_definitions::{BasicCommand, Command, MacroCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Started,
    Ended,
    /// Brackets a kill: sent once before and once after, carrying whether
    /// the process was running at that moment.
    Updating { running: bool },
    Output { stream: OutputStream, line: String },
}

/// One unit reported by the dispatcher as it runs, for history and audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutedCommand {
    Basic(BasicCommand),
    Macro(MacroCommand),
    Command(Command),
}

pub(crate) struct Subscribers<T> {
    senders: Mutex<Vec<UnboundedSender<T>>>,
}

impl<T: Clone> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(&self) -> UnboundedReceiver<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.lock().push(sender);
        receiver
    }

    /// Sends to every live subscriber and drops the ones whose receiver is gone.
    pub(crate) fn publish(&self, event: T) {
        self.lock()
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<UnboundedSender<T>>> {
        self.senders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let subscribers = Subscribers::new();
        let mut first = subscribers.subscribe();
        let mut second = subscribers.subscribe();

        subscribers.publish(ProcessEvent::Started);

        assert_eq!(first.try_recv().unwrap(), ProcessEvent::Started);
        assert_eq!(second.try_recv().unwrap(), ProcessEvent::Started);
    }

    #[test]
    fn test_closed_subscribers_are_pruned() {
        let subscribers = Subscribers::new();
        let dropped = subscribers.subscribe();
        let mut kept = subscribers.subscribe();
        drop(dropped);

        subscribers.publish(ProcessEvent::Ended);

        assert_eq!(subscribers.lock().len(), 1);
        assert_eq!(kept.try_recv().unwrap(), ProcessEvent::Ended);
    }
}
