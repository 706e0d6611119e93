//! Append-only progress reporting from long-running flows.

use std::path::PathBuf;

use crossbeam_channel::Sender;

/// Event sent from an install worker to whoever renders progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Message(String),
    /// The batch finished; carries the install root.
    Finished(PathBuf),
    Failed(String),
}

/// Receives progress messages. Implementations must not block for long.
pub trait ProgressSink {
    fn report(&self, message: String);
}

/// Discards every message.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _message: String) {}
}

impl<F> ProgressSink for F
where
    F: Fn(String),
{
    fn report(&self, message: String) {
        self(message)
    }
}

impl ProgressSink for Sender<ProgressEvent> {
    fn report(&self, message: String) {
        // A consumer that stopped listening is not an error for the producer
        let _ = self.send(ProgressEvent::Message(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |m: String| seen.borrow_mut().push(m);
        sink.report("one".to_string());
        sink.report("two".to_string());
        assert_eq!(*seen.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn test_channel_sink() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.report("hello".to_string());
        drop(tx);
        assert_eq!(
            rx.iter().collect::<Vec<_>>(),
            vec![ProgressEvent::Message("hello".to_string())]
        );
    }

    #[test]
    fn test_disconnected_channel_is_ignored() {
        let (tx, rx) = crossbeam_channel::unbounded::<ProgressEvent>();
        drop(rx);
        tx.report("nobody listens".to_string());
    }
}
