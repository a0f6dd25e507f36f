//! Test connection that records everything sent to it.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use strictly_chess_server::{Connection, ConnectionHandle, EndMessage, Message, SendError};

#[derive(Debug, Default)]
pub struct RecordingConnection {
    sent: Mutex<Vec<Message>>,
    closed: AtomicBool,
    failing: AtomicBool,
}

impl RecordingConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn handle(self: &Arc<Self>) -> ConnectionHandle {
        self.clone()
    }

    /// Makes every send fail while the connection still reports open.
    pub fn fail_sends(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<Message> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn last(&self) -> Option<Message> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn ends(&self) -> Vec<EndMessage> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::End(end) => Some(end),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Connection for RecordingConnection {
    fn send(&self, message: Message) -> Result<(), SendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SendError::new("peer unreachable"));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.is_closed()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
