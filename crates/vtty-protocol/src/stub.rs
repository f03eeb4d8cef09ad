//! A single stub connection: a queue of received messages plus direct
//! writes back to the peer (spec §4.10, grounded in the original `Stub`
//! class).
//!
//! The original used `asyncore`'s non-blocking reactor with a `writable()`
//! / `handle_write()` pair that buffered partial sends. A dedicated OS
//! thread per connection (see [`crate::central::StubCentral`]) makes that
//! unnecessary here: writes block the calling thread instead of queuing.

use std::collections::VecDeque;
use std::net::TcpStream;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::errors::StubError;
use crate::message::write_message;

/// One connected peer, identified by the type string it sent as its
/// first message (spec §4.10 handshake).
pub struct Stub {
    stream: Mutex<TcpStream>,
    inbox: Mutex<VecDeque<Vec<u8>>>,
    ready: Condvar,
    stub_type: String,
}

/// The original distinguished `SimpleStub` from the `Stub` base class
/// only by a `type` string and adding no dispatch logic — here that's
/// the same type, since [`Stub`] never required subclassing to behave
/// as a dumb, asynchronous datapipe.
pub type SimpleStub = Stub;

impl Stub {
    pub(crate) fn new(stream: TcpStream, stub_type: String) -> Self {
        Self {
            stream: Mutex::new(stream),
            inbox: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
            stub_type,
        }
    }

    pub fn stub_type(&self) -> &str {
        &self.stub_type
    }

    /// Send `msg` to the peer immediately.
    pub fn write(&self, msg: &[u8]) -> Result<(), StubError> {
        let mut stream = self.stream.lock().unwrap();
        write_message(&mut stream, msg)
    }

    /// Return the next message sent by the peer, waiting up to `timeout`.
    /// Returns an empty vec if nothing arrived in time (spec §4.10
    /// `Stub.read`).
    pub fn read(&self, timeout: Duration) -> Vec<u8> {
        let inbox = self.inbox.lock().unwrap();
        let (mut inbox, _) = self
            .ready
            .wait_timeout_while(inbox, timeout, |q| q.is_empty())
            .unwrap();
        inbox.pop_front().unwrap_or_default()
    }

    pub(crate) fn push(&self, msg: Vec<u8>) {
        let mut inbox = self.inbox.lock().unwrap();
        inbox.push_back(msg);
        self.ready.notify_one();
    }
}
