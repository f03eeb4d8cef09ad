//! Accepts stub connections and hands each one off by the type string it
//! announces (spec §4.10, grounded in the original `StubCentral` /
//! `StubListener`).
//!
//! The original ran everything through one `asyncore` select loop woken by
//! a dedicated "poker" socket whenever a test thread queued outbound data.
//! Here each connection gets its own reader thread, and [`StubCentral::stub`]
//! blocks on a condvar instead of polling a shared loop — there's no
//! poker socket to wake because nothing is waiting on `select`.

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::StubError;
use crate::message::read_message;
use crate::stub::Stub;

type Registry = Arc<(Mutex<HashMap<String, Arc<Stub>>>, Condvar)>;

/// A listening TCP socket that demultiplexes incoming stub connections by
/// the type string each one sends as its handshake.
pub struct StubCentral {
    addr: SocketAddr,
    registry: Registry,
}

impl StubCentral {
    /// Bind to `port`, or any free port if `port` is `0`.
    pub fn bind(port: u16) -> Result<Self, StubError> {
        let listener = TcpListener::bind(("127.0.0.1", port))?;
        let addr = listener.local_addr()?;
        let registry: Registry = Arc::new((Mutex::new(HashMap::new()), Condvar::new()));

        let accept_registry = registry.clone();
        thread::spawn(move || accept_loop(listener, accept_registry));

        Ok(Self { addr, registry })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until a peer has announced `stub_type`, then return its
    /// handle. Returns `None` if `timeout` elapses first.
    pub fn stub(&self, stub_type: &str, timeout: Duration) -> Option<Arc<Stub>> {
        let (lock, cvar) = &*self.registry;
        let guard = lock.lock().unwrap();
        let (guard, timed_out) = cvar
            .wait_timeout_while(guard, timeout, |stubs| !stubs.contains_key(stub_type))
            .unwrap();
        if timed_out.timed_out() {
            return None;
        }
        guard.get(stub_type).cloned()
    }
}

fn accept_loop(listener: TcpListener, registry: Registry) {
    for conn in listener.incoming() {
        let stream = match conn {
            Ok(stream) => stream,
            Err(e) => {
                warn!(event = "protocol.accept_failed", error = %e);
                continue;
            }
        };
        let registry = registry.clone();
        thread::spawn(move || handle_connection(stream, registry));
    }
}

fn handle_connection(mut stream: TcpStream, registry: Registry) {
    let stub_type = match read_message(&mut stream) {
        Ok(handshake) => String::from_utf8_lossy(&handshake).into_owned(),
        Err(e) => {
            warn!(event = "protocol.handshake_failed", error = %e);
            return;
        }
    };

    debug!(event = "protocol.stub_connected", stub_type = %stub_type);

    let peer_stream = match stream.try_clone() {
        Ok(s) => s,
        Err(e) => {
            warn!(event = "protocol.clone_failed", error = %e);
            return;
        }
    };
    let stub = Arc::new(Stub::new(peer_stream, stub_type.clone()));

    {
        let (lock, cvar) = &*registry;
        let mut stubs = lock.lock().unwrap();
        stubs.insert(stub_type.clone(), stub.clone());
        cvar.notify_all();
    }

    loop {
        match read_message(&mut stream) {
            Ok(msg) => stub.push(msg),
            Err(_) => {
                debug!(event = "protocol.stub_disconnected", stub_type = %stub_type);
                break;
            }
        }
    }
}

/// Connect to a [`StubCentral`] as a client and perform the type
/// handshake (spec §4.10).
pub fn connect(addr: SocketAddr, stub_type: &str) -> Result<TcpStream, StubError> {
    let mut stream = TcpStream::connect(addr)?;
    crate::message::write_message(&mut stream, stub_type.as_bytes())?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::write_message;

    #[test]
    fn stub_blocks_until_the_named_type_connects() {
        let central = StubCentral::bind(0).unwrap();
        let addr = central.addr();

        let client = thread::spawn(move || {
            let mut stream = connect(addr, "SimpleStub").unwrap();
            write_message(&mut stream, b"payload").unwrap();
            stream
        });

        let stub = central.stub("SimpleStub", Duration::from_secs(5)).expect("stub registered");
        assert_eq!(stub.read(Duration::from_secs(5)), b"payload");

        let _keep_alive = client.join().unwrap();
    }

    #[test]
    fn stub_returns_none_when_nothing_connects_in_time() {
        let central = StubCentral::bind(0).unwrap();
        assert!(central.stub("Nobody", Duration::from_millis(50)).is_none());
    }

    #[test]
    fn central_reply_reaches_the_client() {
        let central = StubCentral::bind(0).unwrap();
        let addr = central.addr();

        let client = thread::spawn(move || {
            let mut stream = connect(addr, "Echo").unwrap();
            write_message(&mut stream, b"ping").unwrap();
            read_message(&mut stream).unwrap()
        });

        let stub = central.stub("Echo", Duration::from_secs(5)).unwrap();
        assert_eq!(stub.read(Duration::from_secs(5)), b"ping");
        stub.write(b"pong").unwrap();

        assert_eq!(client.join().unwrap(), b"pong");
    }
}
