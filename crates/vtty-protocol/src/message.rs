//! The wire format: a 4-byte big-endian length prefix followed by that
//! many bytes of payload (spec §4.10, grounded in the original's
//! `MSG_HEADER_FMT = '!L'`).

use std::io::{Read, Write};
use std::net::TcpStream;

use crate::errors::StubError;

/// The original implementation's hardcoded default port for the stub
/// control channel.
pub const DEFAULT_PORT: u16 = 12345;

const HEADER_LEN: usize = 4;

pub fn read_message(stream: &mut TcpStream) -> Result<Vec<u8>, StubError> {
    let mut header = [0u8; HEADER_LEN];
    stream.read_exact(&mut header).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => StubError::Closed,
        _ => StubError::Io(e),
    })?;
    let len = u32::from_be_bytes(header) as usize;

    let mut msg = vec![0u8; len];
    stream.read_exact(&mut msg)?;
    Ok(msg)
}

pub fn write_message(stream: &mut TcpStream, msg: &[u8]) -> Result<(), StubError> {
    let len: u32 = msg
        .len()
        .try_into()
        .map_err(|_| StubError::MessageTooLarge(msg.len()))?;
    stream.write_all(&len.to_be_bytes())?;
    stream.write_all(msg)?;
    Ok(())
}
