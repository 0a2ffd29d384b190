use std::fmt::Display;
use std::io::{ErrorKind, Read};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use super::{ProtocolError, GET_SENTINEL, SET_SENTINEL};
use crate::command::ActionKind;
use crate::dispatch::CancelToken;

/// Pause before polling a port again after it had nothing to give.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Bytes accumulated for one reply, without the get sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFrame(pub Vec<u8>);

impl RawFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl Display for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_text())
    }
}

/// End-of-frame condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Stop at this byte; the byte itself is dropped.
    Byte(u8),
    /// Stop once the accumulated bytes contain this text; it is kept.
    Substring(&'static str),
}

impl Terminator {
    pub fn for_action(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Get => Terminator::Byte(GET_SENTINEL),
            ActionKind::Set => Terminator::Substring(SET_SENTINEL),
        }
    }

    /// Feeds one byte into `acc` and reports whether the frame is complete.
    fn push(&self, acc: &mut Vec<u8>, byte: u8) -> bool {
        match *self {
            Terminator::Byte(sentinel) if byte == sentinel => true,
            Terminator::Byte(_) => {
                acc.push(byte);
                false
            }
            Terminator::Substring(needle) => {
                acc.push(byte);
                let needle = needle.as_bytes();
                acc.len() >= needle.len() && acc.windows(needle.len()).any(|w| w == needle)
            }
        }
    }
}

/// Reads one byte at a time until `terminator` is seen.
///
/// Port-level read timeouts and empty reads are polled again until `timeout`
/// has elapsed since the call started.
pub fn read_frame<R: Read + ?Sized>(
    port: &mut R,
    terminator: Terminator,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<RawFrame, ProtocolError> {
    let start = Instant::now();
    let mut acc: Vec<u8> = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if cancel.is_cancelled() {
            return Err(ProtocolError::Cancelled);
        }
        if start.elapsed() > timeout {
            debug!("recv timeout, partial {:?}", String::from_utf8_lossy(&acc));
            return Err(ProtocolError::TimedOut(timeout));
        }

        match port.read(&mut byte) {
            Ok(1) => {
                if terminator.push(&mut acc, byte[0]) {
                    break;
                }
            }
            Ok(_) => thread::sleep(POLL_INTERVAL),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                thread::sleep(POLL_INTERVAL)
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let frame = RawFrame(acc);
    debug!("recv {}", frame);
    Ok(frame)
}
