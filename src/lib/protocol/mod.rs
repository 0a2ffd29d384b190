mod frame;
mod reply;

use std::io::{self, Read, Write};
use std::time::Duration;
use thiserror::Error;

pub use frame::{read_frame, RawFrame, Terminator};
pub use reply::{extract_payload, interpret, reply_echo, DecodedValue};

pub const REQUEST_PREFIX: &str = "Y";
pub const LINE_TERMINATOR: &str = "\n";
pub const GET_SENTINEL: u8 = b'>';
pub const SET_SENTINEL: &str = "Done";

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("no reply frame within {0:?}")]
    TimedOut(Duration),
    #[error("cancelled while waiting for reply")]
    Cancelled,
    #[error("serial i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Whether repeating the exchange could help.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ProtocolError::Cancelled)
    }
}

/// Serial connection to a device.
pub trait Link: Read + Write {
    /// Drops bytes already received but not yet read.
    fn discard_input(&mut self) -> io::Result<()>;
}

/// Renders one request line: `Y <opcode> <function code> [<value>]`.
pub fn encode(opcode: u8, function_code: u16, value: Option<&str>) -> String {
    match value {
        Some(value) => format!(
            "{} {} {} {}{}",
            REQUEST_PREFIX, opcode, function_code, value, LINE_TERMINATOR
        ),
        None => format!(
            "{} {} {}{}",
            REQUEST_PREFIX, opcode, function_code, LINE_TERMINATOR
        ),
    }
}
