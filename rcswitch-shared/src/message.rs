//! Messages between the host and a bridge board, postcard encoded and COBS
//! framed so a reader can resynchronise on the zero delimiter.

use serde::{Deserialize, Serialize};

use crate::{codeword::Code, decoder::DecodedMessage};

pub const VERSION: u32 = 1;
pub const BAUD_RATE: u32 = 115_200;
/// Upper bound of an encoded frame, delimiter included.
pub const MAX_FRAME_LEN: usize = 64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Idle,
    Info,
    /// Receive on `line` and report every decoded message
    Receive { line: u8, tolerance: u8 },
    Transmit(TransmitRequest),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct TransmitRequest {
    pub protocol: u8,
    /// Pulse length override in microseconds, 0 keeps the protocol's
    pub pulse_length: u32,
    pub repeat: u32,
    pub code: Code,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Reply {
    Ok,
    Info { info: Info },
    Received { message: DecodedMessage },
    Error { code: ErrorCode },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Info {
    pub version: u32,
    /// Number of protocols in the bridge's table
    pub protocols: u8,
    pub transmitter: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorCode {
    NoTransmitter,
    /// The transmitter pin failed
    Transmit,
    /// The code does not fit a transmission
    InvalidRequest,
}

impl Command {
    pub fn to_frame<'b>(&self, buf: &'b mut [u8]) -> postcard::Result<&'b mut [u8]> {
        postcard::to_slice_cobs(self, buf)
    }

    /// Decode one frame, delimiter included. The buffer is decoded in place.
    pub fn from_frame(frame: &mut [u8]) -> Option<Self> {
        match postcard::from_bytes_cobs(frame) {
            Ok(cmd) => Some(cmd),
            Err(err) => {
                log::warn!("Command parse error: {}", err);
                None
            }
        }
    }
}

impl Reply {
    pub fn to_frame<'b>(&self, buf: &'b mut [u8]) -> postcard::Result<&'b mut [u8]> {
        postcard::to_slice_cobs(self, buf)
    }

    pub fn from_frame(frame: &mut [u8]) -> postcard::Result<Self> {
        postcard::from_bytes_cobs(frame)
    }
}
