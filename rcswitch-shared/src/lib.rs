//! Remote switch transceiver.
//!
//! Encodes switch commands into the pulse trains of the common 433 MHz
//! remote sockets and decodes received pulse trains, detecting which of the
//! known [`protocol`]s produced them.
//!
//! - [`RcSwitch`] is the foreground handle: transmit, configure, read what
//!   was received.
//! - [`Capturer`] runs in the edge interrupt of the receive line.
//! - [`Inbox`] carries the receive settings from the first to the second,
//!   a [`MessageQueue`] the decoded messages back.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod bridge;
pub mod capture;
pub mod codeword;
pub mod decoder;
mod error;
pub mod inbox;
pub mod message;
pub mod protocol;
pub mod switch;
pub mod transmitter;

#[cfg(feature = "std")]
pub mod trace;

#[cfg(feature = "utils")]
mod link;

pub use capture::Capturer;
pub use codeword::{Code, CodeWord};
pub use decoder::{DecodeError, DecodedMessage};
pub use error::Error;
pub use inbox::{Inbox, MessageConsumer, MessageProducer, MessageQueue};
pub use protocol::{Protocol, ProtocolTable, PulseShape, PROTOCOLS};
pub use switch::RcSwitch;

#[cfg(feature = "utils")]
pub use link::SerialLink;
