//! Command handler of a bridge board: a transceiver driven by a host over a
//! serial link.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    message::{Command, ErrorCode, Info, Reply, TransmitRequest, VERSION},
    switch::RcSwitch,
    Error,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Receive,
}

/// Serves host [`Command`]s with an [`RcSwitch`].
///
/// Both [`handle_command`](Self::handle_command) and [`poll`](Self::poll)
/// belong in the main loop; a transmit blocks until the whole pulse train
/// is sent.
pub struct Bridge<'a, PIN, DELAY> {
    pub state: State,
    switch: RcSwitch<'a, PIN, DELAY>,
}

impl<'a, PIN, DELAY> Bridge<'a, PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(switch: RcSwitch<'a, PIN, DELAY>) -> Self {
        Self {
            state: State::Idle,
            switch,
        }
    }

    pub fn switch(&mut self) -> &mut RcSwitch<'a, PIN, DELAY> {
        &mut self.switch
    }

    pub fn handle_command(&mut self, cmd: Command) -> Reply {
        match cmd {
            Command::Idle => {
                self.switch.disable_receive();
                self.state = State::Idle;
                Reply::Ok
            }
            Command::Info => Reply::Info {
                info: Info {
                    version: VERSION,
                    protocols: self.switch.protocols().len(),
                    transmitter: self.switch.transmit_enabled(),
                },
            },
            Command::Receive { line, tolerance } => {
                self.switch.set_receive_tolerance(tolerance);
                self.switch.enable_receive(line);
                self.state = State::Receive;
                Reply::Ok
            }
            Command::Transmit(request) => self.transmit(request),
        }
    }

    fn transmit(&mut self, request: TransmitRequest) -> Reply {
        if !self.switch.transmit_enabled() {
            return Reply::Error {
                code: ErrorCode::NoTransmitter,
            };
        }

        self.switch.select_protocol(request.protocol);
        if request.pulse_length != 0 {
            self.switch.set_pulse_length(request.pulse_length);
        }
        self.switch.set_repeat_transmit(request.repeat);

        match self.switch.transmit(request.code) {
            Ok(()) => Reply::Ok,
            Err(Error::Pin(err)) => {
                log::warn!("Transmit failed: {:?}", err);
                Reply::Error {
                    code: ErrorCode::Transmit,
                }
            }
            Err(err) => {
                log::warn!("Rejected {:?}: {}", request.code, err);
                Reply::Error {
                    code: ErrorCode::InvalidRequest,
                }
            }
        }
    }

    /// A reply for a newly received message, if any.
    pub fn poll(&mut self) -> Option<Reply> {
        match self.state {
            State::Idle => None,
            State::Receive => self
                .switch
                .consume()
                .map(|message| Reply::Received { message }),
        }
    }
}
