//! Foreground handle for transmitting and for reading what was received.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    capture::Capturer,
    codeword::{self, Code, CodeWord, MAX_BINARY_SYMBOLS},
    decoder::DecodedMessage,
    inbox::{Inbox, MessageConsumer, MessageProducer},
    protocol::{Protocol, ProtocolTable},
    transmitter::Transmitter,
    Error,
};

/// A remote switch transceiver.
///
/// Owns the transmitter and shares an [`Inbox`] and a message queue with the
/// [`Capturer`] running in the receive interrupt:
///
/// ```ignore
/// static INBOX: Inbox = Inbox::new();
/// static mut QUEUE: MessageQueue = MessageQueue::new();
///
/// let (producer, consumer) = unsafe { QUEUE.split() };
/// let mut switch = RcSwitch::new(delay, &INBOX, consumer);
/// switch.enable_transmit(tx_pin);
/// switch.switch_on_d('b', 2)?;
///
/// switch.enable_receive(RX_LINE);
/// let mut capturer = switch.capturer(producer); // move into the edge interrupt
///
/// if let Some(msg) = switch.consume() {
///     // ...
/// }
/// ```
pub struct RcSwitch<'a, PIN, DELAY> {
    protocols: ProtocolTable<'a>,
    transmitter: Transmitter<PIN, DELAY>,
    inbox: &'a Inbox,
    messages: MessageConsumer<'a>,
    /// Most recent message taken off the queue
    last: Option<DecodedMessage>,
    /// `last` not consumed yet
    pending: bool,
}

impl<'a, PIN, DELAY> RcSwitch<'a, PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(delay: DELAY, inbox: &'a Inbox, messages: MessageConsumer<'a>) -> Self {
        Self::with_protocols(delay, inbox, messages, ProtocolTable::builtin())
    }

    pub fn with_protocols(
        delay: DELAY,
        inbox: &'a Inbox,
        messages: MessageConsumer<'a>,
        protocols: ProtocolTable<'a>,
    ) -> Self {
        let mut transmitter = Transmitter::new(delay);
        transmitter.config.protocol = protocols.select(1);

        Self {
            protocols,
            transmitter,
            inbox,
            messages,
            last: None,
            pending: false,
        }
    }

    pub fn protocols(&self) -> ProtocolTable<'a> {
        self.protocols
    }

    /// The receiver half for the edge interrupt, sharing this switch's inbox
    /// and protocol table. `messages` is the producer half of the queue this
    /// switch consumes.
    pub fn capturer(&self, messages: MessageProducer<'a>) -> Capturer<'a> {
        Capturer::with_protocols(self.inbox, messages, self.protocols)
    }

    // Transmit configuration

    /// Transmit with protocol `id`. Unknown ids fall back to protocol 1.
    pub fn select_protocol(&mut self, id: u8) {
        self.transmitter.config.protocol = self.protocols.select(id);
    }

    pub fn select_protocol_with_pulse_length(&mut self, id: u8, pulse_length: u32) {
        self.select_protocol(id);
        self.set_pulse_length(pulse_length);
    }

    /// Transmit with a protocol that is not in the table.
    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.transmitter.config.protocol = protocol;
    }

    pub fn protocol(&self) -> Protocol {
        self.transmitter.config.protocol
    }

    /// Override the base pulse length of the active protocol.
    pub fn set_pulse_length(&mut self, pulse_length: u32) {
        let protocol = self.transmitter.config.protocol;
        self.transmitter.config.protocol = protocol.with_pulse_length(pulse_length);
    }

    pub fn set_repeat_transmit(&mut self, repeat: u32) {
        self.transmitter.config.repeat = repeat;
    }

    pub fn repeat_transmit(&self) -> u32 {
        self.transmitter.config.repeat
    }

    pub fn enable_transmit(&mut self, pin: PIN) -> Option<PIN> {
        self.transmitter.enable(pin)
    }

    pub fn disable_transmit(&mut self) -> Option<PIN> {
        self.transmitter.disable()
    }

    pub fn transmit_enabled(&self) -> bool {
        self.transmitter.is_enabled()
    }

    // Transmit

    /// Send the lowest `code.bit_length` bits of `code.value`, at most 64.
    pub fn transmit(&mut self, code: Code) -> Result<(), Error<PIN::Error>> {
        if code.bit_length as usize > MAX_BINARY_SYMBOLS {
            return Err(Error::TooLong(MAX_BINARY_SYMBOLS));
        }
        self.transmitter.send(code).map_err(Error::Pin)
    }

    pub fn transmit_tristate(&mut self, word: &str) -> Result<(), Error<PIN::Error>> {
        let code = codeword::encode_tristate(word).map_err(|err| err.widen::<PIN::Error>())?;
        self.transmit(code)
    }

    pub fn transmit_binary(&mut self, word: &str) -> Result<(), Error<PIN::Error>> {
        let code = codeword::encode_binary(word).map_err(|err| err.widen::<PIN::Error>())?;
        self.transmit(code)
    }

    fn transmit_codeword(
        &mut self,
        codeword: Result<CodeWord, Error>,
    ) -> Result<(), Error<PIN::Error>> {
        let codeword = codeword.map_err(|err| err.widen::<PIN::Error>())?;
        log::debug!("Codeword {}", codeword);
        self.transmit_tristate(codeword.as_str())
    }

    /// Type A, see [`codeword::codeword_a`].
    pub fn switch_on_a(&mut self, group: &str, device: &str) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_a(group, device, true))
    }

    pub fn switch_off_a(&mut self, group: &str, device: &str) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_a(group, device, false))
    }

    /// Type B, see [`codeword::codeword_b`].
    pub fn switch_on_b(&mut self, address: u8, channel: u8) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_b(address, channel, true))
    }

    pub fn switch_off_b(&mut self, address: u8, channel: u8) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_b(address, channel, false))
    }

    /// Type C, see [`codeword::codeword_c`].
    pub fn switch_on_c(
        &mut self,
        family: char,
        group: u8,
        device: u8,
    ) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_c(family, group, device, true))
    }

    pub fn switch_off_c(
        &mut self,
        family: char,
        group: u8,
        device: u8,
    ) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_c(family, group, device, false))
    }

    /// Type D, see [`codeword::codeword_d`].
    pub fn switch_on_d(&mut self, group: char, device: u8) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_d(group, device, true))
    }

    pub fn switch_off_d(&mut self, group: char, device: u8) -> Result<(), Error<PIN::Error>> {
        self.transmit_codeword(codeword::codeword_d(group, device, false))
    }

    // Receive

    /// Start accepting edges from `line` in the [`Capturer`]. Clears any
    /// pending message.
    pub fn enable_receive(&mut self, line: u8) {
        self.reset_available();
        self.inbox.enable(line);
    }

    /// Takes effect on the next edge; an edge already queued by the hardware
    /// may still be delivered and is ignored.
    pub fn disable_receive(&self) {
        self.inbox.disable();
    }

    pub fn set_receive_tolerance(&self, percent: u8) {
        self.inbox.set_tolerance(percent);
    }

    /// Take everything the capturer queued, keeping the newest.
    fn drain(&mut self) {
        while let Some(message) = self.messages.dequeue() {
            self.last = Some(message);
            self.pending = true;
        }
    }

    /// A message arrived and was not consumed yet. An all-zero message
    /// counts as available.
    pub fn available(&mut self) -> bool {
        self.drain();
        self.pending
    }

    pub fn reset_available(&mut self) {
        self.drain();
        self.pending = false;
    }

    /// Take the last received message.
    pub fn consume(&mut self) -> Option<DecodedMessage> {
        let message = self.received();
        self.pending = false;
        message
    }

    /// The last received message if not consumed yet.
    pub fn received(&mut self) -> Option<DecodedMessage> {
        self.drain();
        self.last.filter(|_| self.pending)
    }

    /// Received value, 0 when nothing is available.
    pub fn received_value(&mut self) -> u64 {
        self.received().map_or(0, |msg| msg.value)
    }

    /// The most recent message, consumed or not.
    fn last(&mut self) -> DecodedMessage {
        self.drain();
        self.last.unwrap_or_default()
    }

    pub fn received_bit_length(&mut self) -> u32 {
        self.last().bit_length
    }

    pub fn received_protocol(&mut self) -> u8 {
        self.last().protocol
    }

    /// Measured base pulse length of the last message in microseconds.
    pub fn received_delay(&mut self) -> u32 {
        self.last().delay
    }
}
