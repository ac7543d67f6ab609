use embedded_hal::{
    delay::DelayNs,
    digital::{OutputPin, PinState},
};

use crate::{
    codeword::Code,
    protocol::{Protocol, PulseShape, PROTOCOLS},
};

/// Number of times a frame is sent by default.
pub const DEFAULT_REPEAT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitConfig {
    pub protocol: Protocol,
    pub repeat: u32,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            protocol: PROTOCOLS[0],
            repeat: DEFAULT_REPEAT,
        }
    }
}

/// Bit-banging transmitter.
///
/// Sending blocks for the whole pulse train, tens of milliseconds with the
/// default repeat count. Never call it from interrupt context.
pub struct Transmitter<PIN, DELAY> {
    pin: Option<PIN>,
    delay: DELAY,
    pub config: TransmitConfig,
}

impl<PIN, DELAY> Transmitter<PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(delay: DELAY) -> Self {
        Self {
            pin: None,
            delay,
            config: TransmitConfig::default(),
        }
    }

    /// Bind the output pin. Returns the previously bound pin.
    pub fn enable(&mut self, pin: PIN) -> Option<PIN> {
        self.pin.replace(pin)
    }

    /// Unbind and return the output pin.
    pub fn disable(&mut self) -> Option<PIN> {
        self.pin.take()
    }

    pub fn is_enabled(&self) -> bool {
        self.pin.is_some()
    }

    /// Send `code` `repeat` times, each frame followed by the sync pulse.
    /// Leaves the line low. Does nothing when no pin is bound.
    pub fn send(&mut self, code: Code) -> Result<(), PIN::Error> {
        let Some(pin) = self.pin.as_mut() else {
            return Ok(());
        };
        let TransmitConfig { protocol, repeat } = self.config;

        log::debug!(
            "Sending {:#x} ({} bits) {} times, pulse length {} us",
            code.value,
            code.bit_length,
            repeat,
            protocol.pulse_length,
        );

        for _ in 0..repeat {
            for bit in code.bits() {
                let shape = if bit { protocol.one } else { protocol.zero };
                pulse(pin, &mut self.delay, &protocol, shape)?;
            }
            pulse(pin, &mut self.delay, &protocol, protocol.sync)?;
        }

        // Carrier off, also for inverted protocols
        pin.set_low()
    }
}

fn pulse<PIN, DELAY>(
    pin: &mut PIN,
    delay: &mut DELAY,
    protocol: &Protocol,
    shape: PulseShape,
) -> Result<(), PIN::Error>
where
    PIN: OutputPin,
    DELAY: DelayNs,
{
    let active = PinState::from(!protocol.inverted);

    pin.set_state(active)?;
    delay.delay_us(protocol.pulse_length.saturating_mul(u32::from(shape.high)));
    pin.set_state(!active)?;
    delay.delay_us(protocol.pulse_length.saturating_mul(u32::from(shape.low)));

    Ok(())
}
