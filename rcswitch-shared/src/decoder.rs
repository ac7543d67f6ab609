use serde::{Deserialize, Serialize};

use crate::protocol::Protocol;

/// Frames with this many timings or fewer are noise; no sender emits them.
pub const NOISE_EDGES: usize = 7;

/// A successfully decoded frame.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct DecodedMessage {
    pub value: u64,
    pub bit_length: u32,
    /// 1-based id of the matching protocol
    pub protocol: u8,
    /// Measured base pulse length in microseconds
    pub delay: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("timings do not match the protocol")]
    NoMatch,
    #[error("too few edges for a command")]
    TooShort,
}

/// Decode the timings of one frame with protocol `id`.
///
/// `timings[0]` is the sync gap that started the frame. It is used to
/// measure the sender's base pulse length, which makes the match independent
/// of clock drift between sender and receiver. A duration matches when it is
/// strictly closer than `tolerance` percent of the base pulse length to the
/// expected multiple.
pub fn decode(
    id: u8,
    protocol: &Protocol,
    timings: &[u32],
    tolerance: u8,
) -> Result<DecodedMessage, DecodeError> {
    let changes = timings.len();
    if changes <= NOISE_EDGES {
        return Err(DecodeError::TooShort);
    }

    let delay = timings[0] / protocol.sync.longest().max(1);
    let delay_tolerance = u64::from(delay) * u64::from(tolerance) / 100;

    let matches = |duration: u32, pulses: u8| {
        let expected = u64::from(delay) * u64::from(pulses);
        u64::from(duration).abs_diff(expected) < delay_tolerance
    };

    // For protocols that start low, the sync looks like
    //                _________
    //  _____________|         |XXXXXXXXXXXX|
    //  |--1st dur--|-2nd dur-|-Start data-|
    //
    // so the data starts at the 3rd duration. Otherwise the high part of the
    // sync ended the previous frame and the data starts at the 2nd duration.
    let first = if protocol.inverted { 2 } else { 1 };

    let mut value: u64 = 0;
    for pair in timings[first..].chunks_exact(2) {
        let (high, low) = (pair[0], pair[1]);
        value <<= 1;

        if matches(high, protocol.zero.high) && matches(low, protocol.zero.low) {
            // zero
        } else if matches(high, protocol.one.high) && matches(low, protocol.one.low) {
            value |= 1;
        } else {
            return Err(DecodeError::NoMatch);
        }
    }

    Ok(DecodedMessage {
        value,
        bit_length: ((changes - 1) / 2) as u32,
        protocol: id,
        delay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PROTOCOLS;

    /// Protocol 1 frame "10" padded with `01` to pass the noise limit:
    /// sync gap, then four bits, then the sync high that ends the frame.
    fn frame() -> [u32; 10] {
        [
            10850, // gap
            1050, 350, // 1
            350, 1050, // 0
            350, 1050, // 0
            1050, 350, // 1
            350, // sync high
        ]
    }

    #[test]
    fn decodes_protocol_1() {
        let msg = decode(1, &PROTOCOLS[0], &frame(), 60).unwrap();

        assert_eq!(
            msg,
            DecodedMessage {
                value: 0b1001,
                bit_length: 4,
                protocol: 1,
                delay: 350,
            }
        );
    }

    #[test]
    fn tolerance_boundary() {
        // 60 % of 350 = 210
        let mut timings = frame();

        timings[3] = 350 + 209;
        assert!(decode(1, &PROTOCOLS[0], &timings, 60).is_ok());

        timings[3] = 350 - 209;
        assert!(decode(1, &PROTOCOLS[0], &timings, 60).is_ok());

        timings[3] = 350 + 210;
        assert_eq!(decode(1, &PROTOCOLS[0], &timings, 60), Err(DecodeError::NoMatch));

        timings[3] = 350 + 211;
        assert_eq!(decode(1, &PROTOCOLS[0], &timings, 60), Err(DecodeError::NoMatch));
    }

    #[test]
    fn tighter_tolerance_rejects_jitter() {
        let mut timings = frame();
        timings[1] = 1050 + 60;

        assert!(decode(1, &PROTOCOLS[0], &timings, 60).is_ok());
        assert_eq!(decode(1, &PROTOCOLS[0], &timings, 10), Err(DecodeError::NoMatch));
    }

    #[test]
    fn short_frames_are_noise() {
        let timings = frame();

        assert_eq!(decode(1, &PROTOCOLS[0], &timings[..7], 60), Err(DecodeError::TooShort));
        assert_eq!(decode(1, &PROTOCOLS[0], &timings[..1], 60), Err(DecodeError::TooShort));
        assert_eq!(decode(1, &PROTOCOLS[0], &[], 60), Err(DecodeError::TooShort));

        // Short noise that would not match either is still reported as short
        assert_eq!(decode(1, &PROTOCOLS[0], &[5000, 1, 2, 3], 60), Err(DecodeError::TooShort));
    }

    #[test]
    fn inverted_data_starts_after_sync_high() {
        // Protocol 6: sync {23, 1}, zero {1, 2}, one {2, 1}, 450 us
        let timings = [
            23 * 450, // sync low, the gap
            450,      // sync high
            900, 450, // 1
            450, 900, // 0
            900, 450, // 1
            900, 450, // 1
        ];

        let msg = decode(6, &PROTOCOLS[5], &timings, 60).unwrap();

        assert_eq!(msg.value, 0b1011);
        assert_eq!(msg.bit_length, 4);
        assert_eq!(msg.delay, 450);
    }

    #[test]
    fn base_pulse_follows_sender_clock() {
        // Sender runs 10 % slow
        let timings: heapless::Vec<u32, 10> = frame().iter().map(|t| t * 11 / 10).collect();

        let msg = decode(1, &PROTOCOLS[0], &timings, 60).unwrap();

        assert_eq!(msg.value, 0b1001);
        assert_eq!(msg.delay, 11935 / 31);
    }
}
