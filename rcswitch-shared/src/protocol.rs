//! Pulse protocols of the supported remote switch families.
//!
//! Every symbol on the air is a high pulse followed by a low pulse, both an
//! integer multiple of the protocol's base pulse length:
//!
//! ```text
//!  "0" {1, 3}   _
//!              | |___
//!  "1" {3, 1}   ___
//!              |   |_
//!  sync {1, 31} _
//!              | |_______________________________
//! ```
//!
//! Inverted protocols swap the two levels.

use serde::{Deserialize, Serialize};

/// Number of base pulses the line spends on the active and inactive level.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct PulseShape {
    pub high: u8,
    pub low: u8,
}

impl PulseShape {
    pub const fn new(high: u8, low: u8) -> Self {
        Self { high, low }
    }

    /// The longer half, in base pulses.
    pub fn longest(&self) -> u32 {
        u32::from(self.high.max(self.low))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Protocol {
    /// Base pulse length in microseconds
    pub pulse_length: u32,
    pub sync: PulseShape,
    pub zero: PulseShape,
    pub one: PulseShape,
    /// Active level is low
    pub inverted: bool,
}

impl Protocol {
    pub const fn new(
        pulse_length: u32,
        sync: (u8, u8),
        zero: (u8, u8),
        one: (u8, u8),
        inverted: bool,
    ) -> Self {
        Self {
            pulse_length,
            sync: PulseShape::new(sync.0, sync.1),
            zero: PulseShape::new(zero.0, zero.1),
            one: PulseShape::new(one.0, one.1),
            inverted,
        }
    }

    /// Same shapes, different base pulse length.
    pub fn with_pulse_length(self, pulse_length: u32) -> Self {
        Self {
            pulse_length,
            ..self
        }
    }

    /// Duration of the long half of the sync pulse. This is the gap a receiver
    /// sees between two repeated frames.
    pub fn sync_gap(&self) -> u32 {
        self.pulse_length.saturating_mul(self.sync.longest())
    }
}

/// The built-in protocols, numbered from 1.
pub const PROTOCOLS: [Protocol; 12] = [
    Protocol::new(350, (1, 31), (1, 3), (3, 1), false),
    Protocol::new(650, (1, 10), (1, 2), (2, 1), false),
    Protocol::new(100, (30, 71), (4, 11), (9, 6), false),
    Protocol::new(380, (1, 6), (1, 3), (3, 1), false),
    Protocol::new(500, (6, 14), (1, 2), (2, 1), false),
    // HT6P20B
    Protocol::new(450, (23, 1), (1, 2), (2, 1), true),
    // HS2303-PT
    Protocol::new(150, (2, 62), (1, 6), (6, 1), false),
    // Conrad RS-200 RX
    Protocol::new(200, (3, 130), (7, 16), (3, 16), false),
    // Conrad RS-200 TX
    Protocol::new(200, (130, 7), (16, 7), (16, 3), true),
    // 1ByOne doorbell
    Protocol::new(365, (18, 1), (3, 1), (1, 3), true),
    // HT12E
    Protocol::new(270, (36, 1), (1, 2), (2, 1), true),
    // SM5212
    Protocol::new(320, (36, 1), (1, 2), (2, 1), true),
];

/// Ordered, 1-based registry of candidate protocols.
///
/// The receiver tries the protocols in table order and stops at the first
/// one that matches.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolTable<'a> {
    protocols: &'a [Protocol],
}

impl<'a> ProtocolTable<'a> {
    /// Ids are a `u8`, so a table holds 1 to 255 protocols.
    pub const fn new(protocols: &'a [Protocol]) -> Self {
        assert!(!protocols.is_empty(), "protocol table must not be empty");
        assert!(
            protocols.len() <= u8::MAX as usize,
            "protocol table holds at most 255 protocols"
        );
        Self { protocols }
    }

    pub fn len(&self) -> u8 {
        // Bounded by `new`
        self.protocols.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    /// Protocol with the 1-based `id`.
    pub fn get(&self, id: u8) -> Option<&'a Protocol> {
        usize::from(id)
            .checked_sub(1)
            .and_then(|idx| self.protocols.get(idx))
    }

    /// Like [`get`](Self::get), but an unknown id falls back to protocol 1.
    pub fn select(&self, id: u8) -> Protocol {
        match self.get(id) {
            Some(protocol) => *protocol,
            None => {
                log::warn!(
                    "Unknown protocol {} (valid 1..={}), using protocol 1",
                    id,
                    self.len()
                );
                self.protocols[0]
            }
        }
    }

    /// `(id, protocol)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &'a Protocol)> + 'a {
        self.protocols
            .iter()
            .enumerate()
            // At most 255 entries, see `new`
            .map(|(idx, protocol)| ((idx + 1) as u8, protocol))
    }
}

impl ProtocolTable<'static> {
    pub const fn builtin() -> Self {
        Self::new(&PROTOCOLS)
    }
}

impl Default for ProtocolTable<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based() {
        let table = ProtocolTable::builtin();

        assert_eq!(table.len(), 12);
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(1), Some(&PROTOCOLS[0]));
        assert_eq!(table.get(12), Some(&PROTOCOLS[11]));
        assert_eq!(table.get(13), None);
    }

    #[test]
    fn select_out_of_range_falls_back_to_first() {
        let table = ProtocolTable::builtin();

        assert_eq!(table.select(0), PROTOCOLS[0]);
        assert_eq!(table.select(42), PROTOCOLS[0]);
        assert_eq!(table.select(6), PROTOCOLS[5]);
    }

    #[test]
    fn pulse_length_keeps_shapes() {
        let p = PROTOCOLS[1].with_pulse_length(700);

        assert_eq!(p.pulse_length, 700);
        assert_eq!(p.sync, PROTOCOLS[1].sync);
        assert_eq!(p.zero, PROTOCOLS[1].zero);
        assert_eq!(p.one, PROTOCOLS[1].one);
    }

    #[test]
    fn sync_gap_uses_long_half() {
        assert_eq!(PROTOCOLS[0].sync_gap(), 31 * 350);
        assert_eq!(PROTOCOLS[5].sync_gap(), 23 * 450);
        assert_eq!(PROTOCOLS[3].sync_gap(), 6 * 380);
    }

    #[test]
    #[should_panic(expected = "at most 255")]
    fn table_ids_fit_a_byte() {
        let protocols = [PROTOCOLS[0]; 256];
        let _table = ProtocolTable::new(&protocols);
    }

    #[test]
    fn largest_table_numbers_up_to_255() {
        let protocols = [PROTOCOLS[0]; 255];
        let table = ProtocolTable::new(&protocols);

        assert_eq!(table.len(), 255);
        assert_eq!(table.iter().last().map(|(id, _)| id), Some(255));
        assert!(table.get(255).is_some());
    }

    #[test]
    fn iter_numbers_protocols() {
        let ids: heapless::Vec<u8, 12> = ProtocolTable::builtin().iter().map(|(id, _)| id).collect();

        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&12));
    }
}
