//! Codeword encoding.
//!
//! A tri-state word is a string over `0`, `1` and `F`, sent as two bits per
//! symbol: `0` = `00`, `F` = `01`, `1` = `11`. Binary words are sent one bit
//! per symbol. Both are assembled most significant bit first.
//!
//! The switch family builders produce the fixed 12 symbol tri-state words
//! understood by the common remote sockets.

use core::fmt;

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Longest tri-state word that fits in a [`Code`].
pub const MAX_TRISTATE_SYMBOLS: usize = 32;
/// Longest binary word that fits in a [`Code`].
pub const MAX_BINARY_SYMBOLS: usize = 64;
/// Length of a switch family codeword.
pub const CODEWORD_LEN: usize = 12;

/// The bits to transmit: the lowest `bit_length` bits of `value`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Code {
    pub value: u64,
    pub bit_length: u32,
}

impl Code {
    pub fn new(value: u64, bit_length: u32) -> Self {
        Self { value, bit_length }
    }

    /// Bits in transmission order, most significant first.
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let value = self.value;
        (0..self.bit_length)
            .rev()
            .map(move |bit| value.checked_shr(bit).map_or(false, |v| v & 1 == 1))
    }
}

/// Encode a tri-state word.
pub fn encode_tristate(word: &str) -> Result<Code, Error> {
    let mut code = Code::default();

    for (idx, symbol) in word.chars().enumerate() {
        if idx == MAX_TRISTATE_SYMBOLS {
            return Err(Error::TooLong(MAX_TRISTATE_SYMBOLS));
        }

        let bits = match symbol {
            '0' => 0b00,
            'F' => 0b01,
            '1' => 0b11,
            other => return Err(Error::InvalidSymbol(other)),
        };

        code.value = code.value << 2 | bits;
        code.bit_length += 2;
    }

    Ok(code)
}

/// Encode a binary word. Anything but `0` is a one.
pub fn encode_binary(word: &str) -> Result<Code, Error> {
    let mut code = Code::default();

    for (idx, symbol) in word.chars().enumerate() {
        if idx == MAX_BINARY_SYMBOLS {
            return Err(Error::TooLong(MAX_BINARY_SYMBOLS));
        }

        code.value = code.value << 1 | u64::from(symbol != '0');
        code.bit_length += 1;
    }

    Ok(code)
}

/// A 12 symbol tri-state codeword of a switch family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeWord(String<CODEWORD_LEN>);

impl CodeWord {
    fn from_symbols(symbols: impl Iterator<Item = char>) -> Self {
        Self(symbols.collect())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn code(&self) -> Result<Code, Error> {
        encode_tristate(self.as_str())
    }
}

impl fmt::Display for CodeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type A: switches with two rows of 5 DIP switches.
///
/// `group` and `device` give the DIP positions, `1` for on and `0` for off,
/// e.g. `"11001"`.
///
/// ```text
/// +------------------+------------------+----------------+
/// | 5 symbols group  | 5 symbols device | 2 symbols      |
/// | on=0 off=F       | on=0 off=F       | on=0F off=F0   |
/// +------------------+------------------+----------------+
/// ```
pub fn codeword_a(group: &str, device: &str, on: bool) -> Result<CodeWord, Error> {
    fn dip_switches(positions: &str) -> Result<impl Iterator<Item = char> + '_, Error> {
        let valid = positions.len() == 5 && positions.bytes().all(|b| b == b'0' || b == b'1');
        if !valid {
            return Err(Error::InvalidParameter);
        }
        Ok(positions
            .chars()
            .map(|pos| if pos == '0' { 'F' } else { '0' }))
    }

    let status = if on { "0F" } else { "F0" };

    Ok(CodeWord::from_symbols(
        dip_switches(group)?
            .chain(dip_switches(device)?)
            .chain(status.chars()),
    ))
}

/// Type B: switches with two rotary or sliding switches.
///
/// ```text
/// +-----------------------------+-----------------------------+----------+------------+
/// | 4 symbols address           | 4 symbols channel           | 3 symbols| 1 symbol   |
/// | 1=0FFF 2=F0FF 3=FF0F 4=FFF0 | 1=0FFF 2=F0FF 3=FF0F 4=FFF0 | FFF      | on=F off=0 |
/// +-----------------------------+-----------------------------+----------+------------+
/// ```
pub fn codeword_b(address: u8, channel: u8, on: bool) -> Result<CodeWord, Error> {
    if !(1..=4).contains(&address) || !(1..=4).contains(&channel) {
        return Err(Error::InvalidParameter);
    }

    let status = if on { 'F' } else { '0' };

    Ok(CodeWord::from_symbols(
        one_hot(address, 4, '0', 'F')
            .chain(one_hot(channel, 4, '0', 'F'))
            .chain("FFF".chars())
            .chain(core::iter::once(status)),
    ))
}

/// Type C: Intertechno.
///
/// `family` is `a` to `p`, `group` and `device` 1 to 4. Family, device and
/// group are written as bit fields, least significant bit first, with a set
/// bit as `F`.
pub fn codeword_c(family: char, group: u8, device: u8, on: bool) -> Result<CodeWord, Error> {
    if !('a'..='p').contains(&family) || !(1..=4).contains(&group) || !(1..=4).contains(&device)
    {
        return Err(Error::InvalidParameter);
    }

    let family = family as u8 - b'a';
    let status = if on { 'F' } else { '0' };

    Ok(CodeWord::from_symbols(
        bit_field(family, 4)
            .chain(bit_field(device - 1, 2))
            .chain(bit_field(group - 1, 2))
            .chain("0FF".chars())
            .chain(core::iter::once(status)),
    ))
}

/// Type D: REV.
///
/// ```text
/// +-----------------------------+-------------------+-----------+--------------+
/// | 4 symbols group             | 3 symbols device  | 3 symbols | 2 symbols    |
/// | A=1FFF B=F1FF C=FF1F D=FFF1 | 1=1FF 2=F1F 3=FF1 | 000       | on=10 off=01 |
/// +-----------------------------+-------------------+-----------+--------------+
/// ```
pub fn codeword_d(group: char, device: u8, on: bool) -> Result<CodeWord, Error> {
    let group = match group {
        'a'..='d' => group as u8 - b'a' + 1,
        'A'..='D' => group as u8 - b'A' + 1,
        _ => return Err(Error::InvalidParameter),
    };
    if !(1..=3).contains(&device) {
        return Err(Error::InvalidParameter);
    }

    let status = if on { "10" } else { "01" };

    Ok(CodeWord::from_symbols(
        one_hot(group, 4, '1', 'F')
            .chain(one_hot(device, 3, '1', 'F'))
            .chain("000".chars())
            .chain(status.chars()),
    ))
}

/// `slots` symbols, `active` at the 1-based `position`, `idle` elsewhere.
fn one_hot(position: u8, slots: u8, active: char, idle: char) -> impl Iterator<Item = char> {
    (1..=slots).map(move |slot| if slot == position { active } else { idle })
}

fn bit_field(value: u8, width: u8) -> impl Iterator<Item = char> {
    (0..width).map(move |bit| if value & (1 << bit) != 0 { 'F' } else { '0' })
}
