/*!
    conversions between register words and typed values

    the device transfers everything as 16 bit words, wider integers span several consecutive registers with the most significant word first
*/

use thiserror::Error;

use crate::registers::*;


/// maximum number of words written in one transaction by this crate
pub const MAX_WORDS: usize = 4;
/// encoded register content
pub type Words = heapless::Vec<u16, MAX_WORDS>;

/// error raised when register words do not decode to the expected type
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{value:#06x} is not a valid {kind}")]
    Value {kind: &'static str, value: u16},
    #[error("expected {expected} words, received {received}")]
    Width {expected: usize, received: usize},
}

/// value that can be written to registers
pub trait Encode {
    fn encode(&self) -> Words;
}
/// value that can be read from registers
pub trait Decode: Sized {
    /// number of consecutive registers holding the value
    const WORDS: u16;
    /// decode from exactly [Self::WORDS] words
    fn decode(words: &[u16]) -> Result<Self, DecodeError>;
}


/// split a signed 32 bit integer in its high and low words
pub const fn encode_i32(value: i32) -> [u16; 2] {
    let value = value as u32;
    [(value >> 16) as u16, value as u16]
}
/// join high and low words in a signed 32 bit integer
pub const fn decode_i32(words: [u16; 2]) -> i32 {
    ((words[0] as u32) << 16 | words[1] as u32) as i32
}
/// join three words in a signed 48 bit integer, sign extended from bit 47
pub const fn decode_i48(words: [u16; 3]) -> i64 {
    let raw = (words[0] as u64) << 32 | (words[1] as u64) << 16 | words[2] as u64;
    ((raw << 16) as i64) >> 16
}


fn words<const N: usize>(words: [u16; N]) -> Words {
    words.into_iter().collect()
}
fn take<const N: usize>(words: &[u16]) -> Result<[u16; N], DecodeError> {
    words.try_into().map_err(|_| DecodeError::Width {expected: N, received: words.len()})
}


impl Encode for u16 {
    fn encode(&self) -> Words {words([*self])}
}
impl Decode for u16 {
    const WORDS: u16 = 1;
    fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        let [value] = take(words)?;
        Ok(value)
    }
}
impl Decode for i16 {
    const WORDS: u16 = 1;
    fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        let [value] = take(words)?;
        Ok(value as i16)
    }
}
impl Decode for i32 {
    const WORDS: u16 = 2;
    fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        Ok(decode_i32(take(words)?))
    }
}
/// 64 bit integers are transfered as 48 bit on this device
impl Decode for i64 {
    const WORDS: u16 = 3;
    fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        Ok(decode_i48(take(words)?))
    }
}
impl<const N: usize> Decode for [u16; N] {
    const WORDS: u16 = N as u16;
    fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        take(words)
    }
}

/// implement [Encode] and [Decode] for a closed single word enumeration
macro_rules! wire_enum {
    ($($t:ident),+ $(,)?) => {$(
        impl Encode for $t {
            fn encode(&self) -> Words {words([*self as u16])}
        }
        impl Decode for $t {
            const WORDS: u16 = 1;
            fn decode(words: &[u16]) -> Result<Self, DecodeError> {
                let [value] = take(words)?;
                <$t>::try_from(value)
                    .map_err(|_| DecodeError::Value {kind: stringify!($t), value})
            }
        }
    )+};
}
wire_enum!(
    WorkMode,
    MotorRotation,
    MotorStatus,
    EnableActiveLevel,
    BaudRate,
    HomeTrigger,
    EndLimit,
    Enable,
    HomeStatus,
    );

impl Decode for IoStatus {
    const WORDS: u16 = 1;
    fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        let [value] = take(words)?;
        Ok(IoStatus::from(value))
    }
}
impl Decode for EncoderCarry {
    const WORDS: u16 = 3;
    fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        let [high, low, value] = take(words)?;
        Ok(EncoderCarry {
            carry: decode_i32([high, low]),
            value,
            })
    }
}

impl Encode for Trigger {
    fn encode(&self) -> Words {words([Trigger::WORD])}
}
/// the trigger level and the direction share the first word, as `trigger << 1 | direction`
impl Encode for HomeParameters {
    fn encode(&self) -> Words {
        let mode = (self.trigger as u16) << 1 | self.direction as u16;
        words([mode, self.speed, self.end_limit as u16])
    }
}
impl Encode for AbsoluteMove {
    fn encode(&self) -> Words {
        let [high, low] = encode_i32(self.target);
        words([u16::from(self.acceleration), self.speed, high, low])
    }
}
