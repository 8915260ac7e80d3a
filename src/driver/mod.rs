/*!
    asynchronous driver for servos sharing a modbus field bus

    The central resource is the [Bus] struct which owns the transport and serializes all transactions on it.
    To communicate with a specific servo, use the [Servo] struct which is a lightweight reference to [Bus] bound to a device address.

    - methods at [Bus] level transfer typed registers to any device address
    - methods at [Servo] level are the domain operations of one device

    no operation is retried, every fault is returned to the caller
*/

/// transport contract and transaction handling
mod bus;
/// domain operations of one device
mod servo;
/// polling a servo until its motion is done
mod waiting;
/// modbus RTU transport over a serial port
#[cfg(feature = "rtu")]
mod rtu;


pub use bus::*;
pub use servo::*;
pub use waiting::*;
#[cfg(feature = "rtu")]
pub use rtu::*;


use crate::codec::DecodeError;
use thiserror::Error;

/// failure reported by the transport while performing a transaction
#[derive(Error, Debug)]
pub enum Fault {
    #[error("problem with serial link")]
    Io(#[from] std::io::Error),
    #[error("device answered exception code {0:#04x}")]
    Exception(u8),
    #[error("malformed response: {0}")]
    Protocol(String),
    #[error("no response arrived in expected time")]
    Timeout,
}

/// error regarding servo communication
#[derive(Error, Debug)]
pub enum Error {
    #[error("bus transaction failed")]
    Bus(#[from] Fault),
    #[error("device answered an unexpected value")]
    Decode(#[from] DecodeError),
    #[error("invalid argument: {0}")]
    Argument(&'static str),
}
