use log::*;
use tokio::sync::Mutex;

use crate::{
    codec::{Decode, Encode},
    registers::{AddressSpace, Holding, Register, Space, SLAVE_ADDRESSES},
    };
use super::{Error, Fault, Servo};


/**
    modbus client primitives this driver relies on

    every primitive addresses the device `slave` on the bus and performs exactly one request/response exchange. Implementations must not retry, faults are reported to the caller.
*/
pub trait Transport: Send {
    /// write one holding register (function code 6)
    fn write_register(&mut self, slave: u8, address: u16, value: u16)
        -> impl Future<Output = Result<(), Fault>> + Send;
    /// write consecutive holding registers (function code 16)
    fn write_registers(&mut self, slave: u8, address: u16, values: &[u16])
        -> impl Future<Output = Result<(), Fault>> + Send;
    /// read consecutive input registers (function code 4)
    fn read_input_registers(&mut self, slave: u8, address: u16, count: u16)
        -> impl Future<Output = Result<Vec<u16>, Fault>> + Send;
    /// read consecutive holding registers (function code 3)
    fn read_holding_registers(&mut self, slave: u8, address: u16, count: u16)
        -> impl Future<Output = Result<Vec<u16>, Fault>> + Send;
}


/**
    field bus shared by servos

    transactions issued by any [Servo] of the same bus are serialized by an internal lock, so a bus can be shared between tasks (put it in an `Arc`)
*/
pub struct Bus<T> {
    transport: Mutex<T>,
}
impl<T: Transport> Bus<T> {
    pub fn new(transport: T) -> Self {
        Self {transport: Mutex::new(transport)}
    }
    /// give back the transport
    pub fn into_inner(self) -> T {
        self.transport.into_inner()
    }
    /// handle to the servo answering to the given address
    pub fn servo(&self, address: u8) -> Result<Servo<'_, T>, Error> {
        Servo::new(self, address)
    }

    /// read a register of the given device
    pub async fn read<V: Decode, S: AddressSpace>(&self, slave: u8, register: Register<V, S>) -> Result<V, Error> {
        check_address(slave)?;
        let words = {
            let mut transport = self.transport.lock().await;
            match register.space() {
                Space::Input => transport.read_input_registers(slave, register.address(), V::WORDS).await,
                Space::Holding => transport.read_holding_registers(slave, register.address(), V::WORDS).await,
            }
        }.inspect_err(|fault| warn!("servo {}: reading {:?} failed: {}", slave, register, fault))?;
        debug!("servo {}: read {:?} -> {:04x?}", slave, register, words);
        V::decode(&words)
            .inspect_err(|error| warn!("servo {}: {:?} {}", slave, register, error))
            .map_err(Error::from)
    }
    /// write a holding register of the given device
    pub async fn write<V: Encode>(&self, slave: u8, register: Register<V, Holding>, value: V) -> Result<(), Error> {
        check_address(slave)?;
        let words = value.encode();
        debug!("servo {}: write {:?} <- {:04x?}", slave, register, words);
        let mut transport = self.transport.lock().await;
        let done = match words.as_slice() {
            [word] => transport.write_register(slave, register.address(), *word).await,
            words => transport.write_registers(slave, register.address(), words).await,
        };
        done.inspect_err(|fault| warn!("servo {}: writing {:?} failed: {}", slave, register, fault))
            .map_err(Error::from)
    }
}

pub(crate) fn check_address(address: u8) -> Result<(), Error> {
    if SLAVE_ADDRESSES.contains(&address)  {Ok(())}
    else {Err(Error::Argument("device address must be in 1 ..= 247"))}
}
