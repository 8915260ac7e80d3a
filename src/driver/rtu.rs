use core::{
    pin::Pin,
    task::{self, Poll},
    };
use std::{
    io,
    path::Path,
    time::Duration,
    };
use log::*;
use serial2_tokio::{SerialPort, CharSize, StopBits, Parity};
use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    time::{timeout, error::Elapsed},
    };
use tokio_modbus::{
    client::{Context, Reader, Writer, rtu},
    slave::{Slave, SlaveContext},
    ExceptionCode,
    };

use super::{Fault, Transport};


/// serial settings of an [RtuTransport]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RtuSettings {
    /// must match the rate configured in the devices, 38400 when leaving factory
    pub baud_rate: u32,
    /// maximum time waited for each response
    pub timeout: Duration,
}
impl Default for RtuSettings {
    fn default() -> Self {
        Self {
            baud_rate: 38400,
            timeout: Duration::from_secs(3),
        }
    }
}

/**
    modbus RTU client on a serial port

    frames are encoded, checked and exchanged by `tokio-modbus`, this struct only selects the device address of each transaction and bounds its duration
*/
pub struct RtuTransport {
    context: Context,
    timeout: Duration,
}
impl RtuTransport {
    /// open the given serial port file, 8 data bits, no parity, one stop bit
    pub fn open(path: impl AsRef<Path>, settings: RtuSettings) -> Result<Self, io::Error> {
        let path = path.as_ref();
        let port = SerialPort::open(path, |mut serial: serial2_tokio::Settings| {
                serial.set_raw();
                serial.set_baud_rate(settings.baud_rate)?;
                serial.set_char_size(CharSize::Bits8);
                serial.set_stop_bits(StopBits::One);
                serial.set_parity(Parity::None);
                Ok(serial)
                })?;
        info!("opened {} at {} bauds", path.display(), settings.baud_rate);
        Ok(Self {
            context: rtu::attach(Port(port)),
            timeout: settings.timeout,
        })
    }
}

impl Transport for RtuTransport {
    async fn write_register(&mut self, slave: u8, address: u16, value: u16) -> Result<(), Fault> {
        self.context.set_slave(Slave(slave));
        answer(timeout(self.timeout, self.context.write_single_register(address, value)).await)
    }
    async fn write_registers(&mut self, slave: u8, address: u16, values: &[u16]) -> Result<(), Fault> {
        self.context.set_slave(Slave(slave));
        answer(timeout(self.timeout, self.context.write_multiple_registers(address, values)).await)
    }
    async fn read_input_registers(&mut self, slave: u8, address: u16, count: u16) -> Result<Vec<u16>, Fault> {
        self.context.set_slave(Slave(slave));
        answer(timeout(self.timeout, self.context.read_input_registers(address, count)).await)
    }
    async fn read_holding_registers(&mut self, slave: u8, address: u16, count: u16) -> Result<Vec<u16>, Fault> {
        self.context.set_slave(Slave(slave));
        answer(timeout(self.timeout, self.context.read_holding_registers(address, count)).await)
    }
}

/// flatten the timeout, link and exception layers of a response
fn answer<V>(response: Result<Result<Result<V, ExceptionCode>, tokio_modbus::Error>, Elapsed>) -> Result<V, Fault> {
    match response {
        Err(_) => Err(Fault::Timeout),
        Ok(Err(tokio_modbus::Error::Transport(error))) => Err(Fault::Io(error)),
        Ok(Err(error)) => Err(Fault::Protocol(error.to_string())),
        Ok(Ok(Err(exception))) => Err(Fault::Exception(exception_code(exception))),
        Ok(Ok(Ok(value))) => Ok(value),
    }
}

fn exception_code(exception: ExceptionCode) -> u8 {
    match exception {
        ExceptionCode::IllegalFunction => 0x01,
        ExceptionCode::IllegalDataAddress => 0x02,
        ExceptionCode::IllegalDataValue => 0x03,
        ExceptionCode::ServerDeviceFailure => 0x04,
        ExceptionCode::Acknowledge => 0x05,
        ExceptionCode::ServerDeviceBusy => 0x06,
        ExceptionCode::MemoryParityError => 0x08,
        ExceptionCode::GatewayPathUnavailable => 0x0A,
        ExceptionCode::GatewayTargetDevice => 0x0B,
        _ => 0xFF,
    }
}


/// serial port as expected by `tokio-modbus`
struct Port(SerialPort);

impl core::fmt::Debug for Port {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Port")
    }
}
impl AsyncRead for Port {
    fn poll_read(self: Pin<&mut Self>, context: &mut task::Context<'_>, buffer: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().0).poll_read(context, buffer)
    }
}
impl AsyncWrite for Port {
    fn poll_write(self: Pin<&mut Self>, context: &mut task::Context<'_>, data: &[u8]) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().0).poll_write(context, data)
    }
    fn poll_flush(self: Pin<&mut Self>, context: &mut task::Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().0).poll_flush(context)
    }
    fn poll_shutdown(self: Pin<&mut Self>, context: &mut task::Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().0).poll_shutdown(context)
    }
}
