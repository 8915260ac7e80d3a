#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, Once},
    };
use mks_servo::driver::{Fault, Transport};


/// transaction received by a [Scripted] transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    WriteRegister {slave: u8, address: u16, value: u16},
    WriteRegisters {slave: u8, address: u16, values: Vec<u16>},
    ReadInput {slave: u8, address: u16, count: u16},
    ReadHolding {slave: u8, address: u16, count: u16},
}

/// in-memory transport recording every call and answering reads from a script
pub struct Scripted {
    calls: Arc<Mutex<Vec<Call>>>,
    replies: VecDeque<Vec<u16>>,
    failing: bool,
}
/// view on the calls received by a [Scripted] transport
#[derive(Clone)]
pub struct Calls(Arc<Mutex<Vec<Call>>>);

impl Scripted {
    /// transport answering reads with the given words, in order
    pub fn new(replies: impl IntoIterator<Item=Vec<u16>>) -> (Self, Calls) {
        init_logger();
        let calls = Arc::new(Mutex::new(Vec::new()));
        (Self {calls: calls.clone(), replies: replies.into_iter().collect(), failing: false}, Calls(calls))
    }
    /// transport failing every transaction
    pub fn failing() -> (Self, Calls) {
        let (mut transport, calls) = Self::new([]);
        transport.failing = true;
        (transport, calls)
    }
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
    fn write(&mut self, call: Call) -> Result<(), Fault> {
        self.record(call);
        if self.failing  {Err(Fault::Exception(0x04))}
        else {Ok(())}
    }
    fn read(&mut self, call: Call) -> Result<Vec<u16>, Fault> {
        self.record(call);
        if self.failing
            {return Err(Fault::Timeout)}
        self.replies.pop_front()
            .ok_or_else(|| Fault::Protocol("no scripted reply left".into()))
    }
}
impl Transport for Scripted {
    async fn write_register(&mut self, slave: u8, address: u16, value: u16) -> Result<(), Fault> {
        self.write(Call::WriteRegister {slave, address, value})
    }
    async fn write_registers(&mut self, slave: u8, address: u16, values: &[u16]) -> Result<(), Fault> {
        self.write(Call::WriteRegisters {slave, address, values: values.to_vec()})
    }
    async fn read_input_registers(&mut self, slave: u8, address: u16, count: u16) -> Result<Vec<u16>, Fault> {
        self.read(Call::ReadInput {slave, address, count})
    }
    async fn read_holding_registers(&mut self, slave: u8, address: u16, count: u16) -> Result<Vec<u16>, Fault> {
        self.read(Call::ReadHolding {slave, address, count})
    }
}

impl Calls {
    pub fn all(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

fn init_logger() {
    static LOGGER: Once = Once::new();
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
