/*!
    register map of the MKS SERVO42D/57D modbus interface

    every register is a constant of type [Register], carrying its address, its address space and the type of value it holds. The value types are the closed enumerations and packed structures defined here, their wire encoding is implemented in [crate::codec]

    addresses mirror the register table published by the manufacturer, they must never be changed without checking it
*/

use core::marker::PhantomData;
use bilge::prelude::*;


/// read-only telemetry registers, read with function code 4
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Input;
/// writable configuration and command registers, function codes 3, 6 and 16
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Holding;

/// runtime tag of an address space
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Space {
    Input,
    Holding,
}
/// address space a register lives in, implemented by [Input] and [Holding]
pub trait AddressSpace: Copy {
    const SPACE: Space;
}
impl AddressSpace for Input {
    const SPACE: Space = Space::Input;
}
impl AddressSpace for Holding {
    const SPACE: Space = Space::Holding;
}


/**
    a register is a typed pointer in a servo's register table

    it only holds the address of the first 16 bit word of the referenced value, hence can be created, copied or destroyed at no cost. The number of words is given by the value type.

    the address space is part of the type, so that only [Holding] registers can be written
*/
#[derive(PartialEq, Eq, Hash)]
pub struct Register<T, S> {
    address: u16,
    ty: PhantomData<(T, S)>,
}
impl<T, S: AddressSpace> Register<T, S> {
    /// create a register from its first word address
    pub const fn new(address: u16) -> Self {
        Self{address, ty: PhantomData}
    }
    /// first word address
    pub const fn address(&self) -> u16 {self.address}
    /// address space of the register
    pub const fn space(&self) -> Space {S::SPACE}
}
impl<T, S: AddressSpace> Clone for Register<T, S> {
    fn clone(&self) -> Self {
        Self::new(self.address())
    }
}
impl<T, S: AddressSpace> Copy for Register<T, S> {}
impl<T, S: AddressSpace> core::fmt::Debug for Register<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}({:#04x})", S::SPACE, self.address)
    }
}

/// telemetry register
pub type InputRegister<T> = Register<T, Input>;
/// configuration or command register
pub type HoldingRegister<T> = Register<T, Holding>;



/// encoder value with its carry count
pub const ENCODER_CARRY: InputRegister<EncoderCarry> = Register::new(0x30);
/// accumulated encoder value, 48 bit signed
pub const ENCODER_ADDITION: InputRegister<i64> = Register::new(0x31);
/// current shaft speed in rpm, negative when turning counterclockwise
pub const MOTOR_SPEED: InputRegister<i16> = Register::new(0x32);
/// number of pulses received
pub const PULSES: InputRegister<i32> = Register::new(0x33);
/// state of the IO ports
pub const IO_STATUS: InputRegister<IoStatus> = Register::new(0x34);
/// angle error between target and shaft, left as raw words
pub const ERROR_ANGLE: InputRegister<[u16; 2]> = Register::new(0x39);
/// progress of the last homing
pub const HOME_STATUS: InputRegister<HomeStatus> = Register::new(0x3B);
/// run status of the motor
pub const MOTOR_STATUS: InputRegister<MotorStatus> = Register::new(0xF1);

pub const WORK_MODE: HoldingRegister<WorkMode> = Register::new(0x82);
/// working current in mA
pub const WORK_CURRENT: HoldingRegister<u16> = Register::new(0x83);
/// microsteps per full step, 0 selects 256
pub const SUBDIVISION: HoldingRegister<u16> = Register::new(0x84);
/// active level of the EN pin
pub const ENABLE_LEVEL: HoldingRegister<EnableActiveLevel> = Register::new(0x85);
/// positive rotation direction
pub const DIRECTION: HoldingRegister<MotorRotation> = Register::new(0x86);
/// locked rotor protection
pub const ROTOR_LOCK: HoldingRegister<Enable> = Register::new(0x88);
/// subdivision interpolation
pub const INTERPOLATION: HoldingRegister<Enable> = Register::new(0x89);
pub const BAUD_RATE: HoldingRegister<BaudRate> = Register::new(0x8A);
/// bus address the device answers to
pub const SLAVE_ADDRESS: HoldingRegister<u16> = Register::new(0x8B);
pub const HOME_PARAMETERS: HoldingRegister<HomeParameters> = Register::new(0x90);
/// starts homing when written
pub const GO_HOME: HoldingRegister<Trigger> = Register::new(0x91);
/// sets the current position as axis zero when written
pub const AXIS_ZERO: HoldingRegister<Trigger> = Register::new(0x92);
/// holding current, in tenths of the working current starting at 10%
pub const HOLD_CURRENT: HoldingRegister<u16> = Register::new(0x9B);
/// move to an absolute axis position (encoder units)
pub const MOVE_ABSOLUTE_AXIS: HoldingRegister<AbsoluteMove> = Register::new(0xF5);
/// stops the motor immediately when written
pub const EMERGENCY_STOP: HoldingRegister<Trigger> = Register::new(0xF7);
/// move to an absolute position counted in pulses
pub const MOVE_ABSOLUTE_PULSES: HoldingRegister<AbsoluteMove> = Register::new(0xFE);


/// maximum speed accepted for moves and homing, in rpm
pub const MAX_SPEED: u16 = 3000;
/// range of bus addresses a device can be given
pub const SLAVE_ADDRESSES: core::ops::RangeInclusive<u8> = 1 ..= 247;



/// control loop and current regulation of the motor
#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum WorkMode {
    /// constant current, open loop
    CrOpen = 0,
    /// constant current, closed loop
    CrClose = 1,
    /// constant current, field oriented control
    CrVfoc = 2,
    /// serial control, open loop
    SrOpen = 3,
    /// serial control, closed loop
    SrClose = 4,
    /// serial control, field oriented control
    SrVfoc = 5,
}

#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum MotorRotation {
    /// clockwise
    Cw = 0,
    /// counterclockwise
    Ccw = 1,
}

/**
    run status of the motor, as reported by the device

    the device goes `Stopped -> SpeedingUp | Homing | Calibrating -> FullSpeed -> SpeedingDown -> Stopped`, and may fall in `Failure` from any state
*/
#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum MotorStatus {
    /// the device failed to read its own status
    Failure = 0,
    Stopped = 1,
    SpeedingUp = 2,
    SpeedingDown = 3,
    FullSpeed = 4,
    Homing = 5,
    Calibrating = 6,
}

/// level of the EN pin enabling the motor
#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum EnableActiveLevel {
    Low = 0,
    High = 1,
    /// motor always enabled, whatever the pin
    Always = 2,
}

/// serial rate selector, taking effect after the device restarts
#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum BaudRate {
    Baud9600 = 1,
    Baud19200 = 2,
    Baud25000 = 3,
    Baud38400 = 4,
    Baud57600 = 5,
    Baud115200 = 6,
    Baud256000 = 7,
}
impl BaudRate {
    /// symbol rate selected
    pub const fn bits_per_second(self) -> u32 {
        match self {
            Self::Baud9600 => 9600,
            Self::Baud19200 => 19200,
            Self::Baud25000 => 25000,
            Self::Baud38400 => 38400,
            Self::Baud57600 => 57600,
            Self::Baud115200 => 115200,
            Self::Baud256000 => 256000,
        }
    }
}

/// level of the home switch when reached
#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum HomeTrigger {
    Low = 0,
    High = 1,
}

/// whether the home switch also acts as an end limit
#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum EndLimit {
    Disable = 0,
    Enable = 1,
}

#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum Enable {
    Disable = 0,
    Enable = 1,
}

/// progress of the homing started by [GO_HOME]
#[bitsize(16)]
#[derive(Copy, Clone, TryFromBits, Debug, PartialEq, Eq)]
pub enum HomeStatus {
    InProgress = 0,
    Success = 1,
    Failure = 2,
}


/// state of the IO ports
#[bitsize(16)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq, Eq)]
pub struct IoStatus {
    pub in1: bool,
    pub in2: bool,
    pub out1: bool,
    pub out2: bool,
    reserved: u12,
}

/// encoder reading split in full turns and position inside the turn
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncoderCarry {
    /// number of full turns
    pub carry: i32,
    /// position in the current turn, from 0 to 0x3fff
    pub value: u16,
}

/// homing configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HomeParameters {
    /// level of the home switch when reached
    pub trigger: HomeTrigger,
    /// direction to search the home switch
    pub direction: MotorRotation,
    /// homing speed in rpm
    pub speed: u16,
    pub end_limit: EndLimit,
}

/// absolute move command, for both [MOVE_ABSOLUTE_PULSES] and [MOVE_ABSOLUTE_AXIS]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AbsoluteMove {
    /// acceleration, 0 moves at constant speed
    pub acceleration: u8,
    /// target speed in rpm
    pub speed: u16,
    /// target position, in pulses or axis units depending on the register
    pub target: i32,
}

/// command word, writing it to a trigger register starts the associated action
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Trigger;
impl Trigger {
    /// the only value the device accepts in trigger registers
    pub const WORD: u16 = 1;
}
