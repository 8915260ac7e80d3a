use log::*;

use crate::{
    codec::{Decode, Encode},
    registers::{self, *},
    };
use super::{
    Error,
    bus::{Bus, Transport, check_address},
    };


/**
    handle to one servo on a [Bus]

    it only holds a reference to the bus and the device address, so it can be created and dropped at no cost. Several handles can share the same bus.

    every method performs exactly one transaction on the bus, except [Servo::wait_for_move_finished]
*/
pub struct Servo<'b, T> {
    bus: &'b Bus<T>,
    address: u8,
}
impl<'b, T: Transport> Servo<'b, T> {
    /// handle to the servo answering to `address`, which must be in 1 ..= 247
    pub fn new(bus: &'b Bus<T>, address: u8) -> Result<Self, Error> {
        check_address(address)?;
        Ok(Self {bus, address})
    }
    pub fn bus(&self) -> &'b Bus<T> {self.bus}
    /// device address used for all transactions of this handle
    pub fn address(&self) -> u8 {self.address}
    /**
        change the device address used by this handle

        this does not reconfigure the device, see [Self::set_slave_address] for that
    */
    pub fn set_address(&mut self, address: u8) -> Result<(), Error> {
        check_address(address)?;
        self.address = address;
        Ok(())
    }

    /// read a register of this servo
    pub async fn read<V: Decode, S: AddressSpace>(&self, register: Register<V, S>) -> Result<V, Error> {
        self.bus.read(self.address, register).await
    }
    /// write a holding register of this servo
    pub async fn write<V: Encode>(&self, register: HoldingRegister<V>, value: V) -> Result<(), Error> {
        self.bus.write(self.address, register, value).await
    }


    pub async fn set_work_mode(&self, mode: WorkMode) -> Result<(), Error> {
        self.write(registers::WORK_MODE, mode).await
    }
    /// working current in mA
    pub async fn set_work_current(&self, current: u16) -> Result<(), Error> {
        self.write(registers::WORK_CURRENT, current).await
    }
    /// holding current as a fraction of the working current, from 0 (10%) to 8 (90%)
    pub async fn set_hold_current(&self, current: u16) -> Result<(), Error> {
        self.write(registers::HOLD_CURRENT, current).await
    }
    /// microsteps per full step, 0 selects 256
    pub async fn set_subdivision(&self, microsteps: u8) -> Result<(), Error> {
        self.write(registers::SUBDIVISION, u16::from(microsteps)).await
    }
    pub async fn set_enable_active_level(&self, level: EnableActiveLevel) -> Result<(), Error> {
        self.write(registers::ENABLE_LEVEL, level).await
    }
    pub async fn set_motor_direction(&self, direction: MotorRotation) -> Result<(), Error> {
        self.write(registers::DIRECTION, direction).await
    }
    /// locked rotor protection, releasing the shaft when it is blocked
    pub async fn set_shaft_lock(&self, enable: Enable) -> Result<(), Error> {
        self.write(registers::ROTOR_LOCK, enable).await
    }
    pub async fn set_interpolation(&self, enable: Enable) -> Result<(), Error> {
        self.write(registers::INTERPOLATION, enable).await
    }
    /// serial rate of the device, the bus must be reopened at this rate once the device restarted
    pub async fn set_baud_rate(&self, rate: BaudRate) -> Result<(), Error> {
        self.write(registers::BAUD_RATE, rate).await
    }
    /**
        give the device a new bus address

        the handle is consumed since the device stops answering to its former address, the returned handle is bound to the new one. In case of error, the device may or may not have switched, a new handle has to be taken from [Bus::servo]
    */
    pub async fn set_slave_address(self, address: u8) -> Result<Self, Error> {
        check_address(address)?;
        self.write(registers::SLAVE_ADDRESS, u16::from(address)).await?;
        info!("servo {}: moved to address {}", self.address, address);
        Ok(Self {bus: self.bus, address})
    }
    pub async fn set_home_parameters(&self, parameters: HomeParameters) -> Result<(), Error> {
        check_speed(parameters.speed)?;
        self.write(registers::HOME_PARAMETERS, parameters).await
    }


    /// move to an absolute position counted in pulses, with speed in rpm
    pub async fn move_to_pulses(&self, acceleration: u8, speed: u16, pulses: i32) -> Result<(), Error> {
        check_speed(speed)?;
        self.write(registers::MOVE_ABSOLUTE_PULSES, AbsoluteMove {acceleration, speed, target: pulses}).await
    }
    /// move to an absolute axis position in encoder units, with speed in rpm
    pub async fn move_to_axis(&self, acceleration: u8, speed: u16, axis: i32) -> Result<(), Error> {
        check_speed(speed)?;
        self.write(registers::MOVE_ABSOLUTE_AXIS, AbsoluteMove {acceleration, speed, target: axis}).await
    }
    /// take the current position as axis zero
    pub async fn set_axis_to_zero(&self) -> Result<(), Error> {
        self.write(registers::AXIS_ZERO, Trigger).await
    }
    /// start homing with the parameters set by [Self::set_home_parameters]
    pub async fn go_home(&self) -> Result<(), Error> {
        self.write(registers::GO_HOME, Trigger).await
    }
    /// emergency stop
    pub async fn stop(&self) -> Result<(), Error> {
        self.write(registers::EMERGENCY_STOP, Trigger).await
    }


    pub async fn motor_status(&self) -> Result<MotorStatus, Error> {
        self.read(registers::MOTOR_STATUS).await
    }
    /// angle error between target and shaft, as raw high and low words
    pub async fn error_angle(&self) -> Result<[u16; 2], Error> {
        self.read(registers::ERROR_ANGLE).await
    }
    /// accumulated encoder value
    pub async fn encoder_addition(&self) -> Result<i64, Error> {
        self.read(registers::ENCODER_ADDITION).await
    }
    pub async fn encoder_carry(&self) -> Result<EncoderCarry, Error> {
        self.read(registers::ENCODER_CARRY).await
    }
    /// shaft speed in rpm
    pub async fn motor_speed(&self) -> Result<i16, Error> {
        self.read(registers::MOTOR_SPEED).await
    }
    /// number of pulses received
    pub async fn pulses(&self) -> Result<i32, Error> {
        self.read(registers::PULSES).await
    }
    pub async fn io_status(&self) -> Result<IoStatus, Error> {
        self.read(registers::IO_STATUS).await
    }
    /// progress of the homing started by [Self::go_home]
    pub async fn home_status(&self) -> Result<HomeStatus, Error> {
        self.read(registers::HOME_STATUS).await
    }
}

fn check_speed(speed: u16) -> Result<(), Error> {
    if speed <= MAX_SPEED  {Ok(())}
    else {Err(Error::Argument("speed exceeds 3000 rpm"))}
}
