mod common;

use common::{Call, Scripted};
use mks_servo::{
    driver::*,
    registers::{self, *},
    codec::DecodeError,
    };


#[tokio::test]
async fn move_to_pulses_single_transaction() {
    let (transport, calls) = Scripted::new([]);
    let bus = Bus::new(transport);
    let servo = bus.servo(1).unwrap();

    servo.move_to_pulses(50, 200, -1).await.unwrap();
    assert_eq!(calls.all(), [Call::WriteRegisters {slave: 1, address: 0xFE, values: vec![50, 200, 0xffff, 0xffff]}]);
}

#[tokio::test]
async fn move_to_axis_layout() {
    let (transport, calls) = Scripted::new([]);
    let bus = Bus::new(transport);
    let servo = bus.servo(3).unwrap();

    servo.move_to_axis(10, 3000, 0x0002_8000).await.unwrap();
    assert_eq!(calls.all(), [Call::WriteRegisters {slave: 3, address: 0xF5, values: vec![10, 3000, 0x0002, 0x8000]}]);
}

#[tokio::test]
async fn home_parameters_packing() {
    let (transport, calls) = Scripted::new([]);
    let bus = Bus::new(transport);
    let servo = bus.servo(1).unwrap();

    servo.set_home_parameters(HomeParameters {
        trigger: HomeTrigger::High,
        direction: MotorRotation::Ccw,
        speed: 300,
        end_limit: EndLimit::Enable,
        }).await.unwrap();
    assert_eq!(calls.all(), [Call::WriteRegisters {slave: 1, address: 0x90, values: vec![0b11, 300, 1]}]);
}

#[tokio::test]
async fn configuration_writes() {
    let (transport, calls) = Scripted::new([]);
    let bus = Bus::new(transport);
    let servo = bus.servo(7).unwrap();

    servo.set_work_mode(WorkMode::SrVfoc).await.unwrap();
    servo.set_work_current(1600).await.unwrap();
    servo.set_hold_current(4).await.unwrap();
    servo.set_subdivision(16).await.unwrap();
    servo.set_enable_active_level(EnableActiveLevel::Always).await.unwrap();
    servo.set_motor_direction(MotorRotation::Ccw).await.unwrap();
    servo.set_shaft_lock(Enable::Enable).await.unwrap();
    servo.set_interpolation(Enable::Disable).await.unwrap();
    servo.set_baud_rate(BaudRate::Baud115200).await.unwrap();

    let write = |address, value| Call::WriteRegister {slave: 7, address, value};
    assert_eq!(calls.all(), [
        write(0x82, 5),
        write(0x83, 1600),
        write(0x9B, 4),
        write(0x84, 16),
        write(0x85, 2),
        write(0x86, 1),
        write(0x88, 1),
        write(0x89, 0),
        write(0x8A, 6),
        ]);
}

#[tokio::test]
async fn trigger_commands() {
    let (transport, calls) = Scripted::new([]);
    let bus = Bus::new(transport);
    let servo = bus.servo(2).unwrap();

    servo.set_axis_to_zero().await.unwrap();
    servo.go_home().await.unwrap();
    servo.stop().await.unwrap();
    assert_eq!(calls.all(), [
        Call::WriteRegister {slave: 2, address: 0x92, value: 1},
        Call::WriteRegister {slave: 2, address: 0x91, value: 1},
        Call::WriteRegister {slave: 2, address: 0xF7, value: 1},
        ]);
}

#[tokio::test]
async fn telemetry_reads() {
    let (transport, calls) = Scripted::new([
        vec![1],
        vec![6],
        vec![0x0000, 0x0120],
        vec![0xffff, 0xffff, 0xfc18],
        vec![0x0000, 0x0003, 0x1000],
        vec![0xffce],
        vec![0xffff, 0xff38],
        vec![0b0101],
        vec![1],
        ]);
    let bus = Bus::new(transport);
    let servo = bus.servo(1).unwrap();

    assert_eq!(servo.motor_status().await.unwrap(), MotorStatus::Stopped);
    assert_eq!(servo.motor_status().await.unwrap(), MotorStatus::Calibrating);
    assert_eq!(servo.error_angle().await.unwrap(), [0x0000, 0x0120]);
    assert_eq!(servo.encoder_addition().await.unwrap(), -1000);
    assert_eq!(servo.encoder_carry().await.unwrap(), EncoderCarry {carry: 3, value: 0x1000});
    assert_eq!(servo.motor_speed().await.unwrap(), -50);
    assert_eq!(servo.pulses().await.unwrap(), -200);
    let io = servo.io_status().await.unwrap();
    assert!(io.in1() && io.out1() && !io.in2() && !io.out2());
    assert_eq!(servo.home_status().await.unwrap(), HomeStatus::Success);

    let read = |address, count| Call::ReadInput {slave: 1, address, count};
    assert_eq!(calls.all(), [
        read(0xF1, 1),
        read(0xF1, 1),
        read(0x39, 2),
        read(0x31, 3),
        read(0x30, 3),
        read(0x32, 1),
        read(0x33, 2),
        read(0x34, 1),
        read(0x3B, 1),
        ]);
}

#[tokio::test]
async fn undefined_status_is_a_decode_error() {
    let (transport, _) = Scripted::new([vec![7]]);
    let bus = Bus::new(transport);
    let servo = bus.servo(1).unwrap();

    match servo.motor_status().await {
        Err(Error::Decode(DecodeError::Value {kind: "MotorStatus", value: 7})) => {},
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn short_answer_is_a_decode_error() {
    let (transport, _) = Scripted::new([vec![0x0000, 0x0001]]);
    let bus = Bus::new(transport);
    let servo = bus.servo(1).unwrap();

    match servo.encoder_addition().await {
        Err(Error::Decode(DecodeError::Width {expected: 3, received: 2})) => {},
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn holding_registers_are_readable() {
    let (transport, calls) = Scripted::new([vec![4]]);
    let bus = Bus::new(transport);
    let servo = bus.servo(9).unwrap();

    assert_eq!(servo.read(registers::WORK_MODE).await.unwrap(), WorkMode::SrClose);
    assert_eq!(calls.all(), [Call::ReadHolding {slave: 9, address: 0x82, count: 1}]);
}

#[tokio::test]
async fn faults_are_not_retried() {
    let (transport, calls) = Scripted::failing();
    let bus = Bus::new(transport);
    let servo = bus.servo(1).unwrap();

    let home = HomeParameters {
        trigger: HomeTrigger::Low,
        direction: MotorRotation::Cw,
        speed: 100,
        end_limit: EndLimit::Disable,
        };
    let results = [
        servo.set_work_mode(WorkMode::CrOpen).await,
        servo.set_work_current(1000).await,
        servo.set_hold_current(2).await,
        servo.set_subdivision(8).await,
        servo.set_enable_active_level(EnableActiveLevel::Low).await,
        servo.set_motor_direction(MotorRotation::Cw).await,
        servo.set_shaft_lock(Enable::Disable).await,
        servo.set_interpolation(Enable::Enable).await,
        servo.set_baud_rate(BaudRate::Baud9600).await,
        servo.set_home_parameters(home).await,
        servo.move_to_pulses(1, 100, 1000).await,
        servo.move_to_axis(1, 100, 1000).await,
        servo.set_axis_to_zero().await,
        servo.go_home().await,
        servo.stop().await,
        ];
    let operations = results.len();
    for (i, result) in results.into_iter().enumerate() {
        assert!(matches!(result, Err(Error::Bus(Fault::Exception(0x04)))), "operation {}", i);
    }
    // one transaction per operation
    assert_eq!(calls.count(), operations);

    calls.clear();
    assert!(matches!(servo.motor_status().await, Err(Error::Bus(Fault::Timeout))));
    assert_eq!(calls.count(), 1);

    calls.clear();
    assert!(matches!(servo.set_slave_address(5).await, Err(Error::Bus(Fault::Exception(0x04)))));
    assert_eq!(calls.count(), 1);
}

#[tokio::test]
async fn preconditions_checked_before_transport() {
    let (transport, calls) = Scripted::new([]);
    let bus = Bus::new(transport);

    assert!(matches!(bus.servo(0), Err(Error::Argument(_))));
    assert!(matches!(bus.servo(248), Err(Error::Argument(_))));

    let mut servo = bus.servo(1).unwrap();
    assert!(matches!(servo.move_to_pulses(10, 3001, 0).await, Err(Error::Argument(_))));
    assert!(matches!(servo.move_to_axis(10, u16::MAX, 0).await, Err(Error::Argument(_))));
    assert!(matches!(servo.set_home_parameters(HomeParameters {
        trigger: HomeTrigger::Low,
        direction: MotorRotation::Cw,
        speed: 4000,
        end_limit: EndLimit::Disable,
        }).await, Err(Error::Argument(_))));
    assert!(matches!(servo.set_address(0), Err(Error::Argument(_))));
    assert_eq!(servo.address(), 1);
    assert_eq!(calls.count(), 0);
}

#[tokio::test]
async fn slave_address_change() {
    let (transport, calls) = Scripted::new([vec![1]]);
    let bus = Bus::new(transport);
    let servo = bus.servo(1).unwrap();

    let servo = servo.set_slave_address(12).await.unwrap();
    assert_eq!(servo.address(), 12);
    servo.motor_status().await.unwrap();
    assert_eq!(calls.all(), [
        Call::WriteRegister {slave: 1, address: 0x8B, value: 12},
        Call::ReadInput {slave: 12, address: 0xF1, count: 1},
        ]);

    let servo = bus.servo(12).unwrap();
    assert!(matches!(servo.set_slave_address(0).await, Err(Error::Argument(_))));
    assert_eq!(calls.count(), 2);
}

#[tokio::test]
async fn handles_share_the_bus() {
    let (transport, calls) = Scripted::new([]);
    let bus = Bus::new(transport);
    let mut first = bus.servo(1).unwrap();
    let second = bus.servo(2).unwrap();

    first.stop().await.unwrap();
    second.stop().await.unwrap();
    first.set_address(3).unwrap();
    first.stop().await.unwrap();

    let slaves: Vec<u8> = calls.all().into_iter().map(|call| match call {
        Call::WriteRegister {slave, ..} => slave,
        other => panic!("unexpected call {:?}", other),
        }).collect();
    assert_eq!(slaves, [1, 2, 3]);
}
