/*!
    driver for MKS SERVO42D/57D closed loop stepper servos over a modbus RTU field bus

    - [registers] lists where every setting and measure lives in a servo
    - [codec] converts register words to typed values and back
    - [driver] performs the transactions, through any [driver::Transport]

    ```ignore
    use mks_servo::{driver::*, registers::*};

    let bus = Bus::new(RtuTransport::open("/dev/ttyUSB0", RtuSettings::default())?);
    let servo = bus.servo(1)?;
    servo.set_work_mode(WorkMode::SrVfoc).await?;
    servo.move_to_pulses(50, 200, 3200).await?;
    servo.wait_for_move_finished(&WaitOptions::default(), &Cancel::new()).await?;
    ```
*/

pub mod registers;
pub mod codec;
pub mod driver;
