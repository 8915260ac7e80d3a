use std::{
    sync::{Arc, atomic::{AtomicBool, Ordering::*}},
    time::Duration,
    };
use log::*;
use tokio::time::{Instant, sleep};

use crate::registers::MotorStatus;
use super::{Error, Servo, Transport};


/// timing of [Servo::wait_for_move_finished]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    /// delay between two status reads
    pub interval: Duration,
    /// give up once this time elapsed since the wait started
    pub timeout: Duration,
}
impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            timeout: Duration::from_secs(30),
        }
    }
}

/// flag aborting a wait from an other task, clones share the same flag
#[derive(Clone, Debug, Default)]
pub struct Cancel {
    flag: Arc<AtomicBool>,
}
impl Cancel {
    pub fn new() -> Self {Self::default()}
    /// abort the waits using this flag, at their next poll
    pub fn cancel(&self) {self.flag.store(true, Release)}
    pub fn is_cancelled(&self) -> bool {self.flag.load(Acquire)}
}

/// how a wait ended
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// the motor reported it stopped
    Finished,
    /// the timeout elapsed before the motor stopped
    TimedOut,
    /// the wait was cancelled before the motor stopped
    Cancelled,
}


impl<T: Transport> Servo<'_, T> {
    /**
        poll the motor status until the motor reports [MotorStatus::Stopped]

        the status is read every `options.interval`, the cancel flag is checked before each read. A transport fault while polling ends the wait with that fault.
    */
    pub async fn wait_for_move_finished(&self, options: &WaitOptions, cancel: &Cancel) -> Result<Completion, Error> {
        // no deadline when the timeout does not fit in the clock
        let deadline = Instant::now().checked_add(options.timeout);
        let mut polls = 0usize;
        let mut last = None;
        loop {
            if cancel.is_cancelled() {
                debug!("servo {}: wait cancelled after {} polls", self.address(), polls);
                return Ok(Completion::Cancelled)
            }
            let status = self.motor_status().await?;
            polls += 1;
            trace!("servo {}: status {:?}", self.address(), status);
            match status {
                MotorStatus::Stopped => {
                    debug!("servo {}: move finished after {} polls", self.address(), polls);
                    return Ok(Completion::Finished)
                },
                MotorStatus::Failure if last != Some(status) =>
                    warn!("servo {}: motor reports failure while waiting", self.address()),
                _ => {},
            }
            last = Some(status);
            let delay = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        warn!("servo {}: move not finished after {:?}", self.address(), options.timeout);
                        return Ok(Completion::TimedOut)
                    }
                    options.interval.min(deadline - now)
                },
                None => options.interval,
            };
            sleep(delay).await;
        }
    }
}
