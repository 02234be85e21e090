//! Periodic trigger pulse, the cadence source of the whole pipeline.

use embassy_time::Timer;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};

use crate::config::{CYCLE_PERIOD, TRIGGER_PULSE_US};
use crate::pipeline::ReadySignal;

pub struct RangeTrigger<'a, P, D> {
    trig: P,
    delay: D,
    ready: &'a ReadySignal,
}

impl<'a, P, D> RangeTrigger<'a, P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Takes the TRIG pin and parks it low.
    ///
    /// `delay` must be a busy-wait with real microsecond resolution, the
    /// sensor ignores pulses much shorter than 10us and a scheduler tick is
    /// far too coarse.
    pub fn new(mut trig: P, delay: D, ready: &'a ReadySignal) -> Self {
        if let Err(e) = trig.set_low() {
            warn!("trigger pin init failed: {}", e.kind());
        }
        Self { trig, delay, ready }
    }

    /// Sends one trigger pulse and posts the ready token.
    pub fn fire(&mut self) -> Result<(), P::Error> {
        self.trig.set_high()?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trig.set_low()?;

        self.ready.signal(());
        Ok(())
    }

    pub async fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.fire() {
                warn!("trigger pulse failed: {}", e.kind());
            }
            Timer::after(CYCLE_PERIOD).await;
        }
    }
}
