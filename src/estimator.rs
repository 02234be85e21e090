//! Turns pairs of echo edges into distances.

use embassy_sync::channel::TrySendError;
use embassy_time::{with_timeout, Instant};

use crate::config::{ECHO_TIMEOUT, FAULT_THRESHOLD_CM, SPEED_OF_SOUND_CM_PER_US};
use crate::edge::EdgeEvent;
use crate::pipeline::{DistanceChannel, DropCounter, EdgeChannel};

/// Distance to the target in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Distance(f32);

impl Distance {
    /// Published when the echo never came back.
    pub const NO_ECHO: Distance = Distance(f32::INFINITY);

    pub const fn from_cm(cm: f32) -> Self {
        Self(cm)
    }

    pub fn cm(self) -> f32 {
        self.0
    }

    /// Out of range, no echo, or otherwise not a usable reading.
    pub fn is_fault(self) -> bool {
        self.0 > FAULT_THRESHOLD_CM
    }
}

/// Signed `second - first` in microseconds.
pub fn diff_us(first: Instant, second: Instant) -> i64 {
    second.as_micros() as i64 - first.as_micros() as i64
}

/// Distance for an echo pulse that went high at `rise` and low at `fall`.
///
/// Sound travels there and back, hence the halving. A pulse that ends
/// before it starts is reported as [`Distance::NO_ECHO`].
pub fn compute_distance(rise: Instant, fall: Instant) -> Distance {
    let duration = diff_us(rise, fall);
    if duration < 0 {
        return Distance::NO_ECHO;
    }
    Distance(duration as f32 * SPEED_OF_SOUND_CM_PER_US / 2.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoState {
    AwaitingRising,
    AwaitingFalling(Instant),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EstimatorStats {
    /// complete rising/falling pairs
    pub measured: u32,
    /// rising edges whose falling edge never showed up
    pub timeouts: u32,
    /// edges thrown away because they arrived out of order
    pub resyncs: u32,
}

pub struct DistanceEstimator<'a> {
    edges: &'a EdgeChannel,
    distances: &'a DistanceChannel,
    drops: &'a DropCounter,
    state: EchoState,
    stats: EstimatorStats,
}

impl<'a> DistanceEstimator<'a> {
    pub fn new(edges: &'a EdgeChannel, distances: &'a DistanceChannel, drops: &'a DropCounter) -> Self {
        Self {
            edges,
            distances,
            drops,
            state: EchoState::AwaitingRising,
            stats: EstimatorStats::default(),
        }
    }

    pub fn state(&self) -> EchoState {
        self.state
    }

    pub fn stats(&self) -> EstimatorStats {
        self.stats
    }

    /// Consumes one edge (or one timeout) and advances the pairing state.
    ///
    /// Returns the distance if this step completed a measurement. Only the
    /// wait for a falling edge is bounded; waiting for a rising edge lasts
    /// until the next trigger produces one.
    pub async fn step(&mut self) -> Option<Distance> {
        match self.state {
            EchoState::AwaitingRising => {
                match self.edges.receive().await {
                    EdgeEvent::Rising(at) => self.state = EchoState::AwaitingFalling(at),
                    EdgeEvent::Falling(at) => {
                        trace!("stray falling edge at {}", at);
                        self.stats.resyncs += 1;
                    }
                }
                None
            }
            EchoState::AwaitingFalling(rise) => match with_timeout(ECHO_TIMEOUT, self.edges.receive()).await {
                Ok(EdgeEvent::Falling(fall)) => {
                    self.state = EchoState::AwaitingRising;
                    self.stats.measured += 1;
                    Some(self.publish(compute_distance(rise, fall)))
                }
                Ok(EdgeEvent::Rising(at)) => {
                    // falling edge got lost, measure from the newer rise
                    trace!("second rising edge at {}", at);
                    self.stats.resyncs += 1;
                    self.state = EchoState::AwaitingFalling(at);
                    None
                }
                Err(_) => {
                    debug!("no echo within {} ms", ECHO_TIMEOUT.as_millis());
                    self.stats.timeouts += 1;
                    self.state = EchoState::AwaitingRising;
                    Some(self.publish(Distance::NO_ECHO))
                }
            },
        }
    }

    fn publish(&self, distance: Distance) -> Distance {
        if let Err(TrySendError::Full(_)) = self.distances.try_send(distance) {
            let total = self.drops.bump();
            trace!("distance dropped, {} so far", total);
        }
        distance
    }

    pub async fn run(&mut self) -> ! {
        loop {
            if let Some(distance) = self.step().await {
                debug!("distance: {} cm", distance.cm());
            }
        }
    }
}
