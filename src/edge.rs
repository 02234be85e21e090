//! Echo edge capture.
//!
//! Runs on the high priority interrupt executor. Each edge of the ECHO line
//! is timestamped as soon as the task is woken and pushed into the edge
//! channel without ever waiting for room.

use embassy_sync::channel::TrySendError;
use embassy_time::Instant;
use embedded_hal::digital::{Error as _, InputPin};
use embedded_hal_async::digital::Wait;

use crate::pipeline::{DropCounter, EdgeChannel};

/// One transition of the ECHO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeEvent {
    Rising(Instant),
    Falling(Instant),
}

impl EdgeEvent {
    pub fn at(&self) -> Instant {
        match *self {
            EdgeEvent::Rising(at) | EdgeEvent::Falling(at) => at,
        }
    }
}

pub struct EdgeCapture<'a> {
    edges: &'a EdgeChannel,
    drops: &'a DropCounter,
}

impl<'a> EdgeCapture<'a> {
    pub fn new(edges: &'a EdgeChannel, drops: &'a DropCounter) -> Self {
        Self { edges, drops }
    }

    /// Queues an edge seen at `at`. The line level after the edge tells
    /// which way it went.
    ///
    /// Returns `false` if the channel was full; the event is then lost and
    /// counted.
    pub fn record(&self, level_high: bool, at: Instant) -> bool {
        let event = if level_high {
            EdgeEvent::Rising(at)
        } else {
            EdgeEvent::Falling(at)
        };

        match self.edges.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                let total = self.drops.bump();
                trace!("edge dropped, {} so far", total);
                false
            }
        }
    }

    pub async fn run<P>(&self, echo: &mut P) -> !
    where
        P: InputPin + Wait,
    {
        loop {
            if let Err(e) = echo.wait_for_any_edge().await {
                warn!("echo wait failed: {}", e.kind());
                continue;
            }
            let at = Instant::now();

            match echo.is_high() {
                Ok(high) => {
                    self.record(high, at);
                }
                Err(e) => warn!("echo read failed: {}", e.kind()),
            }
        }
    }
}
