//! The queues and the wake-up signal shared between the capture interrupt
//! and the tasks. These are the only state the tasks share.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::config::{DISTANCE_QUEUE_DEPTH, EDGE_QUEUE_DEPTH};
use crate::edge::EdgeEvent;
use crate::estimator::Distance;

/// Timestamped echo edges, interrupt -> estimator.
pub type EdgeChannel = Channel<CriticalSectionRawMutex, EdgeEvent, EDGE_QUEUE_DEPTH>;
/// Computed distances, estimator -> presenter.
pub type DistanceChannel = Channel<CriticalSectionRawMutex, Distance, DISTANCE_QUEUE_DEPTH>;
/// Binary "a trigger cycle completed" token. Signalling while a token is
/// pending keeps a single token.
pub type ReadySignal = Signal<CriticalSectionRawMutex, ()>;

/// Counts values a producer had to throw away because its queue was full.
///
/// `AtomicU32::fetch_add` is not available on thumbv6m, so the count sits
/// behind a critical section like the channels themselves.
pub struct DropCounter {
    count: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl DropCounter {
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Records one drop, returns the new total.
    pub fn bump(&self) -> u32 {
        self.count.lock(|count| {
            let n = count.get().wrapping_add(1);
            count.set(n);
            n
        })
    }

    pub fn get(&self) -> u32 {
        self.count.lock(|count| count.get())
    }
}

impl Default for DropCounter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DropStats {
    pub edges: DropCounter,
    pub distances: DropCounter,
}

impl DropStats {
    pub const fn new() -> Self {
        Self {
            edges: DropCounter::new(),
            distances: DropCounter::new(),
        }
    }
}

impl Default for DropStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the measurement tasks hand to each other, usable as a `static`.
pub struct Pipeline {
    pub edges: EdgeChannel,
    pub distances: DistanceChannel,
    pub ready: ReadySignal,
    pub drops: DropStats,
}

impl Pipeline {
    pub const fn new() -> Self {
        Self {
            edges: Channel::new(),
            distances: Channel::new(),
            ready: Signal::new(),
            drops: DropStats::new(),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
