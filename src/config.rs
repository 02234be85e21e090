//! Compile-time settings of the ranging pipeline.

use embassy_time::Duration;
use embedded_graphics::prelude::Point;

/// Time between the end of one trigger pulse and the start of the next.
pub const CYCLE_PERIOD: Duration = Duration::from_millis(500);
/// High time of the trigger pulse. HC-SR04 wants at least 10us.
pub const TRIGGER_PULSE_US: u32 = 10;
/// How long the falling edge may take once the rising edge was seen.
/// The sensor itself gives up after ~38ms when nothing reflects.
pub const ECHO_TIMEOUT: Duration = Duration::from_millis(50);

/// cm per us, dry air at ~20'C
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;
/// Anything farther is treated as "no echo".
pub const FAULT_THRESHOLD_CM: f32 = 400.0;

pub const EDGE_QUEUE_DEPTH: usize = 10;
pub const DISTANCE_QUEUE_DEPTH: usize = 10;

// 128x32 OLED layout
pub const FAULT_LABEL: &str = "Fault";
pub const LABEL_ORIGIN: Point = Point::new(0, 0);
pub const BAR_ORIGIN: Point = Point::new(15, 27);
/// The gauge saturates at this many cm, one pixel per cm.
pub const BAR_MAX_CM: f32 = 100.0;

pub const OLED_ADDR: u8 = 0x3c;
pub const I2C_FREQUENCY: u32 = 400_000;

/// Drop counters are logged every this many rendered frames.
pub const STATS_EVERY: u32 = 20;
