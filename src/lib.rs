#![cfg_attr(not(test), no_std)]

// first, the other modules use its log macros
mod fmt;

pub mod config;
pub mod edge;
pub mod estimator;
pub mod pipeline;
pub mod presenter;
pub mod trigger;
pub mod ui;

#[cfg(test)]
mod fakes;

pub use edge::{EdgeCapture, EdgeEvent};
pub use estimator::{compute_distance, diff_us, Distance, DistanceEstimator};
pub use pipeline::Pipeline;
pub use presenter::{DisplayPresenter, Frame, Screen};
pub use trigger::RangeTrigger;
