#![cfg_attr(not(test), no_std)]

//! # sensor-panel
//! ## Soil, light and temperature readout for a Pico with an LCD
//!
//! Features:
//! - ADS1115 single-shot sampling of three analog channels
//! - Per-channel calibration into degrees and percent
//! - All-or-nothing acquisition cycles
//! - Fixed-interval scheduler that survives transient bus faults
//! - Stop button with a single, ordered display release
//! - Three-line text layout on a 160x128 canvas, rotated for an inverted mount

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

#[cfg(feature = "rp2040")]
pub mod board;
pub mod config;
pub mod display;
pub mod error;
pub mod scheduler;
pub mod sensors;
pub mod timer;

pub use config::Config;
pub use display::{DisplayPort, RenderSink, Screen};
pub use error::{ConfigurationError, DeviceError, ReadFault};
pub use scheduler::{Cancellation, Scheduler, SchedulerState, StopButton, Summary};
pub use sensors::{Acquisition, Ads1115, Calibration, Channel, ChannelReader, RawSample, Reading};
