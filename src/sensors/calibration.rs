//! Calibration from raw converter samples to physical units.
//!
//! Every conversion here is pure. Parameters are checked once, when the
//! calibration is built, so the conversions themselves cannot fail.

use crate::error::ConfigurationError;
use crate::sensors::{Channel, RawSample};

/// Temperature calibration for an LM35 style sensor
///
/// `degrees = ((raw + offset) * scale) * 100`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureCalibration {
    offset: f64,
    scale: f64,
}

impl TemperatureCalibration {
    pub fn new(offset: f64, scale: f64) -> Result<Self, ConfigurationError> {
        if !offset.is_finite() || !scale.is_finite() {
            return Err(ConfigurationError::NonFiniteTemperature);
        }
        Ok(Self { offset, scale })
    }

    /// Convert a raw sample to degrees Celsius
    #[inline]
    pub fn degrees(&self, raw: RawSample) -> f64 {
        ((f64::from(raw) + self.offset) * self.scale) * 100.0
    }
}

/// Affine map from a raw input domain onto an output range.
///
/// Either side may run backwards (`in_min > in_max`), which is how sensors
/// that read lower as the quantity rises are handled. The result is truncated
/// toward zero and deliberately not clamped: samples outside the domain
/// extrapolate outside the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearMap {
    in_min: i32,
    in_max: i32,
    out_min: i32,
    out_max: i32,
}

impl LinearMap {
    /// `channel` only labels the error when the domain is empty
    pub fn new(
        channel: Channel,
        in_min: i32,
        in_max: i32,
        out_min: i32,
        out_max: i32,
    ) -> Result<Self, ConfigurationError> {
        if in_min == in_max {
            return Err(ConfigurationError::EmptyDomain(channel));
        }
        Ok(Self {
            in_min,
            in_max,
            out_min,
            out_max,
        })
    }

    pub fn map(&self, raw: RawSample) -> i32 {
        let span_in = f64::from(self.in_max) - f64::from(self.in_min);
        let span_out = f64::from(self.out_max) - f64::from(self.out_min);
        let value = (f64::from(raw) - f64::from(self.in_min)) * span_out / span_in
            + f64::from(self.out_min);
        // `as` truncates toward zero
        value as i32
    }
}

/// The full set of per-channel calibrations
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub temperature: TemperatureCalibration,
    pub moisture: LinearMap,
    pub light: LinearMap,
}

impl Calibration {
    pub fn new(temperature: TemperatureCalibration, moisture: LinearMap, light: LinearMap) -> Self {
        Self {
            temperature,
            moisture,
            light,
        }
    }
}
