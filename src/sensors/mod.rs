//! Sensor side of the panel: the shared converter, the calibration math and
//! the acquisition cycle that ties them together.

pub mod ads1115;
pub mod calibration;

use crate::error::{DeviceError, ReadFault};

pub use ads1115::Ads1115;
pub use calibration::{Calibration, LinearMap, TemperatureCalibration};

/// Raw converter output, two's complement as delivered by the ADS1115
pub type RawSample = i16;

/// One analog input on the shared converter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Temperature,
    Moisture,
    Light,
}

impl Channel {
    /// Acquisition order. Also the order lines appear on screen.
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Moisture, Channel::Light];

    /// Converter input line (AINx) the sensor is wired to
    pub const fn input(self) -> u8 {
        match self {
            Channel::Temperature => 0,
            Channel::Moisture => 1,
            Channel::Light => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Channel::Temperature => "Temperature",
            Channel::Moisture => "Moisture",
            Channel::Light => "Light",
        }
    }
}

/// Calibrated values from one acquisition cycle.
///
/// Only ever built from three successful reads; it is handed to the render
/// sink and dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Degrees Celsius
    pub temperature: f64,
    /// Soil moisture percent, unclamped
    pub moisture: i32,
    /// Ambient light percent, unclamped
    pub light: i32,
}

/// Anything that can run one conversion on one channel.
///
/// Takes `&mut self`, so only one conversion can be in flight on a given
/// converter at a time.
pub trait ChannelReader {
    fn read(&mut self, channel: Channel) -> Result<RawSample, DeviceError>;
}

impl<T: ChannelReader + ?Sized> ChannelReader for &mut T {
    fn read(&mut self, channel: Channel) -> Result<RawSample, DeviceError> {
        (**self).read(channel)
    }
}

/// Reads every channel and calibrates the results.
pub struct Acquisition<R> {
    reader: R,
    calibration: Calibration,
}

impl<R: ChannelReader> Acquisition<R> {
    pub fn new(reader: R, calibration: Calibration) -> Self {
        Self {
            reader,
            calibration,
        }
    }

    /// Runs one cycle: Temperature, Moisture, Light, strictly in that order.
    ///
    /// The first failing read ends the cycle; no partial reading escapes.
    pub fn acquire(&mut self) -> Result<Reading, ReadFault> {
        let temperature = self.sample(Channel::Temperature)?;
        let moisture = self.sample(Channel::Moisture)?;
        let light = self.sample(Channel::Light)?;

        Ok(Reading {
            temperature: self.calibration.temperature.degrees(temperature),
            moisture: self.calibration.moisture.map(moisture),
            light: self.calibration.light.map(light),
        })
    }

    fn sample(&mut self, channel: Channel) -> Result<RawSample, ReadFault> {
        let raw = self
            .reader
            .read(channel)
            .map_err(|error| ReadFault { channel, error })?;
        debug!("{} raw: {}", channel.label(), raw);
        Ok(raw)
    }

    /// Gives the converter back
    pub fn release(self) -> R {
        self.reader
    }
}
