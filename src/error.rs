use core::fmt;

use crate::sensors::Channel;

/// Transport failure on the converter or the display.
///
/// These are expected to come and go with loose wiring, so they abort the
/// current cycle but never the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// The addressed device did not acknowledge
    NoAcknowledge,
    /// Any other bus level failure (arbitration, overrun, ...)
    Bus,
    /// The converter never reported a finished conversion
    Timeout,
    /// The display transport rejected a command or pixel write
    Display,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NoAcknowledge => f.write_str("device did not acknowledge"),
            DeviceError::Bus => f.write_str("bus error"),
            DeviceError::Timeout => f.write_str("conversion timed out"),
            DeviceError::Display => f.write_str("display transport error"),
        }
    }
}

impl<E: embedded_hal::i2c::Error> From<E> for DeviceError {
    fn from(e: E) -> Self {
        match e.kind() {
            embedded_hal::i2c::ErrorKind::NoAcknowledge(_) => DeviceError::NoAcknowledge,
            _ => DeviceError::Bus,
        }
    }
}

/// A failed acquisition, naming the channel whose read went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadFault {
    pub channel: Channel,
    pub error: DeviceError,
}

impl fmt::Display for ReadFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} channel: {}", self.channel.label(), self.error)
    }
}

/// Invalid build-time configuration. Fatal: the scheduler is never built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    /// `in_min == in_max` for a linear channel
    EmptyDomain(Channel),
    /// The polling interval is zero
    ZeroInterval,
    /// The temperature offset or scale is NaN or infinite
    NonFiniteTemperature,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyDomain(channel) => {
                write!(f, "{} calibration has an empty input domain", channel.label())
            }
            ConfigurationError::ZeroInterval => f.write_str("polling interval must be non-zero"),
            ConfigurationError::NonFiniteTemperature => {
                f.write_str("temperature offset and scale must be finite")
            }
        }
    }
}
