use crate::error::ConfigurationError;
use crate::sensors::ads1115::AdcConfig;
use crate::sensors::{Calibration, Channel, LinearMap, TemperatureCalibration};
use crate::timer::POLL_INTERVAL_MS;

/// Config holds every build-time constant of the panel.
/// adc: Converter address, gain and data rate
/// poll_interval_ms: Sleep between acquisition cycles
/// temperature: (offset, scale) for `((raw + offset) * scale) * 100`
/// moisture: (in_min, in_max, out_min, out_max)
/// light: (in_min, in_max, out_min, out_max)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub adc: AdcConfig,
    pub poll_interval_ms: u32,
    pub temperature: (f64, f64),
    pub moisture: (i32, i32, i32, i32),
    pub light: (i32, i32, i32, i32),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            adc: AdcConfig::default(),        // 0x48, ±4.096V, 128 SPS
            poll_interval_ms: POLL_INTERVAL_MS,
            temperature: (1500.0, 0.00005),   // LM35 on AIN0
            moisture: (27500, 0, 100, 0),     // Capacitive probe on AIN1
            light: (15000, 100, 0, 100),      // LDR divider on AIN2, darker reads higher
        }
    }
}

impl Config {
    /// Checks every constant and builds the runtime calibration.
    /// Any error here means the scheduler must not start.
    pub fn validate(&self) -> Result<Calibration, ConfigurationError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigurationError::ZeroInterval);
        }
        self.calibration()
    }

    pub fn calibration(&self) -> Result<Calibration, ConfigurationError> {
        let (offset, scale) = self.temperature;
        let temperature = TemperatureCalibration::new(offset, scale)?;
        let moisture = Self::linear(Channel::Moisture, self.moisture)?;
        let light = Self::linear(Channel::Light, self.light)?;
        Ok(Calibration::new(temperature, moisture, light))
    }

    fn linear(
        channel: Channel,
        (in_min, in_max, out_min, out_max): (i32, i32, i32, i32),
    ) -> Result<LinearMap, ConfigurationError> {
        LinearMap::new(channel, in_min, in_max, out_min, out_max)
    }
}
