//! Blocking single-shot driver for the TI ADS1115 16-bit converter.
//!
//! Only the parts the panel needs: single-ended reads on AIN0..AIN3 with a
//! fixed gain and data rate, comparator off.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::DeviceError;
use crate::sensors::{Channel, ChannelReader, RawSample};

/// ADDR pin tied to GND
pub const DEFAULT_ADDRESS: u8 = 0x48;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const OS_START: u16 = 1 << 15;
const OS_READY: u16 = 1 << 15;
const MUX_SINGLE_ENDED: u16 = 0b100;
const MODE_SINGLE_SHOT: u16 = 1 << 8;
const COMP_QUE_DISABLE: u16 = 0b11;

/// Times the ready bit is polled, one conversion period apart, before giving up
pub const READY_POLLS: usize = 3;

/// Programmable gain amplifier setting, named by full scale range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// ±6.144 V
    TwoThirds,
    /// ±4.096 V
    One,
    /// ±2.048 V
    Two,
    /// ±1.024 V
    Four,
    /// ±0.512 V
    Eight,
    /// ±0.256 V
    Sixteen,
}

impl Gain {
    const fn bits(self) -> u16 {
        let pga = match self {
            Gain::TwoThirds => 0b000,
            Gain::One => 0b001,
            Gain::Two => 0b010,
            Gain::Four => 0b011,
            Gain::Eight => 0b100,
            Gain::Sixteen => 0b101,
        };
        pga << 9
    }
}

/// Samples per second
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    Sps8,
    Sps16,
    Sps32,
    Sps64,
    Sps128,
    Sps250,
    Sps475,
    Sps860,
}

impl DataRate {
    const fn bits(self) -> u16 {
        let dr = match self {
            DataRate::Sps8 => 0b000,
            DataRate::Sps16 => 0b001,
            DataRate::Sps32 => 0b010,
            DataRate::Sps64 => 0b011,
            DataRate::Sps128 => 0b100,
            DataRate::Sps250 => 0b101,
            DataRate::Sps475 => 0b110,
            DataRate::Sps860 => 0b111,
        };
        dr << 5
    }

    pub const fn samples_per_second(self) -> u32 {
        match self {
            DataRate::Sps8 => 8,
            DataRate::Sps16 => 16,
            DataRate::Sps32 => 32,
            DataRate::Sps64 => 64,
            DataRate::Sps128 => 128,
            DataRate::Sps250 => 250,
            DataRate::Sps475 => 475,
            DataRate::Sps860 => 860,
        }
    }

    /// One conversion period, rounded up, plus 10% for the internal oscillator
    pub const fn conversion_time_us(self) -> u32 {
        let period = 1_000_000_u32.div_ceil(self.samples_per_second());
        period + period / 10
    }
}

/// Fixed bus settings, chosen once at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    pub address: u8,
    pub gain: Gain,
    pub data_rate: DataRate,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            gain: Gain::One,
            data_rate: DataRate::Sps128,
        }
    }
}

impl AdcConfig {
    /// Config register value that starts a single-shot conversion on `input`
    pub const fn single_shot(&self, input: u8) -> u16 {
        OS_START
            | ((MUX_SINGLE_ENDED | (input as u16 & 0b11)) << 12)
            | self.gain.bits()
            | MODE_SINGLE_SHOT
            | self.data_rate.bits()
            | COMP_QUE_DISABLE
    }
}

pub struct Ads1115<I2C, D> {
    i2c: I2C,
    delay: D,
    config: AdcConfig,
    probed: bool,
}

impl<I2C: I2c, D: DelayNs> Ads1115<I2C, D> {
    /// Wraps the bus. Nothing is sent until [`Ads1115::init`] or the first read.
    pub fn new(i2c: I2C, delay: D, config: AdcConfig) -> Self {
        Self {
            i2c,
            delay,
            config,
            probed: false,
        }
    }

    /// Checks the converter answers on its address.
    pub fn init(&mut self) -> Result<(), DeviceError> {
        self.read_register(REG_CONFIG)?;
        self.probed = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.probed
    }

    /// Runs one single-shot conversion and returns the sample.
    ///
    /// An unprobed converter is probed first, so a device that was missing
    /// at startup is picked up once it answers.
    pub fn read_input(&mut self, input: u8) -> Result<RawSample, DeviceError> {
        if !self.probed {
            self.init()?;
        }

        let config = self.config.single_shot(input);
        self.write_register(REG_CONFIG, config)?;

        let wait = self.config.data_rate.conversion_time_us();
        let mut ready = false;
        for _ in 0..READY_POLLS {
            self.delay.delay_us(wait);
            if (self.read_register(REG_CONFIG)? & OS_READY) != 0 {
                ready = true;
                break;
            }
        }
        if !ready {
            return Err(DeviceError::Timeout);
        }

        Ok(self.read_register(REG_CONVERSION)? as i16)
    }

    /// Gives the bus and delay back
    pub fn destroy(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_register(&mut self, register: u8, value: u16) -> Result<(), DeviceError> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(self.config.address, &[register, hi, lo])
            .map_err(|e| {
                self.probed = false;
                DeviceError::from(e)
            })
    }

    fn read_register(&mut self, register: u8) -> Result<u16, DeviceError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.config.address, &[register], &mut buf)
            .map_err(|e| {
                self.probed = false;
                DeviceError::from(e)
            })?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<I2C: I2c, D: DelayNs> ChannelReader for Ads1115<I2C, D> {
    fn read(&mut self, channel: Channel) -> Result<RawSample, DeviceError> {
        self.read_input(channel.input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal::i2c::NoAcknowledgeSource;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = DEFAULT_ADDRESS;

    fn probe() -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![REG_CONFIG], vec![0x85, 0x83])
    }

    fn start(config: u16) -> I2cTransaction {
        let [hi, lo] = config.to_be_bytes();
        I2cTransaction::write(ADDR, vec![REG_CONFIG, hi, lo])
    }

    fn status(ready: bool) -> I2cTransaction {
        let hi = if ready { 0x80 } else { 0x00 };
        I2cTransaction::write_read(ADDR, vec![REG_CONFIG], vec![hi, 0x00])
    }

    fn result(bytes: [u8; 2]) -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![REG_CONVERSION], bytes.to_vec())
    }

    #[test]
    fn test_config_words() {
        let config = AdcConfig::default();
        assert_eq!(config.single_shot(0), 0xC383);
        assert_eq!(config.single_shot(1), 0xD383);
        assert_eq!(config.single_shot(2), 0xE383);
    }

    #[test]
    fn test_conversion_time() {
        assert_eq!(DataRate::Sps128.conversion_time_us(), 8594);
        assert_eq!(DataRate::Sps860.conversion_time_us(), 1279);
    }

    #[test]
    fn test_read_channel() {
        let expectations = [
            probe(),
            start(0xD383),
            status(false),
            status(true),
            result([0x12, 0x34]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut adc = Ads1115::new(i2c, NoopDelay::new(), AdcConfig::default());

        assert_eq!(adc.read(Channel::Moisture), Ok(0x1234));
        assert!(adc.is_initialized());

        let (mut i2c, _) = adc.destroy();
        i2c.done();
    }

    #[test]
    fn test_negative_sample() {
        let expectations = [probe(), start(0xC383), status(true), result([0xFF, 0xFE])];
        let i2c = I2cMock::new(&expectations);
        let mut adc = Ads1115::new(i2c, NoopDelay::new(), AdcConfig::default());

        assert_eq!(adc.read(Channel::Temperature), Ok(-2));

        let (mut i2c, _) = adc.destroy();
        i2c.done();
    }

    #[test]
    fn test_timeout_when_never_ready() {
        let expectations = [
            probe(),
            start(0xE383),
            status(false),
            status(false),
            status(false),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut adc = Ads1115::new(i2c, NoopDelay::new(), AdcConfig::default());

        assert_eq!(adc.read(Channel::Light), Err(DeviceError::Timeout));

        let (mut i2c, _) = adc.destroy();
        i2c.done();
    }

    #[test]
    fn test_missing_device_is_reprobed() {
        let expectations = [
            probe().with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            probe(),
            start(0xC383),
            status(true),
            result([0x00, 0x10]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut adc = Ads1115::new(i2c, NoopDelay::new(), AdcConfig::default());

        assert_eq!(adc.init(), Err(DeviceError::NoAcknowledge));
        assert!(!adc.is_initialized());
        assert_eq!(adc.read(Channel::Temperature), Ok(16));

        let (mut i2c, _) = adc.destroy();
        i2c.done();
    }

    #[test]
    fn test_bus_error_mid_conversion() {
        let expectations = [probe(), start(0xC383).with_error(ErrorKind::Bus)];
        let i2c = I2cMock::new(&expectations);
        let mut adc = Ads1115::new(i2c, NoopDelay::new(), AdcConfig::default());

        assert_eq!(adc.read(Channel::Temperature), Err(DeviceError::Bus));
        // The next read starts with a fresh probe
        assert!(!adc.is_initialized());

        let (mut i2c, _) = adc.destroy();
        i2c.done();
    }
}
