//! Raspberry Pi Pico wiring.
//!
//! ADS1115 on I2C0 (GP4 SDA, GP5 SCL). Waveshare 1.8" ST7735 on SPI1
//! (GP10 SCK, GP11 MOSI, GP9 CS, GP8 DC, GP12 RST, GP13 backlight).
//! Stop button on GP15, active high.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_hal::digital::OutputPin;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use rp_pico::hal::gpio::bank0::{Gpio10, Gpio11, Gpio12, Gpio13, Gpio15, Gpio4, Gpio5, Gpio8, Gpio9};
use rp_pico::hal::gpio::{
    FunctionI2C, FunctionSio, FunctionSpi, Pin, PullDown, PullUp, SioInput, SioOutput,
};
use rp_pico::hal::spi::{Enabled, Spi};
use rp_pico::hal::{Timer, I2C};
use rp_pico::pac::{I2C0, SPI1};
use st7735_lcd::ST7735;

use crate::display::canvas::Canvas;
use crate::display::DisplayPort;
use crate::error::DeviceError;
use crate::sensors::Ads1115;
use crate::scheduler::StopButton;

pub use crate::display::canvas::{HEIGHT, WIDTH};

pub const I2C_FREQ_KHZ: u32 = 400;
pub const SPI_FREQ_MHZ: u32 = 4;

pub type Sda = Pin<Gpio4, FunctionI2C, PullUp>;
pub type Scl = Pin<Gpio5, FunctionI2C, PullUp>;
pub type AdcBus = I2C<I2C0, (Sda, Scl)>;
pub type Converter = Ads1115<AdcBus, Timer>;

pub type Mosi = Pin<Gpio11, FunctionSpi, PullDown>;
pub type Sck = Pin<Gpio10, FunctionSpi, PullDown>;
pub type SpiBus = Spi<Enabled, SPI1, (Mosi, Sck), 8>;
pub type Cs = Pin<Gpio9, FunctionSio<SioOutput>, PullDown>;
pub type Dc = Pin<Gpio8, FunctionSio<SioOutput>, PullDown>;
pub type Rst = Pin<Gpio12, FunctionSio<SioOutput>, PullDown>;
pub type Backlight = Pin<Gpio13, FunctionSio<SioOutput>, PullDown>;
pub type Lcd = ST7735<ExclusiveDevice<SpiBus, Cs, NoDelay>, Dc, Rst>;

pub type StopPin = Pin<Gpio15, FunctionSio<SioInput>, PullDown>;
pub type Stop = StopButton<StopPin>;

/// ST7735 panel with its backlight
pub struct St7735Port {
    lcd: Lcd,
    backlight: Backlight,
}

impl St7735Port {
    /// Takes an initialised, landscape-oriented panel and turns the light on
    pub fn new(lcd: Lcd, mut backlight: Backlight) -> Self {
        // rp2040 GPIO writes are infallible
        let _ = backlight.set_high();
        Self { lcd, backlight }
    }
}

impl DisplayPort for St7735Port {
    fn clear(&mut self) -> Result<(), DeviceError> {
        self.lcd
            .clear(Rgb565::BLACK)
            .map_err(|_| DeviceError::Display)
    }

    fn show(&mut self, canvas: &Canvas) -> Result<(), DeviceError> {
        let colors = canvas.pixels().iter().map(|c| c.into_storage());
        self.lcd
            .set_pixels_buffered(0, 0, (WIDTH - 1) as u16, (HEIGHT - 1) as u16, colors)
            .map_err(|_| DeviceError::Display)
    }

    fn release(&mut self) -> Result<(), DeviceError> {
        let blanked = self.clear();
        let _ = self.backlight.set_low();
        blanked
    }
}
