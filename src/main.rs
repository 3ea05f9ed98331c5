#![no_std]
#![no_main]

use bsp::entry;
use defmt::*;
use defmt_rtt as _;
use embedded_hal_bus::spi::ExclusiveDevice;
use panic_probe as _;
use rp_pico::hal::Timer;

// Provide an alias for our BSP so we can switch targets quickly.
use rp_pico as bsp;

use bsp::hal::{
    clocks::{init_clocks_and_plls, Clock},
    pac,
    watchdog::Watchdog,
};
use rp_pico::hal;
use rp_pico::hal::fugit::RateExtU32;
use rp_pico::hal::gpio::{FunctionI2C, FunctionSpi, Pin, PullUp};
use sensor_panel::board::{self, St7735Port};
use sensor_panel::{Acquisition, Ads1115, Config, Scheduler, Screen, StopButton};
use st7735_lcd::{Orientation, ST7735};

#[entry]
fn main() -> ! {
    info!("Sensor panel starting");

    // Bad constants must stop us before any hardware is touched
    let config = Config::default();
    let calibration = match config.validate() {
        Ok(calibration) => calibration,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            park();
        }
    };

    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // Configure the clocks
    //
    // The default is to generate a 125 MHz system clock
    let clocks = init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // The single-cycle I/O block controls our GPIO pins
    let sio = hal::Sio::new(pac.SIO);

    // Set the pins up according to their function on this particular board
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut delay = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // Set up ADS1115
    let sda: Pin<_, FunctionI2C, PullUp> = pins.gpio4.reconfigure();
    let scl: Pin<_, FunctionI2C, PullUp> = pins.gpio5.reconfigure();
    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda,
        scl,
        board::I2C_FREQ_KHZ.kHz(),
        &mut pac.RESETS,
        clocks.system_clock.freq(),
    );
    let mut converter = Ads1115::new(i2c, delay, config.adc);
    match converter.init() {
        Ok(()) => info!("ADS1115 found at {=u8:#x}", config.adc.address),
        // Not fatal, every read probes again
        Err(e) => warn!("ADS1115 not answering: {}", e),
    }

    // Set up ST7735
    let mosi = pins.gpio11.into_function::<FunctionSpi>();
    let sck = pins.gpio10.into_function::<FunctionSpi>();
    let spi = hal::spi::Spi::<_, _, _, 8>::new(pac.SPI1, (mosi, sck)).init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        board::SPI_FREQ_MHZ.MHz(),
        embedded_hal::spi::MODE_0,
    );
    let cs = pins.gpio9.into_push_pull_output();
    let spi = ExclusiveDevice::new_no_delay(spi, cs).unwrap();
    let dc = pins.gpio8.into_push_pull_output();
    let rst = pins.gpio12.into_push_pull_output();
    let backlight = pins.gpio13.into_push_pull_output();

    let mut lcd = ST7735::new(
        spi,
        dc,
        rst,
        true,
        false,
        board::WIDTH as u32,
        board::HEIGHT as u32,
    );
    if lcd.init(&mut delay).is_err() || lcd.set_orientation(&Orientation::Landscape).is_err() {
        error!("ST7735 init failed");
        park();
    }
    let screen = match Screen::new(St7735Port::new(lcd, backlight)) {
        Ok(screen) => screen,
        Err(e) => {
            error!("Display clear failed: {}", e);
            park();
        }
    };

    // Set up stop button
    let mut stop: board::Stop = StopButton::new(pins.gpio15.into_pull_down_input());

    let mut scheduler = Scheduler::new(
        Acquisition::new(converter, calibration),
        screen,
        delay,
        config.poll_interval_ms,
    );

    info!("Sensor panel ready");

    let summary = scheduler.run(&mut stop);

    info!(
        "Program stopped, {} readings shown, {} cycles failed",
        summary.completed, summary.failed
    );
    park();
}

/// Nothing left to do, sleep until reset
fn park() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
