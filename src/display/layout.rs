use core::fmt::Write;

use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use ufmt::uwrite;

use crate::sensors::Reading;

/// One rendered line of text
pub type Line = String<32>;

/// Left margin of every line
pub const LEFT: i32 = 10;
/// Top edge of each line: temperature, moisture, light
pub const ROWS: [i32; 3] = [10, 30, 50];

/// Formats the three screen lines for a reading.
/// Temperature gets one decimal place, the percentages are printed as-is.
pub fn lines(reading: &Reading) -> [Line; 3] {
    let mut temperature = Line::new();
    let mut moisture = Line::new();
    let mut light = Line::new();

    // ufmt has no floats. Rounding happens on the exact f64 value.
    let _ = write!(temperature, "Temperature: {:.1}°C", reading.temperature);
    // 32 bytes fits the widest i32, so these cannot overflow
    let _ = uwrite!(moisture, "Moisture: {}%", reading.moisture);
    let _ = uwrite!(light, "Light: {}%", reading.light);

    [temperature, moisture, light]
}

/// Draws a reading as white text on black, upright.
pub fn compose<D>(reading: &Reading, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(Rgb565::BLACK)?;

    let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
    for (line, y) in lines(reading).iter().zip(ROWS) {
        Text::with_baseline(line, Point::new(LEFT, y), style, Baseline::Top).draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::display::canvas::{Canvas, HEIGHT, WIDTH};
    use crate::sensors::RawSample;

    fn reading(temperature: f64, moisture: i32, light: i32) -> Reading {
        Reading {
            temperature,
            moisture,
            light,
        }
    }

    #[test]
    fn test_line_text() {
        let [t, m, l] = lines(&reading(7.5, 41, 87));
        assert_eq!(t.as_str(), "Temperature: 7.5°C");
        assert_eq!(m.as_str(), "Moisture: 41%");
        assert_eq!(l.as_str(), "Light: 87%");
    }

    #[test]
    fn test_temperature_rounds_to_one_decimal() {
        assert_eq!(lines(&reading(23.46, 0, 0))[0].as_str(), "Temperature: 23.5°C");
        assert_eq!(lines(&reading(23.44, 0, 0))[0].as_str(), "Temperature: 23.4°C");
        assert_eq!(lines(&reading(-0.4, 0, 0))[0].as_str(), "Temperature: -0.4°C");
        assert_eq!(lines(&reading(-12.06, 0, 0))[0].as_str(), "Temperature: -12.1°C");
        assert_eq!(lines(&reading(0.0, 0, 0))[0].as_str(), "Temperature: 0.0°C");
    }

    #[test]
    fn test_temperature_halfway_samples() {
        let calibration = Config::default().validate().unwrap();
        let line = |raw| {
            let temperature = calibration.temperature.degrees(raw);
            lines(&reading(temperature, 0, 0))[0].clone()
        };
        // 290 counts above the offset is 1.45 degrees
        assert_eq!(line(-1210).as_str(), "Temperature: 1.5°C");
        assert_eq!(line(-32570).as_str(), "Temperature: -155.4°C");
        assert_eq!(line(0).as_str(), "Temperature: 7.5°C");
    }

    #[test]
    fn test_temperature_text_matches_fixed_point_formatting() {
        let calibration = Config::default().validate().unwrap();
        for raw in RawSample::MIN..=RawSample::MAX {
            let temperature = calibration.temperature.degrees(raw);
            let expected = format!("Temperature: {:.1}°C", temperature);
            assert_eq!(lines(&reading(temperature, 0, 0))[0].as_str(), expected);
        }
    }

    #[test]
    fn test_percent_is_not_clamped() {
        let [_, m, l] = lines(&reading(20.0, -33, 102));
        assert_eq!(m.as_str(), "Moisture: -33%");
        assert_eq!(l.as_str(), "Light: 102%");
    }

    #[test]
    fn test_compose_writes_text_rows_only() {
        let mut canvas = Canvas::new();
        canvas.fill(Rgb565::RED);

        compose(&reading(21.0, 50, 50), &mut canvas).unwrap();

        let lit = |y: usize| (0..WIDTH).any(|x| canvas.pixel(x, y) == Some(Rgb565::WHITE));
        assert!((10..20).any(lit));
        assert!((30..40).any(lit));
        assert!((50..60).any(lit));
        assert!(!(0..10).any(lit));
        assert!(!(60..HEIGHT).any(lit));
        // Background was cleared, not left over
        assert!(canvas.pixels().iter().all(|p| *p != Rgb565::RED));
    }
}
