use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// Panel width in landscape
pub const WIDTH: usize = 160;
/// Panel height in landscape
pub const HEIGHT: usize = 128;

/// Full-screen RGB565 framebuffer, row-major from the top left corner.
pub struct Canvas {
    pixels: [Rgb565; WIDTH * HEIGHT],
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            pixels: [Rgb565::BLACK; WIDTH * HEIGHT],
        }
    }

    pub fn fill(&mut self, color: Rgb565) {
        self.pixels.fill(color);
    }

    /// Turns the image upside down, for a panel mounted inverted.
    ///
    /// In a row-major buffer a half turn is a plain reversal.
    pub fn rotate_180(&mut self) {
        self.pixels.reverse();
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Off-canvas pixels are clipped
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.pixels[y * WIDTH + x] = color;
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
