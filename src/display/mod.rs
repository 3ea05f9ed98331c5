//! Display side of the panel.
//!
//! A reading is laid out on a [`Canvas`], turned upside down and handed to
//! whatever [`DisplayPort`] drives the actual panel.

pub mod canvas;
pub mod layout;

use core::convert::Infallible;

use crate::error::DeviceError;
use crate::sensors::Reading;

pub use canvas::Canvas;

/// Transport to a physical panel
pub trait DisplayPort {
    /// Blank the panel
    fn clear(&mut self) -> Result<(), DeviceError>;

    /// Push a full frame
    fn show(&mut self, canvas: &Canvas) -> Result<(), DeviceError>;

    /// Shut the panel down for good. Called once, on stop.
    fn release(&mut self) -> Result<(), DeviceError>;
}

/// Consumer of finished readings
pub trait RenderSink {
    fn render(&mut self, reading: &Reading) -> Result<(), DeviceError>;

    fn release(&mut self) -> Result<(), DeviceError>;
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn render(&mut self, reading: &Reading) -> Result<(), DeviceError> {
        (**self).render(reading)
    }

    fn release(&mut self) -> Result<(), DeviceError> {
        (**self).release()
    }
}

/// Text screen for a panel mounted upside down
pub struct Screen<P> {
    port: P,
    canvas: Canvas,
}

impl<P: DisplayPort> Screen<P> {
    /// Takes the panel and clears it
    pub fn new(mut port: P) -> Result<Self, DeviceError> {
        port.clear()?;
        Ok(Self {
            port,
            canvas: Canvas::new(),
        })
    }

    #[cfg(test)]
    fn port(&self) -> &P {
        &self.port
    }
}

impl<P: DisplayPort> RenderSink for Screen<P> {
    fn render(&mut self, reading: &Reading) -> Result<(), DeviceError> {
        layout::compose(reading, &mut self.canvas)
            .unwrap_or_else(|never: Infallible| match never {});
        self.canvas.rotate_180();
        self.port.show(&self.canvas)
    }

    fn release(&mut self) -> Result<(), DeviceError> {
        self.port.release()
    }
}
