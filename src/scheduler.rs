//! Fixed-interval acquisition loop.
//!
//! The loop owns the converter (through [`Acquisition`]) and the render sink
//! for its whole life. It only looks at its cancellation source between
//! cycles and between sleep slices; a bus transaction that has started is
//! always allowed to finish.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use heapless::String;

use crate::display::RenderSink;
use crate::error::ReadFault;
use crate::sensors::{Acquisition, ChannelReader, Reading};
use crate::timer::{CountDownTimer, CANCEL_POLL_MS};

/// Source of the external stop request
pub trait Cancellation {
    fn is_cancelled(&mut self) -> bool;
}

/// Two decimals, the precision the console has always shown
fn celsius(degrees: f64) -> String<16> {
    let mut text = String::new();
    let _ = write!(text, "{:.2}", degrees);
    text
}

/// Active-high stop button. Latches: once seen pressed it stays cancelled.
pub struct StopButton<P> {
    pin: P,
    pressed: bool,
}

impl<P: InputPin> StopButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            pressed: false,
        }
    }
}

impl<P: InputPin> Cancellation for StopButton<P> {
    fn is_cancelled(&mut self) -> bool {
        if !self.pressed {
            // A pin that cannot be read is treated as not pressed
            self.pressed = self.pin.is_high().unwrap_or(false);
        }
        self.pressed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Cycle counts, reported when the loop stops
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Summary {
    pub completed: u32,
    pub failed: u32,
}

pub struct Scheduler<R, S, D> {
    acquisition: Acquisition<R>,
    sink: S,
    delay: D,
    interval_ms: u32,
    timer: CountDownTimer,
    state: SchedulerState,
    summary: Summary,
}

impl<R, S, D> Scheduler<R, S, D>
where
    R: ChannelReader,
    S: RenderSink,
    D: DelayNs,
{
    pub fn new(acquisition: Acquisition<R>, sink: S, delay: D, interval_ms: u32) -> Self {
        Self {
            acquisition,
            sink,
            delay,
            interval_ms,
            timer: CountDownTimer::new(0),
            state: SchedulerState::Idle,
            summary: Summary::default(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Acquire, render, sleep, until `cancel` says stop.
    ///
    /// A failed cycle is logged and the next one runs after the usual
    /// interval. On stop the sink is released exactly once. Calling this
    /// again after it returned does nothing.
    pub fn run<C: Cancellation>(&mut self, cancel: &mut C) -> Summary {
        if self.state != SchedulerState::Idle {
            return self.summary;
        }
        self.state = SchedulerState::Running;
        info!("Sampling every {} ms", self.interval_ms);

        loop {
            if cancel.is_cancelled() {
                break;
            }
            // Failures are already reported, the next cycle is the retry
            let _ = self.run_cycle();
            if self.sleep(cancel) {
                break;
            }
        }

        self.stop();
        self.summary
    }

    /// One acquisition cycle. A reading is rendered only if every channel
    /// was read.
    pub fn run_cycle(&mut self) -> Result<Reading, ReadFault> {
        match self.acquisition.acquire() {
            Ok(reading) => {
                self.summary.completed += 1;
                info!("Temperature: {} C", celsius(reading.temperature).as_str());
                info!("Moisture: {}%", reading.moisture);
                info!("Light: {}%", reading.light);

                if let Err(e) = self.sink.render(&reading) {
                    warn!("Display update failed: {}", e);
                }
                Ok(reading)
            }
            Err(fault) => {
                self.summary.failed += 1;
                warn!(
                    "Acquisition failed on {} channel: {}",
                    fault.channel.label(),
                    fault.error
                );
                Err(fault)
            }
        }
    }

    /// Sleeps one interval in slices. Returns true if cancelled part way.
    fn sleep<C: Cancellation>(&mut self, cancel: &mut C) -> bool {
        self.timer.set_time(self.interval_ms);
        while !self.timer.is_finished() {
            if cancel.is_cancelled() {
                return true;
            }
            let slice = self.timer.tick(CANCEL_POLL_MS);
            self.delay.delay_ms(slice);
        }
        false
    }

    fn stop(&mut self) {
        info!("Stop requested, releasing display");
        if let Err(e) = self.sink.release() {
            error!("Display release failed: {}", e);
        }
        self.state = SchedulerState::Stopped;
        info!(
            "Stopped after {} cycles ({} failed)",
            self.summary.completed + self.summary.failed,
            self.summary.failed
        );
    }

    /// Hands back the converter and the sink
    pub fn release(self) -> (R, S) {
        (self.acquisition.release(), self.sink)
    }
}
