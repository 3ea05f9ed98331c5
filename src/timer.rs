/// Counts a wait down in caller-sized slices.
pub struct CountDownTimer {
    target_ms: u32,
}

pub const POLL_INTERVAL_MS: u32 = 3000; // 3s between acquisitions
pub const CANCEL_POLL_MS: u32 = 50; // stop button latency while sleeping

impl CountDownTimer {
    pub fn new(target_ms: u32) -> CountDownTimer {
        Self { target_ms }
    }

    /// Consumes up to `max_ms` and returns how much was actually taken
    pub fn tick(&mut self, max_ms: u32) -> u32 {
        let step = self.target_ms.min(max_ms);
        self.target_ms -= step;
        step
    }

    pub fn set_time(&mut self, ms: u32) {
        self.target_ms = ms;
    }

    pub fn is_finished(&self) -> bool {
        self.target_ms == 0
    }
}
