/// Free-running time base for the LFOs, advanced by rendered frames.
#[derive(Debug, Clone, Copy)]
pub struct LfoClock {
    sample_rate: f64,
    frames: u64,
}

impl LfoClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate: if sample_rate > 0.0 { sample_rate } else { 1.0 },
            frames: 0,
        }
    }

    pub fn advance(&mut self, frames: usize) {
        self.frames = self.frames.wrapping_add(frames as u64);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn seconds(&self) -> f64 {
        self.frames as f64 / self.sample_rate
    }

    pub fn reset(&mut self) {
        self.frames = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_follow_the_frame_count() {
        let mut clock = LfoClock::new(48000.0);
        clock.advance(24000);
        assert_eq!(clock.seconds(), 0.5);
        clock.advance(48000);
        assert_eq!(clock.seconds(), 1.5);
        assert_eq!(clock.frames(), 72000);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut clock = LfoClock::new(44100.0);
        clock.advance(512);
        clock.reset();
        assert_eq!(clock.seconds(), 0.0);
    }

    #[test]
    fn non_positive_sample_rates_are_replaced() {
        let clock = LfoClock::new(0.0);
        assert_eq!(clock.sample_rate(), 1.0);
    }
}
