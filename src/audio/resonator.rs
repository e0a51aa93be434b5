use std::f64::consts::TAU;

/// Two-pole resonant bandpass with unity gain at its center frequency.
#[derive(Debug, Clone)]
pub struct Resonator {
    frequency: f64,
    bandwidth: f64,
    sample_rate: f64,
    c1: f64,
    c2: f64,
    c3: f64,
    y1: f64,
    y2: f64,
}

impl Resonator {
    pub fn new(frequency: f64, bandwidth: f64, sample_rate: f64) -> Self {
        let mut resonator = Self {
            frequency: 0.0,
            bandwidth: 0.0,
            sample_rate,
            c1: 0.0,
            c2: 0.0,
            c3: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        resonator.set(frequency, bandwidth);
        resonator
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Retunes the filter, keeping its state so parameter sweeps don't click.
    pub fn set(&mut self, frequency: f64, bandwidth: f64) {
        let nyquist = self.sample_rate / 2.0;
        let frequency = frequency.max(1.0).min(nyquist * 0.98).max(f64::MIN_POSITIVE);
        let bandwidth = bandwidth.max(1.0);
        if frequency == self.frequency && bandwidth == self.bandwidth {
            return;
        }
        self.frequency = frequency;
        self.bandwidth = bandwidth;

        let c3 = (-TAU * bandwidth / self.sample_rate).exp();
        let c3_plus_1 = c3 + 1.0;
        let c3_times_4 = c3 * 4.0;
        let c2 = c3_times_4 * (TAU * frequency / self.sample_rate).cos() / c3_plus_1;
        let c1 = (1.0 - c3) * (1.0 - c2 * c2 / c3_times_4).sqrt();

        self.c1 = c1;
        self.c2 = c2;
        self.c3 = c3;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let y = self.c1 * input as f64 + self.c2 * self.y1 - self.c3 * self.y2;
        self.y2 = self.y1;
        self.y1 = y;
        y as f32
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
