use std::f64::consts::TAU;

const TRACKING_HZ: f64 = 10.0;

/// Rescales a signal so its RMS follows that of a comparator signal.
#[derive(Debug, Clone)]
pub struct Balancer {
    c1: f64,
    c2: f64,
    signal_power: f64,
    comparator_power: f64,
}

impl Balancer {
    pub fn new(sample_rate: f64) -> Self {
        let b = 2.0 - (TRACKING_HZ * TAU / sample_rate).cos();
        let c2 = b - (b * b - 1.0).sqrt();
        Self {
            c1: 1.0 - c2,
            c2,
            signal_power: 0.0,
            comparator_power: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, signal: f32, comparator: f32) -> f32 {
        let signal = signal as f64;
        let comparator = comparator as f64;
        self.signal_power = self.c1 * signal * signal + self.c2 * self.signal_power;
        self.comparator_power = self.c1 * comparator * comparator + self.c2 * self.comparator_power;

        let gain = if self.signal_power > 0.0 {
            (self.comparator_power / self.signal_power).sqrt()
        } else {
            self.comparator_power.sqrt()
        };
        (signal * gain) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_signal_is_brought_up_to_the_comparator() {
        let mut balancer = Balancer::new(44100.0);
        let mut output = 0.0;
        for n in 0..44100 {
            let phase = TAU * 220.0 * n as f64 / 44100.0;
            let comparator = phase.sin() as f32;
            output = balancer.process(comparator * 0.01, comparator);
        }
        let expected = (TAU * 220.0 * 44099.0 / 44100.0).sin() as f32;
        assert!((output - expected).abs() < 0.05, "{output} vs {expected}");
    }

    #[test]
    fn silence_stays_silent() {
        let mut balancer = Balancer::new(44100.0);
        for _ in 0..1000 {
            assert_eq!(balancer.process(0.0, 0.0), 0.0);
        }
    }
}
