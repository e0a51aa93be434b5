use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LfoShape {
    #[default]
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl LfoShape {
    /// Bipolar waveform value in [-1, 1] for a phase measured in cycles.
    ///
    /// Sine, triangle and sawtooth cross zero rising at phase 0; square
    /// starts high.
    pub fn value(self, phase: f64) -> f64 {
        let p = phase.rem_euclid(1.0);
        match self {
            LfoShape::Sine => (p * TAU).sin(),
            LfoShape::Triangle => {
                if p < 0.25 {
                    4.0 * p
                } else if p < 0.75 {
                    2.0 - 4.0 * p
                } else {
                    4.0 * p - 4.0
                }
            }
            LfoShape::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoShape::Sawtooth => {
                if p < 0.5 {
                    2.0 * p
                } else {
                    2.0 * p - 2.0
                }
            }
        }
    }
}

/// One low-frequency oscillator acting on a single pad axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LfoParams {
    pub shape: LfoShape,
    /// Peak-to-peak excursion in pad units; the offset swings by `depth / 2`.
    pub depth: f64,
    /// Hz
    pub rate: f64,
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            shape: LfoShape::Sine,
            depth: 0.0,
            rate: 0.0,
        }
    }
}

impl LfoParams {
    pub fn is_active(&self) -> bool {
        self.depth != 0.0 && self.rate != 0.0
    }

    /// Offset added to the pad coordinate at time `t` (seconds).
    pub fn offset(&self, t: f64) -> f64 {
        if self.depth == 0.0 {
            return 0.0;
        }
        self.shape.value(self.rate * t) * self.depth / 2.0
    }

    /// Seconds per cycle, `None` while the oscillator is stopped.
    pub fn period(&self) -> Option<f64> {
        if self.rate > 0.0 {
            Some(1.0 / self.rate)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn shapes_stay_within_unit_range() {
        for shape in [
            LfoShape::Sine,
            LfoShape::Triangle,
            LfoShape::Square,
            LfoShape::Sawtooth,
        ] {
            for i in 0..200 {
                let value = shape.value(i as f64 / 97.0);
                assert!((-1.0..=1.0).contains(&value), "{shape:?} gave {value}");
            }
        }
    }

    #[test]
    fn triangle_hits_its_peaks_at_quarter_cycles() {
        assert_close(LfoShape::Triangle.value(0.0), 0.0);
        assert_close(LfoShape::Triangle.value(0.25), 1.0);
        assert_close(LfoShape::Triangle.value(0.5), 0.0);
        assert_close(LfoShape::Triangle.value(0.75), -1.0);
    }

    #[test]
    fn negative_phases_wrap_into_the_cycle() {
        assert_close(LfoShape::Sawtooth.value(-0.75), LfoShape::Sawtooth.value(0.25));
    }

    #[test]
    fn sine_offset_peaks_at_half_depth() {
        let lfo = LfoParams {
            shape: LfoShape::Sine,
            depth: 0.4,
            rate: 2.0,
        };
        // a quarter period in
        assert_close(lfo.offset(0.125), 0.2);
        assert_close(lfo.offset(0.375), -0.2);
    }

    #[test]
    fn zero_depth_never_moves() {
        let lfo = LfoParams {
            shape: LfoShape::Square,
            depth: 0.0,
            rate: 5.0,
        };
        assert_eq!(lfo.offset(0.0), 0.0);
        assert_eq!(lfo.offset(0.3), 0.0);
        assert!(!lfo.is_active());
    }

    #[test]
    fn period_is_none_when_stopped() {
        assert_eq!(LfoParams::default().period(), None);
        let lfo = LfoParams {
            rate: 4.0,
            ..LfoParams::default()
        };
        assert_eq!(lfo.period(), Some(0.25));
    }
}
