//! Bilinear vowel interpolation across the phonemeboard pad.
//!
//! The pad is a unit square with a reference vowel on each corner. A
//! position blends the four corner formant sets, first along x (tongue
//! frontness) then along y (tongue height). Two LFOs may wobble the
//! position before the blend.

use serde::{Deserialize, Serialize};

use super::corners::{FORMANT_COUNT, VOWEL_CORNERS};
use crate::modulation::{LfoClock, ModulationState};

/// Scales that are not strictly positive are replaced by this value.
pub const MIN_SCALE: f64 = 1e-3;

/// Lowest center frequency ever handed to the filter bank.
pub const MIN_FREQUENCY_HZ: f64 = 1.0;

const BANDWIDTH_RATIO: f64 = 0.02;
const BANDWIDTH_FLOOR_HZ: f64 = 50.0;

/// Normalized pad location. Coordinates outside [0, 1] extrapolate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const CENTER: Position = Position { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::CENTER
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formant {
    /// Hz
    pub frequency: f64,
    /// Hz
    pub bandwidth: f64,
}

/// One formant per corner-table slot, in slot order.
pub type FormantBank = [Formant; FORMANT_COUNT];

#[inline]
fn lerp(from: f64, to: f64, amount: f64) -> f64 {
    from + (to - from) * amount
}

#[inline]
fn guard_scale(scale: f64) -> f64 {
    if scale > 0.0 { scale } else { MIN_SCALE }
}

/// Evaluates the formant bank at `position`, with the LFOs sampled at
/// `t` seconds.
pub fn compute_formants(position: Position, modulation: &ModulationState, t: f64) -> FormantBank {
    let (dx, dy) = modulation.offsets(t);
    let x = position.x + dx;
    let y = position.y + dy;

    let frequency_scale = guard_scale(modulation.frequency_scale);
    let bandwidth_scale = guard_scale(modulation.bandwidth_scale);

    let corners = &VOWEL_CORNERS;
    let mut bank = [Formant {
        frequency: 0.0,
        bandwidth: 0.0,
    }; FORMANT_COUNT];

    for (i, formant) in bank.iter_mut().enumerate() {
        let top = lerp(corners.top_left[i], corners.top_right[i], x);
        let bottom = lerp(corners.bottom_left[i], corners.bottom_right[i], x);
        let frequency = (lerp(top, bottom, y) * frequency_scale).max(MIN_FREQUENCY_HZ);

        *formant = Formant {
            frequency,
            bandwidth: (frequency * BANDWIDTH_RATIO + BANDWIDTH_FLOOR_HZ) * bandwidth_scale,
        };
    }

    bank
}

/// Couples [`compute_formants`] with a free-running LFO clock, for callers
/// that evaluate once per audio block.
#[derive(Debug, Clone)]
pub struct FormantInterpolator {
    clock: LfoClock,
}

impl FormantInterpolator {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            clock: LfoClock::new(sample_rate),
        }
    }

    pub fn advance(&mut self, frames: usize) {
        self.clock.advance(frames);
    }

    pub fn clock(&self) -> &LfoClock {
        &self.clock
    }

    pub fn formants(&self, position: Position, modulation: &ModulationState) -> FormantBank {
        compute_formants(position, modulation, self.clock.seconds())
    }
}
