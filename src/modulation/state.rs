use super::LfoParams;

/// Everything besides the pad position that shapes the formant bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationState {
    pub lfo_x: LfoParams,
    pub lfo_y: LfoParams,
    pub frequency_scale: f64,
    pub bandwidth_scale: f64,
}

impl Default for ModulationState {
    fn default() -> Self {
        Self {
            lfo_x: LfoParams::default(),
            lfo_y: LfoParams::default(),
            frequency_scale: 1.0,
            bandwidth_scale: 1.0,
        }
    }
}

impl ModulationState {
    /// Pad offsets contributed by both oscillators at time `t` (seconds).
    pub fn offsets(&self, t: f64) -> (f64, f64) {
        (self.lfo_x.offset(t), self.lfo_y.offset(t))
    }
}
