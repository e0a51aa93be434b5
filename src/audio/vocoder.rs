use super::{Balancer, Resonator};
use crate::formant::{FORMANT_COUNT, FormantBank, FormantInterpolator, Position};
use crate::modulation::ModulationState;

/// Gated input, four cascaded formant resonators, then a balancer that
/// restores the input loudness.
#[derive(Debug, Clone)]
pub struct Vocoder {
    filters: [Resonator; FORMANT_COUNT],
    balancer: Balancer,
    interpolator: FormantInterpolator,
    /// Last pad location; kept after release so the tail rings at the
    /// same vowel.
    position: Position,
    active: bool,
    formants: Option<FormantBank>,
}

impl Vocoder {
    pub fn new(sample_rate: f32, position: Position) -> Self {
        let sample_rate = sample_rate as f64;
        let filters = std::array::from_fn(|_| Resonator::new(1000.0, 100.0, sample_rate));
        Self {
            filters,
            balancer: Balancer::new(sample_rate),
            interpolator: FormantInterpolator::new(sample_rate),
            position,
            active: false,
            formants: None,
        }
    }

    pub fn touch(&mut self, position: Position) {
        self.position = position;
        self.active = true;
    }

    pub fn release(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Formants applied to the filter bank during the last block.
    pub fn formants(&self) -> Option<&FormantBank> {
        self.formants.as_ref()
    }

    fn retune(&mut self, modulation: &ModulationState) {
        let bank = self.interpolator.formants(self.position, modulation);
        for (filter, formant) in self.filters.iter_mut().zip(bank.iter()) {
            filter.set(formant.frequency, formant.bandwidth);
        }
        self.formants = Some(bank);
    }

    /// Renders one block. Formants are evaluated once at the block start;
    /// the LFO clock keeps running whether or not the pad is held.
    pub fn process_block(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        modulation: &ModulationState,
    ) {
        self.retune(modulation);

        for (sample, out) in input.iter().zip(output.iter_mut()) {
            let mixed = if self.active { *sample } else { 0.0 };
            let mut filtered = mixed;
            for filter in self.filters.iter_mut() {
                filtered = filter.process(filtered);
            }
            *out = self.balancer.process(filtered, mixed);
        }

        self.interpolator.advance(output.len());
    }

    pub fn sample_rate(&self) -> f64 {
        self.interpolator.clock().sample_rate()
    }
}
