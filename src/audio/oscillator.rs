/// Triangle source feeding the vocoder.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub frequency: f32,
    pub amplitude: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            amplitude: 1.0,
            phase: 0.0,
        }
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let phase = self.phase;
        let sample = if phase < 0.25 {
            4.0 * phase
        } else if phase < 0.75 {
            2.0 - 4.0 * phase
        } else {
            4.0 * phase - 4.0
        };

        self.phase += self.frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        sample * self.amplitude
    }

    pub fn render(&mut self, output: &mut [f32], sample_rate: f32) {
        for sample in output.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }
}
