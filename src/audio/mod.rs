mod balancer;
mod oscillator;
mod resonator;
mod vocoder;

pub use balancer::Balancer;
pub use oscillator::Oscillator;
pub use resonator::Resonator;
pub use vocoder::Vocoder;
