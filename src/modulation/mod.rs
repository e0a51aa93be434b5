mod clock;
mod lfo;
mod state;

pub use clock::LfoClock;
pub use lfo::{LfoParams, LfoShape};
pub use state::ModulationState;
