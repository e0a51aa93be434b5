pub mod audio;
pub mod engine;
pub mod formant;
pub mod modulation;
pub mod settings;

pub use engine::{EngineCommand, EngineError, EngineHandle, EngineUpdate, PadEvent, spawn_engine};
pub use formant::{Formant, FormantBank, FormantInterpolator, Position, compute_formants};
pub use modulation::{LfoParams, LfoShape, ModulationState};
pub use settings::{SettingsError, VocoderSettings};
