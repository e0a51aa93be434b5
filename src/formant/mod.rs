mod corners;
mod interpolator;

pub use corners::{Corner, CornerFrequencies, FORMANT_COUNT, VOWEL_CORNERS};
pub use interpolator::{
    Formant, FormantBank, FormantInterpolator, MIN_FREQUENCY_HZ, MIN_SCALE, Position,
    compute_formants,
};
