/// Number of formants tracked per vowel, and filters in the bank.
pub const FORMANT_COUNT: usize = 4;

/// First four formant frequencies (Hz) of the reference vowels placed on
/// the corners of the unit pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerFrequencies {
    pub top_left: [f64; FORMANT_COUNT],
    pub top_right: [f64; FORMANT_COUNT],
    pub bottom_left: [f64; FORMANT_COUNT],
    pub bottom_right: [f64; FORMANT_COUNT],
}

pub const VOWEL_CORNERS: CornerFrequencies = CornerFrequencies {
    // /æ/
    top_left: [844.0, 1656.0, 2437.0, 3704.0],
    // /ɑ/
    top_right: [768.0, 1333.0, 2522.0, 3687.0],
    // /i/
    bottom_left: [324.0, 2985.0, 3329.0, 3807.0],
    // /u/
    bottom_right: [378.0, 997.0, 2343.0, 3357.0],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Pad coordinates of the corner, y growing downwards.
    pub fn coordinates(self) -> (f64, f64) {
        match self {
            Corner::TopLeft => (0.0, 0.0),
            Corner::TopRight => (1.0, 0.0),
            Corner::BottomLeft => (0.0, 1.0),
            Corner::BottomRight => (1.0, 1.0),
        }
    }

    /// Corner vowel closest to a pad location.
    pub fn nearest(x: f64, y: f64) -> Corner {
        match (x >= 0.5, y >= 0.5) {
            (false, false) => Corner::TopLeft,
            (true, false) => Corner::TopRight,
            (false, true) => Corner::BottomLeft,
            (true, true) => Corner::BottomRight,
        }
    }

    pub fn ipa(self) -> &'static str {
        match self {
            Corner::TopLeft => "æ",
            Corner::TopRight => "ɑ",
            Corner::BottomLeft => "i",
            Corner::BottomRight => "u",
        }
    }
}

impl CornerFrequencies {
    pub fn at(&self, corner: Corner) -> &[f64; FORMANT_COUNT] {
        match corner {
            Corner::TopLeft => &self.top_left,
            Corner::TopRight => &self.top_right,
            Corner::BottomLeft => &self.bottom_left,
            Corner::BottomRight => &self.bottom_right,
        }
    }
}
