use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::formant::Position;
use crate::modulation::{LfoParams, ModulationState};

/// Lowest sample rate the vocoder accepts; its top formants need headroom
/// below Nyquist.
pub const MIN_SAMPLE_RATE: u32 = 8000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// User-adjustable instrument parameters, persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocoderSettings {
    /// Last pad location, restored at session start.
    pub location: Position,
    pub lfo_x: LfoParams,
    pub lfo_y: LfoParams,
    pub formants_frequency: f64,
    pub formants_bandwidth: f64,
    /// Hz
    pub oscillator_frequency: f32,
    /// Keep sounding after the pad is released.
    pub sustain: bool,
    /// Requested output rate; the device's own rate is used when it can't
    /// provide this one.
    pub sample_rate: u32,
}

impl Default for VocoderSettings {
    fn default() -> Self {
        Self {
            location: Position::CENTER,
            lfo_x: LfoParams::default(),
            lfo_y: LfoParams::default(),
            formants_frequency: 1.0,
            formants_bandwidth: 1.0,
            oscillator_frequency: 256.0,
            sustain: false,
            sample_rate: 44100,
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if !value.is_finite() {
        return Err(SettingsError::Invalid {
            field,
            reason: "must be a finite number",
        });
    }
    if value < 0.0 {
        return Err(SettingsError::Invalid {
            field,
            reason: "must not be negative",
        });
    }
    Ok(())
}

impl VocoderSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.location.is_finite() {
            return Err(SettingsError::Invalid {
                field: "location",
                reason: "must be a finite point",
            });
        }
        non_negative("lfo_x.depth", self.lfo_x.depth)?;
        non_negative("lfo_x.rate", self.lfo_x.rate)?;
        non_negative("lfo_y.depth", self.lfo_y.depth)?;
        non_negative("lfo_y.rate", self.lfo_y.rate)?;
        non_negative("formants_frequency", self.formants_frequency)?;
        non_negative("formants_bandwidth", self.formants_bandwidth)?;
        if !(self.oscillator_frequency.is_finite() && self.oscillator_frequency > 0.0) {
            return Err(SettingsError::Invalid {
                field: "oscillator_frequency",
                reason: "must be a positive number",
            });
        }
        if self.sample_rate < MIN_SAMPLE_RATE {
            return Err(SettingsError::Invalid {
                field: "sample_rate",
                reason: "must be at least 8000 Hz",
            });
        }
        Ok(())
    }

    pub fn modulation(&self) -> ModulationState {
        ModulationState {
            lfo_x: self.lfo_x,
            lfo_y: self.lfo_y,
            frequency_scale: self.formants_frequency,
            bandwidth_scale: self.formants_bandwidth,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, ron_string)?;
        debug!(path = %path.display(), "settings saved");

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let ron_string = fs::read_to_string(path)?;
        let settings: VocoderSettings = ron::from_str(&ron_string)?;
        settings.validate()?;
        info!(path = %path.display(), "settings loaded");

        Ok(settings)
    }

    /// Loads `path`, writing the defaults there first if it doesn't exist.
    pub fn load_or_create(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            return Self::load(path);
        }
        let settings = Self::default();
        settings.save(path)?;
        info!(path = %path.display(), "created default settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulation::LfoShape;

    #[test]
    fn defaults_are_neutral() {
        let settings = VocoderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.modulation(), ModulationState::default());
        assert_eq!(settings.location, Position::CENTER);
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("howl").join("settings.ron");
        let settings = VocoderSettings {
            location: Position::new(0.1, 0.9),
            lfo_x: LfoParams {
                shape: LfoShape::Triangle,
                depth: 0.3,
                rate: 1.5,
            },
            formants_bandwidth: 2.0,
            sustain: true,
            ..VocoderSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(VocoderSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: VocoderSettings = ron::from_str("(sustain: true)").unwrap();
        assert!(settings.sustain);
        assert_eq!(settings.formants_frequency, 1.0);
        assert_eq!(settings.lfo_y, LfoParams::default());
    }

    #[test]
    fn load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        let created = VocoderSettings::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(VocoderSettings::load(&path).unwrap(), created);
    }

    #[test]
    fn negative_scales_are_rejected() {
        let settings = VocoderSettings {
            formants_bandwidth: -0.5,
            ..VocoderSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "formants_bandwidth",
                ..
            })
        ));
    }

    #[test]
    fn unrealistic_sample_rates_are_rejected() {
        for sample_rate in [0, 2, 7999] {
            let settings = VocoderSettings {
                sample_rate,
                ..VocoderSettings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(SettingsError::Invalid {
                    field: "sample_rate",
                    ..
                })
            ));
        }
        let settings = VocoderSettings {
            sample_rate: MIN_SAMPLE_RATE,
            ..VocoderSettings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn non_finite_lfo_rates_are_rejected() {
        let settings = VocoderSettings {
            lfo_y: LfoParams {
                rate: f64::INFINITY,
                ..LfoParams::default()
            },
            ..VocoderSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn invalid_files_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, "(formants_frequency: -1.0)").unwrap();
        assert!(matches!(
            VocoderSettings::load(&path),
            Err(SettingsError::Invalid { .. })
        ));
        fs::write(&path, "not ron at all (").unwrap();
        assert!(matches!(
            VocoderSettings::load(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
