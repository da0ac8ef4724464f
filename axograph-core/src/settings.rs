/// User settings, stored as JSON
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::axis::AxisAngles;
use crate::error::{Error, Result};

/// Widest surface the layout arithmetic accepts
pub const MAX_WIDTH: u32 = 16_384;

/// Range and step of one slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Width of the virtual drawing surface; the height is 9/16 of it
    pub width: u32,
    pub frame_rate: u32,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,

    pub default_angles: [i32; 3],
    pub angle_step: i32,
    pub max_value: SliderRange,
    pub initial_max_value: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1280,
            frame_rate: 60,
            input_dir: PathBuf::from("user_inputs"),
            output_dir: PathBuf::from("outputs"),
            log_file: PathBuf::from("axograph.log"),

            default_angles: [330, 90, 210],
            angle_step: 5,
            max_value: SliderRange {
                min: 4,
                max: 80,
                step: 4,
            },
            initial_max_value: 4,
        }
    }
}

impl Settings {
    /// Read settings from `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values that would make the scale zero or a slider degenerate.
    pub fn validate(&self) -> Result<()> {
        let range = &self.max_value;
        if self.width == 0 || self.width > MAX_WIDTH {
            return Err(Error::Settings(format!("width must be in 1..={MAX_WIDTH}")));
        }
        if self.frame_rate == 0 {
            return Err(Error::Settings("frame rate must be positive".into()));
        }
        if range.min < 1 {
            return Err(Error::Settings("minimum scale must be at least 1".into()));
        }
        if range.min >= range.max {
            return Err(Error::Settings("scale range is empty".into()));
        }
        if range.step < 1 || self.angle_step < 1 {
            return Err(Error::Settings("slider steps must be at least 1".into()));
        }
        // An off-step minimum floors to zero on the scale slider.
        if range.min % range.step != 0 {
            return Err(Error::Settings(format!(
                "minimum scale {} is not a multiple of its step {}",
                range.min, range.step
            )));
        }
        if !(range.min..=range.max).contains(&self.initial_max_value) {
            return Err(Error::Settings(format!(
                "initial scale {} is outside {}..={}",
                self.initial_max_value, range.min, range.max
            )));
        }
        Ok(())
    }

    pub fn default_angles(&self) -> AxisAngles {
        AxisAngles::from(self.default_angles)
    }
}
