use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controls::ControlConfig;
use crate::economy::{EconomyConfig, ToolUnlock};
use crate::emitter::EmitterConfig;
use crate::milestones::{default_milestones, Milestone};
use crate::motion::MotionConfig;
use crate::sample::PanSample;

/// Full panning configuration. Every section falls back to its defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanConfig {
    #[serde(default = "default_milestones")]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub emitter: EmitterConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub sample: PanSample,
    #[serde(default)]
    pub controls: ControlConfig,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            milestones: default_milestones(),
            motion: MotionConfig::default(),
            emitter: EmitterConfig::default(),
            economy: EconomyConfig::default(),
            sample: PanSample::default(),
            controls: ControlConfig::default(),
        }
    }
}

impl PanConfig {
    /// Beginner setup: rich dirt and a couple of cheap unlocks.
    pub fn tutorial() -> Self {
        PanConfig {
            sample: PanSample::tutorial(),
            economy: EconomyConfig {
                tool_unlocks: vec![
                    ToolUnlock::new("classifier", 50.0),
                    ToolUnlock::new("sluice", 250.0),
                ],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Save configuration to JSON file
    pub fn save_json(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_json(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn save_yaml(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Load configuration from YAML file
    pub fn load_yaml(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&yaml)?;
        Ok(config)
    }

    /// Load by extension: `.yaml`/`.yml` as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::load_yaml(path),
            _ => Self::load_json(path),
        }
    }
}
