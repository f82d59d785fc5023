//! Engine configuration.
//!
//! Wraps the simulation tunables together with the parameters of a headless
//! run. Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use skyisle_common::ConfigError;
use skyisle_gameplay::{KeyCode, SimulationConfig};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "skyisle.toml";

/// Keys held for a number of frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Frames the keys stay held
    pub frames: u32,
    /// Keys held; every other key is released
    #[serde(default)]
    pub keys: Vec<KeyCode>,
}

impl ScriptStep {
    /// Creates a step.
    #[must_use]
    pub fn new(frames: u32, keys: &[KeyCode]) -> Self {
        Self {
            frames,
            keys: keys.to_vec(),
        }
    }
}

/// Parameters of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames to simulate
    pub frames: u32,
    /// Wall time fed to the clock per frame (s)
    pub frame_time: f32,
    /// Held keys, in order; frames past the end of the script hold nothing
    pub script: Vec<ScriptStep>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 200,
            frame_time: 1.0 / 60.0,
            script: vec![
                ScriptStep::new(20, &[KeyCode::Right]),
                ScriptStep::new(60, &[KeyCode::W, KeyCode::Right]),
                ScriptStep::new(60, &[KeyCode::LShift, KeyCode::Down]),
                ScriptStep::new(60, &[KeyCode::S]),
            ],
        }
    }
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World, movement, camera and clock tunables
    pub simulation: SimulationConfig,
    /// Headless run parameters
    pub run: RunConfig,
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamps run parameters to sensible ranges and checks the simulation
    /// tunables.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.run.frames = self.run.frames.clamp(1, 1_000_000);
        self.run.frame_time = self.run.frame_time.clamp(0.001, 1.0);
        self.simulation.validate()
    }

    /// Frames the script covers.
    #[must_use]
    pub fn scripted_frames(&self) -> u32 {
        self.run.script.iter().map(|step| step.frames).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.run.frames, 200);
        assert_eq!(config.scripted_frames(), 200);
        assert_eq!(config.simulation.movement.ground_speed, 200.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.run.frames = 0;
        config.run.frame_time = 5.0;
        assert!(config.validate().is_ok());
        assert_eq!(config.run.frames, 1);
        assert_eq!(config.run.frame_time, 1.0);

        config.simulation.movement.fly_speed_min = 1000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let mut config = EngineConfig::default();
        config.run.frames = 42;
        config.run.script = vec![ScriptStep::new(5, &[KeyCode::W, KeyCode::A])];
        config.simulation.world.seed = 12345;
        config.simulation.movement.cruise_speed = 320.0;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.run.frames, 42);
        assert_eq!(loaded.run.script, config.run.script);
        assert_eq!(loaded.simulation.world.seed, 12345);
        assert_eq!(loaded.simulation.movement.cruise_speed, 320.0);
        assert_eq!(loaded.simulation.world.patterns, config.simulation.world.patterns);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/skyisle.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_malformed_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[run\nframes = ").expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.run.frames, 200);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &config_path,
            "[run]\nframes = 7\n\n[simulation.camera]\nmax_speed = 12.0\n",
        )
        .expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.run.frames, 7);
        assert_eq!(config.run.script, RunConfig::default().script);
        assert_eq!(config.simulation.camera.max_speed, 12.0);
        assert_eq!(config.simulation.camera.acceleration, 1.0);
    }
}
