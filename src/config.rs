use std::error::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_physics::PhysicsParams;

/// Everything the headless driver reads from `sim.toml`. Missing keys fall
/// back to the defaults below.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    #[serde(flatten)]
    pub physics: PhysicsParams,
    pub chunk: ChunkConfig,
    pub walker: WalkerConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    pub radius: f32,
    pub height: f32,
    /// Walk speed in blocks/s.
    pub speed: f32,
    /// Horizontal speed factor while submerged.
    pub swim_mult: f32,
    pub jump_speed: f32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            speed: 5.0,
            swim_mult: 0.5,
            jump_speed: 9.0,
        }
    }
}

impl SimConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: SimConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !(self.physics.step > 0.0 && self.physics.step.is_finite()) {
            return Err(format!("step must be a positive number of seconds, got {}", self.physics.step).into());
        }
        if self.physics.max_steps_per_update == 0 {
            return Err("max_steps_per_update must be at least 1".into());
        }
        if self.chunk.width == 0 || self.chunk.height == 0 {
            return Err(format!("chunk dimensions must be non-zero, got {}x{}", self.chunk.width, self.chunk.height).into());
        }
        if self.walker.radius <= 0.0 || self.walker.height <= 0.0 {
            return Err("walker radius and height must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = SimConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, SimConfig::default());
        assert_eq!(cfg.physics, PhysicsParams::default());
    }

    #[test]
    fn physics_keys_sit_at_top_level() {
        let cfg = SimConfig::from_toml_str(
            r#"
            step = 0.01
            gravity = 20.0
            [walker]
            speed = 3.0
        "#,
        )
        .unwrap();
        assert_eq!(cfg.physics.step, 0.01);
        assert_eq!(cfg.physics.gravity, 20.0);
        assert_eq!(cfg.physics.max_steps_per_update, 240);
        assert_eq!(cfg.walker.speed, 3.0);
        assert_eq!(cfg.walker.radius, 0.5);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SimConfig::from_toml_str("step = 0.0").is_err());
        assert!(SimConfig::from_toml_str("max_steps_per_update = 0").is_err());
        assert!(SimConfig::from_toml_str("[chunk]\nwidth = 0").is_err());
        assert!(SimConfig::from_toml_str("step = \"fast\"").is_err());
    }

    #[test]
    fn shipped_config_parses() {
        let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let cfg = SimConfig::load_from_path(root.join("assets/sim.toml")).unwrap();
        assert_eq!(cfg.chunk.width, 16);
        assert_eq!(cfg.physics.max_steps_per_update, 240);
    }
}
