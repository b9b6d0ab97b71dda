//! Layout of a multi-body system and the root configuration file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planet::SynthesisConfig;

/// Where new bodies are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnLayout {
    /// One fixed position per slot. Slots past the end reuse the last point.
    Points(Vec<Vec3>),
    /// Uniformly random inside a box of this full size, centered on the origin.
    Area { size: Vec3 },
}

impl Default for SpawnLayout {
    fn default() -> Self {
        SpawnLayout::Area {
            size: Vec3::new(20.0, 10.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub planet_count: usize,
    /// Directory holding `planet_{i}.json` files.
    pub save_dir: PathBuf,
    pub spawn: SpawnLayout,
    /// Seeds the randomizer. `None` draws from OS entropy.
    pub master_seed: Option<u64>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            planet_count: 4,
            save_dir: PathBuf::from("planets"),
            spawn: SpawnLayout::default(),
            master_seed: None,
        }
    }
}

impl SystemConfig {
    /// `count` bodies evenly spaced along the x axis, centered on the origin.
    pub fn row(count: usize, spacing: f32) -> Self {
        let points = (0..count)
            .map(|i| Vec3::new((i as f32 - (count as f32 - 1.0) * 0.5) * spacing, 0.0, 0.0))
            .collect();
        Self {
            planet_count: count,
            spawn: SpawnLayout::Points(points),
            ..Default::default()
        }
    }
}

/// Root configuration: synthesis settings plus system layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub synthesis: SynthesisConfig,
    pub system: SystemConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse galaxy config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read galaxy config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GalaxyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = GalaxyConfig::from_json_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let json = r#"{
            "synthesis": { "resolution": 24 },
            "system": { "planet_count": 2, "spawn": { "points": [[0, 0, 0], [5, 0, 0]] } }
        }"#;
        let config = GalaxyConfig::from_json_str(json).unwrap();
        assert_eq!(config.synthesis.resolution, 24);
        assert_eq!(config.synthesis.cloud_resolution, 60);
        assert_eq!(config.system.planet_count, 2);
        assert_eq!(
            config.system.spawn,
            SpawnLayout::Points(vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)])
        );
        assert_eq!(config.system.save_dir, PathBuf::from("planets"));
    }

    #[test]
    fn test_area_layout_json() {
        let json = r#"{ "system": { "spawn": { "area": { "size": [2, 4, 6] } } } }"#;
        let config = GalaxyConfig::from_json_str(json).unwrap();
        assert_eq!(config.system.spawn, SpawnLayout::Area { size: Vec3::new(2.0, 4.0, 6.0) });
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GalaxyConfig::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_row_layout() {
        let config = SystemConfig::row(3, 4.0);
        assert_eq!(
            config.spawn,
            SpawnLayout::Points(vec![Vec3::new(-4.0, 0.0, 0.0), Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)])
        );
    }
}
