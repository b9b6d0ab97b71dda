//! JSON persistence for planet parameter sets.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::params::PlanetParameterSet;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to access planet file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed planet file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode planet parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of [`load`]. A missing file is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(PlanetParameterSet),
    Missing,
}

impl LoadOutcome {
    pub fn into_loaded(self) -> Option<PlanetParameterSet> {
        match self {
            LoadOutcome::Loaded(params) => Some(params),
            LoadOutcome::Missing => None,
        }
    }
}

/// File name used for the body in slot `index`.
pub fn slot_file_name(index: usize) -> String {
    format!("planet_{index}.json")
}

pub fn slot_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(slot_file_name(index))
}

/// Pretty-printed JSON for `params`.
///
/// A set holding NaN or infinities is written in its sanitized form, since
/// JSON would otherwise store `null` and the file could not be read back.
pub fn encode(params: &PlanetParameterSet) -> Result<String, PersistenceError> {
    if params.is_finite() {
        return Ok(serde_json::to_string_pretty(params)?);
    }
    tracing::warn!(planet = %params.name, "non-finite parameters written in sanitized form");
    Ok(serde_json::to_string_pretty(&params.sanitized())?)
}

/// Parses a planet file. Fields absent from `json` take their defaults.
pub fn decode(json: &str) -> Result<PlanetParameterSet, serde_json::Error> {
    serde_json::from_str(json)
}

/// Writes `params` to `path`, creating parent directories as needed.
pub fn save(params: &PlanetParameterSet, path: &Path) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = encode(params)?;
    fs::write(path, json).map_err(io_err)?;
    tracing::debug!(path = %path.display(), planet = %params.name, "saved planet");
    Ok(())
}

/// Reads a planet file.
pub fn load(path: &Path) -> Result<LoadOutcome, PersistenceError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no planet file");
            return Ok(LoadOutcome::Missing);
        }
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let params = decode(&contents).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), planet = %params.name, "loaded planet");
    Ok(LoadOutcome::Loaded(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Gradient, Rgba};
    use glam::Vec3;
    use tempfile::tempdir;

    fn sample() -> PlanetParameterSet {
        let mut params = PlanetParameterSet::named("Tethys", 1234);
        params.radius = 2.5;
        params.terrain_noise.center = Vec3::new(0.1, -7.25, 3.0e-3);
        params.terrain_noise.strength = 1.337;
        params.color.gradient = Gradient::from_stops(&[
            (0.0, Rgba::rgb(0.01, 0.2, 0.3)),
            (0.4, Rgba::rgb(0.2, 0.5, 0.6)),
            (0.5, Rgba::rgb(0.3, 0.6, 0.1)),
            (1.0, Rgba::WHITE),
        ]);
        params.color.color_spread = 0.123_456_79;
        params.cloud_threshold = 0.618;
        params
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let params = sample();
        let decoded = decode(&encode(&params).unwrap()).unwrap();
        assert_eq!(decoded, params);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = slot_path(&dir.path().join("nested"), 3);
        save(&sample(), &path).unwrap();
        assert!(path.ends_with("planet_3.json"));
        assert_eq!(load(&path).unwrap(), LoadOutcome::Loaded(sample()));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let outcome = load(&dir.path().join("planet_9.json")).unwrap();
        assert_eq!(outcome, LoadOutcome::Missing);
        assert_eq!(outcome.into_loaded(), None);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("planet_0.json");
        fs::write(&path, "{ \"planetName\": ").unwrap();
        match load(&path) {
            Err(PersistenceError::Json { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_values_still_load() {
        let dir = tempdir().unwrap();
        let path = slot_path(dir.path(), 0);
        let mut params = sample();
        params.terrain_noise.strength = f32::NAN;
        params.radius = f32::INFINITY;
        save(&params, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("null"));
        let loaded = load(&path).unwrap().into_loaded().unwrap();
        assert!(loaded.is_finite());
        assert_eq!(loaded.terrain_noise.strength, 1.0);
        assert_eq!(loaded.radius, 1.0);
        assert_eq!(loaded.name, "Tethys");
    }

    #[test]
    fn test_pretty_printed() {
        let json = encode(&sample()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"planetName\": \"Tethys\""));
    }
}
