//! Owns the bodies of a system and keeps the render host in sync.

use std::path::PathBuf;

use thiserror::Error;

use super::config::{GalaxyConfig, SystemConfig};
use super::host::{RenderHost, RenderLayer};
use super::randomizer::Randomizer;
use crate::geometry::CubeFace;
use crate::planet::persistence::{self, LoadOutcome, PersistenceError};
use crate::planet::{BodyInstance, ParameterError, PlanetParameterSet, PlanetSynthesizer, Transform};

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("no body at index {index} (system has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// An ordered set of bodies.
///
/// Every mutation re-synthesizes only the affected bodies and republishes them
/// to the host. A failure on one body leaves every other body untouched.
pub struct InstanceManager<H: RenderHost> {
    synthesizer: PlanetSynthesizer,
    config: SystemConfig,
    randomizer: Randomizer,
    host: H,
    bodies: Vec<BodyInstance>,
}

impl<H: RenderHost> InstanceManager<H> {
    /// Creates an empty manager. Call [`Self::initialize`] to populate it.
    pub fn new(config: GalaxyConfig, host: H) -> Self {
        Self {
            synthesizer: PlanetSynthesizer::new(config.synthesis),
            randomizer: Randomizer::new(config.system.master_seed),
            config: config.system,
            host,
            bodies: Vec::new(),
        }
    }

    /// Fills every slot, loading `planet_{i}.json` where present and randomizing
    /// the rest. Unreadable files are logged and replaced by random bodies.
    ///
    /// Returns how many slots came from disk.
    pub fn initialize(&mut self) -> usize {
        self.clear();
        let mut loaded = 0;
        for index in 0..self.config.planet_count {
            let path = persistence::slot_path(&self.config.save_dir, index);
            let params = match persistence::load(&path) {
                Ok(LoadOutcome::Loaded(params)) => {
                    loaded += 1;
                    params
                }
                Ok(LoadOutcome::Missing) => self.randomizer.next_params(index),
                Err(err) => {
                    tracing::warn!(index, error = %err, "could not load planet, randomizing");
                    self.randomizer.next_params(index)
                }
            };
            let position = self.randomizer.spawn_position(&self.config.spawn, index);
            let body = self.synthesizer.synthesize(&params, Transform::at(position));
            self.bodies.push(body);
            self.publish(index);
        }
        tracing::info!(count = self.bodies.len(), loaded, "system initialized");
        loaded
    }

    /// Replaces the whole system with freshly randomized bodies, ignoring saved files.
    pub fn generate(&mut self) {
        self.clear();
        for index in 0..self.config.planet_count {
            let params = self.randomizer.next_params(index);
            let position = self.randomizer.spawn_position(&self.config.spawn, index);
            self.bodies.push(self.synthesizer.synthesize(&params, Transform::at(position)));
            self.publish(index);
        }
        tracing::info!(count = self.bodies.len(), "system generated");
    }

    /// Destroys every body and its renderables.
    pub fn clear(&mut self) {
        for body in &mut self.bodies {
            for (_, handle) in body.handles.drain(..) {
                self.host.destroy(handle);
            }
        }
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[BodyInstance] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&BodyInstance> {
        self.bodies.get(index)
    }

    pub fn params(&self, index: usize) -> Option<&PlanetParameterSet> {
        self.bodies.get(index).map(|b| &b.params)
    }

    pub fn synthesizer(&self) -> &PlanetSynthesizer {
        &self.synthesizer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn randomize_all(&mut self) {
        for index in 0..self.bodies.len() {
            self.apply_random(index);
        }
    }

    pub fn randomize_one(&mut self, index: usize) -> Result<(), ManagerError> {
        self.check(index)?;
        self.apply_random(index);
        Ok(())
    }

    pub fn regenerate_one(&mut self, index: usize) -> Result<(), ManagerError> {
        self.check(index)?;
        self.synthesizer.rebuild(&mut self.bodies[index]);
        self.publish(index);
        Ok(())
    }

    pub fn regenerate_all(&mut self) {
        for index in 0..self.bodies.len() {
            self.synthesizer.rebuild(&mut self.bodies[index]);
            self.publish(index);
        }
    }

    /// Changes the terrain resolution of every body and rebuilds them.
    pub fn set_resolution(&mut self, resolution: u32) {
        self.synthesizer.set_resolution(resolution);
        self.regenerate_all();
    }

    /// Edits one numeric parameter (see [`PlanetParameterSet::set`]) and rebuilds the body.
    pub fn set_parameter(&mut self, index: usize, path: &str, value: f32) -> Result<(), ManagerError> {
        self.check(index)?;
        let mut params = self.bodies[index].params.clone();
        params.set(path, value)?;
        self.bodies[index].params = params;
        self.regenerate_one(index)
    }

    /// Replaces the parameters of one body and rebuilds it.
    pub fn apply_params(&mut self, index: usize, params: PlanetParameterSet) -> Result<(), ManagerError> {
        self.check(index)?;
        self.bodies[index].params = params;
        self.regenerate_one(index)
    }

    /// Writes `planet_{index}.json` into the save directory.
    pub fn save(&self, index: usize) -> Result<PathBuf, ManagerError> {
        self.check(index)?;
        let path = persistence::slot_path(&self.config.save_dir, index);
        persistence::save(&self.bodies[index].params, &path)?;
        Ok(path)
    }

    /// Reads `planet_{index}.json`. A missing file leaves the body as it is.
    pub fn load(&mut self, index: usize) -> Result<LoadOutcome, ManagerError> {
        self.check(index)?;
        let path = persistence::slot_path(&self.config.save_dir, index);
        let outcome = persistence::load(&path)?;
        if let LoadOutcome::Loaded(params) = &outcome {
            self.apply_params(index, params.clone())?;
        }
        Ok(outcome)
    }

    pub fn save_all(&self) -> Result<Vec<PathBuf>, ManagerError> {
        let paths = (0..self.bodies.len())
            .map(|index| self.save(index))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = paths.len(), dir = %self.config.save_dir.display(), "saved system");
        Ok(paths)
    }

    /// Loads every slot that has a file. All slots are attempted before the
    /// first error, if any, is returned.
    pub fn load_all(&mut self) -> Result<usize, ManagerError> {
        let mut loaded = 0;
        let mut first_error = None;
        for index in 0..self.bodies.len() {
            match self.load(index) {
                Ok(LoadOutcome::Loaded(_)) => loaded += 1,
                Ok(LoadOutcome::Missing) => {}
                Err(err) => {
                    tracing::warn!(index, error = %err, "failed to load planet");
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(loaded),
        }
    }

    /// Spins every cloud shell forward by `dt` seconds and moves the published
    /// cloud renderables along.
    pub fn advance(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.advance(dt);
            let transform = body.cloud_world_transform();
            for handle in body.cloud_handles() {
                self.host.set_transform(handle, &transform);
            }
        }
    }

    fn check(&self, index: usize) -> Result<(), ManagerError> {
        if index < self.bodies.len() {
            Ok(())
        } else {
            Err(ManagerError::IndexOutOfRange {
                index,
                len: self.bodies.len(),
            })
        }
    }

    fn apply_random(&mut self, index: usize) {
        let params = self.randomizer.next_params(index);
        self.bodies[index].params = params;
        self.synthesizer.rebuild(&mut self.bodies[index]);
        self.publish(index);
    }

    /// Replaces the renderables of one body with its current geometry.
    fn publish(&mut self, index: usize) {
        let body = &mut self.bodies[index];
        for (_, handle) in body.handles.drain(..) {
            self.host.destroy(handle);
        }

        let geometry = &body.geometry;
        let cloud_transform = body.cloud_world_transform();
        let mut handles = Vec::with_capacity(12);
        for face in CubeFace::ALL {
            if let Some(mesh) = geometry.terrain_mesh(face) {
                let layer = RenderLayer::Terrain(face);
                handles.push((layer, self.host.create_renderable(mesh, &body.transform, layer)));
            }
        }
        for face in CubeFace::ALL {
            if let Some(mesh) = geometry.clouds.face(face) {
                let layer = RenderLayer::Clouds(face);
                handles.push((layer, self.host.create_renderable(mesh, &cloud_transform, layer)));
            }
        }
        body.handles = handles;
        tracing::debug!(index, planet = %body.params.name, "published body");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planet::SynthesisConfig;
    use crate::system::{RecordingHost, SpawnLayout};
    use glam::Vec3;
    use tempfile::TempDir;

    fn manager(count: usize) -> (InstanceManager<RecordingHost>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = GalaxyConfig {
            synthesis: SynthesisConfig {
                resolution: 6,
                cloud_resolution: 4,
                ..Default::default()
            },
            system: SystemConfig {
                planet_count: count,
                save_dir: dir.path().to_path_buf(),
                spawn: SpawnLayout::Points(vec![Vec3::ZERO, Vec3::X * 5.0, Vec3::X * 10.0]),
                master_seed: Some(17),
            },
        };
        let mut m = InstanceManager::new(config, RecordingHost::default());
        m.initialize();
        (m, dir)
    }

    #[test]
    fn test_initialize_publishes_twelve_renderables_per_body() {
        let (m, _dir) = manager(3);
        assert_eq!(m.len(), 3);
        assert_eq!(m.host().live_count(), 36);
        assert_eq!(m.body(1).unwrap().transform.position, Vec3::X * 5.0);
        for body in m.bodies() {
            assert_eq!(body.handles.len(), 12);
        }
    }

    #[test]
    fn test_edit_is_isolated() {
        let (mut m, _dir) = manager(3);
        let others: Vec<_> = [0, 2].iter().map(|&i| m.body(i).unwrap().geometry.clone()).collect();
        let other_params: Vec<_> = [0, 2].iter().map(|&i| m.params(i).unwrap().clone()).collect();

        m.set_parameter(1, "terrainNoise.baseRoughness", 3.3).unwrap();
        assert_eq!(m.params(1).unwrap().terrain_noise.base_roughness, 3.3);

        for (k, &i) in [0, 2].iter().enumerate() {
            assert!(std::sync::Arc::ptr_eq(&others[k], &m.body(i).unwrap().geometry));
            assert_eq!(&other_params[k], m.params(i).unwrap());
        }
        assert_eq!(m.host().live_count(), 36);
    }

    #[test]
    fn test_unknown_parameter_changes_nothing() {
        let (mut m, _dir) = manager(2);
        let before = m.params(0).unwrap().clone();
        let err = m.set_parameter(0, "terrainNoise.octaves", 2.0).unwrap_err();
        assert!(matches!(err, ManagerError::Parameter(ParameterError::Unknown(_))));
        assert_eq!(m.params(0).unwrap(), &before);
    }

    #[test]
    fn test_non_finite_parameter_is_rejected() {
        let (mut m, _dir) = manager(1);
        let before = m.params(0).unwrap().clone();
        let err = m.set_parameter(0, "terrainNoise.strength", f32::NAN).unwrap_err();
        assert!(matches!(err, ManagerError::Parameter(ParameterError::NonFinite { .. })));
        assert_eq!(m.params(0).unwrap(), &before);
    }

    #[test]
    fn test_non_finite_params_survive_save_and_load() {
        let (mut m, _dir) = manager(1);
        let mut params = m.params(0).unwrap().clone();
        params.terrain_noise.strength = f32::NAN;
        m.apply_params(0, params).unwrap();

        m.save(0).unwrap();
        assert!(matches!(m.load(0).unwrap(), LoadOutcome::Loaded(_)));
        assert_eq!(m.params(0).unwrap().terrain_noise.strength, 1.0);
    }

    #[test]
    fn test_advance_moves_published_clouds() {
        let (mut m, _dir) = manager(2);
        m.advance(10.0);
        for body in m.bodies() {
            let expected = body.cloud_world_transform();
            assert_ne!(expected.rotation, glam::Quat::IDENTITY);
            for (layer, handle) in &body.handles {
                let published = &m.host().live[handle];
                match layer {
                    RenderLayer::Clouds(_) => assert_eq!(published.transform, expected),
                    RenderLayer::Terrain(_) => assert_eq!(published.transform, body.transform),
                }
            }
        }
        assert_eq!(m.host().live_count(), 24);
        assert_eq!(m.host().created, 24);
    }

    #[test]
    fn test_index_out_of_range() {
        let (mut m, _dir) = manager(2);
        assert!(matches!(
            m.randomize_one(5),
            Err(ManagerError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(m.save(2).is_err());
    }

    #[test]
    fn test_load_missing_keeps_params() {
        let (mut m, _dir) = manager(2);
        let before = m.params(1).unwrap().clone();
        assert_eq!(m.load(1).unwrap(), LoadOutcome::Missing);
        assert_eq!(m.params(1).unwrap(), &before);
    }

    #[test]
    fn test_save_randomize_load_restores() {
        let (mut m, dir) = manager(2);
        let saved = m.params(0).unwrap().clone();
        let saved_geometry = m.body(0).unwrap().geometry.clone();
        let path = m.save(0).unwrap();
        assert_eq!(path, dir.path().join("planet_0.json"));

        m.randomize_one(0).unwrap();
        assert_ne!(m.params(0).unwrap(), &saved);

        assert!(matches!(m.load(0).unwrap(), LoadOutcome::Loaded(_)));
        assert_eq!(m.params(0).unwrap(), &saved);
        assert_eq!(*m.body(0).unwrap().geometry, *saved_geometry);
    }

    #[test]
    fn test_initialize_prefers_saved_files() {
        let (m, dir) = manager(2);
        m.save_all().unwrap();
        let saved: Vec<_> = (0..2).map(|i| m.params(i).unwrap().clone()).collect();

        let config = GalaxyConfig {
            synthesis: SynthesisConfig::preview(),
            system: SystemConfig {
                planet_count: 3,
                save_dir: dir.path().to_path_buf(),
                master_seed: Some(99),
                ..Default::default()
            },
        };
        let mut fresh = InstanceManager::new(config, RecordingHost::default());
        assert_eq!(fresh.initialize(), 2);
        assert_eq!(fresh.params(0).unwrap(), &saved[0]);
        assert_eq!(fresh.params(1).unwrap(), &saved[1]);
        assert_eq!(fresh.len(), 3);
    }

    #[test]
    fn test_load_all_continues_past_bad_file() {
        let (mut m, dir) = manager(3);
        m.save_all().unwrap();
        std::fs::write(dir.path().join("planet_1.json"), "not json").unwrap();
        m.randomize_all();
        let result = m.load_all();
        assert!(matches!(result, Err(ManagerError::Persistence(PersistenceError::Json { .. }))));
        // Slots 0 and 2 still loaded.
        let restored: PlanetParameterSet =
            persistence::decode(&std::fs::read_to_string(dir.path().join("planet_2.json")).unwrap()).unwrap();
        assert_eq!(m.params(2).unwrap(), &restored);
    }

    #[test]
    fn test_published_buffers_match_budget() {
        let (m, _dir) = manager(2);
        let published: usize = m.host().live.values().map(|r| r.buffer_bytes).sum();
        assert_eq!(published, 2 * m.synthesizer().config().mesh_budget().buffer_bytes());
    }

    #[test]
    fn test_set_resolution_rebuilds_everything() {
        let (mut m, _dir) = manager(2);
        m.set_resolution(9);
        for body in m.bodies() {
            assert!(body.geometry.terrain.iter().all(|f| f.resolution == 9));
        }
        assert_eq!(m.host().live_count(), 24);
        let mesh_vertices: usize = m
            .host()
            .live
            .values()
            .filter(|r| matches!(r.layer, RenderLayer::Terrain(_)))
            .map(|r| r.vertex_count)
            .sum();
        assert_eq!(mesh_vertices, 2 * 6 * 81);
    }

    #[test]
    fn test_generate_ignores_saved_files() {
        let (mut m, _dir) = manager(2);
        m.save_all().unwrap();
        let saved = m.params(0).unwrap().clone();
        m.generate();
        assert_eq!(m.len(), 2);
        assert_ne!(m.params(0).unwrap(), &saved);
        assert_eq!(m.host().live_count(), 24);
        assert_eq!(m.host().destroyed, 24);
    }

    #[test]
    fn test_clear_destroys_renderables() {
        let (mut m, _dir) = manager(2);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.host().live_count(), 0);
    }
}
