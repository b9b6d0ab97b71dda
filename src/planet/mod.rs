//! Planet description, persistence and synthesis.

mod body;
mod config;
mod params;
pub mod persistence;
mod synthesizer;

pub use body::{BodyGeometry, BodyInstance, Transform};
pub use config::{MeshBudget, SynthesisConfig};
pub use params::{PlanetParameterSet, ParameterError, DEFAULT_CLOUD_OPACITY, DEFAULT_CLOUD_THRESHOLD};
pub use persistence::{LoadOutcome, PersistenceError};
pub use synthesizer::{seed_offsets, PlanetSynthesizer};
