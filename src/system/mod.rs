//! Multi-body systems: layout, randomization, the render boundary and the manager.

mod config;
mod host;
mod manager;
mod randomizer;

pub use config::{ConfigError, GalaxyConfig, SpawnLayout, SystemConfig};
pub use host::{NullHost, RecordedRenderable, RecordingHost, RenderHandle, RenderHost, RenderLayer};
pub use manager::{InstanceManager, ManagerError};
pub use randomizer::{Randomizer, MAX_SEED};
