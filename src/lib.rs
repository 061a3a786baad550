// Library exports for runegrid
// The headless driver and the integration tests both build on these modules

pub mod battle;
pub mod cell;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod events;
pub mod gene;
pub mod grid;
pub mod mob;
pub mod power;
pub mod rune;
pub mod world;

pub use config::SimConfig;
pub use entity::{Entity, EntityKind, MobId, PlantId};
pub use error::ConfigError;
pub use grid::Point;
pub use world::World;
