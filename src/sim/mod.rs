//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod loot;
pub mod mole;
pub mod physics;
pub mod player;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use loot::{Loot, LootTable};
pub use mole::{HitOutcome, Mole, MoleState};
pub use physics::Body;
pub use player::{Direction, MoveKeys, Player};
pub use powerup::{PowerUp, PowerUpKind};
pub use state::{GameEvent, GamePhase, GameState, Particle, Popup, SpawnError};
pub use tick::{TickInput, bark, dig, tick};
pub use tilemap::{TileCoord, TileKind, TileMap};
