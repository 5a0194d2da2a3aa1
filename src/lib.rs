//! Dog RPG - a top-down dig-and-bark arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, moles, power-ups, digging)
//! - `camera`: Follow camera, screen shake and minimap projection
//! - `renderer`: WebGPU rendering pipeline
//! - `hud`: Health/stamina/score overlay model
//! - `menu`: Scene flow and dog selection
//! - `audio`: Procedural sound effects for simulation events
//! - `highscores` / `settings`: LocalStorage-backed persistence

pub mod audio;
pub mod camera;
pub mod highscores;
pub mod hud;
pub mod menu;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (ticks per second)
    pub const TICK_RATE: u32 = 120;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical view size (the canvas is scaled to fit)
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;

    /// World dimensions in pixels
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 2000.0;
    /// Diggable tile edge length
    pub const TILE_SIZE: f32 = 32.0;

    /// Player defaults
    pub const PLAYER_START: (f32, f32) = (400.0, 300.0);
    pub const PLAYER_SPEED: f32 = 180.0;
    /// "Feet-only" hitbox so the head can overlap things
    pub const PLAYER_BODY: (f32, f32) = (20.0, 12.0);
    pub const MAX_HEALTH: f32 = 100.0;
    pub const MAX_STAMINA: f32 = 100.0;
    /// Stamina per second while walking / standing still
    pub const STAMINA_DRAIN: f32 = 30.0;
    pub const STAMINA_REGEN: f32 = 60.0;
    /// Time between two contact hits from moles
    pub const DAMAGE_COOLDOWN_MS: u32 = 1000;
    pub const HURT_TINT_MS: u32 = 200;

    /// Bark
    pub const BARK_RANGE: f32 = 180.0;
    /// Moles are hit from slightly further away
    pub const BARK_MOLE_RANGE: f32 = BARK_RANGE * 1.2;
    pub const BARK_BUBBLE_MS: u32 = 1000;
    pub const BARK_DAMAGE: u32 = 1;

    /// Dig point distance in front of the paws
    pub const DIG_OFFSET: f32 = TILE_SIZE * 0.35;

    /// Mole defaults
    pub const MOLE_HEALTH: u32 = 3;
    pub const MOLE_DAMAGE: f32 = 10.0;
    pub const MOLE_SPEED: f32 = 80.0;
    pub const MOLE_BODY: f32 = 30.0;
    pub const MOLE_BOUNCE: f32 = 0.5;
    pub const MOLE_BURROW_MS: u32 = 5000;
    pub const MOLE_HIT_WINDOW_MS: u32 = 100;
    pub const MOLE_DEATH_MS: u32 = 600;
    pub const MOLE_BURROW_ANIM_MS: u32 = 400;
    pub const MAX_MOLES: usize = 32;

    /// Power-up defaults
    pub const POWERUP_SIZE: f32 = 32.0;
    pub const POWERUP_DRAG: f32 = 50.0;
    pub const POWERUP_FLEE_SPEED: f32 = 100.0;
    pub const POWERUP_SCARE_MS: u32 = 1000;
    pub const POWERUP_SPAWN_GRACE_MS: u32 = 600;
    pub const POWERUP_BOB_HEIGHT: f32 = 10.0;
    pub const POWERUP_BOB_MS: u32 = 1000;
    pub const POWERUP_SPIN_MS: u32 = 3000;
    pub const INITIAL_POWERUPS: usize = 10;

    /// Points
    pub const SCORE_DIG: u32 = 10;
    pub const SCORE_SCARE: u32 = 20;
    pub const SCORE_PICKUP: u32 = 50;
    pub const SCORE_MOLE: u32 = 100;

    /// Floating "+N" text lifetime and rise distance
    pub const POPUP_MS: u32 = 1000;
    pub const POPUP_RISE: f32 = 50.0;
    pub const HIGH_SCORE_FLASH_MS: u32 = 1000;
}

/// Convert milliseconds to whole simulation ticks
#[inline]
pub const fn ticks_from_ms(ms: u32) -> u32 {
    ms * consts::TICK_RATE / 1000
}

/// Unpack a `0xRRGGBB` tint into normalized RGBA
#[inline]
pub fn tint_to_rgba(tint: u32, alpha: f32) -> [f32; 4] {
    let r = ((tint >> 16) & 0xff) as f32 / 255.0;
    let g = ((tint >> 8) & 0xff) as f32 / 255.0;
    let b = (tint & 0xff) as f32 / 255.0;
    [r, g, b, alpha]
}

/// World bounds as (min, max) corners
#[inline]
pub fn world_bounds() -> (Vec2, Vec2) {
    (
        Vec2::ZERO,
        Vec2::new(consts::WORLD_WIDTH, consts::WORLD_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_from_ms() {
        assert_eq!(ticks_from_ms(1000), 120);
        assert_eq!(ticks_from_ms(100), 12);
        assert_eq!(ticks_from_ms(5000), 600);
    }

    #[test]
    fn test_tint_to_rgba() {
        let c = tint_to_rgba(0xff8000, 0.5);
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert!(c[2].abs() < 1e-6);
        assert_eq!(c[3], 0.5);
    }
}
