//! Game state and core simulation types

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::loot::{Loot, LootTable};
use super::mole::Mole;
use super::player::Player;
use super::powerup::{PowerUp, PowerUpKind};
use super::tilemap::{TileCoord, TileMap};
use crate::consts::*;
use crate::{ticks_from_ms, world_bounds};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen until resumed
    Paused,
    /// Health ran out; waiting for restart
    GameOver,
}

/// Things that happened during a tick, for the frontend (audio, camera,
/// storage). Drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Barked { pos: Vec2 },
    Dug { tile: TileCoord, loot: Loot },
    MoleSpawned { id: u32, pos: Vec2 },
    MoleHit { id: u32 },
    MoleKilled { id: u32, pos: Vec2 },
    MoleBurrowed { id: u32 },
    PowerUpScared { id: u32 },
    PowerUpCollected { id: u32, kind: PowerUpKind },
    PlayerHurt { health: f32 },
    CameraShake { duration_ms: u32, intensity: f32 },
    NewHighScore { score: u64 },
    GameOver { score: u64 },
    Restarted,
}

/// Why a mole could not be spawned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnError {
    /// The live-mole cap is reached
    TooManyMoles { limit: usize },
    /// Requested position lies outside the world
    OutOfBounds { pos: Vec2 },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::TooManyMoles { limit } => {
                write!(f, "mole limit of {limit} reached")
            }
            SpawnError::OutOfBounds { pos } => {
                write!(f, "spawn position ({}, {}) is outside the world", pos.x, pos.y)
            }
        }
    }
}

impl std::error::Error for SpawnError {}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// 1 -> 0 over the particle's lifespan
    pub life: f32,
    /// Life lost per second
    pub fade: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    pub size: f32,
    /// Additive blending (sparkles)
    pub additive: bool,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Shades of brown for dirt effects
pub const DIRT_COLORS: [u32; 3] = [0x8b4513, 0x5c4033, 0xa0522d];
/// Dirt plus a darker shade for a mole bursting out
pub const MOLE_DIRT_COLORS: [u32; 4] = [0x8b4513, 0x5c4033, 0xa0522d, 0x654321];

/// Parameters for a burst of particles
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub speed: (f32, f32),
    /// Emission angle range in degrees (0 = right, 90 = down)
    pub angle: (f32, f32),
    pub gravity: f32,
    pub lifespan_ms: u32,
    pub size: f32,
    pub colors: &'static [u32],
    pub additive: bool,
}

/// Floating text (score pop-ups, "BARK!")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Popup {
    pub text: String,
    pub origin: Vec2,
    pub color: u32,
    pub age_ticks: u32,
}

impl Popup {
    fn lifetime() -> u32 {
        ticks_from_ms(POPUP_MS)
    }

    /// Progress 0 -> 1
    pub fn progress(&self) -> f32 {
        (self.age_ticks as f32 / Self::lifetime() as f32).min(1.0)
    }

    /// Current position (rises while fading)
    pub fn pos(&self) -> Vec2 {
        self.origin - Vec2::new(0.0, POPUP_RISE * self.progress())
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.progress()
    }

    pub fn is_expired(&self) -> bool {
        self.age_ticks >= Self::lifetime()
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// The dog
    pub player: Player,
    pub health: f32,
    pub stamina: f32,
    pub score: u64,
    /// Best score seen, including previous runs
    pub high_score: u64,
    /// Ticks left flashing the high-score label
    pub high_score_flash_ticks: u32,
    /// Ticks before moles can hurt the dog again
    pub damage_cooldown_ticks: u32,
    /// Diggable ground
    pub tiles: TileMap,
    /// Live moles (sorted by id)
    pub moles: Vec<Mole>,
    /// Live power-ups (sorted by id)
    pub powerups: Vec<PowerUp>,
    pub loot_table: LootTable,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Floating texts (not gameplay-affecting)
    pub popups: Vec<Popup>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start a fresh run
    pub fn new(seed: u64, dog_tint: u32, high_score: u64) -> Self {
        let start = Vec2::new(PLAYER_START.0, PLAYER_START.1);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::new(start, dog_tint),
            health: MAX_HEALTH,
            stamina: MAX_STAMINA,
            score: 0,
            high_score,
            high_score_flash_ticks: 0,
            damage_cooldown_ticks: 0,
            tiles: TileMap::for_world(WORLD_WIDTH, WORLD_HEIGHT),
            moles: Vec::new(),
            powerups: Vec::new(),
            loot_table: LootTable::default(),
            particles: Vec::new(),
            popups: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        state.scatter_powerups(INITIAL_POWERUPS);
        state
    }

    /// Replace this run with a new one, keeping the dog and the high score
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        let events = std::mem::take(&mut self.events);
        *self = Self::new(seed, self.player.tint, self.high_score);
        self.events = events;
        self.push_event(GameEvent::Restarted);
        log::info!("Run restarted with seed {}", seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events without consuming them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_new_high_score_flashing(&self) -> bool {
        self.high_score_flash_ticks > 0
    }

    /// Award points, optionally with a floating "+N" at a world position
    pub fn add_score(&mut self, points: u32, at: Option<Vec2>) {
        self.score += points as u64;

        if self.score > self.high_score {
            self.high_score = self.score;
            if points > 0 {
                self.high_score_flash_ticks = ticks_from_ms(HIGH_SCORE_FLASH_MS);
            }
            self.push_event(GameEvent::NewHighScore {
                score: self.high_score,
            });
        }

        if let Some(pos) = at {
            self.popup(format!("+{points}"), pos, 0xffff00);
        }
    }

    /// Show a floating text
    pub fn popup(&mut self, text: impl Into<String>, origin: Vec2, color: u32) {
        self.popups.push(Popup {
            text: text.into(),
            origin,
            color,
            age_ticks: 0,
        });
    }

    /// Emit a burst of particles at a point
    pub fn emit_particles(&mut self, pos: Vec2, burst: Burst) {
        let fade = 1000.0 / burst.lifespan_ms.max(1) as f32;
        for _ in 0..burst.count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = self
                .rng
                .random_range(burst.angle.0..=burst.angle.1)
                .to_radians();
            let speed = self.rng.random_range(burst.speed.0..=burst.speed.1);
            let color = burst.colors[self.rng.random_range(0..burst.colors.len())];
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                fade,
                gravity: burst.gravity,
                size: burst.size,
                additive: burst.additive,
            });
        }
    }

    /// Place a mole at a world position
    pub fn spawn_mole(&mut self, pos: Vec2) -> Result<u32, SpawnError> {
        let live = self.moles.iter().filter(|m| m.is_active()).count();
        if live >= MAX_MOLES {
            return Err(SpawnError::TooManyMoles { limit: MAX_MOLES });
        }
        let (min, max) = world_bounds();
        if pos.x < min.x || pos.y < min.y || pos.x > max.x || pos.y > max.y {
            return Err(SpawnError::OutOfBounds { pos });
        }

        let id = self.next_entity_id();
        self.moles.push(Mole::new(id, pos));
        self.emit_particles(
            pos,
            Burst {
                count: 12,
                speed: (80.0, 150.0),
                angle: (250.0, 290.0),
                gravity: 50.0,
                lifespan_ms: 800,
                size: 4.0,
                colors: &MOLE_DIRT_COLORS,
                additive: false,
            },
        );
        self.push_event(GameEvent::MoleSpawned { id, pos });
        log::debug!("Mole {} spawned at ({:.0}, {:.0})", id, pos.x, pos.y);
        Ok(id)
    }

    /// Throw a collectible out of a hole
    pub fn spawn_loot(&mut self, pos: Vec2, kind: PowerUpKind) -> u32 {
        let offset = Vec2::new(
            self.rng.random_range(-5..=5) as f32,
            self.rng.random_range(-5..=5) as f32,
        );
        let pop = Vec2::new(self.rng.random_range(-50..=50) as f32, -150.0);
        let id = self.next_entity_id();
        self.powerups
            .push(PowerUp::dug_up(id, kind, pos + offset, pop));
        id
    }

    /// Scatter wild power-ups over the map
    pub fn scatter_powerups(&mut self, count: usize) {
        let margin = 100;
        for _ in 0..count {
            let x = self.rng.random_range(margin..=WORLD_WIDTH as i32 - margin) as f32;
            let y = self.rng.random_range(margin..=WORLD_HEIGHT as i32 - margin) as f32;
            let id = self.next_entity_id();
            self.powerups
                .push(PowerUp::new(id, PowerUpKind::Wild, Vec2::new(x, y)));
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.moles.sort_by_key(|m| m.id);
        self.powerups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_run() {
        let state = GameState::new(42, 0x808080, 500);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.powerups.len(), INITIAL_POWERUPS);
        assert!(state.moles.is_empty());
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.high_score, 500);
        for p in &state.powerups {
            assert!((100.0..=1900.0).contains(&p.body.pos.x));
            assert!((100.0..=1900.0).contains(&p.body.pos.y));
            assert_eq!(p.kind, PowerUpKind::Wild);
        }
    }

    #[test]
    fn test_add_score_tracks_high_score() {
        let mut state = GameState::new(1, 0xffffff, 15);
        state.add_score(10, None);
        assert_eq!(state.high_score, 15);
        assert!(state.events().is_empty());

        state.add_score(10, Some(Vec2::ZERO));
        assert_eq!(state.score, 20);
        assert_eq!(state.high_score, 20);
        assert!(state.is_new_high_score_flashing());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::NewHighScore { score: 20 }]
        );
        assert_eq!(state.popups.len(), 1);
        assert_eq!(state.popups[0].text, "+10");
    }

    #[test]
    fn test_spawn_mole_limits() {
        let mut state = GameState::new(1, 0xffffff, 0);
        assert!(matches!(
            state.spawn_mole(Vec2::new(-10.0, 50.0)),
            Err(SpawnError::OutOfBounds { .. })
        ));
        for _ in 0..MAX_MOLES {
            state.spawn_mole(Vec2::new(500.0, 500.0)).unwrap();
        }
        let err = state.spawn_mole(Vec2::new(500.0, 500.0)).unwrap_err();
        assert_eq!(err, SpawnError::TooManyMoles { limit: MAX_MOLES });
        assert_eq!(err.to_string(), "mole limit of 32 reached");
    }

    #[test]
    fn test_spawn_loot_is_uncollectable_at_first() {
        let mut state = GameState::new(1, 0xffffff, 0);
        let id = state.spawn_loot(Vec2::new(300.0, 300.0), PowerUpKind::Standard);
        let item = state.powerups.iter().find(|p| p.id == id).unwrap();
        assert!(item.is_spawning());
        assert!((item.body.pos - Vec2::new(300.0, 300.0)).abs().max_element() <= 5.0);
        assert_eq!(item.body.vel.y, -150.0);
        assert!(item.body.vel.x.abs() <= 50.0);
    }

    #[test]
    fn test_particles_capped() {
        let mut state = GameState::new(1, 0xffffff, 0);
        let burst = Burst {
            count: MAX_PARTICLES + 50,
            speed: (10.0, 20.0),
            angle: (0.0, 360.0),
            gravity: 0.0,
            lifespan_ms: 500,
            size: 2.0,
            colors: &DIRT_COLORS,
            additive: false,
        };
        state.emit_particles(Vec2::ZERO, burst);
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_restart_keeps_tint_and_high_score() {
        let mut state = GameState::new(1, 0xffd700, 0);
        state.add_score(300, None);
        state.health = 0.0;
        state.phase = GamePhase::GameOver;
        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 300);
        assert_eq!(state.player.tint, 0xffd700);
        assert_eq!(state.health, MAX_HEALTH);
        assert!(state.events().contains(&GameEvent::Restarted));
    }

    proptest! {
        #[test]
        fn score_never_decreases(awards in proptest::collection::vec(0u32..500, 0..50)) {
            let mut state = GameState::new(7, 0xffffff, 0);
            let mut last = state.score;
            for points in awards {
                state.add_score(points, None);
                prop_assert!(state.score >= last);
                prop_assert!(state.high_score >= state.score);
                last = state.score;
            }
        }
    }
}
