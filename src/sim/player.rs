//! The dog

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use crate::consts::*;

/// Last direction the dog walked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in screen space (y grows downward)
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Column of this direction in the spritesheet
    fn sheet_column(&self) -> u32 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }
}

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Walk cycle frames per second
const WALK_FPS: u64 = 10;
/// Frames per walk cycle (rows in the spritesheet)
const WALK_FRAMES: u32 = 6;

/// The player's dog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub facing: Direction,
    /// Tint chosen in the main menu
    pub tint: u32,
    /// Ticks left showing the red "hurt" tint
    pub hurt_ticks: u32,
    /// Ticks left showing the "Woof!" bubble
    pub bark_ticks: u32,
    /// A direction key drove the dog this tick, even if a wall stopped it
    pub walking: bool,
}

impl Player {
    pub fn new(pos: Vec2, tint: u32) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(PLAYER_BODY.0, PLAYER_BODY.1)),
            facing: Direction::Down,
            tint,
            hurt_ticks: 0,
            bark_ticks: 0,
            walking: false,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Walking as far as stamina and animation are concerned
    pub fn is_moving(&self) -> bool {
        self.walking
    }

    /// Set velocity from held keys.
    ///
    /// Left beats right and up beats down. On diagonals the vertical key
    /// decides the facing, and speed is normalized.
    pub fn apply_movement(&mut self, keys: MoveKeys) {
        let mut vel = Vec2::ZERO;

        if keys.left {
            vel.x = -PLAYER_SPEED;
            self.facing = Direction::Left;
        } else if keys.right {
            vel.x = PLAYER_SPEED;
            self.facing = Direction::Right;
        }

        if keys.up {
            vel.y = -PLAYER_SPEED;
            self.facing = Direction::Up;
        } else if keys.down {
            vel.y = PLAYER_SPEED;
            self.facing = Direction::Down;
        }

        if vel.x != 0.0 && vel.y != 0.0 {
            vel = vel.normalize() * PLAYER_SPEED;
        }

        self.walking = vel != Vec2::ZERO;
        self.body.vel = vel;
    }

    /// Stop dead (game over)
    pub fn halt(&mut self) {
        self.body.vel = Vec2::ZERO;
        self.walking = false;
    }

    /// Where the front paws dig
    pub fn dig_point(&self) -> Vec2 {
        self.body.pos + self.facing.unit() * DIG_OFFSET
    }

    /// Spritesheet frame to show at the given simulation time
    pub fn sprite_frame(&self, time_ticks: u64) -> u32 {
        let column = self.facing.sheet_column();
        if !self.is_moving() {
            return column;
        }
        let step = (time_ticks * WALK_FPS / TICK_RATE as u64) % WALK_FRAMES as u64;
        column + step as u32 * 4
    }

    /// Advance cosmetic timers by one tick
    pub fn update_timers(&mut self) {
        self.hurt_ticks = self.hurt_ticks.saturating_sub(1);
        self.bark_ticks = self.bark_ticks.saturating_sub(1);
    }
}
