//! Collectible power-ups
//!
//! Power-ups float in place with a gentle bob. A bark scares them: they stop
//! bobbing, flee from the dog for a second, then settle and bob again
//! wherever they ended up. Items dug out of the ground are briefly
//! uncollectable while they fly out of the hole.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use crate::consts::*;
use crate::ticks_from_ms;

/// What kind of collectible this is (decides the tint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Scattered over the map at the start of a run
    Wild,
    /// Dug up, green
    Standard,
    /// Dug up, white
    Bone,
}

impl PowerUpKind {
    pub fn tint(&self) -> Option<u32> {
        match self {
            PowerUpKind::Wild => None,
            PowerUpKind::Standard => Some(0x00ff00),
            PowerUpKind::Bone => Some(0xffffff),
        }
    }
}

/// A power-up entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub body: Body,
    /// Ticks left fleeing (0 = calm)
    pub scared_ticks: u32,
    /// Ticks left before it can be picked up (0 = collectable)
    pub spawning_ticks: u32,
    /// Elapsed ticks of the current bob, `None` while it is stopped
    pub bob: Option<u32>,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            body: Body::new(pos, Vec2::splat(POWERUP_SIZE)).with_drag(POWERUP_DRAG),
            scared_ticks: 0,
            spawning_ticks: 0,
            bob: Some(0),
        }
    }

    /// A power-up popping out of a hole: uncollectable for a moment
    pub fn dug_up(id: u32, kind: PowerUpKind, pos: Vec2, pop_vel: Vec2) -> Self {
        let mut item = Self::new(id, kind, pos);
        item.body.vel = pop_vel;
        item.spawning_ticks = ticks_from_ms(POWERUP_SPAWN_GRACE_MS);
        item
    }

    pub fn is_scared(&self) -> bool {
        self.scared_ticks > 0
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning_ticks > 0
    }

    /// Current vertical bob displacement (0 to `POWERUP_BOB_HEIGHT`)
    pub fn bob_offset(&self) -> f32 {
        match self.bob {
            Some(elapsed) => bob_curve(elapsed) * POWERUP_BOB_HEIGHT,
            None => 0.0,
        }
    }

    /// Where the item is drawn and where it can be touched
    pub fn display_pos(&self) -> Vec2 {
        self.body.pos + Vec2::new(0.0, self.bob_offset())
    }

    /// Flee from `origin` at `speed`.
    ///
    /// The bob stops and its current displacement becomes the new resting
    /// position. Does nothing if already scared.
    pub fn scare_from(&mut self, origin: Vec2, speed: f32) -> bool {
        if self.is_scared() {
            return false;
        }

        self.body.pos = self.display_pos();
        self.bob = None;

        let away = self.body.pos - origin;
        if away.length() > 0.0 {
            self.body.vel = away.normalize() * speed;
        }

        self.scared_ticks = ticks_from_ms(POWERUP_SCARE_MS);
        true
    }

    /// Advance timers by one tick
    pub fn update_timers(&mut self) {
        if self.spawning_ticks > 0 {
            self.spawning_ticks -= 1;
        }

        if self.scared_ticks > 0 {
            self.scared_ticks -= 1;
            if self.scared_ticks == 0 {
                // Settle and start bobbing from here
                self.body.vel = Vec2::ZERO;
                self.bob = Some(0);
            }
        }

        if let Some(elapsed) = self.bob.as_mut() {
            *elapsed = elapsed.wrapping_add(1);
        }
    }
}

/// Yoyo sine in-out curve in 0..=1 for a bob that has run `elapsed` ticks
fn bob_curve(elapsed: u32) -> f32 {
    let half = ticks_from_ms(POWERUP_BOB_MS).max(1);
    let phase = elapsed % (half * 2);
    let t = if phase < half {
        phase as f32 / half as f32
    } else {
        2.0 - phase as f32 / half as f32
    };
    -0.5 * ((std::f32::consts::PI * t).cos() - 1.0)
}

/// Spin angle (radians) at a given simulation time
pub fn spin_angle(time_ticks: u64) -> f32 {
    let period = ticks_from_ms(POWERUP_SPIN_MS) as u64;
    (time_ticks % period) as f32 / period as f32 * std::f32::consts::TAU
}
