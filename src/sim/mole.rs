//! Moles: timed enemies dug out of the ground
//!
//! ```text
//! Active --(health <= 0)--> Dying (600 ms) --> removed
//!    \----(5 s elapsed)---> Burrowing (400 ms) --> removed
//! ```
//!
//! While `Active` a mole chases the dog. After a hit it ignores further
//! damage for a short window.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{Body, velocity_toward};
use crate::consts::*;
use crate::ticks_from_ms;

/// Lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoleState {
    /// Chasing; `burrow_ticks` until it gives up and digs back down
    Active { burrow_ticks: u32 },
    /// Killed, playing the death effect
    Dying { ticks: u32 },
    /// Timed out, playing the burrow animation
    Burrowing { ticks: u32 },
}

/// Result of a bark hitting a mole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still inside the hit window, or not active
    Ignored,
    /// Took damage and survived
    Hurt,
    /// Took damage and died
    Killed,
}

/// A mole entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mole {
    pub id: u32,
    pub body: Body,
    pub health: u32,
    pub state: MoleState,
    /// Ticks left in the post-hit invulnerability window (drawn red)
    pub hit_ticks: u32,
    /// Sprite faces right (mirrored)
    pub facing_right: bool,
}

impl Mole {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(MOLE_BODY)).with_bounce(MOLE_BOUNCE),
            health: MOLE_HEALTH,
            state: MoleState::Active {
                burrow_ticks: ticks_from_ms(MOLE_BURROW_MS),
            },
            hit_ticks: 0,
            facing_right: false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, MoleState::Active { .. })
    }

    /// Contact damage dealt to the dog
    pub fn damage(&self) -> f32 {
        MOLE_DAMAGE
    }

    /// True once the exit animation has finished
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            MoleState::Dying { ticks: 0 } | MoleState::Burrowing { ticks: 0 }
        )
    }

    /// Steer toward the target while active
    pub fn chase(&mut self, target: Vec2) {
        if !self.is_active() {
            return;
        }
        self.body.vel = velocity_toward(self.body.pos, target, MOLE_SPEED);
        if self.body.vel.x != 0.0 {
            self.facing_right = self.body.vel.x > 0.0;
        }
    }

    /// Apply bark damage
    pub fn take_damage(&mut self, amount: u32) -> HitOutcome {
        if self.hit_ticks > 0 || !self.is_active() {
            return HitOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount);
        self.hit_ticks = ticks_from_ms(MOLE_HIT_WINDOW_MS);

        if self.health == 0 {
            self.state = MoleState::Dying {
                ticks: ticks_from_ms(MOLE_DEATH_MS),
            };
            self.body.vel = Vec2::ZERO;
            HitOutcome::Killed
        } else {
            HitOutcome::Hurt
        }
    }

    /// Advance lifecycle timers by one tick.
    ///
    /// Returns `true` on the tick the mole starts burrowing.
    pub fn update_timers(&mut self) -> bool {
        if self.hit_ticks > 0 && self.is_active() {
            self.hit_ticks -= 1;
        }

        match &mut self.state {
            MoleState::Active { burrow_ticks } => {
                *burrow_ticks = burrow_ticks.saturating_sub(1);
                if *burrow_ticks == 0 {
                    self.state = MoleState::Burrowing {
                        ticks: ticks_from_ms(MOLE_BURROW_ANIM_MS),
                    };
                    self.body.vel = Vec2::ZERO;
                    return true;
                }
            }
            MoleState::Dying { ticks } | MoleState::Burrowing { ticks } => {
                *ticks = ticks.saturating_sub(1);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(mole: &mut Mole, n: u32) {
        for _ in 0..n {
            mole.update_timers();
        }
    }

    #[test]
    fn test_three_hits_kill() {
        let mut mole = Mole::new(1, Vec2::new(100.0, 100.0));
        let window = ticks_from_ms(MOLE_HIT_WINDOW_MS);

        assert_eq!(mole.take_damage(1), HitOutcome::Hurt);
        run_ticks(&mut mole, window);
        assert_eq!(mole.take_damage(1), HitOutcome::Hurt);
        run_ticks(&mut mole, window);
        assert_eq!(mole.take_damage(1), HitOutcome::Killed);
        assert!(!mole.is_active());
        assert_eq!(mole.body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_hit_window_blocks_damage() {
        let mut mole = Mole::new(1, Vec2::ZERO);
        assert_eq!(mole.take_damage(1), HitOutcome::Hurt);
        assert_eq!(mole.take_damage(1), HitOutcome::Ignored);
        assert_eq!(mole.health, MOLE_HEALTH - 1);
        run_ticks(&mut mole, ticks_from_ms(MOLE_HIT_WINDOW_MS) - 1);
        assert_eq!(mole.take_damage(1), HitOutcome::Ignored);
        run_ticks(&mut mole, 1);
        assert_eq!(mole.take_damage(1), HitOutcome::Hurt);
    }

    #[test]
    fn test_burrows_after_timeout() {
        let mut mole = Mole::new(1, Vec2::ZERO);
        let burrow = ticks_from_ms(MOLE_BURROW_MS);
        run_ticks(&mut mole, burrow - 1);
        assert!(mole.is_active());
        assert!(mole.update_timers());
        assert!(matches!(mole.state, MoleState::Burrowing { .. }));
        assert!(!mole.is_finished());

        run_ticks(&mut mole, ticks_from_ms(MOLE_BURROW_ANIM_MS));
        assert!(mole.is_finished());
    }

    #[test]
    fn test_dead_mole_ignores_damage_and_finishes() {
        let mut mole = Mole::new(1, Vec2::ZERO);
        assert_eq!(mole.take_damage(5), HitOutcome::Killed);
        assert_eq!(mole.take_damage(1), HitOutcome::Ignored);
        run_ticks(&mut mole, ticks_from_ms(MOLE_DEATH_MS));
        assert!(mole.is_finished());
    }

    #[test]
    fn test_chase_faces_target() {
        let mut mole = Mole::new(1, Vec2::new(100.0, 100.0));
        mole.chase(Vec2::new(200.0, 100.0));
        assert!(mole.facing_right);
        assert!((mole.body.vel.length() - MOLE_SPEED).abs() < 1e-3);

        mole.chase(Vec2::new(0.0, 100.0));
        assert!(!mole.facing_right);
    }
}
