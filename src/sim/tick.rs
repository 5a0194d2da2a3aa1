//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::loot::Loot;
use super::mole::HitOutcome;
use super::physics::{overlaps, separate};
use super::player::MoveKeys;
use super::state::{Burst, DIRT_COLORS, GameEvent, GamePhase, GameState};
use super::tilemap::TileMap;
use crate::consts::*;
use crate::{ticks_from_ms, world_bounds};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub moves: MoveKeys,
    /// Bark (edge-triggered, Space)
    pub bark: bool,
    /// Dig (edge-triggered, E)
    pub dig: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start over after game over
    pub restart: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    match state.phase {
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
            return;
        }
        GamePhase::Paused => return,
        GamePhase::Playing => {}
    }

    let input = if input.autopilot {
        autopilot(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;

    // Movement
    state.player.apply_movement(input.moves);

    // Actions
    if input.bark {
        bark(state);
    }
    if input.dig {
        dig(state);
    }

    // Physics
    let bounds = world_bounds();
    state.player.body.integrate(dt, bounds);
    let target = state.player.pos();
    for mole in &mut state.moles {
        mole.chase(target);
        mole.body.integrate(dt, bounds);
    }
    for powerup in &mut state.powerups {
        powerup.body.integrate(dt, bounds);
    }

    // Timers
    update_timers(state);

    // Overlaps
    mole_contact(state);
    if state.phase == GamePhase::GameOver {
        return;
    }
    collect_powerups(state);
    for mole in &mut state.moles {
        separate(&state.player.body, &mut mole.body);
    }

    // Stamina follows movement
    state.stamina = if state.player.is_moving() {
        (state.stamina - STAMINA_DRAIN * dt).clamp(0.0, MAX_STAMINA)
    } else {
        (state.stamina + STAMINA_REGEN * dt).clamp(0.0, MAX_STAMINA)
    };

    update_visuals(state, dt);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Bark: scare nearby power-ups and hurt nearby moles
pub fn bark(state: &mut GameState) {
    let origin = state.player.pos();
    state.player.bark_ticks = ticks_from_ms(BARK_BUBBLE_MS);
    state.push_event(GameEvent::Barked { pos: origin });

    let mut scared = Vec::new();
    for powerup in &mut state.powerups {
        if powerup.is_scared() {
            continue;
        }
        let pos = powerup.display_pos();
        if pos.distance(origin) <= BARK_RANGE && powerup.scare_from(origin, POWERUP_FLEE_SPEED) {
            scared.push((powerup.id, pos));
        }
    }
    for (id, pos) in scared {
        state.add_score(SCORE_SCARE, Some(pos - Vec2::new(0.0, 20.0)));
        state.push_event(GameEvent::PowerUpScared { id });
    }

    let mut hits = Vec::new();
    for mole in &mut state.moles {
        if !mole.is_active() || mole.body.pos.distance(origin) > BARK_MOLE_RANGE {
            continue;
        }
        let outcome = mole.take_damage(BARK_DAMAGE);
        if outcome != HitOutcome::Ignored {
            hits.push((mole.id, mole.body.pos, outcome));
        }
    }
    for (id, pos, outcome) in hits {
        state.popup("BARK!", pos - Vec2::new(0.0, 30.0), 0xff0000);
        state.push_event(GameEvent::MoleHit { id });
        if outcome == HitOutcome::Killed {
            state.add_score(SCORE_MOLE, Some(pos - Vec2::new(0.0, 20.0)));
            state.emit_particles(
                pos,
                Burst {
                    count: 15,
                    speed: (0.0, 150.0),
                    angle: (0.0, 360.0),
                    gravity: 100.0,
                    lifespan_ms: 600,
                    size: 6.0,
                    colors: &DIRT_COLORS,
                    additive: false,
                },
            );
            state.push_event(GameEvent::MoleKilled { id, pos });
            log::debug!("Mole {} defeated", id);
        }
    }
}

/// Dig at the dog's front paws.
///
/// Returns the loot outcome, or `None` when nothing was dug (outside the map
/// or the tile is already dirt).
pub fn dig(state: &mut GameState) -> Option<Loot> {
    let point = state.player.dig_point();
    let tile = state.tiles.tile_at_world(point)?;
    if !state.tiles.dig(tile) {
        return None;
    }

    let center = TileMap::tile_center(tile);
    state.add_score(SCORE_DIG, Some(center));
    state.push_event(GameEvent::CameraShake {
        duration_ms: 50,
        intensity: 0.005,
    });
    state.emit_particles(
        center,
        Burst {
            count: 6,
            speed: (50.0, 150.0),
            angle: (180.0, 360.0),
            gravity: 200.0,
            lifespan_ms: 600,
            size: 2.0,
            colors: &DIRT_COLORS,
            additive: false,
        },
    );

    let table = state.loot_table;
    let mut loot = table.roll(state.rng());
    match loot {
        Loot::Mole => {
            if let Err(err) = state.spawn_mole(center) {
                log::warn!("Error spawning mole: {}", err);
                loot = Loot::Nothing;
            }
        }
        Loot::Item(kind) => {
            state.spawn_loot(center, kind);
        }
        Loot::Nothing => {}
    }

    state.push_event(GameEvent::Dug { tile, loot });
    Some(loot)
}

fn update_timers(state: &mut GameState) {
    state.player.update_timers();
    state.damage_cooldown_ticks = state.damage_cooldown_ticks.saturating_sub(1);
    state.high_score_flash_ticks = state.high_score_flash_ticks.saturating_sub(1);

    let mut burrowed = Vec::new();
    for mole in &mut state.moles {
        if mole.update_timers() {
            burrowed.push(mole.id);
        }
    }
    for id in burrowed {
        state.push_event(GameEvent::MoleBurrowed { id });
    }
    state.moles.retain(|m| !m.is_finished());

    for powerup in &mut state.powerups {
        powerup.update_timers();
    }
}

/// Active moles touching the dog hurt it, at most once per cooldown
fn mole_contact(state: &mut GameState) {
    if state.damage_cooldown_ticks > 0 {
        return;
    }

    let player = state.player.body;
    let damage = state
        .moles
        .iter()
        .find(|m| m.is_active() && overlaps(player.pos, player.size, m.body.pos, m.body.size))
        .map(|m| m.damage());

    let Some(damage) = damage else {
        return;
    };

    state.health = (state.health - damage).clamp(0.0, MAX_HEALTH);
    state.damage_cooldown_ticks = ticks_from_ms(DAMAGE_COOLDOWN_MS);
    state.player.hurt_ticks = ticks_from_ms(HURT_TINT_MS);
    state.push_event(GameEvent::PlayerHurt {
        health: state.health,
    });
    state.push_event(GameEvent::CameraShake {
        duration_ms: 100,
        intensity: 0.01,
    });

    if state.health <= 0.0 {
        game_over(state);
    }
}

/// Pick up every collectable power-up the dog touches
fn collect_powerups(state: &mut GameState) {
    let player = state.player.body;
    let mut collected = Vec::new();
    state.powerups.retain(|p| {
        let pos = p.display_pos();
        if !p.is_spawning() && overlaps(player.pos, player.size, pos, p.body.size) {
            collected.push((p.id, p.kind, pos));
            false
        } else {
            true
        }
    });

    for (id, kind, pos) in collected {
        state.add_score(SCORE_PICKUP, Some(pos - Vec2::new(0.0, 20.0)));
        state.emit_particles(
            pos,
            Burst {
                count: 10,
                speed: (0.0, 100.0),
                angle: (0.0, 360.0),
                gravity: 0.0,
                lifespan_ms: 500,
                size: 4.0,
                colors: &[0xffffff],
                additive: true,
            },
        );
        state.push_event(GameEvent::PowerUpCollected { id, kind });
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.player.halt();
    state.push_event(GameEvent::GameOver { score: state.score });
    log::info!(
        "Game over: score {}, high score {}",
        state.score,
        state.high_score
    );
}

fn update_visuals(state: &mut GameState, dt: f32) {
    for particle in &mut state.particles {
        particle.vel.y += particle.gravity * dt;
        particle.pos += particle.vel * dt;
        particle.life -= particle.fade * dt;
    }
    state.particles.retain(|p| p.life > 0.0);

    for popup in &mut state.popups {
        popup.age_ticks += 1;
    }
    state.popups.retain(|p| !p.is_expired());
}

/// Simple AI: chase the nearest power-up, dig every second, bark at moles
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    input.moves = MoveKeys::default();

    let me = state.player.pos();
    let next_tick = state.time_ticks + 1;

    let mole_close = state
        .moles
        .iter()
        .any(|m| m.is_active() && m.body.pos.distance(me) <= BARK_MOLE_RANGE * 0.5);
    let bark_period = ticks_from_ms(300) as u64;
    if mole_close && next_tick.is_multiple_of(bark_period) {
        input.bark = true;
    }

    let target = state
        .powerups
        .iter()
        .filter(|p| !p.is_spawning())
        .map(|p| p.display_pos())
        .min_by(|a, b| {
            a.distance(me)
                .partial_cmp(&b.distance(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(target) = target {
        let d = target - me;
        let deadzone = 4.0;
        input.moves.left = d.x < -deadzone;
        input.moves.right = d.x > deadzone;
        input.moves.up = d.y < -deadzone;
        input.moves.down = d.y > deadzone;
    }

    if next_tick.is_multiple_of(TICK_RATE as u64) {
        input.dig = true;
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::powerup::{PowerUp, PowerUpKind};
    use crate::audio::SoundEffect;
    use crate::sim::loot::LootTable;
    use crate::sim::tilemap::TileKind;

    fn quiet_state() -> GameState {
        let mut state = GameState::new(12345, 0xffffff, 0);
        state.powerups.clear();
        state
    }

    fn run(state: &mut GameState, input: &TickInput, n: u32) {
        for _ in 0..n {
            tick(state, input, SIM_DT);
        }
    }

    fn press_bark() -> TickInput {
        TickInput {
            bark: true,
            ..Default::default()
        }
    }

    fn press_dig() -> TickInput {
        TickInput {
            dig: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_dig_converts_tile_once() {
        let mut state = quiet_state();
        let tile = state
            .tiles
            .tile_at_world(state.player.dig_point())
            .unwrap();

        tick(&mut state, &press_dig(), SIM_DT);
        assert_eq!(state.tiles.get(tile), Some(TileKind::Dirt));
        assert_eq!(state.score, SCORE_DIG as u64);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Dug { .. }))
        );

        tick(&mut state, &press_dig(), SIM_DT);
        assert_eq!(state.score, SCORE_DIG as u64);
        assert_eq!(state.tiles.dirt_count(), 1);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Dug { .. }))
        );
    }

    #[test]
    fn test_dig_with_mole_cap_reached_is_plain_dig() {
        let mut state = quiet_state();
        for i in 0..MAX_MOLES {
            state
                .spawn_mole(Vec2::new(1500.0, 1000.0 + i as f32))
                .unwrap();
        }
        state.drain_events();
        state.loot_table = LootTable {
            mole: 100,
            powerup: 0,
            bone: 0,
        };

        assert_eq!(dig(&mut state), Some(Loot::Nothing));
        assert_eq!(state.score, SCORE_DIG as u64);
        assert_eq!(state.moles.len(), MAX_MOLES);
        let sounds: Vec<_> = state
            .drain_events()
            .iter()
            .filter_map(SoundEffect::for_event)
            .collect();
        assert!(sounds.contains(&SoundEffect::Dig));
    }

    #[test]
    fn test_stamina_drains_when_pushing_into_wall() {
        let mut state = quiet_state();
        let up = TickInput {
            moves: MoveKeys {
                up: true,
                ..Default::default()
            },
            ..Default::default()
        };
        run(&mut state, &up, TICK_RATE * 3);
        assert_eq!(state.player.pos().y, PLAYER_BODY.1 / 2.0);

        state.stamina = MAX_STAMINA;
        run(&mut state, &up, TICK_RATE);
        assert!((state.stamina - (MAX_STAMINA - STAMINA_DRAIN)).abs() < 0.5);
        assert!(state.player.is_moving());
    }

    #[test]
    fn test_dig_outside_world_is_ignored() {
        let mut state = quiet_state();
        // Walk into the top edge
        let up = TickInput {
            moves: MoveKeys {
                up: true,
                ..Default::default()
            },
            ..Default::default()
        };
        run(&mut state, &up, TICK_RATE * 3);
        assert_eq!(state.player.pos().y, PLAYER_BODY.1 / 2.0);
        assert_eq!(dig(&mut state), None);
        assert_eq!(state.tiles.dirt_count(), 0);
    }

    #[test]
    fn test_bark_scares_powerups_in_range() {
        let mut state = quiet_state();
        let near = Vec2::new(500.0, 300.0);
        let far = Vec2::new(700.0, 300.0);
        state.powerups.push(PowerUp::new(900, PowerUpKind::Wild, near));
        state.powerups.push(PowerUp::new(901, PowerUpKind::Wild, far));

        tick(&mut state, &press_bark(), SIM_DT);
        assert!(state.powerups[0].is_scared());
        assert!(state.powerups[0].body.vel.x > 0.0);
        assert!(!state.powerups[1].is_scared());
        assert_eq!(state.score, SCORE_SCARE as u64);
        assert!(state.player.bark_ticks > 0);

        // Barking again while it is still fleeing awards nothing
        tick(&mut state, &press_bark(), SIM_DT);
        assert_eq!(state.score, SCORE_SCARE as u64);
    }

    #[test]
    fn test_bark_kills_mole_in_three_hits() {
        let mut state = quiet_state();
        let id = state.spawn_mole(Vec2::new(600.0, 300.0)).unwrap();
        let window = ticks_from_ms(MOLE_HIT_WINDOW_MS);

        tick(&mut state, &press_bark(), SIM_DT);
        run(&mut state, &TickInput::default(), window);
        tick(&mut state, &press_bark(), SIM_DT);
        run(&mut state, &TickInput::default(), window);
        assert_eq!(state.moles[0].health, 1);
        tick(&mut state, &press_bark(), SIM_DT);

        assert!(!state.moles[0].is_active());
        assert_eq!(state.score, SCORE_MOLE as u64);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::MoleKilled { id: killed, .. } if *killed == id))
        );

        run(&mut state, &TickInput::default(), ticks_from_ms(MOLE_DEATH_MS));
        assert!(state.moles.is_empty());
    }

    #[test]
    fn test_bark_out_of_range_mole_untouched() {
        let mut state = quiet_state();
        state.spawn_mole(Vec2::new(400.0, 300.0 + BARK_MOLE_RANGE + 40.0)).unwrap();
        tick(&mut state, &press_bark(), SIM_DT);
        assert_eq!(state.moles[0].health, MOLE_HEALTH);
    }

    #[test]
    fn test_mole_burrows_and_disappears() {
        let mut state = quiet_state();
        state.spawn_mole(Vec2::new(1500.0, 1500.0)).unwrap();
        run(&mut state, &TickInput::default(), ticks_from_ms(MOLE_BURROW_MS));
        assert!(!state.moles[0].is_active());
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::MoleBurrowed { .. }))
        );
        run(
            &mut state,
            &TickInput::default(),
            ticks_from_ms(MOLE_BURROW_ANIM_MS),
        );
        assert!(state.moles.is_empty());
    }

    #[test]
    fn test_contact_damage_respects_cooldown() {
        let mut state = quiet_state();
        let pos = state.player.pos();
        state.spawn_mole(pos).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.health, MAX_HEALTH - MOLE_DAMAGE);
        assert!(state.player.hurt_ticks > 0);

        let cooldown = ticks_from_ms(DAMAGE_COOLDOWN_MS);
        run(&mut state, &TickInput::default(), cooldown - 1);
        assert_eq!(state.health, MAX_HEALTH - MOLE_DAMAGE);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.health, MAX_HEALTH - 2.0 * MOLE_DAMAGE);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut state = quiet_state();
        state.health = MOLE_DAMAGE;
        state.add_score(40, None);
        let pos = state.player.pos();
        state.spawn_mole(pos).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.health, 0.0);

        // Frozen
        let ticks = state.time_ticks;
        run(&mut state, &press_dig(), 10);
        assert_eq!(state.time_ticks, ticks);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 40);
    }

    #[test]
    fn test_pickup_and_spawn_grace() {
        let mut state = quiet_state();
        let pos = state.player.pos();
        let id = state.spawn_loot(pos, PowerUpKind::Standard);
        state.powerups.iter_mut().for_each(|p| p.body.vel = Vec2::ZERO);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.powerups.iter().any(|p| p.id == id));

        state.powerups.push(PowerUp::new(999, PowerUpKind::Wild, pos));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.powerups.iter().any(|p| p.id == 999));
        assert_eq!(state.score, SCORE_PICKUP as u64);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::PowerUpCollected { id: 999, .. }))
        );
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = quiet_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;
        run(&mut state, &TickInput::default(), 5);
        assert_eq!(state.time_ticks, ticks);
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_stamina_drains_and_recovers() {
        let mut state = quiet_state();
        let walk = TickInput {
            moves: MoveKeys {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        run(&mut state, &walk, TICK_RATE);
        assert!((state.stamina - (MAX_STAMINA - STAMINA_DRAIN)).abs() < 0.1);
        run(&mut state, &TickInput::default(), TICK_RATE);
        assert_eq!(state.stamina, MAX_STAMINA);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, 0xffffff, 0);
        let mut state2 = GameState::new(99999, 0xffffff, 0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        run(&mut state1, &input, TICK_RATE * 20);
        run(&mut state2, &input, TICK_RATE * 20);

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.tiles.dirt_count(), state2.tiles.dirt_count());
        assert_eq!(state1.moles.len(), state2.moles.len());
        assert_eq!(state1.player.pos(), state2.player.pos());
        assert!(state1.tiles.dirt_count() > 0);
    }
}
