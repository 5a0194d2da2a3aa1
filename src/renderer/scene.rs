//! Scene assembly
//!
//! Turns the game state into screen-space triangles, split into the three
//! layers the pipeline draws in order.

use glam::Vec2;

use super::shapes::{circle, modulate, rect, rect_outline, ring, rotated_rect, with_alpha};
use super::vertex::{Vertex, colors};
use crate::camera::{Camera, Minimap};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::powerup::spin_angle;
use crate::sim::{Direction, GamePhase, GameState, Mole, MoleState, PowerUp, TileMap};
use crate::{ticks_from_ms, tint_to_rgba};

/// One frame's worth of geometry
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub clear: [f32; 4],
    /// Alpha-blended world geometry
    pub world: Vec<Vertex>,
    /// Additively blended effects
    pub additive: Vec<Vertex>,
    /// Screen-fixed geometry drawn last (minimap, debug, dimming)
    pub overlay: Vec<Vertex>,
}

/// Text drawn by the DOM layer on top of the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    /// Logical view position of the text center
    pub pos: Vec2,
    pub color: u32,
    pub alpha: f32,
}

/// Build the playing screen
pub fn build_game_frame(
    state: &GameState,
    camera: &Camera,
    settings: &Settings,
    minimap: &Minimap,
) -> Frame {
    let mut frame = Frame {
        clear: colors::GRASS,
        ..Default::default()
    };

    draw_ground(&mut frame.world, state, camera);

    for powerup in &state.powerups {
        draw_powerup(&mut frame.world, powerup, state.time_ticks, camera);
    }
    for mole in &state.moles {
        draw_mole(&mut frame.world, mole, camera);
    }

    let player = &state.player;
    let step = player.sprite_frame(state.time_ticks) / 4;
    let hurt = player.hurt_ticks > 0;
    draw_dog(
        &mut frame.world,
        camera.world_to_screen(player.pos()),
        1.0,
        player.facing,
        player.tint,
        step,
        hurt,
    );
    draw_bark(&mut frame.world, state, camera);

    if settings.particles {
        for p in &state.particles {
            let pos = camera.world_to_screen(p.pos);
            let color = tint_to_rgba(p.color, p.life.clamp(0.0, 1.0));
            let layer = if p.additive {
                &mut frame.additive
            } else {
                &mut frame.world
            };
            layer.extend(rect(pos, Vec2::splat(p.size * 0.5), color));
        }
    }

    if state.phase == GamePhase::GameOver {
        frame.overlay.extend(rect(
            Vec2::new(VIEW_WIDTH, VIEW_HEIGHT) * 0.5,
            Vec2::new(VIEW_WIDTH, VIEW_HEIGHT) * 0.5,
            colors::GAME_OVER_DIM,
        ));
    }

    if settings.debug_overlay {
        draw_debug(&mut frame.overlay, state, camera);
    }

    if settings.minimap {
        draw_minimap(&mut frame.overlay, state, minimap);
    }

    frame
}

/// Build the title screen with a large preview of the selected dog
pub fn build_menu_frame(tint: u32, time_secs: f32) -> Frame {
    let mut frame = Frame {
        clear: colors::MENU_BACKGROUND,
        ..Default::default()
    };
    let center = Vec2::new(VIEW_WIDTH, VIEW_HEIGHT) * 0.5;
    let step = (time_secs * 4.0) as u32;
    draw_dog(&mut frame.world, center, 2.0, Direction::Down, tint, step, false);
    frame
}

/// Pop-ups and the bark bubble, in view coordinates
pub fn text_labels(state: &GameState, camera: &Camera) -> Vec<TextLabel> {
    let mut labels: Vec<TextLabel> = state
        .popups
        .iter()
        .map(|p| TextLabel {
            text: p.text.clone(),
            pos: camera.world_to_screen(p.pos()),
            color: p.color,
            alpha: p.alpha(),
        })
        .collect();

    if state.player.bark_ticks > 0 {
        labels.push(TextLabel {
            text: "Woof!".to_string(),
            pos: camera.world_to_screen(state.player.pos() - Vec2::new(0.0, 40.0)),
            color: 0x000000,
            alpha: 1.0,
        });
    }

    labels
}

fn draw_ground(out: &mut Vec<Vertex>, state: &GameState, camera: &Camera) {
    let origin = camera.view_origin();
    let half = Vec2::splat(TILE_SIZE * 0.5);

    // Checkered grass for a sense of motion
    let first = (origin / TILE_SIZE).floor().max(Vec2::ZERO);
    let last = ((origin + camera.view) / TILE_SIZE).ceil();
    let (x0, y0) = (first.x as u32, first.y as u32);
    let (x1, y1) = (
        (last.x as u32).min(state.tiles.width()),
        (last.y as u32).min(state.tiles.height()),
    );
    for y in y0..y1 {
        for x in x0..x1 {
            if (x + y) % 2 == 0 {
                continue;
            }
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * TILE_SIZE;
            out.extend(rect(
                camera.world_to_screen(center),
                half,
                colors::GRASS_DARK,
            ));
        }
    }

    for coord in state.tiles.dirt_tiles() {
        let center = TileMap::tile_center(coord);
        if !camera.is_visible(center, half) {
            continue;
        }
        let screen = camera.world_to_screen(center);
        out.extend(rect(screen, half, colors::DIRT_EDGE));
        out.extend(rect(screen, half - Vec2::splat(3.0), colors::DIRT));
    }
}

fn draw_powerup(out: &mut Vec<Vertex>, powerup: &PowerUp, time_ticks: u64, camera: &Camera) {
    let half = powerup.body.half_size();
    let pos = powerup.display_pos();
    if !camera.is_visible(pos, half) {
        return;
    }

    let screen = camera.world_to_screen(pos);
    let color = match powerup.kind.tint() {
        Some(tint) => tint_to_rgba(tint, 1.0),
        None => colors::WILD_POWERUP,
    };
    let alpha = if powerup.is_spawning() { 0.7 } else { 1.0 };

    // Shadow stays on the ground while the item bobs
    out.extend(circle(
        camera.world_to_screen(powerup.body.pos + Vec2::new(0.0, half.y)),
        half.x * 0.6,
        colors::SHADOW,
        12,
    ));
    out.extend(rotated_rect(
        screen,
        half * 0.7,
        spin_angle(time_ticks),
        with_alpha(color, alpha),
    ));
}

fn draw_mole(out: &mut Vec<Vertex>, mole: &Mole, camera: &Camera) {
    let (scale, alpha) = match mole.state {
        MoleState::Active { .. } => (1.0, 1.0),
        MoleState::Burrowing { ticks } => {
            let t = ticks as f32 / ticks_from_ms(MOLE_BURROW_ANIM_MS).max(1) as f32;
            (t, 1.0)
        }
        MoleState::Dying { ticks } => {
            let t = ticks as f32 / ticks_from_ms(MOLE_DEATH_MS).max(1) as f32;
            (0.5 + 0.5 * t, t)
        }
    };

    let half = mole.body.half_size() * scale;
    if !camera.is_visible(mole.body.pos, half) {
        return;
    }

    let screen = camera.world_to_screen(mole.body.pos);
    let body = if mole.hit_ticks > 0 {
        colors::HURT
    } else {
        colors::MOLE
    };
    out.extend(circle(screen, half.x, with_alpha(body, alpha), 16));

    let side = if mole.facing_right { 1.0 } else { -1.0 };
    out.extend(circle(
        screen + Vec2::new(side * half.x * 0.8, 0.0),
        half.x * 0.3,
        with_alpha(colors::MOLE_SNOUT, alpha),
        8,
    ));
}

fn draw_dog(
    out: &mut Vec<Vertex>,
    center: Vec2,
    scale: f32,
    facing: Direction,
    tint: u32,
    step: u32,
    hurt: bool,
) {
    let fur = if hurt {
        colors::HURT
    } else {
        tint_to_rgba(tint, 1.0)
    };
    // Two-pixel hop while walking
    let hop = if step % 2 == 1 { -2.0 * scale } else { 0.0 };
    let center = center + Vec2::new(0.0, hop);
    let dir = facing.unit();

    out.extend(circle(
        center + Vec2::new(0.0, 10.0 * scale),
        12.0 * scale,
        colors::SHADOW,
        12,
    ));

    // Body is long along the walking axis
    let body_half = scale
        * if dir.x != 0.0 {
            Vec2::new(14.0, 9.0)
        } else {
            Vec2::new(9.0, 12.0)
        };
    out.extend(rect(center, body_half, modulate(fur, [0.85, 0.85, 0.85, 1.0])));

    let head = center + dir * 10.0 * scale + Vec2::new(0.0, -4.0 * scale);
    out.extend(circle(head, 8.0 * scale, fur, 16));

    let ear_offset = Vec2::new(6.0, -6.0) * scale;
    for ear in [
        head + ear_offset,
        head + Vec2::new(-ear_offset.x, ear_offset.y),
    ] {
        out.extend(rect(ear, Vec2::new(2.5, 3.5) * scale, colors::DOG_EAR));
    }

    if facing != Direction::Up {
        out.extend(circle(
            head + dir * 6.0 * scale + Vec2::new(0.0, 2.0 * scale),
            2.0 * scale,
            colors::DOG_NOSE,
            8,
        ));
    }
}

fn draw_bark(out: &mut Vec<Vertex>, state: &GameState, camera: &Camera) {
    let player = &state.player;
    if player.bark_ticks == 0 {
        return;
    }

    let total = ticks_from_ms(BARK_BUBBLE_MS).max(1) as f32;
    let progress = 1.0 - player.bark_ticks as f32 / total;
    let screen = camera.world_to_screen(player.pos());

    // Shock wave reaches bark range in the first third of the bubble
    let wave = (progress * 3.0).min(1.0);
    if wave < 1.0 {
        let radius = BARK_RANGE * wave;
        out.extend(ring(
            screen,
            (radius - 3.0).max(0.0),
            radius,
            with_alpha(colors::BARK_RING, 1.0 - wave),
            32,
        ));
    }

    out.extend(circle(
        screen - Vec2::new(0.0, 40.0),
        18.0,
        colors::BUBBLE,
        16,
    ));
}

fn draw_debug(out: &mut Vec<Vertex>, state: &GameState, camera: &Camera) {
    let player = &state.player;
    out.extend(rect_outline(
        camera.world_to_screen(player.body.pos),
        player.body.half_size(),
        1.0,
        colors::DEBUG_HITBOX,
    ));
    out.extend(circle(
        camera.world_to_screen(player.dig_point()),
        5.0,
        colors::DEBUG_DIG_POINT,
        12,
    ));
}

fn draw_minimap(out: &mut Vec<Vertex>, state: &GameState, minimap: &Minimap) {
    let half = minimap.size * 0.5;
    let center = minimap.origin + half;
    out.extend(rect(center, half, tint_to_rgba(minimap.background, 1.0)));

    let follow = state.player.pos();
    for powerup in &state.powerups {
        if let Some(p) = minimap.project(powerup.display_pos(), follow) {
            out.extend(rect(p, Vec2::splat(2.0), colors::MINIMAP_POWERUP));
        }
    }
    if let Some(p) = minimap.project(follow, follow) {
        out.extend(rect(p, Vec2::splat(3.0), colors::MINIMAP_PLAYER));
    }

    out.extend(rect_outline(center, half, 1.0, colors::MINIMAP_BORDER));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GameState, Camera) {
        let state = GameState::new(3, 0xffffff, 0);
        let mut camera = Camera::default();
        camera.follow(state.player.pos());
        (state, camera)
    }

    #[test]
    fn test_game_frame_has_world_and_minimap() {
        let (state, camera) = setup();
        let settings = Settings::default();
        let frame = build_game_frame(&state, &camera, &settings, &Minimap::default());
        assert_eq!(frame.clear, colors::GRASS);
        assert!(!frame.world.is_empty());
        assert!(!frame.overlay.is_empty());
        assert_eq!(frame.world.len() % 3, 0);
        assert_eq!(frame.overlay.len() % 3, 0);
    }

    #[test]
    fn test_minimap_toggle() {
        let (state, camera) = setup();
        let settings = Settings {
            minimap: false,
            ..Default::default()
        };
        let frame = build_game_frame(&state, &camera, &settings, &Minimap::default());
        assert!(frame.overlay.is_empty());
    }

    #[test]
    fn test_dug_tile_adds_geometry() {
        let (mut state, camera) = setup();
        let settings = Settings {
            minimap: false,
            ..Default::default()
        };
        let before = build_game_frame(&state, &camera, &settings, &Minimap::default());
        let coord = state.tiles.tile_at_world(state.player.pos()).unwrap();
        state.tiles.dig(coord);
        let after = build_game_frame(&state, &camera, &settings, &Minimap::default());
        assert_eq!(after.world.len(), before.world.len() + 12);
    }

    #[test]
    fn test_text_labels_include_popups_and_bark() {
        let (mut state, camera) = setup();
        state.popup("+10", state.player.pos(), 0xffff00);
        state.player.bark_ticks = 10;
        let labels = text_labels(&state, &camera);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "+10");
        assert_eq!(labels[0].pos, Vec2::new(400.0, 300.0));
        assert_eq!(labels[1].text, "Woof!");
    }

    #[test]
    fn test_menu_frame_shows_dog() {
        let frame = build_menu_frame(0xffd700, 0.0);
        assert_eq!(frame.clear, colors::MENU_BACKGROUND);
        assert!(!frame.world.is_empty());
        assert!(frame.overlay.is_empty());
    }
}
