//! HUD overlay model
//!
//! Everything the DOM overlay shows, computed from the game state so the
//! browser side only copies strings and widths into elements.

use crate::consts::{MAX_HEALTH, MAX_STAMINA};
use crate::sim::{GamePhase, GameState};

/// Normal high-score label color
pub const HIGH_SCORE_COLOR: &str = "#ffcc00";
/// High-score label color while a new record flashes
pub const HIGH_SCORE_FLASH_COLOR: &str = "#00ff00";

/// Snapshot of the overlay for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    /// Health bar fill (0.0 - 1.0)
    pub health_fraction: f32,
    pub health_label: String,
    /// Stamina bar fill (0.0 - 1.0)
    pub stamina_fraction: f32,
    pub stamina_label: String,
    pub score_label: String,
    pub high_score_label: String,
    pub high_score_color: &'static str,
    pub paused: bool,
    pub game_over: bool,
    /// Final score line on the game-over panel
    pub final_score_label: String,
}

impl HudModel {
    pub fn from_state(state: &GameState) -> Self {
        let health_fraction = (state.health / MAX_HEALTH).clamp(0.0, 1.0);
        let stamina_fraction = (state.stamina / MAX_STAMINA).clamp(0.0, 1.0);

        Self {
            health_fraction,
            health_label: format!("Health: {}%", percent(health_fraction)),
            stamina_fraction,
            stamina_label: format!("Stamina: {}%", percent(stamina_fraction)),
            score_label: format!("Score: {}", state.score),
            high_score_label: format!("High Score: {}", state.high_score),
            high_score_color: if state.is_new_high_score_flashing() {
                HIGH_SCORE_FLASH_COLOR
            } else {
                HIGH_SCORE_COLOR
            },
            paused: state.phase == GamePhase::Paused,
            game_over: state.phase == GamePhase::GameOver,
            final_score_label: format!("Final Score: {}", state.score),
        }
    }

    /// CSS width for a bar fill
    pub fn bar_width(fraction: f32) -> String {
        format!("{}%", percent(fraction))
    }
}

fn percent(fraction: f32) -> u32 {
    (fraction * 100.0).round() as u32
}

/// Class attribute with `token` added or removed, other classes untouched
pub fn toggle_class(classes: &str, token: &str, on: bool) -> String {
    let mut kept: Vec<&str> = classes
        .split_whitespace()
        .filter(|class| *class != token)
        .collect();
    if on {
        kept.push(token);
    }
    kept.join(" ")
}
