//! Scene flow and dog selection
//!
//! `Loading -> MainMenu -> Playing`. The playing screen owns the
//! simulation; the earlier screens only pick the dog.

use std::fmt;

use crate::sim::GameState;

/// Tints offered on the main menu: white, brown, gray, gold
pub const DOG_TINTS: [u32; 4] = [0xffffff, 0x8b4513, 0x808080, 0xffd700];

const TINT_NAMES: [&str; 4] = ["White", "Brown", "Gray", "Gold"];

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Preparing GPU and audio
    Loading,
    /// Title and dog selection
    MainMenu,
    /// A run is in progress (including paused and game over)
    Playing,
}

/// Why the game could not finish loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A required DOM element is missing
    MissingElement(&'static str),
    /// WebGPU surface or adapter could not be created
    Gpu(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::MissingElement(id) => write!(f, "missing page element #{id}"),
            LoadError::Gpu(reason) => write!(f, "graphics unavailable: {reason}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Dog selection on the title screen
#[derive(Debug, Clone, Default)]
pub struct MainMenu {
    tint_index: usize,
}

impl MainMenu {
    pub fn selected_tint(&self) -> u32 {
        DOG_TINTS[self.tint_index]
    }

    pub fn tint_name(&self) -> &'static str {
        TINT_NAMES[self.tint_index]
    }

    /// Advance to the next tint, wrapping around
    pub fn cycle_tint(&mut self) -> u32 {
        self.tint_index = (self.tint_index + 1) % DOG_TINTS.len();
        self.selected_tint()
    }
}

/// Screen state machine
#[derive(Debug, Clone)]
pub struct SceneFlow {
    pub screen: Screen,
    pub menu: MainMenu,
    /// Shown instead of the menu when loading failed
    pub error: Option<String>,
}

impl Default for SceneFlow {
    fn default() -> Self {
        Self {
            screen: Screen::Loading,
            menu: MainMenu::default(),
            error: None,
        }
    }
}

impl SceneFlow {
    /// Leave the loading screen. On failure the error stays on screen.
    pub fn finish_loading(&mut self, result: Result<(), LoadError>) {
        if self.screen != Screen::Loading {
            return;
        }
        match result {
            Ok(()) => {
                self.screen = Screen::MainMenu;
                log::info!("Assets ready, showing main menu");
            }
            Err(err) => {
                log::error!("Loading failed: {}", err);
                self.error = Some(format!("ERROR: {err}"));
            }
        }
    }

    /// Start a run with the selected dog. Only valid from the main menu.
    pub fn start_game(&mut self, seed: u64, high_score: u64) -> Option<GameState> {
        if self.screen != Screen::MainMenu {
            return None;
        }
        self.screen = Screen::Playing;
        log::info!(
            "Starting run with {} dog (seed {})",
            self.menu.tint_name(),
            seed
        );
        Some(GameState::new(seed, self.menu.selected_tint(), high_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_cycles_and_wraps() {
        let mut menu = MainMenu::default();
        assert_eq!(menu.selected_tint(), 0xffffff);
        assert_eq!(menu.cycle_tint(), 0x8b4513);
        assert_eq!(menu.cycle_tint(), 0x808080);
        assert_eq!(menu.cycle_tint(), 0xffd700);
        assert_eq!(menu.tint_name(), "Gold");
        assert_eq!(menu.cycle_tint(), 0xffffff);
    }

    #[test]
    fn test_flow_to_playing() {
        let mut flow = SceneFlow::default();
        assert!(flow.start_game(1, 0).is_none());

        flow.finish_loading(Ok(()));
        assert_eq!(flow.screen, Screen::MainMenu);

        flow.menu.cycle_tint();
        let state = flow.start_game(9, 120).unwrap();
        assert_eq!(flow.screen, Screen::Playing);
        assert_eq!(state.player.tint, 0x8b4513);
        assert_eq!(state.high_score, 120);
        assert!(flow.start_game(9, 120).is_none());
    }

    #[test]
    fn test_load_failure_stays_on_loading() {
        let mut flow = SceneFlow::default();
        flow.finish_loading(Err(LoadError::Gpu("no adapter".into())));
        assert_eq!(flow.screen, Screen::Loading);
        assert_eq!(
            flow.error.as_deref(),
            Some("ERROR: graphics unavailable: no adapter")
        );
    }
}
