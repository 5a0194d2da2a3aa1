//! WebGPU rendering module
//!
//! Flat-colored triangle lists, rebuilt from the game state every frame.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Frame, TextLabel, build_game_frame, build_menu_frame, text_labels};
