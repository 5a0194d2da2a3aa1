//! Follow camera, screen shake and the minimap projection
//!
//! All positions are in world pixels with y growing downward. Screen
//! positions are logical view pixels (800x600), see [`crate::consts`].

use glam::Vec2;

use crate::consts::{VIEW_HEIGHT, VIEW_WIDTH, WORLD_HEIGHT, WORLD_WIDTH};

/// An active shake effect
#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    remaining_ms: f32,
    /// Fraction of the viewport size
    intensity: f32,
}

/// A camera that follows a target inside the world bounds
#[derive(Debug, Clone)]
pub struct Camera {
    /// World position of the viewport's top-left corner
    pub scroll: Vec2,
    /// Viewport size in world pixels
    pub view: Vec2,
    /// World size the scroll is clamped to
    pub world: Vec2,
    shake: Option<Shake>,
    shake_offset: Vec2,
    shake_clock: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        )
    }
}

impl Camera {
    pub fn new(view: Vec2, world: Vec2) -> Self {
        Self {
            scroll: Vec2::ZERO,
            view,
            world,
            shake: None,
            shake_offset: Vec2::ZERO,
            shake_clock: 0.0,
        }
    }

    /// Center on `target`, keeping the view inside the world
    pub fn follow(&mut self, target: Vec2) {
        let max_scroll = (self.world - self.view).max(Vec2::ZERO);
        self.scroll = (target - self.view * 0.5).clamp(Vec2::ZERO, max_scroll);
    }

    /// Start a shake. A stronger or longer shake replaces a running one.
    pub fn shake(&mut self, duration_ms: u32, intensity: f32) {
        let incoming = Shake {
            remaining_ms: duration_ms as f32,
            intensity,
        };
        self.shake = match self.shake {
            Some(current)
                if current.intensity >= incoming.intensity
                    && current.remaining_ms >= incoming.remaining_ms =>
            {
                Some(current)
            }
            _ => Some(incoming),
        };
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    /// Advance the shake effect by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.shake_clock += dt;
        let Some(shake) = self.shake.as_mut() else {
            self.shake_offset = Vec2::ZERO;
            return;
        };

        shake.remaining_ms -= dt * 1000.0;
        if shake.remaining_ms <= 0.0 {
            self.shake = None;
            self.shake_offset = Vec2::ZERO;
            return;
        }

        // Cheap deterministic jitter
        let t = self.shake_clock * 60.0;
        let jitter = Vec2::new((t * 12.9898).sin(), (t * 78.233).cos());
        self.shake_offset = jitter * self.view * shake.intensity;
    }

    /// Effective top-left including shake
    pub fn view_origin(&self) -> Vec2 {
        self.scroll + self.shake_offset
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.view_origin()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.view_origin()
    }

    /// Whether a world-space box is at least partly on screen
    pub fn is_visible(&self, center: Vec2, half: Vec2) -> bool {
        let min = self.view_origin();
        let max = min + self.view;
        center.x + half.x >= min.x
            && center.x - half.x <= max.x
            && center.y + half.y >= min.y
            && center.y - half.y <= max.y
    }
}

/// A zoomed-out picture-in-picture view of the world
#[derive(Debug, Clone, Copy)]
pub struct Minimap {
    /// Screen position of the top-left corner
    pub origin: Vec2,
    /// Screen size of the minimap
    pub size: Vec2,
    pub zoom: f32,
    pub background: u32,
}

impl Default for Minimap {
    fn default() -> Self {
        Self {
            origin: Vec2::new(10.0, 10.0),
            size: Vec2::new(200.0, 150.0),
            zoom: 0.1,
            background: 0x002244,
        }
    }
}

impl Minimap {
    /// World top-left shown when following `target`
    pub fn scroll_for(&self, target: Vec2) -> Vec2 {
        let view = self.size / self.zoom;
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        let max_scroll = (world - view).max(Vec2::ZERO);
        (target - view * 0.5).clamp(Vec2::ZERO, max_scroll)
    }

    /// Project a world position onto the minimap, `None` if it falls outside
    pub fn project(&self, world: Vec2, follow: Vec2) -> Option<Vec2> {
        let p = self.origin + (world - self.scroll_for(follow)) * self.zoom;
        let max = self.origin + self.size;
        (p.x >= self.origin.x && p.y >= self.origin.y && p.x <= max.x && p.y <= max.y)
            .then_some(p)
    }
}
