//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no asset files. The event mapping
//! is platform independent; playback only exists in the browser.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::{GameEvent, Loot};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Dog barks
    Bark,
    /// A tile turns to dirt
    Dig,
    /// A mole pops out of the ground
    MoleSpawn,
    /// Bark hits a mole
    MoleHit,
    /// Mole defeated
    MoleDeath,
    /// Power-up collected
    Pickup,
    /// Mole bites the dog
    PlayerHurt,
    /// Previous best beaten
    HighScore,
    /// Health ran out
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Barked { .. } => Some(SoundEffect::Bark),
            // A mole spawn has its own sound
            GameEvent::Dug {
                loot: Loot::Mole, ..
            } => None,
            GameEvent::Dug { .. } => Some(SoundEffect::Dig),
            GameEvent::MoleSpawned { .. } => Some(SoundEffect::MoleSpawn),
            GameEvent::MoleHit { .. } => Some(SoundEffect::MoleHit),
            GameEvent::MoleKilled { .. } => Some(SoundEffect::MoleDeath),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::Pickup),
            GameEvent::PlayerHurt { .. } => Some(SoundEffect::PlayerHurt),
            GameEvent::NewHighScore { .. } => Some(SoundEffect::HighScore),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::MoleBurrowed { .. }
            | GameEvent::PowerUpScared { .. }
            | GameEvent::CameraShake { .. }
            | GameEvent::Restarted => None,
        }
    }
}

/// Audio manager for the game
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.ctx.is_some()
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Take volumes from settings
    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the sound for an event, if any
    pub fn play_event(&self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Bark => self.play_bark(ctx, vol),
            SoundEffect::Dig => self.play_dig(ctx, vol),
            SoundEffect::MoleSpawn => self.play_mole_spawn(ctx, vol),
            SoundEffect::MoleHit => self.play_mole_hit(ctx, vol),
            SoundEffect::MoleDeath => self.play_mole_death(ctx, vol),
            SoundEffect::Pickup => self.play_pickup(ctx, vol),
            SoundEffect::PlayerHurt => self.play_player_hurt(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Bark - two gruff yips
    fn play_bark(&self, ctx: &AudioContext, vol: f32) {
        for i in 0..2 {
            let Some((osc, gain)) = self.create_osc(ctx, 420.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time() + i as f64 * 0.12;

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.09)
                .ok();
            osc.frequency().set_value_at_time(420.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(180.0, t + 0.09)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }

    /// Dig - soft scrape
    fn play_dig(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(120.0, t).ok();
        osc.frequency().set_value_at_time(90.0, t + 0.04).ok();
        osc.frequency().set_value_at_time(140.0, t + 0.08).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Mole spawn - rising pop out of the ground
    fn play_mole_spawn(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(500.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Mole hit - short squeak
    fn play_mole_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1300.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Mole death - descending squeal with a thump
    fn play_mole_death(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 1000.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(1000.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(150.0, t + 0.35)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Pickup collect - happy ding
    fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Player hurt - low buzz
    fn play_player_hurt(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(110.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(55.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// High score - celebratory
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PowerUpKind, TileCoord};
    use glam::Vec2;

    #[test]
    fn test_event_sounds() {
        let tile = TileCoord { x: 1, y: 1 };
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Barked { pos: Vec2::ZERO }),
            Some(SoundEffect::Bark)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Dug {
                tile,
                loot: Loot::Nothing
            }),
            Some(SoundEffect::Dig)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Dug {
                tile,
                loot: Loot::Mole
            }),
            None
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerUpCollected {
                id: 3,
                kind: PowerUpKind::Bone
            }),
            Some(SoundEffect::Pickup)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Restarted), None);
    }
}
