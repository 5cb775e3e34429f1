//! Audio cues via the Web Audio API
//!
//! Every cue is synthesized from oscillators, so there are no sample
//! files to load. The sound toggle lives on the manager itself and is
//! checked on every `play`; native builds get a silent stub.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Heart caught in the minigame
    HeartCatch,
    /// Bomb hit
    Explosion,
    /// Minigame started
    GameStart,
    /// Generic UI tap / continue button
    Click,
    /// Title corruption kicking in
    Glitch,
    /// Terminal rejected a command
    TerminalError,
    /// Flight mode upgrade on the slide track
    Magic,
    /// Star lit; pitch rises with the star index
    StarChime { index: usize },
    /// Constellation finished - ascending arpeggio
    SuccessArpeggio,
}

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundCue;

    /// Audio manager; owns the context and the enabled toggle
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        enabled: bool,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                enabled: true,
                volume: 0.7,
            }
        }

        pub fn enabled(&self) -> bool {
            self.enabled
        }

        pub fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        /// Resume the context after a user gesture
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a cue; silent when the toggle is off
        pub fn play(&self, cue: SoundCue) {
            if !self.enabled {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.volume;
            match cue {
                SoundCue::HeartCatch => self.play_heart(ctx, vol),
                SoundCue::Explosion => self.play_explosion(ctx, vol),
                SoundCue::GameStart => self.play_start(ctx, vol),
                SoundCue::Click => self.play_click(ctx, vol),
                SoundCue::Glitch => self.play_glitch(ctx, vol),
                SoundCue::TerminalError => self.play_terminal_error(ctx, vol),
                SoundCue::Magic => self.play_magic(ctx, vol),
                SoundCue::StarChime { index } => self.play_star_chime(ctx, vol, index),
                SoundCue::SuccessArpeggio => self.play_arpeggio(ctx, vol),
            }
        }

        /// Oscillator routed through a gain envelope to the destination
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

        /// Short bright blip
        fn play_heart(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Low boom with a crack on top
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency().set_value_at_time(200.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.12).ok();
            }
        }

        /// Confident square pulse
        fn play_start(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(660.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        fn play_click(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        /// Harsh low buzz for the title corruption
        fn play_glitch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency().set_value_at_time(180.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(80.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(160.0, t + 0.15).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        fn play_terminal_error(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// Shimmering riser for the flight upgrade
        fn play_magic(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.35)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.45).ok();
        }

        /// Pitch climbs with the star index
        fn play_star_chime(&self, ctx: &AudioContext, vol: f32, index: usize) {
            let freq = 800.0 + index as f32 * 100.0;
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// C-E-G-C, the last note held longer
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32) {
            for (i, (freq, dur)) in [(523.0, 0.2), (659.0, 0.2), (784.0, 0.2), (1047.0, 0.4)]
                .iter()
                .enumerate()
            {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + dur)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + dur + 0.05).ok();
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

/// Silent stand-in for native builds and tests
#[cfg(not(target_arch = "wasm32"))]
pub struct AudioManager {
    enabled: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn resume(&self) {}

    pub fn play(&self, cue: SoundCue) {
        if self.enabled {
            log::trace!("sound cue {cue:?} (no-op off-web)");
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_gates_playback() {
        let mut audio = AudioManager::new();
        assert!(audio.enabled());
        audio.set_enabled(false);
        assert!(!audio.enabled());
        // disabled play must be a silent no-op
        audio.play(SoundCue::HeartCatch);
        audio.play(SoundCue::StarChime { index: 4 });
    }
}
