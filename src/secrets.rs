//! Hidden interactions: the boundary breaker, the title glitch and its
//! terminal, and the long-press polaroid reveal.
//!
//! All of these are plain state machines fed timestamps or `dt` by the
//! shell, so each trigger condition stays testable on its own.

use crate::consts::FIELD_MAX;
use crate::sequencer::FINAL_STEP;

/// How close together opposite-edge pushes must land to chain
const BOUNDARY_WINDOW_MS: f64 = 1500.0;
const BOUNDARY_ATTEMPTS_TO_UNLOCK: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeSide {
    Left,
    Right,
}

/// Detects a player deliberately slamming the rocket against alternating
/// field edges. Five quick direction changes at the edges unlock free
/// movement beyond the field.
#[derive(Debug, Clone, Default)]
pub struct BoundaryBreaker {
    attempts: u32,
    unlocked: bool,
    last_side: Option<EdgeSide>,
    last_edge_ms: f64,
}

impl BoundaryBreaker {
    pub fn new(already_unlocked: bool) -> Self {
        Self {
            unlocked: already_unlocked,
            ..Self::default()
        }
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Feed a raw pointer position in field percent. Returns true on the
    /// sample that unlocks, so the shell can show the reveal modal and
    /// persist the flag once.
    pub fn observe(&mut self, x: f32, now_ms: f64) -> bool {
        let side = if x <= 0.0 {
            EdgeSide::Left
        } else if x >= FIELD_MAX {
            EdgeSide::Right
        } else {
            return false;
        };

        let mut just_unlocked = false;
        if let Some(last) = self.last_side
            && last != side
            && now_ms - self.last_edge_ms < BOUNDARY_WINDOW_MS
        {
            self.attempts += 1;
            if self.attempts >= BOUNDARY_ATTEMPTS_TO_UNLOCK && !self.unlocked {
                self.unlocked = true;
                just_unlocked = true;
                log::info!("boundary breaker unlocked after {} attempts", self.attempts);
            }
        }
        self.last_side = Some(side);
        self.last_edge_ms = now_ms;
        just_unlocked
    }
}

/// Outcome of clicking the glitched title area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleClick {
    /// Counted toward activation, nothing visible yet
    Counted,
    /// This click tipped the title into glitch mode
    GlitchActivated,
    /// Glitch mode was already live; open the terminal
    OpenTerminal,
}

const GLITCH_CLICKS: u32 = 5;

/// Five clicks on the finale title corrupt it; once corrupted, any further
/// click opens the hidden terminal.
#[derive(Debug, Clone, Default)]
pub struct GlitchTitle {
    clicks: u32,
    glitched: bool,
}

impl GlitchTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glitched(&self) -> bool {
        self.glitched
    }

    pub fn click(&mut self) -> TitleClick {
        if self.glitched {
            return TitleClick::OpenTerminal;
        }
        self.clicks += 1;
        if self.clicks >= GLITCH_CLICKS {
            self.glitched = true;
            TitleClick::GlitchActivated
        } else {
            TitleClick::Counted
        }
    }
}

/// Parsed terminal command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// `surpresa`: close the terminal and show the surprise
    Surprise,
    /// `level N`: jump straight to a scene step
    Jump { step: usize },
    /// `help` / `ajuda`: echo the command list
    Help,
    /// Anything else, including out-of-range levels
    Unknown,
}

/// Help text echoed into the input field
pub const TERMINAL_HELP: &str = "Comandos: surpresa, level [1-6], help";

/// Scene step each `level N` target lands on
const LEVEL_STEPS: [usize; 6] = [0, 2, 4, 6, 8, FINAL_STEP];

/// Parse a line typed into the hidden terminal. Input is lowercased and
/// trimmed before matching.
pub fn parse_terminal_command(input: &str) -> TerminalCommand {
    let clean = input.trim().to_lowercase();
    if clean == "surpresa" {
        return TerminalCommand::Surprise;
    }
    if clean == "help" || clean == "ajuda" {
        return TerminalCommand::Help;
    }
    if let Some(rest) = clean.strip_prefix("level ") {
        if let Ok(n) = rest.trim().parse::<usize>()
            && (1..=LEVEL_STEPS.len()).contains(&n)
        {
            return TerminalCommand::Jump {
                step: LEVEL_STEPS[n - 1],
            };
        }
        return TerminalCommand::Unknown;
    }
    TerminalCommand::Unknown
}

/// Hold time before the heartbeat starts
const PRESS_ARM_MS: f32 = 3000.0;
/// Heartbeat runs this long before the polaroid flashes in
const HEARTBEAT_TO_REVEAL_MS: f32 = 1800.0;
const HEARTBEAT_START_INTERVAL_MS: f32 = 900.0;
const HEARTBEAT_ACCEL_MS: f32 = 60.0;
const HEARTBEAT_FLOOR_MS: f32 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressPhase {
    Idle,
    Holding,
    Heartbeat,
    Revealed,
}

/// Events the shell turns into vibration and the flash/polaroid swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongPressEvent {
    /// Hold time crossed the arm threshold, heartbeat begins
    Armed,
    /// One heartbeat thump; the first is stronger than the rest
    Pulse { strong: bool },
    /// Screen flash plus the secret polaroid
    Reveal,
}

/// Press-and-hold on the finale photo. Three seconds of holding arms an
/// accelerating heartbeat; surviving the heartbeat reveals the hidden
/// polaroid. Letting go at any point before the reveal resets everything.
#[derive(Debug, Clone)]
pub struct LongPressReveal {
    phase: PressPhase,
    phase_timer_ms: f32,
    pulse_timer_ms: f32,
    pulse_interval_ms: f32,
    pulses: u32,
}

impl Default for LongPressReveal {
    fn default() -> Self {
        Self::new()
    }
}

impl LongPressReveal {
    pub fn new() -> Self {
        Self {
            phase: PressPhase::Idle,
            phase_timer_ms: 0.0,
            pulse_timer_ms: 0.0,
            pulse_interval_ms: HEARTBEAT_START_INTERVAL_MS,
            pulses: 0,
        }
    }

    pub fn revealed(&self) -> bool {
        self.phase == PressPhase::Revealed
    }

    pub fn press_start(&mut self) {
        if self.phase == PressPhase::Revealed {
            return;
        }
        self.phase = PressPhase::Holding;
        self.phase_timer_ms = 0.0;
        self.pulse_timer_ms = 0.0;
        self.pulse_interval_ms = HEARTBEAT_START_INTERVAL_MS;
        self.pulses = 0;
    }

    pub fn release(&mut self) {
        if self.phase != PressPhase::Revealed {
            self.phase = PressPhase::Idle;
        }
    }

    pub fn update(&mut self, dt_ms: f32) -> Vec<LongPressEvent> {
        let mut events = Vec::new();
        match self.phase {
            PressPhase::Idle | PressPhase::Revealed => {}
            PressPhase::Holding => {
                self.phase_timer_ms += dt_ms;
                if self.phase_timer_ms >= PRESS_ARM_MS {
                    self.phase = PressPhase::Heartbeat;
                    self.phase_timer_ms = 0.0;
                    self.pulse_timer_ms = 0.0;
                    events.push(LongPressEvent::Armed);
                }
            }
            PressPhase::Heartbeat => {
                self.phase_timer_ms += dt_ms;
                self.pulse_timer_ms += dt_ms;
                while self.pulse_timer_ms >= self.pulse_interval_ms {
                    self.pulse_timer_ms -= self.pulse_interval_ms;
                    events.push(LongPressEvent::Pulse {
                        strong: self.pulses == 0,
                    });
                    self.pulses += 1;
                    self.pulse_interval_ms =
                        (self.pulse_interval_ms - HEARTBEAT_ACCEL_MS).max(HEARTBEAT_FLOOR_MS);
                }
                if self.phase_timer_ms >= HEARTBEAT_TO_REVEAL_MS {
                    self.phase = PressPhase::Revealed;
                    events.push(LongPressEvent::Reveal);
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slam(bb: &mut BoundaryBreaker, sides: &[f32], gap_ms: f64) -> bool {
        let mut unlocked = false;
        let mut now = 0.0;
        for &x in sides {
            unlocked |= bb.observe(x, now);
            now += gap_ms;
        }
        unlocked
    }

    #[test]
    fn test_boundary_breaker_unlocks_on_fast_alternation() {
        let mut bb = BoundaryBreaker::new(false);
        // six edge hits = five direction changes
        let unlocked = slam(&mut bb, &[0.0, 100.0, 0.0, 100.0, 0.0, 100.0], 200.0);
        assert!(unlocked);
        assert!(bb.unlocked());
    }

    #[test]
    fn test_boundary_breaker_ignores_slow_alternation() {
        let mut bb = BoundaryBreaker::new(false);
        let unlocked = slam(&mut bb, &[0.0, 100.0, 0.0, 100.0, 0.0, 100.0], 1600.0);
        assert!(!unlocked);
        assert_eq!(bb.attempts(), 0);
    }

    #[test]
    fn test_boundary_breaker_same_side_does_not_count() {
        let mut bb = BoundaryBreaker::new(false);
        for i in 0..20 {
            assert!(!bb.observe(0.0, i as f64 * 100.0));
        }
        assert_eq!(bb.attempts(), 0);
    }

    #[test]
    fn test_boundary_breaker_mid_field_resets_nothing() {
        let mut bb = BoundaryBreaker::new(false);
        bb.observe(0.0, 0.0);
        // mid-field samples are not edge hits and do not break the chain
        assert!(!bb.observe(50.0, 100.0));
        bb.observe(100.0, 200.0);
        assert_eq!(bb.attempts(), 1);
    }

    #[test]
    fn test_glitch_title_five_clicks_then_terminal() {
        let mut title = GlitchTitle::new();
        for _ in 0..4 {
            assert_eq!(title.click(), TitleClick::Counted);
        }
        assert_eq!(title.click(), TitleClick::GlitchActivated);
        assert!(title.glitched());
        assert_eq!(title.click(), TitleClick::OpenTerminal);
        assert_eq!(title.click(), TitleClick::OpenTerminal);
    }

    #[test]
    fn test_terminal_surprise_and_help() {
        assert_eq!(parse_terminal_command("surpresa"), TerminalCommand::Surprise);
        assert_eq!(parse_terminal_command("  SURPRESA  "), TerminalCommand::Surprise);
        assert_eq!(parse_terminal_command("help"), TerminalCommand::Help);
        assert_eq!(parse_terminal_command("ajuda"), TerminalCommand::Help);
    }

    #[test]
    fn test_terminal_level_jumps() {
        assert_eq!(parse_terminal_command("level 1"), TerminalCommand::Jump { step: 0 });
        assert_eq!(parse_terminal_command("level 3"), TerminalCommand::Jump { step: 4 });
        assert_eq!(
            parse_terminal_command("level 6"),
            TerminalCommand::Jump { step: FINAL_STEP }
        );
    }

    #[test]
    fn test_terminal_rejects_bad_input() {
        assert_eq!(parse_terminal_command("level 0"), TerminalCommand::Unknown);
        assert_eq!(parse_terminal_command("level 7"), TerminalCommand::Unknown);
        assert_eq!(parse_terminal_command("level x"), TerminalCommand::Unknown);
        assert_eq!(parse_terminal_command("sudo rm -rf"), TerminalCommand::Unknown);
        assert_eq!(parse_terminal_command(""), TerminalCommand::Unknown);
    }

    #[test]
    fn test_long_press_arms_then_reveals() {
        let mut press = LongPressReveal::new();
        press.press_start();
        assert!(press.update(2999.0).is_empty());
        // cross the arm threshold, heartbeat begins
        assert_eq!(press.update(1.0), vec![LongPressEvent::Armed]);
        // first pulse lands at 900ms into the heartbeat and is strong
        let events = press.update(900.0);
        assert_eq!(events, vec![LongPressEvent::Pulse { strong: true }]);
        // 1800ms total heartbeat -> reveal; second pulse comes at +840
        let events = press.update(900.0);
        assert!(events.contains(&LongPressEvent::Pulse { strong: false }));
        assert_eq!(events.last(), Some(&LongPressEvent::Reveal));
        assert!(press.revealed());
    }

    #[test]
    fn test_release_before_arm_resets() {
        let mut press = LongPressReveal::new();
        press.press_start();
        press.update(2500.0);
        press.release();
        assert!(press.update(10_000.0).is_empty());
        assert!(!press.revealed());
    }

    #[test]
    fn test_pulse_interval_accelerates_to_floor() {
        let mut press = LongPressReveal::new();
        press.press_start();
        press.update(PRESS_ARM_MS);
        let mut pulses = 0;
        // keep the press held well past the reveal; count pulses up to it
        for event in press.update(1800.0) {
            if matches!(event, LongPressEvent::Pulse { .. }) {
                pulses += 1;
            }
        }
        // 900 + 840 = 1740 <= 1800, so exactly two pulses before the reveal
        assert_eq!(pulses, 2);
    }
}
