/// Scripted text: typewriter messages, timed banners and the narrated
/// interludes (intro, level transition, victory story).
///
/// All of it advances on `update(dt)` only.  `skip()` is an immediate jump to
/// the finished state and also silences the typing cue the front end uses to
/// loop a typing sound.

use crate::timer::Stopwatch;

/// Prefix of `text` holding its first `n` characters.
fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

// ── Typewriter ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Typewriter {
    full: String,
    shown: usize,
    interval: f32,
    timer: f32,
    complete: bool,
    active: bool,
}

impl Typewriter {
    pub const DEFAULT_INTERVAL: f32 = 0.05;

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            full: text.into(),
            shown: 0,
            interval: Self::DEFAULT_INTERVAL,
            timer: 0.0,
            complete: false,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.shown = 0;
        self.timer = 0.0;
        self.complete = false;
        self.active = true;
    }

    /// Reveal one character per interval; completes one interval after the
    /// last character.
    pub fn update(&mut self, dt: f32) {
        if !self.active || self.complete {
            return;
        }
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer = 0.0;
            if self.shown < self.full.chars().count() {
                self.shown += 1;
            } else {
                self.complete = true;
            }
        }
    }

    pub fn shown(&self) -> &str {
        char_prefix(&self.full, self.shown)
    }

    pub fn full_text(&self) -> &str {
        &self.full
    }

    pub fn is_done(&self) -> bool {
        self.complete
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

/// Typewriter message that expires after a fixed time.
#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    text: Typewriter,
    clock: Stopwatch,
    duration: f32,
}

impl Banner {
    pub fn new(text: impl Into<String>, duration: f32) -> Self {
        let mut text = Typewriter::new(text);
        text.start();
        Self {
            text,
            clock: Stopwatch::new(),
            duration,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.text.update(dt);
        self.clock.tick(dt);
        if self.is_expired() {
            self.text.set_active(false);
        }
    }

    pub fn is_expired(&self) -> bool {
        self.clock.reached(self.duration)
    }

    pub fn shown(&self) -> &str {
        self.text.shown()
    }

    pub fn full_text(&self) -> &str {
        self.text.full_text()
    }
}

// ── Narrated sequences ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NarrationScript {
    pub lines: &'static [&'static str],
    /// Seconds per revealed character.
    pub typing_interval: f32,
    /// Overlay alpha per second while darkening the screen.
    pub fade_in_speed: f32,
    /// Text alpha per second while fading out.
    pub fade_out_speed: f32,
    /// Pause after line `i`; lines without an entry (or 0.0) move straight on.
    pub pauses: &'static [f32],
}

pub const INTRO: NarrationScript = NarrationScript {
    lines: &[
        "The countdown to annihilation has begun.",
        "Every second lost is a city erased.",
        "Pilot -- the world needs you now",
    ],
    typing_interval: 0.05,
    fade_in_speed: 200.0,
    fade_out_speed: 150.0,
    pauses: &[1.0, 2.5],
};

pub const LEVEL_TRANSITION: NarrationScript = NarrationScript {
    lines: &["Good work! Get ready for the next round."],
    typing_interval: 0.03,
    fade_in_speed: 250.0,
    fade_out_speed: 250.0,
    pauses: &[1.0],
};

pub const VICTORY_STORY: NarrationScript = NarrationScript {
    lines: &[
        "The threat has been eliminated.",
        "The galaxy is safe... for now.",
        "You are the hero we needed.",
    ],
    typing_interval: 0.05,
    fade_in_speed: 200.0,
    fade_out_speed: 150.0,
    pauses: &[1.0, 2.5],
};

const OPAQUE: f32 = 255.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NarrationPhase {
    Idle,
    FadeIn,
    Typing,
    Pause,
    FadeOut,
    Done,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Narration {
    script: NarrationScript,
    phase: NarrationPhase,
    line: usize,
    chars: usize,
    type_timer: f32,
    pause_timer: f32,
    overlay_alpha: f32,
    text_alpha: f32,
    typing_cue: bool,
}

impl Narration {
    pub fn new(script: NarrationScript) -> Self {
        Self {
            script,
            phase: NarrationPhase::Idle,
            line: 0,
            chars: 0,
            type_timer: 0.0,
            pause_timer: 0.0,
            overlay_alpha: 0.0,
            text_alpha: OPAQUE,
            typing_cue: false,
        }
    }

    /// Begin (or restart) the sequence.
    pub fn start(&mut self) {
        *self = Self::new(self.script);
        self.phase = NarrationPhase::FadeIn;
    }

    pub fn skip(&mut self) {
        self.phase = NarrationPhase::Done;
        self.typing_cue = false;
    }

    pub fn update(&mut self, dt: f32) {
        match self.phase {
            NarrationPhase::Idle | NarrationPhase::Done => {}
            NarrationPhase::FadeIn => {
                self.overlay_alpha += self.script.fade_in_speed * dt;
                if self.overlay_alpha >= OPAQUE {
                    self.overlay_alpha = OPAQUE;
                    self.begin_line(0);
                }
            }
            NarrationPhase::Typing => self.update_typing(dt),
            NarrationPhase::Pause => {
                self.pause_timer += dt;
                if self.pause_timer >= self.pause_after(self.line) {
                    self.advance_line();
                }
            }
            NarrationPhase::FadeOut => {
                self.typing_cue = false;
                self.text_alpha -= self.script.fade_out_speed * dt;
                if self.text_alpha <= 0.0 {
                    self.text_alpha = 0.0;
                    self.phase = NarrationPhase::Done;
                }
            }
        }
    }

    fn update_typing(&mut self, dt: f32) {
        self.type_timer += dt;
        if self.type_timer < self.script.typing_interval {
            return;
        }
        self.type_timer = 0.0;

        let len = self.script.lines[self.line].chars().count();
        if self.chars < len {
            self.chars += 1;
            self.typing_cue = true;
            return;
        }

        self.typing_cue = false;
        if self.pause_after(self.line) > 0.0 {
            self.pause_timer = 0.0;
            self.phase = NarrationPhase::Pause;
        } else {
            self.advance_line();
        }
    }

    fn advance_line(&mut self) {
        if self.line + 1 < self.script.lines.len() {
            self.begin_line(self.line + 1);
        } else {
            self.phase = NarrationPhase::FadeOut;
        }
    }

    fn begin_line(&mut self, line: usize) {
        self.line = line;
        self.chars = 0;
        self.type_timer = 0.0;
        self.phase = NarrationPhase::Typing;
    }

    fn pause_after(&self, line: usize) -> f32 {
        self.script.pauses.get(line).copied().unwrap_or(0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == NarrationPhase::Done
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, NarrationPhase::Idle | NarrationPhase::Done)
    }

    pub fn phase(&self) -> NarrationPhase {
        self.phase
    }

    /// True while characters are being revealed.
    pub fn typing_cue(&self) -> bool {
        self.typing_cue
    }

    pub fn overlay_alpha(&self) -> f32 {
        self.overlay_alpha
    }

    pub fn text_alpha(&self) -> f32 {
        self.text_alpha
    }

    /// Text revealed so far: finished lines in full, the current one partially.
    /// Nothing is visible before typing starts.
    pub fn visible_lines(&self) -> Vec<&'static str> {
        if matches!(self.phase, NarrationPhase::Idle | NarrationPhase::FadeIn) {
            return Vec::new();
        }
        let lines = self.script.lines;
        let mut out: Vec<&'static str> = lines[..self.line].to_vec();
        if let Some(current) = lines.get(self.line) {
            out.push(char_prefix(current, self.chars));
        }
        out
    }
}
