mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};

use galaxy_wars::config::{GameConfig, DEFAULT_CONFIG_PATH};
use galaxy_wars::entities::Controls;
use galaxy_wars::game::{Command, Game};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS
const LOG_FILE: &str = "galaxy_wars.log";

/// Longest step fed to the simulation; a stalled terminal must not teleport
/// everything on screen.
const MAX_DT: f32 = 0.1;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn held_controls(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Controls {
    Controls {
        left: is_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: is_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        up: is_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        down: is_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
        fire: is_held(key_frame, &[KeyCode::Char(' ')], frame),
    }
}

/// One-shot meaning of a key press.
fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up => Some(Command::Up),
        KeyCode::Down => Some(Command::Down),
        KeyCode::Left => Some(Command::Left),
        KeyCode::Right => Some(Command::Right),
        KeyCode::Enter => Some(Command::Confirm),
        KeyCode::Esc => Some(Command::Back),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Char(c) => Some(Command::Char(c)),
        _ => None,
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to a file: the terminal is in raw mode on the alternate screen, so
/// anything written to stderr would corrupt the frame.
fn init_logging() {
    let file = match File::create(LOG_FILE) {
        Ok(file) => file,
        Err(_) => return,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the keys that are still
/// "fresh" (within `HOLD_WINDOW` frames) form the held-key [`Controls`], so
/// Space + arrows can be held at the same time.  Every press is additionally
/// forwarded to the game as a one-shot [`Command`].
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence.
fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: GameConfig) -> std::io::Result<()> {
    let mut game = Game::new(config);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        log::info!("interrupted");
                        return Ok(());
                    }
                    key_frame.insert(code, frame);
                    if let Some(command) = command_for(code) {
                        game.handle_command(command);
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if game.should_quit() {
            log::info!("quit from menu");
            return Ok(());
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32().min(MAX_DT);
        last_tick = now;

        game.update(dt, &held_controls(&key_frame, frame));
        display::render(out, &game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();
    let config = GameConfig::load_or_default(DEFAULT_CONFIG_PATH);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, config);
    if let Err(e) = &result {
        log::error!("terminal error: {e}");
    }

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
