/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game.  No game logic is performed; this module only translates state into
/// terminal commands, scaling the 1920×1080 world onto whatever grid the
/// terminal currently has.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use galaxy_wars::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use galaxy_wars::enemy::{Enemy, HealthTier};
use galaxy_wars::entities::{MeteorSize, PowerUpKind, Vec2};
use galaxy_wars::game::{Game, LevelId, Menu, Scene, ShipColor, HIGH_SCORE_ROWS};
use galaxy_wars::highscore::format_time;
use galaxy_wars::level::Level;
use galaxy_wars::narrative::Narration;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TITLE: Color = Color::Cyan;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_TIME: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_METEOR: Color = Color::DarkYellow;
const C_EXPLOSION: Color = Color::Yellow;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_SHIELD: Color = Color::Cyan;
const C_FLASH: Color = Color::White;
const C_SELECTED: Color = Color::Yellow;
const C_ITEM: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_STORY: Color = Color::White;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps world coordinates into the bordered play area.
struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        if pos.x < 0.0 || pos.y < 0.0 || pos.x >= SCREEN_WIDTH || pos.y >= SCREEN_HEIGHT {
            return None;
        }
        let cols = self.width.saturating_sub(2) as f32;
        let rows = self.height.saturating_sub(4) as f32;
        let col = 1 + (pos.x / SCREEN_WIDTH * cols) as u16;
        let row = 2 + (pos.y / SCREEN_HEIGHT * rows) as u16;
        Some((col, row))
    }

    fn center_x(&self) -> u16 {
        self.width / 2
    }

    fn center_y(&self) -> u16 {
        self.height / 2
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport { width, height };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match game.scene() {
        Scene::MainMenu => draw_main_menu(out, &view, game)?,
        Scene::NameEntry => draw_name_entry(out, &view, game)?,
        Scene::ShipSelect => draw_ship_select(out, &view, game)?,
        Scene::LevelPicker => {
            draw_title(out, &view, "SELECT LEVEL")?;
            draw_menu(out, &view, game.level_menu(), |id| id.label())?;
            draw_hint(out, &view, "↑ ↓ : Choose   ENTER : Select   ESC : Back")?;
        }
        Scene::Intro | Scene::Transition(_) | Scene::VictoryStory => {
            draw_narration(out, &view, game.narration())?;
        }
        Scene::LevelBanner(id) | Scene::Playing(id) => draw_playing(out, &view, game, id)?,
        Scene::EndScreen { victory } => draw_end_screen(out, &view, game, victory)?,
        Scene::HighScores => draw_high_scores(out, &view, game)?,
        Scene::Credits => draw_credits(out, &view)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(out: &mut W, view: &Viewport, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = view.center_x().saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, view: &Viewport, title: &str) -> std::io::Result<()> {
    draw_centered(out, view, view.center_y().saturating_sub(6), title, C_TITLE)
}

fn draw_hint<W: Write>(out: &mut W, view: &Viewport, hint: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

fn draw_menu<W: Write, T: Copy>(
    out: &mut W,
    view: &Viewport,
    menu: &Menu<T>,
    label: impl Fn(T) -> &'static str,
) -> std::io::Result<()> {
    let start = view.center_y().saturating_sub(2);
    for (i, item) in menu.items().iter().enumerate() {
        let selected = i == menu.selected_index();
        let text = if selected {
            format!("> {} <", label(*item))
        } else {
            label(*item).to_string()
        };
        let color = if selected { C_SELECTED } else { C_ITEM };
        draw_centered(out, view, start + i as u16, &text, color)?;
    }
    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn draw_main_menu<W: Write>(out: &mut W, view: &Viewport, game: &Game) -> std::io::Result<()> {
    draw_title(out, view, "★  GALAXY  WARS  ★")?;
    draw_menu(out, view, game.main_menu(), |item| item.label())?;
    draw_hint(out, view, "↑ ↓ : Choose   ENTER : Select")
}

fn draw_name_entry<W: Write>(out: &mut W, view: &Viewport, game: &Game) -> std::io::Result<()> {
    draw_title(out, view, "ENTER YOUR NAME")?;
    let field = format!("[ {:<15} ]", game.name_input());
    draw_centered(out, view, view.center_y(), &field, C_SELECTED)?;
    draw_hint(out, view, "Letters, digits, space   ENTER : Accept   ESC : Back")
}

fn ship_color(ship: ShipColor) -> Color {
    match ship {
        ShipColor::Red => Color::Red,
        ShipColor::Blue => Color::Blue,
        ShipColor::Green => Color::Green,
        ShipColor::Orange => Color::DarkYellow,
    }
}

fn draw_ship_select<W: Write>(out: &mut W, view: &Viewport, game: &Game) -> std::io::Result<()> {
    draw_title(out, view, "CHOOSE YOUR SHIP")?;
    let menu = game.ship_menu();
    let slot = 10u16;
    let total = slot * menu.items().len() as u16;
    let left = view.center_x().saturating_sub(total / 2);
    let row = view.center_y();

    for (i, ship) in menu.items().iter().enumerate() {
        let col = left + i as u16 * slot;
        out.queue(cursor::MoveTo(col + 3, row))?;
        out.queue(style::SetForegroundColor(ship_color(*ship)))?;
        out.queue(Print("▲"))?;
        out.queue(cursor::MoveTo(col + 2, row + 1))?;
        out.queue(Print("/█\\"))?;
        if i == menu.selected_index() {
            out.queue(cursor::MoveTo(col, row + 3))?;
            out.queue(style::SetForegroundColor(C_SELECTED))?;
            out.queue(Print(format!("{:^8}", format!("{ship:?}"))))?;
        }
    }
    draw_hint(out, view, "← → : Choose   ENTER : Launch   ESC : Back")
}

// ── Narration ─────────────────────────────────────────────────────────────────

fn draw_narration<W: Write>(out: &mut W, view: &Viewport, narration: &Narration) -> std::io::Result<()> {
    // Alpha has no terminal equivalent; fading text just dims.
    let color = if narration.text_alpha() < 128.0 { C_HINT } else { C_STORY };
    let lines = narration.visible_lines();
    let start = view.center_y().saturating_sub(lines.len() as u16);
    for (i, line) in lines.iter().enumerate() {
        draw_centered(out, view, start + 2 * i as u16, line, color)?;
    }
    draw_hint(out, view, "Any key : Skip")
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_playing<W: Write>(out: &mut W, view: &Viewport, game: &Game, id: LevelId) -> std::io::Result<()> {
    let level = game.level(id);

    draw_border(out, view)?;
    draw_hud(out, view, level, id)?;

    for meteor in level.meteors().active() {
        if let Some((col, row)) = view.cell(meteor.pos) {
            out.queue(cursor::MoveTo(col, row))?;
            if meteor.is_exploding() {
                out.queue(style::SetForegroundColor(C_EXPLOSION))?;
                out.queue(Print("*"))?;
            } else {
                out.queue(style::SetForegroundColor(C_METEOR))?;
                out.queue(Print(match meteor.size {
                    MeteorSize::Big => "@",
                    MeteorSize::Small => "o",
                }))?;
            }
        }
    }
    for power_up in level.power_ups().active() {
        if let Some((col, row)) = view.cell(power_up.pos) {
            let (symbol, color) = match power_up.kind {
                PowerUpKind::DoubleFire => ("‼", Color::Yellow),
                PowerUpKind::Shield => ("◊", Color::Cyan),
                PowerUpKind::Heal => ("♥", Color::Magenta),
                PowerUpKind::ScoreBoost => ("$", Color::Green),
            };
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(symbol))?;
        }
    }
    for enemy in level.enemies().active() {
        draw_enemy(out, view, enemy)?;
    }
    if let Some(boss) = level.boss().filter(|b| b.is_active()) {
        draw_enemy(out, view, boss)?;
    }
    for bullet in level.bullets().active() {
        if let Some((col, row)) = view.cell(bullet.pos) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
            out.queue(Print("║"))?;
        }
    }
    for bullet in level.enemy_bullets().active() {
        if let Some((col, row)) = view.cell(bullet.pos) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
            out.queue(Print("↓"))?;
        }
    }

    if !level.is_player_destroyed() {
        draw_player(out, view, level, game.session().ship)?;
    }

    if let Some(banner) = game.banner() {
        draw_centered(out, view, view.center_y(), banner.shown(), C_TITLE)?;
    } else if let Some(announcement) = level.announcement() {
        draw_centered(out, view, view.center_y(), announcement.shown(), C_SELECTED)?;
    }

    if game.session().paused {
        draw_title(out, view, "PAUSED")?;
        draw_menu(out, view, game.pause_menu(), |action| action.label())?;
        draw_hint(out, view, "↑ ↓ : Choose   ENTER : Select   P : Resume")
    } else {
        draw_hint(out, view, "ARROWS / WASD : Move   SPACE : Shoot   P : Pause   ESC : Menu")
    }
}

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, level: &Level, id: LevelId) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", level.display_score())))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(format!("  Time {}", format_time(level.elapsed()))))?;

    let waves = level.waves();
    let centre = format!("[ {} · Wave {}/{} ]", id.label(), waves.current_wave(), waves.max_waves());
    draw_centered(out, view, 0, &centre, C_TITLE)?;

    let buffs = level.buffs();
    let mut tags = String::new();
    if buffs.has_double_fire() {
        tags.push_str(&format!("[‼ {:>2}s] ", buffs.double_fire.ceil() as u32));
    }
    if buffs.is_shielded() {
        tags.push_str(&format!("[◊ {:>2}s] ", buffs.shield.ceil() as u32));
    }
    let lives_str = format!("Lives:{}", "♥".repeat(level.lives() as usize));
    let right_len = tags.chars().count() + lives_str.chars().count();

    out.queue(cursor::MoveTo(view.width.saturating_sub(right_len as u16 + 1), 0))?;
    if !tags.is_empty() {
        out.queue(style::SetForegroundColor(C_SHIELD))?;
        out.queue(Print(&tags))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    if let Some(boss) = level.boss().filter(|b| b.is_active()).and_then(Enemy::as_boss) {
        let width = 30usize;
        let filled = (boss.health_fraction() * width as f32).round() as usize;
        let color = match boss.health_tier() {
            HealthTier::Healthy => Color::Green,
            HealthTier::Wounded => Color::Yellow,
            HealthTier::Critical => Color::Red,
        };
        let bar = format!("BOSS [{}{}]", "█".repeat(filled), " ".repeat(width - filled.min(width)));
        draw_centered(out, view, 2, &bar, color)?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, level: &Level, ship: ShipColor) -> std::io::Result<()> {
    // Two rows, three columns:
    //   ▲
    //  /█\
    let Some((col, row)) = view.cell(level.player().pos) else {
        return Ok(());
    };
    let color = if level.pickup_flash() > 0.0 {
        C_FLASH
    } else if level.buffs().is_shielded() {
        C_SHIELD
    } else {
        ship_color(ship)
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;
    if row + 1 < view.height.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(enemy.pos()) else {
        return Ok(());
    };
    let play_bottom = view.height.saturating_sub(2);
    if enemy.is_boss() {
        //  <═◎═>
        //   ╚╦╝
        out.queue(style::SetForegroundColor(C_BOSS))?;
        out.queue(cursor::MoveTo(col.saturating_sub(2), row))?;
        out.queue(Print("<═◎═>"))?;
        if row + 1 < play_bottom {
            out.queue(cursor::MoveTo(col.saturating_sub(1), row + 1))?;
            out.queue(Print("╚╦╝"))?;
        }
    } else {
        out.queue(style::SetForegroundColor(C_ENEMY))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
        out.queue(Print("«▼»"))?;
    }
    Ok(())
}

// ── End-of-run screens ────────────────────────────────────────────────────────

fn draw_end_screen<W: Write>(out: &mut W, view: &Viewport, game: &Game, victory: bool) -> std::io::Result<()> {
    let (banner, color) = if victory {
        ("║      VICTORY       ║", Color::Green)
    } else {
        ("║    GAME  OVER      ║", Color::Red)
    };
    let top = view.center_y().saturating_sub(8);
    draw_centered(out, view, top, "╔════════════════════╗", color)?;
    draw_centered(out, view, top + 1, banner, color)?;
    draw_centered(out, view, top + 2, "╚════════════════════╝", color)?;

    let session = game.session();
    draw_centered(out, view, top + 4, &format!("Pilot: {}", session.player_name), C_ITEM)?;
    draw_centered(out, view, top + 5, &format!("Final Score: {:>6}", session.total_score), C_HUD_SCORE)?;
    draw_centered(out, view, top + 6, &format!("Time: {}", format_time(session.total_time)), C_HUD_TIME)?;

    draw_menu(out, view, game.end_menu(), |action| action.label())?;
    draw_hint(out, view, "↑ ↓ : Choose   ENTER : Select")
}

fn draw_high_scores<W: Write>(out: &mut W, view: &Viewport, game: &Game) -> std::io::Result<()> {
    draw_title(out, view, "HIGH SCORES")?;
    let table = game.high_scores();
    let top = view.center_y().saturating_sub(4);

    if table.is_empty() {
        draw_centered(out, view, top, "No scores yet", C_HINT)?;
    }
    let scroll = game.high_score_scroll();
    for (i, entry) in table.entries().iter().enumerate().skip(scroll).take(HIGH_SCORE_ROWS) {
        let line = format!(
            "{:>2}. {:<15} {:>6}  {}",
            i + 1,
            entry.name,
            entry.score,
            format_time(entry.time_secs as f32)
        );
        let color = if i == 0 { C_SELECTED } else { C_ITEM };
        draw_centered(out, view, top + (i - scroll) as u16, &line, color)?;
    }
    draw_hint(out, view, "↑ ↓ : Scroll   ESC : Back")
}

fn draw_credits<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    draw_title(out, view, "CREDITS")?;
    let lines = [
        "GALAXY WARS",
        "",
        "Game design and programming",
        "The Galaxy Wars team",
        "",
        "Thanks for playing!",
    ];
    let top = view.center_y().saturating_sub(3);
    for (i, line) in lines.iter().enumerate() {
        draw_centered(out, view, top + i as u16, line, C_ITEM)?;
    }
    draw_hint(out, view, "ESC : Back")
}
