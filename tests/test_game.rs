use std::fs;

use approx::assert_abs_diff_eq;
use galaxy_wars::config::{GameConfig, SCREEN_WIDTH};
use galaxy_wars::entities::{Controls, PowerUpKind};
use galaxy_wars::game::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::{tempdir, TempDir};

const IDLE: Controls = Controls { left: false, right: false, up: false, down: false, fire: false };

fn new_game(dir: &TempDir) -> Game {
    let config = GameConfig {
        high_score_path: dir.path().join("scores.txt"),
        ..GameConfig::default()
    };
    Game::with_rng(config, StdRng::seed_from_u64(42))
}

fn type_text(game: &mut Game, text: &str) {
    for c in text.chars() {
        game.handle_command(Command::Char(c));
    }
}

/// Main menu to the first frame of level 1 as "Ace".
fn start_campaign(game: &mut Game) {
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::NameEntry);
    type_text(game, "Ace");
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::ShipSelect);
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::Intro);

    game.handle_command(Command::Confirm); // skips the narration
    game.update(0.01, &IDLE);
    assert_eq!(game.scene(), Scene::Playing(LevelId::One));
}

fn boost(game: &mut Game, id: LevelId, times: usize) {
    for _ in 0..times {
        game.level_mut(id).apply_power_up(PowerUpKind::ScoreBoost);
    }
}

fn saved_lines(dir: &TempDir) -> Vec<String> {
    fs::read_to_string(dir.path().join("scores.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

// ── Menus ─────────────────────────────────────────────────────────────────────

#[test]
fn campaign_opens_with_the_intro() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    assert_eq!(game.scene(), Scene::MainMenu);

    start_campaign(&mut game);
    assert_eq!(game.session().player_name, "Ace");
    assert_eq!(game.session().selected_level, None);
    assert!(game.level(LevelId::One).is_timer_running());
}

#[test]
fn ship_choice_is_kept() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    game.handle_command(Command::Confirm);
    type_text(&mut game, "Ace");
    game.handle_command(Command::Confirm);
    game.handle_command(Command::Right);
    game.handle_command(Command::Right);
    game.handle_command(Command::Confirm);
    assert_eq!(game.session().ship, ShipColor::Green);
}

#[test]
fn name_entry_filters_and_caps_input() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    game.handle_command(Command::Confirm);

    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::NameEntry, "empty name is refused");
    type_text(&mut game, "   ");
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::NameEntry, "blank name is refused");
    game.handle_command(Command::Backspace);
    game.handle_command(Command::Backspace);
    game.handle_command(Command::Backspace);

    type_text(&mut game, "Al!ce-");
    assert_eq!(game.name_input(), "Alce");
    game.handle_command(Command::Backspace);
    assert_eq!(game.name_input(), "Alc");

    type_text(&mut game, "abcdefghijklmnopqrst");
    assert_eq!(game.name_input().chars().count(), MAX_NAME_LEN);
}

#[test]
fn credits_and_exit() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    game.handle_command(Command::Up); // wraps to the last item
    assert_eq!(game.main_menu().selected(), Some(MainMenuItem::Credits));
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::Credits);
    game.handle_command(Command::Back);
    assert_eq!(game.scene(), Scene::MainMenu);

    for _ in 0..3 {
        game.handle_command(Command::Down);
    }
    game.handle_command(Command::Confirm);
    assert!(game.should_quit());
}

#[test]
fn high_score_screen_reads_the_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("scores.txt"), "Ace 500 120\nRookie 300 90\n").unwrap();
    let mut game = new_game(&dir);

    game.handle_command(Command::Down);
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::HighScores);
    assert_eq!(game.high_scores().len(), 2);

    // Nothing to scroll with fewer rows than fit.
    game.handle_command(Command::Down);
    assert_eq!(game.high_score_scroll(), 0);
    game.handle_command(Command::Back);
    assert_eq!(game.scene(), Scene::MainMenu);
}

// ── Playing ───────────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_the_level_clock() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    start_campaign(&mut game);
    let start = game.level(LevelId::One).elapsed();

    game.update(0.5, &IDLE);
    game.handle_command(Command::Pause);
    assert!(game.session().paused);
    game.update(1.0, &IDLE);
    assert_abs_diff_eq!(game.level(LevelId::One).elapsed(), start + 0.5, epsilon = 1e-4);

    game.handle_command(Command::Char('p'));
    assert!(!game.session().paused);
    game.update(0.5, &IDLE);
    assert_abs_diff_eq!(game.level(LevelId::One).elapsed(), start + 1.0, epsilon = 1e-4);
}

#[test]
fn pause_menu_restart_returns_to_ship_select() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    start_campaign(&mut game);

    game.handle_command(Command::Pause);
    game.handle_command(Command::Down);
    assert_eq!(game.pause_menu().selected(), Some(RunAction::Restart));
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::ShipSelect);
    assert!(!game.session().paused);
    assert_eq!(game.session().player_name, "Ace");
}

#[test]
fn escape_leaves_for_the_main_menu() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    start_campaign(&mut game);
    game.handle_command(Command::Back);
    assert_eq!(game.scene(), Scene::MainMenu);
    assert!(saved_lines(&dir).is_empty());
}

#[test]
fn campaign_carries_score_and_time_into_the_next_level() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    start_campaign(&mut game);

    boost(&mut game, LevelId::One, 6);
    game.update(0.01, &IDLE);
    assert_eq!(game.scene(), Scene::Transition(LevelId::Two));
    assert_eq!(game.session().total_score, 300);
    let carried = game.session().total_time;
    assert!(carried > 0.0);

    game.handle_command(Command::Confirm);
    game.update(0.01, &IDLE);
    assert_eq!(game.scene(), Scene::LevelBanner(LevelId::Two));
    let two = game.level(LevelId::Two);
    assert_eq!(two.score(), 0);
    assert_eq!(two.display_score(), 300);
    assert_abs_diff_eq!(two.elapsed(), carried, epsilon = 1e-6);

    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::Playing(LevelId::Two));

    for _ in 0..3 {
        game.level_mut(LevelId::Two).lose_life();
    }
    game.update(0.01, &IDLE);
    assert_eq!(game.scene(), Scene::EndScreen { victory: false });
    assert_eq!(game.session().total_score, 300);
    assert_eq!(saved_lines(&dir), vec!["Ace 300 0".to_string()]);

    for _ in 0..10 {
        game.update(0.1, &IDLE);
    }
    assert_eq!(saved_lines(&dir).len(), 1);
}

#[test]
fn end_screen_restart_clears_the_run() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    start_campaign(&mut game);
    boost(&mut game, LevelId::One, 2);
    for _ in 0..3 {
        game.level_mut(LevelId::One).lose_life();
    }
    game.update(0.01, &IDLE);
    assert_eq!(game.scene(), Scene::EndScreen { victory: false });
    assert_eq!(game.session().total_score, 100);

    assert_eq!(game.end_menu().selected(), Some(RunAction::Restart));
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::ShipSelect);
    assert_eq!(game.session().total_score, 0);
    assert_eq!(game.session().total_time, 0.0);
    assert!(!game.session().score_saved);

    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::Intro);
    assert_eq!(game.level(LevelId::One).score(), 0);
}

// ── Level picker ──────────────────────────────────────────────────────────────

fn pick_level(game: &mut Game, downs: usize) {
    game.handle_command(Command::Down);
    game.handle_command(Command::Down);
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::LevelPicker);
    for _ in 0..downs {
        game.handle_command(Command::Down);
    }
    game.handle_command(Command::Confirm);
    type_text(game, "Zed");
    game.handle_command(Command::Confirm);
    game.handle_command(Command::Confirm);
}

#[test]
fn picked_level_opens_with_its_banner() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    pick_level(&mut game, 1);

    assert_eq!(game.scene(), Scene::LevelBanner(LevelId::Two));
    assert_eq!(game.banner().map(|b| b.full_text()), Some("LEVEL 2 STARTED"));
    assert!(game.level(LevelId::Two).is_timer_running());

    game.handle_command(Command::Char('x'));
    assert_eq!(game.scene(), Scene::Playing(LevelId::Two));
}

#[test]
fn banner_gives_way_on_its_own() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    pick_level(&mut game, 2);
    assert_eq!(game.scene(), Scene::LevelBanner(LevelId::Three));

    game.update(1.0, &IDLE);
    assert_eq!(game.scene(), Scene::LevelBanner(LevelId::Three));
    game.update(2.0, &IDLE);
    assert_eq!(game.scene(), Scene::Playing(LevelId::Three));
}

#[test]
fn picked_level_one_still_plays_the_intro() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    pick_level(&mut game, 0);
    assert_eq!(game.scene(), Scene::Intro);
}

#[test]
fn winning_a_single_level_ends_the_run() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    pick_level(&mut game, 1);
    game.handle_command(Command::Confirm);

    boost(&mut game, LevelId::Two, 10);
    game.update(0.01, &IDLE);
    assert_eq!(game.scene(), Scene::EndScreen { victory: true });
    assert_eq!(saved_lines(&dir), vec!["Zed 500 0".to_string()]);
}

#[test]
fn boss_kill_plays_the_victory_story_then_ends_the_run() {
    let dir = tempdir().unwrap();
    let mut game = new_game(&dir);
    pick_level(&mut game, 2);
    game.handle_command(Command::Confirm);
    assert_eq!(game.scene(), Scene::Playing(LevelId::Three));

    // Shielded, chase the boss (or hold the centre) and keep firing.
    let mut frame = 0u32;
    while game.scene() == Scene::Playing(LevelId::Three) && frame < 30_000 {
        let level = game.level_mut(LevelId::Three);
        if level.buffs().shield < 1.0 {
            level.apply_power_up(PowerUpKind::Shield);
        }
        let x = level.player().pos.x;
        let target = level
            .boss()
            .filter(|b| b.is_active())
            .map_or(SCREEN_WIDTH / 2.0, |b| b.pos().x);
        let controls = Controls {
            left: target < x - 15.0,
            right: target > x + 15.0,
            fire: frame % 2 == 0,
            ..IDLE
        };
        game.update(1.0 / 30.0, &controls);
        frame += 1;
    }

    assert_eq!(game.scene(), Scene::VictoryStory);
    assert!(game.level(LevelId::Three).is_boss_defeated());
    assert!(game.session().total_score >= 500);
    assert!(saved_lines(&dir).is_empty(), "nothing saved before the story ends");

    for _ in 0..1000 {
        if game.scene() != Scene::VictoryStory {
            break;
        }
        game.update(0.05, &IDLE);
    }
    assert_eq!(game.scene(), Scene::EndScreen { victory: true });

    let lines = saved_lines(&dir);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(&format!("Zed {} ", game.session().total_score)));
}
