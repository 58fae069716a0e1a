use approx::assert_abs_diff_eq;
use galaxy_wars::config::*;
use galaxy_wars::entities::*;
use galaxy_wars::level::Level;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn level_one() -> Level {
    let mut level = Level::new(LevelConfig::level_one());
    level.start_timer();
    level
}

const FIRE: Controls = Controls { left: false, right: false, up: false, down: false, fire: true };

/// Advance `seconds` in `dt` steps with the same keys held.
fn run(level: &mut Level, seconds: f32, dt: f32, controls: Controls, rng: &mut StdRng) {
    let steps = (seconds / dt).round() as usize;
    for _ in 0..steps {
        level.update(dt, &controls, rng);
    }
}

/// Play through the opening wave announcement.
fn past_announcement(level: &mut Level, rng: &mut StdRng) {
    run(level, 3.0, 0.1, Controls::default(), rng);
    assert!(level.announcement().is_none());
}

// ── Lives ─────────────────────────────────────────────────────────────────────

#[test]
fn three_hits_destroy_the_player_and_freeze_the_clock() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    level.update(1.0, &Controls::default(), &mut rng);

    for _ in 0..3 {
        level.lose_life();
    }
    assert!(level.is_player_destroyed());
    assert_eq!(level.lives(), 0);
    assert!(!level.is_timer_running());

    let frozen = level.elapsed();
    run(&mut level, 2.0, 0.1, FIRE, &mut rng);
    assert_eq!(level.elapsed(), frozen);
}

#[test]
fn non_fatal_hit_sends_the_ship_home() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    let left = Controls { left: true, ..Controls::default() };
    level.update(0.5, &left, &mut rng);
    assert!(level.player().pos.x < Player::spawn_point().x);
    assert!(level.player().tilt < 0.0);

    level.lose_life();
    assert_eq!(level.lives(), 2);
    assert_eq!(level.player().pos, Player::spawn_point());
    assert_eq!(level.player().tilt, 0.0);
    assert!(!level.is_player_destroyed());
}

#[test]
fn heal_never_exceeds_starting_lives() {
    let mut level = level_one();
    level.apply_power_up(PowerUpKind::Heal);
    assert_eq!(level.lives(), PLAYER_LIVES);

    level.lose_life();
    level.apply_power_up(PowerUpKind::Heal);
    assert_eq!(level.lives(), PLAYER_LIVES);
}

#[test]
fn shield_blocks_every_hit_while_it_lasts() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    past_announcement(&mut level, &mut rng);

    level.apply_power_up(PowerUpKind::Shield);
    assert!(level.buffs().is_shielded());
    run(&mut level, 9.5, 1.0 / 30.0, Controls::default(), &mut rng);
    assert_eq!(level.lives(), PLAYER_LIVES);
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[test]
fn score_boost_and_carried_offset() {
    let mut level = level_one();
    level.set_score_offset(100);
    level.apply_power_up(PowerUpKind::ScoreBoost);
    assert_eq!(level.score(), SCORE_BOOST_POINTS);
    assert_eq!(level.display_score(), 100 + SCORE_BOOST_POINTS);
    assert!(level.pickup_flash() > 0.0);
}

#[test]
fn reaching_the_target_completes_level_one() {
    let mut level = level_one();
    for _ in 0..5 {
        level.apply_power_up(PowerUpKind::ScoreBoost);
    }
    assert!(!level.is_complete()); // 250 < 260
    level.apply_power_up(PowerUpKind::ScoreBoost);
    assert!(level.is_complete());

    for _ in 0..3 {
        level.lose_life();
    }
    assert!(!level.is_complete());
}

#[test]
fn boss_track_ignores_the_target_score() {
    let mut level = Level::new(LevelConfig::level_three());
    for _ in 0..20 {
        level.apply_power_up(PowerUpKind::ScoreBoost);
    }
    assert!(level.score() > level.target_score());
    assert!(!level.is_boss_defeated());
    assert!(!level.is_complete());
}

#[test]
fn score_never_decreases_and_counters_hold() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    let mut last = 0;

    for frame in 0..(120 * 30) {
        let controls = Controls {
            left: (frame / 45) % 2 == 0,
            right: (frame / 45) % 2 == 1,
            fire: frame % 2 == 0,
            ..Controls::default()
        };
        level.update(1.0 / 30.0, &controls, &mut rng);

        assert!(level.score() >= last);
        last = level.score();
        let waves = level.waves();
        assert!(waves.spawned_in_wave() <= waves.enemies_per_wave());
        let stats = level.stats();
        assert!(stats.destroyed <= stats.spawned);
        assert!(level.bullets().active_count() <= MAX_PLAYER_BULLETS);
    }
}

// ── Frame flow ────────────────────────────────────────────────────────────────

#[test]
fn wave_announcement_freezes_play() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    level.update(0.1, &Controls::default(), &mut rng);
    let text = level.announcement().map(|b| b.full_text().to_string());
    assert_eq!(text.as_deref(), Some("WAVE 1 INCOMING!"));

    run(&mut level, 2.0, 0.1, FIRE, &mut rng);
    assert_eq!(level.meteors().active_count(), 0);
    assert_eq!(level.enemies().active_count(), 0);
    assert_eq!(level.bullets().active_count(), 0);
    // The clock still runs underneath.
    assert_abs_diff_eq!(level.elapsed(), 2.1, epsilon = 1e-3);
}

#[test]
fn play_resumes_after_the_announcement() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    past_announcement(&mut level, &mut rng);
    run(&mut level, 2.0, 0.1, Controls::default(), &mut rng);

    assert!(level.meteors().active_count() >= 1);
    assert!(level.enemies().active_count() >= 1);
    assert_eq!(level.stats().spawned, level.waves().spawned_in_wave());
}

#[test]
fn first_enemy_arrives_as_the_announcement_clears() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    level.update(0.1, &Controls::default(), &mut rng);
    assert!(level.announcement().is_some());

    while level.announcement().is_some() {
        level.update(0.1, &Controls::default(), &mut rng);
    }
    // The spawn cadence ran under the announcement, so the attempt is due.
    assert_eq!(level.enemies().active_count(), 1);
    assert_eq!(level.stats().spawned, 1);
}

#[test]
fn fire_is_edge_triggered_and_doubled_by_the_buff() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    past_announcement(&mut level, &mut rng);

    level.update(0.01, &FIRE, &mut rng);
    assert_eq!(level.bullets().active_count(), 1);
    level.update(0.01, &FIRE, &mut rng); // still held
    assert_eq!(level.bullets().active_count(), 1);

    level.apply_power_up(PowerUpKind::DoubleFire);
    level.update(0.01, &Controls::default(), &mut rng);
    level.update(0.01, &FIRE, &mut rng);
    assert_eq!(level.bullets().active_count(), 3);
}

#[test]
fn continued_clock_starts_from_carried_time() {
    let mut rng = seeded_rng();
    let mut level = Level::new(LevelConfig::level_two());
    level.continue_timer(42.0);
    level.update(1.0, &Controls::default(), &mut rng);
    assert_abs_diff_eq!(level.elapsed(), 43.0, epsilon = 1e-4);
}

#[test]
fn reset_restores_a_fresh_level() {
    let mut rng = seeded_rng();
    let mut level = level_one();
    level.apply_power_up(PowerUpKind::ScoreBoost);
    level.lose_life();
    run(&mut level, 1.0, 0.1, FIRE, &mut rng);

    level.reset();
    assert_eq!(level.score(), 0);
    assert_eq!(level.lives(), PLAYER_LIVES);
    assert_eq!(level.elapsed(), 0.0);
    assert!(!level.is_timer_running());
    assert!(level.announcement().is_none());
}
