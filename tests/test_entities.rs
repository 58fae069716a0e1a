use approx::assert_abs_diff_eq;
use galaxy_wars::config::*;
use galaxy_wars::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_overlap_is_strict() {
    let a = Rect { left: 0.0, top: 0.0, width: 10.0, height: 10.0 };
    let touching = Rect { left: 10.0, top: 0.0, width: 10.0, height: 10.0 };
    let overlapping = Rect { left: 9.0, top: 9.0, width: 10.0, height: 10.0 };
    assert!(!a.intersects(&touching));
    assert!(a.intersects(&overlapping));
    assert!(overlapping.intersects(&a));
}

#[test]
fn empty_rect_intersects_nothing() {
    let a = Rect { left: 0.0, top: 0.0, width: 10.0, height: 10.0 };
    assert!(!Rect::EMPTY.intersects(&a));
    assert!(!a.intersects(&Rect::EMPTY));
}

#[test]
fn centered_rect_surrounds_point() {
    let r = Rect::centered(Vec2::new(100.0, 50.0), (20.0, 10.0));
    assert_eq!(r.left, 90.0);
    assert_eq!(r.top, 45.0);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_starts_at_spawn_point_with_three_lives() {
    let p = Player::new(450.0);
    assert_eq!(p.pos, Vec2::new(960.0, 830.0));
    assert_eq!(p.lives, 3);
    assert_eq!(p.tilt, 0.0);
}

#[test]
fn player_is_clamped_to_edge_margin() {
    let mut p = Player::new(450.0);
    let left_up = Controls { left: true, up: true, ..Controls::default() };
    p.steer(&left_up, 10.0);
    assert_eq!(p.pos.x, PLAYER_EDGE_MARGIN);
    assert_eq!(p.pos.y, PLAYER_EDGE_MARGIN);

    let right_down = Controls { right: true, down: true, ..Controls::default() };
    p.steer(&right_down, 10.0);
    assert_eq!(p.pos.x, SCREEN_WIDTH - PLAYER_EDGE_MARGIN);
    assert_eq!(p.pos.y, SCREEN_HEIGHT - PLAYER_EDGE_MARGIN);
}

#[test]
fn player_tilt_is_capped_and_decays() {
    let mut p = Player::new(450.0);
    let right = Controls { right: true, ..Controls::default() };
    p.steer(&right, 1.0);
    assert_eq!(p.tilt, MAX_TILT);

    p.steer(&Controls::default(), 0.1);
    assert_abs_diff_eq!(p.tilt, MAX_TILT * TILT_DECAY, epsilon = 1e-4);
}

#[test]
fn respawn_levels_the_ship() {
    let mut p = Player::new(450.0);
    p.pos = Vec2::new(100.0, 100.0);
    p.tilt = 20.0;
    p.respawn();
    assert_eq!(p.pos, Player::spawn_point());
    assert_eq!(p.tilt, 0.0);
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn bullet_flies_straight_up_and_leaves() {
    let mut b = Bullet::default();
    b.fire(Vec2::new(100.0, 100.0), 0.0);
    b.update(0.1);
    assert_abs_diff_eq!(b.pos.y, 20.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.pos.x, 100.0, epsilon = 1e-3);
    assert!(b.is_active());

    b.update(0.1); // y = -60, past the 50 margin
    assert!(!b.is_active());
    assert!(b.bounds().is_empty());
}

#[test]
fn bullet_follows_its_rotation() {
    let mut b = Bullet::default();
    b.fire(Vec2::new(500.0, 500.0), 90.0);
    assert_abs_diff_eq!(b.dir.x, 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(b.dir.y, 0.0, epsilon = 1e-5);
    assert_eq!(b.damage, 1);
}

#[test]
fn deactivate_twice_is_harmless() {
    let mut b = Bullet::default();
    b.fire(Vec2::new(100.0, 100.0), 0.0);
    b.deactivate();
    let once = b.clone();
    b.deactivate();
    assert_eq!(b, once);
    assert!(!b.is_active());
    assert!(b.bounds().is_empty());
}

#[test]
fn enemy_bullet_falls_and_leaves() {
    let mut b = EnemyBullet::default();
    b.fire(10.0, SCREEN_HEIGHT);
    b.update(0.1); // +30
    assert!(b.is_active());
    b.update(0.1); // +60 > margin
    assert!(!b.is_active());
}

// ── Meteors ───────────────────────────────────────────────────────────────────

#[test]
fn meteor_explodes_once_then_retires() {
    let mut m = Meteor::default();
    m.launch(Vec2::new(300.0, 300.0), MeteorSize::Big, 150.0, 0.0);
    assert!(!m.bounds().is_empty());

    m.take_damage();
    assert!(m.is_exploding());
    assert!(m.bounds().is_empty());

    // A second hit does not restart the explosion.
    m.update(0.1);
    m.take_damage();
    assert_eq!(m.state, MeteorState::Exploding { remaining: METEOR_EXPLOSION_TIME - 0.1 });

    m.update(0.15);
    assert!(!m.is_active());
}

#[test]
fn meteor_falls_off_screen() {
    let mut m = Meteor::default();
    m.launch(Vec2::new(300.0, SCREEN_HEIGHT), MeteorSize::Small, 300.0, 0.0);
    m.update(0.5); // +150 > 100 margin
    assert!(!m.is_active());
}

#[test]
fn meteor_rotation_wraps() {
    let mut m = Meteor::default();
    m.launch(Vec2::new(300.0, 0.0), MeteorSize::Small, 0.0, 350.0);
    m.update(1.0);
    assert_abs_diff_eq!(m.rotation, 20.0, epsilon = 1e-3);
}

#[test]
fn random_meteor_respects_size_speed_bands() {
    let mut rng = seeded_rng();
    for _ in 0..100 {
        let mut m = Meteor::default();
        m.spawn(SCREEN_WIDTH, &mut rng);
        assert_eq!(m.pos.y, METEOR_SPAWN_Y);
        assert!(m.pos.x >= 0.0 && m.pos.x < SCREEN_WIDTH);
        match m.size {
            MeteorSize::Big => assert!((150.0..200.0).contains(&m.speed)),
            MeteorSize::Small => assert!((250.0..350.0).contains(&m.speed)),
        }
    }
}

#[test]
fn meteor_points_by_size() {
    assert_eq!(MeteorSize::Big.points(), 20);
    assert_eq!(MeteorSize::Small.points(), 10);
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn power_up_falls_from_above() {
    let mut p = PowerUp::default();
    p.spawn(400.0, PowerUpKind::Shield);
    assert_eq!(p.pos, Vec2::new(400.0, POWER_UP_SPAWN_Y));
    p.update(1.0);
    assert_abs_diff_eq!(p.pos.y, POWER_UP_SPAWN_Y + POWER_UP_SPEED, epsilon = 1e-3);
    assert_eq!(p.kind, PowerUpKind::Shield);
}

#[test]
fn random_power_up_covers_every_kind() {
    let mut rng = seeded_rng();
    let seen: Vec<PowerUpKind> = (0..200).map(|_| PowerUpKind::random(&mut rng)).collect();
    for kind in PowerUpKind::ALL {
        assert!(seen.contains(&kind), "{kind:?} never rolled");
    }
}
