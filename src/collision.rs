/// Pairwise AABB collision passes.
///
/// Each pass is a plain nested loop over active entities.  An outer element
/// resolves at most one collision per call: the first match in slot order
/// wins and the inner loop stops.  Passes report what happened (points earned,
/// whether the player was hit, which power-ups were collected) and leave
/// player-side consequences to the level.
///
/// Only the listed directions exist: bullets damage meteors and enemies, never
/// the reverse.

use crate::config::ENEMY_POINTS;
use crate::enemy::{Enemy, EnemyStats};
use crate::entities::{Bullet, EnemyBullet, Meteor, PowerUp, PowerUpKind, Rect};
use crate::pool::Pool;

/// Player bullets against falling meteors.  Returns points earned.
pub fn bullets_vs_meteors(bullets: &mut Pool<Bullet>, meteors: &mut Pool<Meteor>) -> u32 {
    let mut points = 0;
    for bullet in bullets.iter_mut().filter(|b| b.is_active()) {
        let bounds = bullet.bounds();
        if let Some(meteor) = meteors
            .iter_mut()
            .find(|m| m.is_active() && !m.is_exploding() && m.bounds().intersects(&bounds))
        {
            bullet.deactivate();
            meteor.take_damage();
            points += meteor.size.points();
        }
    }
    points
}

/// The player against falling meteors.  The first meteor touched explodes.
pub fn player_vs_meteors(player: Rect, meteors: &mut Pool<Meteor>) -> bool {
    match meteors
        .iter_mut()
        .find(|m| m.is_active() && !m.is_exploding() && m.bounds().intersects(&player))
    {
        Some(meteor) => {
            meteor.take_damage();
            true
        }
        None => false,
    }
}

/// The player against falling power-ups.  Every touched power-up is consumed.
pub fn player_vs_power_ups(player: Rect, power_ups: &mut Pool<PowerUp>) -> Vec<PowerUpKind> {
    let mut collected = Vec::new();
    for power_up in power_ups.iter_mut().filter(|p| p.is_active()) {
        if power_up.bounds().intersects(&player) {
            collected.push(power_up.kind);
            power_up.deactivate();
        }
    }
    collected
}

/// Player bullets against the boss.  The boss is the outer element, so at most
/// one bullet lands per call.  Returns points earned.
pub fn bullets_vs_boss(bullets: &mut Pool<Bullet>, boss: &mut Enemy, stats: &mut EnemyStats) -> u32 {
    if !boss.is_active() {
        return 0;
    }
    let bounds = boss.bounds();
    match bullets
        .iter_mut()
        .find(|b| b.is_active() && b.bounds().intersects(&bounds))
    {
        Some(bullet) => {
            bullet.deactivate();
            if boss.take_damage(stats) {
                log::info!("boss defeated");
            }
            ENEMY_POINTS
        }
        None => 0,
    }
}

/// Player bullets against regular enemies.  Returns points earned.
pub fn bullets_vs_enemies(bullets: &mut Pool<Bullet>, enemies: &mut Pool<Enemy>, stats: &mut EnemyStats) -> u32 {
    let mut points = 0;
    for bullet in bullets.iter_mut().filter(|b| b.is_active()) {
        let bounds = bullet.bounds();
        if let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.is_active() && e.bounds().intersects(&bounds))
        {
            enemy.take_damage(stats);
            bullet.deactivate();
            points += ENEMY_POINTS;
        }
    }
    points
}

/// The player against enemy bullets.  The first bullet touched is consumed.
pub fn player_vs_enemy_bullets(player: Rect, enemy_bullets: &mut Pool<EnemyBullet>) -> bool {
    match enemy_bullets
        .iter_mut()
        .find(|b| b.is_active() && b.bounds().intersects(&player))
    {
        Some(bullet) => {
            bullet.deactivate();
            true
        }
        None => false,
    }
}
