/// Enemy ships.
///
/// `Enemy` is the common contract (spawn, update, take damage, shoot); the
/// variant structs carry the type-specific movement and fire patterns.
/// Spawn/kill statistics are not global: the owning level passes its
/// [`EnemyStats`] into the calls that change them.

use crate::config::*;
use crate::entities::{EnemyBullet, Rect, Vec2};
use crate::pool::{Pool, Poolable};
use crate::timer::Stopwatch;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyStats {
    pub spawned: u32,
    pub destroyed: u32,
}

// ── Movement patterns ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MovementPattern {
    /// Straight descent.
    #[default]
    Straight,
    /// Descent with a sinusoidal horizontal weave.
    Weave,
    /// Descent with 1 s segments cycling left, pause, right, pause.
    ZigZag,
}

impl MovementPattern {
    /// Horizontal velocity at pattern time `t` (seconds since spawn).
    pub fn horizontal_velocity(self, t: f32) -> f32 {
        match self {
            MovementPattern::Straight => 0.0,
            MovementPattern::Weave => (t * WEAVE_FREQUENCY).sin() * WEAVE_SPEED,
            MovementPattern::ZigZag => match ((t / ZIGZAG_SEGMENT) as u32) % 4 {
                0 => -ZIGZAG_SPEED,
                2 => ZIGZAG_SPEED,
                _ => 0.0,
            },
        }
    }
}

// ── Basic enemy ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicEnemy {
    pub pos: Vec2,
    pub speed: f32,
    pub pattern: MovementPattern,
    health: i32,
    active: bool,
    pattern_clock: f32,
    shoot_timer: Stopwatch,
}

impl BasicEnemy {
    pub fn new(speed: f32, pattern: MovementPattern) -> Self {
        Self {
            speed,
            pattern,
            ..Self::default()
        }
    }

    fn spawn(&mut self, x: f32, y: f32) {
        self.active = true;
        self.health = 1;
        self.pos = Vec2::new(x, y);
        self.pattern_clock = 0.0;
        self.shoot_timer.restart();
    }

    fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let vx = self.pattern.horizontal_velocity(self.pattern_clock);
        self.pos.x += vx * dt;
        self.pos.y += self.speed * dt;
        self.pattern_clock += dt;
        self.shoot_timer.tick(dt);

        let p = self.pos;
        if p.y > SCREEN_HEIGHT + 50.0 || p.x < -100.0 || p.x > SCREEN_WIDTH + 100.0 {
            self.active = false;
        }
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthTier {
    Healthy,
    Wounded,
    Critical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossEnemy {
    pub pos: Vec2,
    /// Signed horizontal speed.
    pub velocity: f32,
    health: i32,
    max_health: i32,
    active: bool,
    shoot_timer: Stopwatch,
}

impl Default for BossEnemy {
    fn default() -> Self {
        Self {
            pos: Vec2::default(),
            velocity: BOSS_SPEED,
            health: BOSS_HEALTH,
            max_health: BOSS_HEALTH,
            active: false,
            shoot_timer: Stopwatch::new(),
        }
    }
}

impl BossEnemy {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn(&mut self, x: f32, y: f32) {
        self.active = true;
        self.health = self.max_health;
        self.pos = Vec2::new(x, y);
        self.shoot_timer.restart();
    }

    /// Patrol between the two x bounds, turning back on contact.
    fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos.x += self.velocity * dt;
        if self.pos.x < BOSS_PATROL_MARGIN {
            self.velocity = self.velocity.abs();
        } else if self.pos.x > SCREEN_WIDTH - BOSS_PATROL_MARGIN {
            self.velocity = -self.velocity.abs();
        }
        self.shoot_timer.tick(dt);
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health.max(0) as f32) / (self.max_health as f32)
    }

    /// Colour band of the health bar.
    pub fn health_tier(&self) -> HealthTier {
        let f = self.health_fraction();
        if f > 0.6 {
            HealthTier::Healthy
        } else if f > 0.3 {
            HealthTier::Wounded
        } else {
            HealthTier::Critical
        }
    }
}

// ── Common contract ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Enemy {
    Basic(BasicEnemy),
    Boss(BossEnemy),
}

impl Default for Enemy {
    fn default() -> Self {
        Enemy::Basic(BasicEnemy::default())
    }
}

impl Enemy {
    pub fn basic(speed: f32, pattern: MovementPattern) -> Self {
        Enemy::Basic(BasicEnemy::new(speed, pattern))
    }

    pub fn boss() -> Self {
        Enemy::Boss(BossEnemy::new())
    }

    /// Reset health and position, activate, and count the spawn.
    pub fn spawn(&mut self, x: f32, y: f32, stats: &mut EnemyStats) {
        match self {
            Enemy::Basic(e) => e.spawn(x, y),
            Enemy::Boss(b) => b.spawn(x, y),
        }
        stats.spawned += 1;
    }

    pub fn update(&mut self, dt: f32) {
        match self {
            Enemy::Basic(e) => e.update(dt),
            Enemy::Boss(b) => b.update(dt),
        }
    }

    /// One unit of damage.  Returns true when this hit destroyed the enemy.
    pub fn take_damage(&mut self, stats: &mut EnemyStats) -> bool {
        if !self.is_active() {
            return false;
        }
        let (health, active) = match self {
            Enemy::Basic(e) => (&mut e.health, &mut e.active),
            Enemy::Boss(b) => (&mut b.health, &mut b.active),
        };
        *health -= 1;
        if *health <= 0 {
            *active = false;
            stats.destroyed += 1;
            return true;
        }
        false
    }

    /// Fire-interval check; true at most once per interval.
    pub fn should_shoot(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        match self {
            Enemy::Basic(e) => e.shoot_timer.lap(ENEMY_SHOOT_INTERVAL),
            Enemy::Boss(b) => b.shoot_timer.lap(BOSS_SHOOT_INTERVAL),
        }
    }

    /// Fire into free enemy-bullet slots.  Returns the number of bullets fired;
    /// fewer than intended when the pool is exhausted.
    pub fn shoot(&self, bullets: &mut Pool<EnemyBullet>) -> usize {
        let pos = self.pos();
        match self {
            Enemy::Basic(_) => match bullets.acquire() {
                Some(b) => {
                    b.fire(pos.x, pos.y + ENEMY_MUZZLE_OFFSET);
                    1
                }
                None => 0,
            },
            Enemy::Boss(_) => {
                let mut fired = 0;
                while fired < 3 {
                    let Some(b) = bullets.acquire() else {
                        break;
                    };
                    let offset = (fired as f32 - 1.0) * BOSS_SPREAD;
                    b.fire(pos.x + offset, pos.y + BOSS_MUZZLE_OFFSET);
                    fired += 1;
                }
                fired
            }
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Enemy::Basic(e) => e.active,
            Enemy::Boss(b) => b.active,
        }
    }

    pub fn deactivate(&mut self) {
        match self {
            Enemy::Basic(e) => e.active = false,
            Enemy::Boss(b) => b.active = false,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Enemy::Basic(e) => e.pos,
            Enemy::Boss(b) => b.pos,
        }
    }

    pub fn health(&self) -> i32 {
        match self {
            Enemy::Basic(e) => e.health,
            Enemy::Boss(b) => b.health,
        }
    }

    pub fn bounds(&self) -> Rect {
        if !self.is_active() {
            return Rect::EMPTY;
        }
        match self {
            Enemy::Basic(e) => Rect::centered(e.pos, ENEMY_SIZE),
            Enemy::Boss(b) => Rect::centered(b.pos, BOSS_SIZE),
        }
    }

    pub fn as_boss(&self) -> Option<&BossEnemy> {
        match self {
            Enemy::Boss(b) => Some(b),
            Enemy::Basic(_) => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Enemy::Boss(_))
    }
}

impl Poolable for Enemy {
    fn is_active(&self) -> bool {
        Enemy::is_active(self)
    }
    fn activate(&mut self) {
        match self {
            Enemy::Basic(e) => e.active = true,
            Enemy::Boss(b) => b.active = true,
        }
    }
    fn deactivate(&mut self) {
        Enemy::deactivate(self);
    }
}
