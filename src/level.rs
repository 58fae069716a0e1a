/// One playable level: the player, every entity pool, the wave scheduler and
/// the level's score and clock.
///
/// `update` runs one frame in a fixed order:
///
/// 1. session clock
/// 2. wave announcement (freezes everything below while it is up, except
///    the enemy spawn cadence)
/// 3. destroyed player: only bullets and meteors keep moving
/// 4. steering, edge-triggered fire, bullets
/// 5. meteor and power-up spawning and movement, buff timers
/// 6. bullets × meteors, player × meteors, player × power-ups
/// 7. wave scheduling, enemy spawning, enemy movement and fire
/// 8. bullets × boss, bullets × enemies, player × enemy bullets

use rand::Rng;

use crate::collision;
use crate::config::*;
use crate::enemy::{Enemy, EnemyStats};
use crate::entities::{Bullet, Controls, EnemyBullet, Meteor, Player, PowerUp, PowerUpKind};
use crate::narrative::Banner;
use crate::pool::Pool;
use crate::timer::Stopwatch;
use crate::wave::{SpawnRequest, WaveEvent, WaveScheduler};

// ── Buffs ─────────────────────────────────────────────────────────────────────

/// Remaining seconds of each timed power-up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Buffs {
    pub double_fire: f32,
    pub shield: f32,
}

impl Buffs {
    fn tick(&mut self, dt: f32) {
        self.double_fire = (self.double_fire - dt).max(0.0);
        self.shield = (self.shield - dt).max(0.0);
    }

    pub fn has_double_fire(&self) -> bool {
        self.double_fire > 0.0
    }

    pub fn is_shielded(&self) -> bool {
        self.shield > 0.0
    }
}

// ── Level ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Level {
    config: LevelConfig,
    player: Player,
    bullets: Pool<Bullet>,
    enemy_bullets: Pool<EnemyBullet>,
    meteors: Pool<Meteor>,
    power_ups: Pool<PowerUp>,
    enemies: Pool<Enemy>,
    boss: Option<Enemy>,
    waves: WaveScheduler,
    stats: EnemyStats,
    score: u32,
    score_offset: u32,
    buffs: Buffs,
    pickup_flash: f32,
    announcement: Option<Banner>,
    meteor_timer: Stopwatch,
    power_up_timer: Stopwatch,
    fire_was_held: bool,
    destroyed: bool,
    clock: Stopwatch,
    timer_running: bool,
}

impl Level {
    pub fn new(config: LevelConfig) -> Self {
        Self {
            player: Player::new(config.player_speed),
            bullets: Pool::new(MAX_PLAYER_BULLETS),
            enemy_bullets: Pool::new(MAX_ENEMY_BULLETS),
            meteors: Pool::new(MAX_METEORS),
            power_ups: Pool::new(MAX_POWER_UPS),
            enemies: Pool::new(MAX_ENEMIES),
            boss: None,
            waves: WaveScheduler::new(&config),
            stats: EnemyStats::default(),
            score: 0,
            score_offset: 0,
            buffs: Buffs::default(),
            pickup_flash: 0.0,
            announcement: None,
            meteor_timer: Stopwatch::new(),
            power_up_timer: Stopwatch::new(),
            fire_was_held: false,
            destroyed: false,
            clock: Stopwatch::new(),
            timer_running: false,
            config,
        }
    }

    /// Back to a fresh level with the same configuration.  The clock is not
    /// started.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Restart the clock from zero and let it run.
    pub fn start_timer(&mut self) {
        self.clock.restart();
        self.timer_running = true;
    }

    /// Let the clock run on from `from` seconds, carrying time over from the
    /// previous level.
    pub fn continue_timer(&mut self, from: f32) {
        self.clock = Stopwatch::starting_at(from);
        self.timer_running = true;
    }

    /// Points earned before this level, shown on the HUD but not part of
    /// [`Level::score`].
    pub fn set_score_offset(&mut self, offset: u32) {
        self.score_offset = offset;
    }

    pub fn stop_timer(&mut self) {
        self.timer_running = false;
    }

    pub fn update(&mut self, dt: f32, controls: &Controls, rng: &mut impl Rng) {
        if self.timer_running {
            self.clock.tick(dt);
        }

        if let Some(banner) = &mut self.announcement {
            banner.update(dt);
            if !banner.is_expired() {
                self.waves.tick_spawn_clock(dt);
                return;
            }
            self.announcement = None;
        }

        if self.destroyed {
            self.bullets.iter_mut().for_each(|b| b.update(dt));
            self.meteors.iter_mut().for_each(|m| m.update(dt));
            return;
        }

        self.player.steer(controls, dt);
        if controls.fire && !self.fire_was_held {
            self.fire();
        }
        self.fire_was_held = controls.fire;
        self.bullets.iter_mut().for_each(|b| b.update(dt));

        self.meteor_timer.tick(dt);
        if self.meteor_timer.reached(self.config.meteor_spawn_interval) {
            if let Some(meteor) = self.meteors.acquire() {
                meteor.spawn(SCREEN_WIDTH, rng);
                self.meteor_timer.restart();
            }
        }
        self.meteors.iter_mut().for_each(|m| m.update(dt));

        self.power_up_timer.tick(dt);
        if self.power_up_timer.reached(POWER_UP_SPAWN_INTERVAL) {
            if let Some(power_up) = self.power_ups.acquire() {
                let x = rng.gen_range(POWER_UP_MARGIN..SCREEN_WIDTH - POWER_UP_MARGIN);
                power_up.spawn(x, PowerUpKind::random(rng));
                self.power_up_timer.restart();
            }
        }
        self.power_ups.iter_mut().for_each(|p| p.update(dt));

        self.buffs.tick(dt);
        self.pickup_flash = (self.pickup_flash - dt).max(0.0);

        self.score += collision::bullets_vs_meteors(&mut self.bullets, &mut self.meteors);
        if !self.buffs.is_shielded() && collision::player_vs_meteors(self.player.bounds(), &mut self.meteors) {
            self.lose_life();
        }
        if !self.destroyed {
            for kind in collision::player_vs_power_ups(self.player.bounds(), &mut self.power_ups) {
                self.apply_power_up(kind);
            }
        }

        self.spawn_enemies(dt, rng);
        self.update_enemies(dt);
        self.enemy_bullets.iter_mut().for_each(|b| b.update(dt));

        if let Some(boss) = &mut self.boss {
            self.score += collision::bullets_vs_boss(&mut self.bullets, boss, &mut self.stats);
        }
        self.score += collision::bullets_vs_enemies(&mut self.bullets, &mut self.enemies, &mut self.stats);
        if !self.destroyed
            && !self.buffs.is_shielded()
            && collision::player_vs_enemy_bullets(self.player.bounds(), &mut self.enemy_bullets)
        {
            self.lose_life();
        }
    }

    fn fire(&mut self) {
        let sides: &[f32] = if self.buffs.has_double_fire() {
            &[-DOUBLE_FIRE_SIDE_OFFSET, DOUBLE_FIRE_SIDE_OFFSET]
        } else {
            &[0.0]
        };
        for &side in sides {
            let Some(bullet) = self.bullets.acquire() else {
                break;
            };
            bullet.fire(self.player.muzzle(side), self.player.tilt);
        }
    }

    fn spawn_enemies(&mut self, dt: f32, rng: &mut impl Rng) {
        let active = self.active_enemy_count();
        if let Some(WaveEvent::Started { wave, boss, .. }) = self.waves.update(dt, active, rng) {
            let text = if boss {
                "BOSS INCOMING!".to_string()
            } else {
                format!("WAVE {wave} INCOMING!")
            };
            self.announcement = Some(Banner::new(text, WAVE_ANNOUNCEMENT_TIME));
        }

        let slot_available = if self.waves.is_boss_wave() {
            self.boss.is_none()
        } else {
            self.enemies.inactive_count() > 0
        };
        match self.waves.poll_spawn(slot_available, rng) {
            Some(SpawnRequest::Basic { pos, speed, pattern }) => {
                if let Some(slot) = self.enemies.acquire() {
                    *slot = Enemy::basic(speed, pattern);
                    slot.spawn(pos.x, pos.y, &mut self.stats);
                }
            }
            Some(SpawnRequest::Boss { pos }) => {
                let mut boss = Enemy::boss();
                boss.spawn(pos.x, pos.y, &mut self.stats);
                log::info!("boss spawned");
                self.boss = Some(boss);
            }
            None => {}
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        for enemy in self.enemies.iter_mut().chain(self.boss.iter_mut()) {
            if !enemy.is_active() {
                continue;
            }
            enemy.update(dt);
            if enemy.should_shoot() {
                enemy.shoot(&mut self.enemy_bullets);
            }
        }
    }

    /// Take one life.  The last one destroys the ship and stops the clock;
    /// otherwise the ship goes back to its spawn point.
    pub fn lose_life(&mut self) {
        if self.destroyed {
            return;
        }
        self.player.lives = self.player.lives.saturating_sub(1);
        if self.player.lives == 0 {
            self.destroyed = true;
            self.stop_timer();
            log::info!("player destroyed with score {}", self.score);
        } else {
            self.player.respawn();
            log::debug!("life lost, {} left", self.player.lives);
        }
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::DoubleFire => self.buffs.double_fire = BUFF_DURATION,
            PowerUpKind::Shield => self.buffs.shield = BUFF_DURATION,
            PowerUpKind::Heal => {
                if self.player.lives < PLAYER_LIVES {
                    self.player.lives += 1;
                }
            }
            PowerUpKind::ScoreBoost => self.score += SCORE_BOOST_POINTS,
        }
        self.pickup_flash = PICKUP_FLASH_TIME;
        log::debug!("picked up {kind:?}");
    }

    fn active_enemy_count(&self) -> usize {
        let boss = self.boss.as_ref().map_or(0, |b| usize::from(b.is_active()));
        self.enemies.active_count() + boss
    }

    // ── Outcome ──────────────────────────────────────────────────────────────

    pub fn is_player_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_boss_defeated(&self) -> bool {
        self.waves.is_boss_wave() && self.boss.as_ref().map_or(false, |b| !b.is_active())
    }

    pub fn target_score(&self) -> u32 {
        self.config.target_score()
    }

    /// The level's win condition: the boss on a boss track, the target score
    /// everywhere else.
    pub fn is_complete(&self) -> bool {
        if self.destroyed {
            return false;
        }
        if self.config.has_boss() {
            self.is_boss_defeated()
        } else {
            self.score >= self.target_score()
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Points earned in this level alone.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Run score for the HUD: carried points plus this level's.
    pub fn display_score(&self) -> u32 {
        self.score_offset + self.score
    }

    /// Seconds on the level clock.
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn buffs(&self) -> &Buffs {
        &self.buffs
    }

    /// Seconds left on the pickup flash.
    pub fn pickup_flash(&self) -> f32 {
        self.pickup_flash
    }

    pub fn announcement(&self) -> Option<&Banner> {
        self.announcement.as_ref()
    }

    pub fn bullets(&self) -> &Pool<Bullet> {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &Pool<EnemyBullet> {
        &self.enemy_bullets
    }

    pub fn meteors(&self) -> &Pool<Meteor> {
        &self.meteors
    }

    pub fn power_ups(&self) -> &Pool<PowerUp> {
        &self.power_ups
    }

    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.boss.as_ref()
    }

    pub fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    pub fn stats(&self) -> EnemyStats {
        self.stats
    }
}
