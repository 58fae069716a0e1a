/// Moving game entities: the player ship, projectiles, meteors and power-ups.
///
/// Every pooled entity owns its `active` flag and reports an empty bounding
/// box while inactive, so stale slots never take part in collisions.

use rand::Rng;

use crate::config::*;
use crate::pool::Poolable;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn centered(center: Vec2, (width, height): (f32, f32)) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict overlap: rectangles that only share an edge do not intersect,
    /// and an empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = (self.left + self.width).min(other.left + other.width);
        let bottom = (self.top + self.height).min(other.top + other.height);
        left < right && top < bottom
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keys held during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Tilt in degrees; positive leans right.  Bullets fire along it.
    pub tilt: f32,
    pub lives: u32,
    pub speed: f32,
}

impl Player {
    pub fn new(speed: f32) -> Self {
        Self {
            pos: Self::spawn_point(),
            tilt: 0.0,
            lives: PLAYER_LIVES,
            speed,
        }
    }

    pub fn spawn_point() -> Vec2 {
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - PLAYER_SPAWN_LIFT)
    }

    /// Move back to the spawn point with a level ship.
    pub fn respawn(&mut self) {
        self.pos = Self::spawn_point();
        self.tilt = 0.0;
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, PLAYER_SIZE)
    }

    /// Apply held direction keys: move, clamp to the play area and tilt.
    pub fn steer(&mut self, controls: &Controls, dt: f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if controls.left {
            dx -= self.speed * dt;
        }
        if controls.right {
            dx += self.speed * dt;
        }
        if controls.up {
            dy -= self.speed * dt;
        }
        if controls.down {
            dy += self.speed * dt;
        }

        self.pos.x = (self.pos.x + dx).clamp(PLAYER_EDGE_MARGIN, SCREEN_WIDTH - PLAYER_EDGE_MARGIN);
        self.pos.y = (self.pos.y + dy).clamp(PLAYER_EDGE_MARGIN, SCREEN_HEIGHT - PLAYER_EDGE_MARGIN);

        if dx < 0.0 {
            self.tilt -= TILT_SPEED * dt;
        } else if dx > 0.0 {
            self.tilt += TILT_SPEED * dt;
        } else {
            self.tilt *= TILT_DECAY;
        }
        self.tilt = self.tilt.clamp(-MAX_TILT, MAX_TILT);
    }

    /// Muzzle position at the ship's nose, shifted sideways by `side`
    /// (perpendicular to the tilt).
    pub fn muzzle(&self, side: f32) -> Vec2 {
        let r = self.tilt.to_radians();
        let nose = PLAYER_SIZE.1 / 2.0;
        Vec2::new(
            self.pos.x + nose * r.sin() + side * r.cos(),
            self.pos.y - nose * r.cos() + side * r.sin(),
        )
    }
}

// ── Player bullets ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    /// Unit direction of travel.
    pub dir: Vec2,
    /// Heading in degrees, 0 = straight up.
    pub rotation: f32,
    pub damage: i32,
    active: bool,
}

impl Bullet {
    pub fn fire(&mut self, start: Vec2, rotation_degrees: f32) {
        let r = rotation_degrees.to_radians();
        self.active = true;
        self.pos = start;
        self.rotation = rotation_degrees;
        self.dir = Vec2::new(r.sin(), -r.cos());
        self.damage = 1;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos.x += self.dir.x * BULLET_SPEED * dt;
        self.pos.y += self.dir.y * BULLET_SPEED * dt;

        let p = self.pos;
        if p.y < -BULLET_MARGIN
            || p.y > SCREEN_HEIGHT + BULLET_MARGIN
            || p.x < -BULLET_MARGIN
            || p.x > SCREEN_WIDTH + BULLET_MARGIN
        {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn bounds(&self) -> Rect {
        if self.active {
            Rect::centered(self.pos, BULLET_SIZE)
        } else {
            Rect::EMPTY
        }
    }
}

impl Poolable for Bullet {
    fn is_active(&self) -> bool {
        self.active
    }
    fn activate(&mut self) {
        self.active = true;
    }
    fn deactivate(&mut self) {
        Bullet::deactivate(self);
    }
}

// ── Enemy bullets ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyBullet {
    pub pos: Vec2,
    active: bool,
}

impl EnemyBullet {
    pub fn fire(&mut self, x: f32, y: f32) {
        self.active = true;
        self.pos = Vec2::new(x, y);
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos.y += ENEMY_BULLET_SPEED * dt;
        if self.pos.y > SCREEN_HEIGHT + ENEMY_BULLET_MARGIN {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn bounds(&self) -> Rect {
        if self.active {
            Rect::centered(self.pos, BULLET_SIZE)
        } else {
            Rect::EMPTY
        }
    }
}

impl Poolable for EnemyBullet {
    fn is_active(&self) -> bool {
        self.active
    }
    fn activate(&mut self) {
        self.active = true;
    }
    fn deactivate(&mut self) {
        EnemyBullet::deactivate(self);
    }
}

// ── Meteors ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeteorSize {
    #[default]
    Small,
    Big,
}

impl MeteorSize {
    pub fn points(self) -> u32 {
        match self {
            MeteorSize::Small => METEOR_SMALL_POINTS,
            MeteorSize::Big => METEOR_BIG_POINTS,
        }
    }

    pub fn dimensions(self) -> (f32, f32) {
        match self {
            MeteorSize::Small => METEOR_SMALL_SIZE,
            MeteorSize::Big => METEOR_BIG_SIZE,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MeteorState {
    #[default]
    Inactive,
    Falling,
    /// Visual-only; the meteor no longer collides.
    Exploding { remaining: f32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Meteor {
    pub pos: Vec2,
    pub speed: f32,
    pub rotation: f32,
    pub size: MeteorSize,
    pub state: MeteorState,
}

impl Meteor {
    /// Drop a meteor of random size from a random x above the screen.
    pub fn spawn(&mut self, spawn_width: f32, rng: &mut impl Rng) {
        let x = rng.gen_range(0.0..spawn_width.max(1.0)).floor();
        let size = if rng.gen_bool(0.5) {
            MeteorSize::Big
        } else {
            MeteorSize::Small
        };
        let speed = match size {
            MeteorSize::Big => 150.0 + rng.gen_range(0..50) as f32,
            MeteorSize::Small => 250.0 + rng.gen_range(0..100) as f32,
        };
        let rotation = rng.gen_range(0..360) as f32;
        self.launch(Vec2::new(x, METEOR_SPAWN_Y), size, speed, rotation);
    }

    /// Deterministic spawn with every parameter supplied.
    pub fn launch(&mut self, pos: Vec2, size: MeteorSize, speed: f32, rotation: f32) {
        self.pos = pos;
        self.size = size;
        self.speed = speed;
        self.rotation = rotation;
        self.state = MeteorState::Falling;
    }

    /// First hit starts the explosion; later hits are ignored.
    pub fn take_damage(&mut self) {
        if self.state == MeteorState::Falling {
            self.state = MeteorState::Exploding {
                remaining: METEOR_EXPLOSION_TIME,
            };
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self.state {
            MeteorState::Inactive => {}
            MeteorState::Exploding { remaining } => {
                let remaining = remaining - dt;
                self.state = if remaining <= 0.0 {
                    MeteorState::Inactive
                } else {
                    MeteorState::Exploding { remaining }
                };
            }
            MeteorState::Falling => {
                self.pos.y += self.speed * dt;
                self.rotation = (self.rotation + METEOR_ROTATION_SPEED * dt) % 360.0;
                if self.pos.y > SCREEN_HEIGHT + METEOR_MARGIN {
                    self.state = MeteorState::Inactive;
                }
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != MeteorState::Inactive
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, MeteorState::Exploding { .. })
    }

    pub fn deactivate(&mut self) {
        self.state = MeteorState::Inactive;
    }

    pub fn bounds(&self) -> Rect {
        if self.state == MeteorState::Falling {
            Rect::centered(self.pos, self.size.dimensions())
        } else {
            Rect::EMPTY
        }
    }
}

impl Poolable for Meteor {
    fn is_active(&self) -> bool {
        Meteor::is_active(self)
    }
    fn activate(&mut self) {
        if self.state == MeteorState::Inactive {
            self.state = MeteorState::Falling;
        }
    }
    fn deactivate(&mut self) {
        Meteor::deactivate(self);
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Two bullets per shot for `BUFF_DURATION` seconds.
    #[default]
    DoubleFire,
    /// Immune to meteors and enemy bullets for `BUFF_DURATION` seconds.
    Shield,
    /// One extra life, only while below the starting count.
    Heal,
    /// Instant `SCORE_BOOST_POINTS`.
    ScoreBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::DoubleFire,
        PowerUpKind::Shield,
        PowerUpKind::Heal,
        PowerUpKind::ScoreBoost,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    active: bool,
}

impl PowerUp {
    pub fn spawn(&mut self, x: f32, kind: PowerUpKind) {
        self.active = true;
        self.kind = kind;
        self.pos = Vec2::new(x, POWER_UP_SPAWN_Y);
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos.y += POWER_UP_SPEED * dt;
        if self.pos.y > SCREEN_HEIGHT + POWER_UP_MARGIN {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn bounds(&self) -> Rect {
        if self.active {
            Rect::centered(self.pos, POWER_UP_SIZE)
        } else {
            Rect::EMPTY
        }
    }
}

impl Poolable for PowerUp {
    fn is_active(&self) -> bool {
        self.active
    }
    fn activate(&mut self) {
        self.active = true;
    }
    fn deactivate(&mut self) {
        PowerUp::deactivate(self);
    }
}
