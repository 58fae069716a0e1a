/// Wave scheduling and enemy formations.
///
/// A level runs its waves in order.  Each wave spawns a target number of
/// enemies on a fixed cadence, then waits until every one of them is gone
/// before a delay gates the next wave:
///
/// ```text
/// Idle ──(first update)──▶ InProgress ──(all spawned, none active)──▶ Cleared
///                              ▲                                        │
///                              └────────────(WAVE_DELAY elapsed)────────┤
///                                                                       ▼
///                                                    Finished (after the last wave)
/// ```

use rand::Rng;

use crate::config::*;
use crate::enemy::MovementPattern;
use crate::entities::Vec2;
use crate::timer::Stopwatch;

// ── Formations ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationSlot {
    pub pos: Vec2,
    pub filled: bool,
}

/// Ordered spawn coordinates, handed out front to back, each at most once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Formation {
    slots: Vec<FormationSlot>,
}

impl Formation {
    fn from_positions(positions: impl IntoIterator<Item = Vec2>) -> Self {
        let slots = positions
            .into_iter()
            .take(MAX_FORMATION_SLOTS)
            .map(|pos| FormationSlot { pos, filled: false })
            .collect();
        Self { slots }
    }

    /// Two diagonal arms opening downward from `center_x`.  An odd enemy
    /// count leaves the last enemy to a random spawn.
    pub fn v_shape(center_x: f32, start_y: f32, enemy_count: usize) -> Self {
        let per_side = enemy_count / 2;
        Self::from_positions((0..per_side).flat_map(|i| {
            let dx = (i + 1) as f32 * FORMATION_SPACING;
            let y = start_y + i as f32 * FORMATION_SPACING;
            [Vec2::new(center_x - dx, y), Vec2::new(center_x + dx, y)]
        }))
    }

    /// Up to four rows of 1, 2, 3, 4 enemies, centred on `center_x`.
    pub fn triangle(center_x: f32, start_y: f32, enemy_count: usize) -> Self {
        let positions = (0..4usize)
            .flat_map(move |row| {
                let per_row = row + 1;
                (0..per_row).map(move |col| {
                    let offset = (col as f32 - (per_row as f32 - 1.0) / 2.0) * FORMATION_SPACING;
                    Vec2::new(center_x + offset, start_y + row as f32 * FORMATION_SPACING)
                })
            })
            .take(enemy_count);
        Self::from_positions(positions)
    }

    /// Claim the first unfilled slot.
    pub fn next_position(&mut self) -> Option<Vec2> {
        let slot = self.slots.iter_mut().find(|s| !s.filled)?;
        slot.filled = true;
        Some(slot.pos)
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.filled = false;
        }
    }

    pub fn slots(&self) -> &[FormationSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ── Wave plans ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormationKind {
    /// Random x along the top edge.
    #[default]
    Scatter,
    V,
    Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavePlan {
    pub enemies: u32,
    pub boss: bool,
    pub formation: FormationKind,
    pub pattern: MovementPattern,
}

impl WavePlan {
    fn scatter(enemies: u32) -> Self {
        Self {
            enemies,
            boss: false,
            formation: FormationKind::Scatter,
            pattern: MovementPattern::Straight,
        }
    }
}

/// Enemy count and layout for `wave` (1-based) of a level.
pub fn plan_wave(config: &LevelConfig, wave: u32, rng: &mut impl Rng) -> WavePlan {
    if config.has_boss() {
        return match wave {
            1 => WavePlan {
                enemies: 6 + rng.gen_range(0..2),
                boss: false,
                formation: FormationKind::V,
                pattern: MovementPattern::Weave,
            },
            2 => WavePlan {
                enemies: 8 + rng.gen_range(0..2),
                boss: false,
                formation: FormationKind::Triangle,
                pattern: MovementPattern::ZigZag,
            },
            _ => WavePlan {
                enemies: 1,
                boss: true,
                formation: FormationKind::Scatter,
                pattern: MovementPattern::Straight,
            },
        };
    }

    let enemies = match wave {
        1 => 5 + rng.gen_range(0..2),
        2 => 7 + rng.gen_range(0..2),
        3 => 10 + rng.gen_range(0..3),
        // Waves past the third keep growing by three.
        n => 10 + 3 * (n - 3) + rng.gen_range(0..3),
    };
    WavePlan::scatter(enemies)
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// Before the first wave.
    Idle,
    InProgress,
    /// Waiting out the inter-wave delay.
    Cleared,
    /// The last wave has been cleared.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaveEvent {
    Started { wave: u32, enemies: u32, boss: bool },
    Cleared { wave: u32 },
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnRequest {
    Basic {
        pos: Vec2,
        speed: f32,
        pattern: MovementPattern,
    },
    Boss {
        pos: Vec2,
    },
}

#[derive(Clone, Debug)]
pub struct WaveScheduler {
    config: LevelConfig,
    current_wave: u32,
    enemies_per_wave: u32,
    spawned_in_wave: u32,
    phase: WavePhase,
    plan: Option<WavePlan>,
    formation: Formation,
    spawn_timer: Stopwatch,
    delay_timer: Stopwatch,
}

impl WaveScheduler {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            config: config.clone(),
            current_wave: 0,
            enemies_per_wave: 0,
            spawned_in_wave: 0,
            phase: WavePhase::Idle,
            plan: None,
            formation: Formation::default(),
            spawn_timer: Stopwatch::new(),
            delay_timer: Stopwatch::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(&self.config);
    }

    /// Advance the phase machine.  `active_enemies` counts live enemies,
    /// boss included.
    pub fn update(&mut self, dt: f32, active_enemies: usize, rng: &mut impl Rng) -> Option<WaveEvent> {
        match self.phase {
            WavePhase::Idle => Some(self.start_wave(rng)),
            WavePhase::InProgress => {
                self.spawn_timer.tick(dt);
                if self.spawned_in_wave < self.enemies_per_wave || active_enemies > 0 {
                    return None;
                }
                log::info!("wave {} cleared", self.current_wave);
                if self.current_wave >= self.config.waves {
                    self.phase = WavePhase::Finished;
                    return Some(WaveEvent::Finished);
                }
                self.phase = WavePhase::Cleared;
                self.delay_timer.restart();
                Some(WaveEvent::Cleared { wave: self.current_wave })
            }
            WavePhase::Cleared => {
                self.delay_timer.tick(dt);
                if self.delay_timer.reached(WAVE_DELAY) {
                    Some(self.start_wave(rng))
                } else {
                    None
                }
            }
            WavePhase::Finished => None,
        }
    }

    /// Run the spawn cadence clock alone, without phase changes or spawns.
    /// Used while the wave announcement holds the level.
    pub fn tick_spawn_clock(&mut self, dt: f32) {
        if self.phase == WavePhase::InProgress {
            self.spawn_timer.tick(dt);
        }
    }

    fn start_wave(&mut self, rng: &mut impl Rng) -> WaveEvent {
        self.current_wave += 1;
        let plan = plan_wave(&self.config, self.current_wave, rng);
        self.enemies_per_wave = plan.enemies;
        self.spawned_in_wave = 0;
        self.phase = WavePhase::InProgress;
        self.formation = match plan.formation {
            FormationKind::Scatter => Formation::default(),
            FormationKind::V => Formation::v_shape(SCREEN_WIDTH * 0.5, FORMATION_START_Y, plan.enemies as usize),
            FormationKind::Triangle => {
                Formation::triangle(SCREEN_WIDTH * 0.5, FORMATION_START_Y, plan.enemies as usize)
            }
        };
        self.plan = Some(plan);
        self.spawn_timer.restart();

        if plan.boss {
            log::info!("boss wave {} started", self.current_wave);
        } else {
            log::info!("wave {} started with {} enemies", self.current_wave, plan.enemies);
        }
        WaveEvent::Started {
            wave: self.current_wave,
            enemies: plan.enemies,
            boss: plan.boss,
        }
    }

    /// One spawn attempt.  Yields a request when the cadence timer is due, the
    /// wave still owes enemies and the caller has a free slot; the request is
    /// counted and the timer re-armed.  Without a free slot the timer stays
    /// due and the attempt is simply dropped.
    pub fn poll_spawn(&mut self, slot_available: bool, rng: &mut impl Rng) -> Option<SpawnRequest> {
        if self.phase != WavePhase::InProgress
            || self.spawned_in_wave >= self.enemies_per_wave
            || !self.spawn_timer.reached(self.config.enemy_spawn_interval)
            || !slot_available
        {
            return None;
        }
        let plan = self.plan?;

        let request = if plan.boss {
            SpawnRequest::Boss {
                pos: Vec2::new(SCREEN_WIDTH * 0.5, BOSS_SPAWN_Y),
            }
        } else {
            let pos = self.formation.next_position().unwrap_or_else(|| {
                Vec2::new(rng.gen_range(0..SCREEN_WIDTH as u32) as f32, ENEMY_SPAWN_Y)
            });
            SpawnRequest::Basic {
                pos,
                speed: self.config.enemy_speed(),
                pattern: plan.pattern,
            }
        };

        self.spawned_in_wave += 1;
        self.spawn_timer.restart();
        Some(request)
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn max_waves(&self) -> u32 {
        self.config.waves
    }

    pub fn enemies_per_wave(&self) -> u32 {
        self.enemies_per_wave
    }

    pub fn spawned_in_wave(&self) -> u32 {
        self.spawned_in_wave
    }

    pub fn is_boss_wave(&self) -> bool {
        self.plan.map_or(false, |p| p.boss)
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }
}
