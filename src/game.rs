/// Top-level scene machine: menus, narration, the three levels and the
/// end-of-run bookkeeping.
///
/// The front end feeds it one-shot [`Command`]s as keys are pressed and calls
/// [`Game::update`] once per frame with the held-key [`Controls`].  Only the
/// active scene advances, so a paused level or an open menu freezes every
/// gameplay clock.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::entities::Controls;
use crate::highscore::{HighScoreEntry, HighScoreStore, HighScoreTable};
use crate::level::Level;
use crate::narrative::{Banner, Narration, INTRO, LEVEL_TRANSITION, VICTORY_STORY};

pub const LEVEL_BANNER_TIME: f32 = 2.5;
pub const MAX_NAME_LEN: usize = 15;
pub const DEFAULT_PLAYER_NAME: &str = "Player";
pub const HIGH_SCORE_ROWS: usize = 10;

// ── Identifiers ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelId {
    One,
    Two,
    Three,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::One, LevelId::Two, LevelId::Three];

    pub fn index(self) -> usize {
        match self {
            LevelId::One => 0,
            LevelId::Two => 1,
            LevelId::Three => 2,
        }
    }

    pub fn next(self) -> Option<LevelId> {
        match self {
            LevelId::One => Some(LevelId::Two),
            LevelId::Two => Some(LevelId::Three),
            LevelId::Three => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LevelId::One => "Level 1",
            LevelId::Two => "Level 2",
            LevelId::Three => "Boss Level",
        }
    }

    /// Text shown before the level starts.  The first level opens with the
    /// intro instead.
    pub fn banner_text(self) -> &'static str {
        match self {
            LevelId::One => "LEVEL 1",
            LevelId::Two => "LEVEL 2 STARTED",
            LevelId::Three => "LEVEL 3 - BOSS FIGHT",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShipColor {
    #[default]
    Red,
    Blue,
    Green,
    Orange,
}

impl ShipColor {
    pub const ALL: [ShipColor; 4] = [ShipColor::Red, ShipColor::Blue, ShipColor::Green, ShipColor::Orange];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    MainMenu,
    NameEntry,
    ShipSelect,
    Intro,
    Playing(LevelId),
    EndScreen { victory: bool },
    /// Narrated hand-over into the given level.
    Transition(LevelId),
    LevelBanner(LevelId),
    HighScores,
    VictoryStory,
    LevelPicker,
    Credits,
}

/// Discrete input, one per key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Pause,
    Backspace,
    Char(char),
}

// ── Menus ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainMenuItem {
    Start,
    HighScores,
    SelectLevel,
    Exit,
    Credits,
}

impl MainMenuItem {
    pub const ALL: [MainMenuItem; 5] = [
        MainMenuItem::Start,
        MainMenuItem::HighScores,
        MainMenuItem::SelectLevel,
        MainMenuItem::Exit,
        MainMenuItem::Credits,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainMenuItem::Start => "Start Game",
            MainMenuItem::HighScores => "High Scores",
            MainMenuItem::SelectLevel => "Select Level",
            MainMenuItem::Exit => "Exit",
            MainMenuItem::Credits => "Credits",
        }
    }
}

/// Entries of the pause menu and the end screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunAction {
    Resume,
    Restart,
    MainMenu,
    Exit,
}

impl RunAction {
    pub const PAUSE: [RunAction; 4] = [RunAction::Resume, RunAction::Restart, RunAction::MainMenu, RunAction::Exit];
    pub const END: [RunAction; 3] = [RunAction::Restart, RunAction::MainMenu, RunAction::Exit];

    pub fn label(self) -> &'static str {
        match self {
            RunAction::Resume => "Resume",
            RunAction::Restart => "Restart",
            RunAction::MainMenu => "Main Menu",
            RunAction::Exit => "Exit",
        }
    }
}

/// Vertical list with a wrapping cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu<T: 'static> {
    items: &'static [T],
    selected: usize,
}

impl<T: Copy> Menu<T> {
    pub fn new(items: &'static [T]) -> Self {
        Self { items, selected: 0 }
    }

    pub fn up(&mut self) {
        let n = self.items.len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    pub fn down(&mut self) {
        let n = self.items.len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
    }

    pub fn selected(&self) -> Option<T> {
        self.items.get(self.selected).copied()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn items(&self) -> &'static [T] {
        self.items
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// State of one run across levels.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Sum of the final scores of every level finished this run.
    pub total_score: u32,
    /// Run clock in seconds at the end of the last finished level.
    pub total_time: f32,
    pub player_name: String,
    pub ship: ShipColor,
    /// `None` plays the full campaign.
    pub selected_level: Option<LevelId>,
    pub score_saved: bool,
    pub paused: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            total_score: 0,
            total_time: 0.0,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            ship: ShipColor::default(),
            selected_level: None,
            score_saved: false,
            paused: false,
        }
    }
}

impl Session {
    /// Clear run results, keeping who is playing and what they picked.
    fn restart_run(&mut self) {
        self.total_score = 0;
        self.total_time = 0.0;
        self.score_saved = false;
        self.paused = false;
    }
}

// ── Game ──────────────────────────────────────────────────────────────────────

pub struct Game {
    scene: Scene,
    session: Session,
    levels: [Level; 3],
    rng: StdRng,
    main_menu: Menu<MainMenuItem>,
    pause_menu: Menu<RunAction>,
    end_menu: Menu<RunAction>,
    ship_menu: Menu<ShipColor>,
    level_menu: Menu<LevelId>,
    name_input: String,
    narration: Narration,
    banner: Option<Banner>,
    store: HighScoreStore,
    high_scores: HighScoreTable,
    high_score_scroll: usize,
    should_quit: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build with a caller-supplied RNG, for reproducible runs.
    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let levels = [
            Level::new(config.level1.clone()),
            Level::new(config.level2.clone()),
            Level::new(config.level3.clone()),
        ];
        Self {
            scene: Scene::MainMenu,
            session: Session::default(),
            levels,
            rng,
            main_menu: Menu::new(&MainMenuItem::ALL),
            pause_menu: Menu::new(&RunAction::PAUSE),
            end_menu: Menu::new(&RunAction::END),
            ship_menu: Menu::new(&ShipColor::ALL),
            level_menu: Menu::new(&LevelId::ALL),
            name_input: String::new(),
            narration: Narration::new(INTRO),
            banner: None,
            store: HighScoreStore::new(config.high_score_path),
            high_scores: HighScoreTable::new(),
            high_score_scroll: 0,
            should_quit: false,
        }
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn handle_command(&mut self, command: Command) {
        match self.scene {
            Scene::MainMenu => self.main_menu_command(command),
            Scene::LevelPicker => match command {
                Command::Up => self.level_menu.up(),
                Command::Down => self.level_menu.down(),
                Command::Confirm => {
                    self.session.selected_level = self.level_menu.selected();
                    self.open_name_entry();
                }
                Command::Back => self.go_to_main_menu(),
                _ => {}
            },
            Scene::NameEntry => self.name_entry_command(command),
            Scene::ShipSelect => match command {
                Command::Up | Command::Left => self.ship_menu.up(),
                Command::Down | Command::Right => self.ship_menu.down(),
                Command::Confirm => {
                    self.session.ship = self.ship_menu.selected().unwrap_or_default();
                    self.start_run();
                }
                Command::Back => self.scene = Scene::NameEntry,
                _ => {}
            },
            Scene::Intro | Scene::Transition(_) | Scene::VictoryStory => self.narration.skip(),
            Scene::LevelBanner(id) => self.enter_playing(id),
            Scene::Playing(id) => self.playing_command(id, command),
            Scene::EndScreen { .. } => match command {
                Command::Up => self.end_menu.up(),
                Command::Down => self.end_menu.down(),
                Command::Confirm => {
                    if let Some(action) = self.end_menu.selected() {
                        self.run_action(action);
                    }
                }
                _ => {}
            },
            Scene::HighScores => match command {
                Command::Up => self.high_score_scroll = self.high_score_scroll.saturating_sub(1),
                Command::Down => {
                    let max = self.high_scores.len().saturating_sub(HIGH_SCORE_ROWS);
                    self.high_score_scroll = (self.high_score_scroll + 1).min(max);
                }
                Command::Back => self.go_to_main_menu(),
                _ => {}
            },
            Scene::Credits => {
                if command == Command::Back {
                    self.go_to_main_menu();
                }
            }
        }
    }

    fn main_menu_command(&mut self, command: Command) {
        match command {
            Command::Up => self.main_menu.up(),
            Command::Down => self.main_menu.down(),
            Command::Confirm => match self.main_menu.selected() {
                Some(MainMenuItem::Start) => {
                    self.session.selected_level = None;
                    self.open_name_entry();
                }
                Some(MainMenuItem::HighScores) => self.open_high_scores(),
                Some(MainMenuItem::SelectLevel) => {
                    self.level_menu.reset();
                    self.scene = Scene::LevelPicker;
                }
                Some(MainMenuItem::Exit) => self.should_quit = true,
                Some(MainMenuItem::Credits) => self.scene = Scene::Credits,
                None => {}
            },
            _ => {}
        }
    }

    fn name_entry_command(&mut self, command: Command) {
        match command {
            Command::Char(c) if c.is_ascii_alphanumeric() || c == ' ' => {
                if self.name_input.chars().count() < MAX_NAME_LEN {
                    self.name_input.push(c);
                }
            }
            Command::Backspace => {
                self.name_input.pop();
            }
            Command::Confirm => {
                let name = self.name_input.trim();
                if !name.is_empty() {
                    self.session.player_name = name.to_string();
                    self.ship_menu.reset();
                    self.scene = Scene::ShipSelect;
                }
            }
            Command::Back => self.go_to_main_menu(),
            _ => {}
        }
    }

    fn playing_command(&mut self, id: LevelId, command: Command) {
        let command = match command {
            Command::Char('p' | 'P') => Command::Pause,
            other => other,
        };
        if self.session.paused {
            match command {
                Command::Up => self.pause_menu.up(),
                Command::Down => self.pause_menu.down(),
                Command::Confirm => {
                    if let Some(action) = self.pause_menu.selected() {
                        self.run_action(action);
                    }
                }
                Command::Pause => self.session.paused = false,
                _ => {}
            }
            return;
        }
        match command {
            Command::Pause if !self.level(id).is_player_destroyed() => {
                self.session.paused = true;
                self.pause_menu.reset();
            }
            Command::Back => self.go_to_main_menu(),
            _ => {}
        }
    }

    fn run_action(&mut self, action: RunAction) {
        match action {
            RunAction::Resume => self.session.paused = false,
            RunAction::Restart => {
                self.session.restart_run();
                self.ship_menu.reset();
                self.scene = Scene::ShipSelect;
            }
            RunAction::MainMenu => self.go_to_main_menu(),
            RunAction::Exit => self.should_quit = true,
        }
    }

    // ── Frame update ─────────────────────────────────────────────────────────

    pub fn update(&mut self, dt: f32, controls: &Controls) {
        match self.scene {
            Scene::Intro => {
                self.narration.update(dt);
                if self.narration.is_finished() {
                    let first = self.session.selected_level.unwrap_or(LevelId::One);
                    self.levels[first.index()].start_timer();
                    self.enter_playing(first);
                }
            }
            Scene::Transition(next) => {
                self.narration.update(dt);
                if self.narration.is_finished() {
                    let level = &mut self.levels[next.index()];
                    level.reset();
                    level.continue_timer(self.session.total_time);
                    level.set_score_offset(self.session.total_score);
                    self.show_banner(next);
                }
            }
            Scene::LevelBanner(id) => {
                if let Some(banner) = &mut self.banner {
                    banner.update(dt);
                    if !banner.is_expired() {
                        return;
                    }
                }
                self.enter_playing(id);
            }
            Scene::Playing(id) => self.update_playing(id, dt, controls),
            Scene::VictoryStory => {
                self.narration.update(dt);
                if self.narration.is_finished() {
                    self.finish_run(true);
                }
            }
            _ => {}
        }
    }

    fn update_playing(&mut self, id: LevelId, dt: f32, controls: &Controls) {
        if self.session.paused {
            return;
        }
        let level = &mut self.levels[id.index()];
        level.update(dt, controls, &mut self.rng);

        if level.is_player_destroyed() {
            self.record_level(id);
            self.finish_run(false);
        } else if level.is_complete() {
            self.record_level(id);
            log::info!("{} complete, run score {}", id.label(), self.session.total_score);
            match id.next() {
                None => {
                    self.narration = Narration::new(VICTORY_STORY);
                    self.narration.start();
                    self.scene = Scene::VictoryStory;
                }
                Some(_) if self.session.selected_level == Some(id) => self.finish_run(true),
                Some(next) => {
                    self.narration = Narration::new(LEVEL_TRANSITION);
                    self.narration.start();
                    self.scene = Scene::Transition(next);
                }
            }
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    fn go_to_main_menu(&mut self) {
        self.session.paused = false;
        self.main_menu.reset();
        self.scene = Scene::MainMenu;
    }

    fn open_name_entry(&mut self) {
        self.name_input.clear();
        self.scene = Scene::NameEntry;
    }

    fn open_high_scores(&mut self) {
        self.high_scores = match self.store.load() {
            Ok(table) => table,
            Err(e) => {
                log::warn!("[{}] {e}", e.kind());
                HighScoreTable::new()
            }
        };
        self.high_score_scroll = 0;
        self.scene = Scene::HighScores;
    }

    /// Ship chosen: a full run or level 1 opens with the intro, later levels
    /// with their banner.
    fn start_run(&mut self) {
        self.session.restart_run();
        let first = self.session.selected_level.unwrap_or(LevelId::One);
        for level in &mut self.levels {
            level.reset();
        }
        log::info!("{} starts a run at {}", self.session.player_name, first.label());
        match first {
            LevelId::One => {
                self.narration = Narration::new(INTRO);
                self.narration.start();
                self.scene = Scene::Intro;
            }
            other => {
                self.levels[other.index()].start_timer();
                self.show_banner(other);
            }
        }
    }

    fn show_banner(&mut self, id: LevelId) {
        self.banner = Some(Banner::new(id.banner_text(), LEVEL_BANNER_TIME));
        self.scene = Scene::LevelBanner(id);
    }

    fn enter_playing(&mut self, id: LevelId) {
        self.banner = None;
        self.session.paused = false;
        self.scene = Scene::Playing(id);
    }

    /// Fold a finished level into the run totals and stop its clock.
    fn record_level(&mut self, id: LevelId) {
        let level = &mut self.levels[id.index()];
        level.stop_timer();
        self.session.total_score += level.score();
        self.session.total_time = level.elapsed();
    }

    fn finish_run(&mut self, victory: bool) {
        self.save_score();
        self.end_menu.reset();
        self.scene = Scene::EndScreen { victory };
    }

    /// Write the run to the high-score file, once per run.
    fn save_score(&mut self) {
        if self.session.score_saved {
            return;
        }
        self.session.score_saved = true;
        let entry = HighScoreEntry::new(
            self.session.player_name.clone(),
            self.session.total_score,
            self.session.total_time,
        );
        if let Err(e) = self.store.save(entry) {
            log::error!("[{}] could not save high score: {e}", e.kind());
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn level(&self, id: LevelId) -> &Level {
        &self.levels[id.index()]
    }

    pub fn level_mut(&mut self, id: LevelId) -> &mut Level {
        &mut self.levels[id.index()]
    }

    /// The level on screen, if any.
    pub fn current_level(&self) -> Option<&Level> {
        match self.scene {
            Scene::Playing(id) | Scene::LevelBanner(id) => Some(self.level(id)),
            _ => None,
        }
    }

    pub fn main_menu(&self) -> &Menu<MainMenuItem> {
        &self.main_menu
    }

    pub fn pause_menu(&self) -> &Menu<RunAction> {
        &self.pause_menu
    }

    pub fn end_menu(&self) -> &Menu<RunAction> {
        &self.end_menu
    }

    pub fn ship_menu(&self) -> &Menu<ShipColor> {
        &self.ship_menu
    }

    pub fn level_menu(&self) -> &Menu<LevelId> {
        &self.level_menu
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn narration(&self) -> &Narration {
        &self.narration
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    pub fn high_score_scroll(&self) -> usize {
        self.high_score_scroll
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
