use crate::arena::Arena;
use crate::balloon::Balloon;
use crate::config;
use crate::error::SetupError;
use crate::projectile::Projectile;
use crate::tower::Tower;
use crate::types::Vector2;
use crate::wave::{self, Spawner, Wave};
use log::info;
use serde::{Deserialize, Serialize};

/// Lifecycle of a game. `Lost` and `Won` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    Running,
    WaveEnd, // Momentary, while the schedule moves to the next wave
    Lost,
    Won,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Lost | GameState::Won)
    }

    /// Numeric tag used by the observation encoder.
    pub fn code(self) -> u8 {
        match self {
            GameState::Running => 1,
            GameState::WaveEnd => 2,
            GameState::Lost => 3,
            GameState::Won => 4,
        }
    }
}

/// The Game struct owns the arena, the wave schedule and the player's
/// resources, and advances them one fixed step at a time.
#[derive(Debug)]
pub struct Game {
    pub arena: Arena,
    spawner: Spawner,
    pub lives: i32,
    pub max_lives: i32,
    pub cash: i32,
    pub round: u32,
    state: GameState,
    tick: u64,
}

impl Game {
    /// Create a game on the default track with the built-in wave.
    pub fn new(width: f64, height: f64, starting_lives: i32, starting_cash: i32) -> Self {
        Game::build(
            Arena::new(width, height, config::DEFAULT_PATH.to_vec()),
            Spawner::new(wave::default_schedule(), config::SPAWN_DELAY),
            starting_lives,
            starting_cash,
        )
    }

    /// Create a game with a caller-supplied track and schedule.
    pub fn with_schedule(
        width: f64,
        height: f64,
        starting_lives: i32,
        starting_cash: i32,
        path: Vec<Vector2>,
        schedule: Vec<Wave>,
        spawn_delay: f64,
    ) -> Result<Self, SetupError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(SetupError::InvalidDimensions { width, height });
        }
        if path.len() < 2 {
            return Err(SetupError::PathTooShort(path.len()));
        }
        if !(spawn_delay > 0.0) {
            return Err(SetupError::InvalidSpawnDelay(spawn_delay));
        }
        if schedule.is_empty() {
            return Err(SetupError::EmptySchedule);
        }
        for (wave_index, wave) in schedule.iter().enumerate() {
            if wave.entries.is_empty() {
                return Err(SetupError::EmptyWave(wave_index));
            }
            if let Some(entry) = wave.entries.iter().position(|e| e.count == 0) {
                return Err(SetupError::ZeroCount {
                    wave: wave_index,
                    entry,
                });
            }
        }

        Ok(Game::build(
            Arena::new(width, height, path),
            Spawner::new(schedule, spawn_delay),
            starting_lives,
            starting_cash,
        ))
    }

    fn build(arena: Arena, spawner: Spawner, starting_lives: i32, starting_cash: i32) -> Self {
        info!(
            "Game created: {}x{} playfield, {} waypoints, {} wave(s), {} lives",
            arena.width,
            arena.height,
            arena.path().len(),
            spawner.schedule().len(),
            starting_lives
        );
        Game {
            arena,
            spawner,
            lives: starting_lives,
            max_lives: starting_lives,
            cash: starting_cash,
            round: 1,
            state: GameState::Running,
            tick: 0,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Number of updates that actually ran.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// 1-based number of the wave in play (the last wave once the schedule is done).
    pub fn wave_number(&self) -> usize {
        (self.spawner.wave_index + 1).min(self.spawner.schedule().len())
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.arena.balloons
    }

    pub fn towers(&self) -> &[Tower] {
        &self.arena.towers
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.arena.projectiles
    }

    /// Try to place a tower at `(x, y)`. Fails on out-of-bounds or overlapping
    /// positions, and once the game has ended.
    pub fn place_tower(&mut self, x: f64, y: f64) -> bool {
        if self.state.is_terminal() {
            log::debug!("Rejected tower at ({:.1}, {:.1}): game is over", x, y);
            return false;
        }
        self.arena.place_tower(Vector2::new(x, y))
    }

    /// Advance the simulation by `dt` seconds. Does nothing once the game has ended.
    pub fn update(&mut self, dt: f64) {
        if self.state.is_terminal() {
            return;
        }
        self.tick += 1;
        self.arena.update_prev_state();

        // Phase 1: release at most one balloon
        if let Some(kind) = self.spawner.tick(dt) {
            self.arena.spawn_balloon(kind);
        }

        // Phase 2: move balloons, charge a life per leak
        let leaked = self.arena.move_balloons(dt);
        for _ in 0..leaked {
            self.lose_life();
        }

        // Phase 3: towers scan the moved balloons and fire
        self.arena.update_towers(dt);

        // Phase 4: projectiles fly, hit, split
        self.arena.update_projectiles(dt);

        // Phase 5: purge popped balloons
        self.arena.remove_popped();

        // Phase 6: wave completion
        if self.state == GameState::Running
            && self.spawner.wave_fully_spawned()
            && self.arena.is_clear()
        {
            self.end_wave();
        }
    }

    fn lose_life(&mut self) {
        self.lives -= 1;
        log::debug!("Tick {} life lost, {} remaining", self.tick, self.lives);
        if self.lives <= 0 && !self.state.is_terminal() {
            self.state = GameState::Lost;
            info!("Tick {} all lives lost, game over", self.tick);
        }
    }

    fn end_wave(&mut self) {
        self.state = GameState::WaveEnd;
        info!("Tick {} Wave {} complete", self.tick, self.spawner.wave_index + 1);

        if self.spawner.next_wave() {
            self.state = GameState::Running;
            crate::debug_wave!("Wave {} starting", self.spawner.wave_index + 1);
        } else {
            self.state = GameState::Won;
            info!(
                "Tick {} schedule cleared with {}/{} lives, game won",
                self.tick, self.lives, self.max_lives
            );
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(
            config::DEFAULT_WIDTH,
            config::DEFAULT_HEIGHT,
            config::STARTING_LIVES,
            config::STARTING_CASH,
        )
    }
}
