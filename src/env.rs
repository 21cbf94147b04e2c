//! Learning-environment adapter.
//!
//! Wraps a [`Game`] behind a discrete action space (one action per placement
//! tile plus "do nothing") and a fixed-length numeric observation, the shape a
//! reinforcement-learning agent consumes.

use crate::config;
use crate::game::{Game, GameState};
use crate::snapshot::Snapshot;
use rand::Rng;

/// Length of every observation vector.
pub const OBSERVATION_LEN: usize = config::ENV_MAX_BALLOONS * 4 + config::ENV_MAX_TOWERS * 2 + 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Place { x: f64, y: f64 },
    Noop,
}

impl Action {
    /// Decode a flat action index. Indices run row-major over the tile grid,
    /// the final index is "do nothing". Placements land on tile centres.
    pub fn decode(index: usize, tiles_x: u32, tiles_y: u32) -> Action {
        let tiles = (tiles_x * tiles_y) as usize;
        if index >= tiles || tiles_x == 0 {
            return Action::Noop;
        }
        let resolution = config::ENV_GRID_RESOLUTION;
        let tile_x = (index % tiles_x as usize) as u32;
        let tile_y = (index / tiles_x as usize) as u32;
        Action::Place {
            x: (tile_x * resolution + resolution / 2) as f64,
            y: (tile_y * resolution + resolution / 2) as f64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub placed: bool,
    pub state: GameState,
}

#[derive(Debug)]
pub struct TowerDefenseEnv {
    pub game: Game,
    width: f64,
    height: f64,
    tiles_x: u32,
    tiles_y: u32,
    step_count: u32,
    max_steps: u32,
}

impl TowerDefenseEnv {
    pub fn new(width: u32, height: u32) -> Self {
        let resolution = config::ENV_GRID_RESOLUTION;
        TowerDefenseEnv {
            game: Self::fresh_game(width as f64, height as f64),
            width: width as f64,
            height: height as f64,
            tiles_x: width / resolution,
            tiles_y: height / resolution,
            step_count: 0,
            max_steps: config::ENV_MAX_STEPS,
        }
    }

    fn fresh_game(width: f64, height: f64) -> Game {
        Game::new(width, height, config::STARTING_LIVES, config::STARTING_CASH)
    }

    pub fn num_actions(&self) -> usize {
        (self.tiles_x * self.tiles_y) as usize + 1
    }

    pub fn noop_action(&self) -> usize {
        self.num_actions() - 1
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Start a new episode and return its first observation.
    pub fn reset(&mut self) -> Vec<f32> {
        self.game = Self::fresh_game(self.width, self.height);
        self.step_count = 0;
        encode_observation(&self.game.snapshot())
    }

    /// Apply one action, then run the fixed number of simulation sub-steps.
    pub fn step(&mut self, action: usize) -> StepResult {
        self.step_count += 1;

        let placed = match Action::decode(action, self.tiles_x, self.tiles_y) {
            Action::Place { x, y } => self.game.place_tower(x, y),
            Action::Noop => false,
        };

        for _ in 0..config::ENV_SUB_STEPS {
            self.game.update(config::SIM_DT);
            if self.game.is_over() {
                break;
            }
        }

        let snapshot = self.game.snapshot();
        StepResult {
            observation: encode_observation(&snapshot),
            reward: reward(&snapshot),
            terminated: snapshot.state.is_terminal(),
            truncated: self.step_count >= self.max_steps,
            placed,
            state: snapshot.state,
        }
    }

    /// A uniformly random action, for baselines.
    pub fn sample_action<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.num_actions())
    }
}

/// Flatten a snapshot into `OBSERVATION_LEN` floats: balloons as
/// `(x, y, health, kind)`, towers as `(x, y)`, then `(lives, round, state)`.
/// Missing entities are zero-padded and extras are dropped.
pub fn encode_observation(snapshot: &Snapshot) -> Vec<f32> {
    let mut obs = Vec::with_capacity(OBSERVATION_LEN);

    for i in 0..config::ENV_MAX_BALLOONS {
        match snapshot.balloons.get(i) {
            Some(b) => obs.extend([b.x as f32, b.y as f32, b.health as f32, b.kind.code() as f32]),
            None => obs.extend([0.0; 4]),
        }
    }
    for i in 0..config::ENV_MAX_TOWERS {
        match snapshot.towers.get(i) {
            Some(t) => obs.extend([t.x as f32, t.y as f32]),
            None => obs.extend([0.0; 2]),
        }
    }
    obs.extend([
        snapshot.lives as f32,
        snapshot.round as f32,
        snapshot.state.code() as f32,
    ]);

    debug_assert_eq!(obs.len(), OBSERVATION_LEN);
    obs
}

/// Survival bonus, a penalty per life lost so far, and a large terminal bonus or penalty.
pub fn reward(snapshot: &Snapshot) -> f32 {
    let mut reward = 0.1;
    reward -= (snapshot.max_lives - snapshot.lives) as f32 * 10.0;
    match snapshot.state {
        GameState::Won => reward += 1000.0,
        GameState::Lost => reward -= 1000.0,
        _ => {}
    }
    reward
}
