//! Configuration constants for the balloon defense simulation.

use crate::types::Vector2;

// Arena
pub const DEFAULT_WIDTH: f64 = 800.0; // Playfield width in pixels
pub const DEFAULT_HEIGHT: f64 = 600.0; // Playfield height in pixels
pub const STARTING_LIVES: i32 = 100;
pub const STARTING_CASH: i32 = 650;

/// Waypoints of the default track. Starts and ends off-screen so balloons
/// enter and leave the visible playfield.
pub const DEFAULT_PATH: [Vector2; 6] = [
    Vector2::new(-50.0, 300.0),
    Vector2::new(200.0, 300.0),
    Vector2::new(400.0, 200.0),
    Vector2::new(600.0, 300.0),
    Vector2::new(800.0, 300.0),
    Vector2::new(850.0, 300.0),
];

// Balloons
pub const BALLOON_SPEED: f64 = 50.0; // Pixels per second
pub const SPAWN_DELAY: f64 = 0.5; // Seconds between spawns within a wave entry
pub const DEFAULT_WAVE_COUNT: u32 = 6; // Reds in the built-in wave

// Towers
pub const TOWER_RANGE: f64 = 150.0;
pub const TOWER_FIRE_RATE: f64 = 1.0; // Shots per second
pub const TOWER_DAMAGE: i32 = 1;
pub const TOWER_RADIUS: f64 = 10.0; // Also the placement exclusion radius

// Projectiles
pub const PROJECTILE_SPEED: f64 = 300.0; // Pixels per second
pub const PROJECTILE_RADIUS: f64 = 3.0;

// Stepping
pub const SIM_DT: f64 = 1.0 / 60.0; // Fixed simulation step
pub const MAX_STEPS_PER_FRAME: u32 = 8; // Cap to avoid a spiral of death in the viewer
pub const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10; // Ten simulated minutes

// Learning environment
pub const ENV_GRID_RESOLUTION: u32 = 10; // Pixels per action tile
pub const ENV_SUB_STEPS: u32 = 10; // Simulation steps per agent decision
pub const ENV_MAX_STEPS: u32 = 1000; // Decisions before an episode truncates
pub const ENV_MAX_BALLOONS: usize = 100;
pub const ENV_MAX_TOWERS: usize = 10;

// Rendering configuration
pub const WINDOW_WIDTH: i32 = 1000;
pub const WINDOW_HEIGHT: i32 = 600;
pub const UI_PANEL_WIDTH: i32 = 200; // Width of the side panel
pub const ARENA_WIDTH: i32 = WINDOW_WIDTH - UI_PANEL_WIDTH; // Width for the playfield rendering
