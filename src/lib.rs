//! Balloon Defense: a deterministic, fixed-step tower-defense simulation.
//!
//! Balloons walk a polyline path in waves, towers fire homing darts at the
//! leading balloon, and popped balloons split into weaker children. The
//! [`game::Game`] type owns the whole simulation; [`runner`] and [`render`]
//! drive and draw it, and [`env`] exposes it to learning agents.

pub mod arena;
pub mod balloon;
pub mod config;
pub mod env;
pub mod error;
pub mod game;
pub mod logging;
pub mod projectile;
pub mod render;
pub mod runner;
pub mod snapshot;
pub mod tower;
pub mod types;
pub mod utils;
pub mod wave;
