use crate::config;
use crate::game::{Game, GameState};
use crate::render::Renderer;
use log::info;
use macroquad::prelude::{MouseButton, get_frame_time, is_mouse_button_pressed, mouse_position, next_frame};
use serde::Serialize;

/// Outcome of a run, printed by the headless mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub simulated_seconds: f64,
    pub state: GameState,
    pub lives: i32,
    pub max_lives: i32,
    pub towers: usize,
}

/// Drives a game with a fixed time step, whatever the caller's frame rate.
pub struct Runner {
    pub game: Game,
    time_accumulator: f64,
    step_duration: f64,
}

impl Runner {
    pub fn new(game: Game) -> Self {
        Runner {
            game,
            time_accumulator: 0.0,
            step_duration: config::SIM_DT,
        }
    }

    /// Bank `frame_time` seconds and run every whole step that fits, up to
    /// `MAX_STEPS_PER_FRAME`. Returns the number of steps taken.
    pub fn advance(&mut self, frame_time: f64) -> u32 {
        self.time_accumulator += frame_time;

        let mut steps = 0;
        while self.time_accumulator >= self.step_duration {
            if steps == config::MAX_STEPS_PER_FRAME {
                // Too far behind; drop the backlog rather than spiral
                self.time_accumulator = 0.0;
                break;
            }
            self.time_accumulator -= self.step_duration;
            self.game.update(self.step_duration);
            steps += 1;
        }
        steps
    }

    /// How far the accumulator sits between the last step and the next, in [0, 1].
    pub fn alpha(&self) -> f64 {
        (self.time_accumulator / self.step_duration).clamp(0.0, 1.0)
    }

    pub fn summary(&self) -> RunSummary {
        let ticks = self.game.tick_count();
        RunSummary {
            ticks,
            simulated_seconds: ticks as f64 * self.step_duration,
            state: self.game.snapshot().state,
            lives: self.game.lives,
            max_lives: self.game.max_lives,
            towers: self.game.towers().len(),
        }
    }

    /// Step as fast as possible until the game ends or `max_ticks` have run.
    pub fn run_headless(&mut self, max_ticks: u64) -> RunSummary {
        info!("Running headless for at most {} ticks", max_ticks);
        while !self.game.is_over() && self.game.tick_count() < max_ticks {
            self.game.update(self.step_duration);
        }
        let summary = self.summary();
        info!(
            "Tick {} finished in state {:?} with {}/{} lives",
            summary.ticks, summary.state, summary.lives, summary.max_lives
        );
        summary
    }

    /// Real-time loop for the viewer. Left click places a tower; ESC quits.
    pub async fn run_windowed(&mut self, renderer: &mut Renderer, max_ticks: u64) {
        info!("Starting main loop...");

        while !Renderer::window_should_close()
            && !self.game.is_over()
            && self.game.tick_count() < max_ticks
        {
            if is_mouse_button_pressed(MouseButton::Left) {
                let (mx, my) = mouse_position();
                if let Some(point) = renderer.screen_to_world(&self.game, mx, my) {
                    self.game.place_tower(point.x, point.y);
                }
            }

            self.advance(get_frame_time() as f64);
            renderer.draw_frame(&self.game, self.alpha(), None);
            next_frame().await;
        }

        let announcement = match self.game.state() {
            GameState::Won => Some("All waves cleared!"),
            GameState::Lost => Some("Out of lives!"),
            _ => None,
        };
        info!("Exiting main loop.");

        // After game over, show announcement and wait for ESC
        if let Some(msg) = announcement {
            while !Renderer::window_should_close() {
                renderer.draw_frame(&self.game, 1.0, Some(msg));
                next_frame().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_runs_whole_steps() {
        let mut runner = Runner::new(Game::default());
        assert_eq!(runner.advance(config::SIM_DT * 0.5), 0);
        assert!(runner.alpha() > 0.4 && runner.alpha() < 0.6);
        assert_eq!(runner.advance(config::SIM_DT * 2.0), 2);
        assert_eq!(runner.game.tick_count(), 2);
    }

    #[test]
    fn test_advance_caps_backlog() {
        let mut runner = Runner::new(Game::default());
        let steps = runner.advance(10.0);
        assert_eq!(steps, config::MAX_STEPS_PER_FRAME);
        assert_eq!(runner.alpha(), 0.0);
    }

    #[test]
    fn test_run_headless_to_completion() {
        let mut runner = Runner::new(Game::default());
        let summary = runner.run_headless(config::DEFAULT_MAX_TICKS);
        assert_eq!(summary.state, GameState::Won);
        assert_eq!(summary.lives, summary.max_lives - 6);
        assert!(summary.ticks < config::DEFAULT_MAX_TICKS);
    }

    #[test]
    fn test_run_headless_respects_tick_cap() {
        let mut runner = Runner::new(Game::default());
        let summary = runner.run_headless(100);
        assert_eq!(summary.ticks, 100);
        assert_eq!(summary.state, GameState::Running);
    }
}
