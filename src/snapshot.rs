use crate::balloon::BalloonKind;
use crate::game::{Game, GameState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalloonView {
    pub id: u32,
    pub kind: BalloonKind,
    pub x: f64,
    pub y: f64,
    pub health: i32,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub x: f64,
    pub y: f64,
    pub range: f64,
}

/// Read-only projection of a game between ticks, for observers and viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub lives: i32,
    pub max_lives: i32,
    pub cash: i32,
    pub round: u32,
    pub wave: usize,
    pub state: GameState,
    pub balloons: Vec<BalloonView>,
    pub towers: Vec<TowerView>,
    pub projectiles: usize,
}

impl Game {
    pub fn snapshot(&self) -> Snapshot {
        // The between-waves label never escapes a tick
        let state = match self.state() {
            GameState::WaveEnd => GameState::Running,
            other => other,
        };

        Snapshot {
            tick: self.tick_count(),
            lives: self.lives,
            max_lives: self.max_lives,
            cash: self.cash,
            round: self.round,
            wave: self.wave_number(),
            state,
            balloons: self
                .balloons()
                .iter()
                .map(|b| BalloonView {
                    id: b.id.0,
                    kind: b.kind,
                    x: b.position.x,
                    y: b.position.y,
                    health: b.health,
                    radius: b.radius,
                })
                .collect(),
            towers: self
                .towers()
                .iter()
                .map(|t| TowerView {
                    x: t.position.x,
                    y: t.position.y,
                    range: t.range,
                })
                .collect(),
            projectiles: self.projectiles().len(),
        }
    }
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_snapshot_projection() {
        let mut game = Game::default();
        assert!(game.place_tower(300.0, 250.0));
        for _ in 0..40 {
            game.update(config::SIM_DT);
        }

        let snapshot = game.snapshot();

        assert_eq!(snapshot.lives, config::STARTING_LIVES);
        assert_eq!(snapshot.max_lives, config::STARTING_LIVES);
        assert_eq!(snapshot.cash, config::STARTING_CASH);
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.wave, 1);
        assert_eq!(snapshot.state, GameState::Running);
        assert_eq!(snapshot.tick, 40);
        assert_eq!(snapshot.towers.len(), 1);
        assert_approx_eq!(snapshot.towers[0].range, config::TOWER_RANGE);
        assert_eq!(snapshot.balloons.len(), 1);
        let balloon = &snapshot.balloons[0];
        assert_eq!(balloon.kind, BalloonKind::Red);
        assert_eq!(balloon.health, 1);
        assert_approx_eq!(balloon.radius, 8.0);
        assert_approx_eq!(balloon.y, 300.0);
    }

    #[test]
    fn test_snapshot_json() {
        let game = Game::default();
        let json = game.snapshot().to_json().unwrap();
        assert!(json.contains("\"state\": \"RUNNING\""));

        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, game.snapshot());
    }
}
