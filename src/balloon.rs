use crate::error::ParseError;
use crate::types::{BalloonId, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

// Balloon kinds, strongest last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalloonKind {
    Red,
    Blue,
    Green,
    Yellow,
    Pink,
    Black,
    White,
    Zebra,
    Ceramic,
    Moab,
    Bfb,
    Zomg,
}

impl BalloonKind {
    pub const ALL: [BalloonKind; 12] = [
        BalloonKind::Red,
        BalloonKind::Blue,
        BalloonKind::Green,
        BalloonKind::Yellow,
        BalloonKind::Pink,
        BalloonKind::Black,
        BalloonKind::White,
        BalloonKind::Zebra,
        BalloonKind::Ceramic,
        BalloonKind::Moab,
        BalloonKind::Bfb,
        BalloonKind::Zomg,
    ];

    pub const fn base_health(self) -> i32 {
        match self {
            BalloonKind::Ceramic => 10,
            BalloonKind::Moab => 40,
            BalloonKind::Bfb => 80,
            BalloonKind::Zomg => 120,
            _ => 1,
        }
    }

    pub const fn radius(self) -> f64 {
        match self {
            BalloonKind::Red | BalloonKind::Black | BalloonKind::White | BalloonKind::Zebra => 8.0,
            BalloonKind::Blue => 7.0,
            BalloonKind::Green => 6.0,
            BalloonKind::Yellow | BalloonKind::Pink => 5.0,
            BalloonKind::Ceramic => 10.0,
            BalloonKind::Moab => 15.0,
            BalloonKind::Bfb => 20.0,
            BalloonKind::Zomg => 25.0,
        }
    }

    /// The kind left behind when a balloon of this kind pops, if any.
    pub const fn split_child(self) -> Option<BalloonKind> {
        match self {
            BalloonKind::Blue => Some(BalloonKind::Red),
            BalloonKind::Green => Some(BalloonKind::Blue),
            BalloonKind::Yellow => Some(BalloonKind::Green),
            BalloonKind::Pink => Some(BalloonKind::Yellow),
            _ => None,
        }
    }

    /// Stable 1-based numeric tag used by the observation encoder.
    pub const fn code(self) -> u8 {
        self as u8 + 1
    }

    pub const fn name(self) -> &'static str {
        match self {
            BalloonKind::Red => "RED",
            BalloonKind::Blue => "BLUE",
            BalloonKind::Green => "GREEN",
            BalloonKind::Yellow => "YELLOW",
            BalloonKind::Pink => "PINK",
            BalloonKind::Black => "BLACK",
            BalloonKind::White => "WHITE",
            BalloonKind::Zebra => "ZEBRA",
            BalloonKind::Ceramic => "CERAMIC",
            BalloonKind::Moab => "MOAB",
            BalloonKind::Bfb => "BFB",
            BalloonKind::Zomg => "ZOMG",
        }
    }
}

impl fmt::Display for BalloonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BalloonKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BalloonKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseError::UnknownKind(wanted.to_string()))
    }
}

// A balloon travelling along the shared track
#[derive(Debug, Clone)]
pub struct Balloon {
    pub id: BalloonId, // Assigned when the arena admits the balloon
    pub kind: BalloonKind,
    pub position: Vector2,
    pub prev_position: Vector2, // Position at the start of the current tick
    path: Rc<[Vector2]>,
    pub path_index: usize,     // Index of the last waypoint reached
    pub progress_on_path: f64, // Fraction of the remaining leg covered by the last partial move
    pub speed: f64,            // Pixels per second
    pub radius: f64,
    pub health: i32,
}

impl Balloon {
    /// Create a fresh balloon of `kind` sitting on the first waypoint of `path`.
    pub fn new(kind: BalloonKind, path: Rc<[Vector2]>, speed: f64) -> Self {
        let start = path.first().copied().unwrap_or_default();
        Balloon {
            id: BalloonId::default(),
            kind,
            position: start,
            prev_position: start,
            path,
            path_index: 0,
            progress_on_path: 0.0,
            speed,
            radius: kind.radius(),
            health: kind.base_health(),
        }
    }

    pub fn path(&self) -> &[Vector2] {
        &self.path
    }

    /// Waypoints from the last one reached to the end of the track.
    pub fn remaining_path(&self) -> &[Vector2] {
        &self.path[self.path_index.min(self.path.len())..]
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_at_end(&self) -> bool {
        self.path_index + 1 >= self.path.len()
    }

    pub fn update_prev_state(&mut self) {
        self.prev_position = self.position;
    }

    /// Move along the track by `speed * dt` pixels, crossing as many waypoints
    /// as the budget allows. Returns true once the last waypoint is reached.
    pub fn advance(&mut self, dt: f64) -> bool {
        debug_assert!(dt >= 0.0, "negative time step {dt}");
        if self.is_at_end() {
            return true;
        }

        let start_index = self.path_index;
        let mut budget = self.speed * dt;

        while budget > 0.0 && !self.is_at_end() {
            let target = self.path[self.path_index + 1];
            let distance_to_next = self.position.distance(&target);

            if budget >= distance_to_next {
                budget -= distance_to_next;
                self.position = target;
                self.path_index += 1;
                self.progress_on_path = 0.0;
            } else {
                let direction = (target - self.position).normalize();
                self.position = self.position + direction * budget;
                self.progress_on_path = budget / distance_to_next;
                budget = 0.0;
            }
        }

        debug_assert!(self.path_index >= start_index);
        self.is_at_end()
    }

    /// Subtract `amount` from health. A lethal hit on a kind with a split child
    /// yields that child; the balloon itself stays in place until cleanup.
    pub fn apply_damage(&mut self, amount: i32) -> Vec<Balloon> {
        self.health -= amount;
        if self.health > 0 {
            return Vec::new();
        }

        match self.kind.split_child() {
            Some(child_kind) => {
                crate::debug_balloon!(
                    "Balloon {} {} popped at {}, splitting into {}",
                    self.id,
                    self.kind,
                    self.position,
                    child_kind
                );
                vec![self.split_into(child_kind)]
            }
            None => {
                crate::debug_balloon!("Balloon {} {} popped at {}", self.id, self.kind, self.position);
                Vec::new()
            }
        }
    }

    // The child shares the track and keeps the absolute waypoint index, which is
    // the parent's remaining sub-path re-based to its first waypoint.
    fn split_into(&self, kind: BalloonKind) -> Balloon {
        Balloon {
            id: BalloonId::default(),
            kind,
            position: self.position,
            prev_position: self.position,
            path: Rc::clone(&self.path),
            path_index: self.path_index,
            progress_on_path: self.progress_on_path,
            speed: self.speed,
            radius: kind.radius(),
            health: kind.base_health(),
        }
    }
}
