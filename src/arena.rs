use crate::balloon::{Balloon, BalloonKind};
use crate::config;
use crate::tower::Tower;
use crate::projectile::Projectile;
use crate::types::{BalloonId, Vector2};
use std::rc::Rc;

// Represents the playfield: the track and every live entity on it
#[derive(Debug)]
pub struct Arena {
    pub width: f64,  // Playfield width in pixels
    pub height: f64, // Playfield height in pixels
    path: Rc<[Vector2]>,
    pub balloons: Vec<Balloon>,
    pub towers: Vec<Tower>,
    pub projectiles: Vec<Projectile>,
    next_balloon_id: u32,
}

impl Arena {
    pub fn new(width: f64, height: f64, path: Vec<Vector2>) -> Self {
        Arena {
            width,
            height,
            path: Rc::from(path),
            balloons: Vec::new(),
            towers: Vec::new(),
            projectiles: Vec::new(),
            next_balloon_id: 1,
        }
    }

    pub fn path(&self) -> &[Vector2] {
        &self.path
    }

    pub fn in_bounds(&self, point: Vector2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    // Places a tower unless the spot is off the playfield or on top of another tower
    pub fn place_tower(&mut self, position: Vector2) -> bool {
        if !self.in_bounds(position) {
            log::debug!("Rejected tower at {}: out of bounds", position);
            return false;
        }
        if self.towers.iter().any(|t| t.collides_with_point(position)) {
            log::debug!("Rejected tower at {}: overlaps an existing tower", position);
            return false;
        }
        self.towers.push(Tower::new(position));
        log::info!("Placed tower {} at {}", self.towers.len(), position);
        true
    }

    // Releases a new balloon at the start of the track
    pub fn spawn_balloon(&mut self, kind: BalloonKind) -> BalloonId {
        let balloon = Balloon::new(kind, Rc::clone(&self.path), config::BALLOON_SPEED);
        let id = self.admit_balloon(balloon);
        crate::debug_spawn!("Spawned balloon {} {} at {}", id, kind, self.path[0]);
        id
    }

    // Gives a balloon its id and adds it to the live set
    pub fn admit_balloon(&mut self, mut balloon: Balloon) -> BalloonId {
        let id = BalloonId(self.next_balloon_id);
        self.next_balloon_id += 1;
        balloon.id = id;
        self.balloons.push(balloon);
        id
    }

    pub fn balloon(&self, id: BalloonId) -> Option<&Balloon> {
        self.balloons.iter().find(|b| b.id == id)
    }

    // Remember where everything was before this tick moves it
    pub fn update_prev_state(&mut self) {
        for balloon in self.balloons.iter_mut() {
            balloon.update_prev_state();
        }
        for projectile in self.projectiles.iter_mut() {
            projectile.update_prev_state();
        }
    }

    /// Moves every balloon along the track and drops those that reached the
    /// end. Returns how many leaked.
    pub fn move_balloons(&mut self, dt: f64) -> u32 {
        let mut leaked = 0;
        self.balloons.retain_mut(|balloon| {
            if balloon.advance(dt) {
                crate::debug_balloon!("Balloon {} {} reached the end of the track", balloon.id, balloon.kind);
                leaked += 1;
                false
            } else {
                true
            }
        });
        leaked
    }

    /// Lets every tower scan and fire. Returns the number of shots taken.
    pub fn update_towers(&mut self, dt: f64) -> usize {
        let mut fired = 0;
        for tower in self.towers.iter_mut() {
            if let Some(projectile) = tower.update(dt, &self.balloons) {
                self.projectiles.push(projectile);
                fired += 1;
            }
        }
        fired
    }

    // Advances every projectile; split children join the live set immediately
    // so later projectiles in the same pass can see them
    pub fn update_projectiles(&mut self, dt: f64) {
        let mut spent = Vec::with_capacity(self.projectiles.len());

        for i in 0..self.projectiles.len() {
            let outcome = self.projectiles[i].advance(dt, &mut self.balloons);
            spent.push(outcome.remove);
            for child in outcome.spawned {
                let kind = child.kind;
                let id = self.admit_balloon(child);
                crate::debug_spawn!("Split child {} {} joined the track", id, kind);
            }
        }

        let mut spent = spent.into_iter();
        self.projectiles.retain(|_| !spent.next().unwrap_or(false));
    }

    /// Purges popped balloons. Returns how many were removed.
    pub fn remove_popped(&mut self) -> usize {
        let before = self.balloons.len();
        self.balloons.retain(|b| b.is_alive());
        debug_assert!(self.balloons.iter().all(|b| b.health > 0));
        before - self.balloons.len()
    }

    /// No balloons and no projectiles left in flight.
    pub fn is_clear(&self) -> bool {
        self.balloons.is_empty() && self.projectiles.is_empty()
    }
}

// Default implementation for Arena
impl Default for Arena {
    fn default() -> Self {
        Arena::new(
            config::DEFAULT_WIDTH,
            config::DEFAULT_HEIGHT,
            config::DEFAULT_PATH.to_vec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_place_tower_bounds() {
        let mut arena = Arena::default();
        assert!(!arena.place_tower(Vector2::new(-1.0, 100.0)));
        assert!(!arena.place_tower(Vector2::new(100.0, 601.0)));
        assert!(!arena.place_tower(Vector2::new(801.0, 0.0)));
        assert!(arena.towers.is_empty());
        // Edges are inclusive
        assert!(arena.place_tower(Vector2::new(800.0, 600.0)));
        assert!(arena.place_tower(Vector2::new(0.0, 0.0)));
        assert_eq!(arena.towers.len(), 2);
    }

    #[test]
    fn test_place_tower_overlap() {
        let mut arena = Arena::default();
        assert!(arena.place_tower(Vector2::new(100.0, 100.0)));
        assert!(!arena.place_tower(Vector2::new(100.0, 100.0)));
        assert!(!arena.place_tower(Vector2::new(105.0, 100.0)));
        assert!(arena.place_tower(Vector2::new(111.0, 100.0)));
        assert_eq!(arena.towers.len(), 2);
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut arena = Arena::default();
        let a = arena.spawn_balloon(BalloonKind::Red);
        let b = arena.spawn_balloon(BalloonKind::Blue);
        assert_ne!(a, b);
        assert_eq!(arena.balloon(b).map(|b| b.kind), Some(BalloonKind::Blue));
        assert_eq!(arena.balloons[0].position, config::DEFAULT_PATH[0]);
    }

    #[test]
    fn test_move_balloons_removes_leaks() {
        let mut arena = Arena::new(
            100.0,
            100.0,
            vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)],
        );
        arena.spawn_balloon(BalloonKind::Red);
        let mut slow = Balloon::new(BalloonKind::Red, Rc::from(vec![Vector2::ZERO, Vector2::new(1000.0, 0.0)]), 1.0);
        slow.position = Vector2::ZERO;
        arena.admit_balloon(slow);

        let leaked = arena.move_balloons(1.0);

        assert_eq!(leaked, 1);
        assert_eq!(arena.balloons.len(), 1);
        assert_approx_eq!(arena.balloons[0].position.x, 1.0);
    }

    #[test]
    fn test_split_child_joins_and_parent_is_purged() {
        let mut arena = Arena::default();
        let parent = arena.spawn_balloon(BalloonKind::Blue);
        let start = arena.path()[0];
        arena.projectiles.push(Projectile::new(start, parent, 1));

        arena.update_projectiles(1.0 / 60.0);

        assert!(arena.projectiles.is_empty());
        assert_eq!(arena.balloons.len(), 2);
        assert_eq!(arena.balloon(parent).map(|b| b.health), Some(0));

        assert_eq!(arena.remove_popped(), 1);
        assert_eq!(arena.balloons.len(), 1);
        assert_eq!(arena.balloons[0].kind, BalloonKind::Red);
        assert_ne!(arena.balloons[0].id, parent);
    }

    #[test]
    fn test_towers_fire_into_projectile_set() {
        let mut arena = Arena::default();
        arena.place_tower(Vector2::new(0.0, 300.0));
        arena.spawn_balloon(BalloonKind::Red);

        assert_eq!(arena.update_towers(1.0 / 60.0), 1);
        assert_eq!(arena.projectiles.len(), 1);
        assert!(!arena.is_clear());
    }
}
