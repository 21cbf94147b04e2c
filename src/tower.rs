use crate::balloon::Balloon;
use crate::config;
use crate::projectile::Projectile;
use crate::types::Vector2;
use std::cmp::Ordering;

// A stationary dart tower
#[derive(Debug, Clone)]
pub struct Tower {
    pub position: Vector2,
    pub range: f64,
    pub fire_rate: f64, // Shots per second
    pub cooldown: f64,  // Seconds until the next shot; may drift below zero
    pub damage: i32,
    pub radius: f64,
}

impl Tower {
    pub fn new(position: Vector2) -> Self {
        Tower {
            position,
            range: config::TOWER_RANGE,
            fire_rate: config::TOWER_FIRE_RATE,
            cooldown: 0.0,
            damage: config::TOWER_DAMAGE,
            radius: config::TOWER_RADIUS,
        }
    }

    pub fn in_range(&self, balloon: &Balloon) -> bool {
        balloon.is_alive() && self.position.distance(&balloon.position) <= self.range
    }

    /// Whether `point` falls inside this tower's footprint.
    pub fn collides_with_point(&self, point: Vector2) -> bool {
        self.position.distance(&point) <= self.radius
    }

    /// The live in-range balloon furthest along the track: highest waypoint
    /// index first, then highest progress toward the next waypoint.
    pub fn select_target<'a>(&self, balloons: &'a [Balloon]) -> Option<&'a Balloon> {
        balloons
            .iter()
            .filter(|b| self.in_range(b))
            .fold(None::<&'a Balloon>, |best, candidate| match best {
                Some(current) if leader_order(candidate, current) != Ordering::Greater => Some(current),
                _ => Some(candidate),
            })
    }

    /// Tick the cooldown and fire at most one projectile at the leader in range.
    pub fn update(&mut self, dt: f64, balloons: &[Balloon]) -> Option<Projectile> {
        self.cooldown -= dt;

        let target = self.select_target(balloons)?;
        if self.cooldown > 0.0 {
            return None;
        }

        crate::debug_tower!(
            "Tower at {} firing at balloon {} {} (waypoint {}, progress {:.2})",
            self.position,
            target.id,
            target.kind,
            target.path_index,
            target.progress_on_path
        );
        self.cooldown = 1.0 / self.fire_rate;
        Some(Projectile::new(self.position, target.id, self.damage))
    }
}

fn leader_order(a: &Balloon, b: &Balloon) -> Ordering {
    a.path_index.cmp(&b.path_index).then(
        a.progress_on_path
            .partial_cmp(&b.progress_on_path)
            .unwrap_or(Ordering::Equal),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balloon::BalloonKind;
    use crate::types::BalloonId;
    use assert_approx_eq::assert_approx_eq;
    use std::rc::Rc;

    fn balloon(id: u32, x: f64, y: f64, path_index: usize, progress: f64) -> Balloon {
        let path: Rc<[Vector2]> = Rc::from(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(3.0, 0.0),
        ]);
        let mut b = Balloon::new(BalloonKind::Red, path, 50.0);
        b.id = BalloonId(id);
        b.position = Vector2::new(x, y);
        b.path_index = path_index;
        b.progress_on_path = progress;
        b
    }

    #[test]
    fn test_no_target_out_of_range() {
        let mut tower = Tower::new(Vector2::ZERO);
        let balloons = vec![balloon(1, 400.0, 0.0, 2, 0.5)];
        assert!(tower.update(0.1, &balloons).is_none());
        assert_approx_eq!(tower.cooldown, -0.1);
    }

    #[test]
    fn test_targets_highest_path_index() {
        let tower = Tower::new(Vector2::ZERO);
        let balloons = vec![
            balloon(1, 10.0, 0.0, 0, 0.9),
            balloon(2, 20.0, 0.0, 2, 0.1),
            balloon(3, 30.0, 0.0, 1, 0.8),
        ];
        assert_eq!(tower.select_target(&balloons).map(|b| b.id), Some(BalloonId(2)));
    }

    #[test]
    fn test_tie_break_on_progress() {
        let tower = Tower::new(Vector2::ZERO);
        let balloons = vec![
            balloon(1, 10.0, 0.0, 1, 0.3),
            balloon(2, 20.0, 0.0, 1, 0.7),
            balloon(3, 30.0, 0.0, 1, 0.5),
        ];
        assert_eq!(tower.select_target(&balloons).map(|b| b.id), Some(BalloonId(2)));
    }

    #[test]
    fn test_ignores_dead_balloons() {
        let tower = Tower::new(Vector2::ZERO);
        let mut leader = balloon(1, 10.0, 0.0, 3, 0.0);
        leader.health = 0;
        let balloons = vec![leader, balloon(2, 20.0, 0.0, 0, 0.1)];
        assert_eq!(tower.select_target(&balloons).map(|b| b.id), Some(BalloonId(2)));
    }

    #[test]
    fn test_fires_and_resets_cooldown() {
        let mut tower = Tower::new(Vector2::new(5.0, 5.0));
        let balloons = vec![balloon(7, 50.0, 5.0, 0, 0.2)];

        let projectile = tower.update(1.0 / 60.0, &balloons).expect("tower should fire");
        assert_eq!(projectile.target, BalloonId(7));
        assert_eq!(projectile.position, tower.position);
        assert_eq!(projectile.damage, tower.damage);
        assert_approx_eq!(tower.cooldown, 1.0 / tower.fire_rate);

        // Still cooling down
        assert!(tower.update(0.5, &balloons).is_none());
    }

    #[test]
    fn test_no_catch_up_volley() {
        let mut tower = Tower::new(Vector2::ZERO);
        let balloons = vec![balloon(1, 10.0, 0.0, 0, 0.0)];
        // Cooldown drifts far below zero with nothing in range
        tower.update(10.0, &[]);
        assert_approx_eq!(tower.cooldown, -10.0);

        assert!(tower.update(0.0, &balloons).is_some());
        assert_approx_eq!(tower.cooldown, 1.0);
        assert!(tower.update(0.0, &balloons).is_none());
    }

    #[test]
    fn test_collides_with_point() {
        let tower = Tower::new(Vector2::new(100.0, 100.0));
        assert!(tower.collides_with_point(Vector2::new(100.0, 100.0)));
        assert!(tower.collides_with_point(Vector2::new(110.0, 100.0)));
        assert!(!tower.collides_with_point(Vector2::new(111.0, 100.0)));
    }
}
