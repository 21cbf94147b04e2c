use crate::balloon::Balloon;
use crate::config;
use crate::types::{BalloonId, Vector2};

// A dart homing on one balloon, identified by id rather than by reference
#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: Vector2,
    pub prev_position: Vector2,
    pub target: BalloonId,
    pub speed: f64, // Pixels per second
    pub damage: i32,
    pub radius: f64,
}

/// What happened to a projectile during one advance.
#[derive(Debug, Default)]
pub struct ProjectileOutcome {
    pub remove: bool,
    pub spawned: Vec<Balloon>,
}

impl ProjectileOutcome {
    fn keep() -> Self {
        ProjectileOutcome::default()
    }

    fn discard() -> Self {
        ProjectileOutcome {
            remove: true,
            spawned: Vec::new(),
        }
    }
}

impl Projectile {
    pub fn new(position: Vector2, target: BalloonId, damage: i32) -> Self {
        Projectile {
            position,
            prev_position: position,
            target,
            speed: config::PROJECTILE_SPEED,
            damage,
            radius: config::PROJECTILE_RADIUS,
        }
    }

    pub fn update_prev_state(&mut self) {
        self.prev_position = self.position;
    }

    /// Index of the balloon this projectile should chase: the current target if
    /// it is still live, otherwise the nearest live balloon.
    fn acquire_target(&mut self, balloons: &[Balloon]) -> Option<usize> {
        let current = balloons
            .iter()
            .position(|b| b.id == self.target && b.is_alive());
        if current.is_some() {
            return current;
        }

        let nearest = balloons
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_alive())
            .min_by(|(_, a), (_, b)| {
                self.position
                    .distance(&a.position)
                    .partial_cmp(&self.position.distance(&b.position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(index, _)| index)?;

        crate::debug_projectile!(
            "Projectile lost target {}, retargeting {}",
            self.target,
            balloons[nearest].id
        );
        self.target = balloons[nearest].id;
        Some(nearest)
    }

    /// Fly toward the target for `dt` seconds and resolve a hit if in contact.
    pub fn advance(&mut self, dt: f64, balloons: &mut [Balloon]) -> ProjectileOutcome {
        let Some(index) = self.acquire_target(balloons) else {
            crate::debug_projectile!("Projectile at {} has no live target, discarding", self.position);
            return ProjectileOutcome::discard();
        };

        let target = &mut balloons[index];
        let direction = (target.position - self.position).normalize();
        self.position = self.position + direction * (self.speed * dt);

        if self.position.distance(&target.position) <= target.radius + self.radius {
            crate::debug_projectile!(
                "Projectile hit balloon {} for {} damage at {}",
                target.id,
                self.damage,
                self.position
            );
            return ProjectileOutcome {
                remove: true,
                spawned: target.apply_damage(self.damage),
            };
        }

        ProjectileOutcome::keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balloon::BalloonKind;
    use assert_approx_eq::assert_approx_eq;
    use std::rc::Rc;

    fn balloon_at(id: u32, kind: BalloonKind, x: f64, y: f64) -> Balloon {
        let path: Rc<[Vector2]> = Rc::from(vec![Vector2::new(x, y), Vector2::new(x + 500.0, y)]);
        let mut balloon = Balloon::new(kind, path, 50.0);
        balloon.id = BalloonId(id);
        balloon
    }

    #[test]
    fn test_moves_toward_target() {
        let mut balloons = vec![balloon_at(1, BalloonKind::Red, 100.0, 0.0)];
        let mut projectile = Projectile::new(Vector2::ZERO, BalloonId(1), 1);

        let outcome = projectile.advance(0.1, &mut balloons);

        assert!(!outcome.remove);
        assert!(outcome.spawned.is_empty());
        assert_approx_eq!(projectile.position.x, 30.0);
        assert_approx_eq!(projectile.position.y, 0.0);
        assert_eq!(balloons[0].health, 1);
    }

    #[test]
    fn test_hit_applies_damage() {
        let mut balloons = vec![balloon_at(1, BalloonKind::Red, 20.0, 0.0)];
        let mut projectile = Projectile::new(Vector2::ZERO, BalloonId(1), 1);

        let outcome = projectile.advance(0.05, &mut balloons); // 15 px, within 8 + 3

        assert!(outcome.remove);
        assert!(outcome.spawned.is_empty());
        assert_eq!(balloons[0].health, 0);
    }

    #[test]
    fn test_hit_returns_split_child() {
        let mut balloons = vec![balloon_at(1, BalloonKind::Green, 10.0, 0.0)];
        let mut projectile = Projectile::new(Vector2::ZERO, BalloonId(1), 1);

        let outcome = projectile.advance(0.01, &mut balloons);

        assert!(outcome.remove);
        assert_eq!(outcome.spawned.len(), 1);
        assert_eq!(outcome.spawned[0].kind, BalloonKind::Blue);
    }

    #[test]
    fn test_reacquires_nearest_when_target_removed() {
        let mut balloons = vec![
            balloon_at(2, BalloonKind::Red, 300.0, 0.0),
            balloon_at(3, BalloonKind::Red, 0.0, 200.0),
        ];
        // Target #1 is no longer in the live set
        let mut projectile = Projectile::new(Vector2::ZERO, BalloonId(1), 1);

        let outcome = projectile.advance(0.1, &mut balloons);

        assert!(!outcome.remove);
        assert_eq!(projectile.target, BalloonId(3));
        assert_approx_eq!(projectile.position.x, 0.0);
        assert_approx_eq!(projectile.position.y, 30.0);
    }

    #[test]
    fn test_reacquires_when_target_dead() {
        let mut dead = balloon_at(1, BalloonKind::Red, 10.0, 0.0);
        dead.health = 0;
        let mut balloons = vec![dead, balloon_at(2, BalloonKind::Red, 0.0, 400.0)];
        let mut projectile = Projectile::new(Vector2::ZERO, BalloonId(1), 1);

        let outcome = projectile.advance(0.1, &mut balloons);

        assert!(!outcome.remove);
        assert_eq!(projectile.target, BalloonId(2));
        assert_eq!(balloons[0].health, 0, "dead balloon must not be hit again");
    }

    #[test]
    fn test_discarded_without_live_targets() {
        let mut dead = balloon_at(1, BalloonKind::Red, 10.0, 0.0);
        dead.health = 0;
        let mut balloons = vec![dead];
        let mut projectile = Projectile::new(Vector2::ZERO, BalloonId(1), 1);

        let outcome = projectile.advance(0.1, &mut balloons);

        assert!(outcome.remove);
        assert!(outcome.spawned.is_empty());
        assert_eq!(projectile.position, Vector2::ZERO);

        let mut empty: Vec<Balloon> = Vec::new();
        assert!(projectile.advance(0.1, &mut empty).remove);
    }
}
