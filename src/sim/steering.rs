//! Projectile steering
//!
//! Pure-pursuit homing: each tick the shot re-samples the target position and
//! moves straight at it. Once a stop condition fires the heading is frozen and
//! the shot flies ballistic for the rest of its life.

use glam::Vec2;

use crate::tuning::HomingTuning;

/// Homing state for one projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Homing {
    homing: bool,
    /// Radians, `atan2(dy, dx)` in screen space
    heading: f32,
    /// Ticks since spawn
    age: u32,
    speed: f32,
    range: f32,
    /// Closer than this counts as arrived
    min_distance: f32,
    max_age: u32,
}

impl Homing {
    pub fn new(tuning: &HomingTuning, min_distance: f32) -> Self {
        Self {
            homing: true,
            // Shots are fired leftward toward the player
            heading: std::f32::consts::PI,
            age: 0,
            speed: tuning.speed,
            range: tuning.range,
            min_distance,
            max_age: tuning.max_age,
        }
    }

    pub fn is_homing(&self) -> bool {
        self.homing
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.max_age
    }

    /// Compute this tick's displacement from `from` (the shot's center).
    ///
    /// `target` is the current target center, `None` once the target is gone.
    pub fn steer(&mut self, from: Vec2, target: Option<Vec2>) -> Vec2 {
        self.age += 1;

        if self.homing {
            match target {
                Some(target) => {
                    let delta = target - from;
                    let distance = delta.length();
                    // Leftward shots have passed the target once they are left of it
                    let passed = delta.x > 0.0;
                    if !passed && distance <= self.range && distance > self.min_distance {
                        return delta / distance * self.speed;
                    }
                    if distance > 0.0 {
                        self.heading = delta.y.atan2(delta.x);
                    }
                    self.homing = false;
                }
                None => self.homing = false,
            }
        }

        Vec2::from_angle(self.heading) * self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> HomingTuning {
        HomingTuning {
            speed: 7.0,
            range: 300.0,
            max_age: 300,
        }
    }

    #[test]
    fn test_pursues_target_within_range() {
        let mut homing = Homing::new(&tuning(), 25.0);
        let step = homing.steer(Vec2::new(500.0, 300.0), Some(Vec2::new(300.0, 300.0)));
        assert!(homing.is_homing());
        assert!((step - Vec2::new(-7.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_out_of_range_freezes_heading() {
        let mut homing = Homing::new(&tuning(), 25.0);
        let from = Vec2::new(900.0, 300.0);
        let target = Vec2::new(100.0, 700.0);
        let step = homing.steer(from, Some(target));
        assert!(!homing.is_homing());

        let expected = (target - from).y.atan2((target - from).x);
        assert!((homing.heading() - expected).abs() < 1e-5);
        assert!((step.length() - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_homing_is_irreversible() {
        let mut homing = Homing::new(&tuning(), 25.0);
        // Too close: arrived
        homing.steer(Vec2::new(310.0, 300.0), Some(Vec2::new(300.0, 300.0)));
        assert!(!homing.is_homing());
        let heading = homing.heading();

        // Target back in perfect pursuit range
        for i in 0..20 {
            let step = homing.steer(
                Vec2::new(600.0, 300.0),
                Some(Vec2::new(400.0 - i as f32, 320.0)),
            );
            assert!(!homing.is_homing());
            assert_eq!(homing.heading(), heading);
            assert!((step - Vec2::from_angle(heading) * 7.0).length() < 1e-4);
        }
    }

    #[test]
    fn test_passed_target_stops_homing() {
        let mut homing = Homing::new(&tuning(), 25.0);
        homing.steer(Vec2::new(200.0, 300.0), Some(Vec2::new(250.0, 300.0)));
        assert!(!homing.is_homing());
    }

    #[test]
    fn test_lost_target_keeps_flying_left() {
        let mut homing = Homing::new(&tuning(), 25.0);
        let step = homing.steer(Vec2::new(200.0, 300.0), None);
        assert!(!homing.is_homing());
        assert!(step.x < -6.9);
    }

    #[test]
    fn test_expires_after_max_age() {
        let mut homing = Homing::new(&tuning(), 25.0);
        for _ in 0..300 {
            homing.steer(Vec2::ZERO, None);
        }
        assert!(!homing.is_expired());
        homing.steer(Vec2::ZERO, None);
        assert!(homing.is_expired());
        assert_eq!(homing.age(), 301);
    }
}
