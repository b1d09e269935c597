//! Boss behaviour: shield state machine and vertical move pattern
//!
//! Shield lifecycle:
//! - `Down { cooldown: 0 }` -> `Up` when hull health is at or below the
//!   activation threshold and a Bernoulli draw succeeds
//! - `Up` -> `Down { cooldown }` after a fixed number of active ticks
//! - `Up` -> `Broken` when the shield pool is emptied by hits (terminal)
//!
//! The shield pool persists across activations and is only refilled when it
//! is empty at activation time.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::Health;
use crate::tuning::ShieldTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldState {
    /// Lowered; reactivation blocked while `cooldown > 0`
    Down { cooldown: u32 },
    /// Raised for `active_ticks` so far
    Up { active_ticks: u32 },
    /// Pool exhausted by damage; never comes back
    Broken,
}

/// Emitted by [`BossShield::update`] on a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldEvent {
    Raised { pool: u32 },
    Lowered,
}

/// Outcome of a hit landing on a raised shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldHit {
    Absorbed { remaining: u32 },
    Broken,
}

#[derive(Debug, Clone)]
pub struct BossShield {
    state: ShieldState,
    pool: u32,
    pool_max: u32,
    activation_threshold: f32,
    activation_chance: f64,
    active_ticks: u32,
    cooldown_ticks: u32,
}

impl BossShield {
    pub fn new(tuning: &ShieldTuning) -> Self {
        Self {
            state: ShieldState::Down { cooldown: 0 },
            pool: 0,
            pool_max: tuning.pool,
            activation_threshold: tuning.activation_threshold,
            activation_chance: tuning.activation_chance,
            active_ticks: tuning.active_ticks,
            cooldown_ticks: tuning.cooldown_ticks,
        }
    }

    pub fn state(&self) -> ShieldState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ShieldState::Up { .. })
    }

    pub fn is_broken(&self) -> bool {
        self.state == ShieldState::Broken
    }

    pub fn pool(&self) -> u32 {
        self.pool
    }

    pub fn pool_max(&self) -> u32 {
        self.pool_max
    }

    pub fn cooldown(&self) -> u32 {
        match self.state {
            ShieldState::Down { cooldown } => cooldown,
            _ => 0,
        }
    }

    /// Advance one tick
    pub fn update(&mut self, hull: &Health, rng: &mut impl Rng) -> Option<ShieldEvent> {
        match &mut self.state {
            ShieldState::Broken => None,
            ShieldState::Up { active_ticks } => {
                *active_ticks += 1;
                if *active_ticks >= self.active_ticks {
                    self.lower();
                    return Some(ShieldEvent::Lowered);
                }
                None
            }
            ShieldState::Down { cooldown } if *cooldown > 0 => {
                *cooldown -= 1;
                None
            }
            ShieldState::Down { .. } => {
                let wounded = hull.fraction() <= self.activation_threshold;
                if wounded && rng.random::<f64>() < self.activation_chance {
                    self.raise();
                    return Some(ShieldEvent::Raised { pool: self.pool });
                }
                None
            }
        }
    }

    /// Take one hit on the raised shield
    pub fn absorb(&mut self) -> ShieldHit {
        self.pool = self.pool.saturating_sub(1);
        if self.pool == 0 {
            self.state = ShieldState::Broken;
            log::debug!("boss shield broken");
            return ShieldHit::Broken;
        }
        ShieldHit::Absorbed {
            remaining: self.pool,
        }
    }

    fn raise(&mut self) {
        if self.pool == 0 {
            self.pool = self.pool_max;
        }
        self.state = ShieldState::Up { active_ticks: 0 };
    }

    fn lower(&mut self) {
        self.state = ShieldState::Down {
            cooldown: self.cooldown_ticks,
        };
    }
}

/// Seeded ring of vertical velocities.
///
/// Holds `{+v, -v, 0}` repeated `repeats` times. The cursor stays on one slot
/// for `max_streak` picks, then the ring is reshuffled and the cursor moves on.
#[derive(Debug, Clone)]
pub struct MovePattern {
    moves: Vec<f32>,
    cursor: usize,
    streak: u32,
    max_streak: u32,
    rng: Pcg32,
}

impl MovePattern {
    pub fn new(velocity: f32, repeats: u32, max_streak: u32, seed: u64) -> Self {
        let mut moves = Vec::with_capacity(repeats as usize * 3);
        for _ in 0..repeats {
            moves.extend_from_slice(&[velocity, -velocity, 0.0]);
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        moves.shuffle(&mut rng);
        Self {
            moves,
            cursor: 0,
            streak: 0,
            max_streak: max_streak.max(1),
            rng,
        }
    }

    pub fn next_move(&mut self) -> f32 {
        let current = self.moves.get(self.cursor).copied().unwrap_or(0.0);
        self.streak += 1;
        if self.streak >= self.max_streak {
            self.moves.shuffle(&mut self.rng);
            self.streak = 0;
            self.cursor += 1;
        }
        if self.cursor >= self.moves.len() {
            self.cursor = 0;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tuning() -> ShieldTuning {
        ShieldTuning {
            activation_threshold: 0.75,
            activation_chance: 1.0,
            active_ticks: 400,
            cooldown_ticks: 300,
            pool: 50,
        }
    }

    fn wounded() -> Health {
        let mut hull = Health::new(100);
        for _ in 0..25 {
            hull.damage();
        }
        hull
    }

    #[test]
    fn test_stays_down_while_healthy() {
        let mut shield = BossShield::new(&tuning());
        let mut rng = Pcg32::seed_from_u64(7);
        let mut hull = Health::new(100);
        for _ in 0..24 {
            hull.damage();
        }
        for _ in 0..1000 {
            assert_eq!(shield.update(&hull, &mut rng), None);
        }
        assert!(!shield.is_active());
    }

    #[test]
    fn test_raises_at_threshold_with_full_pool() {
        let mut shield = BossShield::new(&tuning());
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(
            shield.update(&wounded(), &mut rng),
            Some(ShieldEvent::Raised { pool: 50 })
        );
        assert!(shield.is_active());
    }

    #[test]
    fn test_times_out_then_cools_down() {
        let mut shield = BossShield::new(&tuning());
        let mut rng = Pcg32::seed_from_u64(7);
        let hull = wounded();
        shield.update(&hull, &mut rng);

        for _ in 0..399 {
            assert_eq!(shield.update(&hull, &mut rng), None);
        }
        assert_eq!(shield.update(&hull, &mut rng), Some(ShieldEvent::Lowered));
        assert_eq!(shield.state(), ShieldState::Down { cooldown: 300 });
        assert_eq!(shield.cooldown(), 300);

        for _ in 0..300 {
            assert_eq!(shield.update(&hull, &mut rng), None);
            assert!(!shield.is_active());
        }
        assert_eq!(shield.cooldown(), 0);
        assert!(matches!(
            shield.update(&hull, &mut rng),
            Some(ShieldEvent::Raised { .. })
        ));
    }

    #[test]
    fn test_pool_persists_across_activations() {
        let mut shield = BossShield::new(&tuning());
        let mut rng = Pcg32::seed_from_u64(7);
        let hull = wounded();
        shield.update(&hull, &mut rng);
        for _ in 0..10 {
            shield.absorb();
        }
        for _ in 0..400 {
            shield.update(&hull, &mut rng);
        }
        assert!(!shield.is_active());
        for _ in 0..301 {
            shield.update(&hull, &mut rng);
        }
        assert!(shield.is_active());
        assert_eq!(shield.pool(), 40);
    }

    #[test]
    fn test_emptied_pool_is_terminal() {
        let mut shield = BossShield::new(&tuning());
        let mut rng = Pcg32::seed_from_u64(7);
        let hull = wounded();
        shield.update(&hull, &mut rng);

        let mut last = shield.pool();
        for _ in 0..49 {
            match shield.absorb() {
                ShieldHit::Absorbed { remaining } => {
                    assert!(remaining < last);
                    last = remaining;
                }
                ShieldHit::Broken => panic!("broke early"),
            }
        }
        assert_eq!(shield.absorb(), ShieldHit::Broken);
        assert!(shield.is_broken());

        for _ in 0..2000 {
            assert_eq!(shield.update(&hull, &mut rng), None);
            assert!(!shield.is_active());
        }
        assert_eq!(shield.pool(), 0);
    }

    #[test]
    fn test_move_pattern_is_balanced_and_bounded() {
        let pattern = MovePattern::new(8.0, 5, 10, 42);
        assert_eq!(pattern.moves.len(), 15);
        assert_eq!(pattern.moves.iter().filter(|&&v| v == 8.0).count(), 5);
        assert_eq!(pattern.moves.iter().filter(|&&v| v == -8.0).count(), 5);

        let mut pattern = pattern;
        for _ in 0..1000 {
            let v = pattern.next_move();
            assert!(v == 8.0 || v == -8.0 || v == 0.0);
            assert!(pattern.cursor < 15);
        }
    }

    #[test]
    fn test_move_pattern_holds_each_pick_for_a_streak() {
        let mut pattern = MovePattern::new(8.0, 5, 10, 42);
        let first = pattern.moves[0];
        for _ in 0..10 {
            assert_eq!(pattern.next_move(), first);
        }
        assert_eq!(pattern.cursor, 1);
    }

    #[test]
    fn test_move_pattern_is_seeded() {
        let mut a = MovePattern::new(8.0, 5, 10, 99);
        let mut b = MovePattern::new(8.0, 5, 10, 99);
        for _ in 0..500 {
            assert_eq!(a.next_move(), b.next_move());
        }
    }
}
