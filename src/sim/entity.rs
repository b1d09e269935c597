//! Entity model
//!
//! Everything the simulation moves is one [`Entity`] record: a transform, a
//! sprite-sized rectangle, a health pool and a handful of optional behaviour
//! components. Behaviour is selected by the closed [`ActorKind`] tag.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::{BossShield, MovePattern, ShieldEvent, ShieldHit};
use super::steering::Homing;
use crate::consts::{COLLISION_HEIGHT_FACTOR, COLLISION_WIDTH_FACTOR};
use crate::tuning::Tuning;

/// Registry-assigned identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test; rectangles that only touch do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }

    /// Same center, each axis scaled by its factor
    pub fn shrunk(&self, width_factor: f32, height_factor: f32) -> Rect {
        let size = Vec2::new(self.size.x * width_factor, self.size.y * height_factor);
        Rect {
            min: self.min + (self.size - size) * 0.5,
            size,
        }
    }

    /// True while any part of the rectangle overlaps the playfield
    pub fn is_on_screen(&self, screen: Screen) -> bool {
        let max = self.max();
        max.x > 0.0 && self.min.x < screen.width && max.y > 0.0 && self.min.y < screen.height
    }
}

/// Opaque visual identifier handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    PlayerPlane,
    EnemyPlane,
    BossPlane,
    PlayerShot,
    EnemyShot,
    BossShot,
}

impl Sprite {
    /// Image height in pixels
    pub const fn height(self) -> f32 {
        match self {
            Sprite::PlayerPlane => 150.0,
            Sprite::EnemyPlane => 150.0,
            Sprite::BossPlane => 300.0,
            Sprite::PlayerShot => 125.0,
            Sprite::EnemyShot => 50.0,
            Sprite::BossShot => 75.0,
        }
    }

    /// Width / height of the source image
    pub const fn aspect(self) -> f32 {
        match self {
            Sprite::PlayerPlane | Sprite::EnemyPlane => 1.3,
            Sprite::BossPlane => 1.1,
            Sprite::PlayerShot => 1.0,
            Sprite::EnemyShot | Sprite::BossShot => 1.0,
        }
    }

    /// Aspect-preserved visual size
    pub fn size(self) -> Vec2 {
        let height = self.height();
        Vec2::new(height * self.aspect(), height)
    }
}

/// Behaviour tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy,
    Boss,
    PlayerShot,
    EnemyShot,
    BossShot,
}

impl ActorKind {
    pub fn sprite(self) -> Sprite {
        match self {
            ActorKind::Player => Sprite::PlayerPlane,
            ActorKind::Enemy => Sprite::EnemyPlane,
            ActorKind::Boss => Sprite::BossPlane,
            ActorKind::PlayerShot => Sprite::PlayerShot,
            ActorKind::EnemyShot => Sprite::EnemyShot,
            ActorKind::BossShot => Sprite::BossShot,
        }
    }

    pub fn is_projectile(self) -> bool {
        matches!(
            self,
            ActorKind::PlayerShot | ActorKind::EnemyShot | ActorKind::BossShot
        )
    }
}

/// Hit points plus the monotonic destroyed flag.
///
/// Fields are private: the only ways to set `destroyed` are [`Health::damage`]
/// and [`Health::destroy`], and neither can clear it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
    destroyed: bool,
    single_hit: bool,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            destroyed: max == 0,
            single_hit: false,
        }
    }

    /// Projectiles: any damage destroys
    pub fn single_hit() -> Self {
        Self {
            current: 1,
            max: 1,
            destroyed: false,
            single_hit: true,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Fraction of max health remaining (0 when max is 0)
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    /// Apply one point of damage. Returns true if this hit destroyed it.
    pub fn damage(&mut self) -> bool {
        if self.single_hit {
            self.current = 0;
        } else {
            self.current = self.current.saturating_sub(1);
        }
        if self.current == 0 && !self.destroyed {
            self.destroyed = true;
            return true;
        }
        false
    }

    /// Mark destroyed without touching hit points (despawn)
    pub fn destroy(&mut self) -> bool {
        let newly = !self.destroyed;
        self.destroyed = true;
        newly
    }
}

/// How a weapon decides to fire
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Fired on request, then locked for `ticks`
    Cooldown { ticks: u32, remaining: u32 },
    /// Rolled once per tick by the AI
    Chance { per_tick: f64 },
}

/// Weapon component; only entities holding one can fire
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    /// Spawn point relative to the owner's top-left corner
    pub muzzle: Vec2,
    pub trigger: Trigger,
}

impl Weapon {
    pub fn manual(muzzle: Vec2, cooldown_ticks: u32) -> Self {
        Self {
            muzzle,
            trigger: Trigger::Cooldown {
                ticks: cooldown_ticks,
                remaining: 0,
            },
        }
    }

    pub fn automatic(muzzle: Vec2, per_tick: f64) -> Self {
        Self {
            muzzle,
            trigger: Trigger::Chance { per_tick },
        }
    }

    /// Tick the cooldown timer down
    pub fn cool_down(&mut self) {
        if let Trigger::Cooldown { remaining, .. } = &mut self.trigger {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn is_ready(&self) -> bool {
        match self.trigger {
            Trigger::Cooldown { remaining, .. } => remaining == 0,
            Trigger::Chance { .. } => true,
        }
    }

    /// Pull the trigger. Returns false while cooling down.
    pub fn pull(&mut self) -> bool {
        match &mut self.trigger {
            Trigger::Cooldown { ticks, remaining } => {
                if *remaining > 0 {
                    return false;
                }
                *remaining = *ticks;
                true
            }
            Trigger::Chance { .. } => true,
        }
    }

    /// Per-tick Bernoulli draw for AI weapons
    pub fn roll(&self, rng: &mut impl Rng) -> bool {
        match self.trigger {
            Trigger::Chance { per_tick } => rng.random::<f64>() < per_tick,
            Trigger::Cooldown { .. } => false,
        }
    }
}

/// Movement behaviour
#[derive(Debug, Clone)]
pub enum Motion {
    /// Player-controlled; each axis is -1, 0 or 1
    Piloted { vertical: f32, horizontal: f32, speed: f32 },
    /// Constant velocity
    Cruise { velocity: Vec2 },
    /// Steered projectile
    Homing(Homing),
    /// Boss vertical wandering
    Patrol(MovePattern),
}

/// What the world looks like to an entity during its update
#[derive(Debug, Clone, Copy)]
pub struct Surroundings {
    pub screen: Screen,
    /// The player's visual bounds, if still alive
    pub target: Option<Rect>,
}

/// Result of one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    /// Absorbed by an active shield
    Shield(ShieldHit),
    /// Applied to hit points; `destroyed` is true on the killing blow
    Hull { remaining: u32, destroyed: bool },
}

/// A simulated object
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: ActorKind,
    /// Spawn position (top-left)
    pub origin: Vec2,
    /// Accumulated movement since spawn
    pub offset: Vec2,
    size: Vec2,
    pub health: Health,
    pub motion: Motion,
    pub weapon: Option<Weapon>,
    pub shield: Option<BossShield>,
    /// Enemy planes hold fire once they fly past the player
    pub passed_target: bool,
}

impl Entity {
    fn new(kind: ActorKind, origin: Vec2, health: Health, motion: Motion) -> Self {
        Self {
            id: EntityId::default(),
            kind,
            origin,
            offset: Vec2::ZERO,
            size: kind.sprite().size(),
            health,
            motion,
            weapon: None,
            shield: None,
            passed_target: false,
        }
    }

    pub fn player(tuning: &Tuning, origin: Vec2, initial_health: u32) -> Self {
        let mut entity = Self::new(
            ActorKind::Player,
            origin,
            Health::new(initial_health),
            Motion::Piloted {
                vertical: 0.0,
                horizontal: 0.0,
                speed: tuning.player.speed,
            },
        );
        entity.weapon = Some(Weapon::manual(
            tuning.player.muzzle,
            tuning.player.fire_cooldown_ticks,
        ));
        entity
    }

    pub fn enemy(tuning: &Tuning, origin: Vec2) -> Self {
        let mut entity = Self::new(
            ActorKind::Enemy,
            origin,
            Health::new(tuning.enemy.health),
            Motion::Cruise {
                velocity: Vec2::new(-tuning.enemy.speed, 0.0),
            },
        );
        entity.weapon = Some(Weapon::automatic(
            tuning.enemy.muzzle,
            tuning.enemy.fire_chance,
        ));
        entity
    }

    pub fn boss(tuning: &Tuning, origin: Vec2, seed: u64) -> Self {
        let boss = &tuning.boss;
        let mut entity = Self::new(
            ActorKind::Boss,
            origin,
            Health::new(boss.health),
            Motion::Patrol(MovePattern::new(
                boss.vertical_speed,
                boss.move_repeats,
                boss.max_streak,
                seed,
            )),
        );
        entity.weapon = Some(Weapon::automatic(boss.muzzle, boss.fire_chance));
        entity.shield = Some(BossShield::new(&boss.shield));
        entity
    }

    pub fn player_shot(tuning: &Tuning, origin: Vec2) -> Self {
        Self::new(
            ActorKind::PlayerShot,
            origin,
            Health::single_hit(),
            Motion::Cruise {
                velocity: Vec2::new(tuning.player_shot.speed, 0.0),
            },
        )
    }

    pub fn enemy_shot(tuning: &Tuning, origin: Vec2) -> Self {
        let min_distance = Sprite::EnemyShot.height() / 2.0;
        Self::new(
            ActorKind::EnemyShot,
            origin,
            Health::single_hit(),
            Motion::Homing(Homing::new(&tuning.enemy_shot.homing(), min_distance)),
        )
    }

    pub fn boss_shot(tuning: &Tuning, origin: Vec2) -> Self {
        let min_distance = Sprite::BossShot.height() / 2.0;
        Self::new(
            ActorKind::BossShot,
            origin,
            Health::single_hit(),
            Motion::Homing(Homing::new(&tuning.boss_shot.homing(), min_distance)),
        )
    }

    /// Top-left corner of the visual rectangle
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.origin + self.offset
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Visual bounds
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position(), self.size)
    }

    /// Collision shape: visual bounds shrunk to 80% width, 40% height, centered
    pub fn collision_bounds(&self) -> Rect {
        self.bounds().shrunk(COLLISION_WIDTH_FACTOR, COLLISION_HEIGHT_FACTOR)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn is_destroyed(&self) -> bool {
        self.health.is_destroyed()
    }

    pub fn is_shielded(&self) -> bool {
        self.shield.as_ref().is_some_and(BossShield::is_active)
    }

    /// World-space spawn point for this entity's weapon
    pub fn muzzle(&self) -> Option<Vec2> {
        self.weapon.as_ref().map(|w| self.position() + w.muzzle)
    }

    /// Take one hit, routed to the shield while it is up
    pub fn take_damage(&mut self) -> Damage {
        if let Some(shield) = self.shield.as_mut().filter(|s| s.is_active()) {
            return Damage::Shield(shield.absorb());
        }
        let destroyed = self.health.damage();
        Damage::Hull {
            remaining: self.health.current(),
            destroyed,
        }
    }

    /// Despawn without damage (penetration, expiry, leaving the screen)
    pub fn destroy(&mut self) -> bool {
        self.health.destroy()
    }

    /// Piloted entities: set vertical direction
    pub fn steer_vertical(&mut self, direction: f32) {
        if let Motion::Piloted { vertical, .. } = &mut self.motion {
            *vertical = direction;
        }
    }

    /// Piloted entities: set horizontal direction
    pub fn steer_horizontal(&mut self, direction: f32) {
        if let Motion::Piloted { horizontal, .. } = &mut self.motion {
            *horizontal = direction;
        }
    }

    /// Advance movement and per-entity behaviour by one tick
    pub fn advance(
        &mut self,
        world: &Surroundings,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Option<ShieldEvent> {
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.cool_down();
        }

        match &mut self.motion {
            Motion::Piloted {
                vertical,
                horizontal,
                speed,
            } => {
                if *vertical != 0.0 || *horizontal != 0.0 {
                    self.offset += Vec2::new(*horizontal, *vertical) * *speed;
                    self.clamp_to(world.screen);
                }
            }
            Motion::Cruise { velocity } => {
                self.offset += *velocity;
                if self.kind == ActorKind::Enemy
                    && !self.passed_target
                    && world
                        .target
                        .is_some_and(|t| self.origin.x + self.offset.x < t.min.x)
                {
                    self.passed_target = true;
                }
            }
            Motion::Homing(homing) => {
                let from = self.origin + self.offset + self.size * 0.5;
                let step = homing.steer(from, world.target.map(|t| t.center()));
                self.offset += step;
                let expired = homing.is_expired();
                if expired || self.is_far_off_screen(world.screen) {
                    self.health.destroy();
                }
            }
            Motion::Patrol(pattern) => {
                let before = self.offset.y;
                self.offset.y += pattern.next_move();
                let y = self.origin.y + self.offset.y;
                if y < tuning.boss.band_min || y > tuning.boss.band_max {
                    self.offset.y = before;
                }
            }
        }

        if self.kind == ActorKind::PlayerShot && self.position().x > world.screen.width {
            self.health.destroy();
        }

        let Self { shield, health, .. } = self;
        shield.as_mut().and_then(|shield| shield.update(health, rng))
    }

    /// Keep the visual rectangle inside the screen
    fn clamp_to(&mut self, screen: Screen) {
        let max = (screen.size() - self.size).max(Vec2::ZERO);
        let clamped = self.position().clamp(Vec2::ZERO, max);
        self.offset = clamped - self.origin;
    }

    /// Beyond a margin of one sprite height around the screen
    fn is_far_off_screen(&self, screen: Screen) -> bool {
        let margin = self.size.y;
        let p = self.position();
        p.x < -margin
            || p.x > screen.width + margin
            || p.y < -margin
            || p.y > screen.height + margin
    }
}
