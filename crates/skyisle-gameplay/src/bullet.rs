//! Straight-flying projectiles.

use serde::{Deserialize, Serialize};

use crate::config::CombatConfig;
use crate::movement::MovableBody;

/// A projectile flying along a fixed heading until its lifetime runs out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    /// Position, heading, height and speed
    pub body: MovableBody,
    /// Seconds left before it vanishes
    pub remaining: f32,
    /// Hit points removed on contact
    pub damage: u32,
}

impl Bullet {
    /// Fires a bullet from `shooter` along its heading, inheriting its speed.
    #[must_use]
    pub fn fire(shooter: &MovableBody, combat: &CombatConfig) -> Self {
        Self {
            body: MovableBody::flying(
                shooter.position,
                shooter.height,
                shooter.speed + combat.bullet_speed,
                shooter.heading,
            ),
            remaining: combat.bullet_lifetime,
            damage: combat.bullet_damage,
        }
    }

    /// Moves the bullet. Returns `false` once it has expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.body.advance(dt);
        self.remaining -= dt;
        self.remaining > 0.0
    }

    /// Whether the bullet touches `target`.
    #[must_use]
    pub fn hits(&self, target: &MovableBody, combat: &CombatConfig) -> bool {
        self.body.position.distance_squared(target.position) <= combat.hit_radius * combat.hit_radius
            && (self.body.height - target.height).abs() <= combat.hit_height
    }
}
