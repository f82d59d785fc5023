//! The player character.

use serde::{Deserialize, Serialize};
use skyisle_common::WorldPoint;

use crate::bullet::Bullet;
use crate::config::{CombatConfig, MovementConfig};
use crate::input::FrameInput;
use crate::inventory::Inventory;
use crate::movement::{self, LandQuery, MovableBody, MoveEvent};

/// Player state: a movable body plus what it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Position, heading, height and speed
    pub body: MovableBody,
    /// Items collected so far
    pub inventory: Inventory,
    fire_cooldown: f32,
}

impl Player {
    /// Creates a player standing at `position`.
    #[must_use]
    pub fn new(position: WorldPoint, movement: &MovementConfig) -> Self {
        Self {
            body: MovableBody::grounded(position, movement),
            inventory: Inventory::new(),
            fire_cooldown: 0.0,
        }
    }

    /// World position.
    #[must_use]
    pub fn position(&self) -> WorldPoint {
        self.body.position
    }

    /// Height above the sea.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.body.height
    }

    /// Heading in `[0, 2π)`.
    #[must_use]
    pub fn heading(&self) -> f32 {
        self.body.heading
    }

    /// Whether the player is in the air.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.body.is_flying()
    }

    /// Moves the player for one tick.
    pub fn update(
        &mut self,
        input: &FrameInput,
        movement: &MovementConfig,
        dt: f32,
        land: &impl LandQuery,
    ) -> MoveEvent {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        movement::step(&mut self.body, movement, input, dt, land)
    }

    /// Fires a bullet if the weapon has cooled down.
    pub fn try_fire(&mut self, combat: &CombatConfig) -> Option<Bullet> {
        if self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = combat.fire_cooldown;
        Some(Bullet::fire(&self.body, combat))
    }
}
