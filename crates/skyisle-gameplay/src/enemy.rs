//! A flying pursuer.
//!
//! The enemy steers with the same controls a player has: each tick it picks
//! a movement intent toward its target and climbs or sinks to match the
//! target's height, then runs through [`movement::step`]. It never descends
//! far enough to land. When its hit points run out it disappears and comes
//! back near the target after a delay.

use serde::{Deserialize, Serialize};
use skyisle_common::WorldPoint;
use tracing::info;

use crate::config::EnemyConfig;
use crate::input::FrameInput;
use crate::movement::{self, LandQuery, MovableBody};

/// Distance per axis inside which the enemy stops steering on that axis.
const STEER_DEAD_ZONE: f32 = 8.0;

/// Height difference the enemy tolerates before climbing or sinking.
const HEIGHT_SLACK: f32 = 10.0;

/// Lowest the enemy sinks above the ground offset.
const FLOOR_CLEARANCE: f32 = 20.0;

/// Enemy state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Position, heading, height and speed
    pub body: MovableBody,
    hit_points: u32,
    max_hit_points: u32,
    respawn_timer: Option<f32>,
}

impl Enemy {
    /// Spawns an enemy relative to `target`.
    #[must_use]
    pub fn spawn(target: WorldPoint, config: &EnemyConfig) -> Self {
        Self {
            body: Self::spawn_body(target, config),
            hit_points: config.hit_points,
            max_hit_points: config.hit_points,
            respawn_timer: None,
        }
    }

    fn spawn_body(target: WorldPoint, config: &EnemyConfig) -> MovableBody {
        MovableBody::flying(
            target + config.spawn_offset,
            config.spawn_height,
            config.movement.cruise_speed,
            0.0,
        )
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hit_points(&self) -> u32 {
        self.hit_points
    }

    /// Hit points after a respawn.
    #[must_use]
    pub const fn max_hit_points(&self) -> u32 {
        self.max_hit_points
    }

    /// Whether the enemy is in the world.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.respawn_timer.is_none()
    }

    /// Steering intent toward `target`.
    #[must_use]
    pub fn intent_toward(&self, target: &MovableBody, config: &EnemyConfig) -> FrameInput {
        let delta = target.position - self.body.position;
        if delta.length_squared() > config.aggro_range * config.aggro_range {
            return FrameInput::default();
        }

        let axis = |d: f32| -> i8 {
            if d > STEER_DEAD_ZONE {
                1
            } else if d < -STEER_DEAD_ZONE {
                -1
            } else {
                0
            }
        };
        let rise = target.height - self.body.height;
        let floor = config.movement.ground_offset + FLOOR_CLEARANCE;
        FrameInput {
            ascend: rise > HEIGHT_SLACK,
            descend: rise < -HEIGHT_SLACK && self.body.height > floor,
            ..FrameInput::moving(axis(delta.x), axis(delta.y))
        }
    }

    /// Advances the enemy by one tick while chasing `target`.
    pub fn update(
        &mut self,
        target: &MovableBody,
        config: &EnemyConfig,
        dt: f32,
        land: &impl LandQuery,
    ) {
        if let Some(timer) = self.respawn_timer.as_mut() {
            *timer -= dt;
            if *timer <= 0.0 {
                self.body = Self::spawn_body(target.position, config);
                self.hit_points = self.max_hit_points;
                self.respawn_timer = None;
                info!(
                    "Enemy respawned at ({:.1}, {:.1})",
                    self.body.position.x, self.body.position.y
                );
            }
            return;
        }

        let intent = self.intent_toward(target, config);
        movement::step(&mut self.body, &config.movement, &intent, dt, land);
    }

    /// Applies damage. Returns `true` if this hit defeated the enemy.
    pub fn hit(&mut self, damage: u32, config: &EnemyConfig) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hit_points = self.hit_points.saturating_sub(damage);
        if self.hit_points > 0 {
            return false;
        }
        self.respawn_timer = Some(config.respawn_delay);
        info!(
            "Enemy defeated at ({:.1}, {:.1})",
            self.body.position.x, self.body.position.y
        );
        true
    }
}
