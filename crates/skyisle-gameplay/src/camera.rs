//! Damped pursuit camera.
//!
//! The camera tracks a point in world space. Each tick the tracked point is
//! carried along with the body it follows, then chases a lookahead point in
//! front of the body with a speed that ramps up, is capped, and slows down
//! as the residual shrinks. All camera math stays in world units; the
//! projection's vertical ratio is applied once, when converting to screen.

use serde::{Deserialize, Serialize};
use skyisle_common::{IsometricProjection, Viewport, WorldPoint};

use crate::config::{CameraConfig, MovementConfig};
use crate::movement::MovableBody;

/// Pursuit camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    tracked: WorldPoint,
    lookahead: WorldPoint,
    speed: f32,
    screen_origin: WorldPoint,
    viewport: Viewport,
    vertical_ratio: f32,
}

impl Camera {
    /// Creates a camera resting on `target`.
    #[must_use]
    pub fn new(target: WorldPoint, viewport: Viewport, projection: &IsometricProjection) -> Self {
        let mut camera = Self {
            tracked: target,
            lookahead: target,
            speed: 0.0,
            screen_origin: WorldPoint::ZERO,
            viewport,
            vertical_ratio: projection.vertical_ratio(),
        };
        camera.refresh_origin();
        camera
    }

    /// Point the camera is centered on.
    #[must_use]
    pub const fn tracked_point(&self) -> WorldPoint {
        self.tracked
    }

    /// Point the camera is chasing.
    #[must_use]
    pub const fn lookahead_target(&self) -> WorldPoint {
        self.lookahead
    }

    /// Current pursuit speed (px/tick).
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// World point shown at the top-left corner of the screen.
    #[must_use]
    pub const fn screen_origin(&self) -> WorldPoint {
        self.screen_origin
    }

    /// Visible surface.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Changes the visible surface.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.refresh_origin();
    }

    /// Advances the pursuit by one tick.
    pub fn update(&mut self, body: &MovableBody, movement: &MovementConfig, config: &CameraConfig) {
        let reach = (body.speed * config.lookahead_speed_factor)
            .max(movement.ground_speed * config.lookahead_ground_factor);
        self.lookahead = body.position + body.direction() * reach;

        self.tracked += body.position - body.previous_position;

        let residual = self.lookahead - self.tracked;
        let approach_cap = residual.length_squared() / config.approach_divisor + config.approach_floor;
        self.speed = (self.speed + config.acceleration)
            .min(config.max_speed)
            .min(approach_cap);

        let facing = residual.y.atan2(residual.x);
        let stride = WorldPoint::new(facing.cos(), facing.sin()) * self.speed;
        self.tracked.x += clamp_toward(stride.x, residual.x);
        self.tracked.y += clamp_toward(stride.y, residual.y);

        self.refresh_origin();
    }

    /// Screen position of a world point at `height`.
    #[must_use]
    pub fn world_to_screen(
        &self,
        point: WorldPoint,
        height: f32,
        projection: &IsometricProjection,
    ) -> WorldPoint {
        projection.world_to_screen(point, height, self.screen_origin)
    }

    fn refresh_origin(&mut self) {
        self.screen_origin = self.tracked - self.viewport.world_half_extent(self.vertical_ratio);
    }
}

/// Limits a step so it never passes the residual on its axis.
fn clamp_toward(step: f32, residual: f32) -> f32 {
    if residual >= 0.0 {
        step.clamp(0.0, residual)
    } else {
        step.clamp(residual, 0.0)
    }
}
