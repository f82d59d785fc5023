//! Ground and flight movement shared by the player, the enemy and bullets.
//!
//! A body is either [`FlightState::Grounded`], walking at a fixed speed and
//! only onto land, or [`FlightState::Flying`], where speed ramps toward a
//! target, heading changes are rate limited and height follows the climb
//! controls. Ascending while grounded takes off; descending to the ground
//! offset and slowing to walking speed lands.

use serde::{Deserialize, Serialize};
use skyisle_common::{heading_of, turn_toward, WorldPoint};
use skyisle_world::WorldMap;
use tracing::debug;

use crate::config::MovementConfig;
use crate::input::FrameInput;

/// Movement mode of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlightState {
    /// Walking on land
    #[default]
    Grounded,
    /// In the air
    Flying,
}

/// State transitions reported by [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEvent {
    /// Nothing changed state
    None,
    /// Left the ground this tick
    TookOff,
    /// Touched down this tick
    Landed,
}

/// Answers whether a world point is walkable.
pub trait LandQuery {
    /// Whether `point` lies over land.
    fn is_over_land(&self, point: WorldPoint) -> bool;
}

impl LandQuery for WorldMap {
    fn is_over_land(&self, point: WorldPoint) -> bool {
        WorldMap::is_over_land(self, point)
    }
}

/// Position, heading, height and speed of anything that moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovableBody {
    /// World position
    pub position: WorldPoint,
    /// Position before the latest step
    pub previous_position: WorldPoint,
    /// Heading in `[0, 2π)`
    pub heading: f32,
    /// Height above the sea
    pub height: f32,
    /// Current speed (px/s)
    pub speed: f32,
    /// Movement mode
    pub state: FlightState,
}

impl MovableBody {
    /// A body standing still on the ground.
    #[must_use]
    pub fn grounded(position: WorldPoint, config: &MovementConfig) -> Self {
        Self {
            position,
            previous_position: position,
            heading: 0.0,
            height: config.ground_offset,
            speed: 0.0,
            state: FlightState::Grounded,
        }
    }

    /// A body already in the air.
    #[must_use]
    pub fn flying(position: WorldPoint, height: f32, speed: f32, heading: f32) -> Self {
        Self {
            position,
            previous_position: position,
            heading,
            height,
            speed,
            state: FlightState::Flying,
        }
    }

    /// Whether the body is in the air.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.state == FlightState::Flying
    }

    /// Unit vector along the heading.
    #[must_use]
    pub fn direction(&self) -> WorldPoint {
        WorldPoint::new(self.heading.cos(), self.heading.sin())
    }

    /// Moves straight along the heading at the current speed.
    pub fn advance(&mut self, dt: f32) {
        self.previous_position = self.position;
        self.position += self.direction() * self.speed * dt;
    }
}

/// Advances a body by one tick.
pub fn step(
    body: &mut MovableBody,
    config: &MovementConfig,
    input: &FrameInput,
    dt: f32,
    land: &impl LandQuery,
) -> MoveEvent {
    body.previous_position = body.position;
    match body.state {
        FlightState::Grounded => step_grounded(body, config, input, dt, land),
        FlightState::Flying => step_flying(body, config, input, dt),
    }
}

fn step_grounded(
    body: &mut MovableBody,
    config: &MovementConfig,
    input: &FrameInput,
    dt: f32,
    land: &impl LandQuery,
) -> MoveEvent {
    body.speed = 0.0;
    if input.has_movement() {
        body.heading = heading_of(f32::from(input.dx), f32::from(input.dy));
        let next = body.position + body.direction() * config.ground_speed * dt;
        if land.is_over_land(next) {
            body.position = next;
            body.speed = config.ground_speed;
        }
    }

    if input.ascend {
        body.state = FlightState::Flying;
        body.speed = config.ground_speed * 0.5;
        debug!(
            "Took off at ({:.1}, {:.1})",
            body.position.x, body.position.y
        );
        return MoveEvent::TookOff;
    }
    MoveEvent::None
}

fn step_flying(
    body: &mut MovableBody,
    config: &MovementConfig,
    input: &FrameInput,
    dt: f32,
) -> MoveEvent {
    let descending = input.descend && !input.ascend;

    if input.has_movement() {
        let desired = heading_of(f32::from(input.dx), f32::from(input.dy));
        body.heading = turn_toward(body.heading, desired, max_turn(body.speed, config) * dt);
    }

    // Sitting at the floor is judged before this tick's height change
    let at_floor = body.height <= config.ground_offset;
    if input.ascend {
        body.height = (body.height + config.climb_rate * dt).min(config.max_height);
    } else if descending {
        let drop = (2.0 * config.climb_rate * dt).min(body.height - config.ground_offset);
        body.height -= drop.max(0.0);
    }

    let target = if descending && at_floor {
        config.fly_speed_min
    } else if input.boost {
        config.fly_speed
    } else if input.brake {
        config.fly_speed_min
    } else {
        config.cruise_speed
    };
    let max_delta = config.fly_acceleration * dt;
    body.speed += (target - body.speed).clamp(-max_delta, max_delta);
    let ratio = body.speed / config.fly_speed;
    body.speed -= config.drag * ratio * ratio * dt;
    body.speed = body.speed.max(config.fly_speed_min).min(config.fly_speed);

    let distance = body.speed * dt;
    body.position += body.direction() * distance;

    if descending && at_floor && body.speed <= config.ground_speed {
        body.state = FlightState::Grounded;
        body.height = config.ground_offset;
        body.speed = config.ground_speed;
        debug!(
            "Landed at ({:.1}, {:.1})",
            body.position.x, body.position.y
        );
        return MoveEvent::Landed;
    }
    MoveEvent::None
}

/// Heading change rate, shrinking as flight speed grows.
fn max_turn(speed: f32, config: &MovementConfig) -> f32 {
    let span = (config.fly_speed - config.fly_speed_min).max(f32::EPSILON);
    let t = ((speed - config.fly_speed_min) / span).clamp(0.0, 1.0);
    config.turn_rate * (1.0 - config.turn_falloff * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use skyisle_common::angular_distance;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    struct FixedLand(bool);

    impl LandQuery for FixedLand {
        fn is_over_land(&self, _: WorldPoint) -> bool {
            self.0
        }
    }

    const EVERYWHERE: FixedLand = FixedLand(true);
    const NOWHERE: FixedLand = FixedLand(false);

    fn descend() -> FrameInput {
        FrameInput {
            descend: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn test_walk_four_quarter_seconds() {
        let config = MovementConfig::default();
        let mut body = MovableBody::grounded(WorldPoint::ZERO, &config);
        let input = FrameInput::moving(1, 0);
        for _ in 0..4 {
            step(&mut body, &config, &input, 0.25, &EVERYWHERE);
        }
        assert!((body.position.x - 200.0).abs() < 1e-3);
        assert!(body.position.y.abs() < 1e-3);
        assert!(body.heading.abs() < f32::EPSILON);
        assert!(!body.is_flying());
    }

    #[test]
    fn test_ground_move_blocked_by_water() {
        let config = MovementConfig::default();
        let mut body = MovableBody::grounded(WorldPoint::new(5.0, 5.0), &config);
        step(&mut body, &config, &FrameInput::moving(0, 1), 0.1, &NOWHERE);
        assert_eq!(body.position, WorldPoint::new(5.0, 5.0));
        // Heading still follows the intent
        assert!((body.heading - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_takeoff_sets_half_ground_speed() {
        let config = MovementConfig::default();
        let mut body = MovableBody::grounded(WorldPoint::ZERO, &config);
        let input = FrameInput {
            ascend: true,
            ..FrameInput::default()
        };
        let event = step(&mut body, &config, &input, 0.05, &NOWHERE);
        assert_eq!(event, MoveEvent::TookOff);
        assert!(body.is_flying());
        assert!((body.speed - config.ground_speed * 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_lands_on_first_tick_at_ground_speed() {
        let config = MovementConfig {
            fly_acceleration: 400.0,
            drag: 0.0,
            ..MovementConfig::default()
        };
        let mut body = MovableBody::flying(WorldPoint::ZERO, config.ground_offset, 350.0, 0.0);

        // 20 px/s lost per 0.05 s tick: 330, 310, ... 210 keep flying, 190 lands
        for tick in 1..=7 {
            let event = step(&mut body, &config, &descend(), 0.05, &NOWHERE);
            assert_eq!(event, MoveEvent::None, "landed early on tick {tick}");
            assert!(body.speed > config.ground_speed);
        }
        let event = step(&mut body, &config, &descend(), 0.05, &NOWHERE);
        assert_eq!(event, MoveEvent::Landed);
        assert_eq!(body.state, FlightState::Grounded);
        assert!((body.height - config.ground_offset).abs() < f32::EPSILON);
    }

    #[test]
    fn test_descending_above_floor_does_not_land() {
        let config = MovementConfig::default();
        let mut body = MovableBody::flying(WorldPoint::ZERO, 100.0, 150.0, 0.0);
        let event = step(&mut body, &config, &descend(), 0.05, &NOWHERE);
        assert_eq!(event, MoveEvent::None);
        assert!((body.height - 88.0).abs() < 1e-3);
        assert!(body.is_flying());

        // Never sinks below the ground offset
        for _ in 0..100 {
            step(&mut body, &config, &descend(), 0.05, &NOWHERE);
            assert!(body.height >= config.ground_offset - 1e-4);
        }
    }

    #[test]
    fn test_flight_speed_stays_in_range() {
        let config = MovementConfig::default();
        let mut body = MovableBody::flying(WorldPoint::ZERO, 50.0, config.fly_speed_min, 0.0);
        let boost = FrameInput {
            boost: true,
            ..FrameInput::default()
        };
        for _ in 0..200 {
            step(&mut body, &config, &boost, 0.05, &NOWHERE);
            assert!(body.speed <= config.fly_speed && body.speed >= config.fly_speed_min);
        }
        assert!(body.speed > config.cruise_speed);
    }

    #[test]
    fn test_flight_turn_is_rate_limited() {
        let config = MovementConfig::default();
        let mut body = MovableBody::flying(WorldPoint::ZERO, 50.0, config.fly_speed_min, 0.0);
        step(&mut body, &config, &FrameInput::moving(-1, 0), 0.05, &NOWHERE);

        let turned = angular_distance(body.heading, 0.0);
        assert!(turned > 0.0);
        assert!(turned <= config.turn_rate * 0.05 + 1e-5);
        assert!(angular_distance(body.heading, PI) < PI);
        assert!((0.0..TAU).contains(&body.heading));
    }

    proptest! {
        #[test]
        fn prop_flight_stays_in_bounds(
            inputs in prop::collection::vec((-1i8..=1, -1i8..=1, 0u8..16), 1..80),
        ) {
            let config = MovementConfig::default();
            let mut body = MovableBody::flying(WorldPoint::ZERO, 60.0, 300.0, 0.0);
            for (dx, dy, buttons) in inputs {
                let input = FrameInput {
                    ascend: buttons & 1 != 0,
                    descend: buttons & 2 != 0,
                    boost: buttons & 4 != 0,
                    brake: buttons & 8 != 0,
                    ..FrameInput::moving(dx, dy)
                };
                step(&mut body, &config, &input, 0.05, &NOWHERE);
                prop_assert!((0.0..TAU).contains(&body.heading));
                prop_assert!(body.height >= config.ground_offset - 1e-4);
                prop_assert!(body.height <= config.max_height + 1e-4);
                if body.is_flying() {
                    prop_assert!(body.speed >= config.fly_speed_min - 1e-3);
                    prop_assert!(body.speed <= config.fly_speed + 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_flight_ignores_land() {
        let config = MovementConfig::default();
        let mut body = MovableBody::flying(WorldPoint::ZERO, 50.0, 300.0, 0.0);
        step(&mut body, &config, &FrameInput::default(), 0.05, &NOWHERE);
        assert!(body.position.x > 0.0);
        assert_eq!(body.previous_position, WorldPoint::ZERO);
    }
}
