//! Tunables for movement, combat, the camera and the clock.
//!
//! Every struct deserializes with `#[serde(default)]`, so a TOML file only
//! needs the values it changes.

use serde::{Deserialize, Serialize};
use skyisle_common::{ConfigError, IsometricProjection, Viewport, WorldPoint};
use skyisle_world::WorldConfig;

/// Ground and flight dynamics shared by every movable body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed (px/s)
    pub ground_speed: f32,
    /// Top flight speed (px/s)
    pub fly_speed: f32,
    /// Slowest flight speed (px/s)
    pub fly_speed_min: f32,
    /// Flight speed with no boost or brake held (px/s)
    pub cruise_speed: f32,
    /// Largest flight speed change (px/s²)
    pub fly_acceleration: f32,
    /// Drag deceleration at top speed (px/s²), scaling with speed squared
    pub drag: f32,
    /// Climb rate while ascending (height/s); descent is twice as fast
    pub climb_rate: f32,
    /// Highest reachable height
    pub max_height: f32,
    /// Heading change rate at the slowest flight speed (rad/s)
    pub turn_rate: f32,
    /// Fraction of the turn rate lost at top speed
    pub turn_falloff: f32,
    /// Height of a body standing on the ground
    pub ground_offset: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            ground_speed: 200.0,
            fly_speed: 500.0,
            fly_speed_min: 100.0,
            cruise_speed: 350.0,
            fly_acceleration: 300.0,
            drag: 40.0,
            climb_rate: 120.0,
            max_height: 400.0,
            turn_rate: std::f32::consts::PI,
            turn_falloff: 0.3,
            ground_offset: 10.0,
        }
    }
}

impl MovementConfig {
    /// Checks structural constraints.
    pub fn validate(&self, section: &'static str) -> Result<(), ConfigError> {
        let positive = [
            (self.ground_speed, "ground_speed"),
            (self.fly_speed, "fly_speed"),
            (self.fly_speed_min, "fly_speed_min"),
            (self.climb_rate, "climb_rate"),
            (self.turn_rate, "turn_rate"),
        ];
        for (value, name) in positive {
            if value <= 0.0 {
                return Err(ConfigError::invalid(section, format!("{name} must be positive")));
            }
        }
        if self.fly_speed_min > self.fly_speed {
            return Err(ConfigError::invalid(
                section,
                format!(
                    "fly_speed_min ({}) exceeds fly_speed ({})",
                    self.fly_speed_min, self.fly_speed
                ),
            ));
        }
        if self.fly_speed_min > self.ground_speed {
            return Err(ConfigError::invalid(
                section,
                format!(
                    "fly_speed_min ({}) exceeds ground_speed ({}), landing is unreachable",
                    self.fly_speed_min, self.ground_speed
                ),
            ));
        }
        if self.fly_acceleration < 0.0 || self.drag < 0.0 {
            return Err(ConfigError::invalid(
                section,
                "fly_acceleration and drag must not be negative",
            ));
        }
        if !(0.0..1.0).contains(&self.turn_falloff) {
            return Err(ConfigError::invalid(section, "turn_falloff must be in [0, 1)"));
        }
        if self.max_height < self.ground_offset {
            return Err(ConfigError::invalid(
                section,
                "max_height is below ground_offset",
            ));
        }
        Ok(())
    }
}

/// The flying pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Whether an enemy is spawned at all
    pub enabled: bool,
    /// Movement tunables
    pub movement: MovementConfig,
    /// Hits needed to defeat it
    pub hit_points: u32,
    /// Spawn position relative to the player
    pub spawn_offset: WorldPoint,
    /// Spawn height
    pub spawn_height: f32,
    /// Seconds before a defeated enemy returns
    pub respawn_delay: f32,
    /// Distance within which it chases the player
    pub aggro_range: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            movement: MovementConfig {
                cruise_speed: 300.0,
                fly_speed: 420.0,
                turn_rate: std::f32::consts::FRAC_PI_2,
                ..MovementConfig::default()
            },
            hit_points: 3,
            spawn_offset: WorldPoint::new(600.0, -400.0),
            spawn_height: 120.0,
            respawn_delay: 5.0,
            aggro_range: 1600.0,
        }
    }
}

/// Bullets fired by the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Speed added to the shooter's own speed (px/s)
    pub bullet_speed: f32,
    /// Seconds a bullet lives
    pub bullet_lifetime: f32,
    /// Hit points removed per hit
    pub bullet_damage: u32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    /// Horizontal distance counted as a hit
    pub hit_radius: f32,
    /// Height difference counted as a hit
    pub hit_height: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            bullet_speed: 700.0,
            bullet_lifetime: 1.2,
            bullet_damage: 1,
            fire_cooldown: 0.25,
            hit_radius: 24.0,
            hit_height: 40.0,
        }
    }
}

/// Reach of pickups and conversations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Distance at which a grounded player picks up items
    pub pickup_radius: f32,
    /// Distance at which the player can talk to an NPC
    pub talk_range: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pickup_radius: 24.0,
            talk_range: 64.0,
        }
    }
}

/// Damped pursuit camera. Speeds are in world pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Speed gained per tick
    pub acceleration: f32,
    /// Speed cap
    pub max_speed: f32,
    /// Lookahead distance per unit of body speed
    pub lookahead_speed_factor: f32,
    /// Lookahead distance per unit of ground speed, as a floor
    pub lookahead_ground_factor: f32,
    /// Squared residual divisor of the approach speed cap
    pub approach_divisor: f32,
    /// Approach speed cap at zero residual
    pub approach_floor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            acceleration: 1.0,
            max_speed: 20.0,
            lookahead_speed_factor: 0.25,
            lookahead_ground_factor: 0.125,
            approach_divisor: 169.0,
            approach_floor: 0.25,
        }
    }
}

/// Frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Longest step a single tick may advance (s)
    pub max_step: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { max_step: 0.05 }
    }
}

/// Everything a [`crate::simulation::Simulation`] is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Screen projection
    pub projection: IsometricProjection,
    /// Visible surface
    pub viewport: Viewport,
    /// Quadrant torus and islands
    pub world: WorldConfig,
    /// Player movement
    pub movement: MovementConfig,
    /// Enemy behavior
    pub enemy: EnemyConfig,
    /// Bullets
    pub combat: CombatConfig,
    /// Pickups and conversations
    pub interaction: InteractionConfig,
    /// Camera pursuit
    pub camera: CameraConfig,
    /// Frame clock
    pub clock: ClockConfig,
    /// Where the player starts
    pub player_start: WorldPoint,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            projection: IsometricProjection::default(),
            viewport: Viewport::default(),
            world: WorldConfig::default(),
            movement: MovementConfig::default(),
            enemy: EnemyConfig::default(),
            combat: CombatConfig::default(),
            interaction: InteractionConfig::default(),
            camera: CameraConfig::default(),
            clock: ClockConfig::default(),
            player_start: WorldPoint::new(1200.0, 1200.0),
        }
    }
}

impl SimulationConfig {
    /// Checks every section for structurally invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projection.tile_width <= 0.0 || self.projection.tile_height <= 0.0 {
            return Err(ConfigError::invalid(
                "projection",
                "tile dimensions must be positive",
            ));
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ConfigError::invalid("viewport", "size must be positive"));
        }
        self.world.validate()?;
        self.movement.validate("movement")?;
        if self.enemy.enabled {
            self.enemy.movement.validate("enemy.movement")?;
            if self.enemy.hit_points == 0 {
                return Err(ConfigError::invalid("enemy", "hit_points must be at least 1"));
            }
        }
        if self.combat.bullet_lifetime <= 0.0 || self.combat.fire_cooldown < 0.0 {
            return Err(ConfigError::invalid(
                "combat",
                "bullet_lifetime must be positive and fire_cooldown not negative",
            ));
        }
        if self.camera.approach_divisor <= 0.0 || self.camera.max_speed <= 0.0 {
            return Err(ConfigError::invalid(
                "camera",
                "approach_divisor and max_speed must be positive",
            ));
        }
        if self.clock.max_step <= 0.0 {
            return Err(ConfigError::invalid("clock", "max_step must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyisle_common::GridSize;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.movement.ground_speed, 200.0);
        assert_eq!(config.clock.max_step, 0.05);
    }

    #[test]
    fn test_fly_speed_min_above_max_rejected() {
        let mut config = SimulationConfig::default();
        config.movement.fly_speed_min = 600.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "movement", .. })
        ));
    }

    #[test]
    fn test_fly_speed_min_above_ground_speed_rejected() {
        let mut config = SimulationConfig::default();
        config.movement.fly_speed_min = 250.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "movement", .. })
        ));

        config.movement.fly_speed_min = config.movement.ground_speed;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_world_errors_propagate() {
        let mut config = SimulationConfig::default();
        config.world.grid = GridSize::new(1, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "world.grid", .. })
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SimulationConfig = toml::from_str(
            r"
            [movement]
            ground_speed = 150.0

            [world]
            seed = 9
            ",
        )
        .expect("parse");
        assert_eq!(config.movement.ground_speed, 150.0);
        assert_eq!(config.movement.fly_speed, 500.0);
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.world.grid, GridSize::new(8, 8));
    }
}
