//! One owner for all game state, and the per-tick update order.
//!
//! A tick runs to completion before anything reads the state:
//! 1. the clock clamps the elapsed time
//! 2. the player moves, walking only onto land
//! 3. the world activates islands around the player's new position
//! 4. the enemy chases, bullets fly and hit, items are picked up
//! 5. interaction finds the nearest NPC
//! 6. the camera pursues its lookahead point
//!
//! Rendering reads [`Simulation::draw_list`] and the camera afterwards.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use skyisle_common::{EntityId, IslandId, SkyisleResult, WorldPoint};
use skyisle_world::{
    ActivationStats, AssetProvider, BitmapSize, CollectedItem, NpcSighting, PlacedKind, WorldMap,
};
use tracing::{debug, info};

use crate::bullet::Bullet;
use crate::camera::Camera;
use crate::clock::Clock;
use crate::config::SimulationConfig;
use crate::enemy::Enemy;
use crate::input::FrameInput;
use crate::inventory::Inventory;
use crate::movement::{MovableBody, MoveEvent};
use crate::player::Player;

/// How high something is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Elevation {
    /// Standing on an island or lying on it
    Ground,
    /// In the air at a height, casting a shadow
    Airborne(f32),
}

impl Elevation {
    /// Elevation of a movable body.
    #[must_use]
    pub fn of(body: &MovableBody) -> Self {
        if body.is_flying() {
            Self::Airborne(body.height)
        } else {
            Self::Ground
        }
    }

    /// Height used for depth sorting.
    #[must_use]
    pub const fn height(self) -> f32 {
        match self {
            Self::Ground => 0.0,
            Self::Airborne(height) => height,
        }
    }
}

/// Draw pass an item belongs to. Terrain is drawn before objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrawLayer {
    /// Island bitmaps
    Terrain,
    /// Everything standing on or flying over them
    Object,
}

/// What a draw item shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawKind {
    /// A baked island bitmap
    Island {
        /// Island ID
        id: IslandId,
        /// Layout name
        layout: String,
        /// Bitmap size
        size: BitmapSize,
    },
    /// An item lying on an island
    Item {
        /// Entity ID
        id: EntityId,
        /// Item name
        name: String,
    },
    /// A character standing on an island
    Npc {
        /// Entity ID
        id: EntityId,
        /// NPC name
        name: String,
    },
    /// The player
    Player,
    /// The enemy
    Enemy,
    /// A bullet
    Bullet,
}

/// One entry of the ordered draw list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawItem {
    /// Draw pass
    pub layer: DrawLayer,
    /// What to draw
    pub kind: DrawKind,
    /// World position, wrap shift included
    pub position: WorldPoint,
    /// Ground or airborne
    pub elevation: Elevation,
    /// Screen position: the bitmap's top-left corner for islands, the
    /// sprite anchor otherwise
    pub screen: WorldPoint,
    /// Screen position of the shadow, for airborne items
    pub shadow: Option<WorldPoint>,
}

impl DrawItem {
    /// Depth key within a layer.
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.position.y + self.elevation.height()
    }

    fn draw_order(&self, other: &Self) -> Ordering {
        self.layer
            .cmp(&other.layer)
            .then_with(|| self.depth().total_cmp(&other.depth()))
    }
}

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Seconds simulated after clamping
    pub dt: f32,
    /// Player takeoff or landing
    pub movement: Option<MoveEvent>,
    /// Island activation around the player
    pub activation: ActivationStats,
    /// Items picked up this tick
    pub picked_up: Vec<CollectedItem>,
    /// Bullets that hit the enemy this tick
    pub hits: u32,
    /// Whether the enemy was defeated this tick
    pub enemy_defeated: bool,
    /// NPC reached by the interact input
    pub talked_to: Option<NpcSighting>,
}

/// Serializable summary of the simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ticks run so far
    pub ticks: u64,
    /// Simulated seconds
    pub game_time: f64,
    /// Player position
    pub player_position: WorldPoint,
    /// Player height
    pub player_height: f32,
    /// Player heading
    pub player_heading: f32,
    /// Whether the player is flying
    pub player_flying: bool,
    /// Items carried
    pub inventory: Inventory,
    /// Enemy hit points, if it is in the world
    pub enemy_hit_points: Option<u32>,
    /// Bullets in flight
    pub bullets: usize,
    /// Islands currently active
    pub active_islands: usize,
    /// Quadrants populated so far
    pub populated_quadrants: usize,
    /// Live entities
    pub live_entities: usize,
    /// World point at the top-left corner of the screen
    pub screen_origin: WorldPoint,
}

/// The whole game state.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: WorldMap,
    player: Player,
    enemy: Option<Enemy>,
    bullets: Vec<Bullet>,
    camera: Camera,
    clock: Clock,
    ticks: u64,
}

impl Simulation {
    /// Validates the config, builds the world and places the player.
    pub fn new(config: SimulationConfig, assets: &dyn AssetProvider) -> SkyisleResult<Self> {
        config.validate()?;

        let mut world = WorldMap::new(config.world.clone(), config.projection, assets)?;
        let player = Player::new(config.player_start, &config.movement);
        let stats = world.update(player.position(), &config.viewport);
        let enemy = config
            .enemy
            .enabled
            .then(|| Enemy::spawn(player.position(), &config.enemy));
        let camera = Camera::new(player.position(), config.viewport, &config.projection);
        let clock = Clock::new(&config.clock);

        info!(
            "Simulation ready: player at ({:.1}, {:.1}), {} islands active",
            player.position().x,
            player.position().y,
            stats.active
        );

        Ok(Self {
            config,
            world,
            player,
            enemy,
            bullets: Vec::new(),
            camera,
            clock,
            ticks: 0,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &WorldMap {
        &self.world
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access, for teleports and scripted setups.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The enemy, if enabled.
    #[must_use]
    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    /// Bullets in flight.
    #[must_use]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether a point lies over land on an active island.
    #[must_use]
    pub fn is_over_land(&self, point: WorldPoint) -> bool {
        self.world.is_over_land(point)
    }

    /// Measures wall time with the clock and runs one tick.
    pub fn tick(&mut self, input: &FrameInput) -> StepReport {
        let dt = self.clock.tick();
        self.run(input, dt)
    }

    /// Runs one tick for an externally measured interval.
    pub fn step(&mut self, input: &FrameInput, elapsed: f32) -> StepReport {
        let dt = self.clock.advance(elapsed);
        self.run(input, dt)
    }

    fn run(&mut self, input: &FrameInput, dt: f32) -> StepReport {
        self.ticks += 1;
        let mut report = StepReport {
            dt,
            ..StepReport::default()
        };

        let event = self
            .player
            .update(input, &self.config.movement, dt, &self.world);
        if event != MoveEvent::None {
            report.movement = Some(event);
        }

        report.activation = self
            .world
            .update(self.player.position(), &self.config.viewport);

        if let Some(enemy) = self.enemy.as_mut() {
            enemy.update(&self.player.body, &self.config.enemy, dt, &self.world);
        }

        if input.fire {
            if let Some(bullet) = self.player.try_fire(&self.config.combat) {
                self.bullets.push(bullet);
            }
        }
        self.update_bullets(dt, &mut report);

        if !self.player.is_flying() {
            report.picked_up = self
                .world
                .collect_items_near(self.player.position(), self.config.interaction.pickup_radius);
            for item in &report.picked_up {
                self.player.inventory.add(&item.name, item.count as i32);
                info!("Picked up {} x{}", item.name, item.count);
            }
        }

        if input.interact {
            report.talked_to = self
                .world
                .nearest_npc(self.player.position(), self.config.interaction.talk_range);
            match &report.talked_to {
                Some(npc) => info!("Talking to {}", npc.name),
                None => debug!("Nobody within talking range"),
            }
        }

        self.camera
            .update(&self.player.body, &self.config.movement, &self.config.camera);
        report
    }

    fn update_bullets(&mut self, dt: f32, report: &mut StepReport) {
        let combat = &self.config.combat;
        let enemy_config = &self.config.enemy;
        let mut enemy = self.enemy.as_mut().filter(|e| e.is_alive());

        self.bullets.retain_mut(|bullet| {
            if !bullet.update(dt) {
                return false;
            }
            let Some(target) = enemy.as_deref_mut() else {
                return true;
            };
            if !target.is_alive() || !bullet.hits(&target.body, combat) {
                return true;
            }
            report.hits += 1;
            if target.hit(bullet.damage, enemy_config) {
                report.enemy_defeated = true;
            }
            false
        });
    }

    /// Everything visible, in draw order.
    ///
    /// Terrain comes first, then objects; within a layer items are sorted by
    /// `y + height`, so nearer and higher things draw over farther ones.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let projection = &self.config.projection;
        let camera = &self.camera;
        let mut items = Vec::new();

        for island in self.world.active_islands() {
            let size = island.template().baked().size;
            let half = WorldPoint::new(size.width / 2.0, size.height / 2.0);
            items.push(DrawItem {
                layer: DrawLayer::Terrain,
                kind: DrawKind::Island {
                    id: island.id(),
                    layout: island.template().name().to_string(),
                    size,
                },
                position: island.center(),
                elevation: Elevation::Ground,
                screen: camera.world_to_screen(island.center(), 0.0, projection) - half,
                shadow: None,
            });
        }

        for view in self.world.live_entities() {
            let kind = match &view.entity.kind {
                PlacedKind::Item { name, .. } => DrawKind::Item {
                    id: view.entity.id,
                    name: name.clone(),
                },
                PlacedKind::Npc { name } => DrawKind::Npc {
                    id: view.entity.id,
                    name: name.clone(),
                },
            };
            items.push(DrawItem {
                layer: DrawLayer::Object,
                kind,
                position: view.position,
                elevation: Elevation::Ground,
                screen: camera.world_to_screen(view.position, 0.0, projection),
                shadow: None,
            });
        }

        let bodies = std::iter::once((DrawKind::Player, &self.player.body))
            .chain(
                self.enemy
                    .iter()
                    .filter(|e| e.is_alive())
                    .map(|e| (DrawKind::Enemy, &e.body)),
            )
            .chain(self.bullets.iter().map(|b| (DrawKind::Bullet, &b.body)));
        for (kind, body) in bodies {
            let elevation = Elevation::of(body);
            let shadow = match elevation {
                Elevation::Airborne(height) => Some(projection.shadow_to_screen(
                    body.position,
                    height,
                    camera.screen_origin(),
                )),
                Elevation::Ground => None,
            };
            items.push(DrawItem {
                layer: DrawLayer::Object,
                kind,
                position: body.position,
                elevation,
                screen: camera.world_to_screen(body.position, elevation.height(), projection),
                shadow,
            });
        }

        items.sort_by(DrawItem::draw_order);
        items
    }

    /// Summary of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ticks: self.ticks,
            game_time: self.clock.game_time(),
            player_position: self.player.position(),
            player_height: self.player.height(),
            player_heading: self.player.heading(),
            player_flying: self.player.is_flying(),
            inventory: self.player.inventory.clone(),
            enemy_hit_points: self
                .enemy
                .as_ref()
                .filter(|e| e.is_alive())
                .map(Enemy::hit_points),
            bullets: self.bullets.len(),
            active_islands: self.world.active_islands().count(),
            populated_quadrants: self.world.populated_count(),
            live_entities: self.world.live().len(),
            screen_origin: self.camera.screen_origin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyisle_world::StaticAssets;

    fn simulation(config: SimulationConfig) -> Simulation {
        Simulation::new(config, &StaticAssets::with_default_tiles()).expect("simulation")
    }

    /// First seed whose starting neighborhood shows a live entity matching `want`.
    fn seeded_with(want: fn(&PlacedKind) -> bool) -> (Simulation, WorldPoint) {
        for seed in 0..64 {
            let mut config = SimulationConfig::default();
            config.world.seed = seed;
            config.enemy.enabled = false;
            let sim = simulation(config);
            let found = sim
                .world()
                .live_entities()
                .into_iter()
                .find(|view| want(&view.entity.kind))
                .map(|view| view.position);
            if let Some(position) = found {
                return (sim, position);
            }
        }
        panic!("no seed produced a matching entity near the start");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.clock.max_step = 0.0;
        assert!(Simulation::new(config, &StaticAssets::with_default_tiles()).is_err());
    }

    #[test]
    fn test_step_clamps_elapsed_time() {
        let mut sim = simulation(SimulationConfig::default());
        let report = sim.step(&FrameInput::default(), 3.0);
        assert!(report.dt <= 0.05);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_grounded_player_picks_up_item() {
        let (mut sim, position) = seeded_with(|kind| matches!(kind, PlacedKind::Item { .. }));
        sim.player_mut().body.position = position;
        let live_before = sim.world().live().len();

        let report = sim.step(&FrameInput::default(), 0.05);
        assert!(!report.picked_up.is_empty());
        for item in &report.picked_up {
            assert!(sim.player().inventory.has(&item.name, item.count));
        }
        assert!(sim.world().live().len() < live_before);

        // Collected items stay gone
        let again = sim.step(&FrameInput::default(), 0.05);
        assert!(again.picked_up.is_empty());
    }

    #[test]
    fn test_flying_player_does_not_pick_up() {
        let (mut sim, position) = seeded_with(|kind| matches!(kind, PlacedKind::Item { .. }));
        let height = sim.config().movement.ground_offset + 50.0;
        sim.player_mut().body = MovableBody::flying(position, height, 100.0, 0.0);

        let report = sim.step(&FrameInput::default(), 0.0);
        assert!(report.picked_up.is_empty());
        assert!(sim.player().inventory.is_empty());
    }

    #[test]
    fn test_interact_finds_npc() {
        let (mut sim, position) = seeded_with(|kind| matches!(kind, PlacedKind::Npc { .. }));
        sim.player_mut().body.position = position;

        let quiet = sim.step(&FrameInput::default(), 0.05);
        assert!(quiet.talked_to.is_none());

        let input = FrameInput {
            interact: true,
            ..FrameInput::default()
        };
        let report = sim.step(&input, 0.05);
        assert!(report.talked_to.is_some());
    }

    #[test]
    fn test_bullet_damages_enemy() {
        let mut config = SimulationConfig::default();
        config.enemy.spawn_offset = WorldPoint::new(60.0, 0.0);
        config.enemy.spawn_height = config.movement.ground_offset + 10.0;
        config.enemy.aggro_range = 0.0;
        let mut sim = simulation(config);
        let full = sim.enemy().map(Enemy::hit_points);

        let fire = FrameInput {
            fire: true,
            ..FrameInput::default()
        };
        let mut hits = sim.step(&fire, 0.05).hits;
        for _ in 0..20 {
            hits += sim.step(&FrameInput::default(), 0.05).hits;
        }

        assert_eq!(hits, 1);
        assert_eq!(sim.enemy().map(Enemy::hit_points), full.map(|hp| hp - 1));
        assert!(sim.bullets().is_empty());
    }

    #[test]
    fn test_draw_list_order() {
        let mut config = SimulationConfig::default();
        config.enemy.spawn_offset = WorldPoint::new(40.0, -30.0);
        let mut sim = simulation(config);
        sim.step(&FrameInput::default(), 0.05);

        let items = sim.draw_list();
        assert_eq!(
            items.iter().filter(|i| i.kind == DrawKind::Player).count(),
            1
        );
        assert!(items.iter().any(|i| i.kind == DrawKind::Enemy));

        for pair in items.windows(2) {
            assert!(pair[0].layer <= pair[1].layer);
            if pair[0].layer == pair[1].layer {
                assert!(pair[0].depth() <= pair[1].depth());
            }
        }

        let enemy = items
            .iter()
            .find(|i| i.kind == DrawKind::Enemy)
            .expect("enemy drawn");
        assert!(matches!(enemy.elevation, Elevation::Airborne(_)));
        assert!(enemy.shadow.is_some());
    }

    #[test]
    fn test_airborne_sorts_by_height() {
        let ground = DrawItem {
            layer: DrawLayer::Object,
            kind: DrawKind::Player,
            position: WorldPoint::new(0.0, 100.0),
            elevation: Elevation::Ground,
            screen: WorldPoint::ZERO,
            shadow: None,
        };
        let high = DrawItem {
            position: WorldPoint::new(0.0, 60.0),
            elevation: Elevation::Airborne(80.0),
            kind: DrawKind::Enemy,
            ..ground.clone()
        };
        let terrain = DrawItem {
            layer: DrawLayer::Terrain,
            position: WorldPoint::new(0.0, 500.0),
            kind: DrawKind::Bullet,
            ..ground.clone()
        };

        let mut items = vec![high.clone(), ground.clone(), terrain.clone()];
        items.sort_by(DrawItem::draw_order);
        assert_eq!(items, vec![terrain, ground, high]);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let sim = simulation(SimulationConfig::default());
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.ticks, 0);
        assert!(!snapshot.player_flying);
        assert_eq!(snapshot.active_islands, sim.world().active_islands().count());
    }
}
