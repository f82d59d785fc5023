//! The wrapped world: a torus of quadrants and the islands active around
//! the player.

use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use skyisle_common::{
    EntityId, EntityIdAllocator, GridSize, IslandId, IsometricProjection, QuadrantCoord,
    SkyisleResult, Viewport, WorldError, WorldPoint,
};
use tracing::{debug, info};

use crate::assets::AssetProvider;
use crate::config::WorldConfig;
use crate::island::{Island, IslandTemplate, PlacedEntity, PlacedKind};
use crate::live::LiveEntities;
use crate::quadrant::{PopulateContext, Quadrant};

/// Outcome of one [`WorldMap::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationStats {
    /// Islands active after the update
    pub active: usize,
    /// Islands placed by populating quadrants for the first time
    pub placed: usize,
}

/// An item taken from the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedItem {
    /// Entity the item came from
    pub id: EntityId,
    /// Item name
    pub name: String,
    /// Stack size
    pub count: u32,
}

/// An NPC found near a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSighting {
    /// NPC entity
    pub id: EntityId,
    /// NPC name
    pub name: String,
    /// World position as seen from the player
    pub position: WorldPoint,
    /// Distance from the query point
    pub distance: f32,
}

/// A live entity resolved to its current world position.
#[derive(Debug, Clone, Copy)]
pub struct LiveEntityView<'a> {
    /// The attached entity
    pub entity: &'a PlacedEntity,
    /// World position, wrap shift included
    pub position: WorldPoint,
}

/// Grid of quadrants tiling a wrapped world.
pub struct WorldMap {
    config: WorldConfig,
    projection: IsometricProjection,
    templates: Vec<Arc<IslandTemplate>>,
    quadrants: Vec<Quadrant>,
    rng: fastrand::Rng,
    ids: EntityIdAllocator,
    live: LiveEntities,
    active: Vec<IslandId>,
    current: Option<QuadrantCoord>,
}

impl std::fmt::Debug for WorldMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldMap")
            .field("grid", &self.config.grid)
            .field("templates", &self.templates.len())
            .field("active", &self.active.len())
            .field("live", &self.live.len())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl WorldMap {
    /// Validates the config and bakes every island layout.
    pub fn new(
        config: WorldConfig,
        projection: IsometricProjection,
        assets: &dyn AssetProvider,
    ) -> SkyisleResult<Self> {
        config.validate()?;

        let templates = config
            .patterns
            .iter()
            .map(|pattern| {
                IslandTemplate::bake(pattern, &projection, &config.tileset, assets).map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let grid = config.grid;
        let quadrants = (0..grid.len())
            .map(|index| {
                Quadrant::new(
                    grid.coord_of(index),
                    index as u32,
                    config.quadrant_size,
                    config.target_density,
                )
            })
            .collect();

        info!(
            "World created: {}x{} quadrants, {} island layouts, seed {}",
            grid.width,
            grid.height,
            templates.len(),
            config.seed
        );

        Ok(Self {
            rng: fastrand::Rng::with_seed(config.seed),
            config,
            projection,
            templates,
            quadrants,
            ids: EntityIdAllocator::new(),
            live: LiveEntities::new(),
            active: Vec::new(),
            current: None,
        })
    }

    /// World settings.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Projection the islands were baked with.
    #[must_use]
    pub fn projection(&self) -> &IsometricProjection {
        &self.projection
    }

    /// Quadrant grid dimensions.
    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.config.grid
    }

    /// Wrapped quadrant the player was in at the last update.
    #[must_use]
    pub fn current_quadrant(&self) -> Option<QuadrantCoord> {
        self.current
    }

    /// Quadrant at a (possibly unwrapped) coordinate.
    #[must_use]
    pub fn quadrant(&self, coord: QuadrantCoord) -> Option<&Quadrant> {
        self.quadrants.get(self.config.grid.index_of(coord))
    }

    /// Number of quadrants that have been populated.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.quadrants.iter().filter(|q| q.is_populated()).count()
    }

    /// Total islands placed so far.
    #[must_use]
    pub fn island_count(&self) -> usize {
        self.quadrants.iter().map(|q| q.islands().len()).sum()
    }

    /// Looks up an island.
    #[must_use]
    pub fn island(&self, id: IslandId) -> Option<&Island> {
        self.quadrants
            .get(id.quadrant as usize)
            .and_then(|q| q.islands().get(id.index as usize))
    }

    /// Active islands in ID order.
    pub fn active_islands(&self) -> impl Iterator<Item = &Island> + '_ {
        self.active.iter().filter_map(|id| self.island(*id))
    }

    /// The live entity set.
    #[must_use]
    pub fn live(&self) -> &LiveEntities {
        &self.live
    }

    /// Live entities with their world positions, in ID order.
    #[must_use]
    pub fn live_entities(&self) -> Vec<LiveEntityView<'_>> {
        self.live
            .sorted_ids()
            .into_iter()
            .filter_map(|id| {
                let island = self.island(self.live.owner(id)?)?;
                let entity = island.entity(id)?;
                Some(LiveEntityView {
                    entity,
                    position: island.entity_position(entity),
                })
            })
            .collect()
    }

    /// Activates islands around the player and deactivates the rest.
    ///
    /// Visits the 3x3 block of quadrants around the player's quadrant,
    /// populating any visited for the first time. Neighbors across the wrap
    /// seam are shifted by whole world periods so they sit next to the player.
    pub fn update(&mut self, player: WorldPoint, viewport: &Viewport) -> ActivationStats {
        let grid = self.config.grid;
        let size = self.config.quadrant_size;
        let margin = viewport.world_diagonal(self.projection.vertical_ratio());
        let center = QuadrantCoord::from_world(player, size);

        let wrapped_center = center.wrapped(grid);
        if self.current != Some(wrapped_center) {
            debug!(
                "Player entered quadrant ({}, {})",
                wrapped_center.x, wrapped_center.y
            );
            self.current = Some(wrapped_center);
        }

        let mut stats = ActivationStats::default();
        let mut window = AHashSet::new();
        let mut now_active = Vec::new();

        for dy in -1..=1 {
            for dx in -1..=1 {
                let unwrapped = center.offset(dx, dy);
                let wrapped = unwrapped.wrapped(grid);
                let shift = WorldPoint::new(
                    (unwrapped.x - wrapped.x) as f32 * size.x,
                    (unwrapped.y - wrapped.y) as f32 * size.y,
                );
                let Some(quadrant) = self.quadrants.get_mut(grid.index_of(wrapped)) else {
                    continue;
                };

                let mut ctx = PopulateContext {
                    templates: &self.templates,
                    rng: &mut self.rng,
                    ids: &mut self.ids,
                    live: &mut self.live,
                    config: &self.config,
                };
                stats.placed += quadrant.ensure_populated(&mut ctx);

                for island in quadrant.islands_mut() {
                    window.insert(island.id());
                    island.set_shift(shift);
                    if island.is_within_range(player, margin) {
                        island.activate(&mut self.live);
                        now_active.push(island.id());
                    } else {
                        island.deactivate(&mut self.live);
                    }
                }
            }
        }

        // A jump of more than one quadrant leaves islands active outside the window
        for id in self.active.iter().filter(|id| !window.contains(*id)) {
            if let Some(island) = self
                .quadrants
                .get_mut(id.quadrant as usize)
                .and_then(|q| q.islands_mut().get_mut(id.index as usize))
            {
                island.deactivate(&mut self.live);
            }
        }

        now_active.sort_unstable();
        stats.active = now_active.len();
        self.active = now_active;
        stats
    }

    /// Whether a point lies over land on any active island.
    #[must_use]
    pub fn is_over_land(&self, point: WorldPoint) -> bool {
        self.active_islands()
            .any(|island| island.is_within_range(point, 0.0) && island.is_over_land(point))
    }

    /// Collects every live item within `radius` of `point`.
    pub fn collect_items_near(&mut self, point: WorldPoint, radius: f32) -> Vec<CollectedItem> {
        let reach = radius * radius;
        let mut collected = Vec::new();

        for id in &self.active {
            let Some(island) = self
                .quadrants
                .get_mut(id.quadrant as usize)
                .and_then(|q| q.islands_mut().get_mut(id.index as usize))
            else {
                continue;
            };

            let in_reach: Vec<EntityId> = island
                .attached()
                .iter()
                .filter(|e| !e.collected && matches!(e.kind, PlacedKind::Item { .. }))
                .filter(|e| island.entity_position(e).distance_squared(point) <= reach)
                .map(|e| e.id)
                .collect();

            for entity in in_reach {
                if let Some(PlacedKind::Item { name, count }) = island.collect(entity, &mut self.live) {
                    collected.push(CollectedItem {
                        id: entity,
                        name,
                        count,
                    });
                }
            }
        }
        collected
    }

    /// Nearest live NPC within `radius` of `point`.
    #[must_use]
    pub fn nearest_npc(&self, point: WorldPoint, radius: f32) -> Option<NpcSighting> {
        self.live_entities()
            .into_iter()
            .filter_map(|view| match &view.entity.kind {
                PlacedKind::Npc { name } => Some(NpcSighting {
                    id: view.entity.id,
                    name: name.clone(),
                    position: view.position,
                    distance: view.position.distance(point),
                }),
                PlacedKind::Item { .. } => None,
            })
            .filter(|sighting| sighting.distance <= radius)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticAssets;
    use skyisle_common::{ConfigError, SkyisleError};

    fn world(config: WorldConfig) -> WorldMap {
        WorldMap::new(
            config,
            IsometricProjection::default(),
            &StaticAssets::with_default_tiles(),
        )
        .expect("world")
    }

    fn live_count_from_islands(world: &WorldMap) -> usize {
        world
            .active_islands()
            .map(|i| i.attached().iter().filter(|e| !e.collected).count())
            .sum()
    }

    #[test]
    fn test_rejects_small_grid() {
        let config = WorldConfig {
            grid: GridSize::new(2, 2),
            ..Default::default()
        };
        let result = WorldMap::new(
            config,
            IsometricProjection::default(),
            &StaticAssets::with_default_tiles(),
        );
        assert!(matches!(result, Err(SkyisleError::Config(_))));
    }

    #[test]
    fn test_rejects_empty_pattern_list() {
        let config = WorldConfig {
            patterns: Vec::new(),
            ..Default::default()
        };
        let result = WorldMap::new(
            config,
            IsometricProjection::default(),
            &StaticAssets::with_default_tiles(),
        );
        assert!(matches!(
            result,
            Err(SkyisleError::Config(ConfigError::Invalid { field: "world.patterns", .. }))
        ));
    }

    #[test]
    fn test_missing_assets_surface_as_world_error() {
        let result = WorldMap::new(
            WorldConfig::default(),
            IsometricProjection::default(),
            &StaticAssets::new(),
        );
        assert!(matches!(
            result,
            Err(SkyisleError::World(WorldError::MissingAsset { .. }))
        ));
    }

    #[test]
    fn test_update_populates_three_by_three() {
        let mut world = world(WorldConfig::default());
        world.update(WorldPoint::new(100.0, 100.0), &Viewport::default());
        assert_eq!(world.populated_count(), 9);
        assert_eq!(world.current_quadrant(), Some(QuadrantCoord::new(0, 0)));

        // Staying put populates nothing new
        let stats = world.update(WorldPoint::new(120.0, 100.0), &Viewport::default());
        assert_eq!(stats.placed, 0);
        assert_eq!(world.populated_count(), 9);
    }

    #[test]
    fn test_active_islands_are_in_range() {
        let mut world = world(WorldConfig::default());
        let viewport = Viewport::default();
        let player = WorldPoint::new(1200.0, 1200.0);
        world.update(player, &viewport);

        let margin = viewport.world_diagonal(world.projection().vertical_ratio());
        for island in world.active_islands() {
            assert!(island.is_within_range(player, margin));
        }
        assert_eq!(world.live().len(), live_count_from_islands(&world));
    }

    #[test]
    fn test_seam_neighbors_are_shifted() {
        let config = WorldConfig {
            grid: GridSize::new(3, 3),
            ..Default::default()
        };
        let size = config.quadrant_size;
        let mut world = world(config);
        world.update(WorldPoint::new(10.0, 10.0), &Viewport::default());

        // Column 2 sits left of column 0 when the player is near x = 0
        let left = world.quadrant(QuadrantCoord::new(2, 0)).expect("quadrant");
        for island in left.islands() {
            assert!((island.shift().x + 3.0 * size.x).abs() < 1e-3);
            assert!(island.center().x < 0.0);
        }
        let same = world.quadrant(QuadrantCoord::new(0, 0)).expect("quadrant");
        for island in same.islands() {
            assert_eq!(island.shift(), WorldPoint::ZERO);
        }
    }

    #[test]
    fn test_far_jump_deactivates_old_window() {
        let mut world = world(WorldConfig::default());
        let viewport = Viewport::default();
        world.update(WorldPoint::new(1200.0, 1200.0), &viewport);
        let before: Vec<IslandId> = world.active_islands().map(Island::id).collect();

        // Four quadrants to the right: no overlap with the old window
        world.update(WorldPoint::new(1200.0 + 4.0 * 2400.0, 1200.0), &viewport);
        let grid = world.grid();
        let window: Vec<usize> = (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .map(|(dx, dy)| grid.index_of(QuadrantCoord::new(4 + dx, dy)))
            .collect();

        for id in &before {
            let island = world.island(*id).expect("island");
            assert!(!island.is_active() || window.contains(&(id.quadrant as usize)));
        }
        assert_eq!(world.live().len(), live_count_from_islands(&world));
    }

    #[test]
    fn test_land_queries_only_hit_active_islands() {
        let mut world = world(WorldConfig::default());
        let player = WorldPoint::new(1200.0, 1200.0);
        world.update(player, &Viewport::default());

        let land_point = world.active_islands().find_map(|island| {
            let cell = *island.template().land_cells().first()?;
            Some(island.center() + island.template().cell_offset(cell))
        });
        if let Some(point) = land_point {
            assert!(world.is_over_land(point));
        }

        // A point no island reaches
        let far = WorldPoint::new(-1.0e6, -1.0e6);
        assert!(!world.is_over_land(far));
    }

    #[test]
    fn test_collect_items_near_removes_from_live() {
        let config = WorldConfig {
            max_items_per_island: 3,
            ..Default::default()
        };
        let mut world = world(config);
        world.update(WorldPoint::new(1200.0, 1200.0), &Viewport::default());

        let target = world.live_entities().into_iter().find_map(|view| {
            matches!(view.entity.kind, PlacedKind::Item { .. }).then_some((view.entity.id, view.position))
        });
        let Some((id, position)) = target else {
            return;
        };

        let collected = world.collect_items_near(position, 1.0);
        assert!(collected.iter().any(|c| c.id == id));
        assert!(!world.live().contains(id));
        assert!(world.collect_items_near(position, 1.0).is_empty());
    }
}
