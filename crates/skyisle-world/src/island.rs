//! Islands: baked tile grids placed in the world.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skyisle_common::{
    CellCoord, EntityId, IslandId, IsometricProjection, WorldError, WorldPoint,
};
use tracing::trace;

use crate::assets::AssetProvider;
use crate::live::LiveEntities;
use crate::patterns::IslandPattern;
use crate::tile_grid::{BakedGrid, TileGrid, Tileset};

/// A baked island layout, shared by every island built from it.
#[derive(Debug, Clone)]
pub struct IslandTemplate {
    name: String,
    grid: TileGrid,
    baked: BakedGrid,
    projection: IsometricProjection,
    anchor: WorldPoint,
    land_cells: Vec<CellCoord>,
}

impl IslandTemplate {
    /// Parses and bakes a pattern.
    pub fn bake(
        pattern: &IslandPattern,
        projection: &IsometricProjection,
        tileset: &Tileset,
        assets: &dyn AssetProvider,
    ) -> Result<Self, WorldError> {
        let grid = pattern.to_grid()?;
        let baked = grid.bake(projection, tileset, assets)?;
        let anchor = baked.anchor_from_center(projection);
        let land_cells = grid.land_cells();
        Ok(Self {
            name: pattern.name.clone(),
            grid,
            baked,
            projection: *projection,
            anchor,
            land_cells,
        })
    }

    /// Layout name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying cells.
    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// The cached bitmap description.
    #[must_use]
    pub fn baked(&self) -> &BakedGrid {
        &self.baked
    }

    /// Radius of the circle enclosing the bitmap.
    #[must_use]
    pub fn detection_radius(&self) -> f32 {
        self.baked.detection_radius
    }

    /// Land cells available for placing entities.
    #[must_use]
    pub fn land_cells(&self) -> &[CellCoord] {
        &self.land_cells
    }

    /// World offset from the island center to the middle of a cell.
    #[must_use]
    pub fn cell_offset(&self, cell: CellCoord) -> WorldPoint {
        self.baked.cell_center_from_center(cell, &self.projection)
    }
}

/// What a placed entity is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacedKind {
    /// A collectible stack
    Item {
        /// Item name
        name: String,
        /// Stack size
        count: u32,
    },
    /// A character the player can talk to
    Npc {
        /// Character name
        name: String,
    },
}

/// An entity attached to an island.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedEntity {
    /// Entity ID
    pub id: EntityId,
    /// Entity kind
    pub kind: PlacedKind,
    /// Offset from the island center
    pub offset: WorldPoint,
    /// Collected items never come back
    pub collected: bool,
}

impl PlacedEntity {
    /// Creates an uncollected entity.
    #[must_use]
    pub fn new(id: EntityId, kind: PlacedKind, offset: WorldPoint) -> Self {
        Self {
            id,
            kind,
            offset,
            collected: false,
        }
    }
}

/// A positioned instance of an island template.
#[derive(Debug, Clone)]
pub struct Island {
    id: IslandId,
    template: Arc<IslandTemplate>,
    center: WorldPoint,
    shift: WorldPoint,
    active: bool,
    attached: Vec<PlacedEntity>,
}

impl Island {
    /// Creates an inactive island centered at `center`.
    #[must_use]
    pub fn new(id: IslandId, template: Arc<IslandTemplate>, center: WorldPoint) -> Self {
        Self {
            id,
            template,
            center,
            shift: WorldPoint::ZERO,
            active: false,
            attached: Vec::new(),
        }
    }

    /// Island ID.
    #[must_use]
    pub const fn id(&self) -> IslandId {
        self.id
    }

    /// The shared layout.
    #[must_use]
    pub fn template(&self) -> &IslandTemplate {
        &self.template
    }

    /// Center inside the owning quadrant, ignoring any wrap shift.
    #[must_use]
    pub const fn base_center(&self) -> WorldPoint {
        self.center
    }

    /// Center as seen from the player, including the wrap shift.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        self.center + self.shift
    }

    /// Current wrap shift.
    #[must_use]
    pub const fn shift(&self) -> WorldPoint {
        self.shift
    }

    /// Moves the island by whole world periods so it sits next to the player.
    pub fn set_shift(&mut self, shift: WorldPoint) {
        self.shift = shift;
    }

    /// World position of the left vertex of cell (0, 0).
    #[must_use]
    pub fn grid_origin(&self) -> WorldPoint {
        self.center() + self.template.anchor
    }

    /// Radius used for culling.
    #[must_use]
    pub fn detection_radius(&self) -> f32 {
        self.template.detection_radius()
    }

    /// Whether the island is drawable and its entities are live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Makes the island live. Does nothing if already active.
    pub fn activate(&mut self, live: &mut LiveEntities) {
        if self.active {
            return;
        }
        self.active = true;
        for entity in self.attached.iter().filter(|e| !e.collected) {
            live.insert(entity.id, self.id);
        }
        trace!("Activated {} ({})", self.id, self.template.name);
    }

    /// Removes the island from play. Does nothing if already inactive.
    pub fn deactivate(&mut self, live: &mut LiveEntities) {
        if !self.active {
            return;
        }
        self.active = false;
        for entity in &self.attached {
            live.remove(entity.id);
        }
        trace!("Deactivated {} ({})", self.id, self.template.name);
    }

    /// Whether `point` is within `margin` of the detection circle.
    #[must_use]
    pub fn is_within_range(&self, point: WorldPoint, margin: f32) -> bool {
        let reach = self.detection_radius() + margin;
        point.distance_squared(self.center()) <= reach * reach
    }

    /// Whether `point` lies over one of this island's land cells.
    #[must_use]
    pub fn is_over_land(&self, point: WorldPoint) -> bool {
        self.template
            .grid
            .is_over_land(point, self.grid_origin(), &self.template.projection)
    }

    /// Attaches an entity. It goes live immediately if the island is active.
    pub fn attach(&mut self, entity: PlacedEntity, live: &mut LiveEntities) {
        if self.active && !entity.collected {
            live.insert(entity.id, self.id);
        }
        self.attached.push(entity);
    }

    /// Entities placed on this island.
    #[must_use]
    pub fn attached(&self) -> &[PlacedEntity] {
        &self.attached
    }

    /// Looks up an attached entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&PlacedEntity> {
        self.attached.iter().find(|e| e.id == id)
    }

    /// World position of an attached entity.
    #[must_use]
    pub fn entity_position(&self, entity: &PlacedEntity) -> WorldPoint {
        self.center() + entity.offset
    }

    /// Marks an item collected and takes it out of play.
    ///
    /// Returns the collected kind, or `None` if the entity is unknown, is an
    /// NPC, or was already collected.
    pub fn collect(&mut self, id: EntityId, live: &mut LiveEntities) -> Option<PlacedKind> {
        let entity = self
            .attached
            .iter_mut()
            .find(|e| e.id == id && !e.collected && matches!(e.kind, PlacedKind::Item { .. }))?;
        entity.collected = true;
        live.remove(id);
        Some(entity.kind.clone())
    }
}
