//! Quadrants: fixed world regions that populate themselves on first visit.

use std::sync::Arc;

use skyisle_common::{EntityIdAllocator, IslandId, QuadrantCoord, WorldPoint};
use tracing::debug;

use crate::config::WorldConfig;
use crate::island::{Island, IslandTemplate, PlacedEntity, PlacedKind};
use crate::live::LiveEntities;

/// Shared state a quadrant draws on while populating.
pub struct PopulateContext<'a> {
    /// Layouts to choose from
    pub templates: &'a [Arc<IslandTemplate>],
    /// Placement randomness
    pub rng: &'a mut fastrand::Rng,
    /// Entity ID source
    pub ids: &'a mut EntityIdAllocator,
    /// The live set, for islands that happen to be active
    pub live: &'a mut LiveEntities,
    /// Population settings
    pub config: &'a WorldConfig,
}

/// A rectangular region of the world holding its islands.
#[derive(Debug, Clone)]
pub struct Quadrant {
    coord: QuadrantCoord,
    index: u32,
    size: WorldPoint,
    target_density: f32,
    islands: Vec<Island>,
    populated: bool,
}

impl Quadrant {
    /// Creates an unpopulated quadrant at a wrapped grid coordinate.
    #[must_use]
    pub fn new(coord: QuadrantCoord, index: u32, size: WorldPoint, target_density: f32) -> Self {
        Self {
            coord,
            index,
            size,
            target_density,
            islands: Vec::new(),
            populated: false,
        }
    }

    /// Grid coordinate.
    #[must_use]
    pub const fn coord(&self) -> QuadrantCoord {
        self.coord
    }

    /// World position of the top-left corner.
    #[must_use]
    pub fn origin(&self) -> WorldPoint {
        self.coord.to_world_origin(self.size)
    }

    /// Whether the population pass has run.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.populated
    }

    /// Islands placed so far.
    #[must_use]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Mutable access to the islands.
    pub fn islands_mut(&mut self) -> &mut [Island] {
        &mut self.islands
    }

    /// Number of islands the quadrant aims for.
    #[must_use]
    pub fn target_count(&self) -> usize {
        ((self.size.x * self.size.y) / self.target_density).floor() as usize
    }

    /// Places islands on the first call; later calls do nothing.
    ///
    /// Returns the number of islands placed by this call.
    pub fn ensure_populated(&mut self, ctx: &mut PopulateContext<'_>) -> usize {
        if self.populated {
            return 0;
        }
        self.populated = true;
        let templates = ctx.templates;
        if templates.is_empty() {
            return 0;
        }

        let attempts = self.target_count().saturating_sub(self.islands.len());
        let mut placed = 0;
        let mut rejected = 0;

        for _ in 0..attempts {
            let template = &templates[ctx.rng.usize(..templates.len())];
            match self.find_position(template.detection_radius(), ctx) {
                Some(center) => {
                    self.place(Arc::clone(template), center, ctx);
                    placed += 1;
                },
                None => rejected += 1,
            }
        }

        debug!(
            "Populated quadrant ({}, {}): {placed} islands placed, {rejected} attempts rejected",
            self.coord.x, self.coord.y
        );
        placed
    }

    fn find_position(&self, radius: f32, ctx: &mut PopulateContext<'_>) -> Option<WorldPoint> {
        let free = self.size - WorldPoint::splat(2.0 * radius);
        if free.x <= 0.0 || free.y <= 0.0 {
            return None;
        }
        let origin = self.origin();

        for _ in 0..ctx.config.placement_retries.max(1) {
            let candidate = origin
                + WorldPoint::new(
                    radius + ctx.rng.f32() * free.x,
                    radius + ctx.rng.f32() * free.y,
                );
            let clear = self.islands.iter().all(|other| {
                let reach = radius + other.detection_radius();
                candidate.distance_squared(other.base_center()) > reach * reach
            });
            if clear {
                return Some(candidate);
            }
        }
        None
    }

    fn place(&mut self, template: Arc<IslandTemplate>, center: WorldPoint, ctx: &mut PopulateContext<'_>) {
        let id = IslandId::new(self.index, self.islands.len() as u32);
        let mut island = Island::new(id, Arc::clone(&template), center);

        let land = template.land_cells();
        if !land.is_empty() {
            let config = ctx.config;
            let items = ctx.rng.u32(0..=config.max_items_per_island);
            let npcs = ctx.rng.u32(0..=config.max_npcs_per_island);

            for _ in 0..items {
                let Some(name) = pick(ctx.rng, &config.item_names) else {
                    break;
                };
                let kind = PlacedKind::Item {
                    name,
                    count: ctx.rng.u32(1..=3),
                };
                let cell = land[ctx.rng.usize(..land.len())];
                island.attach(
                    PlacedEntity::new(ctx.ids.allocate(), kind, template.cell_offset(cell)),
                    ctx.live,
                );
            }
            for _ in 0..npcs {
                let Some(name) = pick(ctx.rng, &config.npc_names) else {
                    break;
                };
                let cell = land[ctx.rng.usize(..land.len())];
                island.attach(
                    PlacedEntity::new(
                        ctx.ids.allocate(),
                        PlacedKind::Npc { name },
                        template.cell_offset(cell),
                    ),
                    ctx.live,
                );
            }
        }

        self.islands.push(island);
    }
}

fn pick(rng: &mut fastrand::Rng, names: &[String]) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    names.get(rng.usize(..names.len())).cloned()
}
