//! Owned land: adjacency-gated expansion and the tile price curve.

use std::collections::HashSet;

use crate::shared::*;

/// Result of a successful land purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePurchase {
    pub coord: CellCoord,
    pub cost: u32,
    /// The resource that was previewed on the cell, if any.
    pub resource: Option<PendingCell>,
}

/// Price of the next tile given how many are already owned.
pub fn tile_cost(base_cost: u32, owned_count: usize) -> u32 {
    let exponent = (owned_count as f64).powf(COST_CURVE_STRENGTH);
    let raw = base_cost as f64 * EARLY_DISCOUNT * COST_GROWTH_RATE.powf(exponent);
    raw.round().min(MAX_TILE_COST as f64) as u32
}

impl WorldGrid {
    pub fn new(world_seed: i32, base_cost: u32) -> Self {
        Self {
            world_seed,
            base_cost,
            tiles: Default::default(),
        }
    }

    /// Starting plot: a square of `radius` around the origin plus the house
    /// footprint, which is owned but inert.
    pub fn bootstrap(&mut self, radius: i32, house: &HouseConfig) {
        let radius = radius.max(0);
        for x in -radius..=radius {
            for y in -radius..=radius {
                self.add_tile(CellCoord::new(x, y));
            }
        }

        let (ox, oy) = house.origin;
        let (w, h) = house.size;
        for dx in 0..w.max(0) {
            for dy in 0..h.max(0) {
                let coord = CellCoord::new(ox + dx, oy + dy);
                self.add_tile(coord);
                if let Some(tile) = self.tiles.get_mut(&coord) {
                    tile.terrain = TerrainState::Decor;
                    tile.crop = None;
                }
            }
        }
    }

    /// Register a grass tile. Returns false if it was already owned.
    pub fn add_tile(&mut self, coord: CellCoord) -> bool {
        if self.tiles.contains_key(&coord) {
            return false;
        }
        self.tiles.insert(coord, OwnedTile::new(coord));
        true
    }

    /// Put back a tile exactly as saved.
    pub fn restore_tile(&mut self, tile: OwnedTile) {
        self.tiles.insert(tile.coord, tile);
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn is_owned(&self, coord: CellCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn owned_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, coord: CellCoord) -> Option<&OwnedTile> {
        self.tiles.get(&coord)
    }

    pub fn tile_mut(&mut self, coord: CellCoord) -> Option<&mut OwnedTile> {
        self.tiles.get_mut(&coord)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &OwnedTile> {
        self.tiles.values()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut OwnedTile> {
        self.tiles.values_mut()
    }

    /// Owned tiles sorted by coordinate.
    pub fn sorted_tiles(&self) -> Vec<&OwnedTile> {
        let mut out: Vec<&OwnedTile> = self.tiles.values().collect();
        out.sort_by_key(|t| t.coord);
        out
    }

    pub fn is_adjacent_to_owned(&self, coord: CellCoord) -> bool {
        coord.neighbors().iter().any(|n| self.is_owned(*n))
    }

    /// Unowned cells with at least one owned cardinal neighbour.
    /// Recomputed on every call.
    pub fn expandable_tiles(&self) -> HashSet<CellCoord> {
        self.tiles
            .keys()
            .flat_map(|c| c.neighbors())
            .filter(|n| !self.is_owned(*n))
            .collect()
    }

    pub fn next_tile_cost(&self) -> u32 {
        tile_cost(self.base_cost, self.owned_count())
    }

    /// Ghost preview for a cell the player could buy next. Owned or
    /// unreachable cells are never rolled.
    pub fn preview(
        &self,
        coord: CellCoord,
        pending: &mut PendingResourceGenerator,
    ) -> Option<PendingCell> {
        if self.is_owned(coord) || !self.is_adjacent_to_owned(coord) {
            return None;
        }
        Some(pending.get_or_generate(coord))
    }

    /// Buy `coord` if it is unowned, adjacent to owned land, and `spend`
    /// accepts the price. Nothing changes on failure.
    pub fn try_buy_tile(
        &mut self,
        coord: CellCoord,
        pending: &mut PendingResourceGenerator,
        spend: impl FnOnce(u32) -> bool,
    ) -> Option<TilePurchase> {
        if self.is_owned(coord) || !self.is_adjacent_to_owned(coord) {
            return None;
        }
        let cost = self.next_tile_cost();
        if !spend(cost) {
            return None;
        }

        self.add_tile(coord);
        let cell = pending.commit(coord);
        Some(TilePurchase {
            coord,
            cost,
            resource: cell.has_resource.then_some(cell),
        })
    }
}
