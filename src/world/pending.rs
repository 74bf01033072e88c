//! Pending resources: what an unowned cell *would* hold once purchased.
//!
//! Rolls are memoized, but the memo is only a cache. Every value is a pure
//! function of `(world_seed, coord)` and the spawn tuning.
//!
//! Cells with an even `x + y` are anchors and show their uniform base roll.
//! Odd cells soft-avoid the variants of their anchor neighbours. Cardinal
//! neighbours of an odd cell are always anchors, so the variants it avoids are
//! the ones actually shown next to it, and no cell depends on another odd cell.

use rand::Rng;

use super::rng::seeded_stream;
use crate::shared::*;

/// Penalty for the first neighbour showing a variant.
const FIRST_MATCH_PENALTY: f64 = 0.4;
/// Additional penalty once two or more neighbours share it.
const SECOND_MATCH_PENALTY: f64 = 0.25;
const MIN_VARIANT_WEIGHT: f64 = 0.01;

/// The first draws of a cell's stream: resource kind and its unbiased variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BaseRoll {
    kind: ResourceKind,
    variant: Option<usize>,
}

impl PendingResourceGenerator {
    pub fn new(world_seed: i32, tuning: SpawnTuning) -> Self {
        Self {
            world_seed,
            tuning,
            cells: Default::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Memoized cell, without rolling one.
    pub fn peek(&self, coord: CellCoord) -> Option<PendingCell> {
        self.cells.get(&coord).copied()
    }

    /// Read-only preview for UI ghosts. Rolls and memoizes on first access.
    pub fn get_or_generate(&mut self, coord: CellCoord) -> PendingCell {
        if let Some(cell) = self.cells.get(&coord) {
            return *cell;
        }
        let cell = self.generate(coord);
        self.cells.insert(coord, cell);
        cell
    }

    /// Hand over the cell being purchased and forget it.
    pub fn commit(&mut self, coord: CellCoord) -> PendingCell {
        self.cells
            .remove(&coord)
            .unwrap_or_else(|| self.generate(coord))
    }

    /// Roll a cell from scratch. Never touches the memo.
    pub fn generate(&self, coord: CellCoord) -> PendingCell {
        let mut rng = seeded_stream(self.world_seed, coord);
        let Some(base) = self.base_roll(&mut rng) else {
            return PendingCell::EMPTY;
        };

        let variant_index = match base.variant {
            None => -1,
            Some(variant) if is_anchor(coord) => variant as i32,
            Some(_) => {
                let options = self.tuning.variant_count(base.kind);
                self.pick_variant_soft_avoid(options, coord, base.kind, &mut rng) as i32
            }
        };

        PendingCell {
            has_resource: true,
            kind: base.kind,
            hit_points: self.tuning.hit_points(base.kind),
            variant_index,
        }
    }

    /// Weighted variant choice that discourages repeating what same-kind
    /// anchor neighbours show. Used for non-anchor cells. Consumes exactly one
    /// draw from `rng`.
    pub fn pick_variant_soft_avoid(
        &self,
        options: usize,
        coord: CellCoord,
        kind: ResourceKind,
        rng: &mut impl Rng,
    ) -> usize {
        let neighbours = self.neighbour_variants(coord, kind);
        let weights = variant_weights(options, &neighbours);
        pick_weighted(&weights, rng.gen::<f64>())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Flat table for saving, sorted by coordinate.
    pub fn export(&self) -> Vec<(CellCoord, PendingCell)> {
        let mut out: Vec<(CellCoord, PendingCell)> =
            self.cells.iter().map(|(c, p)| (*c, *p)).collect();
        out.sort_by_key(|(c, _)| *c);
        out
    }

    /// Replace the memo with a saved table. Saved values win over fresh rolls.
    pub fn import(&mut self, entries: impl IntoIterator<Item = (CellCoord, PendingCell)>) {
        self.cells.clear();
        self.cells.extend(entries);
    }

    fn base_roll(&self, rng: &mut impl Rng) -> Option<BaseRoll> {
        let spawn_roll = rng.gen::<f64>();
        if spawn_roll >= self.tuning.spawn_chance {
            return None;
        }
        let kind_roll = rng.gen::<f64>();
        let kind = if kind_roll < self.tuning.tree_weight {
            ResourceKind::Tree
        } else {
            ResourceKind::Rock
        };
        let options = self.tuning.variant_count(kind);
        let variant = (options > 0).then(|| rng.gen_range(0..options));
        Some(BaseRoll { kind, variant })
    }

    /// Base-roll variants of same-kind neighbours, replayed from their own
    /// streams. For a non-anchor `coord` these are the variants shown.
    fn neighbour_variants(&self, coord: CellCoord, kind: ResourceKind) -> Vec<usize> {
        if self.tuning.hit_points(kind) == 0 {
            return Vec::new();
        }
        coord
            .neighbors()
            .into_iter()
            .filter_map(|n| {
                let mut rng = seeded_stream(self.world_seed, n);
                self.base_roll(&mut rng)
            })
            .filter(|b| b.kind == kind)
            .filter_map(|b| b.variant)
            .collect()
    }
}

fn is_anchor(coord: CellCoord) -> bool {
    coord.x.wrapping_add(coord.y) & 1 == 0
}

/// Normalized weights for `options` variants given the variants neighbours show.
pub fn variant_weights(options: usize, neighbour_variants: &[usize]) -> Vec<f64> {
    let mut weights: Vec<f64> = (0..options)
        .map(|i| {
            let matches = neighbour_variants.iter().filter(|&&v| v == i).count();
            let mut w = 1.0;
            if matches >= 1 {
                w -= FIRST_MATCH_PENALTY;
            }
            if matches >= 2 {
                w -= SECOND_MATCH_PENALTY;
            }
            f64::max(w, MIN_VARIANT_WEIGHT)
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in &mut weights {
            *w /= total;
        }
    }
    weights
}

/// Walk the cumulative distribution in option order.
pub fn pick_weighted(weights: &[f64], roll: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if roll <= cumulative {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}
