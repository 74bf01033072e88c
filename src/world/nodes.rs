//! Trees and rocks standing on owned land.

use rand::Rng;

use crate::shared::*;

/// What one hit on a resource node did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged { remaining: u32 },
    Depleted { kind: ResourceKind, item_id: &'static str, quantity: u32 },
}

/// Drop for a depleted node: trees give 2–3 wood, rocks give 2 stone.
pub fn resource_yield(kind: ResourceKind, rng: &mut impl Rng) -> (&'static str, u32) {
    match kind {
        ResourceKind::Tree => (WOOD_ITEM, rng.gen_range(2..=3)),
        ResourceKind::Rock => (STONE_ITEM, 2),
    }
}

impl ResourceNodes {
    /// Materialize a committed pending cell. Cells without a resource, or
    /// with no hit points to take, leave the tile bare.
    pub fn spawn(&mut self, coord: CellCoord, cell: &PendingCell) -> bool {
        let Some(kind) = cell.resource() else {
            return false;
        };
        if cell.hit_points == 0 {
            return false;
        }
        self.nodes.insert(
            coord,
            ResourceNode {
                kind,
                hit_points: cell.hit_points,
                variant_index: cell.variant_index,
            },
        );
        true
    }

    pub fn get(&self, coord: CellCoord) -> Option<&ResourceNode> {
        self.nodes.get(&coord)
    }

    /// Take one hit point. A node at zero is removed and drops its yield.
    pub fn hit(&mut self, coord: CellCoord, rng: &mut impl Rng) -> Option<HitOutcome> {
        let node = self.nodes.get_mut(&coord)?;
        node.hit_points = node.hit_points.saturating_sub(1);
        if node.hit_points > 0 {
            return Some(HitOutcome::Damaged {
                remaining: node.hit_points,
            });
        }

        let kind = node.kind;
        self.nodes.remove(&coord);
        let (item_id, quantity) = resource_yield(kind, rng);
        Some(HitOutcome::Depleted {
            kind,
            item_id,
            quantity,
        })
    }

    /// Standing nodes sorted by coordinate.
    pub fn export(&self) -> Vec<(CellCoord, ResourceNode)> {
        let mut out: Vec<(CellCoord, ResourceNode)> =
            self.nodes.iter().map(|(c, n)| (*c, *n)).collect();
        out.sort_by_key(|(c, _)| *c);
        out
    }

    pub fn import(&mut self, entries: impl IntoIterator<Item = (CellCoord, ResourceNode)>) {
        self.nodes.clear();
        self.nodes.extend(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tree(hp: u32) -> PendingCell {
        PendingCell {
            has_resource: true,
            kind: ResourceKind::Tree,
            hit_points: hp,
            variant_index: 1,
        }
    }

    #[test]
    fn test_spawn_skips_empty_cells() {
        let mut nodes = ResourceNodes::default();
        assert!(!nodes.spawn(CellCoord::new(0, 0), &PendingCell::EMPTY));
        assert!(!nodes.spawn(CellCoord::new(0, 0), &tree(0)));
        assert!(nodes.nodes.is_empty());
    }

    #[test]
    fn test_tree_takes_three_hits() {
        let mut nodes = ResourceNodes::default();
        let mut rng = StdRng::seed_from_u64(1);
        let at = CellCoord::new(2, 0);
        nodes.spawn(at, &tree(3));

        assert_eq!(nodes.hit(at, &mut rng), Some(HitOutcome::Damaged { remaining: 2 }));
        assert_eq!(nodes.hit(at, &mut rng), Some(HitOutcome::Damaged { remaining: 1 }));
        match nodes.hit(at, &mut rng) {
            Some(HitOutcome::Depleted {
                kind,
                item_id,
                quantity,
            }) => {
                assert_eq!(kind, ResourceKind::Tree);
                assert_eq!(item_id, WOOD_ITEM);
                assert!((2..=3).contains(&quantity));
            }
            other => panic!("expected depletion, got {:?}", other),
        }
        assert!(nodes.get(at).is_none());
        assert_eq!(nodes.hit(at, &mut rng), None);
    }

    #[test]
    fn test_rock_yields_two_stone() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(resource_yield(ResourceKind::Rock, &mut rng), (STONE_ITEM, 2));
        }
    }
}
