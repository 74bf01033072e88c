//! Coordinate-seeded random streams.
//!
//! Every procedural decision about a cell is drawn from a stream that depends
//! only on the world seed and the cell coordinate, so a preview rolled today
//! and a purchase committed next week see the same draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::shared::*;

const X_PRIME: i32 = 73_856_093;
const Y_PRIME: i32 = 19_349_663;

/// Mix the world seed with a coordinate. Wrapping arithmetic on purpose.
pub fn coord_seed(world_seed: i32, coord: CellCoord) -> i32 {
    world_seed ^ coord.x.wrapping_mul(X_PRIME) ^ coord.y.wrapping_mul(Y_PRIME)
}

/// Fresh deterministic stream for `(world_seed, coord)`. ChaCha8 output is
/// fixed across `rand` releases, so unsaved cells roll the same after upgrades.
pub fn seeded_stream(world_seed: i32, coord: CellCoord) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(coord_seed(world_seed, coord) as u32 as u64)
}

/// Yaw (degrees) a crop planted at `coord` on `day` is drawn with.
pub fn planting_rotation(world_seed: i32, coord: CellCoord, day: u32) -> f32 {
    let mut rng = seeded_stream(world_seed ^ (day as i32).wrapping_mul(Y_PRIME), coord);
    rng.gen_range(0.0..360.0)
}

/// Seed for a brand-new world.
pub fn fresh_world_seed() -> i32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_coord_same_stream() {
        let mut a = seeded_stream(42, CellCoord::new(3, -7));
        let mut b = seeded_stream(42, CellCoord::new(3, -7));
        for _ in 0..16 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }

    #[test]
    fn test_neighbouring_coords_differ() {
        let a = seeded_stream(42, CellCoord::new(0, 0)).gen::<u64>();
        let b = seeded_stream(42, CellCoord::new(1, 0)).gen::<u64>();
        let c = seeded_stream(42, CellCoord::new(0, 1)).gen::<u64>();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_coord_seed_wraps_instead_of_overflowing() {
        let far = CellCoord::new(i32::MAX, i32::MIN);
        assert_eq!(coord_seed(7, far), coord_seed(7, far));
    }

    #[test]
    fn test_stream_matches_recorded_draws() {
        // seed 42, cell (3, 3)
        assert_eq!(coord_seed(42, CellCoord::new(3, 3)), 239_148_256);
        let mut rng = seeded_stream(42, CellCoord::new(3, 3));
        assert!((rng.gen::<f64>() - 0.016_134_312_621_623_57).abs() < 1e-15);
        assert!((rng.gen::<f64>() - 0.130_133_795_571_405_48).abs() < 1e-15);
        assert_eq!(rng.gen_range(0..3usize), 1);
    }

    #[test]
    fn test_origin_seed_is_world_seed() {
        assert_eq!(coord_seed(123_456, CellCoord::new(0, 0)), 123_456);
    }

    #[test]
    fn test_planting_rotation_in_range_and_stable() {
        let r = planting_rotation(99, CellCoord::new(2, 2), 4);
        assert!((0.0..360.0).contains(&r));
        assert_eq!(r, planting_rotation(99, CellCoord::new(2, 2), 4));
    }

    #[test]
    fn test_fresh_world_seed_range() {
        for _ in 0..100 {
            let s = fresh_world_seed();
            assert!((100_000..=999_999).contains(&s));
        }
    }
}
