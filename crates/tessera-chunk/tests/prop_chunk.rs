use proptest::prelude::*;
use tessera_blocks::EMPTY;
use tessera_chunk::{BlockRecord, ChunkCoord, ChunkGrid};
use tessera_geom::Vec3;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn coord() -> impl Strategy<Value = i32> {
    -20i32..=20
}

proptest! {
    // Out-of-range reads return no data; writes there change nothing
    #[test]
    fn out_of_range_is_silent(w in dim(), h in dim(), x in coord(), y in coord(), z in coord()) {
        let mut g = ChunkGrid::new(ChunkCoord::new(0, 0), w, h);
        let inside = x >= 0 && y >= 0 && z >= 0
            && (x as usize) < w && (y as usize) < h && (z as usize) < w;
        prop_assert_eq!(g.get(x, y, z).is_some(), inside);
        prop_assert_eq!(g.contains(x, y, z), inside);
        g.set_block_id(x, y, z, 5);
        g.set_instance_slot(x, y, z, Some(1));
        if inside {
            prop_assert_eq!(g.get(x, y, z), Some(BlockRecord { id: 5, slot: Some(1) }));
            prop_assert_eq!(g.count_of(5), 1);
        } else {
            prop_assert!(g.get(x, y, z).is_none());
            prop_assert!(g.is_all_empty());
        }
    }

    // Fractional lookups floor every component
    #[test]
    fn get_at_floors(w in 2usize..=8, h in 2usize..=8, fx in 0.0f32..1.0, fy in 0.0f32..1.0, fz in 0.0f32..1.0) {
        let mut g = ChunkGrid::new(ChunkCoord::new(0, 0), w, h);
        g.set_block_id(1, 1, 1, 9);
        let p = Vec3::new(1.0 + fx * 0.999, 1.0 + fy * 0.999, 1.0 + fz * 0.999);
        prop_assert_eq!(g.get_at(p).map(|r| r.id), Some(9));
        // Just below zero floors to -1 and is out of range
        prop_assert!(g.get_at(Vec3::new(-0.25, 0.0, 0.0)).is_none());
    }

    // Each cell is written independently of every other cell
    #[test]
    fn cells_are_independent(w in dim(), h in dim()) {
        let mut g = ChunkGrid::new(ChunkCoord::new(3, -1), w, h);
        let mut n = 0u16;
        for y in 0..h as i32 { for z in 0..w as i32 { for x in 0..w as i32 {
            n = n.wrapping_add(1).max(1);
            g.set_block_id(x, y, z, n);
        }}}
        let mut seen = 0usize;
        n = 0;
        for y in 0..h as i32 { for z in 0..w as i32 { for x in 0..w as i32 {
            n = n.wrapping_add(1).max(1);
            prop_assert_eq!(g.id_or_empty(x, y, z), n);
            seen += 1;
        }}}
        prop_assert_eq!(seen, g.volume());
        prop_assert_eq!(g.iter_solid().count(), g.volume());
    }

    // Obscured iff all six neighbours are non-empty and inside the grid
    #[test]
    fn obscured_matches_neighbourhood(w in 3usize..=6, h in 3usize..=6, holes in proptest::collection::vec((0i32..6, 0i32..6, 0i32..6), 0..6)) {
        let mut g = ChunkGrid::new(ChunkCoord::new(0, 0), w, h);
        g.fill((0, 0, 0), (w as i32 - 1, h as i32 - 1, w as i32 - 1), 1);
        for (x, y, z) in holes {
            g.set_block_id(x, y, z, EMPTY);
        }
        for ((x, y, z), _) in g.iter_solid().collect::<Vec<_>>() {
            let expect = [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)]
                .iter()
                .all(|&(dx, dy, dz)| g.get(x + dx, y + dy, z + dz).map(|r| !r.is_empty()).unwrap_or(false));
            prop_assert_eq!(g.is_obscured(x, y, z), expect);
        }
    }
}
