use tessera_blocks::{BlockId, BlockRegistry, EMPTY};
use tessera_chunk::ChunkGrid;
use tessera_instances::{InstanceManager, InstanceSkip};

use crate::EditSink;

/// Gameplay edits against one chunk. Every change goes grid first, then
/// instances, then the sink, and completes before control returns.
pub struct ChunkEditor<'a, S: EditSink + ?Sized> {
    pub grid: &'a mut ChunkGrid,
    pub instances: &'a mut InstanceManager,
    pub reg: &'a BlockRegistry,
    pub sink: &'a mut S,
}

impl<'a, S: EditSink + ?Sized> ChunkEditor<'a, S> {
    pub fn new(
        grid: &'a mut ChunkGrid,
        instances: &'a mut InstanceManager,
        reg: &'a BlockRegistry,
        sink: &'a mut S,
    ) -> Self {
        Self {
            grid,
            instances,
            reg,
            sink,
        }
    }

    /// Put `id` at a local cell, replacing whatever was there. Placing `EMPTY`
    /// is a removal. Returns whether the grid changed.
    pub fn place_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        if id == EMPTY {
            return self.remove_block(x, y, z);
        }
        let Some(rec) = self.grid.get(x, y, z) else {
            log::debug!(target: "edit", "place ({},{},{}) outside chunk", x, y, z);
            return false;
        };
        if !self.reg.contains(id) {
            log::warn!(target: "edit", "place ({},{},{}): unknown block id {}", x, y, z, id);
            return false;
        }
        if rec.id == id {
            return false;
        }
        if !rec.is_empty() {
            // Reassignment: the old type's instance goes first
            self.drop_instance(x, y, z);
        }
        self.grid.set_block_id(x, y, z, id);
        // Neighbours keep their current instances even if this covers them.
        if !self.grid.is_obscured(x, y, z) {
            match self.instances.add_instance(self.grid, self.reg, x, y, z) {
                Ok(_) | Err(InstanceSkip::GeometryPending) => {}
                Err(skip) => {
                    log::debug!(target: "edit", "place ({},{},{}): no instance ({})", x, y, z, skip);
                }
            }
        }
        self.record(x, y, z, id);
        true
    }

    /// Clear a local cell. Newly exposed neighbours are not re-instanced.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> bool {
        let Some(rec) = self.grid.get(x, y, z) else {
            log::debug!(target: "edit", "remove ({},{},{}) outside chunk", x, y, z);
            return false;
        };
        if rec.is_empty() {
            return false;
        }
        self.drop_instance(x, y, z);
        self.grid.set_block_id(x, y, z, EMPTY);
        self.record(x, y, z, EMPTY);
        true
    }

    fn drop_instance(&mut self, x: i32, y: i32, z: i32) {
        match self.instances.remove_instance(self.grid, x, y, z) {
            Ok(_) | Err(InstanceSkip::NotInstanced) => {}
            Err(skip) => {
                log::warn!(target: "edit", "({},{},{}): instance not removed ({})", x, y, z, skip);
            }
        }
    }

    fn record(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        let (ox, oz) = self.grid.origin();
        self.sink.record_edit(ox, oz, x, y, z, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditStore;
    use tessera_chunk::ChunkCoord;

    const STONE: BlockId = 1;
    const DIRT: BlockId = 2;

    fn registry() -> BlockRegistry {
        BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "stone"
            [[blocks]]
            name = "dirt"
        "#,
        )
        .unwrap()
    }

    #[test]
    fn place_then_remove_round_trips() {
        let reg = registry();
        let mut grid = ChunkGrid::new(ChunkCoord::new(2, -1), 8, 8);
        let mut im = InstanceManager::new();
        let mut store = EditStore::new();
        let before = im.count(STONE);
        {
            let mut ed = ChunkEditor::new(&mut grid, &mut im, &reg, &mut store);
            assert!(ed.place_block(3, 4, 5, STONE));
            assert!(ed.remove_block(3, 4, 5));
        }
        let rec = grid.get(3, 4, 5).unwrap();
        assert_eq!(rec.id, EMPTY);
        assert_eq!(rec.slot, None);
        assert_eq!(im.count(STONE), before);
        assert_eq!(store.get(16, -8, 3, 4, 5), Some(EMPTY));
        assert_eq!(store.get_rev(16, -8), 2);
    }

    #[test]
    fn reassignment_moves_instance_between_tables() {
        let reg = registry();
        let mut grid = ChunkGrid::new(ChunkCoord::new(0, 0), 8, 8);
        let mut im = InstanceManager::new();
        let mut edits = Vec::new();
        let mut sink = |ox: i32, oz: i32, x: i32, y: i32, z: i32, id: BlockId| {
            edits.push((ox, oz, x, y, z, id))
        };
        {
            let mut ed = ChunkEditor::new(&mut grid, &mut im, &reg, &mut sink);
            assert!(ed.place_block(1, 1, 1, STONE));
            assert!(ed.place_block(1, 1, 1, DIRT));
            // Same type again is not an edit
            assert!(!ed.place_block(1, 1, 1, DIRT));
        }
        assert_eq!(im.count(STONE), 0);
        assert_eq!(im.count(DIRT), 1);
        assert_eq!(grid.get(1, 1, 1).unwrap().slot, Some(0));
        im.check_consistency(&grid).unwrap();
        assert_eq!(edits, vec![(0, 0, 1, 1, 1, STONE), (0, 0, 1, 1, 1, DIRT)]);
    }

    #[test]
    fn rejected_edits_do_not_reach_sink() {
        let reg = registry();
        let mut grid = ChunkGrid::new(ChunkCoord::new(0, 0), 4, 4);
        let mut im = InstanceManager::new();
        let mut store = EditStore::new();
        let mut ed = ChunkEditor::new(&mut grid, &mut im, &reg, &mut store);
        assert!(!ed.place_block(-1, 0, 0, STONE));
        assert!(!ed.place_block(0, 0, 0, 99));
        assert!(!ed.remove_block(0, 0, 0));
        assert_eq!(store.stats().block_edits, 0);
    }
}
