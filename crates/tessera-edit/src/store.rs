use std::collections::HashMap;

use tessera_blocks::BlockId;
use tessera_chunk::ChunkGrid;

use crate::EditSink;

#[derive(Default, Debug, Clone, Copy)]
pub struct EditStoreStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
    pub dirty_chunks: usize,
}

/// In-memory edit journal keyed by chunk origin, with per-chunk revisions so a
/// saver can tell which chunks changed since their last flush.
#[derive(Default, Debug)]
pub struct EditStore {
    // key=(origin_x, origin_z) -> local cell -> latest id
    inner: HashMap<(i32, i32), HashMap<(i32, i32, i32), BlockId>>,
    rev: HashMap<(i32, i32), u64>,
    saved: HashMap<(i32, i32), u64>,
    counter: u64,
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> EditStoreStats {
        EditStoreStats {
            chunk_entries: self.inner.len(),
            block_edits: self.inner.values().map(|m| m.len()).sum(),
            dirty_chunks: self
                .rev
                .keys()
                .filter(|k| self.needs_save(k.0, k.1))
                .count(),
        }
    }

    pub fn get(&self, origin_x: i32, origin_z: i32, lx: i32, ly: i32, lz: i32) -> Option<BlockId> {
        self.inner
            .get(&(origin_x, origin_z))
            .and_then(|m| m.get(&(lx, ly, lz)).copied())
    }

    /// All edits of one chunk, ordered by cell (y, z, x).
    pub fn snapshot_for_chunk(&self, origin_x: i32, origin_z: i32) -> Vec<((i32, i32, i32), BlockId)> {
        let mut out: Vec<_> = match self.inner.get(&(origin_x, origin_z)) {
            Some(m) => m.iter().map(|(k, v)| (*k, *v)).collect(),
            None => return Vec::new(),
        };
        out.sort_by_key(|((x, y, z), _)| (*y, *z, *x));
        out
    }

    /// Write stored ids over a freshly generated grid, before instances are
    /// populated. Returns the number of cells written.
    pub fn replay_into(&self, grid: &mut ChunkGrid) -> usize {
        let (ox, oz) = grid.origin();
        let edits = self.snapshot_for_chunk(ox, oz);
        let mut applied = 0;
        for ((x, y, z), id) in edits {
            if grid.contains(x, y, z) {
                grid.set_block_id(x, y, z, id);
                applied += 1;
            }
        }
        applied
    }

    pub fn get_rev(&self, origin_x: i32, origin_z: i32) -> u64 {
        self.rev.get(&(origin_x, origin_z)).copied().unwrap_or(0)
    }

    pub fn mark_saved(&mut self, origin_x: i32, origin_z: i32, rev: u64) {
        // Only move forward
        let e = self.saved.entry((origin_x, origin_z)).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }

    pub fn needs_save(&self, origin_x: i32, origin_z: i32) -> bool {
        let saved = self.saved.get(&(origin_x, origin_z)).copied().unwrap_or(0);
        self.get_rev(origin_x, origin_z) > saved
    }
}

impl EditSink for EditStore {
    fn record_edit(&mut self, origin_x: i32, origin_z: i32, lx: i32, ly: i32, lz: i32, id: BlockId) {
        self.counter = self.counter.wrapping_add(1).max(1);
        self.inner
            .entry((origin_x, origin_z))
            .or_default()
            .insert((lx, ly, lz), id);
        self.rev.insert((origin_x, origin_z), self.counter);
    }
}
