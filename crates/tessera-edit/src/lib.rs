//! Block placement/removal and the persistence hook they report to.
#![forbid(unsafe_code)]

pub mod editor;
pub mod store;

pub use editor::ChunkEditor;
pub use store::{EditStore, EditStoreStats};

use tessera_blocks::BlockId;

/// Receives every successful block change. Coordinates are the chunk's world
/// origin plus the chunk-local cell.
pub trait EditSink {
    fn record_edit(&mut self, origin_x: i32, origin_z: i32, lx: i32, ly: i32, lz: i32, id: BlockId);
}

/// Sink that discards edits.
#[derive(Default, Debug, Clone, Copy)]
pub struct NullSink;

impl EditSink for NullSink {
    fn record_edit(&mut self, _: i32, _: i32, _: i32, _: i32, _: i32, _: BlockId) {}
}

impl<F> EditSink for F
where
    F: FnMut(i32, i32, i32, i32, i32, BlockId),
{
    fn record_edit(&mut self, origin_x: i32, origin_z: i32, lx: i32, ly: i32, lz: i32, id: BlockId) {
        self(origin_x, origin_z, lx, ly, lz, id)
    }
}
