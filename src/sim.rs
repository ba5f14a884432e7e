use tessera_blocks::{BlockId, BlockRegistry};
use tessera_chunk::ChunkGrid;
use tessera_edit::{ChunkEditor, EditStore};
use tessera_instances::InstanceManager;
use tessera_physics::{CollisionEngine, PhysicsParams};

use crate::player::Walker;

/// One chunk, its instances, its edit history, and a walker moving through
/// it. Edits and frames interleave on a single thread; each completes before
/// the next starts.
pub struct Session {
    pub reg: BlockRegistry,
    pub grid: ChunkGrid,
    pub instances: InstanceManager,
    pub edits: EditStore,
    pub engine: CollisionEngine,
    pub walker: Walker,
}

impl Session {
    pub fn new(reg: BlockRegistry, grid: ChunkGrid, walker: Walker, params: PhysicsParams) -> Self {
        Self::with_edits(reg, grid, walker, params, EditStore::new())
    }

    /// Start from freshly generated terrain plus previously recorded edits.
    pub fn with_edits(
        reg: BlockRegistry,
        mut grid: ChunkGrid,
        walker: Walker,
        params: PhysicsParams,
        edits: EditStore,
    ) -> Self {
        let replayed = edits.replay_into(&mut grid);
        let mut instances = InstanceManager::new();
        let made = instances.populate(&mut grid, &reg);
        log::info!(
            "session: chunk {:?}, {} edits replayed, {} instances, {} pending geometry",
            grid.origin(),
            replayed,
            made,
            instances.pending_count()
        );
        Self {
            reg,
            grid,
            instances,
            edits,
            engine: CollisionEngine::new(params),
            walker,
        }
    }

    /// Feed one frame of wall-clock time to the engine. Returns steps run.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let grid = &self.grid;
        let sample = |wx: i32, wy: i32, wz: i32| {
            let (x, y, z) = grid.local_of_world(wx, wy, wz);
            grid.id_or_empty(x, y, z)
        };
        self.engine.update(dt, &mut self.walker, &self.reg, &sample)
    }

    /// Place `id` at a world cell inside this chunk.
    pub fn place(&mut self, wx: i32, wy: i32, wz: i32, id: BlockId) -> bool {
        let (x, y, z) = self.grid.local_of_world(wx, wy, wz);
        ChunkEditor::new(&mut self.grid, &mut self.instances, &self.reg, &mut self.edits).place_block(x, y, z, id)
    }

    pub fn remove(&mut self, wx: i32, wy: i32, wz: i32) -> bool {
        let (x, y, z) = self.grid.local_of_world(wx, wy, wz);
        ChunkEditor::new(&mut self.grid, &mut self.instances, &self.reg, &mut self.edits).remove_block(x, y, z)
    }

    /// Geometry for `id` finished loading; materialise anything waiting on it.
    pub fn geometry_arrived(&mut self, id: BlockId) -> usize {
        if !self.reg.set_geometry_available(id, true) {
            return 0;
        }
        self.instances.retry_deferred(&mut self.grid, &self.reg)
    }
}
