use tessera_blocks::BlockId;
use tessera_geom::Vec3;

/// Placement of one block instance; blocks are axis-aligned unit cubes so only
/// the translation varies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InstanceTransform {
    pub translation: Vec3,
}

impl InstanceTransform {
    /// Transform of the cube centred on a world cell.
    #[inline]
    pub fn at_cell(wx: i32, wy: i32, wz: i32) -> Self {
        Self {
            translation: Vec3::new(wx as f32, wy as f32, wz as f32),
        }
    }

    /// Column-major 4x4 matrix as uploaded to an instance buffer.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let t = self.translation;
        [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            t.x, t.y, t.z, 1.0,
        ]
    }
}

/// Gapless instance array for one block type. `cells[i]` is the chunk-local
/// cell whose record points at slot `i`.
#[derive(Clone, Debug)]
pub struct InstanceTable {
    id: BlockId,
    capacity: usize,
    transforms: Vec<InstanceTransform>,
    cells: Vec<(i32, i32, i32)>,
}

impl InstanceTable {
    pub fn new(id: BlockId, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            transforms: Vec::with_capacity(capacity),
            cells: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    #[inline]
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    #[inline]
    pub fn cell_of(&self, slot: u32) -> Option<(i32, i32, i32)> {
        self.cells.get(slot as usize).copied()
    }

    #[inline]
    pub fn transform(&self, slot: u32) -> Option<InstanceTransform> {
        self.transforms.get(slot as usize).copied()
    }

    /// Append at index `count`; returns that index. Caller checks `is_full`.
    pub(crate) fn push(&mut self, cell: (i32, i32, i32), transform: InstanceTransform) -> u32 {
        let slot = self.transforms.len() as u32;
        self.transforms.push(transform);
        self.cells.push(cell);
        slot
    }

    /// Swap-remove `slot`. Returns the cell that moved into `slot`, if any.
    pub(crate) fn swap_remove(&mut self, slot: u32) -> Option<(i32, i32, i32)> {
        let i = slot as usize;
        if i >= self.transforms.len() {
            return None;
        }
        self.transforms.swap_remove(i);
        self.cells.swap_remove(i);
        self.cells.get(i).copied()
    }
}
