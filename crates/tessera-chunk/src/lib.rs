//! Dense per-chunk block storage.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use tessera_blocks::{BlockId, EMPTY};
use tessera_geom::Vec3;

/// Chunk position in chunk units on the horizontal plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// One cell of the grid. `slot` is the index of the cell's render instance in
/// its type's instance table, present only while the block is instanced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockRecord {
    pub id: BlockId,
    pub slot: Option<u32>,
}

impl BlockRecord {
    pub const EMPTY: BlockRecord = BlockRecord { id: EMPTY, slot: None };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY
    }
}

// Face neighbour offsets: +X, -X, +Y, -Y, +Z, -Z
const FACE_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// `width × height × width` cells addressed by chunk-local coordinates.
#[derive(Clone, Debug)]
pub struct ChunkGrid {
    pub coord: ChunkCoord,
    width: usize,
    height: usize,
    cells: Vec<BlockRecord>,
}

impl ChunkGrid {
    pub fn new(coord: ChunkCoord, width: usize, height: usize) -> Self {
        Self {
            coord,
            width,
            height,
            cells: vec![BlockRecord::EMPTY; width * height * width],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells, the upper bound on blocks of any one type.
    #[inline]
    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let w = self.width as i32;
        x >= 0 && x < w && z >= 0 && z < w && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn idx(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.contains(x, y, z) {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        Some((y * self.width + z) * self.width + x)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockRecord> {
        self.idx(x, y, z).map(|i| self.cells[i])
    }

    /// Lookup at a fractional position; each component is floored first.
    #[inline]
    pub fn get_at(&self, p: Vec3) -> Option<BlockRecord> {
        let f = p.floor();
        self.get(f.x as i32, f.y as i32, f.z as i32)
    }

    /// Block id with missing data read as empty.
    #[inline]
    pub fn id_or_empty(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get(x, y, z).map(|r| r.id).unwrap_or(EMPTY)
    }

    /// Sets the type of a cell. Clearing a cell also drops its slot.
    pub fn set_block_id(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if let Some(i) = self.idx(x, y, z) {
            let cell = &mut self.cells[i];
            cell.id = id;
            if id == EMPTY {
                cell.slot = None;
            }
        }
    }

    pub fn set_instance_slot(&mut self, x: i32, y: i32, z: i32, slot: Option<u32>) {
        if let Some(i) = self.idx(x, y, z) {
            self.cells[i].slot = slot;
        }
    }

    /// True when every face neighbour holds material. Neighbours outside the
    /// grid read as empty, so boundary faces always count as exposed.
    pub fn is_obscured(&self, x: i32, y: i32, z: i32) -> bool {
        FACE_OFFSETS
            .iter()
            .all(|&(dx, dy, dz)| self.id_or_empty(x + dx, y + dy, z + dz) != EMPTY)
    }

    #[inline]
    pub fn world_of_local(&self, x: i32, y: i32, z: i32) -> (i32, i32, i32) {
        let w = self.width as i32;
        (self.coord.cx * w + x, y, self.coord.cz * w + z)
    }

    #[inline]
    pub fn local_of_world(&self, wx: i32, wy: i32, wz: i32) -> (i32, i32, i32) {
        let w = self.width as i32;
        (wx - self.coord.cx * w, wy, wz - self.coord.cz * w)
    }

    /// Origin of the chunk in world block units.
    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        let w = self.width as i32;
        (self.coord.cx * w, self.coord.cz * w)
    }

    /// Non-empty cells with their local coordinates, y-major.
    pub fn iter_solid(&self) -> impl Iterator<Item = ((i32, i32, i32), BlockRecord)> + '_ {
        let w = self.width;
        self.cells.iter().enumerate().filter(|(_, c)| !c.is_empty()).map(move |(i, c)| {
            let x = i % w;
            let z = (i / w) % w;
            let y = i / (w * w);
            ((x as i32, y as i32, z as i32), *c)
        })
    }

    pub fn count_of(&self, id: BlockId) -> usize {
        self.cells.iter().filter(|c| c.id == id).count()
    }

    #[inline]
    pub fn is_all_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Fill an inclusive local box with one type; cells outside the grid are skipped.
    pub fn fill(&mut self, min: (i32, i32, i32), max: (i32, i32, i32), id: BlockId) {
        for y in min.1..=max.1 {
            for z in min.2..=max.2 {
                for x in min.0..=max.0 {
                    self.set_block_id(x, y, z, id);
                }
            }
        }
    }
}
