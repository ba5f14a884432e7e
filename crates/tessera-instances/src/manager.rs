use std::fmt;

use hashbrown::{HashMap, HashSet};
use tessera_blocks::{BlockId, BlockRegistry};
use tessera_chunk::ChunkGrid;

use crate::table::{InstanceTable, InstanceTransform};

/// Why an add or remove left the chunk untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InstanceSkip {
    OutOfRange,
    Empty,
    AlreadyInstanced,
    NotInstanced,
    UnknownType,
    /// Mesh for the type not loaded yet; the cell is queued for `retry_deferred`.
    GeometryPending,
    TableFull,
    /// Record and table disagree about a slot.
    Inconsistent,
}

impl fmt::Display for InstanceSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceSkip::OutOfRange => "cell outside chunk",
            InstanceSkip::Empty => "cell is empty",
            InstanceSkip::AlreadyInstanced => "cell already has an instance",
            InstanceSkip::NotInstanced => "cell has no instance",
            InstanceSkip::UnknownType => "unknown block type",
            InstanceSkip::GeometryPending => "geometry not loaded",
            InstanceSkip::TableFull => "instance table full",
            InstanceSkip::Inconsistent => "slot bookkeeping mismatch",
        };
        f.write_str(s)
    }
}

/// Render-instance bookkeeping for one chunk.
#[derive(Default, Debug)]
pub struct InstanceManager {
    tables: HashMap<BlockId, InstanceTable>,
    deferred: HashSet<(i32, i32, i32)>,
}

impl InstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn table(&self, id: BlockId) -> Option<&InstanceTable> {
        self.tables.get(&id)
    }

    #[inline]
    pub fn count(&self, id: BlockId) -> usize {
        self.tables.get(&id).map(|t| t.count()).unwrap_or(0)
    }

    pub fn total_count(&self) -> usize {
        self.tables.values().map(|t| t.count()).sum()
    }

    pub fn tables(&self) -> impl Iterator<Item = &InstanceTable> {
        self.tables.values()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.deferred.len()
    }

    #[inline]
    pub fn is_pending(&self, x: i32, y: i32, z: i32) -> bool {
        self.deferred.contains(&(x, y, z))
    }

    /// Give a visible block a render instance at the end of its type's table.
    pub fn add_instance(
        &mut self,
        grid: &mut ChunkGrid,
        reg: &BlockRegistry,
        x: i32,
        y: i32,
        z: i32,
    ) -> Result<u32, InstanceSkip> {
        let rec = grid.get(x, y, z).ok_or(InstanceSkip::OutOfRange)?;
        if rec.is_empty() {
            return Err(InstanceSkip::Empty);
        }
        if rec.slot.is_some() {
            return Err(InstanceSkip::AlreadyInstanced);
        }
        if !reg.contains(rec.id) {
            log::warn!(target: "instances", "add ({},{},{}): unknown block id {}", x, y, z, rec.id);
            return Err(InstanceSkip::UnknownType);
        }
        if !reg.geometry_available(rec.id) {
            log::debug!(
                target: "instances",
                "add ({},{},{}): geometry for block {} not loaded, deferring",
                x, y, z, rec.id
            );
            self.deferred.insert((x, y, z));
            return Err(InstanceSkip::GeometryPending);
        }
        let volume = grid.volume();
        let table = self.tables.entry(rec.id).or_insert_with(|| {
            let cap = reg
                .max_count_hint(rec.id)
                .map(|n| (n as usize).min(volume))
                .unwrap_or(volume);
            InstanceTable::new(rec.id, cap)
        });
        if table.is_full() {
            log::warn!(
                target: "instances",
                "add ({},{},{}): table for block {} full at {}",
                x, y, z, rec.id, table.capacity()
            );
            return Err(InstanceSkip::TableFull);
        }
        let (wx, wy, wz) = grid.world_of_local(x, y, z);
        let slot = table.push((x, y, z), InstanceTransform::at_cell(wx, wy, wz));
        grid.set_instance_slot(x, y, z, Some(slot));
        self.deferred.remove(&(x, y, z));
        log::trace!(target: "instances", "add ({},{},{}) id={} slot={}", x, y, z, rec.id, slot);
        Ok(slot)
    }

    /// Drop a block's instance by moving the table's last entry into its slot.
    /// Returns the vacated slot.
    pub fn remove_instance(
        &mut self,
        grid: &mut ChunkGrid,
        x: i32,
        y: i32,
        z: i32,
    ) -> Result<u32, InstanceSkip> {
        self.deferred.remove(&(x, y, z));
        let rec = grid.get(x, y, z).ok_or(InstanceSkip::OutOfRange)?;
        if rec.is_empty() {
            return Err(InstanceSkip::Empty);
        }
        let slot = rec.slot.ok_or(InstanceSkip::NotInstanced)?;
        let Some(table) = self.tables.get_mut(&rec.id) else {
            log::warn!(
                target: "instances",
                "remove ({},{},{}): slot {} but no table for block {}",
                x, y, z, slot, rec.id
            );
            return Err(InstanceSkip::Inconsistent);
        };
        if table.cell_of(slot) != Some((x, y, z)) {
            log::warn!(
                target: "instances",
                "remove ({},{},{}): slot {} of block {} belongs to {:?}",
                x, y, z, slot, rec.id, table.cell_of(slot)
            );
            return Err(InstanceSkip::Inconsistent);
        }
        if let Some((mx, my, mz)) = table.swap_remove(slot) {
            grid.set_instance_slot(mx, my, mz, Some(slot));
        }
        grid.set_instance_slot(x, y, z, None);
        log::trace!(target: "instances", "remove ({},{},{}) id={} slot={}", x, y, z, rec.id, slot);
        Ok(slot)
    }

    /// Instance every exposed, not yet instanced block of a freshly filled grid.
    /// Returns how many instances were created.
    pub fn populate(&mut self, grid: &mut ChunkGrid, reg: &BlockRegistry) -> usize {
        let visible: Vec<(i32, i32, i32)> = grid
            .iter_solid()
            .filter(|&((x, y, z), rec)| rec.slot.is_none() && !grid.is_obscured(x, y, z))
            .map(|(cell, _)| cell)
            .collect();
        let mut added = 0;
        for (x, y, z) in visible {
            if self.add_instance(grid, reg, x, y, z).is_ok() {
                added += 1;
            }
        }
        let deferred = self.deferred.len();
        if deferred > 0 {
            log::warn!(
                target: "instances",
                "populated chunk ({}, {}): {} instances, {} deferred until geometry loads",
                grid.coord.cx, grid.coord.cz, added, deferred
            );
        } else {
            log::debug!(
                target: "instances",
                "populated chunk ({}, {}): {} instances",
                grid.coord.cx, grid.coord.cz, added
            );
        }
        added
    }

    /// Re-attempt adds that were waiting on geometry. Cells that changed since
    /// (emptied or instanced by another path) are dropped from the queue.
    pub fn retry_deferred(&mut self, grid: &mut ChunkGrid, reg: &BlockRegistry) -> usize {
        if self.deferred.is_empty() {
            return 0;
        }
        let mut cells: Vec<(i32, i32, i32)> = self.deferred.drain().collect();
        // Stable slot assignment regardless of hash order
        cells.sort_unstable();
        let mut added = 0;
        for (x, y, z) in cells {
            match self.add_instance(grid, reg, x, y, z) {
                Ok(_) => added += 1,
                Err(InstanceSkip::GeometryPending) => {}
                Err(skip) => {
                    log::debug!(target: "instances", "dropping deferred ({},{},{}): {}", x, y, z, skip);
                }
            }
        }
        added
    }

    /// Cross-check every table against the grid records.
    pub fn check_consistency(&self, grid: &ChunkGrid) -> Result<(), String> {
        for table in self.tables.values() {
            for slot in 0..table.count() as u32 {
                let Some((x, y, z)) = table.cell_of(slot) else {
                    return Err(format!("block {} slot {} has no cell", table.id(), slot));
                };
                match grid.get(x, y, z) {
                    Some(rec) if rec.id == table.id() && rec.slot == Some(slot) => {}
                    other => {
                        return Err(format!(
                            "block {} slot {} -> ({},{},{}) holds {:?}",
                            table.id(),
                            slot,
                            x,
                            y,
                            z,
                            other
                        ));
                    }
                }
            }
        }
        for ((x, y, z), rec) in grid.iter_solid() {
            if let Some(slot) = rec.slot {
                let owned = self
                    .tables
                    .get(&rec.id)
                    .and_then(|t| t.cell_of(slot))
                    .is_some_and(|c| c == (x, y, z));
                if !owned {
                    return Err(format!(
                        "({},{},{}) block {} claims slot {} it does not own",
                        x, y, z, rec.id, slot
                    ));
                }
            }
        }
        Ok(())
    }
}
