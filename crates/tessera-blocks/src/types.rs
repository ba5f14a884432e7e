pub type BlockId = u16;

/// Id of the cell that holds no material.
pub const EMPTY: BlockId = 0;
