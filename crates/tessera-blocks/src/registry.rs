use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::{BlockId, EMPTY};

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub water: bool,
    pub geometry_available: bool,
    pub max_count_hint: Option<u32>,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            water: false,
            geometry_available: false,
            max_count_hint: None,
        }
    }

    fn air() -> Self {
        BlockType {
            id: EMPTY,
            name: "air".to_string(),
            water: false,
            geometry_available: false,
            max_count_hint: Some(0),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY
    }

    /// Whether the agent's cylinder is pushed out of this block.
    #[inline]
    pub fn collides(&self) -> bool {
        !self.is_empty() && !self.water
    }

    #[inline]
    fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub water_id: Option<BlockId>,
}

impl BlockRegistry {
    /// Registry holding only `air`.
    pub fn new() -> Self {
        let mut reg = Self {
            blocks: vec![BlockType::air()],
            by_name: HashMap::new(),
            water_id: None,
        };
        reg.by_name.insert("air".to_string(), EMPTY);
        reg
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).filter(|t| !t.is_placeholder())
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn is_water(&self, id: BlockId) -> bool {
        self.water_id == Some(id)
    }

    /// Unknown ids collide: anything non-empty the registry cannot describe is
    /// treated as solid ground.
    #[inline]
    pub fn collides(&self, id: BlockId) -> bool {
        if id == EMPTY {
            return false;
        }
        self.get(id).map(|t| t.collides()).unwrap_or(true)
    }

    #[inline]
    pub fn geometry_available(&self, id: BlockId) -> bool {
        self.get(id).map(|t| t.geometry_available).unwrap_or(false)
    }

    #[inline]
    pub fn max_count_hint(&self, id: BlockId) -> Option<u32> {
        self.get(id).and_then(|t| t.max_count_hint)
    }

    /// Flip a type's geometry flag once the renderer has (or no longer has) its mesh.
    pub fn set_geometry_available(&mut self, id: BlockId, available: bool) -> bool {
        match self.blocks.get_mut(id as usize) {
            Some(t) if !t.is_placeholder() => {
                t.geometry_available = available;
                true
            }
            _ => {
                log::warn!("set_geometry_available: unknown block id {}", id);
                false
            }
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        let mut water_by_flag: Option<BlockId> = None;
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if id == EMPTY {
                if def.name != "air" {
                    return Err(format!("block id 0 is reserved for air, got `{}`", def.name).into());
                }
                continue;
            }
            if def.name.is_empty() {
                return Err(format!("block id {} has an empty name", id).into());
            }
            let water = def.water.unwrap_or(false);
            if water {
                if let Some(prev) = water_by_flag {
                    log::warn!("blocks {} and {} both flagged as water; using {}", prev, id, prev);
                } else {
                    water_by_flag = Some(id);
                }
            }
            let ty = BlockType {
                id,
                name: def.name,
                water,
                geometry_available: def.geometry_available.unwrap_or(true),
                max_count_hint: def.max_count,
            };
            if reg.blocks.len() <= id as usize {
                reg.blocks.resize(id as usize + 1, BlockType::placeholder(id));
            }
            if !reg.blocks[id as usize].is_placeholder() {
                log::warn!(
                    "block id {} defined twice (`{}` replaces `{}`)",
                    id,
                    ty.name,
                    reg.blocks[id as usize].name
                );
            }
            reg.blocks[id as usize] = ty;
        }
        // Placeholders were cloned with the id of whichever block caused the resize.
        for (i, t) in reg.blocks.iter_mut().enumerate() {
            t.id = i as BlockId;
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.is_placeholder())
            .map(|t| (t.name.clone(), t.id))
            .collect();

        reg.water_id = match cfg.water_block {
            Some(name) => match reg.id_by_name(&name) {
                Some(id) => Some(id),
                None => {
                    log::warn!("water_block `{}` is not a defined block", name);
                    water_by_flag
                }
            },
            None => water_by_flag,
        };
        // Only the resolved water type is non-solid; other flagged blocks collide.
        let water_id = reg.water_id;
        for t in reg.blocks.iter_mut().filter(|t| !t.is_placeholder()) {
            let is_water = Some(t.id) == water_id;
            if t.water && !is_water {
                log::warn!(
                    "block `{}` ({}) flagged as water but water is {:?}; treating it as solid",
                    t.name,
                    t.id,
                    water_id
                );
            }
            t.water = is_water;
        }
        Ok(reg)
    }
}
