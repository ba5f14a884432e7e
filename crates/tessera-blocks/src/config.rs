use serde::Deserialize;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Name of the block the physics core treats as water. Optional; a world
    // without water simply never reports the agent as submerged.
    #[serde(default)]
    pub water_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub water: Option<bool>,
    // False while the renderer is still streaming this type's mesh in.
    #[serde(default)]
    pub geometry_available: Option<bool>,
    // Upper bound on instances of this type in a single chunk.
    #[serde(default)]
    pub max_count: Option<u32>,
}
