use std::error::Error;

use clap::ValueEnum;
use tessera_blocks::{BlockId, BlockRegistry};
use tessera_chunk::{ChunkCoord, ChunkGrid};
use tessera_geom::Vec3;

use crate::config::ChunkConfig;
use crate::player::WalkIntent;

/// Hand-built terrain for the headless driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// 3x3 stone slab at y = 5; the walker drops onto it.
    Platform,
    /// Walled basin of water over a stone floor.
    Pool,
    /// Staircase climbed by walking forward and jumping.
    Stairs,
}

/// A built scene: terrain plus where and how the walker starts.
pub struct SceneSetup {
    pub grid: ChunkGrid,
    pub spawn: Vec3,
    pub yaw: f32,
    pub intent: WalkIntent,
}

fn block(reg: &BlockRegistry, name: &str) -> Result<BlockId, Box<dyn Error>> {
    reg.id_by_name(name)
        .ok_or_else(|| format!("block registry has no '{}' block", name).into())
}

impl Scene {
    pub fn build(self, reg: &BlockRegistry, chunk: &ChunkConfig) -> Result<SceneSetup, Box<dyn Error>> {
        let (w, h) = (chunk.width as i32, chunk.height as i32);
        let mut grid = ChunkGrid::new(ChunkCoord::new(0, 0), chunk.width, chunk.height);
        let stone = block(reg, "stone")?;
        let setup = match self {
            Scene::Platform => {
                if w < 3 || h < 11 {
                    return Err(format!("platform scene needs a 3x11 chunk, got {}x{}", w, h).into());
                }
                grid.fill((0, 5, 0), (2, 5, 2), stone);
                SceneSetup {
                    grid,
                    spawn: Vec3::new(1.0, 10.0, 1.0),
                    yaw: 0.0,
                    intent: WalkIntent::default(),
                }
            }
            Scene::Pool => {
                if w < 8 || h < 12 {
                    return Err(format!("pool scene needs an 8x12 chunk, got {}x{}", w, h).into());
                }
                let water = reg.water_id.ok_or("block registry has no water block")?;
                grid.fill((0, 0, 0), (w - 1, 0, w - 1), stone);
                grid.fill((0, 1, 0), (w - 1, 5, w - 1), stone);
                grid.fill((1, 1, 1), (w - 2, 5, w - 2), water);
                let c = w as f32 * 0.5;
                SceneSetup {
                    grid,
                    spawn: Vec3::new(c, 11.0, c),
                    yaw: 0.0,
                    intent: WalkIntent {
                        forward: 1.0,
                        ..WalkIntent::default()
                    },
                }
            }
            Scene::Stairs => {
                let steps = 6;
                if w < steps + 6 || h < steps + 6 {
                    return Err(format!("stairs scene needs a {0}x{0} chunk, got {1}x{2}", steps + 6, w, h).into());
                }
                let grass = block(reg, "grass")?;
                grid.fill((0, 0, 0), (w - 1, 0, w - 1), stone);
                for i in 0..steps {
                    let x = 4 + i;
                    grid.fill((x, 1, 0), (x, 1 + i, w - 1), stone);
                    grid.set_block_id(x, 1 + i, w / 2, grass);
                }
                SceneSetup {
                    grid,
                    spawn: Vec3::new(1.5, 3.0, w as f32 * 0.5),
                    yaw: 0.0,
                    intent: WalkIntent {
                        forward: 1.0,
                        strafe: 0.0,
                        jump: true,
                    },
                }
            }
        };
        Ok(setup)
    }
}
