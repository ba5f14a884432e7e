use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tessera_blocks::{BlockId, BlockRegistry};
use tessera_chunk::{ChunkCoord, ChunkGrid};
use tessera_geom::Vec3;
use tessera_physics::{Agent, CollisionEngine, PhysicsParams};

const STONE: BlockId = 1;

struct Body {
    pos: Vec3,
    vel: Vec3,
    on_ground: bool,
    in_water: bool,
}

impl Agent for Body {
    fn radius(&self) -> f32 {
        0.5
    }
    fn height(&self) -> f32 {
        2.0
    }
    fn position(&self) -> Vec3 {
        self.pos
    }
    fn set_position(&mut self, pos: Vec3) {
        self.pos = pos;
    }
    fn velocity(&self) -> Vec3 {
        self.vel
    }
    fn set_velocity(&mut self, vel: Vec3) {
        self.vel = vel;
    }
    fn world_velocity(&self) -> Vec3 {
        self.vel
    }
    fn set_on_ground(&mut self, on_ground: bool) {
        self.on_ground = on_ground;
    }
    fn in_water(&self) -> bool {
        self.in_water
    }
    fn set_in_water(&mut self, in_water: bool) {
        self.in_water = in_water;
    }
    fn integrate_input(&mut self, step: f32) {
        self.pos += self.vel * step;
    }
    fn apply_world_velocity_delta(&mut self, dv: Vec3) {
        self.vel += dv;
    }
}

fn load_registry() -> BlockRegistry {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    BlockRegistry::load_from_path(root.join("../../assets/blocks.toml")).unwrap()
}

fn bench_resting_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_step");
    let reg = load_registry();
    let mut grid = ChunkGrid::new(ChunkCoord::new(0, 0), 16, 64);
    grid.fill((0, 0, 0), (15, 20, 15), STONE);
    let sample = |x: i32, y: i32, z: i32| grid.id_or_empty(x, y, z);
    group.bench_function("resting_16x64", |b| {
        let mut eng = CollisionEngine::new(PhysicsParams::default());
        let mut body = Body {
            pos: Vec3::new(8.0, 22.5, 8.0),
            vel: Vec3::ZERO,
            on_ground: false,
            in_water: false,
        };
        b.iter(|| {
            eng.step(&mut body, &reg, &sample);
            black_box(body.pos);
        })
    });
    group.bench_function("walking_16x64", |b| {
        let mut eng = CollisionEngine::new(PhysicsParams::default());
        let mut body = Body {
            pos: Vec3::new(8.0, 22.5, 8.0),
            vel: Vec3::ZERO,
            on_ground: false,
            in_water: false,
        };
        b.iter(|| {
            body.vel.x = 4.0;
            if body.pos.x > 14.0 {
                body.pos.x = 2.0;
            }
            eng.step(&mut body, &reg, &sample);
            black_box(body.on_ground);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_resting_step);
criterion_main!(benches);
