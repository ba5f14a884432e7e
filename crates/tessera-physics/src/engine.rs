use serde::{Deserialize, Serialize};
use tessera_blocks::{BlockId, BlockRegistry};
use tessera_geom::{Aabb, CellBox, Vec3};

use crate::agent::Agent;
use crate::contact::{Contact, Cylinder, narrow_phase};

// Accumulated frame times drift from the step by float rounding; within this
// many seconds a step is still due.
const STEP_SLACK_S: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Seconds of simulated time per step.
    pub step: f32,
    /// Downward acceleration in blocks/s², applied unless submerged.
    pub gravity: f32,
    pub max_steps_per_update: u32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            step: 1.0 / 60.0,
            gravity: 32.0,
            max_steps_per_update: 240,
        }
    }
}

/// Integer cells that can touch an agent with head at `head`: the cylinder's
/// bounding box rounded outward.
pub fn candidate_box(head: Vec3, radius: f32, height: f32) -> CellBox {
    let min = Vec3::new(head.x - radius, head.y - height, head.z - radius);
    let max = Vec3::new(head.x + radius, head.y, head.z + radius);
    CellBox::covering(&Aabb::new(min, max))
}

/// Whether any cell in the agent's candidate box is the registry's water type.
pub fn is_submerged<A, F>(agent: &A, reg: &BlockRegistry, sample: &F) -> bool
where
    A: Agent + ?Sized,
    F: Fn(i32, i32, i32) -> BlockId,
{
    let Some(water) = reg.water_id else {
        return false;
    };
    candidate_box(agent.position(), agent.radius(), agent.height())
        .cells()
        .any(|(x, y, z)| sample(x, y, z) == water)
}

/// Fixed-timestep driver. `update` is fed wall-clock frame times; whole steps
/// run synchronously and the remainder carries to the next call.
#[derive(Debug)]
pub struct CollisionEngine {
    params: PhysicsParams,
    accumulator: f64,
    ticks: u64,
    contacts: Vec<Contact>,
}

impl CollisionEngine {
    pub fn new(params: PhysicsParams) -> Self {
        Self {
            params,
            accumulator: 0.0,
            ticks: 0,
            contacts: Vec::new(),
        }
    }

    #[inline]
    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Steps executed since creation.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Unsimulated time carried to the next update, in seconds.
    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Advance by `dt` seconds of frame time. Returns the number of steps run.
    pub fn update<A, F>(&mut self, dt: f32, agent: &mut A, reg: &BlockRegistry, sample: &F) -> u32
    where
        A: Agent + ?Sized,
        F: Fn(i32, i32, i32) -> BlockId,
    {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        let step = f64::from(self.params.step);
        if step <= 0.0 {
            log::warn!(target: "physics", "non-positive step {}; not simulating", step);
            return 0;
        }
        self.accumulator += f64::from(dt);
        let budget = step * f64::from(self.params.max_steps_per_update);
        if self.accumulator > budget + STEP_SLACK_S {
            log::warn!(
                target: "physics",
                "frame time backlog {:.3}s exceeds {} steps; dropping {:.3}s",
                self.accumulator,
                self.params.max_steps_per_update,
                self.accumulator - budget
            );
            self.accumulator = budget;
        }
        let mut steps = 0;
        while self.accumulator + STEP_SLACK_S >= step {
            self.step(agent, reg, sample);
            self.accumulator = (self.accumulator - step).max(0.0);
            steps += 1;
        }
        steps
    }

    /// One deterministic step: water check, gravity, input, then collide.
    pub fn step<A, F>(&mut self, agent: &mut A, reg: &BlockRegistry, sample: &F)
    where
        A: Agent + ?Sized,
        F: Fn(i32, i32, i32) -> BlockId,
    {
        let dt = self.params.step;
        let submerged = is_submerged(agent, reg, sample);
        agent.set_in_water(submerged);
        if !agent.in_water() {
            let mut v = agent.velocity();
            v.y -= self.params.gravity * dt;
            agent.set_velocity(v);
        }
        agent.integrate_input(dt);
        agent.set_on_ground(false);

        self.collect_contacts(agent, reg, sample);
        self.resolve_contacts(agent);
        self.ticks += 1;
    }

    /// Broad then narrow phase into the engine's scratch list.
    fn collect_contacts<A, F>(&mut self, agent: &A, reg: &BlockRegistry, sample: &F)
    where
        A: Agent + ?Sized,
        F: Fn(i32, i32, i32) -> BlockId,
    {
        self.contacts.clear();
        let (r, h) = (agent.radius(), agent.height());
        let cyl = Cylinder::from_head(agent.position(), r, h);
        for (x, y, z) in candidate_box(agent.position(), r, h).cells() {
            if !reg.collides(sample(x, y, z)) {
                continue;
            }
            if let Some(c) = narrow_phase(&cyl, (x, y, z)) {
                self.contacts.push(c);
            }
        }
    }

    /// Shallowest first. Each contact is re-checked against the agent's current
    /// position since earlier pushes may already have cleared it.
    fn resolve_contacts<A>(&mut self, agent: &mut A)
    where
        A: Agent + ?Sized,
    {
        self.contacts.sort_by(|a, b| a.overlap.total_cmp(&b.overlap));
        let (r, h) = (agent.radius(), agent.height());
        let mut resolved = 0;
        for c in &self.contacts {
            let cyl = Cylinder::from_head(agent.position(), r, h);
            if !cyl.contains(c.point) {
                continue;
            }
            agent.set_position(agent.position() + c.normal * c.overlap);
            let into = agent.world_velocity().dot(c.normal);
            agent.apply_world_velocity_delta(-(c.normal * into));
            if c.is_ground() {
                agent.set_on_ground(true);
            }
            resolved += 1;
        }
        if !self.contacts.is_empty() {
            log::trace!(
                target: "physics",
                "tick {}: {} contacts, {} resolved",
                self.ticks,
                self.contacts.len(),
                resolved
            );
        }
    }

    /// Contacts found by the most recent step, in resolution order.
    pub fn last_contacts(&self) -> &[Contact] {
        &self.contacts
    }
}
