use tessera_geom::Vec3;
use tessera_physics::Agent;

use crate::config::WalkerConfig;

/// What the driver wants the walker to do this step. Axes are in the
/// walker's own frame and clamped to unit length.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WalkIntent {
    pub forward: f32,
    pub strafe: f32,
    pub jump: bool,
}

#[derive(Debug, Clone)]
pub struct Walker {
    pub pos: Vec3, // head position (x,z at axis, y at top of the cylinder)
    pub vel: Vec3, // local: x = right, y = up, z = forward
    pub on_ground: bool,
    pub in_water: bool,
    pub yaw: f32, // degrees
    pub intent: WalkIntent,
    pub radius: f32,
    pub height: f32,
    pub speed: f32,
    pub swim_mult: f32,
    pub jump_speed: f32,
}

impl Walker {
    pub fn new(spawn: Vec3, cfg: &WalkerConfig) -> Self {
        Self {
            pos: spawn,
            vel: Vec3::ZERO,
            on_ground: false,
            in_water: false,
            yaw: 0.0,
            intent: WalkIntent::default(),
            radius: cfg.radius,
            height: cfg.height,
            speed: cfg.speed,
            swim_mult: cfg.swim_mult,
            jump_speed: cfg.jump_speed,
        }
    }

    pub fn feet_position(&self) -> Vec3 {
        Vec3::new(self.pos.x, self.pos.y - self.height, self.pos.z)
    }

    #[inline]
    fn basis(&self) -> (Vec3, Vec3) {
        let yaw_rad = self.yaw.to_radians();
        let fwd = Vec3::new(yaw_rad.cos(), 0.0, yaw_rad.sin());
        let right = fwd.cross(Vec3::UP);
        (fwd, right)
    }

    pub fn local_to_world(&self, v: Vec3) -> Vec3 {
        let (fwd, right) = self.basis();
        fwd * v.z + right * v.x + Vec3::UP * v.y
    }

    pub fn world_to_local(&self, v: Vec3) -> Vec3 {
        let (fwd, right) = self.basis();
        Vec3::new(v.dot(right), v.y, v.dot(fwd))
    }
}

impl Agent for Walker {
    fn radius(&self) -> f32 {
        self.radius
    }

    fn height(&self) -> f32 {
        self.height
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
        self.local_to_world(self.vel)
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
        // Horizontal motion is kinematic toward the wish direction
        let mut wish = Vec3::new(self.intent.strafe, 0.0, self.intent.forward);
        if wish.length() > 1.0 {
            wish = wish.normalized();
        }
        let speed = if self.in_water {
            self.speed * self.swim_mult
        } else {
            self.speed
        };
        self.vel.x = wish.x * speed;
        self.vel.z = wish.z * speed;

        if self.intent.jump {
            if self.on_ground {
                self.vel.y = self.jump_speed;
            } else if self.in_water {
                // Swim up
                self.vel.y = self.jump_speed * self.swim_mult;
            }
        }

        self.pos += self.world_velocity() * step;
    }

    fn apply_world_velocity_delta(&mut self, dv: Vec3) {
        let local = self.world_to_local(dv);
        self.vel += local;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker() -> Walker {
        Walker::new(Vec3::new(0.0, 2.0, 0.0), &WalkerConfig::default())
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn zero_yaw_faces_plus_x() {
        let w = walker();
        assert!(approx(w.local_to_world(Vec3::new(0.0, 0.0, 1.0)), Vec3::new(1.0, 0.0, 0.0)));
        assert!(approx(w.local_to_world(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn frame_conversion_inverts() {
        let mut w = walker();
        w.yaw = 37.0;
        let v = Vec3::new(0.3, -1.2, 2.5);
        assert!(approx(w.world_to_local(w.local_to_world(v)), v));
    }

    #[test]
    fn world_delta_cancels_world_velocity_component() {
        let mut w = walker();
        w.yaw = 120.0;
        w.vel = Vec3::new(1.0, -3.0, 4.0);
        let n = Vec3::new(1.0, 0.0, 0.0);
        let into = w.world_velocity().dot(n);
        w.apply_world_velocity_delta(-(n * into));
        assert!(w.world_velocity().dot(n).abs() < 1e-5);
        assert!((w.vel.y + 3.0).abs() < 1e-6);
    }

    #[test]
    fn walking_moves_along_facing() {
        let mut w = walker();
        w.yaw = 90.0;
        w.intent.forward = 1.0;
        w.integrate_input(0.5);
        // 5 blocks/s for half a second along +z
        assert!((w.pos.z - 2.5).abs() < 1e-4);
        assert!(w.pos.x.abs() < 1e-4);
    }

    #[test]
    fn diagonal_intent_is_normalized() {
        let mut w = walker();
        w.intent = WalkIntent {
            forward: 1.0,
            strafe: 1.0,
            jump: false,
        };
        w.integrate_input(0.1);
        assert!((w.vel.horizontal().length() - w.speed).abs() < 1e-4);
    }

    #[test]
    fn swimming_is_slower() {
        let mut w = walker();
        w.in_water = true;
        w.intent.forward = 1.0;
        w.integrate_input(0.1);
        assert!((w.vel.z - w.speed * w.swim_mult).abs() < 1e-6);
    }

    #[test]
    fn jump_needs_ground_or_water() {
        let mut w = walker();
        w.intent.jump = true;
        w.integrate_input(0.01);
        assert_eq!(w.vel.y, 0.0);

        w.on_ground = true;
        w.integrate_input(0.01);
        assert_eq!(w.vel.y, w.jump_speed);

        let mut s = walker();
        s.intent.jump = true;
        s.in_water = true;
        s.integrate_input(0.01);
        assert_eq!(s.vel.y, s.jump_speed * s.swim_mult);
    }
}
