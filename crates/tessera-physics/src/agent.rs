use tessera_geom::Vec3;

/// The moving body the engine pushes around. The agent owns its movement frame:
/// `velocity` is local, `world_velocity` is what the engine projects against
/// contact normals, and corrections come back through
/// `apply_world_velocity_delta`.
pub trait Agent {
    fn radius(&self) -> f32;
    fn height(&self) -> f32;

    /// Head point; feet are at `position().y - height()`.
    fn position(&self) -> Vec3;
    fn set_position(&mut self, pos: Vec3);

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, vel: Vec3);
    fn world_velocity(&self) -> Vec3;

    fn set_on_ground(&mut self, on_ground: bool);
    fn in_water(&self) -> bool;
    fn set_in_water(&mut self, in_water: bool);

    /// Turn intent into motion for one step of `step` seconds.
    fn integrate_input(&mut self, step: f32);
    fn apply_world_velocity_delta(&mut self, dv: Vec3);
}
