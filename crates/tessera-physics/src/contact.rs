use tessera_geom::{Aabb, Vec3};

// Horizontal separations below this have no usable direction.
const DEGENERATE_XZ: f32 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// One cylinder/cube penetration found by the narrow phase. Lives for a single
/// step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    pub cell: (i32, i32, i32),
    pub point: Vec3,
    pub normal: Vec3,
    pub overlap: f32,
    pub axis: Axis,
}

impl Contact {
    /// Resolving this contact puts the agent on top of the block.
    #[inline]
    pub fn is_ground(&self) -> bool {
        self.axis == Axis::Vertical && self.normal.y > 0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cylinder {
    pub center: Vec3,
    pub radius: f32,
    pub half_height: f32,
}

impl Cylinder {
    /// Cylinder of an agent whose head is at `head`.
    #[inline]
    pub fn from_head(head: Vec3, radius: f32, height: f32) -> Self {
        Self {
            center: Vec3::new(head.x, head.y - height * 0.5, head.z),
            radius,
            half_height: height * 0.5,
        }
    }

    /// Strict interior test; touching the surface is not a contact.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        let d = p - self.center;
        d.y.abs() < self.half_height && d.length_xz() < self.radius
    }
}

/// Test the unit cube at `cell` against `cyl`. The cube point nearest the
/// cylinder's axis centre decides contact; the shallower of the vertical and
/// horizontal overlaps picks the push-out axis, vertical on ties.
pub fn narrow_phase(cyl: &Cylinder, cell: (i32, i32, i32)) -> Option<Contact> {
    let cube = Aabb::unit_cube_at(cell.0, cell.1, cell.2);
    let point = cube.closest_point(cyl.center);
    if !cyl.contains(point) {
        return None;
    }
    let d = point - cyl.center;
    let vertical_overlap = cyl.half_height - d.y.abs();
    let horizontal_overlap = cyl.radius - d.length_xz();

    let vertical = |overlap: f32| {
        // Block above the axis centre pushes down, anything else pushes up.
        let normal = if d.y > 0.0 { Vec3::DOWN } else { Vec3::UP };
        Contact {
            cell,
            point,
            normal,
            overlap,
            axis: Axis::Vertical,
        }
    };

    if vertical_overlap <= horizontal_overlap {
        return Some(vertical(vertical_overlap));
    }

    let mut away = (cyl.center - point).horizontal();
    if away.length_xz() <= DEGENERATE_XZ {
        // Axis centre is inside the cube: push away from the cube's centre.
        away = (cyl.center - cube.center()).horizontal();
    }
    if away.length_xz() <= DEGENERATE_XZ {
        return Some(vertical(vertical_overlap));
    }
    Some(Contact {
        cell,
        point,
        normal: away.normalized(),
        overlap: horizontal_overlap,
        axis: Axis::Horizontal,
    })
}
