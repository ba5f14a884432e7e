use proptest::prelude::*;
use tessera_geom::Vec3;
use tessera_physics::{Axis, Cylinder, narrow_phase};

fn cylinder() -> impl Strategy<Value = Cylinder> {
    (-3.0f32..3.0, -3.0f32..3.0, -3.0f32..3.0, 0.2f32..0.9, 0.5f32..2.0).prop_map(
        |(x, y, z, radius, half_height)| Cylinder {
            center: Vec3::new(x, y, z),
            radius,
            half_height,
        },
    )
}

fn cell() -> impl Strategy<Value = (i32, i32, i32)> {
    (-3i32..=3, -3i32..=3, -3i32..=3)
}

proptest! {
    // Every contact has a unit normal, positive overlap, and a point inside the cylinder
    #[test]
    fn contacts_are_well_formed(cyl in cylinder(), c in cell()) {
        if let Some(hit) = narrow_phase(&cyl, c) {
            prop_assert!(hit.overlap > 0.0);
            prop_assert!((hit.normal.length() - 1.0).abs() < 1e-4);
            prop_assert!(cyl.contains(hit.point));
            match hit.axis {
                Axis::Vertical => prop_assert!(hit.normal.x == 0.0 && hit.normal.z == 0.0),
                Axis::Horizontal => prop_assert!(hit.normal.y == 0.0),
            }
        }
    }

    // Pushing out along the contact clears that contact's point
    #[test]
    fn resolution_clears_point(cyl in cylinder(), c in cell()) {
        if let Some(hit) = narrow_phase(&cyl, c) {
            let moved = Cylinder { center: cyl.center + hit.normal * hit.overlap, ..cyl };
            let d = hit.point - moved.center;
            let outside = d.y.abs() >= moved.half_height - 1e-4 || d.length_xz() >= moved.radius - 1e-4;
            prop_assert!(outside);
        }
    }
}
