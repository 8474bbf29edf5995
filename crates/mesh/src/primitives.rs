//! Hand-specified descriptors for the shapes the scenes build in code.

use crate::builder::{MeshDescriptor, NormalMode};
use glam::DVec3;
use std::f64::consts::{PI, TAU};

/// Unit cube: 8 shared corners, 6 quads wound counter-clockwise seen from
/// outside. The bottom face `(0,1,2,3)` comes first.
pub fn cube() -> MeshDescriptor {
    box_from_half_extents(DVec3::splat(0.5))
}

/// Axis-aligned box with the same vertex and face layout as [`cube`].
pub fn box_from_half_extents(h: DVec3) -> MeshDescriptor {
    let corners = [
        // bottom (y = -h)
        (-1.0, -1.0, -1.0),
        (1.0, -1.0, -1.0),
        (1.0, -1.0, 1.0),
        (-1.0, -1.0, 1.0),
        // top (y = +h)
        (-1.0, 1.0, -1.0),
        (1.0, 1.0, -1.0),
        (1.0, 1.0, 1.0),
        (-1.0, 1.0, 1.0),
    ];
    let vertices = corners
        .iter()
        .map(|&(x, y, z)| DVec3::new(x, y, z) * h)
        .collect();
    let faces = vec![
        vec![0, 1, 2, 3], // bottom
        vec![4, 7, 6, 5], // top
        vec![0, 4, 5, 1], // front (-Z)
        vec![3, 2, 6, 7], // back (+Z)
        vec![0, 3, 7, 4], // left (-X)
        vec![1, 5, 6, 2], // right (+X)
    ];
    MeshDescriptor::new("cube", vertices, faces)
}

/// Unit square on the XZ plane facing `+Y`.
pub fn unit_plane() -> MeshDescriptor {
    MeshDescriptor::new(
        "plane",
        vec![
            DVec3::new(-0.5, 0.0, -0.5),
            DVec3::new(-0.5, 0.0, 0.5),
            DVec3::new(0.5, 0.0, 0.5),
            DVec3::new(0.5, 0.0, -0.5),
        ],
        vec![vec![0, 1, 2, 3]],
    )
}

/// Unit-diameter UV sphere with smooth normals.
///
/// `stacks` is clamped to at least 2 and `slices` to at least 3.
pub fn sphere(stacks: u32, slices: u32) -> MeshDescriptor {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let r = 0.5;

    let mut vertices = vec![DVec3::new(0.0, r, 0.0)];
    for i in 1..stacks {
        let (sin_t, cos_t) = (PI * i as f64 / stacks as f64).sin_cos();
        for j in 0..slices {
            let (sin_p, cos_p) = (TAU * j as f64 / slices as f64).sin_cos();
            vertices.push(DVec3::new(r * sin_t * sin_p, r * cos_t, r * sin_t * cos_p));
        }
    }
    let bottom = vertices.len() as u32;
    vertices.push(DVec3::new(0.0, -r, 0.0));

    let ring = |i: u32, j: u32| 1 + (i - 1) * slices + j % slices;
    let mut faces = Vec::new();
    for j in 0..slices {
        faces.push(vec![0, ring(1, j), ring(1, j + 1)]);
    }
    for i in 1..stacks - 1 {
        for j in 0..slices {
            faces.push(vec![ring(i, j), ring(i + 1, j), ring(i + 1, j + 1), ring(i, j + 1)]);
        }
    }
    for j in 0..slices {
        faces.push(vec![ring(stacks - 1, j), bottom, ring(stacks - 1, j + 1)]);
    }

    MeshDescriptor::new("sphere", vertices, faces).with_normal_mode(NormalMode::SmoothAveraged)
}
