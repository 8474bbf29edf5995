use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Errors from mesh construction. A malformed descriptor is a caller bug, so
/// building fails outright instead of skipping bad faces.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    #[error("face {face} has {count} indices, need at least 3")]
    TooFewIndices { face: usize, count: usize },
    #[error("face {face} has {count} indices, only triangles and quads are supported")]
    TooManyIndices { face: usize, count: usize },
    #[error("face {face} references vertex {index} but there are {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("vertex {vertex} is not finite")]
    NonFiniteVertex { vertex: usize },
    #[error("explicit normal mode needs {expected} normals, got {actual}")]
    NormalCountMismatch { expected: usize, actual: usize },
}

/// How vertex normals are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalMode {
    /// Positions only.
    None,
    /// One caller-supplied normal per vertex, used exactly as given.
    PerVertexExplicit,
    /// Flat shading: each face gets its own copies of its vertices, all
    /// carrying the face's geometric normal.
    #[default]
    FaceAveraged,
    /// Shared vertices; area-weighted face normals accumulated per vertex.
    SmoothAveraged,
}

/// Hand-specified polyhedron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDescriptor {
    pub name: String,
    pub vertices: Vec<DVec3>,
    /// Triangles or quads, as indices into `vertices`.
    pub faces: Vec<Vec<u32>>,
    #[serde(default)]
    pub normal_mode: NormalMode,
    /// Only read in [`NormalMode::PerVertexExplicit`].
    #[serde(default)]
    pub explicit_normals: Vec<DVec3>,
}

impl MeshDescriptor {
    pub fn new(name: impl Into<String>, vertices: Vec<DVec3>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
            normal_mode: NormalMode::default(),
            explicit_normals: Vec::new(),
        }
    }

    pub fn with_normal_mode(mut self, mode: NormalMode) -> Self {
        self.normal_mode = mode;
        self
    }

    pub fn with_explicit_normals(mut self, normals: Vec<DVec3>) -> Self {
        self.normal_mode = NormalMode::PerVertexExplicit;
        self.explicit_normals = normals;
        self
    }
}

/// Triangulated, render-ready buffers. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
    /// Triangles expressed in the descriptor's own vertex numbering,
    /// regardless of any vertex duplication done for flat shading.
    pub source_triangles: Vec<[u32; 3]>,
}

impl MeshBuffer {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Cast positions to raw bytes for buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normal_bytes(&self) -> Option<&[u8]> {
        self.normals.as_deref().map(|n| bytemuck::cast_slice(n))
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Turns a [`MeshDescriptor`] into a [`MeshBuffer`].
///
/// Algorithm:
///   1. Validate every face and index up front.
///   2. Split quads `(a,b,c,d)` into `(a,b,c)` and `(c,d,a)`, keeping winding.
///   3. Emit positions (and normals) according to the normal mode.
///
/// Output is a pure function of the input: the same descriptor always yields
/// identical buffers.
pub struct MeshBuilder;

impl MeshBuilder {
    pub fn build(desc: &MeshDescriptor) -> Result<MeshBuffer, GeometryError> {
        validate(desc)?;

        let source_triangles: Vec<[u32; 3]> =
            desc.faces.iter().flat_map(|f| split_face(f)).collect();

        let (positions, normals, indices) = match desc.normal_mode {
            NormalMode::None => (to_f32(&desc.vertices), None, flatten(&source_triangles)),
            NormalMode::PerVertexExplicit => (
                to_f32(&desc.vertices),
                Some(to_f32(&desc.explicit_normals)),
                flatten(&source_triangles),
            ),
            NormalMode::FaceAveraged => flat_shaded(desc),
            NormalMode::SmoothAveraged => {
                let normals = smooth_normals(&desc.vertices, &source_triangles);
                (
                    to_f32(&desc.vertices),
                    Some(to_f32(&normals)),
                    flatten(&source_triangles),
                )
            }
        };

        tracing::debug!(
            name = %desc.name,
            vertices = positions.len(),
            triangles = indices.len() / 3,
            mode = ?desc.normal_mode,
            "built mesh"
        );

        Ok(MeshBuffer {
            name: desc.name.clone(),
            positions,
            normals,
            indices,
            source_triangles,
        })
    }
}

fn validate(desc: &MeshDescriptor) -> Result<(), GeometryError> {
    if let Some(vertex) = desc.vertices.iter().position(|v| !v.is_finite()) {
        return Err(GeometryError::NonFiniteVertex { vertex });
    }
    for (face, indices) in desc.faces.iter().enumerate() {
        let count = indices.len();
        if count < 3 {
            return Err(GeometryError::TooFewIndices { face, count });
        }
        if count > 4 {
            return Err(GeometryError::TooManyIndices { face, count });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= desc.vertices.len()) {
            return Err(GeometryError::IndexOutOfRange {
                face,
                index,
                vertex_count: desc.vertices.len(),
            });
        }
    }
    if desc.normal_mode == NormalMode::PerVertexExplicit
        && desc.explicit_normals.len() != desc.vertices.len()
    {
        return Err(GeometryError::NormalCountMismatch {
            expected: desc.vertices.len(),
            actual: desc.explicit_normals.len(),
        });
    }
    Ok(())
}

/// Validated faces only: 3 or 4 indices.
fn split_face(face: &[u32]) -> Vec<[u32; 3]> {
    match *face {
        [a, b, c] => vec![[a, b, c]],
        [a, b, c, d] => vec![[a, b, c], [c, d, a]],
        _ => Vec::new(),
    }
}

// Cross product is not normalized: its magnitude is twice the triangle area.
fn weighted_normal(vertices: &[DVec3], [a, b, c]: [u32; 3]) -> DVec3 {
    let (a, b, c) = (
        vertices[a as usize],
        vertices[b as usize],
        vertices[c as usize],
    );
    (b - a).cross(c - a)
}

fn flat_shaded(desc: &MeshDescriptor) -> (Vec<[f32; 3]>, Option<Vec<[f32; 3]>>, Vec<u32>) {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for face in &desc.faces {
        let normal = split_face(face)
            .into_iter()
            .map(|tri| weighted_normal(&desc.vertices, tri))
            .sum::<DVec3>()
            .normalize_or_zero();

        let base = positions.len() as u32;
        for &i in face {
            positions.push(desc.vertices[i as usize].as_vec3().to_array());
            normals.push(normal.as_vec3().to_array());
        }
        let local: Vec<u32> = (base..base + face.len() as u32).collect();
        indices.extend(split_face(&local).into_iter().flatten());
    }

    (positions, Some(normals), indices)
}

fn smooth_normals(vertices: &[DVec3], triangles: &[[u32; 3]]) -> Vec<DVec3> {
    let mut accum = vec![DVec3::ZERO; vertices.len()];
    for &tri in triangles {
        let n = weighted_normal(vertices, tri);
        for i in tri {
            accum[i as usize] += n;
        }
    }
    accum.into_iter().map(DVec3::normalize_or_zero).collect()
}

fn to_f32(values: &[DVec3]) -> Vec<[f32; 3]> {
    values.iter().map(|v| v.as_vec3().to_array()).collect()
}

fn flatten(triangles: &[[u32; 3]]) -> Vec<u32> {
    triangles.iter().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    fn quad() -> MeshDescriptor {
        MeshDescriptor::new(
            "quad",
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn quad_splits_preserving_winding() {
        let mesh = MeshBuilder::build(&quad().with_normal_mode(NormalMode::None)).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(mesh.source_triangles, vec![[0, 1, 2], [2, 3, 0]]);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn cube_yields_twelve_triangles() {
        for mode in [
            NormalMode::None,
            NormalMode::FaceAveraged,
            NormalMode::SmoothAveraged,
        ] {
            let mesh = MeshBuilder::build(&primitives::cube().with_normal_mode(mode)).unwrap();
            assert_eq!(mesh.triangle_count(), 12, "{mode:?}");
            assert_eq!(mesh.indices.len(), 36, "{mode:?}");
            assert_eq!(mesh.source_triangles.len(), 12);
        }
    }

    #[test]
    fn first_cube_triangle_keeps_declared_order() {
        let mesh = MeshBuilder::build(&primitives::cube()).unwrap();
        assert_eq!(mesh.source_triangles[0], [0, 1, 2]);
        assert_eq!(&mesh.indices[..3], &[0, 1, 2]);
    }

    #[test]
    fn build_is_deterministic() {
        let a = MeshBuilder::build(&primitives::cube()).unwrap();
        let b = MeshBuilder::build(&primitives::cube()).unwrap();
        assert_eq!(a.positions.len(), b.positions.len());
        assert_eq!(a.position_bytes(), b.position_bytes());
        assert_eq!(a.index_bytes(), b.index_bytes());
        assert_eq!(a.normal_bytes(), b.normal_bytes());
    }

    #[test]
    fn flat_cube_normals_are_axis_aligned_and_outward() {
        let mesh = MeshBuilder::build(&primitives::cube()).unwrap();
        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        for (p, n) in mesh.positions.iter().zip(normals) {
            let n = glam::Vec3::from_array(*n);
            let p = glam::Vec3::from_array(*p);
            // exactly one axis set, pointing away from the center
            assert_eq!(n.abs().max_element(), 1.0);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(n.dot(p) > 0.0);
        }
        // all four corners of a face share the same normal
        for face in normals.chunks(4) {
            assert!(face.iter().all(|n| n == &face[0]));
        }
    }

    #[test]
    fn smooth_sphere_normals_point_outward() {
        let mesh = MeshBuilder::build(&primitives::sphere(8, 12)).unwrap();
        let normals = mesh.normals.as_ref().unwrap();
        for (p, n) in mesh.positions.iter().zip(normals) {
            let p = glam::Vec3::from_array(*p).normalize();
            let n = glam::Vec3::from_array(*n);
            assert!(n.dot(p) > 0.9, "normal {n:?} at {p:?}");
        }
    }

    #[test]
    fn explicit_normals_pass_through() {
        let normals = vec![
            DVec3::new(0.0, 0.0, 2.0),
            DVec3::ZERO,
            DVec3::new(0.5, 0.0, 0.0),
            DVec3::Y,
        ];
        let mesh = MeshBuilder::build(&quad().with_explicit_normals(normals)).unwrap();
        assert_eq!(
            mesh.normals.unwrap(),
            vec![[0.0, 0.0, 2.0], [0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn explicit_normal_count_checked() {
        let desc = quad().with_explicit_normals(vec![DVec3::Z; 3]);
        assert_eq!(
            MeshBuilder::build(&desc),
            Err(GeometryError::NormalCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut desc = quad();
        desc.faces.push(vec![0, 1, 9]);
        assert_eq!(
            MeshBuilder::build(&desc),
            Err(GeometryError::IndexOutOfRange {
                face: 1,
                index: 9,
                vertex_count: 4
            })
        );
    }

    #[test]
    fn degenerate_faces_rejected() {
        let mut desc = quad();
        desc.faces = vec![vec![0, 1]];
        assert_eq!(
            MeshBuilder::build(&desc),
            Err(GeometryError::TooFewIndices { face: 0, count: 2 })
        );
        desc.faces = vec![vec![0, 1, 2, 3, 0]];
        assert_eq!(
            MeshBuilder::build(&desc),
            Err(GeometryError::TooManyIndices { face: 0, count: 5 })
        );
    }

    #[test]
    fn non_finite_vertex_rejected() {
        let mut desc = quad();
        desc.vertices[2].y = f64::NAN;
        assert_eq!(
            MeshBuilder::build(&desc),
            Err(GeometryError::NonFiniteVertex { vertex: 2 })
        );
    }

    #[test]
    fn descriptor_loads_from_json() {
        let json = r#"{
            "name": "tri",
            "vertices": [[0,0,0],[1,0,0],[0,1,0]],
            "faces": [[0,1,2]]
        }"#;
        let desc: MeshDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(desc.normal_mode, NormalMode::FaceAveraged);
        let mesh = MeshBuilder::build(&desc).unwrap();
        assert_eq!(mesh.normals.unwrap(), vec![[0.0, 0.0, 1.0]; 3]);
    }
}
