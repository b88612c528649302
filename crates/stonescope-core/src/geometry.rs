//! Geometry targets and the mesh applicator.
//!
//! Loaded models arrive as an arbitrary tree of nodes from a third-party
//! loader, so the scene graph is a tagged union walked by a generic
//! recursive visitor - never a fixed-depth schema. The applicator binds one
//! shared material instance to every drawable mesh in the tree, synthesizing
//! UVs by box projection for any mesh that lacks them: an unbound or
//! untextured sub-mesh is the most common visual bug class in this domain
//! and is actively prevented here.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::material::{GeometryKind, MaterialDescriptor};

/// One drawable mesh: indexed triangles with optional per-vertex data.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Mesh label, for diagnostics.
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals; empty when the asset did not author them.
    pub normals: Vec<Vec3>,
    /// Per-vertex UVs; `None` when the asset did not author them.
    pub uvs: Option<Vec<Vec2>>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
    /// Whether this mesh casts shadows. Set during material binding.
    pub cast_shadow: bool,
    /// Whether this mesh receives shadows. Set during material binding.
    pub receive_shadow: bool,
    /// Bound material. A non-owning share of the session's single instance.
    pub material: Option<Arc<MaterialDescriptor>>,
}

impl MeshData {
    /// Axis-aligned bounding box of the positions, or `None` for an empty
    /// mesh.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for &p in &self.positions {
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }

    /// Computes area-weighted vertex normals from the triangle list.
    ///
    /// Used for assets that ship positions only; box UV projection needs a
    /// dominant axis per vertex. Assets are untrusted: triangles whose
    /// indices fall outside the vertex range are skipped, not trusted to
    /// panic on.
    pub fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(&v0), Some(&v1), Some(&v2)) = (
                self.positions.get(i0),
                self.positions.get(i1),
                self.positions.get(i2),
            ) else {
                log::debug!("mesh '{}' has an out-of-range triangle, skipping", self.name);
                continue;
            };
            // Cross product length is twice the triangle area, giving the
            // area weighting for free.
            let weighted = (v1 - v0).cross(v2 - v0);
            self.normals[i0] += weighted;
            self.normals[i1] += weighted;
            self.normals[i2] += weighted;
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
            if *n == Vec3::ZERO {
                *n = Vec3::Y;
            }
        }
    }

    /// Synthesizes a UV channel by box projection.
    ///
    /// Each vertex is projected along the dominant axis of its normal onto
    /// the two remaining axes, normalized by the mesh bounding box so UVs
    /// span roughly `[0, 1]`.
    pub fn generate_box_uvs(&mut self) {
        if self.positions.is_empty() {
            self.uvs = Some(Vec::new());
            return;
        }
        if self.normals.len() != self.positions.len() {
            self.compute_vertex_normals();
        }

        let Some((min, max)) = self.bounding_box() else {
            return;
        };
        let extent = (max - min).max(Vec3::splat(f32::EPSILON));

        let uvs = self
            .positions
            .iter()
            .zip(&self.normals)
            .map(|(&p, &n)| {
                let rel = (p - min) / extent;
                let a = n.abs();
                if a.x >= a.y && a.x >= a.z {
                    Vec2::new(rel.z, rel.y)
                } else if a.y >= a.z {
                    Vec2::new(rel.x, rel.z)
                } else {
                    Vec2::new(rel.x, rel.y)
                }
            })
            .collect();

        self.uvs = Some(uvs);
    }
}

/// A node in a loaded (or generated) object graph.
///
/// Third-party assets are untrusted: arbitrary depth, arbitrary branching,
/// and node types the viewer does not care about.
#[derive(Debug, Clone)]
pub enum SceneNode {
    /// An interior node with children.
    Group(Vec<SceneNode>),
    /// A drawable mesh.
    Mesh(MeshData),
    /// Anything else the loader produced (lights, cameras, empties).
    Other,
}

/// The geometry a session renders: a node graph plus the class it was
/// requested as.
#[derive(Debug, Clone)]
pub struct GeometryTarget {
    /// The geometry class actually present (`ProceduralFallback` when the
    /// asset load was recovered).
    pub kind: GeometryKind,
    /// Root of the object graph.
    pub root: SceneNode,
}

impl GeometryTarget {
    /// A generated rectangular slab, used when a model asset fails to load.
    ///
    /// Comes with authored per-face UVs; the applicator never needs to
    /// project this one.
    #[must_use]
    pub fn procedural_slab() -> Self {
        // Half extents of the display slab: wide, thin, deep.
        let (hx, hy, hz) = (1.0, 0.06, 0.5);

        let faces: [([Vec3; 4], Vec3); 6] = [
            // +Y (top)
            (
                [
                    Vec3::new(-hx, hy, -hz),
                    Vec3::new(-hx, hy, hz),
                    Vec3::new(hx, hy, hz),
                    Vec3::new(hx, hy, -hz),
                ],
                Vec3::Y,
            ),
            // -Y (bottom)
            (
                [
                    Vec3::new(-hx, -hy, hz),
                    Vec3::new(-hx, -hy, -hz),
                    Vec3::new(hx, -hy, -hz),
                    Vec3::new(hx, -hy, hz),
                ],
                Vec3::NEG_Y,
            ),
            // +X
            (
                [
                    Vec3::new(hx, -hy, -hz),
                    Vec3::new(hx, hy, -hz),
                    Vec3::new(hx, hy, hz),
                    Vec3::new(hx, -hy, hz),
                ],
                Vec3::X,
            ),
            // -X
            (
                [
                    Vec3::new(-hx, -hy, hz),
                    Vec3::new(-hx, hy, hz),
                    Vec3::new(-hx, hy, -hz),
                    Vec3::new(-hx, -hy, -hz),
                ],
                Vec3::NEG_X,
            ),
            // +Z
            (
                [
                    Vec3::new(-hx, -hy, hz),
                    Vec3::new(hx, -hy, hz),
                    Vec3::new(hx, hy, hz),
                    Vec3::new(-hx, hy, hz),
                ],
                Vec3::Z,
            ),
            // -Z
            (
                [
                    Vec3::new(hx, -hy, -hz),
                    Vec3::new(-hx, -hy, -hz),
                    Vec3::new(-hx, hy, -hz),
                    Vec3::new(hx, hy, -hz),
                ],
                Vec3::NEG_Z,
            ),
        ];

        let face_uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        let mut mesh = MeshData {
            name: "procedural-slab".to_string(),
            ..MeshData::default()
        };
        let mut uvs = Vec::new();

        for (corners, normal) in &faces {
            let base = mesh.positions.len() as u32;
            mesh.positions.extend_from_slice(corners);
            mesh.normals.extend(std::iter::repeat(*normal).take(4));
            uvs.extend_from_slice(&face_uvs);
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh.uvs = Some(uvs);

        Self {
            kind: GeometryKind::ProceduralFallback,
            root: SceneNode::Mesh(mesh),
        }
    }

    /// Number of drawable meshes in the graph.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        fn count(node: &SceneNode) -> usize {
            match node {
                SceneNode::Group(children) => children.iter().map(count).sum(),
                SceneNode::Mesh(_) => 1,
                SceneNode::Other => 0,
            }
        }
        count(&self.root)
    }

    /// Visits every drawable mesh in the graph, depth-first.
    pub fn for_each_mesh<F: FnMut(&MeshData)>(&self, mut f: F) {
        fn walk<F: FnMut(&MeshData)>(node: &SceneNode, f: &mut F) {
            match node {
                SceneNode::Group(children) => {
                    for child in children {
                        walk(child, f);
                    }
                }
                SceneNode::Mesh(mesh) => f(mesh),
                SceneNode::Other => {}
            }
        }
        walk(&self.root, &mut f);
    }

    /// Axis-aligned bounding box across all meshes, for camera framing.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut result: Option<(Vec3, Vec3)> = None;
        self.for_each_mesh(|mesh| {
            if let Some((min, max)) = mesh.bounding_box() {
                result = Some(match result {
                    Some((rmin, rmax)) => (rmin.min(min), rmax.max(max)),
                    None => (min, max),
                });
            }
        });
        result
    }
}

/// Binds `material` to every drawable mesh in `target`.
///
/// Walks the full graph; any mesh without a UV channel gets one synthesized
/// by box projection before binding - binding never proceeds on a mesh
/// lacking UVs. The material reference is shared, not copied: one physical
/// slab of one stone type is one material instance. Shadow casting and
/// receiving are enabled on every bound mesh.
///
/// Returns the number of meshes bound. Zero is not an error by itself; the
/// caller decides whether an empty graph is suspicious.
pub fn apply(material: &Arc<MaterialDescriptor>, target: &mut GeometryTarget) -> usize {
    fn walk(node: &mut SceneNode, material: &Arc<MaterialDescriptor>, bound: &mut usize) {
        match node {
            SceneNode::Group(children) => {
                for child in children {
                    walk(child, material, bound);
                }
            }
            SceneNode::Mesh(mesh) => {
                let has_uvs = mesh
                    .uvs
                    .as_ref()
                    .is_some_and(|uvs| uvs.len() == mesh.positions.len());
                if !has_uvs {
                    log::debug!("mesh '{}' has no UV channel, box-projecting", mesh.name);
                    mesh.generate_box_uvs();
                }
                mesh.material = Some(Arc::clone(material));
                mesh.cast_shadow = true;
                mesh.receive_shadow = true;
                *bound += 1;
            }
            SceneNode::Other => {}
        }
    }

    let mut bound = 0;
    walk(&mut target.root, material, &mut bound);
    bound
}
