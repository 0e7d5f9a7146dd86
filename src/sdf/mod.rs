//! `Sdf` engine: a mesh store, its spatial indices, and the queries built on them

use crate::bvh::{Bvh, BvhConfig};
use crate::errors::SdfResult;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::sampler::SurfaceSampler;
use crate::store::{Buffer, Face, MeshStore};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::fmt;
use std::sync::OnceLock;

pub mod batch;
pub mod evaluate;
pub mod options;

pub use evaluate::SurfaceQuery;
pub use options::QueryOptions;

/// How the inside/outside sign is decided. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignMode {
    /// Sign from the nearest face's own normal. Cheap, but can flip near
    /// creases where the closest point is on an edge or vertex.
    Fast,
    /// Sign from the angle-weighted pseudo-normal of the feature (face, edge
    /// or vertex) holding the closest point.
    Robust,
}

impl SignMode {
    pub const fn from_robust(robust: bool) -> Self {
        if robust { SignMode::Robust } else { SignMode::Fast }
    }
}

/// Signed distance function of a triangle mesh, positive inside.
///
/// # Lifecycle
/// The face and vertex indices are built at construction. Editing vertices or
/// faces through [`Sdf::verts_mutable`], [`Sdf::faces_mutable`],
/// [`Sdf::set_verts`] or [`Sdf::set_faces`] leaves them **stale**: queries keep
/// using the old indices, silently, until [`Sdf::update`] is called. Replacing
/// a buffer with one of a different length empties the engine instead.
///
/// # Storage
/// [`Sdf::new`] and [`Sdf::from_vecs`] own their buffers. [`Sdf::from_view`]
/// borrows the caller's buffers mutably for the engine's whole lifetime, and
/// the mutable accessors then write straight into caller memory.
///
/// # Concurrency
/// Queries take `&self` and may run from many threads at once; every
/// mutation takes `&mut self`, so the borrow checker rules out edits while a
/// batch is in flight.
#[derive(Debug)]
pub struct Sdf<'a> {
    store: MeshStore<'a>,
    face_bvh: Bvh,
    vertex_bvh: Bvh,
    mode: SignMode,
    sampler: OnceLock<SurfaceSampler>,
}

impl Sdf<'static> {
    /// Build an SDF over copies of `verts` and `faces`.
    ///
    /// Fails if a face references a vertex index outside `verts`.
    pub fn new(verts: &[Point3<Real>], faces: &[Face], robust: bool) -> SdfResult<Self> {
        Self::from_vecs(verts.to_vec(), faces.to_vec(), robust)
    }

    /// Build an SDF that takes ownership of `verts` and `faces`.
    pub fn from_vecs(verts: Vec<Point3<Real>>, faces: Vec<Face>, robust: bool) -> SdfResult<Self> {
        Sdf::from_buffers(
            Buffer::Owned(verts),
            Buffer::Owned(faces),
            robust,
            BvhConfig::default(),
        )
    }
}

impl<'a> Sdf<'a> {
    /// Build an SDF over the caller's buffers without copying them.
    pub fn from_view(
        verts: &'a mut [Point3<Real>],
        faces: &'a mut [Face],
        robust: bool,
    ) -> SdfResult<Self> {
        Self::from_buffers(
            Buffer::View(verts),
            Buffer::View(faces),
            robust,
            BvhConfig::default(),
        )
    }

    /// Build an SDF from explicit storage and BVH settings.
    pub fn from_buffers(
        verts: Buffer<'a, Point3<Real>>,
        faces: Buffer<'a, Face>,
        robust: bool,
        bvh_config: BvhConfig,
    ) -> SdfResult<Self> {
        let store = MeshStore::new(verts, faces)?;
        let mut sdf = Sdf {
            store,
            face_bvh: Bvh::build(&[], bvh_config),
            vertex_bvh: Bvh::build(&[], bvh_config),
            mode: SignMode::from_robust(robust),
            sampler: OnceLock::new(),
        };
        sdf.rebuild_indices();
        tracing::debug!(
            verts = sdf.store.verts().len(),
            faces = sdf.store.faces().len(),
            robust,
            own_data = sdf.store.own_data(),
            "constructed SDF"
        );
        Ok(sdf)
    }

    fn rebuild_indices(&mut self) {
        let face_boxes: Vec<Aabb> = (0..self.store.faces().len())
            .map(|f| self.store.face_aabb(f))
            .collect();
        self.face_bvh.rebuild(&face_boxes);

        let vertex_boxes: Vec<Aabb> = self
            .store
            .verts()
            .iter()
            .map(|v| Aabb::new(*v, *v))
            .collect();
        self.vertex_bvh.rebuild(&vertex_boxes);
    }

    /// Rebuild face attributes, bounding box, pseudo-normals and both indices
    /// from the current buffers.
    ///
    /// Faces are revalidated first. On failure the indices are emptied, so
    /// queries behave as for a mesh without faces until a later `update`
    /// succeeds.
    pub fn update(&mut self) -> SdfResult<()> {
        self.sampler = OnceLock::new();
        if let Err(err) = self.store.rebuild() {
            tracing::warn!(%err, "update failed, SDF is empty until the next successful update");
            self.invalidate();
            return Err(err);
        }
        self.rebuild_indices();
        tracing::debug!(faces = self.store.faces().len(), "updated SDF");
        Ok(())
    }

    /// Forget all derived data and indices; queries see an empty mesh.
    fn invalidate(&mut self) {
        self.store.clear_derived();
        self.face_bvh.rebuild(&[]);
        self.vertex_bvh.rebuild(&[]);
        self.sampler = OnceLock::new();
    }

    pub const fn robust(&self) -> bool {
        matches!(self.mode, SignMode::Robust)
    }

    pub const fn sign_mode(&self) -> SignMode {
        self.mode
    }

    /// Whether the engine owns its buffers (as opposed to viewing caller memory)
    pub const fn own_data(&self) -> bool {
        self.store.own_data()
    }

    pub fn verts(&self) -> &[Point3<Real>] {
        self.store.verts()
    }

    pub fn faces(&self) -> &[Face] {
        self.store.faces()
    }

    /// Mutable vertices. Call [`Sdf::update`] after editing.
    pub fn verts_mutable(&mut self) -> &mut [Point3<Real>] {
        self.store.verts_mut()
    }

    /// Mutable faces. Call [`Sdf::update`] after editing.
    ///
    /// Indices are not checked until then; querying with an out-of-range
    /// index in between panics.
    pub fn faces_mutable(&mut self) -> &mut [Face] {
        self.store.faces_mut()
    }

    /// Replace the vertex buffer. Views only accept a buffer of the same length.
    /// Call [`Sdf::update`] afterwards.
    ///
    /// A replacement of a different length empties the engine until then,
    /// since the old indices would point past the new buffer.
    pub fn set_verts(&mut self, verts: Vec<Point3<Real>>) -> SdfResult<()> {
        let resized = verts.len() != self.store.verts().len();
        self.store.set_verts(verts)?;
        if resized {
            self.invalidate();
        }
        Ok(())
    }

    /// Replace the face buffer, with the same rules as [`Sdf::set_verts`].
    ///
    /// Indices are checked against the current vertex buffer first; on
    /// [`SdfError::FaceIndexOutOfRange`](crate::errors::SdfError::FaceIndexOutOfRange)
    /// nothing changes.
    pub fn set_faces(&mut self, faces: Vec<Face>) -> SdfResult<()> {
        let resized = faces.len() != self.store.faces().len();
        self.store.set_faces(faces)?;
        if resized {
            self.invalidate();
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.store.verts().len()
    }

    pub fn face_count(&self) -> usize {
        self.store.faces().len()
    }

    /// Total surface area, the sum of [`Sdf::face_areas`]
    pub const fn surface_area(&self) -> Real {
        self.store.surface_area()
    }

    pub fn face_areas(&self) -> &[Real] {
        self.store.face_areas()
    }

    /// Unit face normals; zero for zero-area faces
    pub fn face_normals(&self) -> &[Vector3<Real>] {
        self.store.face_normals()
    }

    /// Bounding box of all vertices
    pub const fn aabb(&self) -> &Aabb {
        self.store.aabb()
    }

    /// The face index
    pub const fn face_bvh(&self) -> &Bvh {
        &self.face_bvh
    }

    /// Sample `num_points` points uniformly on the surface using the thread RNG.
    ///
    /// Fails with [`SdfError::ZeroSurfaceArea`](crate::errors::SdfError::ZeroSurfaceArea)
    /// when the mesh has no area to sample from.
    pub fn sample_surface(&self, num_points: usize) -> SdfResult<Vec<Point3<Real>>> {
        self.sample_surface_with_rng(num_points, &mut rand::rng())
    }

    /// [`Sdf::sample_surface`] with a caller-supplied RNG, for reproducible draws.
    pub fn sample_surface_with_rng<R: Rng + ?Sized>(
        &self,
        num_points: usize,
        rng: &mut R,
    ) -> SdfResult<Vec<Point3<Real>>> {
        self.sampler
            .get_or_init(|| SurfaceSampler::new(self.store.face_areas()))
            .sample(&self.store, num_points, rng)
    }
}

impl fmt::Display for Sdf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SDF(verts.shape=({}, 3), faces.shape=({}, 3), robust={})",
            self.vertex_count(),
            self.face_count(),
            self.robust()
        )
    }
}
