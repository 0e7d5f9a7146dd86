//! Mesh store: vertex/face buffers plus the per-face attributes derived from them

use crate::errors::{SdfError, SdfResult};
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::geometry::area_and_normal;
use nalgebra::{Point3, Vector3};

pub mod buffer;
pub mod pseudo_normals;

pub use buffer::Buffer;
pub use pseudo_normals::PseudoNormals;

/// A triangle as three indices into the vertex buffer, counter-clockwise
/// when seen from outside.
pub type Face = [u32; 3];

/// Vertex and face buffers with cached face areas, face normals, the global
/// bounding box and the pseudo-normals used for robust signs.
///
/// Derived data reflects the buffers as of the last [`MeshStore::new`] or
/// [`MeshStore::rebuild`]; edits through [`MeshStore::verts_mut`] or
/// [`MeshStore::faces_mut`] are not picked up until `rebuild` runs.
#[derive(Debug)]
pub struct MeshStore<'a> {
    verts: Buffer<'a, Point3<Real>>,
    faces: Buffer<'a, Face>,
    face_areas: Vec<Real>,
    face_normals: Vec<Vector3<Real>>,
    surface_area: Real,
    aabb: Aabb,
    pseudo_normals: PseudoNormals,
}

/// Fail on the first face that references a vertex outside `0..vertex_count`.
pub fn validate_faces(faces: &[Face], vertex_count: usize) -> SdfResult<()> {
    for (face, tri) in faces.iter().enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(SdfError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

impl<'a> MeshStore<'a> {
    /// Build a store over the given buffers, rejecting out-of-range faces.
    pub fn new(verts: Buffer<'a, Point3<Real>>, faces: Buffer<'a, Face>) -> SdfResult<Self> {
        let mut store = MeshStore {
            verts,
            faces,
            face_areas: Vec::new(),
            face_normals: Vec::new(),
            surface_area: 0.0,
            aabb: Aabb::new_invalid(),
            pseudo_normals: PseudoNormals::default(),
        };
        store.rebuild()?;
        Ok(store)
    }

    /// Recompute every derived quantity from the current buffers.
    ///
    /// If a face is out of range the derived data is cleared, so the store
    /// reads as a mesh without faces until a later `rebuild` succeeds.
    pub fn rebuild(&mut self) -> SdfResult<()> {
        if let Err(err) = validate_faces(&self.faces, self.verts.len()) {
            self.clear_derived();
            return Err(err);
        }

        let (face_areas, face_normals): (Vec<Real>, Vec<Vector3<Real>>) = self
            .faces
            .iter()
            .map(|f| {
                area_and_normal(
                    &self.verts[f[0] as usize],
                    &self.verts[f[1] as usize],
                    &self.verts[f[2] as usize],
                )
            })
            .unzip();

        let degenerate = face_areas.iter().filter(|&&a| a == 0.0).count();
        if degenerate > 0 {
            tracing::warn!(degenerate, "mesh contains zero-area faces");
        }

        self.surface_area = face_areas.iter().sum();
        self.face_areas = face_areas;
        self.face_normals = face_normals;

        let mut aabb = Aabb::new_invalid();
        for v in self.verts.iter() {
            aabb.take_point(*v);
        }
        self.aabb = aabb;

        self.pseudo_normals =
            PseudoNormals::compute(&self.verts, &self.faces, &self.face_normals);
        Ok(())
    }

    /// Drop face areas, normals, bounding box and pseudo-normals.
    pub fn clear_derived(&mut self) {
        self.face_areas.clear();
        self.face_normals.clear();
        self.surface_area = 0.0;
        self.aabb = Aabb::new_invalid();
        self.pseudo_normals = PseudoNormals::default();
    }

    pub fn verts(&self) -> &[Point3<Real>] {
        &self.verts
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Mutable vertex access. For a view this edits the caller's memory.
    pub fn verts_mut(&mut self) -> &mut [Point3<Real>] {
        &mut self.verts
    }

    /// Mutable face access. For a view this edits the caller's memory.
    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    pub fn set_verts(&mut self, verts: Vec<Point3<Real>>) -> SdfResult<()> {
        self.verts.replace("verts", verts)
    }

    /// Replace the faces, rejecting out-of-range indices before anything changes.
    pub fn set_faces(&mut self, faces: Vec<Face>) -> SdfResult<()> {
        validate_faces(&faces, self.verts.len())?;
        self.faces.replace("faces", faces)
    }

    /// Whether both buffers are owned copies
    pub const fn own_data(&self) -> bool {
        self.verts.is_owned() && self.faces.is_owned()
    }

    /// Corner positions of face `face`
    #[inline]
    pub fn triangle(&self, face: usize) -> [Point3<Real>; 3] {
        self.faces[face].map(|i| self.verts[i as usize])
    }

    /// Bounding box of face `face`
    pub fn face_aabb(&self, face: usize) -> Aabb {
        let [a, b, c] = self.triangle(face);
        let mut aabb = Aabb::new(a, a);
        aabb.take_point(b);
        aabb.take_point(c);
        aabb
    }

    pub fn face_areas(&self) -> &[Real] {
        &self.face_areas
    }

    /// Unit face normals; zero for zero-area faces
    pub fn face_normals(&self) -> &[Vector3<Real>] {
        &self.face_normals
    }

    /// Sum of [`MeshStore::face_areas`]
    pub const fn surface_area(&self) -> Real {
        self.surface_area
    }

    /// Bounding box of all vertices (inverted when there are none)
    pub const fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub const fn pseudo_normals(&self) -> &PseudoNormals {
        &self.pseudo_normals
    }
}
