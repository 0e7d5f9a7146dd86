//! Fast, optionally multithreaded **signed distance functions** over triangle meshes.
//!
//! Given a vertex buffer and triangular faces, [`Sdf`] answers, for arbitrary
//! query points, the distance to the surface (positive inside, negative
//! outside), the nearest face or vertex, and whether the point is contained.
//! It also reports face areas/normals and the bounding box, and samples
//! uniformly distributed points on the surface.
//!
//! Nearest-surface queries run over a [BVH](bvh) of face bounding boxes. The
//! sign comes either from the nearest face's normal (fast) or from the
//! angle-weighted pseudo-normal of the face, edge or vertex the closest point
//! lies on (robust). Batches are split across a bounded worker pool and
//! returned in input order.
//!
//! ```
//! use mesdf::Sdf;
//! use nalgebra::Point3;
//!
//! let verts = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
//! let sdf = Sdf::new(&verts, &faces, true).unwrap();
//! assert!(sdf.contains(&Point3::new(0.1, 0.1, 0.1)));
//! assert!(sdf.evaluate(&Point3::new(2.0, 2.0, 2.0)) < 0.0);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **parallel**: use rayon for batch queries
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod batch;
pub mod bvh;
pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod sampler;
pub mod sdf;
pub mod store;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::{SdfError, SdfResult};
pub use float_types::Real;
pub use sdf::{QueryOptions, Sdf, SignMode, SurfaceQuery};
pub use store::Face;
