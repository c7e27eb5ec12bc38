//! Constructive Solid Geometry on triangle meshes using BSP trees.
//!
//! A [`Mesh`] is a soup of outward-facing triangles enclosing a solid.
//! [`Mesh::combine`], [`Mesh::intersect`] and [`Mesh::subtract`] compute
//! boolean combinations of two solids by building a [`BspNode`] tree per
//! operand and clipping the trees against each other.
//!
//! ```
//! use bsp_csg::{Mesh, PointLocation};
//! use nalgebra::Point3;
//!
//! # fn main() -> Result<(), bsp_csg::CsgError> {
//! let mut a = Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))?;
//! let b = Mesh::cuboid(Point3::new(0.5, 0.0, 0.0), Point3::new(1.5, 1.0, 1.0))?;
//!
//! a.subtract(&b);
//! assert_eq!(a.point_position(Point3::new(0.25, 0.5, 0.5)), PointLocation::Inside);
//! assert_eq!(a.point_position(Point3::new(0.75, 0.5, 0.5)), PointLocation::Outside);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod bsp;
mod config;
mod error;
mod face;
mod mesh;
mod plane;
mod split;
mod vertex;

pub use backend::{BooleanBackend, BooleanOp, BspBackend};
pub use bsp::{BspNode, PointLocation};
pub use config::{CsgOptions, MIN_TOLERANCE, PLANE_EPSILON, SplitHeuristic, Tolerance};
pub use error::{CsgError, CsgResult};
pub use face::Face;
pub use mesh::{Aabb, Mesh};
pub use plane::{Classification, Plane3D, PlaneSide};
pub use split::{Split, Splittable};
pub use vertex::Vertex;
