//! Binary Space Partitioning trees for constructive solid geometry.
//!
//! A tree built from the faces of a closed mesh describes the solid they
//! enclose: the front side of every face is open space, the back side is
//! interior. The clipping operations on [`BspNode`] combine such trees into
//! unions, intersections and differences.
//!
//! # Example
//!
//! ```
//! use bsp_csg::bsp::{BspNode, PointLocation};
//! use bsp_csg::{CsgOptions, Mesh};
//! use nalgebra::Point3;
//!
//! # fn main() -> Result<(), bsp_csg::CsgError> {
//! let a = Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))?;
//! let b = Mesh::cuboid(Point3::new(0.5, 0.0, 0.0), Point3::new(1.5, 1.0, 1.0))?;
//!
//! let mut tree = BspNode::from_elements(a.into_faces(), CsgOptions::default());
//! tree.union(BspNode::from_elements(b.into_faces(), CsgOptions::default()));
//!
//! assert_eq!(tree.point_position(Point3::new(1.25, 0.5, 0.5)), PointLocation::Inside);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`BspNode`]: a node storing a splitting plane, its coplanar elements and
//!   the front/back subtrees
//! - [`PlaneSelector`]: strategy trait for choosing splitting planes

mod node;
mod selector;

pub use node::{BspNode, PointLocation};
pub use selector::{BalancedSelector, FirstElement, PlaneSelector};
