//! Splitting of geometry by a plane.

use nalgebra::Vector3;

use crate::{Plane3D, Tolerance};

/// Geometry that a BSP tree can store and cut.
pub trait Splittable: Sized {
    /// Returns the plane the element lies on.
    fn plane(&self) -> &Plane3D;

    /// Returns the unit normal of the element.
    fn normal(&self) -> Vector3<f32> {
        self.plane().normal()
    }

    /// Reverses the orientation of the element, flipping its normal.
    fn invert(&mut self);

    /// Splits the element by a plane.
    ///
    /// A coplanar element is returned whole and tagged with its facing
    /// relative to the plane normal. An element with vertices on both sides
    /// is cut into pieces lying entirely on one side each.
    fn split(&self, plane: &Plane3D, tolerance: Tolerance) -> Split<Self>;
}

/// Outcome of splitting one element by a plane.
///
/// The four destinations are the coplanar-front, coplanar-back, front and
/// back buckets; `Spanning` carries pieces for both of the last two.
#[derive(Debug, Clone, PartialEq)]
pub enum Split<T> {
    /// Coplanar, facing the same direction as the plane normal.
    CoplanarFront(T),
    /// Coplanar, facing opposite to the plane normal.
    CoplanarBack(T),
    /// Entirely in front of the plane.
    Front(T),
    /// Entirely behind the plane.
    Back(T),
    /// Cut into pieces on each side of the plane.
    Spanning { front: Vec<T>, back: Vec<T> },
}

impl<T> Split<T> {
    /// Pushes the pieces onto `front` and `back`.
    ///
    /// Coplanar elements go to the side they face, so a coplanar-front
    /// element ends up in `front` and a coplanar-back one in `back`.
    pub fn partition_into(self, front: &mut Vec<T>, back: &mut Vec<T>) {
        match self {
            Split::CoplanarFront(element) | Split::Front(element) => front.push(element),
            Split::CoplanarBack(element) | Split::Back(element) => back.push(element),
            Split::Spanning {
                front: front_parts,
                back: back_parts,
            } => {
                front.extend(front_parts);
                back.extend(back_parts);
            }
        }
    }

    /// Returns `true` if the element was coplanar with the plane.
    pub fn is_coplanar(&self) -> bool {
        matches!(self, Split::CoplanarFront(_) | Split::CoplanarBack(_))
    }

    /// Returns the number of pieces this split produced.
    pub fn piece_count(&self) -> usize {
        match self {
            Split::Spanning { front, back } => front.len() + back.len(),
            _ => 1,
        }
    }
}
