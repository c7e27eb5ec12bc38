//! Plane representation and point classification.

use nalgebra::{Point3, Vector3};

use crate::{CsgError, CsgResult, Tolerance};

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within tolerance)
    OnPlane,
}

/// Classification of a face relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All vertices are in front of the plane
    Front,
    /// All vertices are behind the plane
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

/// A plane in 3D space, represented as `normal · point = offset`.
///
/// The normal always has unit length.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal (and offset) are rescaled so the normal has unit length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> CsgResult<Self> {
        let norm = normal.norm();
        if !(norm > f32::EPSILON) {
            return Err(CsgError::DegeneratePlane);
        }
        Ok(Self {
            normal: normal / norm,
            offset: offset / norm,
        })
    }

    /// Creates a plane from a point on the plane and a normal vector.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> CsgResult<Self> {
        let norm = normal.norm();
        if !(norm > f32::EPSILON) {
            return Err(CsgError::DegeneratePlane);
        }
        let unit_normal = normal / norm;
        Ok(Self {
            normal: unit_normal,
            offset: unit_normal.dot(&point.coords),
        })
    }

    /// Creates a plane from three points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Collinear points yield [`CsgError::DegeneratePlane`].
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> CsgResult<Self> {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)))
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify_point(&self, point: Point3<f32>, tolerance: Tolerance) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > tolerance.get() {
            PlaneSide::Front
        } else if dist < -tolerance.get() {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Reverses the plane in place: front and back swap meaning.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.offset = -self.offset;
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Returns the parameter `t` in `[0, 1]` at which the segment `start -> end`
    /// meets the plane.
    ///
    /// Returns `None` when the segment is (nearly) parallel to the plane, so
    /// callers never interpolate with a NaN or infinite parameter.
    pub fn segment_parameter(&self, start: Point3<f32>, end: Point3<f32>) -> Option<f32> {
        let denom = self.normal.dot(&(end - start));
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(&start.coords)) / denom;
        t.is_finite().then(|| t.clamp(0.0, 1.0))
    }
}
