//! Mesh vertex with the attributes carried through face splits.

use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// A mesh vertex.
///
/// Only `position` takes part in the CSG algorithm. Every other attribute is
/// payload that is interpolated when an edge is cut by a splitting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
    /// RGBA
    pub primary_color: Vector4<f32>,
    /// RGBA
    pub secondary_color: Vector4<f32>,
}

impl Vertex {
    /// Creates a vertex with zero UVs and opaque white colors.
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            normal,
            uv: Vector2::zeros(),
            primary_color: Vector4::repeat(1.0),
            secondary_color: Vector4::repeat(1.0),
        }
    }

    /// Sets the texture coordinates.
    pub fn with_uv(mut self, uv: Vector2<f32>) -> Self {
        self.uv = uv;
        self
    }

    /// Sets both vertex colors.
    pub fn with_colors(mut self, primary: Vector4<f32>, secondary: Vector4<f32>) -> Self {
        self.primary_color = primary;
        self.secondary_color = secondary;
        self
    }

    /// Negates the vertex normal.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Linearly interpolates every attribute between `self` (`t = 0`) and
    /// `other` (`t = 1`).
    ///
    /// The endpoints are returned exactly, without rounding error.
    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        if t <= 0.0 {
            return self.clone();
        }
        if t >= 1.0 {
            return other.clone();
        }

        Vertex {
            position: self.position + (other.position - self.position) * t,
            normal: self.normal.lerp(&other.normal, t),
            uv: self.uv.lerp(&other.uv, t),
            primary_color: self.primary_color.lerp(&other.primary_color, t),
            secondary_color: self.secondary_color.lerp(&other.secondary_color, t),
        }
    }
}
