//! Triangular face, the element stored in CSG trees.

use nalgebra::{Point3, Vector3};

use crate::{
    Classification, CsgError, CsgResult, Plane3D, PlaneSide, Split, Splittable, Tolerance,
    Vertex,
};

/// A triangle in 3D space, defined by three vertices.
///
/// The winding order determines the normal direction via the right-hand rule:
/// normal = (b - a) × (c - a). The plane is computed once at construction;
/// pieces produced by splitting share the plane of the face they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: [Vertex; 3],
    plane: Plane3D,
}

impl Face {
    /// Creates a face from three vertices.
    ///
    /// Fails with [`CsgError::DegeneratePlane`] if the positions are collinear.
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> CsgResult<Self> {
        let plane = Plane3D::from_three_points(a.position, b.position, c.position)?;
        Ok(Self {
            vertices: [a, b, c],
            plane,
        })
    }

    /// Creates a face from a list of exactly three vertices.
    pub fn from_vertices(vertices: Vec<Vertex>) -> CsgResult<Self> {
        let vertex_count = vertices.len();
        let [a, b, c]: [Vertex; 3] = vertices
            .try_into()
            .map_err(|_| CsgError::MalformedFace { vertex_count })?;
        Self::new(a, b, c)
    }

    /// Creates a face from bare positions; every vertex gets the face normal.
    pub fn from_positions(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> CsgResult<Self> {
        let plane = Plane3D::from_three_points(a, b, c)?;
        let normal = plane.normal();
        Ok(Self {
            vertices: [
                Vertex::new(a, normal),
                Vertex::new(b, normal),
                Vertex::new(c, normal),
            ],
            plane,
        })
    }

    fn with_plane(vertices: [Vertex; 3], plane: Plane3D) -> Self {
        Self { vertices, plane }
    }

    /// Returns the three vertices of the face.
    #[inline]
    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    /// Returns the three vertex positions.
    pub fn positions(&self) -> [Point3<f32>; 3] {
        self.vertices.each_ref().map(|v| v.position)
    }

    /// Returns the plane that this face lies on.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the unit normal of the face.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.plane.normal()
    }

    /// Computes the centroid (center of mass) of the face.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = self.positions();
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Computes the area of the face.
    pub fn area(&self) -> f32 {
        let [a, b, c] = self.positions();
        (b - a).cross(&(c - a)).norm() * 0.5
    }

    /// Classifies this face relative to a plane.
    ///
    /// Returns:
    /// - `Front` if no vertex is behind the plane and at least one is in front
    /// - `Back` if no vertex is in front of the plane and at least one is behind
    /// - `Coplanar` if all vertices lie on the plane
    /// - `Spanning` if vertices are on both sides
    pub fn classify(&self, plane: &Plane3D, tolerance: Tolerance) -> Classification {
        classify_sides(&self.sides(plane, tolerance))
    }

    /// Reverses the winding order, flipping the normal and the plane.
    pub fn invert(&mut self) {
        self.vertices.swap(0, 2);
        for vertex in &mut self.vertices {
            vertex.flip();
        }
        self.plane.flip();
    }

    fn sides(&self, plane: &Plane3D, tolerance: Tolerance) -> [PlaneSide; 3] {
        self.vertices
            .each_ref()
            .map(|v| plane.classify_point(v.position, tolerance))
    }

    /// Cuts a spanning face into triangles on each side of `plane`.
    ///
    /// Walks the edges and builds a front and a back vertex list. Vertices on
    /// the plane go to both lists, and edges running from front to back add
    /// their intersection point to both. Each list is a convex polygon of 3 or
    /// 4 vertices that is fan-triangulated.
    fn split_spanning(&self, plane: &Plane3D, sides: &[PlaneSide; 3]) -> Split<Face> {
        let mut front_verts = Vec::with_capacity(4);
        let mut back_verts = Vec::with_capacity(4);

        for i in 0..3 {
            let j = (i + 1) % 3;
            let current = &self.vertices[i];
            let next = &self.vertices[j];

            if sides[i] != PlaneSide::Back {
                front_verts.push(current.clone());
            }
            if sides[i] != PlaneSide::Front {
                back_verts.push(current.clone());
            }

            let crosses = matches!(
                (sides[i], sides[j]),
                (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
            );
            if crosses {
                if let Some(t) = plane.segment_parameter(current.position, next.position) {
                    let intersection = current.lerp(next, t);
                    front_verts.push(intersection.clone());
                    back_verts.push(intersection);
                }
            }
        }

        Split::Spanning {
            front: self.fan(front_verts),
            back: self.fan(back_verts),
        }
    }

    /// Fan-triangulates a convex polygon lying on this face's plane.
    fn fan(&self, polygon: Vec<Vertex>) -> Vec<Face> {
        if polygon.len() < 3 {
            return Vec::new();
        }

        (1..polygon.len() - 1)
            .map(|i| {
                Face::with_plane(
                    [polygon[0].clone(), polygon[i].clone(), polygon[i + 1].clone()],
                    self.plane.clone(),
                )
            })
            .collect()
    }
}

fn classify_sides(sides: &[PlaneSide; 3]) -> Classification {
    let mut front = 0;
    let mut back = 0;

    for side in sides {
        match side {
            PlaneSide::Front => front += 1,
            PlaneSide::Back => back += 1,
            PlaneSide::OnPlane => {}
        }
    }

    match (front, back) {
        (0, 0) => Classification::Coplanar,
        (_, 0) => Classification::Front,
        (0, _) => Classification::Back,
        _ => Classification::Spanning,
    }
}

impl Splittable for Face {
    fn plane(&self) -> &Plane3D {
        &self.plane
    }

    fn invert(&mut self) {
        Face::invert(self);
    }

    fn split(&self, plane: &Plane3D, tolerance: Tolerance) -> Split<Self> {
        let sides = self.sides(plane, tolerance);

        match classify_sides(&sides) {
            Classification::Coplanar => {
                if self.plane.normal().dot(&plane.normal()) > 0.0 {
                    Split::CoplanarFront(self.clone())
                } else {
                    Split::CoplanarBack(self.clone())
                }
            }
            Classification::Front => Split::Front(self.clone()),
            Classification::Back => Split::Back(self.clone()),
            Classification::Spanning => self.split_spanning(plane, &sides),
        }
    }
}
