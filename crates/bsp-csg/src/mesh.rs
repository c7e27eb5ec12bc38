//! Triangle mesh bodies and their boolean operators.

use nalgebra::Point3;
use tracing::debug;

use crate::{
    BooleanBackend, BooleanOp, BspBackend, BspNode, CsgError, CsgOptions, CsgResult, Face,
    PointLocation, Vertex,
};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Returns `true` if the point lies inside the box or on its boundary.
    pub fn contains(&self, point: Point3<f32>) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

/// A solid described by a soup of outward-facing triangles.
///
/// The boolean operators build a BSP tree per operand, combine the trees
/// and replace the faces of `self` with the faces of the result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    faces: Vec<Face>,
    options: CsgOptions,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from faces.
    pub fn from_faces(faces: Vec<Face>) -> Self {
        Self {
            faces,
            options: CsgOptions::default(),
        }
    }

    /// Creates a mesh from a flat vertex list, three vertices per face.
    pub fn from_vertex_list(vertices: Vec<Vertex>) -> CsgResult<Self> {
        if vertices.len() % 3 != 0 {
            return Err(CsgError::NonTriangulated {
                vertex_count: vertices.len(),
            });
        }

        let mut faces = Vec::with_capacity(vertices.len() / 3);
        let mut iter = vertices.into_iter();
        while let (Some(a), Some(b), Some(c)) = (iter.next(), iter.next(), iter.next()) {
            faces.push(Face::new(a, b, c)?);
        }
        Ok(Self::from_faces(faces))
    }

    /// Creates an axis-aligned box spanning `min` to `max`, 12 triangles with
    /// counter-clockwise winding viewed from outside.
    ///
    /// Fails with [`CsgError::DegeneratePlane`] if the box is flat along any axis.
    pub fn cuboid(min: Point3<f32>, max: Point3<f32>) -> CsgResult<Self> {
        let corners = [
            Point3::new(min.x, min.y, min.z), // 0: left-bottom-back
            Point3::new(max.x, min.y, min.z), // 1: right-bottom-back
            Point3::new(max.x, max.y, min.z), // 2: right-top-back
            Point3::new(min.x, max.y, min.z), // 3: left-top-back
            Point3::new(min.x, min.y, max.z), // 4: left-bottom-front
            Point3::new(max.x, min.y, max.z), // 5: right-bottom-front
            Point3::new(max.x, max.y, max.z), // 6: right-top-front
            Point3::new(min.x, max.y, max.z), // 7: left-top-front
        ];

        let quads: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // front (+Z)
            [1, 0, 3, 2], // back (-Z)
            [0, 4, 7, 3], // left (-X)
            [5, 1, 2, 6], // right (+X)
            [7, 6, 2, 3], // top (+Y)
            [0, 1, 5, 4], // bottom (-Y)
        ];

        let mut faces = Vec::with_capacity(12);
        for [a, b, c, d] in quads {
            faces.push(Face::from_positions(corners[a], corners[b], corners[c])?);
            faces.push(Face::from_positions(corners[a], corners[c], corners[d])?);
        }
        Ok(Self::from_faces(faces))
    }

    /// Returns the mesh with different CSG options.
    pub fn with_options(mut self, options: CsgOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options used when building trees from this mesh.
    #[inline]
    pub fn options(&self) -> CsgOptions {
        self.options
    }

    /// Returns the faces of the mesh.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Consumes the mesh and returns its faces.
    pub fn into_faces(self) -> Vec<Face> {
        self.faces
    }

    /// Returns the number of faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Builds a BSP tree from the faces of the mesh.
    pub fn to_tree(&self) -> BspNode<Face> {
        BspNode::from_elements(self.faces.clone(), self.options)
    }

    /// Flattens a BSP tree back into a mesh.
    pub fn from_tree(tree: BspNode<Face>) -> Self {
        let options = tree.options();
        Self {
            faces: tree.into_elements(),
            options,
        }
    }

    /// Replaces this mesh with the union of both solids.
    pub fn combine(&mut self, other: &Mesh) {
        self.apply(BooleanOp::Combine, other, &BspBackend);
    }

    /// Replaces this mesh with the intersection of both solids.
    pub fn intersect(&mut self, other: &Mesh) {
        self.apply(BooleanOp::Intersect, other, &BspBackend);
    }

    /// Removes the solid `other` from this mesh.
    pub fn subtract(&mut self, other: &Mesh) {
        self.apply(BooleanOp::Subtract, other, &BspBackend);
    }

    /// Returns the union of both solids, leaving `self` untouched.
    pub fn union(&self, other: &Mesh) -> Mesh {
        self.applied(BooleanOp::Combine, other)
    }

    /// Returns the intersection of both solids, leaving `self` untouched.
    pub fn intersection(&self, other: &Mesh) -> Mesh {
        self.applied(BooleanOp::Intersect, other)
    }

    /// Returns this solid minus `other`, leaving `self` untouched.
    pub fn difference(&self, other: &Mesh) -> Mesh {
        self.applied(BooleanOp::Subtract, other)
    }

    fn applied(&self, op: BooleanOp, other: &Mesh) -> Mesh {
        let mut result = self.clone();
        result.apply(op, other, &BspBackend);
        result
    }

    /// Runs a boolean operator through `backend` and stores the result in
    /// `self`. `other` is never modified, and `self` is only replaced once
    /// the result is complete.
    pub fn apply<B: BooleanBackend + ?Sized>(&mut self, op: BooleanOp, other: &Mesh, backend: &B) {
        let faces = backend.apply(op, &self.faces, &other.faces, self.options);
        debug!(
            ?op,
            lhs = self.faces.len(),
            rhs = other.faces.len(),
            result = faces.len(),
            "boolean operation"
        );
        self.faces = faces;
    }

    /// Turns the solid inside out by inverting every face.
    pub fn invert(&mut self) {
        for face in &mut self.faces {
            face.invert();
        }
    }

    /// Classifies a point against the solid.
    pub fn point_position(&self, point: Point3<f32>) -> PointLocation {
        self.to_tree().point_position(point)
    }

    /// Returns the bounding box of all vertices, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut positions = self.faces.iter().flat_map(Face::positions);
        let first = positions.next()?;
        Some(positions.fold(Aabb { min: first, max: first }, |bounds, p| Aabb {
            min: bounds.min.inf(&p),
            max: bounds.max.sup(&p),
        }))
    }

    /// Computes the enclosed volume with the divergence theorem.
    ///
    /// Only meaningful for closed meshes with outward-facing triangles;
    /// an inverted solid has negative volume.
    pub fn volume(&self) -> f32 {
        self.faces
            .iter()
            .map(|face| {
                let [a, b, c] = face.positions();
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum::<f32>()
            / 6.0
    }

    /// Computes the total surface area.
    pub fn surface_area(&self) -> f32 {
        self.faces.iter().map(Face::area).sum()
    }
}

impl From<Vec<Face>> for Mesh {
    fn from(faces: Vec<Face>) -> Self {
        Self::from_faces(faces)
    }
}
