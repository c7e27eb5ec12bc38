//! BSP tree node and the clipping operations used by CSG.

use std::mem;

use nalgebra::Point3;
use tracing::trace;

use crate::{CsgOptions, Plane3D, PlaneSide, Split, Splittable};

use super::selector::select_plane;

/// Where a point lies relative to the solid described by a BSP tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    /// In open space.
    Outside,
    /// In the solid interior.
    Inside,
    /// On the boundary surface.
    Border,
}

/// A node in a CSG BSP tree.
///
/// Each node partitions space using a splitting plane and stores the
/// elements coplanar with that plane, whichever way they face. Elements in
/// front of or behind the plane live in the respective child subtree.
///
/// A missing front child means open space and a missing back child means
/// solid interior. A node without a plane is an empty tree.
///
/// All tree walks use an explicit stack, so tree depth is bounded only by
/// memory.
#[derive(Debug, Clone)]
pub struct BspNode<T> {
    /// The splitting plane, `None` until the first elements are added.
    plane: Option<Plane3D>,

    /// Elements coplanar with the plane, both facings.
    elements: Vec<T>,

    /// Subtree containing elements in FRONT of the splitting plane.
    front: Option<Box<BspNode<T>>>,

    /// Subtree containing elements BEHIND the splitting plane.
    back: Option<Box<BspNode<T>>>,

    options: CsgOptions,
}

impl<T> BspNode<T> {
    /// Creates an empty node. Its plane is chosen when elements are first added.
    pub fn new(options: CsgOptions) -> Self {
        Self {
            plane: None,
            elements: Vec::new(),
            front: None,
            back: None,
            options,
        }
    }

    /// Returns the splitting plane, or `None` for an empty tree.
    #[inline]
    pub fn plane(&self) -> Option<&Plane3D> {
        self.plane.as_ref()
    }

    /// Returns the elements coplanar with this node's plane.
    #[inline]
    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    /// Returns a reference to the front child subtree.
    #[inline]
    pub fn front(&self) -> Option<&BspNode<T>> {
        self.front.as_deref()
    }

    /// Returns a reference to the back child subtree.
    #[inline]
    pub fn back(&self) -> Option<&BspNode<T>> {
        self.back.as_deref()
    }

    /// Returns the options shared by every node of the tree.
    #[inline]
    pub fn options(&self) -> CsgOptions {
        self.options
    }

    /// Returns `true` if no plane has been chosen yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plane.is_none()
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Returns the total number of elements in this subtree.
    pub fn element_count(&self) -> usize {
        self.nodes().map(|node| node.elements.len()).sum()
    }

    /// Returns the depth of this subtree (1 for a single node, 0 if empty).
    pub fn depth(&self) -> usize {
        if self.is_empty() {
            return 0;
        }

        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children().map(|child| (child, depth + 1)));
        }
        max_depth
    }

    fn children(&self) -> impl Iterator<Item = &BspNode<T>> {
        self.front().into_iter().chain(self.back())
    }

    /// Pre-order iterator over the nodes of this subtree: self, front, back.
    fn nodes(&self) -> impl Iterator<Item = &BspNode<T>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.back());
            stack.extend(node.front());
            Some(node)
        })
    }
}

impl<T: Splittable + Clone> BspNode<T> {
    /// Builds a tree from a collection of elements.
    pub fn from_elements(elements: Vec<T>, options: CsgOptions) -> Self {
        let count = elements.len();
        let mut node = Self::new(options);
        node.add_elements(elements);
        trace!(
            elements = count,
            stored = node.element_count(),
            depth = node.depth(),
            "built BSP tree"
        );
        node
    }

    /// Inserts elements into the tree.
    ///
    /// An empty node takes its plane from the elements (see
    /// [`SplitHeuristic`](crate::SplitHeuristic)). Elements coplanar with a
    /// node's plane are kept at that node regardless of facing; the rest are
    /// split and pushed down into the front and back subtrees, which are
    /// created as needed.
    pub fn add_elements(&mut self, elements: Vec<T>) {
        let mut stack = vec![(self, elements)];

        while let Some((node, elements)) = stack.pop() {
            let tolerance = node.options.tolerance;
            if node.plane.is_none() {
                node.plane = select_plane(node.options.heuristic, &elements, tolerance);
            }
            let Some(plane) = node.plane.clone() else {
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for element in elements {
                match element.split(&plane, tolerance) {
                    Split::CoplanarFront(element) | Split::CoplanarBack(element) => {
                        node.elements.push(element);
                    }
                    split => split.partition_into(&mut front, &mut back),
                }
            }

            let options = node.options;
            if !front.is_empty() {
                let child: &mut BspNode<T> = node
                    .front
                    .get_or_insert_with(|| Box::new(BspNode::new(options)));
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child: &mut BspNode<T> = node
                    .back
                    .get_or_insert_with(|| Box::new(BspNode::new(options)));
                stack.push((child, back));
            }
        }
    }

    /// Classifies a point against the solid described by this tree.
    ///
    /// A point on a node's plane is `Border` unless every existing child
    /// reports it `Outside`. A node without children has nothing to consult,
    /// so an on-plane point there is `Border`. An empty tree contains
    /// nothing, so every point is `Outside`.
    pub fn point_position(&self, point: Point3<f32>) -> PointLocation {
        let mut node = self;
        loop {
            let Some(plane) = &node.plane else {
                return PointLocation::Outside;
            };

            match plane.classify_point(point, node.options.tolerance) {
                PlaneSide::Front => match node.front() {
                    Some(front) => node = front,
                    None => return PointLocation::Outside,
                },
                PlaneSide::Back => match node.back() {
                    Some(back) => node = back,
                    None => return PointLocation::Inside,
                },
                PlaneSide::OnPlane => {
                    if node.is_leaf() {
                        return PointLocation::Border;
                    }
                    let outside = node
                        .children()
                        .all(|child| child.point_position(point) == PointLocation::Outside);
                    return if outside {
                        PointLocation::Outside
                    } else {
                        PointLocation::Border
                    };
                }
            }
        }
    }

    /// Turns the solid inside out.
    ///
    /// Flips every plane and element and swaps the front and back subtrees.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            for element in &mut node.elements {
                element.invert();
            }
            mem::swap(&mut node.front, &mut node.back);

            stack.extend(node.front.as_deref_mut());
            stack.extend(node.back.as_deref_mut());
        }
    }

    /// Removes the parts of `elements` that lie inside this tree's solid.
    ///
    /// Coplanar elements follow the side they face. Pieces reaching a missing
    /// back child are inside the solid and are discarded. An empty tree keeps
    /// everything. Survivors of the front subtree precede those of the back
    /// subtree.
    pub fn filter(&self, elements: Vec<T>) -> Vec<T> {
        let mut kept = Vec::with_capacity(elements.len());
        let mut stack = vec![(self, elements)];

        while let Some((node, elements)) = stack.pop() {
            let Some(plane) = &node.plane else {
                kept.extend(elements);
                continue;
            };

            let mut front = Vec::with_capacity(elements.len());
            let mut back = Vec::with_capacity(elements.len());
            for element in elements {
                element
                    .split(plane, node.options.tolerance)
                    .partition_into(&mut front, &mut back);
            }

            // Fronts are emitted before backs: push the back child first.
            if let Some(child) = node.back() {
                if !back.is_empty() {
                    stack.push((child, back));
                }
            }
            match node.front() {
                Some(child) if !front.is_empty() => stack.push((child, front)),
                Some(_) => {}
                None => kept.extend(front),
            }
        }

        kept
    }

    /// Clips the elements of every node in this tree against `other`,
    /// removing whatever lies inside `other`'s solid.
    pub fn cut_against(&mut self, other: &BspNode<T>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.elements = other.filter(mem::take(&mut node.elements));
            stack.extend(node.front.as_deref_mut());
            stack.extend(node.back.as_deref_mut());
        }
    }

    /// Collects the elements of the tree in pre-order: node, front, back.
    pub fn all_elements(&self) -> Vec<T> {
        let mut result = Vec::with_capacity(self.element_count());
        for node in self.nodes() {
            result.extend_from_slice(&node.elements);
        }
        result
    }

    /// Consumes the tree and returns its elements in pre-order.
    pub fn into_elements(mut self) -> Vec<T> {
        let mut result = mem::take(&mut self.elements);
        let mut stack: Vec<Box<BspNode<T>>> = Vec::new();
        stack.extend(self.back.take());
        stack.extend(self.front.take());

        while let Some(mut node) = stack.pop() {
            result.append(&mut node.elements);
            stack.extend(node.back.take());
            stack.extend(node.front.take());
        }
        result
    }

    /// Merges `other` into this tree, keeping the boundary of the union of
    /// both solids.
    ///
    /// Faces shared by both operands survive only once: after clipping each
    /// tree against the other, `other` is clipped once more while inverted,
    /// which drops its coplanar faces that this tree already keeps.
    pub fn union(&mut self, mut other: BspNode<T>) {
        self.cut_against(&other);
        other.cut_against(self);
        other.invert();
        other.cut_against(self);
        other.invert();
        self.add_elements(other.into_elements());
    }
}

impl<T> Default for BspNode<T> {
    fn default() -> Self {
        Self::new(CsgOptions::default())
    }
}

impl<T> Drop for BspNode<T> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<BspNode<T>>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());

        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Face, Mesh};
    use nalgebra::Point3;

    fn make_face(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Face {
        Face::from_positions(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
        .unwrap()
    }

    fn cube_tree(min: [f32; 3], max: [f32; 3]) -> BspNode<Face> {
        let faces = Mesh::cuboid(Point3::from(min), Point3::from(max))
            .unwrap()
            .into_faces();
        BspNode::from_elements(faces, CsgOptions::default())
    }

    fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
        Point3::new(x, y, z)
    }

    #[test]
    fn new_node_is_empty_leaf() {
        let node: BspNode<Face> = BspNode::default();

        assert!(node.is_empty());
        assert!(node.is_leaf());
        assert_eq!(node.element_count(), 0);
        assert_eq!(node.depth(), 0);
        assert_eq!(node.point_position(p(0.0, 0.0, 0.0)), PointLocation::Outside);
    }

    #[test]
    fn adding_nothing_keeps_node_empty() {
        let mut node: BspNode<Face> = BspNode::default();
        node.add_elements(vec![]);
        assert!(node.is_empty());
    }

    #[test]
    fn first_face_defines_plane() {
        let face = make_face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let node = BspNode::from_elements(vec![face.clone()], CsgOptions::default());

        assert_eq!(node.plane(), Some(face.plane()));
        assert_eq!(node.elements(), &[face]);
        assert_eq!(node.depth(), 1);
    }

    #[test]
    fn coplanar_faces_of_both_facings_stay_local() {
        let up = make_face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let mut down = make_face([2.0, 0.0, 0.0], [3.0, 0.0, 0.0], [2.0, 1.0, 0.0]);
        down.invert();

        let node = BspNode::from_elements(vec![up, down], CsgOptions::default());
        assert_eq!(node.elements().len(), 2);
        assert!(node.is_leaf());
    }

    #[test]
    fn spanning_face_is_split_into_children() {
        let splitter = make_face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let spanning = make_face([-0.5, -1.0, 0.5], [0.5, -1.0, 0.5], [0.5, 1.0, 0.5]);

        let node = BspNode::from_elements(vec![splitter, spanning], CsgOptions::default());

        assert!(node.front().is_some());
        assert!(node.back().is_some());
        assert!(node.element_count() >= 3);
        assert_eq!(node.elements().len(), 1);
    }

    #[test]
    fn cube_point_position() {
        let tree = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);

        assert_eq!(tree.point_position(p(0.5, 0.5, 0.5)), PointLocation::Inside);
        assert_eq!(tree.point_position(p(1.5, 0.5, 0.5)), PointLocation::Outside);
        assert_eq!(tree.point_position(p(0.5, -0.2, 0.5)), PointLocation::Outside);
        assert_eq!(tree.point_position(p(0.5, 0.5, 1.0)), PointLocation::Border);
        assert_eq!(tree.point_position(p(0.0, 0.3, 0.7)), PointLocation::Border);
        // On the extension of a face plane, but away from the cube.
        assert_eq!(tree.point_position(p(3.0, 0.5, 1.0)), PointLocation::Outside);
    }

    #[test]
    fn on_internal_plane_is_border() {
        // x = 1 is a splitting plane of the first cube, but after the union
        // the point sits well inside the merged solid.
        let mut tree = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        tree.union(cube_tree([0.5, 0.0, 0.0], [1.5, 1.0, 1.0]));

        assert_eq!(tree.point_position(p(1.0, 0.5, 0.5)), PointLocation::Border);
        assert_eq!(tree.point_position(p(1.25, 0.5, 0.5)), PointLocation::Inside);
    }

    #[test]
    fn on_plane_of_childless_node_is_border() {
        let face = make_face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let tree = BspNode::from_elements(vec![face], CsgOptions::default());

        assert_eq!(tree.point_position(p(0.2, 0.2, 0.0)), PointLocation::Border);
    }

    #[test]
    fn invert_swaps_inside_and_outside() {
        let mut tree = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let count = tree.element_count();

        tree.invert();
        assert_eq!(tree.element_count(), count);
        assert_eq!(tree.point_position(p(0.5, 0.5, 0.5)), PointLocation::Outside);
        assert_eq!(tree.point_position(p(2.0, 0.5, 0.5)), PointLocation::Inside);

        tree.invert();
        assert_eq!(tree.point_position(p(0.5, 0.5, 0.5)), PointLocation::Inside);
    }

    #[test]
    fn filter_on_empty_tree_keeps_everything() {
        let tree: BspNode<Face> = BspNode::default();
        let faces = Mesh::cuboid(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0))
            .unwrap()
            .into_faces();

        assert_eq!(tree.filter(faces.clone()), faces);
    }

    #[test]
    fn filter_removes_faces_inside_solid() {
        let tree = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);

        let inside = make_face([0.2, 0.2, 0.5], [0.8, 0.2, 0.5], [0.2, 0.8, 0.5]);
        let outside = make_face([2.0, 0.2, 0.5], [2.8, 0.2, 0.5], [2.2, 0.8, 0.5]);
        let kept = tree.filter(vec![inside, outside.clone()]);

        assert_eq!(kept, vec![outside]);
    }

    #[test]
    fn filter_clips_straddling_face() {
        let tree = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        // Half of this triangle's x-extent lies inside the cube.
        let face = make_face([0.5, 0.25, 0.5], [1.5, 0.25, 0.5], [1.5, 0.75, 0.5]);
        let kept = tree.filter(vec![face]);

        assert!(!kept.is_empty());
        for piece in &kept {
            for vertex in piece.vertices() {
                assert!(vertex.position.x >= 1.0 - 1e-5);
            }
        }
    }

    fn filter_recursive(node: &BspNode<Face>, faces: Vec<Face>) -> Vec<Face> {
        let Some(plane) = node.plane() else {
            return faces;
        };
        let mut front = Vec::new();
        let mut back = Vec::new();
        for face in faces {
            face.split(plane, node.options().tolerance)
                .partition_into(&mut front, &mut back);
        }

        let mut kept = match node.front() {
            Some(child) => filter_recursive(child, front),
            None => front,
        };
        if let Some(child) = node.back() {
            kept.extend(filter_recursive(child, back));
        }
        kept
    }

    #[test]
    fn filter_keeps_front_results_before_back_results() {
        // The second cube pokes through the root plane z = 1, so the root
        // gets both children.
        let mut tree = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        tree.union(cube_tree([0.5, 0.0, 0.5], [1.5, 1.0, 1.5]));
        assert!(tree.front().is_some() && tree.back().is_some());

        let faces = Mesh::cuboid(p(0.25, 0.25, 0.25), p(1.75, 1.25, 1.25))
            .unwrap()
            .into_faces();
        let kept = tree.filter(faces.clone());

        assert!(!kept.is_empty());
        assert_eq!(kept, filter_recursive(&tree, faces));
    }

    #[test]
    fn cut_against_removes_overlap() {
        let mut a = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = cube_tree([0.5, 0.0, 0.0], [1.5, 1.0, 1.0]);
        a.cut_against(&b);

        for face in a.all_elements() {
            let c = face.centroid();
            assert!(
                b.point_position(c) != PointLocation::Inside,
                "face centroid {c:?} is inside the clipping solid"
            );
        }
    }

    #[test]
    fn all_elements_is_pre_order() {
        let bottom = make_face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let above = make_face([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        let below = make_face([0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]);

        let tree = BspNode::from_elements(
            vec![bottom.clone(), below.clone(), above.clone()],
            CsgOptions::default(),
        );

        let expected = vec![bottom, above, below];
        assert_eq!(tree.all_elements(), expected);
        assert_eq!(tree.into_elements(), expected);
    }

    #[test]
    fn union_of_disjoint_cubes_keeps_all_faces() {
        let mut a = cube_tree([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = cube_tree([3.0, 0.0, 0.0], [4.0, 1.0, 1.0]);
        let total = a.element_count() + b.element_count();

        a.union(b);
        assert_eq!(a.element_count(), total);
        assert_eq!(a.point_position(p(0.5, 0.5, 0.5)), PointLocation::Inside);
        assert_eq!(a.point_position(p(3.5, 0.5, 0.5)), PointLocation::Inside);
        assert_eq!(a.point_position(p(2.0, 0.5, 0.5)), PointLocation::Outside);
    }

    #[test]
    fn deep_tree_builds_and_drops() {
        // Stacked parallel faces produce a chain as deep as the stack.
        let levels = 1000;
        let faces: Vec<Face> = (0..levels)
            .map(|i| {
                let z = i as f32;
                make_face([0.0, 0.0, z], [1.0, 0.0, z], [0.0, 1.0, z])
            })
            .collect();

        let mut tree = BspNode::from_elements(faces, CsgOptions::default());
        assert_eq!(tree.depth(), levels);
        assert_eq!(tree.element_count(), levels);

        tree.invert();
        assert_eq!(tree.all_elements().len(), levels);
        drop(tree);
    }
}
