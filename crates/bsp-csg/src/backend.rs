//! Boolean operation backends.
//!
//! [`BspBackend`] is the BSP tree implementation. Callers that have an
//! alternative implementation of the same operators can plug it in through
//! [`BooleanBackend`] and [`Mesh::apply`](crate::Mesh::apply).

use crate::{BspNode, CsgOptions, Face};

/// The three boolean operators on solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    /// Union: points in either solid.
    Combine,
    /// Intersection: points in both solids.
    Intersect,
    /// Difference: points in the first solid but not the second.
    Subtract,
}

/// An implementation of the boolean operators on face lists.
///
/// Inputs are borrowed and never modified; the result is a new face list.
pub trait BooleanBackend {
    /// Returns the boundary of the union of `a` and `b`.
    fn combine(&self, a: &[Face], b: &[Face], options: CsgOptions) -> Vec<Face>;

    /// Returns the boundary of the region inside both `a` and `b`.
    fn intersect(&self, a: &[Face], b: &[Face], options: CsgOptions) -> Vec<Face>;

    /// Returns the boundary of `a` with the solid `b` removed.
    fn subtract(&self, a: &[Face], b: &[Face], options: CsgOptions) -> Vec<Face>;

    /// Dispatches to the operator named by `op`.
    fn apply(&self, op: BooleanOp, a: &[Face], b: &[Face], options: CsgOptions) -> Vec<Face> {
        match op {
            BooleanOp::Combine => self.combine(a, b, options),
            BooleanOp::Intersect => self.intersect(a, b, options),
            BooleanOp::Subtract => self.subtract(a, b, options),
        }
    }
}

/// Boolean operators computed with BSP trees.
///
/// Each operator builds a tree per operand and combines them with clipping
/// and inversion. The order of the steps matters: clipping is not
/// commutative and inversion mutates the tree in place.
///
/// An empty tree keeps everything it clips and stays empty when inverted, so
/// it cannot stand in for the empty solid inside these sequences. Empty
/// operands are resolved up front instead: `A ∪ ∅ = A`, `A ∩ ∅ = ∅`,
/// `A - ∅ = A` and `∅ - B = ∅`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BspBackend;

impl BspBackend {
    fn trees(a: &[Face], b: &[Face], options: CsgOptions) -> (BspNode<Face>, BspNode<Face>) {
        (
            BspNode::from_elements(a.to_vec(), options),
            BspNode::from_elements(b.to_vec(), options),
        )
    }
}

impl BooleanBackend for BspBackend {
    fn combine(&self, a: &[Face], b: &[Face], options: CsgOptions) -> Vec<Face> {
        if a.is_empty() || b.is_empty() {
            return [a, b].concat();
        }

        let (mut a, b) = Self::trees(a, b, options);
        a.union(b);
        a.into_elements()
    }

    fn intersect(&self, a: &[Face], b: &[Face], options: CsgOptions) -> Vec<Face> {
        if a.is_empty() || b.is_empty() {
            return Vec::new();
        }

        let (mut a, mut b) = Self::trees(a, b, options);
        a.invert();
        b.cut_against(&a);
        b.invert();
        a.cut_against(&b);
        b.cut_against(&a);
        a.add_elements(b.into_elements());
        a.invert();
        a.into_elements()
    }

    fn subtract(&self, a: &[Face], b: &[Face], options: CsgOptions) -> Vec<Face> {
        if a.is_empty() || b.is_empty() {
            return a.to_vec();
        }

        let (mut a, b) = Self::trees(a, b, options);
        a.invert();
        a.union(b);
        a.invert();
        a.into_elements()
    }
}
