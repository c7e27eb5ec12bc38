//! Plane selection strategies for BSP tree construction.
//!
//! The choice of splitting plane affects tree balance and the number of
//! element splits during construction.

use crate::{Plane3D, Split, SplitHeuristic, Splittable, Tolerance};

/// Strategy for selecting which element's plane becomes a node's splitting plane.
pub trait PlaneSelector<T: Splittable> {
    /// Select an element from the slice whose plane will split the node.
    ///
    /// Returns `None` if the slice is empty.
    fn select<'a>(&self, elements: &'a [T], tolerance: Tolerance) -> Option<&'a T>;
}

/// Selects the first element in the list.
///
/// This is the simplest and fastest selector, but may produce unbalanced
/// trees depending on input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstElement;

impl<T: Splittable> PlaneSelector<T> for FirstElement {
    fn select<'a>(&self, elements: &'a [T], _tolerance: Tolerance) -> Option<&'a T> {
        elements.first()
    }
}

/// Scores candidate planes and keeps the one with the fewest splits and the
/// best front/back balance.
#[derive(Debug, Clone, Copy)]
pub struct BalancedSelector {
    /// How many leading elements are tried as candidates.
    pub sample_size: usize,
    pub span_weight: f32,
    pub balance_weight: f32,
}

impl Default for BalancedSelector {
    fn default() -> Self {
        Self {
            sample_size: 20,
            span_weight: 8.0,
            balance_weight: 1.0,
        }
    }
}

impl BalancedSelector {
    fn score<T: Splittable>(&self, plane: &Plane3D, elements: &[T], tolerance: Tolerance) -> f32 {
        let mut front = 0i64;
        let mut back = 0i64;
        let mut spanning = 0i64;

        for element in elements {
            match element.split(plane, tolerance) {
                Split::Front(_) => front += 1,
                Split::Back(_) => back += 1,
                Split::Spanning { .. } => spanning += 1,
                Split::CoplanarFront(_) | Split::CoplanarBack(_) => {}
            }
        }

        self.span_weight * spanning as f32 + self.balance_weight * (front - back).abs() as f32
    }
}

impl<T: Splittable> PlaneSelector<T> for BalancedSelector {
    fn select<'a>(&self, elements: &'a [T], tolerance: Tolerance) -> Option<&'a T> {
        elements
            .iter()
            .take(self.sample_size.max(1))
            .map(|candidate| (candidate, self.score(candidate.plane(), elements, tolerance)))
            .fold(None, |best: Option<(&'a T, f32)>, (candidate, score)| match best {
                Some((_, best_score)) if best_score <= score => best,
                _ => Some((candidate, score)),
            })
            .map(|(candidate, _)| candidate)
    }
}

/// Picks the splitting plane for a batch of elements according to `heuristic`.
pub(crate) fn select_plane<T: Splittable>(
    heuristic: SplitHeuristic,
    elements: &[T],
    tolerance: Tolerance,
) -> Option<Plane3D> {
    let selected = match heuristic {
        SplitHeuristic::First => FirstElement.select(elements, tolerance),
        SplitHeuristic::Balanced => BalancedSelector::default().select(elements, tolerance),
    };
    selected.map(|element| element.plane().clone())
}
