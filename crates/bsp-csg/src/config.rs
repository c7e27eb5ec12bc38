//! Numeric tolerance and tree construction options.

use crate::{CsgError, CsgResult};

/// Default epsilon for plane classification.
/// Points within this distance of a plane are considered "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Smallest accepted tolerance.
///
/// An edge whose ends lie more than this far on opposite sides of a plane
/// is never parallel enough to the plane to lose its intersection point.
pub const MIN_TOLERANCE: f32 = f32::EPSILON;

/// Distance below which a point is considered to lie on a plane.
///
/// Always finite and at least [`MIN_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f32);

impl Tolerance {
    /// Creates a tolerance, rejecting values that are not finite or are
    /// below [`MIN_TOLERANCE`].
    pub fn new(value: f32) -> CsgResult<Self> {
        if value.is_finite() && value >= MIN_TOLERANCE {
            Ok(Self(value))
        } else {
            Err(CsgError::InvalidTolerance { value })
        }
    }

    /// Returns the raw distance.
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(PLANE_EPSILON)
    }
}

/// How a BSP node picks its splitting plane when it is first populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitHeuristic {
    /// Use the plane of the first element. Cheap, but input order decides
    /// the shape of the tree.
    #[default]
    First,
    /// Score a sample of candidate planes by spanning count and front/back
    /// balance and keep the best one.
    Balanced,
}

/// Options shared by every node of a BSP tree and by the meshes that build them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CsgOptions {
    pub tolerance: Tolerance,
    pub heuristic: SplitHeuristic,
}

impl CsgOptions {
    /// Returns the options with a different classification tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> CsgResult<Self> {
        self.tolerance = Tolerance::new(tolerance)?;
        Ok(self)
    }

    /// Returns the options with a different plane selection heuristic.
    pub fn with_heuristic(mut self, heuristic: SplitHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}
