//! Path-cost (connectivity) functions that drive the optimum-path
//! competition.
//!
//! A connectivity function answers one question: given the path ending at a
//! conquering vertex, what would the cost of extending it across one arc be?
//! Both built-ins compare the candidate against the *root's* features rather
//! than the conquering vertex's, which keeps every tree anchored to its seed.

use std::fmt;
use std::sync::Arc;

use crate::image::{feature_distance, MultibandImage};

/// User-supplied path-cost hook.
///
/// Implementations must be pure functions of the visible state and must
/// satisfy the monotone-path property: the returned cost may never be lower
/// than `from_cost`, and must be finite for spels inside the region of
/// interest. Differential recomputation is unsound otherwise.
pub trait ConnectivityFn: Send + Sync {
    /// Cost offered to `to` by extending the path that ends at `from`, whose
    /// current cost is `from_cost` and whose tree is rooted at `root`.
    fn path_cost(
        &self,
        image: &MultibandImage,
        saliency: Option<&[f32]>,
        root: usize,
        from: usize,
        to: usize,
        from_cost: f64,
    ) -> f64;
}

/// Scalar knobs of the built-in cost functions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CostParams {
    pub alpha: f64,
    pub irreg: f64,
    pub adherence: i32,
}

/// Path-cost function selection.
#[derive(Clone)]
pub enum Connectivity {
    /// Root-based fmax: `max(C(vi), d^(1 + alpha * |sal(r) - sal(vj)|))`
    /// where `d` is the feature distance between the root and the candidate.
    /// Reduces to classical fmax when alpha is zero or saliency is absent.
    Fmax,
    /// Boundary-adherence fsum:
    /// `C(vi) + ((omega + alpha * |sal(r) - sal(vj)|) * d)^a + spatial(vi, vj)`,
    /// with irregularity `omega` and integer adherence exponent `a`.
    Fsum,
    /// User-supplied hook.
    Custom(Arc<dyn ConnectivityFn>),
}

impl fmt::Debug for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fmax => f.write_str("Fmax"),
            Self::Fsum => f.write_str("Fsum"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Connectivity {
    /// Evaluate the selected function on one arc.
    pub(crate) fn offer(
        &self,
        image: &MultibandImage,
        saliency: Option<&[f32]>,
        params: CostParams,
        root: usize,
        from: usize,
        to: usize,
        from_cost: f64,
    ) -> f64 {
        match self {
            Self::Fmax => {
                let feat_dist = feature_distance(image.features(root), image.features(to));
                let sal_dist = saliency.map_or(0.0, |s| f64::from((s[root] - s[to]).abs()));
                from_cost.max(feat_dist.powf(1.0 + params.alpha * sal_dist))
            }
            Self::Fsum => {
                let feat_dist = feature_distance(image.features(root), image.features(to));
                let sal_dist = saliency.map_or(0.0, |s| f64::from((s[root] - s[to]).abs()));
                let colour = ((params.irreg + params.alpha * sal_dist) * feat_dist)
                    .powi(params.adherence);
                let domain = image.domain();
                let spatial = domain.voxel_at(from).distance_to(domain.voxel_at(to));
                from_cost + colour + spatial
            }
            Self::Custom(hook) => hook.path_cost(image, saliency, root, from, to, from_cost),
        }
    }
}
