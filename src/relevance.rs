//! Seed relevance ranking and survivor selection.
//!
//! Each tree receives a scalar priority `size_frac * V * P`: its share of the
//! domain, a criterion term comparing it against its adjacent trees, and an
//! optional saliency penalty. The top-ranked seeds survive into the next
//! iteration; the rest are handed to the differential IFT for removal.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::graph::Domain;
use crate::stats::TreeStats;

/// User-supplied criterion hook. Scores must be non-negative.
pub trait TreeCriterion: Send + Sync {
    fn score(&self, stats: &TreeStats, tree: usize) -> f64;
}

/// User-supplied penalty hook. Penalties must be non-negative.
pub trait TreePenalty: Send + Sync {
    fn penalty(&self, stats: &TreeStats, tree: usize) -> f64;
}

/// Relevance criterion (the V term).
#[derive(Clone)]
pub enum Criterion {
    /// Size share only.
    Size,
    /// Minimum feature contrast against adjacent trees.
    MinContrast,
    /// Maximum feature contrast against adjacent trees.
    MaxContrast,
    /// Minimum centroid distance to adjacent trees.
    Spread,
    /// User-supplied hook.
    Custom(Arc<dyn TreeCriterion>),
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size => f.write_str("Size"),
            Self::MinContrast => f.write_str("MinContrast"),
            Self::MaxContrast => f.write_str("MaxContrast"),
            Self::Spread => f.write_str("Spread"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Saliency penalty (the P term). Every variant except `None` needs a
/// saliency map.
#[derive(Clone)]
pub enum Penalty {
    /// No penalisation.
    None,
    /// Penalise trees that are neither salient nor near an object border:
    /// `max(sal, max saliency gradient)`.
    Object,
    /// Penalise trees far from object borders: `max saliency gradient`.
    Border,
    /// Penalise non-object trees crowding their neighbours:
    /// `max(sal, (1 - sal) * min centroid distance / diagonal)`.
    Osb,
    /// Penalise object trees crowding their neighbours:
    /// `max(sal * max saliency gradient, (1 - sal) * min centroid distance / diagonal)`.
    Bobs,
    /// User-supplied hook.
    Custom(Arc<dyn TreePenalty>),
}

impl fmt::Debug for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Object => f.write_str("Object"),
            Self::Border => f.write_str("Border"),
            Self::Osb => f.write_str("Osb"),
            Self::Bobs => f.write_str("Bobs"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Penalty {
    /// Whether this penalty reads the saliency map.
    pub(crate) fn requires_saliency(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Aggregates over the trees adjacent to one tree.
struct NeighbourAggregates {
    min_feat_dist: f64,
    max_feat_dist: f64,
    min_centroid_dist: f64,
    max_sal_grad: f64,
}

impl NeighbourAggregates {
    fn collect(stats: &TreeStats, t: usize) -> Self {
        let mut agg = Self {
            min_feat_dist: f64::INFINITY,
            max_feat_dist: 0.0,
            min_centroid_dist: f64::INFINITY,
            max_sal_grad: 0.0,
        };
        for u in stats.neighbours(t) {
            let grad = euclidean(stats.features(t), stats.features(u));
            let dist = centroid_distance(stats.centroid(t), stats.centroid(u));
            agg.min_feat_dist = agg.min_feat_dist.min(grad);
            agg.max_feat_dist = agg.max_feat_dist.max(grad);
            agg.min_centroid_dist = agg.min_centroid_dist.min(dist);
            if let (Some(a), Some(b)) = (stats.mean_saliency(t), stats.mean_saliency(u)) {
                agg.max_sal_grad = agg.max_sal_grad.max((a - b).abs());
            }
        }
        agg
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn centroid_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    euclidean(&a, &b)
}

/// Relevance of every tree under the selected criterion and penalty.
pub(crate) fn seed_relevance(
    stats: &TreeStats,
    domain: &Domain,
    criterion: &Criterion,
    penalty: &Penalty,
) -> Vec<f64> {
    let total_spels = domain.len() as f64;
    let diagonal = domain.diagonal();

    (0..stats.num_trees())
        .into_par_iter()
        .map(|t| {
            let agg = NeighbourAggregates::collect(stats, t);
            let size_frac = stats.size(t) as f64 / total_spels;
            let value = match criterion {
                Criterion::Size => 1.0,
                Criterion::MinContrast => agg.min_feat_dist,
                Criterion::MaxContrast => agg.max_feat_dist,
                Criterion::Spread => agg.min_centroid_dist,
                Criterion::Custom(hook) => hook.score(stats, t),
            };
            let mut relevance = size_frac * value;

            let sal = stats.mean_saliency(t).unwrap_or(0.0);
            let dist_frac = agg.min_centroid_dist / diagonal;
            relevance *= match penalty {
                Penalty::None => 1.0,
                Penalty::Object => sal.max(agg.max_sal_grad),
                Penalty::Border => agg.max_sal_grad,
                Penalty::Osb => sal.max((1.0 - sal) * dist_frac),
                Penalty::Bobs => (sal * agg.max_sal_grad).max((1.0 - sal) * dist_frac),
                Penalty::Custom(hook) => hook.penalty(stats, t),
            };
            relevance
        })
        .collect()
}

/// Split the seed array into the `keep` most relevant seeds (in rank order,
/// becoming the next iteration's seed array) and the remainder (the removal
/// set for the differential IFT). Equal relevances break by seed rank so the
/// split is deterministic.
pub(crate) fn select_survivors(
    seeds: &[u32],
    relevance: &[f64],
    keep: usize,
) -> (Vec<u32>, Vec<u32>) {
    debug_assert_eq!(seeds.len(), relevance.len());
    debug_assert!(keep <= seeds.len());

    let mut order: Vec<usize> = (0..seeds.len()).collect();
    order.sort_by(|&a, &b| relevance[b].total_cmp(&relevance[a]).then(a.cmp(&b)));

    let survivors = order[..keep].iter().map(|&i| seeds[i]).collect();
    let removed = order[keep..].iter().map(|&i| seeds[i]).collect();
    (survivors, removed)
}
