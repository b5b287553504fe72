//! Optimum-path forest state shared by the IFT kernels.
//!
//! Three per-vertex maps describe the forest: the root of the tree a vertex
//! belongs to, its predecessor on the optimum path, and its path cost. Seed
//! vertices overload the predecessor cell with the two's complement of their
//! label, which saves a fourth N-sized map. Costs use extended-real
//! sentinels: background spels sit at negative infinity and can never be
//! conquered, unreached spels at positive infinity.

use rayon::prelude::*;

use crate::image::{in_roi, RegionOfInterest};

/// Absent root/predecessor marker. Distinct from every encoded label, since
/// labels are bounded by the vertex count.
pub(crate) const NIL: i32 = i32::MIN;

/// Cost of spels outside the region of interest.
pub(crate) const BG_COST: f64 = f64::NEG_INFINITY;

/// Cost of spels not yet reached by any path.
pub(crate) const TMP_COST: f64 = f64::INFINITY;

/// Encode a seed's label into its predecessor cell.
#[inline]
pub(crate) fn encode_label(rank: usize) -> i32 {
    -(rank as i32 + 1)
}

pub(crate) struct Forest {
    pub root: Vec<i32>,
    pub pred: Vec<i32>,
    pub cost: Vec<f64>,
    /// Current seed array; position in this array is the seed's label.
    pub seeds: Vec<u32>,
}

impl Forest {
    pub fn new(num_vertices: usize, seeds: Vec<u32>) -> Self {
        Self {
            root: vec![NIL; num_vertices],
            pred: vec![NIL; num_vertices],
            cost: vec![TMP_COST; num_vertices],
            seeds,
        }
    }

    /// Restore the pre-IFT state: everything unreached, background frozen,
    /// seeds rooted at themselves with their label encoded and cost zero.
    pub fn reset(&mut self, roi: Option<&RegionOfInterest>) {
        self.root
            .par_iter_mut()
            .zip(self.pred.par_iter_mut())
            .zip(self.cost.par_iter_mut())
            .enumerate()
            .for_each(|(v, ((root, pred), cost))| {
                *root = NIL;
                *pred = NIL;
                *cost = if in_roi(roi, v) { TMP_COST } else { BG_COST };
            });

        for (rank, &s) in self.seeds.iter().enumerate() {
            let s = s as usize;
            self.root[s] = s as i32;
            self.pred[s] = encode_label(rank);
            self.cost[s] = 0.0;
        }
    }

    /// Rewrite the label encodings after the seed array was reordered or
    /// shrunk. Roots and costs of surviving seeds are untouched.
    pub fn relabel_seeds(&mut self) {
        for (rank, &s) in self.seeds.iter().enumerate() {
            self.pred[s as usize] = encode_label(rank);
        }
    }

    /// Whether a vertex can take part in the competition at all.
    #[inline]
    pub fn is_background(&self, v: usize) -> bool {
        self.cost[v] == BG_COST
    }

    /// Invalidate a vertex during tree or subtree removal.
    #[inline]
    pub fn invalidate(&mut self, v: usize) {
        self.root[v] = NIL;
        self.pred[v] = NIL;
        self.cost[v] = TMP_COST;
    }

    /// Label of a conquered vertex, decoded from its root's predecessor cell.
    #[inline]
    pub fn label_of(&self, v: usize) -> usize {
        let r = self.root[v];
        assert!(r != NIL, "dangling root: vertex {v} was never conquered");
        let encoded = self.pred[r as usize];
        debug_assert!(encoded < 0, "root {r} lost its label encoding");
        (-(encoded + 1)) as usize
    }
}
