//! Sequential and differential image foresting transform kernels.
//!
//! The sequential kernel grows an optimum-path forest from scratch; the
//! differential kernel reuses the previous forest after a set of seeds is
//! removed, re-competing only the paths that depended on a removed tree.
//! Both share one competition loop; the differential pass additionally
//! invalidates subtrees whose predecessor relation became inconsistent.

use bitvec::prelude::*;
use tracing::debug;

use crate::conn::{Connectivity, CostParams};
use crate::forest::{Forest, NIL, TMP_COST};
use crate::graph::{Adjacency, Domain};
use crate::heap::CostHeap;
use crate::image::{MultibandImage, RegionOfInterest};

/// Read-only collaborators shared by the kernels of one run.
pub(crate) struct IftContext<'a> {
    pub image: &'a MultibandImage,
    pub roi: Option<&'a RegionOfInterest>,
    pub saliency: Option<&'a [f32]>,
    pub adjacency: &'a Adjacency,
    pub connectivity: &'a Connectivity,
    pub params: CostParams,
}

impl IftContext<'_> {
    #[inline]
    fn domain(&self) -> &Domain {
        self.image.domain()
    }

    #[inline]
    fn offer(&self, root: usize, from: usize, to: usize, from_cost: f64) -> f64 {
        self.connectivity
            .offer(self.image, self.saliency, self.params, root, from, to, from_cost)
    }
}

/// Grow a fresh optimum-path forest from the current seed array.
pub(crate) fn run_sequential(ctx: &IftContext<'_>, forest: &mut Forest) {
    forest.reset(ctx.roi);

    let mut heap = CostHeap::new(ctx.domain().len());
    for i in 0..forest.seeds.len() {
        heap.insert(&forest.cost, forest.seeds[i] as usize);
    }
    compete(ctx, forest, &mut heap, false);
}

/// Reuse the previous forest: tear down the trees of `removed`, relabel the
/// surviving seeds, and re-compete from the frontier of the removed region.
pub(crate) fn run_differential(ctx: &IftContext<'_>, forest: &mut Forest, removed: &[u32]) {
    let frontier = remove_trees(ctx, forest, removed);
    debug!(
        removed = removed.len(),
        frontier = frontier.len(),
        "differential recomputation"
    );

    forest.relabel_seeds();

    let mut heap = CostHeap::new(ctx.domain().len());
    for &v in &frontier {
        heap.insert(&forest.cost, v as usize);
    }
    compete(ctx, forest, &mut heap, true);
}

/// The shared competition loop. In differential mode a conquered vertex that
/// would now cost more through its recorded predecessor, or whose root
/// relation became inconsistent, has its whole subtree invalidated and
/// re-enqueued.
fn compete(ctx: &IftContext<'_>, forest: &mut Forest, heap: &mut CostHeap, differential: bool) {
    let domain = *ctx.domain();

    while let Some(vi) = heap.pop(&forest.cost) {
        let vi_root = forest.root[vi];
        if vi_root == NIL {
            // invalidated after enqueueing and reconquered by nobody; it has
            // no path to offer
            continue;
        }
        let vi_voxel = domain.voxel_at(vi);

        for &offset in ctx.adjacency.offsets() {
            let vj_voxel = vi_voxel.shifted(offset);
            if !domain.contains(vj_voxel) {
                continue;
            }
            let vj = domain.index_of(vj_voxel);
            if heap.is_settled(vj) {
                continue;
            }

            let offered = ctx.offer(vi_root as usize, vi, vj, forest.cost[vi]);
            if offered < forest.cost[vj] {
                // background spels sit at -inf and can never satisfy this
                if heap.is_queued(vj) {
                    heap.remove(&forest.cost, vj);
                }
                forest.root[vj] = vi_root;
                forest.pred[vj] = vi as i32;
                forest.cost[vj] = offered;
                heap.insert(&forest.cost, vj);
            } else if differential && forest.pred[vj] == vi as i32 {
                let regressed = offered > forest.cost[vj];
                if regressed || vi_root != forest.root[vj] {
                    remove_subtree(ctx, forest, heap, vj);
                }
            }
        }
    }
}

/// Invalidate the trees of the removed seeds and collect the frontier:
/// vertices adjacent to the removed region whose own root survives.
fn remove_trees(ctx: &IftContext<'_>, forest: &mut Forest, removed: &[u32]) -> Vec<u32> {
    let domain = *ctx.domain();
    let mut visited = bitvec![0; domain.len()];
    let mut stack: Vec<u32> = Vec::with_capacity(removed.len());

    // mark every removed seed before walking, so the frontier test below
    // sees all doomed roots as gone
    for &s in removed {
        forest.invalidate(s as usize);
        stack.push(s);
    }

    let mut frontier = Vec::new();
    while let Some(vi) = stack.pop() {
        let vi = vi as usize;
        let vi_voxel = domain.voxel_at(vi);

        for &offset in ctx.adjacency.offsets() {
            let vj_voxel = vi_voxel.shifted(offset);
            if !domain.contains(vj_voxel) {
                continue;
            }
            let vj = domain.index_of(vj_voxel);
            if forest.is_background(vj) {
                continue;
            }

            if forest.pred[vj] == vi as i32 {
                // downstream of a removed seed
                forest.invalidate(vj);
                stack.push(vj as u32);
            } else {
                let vj_root = forest.root[vj];
                if vj_root != NIL && forest.root[vj_root as usize] != NIL && !visited[vj] {
                    visited.set(vj, true);
                    frontier.push(vj as u32);
                }
            }
        }
    }
    frontier
}

/// Invalidate the subtree rooted at `start` and re-enqueue the fresh frontier
/// it exposes.
fn remove_subtree(ctx: &IftContext<'_>, forest: &mut Forest, heap: &mut CostHeap, start: usize) {
    let domain = *ctx.domain();
    let mut visited = bitvec![0; domain.len()];
    let mut stack: Vec<u32> = vec![start as u32];
    let mut frontier: Vec<u32> = Vec::new();

    while let Some(vi) = stack.pop() {
        let vi = vi as usize;
        forest.invalidate(vi);
        heap.forget(&forest.cost, vi);

        let vi_voxel = domain.voxel_at(vi);
        for &offset in ctx.adjacency.offsets() {
            let vj_voxel = vi_voxel.shifted(offset);
            if !domain.contains(vj_voxel) {
                continue;
            }
            let vj = domain.index_of(vj_voxel);

            if forest.pred[vj] == vi as i32 {
                stack.push(vj as u32);
            } else if !forest.is_background(vj) && forest.cost[vj] != TMP_COST && !visited[vj] {
                visited.set(vj, true);
                frontier.push(vj as u32);
            }
        }
    }

    for &v in &frontier {
        let v = v as usize;
        if heap.is_queued(v) {
            heap.remove(&forest.cost, v);
        }
        heap.insert(&forest.cost, v);
    }
}
