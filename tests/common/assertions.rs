//! Partition assertions shared by the integration tests.

#![allow(dead_code)]

use sicle::{Adjacency, LabelImage, Voxel};

/// Assert the partition contract: every eligible spel carries a label in
/// `[1, max_regions]`, every excluded spel carries 0, and labels are dense
/// (each value up to the maximum occurs).
pub fn assert_valid_partition(labels: &LabelImage, roi: Option<&[bool]>, max_regions: usize) {
    let k = labels.num_regions();
    assert!(k >= 1, "a successful run yields at least one region");
    assert!(k <= max_regions, "{k} regions exceed the bound {max_regions}");

    let mut seen = vec![false; k];
    for (v, &label) in labels.labels().iter().enumerate() {
        let eligible = roi.map_or(true, |mask| mask[v]);
        if eligible {
            assert!(
                (1..=k as u32).contains(&label),
                "spel {v} carries out-of-range label {label}"
            );
            seen[(label - 1) as usize] = true;
        } else {
            assert_eq!(label, 0, "spel {v} lies outside the ROI but is labelled");
        }
    }
    assert!(seen.iter().all(|&s| s), "labels are not dense in [1, {k}]");
}

/// Assert that every region is spatially connected under the adjacency the
/// run used.
pub fn assert_connected(labels: &LabelImage, use_diag: bool) {
    let domain = *labels.domain();
    let adjacency = Adjacency::for_domain(&domain, use_diag);

    let mut visited = vec![false; domain.len()];
    for start in 0..domain.len() {
        if visited[start] || labels.label(start) == 0 {
            continue;
        }
        // flood one component and check nothing of this label remains
        // unreachable from it elsewhere
        let label = labels.label(start);
        let mut stack = vec![start];
        visited[start] = true;
        let mut component = 0usize;
        while let Some(v) = stack.pop() {
            component += 1;
            let voxel = domain.voxel_at(v);
            for &(dx, dy, dz) in adjacency.offsets() {
                let w = Voxel {
                    x: voxel.x + dx,
                    y: voxel.y + dy,
                    z: voxel.z + dz,
                };
                if !domain.contains(w) {
                    continue;
                }
                let w = domain.index_of(w);
                if !visited[w] && labels.label(w) == label {
                    visited[w] = true;
                    stack.push(w);
                }
            }
        }
        let total = labels.labels().iter().filter(|&&l| l == label).count();
        assert_eq!(
            component, total,
            "label {label} splits into disconnected components"
        );
    }
}

/// Spel count per region, indexed by `label - 1`.
pub fn region_sizes(labels: &LabelImage) -> Vec<usize> {
    let mut sizes = vec![0usize; labels.num_regions()];
    for &l in labels.labels() {
        if l > 0 {
            sizes[(l - 1) as usize] += 1;
        }
    }
    sizes
}
