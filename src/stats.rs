//! Per-tree statistics extracted from a settled forest.
//!
//! After every IFT or DIFT pass the engine scans the forest once and derives,
//! for each tree: its spel count, mean feature vector, spatial centroid, mean
//! saliency, and the set of trees it touches in the grid graph. These feed
//! the relevance ranking that decides which seeds survive.

use bitvec::prelude::*;
use rayon::prelude::*;

use crate::forest::Forest;
use crate::graph::Adjacency;
use crate::image::MultibandImage;

/// Statistics of every tree in the current forest.
///
/// Trees are identified by their label, i.e. their seed's position in the
/// seed array. All aggregate values are means, not sums.
#[derive(Debug, Clone)]
pub struct TreeStats {
    num_trees: usize,
    bands: usize,
    size: Vec<u32>,
    feats: Vec<f64>,
    centroids: Vec<[f64; 3]>,
    saliency: Option<Vec<f64>>,
    adj: Vec<BitVec>,
}

impl TreeStats {
    /// Scan the forest once and accumulate every per-tree aggregate, then
    /// turn the accumulators into means.
    pub(crate) fn measure(
        image: &MultibandImage,
        saliency: Option<&[f32]>,
        forest: &Forest,
        adjacency: &Adjacency,
    ) -> Self {
        let domain = *image.domain();
        let num_trees = forest.seeds.len();
        let bands = image.bands();

        let mut stats = Self {
            num_trees,
            bands,
            size: vec![0; num_trees],
            feats: vec![0.0; num_trees * bands],
            centroids: vec![[0.0; 3]; num_trees],
            saliency: saliency.map(|_| vec![0.0; num_trees]),
            adj: vec![bitvec![0; num_trees]; num_trees],
        };

        for v in 0..domain.len() {
            if forest.is_background(v) {
                continue;
            }
            let label = forest.label_of(v);
            let root = forest.root[v];
            let voxel = domain.voxel_at(v);

            stats.size[label] += 1;
            if let (Some(acc), Some(sal)) = (stats.saliency.as_mut(), saliency) {
                acc[label] += f64::from(sal[v]);
            }
            stats.centroids[label][0] += f64::from(voxel.x);
            stats.centroids[label][1] += f64::from(voxel.y);
            stats.centroids[label][2] += f64::from(voxel.z);
            for (band, &f) in image.features(v).iter().enumerate() {
                stats.feats[label * bands + band] += f64::from(f);
            }

            for &offset in adjacency.offsets() {
                let neighbour = voxel.shifted(offset);
                if !domain.contains(neighbour) {
                    continue;
                }
                let w = domain.index_of(neighbour);
                if !forest.is_background(w) && forest.root[w] != root {
                    let other = forest.label_of(w);
                    stats.adj[label].set(other, true);
                }
            }
        }

        let size = &stats.size;
        let saliency_acc = &mut stats.saliency;
        stats
            .feats
            .par_chunks_mut(bands)
            .zip(stats.centroids.par_iter_mut())
            .enumerate()
            .for_each(|(t, (feats, centroid))| {
                debug_assert!(size[t] > 0, "tree {t} owns no spel");
                let count = f64::from(size[t]);
                for f in feats.iter_mut() {
                    *f /= count;
                }
                for c in centroid.iter_mut() {
                    *c /= count;
                }
            });
        if let Some(acc) = saliency_acc {
            acc.par_iter_mut().enumerate().for_each(|(t, s)| {
                *s /= f64::from(size[t]);
            });
        }

        stats
    }

    /// Number of trees (equals the current seed count).
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Spel count of a tree.
    #[inline]
    pub fn size(&self, t: usize) -> usize {
        self.size[t] as usize
    }

    /// Mean feature vector of a tree.
    #[inline]
    pub fn features(&self, t: usize) -> &[f64] {
        &self.feats[t * self.bands..(t + 1) * self.bands]
    }

    /// Spatial centroid of a tree.
    #[inline]
    pub fn centroid(&self, t: usize) -> [f64; 3] {
        self.centroids[t]
    }

    /// Mean saliency of a tree, when a saliency map was provided.
    #[inline]
    pub fn mean_saliency(&self, t: usize) -> Option<f64> {
        self.saliency.as_ref().map(|s| s[t])
    }

    /// Whether two trees share at least one grid arc.
    #[inline]
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.adj[a][b]
    }

    /// Labels of the trees adjacent to `t`.
    pub fn neighbours(&self, t: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[t].iter_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::encode_label;
    use crate::graph::Domain;

    /// Hand-built forest over a 4x1 strip: seed 0 owns {0, 1}, seed 3 owns
    /// {2, 3}.
    fn strip_fixture() -> (MultibandImage, Forest, Adjacency) {
        let domain = Domain::new(4, 1, 1);
        let image = MultibandImage::grayscale(domain, vec![10.0, 20.0, 70.0, 80.0]).unwrap();
        let adjacency = Adjacency::for_domain(&domain, false);

        let mut forest = Forest::new(4, vec![0, 3]);
        forest.reset(None);
        forest.root[1] = 0;
        forest.pred[1] = 0;
        forest.cost[1] = 10.0;
        forest.root[2] = 3;
        forest.pred[2] = 3;
        forest.cost[2] = 10.0;
        assert_eq!(forest.pred[0], encode_label(0));
        (image, forest, adjacency)
    }

    #[test]
    fn sizes_means_and_centroids() {
        let (image, forest, adjacency) = strip_fixture();
        let stats = TreeStats::measure(&image, None, &forest, &adjacency);

        assert_eq!(stats.num_trees(), 2);
        assert_eq!(stats.size(0), 2);
        assert_eq!(stats.size(1), 2);
        assert!((stats.features(0)[0] - 15.0).abs() < 1e-12);
        assert!((stats.features(1)[0] - 75.0).abs() < 1e-12);
        assert!((stats.centroid(0)[0] - 0.5).abs() < 1e-12);
        assert!((stats.centroid(1)[0] - 2.5).abs() < 1e-12);
        assert_eq!(stats.mean_saliency(0), None);
    }

    #[test]
    fn adjacency_is_mutual_across_the_tree_boundary() {
        let (image, forest, adjacency) = strip_fixture();
        let stats = TreeStats::measure(&image, None, &forest, &adjacency);

        assert!(stats.is_adjacent(0, 1));
        assert!(stats.is_adjacent(1, 0));
        assert_eq!(stats.neighbours(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn mean_saliency_follows_the_map() {
        let (image, forest, adjacency) = strip_fixture();
        let sal = [1.0f32, 0.0, 0.5, 0.5];
        let stats = TreeStats::measure(&image, Some(&sal), &forest, &adjacency);
        assert!((stats.mean_saliency(0).unwrap() - 0.5).abs() < 1e-12);
        assert!((stats.mean_saliency(1).unwrap() - 0.5).abs() < 1e-12);
    }
}
