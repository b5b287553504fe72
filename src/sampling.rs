//! Seed oversampling policies.
//!
//! Every run starts from an oversampled seed set of roughly N0 spels, all
//! inside the region of interest. The random policy draws from a seedable
//! stream so runs are reproducible; the grid policy spaces seeds by an
//! axis-proportional stride law and reports the configuration as fatal when
//! a stride would fall below one spel.

use std::fmt;
use std::sync::Arc;

use bitvec::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Result, SicleError};
use crate::graph::Voxel;
use crate::image::{in_roi, MultibandImage, RegionOfInterest};

/// User-supplied oversampling hook.
///
/// Implementations must return ROI-eligible indices without duplicates; the
/// engine re-validates the set and fails the run otherwise.
pub trait SeedSampler: Send + Sync {
    fn sample(
        &self,
        image: &MultibandImage,
        roi: Option<&RegionOfInterest>,
        n0: usize,
    ) -> Result<Vec<u32>>;
}

/// Seed oversampling policy selection.
#[derive(Clone)]
pub enum Sampling {
    /// Distinct uniform draws from the eligible spels.
    Random,
    /// Approximately uniform grid with about N0 points in the ROI.
    Grid,
    /// User-supplied hook.
    Custom(Arc<dyn SeedSampler>),
}

impl fmt::Debug for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("Random"),
            Self::Grid => f.write_str("Grid"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Run the selected policy and report the realised seed count.
pub(crate) fn oversample(
    policy: &Sampling,
    image: &MultibandImage,
    roi: Option<&RegionOfInterest>,
    n0: usize,
    rng_seed: u64,
) -> Result<Vec<u32>> {
    let seeds = match policy {
        Sampling::Random => random_oversample(image, roi, n0, rng_seed),
        Sampling::Grid => grid_oversample(image, roi, n0),
        Sampling::Custom(sampler) => {
            let seeds = sampler.sample(image, roi, n0)?;
            validate_custom_seeds(image, roi, &seeds)?;
            Ok(seeds)
        }
    }?;
    debug!(requested = n0, sampled = seeds.len(), "seed oversampling done");
    Ok(seeds)
}

/// Uniform rejection sampling over the whole domain, keeping only unmarked
/// eligible spels until N0 are collected.
fn random_oversample(
    image: &MultibandImage,
    roi: Option<&RegionOfInterest>,
    n0: usize,
    rng_seed: u64,
) -> Result<Vec<u32>> {
    let n = image.domain().len();
    let mut rng = StdRng::seed_from_u64(rng_seed);
    let mut marked = bitvec![0; n];
    let mut seeds = Vec::with_capacity(n0);

    while seeds.len() < n0 {
        let v = rng.gen_range(0..n);
        if !marked[v] && in_roi(roi, v) {
            marked.set(v, true);
            seeds.push(v as u32);
        }
    }
    Ok(seeds)
}

/// Grid oversampling with axis-proportional strides.
///
/// Each axis receives a share of the seed budget proportional to its length;
/// the per-axis stride follows a square-root law in 2D and a cube-root law in
/// 3D. The z axis is dismissed for flat domains. Grid points falling outside
/// the ROI are skipped, so the realised count can undershoot N0.
fn grid_oversample(
    image: &MultibandImage,
    roi: Option<&RegionOfInterest>,
    n0: usize,
) -> Result<Vec<u32>> {
    let domain = *image.domain();
    let (xs, ys, zs) = (
        domain.width as f32,
        domain.height as f32,
        domain.depth as f32,
    );
    let total = xs + ys + zs;
    let (p_x, p_y, p_z) = (xs / total, ys / total, zs / total);
    let is_3d = domain.is_3d();

    let c = if is_3d {
        (n0 as f32 / (p_x * p_y * p_z)).powf(1.0 / 3.0).floor()
    } else {
        (n0 as f32 / (p_x * p_y)).sqrt().floor()
    };

    let xstride = xs / (c * p_x);
    let ystride = ys / (c * p_y);
    let zstride = zs / (c * p_z);

    if xstride < 1.0 {
        return Err(SicleError::ExcessiveSeeds { axis: 'x' });
    }
    if ystride < 1.0 {
        return Err(SicleError::ExcessiveSeeds { axis: 'y' });
    }
    if is_3d && zstride < 1.0 {
        return Err(SicleError::ExcessiveSeeds { axis: 'z' });
    }

    let xpos = axis_positions((xstride / 2.0) as i32, domain.width as i32 - 1, xstride);
    let ypos = axis_positions((ystride / 2.0) as i32, domain.height as i32 - 1, ystride);
    let zpos = if is_3d {
        axis_positions((zstride / 2.0) as i32, domain.depth as i32 - 1, zstride)
    } else {
        vec![0]
    };

    let mut seeds = Vec::new();
    for &z in &zpos {
        for &y in &ypos {
            for &x in &xpos {
                let v = domain.index_of(Voxel { x, y, z });
                if in_roi(roi, v) {
                    seeds.push(v as u32);
                }
            }
        }
    }
    Ok(seeds)
}

/// Grid coordinates along one axis: start at half a stride, advance by the
/// stride with integer truncation at every step.
fn axis_positions(start: i32, end: i32, stride: f32) -> Vec<i32> {
    debug_assert!(stride >= 1.0);
    let mut positions = Vec::new();
    let mut p = start;
    while p <= end {
        positions.push(p);
        p = (p as f32 + stride) as i32;
    }
    positions
}

fn validate_custom_seeds(
    image: &MultibandImage,
    roi: Option<&RegionOfInterest>,
    seeds: &[u32],
) -> Result<()> {
    if seeds.is_empty() {
        return Err(SicleError::InvalidCustomSeeds("empty seed set".into()));
    }
    let n = image.domain().len();
    let mut seen = bitvec![0; n];
    for &s in seeds {
        let v = s as usize;
        if v >= n {
            return Err(SicleError::InvalidCustomSeeds(format!(
                "seed index {v} outside the domain of {n} spels"
            )));
        }
        if !in_roi(roi, v) {
            return Err(SicleError::InvalidCustomSeeds(format!(
                "seed index {v} outside the region of interest"
            )));
        }
        if seen[v] {
            return Err(SicleError::InvalidCustomSeeds(format!(
                "duplicate seed index {v}"
            )));
        }
        seen.set(v, true);
    }
    Ok(())
}
