//! High-level API of the SICLE segmentation engine.
//!
//! This module provides the single entry point for iterative superspel
//! segmentation, abstracting over the underlying foresting kernels.
//!
//! ## Core Workflow
//!
//! 1. **[`MultibandImage`](crate::image::MultibandImage)**: wrap dense
//!    feature values (grayscale or a perceptually uniform colour space).
//! 2. **[`Sicle::new`]**: bind the image to an optional integer saliency map
//!    and an optional region-of-interest mask; dimensions are checked here.
//! 3. **[`SicleOptions`]**: pick seed counts, schedule, adjacency, sampling,
//!    connectivity, criterion and penalty; defaults mirror the reference
//!    parametrization.
//! 4. **[`Sicle::run`]** / **[`Sicle::run_multiscale`]**: obtain a final
//!    label image, or one label image per iteration of the seed-removal
//!    schedule.
//!
//! ## Determinism
//!
//! Runs are pure functions of the inputs and of `SicleOptions::rng_seed`;
//! the engine holds no global state. Two runs with identical inputs and
//! seed produce identical label images.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sicle::{Domain, MultibandImage, Sicle, SicleOptions};
//!
//! # fn main() -> sicle::Result<()> {
//! let domain = Domain::new(64, 64, 1);
//! let values: Vec<f32> = (0..domain.len()).map(|v| (v % 64) as f32).collect();
//! let image = MultibandImage::grayscale(domain, values)?;
//!
//! let engine = Sicle::new(image, None, None)?;
//! let opts = SicleOptions {
//!     n0: 64,
//!     nf: 8,
//!     ..SicleOptions::default()
//! };
//! let labels = engine.run(&opts)?;
//! assert!(labels.num_regions() <= 8);
//! # Ok(())
//! # }
//! ```

mod options;
mod runner;

pub use options::SicleOptions;

use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::Domain;
use crate::image::{MultibandImage, RegionOfInterest, Saliency};

/// Compact label image produced by a segmentation run.
///
/// Labels are dense: spels inside the region of interest carry values in
/// `[1, K]`, spels outside carry 0. `K` never exceeds the schedule entry the
/// image was materialised under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelImage {
    domain: Domain,
    labels: Vec<u32>,
}

impl LabelImage {
    /// Lattice the labels cover.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Flat label buffer, indexed by spel.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Label of one spel.
    #[inline]
    pub fn label(&self, v: usize) -> u32 {
        self.labels[v]
    }

    /// Number of distinct regions (the maximum label).
    pub fn num_regions(&self) -> usize {
        self.labels.iter().copied().max().unwrap_or(0) as usize
    }
}

/// The segmentation engine.
///
/// Owns the read-only input planes for the lifetime of the runs; every run
/// method borrows the engine immutably, builds its own forest state, and
/// returns materialised labels.
#[derive(Debug)]
pub struct Sicle {
    image: MultibandImage,
    saliency: Option<Saliency>,
    roi: Option<RegionOfInterest>,
}

impl Sicle {
    /// Bind an image to its optional saliency map and region of interest.
    ///
    /// The saliency map is normalised by its maximum; an identically zero
    /// map is treated as absent. Both auxiliary planes must match the image
    /// domain spel-for-spel.
    pub fn new(
        image: MultibandImage,
        saliency: Option<&[u32]>,
        roi_mask: Option<&[bool]>,
    ) -> Result<Self> {
        let saliency = match saliency {
            Some(raw) => Saliency::from_integers(image.domain(), raw)?,
            None => None,
        };
        let roi = roi_mask
            .map(|mask| RegionOfInterest::from_mask(image.domain(), mask))
            .transpose()?;
        Ok(Self {
            image,
            saliency,
            roi,
        })
    }

    /// The feature image.
    pub fn image(&self) -> &MultibandImage {
        &self.image
    }

    /// The region of interest, when one was provided.
    pub fn roi(&self) -> Option<&RegionOfInterest> {
        self.roi.as_ref()
    }

    /// Whether a usable saliency map is present.
    pub fn has_saliency(&self) -> bool {
        self.saliency.is_some()
    }

    pub(crate) fn saliency_values(&self) -> Option<&[f32]> {
        self.saliency.as_ref().map(Saliency::values)
    }

    /// Number of spels eligible for segmentation.
    pub(crate) fn num_vertices(&self) -> usize {
        self.roi
            .as_ref()
            .map_or(self.image.domain().len(), RegionOfInterest::len)
    }

    /// Segment and return the final label image.
    pub fn run(&self, opts: &SicleOptions) -> Result<LabelImage> {
        let mut output = runner::segment(self, opts, false, None)?;
        Ok(output
            .scales
            .pop()
            .expect("a completed run always yields a final scale"))
    }

    /// Segment and return one label image per iteration, coarsening from the
    /// oversampled seed set down to nf superspels.
    pub fn run_multiscale(&self, opts: &SicleOptions) -> Result<Vec<LabelImage>> {
        Ok(runner::segment(self, opts, true, None)?.scales)
    }

    /// Like [`Sicle::run`], but polls `cancel` between foresting passes and
    /// abandons the run wholesale once it is set.
    pub fn run_with_cancellation(
        &self,
        opts: &SicleOptions,
        cancel: &AtomicBool,
    ) -> Result<LabelImage> {
        let mut output = runner::segment(self, opts, false, Some(cancel))?;
        Ok(output
            .scales
            .pop()
            .expect("a completed run always yields a final scale"))
    }

    /// Segment and additionally return the sparse seed image: `label + 1` at
    /// the nf surviving seed spels, 0 everywhere else.
    pub fn run_with_seed_image(&self, opts: &SicleOptions) -> Result<(LabelImage, LabelImage)> {
        let mut output = runner::segment(self, opts, false, None)?;
        let labels = output
            .scales
            .pop()
            .expect("a completed run always yields a final scale");
        Ok((labels, output.seed_image))
    }
}
