//! SICLE: Superpixels through Iterative CLEarcutting
//!
//! This library provides an iterative superspel segmentation engine for 2D
//! images, 3D volumes, and videos treated as volumes. Given a multi-band
//! feature image, an optional region-of-interest mask, and an optional
//! object saliency map, it partitions the spatial domain into a requested
//! number of spatially connected, feature-homogeneous regions.
//!
//! The engine oversamples an initial seed set, grows an optimum-path forest
//! with the image foresting transform (IFT), ranks every seed by the
//! relevance of its tree, and removes the least relevant seeds; from the
//! second iteration onward a differential IFT recomputes only the paths the
//! removed trees invalidated. Seed counts shrink along a geometric schedule
//! until the final superspel count is reached.
//!
//! ## Main Components
//!
//! - [`api`]: the [`Sicle`] engine, [`SicleOptions`], and [`LabelImage`]
//! - [`graph`]: the spel lattice and its 4/8/6/26 adjacency
//! - [`image`]: feature image, region of interest, saliency normalisation
//! - [`sampling`]: random, grid, and custom seed oversampling
//! - [`conn`]: fmax, fsum, and custom path-cost functions
//! - [`stats`]: per-tree statistics feeding the relevance ranking
//! - [`relevance`]: criterion and penalty terms, survivor selection
//! - [`config`]: centralized default parametrization
//!
//! ## Error Handling
//!
//! This library uses `Result` types for robust error handling. Every fatal
//! condition (invalid configuration, mismatched planes, degenerate
//! sampling) surfaces as a [`SicleError`] before or instead of a partial
//! result; internal invariant violations abort via assertions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sicle::{Domain, MultibandImage, Sicle, SicleOptions};
//!
//! # fn main() -> sicle::Result<()> {
//! // 1. Wrap dense features (grayscale here; colour images enter as three
//! //    bands in a perceptually uniform space such as L*a*b*)
//! let domain = Domain::new(128, 128, 1);
//! let values: Vec<f32> = (0..domain.len()).map(|v| (v % 128) as f32).collect();
//! let image = MultibandImage::grayscale(domain, values)?;
//!
//! // 2. Build the engine; saliency and region of interest are optional
//! let engine = Sicle::new(image, None, None)?;
//!
//! // 3. Segment into 50 superspels from 500 oversampled seeds
//! let opts = SicleOptions {
//!     n0: 500,
//!     nf: 50,
//!     ..SicleOptions::default()
//! };
//! let labels = engine.run(&opts)?;
//! assert!(labels.num_regions() <= 50);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod conn;
pub mod error;
pub mod graph;
pub mod image;
pub mod relevance;
pub mod sampling;
pub mod stats;

mod forest;
mod heap;
mod ift;

// Re-export commonly used types for convenience
pub use api::{LabelImage, Sicle, SicleOptions};
pub use conn::{Connectivity, ConnectivityFn};
pub use error::{Result, SicleError};
pub use graph::{Adjacency, Domain, Voxel};
pub use image::{MultibandImage, RegionOfInterest, Saliency};
pub use relevance::{Criterion, Penalty, TreeCriterion, TreePenalty};
pub use sampling::{Sampling, SeedSampler};
pub use stats::TreeStats;
