//! Input planes consumed by the engine: multi-band features, the region of
//! interest, and the object saliency map.
//!
//! The engine never decodes files or converts colour spaces; callers hand in
//! dense feature values (already in a perceptually uniform space for colour),
//! an optional eligibility mask, and an optional integer saliency map. All
//! dimension checks happen at construction so a run never starts on
//! mismatched planes.

use bitvec::prelude::*;
use rayon::prelude::*;

use crate::error::{Result, SicleError};
use crate::graph::Domain;

/// Dense multi-band feature image over a spel lattice.
///
/// Features are stored band-interleaved: the vector of spel `v` occupies
/// `feats[v * bands .. (v + 1) * bands]`. Grayscale images carry one band,
/// colour images three (expected in a space such as L*a*b*).
#[derive(Debug, Clone)]
pub struct MultibandImage {
    domain: Domain,
    bands: usize,
    feats: Vec<f32>,
}

impl MultibandImage {
    /// Wrap a band-interleaved feature buffer.
    pub fn new(domain: Domain, bands: usize, feats: Vec<f32>) -> Result<Self> {
        if domain.is_empty() {
            return Err(SicleError::EmptyImage);
        }
        if domain.len() > i32::MAX as usize {
            return Err(SicleError::DomainTooLarge(domain.len()));
        }
        if bands == 0 {
            return Err(SicleError::InvalidBandCount);
        }
        let expected = domain.len() * bands;
        if feats.len() != expected {
            return Err(SicleError::FeatureLengthMismatch {
                got: feats.len(),
                expected,
                spels: domain.len(),
                bands,
            });
        }
        Ok(Self {
            domain,
            bands,
            feats,
        })
    }

    /// Single-band convenience constructor.
    pub fn grayscale(domain: Domain, values: Vec<f32>) -> Result<Self> {
        Self::new(domain, 1, values)
    }

    #[inline]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    #[inline]
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Feature vector of a spel.
    #[inline]
    pub fn features(&self, v: usize) -> &[f32] {
        &self.feats[v * self.bands..(v + 1) * self.bands]
    }
}

/// Euclidean distance between two feature vectors, in double precision.
#[inline]
pub(crate) fn feature_distance(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Bitmap of spels eligible for segmentation.
///
/// Spels outside the region of interest never enter a forest and keep label 0
/// in the output.
#[derive(Debug, Clone)]
pub struct RegionOfInterest {
    mask: BitVec,
    eligible: usize,
}

impl RegionOfInterest {
    /// Build from a boolean mask covering the whole domain.
    pub fn from_mask(domain: &Domain, mask: &[bool]) -> Result<Self> {
        if mask.len() != domain.len() {
            return Err(SicleError::DimensionMismatch {
                what: "region of interest",
                got: mask.len(),
                expected: domain.len(),
            });
        }
        let mut bits = bitvec![0; mask.len()];
        let mut eligible = 0usize;
        for (i, &inside) in mask.iter().enumerate() {
            if inside {
                bits.set(i, true);
                eligible += 1;
            }
        }
        if eligible == 0 {
            return Err(SicleError::EmptyRoi);
        }
        Ok(Self {
            mask: bits,
            eligible,
        })
    }

    /// Whether a spel is eligible.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.mask[v]
    }

    /// Number of eligible spels.
    #[inline]
    pub fn len(&self) -> usize {
        self.eligible
    }

    pub fn is_empty(&self) -> bool {
        self.eligible == 0
    }
}

/// Eligibility test that treats an absent mask as all-eligible.
#[inline]
pub(crate) fn in_roi(roi: Option<&RegionOfInterest>, v: usize) -> bool {
    roi.map_or(true, |r| r.contains(v))
}

/// Object saliency normalised to [0, 1].
#[derive(Debug, Clone)]
pub struct Saliency {
    values: Vec<f32>,
}

impl Saliency {
    /// Normalise an integer saliency map by its maximum.
    ///
    /// Returns `None` when the map is identically zero: a flat map carries no
    /// object evidence and the engine treats saliency as absent.
    pub fn from_integers(domain: &Domain, raw: &[u32]) -> Result<Option<Self>> {
        if raw.len() != domain.len() {
            return Err(SicleError::DimensionMismatch {
                what: "saliency map",
                got: raw.len(),
                expected: domain.len(),
            });
        }
        let max = raw.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return Ok(None);
        }
        let max = max as f32;
        let values = raw.par_iter().map(|&s| s as f32 / max).collect();
        Ok(Some(Self { values }))
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
