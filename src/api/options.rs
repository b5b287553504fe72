//! User-facing configuration for a segmentation run.
//!
//! Options are plain data plus the four policy selections. Validation runs
//! before any forest state is allocated, so an invalid configuration never
//! mutates anything.

use crate::config;
use crate::conn::Connectivity;
use crate::error::{Result, SicleError};
use crate::relevance::{Criterion, Penalty};
use crate::sampling::Sampling;

/// Configuration of a SICLE run.
#[derive(Debug, Clone)]
pub struct SicleOptions {
    /// Use 8- (2D) / 26- (3D) adjacency instead of 4-/6-.
    pub use_diag: bool,
    /// Recompute differentially from the second iteration onward.
    pub use_dift: bool,
    /// Requested initial seed count (N0). Grid sampling may realise slightly
    /// fewer seeds.
    pub n0: usize,
    /// Final superspel count (Nf). Must be below `n0`.
    pub nf: usize,
    /// Iteration budget used to derive the geometric schedule when `user_ni`
    /// is absent.
    pub max_iters: usize,
    /// User-defined intermediary seed counts, strictly decreasing and
    /// strictly inside `]nf, n0[`.
    pub user_ni: Option<Vec<usize>>,
    /// Saliency weight in the connectivity functions.
    pub alpha: f32,
    /// Irregularity factor (omega) of the fsum connectivity function.
    pub irreg: f32,
    /// Boundary-adherence exponent of the fsum connectivity function.
    pub adherence: u32,
    /// Stream seed for the random oversampler.
    pub rng_seed: u64,
    /// Seed oversampling policy.
    pub sampling: Sampling,
    /// Path-cost function.
    pub connectivity: Connectivity,
    /// Relevance criterion (V term).
    pub criterion: Criterion,
    /// Saliency penalty (P term). Anything but `None` requires a saliency
    /// map.
    pub penalty: Penalty,
}

impl Default for SicleOptions {
    fn default() -> Self {
        Self {
            use_diag: true,
            use_dift: true,
            n0: config::DEFAULT_N0,
            nf: config::DEFAULT_NF,
            max_iters: config::DEFAULT_MAX_ITERS,
            user_ni: None,
            alpha: config::DEFAULT_ALPHA,
            irreg: config::DEFAULT_IRREGULARITY,
            adherence: config::DEFAULT_ADHERENCE,
            rng_seed: config::DEFAULT_RNG_SEED,
            sampling: Sampling::Random,
            connectivity: Connectivity::Fmax,
            criterion: Criterion::MinContrast,
            penalty: Penalty::None,
        }
    }
}

impl SicleOptions {
    /// Check every bound against the engine's inputs. `num_vertices` is the
    /// eligible spel count (the whole domain when no ROI was given).
    pub(crate) fn validate(
        &self,
        num_vertices: usize,
        roi_present: bool,
        has_saliency: bool,
    ) -> Result<()> {
        if self.n0 <= 2 || self.n0 >= num_vertices {
            if roi_present && self.n0 >= num_vertices {
                return Err(SicleError::RoiExhausted {
                    requested: self.n0,
                    available: num_vertices,
                });
            }
            return Err(SicleError::InvalidSeedCount {
                n0: self.n0,
                num_vertices,
            });
        }
        if self.nf < config::MIN_FINAL_REGIONS || self.nf >= self.n0 {
            return Err(SicleError::InvalidFinalCount {
                nf: self.nf,
                n0: self.n0,
            });
        }
        if self.max_iters < config::MIN_ITERATIONS {
            return Err(SicleError::InvalidMaxIters(self.max_iters));
        }
        if self.irreg < 0.0 || self.irreg.is_nan() {
            return Err(SicleError::InvalidIrregularity(self.irreg));
        }
        if self.alpha < 0.0 || self.alpha.is_nan() {
            return Err(SicleError::InvalidAlpha(self.alpha));
        }

        if let Some(user_ni) = &self.user_ni {
            if user_ni.is_empty() {
                return Err(SicleError::InvalidSchedule(
                    "intermediary schedule is empty".into(),
                ));
            }
            if user_ni[0] >= self.n0 || *user_ni.last().unwrap() <= self.nf {
                return Err(SicleError::InvalidSchedule(format!(
                    "intermediary counts must lie strictly inside ]{}, {}[",
                    self.nf, self.n0
                )));
            }
            if user_ni.windows(2).any(|w| w[0] <= w[1]) {
                return Err(SicleError::InvalidSchedule(
                    "intermediary counts must be strictly decreasing".into(),
                ));
            }
        }

        if self.penalty.requires_saliency() && !has_saliency {
            return Err(SicleError::PenaltyWithoutSaliency);
        }
        Ok(())
    }
}
