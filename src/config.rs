//! Centralized configuration for the SICLE engine.
//!
//! This module contains the default parametrization and numeric constants
//! used throughout the crate to ensure consistency and ease of modification.

// --- Default parametrization ---

/// Default requested number of oversampled seeds (N0).
pub const DEFAULT_N0: usize = 3000;

/// Default final number of superspels (Nf).
pub const DEFAULT_NF: usize = 200;

/// Default maximum number of iterations when no user schedule is given.
pub const DEFAULT_MAX_ITERS: usize = 5;

/// Default irregularity factor (omega) for the fsum connectivity function.
pub const DEFAULT_IRREGULARITY: f32 = 0.12;

/// Default boundary-adherence exponent for the fsum connectivity function.
pub const DEFAULT_ADHERENCE: u32 = 12;

/// Default saliency weight (alpha) in both connectivity functions.
pub const DEFAULT_ALPHA: f32 = 0.0;

/// Default stream seed for the random oversampler. The stream is always a
/// parameter of the run, never process-global state, so two runs with the
/// same seed produce identical segmentations.
pub const DEFAULT_RNG_SEED: u64 = 42;

// --- Hard bounds ---

/// Minimum admissible final superspel count.
pub const MIN_FINAL_REGIONS: usize = 2;

/// Minimum admissible iteration count.
pub const MIN_ITERATIONS: usize = 2;
