//! Error types for the SICLE segmentation engine

/// Error types for the SICLE segmentation engine
#[derive(Debug, thiserror::Error)]
pub enum SicleError {
    /// Initial seed count outside the open interval ]2, |V|[
    #[error("invalid initial seed count {n0}: must lie in ]2, {num_vertices}[")]
    InvalidSeedCount { n0: usize, num_vertices: usize },

    /// Final superspel count outside [2, n0[
    #[error("invalid final superspel count {nf}: must lie in [2, {n0}[")]
    InvalidFinalCount { nf: usize, n0: usize },

    /// Fewer than two iterations requested
    #[error("invalid iteration count {0}: at least 2 iterations are required")]
    InvalidMaxIters(usize),

    /// Negative (or non-finite) irregularity factor for fsum
    #[error("invalid irregularity factor {0}: must be >= 0")]
    InvalidIrregularity(f32),

    /// Negative (or non-finite) saliency weight
    #[error("invalid saliency weight {0}: must be >= 0")]
    InvalidAlpha(f32),

    /// User-supplied Ni schedule violates the bracket or monotonicity rules
    #[error("invalid seed schedule: {0}")]
    InvalidSchedule(String),

    /// A saliency penalty was selected but no saliency map was provided
    #[error("saliency penalty requires a saliency map")]
    PenaltyWithoutSaliency,

    /// Grid sampling stride fell below one spel along an axis
    #[error("excessive seed count: grid stride below one spel along the {axis} axis")]
    ExcessiveSeeds { axis: char },

    /// Auxiliary plane does not match the image domain
    #[error("dimension mismatch: {what} holds {got} spels, image domain holds {expected}")]
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// Feature buffer length disagrees with domain and band count
    #[error("feature buffer holds {got} values, expected {expected} ({spels} spels x {bands} bands)")]
    FeatureLengthMismatch {
        got: usize,
        expected: usize,
        spels: usize,
        bands: usize,
    },

    /// Image with zero bands
    #[error("feature image must carry at least one band")]
    InvalidBandCount,

    /// Empty spatial domain
    #[error("image domain is empty")]
    EmptyImage,

    /// Domain exceeds the addressable vertex range of the forest maps
    #[error("domain of {0} spels exceeds the supported maximum of {max}", max = i32::MAX)]
    DomainTooLarge(usize),

    /// Region of interest with no eligible spel
    #[error("region of interest selects no spel")]
    EmptyRoi,

    /// Region of interest cannot hold the requested number of distinct seeds
    #[error("region of interest holds {available} eligible spels, cannot sample {requested} distinct seeds")]
    RoiExhausted { requested: usize, available: usize },

    /// Sampling produced too few seeds to ever reach nf superspels
    #[error("degenerate sampling: {sampled} seeds cannot be reduced to {nf} superspels")]
    DegenerateSampling { sampled: usize, nf: usize },

    /// A custom sampler returned an invalid seed set
    #[error("custom sampler returned an invalid seed set: {0}")]
    InvalidCustomSeeds(String),

    /// The embedder requested cancellation between iterations
    #[error("segmentation cancelled")]
    Cancelled,
}

/// Convenience Result type for SICLE operations
pub type Result<T> = std::result::Result<T, SicleError>;
