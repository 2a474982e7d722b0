//! Error types for bandsplit.
//!
//! Only the prepare path can fail. Real-time processing never returns an
//! error: degenerate parameter values are clamped or ignored inline.

use thiserror::Error;

/// Errors raised while preparing the engine for a host configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    /// Maximum block size is zero.
    #[error("invalid maximum block size: {0} samples")]
    InvalidBlockSize(usize),

    /// Channel count is zero or exceeds the fixed buffer capacity.
    #[error("invalid channel count {requested} (supported: 1..={max})")]
    InvalidChannelCount {
        /// Channels requested by the host.
        requested: usize,
        /// Largest supported channel count.
        max: usize,
    },

    /// The delay buffer would not be longer than one block.
    #[error("delay buffer of {frames} frames must be longer than a block of {block_size} samples")]
    DelayBufferTooSmall {
        /// Frames the delay buffer would have.
        frames: usize,
        /// Maximum block size announced by the host.
        block_size: usize,
    },
}

/// Result type for bandsplit operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::InvalidSampleRate(-1.0).to_string(),
            "invalid sample rate: -1 Hz"
        );
        assert_eq!(
            EngineError::InvalidChannelCount { requested: 40, max: 32 }.to_string(),
            "invalid channel count 40 (supported: 1..=32)"
        );
    }
}
