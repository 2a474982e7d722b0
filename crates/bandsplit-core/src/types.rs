//! Common types used throughout bandsplit.

// =============================================================================
// Audio Buffer Limits
// =============================================================================
//
// Upper bounds for pre-allocated audio storage. `prepare` rejects channel
// counts above these limits so that `process` never has to grow anything.
// =============================================================================

/// Maximum number of audio channels per block.
///
/// Covers mono, stereo and common surround layouts. `Buffer` uses this as
/// its fixed stack capacity, so it is also the hard ceiling accepted by
/// `prepare`.
pub const MAX_CHANNELS: usize = 32;

/// Parameter identifier.
pub type ParameterId = u32;

/// Parameter value (normalized 0.0 to 1.0).
pub type ParameterValue = f64;

/// Smallest magnitude kept in recursive filter state.
///
/// Anything below this is flushed to zero so decaying filter tails never
/// fall into the denormal range.
pub const DENORMAL_THRESHOLD: f32 = 1.0e-20;

/// Flush a value to zero if it is small enough to become denormal.
#[inline(always)]
pub fn flush_denormal(value: f32) -> f32 {
    if value.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        value
    }
}
