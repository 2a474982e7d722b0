//! Transport and process context.
//!
//! [`Transport`] carries what the host knows about tempo and playback;
//! [`ProcessContext`] bundles it with the sample rate and block size for one
//! `process()` call.
//!
//! # Example: Tempo-Synced Delay
//!
//! ```ignore
//! fn process(&mut self, buffer: &mut Buffer, context: &ProcessContext) {
//!     let delay = match context.samples_per_beat() {
//!         Some(spb) => (spb * 0.5).round() as usize, // eighth note
//!         None => 0,                                  // no tempo, no echo
//!     };
//!     // ...
//! }
//! ```

// =============================================================================
// Transport Struct
// =============================================================================

/// Host transport and timing information.
///
/// The tempo is an `Option` because not every host provides one. Go through
/// [`valid_tempo`](Self::valid_tempo) before timing anything with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transport {
    /// Current tempo in BPM.
    pub tempo: Option<f64>,
}

impl Transport {
    /// Transport reporting only a tempo.
    #[inline]
    pub fn with_tempo(tempo: f64) -> Self {
        Self { tempo: Some(tempo) }
    }

    /// The tempo if it is usable for timing: present, finite and positive.
    #[inline]
    pub fn valid_tempo(&self) -> Option<f64> {
        self.tempo.filter(|bpm| bpm.is_finite() && *bpm > 0.0)
    }
}

// =============================================================================
// ProcessContext Struct
// =============================================================================

/// Processing context for a single `process()` call.
///
/// `Copy`, and only meaningful for the block it was created for.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext {
    /// Current sample rate in Hz.
    pub sample_rate: f64,

    /// Number of samples in this block.
    pub num_samples: usize,

    /// Host transport and timing information.
    pub transport: Transport,
}

impl ProcessContext {
    /// Create a context.
    #[inline]
    pub fn new(sample_rate: f64, num_samples: usize, transport: Transport) -> Self {
        Self {
            sample_rate,
            num_samples,
            transport,
        }
    }

    /// Create a context without transport information.
    #[inline]
    pub fn with_empty_transport(sample_rate: f64, num_samples: usize) -> Self {
        Self::new(sample_rate, num_samples, Transport::default())
    }

    /// Samples per quarter note at the current tempo.
    ///
    /// `None` if the tempo is missing or unusable.
    #[inline]
    pub fn samples_per_beat(&self) -> Option<f64> {
        self.transport
            .valid_tempo()
            .map(|tempo| self.sample_rate * 60.0 / tempo)
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::with_empty_transport(44100.0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_samples_per_beat() {
        let context = ProcessContext::new(48000.0, 512, Transport::with_tempo(120.0));
        assert_relative_eq!(context.samples_per_beat().unwrap(), 24000.0);
    }

    #[test]
    fn test_invalid_tempo_is_none() {
        for bpm in [0.0, -90.0, f64::NAN, f64::INFINITY] {
            let context = ProcessContext::new(48000.0, 64, Transport::with_tempo(bpm));
            assert!(context.samples_per_beat().is_none(), "bpm {bpm}");
        }
        assert!(ProcessContext::default().samples_per_beat().is_none());
    }
}
