//! Processor lifecycle traits.
//!
//! Processing follows a two-phase lifecycle that keeps sample-rate dependent
//! state out of the unprepared type:
//!
//! ```text
//!   Plugin (unprepared, parameters only)
//!      |
//!      v  Plugin::prepare(AudioSetup)
//!      |
//!   AudioProcessor (buffers allocated, ready for audio)
//!      |
//!      v  AudioProcessor::unprepare()
//!      |
//!   Plugin (unprepared, parameters preserved)
//! ```
//!
//! `prepare` is where allocation and validation happen. `process` must then
//! run without allocating, locking or failing.

use crate::buffer::Buffer;
use crate::error::{EngineError, EngineResult};
use crate::parameters::Parameters;
use crate::process_context::ProcessContext;
use crate::types::MAX_CHANNELS;

// =============================================================================
// AudioSetup
// =============================================================================

/// Host configuration delivered on prepare.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioSetup {
    /// Sample rate in Hz (e.g., 44100.0, 48000.0, 96000.0)
    pub sample_rate: f64,
    /// Maximum number of samples per process() call
    pub max_buffer_size: usize,
    /// Number of channels the processor will see
    pub channel_count: usize,
}

impl AudioSetup {
    /// Create a setup.
    pub const fn new(sample_rate: f64, max_buffer_size: usize, channel_count: usize) -> Self {
        Self {
            sample_rate,
            max_buffer_size,
            channel_count,
        }
    }

    /// Stereo setup.
    pub const fn stereo(sample_rate: f64, max_buffer_size: usize) -> Self {
        Self::new(sample_rate, max_buffer_size, 2)
    }

    /// Check the values a processor can never work with.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_buffer_size == 0 {
            return Err(EngineError::InvalidBlockSize(self.max_buffer_size));
        }
        if self.channel_count == 0 || self.channel_count > MAX_CHANNELS {
            return Err(EngineError::InvalidChannelCount {
                requested: self.channel_count,
                max: MAX_CHANNELS,
            });
        }
        Ok(())
    }
}

// =============================================================================
// HasParameters
// =============================================================================

/// Access to a parameter collection, shared by both lifecycle states.
pub trait HasParameters: Send + 'static {
    /// The parameter collection type.
    type Parameters: Parameters;

    /// Returns the parameters.
    fn parameters(&self) -> &Self::Parameters;
}

// =============================================================================
// Plugin / AudioProcessor
// =============================================================================

/// Unprepared state. Holds parameters and nothing sample-rate dependent.
pub trait Plugin: HasParameters + Default {
    /// The prepared processor type created by [`Plugin::prepare()`].
    type Processor: AudioProcessor<Plugin = Self, Parameters = Self::Parameters>;

    /// Consume the plugin and allocate everything `process` needs.
    fn prepare(self, setup: AudioSetup) -> EngineResult<Self::Processor>;
}

/// Prepared state, driven by the audio thread.
pub trait AudioProcessor: HasParameters {
    /// The unprepared type this processor returns to.
    type Plugin: Plugin<Processor = Self, Parameters = Self::Parameters>;

    /// Process one block.
    ///
    /// Must be real-time safe: no allocation, no locks, no unbounded work.
    fn process(&mut self, buffer: &mut Buffer, context: &ProcessContext);

    /// Drop DSP state and return to the unprepared plugin, keeping parameters.
    fn unprepare(self) -> Self::Plugin
    where
        Self: Sized;

    /// Called on activation changes. Activation should clear DSP state.
    fn set_active(&mut self, _active: bool) {}

    /// Samples of output produced after input stops. 0 = no tail.
    fn tail_samples(&self) -> u32 {
        0
    }

    /// Processing latency in samples.
    fn latency_samples(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_common_setups() {
        assert!(AudioSetup::stereo(44100.0, 512).validate().is_ok());
        assert!(AudioSetup::new(96000.0, 1, 1).validate().is_ok());
        assert!(AudioSetup::new(48000.0, 4096, MAX_CHANNELS).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_setups() {
        assert_eq!(
            AudioSetup::stereo(0.0, 512).validate(),
            Err(EngineError::InvalidSampleRate(0.0))
        );
        assert!(matches!(
            AudioSetup::stereo(f64::NAN, 512).validate(),
            Err(EngineError::InvalidSampleRate(_))
        ));
        assert_eq!(
            AudioSetup::stereo(48000.0, 0).validate(),
            Err(EngineError::InvalidBlockSize(0))
        );
        assert_eq!(
            AudioSetup::new(48000.0, 512, MAX_CHANNELS + 1).validate(),
            Err(EngineError::InvalidChannelCount {
                requested: MAX_CHANNELS + 1,
                max: MAX_CHANNELS
            })
        );
    }
}
