//! Engine configuration.
//!
//! Static limits the engine applies when it is prepared and when it checks
//! crossover frequencies. Parameter defaults live with the parameters.
//!
//! # Example
//!
//! ```ignore
//! use bandsplit::EngineConfig;
//!
//! pub static CONFIG: EngineConfig = EngineConfig::new()
//!     .with_max_delay_seconds(4.0)
//!     .with_gain_ramp_ms(10.0);
//! ```

/// Engine limits and timing constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Length of each band's delay buffer in seconds.
    pub max_delay_seconds: f64,

    /// Lowest crossover frequency accepted.
    pub min_crossover_hz: f64,

    /// Highest crossover frequency accepted, before the Nyquist limit.
    pub max_crossover_hz: f64,

    /// Crossovers must stay below `nyquist_margin * sample_rate`.
    pub nyquist_margin: f64,

    /// Time for dry/wet gain changes to ramp in.
    pub gain_ramp_ms: f64,
}

impl EngineConfig {
    /// The default configuration.
    pub const DEFAULT: EngineConfig = EngineConfig::new();

    /// Create a configuration with default values.
    pub const fn new() -> Self {
        Self {
            max_delay_seconds: 2.0,
            min_crossover_hz: 20.0,
            max_crossover_hz: 20000.0,
            nyquist_margin: 0.45,
            gain_ramp_ms: 20.0,
        }
    }

    /// Set the delay buffer length in seconds.
    pub const fn with_max_delay_seconds(mut self, seconds: f64) -> Self {
        self.max_delay_seconds = seconds;
        self
    }

    /// Set the accepted crossover range.
    pub const fn with_crossover_range(mut self, min_hz: f64, max_hz: f64) -> Self {
        self.min_crossover_hz = min_hz;
        self.max_crossover_hz = max_hz;
        self
    }

    /// Set the fraction of the sample rate crossovers must stay below.
    pub const fn with_nyquist_margin(mut self, margin: f64) -> Self {
        self.nyquist_margin = margin;
        self
    }

    /// Set the dry/wet gain ramp time.
    pub const fn with_gain_ramp_ms(mut self, ms: f64) -> Self {
        self.gain_ramp_ms = ms;
        self
    }

    /// Delay buffer length in frames at `sample_rate`.
    pub fn delay_buffer_frames(&self, sample_rate: f64) -> usize {
        (self.max_delay_seconds * sample_rate).max(0.0) as usize
    }

    /// Highest crossover accepted at `sample_rate`.
    pub fn crossover_ceiling(&self, sample_rate: f64) -> f64 {
        self.max_crossover_hz.min(self.nyquist_margin * sample_rate)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.delay_buffer_frames(48000.0), 96000);
        assert_eq!(config.delay_buffer_frames(44100.0), 88200);
        assert_eq!(config.crossover_ceiling(48000.0), 20000.0);
        assert_eq!(config.crossover_ceiling(22050.0), 0.45 * 22050.0);
    }

    #[test]
    fn test_builder() {
        const CUSTOM: EngineConfig = EngineConfig::new()
            .with_max_delay_seconds(1.0)
            .with_crossover_range(40.0, 16000.0)
            .with_gain_ramp_ms(5.0);
        assert_eq!(CUSTOM.delay_buffer_frames(1000.0), 1000);
        assert_eq!(CUSTOM.min_crossover_hz, 40.0);
        assert_eq!(CUSTOM.crossover_ceiling(96000.0), 16000.0);
        assert_eq!(CUSTOM.gain_ramp_ms, 5.0);
    }
}
