//! The band-split delay processor.
//!
//! [`BandSplitDelay`] is the unprepared engine: parameters, configuration
//! and diagnostics, nothing that depends on the sample rate.
//! [`Plugin::prepare`] turns it into a [`BandSplitProcessor`] with every
//! buffer allocated, and [`AudioProcessor::unprepare`] turns it back.
//!
//! Each block runs, synchronously:
//!
//! 1. clear outputs that have no matching input
//! 2. read parameters and tempo
//! 3. update crossover cutoffs
//! 4. split every channel into low, mid and high
//! 5. keep a dry copy of each band
//! 6. write, delayed-add and re-write each band through its delay line
//! 7. mix dry and wet bands into the output
//! 8. advance the shared write cursor

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bandsplit_core::{
    AudioBlock, AudioProcessor, AudioSetup, Buffer, EngineError, EngineResult, HasParameters,
    Plugin, ProcessContext,
};

use crate::band::Band;
use crate::config::EngineConfig;
use crate::crossover::{CrossoverFilterBank, CrossoverUpdate};
use crate::delay_line::{DelayLine, GainRamp, WriteCursor};
use crate::mixer::BandMixer;
use crate::parameters::BandSplitParameters;
use crate::tempo_sync;

// =============================================================================
// EngineStats
// =============================================================================

/// Lock-free counters for conditions the audio thread handles silently.
///
/// Shared through an `Arc`, so a host can read them while processing runs.
#[derive(Debug, Default)]
pub struct EngineStats {
    blocks_processed: AtomicU64,
    crossover_rejections: AtomicU64,
    tempo_fallbacks: AtomicU64,
}

impl EngineStats {
    /// Blocks processed since creation.
    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed.load(Ordering::Relaxed)
    }

    /// Blocks that ran with a rejected crossover pair.
    pub fn crossover_rejections(&self) -> u64 {
        self.crossover_rejections.load(Ordering::Relaxed)
    }

    /// Blocks that ran without a usable tempo, and so without echoes.
    pub fn tempo_fallbacks(&self) -> u64 {
        self.tempo_fallbacks.load(Ordering::Relaxed)
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// =============================================================================
// BandSplitDelay - unprepared state
// =============================================================================

/// Unprepared band-split delay.
#[derive(Debug, Clone)]
pub struct BandSplitDelay {
    parameters: Arc<BandSplitParameters>,
    config: EngineConfig,
    stats: Arc<EngineStats>,
}

impl BandSplitDelay {
    /// Engine with default parameters and configuration.
    pub fn new() -> Self {
        Self::with_parameters(Arc::new(BandSplitParameters::default()))
    }

    /// Engine bound to an existing parameter object.
    pub fn with_parameters(parameters: Arc<BandSplitParameters>) -> Self {
        Self {
            parameters,
            config: EngineConfig::DEFAULT,
            stats: Arc::new(EngineStats::default()),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared handle to the parameters, for automation or UI threads.
    pub fn parameters_handle(&self) -> Arc<BandSplitParameters> {
        Arc::clone(&self.parameters)
    }

    /// Shared handle to the diagnostic counters.
    pub fn stats(&self) -> Arc<EngineStats> {
        Arc::clone(&self.stats)
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for BandSplitDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl HasParameters for BandSplitDelay {
    type Parameters = BandSplitParameters;

    fn parameters(&self) -> &BandSplitParameters {
        &self.parameters
    }
}

impl Plugin for BandSplitDelay {
    type Processor = BandSplitProcessor;

    fn prepare(self, setup: AudioSetup) -> EngineResult<BandSplitProcessor> {
        BandSplitProcessor::build(self.parameters, self.config, self.stats, setup)
    }
}

// =============================================================================
// BandSplitProcessor - prepared state
// =============================================================================

/// Prepared band-split delay, ready for the audio thread.
#[derive(Debug)]
pub struct BandSplitProcessor {
    parameters: Arc<BandSplitParameters>,
    config: EngineConfig,
    stats: Arc<EngineStats>,
    setup: AudioSetup,

    filters: CrossoverFilterBank,
    /// Band signals, delayed in place
    bands: [AudioBlock; Band::COUNT],
    /// Band signals before the delay
    dry: [AudioBlock; Band::COUNT],
    delay_lines: [DelayLine; Band::COUNT],
    cursor: WriteCursor,
    mixer: BandMixer,
    /// Feedback gain the previous block ended on
    feedback_gain: f32,
}

impl BandSplitProcessor {
    fn build(
        parameters: Arc<BandSplitParameters>,
        config: EngineConfig,
        stats: Arc<EngineStats>,
        setup: AudioSetup,
    ) -> EngineResult<Self> {
        if let Err(e) = setup.validate() {
            log::warn!("rejected audio setup {:?}: {}", setup, e);
            return Err(e);
        }

        let frames = config.delay_buffer_frames(setup.sample_rate);
        if frames <= setup.max_buffer_size {
            let e = EngineError::DelayBufferTooSmall {
                frames,
                block_size: setup.max_buffer_size,
            };
            log::warn!("rejected audio setup {:?}: {}", setup, e);
            return Err(e);
        }

        let channels = setup.channel_count;
        let block = || AudioBlock::new(channels, setup.max_buffer_size);

        let filters = CrossoverFilterBank::new(
            channels,
            setup.sample_rate,
            &config,
            parameters.low_mid_crossover.get(),
            parameters.mid_high_crossover.get(),
        );
        let mixer = BandMixer::new(
            setup.sample_rate,
            setup.max_buffer_size,
            config.gain_ramp_ms,
            Band::ALL.map(|band| parameters.dry_gain(band)),
            Band::ALL.map(|band| parameters.wet_gain(band)),
        );
        let feedback_gain = parameters.feedback.get() as f32;

        log::debug!(
            "prepared bandsplit: {} Hz, {} channels, max block {}, delay buffer {} frames",
            setup.sample_rate,
            channels,
            setup.max_buffer_size,
            frames
        );
        let (low_mid, mid_high) = filters.crossovers();
        log::debug!("crossovers at {:.1} Hz / {:.1} Hz", low_mid, mid_high);
        report_stats(&stats);

        Ok(Self {
            parameters,
            config,
            stats,
            setup,
            filters,
            bands: [block(), block(), block()],
            dry: [block(), block(), block()],
            delay_lines: [
                DelayLine::new(channels, frames),
                DelayLine::new(channels, frames),
                DelayLine::new(channels, frames),
            ],
            cursor: WriteCursor::new(frames),
            mixer,
            feedback_gain,
        })
    }

    /// Re-prepare in place for a new host configuration.
    ///
    /// All DSP state is rebuilt. On error the processor is left unchanged.
    pub fn prepare(&mut self, setup: AudioSetup) -> EngineResult<()> {
        let rebuilt = Self::build(
            Arc::clone(&self.parameters),
            self.config,
            Arc::clone(&self.stats),
            setup,
        )?;
        *self = rebuilt;
        Ok(())
    }

    /// Setup this processor was prepared with.
    pub fn setup(&self) -> &AudioSetup {
        &self.setup
    }

    /// Current write position in the delay buffers.
    pub fn write_position(&self) -> usize {
        self.cursor.position()
    }

    /// Length of each delay buffer in frames.
    pub fn buffer_len(&self) -> usize {
        self.cursor.len()
    }

    /// Crossover pair in effect.
    pub fn crossovers(&self) -> (f64, f64) {
        self.filters.crossovers()
    }

    /// Shared handle to the diagnostic counters.
    pub fn stats(&self) -> Arc<EngineStats> {
        Arc::clone(&self.stats)
    }

    /// Clear delay buffers and filter state, and jump gains to their targets.
    pub fn reset(&mut self) {
        self.filters.reset();
        for line in &mut self.delay_lines {
            line.clear();
        }
        self.cursor.reset();
        self.mixer.set_targets(
            Band::ALL.map(|band| self.parameters.dry_gain(band)),
            Band::ALL.map(|band| self.parameters.wet_gain(band)),
        );
        self.mixer.settle();
        self.feedback_gain = self.parameters.feedback.get() as f32;
    }
}

impl HasParameters for BandSplitProcessor {
    type Parameters = BandSplitParameters;

    fn parameters(&self) -> &BandSplitParameters {
        &self.parameters
    }
}

impl AudioProcessor for BandSplitProcessor {
    type Plugin = BandSplitDelay;

    fn process(&mut self, buffer: &mut Buffer, context: &ProcessContext) {
        let n = buffer.num_samples();
        assert!(
            n <= self.setup.max_buffer_size,
            "block of {} samples exceeds prepared maximum {}",
            n,
            self.setup.max_buffer_size
        );
        let channels = buffer.num_input_channels().min(buffer.num_output_channels());
        assert!(
            channels <= self.setup.channel_count,
            "{} channels exceed prepared {}",
            channels,
            self.setup.channel_count
        );

        buffer.clear_outputs_from(channels);
        if n == 0 {
            return;
        }

        let parameters = &*self.parameters;
        let low_mid = parameters.low_mid_crossover.get();
        let mid_high = parameters.mid_high_crossover.get();
        let feedback = parameters.feedback.get() as f32;
        let dry_gains = Band::ALL.map(|band| parameters.dry_gain(band));
        let wet_gains = Band::ALL.map(|band| parameters.wet_gain(band));
        let delay = tempo_sync::delay_samples(
            parameters.delay_time.get(),
            context.samples_per_beat(),
            self.cursor.len(),
            self.setup.max_buffer_size,
        );
        if delay.is_none() {
            EngineStats::bump(&self.stats.tempo_fallbacks);
        }

        if self.filters.set_crossovers(low_mid, mid_high) == CrossoverUpdate::Rejected {
            EngineStats::bump(&self.stats.crossover_rejections);
        }

        for block in self.bands.iter_mut().chain(self.dry.iter_mut()) {
            block.set_len(n);
        }

        let ramp = GainRamp::new(self.feedback_gain, feedback, n);
        for ch in 0..channels {
            let [low, mid, high] = &mut self.bands;
            self.filters.split_channel(
                ch,
                buffer.input(ch),
                low.channel_mut(ch),
                mid.channel_mut(ch),
                high.channel_mut(ch),
            );

            for b in 0..Band::COUNT {
                self.dry[b]
                    .channel_mut(ch)
                    .copy_from_slice(self.bands[b].channel(ch));
                self.delay_lines[b].process(
                    ch,
                    &self.cursor,
                    delay,
                    self.bands[b].channel_mut(ch),
                    ramp,
                );
            }
        }
        self.feedback_gain = feedback;

        self.mixer.set_targets(dry_gains, wet_gains);
        self.mixer.begin_block(n);
        for ch in 0..channels {
            let dry = [
                self.dry[0].channel(ch),
                self.dry[1].channel(ch),
                self.dry[2].channel(ch),
            ];
            let wet = [
                self.bands[0].channel(ch),
                self.bands[1].channel(ch),
                self.bands[2].channel(ch),
            ];
            self.mixer.mix_channel(buffer.output(ch), dry, wet);
        }

        self.cursor.advance(n);
        EngineStats::bump(&self.stats.blocks_processed);
    }

    fn unprepare(self) -> BandSplitDelay {
        log::debug!(
            "unprepared bandsplit after {} blocks",
            self.stats.blocks_processed()
        );
        report_stats(&self.stats);
        BandSplitDelay {
            parameters: self.parameters,
            config: self.config,
            stats: self.stats,
        }
    }

    fn set_active(&mut self, active: bool) {
        if active {
            self.reset();
        }
    }

    fn tail_samples(&self) -> u32 {
        u32::try_from(self.cursor.len()).unwrap_or(u32::MAX)
    }
}

fn report_stats(stats: &EngineStats) {
    let rejections = stats.crossover_rejections();
    if rejections > 0 {
        log::warn!("{} blocks ran with a rejected crossover pair", rejections);
    }
    let fallbacks = stats.tempo_fallbacks();
    if fallbacks > 0 {
        log::debug!("{} blocks ran without a usable tempo", fallbacks);
    }
}
