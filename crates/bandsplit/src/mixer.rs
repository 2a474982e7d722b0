//! Dry/wet gain stage and band recombination.

use bandsplit_core::{AudioBlock, Smoother, SmoothingStyle};

use crate::band::Band;

/// Per-band dry and wet gains, summed back into one signal.
///
/// Gains are smoothed linearly so automation never steps. The per-sample
/// gain curves are computed once per block in [`begin_block`](Self::begin_block)
/// and shared by every channel.
#[derive(Debug, Clone)]
pub struct BandMixer {
    dry: [Smoother; Band::COUNT],
    wet: [Smoother; Band::COUNT],
    // One row per band
    dry_curve: AudioBlock,
    wet_curve: AudioBlock,
}

impl BandMixer {
    /// Create a mixer whose gains start settled at the given values.
    pub fn new(
        sample_rate: f64,
        max_block_size: usize,
        ramp_ms: f64,
        dry: [f64; Band::COUNT],
        wet: [f64; Band::COUNT],
    ) -> Self {
        let smoother = |value: f64| {
            let mut s = Smoother::new(SmoothingStyle::Linear(ramp_ms));
            s.set_sample_rate(sample_rate);
            s.reset(value);
            s
        };
        Self {
            dry: dry.map(smoother),
            wet: wet.map(smoother),
            dry_curve: AudioBlock::new(Band::COUNT, max_block_size),
            wet_curve: AudioBlock::new(Band::COUNT, max_block_size),
        }
    }

    /// Set the gains to ramp toward.
    pub fn set_targets(&mut self, dry: [f64; Band::COUNT], wet: [f64; Band::COUNT]) {
        for band in Band::ALL {
            let i = band.index();
            self.dry[i].set_target(dry[i]);
            self.wet[i].set_target(wet[i]);
        }
    }

    /// Jump straight to the target gains.
    pub fn settle(&mut self) {
        for s in self.dry.iter_mut().chain(self.wet.iter_mut()) {
            let target = s.target();
            s.reset(target);
        }
    }

    /// Compute this block's gain curves.
    ///
    /// # Panics
    ///
    /// Panics if `num_samples` exceeds the prepared block size.
    pub fn begin_block(&mut self, num_samples: usize) {
        self.dry_curve.set_len(num_samples);
        self.wet_curve.set_len(num_samples);
        for i in 0..Band::COUNT {
            self.dry[i].fill_f32(self.dry_curve.channel_mut(i));
            self.wet[i].fill_f32(self.wet_curve.channel_mut(i));
        }
    }

    /// Overwrite `output` with the gain-weighted sum of every band's dry
    /// and wet signal.
    pub fn mix_channel(
        &self,
        output: &mut [f32],
        dry: [&[f32]; Band::COUNT],
        wet: [&[f32]; Band::COUNT],
    ) {
        let n = output.len();
        output.fill(0.0);
        for i in 0..Band::COUNT {
            let dry_gain = &self.dry_curve.channel(i)[..n];
            let wet_gain = &self.wet_curve.channel(i)[..n];
            for (s, out) in output.iter_mut().enumerate() {
                *out += dry[i][s] * dry_gain[s] + wet[i][s] * wet_gain[s];
            }
        }
    }

    /// Current (dry, wet) gain of a band.
    pub fn gains(&self, band: Band) -> (f64, f64) {
        let i = band.index();
        (self.dry[i].current(), self.wet[i].current())
    }
}
