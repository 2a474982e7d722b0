//! Three-band Linkwitz-Riley crossover.
//!
//! Each stage is a 4th-order Linkwitz-Riley filter built from two cascaded
//! 2nd-order topology-preserving state-variable sections. A low-pass and
//! high-pass pair at the same cutoff sums to the stage's all-pass response,
//! which is what lets the bands recombine with a flat magnitude.
//!
//! ```text
//!   input ─┬─ LP(f1) ── AP(f2) ─────────────────── low
//!          │
//!          └─ HP(f1) ─┬─ LP(f2) ────────────────── mid
//!                     └─ HP(f2) ────────────────── high
//!
//!   low + mid + high = AP(f2) · AP(f1) · input
//! ```
//!
//! The all-pass on the low path gives it the same phase rotation around
//! `f2` that the mid and high paths pick up from their split.

use std::f64::consts::{PI, SQRT_2};

use bandsplit_core::flush_denormal;

use crate::config::EngineConfig;

// =============================================================================
// LinkwitzRiley - one LR4 stage
// =============================================================================

/// Response of a [`LinkwitzRiley`] stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// 4th-order low-pass.
    Lowpass,
    /// 4th-order high-pass.
    Highpass,
    /// 2nd-order all-pass with the phase of the LP + HP sum.
    Allpass,
}

/// State of one channel: two integrators per 2nd-order section.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ChannelState {
    s1: f32,
    s2: f32,
    s3: f32,
    s4: f32,
}

impl ChannelState {
    fn flush_denormals(&mut self) {
        self.s1 = flush_denormal(self.s1);
        self.s2 = flush_denormal(self.s2);
        self.s3 = flush_denormal(self.s3);
        self.s4 = flush_denormal(self.s4);
    }
}

/// A Linkwitz-Riley filter stage with per-channel state.
///
/// Changing the cutoff only recomputes coefficients; the integrator state
/// carries over so sweeps stay continuous.
#[derive(Debug, Clone)]
pub struct LinkwitzRiley {
    kind: FilterKind,
    sample_rate: f64,
    cutoff_hz: f64,
    g: f32,
    h: f32,
    state: Vec<ChannelState>,
}

const R2: f32 = SQRT_2 as f32;

impl LinkwitzRiley {
    /// Create a stage for `num_channels` channels.
    pub fn new(kind: FilterKind, num_channels: usize, sample_rate: f64, cutoff_hz: f64) -> Self {
        let mut filter = Self {
            kind,
            sample_rate,
            cutoff_hz,
            g: 0.0,
            h: 1.0,
            state: vec![ChannelState::default(); num_channels],
        };
        filter.update_coefficients();
        filter
    }

    /// Filter response.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f64 {
        self.cutoff_hz
    }

    /// Move the cutoff. State is kept.
    pub fn set_cutoff(&mut self, cutoff_hz: f64) {
        if cutoff_hz != self.cutoff_hz {
            self.cutoff_hz = cutoff_hz;
            self.update_coefficients();
        }
    }

    /// Zero all channel state.
    pub fn reset(&mut self) {
        self.state.fill(ChannelState::default());
    }

    fn update_coefficients(&mut self) {
        let g = (PI * self.cutoff_hz / self.sample_rate).tan();
        self.g = g as f32;
        self.h = (1.0 / (1.0 + SQRT_2 * g + g * g)) as f32;
    }

    /// Filter one sample of `channel`.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, x: f32) -> f32 {
        let (g, h) = (self.g, self.h);
        let st = &mut self.state[channel];

        let y_h = (x - (R2 + g) * st.s1 - st.s2) * h;
        let y_b = g * y_h + st.s1;
        st.s1 = g * y_h + y_b;
        let y_l = g * y_b + st.s2;
        st.s2 = g * y_b + y_l;

        let input2 = match self.kind {
            FilterKind::Allpass => return y_l - R2 * y_b + y_h,
            FilterKind::Lowpass => y_l,
            FilterKind::Highpass => y_h,
        };

        let y_h2 = (input2 - (R2 + g) * st.s3 - st.s4) * h;
        let y_b2 = g * y_h2 + st.s3;
        st.s3 = g * y_h2 + y_b2;
        let y_l2 = g * y_b2 + st.s4;
        st.s4 = g * y_b2 + y_l2;

        match self.kind {
            FilterKind::Lowpass => y_l2,
            _ => y_h2,
        }
    }

    /// Filter a run of samples of `channel` in place.
    pub fn process_in_place(&mut self, channel: usize, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(channel, *sample);
        }
        self.state[channel].flush_denormals();
    }
}

// =============================================================================
// CrossoverFilterBank
// =============================================================================

/// Outcome of [`CrossoverFilterBank::set_crossovers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverUpdate {
    /// Same pair as before, nothing recomputed.
    Unchanged,
    /// New pair accepted.
    Applied,
    /// Pair rejected, previous pair still in effect.
    Rejected,
}

/// Splits a signal into low, mid and high bands.
#[derive(Debug, Clone)]
pub struct CrossoverFilterBank {
    lp1: LinkwitzRiley,
    hp1: LinkwitzRiley,
    lp2: LinkwitzRiley,
    hp2: LinkwitzRiley,
    ap2: LinkwitzRiley,
    low_mid_hz: f64,
    mid_high_hz: f64,
    min_hz: f64,
    max_hz: f64,
}

impl CrossoverFilterBank {
    /// Create a filter bank.
    ///
    /// If the requested pair is not valid at this sample rate, the bank starts
    /// from the widest valid pair instead; check with
    /// [`crossovers`](Self::crossovers).
    pub fn new(
        num_channels: usize,
        sample_rate: f64,
        config: &EngineConfig,
        low_mid_hz: f64,
        mid_high_hz: f64,
    ) -> Self {
        let min_hz = config.min_crossover_hz;
        let max_hz = config.crossover_ceiling(sample_rate);

        let (lo, hi) = if is_valid_pair(low_mid_hz, mid_high_hz, min_hz, max_hz) {
            (low_mid_hz, mid_high_hz)
        } else if min_hz < max_hz {
            (min_hz, max_hz)
        } else {
            // Sample rate too low for the configured range
            (sample_rate * 0.1, sample_rate * 0.2)
        };

        let stage = |kind, hz| LinkwitzRiley::new(kind, num_channels, sample_rate, hz);
        Self {
            lp1: stage(FilterKind::Lowpass, lo),
            hp1: stage(FilterKind::Highpass, lo),
            lp2: stage(FilterKind::Lowpass, hi),
            hp2: stage(FilterKind::Highpass, hi),
            ap2: stage(FilterKind::Allpass, hi),
            low_mid_hz: lo,
            mid_high_hz: hi,
            min_hz,
            max_hz,
        }
    }

    /// Crossover pair in effect, `(low_mid, mid_high)` in Hz.
    pub fn crossovers(&self) -> (f64, f64) {
        (self.low_mid_hz, self.mid_high_hz)
    }

    /// Check whether a pair would be accepted.
    pub fn accepts(&self, low_mid_hz: f64, mid_high_hz: f64) -> bool {
        is_valid_pair(low_mid_hz, mid_high_hz, self.min_hz, self.max_hz)
    }

    /// Request new crossover frequencies.
    ///
    /// Invalid pairs (crossed, equal, out of range, not finite) leave the
    /// previous pair in effect. Filter state is never reset.
    pub fn set_crossovers(&mut self, low_mid_hz: f64, mid_high_hz: f64) -> CrossoverUpdate {
        if low_mid_hz == self.low_mid_hz && mid_high_hz == self.mid_high_hz {
            return CrossoverUpdate::Unchanged;
        }
        if !self.accepts(low_mid_hz, mid_high_hz) {
            return CrossoverUpdate::Rejected;
        }

        self.lp1.set_cutoff(low_mid_hz);
        self.hp1.set_cutoff(low_mid_hz);
        self.lp2.set_cutoff(mid_high_hz);
        self.hp2.set_cutoff(mid_high_hz);
        self.ap2.set_cutoff(mid_high_hz);
        self.low_mid_hz = low_mid_hz;
        self.mid_high_hz = mid_high_hz;
        CrossoverUpdate::Applied
    }

    /// Split one channel of `input` into the three band slices.
    ///
    /// # Panics
    ///
    /// Panics if the band slices are shorter than `input`.
    pub fn split_channel(
        &mut self,
        channel: usize,
        input: &[f32],
        low: &mut [f32],
        mid: &mut [f32],
        high: &mut [f32],
    ) {
        let n = input.len();
        let (low, mid, high) = (&mut low[..n], &mut mid[..n], &mut high[..n]);

        low.copy_from_slice(input);
        self.lp1.process_in_place(channel, low);
        self.ap2.process_in_place(channel, low);

        mid.copy_from_slice(input);
        self.hp1.process_in_place(channel, mid);
        high.copy_from_slice(mid);
        self.lp2.process_in_place(channel, mid);
        self.hp2.process_in_place(channel, high);
    }

    /// Zero all filter state.
    pub fn reset(&mut self) {
        for stage in [
            &mut self.lp1,
            &mut self.hp1,
            &mut self.lp2,
            &mut self.hp2,
            &mut self.ap2,
        ] {
            stage.reset();
        }
    }
}

fn is_valid_pair(low_mid_hz: f64, mid_high_hz: f64, min_hz: f64, max_hz: f64) -> bool {
    low_mid_hz.is_finite()
        && mid_high_hz.is_finite()
        && low_mid_hz >= min_hz
        && mid_high_hz <= max_hz
        && low_mid_hz < mid_high_hz
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f64 = 48000.0;

    fn noise(len: usize, seed: u32) -> Vec<f32> {
        // xorshift, deterministic and dependency free
        let mut state = seed.max(1);
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }

    fn sine(len: usize, hz: f64) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * hz * i as f64 / FS).sin() as f32)
            .collect()
    }

    fn rms(samples: &[f32]) -> f64 {
        let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum / samples.len() as f64).sqrt()
    }

    fn split(bank: &mut CrossoverFilterBank, input: &[f32]) -> [Vec<f32>; 3] {
        let mut bands = [vec![0.0; input.len()], vec![0.0; input.len()], vec![0.0; input.len()]];
        let [low, mid, high] = &mut bands;
        bank.split_channel(0, input, low, mid, high);
        bands
    }

    #[test]
    fn test_lowpass_plus_highpass_is_allpass() {
        let input = noise(4096, 7);
        let mut lp = LinkwitzRiley::new(FilterKind::Lowpass, 1, FS, 1000.0);
        let mut hp = LinkwitzRiley::new(FilterKind::Highpass, 1, FS, 1000.0);
        let mut ap = LinkwitzRiley::new(FilterKind::Allpass, 1, FS, 1000.0);

        for &x in &input {
            let sum = lp.process_sample(0, x) + hp.process_sample(0, x);
            let reference = ap.process_sample(0, x);
            assert!((sum - reference).abs() < 1e-4, "{sum} vs {reference}");
        }
    }

    #[test]
    fn test_lowpass_attenuates_above_cutoff() {
        let mut lp = LinkwitzRiley::new(FilterKind::Lowpass, 1, FS, 200.0);
        let mut signal = sine(48000, 5000.0);
        lp.process_in_place(0, &mut signal);
        // LR4 rolls off 24 dB/oct; 5 kHz is almost 5 octaves above 200 Hz
        assert!(rms(&signal[24000..]) < 1e-3);
    }

    #[test]
    fn test_band_sum_reconstructs_through_allpass_chain() {
        let input = noise(8192, 42);
        let mut bank = CrossoverFilterBank::new(1, FS, &EngineConfig::DEFAULT, 500.0, 7000.0);
        let [low, mid, high] = split(&mut bank, &input);

        let mut ap1 = LinkwitzRiley::new(FilterKind::Allpass, 1, FS, 500.0);
        let mut ap2 = LinkwitzRiley::new(FilterKind::Allpass, 1, FS, 7000.0);

        for i in 0..input.len() {
            let reference = ap2.process_sample(0, ap1.process_sample(0, input[i]));
            let sum = low[i] + mid[i] + high[i];
            assert!((sum - reference).abs() < 1e-4, "sample {i}: {sum} vs {reference}");
        }
    }

    #[test]
    fn test_band_sum_preserves_energy() {
        let input = noise(48000, 3);
        let mut bank = CrossoverFilterBank::new(1, FS, &EngineConfig::DEFAULT, 300.0, 3000.0);
        let [low, mid, high] = split(&mut bank, &input);

        let sum: Vec<f32> = (0..input.len()).map(|i| low[i] + mid[i] + high[i]).collect();
        let ratio = rms(&sum) / rms(&input);
        assert!((ratio - 1.0).abs() < 0.02, "energy ratio {ratio}");
    }

    #[test]
    fn test_bands_route_by_frequency() {
        let mut bank = CrossoverFilterBank::new(1, FS, &EngineConfig::DEFAULT, 500.0, 7000.0);
        for (hz, dominant) in [(60.0, 0), (2000.0, 1), (15000.0, 2)] {
            bank.reset();
            let bands = split(&mut bank, &sine(24000, hz));
            let levels: Vec<f64> = bands.iter().map(|b| rms(&b[12000..])).collect();
            for (i, level) in levels.iter().enumerate() {
                if i != dominant {
                    assert!(levels[dominant] > 4.0 * level, "{hz} Hz: {levels:?}");
                }
            }
        }
    }

    #[test]
    fn test_split_is_block_size_independent() {
        let input = noise(2048, 11);
        let mut whole = CrossoverFilterBank::new(1, FS, &EngineConfig::DEFAULT, 500.0, 7000.0);
        let expected = split(&mut whole, &input);

        let mut chunked = CrossoverFilterBank::new(1, FS, &EngineConfig::DEFAULT, 500.0, 7000.0);
        let mut offset = 0;
        for chunk in input.chunks(300) {
            let bands = split(&mut chunked, chunk);
            for b in 0..3 {
                for (i, &s) in bands[b].iter().enumerate() {
                    assert_eq!(s, expected[b][offset + i]);
                }
            }
            offset += chunk.len();
        }
    }

    #[test]
    fn test_invalid_pairs_keep_previous() {
        let mut bank = CrossoverFilterBank::new(2, FS, &EngineConfig::DEFAULT, 500.0, 7000.0);

        for (lo, hi) in [
            (7000.0, 500.0),
            (1000.0, 1000.0),
            (10.0, 7000.0),
            (500.0, 22000.0),
            (f64::NAN, 7000.0),
            (500.0, f64::INFINITY),
        ] {
            assert_eq!(bank.set_crossovers(lo, hi), CrossoverUpdate::Rejected, "{lo}/{hi}");
            assert_eq!(bank.crossovers(), (500.0, 7000.0));
        }

        assert_eq!(bank.set_crossovers(500.0, 7000.0), CrossoverUpdate::Unchanged);
        assert_eq!(bank.set_crossovers(250.0, 4000.0), CrossoverUpdate::Applied);
        assert_eq!(bank.crossovers(), (250.0, 4000.0));
    }

    #[test]
    fn test_nyquist_margin_limits_upper_crossover() {
        // 0.45 * 22050 = 9922.5 Hz
        let mut bank = CrossoverFilterBank::new(1, 22050.0, &EngineConfig::DEFAULT, 500.0, 7000.0);
        assert_eq!(bank.set_crossovers(500.0, 12000.0), CrossoverUpdate::Rejected);
        assert_eq!(bank.set_crossovers(500.0, 9000.0), CrossoverUpdate::Applied);
    }

    #[test]
    fn test_invalid_initial_pair_falls_back() {
        let bank = CrossoverFilterBank::new(1, 22050.0, &EngineConfig::DEFAULT, 500.0, 15000.0);
        assert_eq!(bank.crossovers(), (20.0, 0.45 * 22050.0));
    }

    #[test]
    fn test_cutoff_change_keeps_state() {
        let mut lp = LinkwitzRiley::new(FilterKind::Lowpass, 1, FS, 1000.0);
        let mut signal = vec![1.0f32; 256];
        lp.process_in_place(0, &mut signal);
        let before = lp.state[0];

        lp.set_cutoff(1200.0);
        assert_eq!(lp.state[0], before);
        assert_ne!(before, ChannelState::default());
    }

    #[test]
    fn test_silence_decays_to_exact_zero() {
        let mut bank = CrossoverFilterBank::new(1, FS, &EngineConfig::DEFAULT, 500.0, 7000.0);
        split(&mut bank, &noise(512, 5));

        let silence = vec![0.0f32; 48000];
        let mut last = [vec![], vec![], vec![]];
        for _ in 0..20 {
            last = split(&mut bank, &silence);
        }
        assert!(last.iter().all(|band| band.iter().all(|&s| s == 0.0)));
    }
}
