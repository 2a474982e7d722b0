//! Tempo-synchronized delay length.

use crate::parameters::DelayDivision;

/// Delay length in samples for a note division.
///
/// `samples_per_beat` comes from [`ProcessContext::samples_per_beat`]. The
/// result is `beats * samples_per_beat` rounded to the nearest sample and
/// clamped to `[1, buffer_len - max_block]`. Reading a block that far back
/// never reaches the frames the same block is being written to.
///
/// Returns `None` when there is no usable tempo or the buffer cannot hold
/// one block plus a delay.
///
/// [`ProcessContext::samples_per_beat`]: bandsplit_core::ProcessContext::samples_per_beat
pub fn delay_samples(
    division: DelayDivision,
    samples_per_beat: Option<f64>,
    buffer_len: usize,
    max_block: usize,
) -> Option<usize> {
    let samples_per_beat = samples_per_beat.filter(|spb| spb.is_finite() && *spb > 0.0)?;
    let max = buffer_len.checked_sub(max_block.max(1)).filter(|&max| max >= 1)?;

    let samples = (division.beats() * samples_per_beat).round();
    Some(samples.clamp(1.0, max as f64) as usize)
}
