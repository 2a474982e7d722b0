//! Circular delay buffers driven by a shared write cursor.
//!
//! Every band owns a [`DelayLine`] of the same length. A single
//! [`WriteCursor`] is shared by all of them and advances once per block,
//! after every band has been processed, so the bands stay frame-aligned.
//!
//! Per band and channel a block goes through three steps:
//!
//! 1. the band block is written at the cursor,
//! 2. audio from `delay` samples ago is added into the block with a gain
//!    ramp,
//! 3. the mixed block is written again at the same position.
//!
//! Step 3 is what feeds echoes back into the buffer.

use bandsplit_core::{flush_denormal, AudioBlock};

// =============================================================================
// WriteCursor
// =============================================================================

/// Block-granular write position shared by all delay lines.
///
/// Invariant: `position < len` whenever `len > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCursor {
    position: usize,
    len: usize,
}

impl WriteCursor {
    /// A cursor at 0 over a buffer of `len` frames.
    pub fn new(len: usize) -> Self {
        Self { position: 0, len }
    }

    /// Current write position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Buffer length the cursor wraps at.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move forward by one block.
    #[inline]
    pub fn advance(&mut self, frames: usize) {
        if self.len > 0 {
            self.position = (self.position + frames % self.len) % self.len;
        }
    }

    /// Position `delay` frames behind the cursor.
    ///
    /// `delay` must be below the buffer length so one correction suffices.
    #[inline]
    pub fn read_position(&self, delay: usize) -> usize {
        debug_assert!(delay < self.len);
        if delay > self.position {
            self.position + self.len - delay
        } else {
            self.position - delay
        }
    }

    /// Return to 0.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

// =============================================================================
// GainRamp
// =============================================================================

/// Linear gain ramp across one block.
///
/// Sample `i` of an `n` sample block gets `start + i * (end - start) / n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    start: f32,
    step: f32,
}

impl GainRamp {
    /// Ramp from `start` toward `end` over `num_samples`.
    pub fn new(start: f32, end: f32, num_samples: usize) -> Self {
        let step = if num_samples > 0 {
            (end - start) / num_samples as f32
        } else {
            0.0
        };
        Self { start, step }
    }

    /// Constant gain.
    pub fn constant(gain: f32) -> Self {
        Self {
            start: gain,
            step: 0.0,
        }
    }

    /// Gain at sample `index` of the block.
    #[inline]
    pub fn at(&self, index: usize) -> f32 {
        self.start + self.step * index as f32
    }
}

// =============================================================================
// DelayLine
// =============================================================================

/// Multi-channel circular buffer for one band.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: AudioBlock,
}

impl DelayLine {
    /// Allocate a silent delay line of `len` frames.
    pub fn new(num_channels: usize, len: usize) -> Self {
        Self {
            buffer: AudioBlock::new(num_channels, len),
        }
    }

    /// Length in frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.capacity()
    }

    /// True for a zero-length line.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.buffer.num_channels()
    }

    /// Silence the whole buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Stored samples of one channel.
    pub fn channel(&self, channel: usize) -> &[f32] {
        self.buffer.channel(channel)
    }

    /// Copy `block` into the buffer starting at `position`, wrapping at the end.
    ///
    /// # Panics
    ///
    /// Panics if `block` is longer than the buffer.
    pub fn write(&mut self, channel: usize, position: usize, block: &[f32]) {
        let len = self.len();
        assert!(block.len() <= len, "block longer than delay buffer");
        let storage = self.buffer.channel_mut(channel);

        let first = block.len().min(len - position);
        let (tail, head) = block.split_at(first);
        storage[position..position + first].copy_from_slice(tail);
        storage[..head.len()].copy_from_slice(head);
    }

    /// Add samples starting at `position` into `block`, scaled by `ramp`.
    ///
    /// The ramp runs continuously across the wrap point.
    pub fn read_add(&self, channel: usize, position: usize, block: &mut [f32], ramp: GainRamp) {
        let len = self.len();
        assert!(block.len() <= len, "block longer than delay buffer");
        let storage = self.buffer.channel(channel);

        let first = block.len().min(len - position);
        let (tail, head) = block.split_at_mut(first);
        for (i, (out, &delayed)) in tail
            .iter_mut()
            .zip(&storage[position..position + first])
            .enumerate()
        {
            *out += delayed * ramp.at(i);
        }
        for (i, (out, &delayed)) in head.iter_mut().zip(&storage[..]).enumerate() {
            *out += delayed * ramp.at(first + i);
        }
    }

    /// Run the write, delayed add, re-write sequence for one channel.
    ///
    /// With `delay == None` the block is only written; it leaves unchanged.
    /// Samples small enough to turn denormal are flushed to zero before they
    /// are stored, so a decaying feedback tail ends in exact silence.
    pub fn process(
        &mut self,
        channel: usize,
        cursor: &WriteCursor,
        delay: Option<usize>,
        block: &mut [f32],
        ramp: GainRamp,
    ) {
        let position = cursor.position();
        flush_block(block);
        self.write(channel, position, block);
        if let Some(delay) = delay {
            self.read_add(channel, cursor.read_position(delay), block, ramp);
            flush_block(block);
            self.write(channel, position, block);
        }
    }
}

fn flush_block(block: &mut [f32]) {
    for sample in block.iter_mut() {
        *sample = flush_denormal(*sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = WriteCursor::new(10);
        cursor.advance(4);
        cursor.advance(4);
        assert_eq!(cursor.position(), 8);
        cursor.advance(4);
        assert_eq!(cursor.position(), 2);
        cursor.advance(25);
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn test_cursor_read_position() {
        let mut cursor = WriteCursor::new(10);
        cursor.advance(3);
        assert_eq!(cursor.read_position(1), 2);
        assert_eq!(cursor.read_position(3), 0);
        assert_eq!(cursor.read_position(4), 9);
        assert_eq!(cursor.read_position(9), 4);
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let mut cursor = WriteCursor::new(96000);
        for block in [1, 64, 511, 512, 4096, 95999, 96000, 1000] {
            for _ in 0..500 {
                cursor.advance(block);
                assert!(cursor.position() < cursor.len());
            }
        }
    }

    #[test]
    fn test_gain_ramp() {
        let ramp = GainRamp::new(0.0, 1.0, 4);
        assert_eq!(ramp.at(0), 0.0);
        assert_eq!(ramp.at(2), 0.5);
        assert_eq!(ramp.at(3), 0.75);
        assert_eq!(GainRamp::constant(0.5).at(100), 0.5);
        assert_eq!(GainRamp::new(0.3, 0.9, 0).at(5), 0.3);
    }

    #[test]
    fn test_write_contiguous_and_split() {
        let mut line = DelayLine::new(1, 8);
        line.write(0, 2, &[1.0, 2.0, 3.0]);
        assert_eq!(line.channel(0), &[0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);

        line.write(0, 6, &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(line.channel(0), &[6.0, 7.0, 1.0, 2.0, 3.0, 0.0, 4.0, 5.0]);
    }

    #[test]
    fn test_read_add_across_wrap_with_ramp() {
        let mut line = DelayLine::new(1, 8);
        line.write(0, 0, &[1.0; 8]);

        let mut block = [10.0f32; 4];
        line.read_add(0, 6, &mut block, GainRamp::new(0.0, 1.0, 4));
        assert_eq!(block, [10.0, 10.25, 10.5, 10.75]);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut line = DelayLine::new(2, 4);
        line.write(0, 0, &[1.0; 4]);
        line.write(1, 0, &[2.0; 4]);
        assert_eq!(line.channel(0), &[1.0; 4]);
        assert_eq!(line.channel(1), &[2.0; 4]);
    }

    #[test]
    fn test_wraparound_reads_return_written_samples() {
        // 13-frame buffer, 5-frame blocks, 3-frame delay: reads straddle the
        // wrap on many blocks
        let len = 13;
        let block_len = 5;
        let delay = 3;
        let mut line = DelayLine::new(1, len);
        let mut cursor = WriteCursor::new(len);

        let mut history: Vec<f32> = Vec::new();
        for b in 0..40 {
            let block: Vec<f32> = (0..block_len).map(|i| (b * block_len + i) as f32).collect();
            line.write(0, cursor.position(), &block);
            history.extend_from_slice(&block);

            let mut echo = vec![0.0f32; block_len];
            let read_pos = cursor.read_position(delay + block_len);
            line.read_add(0, read_pos, &mut echo, GainRamp::constant(1.0));

            let now = history.len() - block_len;
            if now >= delay + block_len {
                let expected = &history[now - delay - block_len..now - delay];
                assert_eq!(echo, expected, "block {b}");
            }
            cursor.advance(block_len);
        }
    }

    #[test]
    fn test_process_feeds_echoes_back() {
        let len = 16;
        let mut line = DelayLine::new(1, len);
        let mut cursor = WriteCursor::new(len);
        let feedback = GainRamp::constant(0.5);

        // impulse then silence, 4-sample blocks, 4-sample delay
        let mut output = Vec::new();
        for b in 0..6 {
            let mut block = [0.0f32; 4];
            if b == 0 {
                block[0] = 1.0;
            }
            line.process(0, &cursor, Some(4), &mut block, feedback);
            output.extend_from_slice(&block);
            cursor.advance(4);
        }

        for (i, &s) in output.iter().enumerate() {
            let expected = if i % 4 == 0 { 0.5f32.powi((i / 4) as i32) } else { 0.0 };
            assert_eq!(s, expected, "sample {i}");
        }
    }

    #[test]
    fn test_feedback_tail_flushes_to_zero() {
        let mut line = DelayLine::new(1, 8);
        let mut cursor = WriteCursor::new(8);
        line.write(0, 0, &[1.0e-30; 4]);
        cursor.advance(4);

        let mut block = [0.0f32; 4];
        line.process(0, &cursor, Some(4), &mut block, GainRamp::constant(0.9));
        assert_eq!(block, [0.0; 4]);
        assert_eq!(&line.channel(0)[4..], &[0.0; 4]);
    }

    #[test]
    fn test_process_without_delay_leaves_block() {
        let mut line = DelayLine::new(1, 8);
        let cursor = WriteCursor::new(8);
        let mut block = [0.25f32; 4];
        line.process(0, &cursor, None, &mut block, GainRamp::constant(0.5));
        assert_eq!(block, [0.25; 4]);
        assert_eq!(&line.channel(0)[..4], &[0.25; 4]);
    }
}
