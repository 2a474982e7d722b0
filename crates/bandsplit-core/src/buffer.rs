//! Audio buffer abstractions for block processing.
//!
//! This module provides [`Buffer`] for the host's main audio I/O and
//! [`AudioBlock`] for engine-owned multi-channel scratch storage.
//!
//! # Architecture
//!
//! - **[`Buffer`]**: borrowed view of the host's input and output channels for
//!   a single `process()` call. Fixed-size stack storage, no allocation.
//! - **[`AudioBlock`]**: owned, pre-allocated channel storage (band buffers,
//!   dry snapshots, delay lines). Capacity is fixed at prepare time; the
//!   active length can change per block without touching the allocator.

use crate::types::MAX_CHANNELS;

// =============================================================================
// Buffer - Host Audio I/O
// =============================================================================

/// Main audio buffer for block processing.
///
/// Contains input and output channel slices for the host's audio bus.
///
/// # Lifetime
///
/// The `'a` lifetime ties the buffer to the host's audio data. Buffers are
/// only valid within a single `process()` call.
///
/// # Channel Layout
///
/// Channels are indexed starting from 0:
/// - Stereo: 0 = Left, 1 = Right
/// - Surround: 0 = Left, 1 = Right, 2 = Center, etc.
///
/// # Real-Time Safety
///
/// This struct uses fixed-size stack storage. No heap allocations occur
/// during construction or use.
pub struct Buffer<'a> {
    /// Input channel slices (immutable audio from host)
    inputs: [Option<&'a [f32]>; MAX_CHANNELS],
    /// Output channel slices (mutable audio to host)
    outputs: [Option<&'a mut [f32]>; MAX_CHANNELS],
    /// Number of active input channels
    num_input_channels: usize,
    /// Number of active output channels
    num_output_channels: usize,
    /// Number of samples in this processing block
    num_samples: usize,
}

impl<'a> Buffer<'a> {
    /// Create a new buffer from channel slices.
    ///
    /// Channels beyond [`MAX_CHANNELS`] are silently ignored.
    ///
    /// # Panics
    ///
    /// Panics if any channel slice is shorter than `num_samples`.
    #[inline]
    pub fn new(
        inputs: impl IntoIterator<Item = &'a [f32]>,
        outputs: impl IntoIterator<Item = &'a mut [f32]>,
        num_samples: usize,
    ) -> Self {
        let mut input_arr: [Option<&'a [f32]>; MAX_CHANNELS] = [None; MAX_CHANNELS];
        let mut num_input_channels = 0;
        for (i, slice) in inputs.into_iter().take(MAX_CHANNELS).enumerate() {
            assert!(slice.len() >= num_samples, "input channel {i} shorter than block");
            input_arr[i] = Some(slice);
            num_input_channels = i + 1;
        }

        // Can't use [None; N] for &mut because it's not Copy
        let mut output_arr: [Option<&'a mut [f32]>; MAX_CHANNELS] = std::array::from_fn(|_| None);
        let mut num_output_channels = 0;
        for (i, slice) in outputs.into_iter().take(MAX_CHANNELS).enumerate() {
            assert!(slice.len() >= num_samples, "output channel {i} shorter than block");
            output_arr[i] = Some(slice);
            num_output_channels = i + 1;
        }

        Self {
            inputs: input_arr,
            outputs: output_arr,
            num_input_channels,
            num_output_channels,
            num_samples,
        }
    }

    // =========================================================================
    // Buffer Info
    // =========================================================================

    /// Number of samples in this processing block.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of input channels.
    #[inline]
    pub fn num_input_channels(&self) -> usize {
        self.num_input_channels
    }

    /// Number of output channels.
    #[inline]
    pub fn num_output_channels(&self) -> usize {
        self.num_output_channels
    }

    // =========================================================================
    // Channel Access
    // =========================================================================

    /// Get an input channel by index.
    ///
    /// Returns an empty slice if the channel doesn't exist.
    #[inline]
    pub fn input(&self, channel: usize) -> &[f32] {
        self.inputs
            .get(channel)
            .and_then(|opt| opt.as_ref())
            .map(|ch| &ch[..self.num_samples])
            .unwrap_or(&[])
    }

    /// Get a mutable output channel by index.
    ///
    /// # Panics
    ///
    /// Panics if the channel index is out of bounds.
    #[inline]
    pub fn output(&mut self, channel: usize) -> &mut [f32] {
        let n = self.num_samples;
        self.outputs[channel]
            .as_mut()
            .map(|ch| &mut ch[..n])
            .expect("output channel out of bounds")
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Clear the output channels starting at `first` to silence.
    ///
    /// Used to silence outputs that have no matching input channel.
    pub fn clear_outputs_from(&mut self, first: usize) {
        let n = self.num_samples;
        let first = first.min(self.num_output_channels);
        for opt in self.outputs[first..self.num_output_channels].iter_mut() {
            if let Some(output) = opt.as_mut() {
                output[..n].fill(0.0);
            }
        }
    }
}

// =============================================================================
// AudioBlock - Owned Channel Storage
// =============================================================================

/// Owned multi-channel sample storage with a fixed capacity.
///
/// Samples are stored channel-major in one contiguous allocation: channel
/// `c` occupies `c * capacity .. (c + 1) * capacity`. The block exposes only
/// the first [`len()`](Self::len) samples of each channel.
///
/// # Real-Time Safety
///
/// The allocation happens in [`AudioBlock::new`]. [`set_len`](Self::set_len)
/// and clearing never allocate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    data: Vec<f32>,
    num_channels: usize,
    capacity: usize,
    len: usize,
}

impl AudioBlock {
    /// Allocate a silent block with the given channel count and capacity.
    ///
    /// The active length starts at `capacity`.
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            data: vec![0.0; num_channels * capacity],
            num_channels,
            capacity,
            len: capacity,
        }
    }

    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Maximum number of samples per channel.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Active number of samples per channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the active length is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the active number of samples per channel.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the capacity.
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.capacity,
            "block length {len} exceeds capacity {}",
            self.capacity
        );
        self.len = len;
    }

    /// Get a channel's active samples.
    #[inline]
    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.capacity;
        &self.data[start..start + self.len]
    }

    /// Get a channel's active samples mutably.
    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let start = channel * self.capacity;
        &mut self.data[start..start + self.len]
    }

    /// Fill the active region of every channel with silence.
    pub fn clear(&mut self) {
        let len = self.len;
        for ch in self.data.chunks_exact_mut(self.capacity.max(1)) {
            ch[..len].fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_channel_counts() {
        let left = [1.0f32; 8];
        let right = [2.0f32; 8];
        let mut out_l = [0.0f32; 8];
        let mut out_r = [0.0f32; 8];
        let buffer = Buffer::new(
            [&left[..], &right[..]],
            [&mut out_l[..], &mut out_r[..]],
            4,
        );

        assert_eq!(buffer.num_samples(), 4);
        assert_eq!(buffer.num_input_channels(), 2);
        assert_eq!(buffer.num_output_channels(), 2);
        assert_eq!(buffer.input(1), &[2.0; 4]);
        assert!(buffer.input(5).is_empty());
    }

    #[test]
    fn test_buffer_clear_outputs_from() {
        let input = [1.0f32; 4];
        let mut out_l = [5.0f32; 4];
        let mut out_r = [5.0f32; 4];
        let mut buffer = Buffer::new([&input[..]], [&mut out_l[..], &mut out_r[..]], 4);

        buffer.clear_outputs_from(1);
        assert_eq!(buffer.output(0), &[5.0; 4]);
        assert_eq!(buffer.output(1), &[0.0; 4]);
    }

    #[test]
    fn test_audio_block_channels_are_independent() {
        let mut block = AudioBlock::new(2, 16);
        block.set_len(4);
        block.channel_mut(0).fill(1.0);
        block.channel_mut(1).fill(-1.0);

        assert_eq!(block.channel(0), &[1.0; 4]);
        assert_eq!(block.channel(1), &[-1.0; 4]);
    }

    #[test]
    fn test_audio_block_clear_keeps_length() {
        let mut block = AudioBlock::new(2, 8);
        block.set_len(3);
        block.channel_mut(1).fill(0.75);
        block.clear();

        assert_eq!(block.len(), 3);
        assert_eq!(block.channel(1), &[0.0; 3]);
    }

    #[test]
    #[should_panic(expected = "exceeds capacity")]
    fn test_audio_block_len_beyond_capacity_panics() {
        let mut block = AudioBlock::new(1, 4);
        block.set_len(5);
    }
}
