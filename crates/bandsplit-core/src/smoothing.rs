//! Gain smoothing for click-free parameter changes.
//!
//! [`Smoother`] interpolates a control value toward a target once per sample.
//! The band mixer uses it to ramp dry and wet gains.
//!
//! ```ignore
//! let mut smoother = Smoother::new(SmoothingStyle::Linear(20.0));
//! smoother.set_sample_rate(48000.0);
//! smoother.reset(0.5);
//! smoother.set_target(1.0);
//! let gain = smoother.next();
//! ```
//!
//! A smoother needs `&mut self` to advance and belongs to the audio thread.

/// Smoothing algorithm. The `f64` payload is a time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SmoothingStyle {
    /// Value jumps straight to the target.
    #[default]
    None,

    /// Straight line to the target, arriving after exactly the given time.
    Linear(f64),
}

/// Per-sample parameter smoother.
#[derive(Debug, Clone, Default)]
pub struct Smoother {
    style: SmoothingStyle,
    sample_rate: f64,

    current: f64,
    target: f64,

    // Linear increment and remaining steps
    step_size: f64,
    steps_remaining: u32,
}

impl Smoother {
    /// Create a smoother. Call [`set_sample_rate`](Self::set_sample_rate)
    /// before processing.
    pub fn new(style: SmoothingStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Set the sample rate used to turn ramp times into sample counts.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Start moving toward a new target.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() < 1e-10 {
            return;
        }
        self.target = target;

        match self.style {
            SmoothingStyle::None => self.current = target,
            SmoothingStyle::Linear(ms) => {
                let samples = (ms * self.sample_rate / 1000.0) as u32;
                self.steps_remaining = samples.max(1);
                self.step_size = (target - self.current) / self.steps_remaining as f64;
            }
        }
    }

    /// Jump to a value without ramping.
    pub fn reset(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.steps_remaining = 0;
        self.step_size = 0.0;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next(&mut self) -> f64 {
        if self.steps_remaining > 0 {
            self.current += self.step_size;
            self.steps_remaining -= 1;
            if self.steps_remaining == 0 {
                self.current = self.target;
            }
        } else {
            self.current = self.target;
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Fill a slice with consecutive smoothed values.
    pub fn fill_f32(&mut self, buffer: &mut [f32]) {
        if !self.is_smoothing() {
            self.current = self.target;
            buffer.fill(self.target as f32);
            return;
        }
        for sample in buffer.iter_mut() {
            *sample = self.next() as f32;
        }
    }

    /// True while the value is still moving.
    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.steps_remaining > 0
    }
}
