//! Lock-free parameter types.
//!
//! - [`FloatParameter`] - continuous value with a range mapper
//! - [`EnumParameter`] - one choice out of a fixed list
//!
//! Both store their value in an atomic and can be read from the audio thread
//! while other threads write. Loads and stores use `Relaxed` ordering: each
//! parameter is independent and the most recent value wins.

use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::parameter_range::{LinearMapper, PowerMapper, RangeMapper};
use crate::parameters::{ParameterFlags, ParameterInfo, ParameterRef};
use crate::types::{ParameterId, ParameterValue};

// =============================================================================
// FloatParameter
// =============================================================================

/// Continuous parameter stored as normalized `f64` bits in an `AtomicU64`.
///
/// ```ignore
/// let wet = FloatParameter::new("Low Wet", 0.5, 0.0..=1.0).with_id(3);
/// wet.set(0.8);
/// assert_eq!(wet.get(), 0.8);
/// ```
pub struct FloatParameter {
    info: ParameterInfo,
    value: AtomicU64,
    range: Box<dyn RangeMapper>,
    precision: usize,
}

impl FloatParameter {
    /// Create a parameter with linear mapping.
    pub fn new(name: &'static str, default: f64, range: RangeInclusive<f64>) -> Self {
        Self::with_mapper(name, default, Box::new(LinearMapper::new(range)))
    }

    /// Create a parameter with a power curve mapping.
    pub fn skewed(
        name: &'static str,
        default: f64,
        range: RangeInclusive<f64>,
        exponent: f64,
    ) -> Self {
        Self::with_mapper(name, default, Box::new(PowerMapper::new(range, exponent)))
    }

    /// Create a frequency parameter in Hz with a skewed mapping.
    pub fn hz(name: &'static str, default_hz: f64, range_hz: RangeInclusive<f64>, skew: f64) -> Self {
        Self::skewed(name, default_hz, range_hz, skew)
            .with_units("Hz")
            .with_precision(0)
    }

    fn with_mapper(name: &'static str, default: f64, range: Box<dyn RangeMapper>) -> Self {
        let default_normalized = range.normalize(default);
        Self {
            info: ParameterInfo::new(0, name).with_default(default_normalized),
            value: AtomicU64::new(default_normalized.to_bits()),
            range,
            precision: 2,
        }
    }

    /// Set the parameter ID.
    pub fn with_id(mut self, id: ParameterId) -> Self {
        self.info.id = id;
        self
    }

    /// Set the unit label.
    pub fn with_units(mut self, units: &'static str) -> Self {
        self.info.units = units;
        self
    }

    /// Set the number of decimals used for display.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Current value in natural units.
    #[inline]
    pub fn get(&self) -> f64 {
        let normalized = f64::from_bits(self.value.load(Ordering::Relaxed));
        self.range.denormalize(normalized)
    }

    /// Set the value in natural units. Clamped to the range.
    #[inline]
    pub fn set(&self, value: f64) {
        let normalized = self.range.normalize(value);
        self.value.store(normalized.to_bits(), Ordering::Relaxed);
    }

    /// Plain range as `(min, max)`.
    pub fn range(&self) -> (f64, f64) {
        self.range.range()
    }
}

impl std::fmt::Debug for FloatParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatParameter")
            .field("id", &self.info.id)
            .field("name", &self.info.name)
            .field("value", &self.get())
            .finish()
    }
}

impl ParameterRef for FloatParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    fn set_normalized(&self, value: ParameterValue) {
        let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { self.info.default_normalized };
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        self.range.denormalize(normalized)
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        self.range.normalize(plain)
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        let plain = self.range.denormalize(normalized);
        if self.info.units.is_empty() {
            format!("{:.*}", self.precision, plain)
        } else {
            format!("{:.*} {}", self.precision, plain, self.info.units)
        }
    }

    fn parse(&self, s: &str) -> Option<ParameterValue> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix(self.info.units).unwrap_or(trimmed).trim();
        let plain: f64 = number.parse().ok()?;
        plain.is_finite().then(|| self.range.normalize(plain))
    }
}

// =============================================================================
// EnumParameterValue - Choice list description
// =============================================================================

/// A closed set of choices usable with [`EnumParameter`].
pub trait EnumParameterValue: Copy + PartialEq + Send + Sync + 'static {
    /// Number of variants.
    const COUNT: usize;

    /// Index of the default variant.
    const DEFAULT_INDEX: usize;

    /// Variant for an index, if in range.
    fn from_index(index: usize) -> Option<Self>;

    /// Index of this variant.
    fn to_index(self) -> usize;

    /// Display names in index order.
    fn names() -> &'static [&'static str];

    /// The default variant.
    fn default_value() -> Self;
}

// =============================================================================
// EnumParameter
// =============================================================================

/// Discrete parameter holding a variant index in an `AtomicUsize`.
pub struct EnumParameter<E: EnumParameterValue> {
    info: ParameterInfo,
    value: AtomicUsize,
    _marker: PhantomData<E>,
}

impl<E: EnumParameterValue> EnumParameter<E> {
    /// Create a parameter set to the enum's default variant.
    pub fn new(name: &'static str) -> Self {
        Self::with_value(name, E::default_value())
    }

    /// Create a parameter with an explicit default.
    pub fn with_value(name: &'static str, default: E) -> Self {
        let default_index = default.to_index();
        Self {
            info: ParameterInfo::new(0, name)
                .with_default(index_to_normalized(default_index, E::COUNT))
                .with_steps(E::COUNT.saturating_sub(1) as i32)
                .with_flags(ParameterFlags {
                    is_list: true,
                    ..ParameterFlags::default()
                }),
            value: AtomicUsize::new(default_index),
            _marker: PhantomData,
        }
    }

    /// Set the parameter ID.
    pub fn with_id(mut self, id: ParameterId) -> Self {
        self.info.id = id;
        self
    }

    /// Current variant. An out-of-range index reads as the default.
    #[inline]
    pub fn get(&self) -> E {
        E::from_index(self.value.load(Ordering::Relaxed)).unwrap_or_else(E::default_value)
    }

    /// Store a variant.
    #[inline]
    pub fn set(&self, value: E) {
        self.value.store(value.to_index(), Ordering::Relaxed);
    }

    /// Store a variant by index. Out-of-range indices are clamped.
    #[inline]
    pub fn set_index(&self, index: usize) {
        let index = index.min(E::COUNT.saturating_sub(1));
        self.value.store(index, Ordering::Relaxed);
    }
}

impl<E: EnumParameterValue> std::fmt::Debug for EnumParameter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumParameter")
            .field("id", &self.info.id)
            .field("name", &self.info.name)
            .field("index", &self.value.load(Ordering::Relaxed))
            .finish()
    }
}

impl<E: EnumParameterValue> ParameterRef for EnumParameter<E> {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        index_to_normalized(self.get().to_index(), E::COUNT)
    }

    fn set_normalized(&self, value: ParameterValue) {
        let value = if value.is_finite() { value } else { self.info.default_normalized };
        self.value
            .store(normalized_to_index(value, E::COUNT), Ordering::Relaxed);
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        normalized_to_index(normalized, E::COUNT) as f64
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        let index = plain.round().clamp(0.0, E::COUNT.saturating_sub(1) as f64) as usize;
        index_to_normalized(index, E::COUNT)
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        let index = normalized_to_index(normalized, E::COUNT);
        E::names().get(index).copied().unwrap_or("").to_string()
    }

    fn parse(&self, s: &str) -> Option<ParameterValue> {
        let s = s.trim();
        E::names()
            .iter()
            .position(|name| *name == s)
            .map(|index| index_to_normalized(index, E::COUNT))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn index_to_normalized(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

fn normalized_to_index(normalized: f64, count: usize) -> usize {
    if count <= 1 {
        0
    } else {
        ((normalized.clamp(0.0, 1.0) * (count - 1) as f64).round() as usize).min(count - 1)
    }
}
