//! Parameter metadata and the type-erased parameter interface.
//!
//! - [`ParameterInfo`] / [`ParameterFlags`] describe a parameter.
//! - [`ParameterRef`] is the object-safe view of one parameter that a host
//!   binding layer uses to read and write normalized values.
//! - [`Parameters`] is implemented by a parameter collection and provides
//!   lookup by id and by name.
//!
//! # Thread Safety
//!
//! Everything here is `Send + Sync`. Values are stored in atomics so the
//! audio thread can read while automation or UI threads write.

use crate::types::{ParameterId, ParameterValue};

// =============================================================================
// Metadata
// =============================================================================

/// Flags controlling parameter behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterFlags {
    /// Parameter can be automated by the host.
    pub can_automate: bool,
    /// Parameter should be shown as a list of named choices.
    pub is_list: bool,
}

impl Default for ParameterFlags {
    fn default() -> Self {
        Self {
            can_automate: true,
            is_list: false,
        }
    }
}

/// Metadata describing a single parameter.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    /// Unique parameter identifier.
    pub id: ParameterId,
    /// Display name, also used for lookup by name.
    pub name: &'static str,
    /// Unit label (e.g., "Hz").
    pub units: &'static str,
    /// Default value in normalized form (0.0 to 1.0).
    pub default_normalized: ParameterValue,
    /// Number of discrete steps. 0 = continuous.
    pub step_count: i32,
    /// Behavioral flags.
    pub flags: ParameterFlags,
}

impl ParameterInfo {
    /// Create a continuous parameter description with default flags.
    pub const fn new(id: ParameterId, name: &'static str) -> Self {
        Self {
            id,
            name,
            units: "",
            default_normalized: 0.5,
            step_count: 0,
            flags: ParameterFlags {
                can_automate: true,
                is_list: false,
            },
        }
    }

    /// Set the unit label.
    pub const fn with_units(mut self, units: &'static str) -> Self {
        self.units = units;
        self
    }

    /// Set the default normalized value.
    pub const fn with_default(mut self, default: ParameterValue) -> Self {
        self.default_normalized = default;
        self
    }

    /// Set the step count (0 = continuous).
    pub const fn with_steps(mut self, steps: i32) -> Self {
        self.step_count = steps;
        self
    }

    /// Set parameter flags.
    pub const fn with_flags(mut self, flags: ParameterFlags) -> Self {
        self.flags = flags;
        self
    }
}

// =============================================================================
// ParameterRef - Type-erased single parameter
// =============================================================================

/// Object-safe access to one parameter.
pub trait ParameterRef: Send + Sync {
    /// Full metadata.
    fn info(&self) -> &ParameterInfo;

    /// Unique ID.
    fn id(&self) -> ParameterId {
        self.info().id
    }

    /// Display name.
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Unit label.
    fn units(&self) -> &'static str {
        self.info().units
    }

    /// Current normalized value. Lock-free.
    fn get_normalized(&self) -> ParameterValue;

    /// Store a normalized value, clamped to [0.0, 1.0]. Lock-free.
    fn set_normalized(&self, value: ParameterValue);

    /// Convert a normalized value to natural units.
    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue;

    /// Convert a natural-unit value to normalized.
    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue;

    /// Format a normalized value for display.
    fn display_normalized(&self, normalized: ParameterValue) -> String;

    /// Parse a display string to a normalized value.
    fn parse(&self, s: &str) -> Option<ParameterValue>;

    /// Current value in natural units.
    fn get_plain(&self) -> ParameterValue {
        self.normalized_to_plain(self.get_normalized())
    }

    /// Set the value in natural units.
    fn set_plain(&self, value: ParameterValue) {
        self.set_normalized(self.plain_to_normalized(value));
    }

    /// Format the current value for display.
    fn display(&self) -> String {
        self.display_normalized(self.get_normalized())
    }

    /// Restore the default value.
    fn reset_to_default(&self) {
        self.set_normalized(self.info().default_normalized);
    }
}

// =============================================================================
// Parameters - Parameter collection
// =============================================================================

/// A collection of parameters.
///
/// # Example
///
/// ```ignore
/// struct MyParameters {
///     gain: FloatParameter,
/// }
///
/// impl Parameters for MyParameters {
///     fn count(&self) -> usize { 1 }
///
///     fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_> {
///         Box::new(std::iter::once(&self.gain as &dyn ParameterRef))
///     }
/// }
/// ```
pub trait Parameters: Send + Sync {
    /// Total number of parameters.
    fn count(&self) -> usize;

    /// Iterate over all parameters (type-erased).
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_>;

    /// Find a parameter by ID.
    fn by_id(&self, id: ParameterId) -> Option<&dyn ParameterRef> {
        self.iter().find(|p| p.id() == id)
    }

    /// Find a parameter by display name.
    fn by_name(&self, name: &str) -> Option<&dyn ParameterRef> {
        self.iter().find(|p| p.name() == name)
    }

    /// Reset every parameter to its default.
    fn reset_all(&self) {
        for parameter in self.iter() {
            parameter.reset_to_default();
        }
    }
}
