//! # bandsplit-core
//!
//! Host-facing abstractions for the bandsplit engine.
//!
//! This crate holds the pieces that sit between a host and a real-time
//! processor, independent of what the processor does.
//!
//! ## Main Traits
//!
//! - [`Plugin`] / [`AudioProcessor`] - two-phase prepare/process lifecycle
//! - [`Parameters`] / [`ParameterRef`] - type-erased parameter access
//! - [`RangeMapper`] - plain to normalized value mapping
//!
//! ## Types
//!
//! - [`Buffer`] - host audio I/O for one block
//! - [`AudioBlock`] - owned, pre-allocated multi-channel storage
//! - [`FloatParameter`] / [`EnumParameter`] - lock-free parameters
//! - [`Smoother`] - per-sample value smoothing
//! - [`Transport`] / [`ProcessContext`] - tempo and block context
//! - [`AudioSetup`] - prepare-time host configuration
//! - [`EngineError`] - prepare-time errors

pub mod buffer;
pub mod error;
pub mod parameter_range;
pub mod parameter_types;
pub mod parameters;
pub mod plugin;
pub mod process_context;
pub mod smoothing;
pub mod types;

// Re-exports for convenience
pub use buffer::{AudioBlock, Buffer};
pub use error::{EngineError, EngineResult};
pub use parameter_range::{LinearMapper, PowerMapper, RangeMapper};
pub use parameter_types::{EnumParameter, EnumParameterValue, FloatParameter};
pub use parameters::{ParameterFlags, ParameterInfo, ParameterRef, Parameters};
pub use plugin::{AudioProcessor, AudioSetup, HasParameters, Plugin};
pub use process_context::{ProcessContext, Transport};
pub use smoothing::{Smoother, SmoothingStyle};
pub use types::{flush_denormal, ParameterId, ParameterValue, DENORMAL_THRESHOLD, MAX_CHANNELS};
