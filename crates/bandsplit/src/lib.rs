//! # bandsplit
//!
//! Three-band crossover delay.
//!
//! The input is split into low, mid and high bands by Linkwitz-Riley
//! crossovers. Each band runs through its own tempo-synced echo with dry and
//! wet gains, and the bands are summed back together. With the echoes muted
//! the bands recombine to an all-pass copy of the input.
//!
//! ```text
//!            ┌─ low ──  delay ── dry/wet ─┐
//!   input ───┼─ mid ──  delay ── dry/wet ─┼── output
//!            └─ high ── delay ── dry/wet ─┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bandsplit::prelude::*;
//!
//! let engine = BandSplitDelay::new();
//! let parameters = engine.parameters_handle();
//! let mut processor = engine.prepare(AudioSetup::stereo(48000.0, 512))?;
//!
//! parameters.delay_time.set(DelayDivision::Eighth);
//!
//! let context = ProcessContext::new(48000.0, 512, Transport::with_tempo(120.0));
//! let mut buffer = Buffer::new([&left_in[..], &right_in[..]], [&mut left_out[..], &mut right_out[..]], 512);
//! processor.process(&mut buffer, &context);
//! ```

pub mod band;
pub mod config;
pub mod crossover;
pub mod delay_line;
pub mod engine;
pub mod mixer;
pub mod parameters;
pub mod tempo_sync;

pub use band::Band;
pub use config::EngineConfig;
pub use crossover::{CrossoverFilterBank, CrossoverUpdate, FilterKind, LinkwitzRiley};
pub use delay_line::{DelayLine, GainRamp, WriteCursor};
pub use engine::{BandSplitDelay, BandSplitProcessor, EngineStats};
pub use mixer::BandMixer;
pub use parameters::{BandSplitParameters, DelayDivision};

// Re-export the core crate
pub use bandsplit_core as core;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use bandsplit::prelude::*;
/// ```
pub mod prelude {
    pub use bandsplit_core::{
        // Buffers
        AudioBlock, Buffer,
        // Lifecycle
        AudioProcessor, AudioSetup, HasParameters, Plugin,
        // Parameters
        EnumParameter, EnumParameterValue, FloatParameter, ParameterRef, Parameters,
        // Context
        ProcessContext, Transport,
        // Errors
        EngineError, EngineResult,
    };

    pub use crate::{
        Band, BandSplitDelay, BandSplitParameters, BandSplitProcessor, DelayDivision,
        EngineConfig, EngineStats,
    };
}
