//! Engine parameters.
//!
//! [`BandSplitParameters`] is shared between the audio thread and whatever
//! drives automation through an `Arc`. Every field is an atomic parameter,
//! so writers never block the engine and the engine reads the latest value
//! once per block.

use bandsplit_core::{
    EnumParameter, EnumParameterValue, FloatParameter, ParameterId, ParameterRef, Parameters,
};

use crate::band::Band;

// =============================================================================
// Parameter IDs
// =============================================================================

/// Low-mid crossover frequency.
pub const PARAM_LOW_MID_CROSSOVER: ParameterId = 0;
/// Mid-high crossover frequency.
pub const PARAM_MID_HIGH_CROSSOVER: ParameterId = 1;
/// Delay division choice.
pub const PARAM_DELAY_TIME: ParameterId = 2;
/// Echo feedback gain.
pub const PARAM_FEEDBACK: ParameterId = 3;
/// First dry gain ID; bands follow in `Band::ALL` order.
pub const PARAM_DRY_BASE: ParameterId = 10;
/// First wet gain ID; bands follow in `Band::ALL` order.
pub const PARAM_WET_BASE: ParameterId = 20;

const CROSSOVER_RANGE: std::ops::RangeInclusive<f64> = 20.0..=20000.0;
const CROSSOVER_SKEW: f64 = 0.25;

// =============================================================================
// DelayDivision
// =============================================================================

/// Note length of the echo, relative to the host tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayDivision {
    /// 1/16 note
    Sixteenth,
    /// 1/8 note
    Eighth,
    /// 1/6 note (quarter-note triplet)
    Sixth,
    /// 1/4 note
    Quarter,
    /// 1/3 note (half-note triplet)
    Third,
    /// 1/2 note
    Half,
    /// Whole note
    Whole,
}

impl DelayDivision {
    /// Length in quarter notes (beats).
    pub fn beats(self) -> f64 {
        match self {
            DelayDivision::Sixteenth => 0.25,
            DelayDivision::Eighth => 0.5,
            DelayDivision::Sixth => 2.0 / 3.0,
            DelayDivision::Quarter => 1.0,
            DelayDivision::Third => 4.0 / 3.0,
            DelayDivision::Half => 2.0,
            DelayDivision::Whole => 4.0,
        }
    }
}

impl EnumParameterValue for DelayDivision {
    const COUNT: usize = 7;
    const DEFAULT_INDEX: usize = 3;

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(DelayDivision::Sixteenth),
            1 => Some(DelayDivision::Eighth),
            2 => Some(DelayDivision::Sixth),
            3 => Some(DelayDivision::Quarter),
            4 => Some(DelayDivision::Third),
            5 => Some(DelayDivision::Half),
            6 => Some(DelayDivision::Whole),
            _ => None,
        }
    }

    fn to_index(self) -> usize {
        self as usize
    }

    fn names() -> &'static [&'static str] {
        &["1/16", "1/8", "1/6", "1/4", "1/3", "1/2", "1/1"]
    }

    fn default_value() -> Self {
        DelayDivision::Quarter
    }
}

// =============================================================================
// BandSplitParameters
// =============================================================================

/// All parameters of the band-split delay.
#[derive(Debug)]
pub struct BandSplitParameters {
    /// Boundary between the low and mid bands, Hz.
    pub low_mid_crossover: FloatParameter,
    /// Boundary between the mid and high bands, Hz.
    pub mid_high_crossover: FloatParameter,
    /// Echo length as a note division.
    pub delay_time: EnumParameter<DelayDivision>,
    /// Gain applied to the delayed signal as it is mixed back in.
    pub feedback: FloatParameter,
    /// Per-band gain of the undelayed signal, indexed by [`Band::index`].
    pub dry: [FloatParameter; Band::COUNT],
    /// Per-band gain of the delayed signal, indexed by [`Band::index`].
    pub wet: [FloatParameter; Band::COUNT],
}

impl BandSplitParameters {
    /// Dry gain of one band.
    #[inline]
    pub fn dry_gain(&self, band: Band) -> f64 {
        self.dry[band.index()].get()
    }

    /// Wet gain of one band.
    #[inline]
    pub fn wet_gain(&self, band: Band) -> f64 {
        self.wet[band.index()].get()
    }
}

impl Default for BandSplitParameters {
    fn default() -> Self {
        Self {
            low_mid_crossover: FloatParameter::hz(
                "Low Mid Crossover",
                500.0,
                CROSSOVER_RANGE,
                CROSSOVER_SKEW,
            )
            .with_id(PARAM_LOW_MID_CROSSOVER),
            mid_high_crossover: FloatParameter::hz(
                "Mid High Crossover",
                7000.0,
                CROSSOVER_RANGE,
                CROSSOVER_SKEW,
            )
            .with_id(PARAM_MID_HIGH_CROSSOVER),
            delay_time: EnumParameter::new("Delay Time").with_id(PARAM_DELAY_TIME),
            feedback: FloatParameter::new("Feedback", 0.5, 0.0..=0.95).with_id(PARAM_FEEDBACK),
            dry: [
                gain("Low Dry", PARAM_DRY_BASE),
                gain("Mid Dry", PARAM_DRY_BASE + 1),
                gain("High Dry", PARAM_DRY_BASE + 2),
            ],
            wet: [
                gain("Low Wet", PARAM_WET_BASE),
                gain("Mid Wet", PARAM_WET_BASE + 1),
                gain("High Wet", PARAM_WET_BASE + 2),
            ],
        }
    }
}

fn gain(name: &'static str, id: ParameterId) -> FloatParameter {
    FloatParameter::new(name, 0.5, 0.0..=1.0).with_id(id)
}

impl Parameters for BandSplitParameters {
    fn count(&self) -> usize {
        4 + 2 * Band::COUNT
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_> {
        let fixed: [&dyn ParameterRef; 4] = [
            &self.low_mid_crossover,
            &self.mid_high_crossover,
            &self.delay_time,
            &self.feedback,
        ];
        Box::new(
            fixed
                .into_iter()
                .chain(self.dry.iter().map(|p| p as &dyn ParameterRef))
                .chain(self.wet.iter().map(|p| p as &dyn ParameterRef)),
        )
    }

    fn by_id(&self, id: ParameterId) -> Option<&dyn ParameterRef> {
        match id {
            PARAM_LOW_MID_CROSSOVER => Some(&self.low_mid_crossover),
            PARAM_MID_HIGH_CROSSOVER => Some(&self.mid_high_crossover),
            PARAM_DELAY_TIME => Some(&self.delay_time),
            PARAM_FEEDBACK => Some(&self.feedback),
            id if (PARAM_DRY_BASE..PARAM_DRY_BASE + Band::COUNT as u32).contains(&id) => {
                Some(&self.dry[(id - PARAM_DRY_BASE) as usize])
            }
            id if (PARAM_WET_BASE..PARAM_WET_BASE + Band::COUNT as u32).contains(&id) => {
                Some(&self.wet[(id - PARAM_WET_BASE) as usize])
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let p = BandSplitParameters::default();
        assert_relative_eq!(p.low_mid_crossover.get(), 500.0, max_relative = 1e-9);
        assert_relative_eq!(p.mid_high_crossover.get(), 7000.0, max_relative = 1e-9);
        assert_eq!(p.delay_time.get(), DelayDivision::Quarter);
        assert_relative_eq!(p.feedback.get(), 0.5);
        for band in Band::ALL {
            assert_relative_eq!(p.dry_gain(band), 0.5);
            assert_relative_eq!(p.wet_gain(band), 0.5);
        }
    }

    #[test]
    fn test_division_beats() {
        let beats: Vec<f64> = (0..DelayDivision::COUNT)
            .filter_map(DelayDivision::from_index)
            .map(DelayDivision::beats)
            .collect();
        let expected = [0.25, 0.5, 2.0 / 3.0, 1.0, 4.0 / 3.0, 2.0, 4.0];
        assert_eq!(beats.len(), expected.len());
        for (b, e) in beats.iter().zip(expected) {
            assert_relative_eq!(*b, e);
        }
        assert_eq!(DelayDivision::names()[DelayDivision::DEFAULT_INDEX], "1/4");
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let p = BandSplitParameters::default();
        assert_eq!(p.iter().count(), p.count());

        for param in p.iter() {
            assert_eq!(p.by_id(param.id()).map(|q| q.name()), Some(param.name()));
        }

        let mid_wet = p.by_name("Mid Wet").unwrap();
        assert_eq!(mid_wet.id(), PARAM_WET_BASE + 1);
        mid_wet.set_plain(0.9);
        assert_relative_eq!(p.wet_gain(Band::Mid), 0.9);

        assert!(p.by_id(99).is_none());
        assert!(p.by_name("Reverb").is_none());
    }

    #[test]
    fn test_delay_time_from_normalized() {
        let p = BandSplitParameters::default();
        let delay = p.by_id(PARAM_DELAY_TIME).unwrap();
        delay.set_normalized(1.0);
        assert_eq!(p.delay_time.get(), DelayDivision::Whole);
        assert_eq!(delay.display(), "1/1");
    }

    #[test]
    fn test_reset_all() {
        let p = BandSplitParameters::default();
        p.feedback.set(0.1);
        p.low_mid_crossover.set(80.0);
        p.reset_all();
        assert_relative_eq!(p.feedback.get(), 0.5);
        assert_relative_eq!(p.low_mid_crossover.get(), 500.0, max_relative = 1e-9);
    }
}
