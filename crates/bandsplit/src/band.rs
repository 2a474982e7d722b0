//! The three frequency bands.

/// One of the three bands produced by the crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Below the low-mid crossover.
    Low,
    /// Between the two crossovers.
    Mid,
    /// Above the mid-high crossover.
    High,
}

impl Band {
    /// Number of bands.
    pub const COUNT: usize = 3;

    /// All bands, lowest first.
    pub const ALL: [Band; Band::COUNT] = [Band::Low, Band::Mid, Band::High];

    /// Position in [`Band::ALL`], used to index per-band arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Band::Low => 0,
            Band::Mid => 1,
            Band::High => 2,
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Band::Low => "Low",
            Band::Mid => "Mid",
            Band::High => "High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, band) in Band::ALL.iter().enumerate() {
            assert_eq!(band.index(), i);
        }
    }
}
