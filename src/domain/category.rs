//! Built-in ticker categories and letter interpolation.
//!
//! The category table is constant, process-wide data: the six families below
//! are defined at compile time and never persisted. Every statistical
//! parameter of a built-in ticker is derived from its code alone, so the
//! code is the entire serialized state.

/// Parameter ranges and descriptive data for one built-in category.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltInCategory {
    pub name: &'static str,
    pub description: &'static str,
    pub sector: &'static str,
    pub drift_range: (f64, f64),
    pub volatility_range: (f64, f64),
    pub jump_intensity_range: (f64, f64),
    pub jump_mean_range: (f64, f64),
    pub jump_std_dev_range: (f64, f64),
}

static BUILT_IN_CATEGORIES: [(char, BuiltInCategory); 6] = [
    (
        'A',
        BuiltInCategory {
            name: "Titan Industries",
            description: "A multinational conglomerate with over 150 years of market dominance \
                          in infrastructure and consumer goods, renowned for its AAA credit \
                          rating and global supply chain resilience.",
            sector: "Technology & Industrial Goods",
            drift_range: (5.0, 8.0),
            volatility_range: (10.0, 20.0),
            jump_intensity_range: (0.5, 1.0),
            jump_mean_range: (-1.0, 2.0),
            jump_std_dev_range: (1.0, 3.0),
        },
    ),
    (
        'B',
        BuiltInCategory {
            name: "Solaris Dynamics",
            description: "Pioneer in next-generation photovoltaic systems and AI-driven energy \
                          optimization platforms, achieving 300% YoY revenue growth in emerging \
                          markets.",
            sector: "Renewable Energy Technology",
            drift_range: (10.0, 15.0),
            volatility_range: (30.0, 50.0),
            jump_intensity_range: (1.0, 2.0),
            jump_mean_range: (3.0, 5.0),
            jump_std_dev_range: (5.0, 10.0),
        },
    ),
    (
        'C',
        BuiltInCategory {
            name: "Ironclad Manufacturing",
            description: "Undervalued heavy machinery producer trading at 0.8x book value, \
                          maintaining consistent 18% ROIC despite cyclical industry pressures.",
            sector: "Industrial Machinery",
            drift_range: (6.0, 9.0),
            volatility_range: (15.0, 25.0),
            jump_intensity_range: (0.5, 1.0),
            jump_mean_range: (-1.0, 2.0),
            jump_std_dev_range: (2.0, 4.0),
        },
    ),
    (
        'D',
        BuiltInCategory {
            name: "NexaBio Solutions",
            description: "$850M market cap biotech firm developing CRISPR-based neurodegenerative \
                          therapies, recently received FDA breakthrough designation for \
                          Alzheimer's treatment.",
            sector: "Biotechnology",
            drift_range: (12.0, 20.0),
            volatility_range: (40.0, 60.0),
            jump_intensity_range: (2.0, 4.0),
            jump_mean_range: (5.0, 10.0),
            jump_std_dev_range: (10.0, 15.0),
        },
    ),
    (
        'E',
        BuiltInCategory {
            name: "Heritage Utilities Co.",
            description: "Regulated gas/electric provider with 87 consecutive quarterly \
                          dividends and 4.7% yield, serving 2.4 million customers across the \
                          Midwest.",
            sector: "Utilities",
            drift_range: (4.0, 7.0),
            volatility_range: (10.0, 20.0),
            jump_intensity_range: (0.5, 1.5),
            jump_mean_range: (-2.0, 2.0),
            jump_std_dev_range: (2.0, 4.0),
        },
    ),
    (
        'F',
        BuiltInCategory {
            name: "Summit Leisure Group",
            description: "Luxury resort operator and cruise line company demonstrating 140% \
                          EBITDA volatility relative to GDP fluctuations, currently expanding \
                          Asian market footprint.",
            sector: "Hospitality & Tourism",
            drift_range: (-2.0, 10.0),
            volatility_range: (20.0, 40.0),
            jump_intensity_range: (1.0, 2.0),
            jump_mean_range: (-1.0, 3.0),
            jump_std_dev_range: (3.0, 6.0),
        },
    ),
];

/// Look up the built-in category registered for a code's first letter.
pub fn built_in_category(letter: char) -> Option<&'static BuiltInCategory> {
    BUILT_IN_CATEGORIES
        .iter()
        .find(|(key, _)| *key == letter)
        .map(|(_, category)| category)
}

/// Linear interpolation over the alphabet: 'A' maps to `low`, 'Z' to `high`.
pub fn interpolate(letter: char, low: f64, high: f64) -> f64 {
    let ratio = (letter as u32 - 'A' as u32) as f64 / ('Z' as u32 - 'A' as u32) as f64;
    low + ratio * (high - low)
}

/// Round to 2 decimal places, the precision of all derived parameters.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interpolate_endpoints() {
        assert_eq!(interpolate('A', 5.0, 8.0), 5.0);
        assert_eq!(interpolate('Z', 5.0, 8.0), 8.0);
    }

    #[test]
    fn interpolate_known_ratio() {
        // 'C' is 2 letters above 'A': ratio 2/25 = 0.08.
        assert_relative_eq!(interpolate('C', 6.0, 9.0), 6.24, max_relative = 1e-12);
    }

    #[test]
    fn interpolate_descending_range() {
        assert_eq!(interpolate('A', 10.0, -2.0), 10.0);
        assert_eq!(interpolate('Z', 10.0, -2.0), -2.0);
    }

    #[test]
    fn round2_behavior() {
        assert_eq!(round2(6.239999), 6.24);
        assert_eq!(round2(5.0), 5.0);
        assert_eq!(round2(-1.005), -1.0);
    }

    #[test]
    fn category_lookup_covers_reserved_letters() {
        for letter in ['A', 'B', 'C', 'D', 'E', 'F'] {
            assert!(built_in_category(letter).is_some(), "missing {letter}");
        }
        for letter in ['G', 'H', 'Z'] {
            assert!(built_in_category(letter).is_none());
        }
    }

    #[test]
    fn category_a_ranges() {
        let category = built_in_category('A').unwrap();
        assert_eq!(category.name, "Titan Industries");
        assert_eq!(category.drift_range, (5.0, 8.0));
        assert_eq!(category.volatility_range, (10.0, 20.0));
        assert_eq!(category.jump_std_dev_range, (1.0, 3.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn interpolate_monotonic_for_ascending_range(
                low in -100.0f64..100.0,
                span in 0.0f64..100.0,
            ) {
                let high = low + span;
                let mut prev = interpolate('A', low, high);
                for letter in 'B'..='Z' {
                    let next = interpolate(letter, low, high);
                    prop_assert!(next >= prev, "{letter}: {next} < {prev}");
                    prev = next;
                }
            }

            #[test]
            fn interpolate_stays_within_range(
                letter in 'A'..='Z',
                low in -100.0f64..100.0,
                span in 0.0f64..100.0,
            ) {
                let high = low + span;
                let value = interpolate(letter, low, high);
                prop_assert!(value >= low - 1e-9 && value <= high + 1e-9);
            }
        }
    }
}
