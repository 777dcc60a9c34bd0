//! Named price ranges behind the min/max dropdowns. Buy and off-plan share
//! the buy tables; rent is priced per year and has its own.

use crate::models::Purpose;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceOption {
    pub key: &'static str,
    pub label: &'static str,
    /// `None` is unbounded.
    pub min: Option<u64>,
    pub max: Option<u64>,
}

const fn opt(
    key: &'static str,
    label: &'static str,
    min: Option<u64>,
    max: Option<u64>,
) -> PriceOption {
    PriceOption { key, label, min, max }
}

pub const PRICE_RANGES_BUY: &[PriceOption] = &[
    opt("", "No min", None, None),
    opt("0-500000", "Under 500K AED", Some(0), Some(500_000)),
    opt("500000-1000000", "500K - 1M AED", Some(500_000), Some(1_000_000)),
    opt("1000000-2000000", "1M - 2M AED", Some(1_000_000), Some(2_000_000)),
    opt("2000000-5000000", "2M - 5M AED", Some(2_000_000), Some(5_000_000)),
    opt("5000000-10000000", "5M - 10M AED", Some(5_000_000), Some(10_000_000)),
    opt("10000000-", "10M+ AED", Some(10_000_000), None),
];

pub const PRICE_RANGES_RENT: &[PriceOption] = &[
    opt("", "No min", None, None),
    opt("0-50000", "Under 50K AED/year", Some(0), Some(50_000)),
    opt("50000-100000", "50K - 100K AED/year", Some(50_000), Some(100_000)),
    opt("100000-200000", "100K - 200K AED/year", Some(100_000), Some(200_000)),
    opt("200000-500000", "200K - 500K AED/year", Some(200_000), Some(500_000)),
    opt("500000-", "500K+ AED/year", Some(500_000), None),
];

pub const PRICE_MAX_OPTIONS_BUY: &[PriceOption] = &[
    opt("", "No max", None, None),
    opt("500000", "500K AED", None, Some(500_000)),
    opt("1000000", "1M AED", None, Some(1_000_000)),
    opt("2000000", "2M AED", None, Some(2_000_000)),
    opt("5000000", "5M AED", None, Some(5_000_000)),
    opt("10000000", "10M AED", None, Some(10_000_000)),
    opt("-", "10M+ AED", None, None),
];

pub const PRICE_MAX_OPTIONS_RENT: &[PriceOption] = &[
    opt("", "No max", None, None),
    opt("50000", "50K AED/year", None, Some(50_000)),
    opt("100000", "100K AED/year", None, Some(100_000)),
    opt("200000", "200K AED/year", None, Some(200_000)),
    opt("500000", "500K AED/year", None, Some(500_000)),
    opt("-", "500K+ AED/year", None, None),
];

pub fn min_options(purpose: Purpose) -> &'static [PriceOption] {
    match purpose {
        Purpose::Rent => PRICE_RANGES_RENT,
        Purpose::Buy | Purpose::OffPlan => PRICE_RANGES_BUY,
    }
}

pub fn max_options(purpose: Purpose) -> &'static [PriceOption] {
    match purpose {
        Purpose::Rent => PRICE_MAX_OPTIONS_RENT,
        Purpose::Buy | Purpose::OffPlan => PRICE_MAX_OPTIONS_BUY,
    }
}

/// Lower bound selected by a `priceMin` key. Unknown keys impose none.
pub fn min_bound(purpose: Purpose, key: &str) -> Option<f64> {
    min_options(purpose)
        .iter()
        .find(|o| o.key == key)
        .and_then(|o| o.min)
        .map(|v| v as f64)
}

/// Upper bound selected by a `priceMax` key. Unknown keys impose none.
pub fn max_bound(purpose: Purpose, key: &str) -> Option<f64> {
    max_options(purpose)
        .iter()
        .find(|o| o.key == key)
        .and_then(|o| o.max)
        .map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_purpose_tables() {
        assert_eq!(min_bound(Purpose::Buy, "1000000-2000000"), Some(1_000_000.0));
        assert_eq!(min_bound(Purpose::OffPlan, "10000000-"), Some(10_000_000.0));
        assert_eq!(min_bound(Purpose::Rent, "50000-100000"), Some(50_000.0));
        assert_eq!(min_bound(Purpose::Rent, "1000000-2000000"), None);

        assert_eq!(max_bound(Purpose::Buy, "2000000"), Some(2_000_000.0));
        assert_eq!(max_bound(Purpose::Rent, "100000"), Some(100_000.0));
        assert_eq!(max_bound(Purpose::Buy, "-"), None);
        assert_eq!(max_bound(Purpose::Buy, ""), None);
        assert_eq!(max_bound(Purpose::Buy, "bogus"), None);
    }

    #[test]
    fn test_min_range_zero_is_a_bound() {
        assert_eq!(min_bound(Purpose::Buy, "0-500000"), Some(0.0));
    }
}
