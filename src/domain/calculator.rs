// src/domain/calculator.rs

/// Parses a raw form input as a finite number. Blank or malformed input yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Optional inputs (parking price / parking area) are "absent" when blank.
/// A present value that fails to parse poisons the calculation.
fn optional_number(raw: &str) -> Result<f64, ()> {
    if raw.trim().is_empty() {
        return Ok(0.0);
    }
    parse_number(raw).ok_or(())
}

/// Price per ping, excluding the parking space from both amount and area.
///
/// Returns `None` when the total amount or total area is missing, when the
/// total area is not positive, when a provided parking value is malformed, or
/// when the effective (non-parking) area is not positive.
pub fn unit_price(
    total_amount: &str,
    total_area: &str,
    parking_price: &str,
    parking_area: &str,
) -> Option<f64> {
    let amount = parse_number(total_amount)?;
    let area = parse_number(total_area)?;
    if area <= 0.0 {
        return None;
    }

    let parking_price = optional_number(parking_price).ok()?;
    let parking_area = optional_number(parking_area).ok()?;

    let effective_amount = amount - parking_price;
    let effective_area = area - parking_area;
    if effective_area <= 0.0 {
        return None;
    }

    Some(round2(effective_amount / effective_area))
}

/// Main building plus accessory building area.
pub fn indoor_usable_area(main: &str, accessory: &str) -> Option<f64> {
    let main = parse_number(main)?;
    let accessory = parse_number(accessory)?;
    Some(round2(main + accessory))
}

/// Share of the title area (parking excluded) that is not indoor usable
/// space, as a percentage.
///
/// An indoor area that meets or exceeds the effective total is inconsistent
/// data and reports a ratio of `0`. A non-positive effective total that
/// still exceeds the indoor area has no meaningful ratio and yields `None`.
pub fn public_area_ratio(
    total: &str,
    main: &str,
    accessory: &str,
    parking_area: &str,
) -> Option<f64> {
    let total = parse_number(total)?;
    let main = parse_number(main)?;
    let accessory = parse_number(accessory)?;
    if total <= 0.0 {
        return None;
    }

    let indoor = main + accessory;
    let effective_total = total - parse_number(parking_area).unwrap_or(0.0);
    if indoor >= effective_total {
        return Some(0.0);
    }
    // Only reachable with negative indoor areas.
    if effective_total <= 0.0 {
        return None;
    }

    Some(round2((effective_total - indoor) / effective_total * 100.0))
}

/// Scores a single rating may take.
const RATING_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

/// Sum of the five category ratings. Unset, malformed or out-of-range
/// ratings count as zero.
pub fn total_rating(ratings: [&str; 5]) -> u32 {
    ratings
        .iter()
        .filter_map(|r| r.trim().parse::<u32>().ok())
        .filter(|score| RATING_RANGE.contains(score))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_price_is_none_for_zero_area() {
        assert_eq!(unit_price("1000", "0", "", ""), None);
    }

    #[test]
    fn unit_price_without_parking() {
        assert_eq!(unit_price("1000", "50", "", ""), Some(20.0));
    }

    #[test]
    fn unit_price_subtracts_parking() {
        // (2300 - 300) / (48 - 8)
        assert_eq!(unit_price("2300", "48", "300", "8"), Some(50.0));
    }

    #[test]
    fn unit_price_fails_closed_on_malformed_parking() {
        assert_eq!(unit_price("2300", "48", "abc", "8"), None);
        assert_eq!(unit_price("2300", "48", "300", "n/a"), None);
    }

    #[test]
    fn unit_price_rejects_parking_swallowing_the_area() {
        assert_eq!(unit_price("2000", "10", "100", "10"), None);
        assert_eq!(unit_price("", "40", "", ""), None);
    }

    #[test]
    fn unit_price_rounds_to_two_places() {
        assert_eq!(unit_price("1000", "3", "", ""), Some(333.33));
    }

    #[test]
    fn indoor_area_requires_both_parts() {
        assert_eq!(indoor_usable_area("25", "5"), Some(30.0));
        assert_eq!(indoor_usable_area("25.5", "5.25"), Some(30.75));
        assert_eq!(indoor_usable_area("25", ""), None);
    }

    #[test]
    fn public_ratio_basic_and_with_parking() {
        assert_eq!(public_area_ratio("40", "25", "5", ""), Some(25.0));
        // effective total 32, indoor 24 -> 25%
        assert_eq!(public_area_ratio("40", "20", "4", "8"), Some(25.0));
        // unparseable parking area is treated as absent
        assert_eq!(public_area_ratio("40", "25", "5", "x"), Some(25.0));
    }

    #[test]
    fn public_ratio_inconsistent_data_is_zero() {
        assert_eq!(public_area_ratio("30", "28", "5", ""), Some(0.0));
    }

    #[test]
    fn public_ratio_when_parking_covers_the_total() {
        assert_eq!(public_area_ratio("10", "0", "0", "10"), Some(0.0));
        assert_eq!(public_area_ratio("10", "5", "0", "12"), Some(0.0));
        assert_eq!(public_area_ratio("10", "-10", "0", "10"), None);
        assert_eq!(public_area_ratio("10", "-20", "0", "12"), None);
    }

    #[test]
    fn public_ratio_needs_positive_total() {
        assert_eq!(public_area_ratio("0", "0", "0", ""), None);
        assert_eq!(public_area_ratio("40", "", "5", ""), None);
    }

    #[test]
    fn total_rating_treats_unset_as_zero() {
        assert_eq!(total_rating(["5", "4", "", "x", "3"]), 12);
        assert_eq!(total_rating(["", "", "", "", ""]), 0);
    }

    #[test]
    fn total_rating_ignores_out_of_range_scores() {
        assert_eq!(total_rating(["0", "6", "-1", "3", "5"]), 8);
        assert_eq!(total_rating(["4294967295", "1", "", "", ""]), 1);
        assert_eq!(total_rating(["99999999999999999999", "5", "5", "5", "5"]), 20);
    }

    #[test]
    fn calculations_are_repeatable() {
        let a = unit_price("1234.5", "33.3", "120", "2.1");
        let b = unit_price("1234.5", "33.3", "120", "2.1");
        assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
    }
}
