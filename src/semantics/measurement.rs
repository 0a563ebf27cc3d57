//! Measurement extraction from property value segments.

use crate::parser::fragment::StylePropertyValue;

/// CSS length units, per <http://www.w3.org/TR/css3-values/#font-relative-lengths>.
pub const MEASUREMENT_UNITS: &[&str] = &[
    "em", "ex", "ch", "rem", "vw", "vh", "vmin", "vmax", "cm", "mm", "in", "pt", "pc", "px", "%",
];

/// A numeric measurement extracted from a value segment. The unit is absent
/// only for bare zeroes (`0`, `00`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f32,
    pub unit: Option<&'static str>,
}

impl Measurement {
    pub fn is_percentage(&self) -> bool {
        self.unit == Some("%")
    }
}

/// Parse a single value segment as a measurement.
///
/// - a segment of all zero characters yields value 0 with no unit;
/// - `percentage(<number>)` (the LESS function, case-insensitive) yields the
///   number scaled by 100 with unit `%`;
/// - a segment ending in a known unit whose prefix parses as a float yields
///   that value/unit pair;
/// - anything else (`auto`, `solid`, `black`, ...) is not a measurement.
pub fn measurement_from_segment(segment: &str) -> Option<Measurement> {
    if !segment.is_empty() && segment.chars().all(|c| c == '0') {
        return Some(Measurement {
            value: 0.0,
            unit: None,
        });
    }

    const PERCENTAGE_OPEN: &str = "percentage(";
    if segment.len() > PERCENTAGE_OPEN.len() + 1
        && segment
            .get(..PERCENTAGE_OPEN.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(PERCENTAGE_OPEN))
        && segment.ends_with(')')
    {
        let inner = &segment[PERCENTAGE_OPEN.len()..segment.len() - 1];
        if let Ok(value) = inner.trim().parse::<f32>() {
            return Some(Measurement {
                value: value * 100.0,
                unit: Some("%"),
            });
        }
    }

    for unit in MEASUREMENT_UNITS {
        let Some(prefix_len) = segment.len().checked_sub(unit.len()) else {
            continue;
        };
        let Some(suffix) = segment.get(prefix_len..) else {
            continue;
        };
        if !suffix.eq_ignore_ascii_case(unit) {
            continue;
        }
        if let Ok(value) = segment[..prefix_len].trim().parse::<f32>() {
            return Some(Measurement {
                value,
                unit: Some(unit),
            });
        }
    }

    None
}

impl StylePropertyValue {
    /// Extract every measurement among this value's segments; `3px solid
    /// black` yields one measurement, `2px 2px` yields two, `0` yields a
    /// unitless zero.
    pub fn measurements(&self) -> Vec<Measurement> {
        self.segments
            .iter()
            .filter_map(|segment| measurement_from_segment(segment))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fragment::StylePropertyName;

    #[test]
    fn bare_zeroes_have_no_unit() {
        for segment in ["0", "00", "000"] {
            let m = measurement_from_segment(segment).unwrap();
            assert_eq!(m.value, 0.0);
            assert_eq!(m.unit, None);
        }
    }

    #[test]
    fn zero_with_unit_keeps_unit() {
        let m = measurement_from_segment("0px").unwrap();
        assert_eq!(m.value, 0.0);
        assert_eq!(m.unit, Some("px"));
    }

    #[test]
    fn pixel_measurement() {
        let m = measurement_from_segment("3px").unwrap();
        assert_eq!(m.value, 3.0);
        assert_eq!(m.unit, Some("px"));
    }

    #[test]
    fn fractional_em() {
        let m = measurement_from_segment("0.5em").unwrap();
        assert_eq!(m.value, 0.5);
        assert_eq!(m.unit, Some("em"));
    }

    #[test]
    fn rem_is_not_mistaken_for_em() {
        let m = measurement_from_segment("2rem").unwrap();
        assert_eq!(m.unit, Some("rem"));
    }

    #[test]
    fn percentage_function_scales_by_one_hundred() {
        let m = measurement_from_segment("percentage(0.1)").unwrap();
        assert_eq!(m.value, 10.0);
        assert_eq!(m.unit, Some("%"));
        assert!(m.is_percentage());
    }

    #[test]
    fn percentage_function_is_case_insensitive() {
        let m = measurement_from_segment("Percentage(0.5)").unwrap();
        assert_eq!(m.value, 50.0);
    }

    #[test]
    fn percentage_function_with_bad_argument_is_not_a_measurement() {
        assert!(measurement_from_segment("percentage(oops)").is_none());
    }

    #[test]
    fn percent_suffix() {
        let m = measurement_from_segment("50%").unwrap();
        assert_eq!(m.value, 50.0);
        assert!(m.is_percentage());
    }

    #[test]
    fn keywords_are_not_measurements() {
        for segment in ["auto", "solid", "black", "none", "thin"] {
            assert!(measurement_from_segment(segment).is_none(), "{segment}");
        }
    }

    #[test]
    fn unit_without_number_is_not_a_measurement() {
        assert!(measurement_from_segment("px").is_none());
        assert!(measurement_from_segment("em").is_none());
    }

    #[test]
    fn unit_matching_is_case_insensitive() {
        let m = measurement_from_segment("10PX").unwrap();
        assert_eq!(m.unit, Some("px"));
    }

    #[test]
    fn property_value_measurements() {
        let value = StylePropertyValue::new(
            StylePropertyName::new("border", 0),
            vec!["3px".into(), "solid".into(), "black".into()],
            0,
        );
        let measurements = value.measurements();
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].unit, Some("px"));

        let value = StylePropertyValue::new(
            StylePropertyName::new("padding", 0),
            vec!["2px".into(), "2px".into()],
            0,
        );
        assert_eq!(value.measurements().len(), 2);
    }
}
