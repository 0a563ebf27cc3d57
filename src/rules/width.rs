//! Border and padding may not be combined with width.
//!
//! In the traditional box model, padding and border widths are added to the
//! specified width, so a block combining them has no single place stating how
//! wide it renders. The rule resolves the *effective* width and box-sizing of
//! each block the way a browser would (last declaration wins, `!important`
//! last of all), expands 1-4-value shorthand, and flags any non-zero padding
//! or border side alongside an explicit width.

use crate::parser::fragment::{Fragment, StylePropertyValue};
use crate::rules::{EnforceRules, SheetType, Violation};
use crate::semantics::measurement::{measurement_from_segment, Measurement};

/// Conformity flags for [`BorderAndPaddingMayNotBeCombinedWithWidth`]. The
/// default is strict: no side may be non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidthConformity {
    /// Only flag the horizontal sides; vertical border and padding do not
    /// affect width.
    pub allow_vertical_border_and_padding: bool,
    /// Skip the check entirely when the block's effective `box-sizing` is
    /// `border-box` (which makes the combination well-defined, at the cost
    /// of requiring a browser that supports it).
    pub ignore_rule_if_border_box_sizing_rule_present: bool,
}

/// See the module documentation.
#[derive(Debug, Clone, Copy)]
pub struct BorderAndPaddingMayNotBeCombinedWithWidth {
    conformity: WidthConformity,
}

impl BorderAndPaddingMayNotBeCombinedWithWidth {
    pub fn new(conformity: WidthConformity) -> Self {
        Self { conformity }
    }

    pub fn strict() -> Self {
        Self::new(WidthConformity::default())
    }

    fn check_fragments(&self, fragments: &[Fragment], violations: &mut Vec<Violation>) {
        for fragment in fragments {
            let Some(container) = fragment.as_container() else {
                continue;
            };

            // Effective-property order: the browser applies the last
            // declaration, except that a later !important one overrides, so
            // order the direct property values with the non-important ones
            // first (stable within each group) and read from the back.
            let mut ordered: Vec<&StylePropertyValue> = container
                .children
                .iter()
                .filter_map(|child| match child {
                    Fragment::StylePropertyValue(value) => Some(value),
                    _ => None,
                })
                .collect();
            ordered.sort_by_key(|value| value.is_important());

            let width_defined = ordered
                .iter()
                .rev()
                .find(|value| value.property.has_name("width"))
                .is_some_and(|value| !value.measurements().is_empty());

            if width_defined && !self.border_box_escape_applies(&ordered) {
                let mut padding = SideSummary::default();
                let mut border = SideSummary::default();
                for value in &ordered {
                    apply_padding_property(value, &mut padding);
                    apply_border_property(value, &mut border);
                }

                let strict = self.conformity == WidthConformity::default();
                let offending = [
                    strict.then_some(padding.top).flatten(),
                    padding.right,
                    strict.then_some(padding.bottom).flatten(),
                    padding.left,
                    strict.then_some(border.top).flatten(),
                    border.right,
                    strict.then_some(border.bottom).flatten(),
                    border.left,
                ]
                .into_iter()
                .flatten()
                .next();
                if let Some(value) = offending {
                    violations.push(Violation::new(
                        "Style block encountered that combines border and/or padding with width",
                        Fragment::StylePropertyValue(value.clone()),
                    ));
                }
            }

            self.check_fragments(&container.children, violations);
        }
    }

    fn border_box_escape_applies(&self, ordered: &[&StylePropertyValue]) -> bool {
        if !self.conformity.ignore_rule_if_border_box_sizing_rule_present {
            return false;
        }
        ordered
            .iter()
            .rev()
            .find(|value| value.property.has_name("box-sizing"))
            .is_some_and(|value| {
                value.has_value("border-box") || value.has_value("border-box !important")
            })
    }
}

/// Which property (if any) most recently set each side to a non-zero
/// dimension.
#[derive(Default)]
struct SideSummary<'a> {
    top: Option<&'a StylePropertyValue>,
    right: Option<&'a StylePropertyValue>,
    bottom: Option<&'a StylePropertyValue>,
    left: Option<&'a StylePropertyValue>,
}

fn non_zero<'a>(
    measurement: &Measurement,
    value: &'a StylePropertyValue,
) -> Option<&'a StylePropertyValue> {
    (measurement.value != 0.0).then_some(value)
}

/// Expand a 1-4-value shorthand measurement list into (top, right, bottom,
/// left) using the CSS expansion rule.
fn expand_shorthand(measurements: &[Measurement]) -> (f32, f32, f32, f32) {
    let top = measurements[0].value;
    let right = measurements.get(1).map(|m| m.value).unwrap_or(top);
    let bottom = measurements.get(2).map(|m| m.value).unwrap_or(top);
    let left = measurements.get(3).map(|m| m.value).unwrap_or(right);
    (top, right, bottom, left)
}

fn apply_padding_property<'a>(value: &'a StylePropertyValue, summary: &mut SideSummary<'a>) {
    let measurements = value.measurements();
    let Some(first) = measurements.first() else {
        return;
    };

    let name = value.property.name.to_lowercase();
    match name.as_str() {
        "padding-top" => summary.top = non_zero(first, value),
        "padding-right" => summary.right = non_zero(first, value),
        "padding-bottom" => summary.bottom = non_zero(first, value),
        "padding-left" => summary.left = non_zero(first, value),
        "padding" => {
            let (top, right, bottom, left) = expand_shorthand(&measurements);
            summary.top = (top != 0.0).then_some(value);
            summary.right = (right != 0.0).then_some(value);
            summary.bottom = (bottom != 0.0).then_some(value);
            summary.left = (left != 0.0).then_some(value);
        }
        _ => {}
    }
}

fn apply_border_property<'a>(value: &'a StylePropertyValue, summary: &mut SideSummary<'a>) {
    let name = value.property.name.to_lowercase();

    // "border: none" is the one property/value combination that can zero the
    // border without stating dimensions.
    if name == "border"
        && value
            .segments
            .iter()
            .any(|s| s.eq_ignore_ascii_case("none"))
    {
        *summary = SideSummary::default();
        return;
    }

    // Keyword widths ("thin"/"medium"/"thick") count as dimensions; swap in
    // 4px before extracting measurements so they register as non-zero.
    let measurements: Vec<Measurement> = value
        .segments
        .iter()
        .map(|segment| {
            if is_keyword_border_width(segment) {
                "4px"
            } else {
                segment.as_str()
            }
        })
        .filter_map(measurement_from_segment)
        .collect();
    let Some(first) = measurements.first() else {
        return;
    };

    match name.as_str() {
        "border-top" | "border-top-width" => summary.top = non_zero(first, value),
        "border-right" | "border-right-width" => summary.right = non_zero(first, value),
        "border-bottom" | "border-bottom-width" => summary.bottom = non_zero(first, value),
        "border-left" | "border-left-width" => summary.left = non_zero(first, value),
        // The "border" shorthand states a single dimension for all sides.
        "border" => {
            let side = non_zero(first, value);
            summary.top = side;
            summary.right = side;
            summary.bottom = side;
            summary.left = side;
        }
        "border-width" => {
            let (top, right, bottom, left) = expand_shorthand(&measurements);
            summary.top = (top != 0.0).then_some(value);
            summary.right = (right != 0.0).then_some(value);
            summary.bottom = (bottom != 0.0).then_some(value);
            summary.left = (left != 0.0).then_some(value);
        }
        _ => {}
    }
}

fn is_keyword_border_width(segment: &str) -> bool {
    segment.eq_ignore_ascii_case("thin")
        || segment.eq_ignore_ascii_case("medium")
        || segment.eq_ignore_ascii_case("thick")
}

impl EnforceRules for BorderAndPaddingMayNotBeCombinedWithWidth {
    fn applies_to(&self, _sheet_type: SheetType) -> bool {
        true
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_fragments(fragments, &mut violations);
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build, prop, sel};

    fn border_box_aware() -> BorderAndPaddingMayNotBeCombinedWithWidth {
        BorderAndPaddingMayNotBeCombinedWithWidth::new(WidthConformity {
            ignore_rule_if_border_box_sizing_rule_present: true,
            ..WidthConformity::default()
        })
    }

    #[test]
    fn width_with_padding_fails_strict() {
        let fragments = build([sel(
            "div.x",
            [prop("width", "320px"), prop("padding", "16px")],
        )]);
        let violations = BorderAndPaddingMayNotBeCombinedWithWidth::strict().check_all(&fragments);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn border_box_sizing_suppresses_the_check_when_configured() {
        let fragments = build([sel(
            "div.x",
            [
                prop("width", "320px"),
                prop("padding", "16px"),
                prop("box-sizing", "border-box"),
            ],
        )]);
        assert!(border_box_aware().check_all(&fragments).is_empty());
        // Without the flag, box-sizing changes nothing.
        assert_eq!(
            BorderAndPaddingMayNotBeCombinedWithWidth::strict()
                .check_all(&fragments)
                .len(),
            1
        );
    }

    #[test]
    fn width_without_padding_or_border_passes() {
        let fragments = build([sel("div.x", [prop("width", "320px")])]);
        assert!(BorderAndPaddingMayNotBeCombinedWithWidth::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn padding_without_width_passes() {
        let fragments = build([sel("div.x", [prop("padding", "16px")])]);
        assert!(BorderAndPaddingMayNotBeCombinedWithWidth::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn zero_padding_with_width_passes() {
        let fragments = build([sel(
            "div.x",
            [prop("width", "320px"), prop("padding", "0")],
        )]);
        assert!(BorderAndPaddingMayNotBeCombinedWithWidth::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn vertical_padding_allowed_when_configured() {
        let fragments = build([sel(
            "div.x",
            [prop("width", "320px"), prop("padding", "16px 0")],
        )]);
        let relaxed = BorderAndPaddingMayNotBeCombinedWithWidth::new(WidthConformity {
            allow_vertical_border_and_padding: true,
            ..WidthConformity::default()
        });
        assert!(relaxed.check_all(&fragments).is_empty());
        assert_eq!(
            BorderAndPaddingMayNotBeCombinedWithWidth::strict()
                .check_all(&fragments)
                .len(),
            1
        );
    }

    #[test]
    fn shorthand_expansion_uses_css_side_order() {
        // "4px 0 0 0": only the top is non-zero.
        let fragments = build([sel(
            "div.x",
            [prop("width", "320px"), prop("padding", "4px 0 0 0")],
        )]);
        let relaxed = BorderAndPaddingMayNotBeCombinedWithWidth::new(WidthConformity {
            allow_vertical_border_and_padding: true,
            ..WidthConformity::default()
        });
        assert!(relaxed.check_all(&fragments).is_empty());

        // "0 4px": left and right are non-zero.
        let fragments = build([sel(
            "div.x",
            [prop("width", "320px"), prop("padding", "0 4px")],
        )]);
        assert_eq!(relaxed.check_all(&fragments).len(), 1);
    }

    #[test]
    fn border_none_zeroes_all_border_sides() {
        let fragments = build([sel(
            "div.x",
            [
                prop("width", "320px"),
                prop("border", "2px solid black"),
                prop("border", "none"),
            ],
        )]);
        assert!(BorderAndPaddingMayNotBeCombinedWithWidth::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn keyword_border_width_counts_as_non_zero() {
        let fragments = build([sel(
            "div.x",
            [prop("width", "320px"), prop("border", "thin solid black")],
        )]);
        assert_eq!(
            BorderAndPaddingMayNotBeCombinedWithWidth::strict()
                .check_all(&fragments)
                .len(),
            1
        );
    }

    #[test]
    fn last_width_declaration_wins() {
        // The effective width is "auto" (no measurement), so nothing to flag.
        let fragments = build([sel(
            "div.x",
            [
                prop("width", "320px"),
                prop("width", "auto"),
                prop("padding", "16px"),
            ],
        )]);
        assert!(BorderAndPaddingMayNotBeCombinedWithWidth::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn important_width_overrides_later_declarations() {
        let fragments = build([sel(
            "div.x",
            [
                prop("width", "320px !important"),
                prop("width", "auto"),
                prop("padding", "16px"),
            ],
        )]);
        assert_eq!(
            BorderAndPaddingMayNotBeCombinedWithWidth::strict()
                .check_all(&fragments)
                .len(),
            1
        );
    }

    #[test]
    fn nested_blocks_are_checked_independently() {
        let fragments = build([sel(
            "div.x",
            [
                prop("width", "320px"),
                sel(
                    "span.y",
                    [prop("width", "100px"), prop("padding-left", "4px")],
                ),
            ],
        )]);
        assert_eq!(
            BorderAndPaddingMayNotBeCombinedWithWidth::strict()
                .check_all(&fragments)
                .len(),
            1
        );
    }

    #[test]
    fn applies_to_every_sheet_type() {
        let rule = BorderAndPaddingMayNotBeCombinedWithWidth::strict();
        for sheet_type in [
            SheetType::Reset,
            SheetType::Themes,
            SheetType::Other,
            SheetType::Combined,
            SheetType::Compiled,
        ] {
            assert!(rule.applies_to(sheet_type));
        }
    }
}
