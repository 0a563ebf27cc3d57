//! All measurements must be specified in pixels.
//!
//! Percentages and font-relative units make a block's rendered size depend on
//! content outside the block, which is exactly the coupling this discipline
//! forbids. The rule can be relaxed for known layout patterns: `100%` on
//! anything, percentage widths (or all percentage properties) on a configured
//! set of element types, and `width: 100%` on an `img` nested inside such a
//! percentage-width container.

use crate::parser::fragment::{Fragment, Selector, StylePropertyValue};
use crate::rules::{ConfigError, EnforceRules, SheetType, Violation};
use crate::semantics::measurement::MEASUREMENT_UNITS;

/// Conformity flags for [`AllMeasurementsMustBePixels`]. The default is
/// strict: no non-pixel measurement anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasurementConformity {
    /// Allow the literal `100%` on any element and property (this sacrifices
    /// no predictability).
    pub allow_one_hundred_percent_on_any_element_and_property: bool,
    /// Allow a percentage `width` on the configured element types, and
    /// `width: 100%` on `img` blocks nested within their style blocks.
    pub allow_percentage_widths_on_specified_element_types: bool,
    /// As above, but for any property rather than only `width`.
    pub allow_percentages_on_all_properties_of_specified_element_types: bool,
    /// Skip validation entirely inside `@keyframes` blocks; animations often
    /// use percentages for positioning.
    pub do_not_validate_keyframes_properties: bool,
}

/// See the module documentation.
#[derive(Debug, Clone)]
pub struct AllMeasurementsMustBePixels {
    conformity: MeasurementConformity,
    percentage_element_types: Vec<String>,
}

impl AllMeasurementsMustBePixels {
    /// The recommended element types for the percentage relaxations: layout
    /// containers and table cells.
    pub const RECOMMENDED_PERCENTAGE_EXCEPTIONS: &'static [&'static str] =
        &["div", "td", "th", "li"];

    /// The element allow-list must be non-empty exactly when one of the
    /// percentage flags is enabled.
    pub fn new<I, S>(
        mut conformity: MeasurementConformity,
        percentage_element_types: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut element_types: Vec<String> = Vec::new();
        for entry in percentage_element_types {
            let entry = entry.into().trim().to_lowercase();
            if entry.is_empty() {
                return Err(ConfigError::BlankElementType);
            }
            if !element_types.contains(&entry) {
                element_types.push(entry);
            }
        }

        if conformity.allow_percentages_on_all_properties_of_specified_element_types {
            conformity.allow_percentage_widths_on_specified_element_types = true;
        }
        if conformity.allow_percentage_widths_on_specified_element_types {
            if element_types.is_empty() {
                return Err(ConfigError::MissingElementTypes);
            }
        } else if !element_types.is_empty() {
            return Err(ConfigError::UnexpectedElementTypes);
        }

        Ok(Self {
            conformity,
            percentage_element_types: element_types,
        })
    }

    /// No relaxation at all.
    pub fn strict() -> Self {
        Self::new(MeasurementConformity::default(), Vec::<&str>::new())
            .expect("strict configuration is always valid")
    }

    /// 100% anywhere, percentages on all properties of div/td/th/li, and no
    /// validation inside keyframes.
    pub fn recommended() -> Self {
        Self::new(
            MeasurementConformity {
                allow_one_hundred_percent_on_any_element_and_property: true,
                allow_percentages_on_all_properties_of_specified_element_types: true,
                do_not_validate_keyframes_properties: true,
                ..MeasurementConformity::default()
            },
            Self::RECOMMENDED_PERCENTAGE_EXCEPTIONS.iter().copied(),
        )
        .expect("recommended configuration is always valid")
    }

    fn check_fragments<'a>(
        &self,
        fragments: &'a [Fragment],
        containers: &mut Vec<ContainerRef<'a>>,
        violations: &mut Vec<Violation>,
    ) {
        for fragment in fragments {
            match fragment {
                Fragment::Selector(selector) => {
                    containers.push(ContainerRef {
                        selector,
                        is_media_query: false,
                    });
                    self.check_fragments(&selector.children, containers, violations);
                    containers.pop();
                }
                Fragment::MediaQuery(media) => {
                    containers.push(ContainerRef {
                        selector: media,
                        is_media_query: true,
                    });
                    self.check_fragments(&media.children, containers, violations);
                    containers.pop();
                }
                Fragment::StylePropertyValue(value) => {
                    self.check_value(fragment, value, containers, violations);
                }
                Fragment::StylePropertyName(_) | Fragment::Import(_) => {}
            }
        }
    }

    fn check_value(
        &self,
        fragment: &Fragment,
        value: &StylePropertyValue,
        containers: &[ContainerRef<'_>],
        violations: &mut Vec<Violation>,
    ) {
        if self.conformity.do_not_validate_keyframes_properties
            && containers
                .iter()
                .any(|c| !c.is_media_query && c.selector.is_keyframes_declaration())
        {
            return;
        }

        'segments: for segment in &value.segments {
            if self
                .conformity
                .allow_one_hundred_percent_on_any_element_and_property
                && segment == "100%"
            {
                continue;
            }

            if self.conformity.allow_percentage_widths_on_specified_element_types {
                // The property value may be wrapped in a media query, so the
                // direct parent selector is the nearest non-media container.
                let parent_at = containers.iter().rposition(|c| !c.is_media_query);
                if let Some(parent_at) = parent_at {
                    let parent = containers[parent_at].selector;
                    let property_is_eligible = value.property.has_name("width")
                        || self
                            .conformity
                            .allow_percentages_on_all_properties_of_specified_element_types;
                    if property_is_eligible && is_percentage_segment(segment) {
                        if parent.targets_only_tag_names(&self.percentage_element_types) {
                            continue;
                        }
                        if parent.targets_only_tag_names(&["img"]) {
                            if segment != "100%" {
                                violations.push(Violation::new(
                                    "Measurement encountered that was not in pixels: \
                                     the only allowed percentage width for img is 100%",
                                    fragment.clone(),
                                ));
                                continue;
                            }
                            if !has_enclosing_percentage_width(&containers[..parent_at]) {
                                violations.push(Violation::new(
                                    "Measurement encountered that was not in pixels: \
                                     a percentage width for img is only allowable when nested \
                                     within a style block with a percentage width",
                                    fragment.clone(),
                                ));
                            }
                            continue;
                        }
                    }
                }
            }

            // Any measurement in a unit other than px is invalid. The unit
            // scan misses the "percentage(0.1)" form, so percentages get a
            // final explicit check.
            for unit in MEASUREMENT_UNITS.iter().filter(|u| **u != "px") {
                let Some(prefix_len) = segment.len().checked_sub(unit.len()) else {
                    continue;
                };
                let Some(suffix) = segment.get(prefix_len..) else {
                    continue;
                };
                if suffix.eq_ignore_ascii_case(unit)
                    && segment[..prefix_len].trim().parse::<f32>().is_ok()
                {
                    violations.push(Violation::new(
                        "Measurement encountered that was not in pixels",
                        fragment.clone(),
                    ));
                    continue 'segments;
                }
            }
            if is_percentage_segment(segment) {
                violations.push(Violation::new(
                    "Measurement encountered that was not in pixels",
                    fragment.clone(),
                ));
            }
        }

        // Border widths must be explicit; the keyword widths leave the
        // rendered size up to the browser.
        let property = value.property.name.to_lowercase();
        if (property == "border" || property.starts_with("border-"))
            && value.segments.iter().any(|s| {
                s.eq_ignore_ascii_case("thin")
                    || s.eq_ignore_ascii_case("medium")
                    || s.eq_ignore_ascii_case("thick")
            })
        {
            violations.push(Violation::new(
                "Measurement encountered that was not in pixels: \
                 border widths may not use the thin/medium/thick keywords",
                fragment.clone(),
            ));
        }
    }
}

struct ContainerRef<'a> {
    selector: &'a Selector,
    is_media_query: bool,
}

fn is_percentage_segment(segment: &str) -> bool {
    segment.ends_with('%')
        || segment
            .get(.."percentage(".len())
            .is_some_and(|head| head.eq_ignore_ascii_case("percentage("))
}

/// Whether any strictly-enclosing container sets a `width` whose extracted
/// measurements are all percentages.
fn has_enclosing_percentage_width(enclosing: &[ContainerRef<'_>]) -> bool {
    enclosing
        .iter()
        .flat_map(|c| c.selector.children.iter())
        .filter_map(|child| match child {
            Fragment::StylePropertyValue(value) => Some(value),
            _ => None,
        })
        .any(|value| {
            value.property.has_name("width")
                && value.measurements().iter().all(|m| m.is_percentage())
        })
}

impl EnforceRules for AllMeasurementsMustBePixels {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        match sheet_type {
            // The img exemption depends on nesting that no longer exists once
            // content has been combined or compiled; resets may carry
            // deliberate sizing hacks.
            SheetType::Compiled | SheetType::Combined | SheetType::Reset => false,
            SheetType::Themes | SheetType::Other => true,
        }
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_fragments(fragments, &mut Vec::new(), &mut violations);
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build, prop, sel};

    fn widths_only() -> AllMeasurementsMustBePixels {
        AllMeasurementsMustBePixels::new(
            MeasurementConformity {
                allow_percentage_widths_on_specified_element_types: true,
                ..MeasurementConformity::default()
            },
            ["div", "td", "th"],
        )
        .unwrap()
    }

    #[test]
    fn pixel_measurements_pass_strict() {
        let fragments = build([sel(
            "div.x",
            [prop("width", "320px"), prop("margin", "0")],
        )]);
        assert!(AllMeasurementsMustBePixels::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn em_measurements_fail_strict() {
        let fragments = build([sel("div.x", [prop("font-size", "1.5em")])]);
        assert_eq!(AllMeasurementsMustBePixels::strict().check_all(&fragments).len(), 1);
    }

    #[test]
    fn percentage_fails_strict() {
        let fragments = build([sel("div.x", [prop("width", "50%")])]);
        assert_eq!(AllMeasurementsMustBePixels::strict().check_all(&fragments).len(), 1);
    }

    #[test]
    fn percentage_function_fails_strict_like_a_percent_literal() {
        let with_function = build([sel("div.x", [prop("width", "percentage(0.1)")])]);
        let with_literal = build([sel("div.x", [prop("width", "10%")])]);
        let rule = AllMeasurementsMustBePixels::strict();
        assert_eq!(rule.check_all(&with_function).len(), 1);
        assert_eq!(rule.check_all(&with_literal).len(), 1);
    }

    #[test]
    fn non_measurement_keywords_pass() {
        let fragments = build([sel(
            "div.x",
            [prop("width", "auto"), prop("border", "0 solid black")],
        )]);
        assert!(AllMeasurementsMustBePixels::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn one_hundred_percent_allowed_when_configured() {
        let fragments = build([sel("span.x", [prop("font-size", "100%")])]);
        let rule = AllMeasurementsMustBePixels::new(
            MeasurementConformity {
                allow_one_hundred_percent_on_any_element_and_property: true,
                ..MeasurementConformity::default()
            },
            Vec::<&str>::new(),
        )
        .unwrap();
        assert!(rule.check_all(&fragments).is_empty());
        assert_eq!(AllMeasurementsMustBePixels::strict().check_all(&fragments).len(), 1);
    }

    #[test]
    fn percentage_width_on_allowed_element_passes() {
        let fragments = build([sel("div.Main", [prop("width", "50%")])]);
        assert!(widths_only().check_all(&fragments).is_empty());
    }

    #[test]
    fn percentage_width_on_disallowed_element_fails() {
        let fragments = build([sel("span.Main", [prop("width", "50%")])]);
        assert_eq!(widths_only().check_all(&fragments).len(), 1);
    }

    #[test]
    fn percentage_non_width_property_still_fails_with_widths_only() {
        let fragments = build([sel("div.Main", [prop("margin-left", "50%")])]);
        assert_eq!(widths_only().check_all(&fragments).len(), 1);
    }

    #[test]
    fn percentage_any_property_allowed_when_configured() {
        let fragments = build([sel("div.Main", [prop("margin-left", "50%")])]);
        let rule = AllMeasurementsMustBePixels::new(
            MeasurementConformity {
                allow_percentages_on_all_properties_of_specified_element_types: true,
                ..MeasurementConformity::default()
            },
            ["div"],
        )
        .unwrap();
        assert!(rule.check_all(&fragments).is_empty());
    }

    #[test]
    fn img_full_width_inside_percentage_width_container_passes() {
        let fragments = build([sel(
            "div",
            [prop("width", "50%"), sel("img", [prop("width", "100%")])],
        )]);
        assert!(widths_only().check_all(&fragments).is_empty());
    }

    #[test]
    fn img_full_width_deeply_nested_passes() {
        let fragments = build([sel(
            "div",
            [
                prop("width", "50%"),
                sel("p", [sel("img", [prop("width", "100%")])]),
            ],
        )]);
        assert!(widths_only().check_all(&fragments).is_empty());
    }

    #[test]
    fn img_full_width_with_percentage_width_in_media_query_passes() {
        let fragments = build([sel(
            "div",
            [
                prop("width", "500px"),
                sel(
                    "@media screen and (max-width:70em)",
                    [prop("width", "50%"), sel("img", [prop("width", "100%")])],
                ),
            ],
        )]);
        assert!(widths_only().check_all(&fragments).is_empty());
    }

    #[test]
    fn img_full_width_without_percentage_width_container_fails() {
        let fragments = build([sel("img", [prop("width", "100%")])]);
        assert_eq!(widths_only().check_all(&fragments).len(), 1);
    }

    #[test]
    fn img_partial_width_inside_percentage_width_container_fails() {
        let fragments = build([sel(
            "div",
            [prop("width", "50%"), sel("img", [prop("width", "80%")])],
        )]);
        assert_eq!(widths_only().check_all(&fragments).len(), 1);
    }

    #[test]
    fn border_may_not_use_ems() {
        let fragments = build([sel("div.x", [prop("border", "0.5em solid black")])]);
        assert_eq!(widths_only().check_all(&fragments).len(), 1);
    }

    #[test]
    fn border_keyword_widths_fail() {
        for keyword in ["thin", "medium", "thick", "THICK"] {
            let fragments = build([sel(
                "div.x",
                [prop("border", &format!("{keyword} solid black"))],
            )]);
            assert_eq!(
                AllMeasurementsMustBePixels::strict().check_all(&fragments).len(),
                1,
                "{keyword}"
            );
        }
    }

    #[test]
    fn keyword_widths_on_non_border_properties_pass() {
        let fragments = build([sel("div.x", [prop("font-weight", "medium")])]);
        assert!(AllMeasurementsMustBePixels::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn keyframes_content_skipped_when_configured() {
        let fragments = build([sel(
            "@keyframes slide",
            [sel("from", [prop("left", "0%")]), sel("to", [prop("left", "100%")])],
        )]);
        let rule = AllMeasurementsMustBePixels::new(
            MeasurementConformity {
                do_not_validate_keyframes_properties: true,
                ..MeasurementConformity::default()
            },
            Vec::<&str>::new(),
        )
        .unwrap();
        assert!(rule.check_all(&fragments).is_empty());
        assert!(!AllMeasurementsMustBePixels::strict()
            .check_all(&fragments)
            .is_empty());
    }

    #[test]
    fn applies_to_page_and_theme_sheets_only() {
        let rule = AllMeasurementsMustBePixels::recommended();
        assert!(rule.applies_to(SheetType::Themes));
        assert!(rule.applies_to(SheetType::Other));
        assert!(!rule.applies_to(SheetType::Reset));
        assert!(!rule.applies_to(SheetType::Combined));
        assert!(!rule.applies_to(SheetType::Compiled));
    }

    #[test]
    fn configuration_validation() {
        // Percentage flag without an allow-list.
        assert_eq!(
            AllMeasurementsMustBePixels::new(
                MeasurementConformity {
                    allow_percentage_widths_on_specified_element_types: true,
                    ..MeasurementConformity::default()
                },
                Vec::<&str>::new(),
            )
            .unwrap_err(),
            ConfigError::MissingElementTypes
        );
        // Allow-list without a percentage flag.
        assert_eq!(
            AllMeasurementsMustBePixels::new(MeasurementConformity::default(), ["div"])
                .unwrap_err(),
            ConfigError::UnexpectedElementTypes
        );
        // Blank entry.
        assert_eq!(
            AllMeasurementsMustBePixels::new(
                MeasurementConformity {
                    allow_percentage_widths_on_specified_element_types: true,
                    ..MeasurementConformity::default()
                },
                ["div", "  "],
            )
            .unwrap_err(),
            ConfigError::BlankElementType
        );
    }
}
