//! Margin, padding and border width must be fully specified if specified at
//! all.
//!
//! `padding: 16px` is fine; so is `padding: 16px; padding-top: 8px` or all
//! four sides named individually. `padding-left: 16px` on its own leaves the
//! other three sides to be inherited through the cascade, which is the
//! dependency this discipline forbids. The three rules share one algorithm
//! parameterized by five case-insensitive property-name sets; the border
//! variant accepts the width synonyms (`border-top` / `border-top-width`).

use crate::parser::fragment::Fragment;
use crate::rules::{EnforceRules, SheetType, Violation};

struct SidePropertyNames {
    top: &'static [&'static str],
    left: &'static [&'static str],
    bottom: &'static [&'static str],
    right: &'static [&'static str],
    all_sides: &'static [&'static str],
}

fn check_fully_specified(
    fragments: &[Fragment],
    names: &SidePropertyNames,
    message: &str,
    violations: &mut Vec<Violation>,
) {
    for fragment in fragments {
        let Some(container) = fragment.as_container() else {
            continue;
        };

        let property_names: Vec<String> = container
            .children
            .iter()
            .filter_map(|child| match child {
                Fragment::StylePropertyName(name) => Some(name.name.to_lowercase()),
                _ => None,
            })
            .collect();
        let any_named = |set: &[&str]| property_names.iter().any(|n| set.contains(&n.as_str()));

        let top = any_named(names.top);
        let left = any_named(names.left);
        let bottom = any_named(names.bottom);
        let right = any_named(names.right);
        if top || left || bottom || right {
            let all_sides_covered =
                any_named(names.all_sides) || (top && left && bottom && right);
            if !all_sides_covered {
                violations.push(Violation::new(message, fragment.clone()));
            }
        }

        check_fully_specified(&container.children, names, message, violations);
    }
}

/// Fully-specified rules never apply to combined or compiled content; the
/// per-file view is where incomplete shorthand is meaningful.
fn applies_to_uncombined(sheet_type: SheetType) -> bool {
    !matches!(sheet_type, SheetType::Combined | SheetType::Compiled)
}

/// If any margin side is named, all four must be determinable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarginMustBeFullySpecifiedIfSpecifiedAtAll;

impl EnforceRules for MarginMustBeFullySpecifiedIfSpecifiedAtAll {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        applies_to_uncombined(sheet_type)
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_fully_specified(
            fragments,
            &SidePropertyNames {
                top: &["margin-top"],
                left: &["margin-left"],
                bottom: &["margin-bottom"],
                right: &["margin-right"],
                all_sides: &["margin"],
            },
            "Style block encountered with incomplete margin specification",
            &mut violations,
        );
        violations
    }
}

/// If any padding side is named, all four must be determinable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddingMustBeFullySpecifiedIfSpecifiedAtAll;

impl EnforceRules for PaddingMustBeFullySpecifiedIfSpecifiedAtAll {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        applies_to_uncombined(sheet_type)
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_fully_specified(
            fragments,
            &SidePropertyNames {
                top: &["padding-top"],
                left: &["padding-left"],
                bottom: &["padding-bottom"],
                right: &["padding-right"],
                all_sides: &["padding"],
            },
            "Style block encountered with incomplete padding specification",
            &mut violations,
        );
        violations
    }
}

/// If any border width is named, all four must be determinable, one way or
/// another.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderWidthMustBeFullySpecifiedIfSpecifiedAtAll;

impl EnforceRules for BorderWidthMustBeFullySpecifiedIfSpecifiedAtAll {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        applies_to_uncombined(sheet_type)
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_fully_specified(
            fragments,
            &SidePropertyNames {
                top: &["border-top", "border-top-width"],
                left: &["border-left", "border-left-width"],
                bottom: &["border-bottom", "border-bottom-width"],
                right: &["border-right", "border-right-width"],
                all_sides: &["border", "border-width"],
            },
            "Style block encountered with incomplete border width specification",
            &mut violations,
        );
        violations
    }
}
