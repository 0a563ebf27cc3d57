//! Scope-restricting tag enforcement for page-specific sheets.
//!
//! Page-specific ("Other") sheets must wrap everything in a bare `html` (or
//! `body`) tag that exists purely to narrow scope: it may contain nested
//! blocks and LESS value assignments, never direct styles. `@import`
//! statements are ignored, since in uncompiled content they have not been
//! flattened yet.

use crate::parser::fragment::Fragment;
use crate::rules::{EnforceRules, SheetType, Violation};

/// Every top-level fragment must be a scope-restricting `html` tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTagScopingMustBeAppliedToNonResetsOrThemesSheets;

impl EnforceRules for HtmlTagScopingMustBeAppliedToNonResetsOrThemesSheets {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        // Resets and themes need no scoping, compiled output may have had the
        // scoping tags removed, and combined content includes resets/themes.
        sheet_type == SheetType::Other
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        check_top_level(fragments, "html", |selector| {
            selector.is_scope_restricting_html_tag()
        })
    }
}

/// Every top-level fragment must be a scope-restricting `body` tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyScopingMustBeAppliedToNonResetsOrThemesSheets;

impl EnforceRules for BodyScopingMustBeAppliedToNonResetsOrThemesSheets {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        sheet_type == SheetType::Other
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        check_top_level(fragments, "body", |selector| {
            selector.is_scope_restricting_body_tag()
        })
    }
}

fn check_top_level(
    fragments: &[Fragment],
    tag: &str,
    is_scope_restricting: impl Fn(&crate::parser::fragment::Selector) -> bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for fragment in fragments {
        match fragment {
            Fragment::Import(_) => continue,
            Fragment::Selector(selector) if is_scope_restricting(selector) => continue,
            _ => violations.push(Violation::new(
                format!("Scope-restricting {tag} tag not applied"),
                fragment.clone(),
            )),
        }
    }
    violations
}
