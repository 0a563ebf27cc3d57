//! No media queries in resets and themes sheets.
//!
//! Responsive layout belongs in the page-specific sheets; resets and themes
//! set baseline appearance that holds everywhere.

use crate::parser::fragment::Fragment;
use crate::rules::{EnforceRules, SheetType, Violation};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoMediaQueriesInResetsAndThemeSheets;

impl NoMediaQueriesInResetsAndThemeSheets {
    fn check_fragments(&self, fragments: &[Fragment], violations: &mut Vec<Violation>) {
        for fragment in fragments {
            if let Fragment::MediaQuery(media) = fragment {
                violations.push(Violation::new(
                    format!(
                        "Media query content encountered where it is invalid (\"{}\" at line {})",
                        media.selectors,
                        media.source_line + 1
                    ),
                    fragment.clone(),
                ));
            }
            self.check_fragments(fragment.children(), violations);
        }
    }
}

impl EnforceRules for NoMediaQueriesInResetsAndThemeSheets {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        matches!(sheet_type, SheetType::Reset | SheetType::Themes)
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_fragments(fragments, &mut violations);
        violations
    }
}
