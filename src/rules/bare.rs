//! Bare-selector rules.
//!
//! Resets and themes sheets may *only* use bare selectors (element types with
//! no class/id qualifier): they define baseline appearance for everything.
//! Page-specific sheets may use *no* bare selectors: every rule must be tied
//! to a class or id so it cannot leak into unrelated markup.

use crate::parser::fragment::Fragment;
use crate::rules::{EnforceRules, SheetType, Violation};
use crate::semantics::selectors::is_scoped_selector_alternative;

/// Whether a scope-restricting `html` wrapper is exempt from the no-bare
/// check (it is bare by definition, but exists only to narrow scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRestrictingHtmlTagBehavior {
    Allow,
    Disallow,
}

/// No bare selectors in page-specific sheets.
#[derive(Debug, Clone, Copy)]
pub struct NoBareSelectorsInNonResetsOrThemeSheets {
    scope_restricting_html_tag_behavior: ScopeRestrictingHtmlTagBehavior,
}

impl NoBareSelectorsInNonResetsOrThemeSheets {
    pub fn new(scope_restricting_html_tag_behavior: ScopeRestrictingHtmlTagBehavior) -> Self {
        Self {
            scope_restricting_html_tag_behavior,
        }
    }

    /// Allow the scope-restricting html wrapper, matching the html-scoping
    /// rule's recommendation.
    pub fn recommended() -> Self {
        Self::new(ScopeRestrictingHtmlTagBehavior::Allow)
    }

    fn check_fragments(&self, fragments: &[Fragment], violations: &mut Vec<Violation>) {
        for fragment in fragments {
            if let Fragment::Selector(selector) = fragment {
                let exempt = self.scope_restricting_html_tag_behavior
                    == ScopeRestrictingHtmlTagBehavior::Allow
                    && selector.is_scope_restricting_html_tag();
                if !exempt
                    && selector
                        .selectors
                        .iter()
                        .any(|alternative| !is_scoped_selector_alternative(alternative))
                {
                    violations.push(Violation::new(
                        format!(
                            "Disallowed bare selector encountered (\"{}\" at line {})",
                            selector.selectors,
                            selector.source_line + 1
                        ),
                        fragment.clone(),
                    ));
                }
            }
            self.check_fragments(fragment.children(), violations);
        }
    }
}

impl EnforceRules for NoBareSelectorsInNonResetsOrThemeSheets {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        // Anything else either is resets/themes content or may contain it.
        sheet_type == SheetType::Other
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_fragments(fragments, &mut violations);
        violations
    }
}

/// Only bare selectors in resets and themes sheets.
#[derive(Debug, Clone, Copy)]
pub struct OnlyBareSelectorsInResetsAndThemeSheets {
    allow_less_css_mixins: bool,
}

impl OnlyBareSelectorsInResetsAndThemeSheets {
    pub fn new(allow_less_css_mixins: bool) -> Self {
        Self {
            allow_less_css_mixins,
        }
    }

    /// Allow LESS mixin declarations alongside bare selectors; mixins
    /// declared here are available to every other sheet. A mixin must carry
    /// its optional brackets (`.RoundedCorners ()`) since without them it
    /// cannot be told apart from a class selector.
    pub fn recommended() -> Self {
        Self::new(true)
    }

    pub fn strict() -> Self {
        Self::new(false)
    }

    fn check_fragments(&self, fragments: &[Fragment], violations: &mut Vec<Violation>) {
        for fragment in fragments {
            if let Fragment::Selector(selector) = fragment {
                let less_css_mixin = selector.selectors.first().value().contains('(');
                if !selector.is_bare_selector() && !(self.allow_less_css_mixins && less_css_mixin) {
                    violations.push(Violation::new(
                        format!(
                            "Non-bare selector encountered where this is invalid (\"{}\" at line {})",
                            selector.selectors,
                            selector.source_line + 1
                        ),
                        fragment.clone(),
                    ));
                }
            }
            self.check_fragments(fragment.children(), violations);
        }
    }
}

impl EnforceRules for OnlyBareSelectorsInResetsAndThemeSheets {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        matches!(sheet_type, SheetType::Reset | SheetType::Themes)
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_fragments(fragments, &mut violations);
        violations
    }
}
