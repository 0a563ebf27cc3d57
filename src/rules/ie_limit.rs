//! Legacy IE selector limit.
//!
//! IE versions before 10 silently ignore every rule after the 4095th
//! selector in a stylesheet, which can go unnoticed for a long time. Only the
//! fully compiled output has the final selector count, so this rule applies
//! to nothing else.

use crate::parser::fragment::Fragment;
use crate::rules::{EnforceRules, SheetType, Violation};

const MAX_NUMBER_OF_SELECTORS: usize = 4095;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyIESelectorLimitMustBeRespected;

/// Sum of selector alternatives across every `Selector` in the tree. A
/// media-query header is not itself a selector, but its children count.
fn count_selectors(fragments: &[Fragment]) -> usize {
    fragments
        .iter()
        .map(|fragment| {
            let own = match fragment {
                Fragment::Selector(selector) => selector.selectors.len(),
                _ => 0,
            };
            own + count_selectors(fragment.children())
        })
        .sum()
}

fn first_selector(fragments: &[Fragment]) -> Option<&Fragment> {
    for fragment in fragments {
        if matches!(fragment, Fragment::Selector(_)) {
            return Some(fragment);
        }
        if let Some(found) = first_selector(fragment.children()) {
            return Some(found);
        }
    }
    None
}

impl EnforceRules for LegacyIESelectorLimitMustBeRespected {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        sheet_type == SheetType::Compiled
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let total = count_selectors(fragments);
        if total <= MAX_NUMBER_OF_SELECTORS {
            return Vec::new();
        }
        // total > 0 here, so a selector fragment must exist.
        let fragment = first_selector(fragments)
            .expect("selector count is non-zero")
            .clone();
        vec![Violation::new(
            format!(
                "Legacy IE (pre-v10) selector limit ({MAX_NUMBER_OF_SELECTORS}) exceeded ({total})"
            ),
            fragment,
        )]
    }
}
