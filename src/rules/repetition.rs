//! No selector may be repeated in the rules.
//!
//! Each element should be fully defined in one place; LESS mixins exist for
//! sharing styles between elements. The rule only makes sense on *combined*
//! content: per-file checks could not see cross-file repetition, and compiled
//! output legitimately repeats selectors whenever mixins are expanded.
//!
//! Each container owning at least one direct property value is recorded under
//! every fully-qualified selector path that reaches it (the cross product of
//! its own alternatives with every ancestor's). A media-query header becomes
//! a path segment of its own, which is what makes `div.Header` under
//! `@media A` distinct from the same selector under `@media B`.

use std::collections::HashMap;

use crate::parser::fragment::{Fragment, NormalizedText, SelectorSet};
use crate::rules::{EnforceRules, SheetType, Violation};

#[derive(Debug, Clone, Copy)]
pub struct NoSelectorMayBeRepeatedInTheRules {
    allow_bare_selectors_to_be_repeated: bool,
}

impl NoSelectorMayBeRepeatedInTheRules {
    /// With `allow_bare_selectors_to_be_repeated`, repeated bare selectors
    /// are tolerated so that e.g. `strong` may be reset in a resets sheet and
    /// restyled in a theme sheet.
    pub fn new(allow_bare_selectors_to_be_repeated: bool) -> Self {
        Self {
            allow_bare_selectors_to_be_repeated,
        }
    }

    pub fn strict() -> Self {
        Self::new(false)
    }
}

/// A fully-qualified selector path paired with the container it reaches.
struct QualifiedPath<'a> {
    segments: Vec<NormalizedText>,
    source: &'a Fragment,
}

fn collect_paths<'a>(
    fragments: &'a [Fragment],
    parent_paths: &[Vec<NormalizedText>],
    out: &mut Vec<QualifiedPath<'a>>,
) {
    for fragment in fragments {
        let Some(container) = fragment.as_container() else {
            continue;
        };

        let mut paths: Vec<Vec<NormalizedText>> = Vec::new();
        if parent_paths.is_empty() {
            for alternative in container.selectors.iter() {
                paths.push(vec![alternative.clone()]);
            }
        } else {
            for parent_path in parent_paths {
                for alternative in container.selectors.iter() {
                    let mut path = parent_path.clone();
                    path.push(alternative.clone());
                    paths.push(path);
                }
            }
        }

        if container
            .children
            .iter()
            .any(|child| matches!(child, Fragment::StylePropertyValue(_)))
        {
            out.extend(paths.iter().map(|path| QualifiedPath {
                segments: path.clone(),
                source: fragment,
            }));
        }

        collect_paths(&container.children, &paths, out);
    }
}

fn path_is_bare(segments: &[NormalizedText]) -> bool {
    SelectorSet::new(segments.to_vec()).only_targets_bare_selectors()
}

impl EnforceRules for NoSelectorMayBeRepeatedInTheRules {
    fn applies_to(&self, sheet_type: SheetType) -> bool {
        sheet_type == SheetType::Combined
    }

    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation> {
        let mut paths = Vec::new();
        collect_paths(fragments, &[], &mut paths);

        let mut violations = Vec::new();
        let mut first_seen: HashMap<String, &Fragment> = HashMap::new();
        for path in &paths {
            if self.allow_bare_selectors_to_be_repeated && path_is_bare(&path.segments) {
                continue;
            }
            let key = path
                .segments
                .iter()
                .map(|s| s.value())
                .collect::<Vec<_>>()
                .join(" ");
            match first_seen.get(key.as_str()) {
                Some(first) => violations.push(Violation::new(
                    format!("Selector encountered multiple times: {key}"),
                    (*first).clone(),
                )),
                None => {
                    first_seen.insert(key, path.source);
                }
            }
        }
        violations
    }
}
