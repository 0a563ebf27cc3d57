//! Selector classification helpers: scope restriction, bareness, keyframes,
//! tag targeting and media-query flattening.

use crate::parser::fragment::{Fragment, NormalizedText, Selector, SelectorSet};

/// Produce a copy of the tree with every media query dissolved: media-query
/// children are promoted to the level the query appeared at, and any
/// `@media` entry is stripped from remaining ancestor records. The input is
/// untouched.
pub fn remove_media_queries(fragments: &[Fragment]) -> Vec<Fragment> {
    let mut result = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Selector(selector) => {
                result.push(Fragment::Selector(Selector::new(
                    selector.selectors.clone(),
                    selector
                        .parent_selectors
                        .iter()
                        .filter(|set| !is_media_query_set(set))
                        .cloned()
                        .collect(),
                    remove_media_queries(&selector.children),
                    selector.source_line,
                )));
            }
            Fragment::MediaQuery(media) => {
                result.extend(remove_media_queries(&media.children));
            }
            other => result.push(other.clone()),
        }
    }
    result
}

fn is_media_query_set(set: &SelectorSet) -> bool {
    set.first()
        .value()
        .get(.."@media".len())
        .is_some_and(|h| h.eq_ignore_ascii_case("@media"))
}

impl Selector {
    /// A scope-restricting `html` tag: a top-level selector whose every
    /// alternative is exactly `html` and which contains no styling of its
    /// own (only nested blocks and LESS value assignments), so that it
    /// exists purely to narrow the scope of what it wraps.
    pub fn is_scope_restricting_html_tag(&self) -> bool {
        self.is_scope_restricting_tag("html")
    }

    /// As [`is_scope_restricting_html_tag`](Self::is_scope_restricting_html_tag),
    /// for `body`.
    pub fn is_scope_restricting_body_tag(&self) -> bool {
        self.is_scope_restricting_tag("body")
    }

    fn is_scope_restricting_tag(&self, tag: &str) -> bool {
        if !self.parent_selectors.is_empty() {
            return false;
        }
        if self.selectors.iter().any(|s| s.value() != tag) {
            return false;
        }

        // Any style set directly on the tag (including inside a nested media
        // query, whose content applies to the tag once the query matches)
        // means it is not purely for scope restriction. LESS value
        // assignments (`@name: value`) are allowed, but each must be
        // immediately followed by its value.
        let mut expecting_less_value = false;
        for child in remove_media_queries(&self.children) {
            match child {
                Fragment::StylePropertyName(name) if name.name.starts_with('@') => {
                    if expecting_less_value {
                        return false;
                    }
                    expecting_less_value = true;
                }
                Fragment::StylePropertyName(_) => return false,
                Fragment::StylePropertyValue(_) => {
                    expecting_less_value = false;
                }
                Fragment::Selector(_) | Fragment::MediaQuery(_) => {
                    if expecting_less_value {
                        return false;
                    }
                }
                Fragment::Import(_) => {}
            }
        }
        !expecting_less_value
    }

    /// `true` when every alternative of this selector is bare (targets
    /// element types only).
    pub fn is_bare_selector(&self) -> bool {
        self.selectors.only_targets_bare_selectors()
    }

    /// `true` for `@keyframes` blocks, including vendor-prefixed forms such
    /// as `@-webkit-keyframes`.
    pub fn is_keyframes_declaration(&self) -> bool {
        let first = self.selectors.first().value();
        let lowered = first.to_ascii_lowercase();
        lowered.starts_with("@keyframes")
            || (lowered.starts_with("@-") && lowered.contains("keyframes"))
    }

    /// `true` when every alternative's final segment targets one of the
    /// given tag names (`div.Header div.Logo, div.Footer div.Logo` targets
    /// only `div`). Matching is case-insensitive.
    pub fn targets_only_tag_names(&self, tag_names: &[impl AsRef<str>]) -> bool {
        self.selectors.iter().all(|alternative| {
            let final_segment = alternative
                .value()
                .rsplit(' ')
                .next()
                .unwrap_or("");
            let targeted = final_segment
                .split(['.', '#', ':'])
                .next()
                .unwrap_or("");
            tag_names
                .iter()
                .any(|t| t.as_ref().eq_ignore_ascii_case(targeted))
        })
    }
}

impl SelectorSet {
    /// `true` when no alternative carries a class or id qualifier.
    /// Alternatives starting with `@` are LESS constructs and never
    /// disqualify the set.
    pub fn only_targets_bare_selectors(&self) -> bool {
        !self.iter().any(|s| {
            let value = s.value();
            !value.starts_with('@') && (value.contains('.') || value.contains('#'))
        })
    }
}

/// The combinator-aware bareness test used for page-specific sheets: an
/// alternative is acceptable when every space/child-combinator-separated
/// segment either starts with the child (`>`) or parent-reference (`&`)
/// symbol or carries a class/id qualifier. Alternatives starting with `@`
/// are LESS constructs and pass through.
pub fn is_scoped_selector_alternative(alternative: &NormalizedText) -> bool {
    let value = alternative.value();
    if value.starts_with('@') {
        return true;
    }

    // Re-align any child combinator with the segment that follows it, so
    // "div.Wrapper > h2" splits as ["div.Wrapper", ">h2"].
    let realigned = value
        .replace("> ", ">")
        .replace('>', " >")
        .replace("  ", " ");
    realigned
        .split(' ')
        .filter(|segment| !segment.is_empty())
        .all(|segment| {
            segment.starts_with('>')
                || segment.starts_with('&')
                || segment.contains('.')
                || segment.contains('#')
        })
}
