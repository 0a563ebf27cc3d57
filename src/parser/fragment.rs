//! Fragment model: the structural tree a stylesheet parses into.
//!
//! The tree is strictly hierarchical: every child fragment is owned by
//! exactly one container, and a container records its ancestors' selector
//! sets *by value* so that a fragment can be reasoned about (and tested)
//! without its parent existing.

use std::fmt;

/// A string in which every whitespace run has been collapsed to a single
/// space and leading/trailing whitespace trimmed. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Normalize `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is blank; callers split and filter before
    /// constructing.
    pub fn new(value: &str) -> Self {
        let mut normalized = String::with_capacity(value.len());
        let mut pending_space = false;
        for c in value.trim().chars() {
            if c.is_whitespace() {
                pending_space = true;
            } else {
                if pending_space && !normalized.is_empty() {
                    normalized.push(' ');
                }
                pending_space = false;
                normalized.push(c);
            }
        }
        assert!(!normalized.is_empty(), "blank selector text");
        Self(normalized)
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The comma-separated alternatives of one `{ }` block's selector text.
/// Non-empty; no alternative contains a comma (commas are the split
/// boundary, never content).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorSet(Vec<NormalizedText>);

impl SelectorSet {
    /// Build a set from already-normalized alternatives.
    ///
    /// # Panics
    ///
    /// Panics if `alternatives` is empty or any entry contains a comma.
    pub fn new(alternatives: Vec<NormalizedText>) -> Self {
        assert!(!alternatives.is_empty(), "empty selector set");
        assert!(
            alternatives.iter().all(|a| !a.value().contains(',')),
            "selector alternative contains a comma"
        );
        Self(alternatives)
    }

    /// Split raw selector text on commas, trim and normalize each piece, and
    /// drop blank pieces. Returns `None` when nothing remains.
    pub fn parse(text: &str) -> Option<Self> {
        let alternatives: Vec<NormalizedText> = text
            .split(',')
            .filter(|piece| !piece.trim().is_empty())
            .map(NormalizedText::new)
            .collect();
        if alternatives.is_empty() {
            None
        } else {
            Some(Self(alternatives))
        }
    }

    pub fn alternatives(&self) -> &[NormalizedText] {
        &self.0
    }

    pub fn first(&self) -> &NormalizedText {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedText> {
        self.0.iter()
    }
}

impl fmt::Display for SelectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for alternative in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            f.write_str(alternative.value())?;
        }
        Ok(())
    }
}

/// A style property name, e.g. `color` or the LESS value name `@base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePropertyName {
    pub name: String,
    /// Zero-based source line.
    pub source_line: usize,
}

impl StylePropertyName {
    pub fn new(name: impl Into<String>, source_line: usize) -> Self {
        Self {
            name: name.into(),
            source_line,
        }
    }

    /// Case-insensitive name comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A style property value: the whitespace-delimited, quote-aware segments
/// that followed a property name, together with a by-value copy of that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePropertyValue {
    pub property: StylePropertyName,
    pub segments: Vec<String>,
    /// Zero-based source line of the first value segment.
    pub source_line: usize,
}

impl StylePropertyValue {
    pub fn new(property: StylePropertyName, segments: Vec<String>, source_line: usize) -> Self {
        Self {
            property,
            segments,
            source_line,
        }
    }

    /// The segments joined around single spaces.
    pub fn joined_value(&self) -> String {
        self.segments.join(" ")
    }

    /// Case-insensitive comparison against the space-joined segments.
    pub fn has_value(&self, value: &str) -> bool {
        self.joined_value().eq_ignore_ascii_case(value)
    }

    /// `true` when any segment is the `!important` flag.
    pub fn is_important(&self) -> bool {
        self.segments
            .iter()
            .any(|s| s.eq_ignore_ascii_case("!important"))
    }
}

/// A selector block (or, as [`Fragment::MediaQuery`], a media-query block).
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub selectors: SelectorSet,
    /// Ancestor selector sets, outermost first. Empty for top-level blocks.
    pub parent_selectors: Vec<SelectorSet>,
    pub children: Vec<Fragment>,
    /// Zero-based source line of the selector text.
    pub source_line: usize,
}

impl Selector {
    pub fn new(
        selectors: SelectorSet,
        parent_selectors: Vec<SelectorSet>,
        children: Vec<Fragment>,
        source_line: usize,
    ) -> Self {
        Self {
            selectors,
            parent_selectors,
            children,
            source_line,
        }
    }

    /// `true` for top-level blocks with no enclosing selector.
    pub fn is_top_level(&self) -> bool {
        self.parent_selectors.is_empty()
    }
}

/// An `@import` statement. Opaque to most rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub target: String,
    pub source_line: usize,
}

/// One node of the parsed tree. Only `Selector` and `MediaQuery` own
/// children; a media query is structurally a selector whose first alternative
/// begins with `@media`.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    StylePropertyName(StylePropertyName),
    StylePropertyValue(StylePropertyValue),
    Selector(Selector),
    MediaQuery(Selector),
    Import(Import),
}

impl Fragment {
    /// Zero-based source line of this fragment.
    pub fn source_line(&self) -> usize {
        match self {
            Fragment::StylePropertyName(name) => name.source_line,
            Fragment::StylePropertyValue(value) => value.source_line,
            Fragment::Selector(selector) | Fragment::MediaQuery(selector) => selector.source_line,
            Fragment::Import(import) => import.source_line,
        }
    }

    /// The container payload, for the two variants that may own children.
    pub fn as_container(&self) -> Option<&Selector> {
        match self {
            Fragment::Selector(selector) | Fragment::MediaQuery(selector) => Some(selector),
            _ => None,
        }
    }

    /// Child fragments; empty for non-container variants.
    pub fn children(&self) -> &[Fragment] {
        self.as_container().map(|c| &c.children[..]).unwrap_or(&[])
    }

    /// Short human-readable description used in violation messages.
    pub fn describe(&self) -> String {
        match self {
            Fragment::StylePropertyName(name) => name.name.clone(),
            Fragment::StylePropertyValue(value) => {
                format!("{}: {}", value.property.name, value.joined_value())
            }
            Fragment::Selector(selector) | Fragment::MediaQuery(selector) => {
                selector.selectors.to_string()
            }
            Fragment::Import(import) => format!("@import {}", import.target),
        }
    }
}
