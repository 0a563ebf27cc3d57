//! Test support: fragment-tree builders and an in-memory file loader.
//!
//! Rule tests describe the tree they need declaratively instead of going
//! through the parser:
//!
//! ```
//! use nocascade::testing::{build, prop, sel};
//!
//! let fragments = build([sel(
//!     "div",
//!     [prop("width", "50%"), sel("img", [prop("width", "100%")])],
//! )]);
//! assert_eq!(fragments.len(), 1);
//! ```

use std::collections::HashMap;

use crate::parser::fragment::{
    Fragment, Selector, SelectorSet, StylePropertyName, StylePropertyValue,
};
use crate::pipeline::{LoadError, TextFileContents, TextFileLoader};

/// One node of a tree under construction.
#[derive(Debug, Clone)]
pub enum Node {
    Block {
        selectors: String,
        children: Vec<Node>,
    },
    Property {
        name: String,
        value: String,
    },
}

/// A selector (or, when the selector text starts with `@media`, media-query)
/// block.
pub fn sel(selectors: &str, children: impl IntoIterator<Item = Node>) -> Node {
    Node::Block {
        selectors: selectors.to_string(),
        children: children.into_iter().collect(),
    }
}

/// A property declaration; the value is split into whitespace-delimited
/// segments.
pub fn prop(name: &str, value: &str) -> Node {
    Node::Property {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Translate top-level nodes into fragments, propagating ancestor selector
/// sets the way the parser does.
pub fn build(nodes: impl IntoIterator<Item = Node>) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for node in nodes {
        translate(&node, &[], &mut fragments);
    }
    fragments
}

fn translate(node: &Node, parent_selectors: &[SelectorSet], out: &mut Vec<Fragment>) {
    match node {
        Node::Property { name, value } => {
            let property = StylePropertyName::new(name.clone(), 0);
            out.push(Fragment::StylePropertyName(property.clone()));
            out.push(Fragment::StylePropertyValue(StylePropertyValue::new(
                property,
                value.split_whitespace().map(str::to_string).collect(),
                0,
            )));
        }
        Node::Block {
            selectors,
            children,
        } => {
            let selector_set = SelectorSet::parse(selectors)
                .unwrap_or_else(|| panic!("blank selector text {selectors:?}"));
            let mut child_parents = parent_selectors.to_vec();
            child_parents.push(selector_set.clone());
            let mut child_fragments = Vec::new();
            for child in children {
                translate(child, &child_parents, &mut child_fragments);
            }
            let selector = Selector::new(
                selector_set,
                parent_selectors.to_vec(),
                child_fragments,
                0,
            );
            let is_media = selector
                .selectors
                .first()
                .value()
                .get(.."@media".len())
                .is_some_and(|h| h.eq_ignore_ascii_case("@media"));
            out.push(if is_media {
                Fragment::MediaQuery(selector)
            } else {
                Fragment::Selector(selector)
            });
        }
    }
}

/// An in-memory [`TextFileLoader`] keyed by relative path.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileLoader {
    files: HashMap<String, String>,
}

impl MemoryFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, relative_path: &str, content: &str) -> Self {
        self.files
            .insert(relative_path.to_string(), content.to_string());
        self
    }
}

impl TextFileLoader for MemoryFileLoader {
    fn load(&self, relative_path: &str) -> Result<TextFileContents, LoadError> {
        match self.files.get(relative_path) {
            Some(content) => Ok(TextFileContents {
                relative_path: relative_path.to_string(),
                content: content.clone(),
            }),
            None => Err(LoadError::NotFound {
                path: relative_path.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_nodes_emit_name_and_value_siblings() {
        let fragments = build([sel("div.x", [prop("border", "1px solid black")])]);
        let children = fragments[0].children();
        assert_eq!(children.len(), 2);
        match (&children[0], &children[1]) {
            (Fragment::StylePropertyName(name), Fragment::StylePropertyValue(value)) => {
                assert_eq!(name.name, "border");
                assert_eq!(value.property.name, "border");
                assert_eq!(value.segments, vec!["1px", "solid", "black"]);
            }
            other => panic!("unexpected children: {other:?}"),
        }
    }

    #[test]
    fn nested_blocks_carry_parent_lineage() {
        let fragments = build([sel("div", [sel("img", [prop("width", "100%")])])]);
        let img = match &fragments[0].children()[0] {
            Fragment::Selector(s) => s,
            other => panic!("expected selector, got {other:?}"),
        };
        assert_eq!(img.parent_selectors.len(), 1);
        assert_eq!(img.parent_selectors[0].to_string(), "div");
    }

    #[test]
    fn media_blocks_become_media_queries() {
        let fragments = build([sel("@media screen", [sel("div.x", [])])]);
        assert!(matches!(fragments[0], Fragment::MediaQuery(_)));
    }

    #[test]
    fn memory_loader_round_trip() {
        let loader = MemoryFileLoader::new().with_file("a.css", "div.x { color: red; }");
        let loaded = loader.load("a.css").unwrap();
        assert_eq!(loaded.relative_path, "a.css");
        assert!(loaded.content.contains("div.x"));
        assert!(loader.load("missing.css").is_err());
    }
}
