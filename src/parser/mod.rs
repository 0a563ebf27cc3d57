//! Fragment model and hierarchical parser.

pub mod fragment;
pub mod hierarchical;

pub use fragment::{
    Fragment, Import, NormalizedText, Selector, SelectorSet, StylePropertyName, StylePropertyValue,
};
pub use hierarchical::{parse, parse_source, ParseError};
