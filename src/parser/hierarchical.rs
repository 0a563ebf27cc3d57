//! Hierarchical parser: categorized tokens in, fragment tree out.
//!
//! Single-pass, non-backtracking recursive descent over the token stream,
//! with an explicit cursor threaded through the recursive calls. Each nesting
//! level accumulates selector/property text into a buffer and decides what
//! the buffer was when a structural token arrives. Only two conditions are
//! hard failures (an `{` with no preceding selector text, and unbalanced
//! braces at the top level); everything else degrades gracefully so the rules
//! can still report on the surrounding structure.

use crate::css::{tokenize, CategorizedToken, TokenCategory};
use crate::parser::fragment::{
    Fragment, Import, Selector, SelectorSet, StylePropertyName, StylePropertyValue,
};

/// Errors from hierarchical parsing. Lines are 1-based in messages.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("open brace encountered with no preceding selector at line {line}")]
    OpenBraceWithoutSelector { line: usize },
    #[error("selector text {text:?} contains no selector alternatives at line {line}")]
    EmptySelectorSet { text: String, line: usize },
    #[error("unparsable content encountered after line {line} (unbalanced braces?)")]
    UnbalancedContent { line: usize },
}

/// Tokenize and parse a complete stylesheet source.
pub fn parse_source(source: &str) -> Result<Vec<Fragment>, ParseError> {
    parse(&tokenize(source))
}

/// Parse a categorized token stream into top-level fragments.
///
/// After the top-level pass, any remaining token that is not a comment or
/// whitespace means a `}` closed a block that was never opened.
pub fn parse(tokens: &[CategorizedToken]) -> Result<Vec<Fragment>, ParseError> {
    let mut cursor = 0;
    let mut line = 0;
    let fragments = parse_fragments(tokens, &mut cursor, &[], &mut line)?;

    while let Some(token) = tokens.get(cursor) {
        match token.category {
            TokenCategory::Comment | TokenCategory::Whitespace => cursor += 1,
            _ => {
                let last_line = fragments.last().map(|f| f.source_line()).unwrap_or(0);
                return Err(ParseError::UnbalancedContent {
                    line: last_line + 1,
                });
            }
        }
    }
    Ok(fragments)
}

/// In-progress property value: the owning property, the segments collected so
/// far, and the line of the first segment.
struct PendingValue {
    property: StylePropertyName,
    segments: Vec<String>,
    source_line: usize,
}

impl PendingValue {
    fn into_fragment(self) -> Fragment {
        Fragment::StylePropertyValue(StylePropertyValue::new(
            self.property,
            self.segments,
            self.source_line,
        ))
    }
}

/// Parse the sibling fragments of one nesting level, consuming the matching
/// `}` (or the rest of the input at the top level).
fn parse_fragments(
    tokens: &[CategorizedToken],
    cursor: &mut usize,
    parent_selectors: &[SelectorSet],
    line: &mut usize,
) -> Result<Vec<Fragment>, ParseError> {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut buffer = String::new();
    let mut buffer_start_line = 0;
    let mut current_property: Option<StylePropertyName> = None;
    let mut pending_value: Option<PendingValue> = None;

    while let Some(token) = tokens.get(*cursor) {
        *cursor += 1;
        match token.category {
            TokenCategory::Comment => {
                *line += count_line_breaks(&token.text);
            }

            TokenCategory::Whitespace => {
                *line += count_line_breaks(&token.text);
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
            }

            TokenCategory::SelectorOrStyleProperty => {
                if buffer.is_empty() {
                    buffer_start_line = *line;
                }
                buffer.push_str(&token.text);
            }

            TokenCategory::OpenBrace => {
                flush_value(&mut fragments, &mut pending_value);
                if buffer.trim().is_empty() {
                    return Err(ParseError::OpenBraceWithoutSelector { line: *line + 1 });
                }
                let selectors = SelectorSet::parse(&buffer).ok_or_else(|| {
                    ParseError::EmptySelectorSet {
                        text: buffer.clone(),
                        line: *line + 1,
                    }
                })?;
                let mut child_parents = parent_selectors.to_vec();
                child_parents.push(selectors.clone());
                let children = parse_fragments(tokens, cursor, &child_parents, line)?;
                let selector = Selector::new(
                    selectors,
                    parent_selectors.to_vec(),
                    children,
                    buffer_start_line,
                );
                fragments.push(if is_media_query(&selector) {
                    Fragment::MediaQuery(selector)
                } else {
                    Fragment::Selector(selector)
                });
                buffer.clear();
            }

            TokenCategory::CloseBrace => {
                flush_value(&mut fragments, &mut pending_value);
                // Trailing content before a close brace is probably invalid,
                // but nothing is thrown away.
                if !buffer.is_empty() {
                    fragments.push(name_like_fragment(&buffer, buffer_start_line));
                    buffer.clear();
                }
                return Ok(fragments);
            }

            TokenCategory::StylePropertyColon | TokenCategory::SemiColon => {
                flush_value(&mut fragments, &mut pending_value);
                // A semicolon with no buffered content is just a separator.
                if !buffer.is_empty() {
                    let fragment = name_like_fragment(&buffer, buffer_start_line);
                    if let Fragment::StylePropertyName(name) = &fragment {
                        current_property = Some(name.clone());
                    }
                    fragments.push(fragment);
                    buffer.clear();
                }
            }

            TokenCategory::Value => {
                // A value with selector/property text still buffered means a
                // colon was omitted; flush the buffer as a property name
                // rather than discarding it.
                if !buffer.is_empty() {
                    let name = StylePropertyName::new(buffer.trim_end(), buffer_start_line);
                    current_property = Some(name.clone());
                    fragments.push(Fragment::StylePropertyName(name));
                    buffer.clear();
                }
                if let Some(pending) = pending_value.as_mut() {
                    pending.segments.push(token.text.clone());
                } else if let Some(property) = &current_property {
                    pending_value = Some(PendingValue {
                        property: property.clone(),
                        segments: vec![token.text.clone()],
                        source_line: *line,
                    });
                }
                // A value with no property in scope at all is dropped;
                // malformed input is tolerated, not invented for.
            }
        }
    }

    // End of input inside an open block: keep whatever was accumulated
    // rather than discarding it.
    flush_value(&mut fragments, &mut pending_value);
    if !buffer.is_empty() {
        if let Some(selectors) = SelectorSet::parse(&buffer) {
            fragments.push(Fragment::Selector(Selector::new(
                selectors,
                parent_selectors.to_vec(),
                Vec::new(),
                buffer_start_line,
            )));
        }
    }
    Ok(fragments)
}

fn flush_value(fragments: &mut Vec<Fragment>, pending_value: &mut Option<PendingValue>) {
    if let Some(pending) = pending_value.take() {
        fragments.push(pending.into_fragment());
    }
}

/// Buffered text being flushed outside a value position: an `@import`
/// statement or a plain property name (mixin invocations land here too).
fn name_like_fragment(buffer: &str, source_line: usize) -> Fragment {
    let text = buffer.trim_end();
    let head = text.get(.."@import".len());
    if head.is_some_and(|h| h.eq_ignore_ascii_case("@import")) {
        let rest = &text["@import".len()..];
        if rest.starts_with(|c: char| c.is_whitespace())
            || rest.starts_with('"')
            || rest.starts_with('\'')
        {
            return Fragment::Import(Import {
                target: import_target(rest),
                source_line,
            });
        }
    }
    Fragment::StylePropertyName(StylePropertyName::new(text, source_line))
}

/// Strip `url( ... )` wrapping and surrounding quotes from an import target.
fn import_target(rest: &str) -> String {
    let mut target = rest.trim();
    if target.get(..4).is_some_and(|h| h.eq_ignore_ascii_case("url(")) && target.ends_with(')') {
        target = target[4..target.len() - 1].trim();
    }
    let target = target
        .strip_prefix(['"', '\''])
        .and_then(|t| t.strip_suffix(['"', '\'']))
        .unwrap_or(target);
    target.to_string()
}

fn is_media_query(selector: &Selector) -> bool {
    let first = selector.selectors.first().value();
    first
        .get(.."@media".len())
        .is_some_and(|h| h.eq_ignore_ascii_case("@media"))
}

fn count_line_breaks(text: &str) -> usize {
    text.replace("\r\n", "\n").replace('\r', "\n").matches('\n').count()
}
