//! logos-based CSS/LESS tokenizer.
//!
//! Tokenization happens in two layers:
//!
//! 1. A raw lexer ([`RawToken`]) splits the source into comments, whitespace
//!    runs, quoted strings, structural punctuation and plain text runs.
//! 2. A categorizer state machine ([`tokenize`]) walks the raw tokens and
//!    assigns each span one of the eight [`TokenCategory`] values that the
//!    hierarchical parser consumes. The categorizer is what decides whether a
//!    `:` separates a property from its value or is part of a selector
//!    (`a:hover`, `(max-width:70em)`, `::before`).
//!
//! Raw text is preserved on every categorized token so that the parser can
//! count line breaks in whitespace and comment spans.

use logos::{Lexer, Logos};

/// Consume a block comment body up to and including the closing `*/`, or to
/// the end of input when the comment is unterminated.
fn block_comment(lex: &mut Lexer<RawToken>) {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(rest.len()),
    }
}

/// Raw lexical token produced by the first layer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    /// Block comment: `/* ... */` (unterminated comments run to end of input).
    #[token("/*", block_comment)]
    BlockComment,

    /// LESS line comment: `// ...`.
    #[regex(r"//[^\n\r]*")]
    LineComment,

    /// Whitespace run (spaces, tabs, line breaks).
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    /// `{`
    #[token("{")]
    OpenBrace,

    /// `}`
    #[token("}")]
    CloseBrace,

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    SemiColon,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    SingleQuoted,

    /// A lone `/` that is not part of a comment (e.g. `font: 12px/1.5`).
    #[token("/")]
    Slash,

    /// Any other run of non-structural text.
    #[regex(r#"[^{}:;'" \t\r\n\x0C/]+"#)]
    Text,
}

/// The closed category set consumed by the hierarchical parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Comment,
    Whitespace,
    SelectorOrStyleProperty,
    Value,
    OpenBrace,
    CloseBrace,
    StylePropertyColon,
    SemiColon,
}

/// A categorized span of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedToken {
    pub category: TokenCategory,
    pub text: String,
}

impl CategorizedToken {
    fn new(category: TokenCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

/// Pseudo-class keywords that may legitimately follow a `:` inside a selector.
///
/// A `:` whose immediately following text starts with one of these is treated
/// as selector content rather than as a property/value separator.
const PSEUDO_CLASSES: &[&str] = &[
    "active",
    "after",
    "before",
    "checked",
    "disabled",
    "empty",
    "enabled",
    "first-child",
    "first-letter",
    "first-line",
    "first-of-type",
    "focus",
    "hover",
    "in-range",
    "invalid",
    "lang",
    "last-child",
    "last-of-type",
    "link",
    "not",
    "nth-child",
    "nth-last-child",
    "nth-last-of-type",
    "nth-of-type",
    "only-child",
    "only-of-type",
    "optional",
    "out-of-range",
    "read-only",
    "read-write",
    "required",
    "root",
    "selection",
    "target",
    "valid",
    "visited",
];

/// Matches when `text` begins with a pseudo-class keyword at an identifier
/// boundary, so `hover` and `nth-child(2n)` match but `not-allowed` (the
/// cursor value) does not match `not`.
fn starts_with_pseudo_class(text: &str) -> bool {
    PSEUDO_CLASSES.iter().any(|p| {
        text.get(..p.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(p))
            && !text[p.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SelectorOrProperty,
    Value,
}

/// Tokenize CSS/LESS source into the categorized stream the parser consumes.
///
/// Raw tokens that fail to lex (stray quote characters and the like) are
/// skipped; malformed input is tolerated rather than rejected.
pub fn tokenize(input: &str) -> Vec<CategorizedToken> {
    let raw: Vec<(RawToken, &str)> = RawToken::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, &input[span])))
        .collect();

    let mut out = Vec::new();
    let mut mode = Mode::SelectorOrProperty;
    // Open parentheses seen in selector text; a colon inside them belongs to a
    // media-query expression, not to a declaration.
    let mut paren_depth = 0usize;

    let mut i = 0;
    while i < raw.len() {
        let (token, text) = raw[i];
        match token {
            RawToken::BlockComment | RawToken::LineComment => {
                out.push(CategorizedToken::new(TokenCategory::Comment, text));
            }
            RawToken::Whitespace => {
                out.push(CategorizedToken::new(TokenCategory::Whitespace, text));
            }
            RawToken::OpenBrace => {
                out.push(CategorizedToken::new(TokenCategory::OpenBrace, text));
                mode = Mode::SelectorOrProperty;
                paren_depth = 0;
            }
            RawToken::CloseBrace => {
                out.push(CategorizedToken::new(TokenCategory::CloseBrace, text));
                mode = Mode::SelectorOrProperty;
                paren_depth = 0;
            }
            RawToken::SemiColon => {
                out.push(CategorizedToken::new(TokenCategory::SemiColon, text));
                mode = Mode::SelectorOrProperty;
                paren_depth = 0;
            }
            RawToken::Colon => match mode {
                Mode::Value => {
                    let (merged, consumed) = merge_value_run(&raw, i);
                    out.push(CategorizedToken::new(TokenCategory::Value, merged));
                    i += consumed;
                    continue;
                }
                Mode::SelectorOrProperty => {
                    if paren_depth > 0 || colon_is_selector_content(&raw, i) {
                        out.push(CategorizedToken::new(
                            TokenCategory::SelectorOrStyleProperty,
                            text,
                        ));
                    } else {
                        out.push(CategorizedToken::new(
                            TokenCategory::StylePropertyColon,
                            text,
                        ));
                        mode = Mode::Value;
                    }
                }
            },
            RawToken::Text | RawToken::Slash | RawToken::DoubleQuoted | RawToken::SingleQuoted => {
                match mode {
                    Mode::SelectorOrProperty => {
                        if token == RawToken::Text {
                            paren_depth = paren_depth
                                .saturating_add(text.matches('(').count())
                                .saturating_sub(text.matches(')').count());
                        }
                        out.push(CategorizedToken::new(
                            TokenCategory::SelectorOrStyleProperty,
                            text,
                        ));
                    }
                    Mode::Value => {
                        let (merged, consumed) = merge_value_run(&raw, i);
                        out.push(CategorizedToken::new(TokenCategory::Value, merged));
                        i += consumed;
                        continue;
                    }
                }
            }
        }
        i += 1;
    }

    out
}

/// A `:` in selector position is selector content when it introduces a
/// pseudo-element (`::before`) or a recognized pseudo-class (`:hover`); both
/// require the following token to be immediately adjacent, which the raw
/// lexer guarantees whenever the next token is not a whitespace run.
fn colon_is_selector_content(raw: &[(RawToken, &str)], colon_at: usize) -> bool {
    match raw.get(colon_at + 1) {
        Some((RawToken::Colon, _)) => true,
        Some((RawToken::Text, text)) => starts_with_pseudo_class(text),
        _ => false,
    }
}

/// Merge adjacent value-mode tokens into a single segment. Quoted strings
/// keep embedded spaces, so `url('a b.png')` comes out as one `Value` token;
/// a whitespace run, comment, `;`, `{` or `}` terminates the segment.
fn merge_value_run(raw: &[(RawToken, &str)], start: usize) -> (String, usize) {
    let mut merged = String::new();
    let mut consumed = 0;
    while let Some((token, text)) = raw.get(start + consumed) {
        match token {
            RawToken::Text
            | RawToken::Slash
            | RawToken::Colon
            | RawToken::DoubleQuoted
            | RawToken::SingleQuoted => {
                merged.push_str(text);
                consumed += 1;
            }
            _ => break,
        }
    }
    (merged, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: tokenize and return just the categories.
    fn categories(input: &str) -> Vec<TokenCategory> {
        tokenize(input).into_iter().map(|t| t.category).collect()
    }

    /// Helper: tokenize and return (category, text) pairs with whitespace and
    /// comments filtered out.
    fn significant(input: &str) -> Vec<(TokenCategory, String)> {
        tokenize(input)
            .into_iter()
            .filter(|t| {
                t.category != TokenCategory::Whitespace && t.category != TokenCategory::Comment
            })
            .map(|t| (t.category, t.text))
            .collect()
    }

    fn values(input: &str) -> Vec<String> {
        significant(input)
            .into_iter()
            .filter(|(c, _)| *c == TokenCategory::Value)
            .map(|(_, t)| t)
            .collect()
    }

    #[test]
    fn simple_declaration() {
        assert_eq!(
            significant("div { color: red; }"),
            vec![
                (TokenCategory::SelectorOrStyleProperty, "div".into()),
                (TokenCategory::OpenBrace, "{".into()),
                (TokenCategory::SelectorOrStyleProperty, "color".into()),
                (TokenCategory::StylePropertyColon, ":".into()),
                (TokenCategory::Value, "red".into()),
                (TokenCategory::SemiColon, ";".into()),
                (TokenCategory::CloseBrace, "}".into()),
            ]
        );
    }

    #[test]
    fn multi_segment_value() {
        assert_eq!(
            values("div { border: 1px solid black; }"),
            vec!["1px", "solid", "black"]
        );
    }

    #[test]
    fn quoted_url_is_one_value_token() {
        assert_eq!(
            values("div { background: url('a b.png') no-repeat; }"),
            vec!["url('a b.png')", "no-repeat"]
        );
    }

    #[test]
    fn pseudo_class_colon_stays_in_selector() {
        let tokens = significant("a:hover { color: blue; }");
        assert_eq!(
            tokens[0],
            (TokenCategory::SelectorOrStyleProperty, "a".into())
        );
        assert_eq!(
            tokens[1],
            (TokenCategory::SelectorOrStyleProperty, ":".into())
        );
        assert_eq!(
            tokens[2],
            (TokenCategory::SelectorOrStyleProperty, "hover".into())
        );
        assert_eq!(tokens[3], (TokenCategory::OpenBrace, "{".into()));
    }

    #[test]
    fn pseudo_element_double_colon_stays_in_selector() {
        let tokens = significant("p::before { content: \"x\"; }");
        assert!(tokens[..4]
            .iter()
            .all(|(c, _)| *c == TokenCategory::SelectorOrStyleProperty));
    }

    #[test]
    fn media_query_colon_inside_parens_stays_in_selector() {
        let tokens = significant("@media screen and (max-width:70em) { div.x { color: red; } }");
        let brace_at = tokens
            .iter()
            .position(|(c, _)| *c == TokenCategory::OpenBrace)
            .unwrap();
        assert!(tokens[..brace_at]
            .iter()
            .all(|(c, _)| *c == TokenCategory::SelectorOrStyleProperty));
    }

    #[test]
    fn less_variable_declaration_is_property_and_value() {
        assert_eq!(
            significant("@base: #fff;"),
            vec![
                (TokenCategory::SelectorOrStyleProperty, "@base".into()),
                (TokenCategory::StylePropertyColon, ":".into()),
                (TokenCategory::Value, "#fff".into()),
                (TokenCategory::SemiColon, ";".into()),
            ]
        );
    }

    #[test]
    fn block_comments_preserved_with_text() {
        let tokens = tokenize("/* note */ div { }");
        assert_eq!(tokens[0].category, TokenCategory::Comment);
        assert_eq!(tokens[0].text, "/* note */");
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        let tokens = tokenize("div { } /* trailing");
        let last = tokens.last().unwrap();
        assert_eq!(last.category, TokenCategory::Comment);
        assert_eq!(last.text, "/* trailing");
    }

    #[test]
    fn line_comment_stops_at_line_break() {
        let tokens = tokenize("// comment\ndiv { }");
        assert_eq!(tokens[0].category, TokenCategory::Comment);
        assert_eq!(tokens[0].text, "// comment");
        assert_eq!(tokens[1].category, TokenCategory::Whitespace);
    }

    #[test]
    fn slash_in_value_merges() {
        assert_eq!(
            values("div { font: 12px/1.5 sans-serif; }"),
            vec!["12px/1.5", "sans-serif"]
        );
    }

    #[test]
    fn value_mode_ends_at_close_brace() {
        assert_eq!(
            categories("div { color: red }"),
            vec![
                TokenCategory::SelectorOrStyleProperty,
                TokenCategory::Whitespace,
                TokenCategory::OpenBrace,
                TokenCategory::Whitespace,
                TokenCategory::SelectorOrStyleProperty,
                TokenCategory::StylePropertyColon,
                TokenCategory::Whitespace,
                TokenCategory::Value,
                TokenCategory::Whitespace,
                TokenCategory::CloseBrace,
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn whitespace_only() {
        let tokens = tokenize("  \t\n  ");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].category, TokenCategory::Whitespace);
    }

    #[test]
    fn attribute_selector_with_quotes() {
        let tokens = significant(r#"input[type="text"] { color: red; }"#);
        assert_eq!(
            tokens[0],
            (TokenCategory::SelectorOrStyleProperty, "input[type=".into())
        );
        assert_eq!(
            tokens[1],
            (TokenCategory::SelectorOrStyleProperty, "\"text\"".into())
        );
        assert_eq!(
            tokens[2],
            (TokenCategory::SelectorOrStyleProperty, "]".into())
        );
    }

    #[test]
    fn pseudo_class_prefix_of_a_value_keyword_is_not_a_pseudo_class() {
        // "not-allowed" starts with the pseudo-class keyword "not" but is a
        // plain value; the colon must still separate property from value.
        assert_eq!(
            significant("div.x { cursor: not-allowed; }"),
            vec![
                (TokenCategory::SelectorOrStyleProperty, "div.x".into()),
                (TokenCategory::OpenBrace, "{".into()),
                (TokenCategory::SelectorOrStyleProperty, "cursor".into()),
                (TokenCategory::StylePropertyColon, ":".into()),
                (TokenCategory::Value, "not-allowed".into()),
                (TokenCategory::SemiColon, ";".into()),
                (TokenCategory::CloseBrace, "}".into()),
            ]
        );
    }

    #[test]
    fn functional_pseudo_class_stays_in_selector() {
        let tokens = significant("li:nth-child(2n) { color: red; }");
        assert_eq!(
            tokens[1],
            (TokenCategory::SelectorOrStyleProperty, ":".into())
        );
        assert_eq!(
            tokens[2],
            (TokenCategory::SelectorOrStyleProperty, "nth-child(2n)".into())
        );
    }

    #[test]
    fn important_flag_is_its_own_segment() {
        assert_eq!(
            values("div { width: 100% !important; }"),
            vec!["100%", "!important"]
        );
    }
}
