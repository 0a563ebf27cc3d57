//! Character-level tokenization: raw lexer and token categorizer.

pub mod tokenizer;

pub use tokenizer::{tokenize, CategorizedToken, TokenCategory};
