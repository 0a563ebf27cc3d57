//! # nocascade
//!
//! A structural linter for CSS/LESS that enforces a "non-cascading CSS"
//! discipline: every style block states everything about how it renders, so
//! no rule depends on what the cascade happens to deliver. Bare selectors,
//! unscoped page styles, partially specified box-model shorthand, non-pixel
//! measurements, repeated selectors and legacy-IE selector overflow are all
//! flagged, with different rules applying to resets, themes, page-specific,
//! combined and fully compiled stylesheets.
//!
//! ## Core Systems
//!
//! - **[`css`]** — logos-based tokenizer: raw lexing plus token categorization
//! - **[`parser`]** — fragment model and the hierarchical (nesting-aware) parser
//! - **[`semantics`]** — selector classification and measurement extraction
//! - **[`rules`]** — the `EnforceRules` contract and the concrete rules
//! - **[`pipeline`]** — multi-stage validation around a loader/compiler pair
//! - **[`testing`]** — fragment-tree builders and an in-memory loader
//!
//! ## Example
//!
//! ```
//! use nocascade::parser::parse_source;
//! use nocascade::rules::{EnforceRules, HtmlTagScopingMustBeAppliedToNonResetsOrThemesSheets};
//!
//! let fragments = parse_source("div.Content { color: red; }").unwrap();
//! let violations = HtmlTagScopingMustBeAppliedToNonResetsOrThemesSheets.check_all(&fragments);
//! assert_eq!(violations.len(), 1);
//! ```

pub mod css;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod semantics;
pub mod testing;
