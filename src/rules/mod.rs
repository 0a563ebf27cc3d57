//! Rule engine: the [`EnforceRules`] contract plus the concrete rules.
//!
//! Every rule is pure over an already-built fragment tree and declares which
//! stylesheet categories it applies to; the pipeline uses [`EnforceRules::applies_to`]
//! to skip irrelevant rules per stage. `check_all` reports every violation in
//! depth-first order; `ensure` is derived from it for fail-fast callers.

pub mod bare;
pub mod box_model;
pub mod ie_limit;
pub mod measurements;
pub mod media;
pub mod repetition;
pub mod scoping;
pub mod width;

use std::fmt;

use crate::parser::fragment::Fragment;

pub use bare::{
    NoBareSelectorsInNonResetsOrThemeSheets, OnlyBareSelectorsInResetsAndThemeSheets,
    ScopeRestrictingHtmlTagBehavior,
};
pub use box_model::{
    BorderWidthMustBeFullySpecifiedIfSpecifiedAtAll, MarginMustBeFullySpecifiedIfSpecifiedAtAll,
    PaddingMustBeFullySpecifiedIfSpecifiedAtAll,
};
pub use ie_limit::LegacyIESelectorLimitMustBeRespected;
pub use measurements::{AllMeasurementsMustBePixels, MeasurementConformity};
pub use media::NoMediaQueriesInResetsAndThemeSheets;
pub use repetition::NoSelectorMayBeRepeatedInTheRules;
pub use scoping::{
    BodyScopingMustBeAppliedToNonResetsOrThemesSheets,
    HtmlTagScopingMustBeAppliedToNonResetsOrThemesSheets,
};
pub use width::{BorderAndPaddingMayNotBeCombinedWithWidth, WidthConformity};

/// The stylesheet categories a rule may apply to. Supplied by the caller per
/// file (or per validation stage); not stored on the fragment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetType {
    /// A single resets sheet (`*resets.css` / `*resets.less`).
    Reset,
    /// A single theme-ish sheet (themes, breakpoints, mixins-and-values).
    Themes,
    /// Any other single source file, imports unexpanded.
    Other,
    /// The concatenation of all source files, before any compilation.
    Combined,
    /// The final CSS after LESS processing and import flattening.
    Compiled,
}

impl fmt::Display for SheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SheetType::Reset => "Reset",
            SheetType::Themes => "Themes",
            SheetType::Other => "Other",
            SheetType::Combined => "Combined",
            SheetType::Compiled => "Compiled",
        })
    }
}

/// A single broken-rule report: a human-readable message plus the offending
/// fragment.
#[derive(Debug, Clone)]
pub struct Violation {
    message: String,
    fragment: Fragment,
}

impl Violation {
    pub fn new(message: impl Into<String>, fragment: Fragment) -> Self {
        Self {
            message: message.into(),
            fragment,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors raised when a rule is constructed with an invalid configuration.
/// These always fail at construction, never during checking.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("an element allow-list must be supplied when a percentage conformity option is enabled")]
    MissingElementTypes,
    #[error("an element allow-list may only be supplied when a percentage conformity option is enabled")]
    UnexpectedElementTypes,
    #[error("blank entry encountered in element allow-list")]
    BlankElementType,
}

/// The contract every rule implements.
pub trait EnforceRules {
    /// Pure, total function over the five [`SheetType`] values.
    fn applies_to(&self, sheet_type: SheetType) -> bool;

    /// Every violation found, in the order encountered by a top-down,
    /// depth-first traversal. Empty when the content conforms.
    fn check_all(&self, fragments: &[Fragment]) -> Vec<Violation>;

    /// Fail on the first violation `check_all` reports.
    fn ensure(&self, fragments: &[Fragment]) -> Result<(), Violation> {
        match self.check_all(fragments).into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

/// The recommended rule set: pixels everywhere with the usual layout
/// relaxations, complete box-model shorthand, html scoping on page sheets,
/// bare selectors only in resets/themes, no repeated selectors in combined
/// content and the legacy IE selector limit on compiled output.
pub fn recommended_rules() -> Vec<Box<dyn EnforceRules + Send + Sync>> {
    vec![
        Box::new(AllMeasurementsMustBePixels::recommended()),
        Box::new(MarginMustBeFullySpecifiedIfSpecifiedAtAll),
        Box::new(PaddingMustBeFullySpecifiedIfSpecifiedAtAll),
        Box::new(BorderWidthMustBeFullySpecifiedIfSpecifiedAtAll),
        Box::new(BorderAndPaddingMayNotBeCombinedWithWidth::new(
            WidthConformity {
                allow_vertical_border_and_padding: true,
                ignore_rule_if_border_box_sizing_rule_present: true,
            },
        )),
        Box::new(HtmlTagScopingMustBeAppliedToNonResetsOrThemesSheets),
        Box::new(NoBareSelectorsInNonResetsOrThemeSheets::new(
            ScopeRestrictingHtmlTagBehavior::Allow,
        )),
        Box::new(OnlyBareSelectorsInResetsAndThemeSheets::recommended()),
        Box::new(NoMediaQueriesInResetsAndThemeSheets),
        Box::new(NoSelectorMayBeRepeatedInTheRules::new(true)),
        Box::new(LegacyIESelectorLimitMustBeRespected),
    ]
}
