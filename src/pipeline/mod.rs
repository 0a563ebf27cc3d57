//! Validation pipeline: multi-stage rule application around an external
//! loader/compiler pair.
//!
//! [`ValidatingCssLoader`] wraps a base [`TextFileLoader`] so that every
//! individual file the compiler pulls in is parsed, classified and checked
//! against the per-file rules, while its raw text accumulates into a combined
//! buffer. After compilation the compiled output is checked against the
//! `Compiled` rules and the accumulated buffer against the `Combined` rules.
//! Violations either abort the load (fail-fast, no callback) or are all
//! delivered through the callback (collect-all).

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::parser::fragment::Fragment;
use crate::parser::hierarchical::{parse_source, ParseError};
use crate::rules::{EnforceRules, SheetType, Violation};

/// A loaded file: its path relative to the stylesheet root, and its raw text.
#[derive(Debug, Clone)]
pub struct TextFileContents {
    pub relative_path: String,
    pub content: String,
}

/// Loads raw per-file content. Implementations must not process the text.
pub trait TextFileLoader {
    fn load(&self, relative_path: &str) -> Result<TextFileContents, LoadError>;
}

/// Produces the fully import-flattened, LESS-processed text for an entry
/// path, loading every source file through the given loader (which is how
/// the pipeline observes the individual files).
pub trait Compiler {
    fn compile(
        &self,
        loader: &dyn TextFileLoader,
        entry_path: &str,
    ) -> Result<TextFileContents, LoadError>;
}

/// A compiler that performs no processing: the compiled output is the entry
/// file as-is. Suitable for plain-CSS trees and tests; real LESS compilation
/// is an external concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCompiler;

impl Compiler for IdentityCompiler {
    fn compile(
        &self,
        loader: &dyn TextFileLoader,
        entry_path: &str,
    ) -> Result<TextFileContents, LoadError> {
        loader.load(entry_path)
    }
}

/// Errors surfaced while loading and validating.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("blank relative path specified")]
    BlankPath,
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
    /// Fail-fast mode only; collect-all delivers violations through the
    /// callback instead.
    #[error(transparent)]
    BrokenRule(#[from] Box<FileViolation>),
}

/// A rule violation wrapped with the validation context it occurred in.
#[derive(Debug, Clone)]
pub struct FileViolation {
    pub violation: Violation,
    pub sheet_type: SheetType,
    pub relative_path: String,
}

impl fmt::Display for FileViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.violation, self.relative_path)?;
        if self.sheet_type != SheetType::Other {
            write!(f, "[{}]", self.sheet_type)?;
        }
        // Line numbers only mean anything for single-file content.
        if !matches!(self.sheet_type, SheetType::Combined | SheetType::Compiled) {
            write!(f, " (line {})", self.violation.fragment().source_line() + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for FileViolation {}

/// Loads files from disk below a root directory.
#[derive(Debug, Clone)]
pub struct DiskFileLoader {
    root: PathBuf,
}

impl DiskFileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextFileLoader for DiskFileLoader {
    fn load(&self, relative_path: &str) -> Result<TextFileContents, LoadError> {
        if relative_path.trim().is_empty() {
            return Err(LoadError::BlankPath);
        }
        let full_path = self.root.join(relative_path);
        match fs::read_to_string(&full_path) {
            Ok(content) => Ok(TextFileContents {
                relative_path: relative_path.to_string(),
                content,
            }),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound {
                path: full_path.display().to_string(),
            }),
            Err(source) => Err(LoadError::Io {
                path: full_path.display().to_string(),
                source,
            }),
        }
    }
}

/// The filename-suffix convention for classifying sheets: `*resets.css` /
/// `*resets.less` are resets; theme, breakpoint and mixins-and-values sheets
/// are themes; everything else is page-specific.
pub fn classify_by_filename(relative_path: &str) -> SheetType {
    const THEME_SUFFIXES: &[&str] = &[
        "theme.css",
        "theme.less",
        "breakpoints.css",
        "breakpoints.less",
        "mixinsandvalues.css",
        "mixinsandvalues.less",
    ];
    let lowered = relative_path.to_lowercase();
    if lowered.ends_with("resets.css") || lowered.ends_with("resets.less") {
        SheetType::Reset
    } else if THEME_SUFFIXES.iter().any(|suffix| lowered.ends_with(suffix)) {
        SheetType::Themes
    } else {
        SheetType::Other
    }
}

type Classifier = Box<dyn Fn(&str) -> SheetType + Send + Sync>;
type ViolationCallback = Box<dyn Fn(FileViolation) + Send + Sync>;

/// See the module documentation.
pub struct ValidatingCssLoader<L, C> {
    rules: Vec<Box<dyn EnforceRules + Send + Sync>>,
    classifier: Classifier,
    base_loader: L,
    compiler: C,
    on_violation: Option<ViolationCallback>,
}

impl<L: TextFileLoader, C: Compiler> ValidatingCssLoader<L, C> {
    /// Fail-fast mode: the first violation at any stage aborts the load.
    pub fn new(
        rules: Vec<Box<dyn EnforceRules + Send + Sync>>,
        classifier: impl Fn(&str) -> SheetType + Send + Sync + 'static,
        base_loader: L,
        compiler: C,
    ) -> Self {
        Self {
            rules,
            classifier: Box::new(classifier),
            base_loader,
            compiler,
            on_violation: None,
        }
    }

    /// Collect-all mode: every violation from every stage is delivered
    /// through `on_violation`; rule violations never abort the load.
    pub fn with_violation_callback(
        rules: Vec<Box<dyn EnforceRules + Send + Sync>>,
        classifier: impl Fn(&str) -> SheetType + Send + Sync + 'static,
        base_loader: L,
        compiler: C,
        on_violation: impl Fn(FileViolation) + Send + Sync + 'static,
    ) -> Self {
        Self {
            rules,
            classifier: Box::new(classifier),
            base_loader,
            compiler,
            on_violation: Some(Box::new(on_violation)),
        }
    }

    /// Compile `relative_path` through the wrapped loader, applying every
    /// applicable rule per file, to the compiled output and to the combined
    /// source, then return the compiled content.
    pub fn load(&self, relative_path: &str) -> Result<TextFileContents, LoadError> {
        if relative_path.trim().is_empty() {
            return Err(LoadError::BlankPath);
        }

        let combined_source = Mutex::new(String::new());
        let run_per_file_rules = self.rules.iter().any(|rule| {
            rule.applies_to(SheetType::Reset)
                || rule.applies_to(SheetType::Themes)
                || rule.applies_to(SheetType::Other)
        });
        let interceptor = Interceptor {
            pipeline: self,
            combined_source: &combined_source,
            run_per_file_rules,
        };

        let compiled = self.compiler.compile(&interceptor, relative_path)?;

        if self.rules.iter().any(|r| r.applies_to(SheetType::Compiled)) {
            let fragments = parse_content(&compiled.content, relative_path)?;
            self.apply_stage(&fragments, SheetType::Compiled, relative_path)?;
        }

        if self.rules.iter().any(|r| r.applies_to(SheetType::Combined)) {
            let combined_text = combined_source.lock().clone();
            if !combined_text.is_empty() {
                let fragments = parse_content(&combined_text, relative_path)?;
                self.apply_stage(&fragments, SheetType::Combined, relative_path)?;
            }
        }

        Ok(compiled)
    }

    fn validate_file(&self, content: &TextFileContents) -> Result<(), LoadError> {
        let sheet_type = (self.classifier)(&content.relative_path);
        tracing::debug!(path = %content.relative_path, %sheet_type, "validating source file");
        let fragments = parse_content(&content.content, &content.relative_path)?;
        self.apply_stage(&fragments, sheet_type, &content.relative_path)
    }

    fn apply_stage(
        &self,
        fragments: &[Fragment],
        sheet_type: SheetType,
        relative_path: &str,
    ) -> Result<(), LoadError> {
        for rule in self.rules.iter().filter(|r| r.applies_to(sheet_type)) {
            match &self.on_violation {
                None => {
                    if let Err(violation) = rule.ensure(fragments) {
                        return Err(Box::new(FileViolation {
                            violation,
                            sheet_type,
                            relative_path: relative_path.to_string(),
                        })
                        .into());
                    }
                }
                Some(callback) => {
                    for violation in rule.check_all(fragments) {
                        let file_violation = FileViolation {
                            violation,
                            sheet_type,
                            relative_path: relative_path.to_string(),
                        };
                        tracing::warn!(%file_violation, "broken rule encountered");
                        callback(file_violation);
                    }
                }
            }
        }
        Ok(())
    }
}

fn parse_content(content: &str, relative_path: &str) -> Result<Vec<Fragment>, LoadError> {
    parse_source(content).map_err(|source| LoadError::Parse {
        path: relative_path.to_string(),
        source,
    })
}

/// Wraps the base loader so that each file load is validated and recorded
/// before its content is handed to the compiler.
struct Interceptor<'a, L, C> {
    pipeline: &'a ValidatingCssLoader<L, C>,
    combined_source: &'a Mutex<String>,
    run_per_file_rules: bool,
}

impl<L: TextFileLoader, C: Compiler> TextFileLoader for Interceptor<'_, L, C> {
    fn load(&self, relative_path: &str) -> Result<TextFileContents, LoadError> {
        let content = self.pipeline.base_loader.load(relative_path)?;
        if self.run_per_file_rules {
            self.pipeline.validate_file(&content)?;
        }
        // Record the raw text followed by a forced line break, so a trailing
        // single-line comment cannot absorb the next file's first line when
        // the combined content is parsed.
        {
            let mut combined = self.combined_source.lock();
            combined.push_str(&content.content);
            combined.push('\n');
        }
        Ok(content)
    }
}
