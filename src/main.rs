//! Command-line host: validate stylesheet trees on disk.
//!
//! ```text
//! nocascade [--print] <root-dir> <entry-path>...
//! ```
//!
//! Each entry path is loaded (relative to the root directory) through the
//! validating pipeline with the recommended rule set and an identity
//! compiler, so plain-CSS trees can be checked without a LESS toolchain.
//! Violations go to stderr and the exit status is non-zero when any were
//! collected; `--print` additionally writes the compiled output to stdout.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use nocascade::pipeline::{
    classify_by_filename, DiskFileLoader, FileViolation, IdentityCompiler, ValidatingCssLoader,
};
use nocascade::rules::recommended_rules;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut print_compiled = false;
    let mut paths = Vec::new();
    for argument in env::args().skip(1) {
        match argument.as_str() {
            "--print" => print_compiled = true,
            "--help" | "-h" => {
                eprintln!("usage: nocascade [--print] <root-dir> <entry-path>...");
                return ExitCode::SUCCESS;
            }
            _ => paths.push(argument),
        }
    }
    if paths.len() < 2 {
        eprintln!("usage: nocascade [--print] <root-dir> <entry-path>...");
        return ExitCode::FAILURE;
    }
    let root = paths.remove(0);

    let violations: Arc<Mutex<Vec<FileViolation>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&violations);
    let pipeline = ValidatingCssLoader::with_violation_callback(
        recommended_rules(),
        classify_by_filename,
        DiskFileLoader::new(&root),
        IdentityCompiler,
        move |violation| sink.lock().push(violation),
    );

    for entry_path in &paths {
        match pipeline.load(entry_path) {
            Ok(compiled) => {
                tracing::info!(path = %entry_path, "validated");
                if print_compiled {
                    println!("{}", compiled.content);
                }
            }
            Err(error) => {
                eprintln!("{entry_path}: {error}");
                return ExitCode::FAILURE;
            }
        }
    }

    let violations = violations.lock();
    for violation in violations.iter() {
        eprintln!("{violation}");
    }
    if violations.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
