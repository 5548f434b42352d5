//! Safety checks run before output is overwritten.
//!
//! A build rewrites its output directory wholesale, so the source export
//! must never live inside it, and extraction outputs must never clobber the
//! export they were read from.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Best-effort absolute form of a path; falls back to the path as given
/// when it does not exist yet.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Validates that a build output directory is safe to overwrite.
///
/// Checks:
/// - The output directory is not the source file itself
/// - The source file does not live anywhere under the output directory
pub fn validate_output_dir(output_dir: &Path, source: &Path) -> Result<()> {
    let output = resolve(output_dir);
    let source = resolve(source);

    if output == source {
        bail!(
            "Safety check failed: output directory '{}' cannot be the same as source '{}'",
            output_dir.display(),
            source.display()
        );
    }

    if source.starts_with(&output) {
        bail!(
            "Safety check failed: source '{}' lives inside output directory '{}', which is overwritten on every build",
            source.display(),
            output_dir.display()
        );
    }

    Ok(())
}

/// Validates that an extraction output file is safe to overwrite.
///
/// Checks:
/// - Output filename must end with `.json`
/// - Output cannot be the same as the source
pub fn validate_output_file(output: &Path, source: &Path) -> Result<()> {
    let is_json = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        bail!(
            "Safety check failed: output file '{}' must have a .json extension",
            output.display()
        );
    }

    if resolve(output) == resolve(source) {
        bail!(
            "Safety check failed: output '{}' cannot be the same as source '{}'",
            output.display(),
            source.display()
        );
    }

    Ok(())
}
