use super::CliError;
use anyhow::Context;
use ptable_core::{NormalizeOptions, PtableError};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub(super) fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when the CLI runs inside tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(super) fn load_normalize_options(path: Option<&Path>) -> Result<NormalizeOptions, CliError> {
    let Some(path) = path else {
        return Ok(NormalizeOptions::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read options file '{}'", path.display()))?;
    serde_json::from_str(&source).map_err(|error| {
        CliError::Compute(PtableError::input_validation(
            "INPUT.CONFIG",
            format!("invalid options file '{}': {error}", path.display()),
        ))
    })
}

/// One formula per line; blank lines and `#` comments are skipped.
pub(super) fn read_formula_file(path: &Path) -> Result<Vec<String>, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read formula file '{}'", path.display()))?;
    Ok(source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
