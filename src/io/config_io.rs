use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::IoError;
use crate::model::config::EditorConfig;

/// File looked up in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "pagetree.toml";

/// Read and validate an editor config file.
pub fn read_config(path: &Path) -> Result<EditorConfig, IoError> {
    let text = fs::read_to_string(path).map_err(|e| IoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = parse_config(&text)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse and validate config text.
pub fn parse_config(text: &str) -> Result<EditorConfig, IoError> {
    let config: EditorConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Load the explicit path if given, else `pagetree.toml` in `dir` if it
/// exists, else defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<EditorConfig, IoError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let fallback: PathBuf = dir.join(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        read_config(&fallback)
    } else {
        Ok(EditorConfig::default())
    }
}

fn validate(config: &EditorConfig) -> Result<(), IoError> {
    let drag = &config.drag;
    if !(drag.indent_width.is_finite() && drag.indent_width > 0.0) {
        return Err(IoError::InvalidConfig(format!(
            "drag.indent_width must be a positive number, got {}",
            drag.indent_width
        )));
    }
    if !(drag.outdent_threshold.is_finite() && drag.outdent_threshold > 0.0) {
        return Err(IoError::InvalidConfig(format!(
            "drag.outdent_threshold must be a positive number, got {}",
            drag.outdent_threshold
        )));
    }
    Ok(())
}
