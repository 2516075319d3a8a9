//! Saving exported frames to disk.

use crate::config::ExportConfig;
use chrono::Local;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while saving a frame.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid filename template '{0}'")]
    InvalidTemplate(String),

    #[error("refusing to save an empty frame")]
    EmptyFrame,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generate a filename based on the template and current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
///
/// # Returns
/// Generated filename with a `.png` extension
pub fn generate_filename(template: &str) -> Result<String, ExportError> {
    let mut filename = String::new();
    write!(&mut filename, "{}", Local::now().format(template))
        .map_err(|_| ExportError::InvalidTemplate(template.to_string()))?;
    let filename = filename.trim();
    if filename.is_empty() || filename.contains('/') {
        return Err(ExportError::InvalidTemplate(template.to_string()));
    }
    Ok(format!("{filename}.png"))
}

/// Ensure the export directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Writes PNG bytes into the configured export directory.
///
/// # Returns
/// Path to the saved file
pub fn save_frame(png: &[u8], config: &ExportConfig) -> Result<PathBuf, ExportError> {
    if png.is_empty() {
        return Err(ExportError::EmptyFrame);
    }
    let directory = ensure_directory_exists(&config.resolved_directory())?;
    let file_path = directory.join(generate_filename(&config.filename_template)?);

    log::info!(
        "Saving frame to: {} ({} bytes)",
        file_path.display(),
        png.len()
    );
    fs::write(&file_path, png)?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&file_path, Permissions::from_mode(0o600))?;
    }

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("frame_%Y%m%d").unwrap();
        assert!(filename.starts_with("frame_"));
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), "frame_20261014.png".len());
    }

    #[test]
    fn test_generate_filename_rejects_bad_templates() {
        assert!(matches!(
            generate_filename("frame_%Q"),
            Err(ExportError::InvalidTemplate(_))
        ));
        assert!(generate_filename("   ").is_err());
        assert!(generate_filename("a/%Y").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_save_frame_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            directory: dir.path().join("nested/out").to_string_lossy().into_owned(),
            filename_template: "saved".to_string(),
            include_background: false,
        };
        let path = save_frame(b"\x89PNG fake", &config).unwrap();
        assert_eq!(path.file_name().unwrap(), "saved.png");
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG fake");

        assert!(matches!(
            save_frame(&[], &config),
            Err(ExportError::EmptyFrame)
        ));
    }
}
