use crate::config::schema::{Settings, ValidationError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "CONFPARSE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("$CONFPARSE_CONFIG points at {}, which does not exist", .path.display())]
    EnvFileMissing { path: PathBuf },

    #[error("failed to parse settings TOML{}: {source}", location(.path))]
    Toml {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid settings{}: {source}", location(.path))]
    Validation {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    /// Names of the `[[blocks]]` entries that failed validation, in file order.
    pub fn offending_blocks(&self) -> Vec<&str> {
        match self {
            ConfigError::Validation { source, .. } => {
                let mut names: Vec<&str> = Vec::new();
                for name in source.issues.iter().filter_map(|issue| issue.block()) {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                names
            }
            _ => Vec::new(),
        }
    }

    fn in_file(self, file: &Path) -> Self {
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(file.to_path_buf()),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(file.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

/// Parse and validate a settings document.
pub fn load_from_str(input: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    settings
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    log::debug!(
        "settings: comment {:?}, {} custom blocks",
        settings.parse.comment,
        settings.blocks.len()
    );
    Ok(settings)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.in_file(path))
}

/// Locate and load settings.
///
/// Priority order:
/// 1. Explicit path (must exist)
/// 2. `CONFPARSE_CONFIG` environment variable (must exist)
/// 3. `~/.config/confparse/config.toml` if present
/// 4. Built-in IOS defaults
pub fn discover(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    if let Some(env_path) = env::var_os(CONFIG_ENV) {
        return load_env_file(PathBuf::from(env_path));
    }

    if let Some(path) = user_config_path().filter(|p| p.exists()) {
        log::debug!("loading settings from {}", path.display());
        return load_from_path(path);
    }

    log::debug!("no settings file found, using defaults");
    Ok(Settings::default())
}

fn load_env_file(path: PathBuf) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::EnvFileMissing { path });
    }
    log::debug!("loading settings from ${CONFIG_ENV}: {}", path.display());
    load_from_path(path)
}

fn user_config_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".config").join("confparse").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let settings = load_from_str("").unwrap();
        assert_eq!(settings.parse.comment, "!");
        assert!(settings.parse.default_blocks);
        assert!(settings.blocks.is_empty());
    }

    #[test]
    fn bad_toml_reports_parse_error() {
        let err = load_from_str("[parse\ncomment = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { path: None, .. }));
        assert!(err.to_string().starts_with("failed to parse settings TOML: "));
    }

    #[test]
    fn path_attached_to_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parse]\ncomment = \"\"\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        match &err {
            ConfigError::Validation { path: Some(p), .. } => assert_eq!(p, &path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("config.toml"));
        assert!(err.offending_blocks().is_empty());
    }

    #[test]
    fn offending_blocks_named_once_each() {
        let err = load_from_str(
            r#"
[[blocks]]
name = "cert"
start = 'certificate \S+'
terminator = "delimiter"

[[blocks]]
name = "ok"
start = "^macro name"

[[blocks]]
name = "broken"
start = "banner ("
"#,
        )
        .unwrap_err();
        assert_eq!(err.offending_blocks(), vec!["cert", "broken"]);
    }

    #[test]
    fn explicit_missing_path_is_io_error() {
        let err = discover(Some(Path::new("/nonexistent/confparse.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn missing_env_file_is_reported_as_such() {
        let err = load_env_file(PathBuf::from("/nonexistent/env.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFileMissing { .. }));
        assert!(err.to_string().contains("$CONFPARSE_CONFIG"));
    }
}
