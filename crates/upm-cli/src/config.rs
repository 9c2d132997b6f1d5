//! Configuration resolution for CLI commands
//!
//! Layers, lowest first: built-in defaults, `--config FILE`, `UPM_*`
//! environment variables, then command-line flags.

use crate::error::{CliError, Result};
use std::path::Path;
use tracing::debug;
use upm_core::MapperConfig;

/// Build the engine configuration for one invocation
pub fn resolve(config_file: Option<&Path>, api_url: Option<&str>) -> Result<MapperConfig> {
    let config = match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.display().to_string()));
            }
            MapperConfig::from_file(path)?.merge_env()?
        }
        None => MapperConfig::from_env()?,
    };

    let config = match api_url {
        Some(url) => config.with_api_url(url),
        None => config,
    };
    config.validate()?;

    debug!(api_url = %config.api_url, "configuration resolved");
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"https://file.example.org\"\nconcurrency = 4").unwrap();

        let config = resolve(Some(file.path()), Some("https://flag.example.org")).unwrap();
        assert_eq!(config.api_url, "https://flag.example.org");
        assert_eq!(config.concurrency, 4);
    }

    #[test]
    fn test_missing_file() {
        let err = resolve(Some(Path::new("/definitely/not/here.toml")), None).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = resolve(None, Some("ftp://example.org")).unwrap_err();
        assert!(matches!(err, CliError::Mapper(_)));
    }
}
