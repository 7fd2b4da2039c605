use std::fs;
use std::path::{Path, PathBuf};

use locz::LoczConfig;

/// Name of the configuration file looked up in the scanned directory.
pub const CONFIG_FILE_NAME: &str = "locz.toml";

/// Parses a TOML configuration. Missing keys keep their defaults.
pub fn parse_config(text: &str) -> Result<LoczConfig, String> {
    toml::from_str(text).map_err(|e| format!("Invalid configuration: {}", e))
}

/// Resolves the configuration for a run.
///
/// An explicit `--config` file must exist. Otherwise `locz.toml` in
/// `directory` is used when present. A positional output subpath overrides
/// the file's `output_subpath`.
pub fn resolve_config(
    directory: &Path,
    explicit: Option<&Path>,
    output: Option<&str>,
) -> Result<(LoczConfig, Option<PathBuf>), String> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = directory.join(CONFIG_FILE_NAME);
            default.is_file().then_some(default)
        }
    };

    let (mut config, source) = match candidate {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
            (parse_config(&text)?, Some(path))
        }
        None => (LoczConfig::default(), None),
    };

    if let Some(output) = output {
        config.output_subpath = output.to_string();
    }
    config
        .validate()
        .map_err(|e| format!("{}", e))?;
    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config("output_subpath = \"Resources\"\ndelimiter = \";\"\n").unwrap();
        assert_eq!(config.output_subpath, "Resources");
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.table_suffix, ".loc.csv");
    }

    #[test]
    fn test_parse_unknown_key() {
        let result = parse_config("colour = \"blue\"\n");
        assert!(result.unwrap_err().contains("Invalid configuration"));
    }

    #[test]
    fn test_resolve_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let (config, source) = resolve_config(temp_dir.path(), None, None).unwrap();
        assert_eq!(config, LoczConfig::default());
        assert!(source.is_none());
    }

    #[test]
    fn test_resolve_picks_up_directory_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "table_suffix = \".tr.csv\"\n",
        )
        .unwrap();
        let (config, source) = resolve_config(temp_dir.path(), None, None).unwrap();
        assert_eq!(config.table_suffix, ".tr.csv");
        assert_eq!(source, Some(temp_dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_positional_output_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "output_subpath = \"FromFile\"\n",
        )
        .unwrap();
        let (config, _) = resolve_config(temp_dir.path(), None, Some("FromArgs")).unwrap();
        assert_eq!(config.output_subpath, "FromArgs");
    }

    #[test]
    fn test_missing_explicit_config() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let result = resolve_config(temp_dir.path(), Some(&missing), None);
        assert!(result.unwrap_err().contains("Cannot read"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "enum_extension = \".cs\"\n").unwrap();
        let result = resolve_config(temp_dir.path(), Some(&path), None);
        assert!(result.unwrap_err().contains("enum_extension"));
    }
}
