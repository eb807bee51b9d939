// LicUsage - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::compliance::ComplianceRules;
use crate::core::export::ExportFormat;
use crate::core::extractor::ExtractorConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LicUsage configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/licusage/ or %APPDATA%\LicUsage\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub extractor: ExtractorSection,
    pub compliance: ComplianceSection,
    pub export: ExportSection,
    pub logging: LoggingSection,
}

/// `[extractor]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractorSection {
    /// Command literal that introduces a usage table.
    pub command: Option<String>,
    /// License identifiers accepted in the `| inc` filter.
    pub license_items: Option<Vec<String>>,
}

/// `[compliance]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ComplianceSection {
    pub expected_configure_items: Option<usize>,
    pub min_resource_usages: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// "xlsx", "csv" or "json".
    pub default_format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub extractor: ExtractorConfig,
    pub compliance: ComplianceRules,
    pub default_export_format: ExportFormat,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    let (config, warnings) = parse_config(&content, config_path);
    tracing::info!(
        path = %config_path.display(),
        warnings = warnings.len(),
        "Loaded config.toml"
    );
    (config, warnings)
}

/// Parse and validate config text. `origin` is used in warning messages.
pub fn parse_config(content: &str, origin: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(source) => {
            let err = ConfigError::TomlParse {
                path: origin.to_path_buf(),
                source,
            };
            let msg = format!("Failed to parse config file. {err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();

    // -- Extractor: command --
    if let Some(command) = raw.extractor.command {
        let command = command.trim().to_string();
        if command.is_empty() {
            warnings.push(format!(
                "[extractor] command is empty. Using default (\"{}\").",
                constants::DEFAULT_COMMAND
            ));
        } else {
            config.extractor.command = command;
        }
    }

    // -- Extractor: license_items --
    if let Some(items) = raw.extractor.license_items {
        let valid = !items.is_empty()
            && items
                .iter()
                .all(|i| !i.is_empty() && !i.contains('|') && !i.contains(char::is_whitespace));
        if valid {
            config.extractor.license_items = items;
        } else {
            warnings.push(format!(
                "[extractor] license_items must be a non-empty list of identifiers without \
                 spaces or '|'. Using default ({}).",
                constants::DEFAULT_LICENSE_ITEMS.join(", ")
            ));
        }
    }

    // -- Compliance: expected_configure_items --
    if let Some(n) = raw.compliance.expected_configure_items {
        if (1..=constants::MAX_COMPLIANCE_THRESHOLD).contains(&n) {
            config.compliance.expected_configure_items = n;
        } else {
            warnings.push(out_of_range(
                "compliance.expected_configure_items",
                n,
                1,
                constants::DEFAULT_EXPECTED_CONFIGURE_ITEMS,
            ));
        }
    }

    // -- Compliance: min_resource_usages --
    if let Some(n) = raw.compliance.min_resource_usages {
        if n <= constants::MAX_COMPLIANCE_THRESHOLD {
            config.compliance.min_resource_usages = n;
        } else {
            warnings.push(out_of_range(
                "compliance.min_resource_usages",
                n,
                0,
                constants::DEFAULT_MIN_RESOURCE_USAGES,
            ));
        }
    }

    // -- Export: default_format --
    if let Some(ref format) = raw.export.default_format {
        match format.parse::<ExportFormat>() {
            Ok(f) => config.default_export_format = f,
            Err(_) => warnings.push(format!(
                "[export] default_format = \"{format}\" is not recognised. \
                 Expected \"xlsx\", \"csv\" or \"json\". Using default (xlsx).",
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Warning text for a threshold outside `min..=MAX_COMPLIANCE_THRESHOLD`.
fn out_of_range(field: &str, value: usize, min: usize, default: usize) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: format!("{min}-{}", constants::MAX_COMPLIANCE_THRESHOLD),
    };
    format!("{err}. Using default ({default}).")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml"))
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (config, warnings) = parse("");
        assert!(warnings.is_empty());
        assert_eq!(config.extractor, ExtractorConfig::default());
        assert_eq!(config.compliance, ComplianceRules::default());
        assert_eq!(config.default_export_format, ExportFormat::Xlsx);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = parse(
            r#"
            [extractor]
            license_items = ["LCR0000000001"]

            [compliance]
            expected_configure_items = 4
            min_resource_usages = 2

            [export]
            default_format = "csv"

            [logging]
            level = "debug"
            file = "licusage.log"
            "#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.extractor.license_items, vec!["LCR0000000001"]);
        assert_eq!(config.extractor.command, constants::DEFAULT_COMMAND);
        assert_eq!(config.compliance.expected_configure_items, 4);
        assert_eq!(config.compliance.min_resource_usages, 2);
        assert_eq!(config.default_export_format, ExportFormat::Csv);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file.as_deref(), Some("licusage.log"));
    }

    #[test]
    fn test_out_of_range_values_fall_back_with_warnings() {
        let (config, warnings) = parse(
            r#"
            [extractor]
            license_items = []

            [compliance]
            expected_configure_items = 0

            [export]
            default_format = "pdf"

            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 4);
        assert_eq!(config.extractor, ExtractorConfig::default());
        assert_eq!(config.compliance, ComplianceRules::default());
        assert_eq!(config.default_export_format, ExportFormat::Xlsx);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_config_falls_back_to_defaults() {
        let (config, warnings) = parse("this is = = not toml");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to parse"));
        assert_eq!(config.compliance, ComplianceRules::default());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.extractor, ExtractorConfig::default());
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[compliance]\nmin_resource_usages = 3\n").unwrap();
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty());
        assert_eq!(config.compliance.min_resource_usages, 3);
    }
}
