// LicUsage - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LicUsage operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LicUsageError {
    /// Reading or decoding the input document failed.
    Input(InputError),

    /// The document matched the block grammar but its data rows are malformed.
    Extract(ExtractError),

    /// Export operation failed.
    Export(ExportError),
}

impl fmt::Display for LicUsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Extract(e) => write!(f, "Extraction error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for LicUsageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Extract(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors raised before extraction starts: the document could not be read
/// or is not valid UTF-8 text.
#[derive(Debug)]
pub enum InputError {
    /// I/O error reading the document.
    Io { path: PathBuf, source: io::Error },

    /// Document bytes are not valid UTF-8.
    InvalidEncoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    /// Document exceeds the maximum accepted size.
    TooLarge { path: PathBuf, size: u64, max: u64 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::InvalidEncoding { path, source } => {
                write!(f, "'{}': invalid UTF-8 encoding: {source}", path.display())
            }
            Self::TooLarge { path, size, max } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidEncoding { source, .. } => Some(source),
            Self::TooLarge { .. } => None,
        }
    }
}

impl From<InputError> for LicUsageError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

/// Errors raised by the record extractor.
///
/// Finding no site blocks is not an error, and neither is a non-numeric
/// used/total value; both are expressed in the returned records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A captured data row does not split into exactly three tokens.
    /// Fatal for the whole document.
    LineShape {
        site: String,
        line_number: usize,
        line: String,
        tokens: usize,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineShape {
                site,
                line_number,
                line,
                tokens,
            } => write!(
                f,
                "site '{site}' line {line_number}: expected {} columns, found {tokens} in '{line}'",
                crate::util::constants::TOKENS_PER_ROW
            ),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<ExtractError> for LicUsageError {
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Spreadsheet workbook could not be built.
    Xlsx {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::Xlsx { path, source } => {
                write!(f, "Excel export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Xlsx { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LicUsageError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems found while loading config.toml.
///
/// Never fatal: `platform::config` renders these into startup warnings and
/// falls back to defaults.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for LicUsage results.
pub type Result<T> = std::result::Result<T, LicUsageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_line_shape_display_names_site_and_line() {
        let err = ExtractError::LineShape {
            site: "NE001".to_string(),
            line_number: 12,
            line: "FeatureA 3/5".to_string(),
            tokens: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("NE001"));
        assert!(msg.contains("line 12"));
        assert!(msg.contains("found 2"));
        assert!(msg.contains("expected 3 columns"));
    }

    #[test]
    fn test_config_error_keeps_parse_source() {
        let parse = toml::from_str::<toml::Value>("level = ").unwrap_err();
        let err = ConfigError::TomlParse {
            path: PathBuf::from("config.toml"),
            source: parse,
        };
        assert!(err.to_string().contains("config.toml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_top_level_error_preserves_source_chain() {
        let inner = InputError::Io {
            path: PathBuf::from("missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let err: LicUsageError = inner.into();
        assert!(err.to_string().starts_with("Input error:"));
        let source = err.source().expect("input error should chain");
        assert!(source.source().is_some(), "io::Error should be reachable");
    }
}
