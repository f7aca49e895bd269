//! Configuration structures for the mapconst generator.
//!
//! This module provides configuration types for a generation run:
//!
//! - [`OutputTarget`] - Where the generated file goes
//! - [`FormatterKind`] - Which canonicalizer formats the output
//! - [`GenerateConfig`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`]. A [`GenerateConfig`] can
//! be loaded from a JSON file, with missing fields taking their defaults.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Suffix appended to the lowercased first type name for the default output file.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_mapconst.go";

/// Marker value selecting standard output as the destination.
const STDOUT_MARKER: &str = "stdout";

/// Destination of the generated source.
///
/// Parsed from the raw `--output` value: `"stdout"` selects standard output,
/// an empty string selects the default path, anything else is a file path.
///
/// # Examples
///
/// ```
/// use mc_core::OutputTarget;
///
/// assert_eq!(OutputTarget::from("stdout"), OutputTarget::Stdout);
/// assert_eq!(OutputTarget::from(""), OutputTarget::Default);
/// assert_eq!(
///     OutputTarget::from("gen.go"),
///     OutputTarget::Path("gen.go".into())
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputTarget {
    /// Print to standard output; the filesystem is not touched.
    Stdout,
    /// `<input dir>/<lowercase first type>_mapconst.go`.
    #[default]
    Default,
    /// An explicit file path.
    Path(Utf8PathBuf),
}

impl OutputTarget {
    /// Resolves the file path to write, or `None` for standard output.
    ///
    /// # Arguments
    ///
    /// * `input_dir` - The resolved input directory of the package
    /// * `first_type` - The first requested type name
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use mc_core::OutputTarget;
    ///
    /// let path = OutputTarget::Default.resolve(Utf8Path::new("pkg"), "Color");
    /// assert_eq!(path.as_deref().map(|p| p.as_str()), Some("pkg/color_mapconst.go"));
    /// ```
    #[must_use]
    pub fn resolve(&self, input_dir: &Utf8Path, first_type: &str) -> Option<Utf8PathBuf> {
        match self {
            Self::Stdout => None,
            Self::Default => Some(input_dir.join(format!(
                "{}{DEFAULT_OUTPUT_SUFFIX}",
                first_type.to_lowercase()
            ))),
            Self::Path(path) => Some(path.clone()),
        }
    }
}

impl From<&str> for OutputTarget {
    fn from(raw: &str) -> Self {
        match raw {
            STDOUT_MARKER => Self::Stdout,
            "" => Self::Default,
            path => Self::Path(Utf8PathBuf::from(path)),
        }
    }
}

impl From<String> for OutputTarget {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<OutputTarget> for String {
    fn from(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => STDOUT_MARKER.to_owned(),
            OutputTarget::Default => String::new(),
            OutputTarget::Path(path) => path.into_string(),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str(STDOUT_MARKER),
            Self::Default => f.write_str("<default>"),
            Self::Path(path) => write!(f, "{path}"),
        }
    }
}

/// Canonicalizer used to format the generated buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FormatterKind {
    /// `gofmt` when it can be found, the in-process normalizer otherwise.
    #[default]
    Auto,
    /// The in-process layout normalizer.
    Builtin,
    /// The external `gofmt` binary.
    Gofmt,
}

/// Root configuration for one generation run.
///
/// # Examples
///
/// ```
/// use mc_core::{GenerateConfig, OutputTarget};
///
/// let config = GenerateConfig::new(["Color", "Shape"]);
/// assert_eq!(config.type_names, vec!["Color", "Shape"]);
/// assert_eq!(config.output, OutputTarget::Default);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Requested constant type names, in output order.
    pub type_names: Vec<String>,

    /// Input directory or explicit file list. Empty means the current directory.
    pub inputs: Vec<Utf8PathBuf>,

    /// Output destination.
    pub output: OutputTarget,

    /// Extra build tags considered satisfied in directory mode.
    pub build_tags: Vec<String>,

    /// Canonicalizer selection.
    pub formatter: FormatterKind,

    /// Explicit `gofmt` binary. `None` searches `PATH`.
    pub gofmt_path: Option<Utf8PathBuf>,
}

impl GenerateConfig {
    /// Creates a configuration requesting the given type names.
    #[must_use]
    pub fn new<I, S>(type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_names: type_names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the input paths.
    #[must_use]
    pub fn with_inputs<I, P>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output destination.
    #[must_use]
    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid JSON for this structure.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Checks that at least one non-blank type name was requested.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoTypeNames`] for an empty list and
    /// [`ConfigError::InvalidOption`] for a blank entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.type_names.is_empty() {
            return Err(ConfigError::NoTypeNames);
        }
        if let Some(position) = self.type_names.iter().position(|t| t.trim().is_empty()) {
            return Err(ConfigError::invalid_option(
                "type",
                format!("type name #{} is empty", position + 1),
            ));
        }
        Ok(())
    }

    /// Returns the first requested type name, which names the default output file.
    #[must_use]
    pub fn first_type(&self) -> Option<&str> {
        self.type_names.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_target_parse() {
        assert_eq!(OutputTarget::from("stdout"), OutputTarget::Stdout);
        assert_eq!(OutputTarget::from(""), OutputTarget::Default);
        assert_eq!(
            OutputTarget::from("out/x.go"),
            OutputTarget::Path(Utf8PathBuf::from("out/x.go"))
        );
    }

    #[test]
    fn test_output_target_resolve_default_lowercases() {
        let path = OutputTarget::Default.resolve(Utf8Path::new("a/b"), "HTTPMethod");
        assert_eq!(path, Some(Utf8PathBuf::from("a/b/httpmethod_mapconst.go")));
    }

    #[test]
    fn test_output_target_resolve_stdout_and_path() {
        assert_eq!(OutputTarget::Stdout.resolve(Utf8Path::new("."), "T"), None);
        let explicit = OutputTarget::Path(Utf8PathBuf::from("/tmp/x.go"));
        assert_eq!(
            explicit.resolve(Utf8Path::new("."), "T"),
            Some(Utf8PathBuf::from("/tmp/x.go"))
        );
    }

    #[test]
    fn test_output_target_serialization() {
        let json = serde_json::to_string(&OutputTarget::Stdout).unwrap();
        assert_eq!(json, r#""stdout""#);
        let parsed: OutputTarget = serde_json::from_str(r#""gen.go""#).unwrap();
        assert_eq!(parsed, OutputTarget::Path(Utf8PathBuf::from("gen.go")));
    }

    #[test]
    fn test_validate_rejects_missing_and_blank() {
        assert!(matches!(
            GenerateConfig::default().validate(),
            Err(ConfigError::NoTypeNames)
        ));
        assert!(matches!(
            GenerateConfig::new(["A", " "]).validate(),
            Err(ConfigError::InvalidOption { .. })
        ));
        assert!(GenerateConfig::new(["A"]).validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"type_names": ["Color"], "formatter": "gofmt"}"#;
        let config: GenerateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.type_names, vec!["Color"]);
        assert_eq!(config.formatter, FormatterKind::Gofmt);
        assert_eq!(config.output, OutputTarget::Default);
        assert!(config.build_tags.is_empty());
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapconst.json");
        std::fs::write(&path, r#"{"build_tags": ["integration"], "output": "stdout"}"#).unwrap();

        let utf8 = Utf8PathBuf::from_path_buf(path).unwrap();
        let config = GenerateConfig::from_json_file(&utf8).unwrap();
        assert_eq!(config.build_tags, vec!["integration"]);
        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(config.formatter, FormatterKind::Auto);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = GenerateConfig::from_json_file(Utf8Path::new("/nonexistent/mapconst.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
