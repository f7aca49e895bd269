//! Error types for the mc-codegen crate.
//!
//! [`GenerateError`] aborts a run. [`FormatError`] is recoverable: the
//! generator falls back to the unformatted buffer when canonicalization fails.

use camino::Utf8PathBuf;
use mc_core::ConfigError;
use mc_scanner::LoadError;

/// Errors that abort a generation run.
///
/// # Examples
///
/// ```
/// use mc_codegen::GenerateError;
///
/// let err = GenerateError::no_constants("Color");
/// assert_eq!(err.to_string(), "no constant defined for type Color");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input package could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// No constant in the package has the requested type.
    #[error("no constant defined for type {type_name}")]
    NoConstants {
        /// The requested type name.
        type_name: String,
    },

    /// The mapping template failed to load or render.
    #[error("failed to render mapping: {0}")]
    Template(#[from] minijinja::Error),

    /// The output file could not be written.
    #[error("writing output: {path}: {source}")]
    Write {
        /// The destination path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Creates a new [`GenerateError::NoConstants`] error.
    #[inline]
    pub fn no_constants(type_name: impl Into<String>) -> Self {
        Self::NoConstants {
            type_name: type_name.into(),
        }
    }
}

/// Errors from a [`Canonicalizer`](crate::Canonicalizer).
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The generated source is not valid Go.
    #[error("invalid Go source: {0}")]
    Syntax(#[from] mc_go_parser::ParseError),

    /// The external formatter binary could not be found.
    #[error("cannot find {program}: {source}")]
    NotFound {
        /// The program looked up.
        program: String,
        /// The lookup failure.
        #[source]
        source: which::Error,
    },

    /// The external formatter could not be run.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start.
        program: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external formatter exited unsuccessfully.
    #[error("{program} failed with {status}: {stderr}")]
    External {
        /// The program that failed.
        program: Utf8PathBuf,
        /// Its exit status.
        status: std::process::ExitStatus,
        /// Its trimmed standard error.
        stderr: String,
    },

    /// The located formatter path is not valid UTF-8.
    #[error("formatter path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The external formatter printed something that is not UTF-8.
    #[error("{program} produced non-UTF-8 output")]
    NonUtf8Output {
        /// The program that failed.
        program: Utf8PathBuf,
    },
}
