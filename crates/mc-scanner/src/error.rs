//! Error types for the mc-scanner crate.
//!
//! This module provides the [`LoadError`] type for errors that can occur
//! while discovering, reading, and parsing the files of a Go package.
//!
//! Every variant is fatal: the loader never returns a partial package.

use camino::Utf8PathBuf;

/// Errors that can occur while loading a package.
///
/// # Examples
///
/// ```
/// use mc_scanner::LoadError;
///
/// let err = LoadError::no_buildable_files("./pkg");
/// assert_eq!(err.to_string(), "./pkg: no buildable Go files");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to inspect an input path.
    #[error("cannot stat {path}: {source}")]
    Stat {
        /// The input path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to list a package directory.
    #[error("cannot process directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a Go file.
    #[error("parsing package: {path}:{source}")]
    Parse {
        /// The path of the file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: mc_go_parser::ParseError,
    },

    /// A malformed `//go:build` line.
    #[error("{path}: invalid build constraint: {message}")]
    Constraint {
        /// The file carrying the constraint.
        path: Utf8PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// Nothing was left to parse after filtering.
    #[error("{dir}: no buildable Go files")]
    NoBuildableFiles {
        /// The resolved input directory.
        dir: Utf8PathBuf,
    },

    /// Files declare different package names.
    #[error("found packages {first} and {other} in {path}")]
    MixedPackages {
        /// Package name of the first file.
        first: String,
        /// The conflicting package name.
        other: String,
        /// The file declaring `other`.
        path: Utf8PathBuf,
    },

    /// The Go parser could not be created.
    #[error("failed to initialize Go parser: {0}")]
    ParserInit(#[source] mc_go_parser::ParseError),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl LoadError {
    /// Creates a new [`LoadError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`LoadError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: mc_go_parser::ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`LoadError::NoBuildableFiles`] error.
    #[inline]
    pub fn no_buildable_files(dir: impl Into<Utf8PathBuf>) -> Self {
        Self::NoBuildableFiles { dir: dir.into() }
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Stat { path, .. }
            | Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Constraint { path, .. }
            | Self::MixedPackages { path, .. } => Some(path),
            Self::NoBuildableFiles { dir } => Some(dir),
            Self::Walk(_) | Self::ParserInit(_) | Self::NonUtf8Path(_) => None,
        }
    }
}
