//! Source loader: resolves an input spec to a parsed Go [`Package`].
//!
//! This crate turns the positional inputs of a generation run into a
//! [`Package`] whose [`SourceUnit`]s are the successfully parsed files.
//!
//! # Overview
//!
//! The main entry point is [`SourceLoader`], which combines:
//!
//! - [`PackageWalker`]: lists a package directory (via the `ignore` crate)
//! - [`BuildContext`]: file name suffixes and `//go:build` constraints
//! - [`GoParser`]: tree-sitter parsing and const extraction
//!
//! # Example
//!
//! ```ignore
//! use mc_scanner::{BuildContext, InputSpec, SourceLoader};
//! use camino::Utf8PathBuf;
//!
//! let input = InputSpec::from_args(&[Utf8PathBuf::from("./colors")])?;
//! let mut loader = SourceLoader::new(BuildContext::host())?;
//! let package = loader.load(&input)?;
//! println!("package {} ({} files)", package.name(), package.units().len());
//! ```
//!
//! # Input Modes
//!
//! ```text
//! no arguments            -> Directory(".")
//! one directory argument  -> Directory(arg)      files discovered + filtered
//! anything else           -> Files(args)         parsed as given, non-.go skipped
//! ```
//!
//! Any unreadable or unparsable file aborts the load. So does an empty
//! result or a second package name.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod constraint;
mod error;
mod walker;

pub use constraint::BuildContext;
pub use error::LoadError;
pub use walker::PackageWalker;

use camino::{Utf8Path, Utf8PathBuf};
use mc_core::{Package, SourceUnit};
use mc_go_parser::GoParser;
use tracing::{debug, info};

/// Go source file extension used in file-list mode.
const GO_SUFFIX: &str = ".go";

/// What to load: a package directory or an explicit list of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSpec {
    /// Scan the buildable files of one directory.
    Directory(Utf8PathBuf),
    /// Parse exactly these files, in this order.
    Files(Vec<Utf8PathBuf>),
}

impl InputSpec {
    /// Resolves positional arguments to an input spec.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Stat`] if a single argument cannot be inspected.
    pub fn from_args(args: &[Utf8PathBuf]) -> Result<Self, LoadError> {
        match args {
            [] => Ok(Self::Directory(Utf8PathBuf::from("."))),
            [single] => {
                let metadata = std::fs::metadata(single).map_err(|source| LoadError::Stat {
                    path: single.clone(),
                    source,
                })?;
                if metadata.is_dir() {
                    Ok(Self::Directory(single.clone()))
                } else {
                    Ok(Self::Files(args.to_vec()))
                }
            }
            _ => Ok(Self::Files(args.to_vec())),
        }
    }

    /// Returns the resolved input directory.
    ///
    /// For a file list this is the parent of the first file.
    ///
    /// # Examples
    ///
    /// ```
    /// use mc_scanner::InputSpec;
    ///
    /// let files = InputSpec::Files(vec!["pkg/a.go".into(), "pkg/b.go".into()]);
    /// assert_eq!(files.dir().as_str(), "pkg");
    ///
    /// let bare = InputSpec::Files(vec!["a.go".into()]);
    /// assert_eq!(bare.dir().as_str(), ".");
    /// ```
    #[must_use]
    pub fn dir(&self) -> Utf8PathBuf {
        match self {
            Self::Directory(dir) => dir.clone(),
            Self::Files(files) => files
                .first()
                .and_then(|first| first.parent())
                .filter(|parent| !parent.as_str().is_empty())
                .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_owned),
        }
    }
}

/// Loads Go packages for one generation run.
#[derive(Debug)]
pub struct SourceLoader {
    parser: GoParser,
    context: BuildContext,
}

impl SourceLoader {
    /// Creates a loader for the given build context.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::ParserInit`] if the Go parser cannot be created.
    pub fn new(context: BuildContext) -> Result<Self, LoadError> {
        let parser = GoParser::new().map_err(LoadError::ParserInit)?;
        Ok(Self { parser, context })
    }

    /// Returns the build context used in directory mode.
    #[must_use]
    pub const fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Loads the package described by `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] for the first file that cannot be read or
    /// parsed, for an invalid build constraint, for conflicting package
    /// names, or when no buildable files remain.
    pub fn load(&mut self, input: &InputSpec) -> Result<Package, LoadError> {
        let dir = input.dir();
        let units = match input {
            InputSpec::Directory(dir) => self.load_dir(dir)?,
            InputSpec::Files(files) => self.load_files(files)?,
        };

        check_single_package(&units)?;
        let package =
            Package::new(dir.clone(), units).ok_or_else(|| LoadError::no_buildable_files(dir))?;

        info!(
            package = package.name(),
            dir = %package.dir(),
            files = package.units().len(),
            "Loaded package"
        );
        Ok(package)
    }

    fn load_dir(&mut self, dir: &Utf8Path) -> Result<Vec<SourceUnit>, LoadError> {
        let paths = PackageWalker::new(dir).collect_paths(&self.context)?;

        let mut units = Vec::with_capacity(paths.len());
        for path in paths {
            let source = read_source(&path)?;
            let buildable = self
                .context
                .matches_source(&source)
                .map_err(|message| LoadError::Constraint {
                    path: path.clone(),
                    message,
                })?;
            if !buildable {
                debug!(path = %path, "Skipping file excluded by build constraints");
                continue;
            }
            units.push(self.parse_unit(path, &source)?);
        }
        Ok(units)
    }

    fn load_files(&mut self, files: &[Utf8PathBuf]) -> Result<Vec<SourceUnit>, LoadError> {
        let mut units = Vec::with_capacity(files.len());
        for path in files {
            if !path.as_str().ends_with(GO_SUFFIX) {
                debug!(path = %path, "Skipping non-Go input");
                continue;
            }
            let source = read_source(path)?;
            units.push(self.parse_unit(path.clone(), &source)?);
        }
        Ok(units)
    }

    fn parse_unit(&mut self, path: Utf8PathBuf, source: &str) -> Result<SourceUnit, LoadError> {
        let parsed = self
            .parser
            .parse(source)
            .map_err(|e| LoadError::parse(path.clone(), e))?;

        debug!(
            path = %path,
            package = %parsed.package_name,
            groups = parsed.groups.len(),
            "Parsed file"
        );
        Ok(SourceUnit::new(path, parsed.package_name, parsed.groups))
    }
}

fn read_source(path: &Utf8Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::read(path, e))
}

/// All units must declare the same package.
fn check_single_package(units: &[SourceUnit]) -> Result<(), LoadError> {
    let Some(first) = units.first() else {
        return Ok(());
    };
    match units
        .iter()
        .find(|unit| unit.package_name != first.package_name)
    {
        Some(other) => Err(LoadError::MixedPackages {
            first: first.package_name.clone(),
            other: other.package_name.clone(),
            path: other.path.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_owned()).expect("utf8 path")
    }

    fn loader() -> SourceLoader {
        SourceLoader::new(BuildContext::new("linux", "amd64")).expect("loader")
    }

    #[test]
    fn test_input_spec_defaults_to_current_dir() {
        let spec = InputSpec::from_args(&[]).expect("spec");
        assert_eq!(spec, InputSpec::Directory(Utf8PathBuf::from(".")));
    }

    #[test]
    fn test_input_spec_single_dir_and_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        let file = root.join("a.go");
        fs::write(&file, "package p\n").expect("write");

        assert_eq!(
            InputSpec::from_args(std::slice::from_ref(&root)).expect("spec"),
            InputSpec::Directory(root.clone())
        );
        assert_eq!(
            InputSpec::from_args(std::slice::from_ref(&file)).expect("spec"),
            InputSpec::Files(vec![file.clone()])
        );
        assert_eq!(InputSpec::Files(vec![file]).dir(), root);
    }

    #[test]
    fn test_input_spec_missing_path() {
        let result = InputSpec::from_args(&[Utf8PathBuf::from("/nonexistent/mapconst/x")]);
        assert!(matches!(result, Err(LoadError::Stat { .. })));
    }

    #[test]
    fn test_load_directory_applies_filters() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        fs::write(root.join("a.go"), "package p\n\nconst A Kind = 1\n").expect("write");
        fs::write(root.join("a_test.go"), "package p\n\nconst T Kind = 9\n").expect("write");
        fs::write(
            root.join("gen.go"),
            "//go:build ignore\n\npackage main\n\nconst G Kind = 1\n",
        )
        .expect("write");
        fs::write(root.join("stub.s"), "TEXT ·f(SB),$0\n").expect("write");

        let package = loader()
            .load(&InputSpec::Directory(root.clone()))
            .expect("load");
        assert_eq!(package.name(), "p");
        assert_eq!(package.dir(), root.as_path());
        let files: Vec<_> = package
            .units()
            .iter()
            .filter_map(|u| u.path.file_name())
            .collect();
        assert_eq!(files, vec!["a.go"]);
    }

    #[test]
    fn test_load_files_skips_non_go_and_keeps_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        let b = root.join("b.go");
        let a = root.join("a.go");
        let s = root.join("stub.s");
        fs::write(&b, "package p\n").expect("write");
        fs::write(&a, "package p\n").expect("write");
        fs::write(&s, "TEXT ·f(SB),$0\n").expect("write");

        let package = loader()
            .load(&InputSpec::Files(vec![b.clone(), s, a.clone()]))
            .expect("load");
        let paths: Vec<_> = package.units().iter().map(|u| u.path.clone()).collect();
        assert_eq!(paths, vec![b, a]);
    }

    #[test]
    fn test_load_parse_error_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        fs::write(root.join("a.go"), "package p\n\nconst A Kind = 1\n").expect("write");
        fs::write(root.join("b.go"), "package p\n\nconst ( B = \n").expect("write");

        let err = loader()
            .load(&InputSpec::Directory(root.clone()))
            .expect_err("parse failure");
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(err.path(), Some(&root.join("b.go")));
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        fs::write(root.join("only_test.go"), "package p\n").expect("write");

        let err = loader()
            .load(&InputSpec::Directory(root))
            .expect_err("empty");
        assert!(matches!(err, LoadError::NoBuildableFiles { .. }));
        assert!(err.to_string().contains("no buildable Go files"));
    }

    #[test]
    fn test_load_file_list_of_only_assembly() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        let s = root.join("stub.s");
        fs::write(&s, "TEXT ·f(SB),$0\n").expect("write");

        let err = loader()
            .load(&InputSpec::Files(vec![s]))
            .expect_err("empty");
        assert!(matches!(err, LoadError::NoBuildableFiles { .. }));
    }

    #[test]
    fn test_load_mixed_packages() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        fs::write(root.join("a.go"), "package a\n").expect("write");
        fs::write(root.join("b.go"), "package b\n").expect("write");

        let err = loader()
            .load(&InputSpec::Directory(root))
            .expect_err("mixed");
        assert!(matches!(err, LoadError::MixedPackages { .. }));
    }

    #[test]
    fn test_load_invalid_constraint() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        fs::write(root.join("a.go"), "//go:build linux &&\n\npackage a\n").expect("write");

        let err = loader()
            .load(&InputSpec::Directory(root))
            .expect_err("bad constraint");
        assert!(matches!(err, LoadError::Constraint { .. }));
    }

    #[test]
    fn test_user_tags_enable_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        fs::write(root.join("a.go"), "package p\n").expect("write");
        fs::write(root.join("b.go"), "//go:build extra\n\npackage p\n").expect("write");

        let mut tagged =
            SourceLoader::new(BuildContext::new("linux", "amd64").with_tags(["extra"]))
                .expect("loader");
        let package = tagged
            .load(&InputSpec::Directory(root.clone()))
            .expect("load");
        assert_eq!(package.units().len(), 2);

        let package = loader().load(&InputSpec::Directory(root)).expect("load");
        assert_eq!(package.units().len(), 1);
    }
}
