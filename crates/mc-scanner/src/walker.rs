//! Package directory listing.
//!
//! This module provides [`PackageWalker`], which uses the `ignore` crate to
//! list the candidate Go files of one package directory.
//!
//! # Rules
//!
//! - Only the directory itself is listed; subdirectories are other packages
//! - Only `.go` files, sorted by file name
//! - `_test.go` files are compiled separately and are skipped
//! - Names starting with `_` or `.` are skipped, as the Go tool does
//! - `_GOOS`/`_GOARCH` file name suffixes must match the [`BuildContext`]
//!
//! `//go:build` lines need the file contents and are checked by the loader.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use tracing::debug;

use crate::constraint::BuildContext;
use crate::error::LoadError;

/// Go source file extension.
const GO_EXTENSION: &str = "go";

/// Suffix of separately compiled test files.
const TEST_SUFFIX: &str = "_test.go";

/// Lists the candidate source files of a package directory.
///
/// # Examples
///
/// ```ignore
/// use mc_scanner::{BuildContext, PackageWalker};
/// use camino::Utf8Path;
///
/// let walker = PackageWalker::new(Utf8Path::new("./colors"));
/// for path in walker.collect_paths(&BuildContext::host())? {
///     println!("candidate: {path}");
/// }
/// ```
#[derive(Debug)]
pub struct PackageWalker {
    /// The package directory.
    dir: Utf8PathBuf,
}

impl PackageWalker {
    /// Creates a walker for the given package directory.
    pub fn new(dir: &Utf8Path) -> Self {
        Self {
            dir: dir.to_owned(),
        }
    }

    /// Collects candidate `.go` files in file name order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Walk`] if listing fails and
    /// [`LoadError::NonUtf8Path`] for a non-UTF-8 entry.
    pub fn collect_paths(&self, context: &BuildContext) -> Result<Vec<Utf8PathBuf>, LoadError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| LoadError::NonUtf8Path(path.to_owned()))?;

            if utf8_path.extension() != Some(GO_EXTENSION) {
                continue;
            }

            let Some(file_name) = utf8_path.file_name() else {
                continue;
            };

            if let Some(reason) = skip_reason(file_name, context) {
                debug!(path = %utf8_path, reason, "Skipping file");
                continue;
            }

            paths.push(utf8_path.to_owned());
        }

        Ok(paths)
    }

    /// Builds the ignore walker: one level deep, sorted, no ignore files.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.dir)
            // Go does not consult .gitignore when building a package
            .standard_filters(false)
            .max_depth(Some(1))
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
    }
}

/// Returns why a `.go` file is not part of the package, or `None` if it is.
fn skip_reason(file_name: &str, context: &BuildContext) -> Option<&'static str> {
    if file_name.starts_with('_') || file_name.starts_with('.') {
        return Some("ignored name prefix");
    }
    if file_name.ends_with(TEST_SUFFIX) {
        return Some("test file");
    }
    if !context.matches_file_name(file_name) {
        return Some("GOOS/GOARCH suffix");
    }
    None
}
