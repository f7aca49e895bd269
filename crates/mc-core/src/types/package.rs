//! Parsed files and the package that owns them.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::decl::DeclarationGroup;

/// One parsed Go file.
///
/// Holds the package clause name and the top-level constant groups in source
/// order. Immutable once built by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Path the file was read from.
    pub path: Utf8PathBuf,

    /// Name from the `package` clause.
    pub package_name: String,

    /// Top-level `const` declarations, in source order.
    pub groups: Vec<DeclarationGroup>,
}

impl SourceUnit {
    /// Creates a source unit.
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        package_name: impl Into<String>,
        groups: Vec<DeclarationGroup>,
    ) -> Self {
        Self {
            path: path.into(),
            package_name: package_name.into(),
            groups,
        }
    }
}

/// A Go package assembled from one or more source units.
///
/// Lives for a single generation run. Units keep the order the loader
/// produced, which fixes the order of every classification result.
///
/// # Examples
///
/// ```
/// use mc_core::{Package, SourceUnit};
///
/// let unit = SourceUnit::new("colors.go", "paint", Vec::new());
/// let package = Package::new(".", vec![unit]).expect("one unit");
/// assert_eq!(package.name(), "paint");
///
/// assert!(Package::new(".", Vec::new()).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    name: String,
    dir: Utf8PathBuf,
    units: Vec<SourceUnit>,
}

impl Package {
    /// Creates a package named after its first unit.
    ///
    /// Returns `None` when `units` is empty.
    pub fn new(dir: impl Into<Utf8PathBuf>, units: Vec<SourceUnit>) -> Option<Self> {
        let name = units.first()?.package_name.clone();
        Some(Self {
            name,
            dir: dir.into(),
            units,
        })
    }

    /// Returns the package name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved input directory.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Returns the source units in load order.
    #[inline]
    #[must_use]
    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    /// Iterates every declaration group in file order, then group order.
    pub fn groups(&self) -> impl Iterator<Item = (&SourceUnit, &DeclarationGroup)> {
        self.units
            .iter()
            .flat_map(|unit| unit.groups.iter().map(move |group| (unit, group)))
    }
}
