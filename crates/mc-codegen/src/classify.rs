//! Constant classification.
//!
//! Attributes a type to every constant of a package and keeps the ones whose
//! type is the requested name. Type elision is resolved per declaration
//! group:
//!
//! ```go
//! const (
//!     A Color = iota // explicit: current type = Color, A matches
//!     B              // elided: inherits Color, B matches
//!     C = 7          // untyped value: current type reset, C skipped
//!     D              // inherits nothing, D skipped
//! )
//! ```
//!
//! The current type never crosses a group boundary. A spec whose type is
//! not a bare identifier (`time.Duration`, `*T`, `T[int]`) is skipped and
//! leaves the current type as it was.
//!
//! A spec named `_` moves the current type like any other spec but is never
//! recorded, an intentional exception to recording each spec's first name:
//! a `"_": _` entry could never compile.

use mc_core::{ConstSpec, DeclarationGroup, MatchedConstant, Package, TypeExpr, BLANK_IDENTIFIER};
use tracing::debug;

use crate::error::GenerateError;

/// A request to classify one package against one type name.
///
/// Requests are immutable and independent: classifying several types over
/// the same package never shares state between them.
///
/// # Examples
///
/// ```
/// use mc_codegen::GenerationRequest;
/// use mc_core::{ConstSpec, DeclarationGroup, Package, SourceUnit, TypeExpr};
///
/// let group = DeclarationGroup::new(vec![
///     ConstSpec::new("Red").with_type(TypeExpr::named("Color")).with_value(),
///     ConstSpec::new("Green"),
/// ]);
/// let unit = SourceUnit::new("colors.go", "paint", vec![group]);
/// let package = Package::new(".", vec![unit]).expect("one unit");
///
/// let result = GenerationRequest::new(&package, "Color").classify();
/// assert_eq!(result.names().collect::<Vec<_>>(), vec!["Red", "Green"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    package: &'a Package,
    type_name: &'a str,
}

impl<'a> GenerationRequest<'a> {
    /// Creates a request for `type_name` over `package`.
    #[must_use]
    pub const fn new(package: &'a Package, type_name: &'a str) -> Self {
        Self { package, type_name }
    }

    /// Returns the requested type name.
    #[must_use]
    pub const fn type_name(&self) -> &'a str {
        self.type_name
    }

    /// Classifies every group of the package, in file-then-declaration order.
    #[must_use]
    pub fn classify(&self) -> Classification {
        let mut matches = Vec::new();

        for (unit, group) in self.package.groups() {
            for spec in matching_specs(group, self.type_name) {
                matches.push(MatchedConstant::new(
                    spec.first_name(),
                    unit.path.clone(),
                    spec.location,
                ));
            }
        }

        debug!(
            type_name = self.type_name,
            matches = matches.len(),
            "Classified constants"
        );

        Classification {
            type_name: self.type_name.to_owned(),
            matches,
        }
    }
}

/// The constants attributed to one requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    type_name: String,
    matches: Vec<MatchedConstant>,
}

impl Classification {
    /// Returns the requested type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the matched constants in match order.
    #[must_use]
    pub fn matches(&self) -> &[MatchedConstant] {
        &self.matches
    }

    /// Returns the matched names in match order. Duplicates are kept.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|m| m.name.as_str())
    }

    /// Returns `true` when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Rejects an empty classification.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::NoConstants`] when nothing matched.
    pub fn require_matches(self) -> Result<Self, GenerateError> {
        if self.is_empty() {
            Err(GenerateError::no_constants(self.type_name))
        } else {
            Ok(self)
        }
    }
}

/// Returns the specs of `group` whose resolved type is `type_name`.
///
/// The current type starts empty for every group. Specs typed with anything
/// other than a bare identifier neither match nor change it.
pub fn matching_specs<'g>(group: &'g DeclarationGroup, type_name: &str) -> Vec<&'g ConstSpec> {
    let mut current: Option<&str> = None;
    let mut matched = Vec::new();

    for spec in &group.specs {
        if spec.is_untyped_value() {
            current = None;
            continue;
        }
        match &spec.ty {
            Some(TypeExpr::Named(name)) => current = Some(name.as_str()),
            Some(TypeExpr::Other(_)) => continue,
            None => {}
        }
        if current == Some(type_name) && spec.first_name() != BLANK_IDENTIFIER {
            matched.push(spec);
        }
    }

    matched
}
