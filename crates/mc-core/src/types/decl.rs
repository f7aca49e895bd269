//! Constant declaration groups as written in Go source.
//!
//! A Go `const` keyword introduces either one spec or a parenthesized list of
//! specs. Each spec declares one or more names, optionally followed by a type
//! and an `=` with values:
//!
//! ```go
//! const (
//!     Red Color = iota // names: [Red], type: Color, value
//!     Green            // names: [Green], no type, no value
//!     Max = 3          // names: [Max], no type, value
//! )
//! ```
//!
//! These types keep only what classification needs: names, the type as
//! written, and whether values are present. Values are never evaluated.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::location::SourceLocation;

/// The blank identifier. Specs named `_` are never emitted.
pub const BLANK_IDENTIFIER: &str = "_";

/// An explicit type written on a const spec.
///
/// # Examples
///
/// ```
/// use mc_core::TypeExpr;
///
/// assert_eq!(TypeExpr::named("Color").name(), "Color");
/// assert_eq!(TypeExpr::other("time.Duration").name(), "time.Duration");
/// assert!(TypeExpr::named("Color").is_named());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum TypeExpr {
    /// A bare identifier such as `Color`.
    Named(String),
    /// Any other type expression (`pkg.T`, `T[int]`, `*T`...), as source text.
    Other(String),
}

impl TypeExpr {
    /// Creates a [`TypeExpr::Named`].
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a [`TypeExpr::Other`].
    #[inline]
    pub fn other(text: impl Into<String>) -> Self {
        Self::Other(text.into())
    }

    /// Returns the literal text of the type as written.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) | Self::Other(name) => name,
        }
    }

    /// Returns `true` for a bare identifier.
    #[inline]
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a constant declaration group.
///
/// # Examples
///
/// ```
/// use mc_core::{ConstSpec, TypeExpr};
///
/// // Red Color = iota
/// let spec = ConstSpec::new("Red").with_type(TypeExpr::named("Color")).with_value();
/// assert_eq!(spec.first_name(), "Red");
/// assert!(spec.has_value);
///
/// // Green
/// let spec = ConstSpec::new("Green");
/// assert!(spec.ty.is_none() && !spec.has_value);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstSpec {
    /// Declared names in order. Never empty.
    pub names: SmallVec<[String; 1]>,

    /// Explicit type, if written.
    pub ty: Option<TypeExpr>,

    /// Whether an `= values` part is present.
    pub has_value: bool,

    /// Position of the spec in its file.
    pub location: SourceLocation,
}

impl ConstSpec {
    /// Creates a spec with a single name, no type and no value.
    pub fn new(name: impl Into<String>) -> Self {
        let mut names = SmallVec::new();
        names.push(name.into());
        Self {
            names,
            ty: None,
            has_value: false,
            location: SourceLocation::default(),
        }
    }

    /// Appends another declared name (`A, B Color = 1, 2`).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Sets the explicit type.
    #[must_use]
    pub fn with_type(mut self, ty: TypeExpr) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Marks the spec as carrying values.
    #[must_use]
    pub const fn with_value(mut self) -> Self {
        self.has_value = true;
        self
    }

    /// Sets the source location.
    #[must_use]
    pub const fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Returns the first declared name, the only one the generator uses.
    #[inline]
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.names.first().map_or("", String::as_str)
    }

    /// Returns `true` for `X = v`: a value without a type makes the constant untyped.
    #[inline]
    #[must_use]
    pub const fn is_untyped_value(&self) -> bool {
        self.ty.is_none() && self.has_value
    }
}

/// The specs of one `const` declaration, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationGroup {
    /// Specs in the order written. Order drives type inference.
    pub specs: Vec<ConstSpec>,

    /// Position of the `const` keyword.
    pub location: SourceLocation,
}

impl DeclarationGroup {
    /// Creates a group from its specs.
    #[must_use]
    pub fn new(specs: Vec<ConstSpec>) -> Self {
        Self {
            specs,
            location: SourceLocation::default(),
        }
    }

    /// Returns the number of specs in the group.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` for `const ()`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_builders() {
        let spec = ConstSpec::new("A")
            .with_name("B")
            .with_type(TypeExpr::named("T"))
            .with_value()
            .at(SourceLocation::new(4, 1, 30));

        assert_eq!(spec.first_name(), "A");
        assert_eq!(spec.names.len(), 2);
        assert_eq!(spec.ty.as_ref().map(TypeExpr::name), Some("T"));
        assert!(spec.has_value);
        assert!(!spec.is_untyped_value());
        assert_eq!(spec.location.line, 4);
    }

    #[test]
    fn test_untyped_value() {
        assert!(ConstSpec::new("X").with_value().is_untyped_value());
        assert!(!ConstSpec::new("X").is_untyped_value());
    }

    #[test]
    fn test_type_expr_kinds() {
        assert!(TypeExpr::named("Color").is_named());
        assert!(!TypeExpr::other("pkg.Color").is_named());
        assert_eq!(TypeExpr::other("pkg.Color").to_string(), "pkg.Color");
    }

    #[test]
    fn test_group_len() {
        let group = DeclarationGroup::new(vec![ConstSpec::new("A"), ConstSpec::new("B")]);
        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
        assert!(DeclarationGroup::default().is_empty());
    }
}
