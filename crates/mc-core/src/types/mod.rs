//! Domain types for the mapconst generator.
//!
//! # Module Organization
//!
//! - [`location`] - Source code locations
//! - [`decl`] - Constant declaration groups and their specs
//! - [`package`] - Parsed files and the package that owns them
//! - [`matched`] - Constants attributed to a requested type
//!
//! All public types are re-exported at this module level and at the crate root:
//!
//! ```
//! use mc_core::{ConstSpec, DeclarationGroup, Package, SourceUnit, TypeExpr};
//! ```

mod decl;
mod location;
mod matched;
mod package;

pub use decl::{ConstSpec, DeclarationGroup, TypeExpr, BLANK_IDENTIFIER};
pub use location::SourceLocation;
pub use matched::MatchedConstant;
pub use package::{Package, SourceUnit};
