//! Constants attributed to a requested type.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::location::SourceLocation;

/// A constant name the classifier attributed to a requested type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedConstant {
    /// The spec's first declared name.
    pub name: String,

    /// File declaring the constant.
    pub file: Utf8PathBuf,

    /// Position of the spec.
    pub location: SourceLocation,
}

impl MatchedConstant {
    /// Creates a matched constant.
    pub fn new(
        name: impl Into<String>,
        file: impl Into<Utf8PathBuf>,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            location,
        }
    }
}
