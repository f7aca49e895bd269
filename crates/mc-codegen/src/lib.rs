//! Constant classification and name-to-value mapping generation.
//!
//! For each requested type `T` this crate produces
//!
//! ```go
//! var TNameToValue = map[string]T{
//!     "A": A,
//!     "B": B,
//! }
//! ```
//!
//! from the constants of a Go package whose type is `T`, including constants
//! whose type is elided and carried forward within their `const` group.
//!
//! # Pipeline
//!
//! ```text
//! GenerateConfig -> SourceLoader -> Package
//!     for each type: GenerationRequest -> Classification -> MappingEmitter
//!     -> Canonicalizer -> write_output
//! ```
//!
//! - [`classify`]: the type attribution rules
//! - [`emit`]: the `minijinja` mapping template
//! - [`canonical`]: built-in and `gofmt` formatting, with raw fallback
//! - [`generator`]: header, per-type loop and destination handling

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod canonical;
pub mod classify;
pub mod emit;
pub mod error;
pub mod generator;

pub use canonical::{canonicalize_or_raw, canonicalizer_for, BuiltinFormatter, Canonicalizer, Gofmt};
pub use classify::{matching_specs, Classification, GenerationRequest};
pub use emit::MappingEmitter;
pub use error::{FormatError, GenerateError};
pub use generator::{write_output, GeneratedOutput, Generator, PROGRAM_NAME};
