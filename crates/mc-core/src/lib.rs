//! Core types, configuration, and errors for the mapconst generator.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - The package model ([`Package`], [`SourceUnit`]) built by the loader
//! - The declaration model ([`DeclarationGroup`], [`ConstSpec`], [`TypeExpr`])
//!   produced by the Go parser and consumed by the classifier
//! - [`MatchedConstant`], the unit of classifier output
//! - Configuration ([`GenerateConfig`], [`OutputTarget`], [`FormatterKind`])
//! - The [`ConfigError`] type

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{FormatterKind, GenerateConfig, OutputTarget, DEFAULT_OUTPUT_SUFFIX};
pub use error::ConfigError;
pub use types::{
    ConstSpec, DeclarationGroup, MatchedConstant, Package, SourceLocation, SourceUnit, TypeExpr,
    BLANK_IDENTIFIER,
};
