//! The generation pipeline.
//!
//! [`Generator`] runs one generation end to end: load the package, classify
//! and emit each requested type in order, canonicalize, and resolve the
//! destination. [`write_output`] then puts the bytes where they belong.

use std::io::Write;

use camino::Utf8PathBuf;
use mc_core::{ConfigError, GenerateConfig};
use mc_scanner::{BuildContext, InputSpec, SourceLoader};
use tracing::{debug, info};

use crate::canonical::{canonicalize_or_raw, canonicalizer_for, Canonicalizer};
use crate::classify::GenerationRequest;
use crate::emit::MappingEmitter;
use crate::error::GenerateError;

/// Program name written into the generated-file header.
pub const PROGRAM_NAME: &str = "mapconst";

/// Label used in errors when standard output cannot be written.
const STDOUT_LABEL: &str = "<stdout>";

/// The result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// The Go package the mappings were generated for.
    pub package_name: String,

    /// Canonicalized source (or the raw buffer if formatting failed).
    pub source: String,

    /// File to write, or `None` for standard output.
    pub destination: Option<Utf8PathBuf>,
}

/// Runs a generation for one configuration.
///
/// # Examples
///
/// ```ignore
/// use mc_codegen::{write_output, Generator};
/// use mc_core::{GenerateConfig, OutputTarget};
///
/// let config = GenerateConfig::new(["Color"])
///     .with_inputs(["./paint"])
///     .with_output(OutputTarget::Stdout);
/// let output = Generator::new(config)?.generate()?;
/// write_output(&output, &mut std::io::stdout().lock())?;
/// ```
pub struct Generator {
    config: GenerateConfig,
    invocation: Vec<String>,
    canonicalizer: Box<dyn Canonicalizer>,
}

impl Generator {
    /// Creates a generator after validating `config`.
    ///
    /// The header records `--type <names>` until
    /// [`with_invocation`](Self::with_invocation) supplies the real arguments.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] if no usable type name was requested.
    pub fn new(config: GenerateConfig) -> Result<Self, GenerateError> {
        config.validate()?;
        let canonicalizer = canonicalizer_for(config.formatter, config.gofmt_path.as_deref());
        let invocation = vec!["--type".to_owned(), config.type_names.join(",")];
        Ok(Self {
            config,
            invocation,
            canonicalizer,
        })
    }

    /// Sets the argument list recorded in the header.
    #[must_use]
    pub fn with_invocation<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invocation = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the canonicalizer chosen from the configuration.
    #[must_use]
    pub fn with_canonicalizer(mut self, canonicalizer: Box<dyn Canonicalizer>) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GenerateConfig {
        &self.config
    }

    /// Loads the package and renders every requested mapping.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Load`] if the package cannot be loaded,
    /// [`GenerateError::NoConstants`] for the first type without constants,
    /// and [`GenerateError::Template`] if rendering fails.
    pub fn generate(&self) -> Result<GeneratedOutput, GenerateError> {
        let first_type = self.config.first_type().ok_or(ConfigError::NoTypeNames)?;

        let input = InputSpec::from_args(&self.config.inputs)?;
        let context = BuildContext::host().with_tags(&self.config.build_tags);
        debug!(
            goos = context.goos(),
            goarch = context.goarch(),
            tags = ?self.config.build_tags,
            "Build context"
        );
        let package = SourceLoader::new(context)?.load(&input)?;

        let mut buffer = self.header(package.name());
        let emitter = MappingEmitter::new()?;
        for type_name in &self.config.type_names {
            let classification = GenerationRequest::new(&package, type_name)
                .classify()
                .require_matches()?;
            emitter.emit(&mut buffer, &classification)?;
            info!(
                type_name = type_name.as_str(),
                constants = classification.matches().len(),
                "Generated mapping"
            );
        }

        let source = canonicalize_or_raw(self.canonicalizer.as_ref(), buffer);
        let destination = self.config.output.resolve(&input.dir(), first_type);

        Ok(GeneratedOutput {
            package_name: package.name().to_owned(),
            source,
            destination,
        })
    }

    fn header(&self, package_name: &str) -> String {
        format!(
            "// Code generated by \"{PROGRAM_NAME} {}\"; DO NOT EDIT.\n\npackage {package_name}\n",
            self.invocation.join(" ")
        )
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("invocation", &self.invocation)
            .finish_non_exhaustive()
    }
}

/// Writes generated source to its file, or to `stdout` when it has none.
///
/// # Errors
///
/// Returns [`GenerateError::Write`] if the bytes cannot be written.
pub fn write_output<W: Write>(output: &GeneratedOutput, stdout: &mut W) -> Result<(), GenerateError> {
    match &output.destination {
        Some(path) => {
            std::fs::write(path, &output.source).map_err(|source| GenerateError::Write {
                path: path.clone(),
                source,
            })?;
            info!(path = %path, bytes = output.source.len(), "Wrote output");
        }
        None => {
            stdout
                .write_all(output.source.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| GenerateError::Write {
                    path: Utf8PathBuf::from(STDOUT_LABEL),
                    source,
                })?;
        }
    }
    Ok(())
}
