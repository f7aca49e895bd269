//! CLI entry point for the mapconst generator.
//!
//! Generates `var TNameToValue = map[string]T{...}` literals for the
//! constants of one or more types declared in a Go package.
//!
//! # Usage
//!
//! ```bash
//! mapconst --type T[,U...] [--type V] [--output DEST] [--tags a,b]
//!          [--formatter auto|builtin|gofmt] [--gofmt-path PATH]
//!          [--config FILE] [-v|--verbose] [--no-color] [INPUT...]
//!
//! # Write ./color_mapconst.go for the package in the current directory
//! mapconst -t Color
//!
//! # Two types, printed instead of written
//! mapconst -t Color,Shape -o stdout ./paint
//! ```
//!
//! Typically invoked from a `//go:generate mapconst -t Color` directive.

#![deny(clippy::all)]
#![warn(missing_docs)]

use camino::Utf8PathBuf;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use mc_codegen::{write_output, Generator};
use mc_core::{FormatterKind, GenerateConfig, OutputTarget};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Generate name-to-value maps for Go constants of the given types.
///
/// INPUT is a package directory or a list of Go files. Without INPUT the
/// package in the current directory is used.
#[derive(Parser)]
#[command(name = "mapconst", version, about, long_about = None)]
struct Cli {
    /// Type names to generate mappings for (comma-separated, repeatable).
    ///
    /// Required unless the config file lists `type_names`.
    #[arg(short = 't', long = "type", value_name = "TYPE", value_delimiter = ',')]
    types: Vec<String>,

    /// Output destination: a file path, `stdout`, or empty for
    /// `<dir>/<type>_mapconst.go`.
    #[arg(short, long, value_name = "DEST")]
    output: Option<String>,

    /// Build tags considered satisfied when scanning a directory.
    #[arg(long, value_delimiter = ',', env = "MAPCONST_TAGS")]
    tags: Vec<String>,

    /// Formatter applied to the generated source.
    #[arg(long, value_enum)]
    formatter: Option<FormatterArg>,

    /// Path to the `gofmt` binary (defaults to the one on `PATH`).
    #[arg(long, env = "MAPCONST_GOFMT")]
    gofmt_path: Option<Utf8PathBuf>,

    /// JSON file with default settings; flags override its values.
    #[arg(long, env = "MAPCONST_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    /// Package directory or Go files.
    #[arg(value_name = "INPUT")]
    inputs: Vec<Utf8PathBuf>,
}

/// Formatter selection.
#[derive(Clone, Copy, ValueEnum)]
enum FormatterArg {
    /// `gofmt` if installed, otherwise the built-in normalizer.
    Auto,
    /// Built-in layout normalizer.
    Builtin,
    /// External `gofmt` binary.
    Gofmt,
}

impl From<FormatterArg> for FormatterKind {
    fn from(arg: FormatterArg) -> Self {
        match arg {
            FormatterArg::Auto => Self::Auto,
            FormatterArg::Builtin => Self::Builtin,
            FormatterArg::Gofmt => Self::Gofmt,
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `warn` level by default. Logs go
/// to stderr so they never mix with `-o stdout` output.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `no_color` - Disable ANSI colors in output
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`GenerateConfig`] from the optional config file and CLI flags.
///
/// Flags that were given replace the file's values.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
fn build_config(cli: &Cli) -> color_eyre::Result<GenerateConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            debug!(path = %path, "Loading configuration file");
            GenerateConfig::from_json_file(path)?
        }
        None => GenerateConfig::default(),
    };

    if !cli.types.is_empty() {
        config.type_names.clone_from(&cli.types);
    }
    if !cli.inputs.is_empty() {
        config.inputs.clone_from(&cli.inputs);
    }
    if let Some(output) = &cli.output {
        config.output = OutputTarget::from(output.as_str());
    }
    if !cli.tags.is_empty() {
        config.build_tags.clone_from(&cli.tags);
    }
    if let Some(formatter) = cli.formatter {
        config.formatter = formatter.into();
    }
    if cli.gofmt_path.is_some() {
        config.gofmt_path.clone_from(&cli.gofmt_path);
    }

    Ok(config)
}

// =============================================================================
// COMMAND IMPLEMENTATION
// =============================================================================

/// Runs one generation and writes the result.
///
/// # Arguments
///
/// * `config` - The merged configuration
/// * `invocation` - Arguments recorded in the generated header
///
/// # Errors
///
/// Returns an error if loading, classification, or writing fails.
fn run(config: GenerateConfig, invocation: Vec<String>) -> color_eyre::Result<()> {
    info!(types = ?config.type_names, output = %config.output, "Starting generation");

    let output = Generator::new(config)?
        .with_invocation(invocation)
        .generate()?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_output(&output, &mut handle)?;

    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments (usage errors exit with status 2)
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Merge config file and flags; no type from either is a usage error
    let config = build_config(&cli)?;
    if config.type_names.is_empty() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "--type is required unless the config file sets type_names",
            )
            .exit();
    }
    run(config, std::env::args().skip(1).collect())
}
