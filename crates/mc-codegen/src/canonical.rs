//! Output canonicalization.
//!
//! The generated buffer goes through a [`Canonicalizer`] before it is
//! written. Two are provided:
//!
//! - [`BuiltinFormatter`]: validates the buffer with the Go parser, then
//!   normalizes its layout in process
//! - [`Gofmt`]: pipes the buffer through an external `gofmt` binary
//!
//! [`FormatterKind::Auto`] picks `gofmt` when one is installed and the
//! builtin normalizer otherwise.
//!
//! Formatting failures are never fatal. [`canonicalize_or_raw`] logs them and
//! hands back the unformatted buffer.

use std::io::Write;
use std::ops::Range;
use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use mc_core::FormatterKind;
use mc_go_parser::GoParser;
use tracing::{debug, warn};

use crate::error::FormatError;

/// Program name searched on `PATH` by [`Gofmt`].
const GOFMT_PROGRAM: &str = "gofmt";

/// Keys no wider than this always align with their neighbours.
const SMALL_KEY_WIDTH: usize = 40;

/// Width ratio against the section's geometric mean that starts a new
/// alignment section.
const KEY_WIDTH_RATIO: f64 = 2.5;

/// Turns Go source into its canonical textual form.
pub trait Canonicalizer {
    /// Returns the canonical form of `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if `source` cannot be formatted.
    fn canonicalize(&self, source: &str) -> Result<String, FormatError>;
}

/// Builds the canonicalizer selected by the configuration.
#[must_use]
pub fn canonicalizer_for(
    kind: FormatterKind,
    gofmt_path: Option<&Utf8Path>,
) -> Box<dyn Canonicalizer> {
    match kind {
        FormatterKind::Builtin => Box::new(BuiltinFormatter),
        FormatterKind::Gofmt => Box::new(Gofmt::new(gofmt_path.map(Utf8Path::to_owned))),
        _ => match gofmt_path {
            Some(path) => Box::new(Gofmt::new(Some(path.to_owned()))),
            None => match Gofmt::locate() {
                Ok(gofmt) => {
                    debug!(program = ?gofmt.program, "Using gofmt");
                    Box::new(gofmt)
                }
                Err(error) => {
                    debug!(%error, "Using the builtin formatter");
                    Box::new(BuiltinFormatter)
                }
            },
        },
    }
}

/// Canonicalizes `buffer`, or returns it unchanged if formatting fails.
///
/// A failure means the generator produced Go the formatter rejects; both the
/// error and a hint are logged at `warn` level.
///
/// # Examples
///
/// ```
/// use mc_codegen::{canonicalize_or_raw, BuiltinFormatter};
///
/// let broken = "package p\n\nvar X = map[string]T{\n".to_owned();
/// assert_eq!(canonicalize_or_raw(&BuiltinFormatter, broken.clone()), broken);
/// ```
pub fn canonicalize_or_raw(formatter: &dyn Canonicalizer, buffer: String) -> String {
    match formatter.canonicalize(&buffer) {
        Ok(formatted) => formatted,
        Err(error) => {
            warn!(%error, "internal error: invalid Go generated");
            warn!("compile the package to analyze the error");
            buffer
        }
    }
}

/// In-process layout normalizer for Go source.
///
/// Rejects source that does not parse, then:
///
/// - indents with tabs by bracket nesting, one level per opening line
/// - trims trailing whitespace
/// - collapses runs of blank lines, and drops blank lines right after an
///   opening `{`/`(` line or right before a closing one
/// - spaces `key: value` lines of a composite literal and aligns the values
///   of adjacent entries, starting a new alignment section where a key wider
///   than 40 columns is 2.5 times wider or narrower than the section so far
/// - ends the file with exactly one newline
///
/// Brackets and colons inside strings, runes, raw strings and comments are
/// ignored. Lines that start inside a raw string or block comment are kept
/// byte for byte. The output is a fixed point: formatting it again returns
/// the same bytes.
///
/// # Examples
///
/// ```
/// use mc_codegen::{BuiltinFormatter, Canonicalizer};
///
/// let source = "package p\n\n\n\nvar M = map[string]T{\n\"A\":A,\n  \"Bee\": Bee,\n}";
/// let formatted = BuiltinFormatter.canonicalize(source)?;
/// assert_eq!(
///     formatted,
///     "package p\n\nvar M = map[string]T{\n\t\"A\":   A,\n\t\"Bee\": Bee,\n}\n"
/// );
/// # Ok::<(), mc_codegen::FormatError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinFormatter;

impl Canonicalizer for BuiltinFormatter {
    fn canonicalize(&self, source: &str) -> Result<String, FormatError> {
        GoParser::new()?.validate(source)?;
        Ok(normalize_layout(source))
    }
}

/// Canonicalizer backed by the external `gofmt` binary.
///
/// The binary is resolved on each call: the explicit path if one was given,
/// otherwise `gofmt` on `PATH`.
#[derive(Debug, Default, Clone)]
pub struct Gofmt {
    program: Option<Utf8PathBuf>,
}

impl Gofmt {
    /// Creates a `gofmt` canonicalizer, optionally pinned to `program`.
    #[must_use]
    pub const fn new(program: Option<Utf8PathBuf>) -> Self {
        Self { program }
    }

    /// Finds `gofmt` on `PATH` and pins it.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NotFound`] if there is none.
    pub fn locate() -> Result<Self, FormatError> {
        find_gofmt().map(|program| Self::new(Some(program)))
    }

    fn resolve_program(&self) -> Result<Utf8PathBuf, FormatError> {
        match &self.program {
            Some(program) => Ok(program.clone()),
            None => find_gofmt(),
        }
    }
}

fn find_gofmt() -> Result<Utf8PathBuf, FormatError> {
    let found = which::which(GOFMT_PROGRAM).map_err(|source| FormatError::NotFound {
        program: GOFMT_PROGRAM.to_owned(),
        source,
    })?;
    Utf8PathBuf::from_path_buf(found).map_err(FormatError::NonUtf8Path)
}

impl Canonicalizer for Gofmt {
    fn canonicalize(&self, source: &str) -> Result<String, FormatError> {
        let program = self.resolve_program()?;
        let spawn_error = |source| FormatError::Spawn {
            program: program.clone(),
            source,
        };

        let mut child = Command::new(&program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_error)?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;
        debug!(program = %program, status = %output.status, "External formatter finished");

        if !output.status.success() {
            return Err(FormatError::External {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| FormatError::NonUtf8Output { program })
    }
}

/// Lexical state carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    BlockComment,
    RawString,
}

/// One output line before blank-line handling.
#[derive(Debug)]
struct LayoutLine {
    /// Copied from the input unchanged.
    verbatim: bool,
    indent: usize,
    /// Trimmed text without indentation.
    content: String,
    /// Byte offset of the `key: value` colon in `content`.
    colon: Option<usize>,
}

impl LayoutLine {
    fn is_blank(&self) -> bool {
        !self.verbatim && self.content.is_empty()
    }

    fn opens_block(&self) -> bool {
        !self.verbatim && (self.content.ends_with('{') || self.content.ends_with('('))
    }

    fn closes_block(&self) -> bool {
        !self.verbatim && (self.content.starts_with('}') || self.content.starts_with(')'))
    }

    /// The text before the entry colon, without trailing spaces.
    fn key(&self) -> &str {
        self.colon
            .map_or("", |colon| self.content[..colon].trim_end())
    }

    /// Rewrites the entry as `key:` padded so the value starts one column
    /// past a key of `width` characters.
    fn align_value(&mut self, width: usize) {
        let Some(colon) = self.colon else {
            return;
        };
        let key = self.content[..colon].trim_end();
        let value = self.content[colon + 1..].trim_start();
        let padding = " ".repeat(width.saturating_sub(key.chars().count()) + 1);
        let rewritten = format!("{key}:{padding}{value}");
        self.colon = Some(key.len());
        self.content = rewritten;
    }
}

/// What a scan of one line found.
#[derive(Debug, Default)]
struct LineScan {
    /// First colon at the line's own nesting level, not part of `:=`.
    colon: Option<usize>,
    /// Start of a trailing `//` comment.
    comment: Option<usize>,
}

/// Bracket tracker shared by all lines of a file.
#[derive(Debug)]
struct LayoutScanner {
    mode: Mode,
    /// Open brackets with the indent of the line that opened them.
    stack: Vec<(char, usize)>,
}

impl LayoutScanner {
    const fn new() -> Self {
        Self {
            mode: Mode::Code,
            stack: Vec::new(),
        }
    }

    /// Indent of a code line whose trimmed text is `content`.
    ///
    /// A line starting with closers sits at the level of the line that
    /// opened the last of them; any other line sits one level inside the
    /// innermost open bracket's line. Switch clauses sit at the level of
    /// their `switch`.
    fn indent_for(&self, content: &str) -> usize {
        let closers = content
            .chars()
            .take_while(|c| matches!(c, ')' | ']' | '}'))
            .count();
        if closers > 0 && closers <= self.stack.len() {
            return self.stack[self.stack.len() - closers].1;
        }
        match self.stack.last() {
            Some(&('{', indent)) if is_switch_clause(content) => indent,
            Some(&(_, indent)) => indent + 1,
            None => 0,
        }
    }

    /// Whether the innermost open bracket is a brace.
    fn in_braces(&self) -> bool {
        matches!(self.stack.last(), Some(('{', _)))
    }

    fn scan(&mut self, line: &str, indent: usize) -> LineScan {
        let base = self.stack.len();
        let mut result = LineScan::default();
        let mut chars = line.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match self.mode {
                Mode::BlockComment => {
                    if c == '*' && chars.next_if(|&(_, n)| n == '/').is_some() {
                        self.mode = Mode::Code;
                    }
                }
                Mode::RawString => {
                    if c == '`' {
                        self.mode = Mode::Code;
                    }
                }
                Mode::Code => match c {
                    '/' if chars.next_if(|&(_, n)| n == '/').is_some() => {
                        result.comment = Some(i);
                        break;
                    }
                    '/' if chars.next_if(|&(_, n)| n == '*').is_some() => {
                        self.mode = Mode::BlockComment;
                    }
                    '"' | '\'' => {
                        while let Some((_, s)) = chars.next() {
                            if s == '\\' {
                                chars.next();
                            } else if s == c {
                                break;
                            }
                        }
                    }
                    '`' => self.mode = Mode::RawString,
                    '(' | '[' | '{' => self.stack.push((c, indent)),
                    ')' | ']' | '}' => {
                        self.stack.pop();
                    }
                    ':' if self.stack.len() == base
                        && result.colon.is_none()
                        && chars.peek().is_none_or(|&(_, n)| n != '=') =>
                    {
                        result.colon = Some(i);
                    }
                    _ => {}
                },
            }
        }

        result
    }
}

fn is_switch_clause(content: &str) -> bool {
    content.starts_with("default:")
        || content
            .strip_prefix("case")
            .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

/// Applies the [`BuiltinFormatter`] layout rules to already valid source.
fn normalize_layout(source: &str) -> String {
    let mut lines = split_lines(source);
    align_key_values(&mut lines);
    join_lines(&lines)
}

fn split_lines(source: &str) -> Vec<LayoutLine> {
    let mut scanner = LayoutScanner::new();
    let mut lines = Vec::new();

    for raw in source.lines() {
        if scanner.mode != Mode::Code {
            let indent = 0;
            scanner.scan(raw, indent);
            let content = if scanner.mode == Mode::Code {
                raw.trim_end()
            } else {
                raw
            };
            lines.push(LayoutLine {
                verbatim: true,
                indent,
                content: content.to_owned(),
                colon: None,
            });
            continue;
        }

        let trimmed = raw.trim_start();
        let indent = scanner.indent_for(trimmed);
        let in_braces = scanner.in_braces();
        let scan = scanner.scan(trimmed, indent);

        let content = if scanner.mode == Mode::RawString {
            trimmed
        } else {
            trimmed.trim_end()
        };
        let code = scan
            .comment
            .map_or(content, |start| &content[..start])
            .trim_end();
        let is_entry = in_braces && scanner.mode == Mode::Code && code.ends_with(',');

        lines.push(LayoutLine {
            verbatim: false,
            indent,
            content: content.to_owned(),
            colon: scan.colon.filter(|&colon| is_entry && colon > 0),
        });
    }

    lines
}

/// Rewrites runs of adjacent `key: value` lines at one indent so their
/// values start in the same column within each alignment section.
fn align_key_values(lines: &mut [LayoutLine]) {
    let mut start = 0;
    while start < lines.len() {
        let Some(indent) = lines[start].colon.map(|_| lines[start].indent) else {
            start += 1;
            continue;
        };
        let end = lines[start..]
            .iter()
            .position(|line| line.colon.is_none() || line.indent != indent)
            .map_or(lines.len(), |offset| start + offset);

        let run = &mut lines[start..end];
        let widths: Vec<usize> = run.iter().map(|line| line.key().chars().count()).collect();

        for section in alignment_sections(&widths) {
            let width = widths[section.clone()].iter().copied().max().unwrap_or(0);
            for line in &mut run[section] {
                line.align_value(width);
            }
        }

        start = end;
    }
}

/// Splits a run of entries, given their key widths, into alignment sections.
///
/// An entry starts a new section when it or the entry before it is wider
/// than [`SMALL_KEY_WIDTH`] and its width is at least [`KEY_WIDTH_RATIO`]
/// times larger or smaller than the geometric mean of the section so far.
fn alignment_sections(widths: &[usize]) -> Vec<Range<usize>> {
    let mut sections = Vec::new();
    let mut section_start = 0;
    let mut log_sum = 0.0_f64;
    let mut count = 0_u32;

    for (i, &width) in widths.iter().enumerate() {
        let uneven = i > 0 && (widths[i - 1] > SMALL_KEY_WIDTH || width > SMALL_KEY_WIDTH);
        if uneven && count > 0 {
            let mean = (log_sum / f64::from(count)).exp();
            let ratio = as_f64(width) / mean;
            if KEY_WIDTH_RATIO * ratio <= 1.0 || ratio >= KEY_WIDTH_RATIO {
                sections.push(section_start..i);
                section_start = i;
                log_sum = 0.0;
                count = 0;
            }
        }
        log_sum += as_f64(width).ln();
        count += 1;
    }

    if section_start < widths.len() {
        sections.push(section_start..widths.len());
    }
    sections
}

fn as_f64(width: usize) -> f64 {
    f64::from(u32::try_from(width).unwrap_or(u32::MAX))
}

fn join_lines(lines: &[LayoutLine]) -> String {
    let mut out = String::new();
    let mut previous: Option<&LayoutLine> = None;
    let mut pending_blank = false;

    for line in lines {
        if line.is_blank() {
            pending_blank = previous.is_some();
            continue;
        }
        if pending_blank
            && !previous.is_some_and(LayoutLine::opens_block)
            && !line.closes_block()
        {
            out.push('\n');
        }
        pending_blank = false;

        if !line.verbatim {
            out.extend(std::iter::repeat_n('\t', line.indent));
        }
        out.push_str(&line.content);
        out.push('\n');
        previous = Some(line);
    }

    out
}
