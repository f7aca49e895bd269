//! Go build constraints: file name suffixes and `//go:build` lines.
//!
//! A file in package directory mode is buildable when both hold:
//!
//! - its name has no `_GOOS`, `_GOARCH` or `_GOOS_GOARCH` suffix, or the
//!   suffix matches the [`BuildContext`];
//! - its leading comment block has no constraint, or the constraint
//!   evaluates to true. `//go:build` wins over legacy `// +build` lines.
//!
//! # Examples
//!
//! ```
//! use mc_scanner::BuildContext;
//!
//! let ctx = BuildContext::new("linux", "amd64");
//! assert!(ctx.matches_file_name("color_linux.go"));
//! assert!(!ctx.matches_file_name("color_windows_arm64.go"));
//! assert!(ctx.matches_source("//go:build linux && !cgo_disabled\n\npackage p\n").unwrap());
//! assert!(!ctx.matches_source("//go:build ignore\n\npackage main\n").unwrap());
//! ```

use rustc_hash::FxHashSet;

/// Operating systems known to the Go toolchain.
const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Operating systems satisfying the `unix` tag.
const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Architectures known to the Go toolchain.
const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// The target a package is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    goos: String,
    goarch: String,
    tags: FxHashSet<String>,
}

impl BuildContext {
    /// Creates a context for an explicit target.
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            tags: FxHashSet::default(),
        }
    }

    /// Creates a context from `GOOS`/`GOARCH`, falling back to the host target.
    pub fn host() -> Self {
        let goos = std::env::var("GOOS")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| host_goos().to_owned());
        let goarch = std::env::var("GOARCH")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| host_goarch().to_owned());
        Self::new(goos, goarch)
    }

    /// Adds user build tags (`-tags`).
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Returns the target operating system.
    #[must_use]
    pub fn goos(&self) -> &str {
        &self.goos
    }

    /// Returns the target architecture.
    #[must_use]
    pub fn goarch(&self) -> &str {
        &self.goarch
    }

    /// Reports whether a single build tag is satisfied.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch {
            return true;
        }
        match tag {
            "gc" | "cgo" => true,
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "linux" => self.goos == "android",
            "solaris" => self.goos == "illumos",
            "darwin" => self.goos == "ios",
            _ if is_release_tag(tag) => true,
            _ => self.tags.contains(tag),
        }
    }

    /// Reports whether a file name's `_GOOS`/`_GOARCH` suffix matches.
    #[must_use]
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.split('.').next().unwrap_or(file_name);
        let Some(index) = stem.find('_') else {
            return true;
        };

        let mut parts: Vec<&str> = stem[index..].split('_').collect();
        if parts.len() >= 2 && parts.last() == Some(&"test") {
            parts.pop();
        }

        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_tag(parts[n - 2]) && self.matches_tag(parts[n - 1]);
        }
        if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
            return self.matches_tag(parts[n - 1]);
        }
        true
    }

    /// Evaluates the build constraints in a file's leading comment block.
    ///
    /// # Errors
    ///
    /// Returns a message describing a malformed `//go:build` expression.
    pub fn matches_source(&self, source: &str) -> Result<bool, String> {
        let header = ConstraintHeader::scan(source);

        if let Some(expr) = header.go_build {
            let constraint = Constraint::parse(expr)?;
            return Ok(constraint.eval(&|tag| self.matches_tag(tag)));
        }

        Ok(header
            .plus_build
            .iter()
            .all(|line| self.matches_plus_line(line)))
    }

    /// `// +build a,b c` is `(a && b) || c`; `!x` negates.
    fn matches_plus_line(&self, line: &str) -> bool {
        line.split_whitespace().any(|option| {
            option.split(',').all(|term| match term.strip_prefix('!') {
                Some(tag) => !self.matches_tag(tag),
                None => self.matches_tag(term),
            })
        })
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::host()
    }
}

fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()))
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        "wasm32" => "wasm",
        other => other,
    }
}

/// Constraint lines found before the `package` clause.
#[derive(Debug, Default)]
struct ConstraintHeader<'a> {
    go_build: Option<&'a str>,
    plus_build: Vec<&'a str>,
}

impl<'a> ConstraintHeader<'a> {
    /// Collects `//go:build` and `// +build` lines from the leading comments.
    ///
    /// `+build` lines only count when a blank line separates them from the
    /// package clause.
    fn scan(source: &'a str) -> Self {
        let mut header = Self::default();
        let mut pending: Vec<&'a str> = Vec::new();
        let mut in_block = false;

        for raw in source.lines() {
            let line = raw.trim();

            if in_block {
                if line.contains("*/") {
                    in_block = false;
                }
                continue;
            }
            if line.is_empty() {
                header.plus_build.append(&mut pending);
                continue;
            }
            if line.starts_with("/*") {
                in_block = !line.contains("*/");
                continue;
            }
            let Some(comment) = line.strip_prefix("//") else {
                break;
            };

            if let Some(expr) = comment.strip_prefix("go:build") {
                if header.go_build.is_none() && (expr.is_empty() || expr.starts_with([' ', '\t'])) {
                    header.go_build = Some(expr.trim());
                }
            } else if let Some(rest) = comment.trim_start().strip_prefix("+build") {
                if rest.is_empty() || rest.starts_with([' ', '\t']) {
                    pending.push(rest.trim());
                }
            }
        }

        header
    }
}

/// A parsed `//go:build` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Constraint {
    Tag(String),
    Not(Box<Constraint>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    fn parse(expr: &str) -> Result<Self, String> {
        let tokens = tokenize(expr)?;
        let mut parser = ExprParser { tokens, pos: 0 };
        let constraint = parser.or()?;
        match parser.tokens.get(parser.pos) {
            None => Ok(constraint),
            Some(token) => Err(format!("unexpected {token} in //go:build {expr}")),
        }
    }

    fn eval(&self, ok: &dyn Fn(&str) -> bool) -> bool {
        match self {
            Self::Tag(tag) => ok(tag),
            Self::Not(inner) => !inner.eval(ok),
            Self::And(lhs, rhs) => lhs.eval(ok) && rhs.eval(ok),
            Self::Or(lhs, rhs) => lhs.eval(ok) || rhs.eval(ok),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Not,
    And,
    Or,
    Tag(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Not => f.write_str("'!'"),
            Self::And => f.write_str("'&&'"),
            Self::Or => f.write_str("'||'"),
            Self::Tag(tag) => write!(f, "tag '{tag}'"),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '!' => tokens.push(Token::Not),
            '&' | '|' => {
                if chars.next_if(|&(_, next)| next == c).is_none() {
                    return Err(format!("invalid operator '{c}' in //go:build {expr}"));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some((i, next)) =
                    chars.next_if(|&(_, n)| n.is_alphanumeric() || n == '_' || n == '.')
                {
                    end = i + next.len_utf8();
                }
                tokens.push(Token::Tag(expr[start..end].to_owned()));
            }
            other => return Err(format!("invalid character '{other}' in //go:build {expr}")),
        }
    }

    if tokens.is_empty() {
        return Err("empty //go:build expression".to_owned());
    }
    Ok(tokens)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn or(&mut self) -> Result<Constraint, String> {
        let mut lhs = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            lhs = Constraint::Or(Box::new(lhs), Box::new(self.and()?));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Constraint, String> {
        let mut lhs = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            lhs = Constraint::And(Box::new(lhs), Box::new(self.unary()?));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Constraint, String> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Constraint::Not(Box::new(self.unary()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Constraint, String> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        match token {
            Some(Token::Tag(tag)) => Ok(Constraint::Tag(tag)),
            Some(Token::LParen) => {
                let inner = self.or()?;
                if self.peek() != Some(&Token::RParen) {
                    return Err("missing ')' in //go:build expression".to_owned());
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(other) => Err(format!("unexpected {other} in //go:build expression")),
            None => Err("unexpected end of //go:build expression".to_owned()),
        }
    }
}
