//! # Configuration Parsing
//!
//! This module turns configuration text into changes to a [`Registry`].
//!
//! ## Line Joining
//!
//! Configuration is line oriented, but one logical expression may span
//! several physical lines:
//!
//! - blank lines and lines whose first non-blank character is `#` are ignored
//! - a line that starts with whitespace continues the current expression and
//!   is appended to it after a single space
//! - any other line completes the pending expression and starts a new one
//! - the end of input completes the pending expression
//!
//! Each logical expression remembers the 1-based line it started on, which
//! is attached to any error it raises.
//!
//! ```text
//! +code ~/Projects
//! =web rack,
//!      sinatra      # joined onto the line above
//! @code web
//! !enable web
//! ```
//!
//! ## Entry Points
//!
//! - [`parse`] is pure: it joins lines and parses every expression without
//!   touching a registry. It is used by validation and benchmarks.
//! - [`load`] parses and applies expressions one at a time, stopping at the
//!   first error. Expressions before the failing one stay applied.
//! - [`from_file`] reads a file through a [`FileSystem`] and parses it.

use crate::directory::DirectoryPath;
use crate::error::{Error, Result};
use crate::expression::{Expression, PathSpec, Toggle};
use crate::filesystem::FileSystem;
use crate::group::{MemberOp, MemberRef};
use crate::name::PackageName;
use crate::registry::Registry;
use log::debug;
use serde::Serialize;
use std::mem;
use std::path::{Path, PathBuf};

/// One logical expression and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalExpression {
    pub text: String,
    pub line: usize,
}

/// A parsed expression together with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedExpression {
    pub line: usize,
    pub text: String,
    pub expression: Expression,
}

/// Every expression of a configuration source, in order.
pub type Schema = Vec<ParsedExpression>;

/// Options controlling how expressions are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject enable/disable names and member removals that refer to no
    /// known package or group.
    pub strict: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Incremental line joiner.
///
/// Feed physical lines with [`push`](Self::push); a completed expression is
/// returned whenever a new one starts. Call [`finish`](Self::finish) at the
/// end of input.
#[derive(Debug, Default)]
pub struct LineJoiner {
    buffer: String,
    start_line: usize,
}

impl LineJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one physical line (1-based `number`). Returns the previously
    /// pending expression if this line starts a new one.
    pub fn push(&mut self, line: &str, number: usize) -> Option<LogicalExpression> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        if line.starts_with(char::is_whitespace) && !self.buffer.is_empty() {
            self.buffer.push(' ');
            self.buffer.push_str(trimmed);
            return None;
        }
        let completed = self.take();
        self.buffer.push_str(trimmed);
        self.start_line = number;
        completed
    }

    /// Complete the pending expression, if any.
    pub fn finish(&mut self) -> Option<LogicalExpression> {
        self.take()
    }

    fn take(&mut self) -> Option<LogicalExpression> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(LogicalExpression {
                text: mem::take(&mut self.buffer),
                line: self.start_line,
            })
        }
    }
}

/// Join a whole source into logical expressions.
pub fn logical_expressions(source: &str) -> Vec<LogicalExpression> {
    let mut joiner = LineJoiner::new();
    let mut expressions: Vec<LogicalExpression> = source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| joiner.push(line, index + 1))
        .collect();
    expressions.extend(joiner.finish());
    expressions
}

/// Parse a logical expression, attaching its line to any error.
pub fn parse_expression(logical: &LogicalExpression) -> Result<ParsedExpression> {
    let expression = Expression::parse(&logical.text).map_err(|e| e.at_line(logical.line))?;
    Ok(ParsedExpression {
        line: logical.line,
        text: logical.text.clone(),
        expression,
    })
}

/// Parse a configuration source without applying it.
pub fn parse(source: &str) -> Result<Schema> {
    logical_expressions(source)
        .iter()
        .map(parse_expression)
        .collect()
}

/// Read and parse a configuration file.
pub fn from_file<F: FileSystem>(fs: &F, path: &Path) -> Result<Schema> {
    let content = fs.read_to_string(path)?;
    parse(&content)
}

/// Parse and apply a configuration source to `registry`, expression by
/// expression. Returns the number of expressions applied.
pub fn load<F: FileSystem>(
    registry: &mut Registry,
    fs: &F,
    source: &str,
    options: ParseOptions,
) -> Result<usize> {
    let mut applied = 0;
    for logical in logical_expressions(source) {
        let parsed = parse_expression(&logical)?;
        apply(registry, fs, &parsed, options)?;
        applied += 1;
    }
    Ok(applied)
}

/// Apply one parsed expression to `registry`.
pub fn apply<F: FileSystem>(
    registry: &mut Registry,
    fs: &F,
    parsed: &ParsedExpression,
    options: ParseOptions,
) -> Result<()> {
    debug!("line {}: {}", parsed.line, parsed.text);
    apply_expression(registry, fs, &parsed.expression, options).map_err(|e| e.at_line(parsed.line))
}

fn apply_expression<F: FileSystem>(
    registry: &mut Registry,
    fs: &F,
    expression: &Expression,
    options: ParseOptions,
) -> Result<()> {
    match expression {
        Expression::Directory { name, path } => {
            let definition = match path {
                PathSpec::Named { directory, rest } => DirectoryPath::relative(directory, rest),
                PathSpec::Literal(literal) => DirectoryPath::absolute(fs.expand_path(literal)?),
            };
            registry.directory(name, definition)?;
        }
        Expression::RemoveGeneralPath { path } => {
            let path = resolve_path(registry, fs, path)?;
            if !registry.remove_general_path(&path) {
                debug!("{} was not a search path", path.display());
            }
        }
        Expression::Group { name, members } => {
            if options.strict {
                check_removals(registry, members)?;
            }
            registry.define_group(name, members);
        }
        Expression::Location { directory, members } => {
            if options.strict {
                check_removals(registry, members)?;
            }
            registry.bind_location(directory, members)?;
        }
        Expression::EnableDisable { toggle, names } => {
            if options.strict {
                check_known(registry, names.iter())?;
            }
            match (toggle, names.is_empty()) {
                (Toggle::Enable, true) => registry.enable_state_mut().enable_all(),
                (Toggle::Disable, true) => registry.enable_state_mut().disable_all(),
                (Toggle::Enable, false) => registry.enable_names(names),
                (Toggle::Disable, false) => registry.disable_names(names),
            }
        }
        Expression::GeneralPath { path } => {
            let path = resolve_path(registry, fs, path)?;
            registry.add_general_path(path);
        }
    }
    Ok(())
}

fn resolve_path<F: FileSystem>(registry: &Registry, fs: &F, path: &PathSpec) -> Result<PathBuf> {
    match path {
        PathSpec::Named { directory, rest } => registry.path_in_directory(directory, rest),
        PathSpec::Literal(literal) => fs.expand_path(literal),
    }
}

fn check_removals(registry: &Registry, members: &[MemberRef]) -> Result<()> {
    check_known(
        registry,
        members
            .iter()
            .filter(|member| member.op == MemberOp::Remove)
            .map(|member| &member.name),
    )
}

fn check_known<'a, I>(registry: &Registry, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a PackageName>,
{
    for name in names {
        if !registry.is_known(name) {
            return Err(Error::UnknownReference {
                name: name.to_string(),
                line: None,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFS;

    fn load_str(source: &str) -> Result<Registry> {
        let mut registry = Registry::new();
        load(&mut registry, &MemoryFS::new(), source, ParseOptions::default())?;
        Ok(registry)
    }

    #[test]
    fn test_line_joining() {
        let source = "# comment\n=grp a,\n   b\n\n+d /x\n";
        let expressions = logical_expressions(source);
        assert_eq!(
            expressions,
            vec![
                LogicalExpression {
                    text: "=grp a, b".to_string(),
                    line: 2,
                },
                LogicalExpression {
                    text: "+d /x".to_string(),
                    line: 5,
                },
            ]
        );
    }

    #[test]
    fn test_location_continuation() {
        let expressions = logical_expressions("@d pkgA\n    pkgB\n");
        assert_eq!(expressions.len(), 1);
        assert_eq!(expressions[0].text, "@d pkgA pkgB");
    }

    #[test]
    fn test_comment_inside_continuation_is_skipped() {
        let source = "=grp a,\n  # not a member\n  b";
        let expressions = logical_expressions(source);
        assert_eq!(expressions.len(), 1);
        assert_eq!(expressions[0].text, "=grp a, b");
    }

    #[test]
    fn test_leading_continuation_starts_expression() {
        let expressions = logical_expressions("   ~/src\n");
        assert_eq!(expressions[0].text, "~/src");
        assert_eq!(expressions[0].line, 1);
    }

    #[test]
    fn test_parse_reports_line_of_expression_start() {
        let err = parse("+code /code\n\n+dirname\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.to_string(),
            "Malformed directory expression \"+dirname\" on line 3"
        );
    }

    #[test]
    fn test_load_directories_and_general_paths() {
        let registry = load_str("+code ~/Projects\n+rp @code/rp\n@rp/vendor\n./local\n").unwrap();
        assert_eq!(
            registry.directory_path("rp"),
            Some(PathBuf::from("/home/dev/Projects/rp"))
        );
        assert_eq!(
            registry.general_paths(),
            &[
                PathBuf::from("/home/dev/Projects/rp/vendor"),
                PathBuf::from("/work/local")
            ]
        );
    }

    #[test]
    fn test_load_remove_general_path() {
        let registry = load_str("/a\n/b\n-/a\n-/never-added\n").unwrap();
        assert_eq!(registry.general_paths(), &[PathBuf::from("/b")]);
    }

    #[test]
    fn test_load_group_and_location() {
        let registry = load_str("+d /path/x\n=grp pkgC\n@d pkgA, grp\n").unwrap();
        assert_eq!(registry.location_of("pkgA"), Some(&PackageName::new("d")));
        assert_eq!(registry.location_of("pkgC"), Some(&PackageName::new("d")));
    }

    #[test]
    fn test_load_unknown_directory_has_line() {
        let err = load_str("+code /code\n@projects a, b\n").unwrap_err();
        match err {
            Error::UnknownDirectory { name, line, .. } => {
                assert_eq!(name, "projects");
                assert_eq!(line, Some(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_stops_at_first_error() {
        let mut registry = Registry::new();
        let result = load(
            &mut registry,
            &MemoryFS::new(),
            "/first\n@nowhere/x\n/third\n",
            ParseOptions::default(),
        );
        assert!(result.is_err());
        assert_eq!(registry.general_paths(), &[PathBuf::from("/first")]);
    }

    #[test]
    fn test_load_enable_all_and_names() {
        let registry = load_str("!enable\n!disable pkg\n").unwrap();
        let state = registry.enable_state();
        assert!(state.enabled_for_all());
        assert!(state.disabled_names().contains(&"pkg".into()));

        let registry = load_str("=grp pkgA, pkgB\n!enable grp\n").unwrap();
        assert!(registry.enable_state().should_attempt(&"pkgB".into()));
        assert!(!registry.enabled_for_all());
    }

    #[test]
    fn test_strict_rejects_unknown_names() {
        let mut registry = Registry::new();
        let err = load(
            &mut registry,
            &MemoryFS::new(),
            "=grp a\n!enable grpp\n",
            ParseOptions::strict(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownReference { ref name, line: Some(2) } if name == "grpp"
        ));

        let err = load(
            &mut Registry::new(),
            &MemoryFS::new(),
            "=grp a, -zzz\n",
            ParseOptions::strict(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownReference { .. }));
    }

    #[test]
    fn test_lenient_accepts_unknown_names() {
        let registry = load_str("!enable nothing-declared\n").unwrap();
        assert!(registry
            .enable_state()
            .enabled_names()
            .contains(&"nothing-declared".into()));
    }

    #[test]
    fn test_from_file() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("/home/dev/.devroute", "+code /code\n=grp a\n")
            .unwrap();
        let schema = from_file(&fs, Path::new("/home/dev/.devroute")).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[1].line, 2);
        assert!(from_file(&fs, Path::new("/missing")).is_err());
    }
}
