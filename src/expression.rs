//! # Expression Classification and Parsing
//!
//! Each logical expression of a configuration source is classified by its
//! leading character and parsed into an [`Expression`]:
//!
//! | Sigil | Kind | Example |
//! |---|---|---|
//! | `+` | named directory | `+code ~/Projects` |
//! | `-` | remove a general search path | `-~/old/checkouts` |
//! | `=` | package group | `=web rack, +sinatra, -rails` |
//! | `@` | location binding (two or more tokens) | `@code rack, sinatra` |
//! | `@` | general path inside a directory (one token) | `@code/vendor` |
//! | `!` | enable/disable | `!enable web` / `!disable` |
//! | other | literal general search path | `~/src` |
//!
//! Parsing is pure: nothing here touches a registry or the filesystem. See
//! [`crate::config`] for applying parsed expressions.

use crate::error::{Error, Result};
use crate::group::MemberRef;
use crate::name::{split_members, PackageName};
use crate::path::split_directory_reference;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The kinds of expression the configuration language knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    Directory,
    RemoveGeneralPath,
    Group,
    Location,
    EnableDisable,
    GeneralPath,
}

impl ExpressionKind {
    /// Classify an expression by its leading character.
    ///
    /// `@` is a location binding when followed by members, and a general path
    /// reference when it is a single token.
    pub fn classify(text: &str) -> Self {
        let text = text.trim();
        match text.chars().next() {
            Some('+') => ExpressionKind::Directory,
            Some('-') => ExpressionKind::RemoveGeneralPath,
            Some('=') => ExpressionKind::Group,
            Some('!') => ExpressionKind::EnableDisable,
            Some('@') if split_members(&text[1..]).len() > 1 => ExpressionKind::Location,
            _ => ExpressionKind::GeneralPath,
        }
    }

    /// Name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            ExpressionKind::Directory => "directory",
            ExpressionKind::RemoveGeneralPath => "remove path",
            ExpressionKind::Group => "group",
            ExpressionKind::Location => "location",
            ExpressionKind::EnableDisable => "enable/disable",
            ExpressionKind::GeneralPath => "general path",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A path as written in an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSpec {
    /// `@name/rest/of/path`: relative to a named directory.
    Named { directory: PackageName, rest: String },
    /// Anything else: absolute, relative or `~`-relative.
    Literal(String),
}

impl PathSpec {
    /// Parse a single path token. Returns `None` for `@` with no name.
    pub fn parse(token: &str) -> Option<Self> {
        match split_directory_reference(token.trim()) {
            Some(("", _)) => None,
            Some((name, rest)) => Some(PathSpec::Named {
                directory: PackageName::new(name),
                rest: rest.to_string(),
            }),
            None => Some(PathSpec::Literal(token.trim().to_string())),
        }
    }
}

/// Whether an enable/disable expression enables or disables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    Enable,
    Disable,
}

/// One parsed configuration expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// `+name path [more/segments...]`
    Directory { name: PackageName, path: PathSpec },
    /// `-path`
    RemoveGeneralPath { path: PathSpec },
    /// `=name member, +member, -member`
    Group {
        name: PackageName,
        members: Vec<MemberRef>,
    },
    /// `@directory member, +member, -member`
    Location {
        directory: PackageName,
        members: Vec<MemberRef>,
    },
    /// `!enable [names]` / `!disable [names]`. No names means everything.
    /// A name may carry a `+` prefix but not a `-` one.
    EnableDisable {
        toggle: Toggle,
        names: Vec<PackageName>,
    },
    /// `@directory/rest` or a literal path
    GeneralPath { path: PathSpec },
}

impl Expression {
    /// Parse one logical expression. Errors carry no line number yet.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let kind = ExpressionKind::classify(text);
        let malformed = || Error::MalformedExpression {
            kind: kind.describe(),
            expression: text.to_string(),
            line: None,
        };
        // every sigil is a single ASCII byte
        let body = if kind == ExpressionKind::GeneralPath && !text.starts_with('@') {
            text
        } else {
            &text[1..]
        };

        match kind {
            ExpressionKind::Directory => {
                let mut tokens = body.split_whitespace();
                let name = tokens.next().ok_or_else(malformed)?;
                let first = tokens.next().ok_or_else(malformed)?;
                let mut path = PathSpec::parse(first).ok_or_else(malformed)?;
                let extra: Vec<&str> = tokens.collect();
                if !extra.is_empty() {
                    path = match path {
                        PathSpec::Named { directory, rest } => PathSpec::Named {
                            directory,
                            rest: join_nonempty(&rest, &extra),
                        },
                        PathSpec::Literal(literal) => {
                            PathSpec::Literal(join_nonempty(&literal, &extra))
                        }
                    };
                }
                Ok(Expression::Directory {
                    name: PackageName::new(name),
                    path,
                })
            }
            ExpressionKind::RemoveGeneralPath => {
                let path = PathSpec::parse(body)
                    .filter(|_| !body.trim().is_empty())
                    .ok_or_else(malformed)?;
                Ok(Expression::RemoveGeneralPath { path })
            }
            ExpressionKind::Group | ExpressionKind::Location => {
                let tokens = split_members(body);
                let (name, rest) = tokens.split_first().ok_or_else(malformed)?;
                let members = rest
                    .iter()
                    .map(|token| MemberRef::parse(token))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(malformed)?;
                let name = PackageName::new(name);
                if kind == ExpressionKind::Group {
                    Ok(Expression::Group { name, members })
                } else {
                    Ok(Expression::Location {
                        directory: name,
                        members,
                    })
                }
            }
            ExpressionKind::EnableDisable => {
                let tokens = split_members(body);
                let (directive, rest) = tokens.split_first().ok_or_else(malformed)?;
                let toggle = match *directive {
                    "enable" => Toggle::Enable,
                    "disable" => Toggle::Disable,
                    _ => return Err(malformed()),
                };
                if rest.iter().any(|token| token.starts_with('-')) {
                    return Err(malformed());
                }
                let names = rest
                    .iter()
                    .map(|token| PackageName::new(token.trim_start_matches('+')))
                    .filter(|name| !name.as_str().is_empty())
                    .collect();
                Ok(Expression::EnableDisable { toggle, names })
            }
            ExpressionKind::GeneralPath => {
                let path = PathSpec::parse(text).ok_or_else(malformed)?;
                Ok(Expression::GeneralPath { path })
            }
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Directory { .. } => ExpressionKind::Directory,
            Expression::RemoveGeneralPath { .. } => ExpressionKind::RemoveGeneralPath,
            Expression::Group { .. } => ExpressionKind::Group,
            Expression::Location { .. } => ExpressionKind::Location,
            Expression::EnableDisable { .. } => ExpressionKind::EnableDisable,
            Expression::GeneralPath { .. } => ExpressionKind::GeneralPath,
        }
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Expression::parse(text)
    }
}

fn join_nonempty(first: &str, extra: &[&str]) -> String {
    std::iter::once(first)
        .chain(extra.iter().copied())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
