use std::fmt;
use std::num::ParseIntError;

/// What is wrong with a definition, a parameter or a type expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No `= Type` after the parameters.
    MissingType,
    /// Empty name, or an empty namespace component before it.
    BadName,
    /// `#id` is not hexadecimal.
    BadId(ParseIntError),
    /// A type expression with an empty component.
    EmptyType,
    /// `Vector<` without its closing `>`.
    UnclosedGeneric,
    /// A malformed `name.N?Type` parameter type.
    BadFlag(String),
    /// A token without `:type`, such as builtin `int ? = Int`.
    Untyped(String),
    /// A `{...}` token other than `{X:Type}`.
    BadTypeParam(String),
    /// `!X` with no `{X:Type}` before it.
    UnknownGeneric(String),
    /// `name.N?` where `name` is not an earlier `#` field.
    UnknownFlag(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingType => write!(f, "missing `= Type`"),
            Self::BadName => write!(f, "missing or malformed name"),
            Self::BadId(e) => write!(f, "invalid constructor ID: {e}"),
            Self::EmptyType => write!(f, "empty type name"),
            Self::UnclosedGeneric => write!(f, "unclosed `<` in type"),
            Self::BadFlag(t) => write!(f, "invalid flag expression `{t}`"),
            Self::Untyped(t) => write!(f, "unsupported parameter `{t}` without `:type`"),
            Self::BadTypeParam(t) => write!(f, "invalid type parameter `{t}`"),
            Self::UnknownGeneric(n) => write!(f, "`!{n}` has no `{{{n}:Type}}`"),
            Self::UnknownFlag(n) => write!(f, "no `{n}:#` field before its use"),
        }
    }
}

impl std::error::Error for ParseErrorKind {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadId(e) => Some(e),
            _ => None,
        }
    }
}

/// A schema definition that did not parse, with the 1-based line it ended on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Line of the closing `;`.
    pub line: usize,
    /// The failure.
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
