use std::fmt;
use std::str::FromStr;

use super::error::ParseErrorKind;
use super::ty::Type;

/// A flag reference inside a parameter type, e.g. `flags.0` in `flags.0?true`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    /// The `#` field holding the bit (usually `"flags"`).
    pub name: String,
    /// Bit index, 0-based.
    pub index: u32,
}

/// What a parameter holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// A flags word (`name:#`).
    Flags,

    /// A typed value, present only when `flag` is set if there is one.
    Normal {
        /// The value's type.
        ty: Type,
        /// Presence condition.
        flag: Option<Flag>,
    },
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags => write!(f, "#"),
            Self::Normal { ty, flag } => {
                if let Some(fl) = flag {
                    write!(f, "{}.{}?", fl.name, fl.index)?;
                }
                write!(f, "{ty}")
            }
        }
    }
}

impl FromStr for ParameterType {
    type Err = ParseErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "#" {
            return Ok(Self::Flags);
        }

        let Some((flag_part, ty_part)) = s.split_once('?') else {
            return Ok(Self::Normal { ty: s.parse()?, flag: None });
        };

        let bad_flag = || ParseErrorKind::BadFlag(s.to_owned());
        let (name, index) = flag_part.split_once('.').ok_or_else(bad_flag)?;
        if name.is_empty() || index.is_empty() {
            return Err(bad_flag());
        }
        let index = index.parse::<u32>().map_err(|_| bad_flag())?;
        if index >= 32 || ty_part.contains('?') {
            return Err(bad_flag());
        }

        Ok(Self::Normal {
            ty: ty_part.parse()?,
            flag: Some(Flag { name: name.to_owned(), index }),
        })
    }
}

/// One `name:Type` parameter of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Field label.
    pub name: String,
    /// Field type.
    pub ty: ParameterType,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

impl FromStr for Parameter {
    type Err = ParseErrorKind;

    /// Parses a token such as `flags:#`, `id:long` or `photo:flags.0?Photo`.
    ///
    /// `{X:Type}` declares a generic and is not a parameter.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.starts_with('{') {
            return Err(ParseErrorKind::BadTypeParam(token.to_owned()));
        }

        let (name, ty) = token
            .split_once(':')
            .ok_or_else(|| ParseErrorKind::Untyped(token.to_owned()))?;
        if name.is_empty() {
            return Err(ParseErrorKind::BadName);
        }
        if ty.is_empty() {
            return Err(ParseErrorKind::EmptyType);
        }

        Ok(Self { name: name.to_owned(), ty: ty.parse()? })
    }
}

/// The `X` of a `{X:Type}` token, or `None` for any other token.
pub(crate) fn type_param(token: &str) -> Option<&str> {
    token
        .strip_prefix('{')?
        .strip_suffix(":Type}")
        .filter(|name| !name.is_empty())
}
