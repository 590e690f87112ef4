use std::fmt;
use std::str::FromStr;

use super::error::ParseErrorKind;

/// A type expression inside a schema line, e.g. `Vector<%Message>` or `!X`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    /// Namespace components, e.g. `["help"]` for `help.ConfigSimple`.
    pub namespace: Vec<String>,

    /// The name without namespace, `%` or `!`.
    pub name: String,

    /// Written without a constructor ID: lowercase first letter or `%`.
    pub bare: bool,

    /// A reference to a `{X:Type}` parameter (`!X`).
    pub generic_ref: bool,

    /// The argument in `Vector<...>`.
    pub generic_arg: Option<Box<Type>>,
}

impl Type {
    /// `namespace.name`, the key types are looked up by.
    pub fn full_name(&self) -> String {
        let mut s = String::new();
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// True for `Vector<T>` and `vector<T>`.
    pub fn is_vector(&self) -> bool {
        self.namespace.is_empty() && self.name.eq_ignore_ascii_case("vector") && self.generic_arg.is_some()
    }

    /// Collect all nested generic references into `output`.
    pub(crate) fn collect_generic_refs<'a>(&'a self, output: &mut Vec<&'a str>) {
        if self.generic_ref {
            output.push(&self.name);
        }
        if let Some(arg) = &self.generic_arg {
            arg.collect_generic_refs(output);
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic_ref {
            write!(f, "!")?;
        } else if self.bare && self.name.starts_with(|c: char| c.is_ascii_uppercase()) {
            write!(f, "%")?;
        }
        for ns in &self.namespace {
            write!(f, "{ns}.")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(arg) = &self.generic_arg {
            write!(f, "<{arg}>")?;
        }
        Ok(())
    }
}

impl FromStr for Type {
    type Err = ParseErrorKind;

    /// Parses a type expression such as `ns.Vector<!X>` or `%Message`.
    ///
    /// ```
    /// use mtp_tl_dump::schema::Type;
    ///
    /// let ty: Type = "vector<%Message>".parse().unwrap();
    /// assert!(ty.bare && ty.is_vector());
    /// assert!(ty.generic_arg.unwrap().bare);
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (raw, generic_ref) = match raw.strip_prefix('!') {
            Some(r) => (r, true),
            None => (raw, false),
        };
        let (raw, forced_bare) = match raw.strip_prefix('%') {
            Some(r) => (r, true),
            None => (raw, false),
        };

        let (name_part, generic_arg) = match raw.split_once('<') {
            Some((name, rest)) => match rest.strip_suffix('>') {
                Some(arg) => (name, Some(Box::new(Type::from_str(arg)?))),
                None => return Err(ParseErrorKind::UnclosedGeneric),
            },
            None => (raw, None),
        };

        let (namespace, name) = match name_part.rsplit_once('.') {
            Some((ns_part, n)) => (ns_part.split('.').map(String::from).collect::<Vec<_>>(), n),
            None => (Vec::new(), name_part),
        };

        if namespace.iter().any(|p| p.is_empty()) {
            return Err(ParseErrorKind::EmptyType);
        }

        let first = name.chars().next().ok_or(ParseErrorKind::EmptyType)?;

        Ok(Self {
            namespace,
            name: name.to_owned(),
            bare: forced_bare || first.is_ascii_lowercase(),
            generic_ref,
            generic_arg,
        })
    }
}
