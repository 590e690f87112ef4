use std::fmt;
use std::str::FromStr;

use super::crc::tl_id;
use super::error::ParseErrorKind;
use super::param::{Flag, Parameter, ParameterType, type_param};
use super::ty::Type;

/// Which section of the schema a definition came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Before `---functions---`: data constructors.
    Types,
    /// After `---functions---`: RPC functions.
    Functions,
}

/// One schema line: a constructor or a function.
///
/// ```text
/// pong#347773c5 msg_id:long ping_id:long = Pong;
/// ```
/// has `name = "pong"`, `id = 0x347773c5`, two params and `ty = Pong`.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Namespace parts; empty in the global namespace.
    pub namespace: Vec<String>,

    /// Constructor or method name.
    pub name: String,

    /// Explicit `#id`, or the CRC32 of the line when omitted.
    pub id: u32,

    /// Parameters in wire order.
    pub params: Vec<Parameter>,

    /// Result type.
    pub ty: Type,

    /// Section the line appeared in.
    pub category: Category,
}

impl Definition {
    /// `namespace.name`.
    pub fn full_name(&self) -> String {
        let cap = self.namespace.iter().map(|ns| ns.len() + 1).sum::<usize>() + self.name.len();
        let mut s = String::with_capacity(cap);
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// Names of the `#` parameters, in order.
    pub fn flag_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.params
            .iter()
            .filter(|p| p.ty == ParameterType::Flags)
            .map(|p| p.name.as_str())
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.full_name(), self.id)?;

        let mut generics: Vec<&str> = Vec::new();
        for p in &self.params {
            if let ParameterType::Normal { ty, .. } = &p.ty {
                ty.collect_generic_refs(&mut generics);
            }
        }
        generics.sort_unstable();
        generics.dedup();
        for g in generics {
            write!(f, " {{{g}:Type}}")?;
        }

        for p in &self.params {
            write!(f, " {p}")?;
        }
        write!(f, " = {}", self.ty)
    }
}

impl FromStr for Definition {
    type Err = ParseErrorKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (lhs, ty_str) = raw.split_once('=').ok_or(ParseErrorKind::MissingType)?;
        let lhs = lhs.trim();
        let ty_str = ty_str.trim().trim_end_matches(';').trim();
        if ty_str.is_empty() {
            return Err(ParseErrorKind::MissingType);
        }
        let mut ty = Type::from_str(ty_str)?;

        let (head, rest) = match lhs.split_once(char::is_whitespace) {
            Some((h, r)) => (h.trim_end(), r.trim_start()),
            None => (lhs, ""),
        };

        let (full_name, explicit_id) = match head.split_once('#') {
            Some((n, id)) => (n, Some(id)),
            None => (head, None),
        };

        let (namespace, name) = match full_name.rsplit_once('.') {
            Some((ns_part, n)) => (ns_part.split('.').map(String::from).collect::<Vec<_>>(), n),
            None => (Vec::new(), full_name),
        };
        if namespace.iter().any(|p| p.is_empty()) || name.is_empty() {
            return Err(ParseErrorKind::BadName);
        }

        let id = match explicit_id {
            Some(hex) => u32::from_str_radix(hex.trim(), 16).map_err(ParseErrorKind::BadId)?,
            None => tl_id(raw),
        };

        let mut type_defs: Vec<String> = Vec::new();
        let mut flag_defs: Vec<String> = Vec::new();
        let mut params = Vec::new();

        for token in rest.split_whitespace() {
            if let Some(name) = type_param(token) {
                type_defs.push(name.to_owned());
                continue;
            }
            let param = Parameter::from_str(token)?;

            match &param.ty {
                ParameterType::Flags => flag_defs.push(param.name.clone()),
                ParameterType::Normal { ty, flag } => {
                    if ty.generic_ref && !type_defs.contains(&ty.name) {
                        return Err(ParseErrorKind::UnknownGeneric(ty.name.clone()));
                    }
                    if let Some(Flag { name, .. }) = flag {
                        if !flag_defs.contains(name) {
                            return Err(ParseErrorKind::UnknownFlag(name.clone()));
                        }
                    }
                }
            }
            params.push(param);
        }

        if type_defs.contains(&ty.name) {
            ty.generic_ref = true;
        }

        Ok(Definition {
            namespace,
            name: name.to_owned(),
            id,
            params,
            ty,
            category: Category::Types,
        })
    }
}
