//! Parser for TL schema text.
//!
//! Turns lines such as
//!
//! ```text
//! msgs_ack#62d6b459 msg_ids:Vector<long> = MsgsAck;
//! ---functions---
//! ping#7abe77ec ping_id:long = Pong;
//! ```
//!
//! into [`Definition`]s that the registry turns into field descriptors.

mod crc;
mod definition;
mod error;
mod param;
mod ty;

use std::str::FromStr;

pub use definition::{Category, Definition};
pub use error::{ParseError, ParseErrorKind};
pub use param::{Flag, Parameter, ParameterType};
pub use ty::Type;

/// Parse schema text, yielding one result per definition.
///
/// `//` comments and blank lines are skipped; a definition may span lines
/// and ends at `;`. `---functions---` and `---types---` switch the
/// [`Category`] of what follows. Errors carry the line they ended on, so a
/// caller can skip bad lines or stop at the first one.
///
/// ```rust
/// use mtp_tl_dump::schema::parse_schema;
///
/// let src = "pong#347773c5 msg_id:long ping_id:long = Pong;";
/// let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
/// assert_eq!(defs[0].params.len(), 2);
/// ```
pub fn parse_schema(src: &str) -> impl Iterator<Item = Result<Definition, ParseError>> + '_ {
    SchemaIter { lines: src.lines().enumerate(), category: Category::Types, pending: String::new() }
}

struct SchemaIter<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    category: Category,
    pending: String,
}

impl Iterator for SchemaIter<'_> {
    type Item = Result<Definition, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, line) = self.lines.next()?;
            let line = match line.split_once("//") {
                Some((code, _)) => code.trim(),
                None => line.trim(),
            };
            if line.is_empty() {
                continue;
            }

            match line {
                "---functions---" => {
                    self.category = Category::Functions;
                    continue;
                }
                "---types---" => {
                    self.category = Category::Types;
                    continue;
                }
                _ => {}
            }

            self.pending.push(' ');
            self.pending.push_str(line);
            if !line.ends_with(';') {
                continue;
            }

            let raw = std::mem::take(&mut self.pending);
            let raw = raw.trim().trim_end_matches(';').trim();
            if raw.is_empty() {
                continue;
            }

            let category = self.category;
            return Some(
                Definition::from_str(raw)
                    .map(|mut d| {
                        d.category = category;
                        d
                    })
                    .map_err(|kind| ParseError { line: index + 1, kind }),
            );
        }
    }
}
