//! Stack-driven text dumper.
//!
//! Walks a prime buffer against the [`Registry`] without recursion: every
//! pending value, open object and open vector is a frame on an explicit
//! stack, so nesting depth is limited by memory only. The only recursion is
//! into inflated `gzip_packed` payloads, bounded by
//! [`DumpConfig::max_gzip_depth`].
//!
//! ```text
//! { pong
//!   msg_id: 4 [LONG],
//!   ping_id: 7 [LONG]
//! }
//! ```

use std::fmt::Write as _;

use mtp_tl_types::deserialize::read_bytes;
use mtp_tl_types::{ConstructorId, Cursor, Deserializable, Error as TlError, Int128, Int256, Prime, ids};

use crate::config::DumpConfig;
use crate::error::DumpError;
use crate::registry::{FieldKind, OBJECT_SHAPE, Registry, Shape, ShapeId, TypeInfo};

/// Renders TL values as indented text.
#[derive(Clone, Debug)]
pub struct TextDumper<'r> {
    registry: &'r Registry,
    config: DumpConfig,
}

enum Frame<'r> {
    /// A value of this shape has yet to be read.
    Pending { shape: Shape, level: usize },
    /// An object whose fields are being printed; `stage` 0 is the opener,
    /// `1..=n` the fields, `n + 1` the closer.
    Object { info: &'r TypeInfo, stage: usize, flags: Vec<u32>, level: usize },
    /// A vector with `done` of `count` elements printed.
    Vector { elem: ShapeId, count: u32, done: u32, level: usize },
}

impl<'r> TextDumper<'r> {
    /// A dumper with default settings.
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, DumpConfig::default())
    }

    /// A dumper with custom settings.
    pub fn with_config(registry: &'r Registry, config: DumpConfig) -> Self {
        Self { registry, config }
    }

    /// Dump one boxed object.
    pub fn dump(&self, primes: &[Prime]) -> String {
        self.render(primes, Shape::Bare(ids::DUMP_ROOT))
    }

    /// Dump a bare value of constructor `id`.
    pub fn dump_as(&self, primes: &[Prime], id: ConstructorId) -> String {
        self.render(primes, Shape::Bare(id))
    }

    /// Dump a bare `message` envelope: msg_id, seqno, bytes and body.
    pub fn dump_message(&self, primes: &[Prime]) -> String {
        self.render(primes, Shape::Bare(ids::MESSAGE))
    }

    fn render(&self, primes: &[Prime], root: Shape) -> String {
        let mut out = String::new();
        let mut cursor = Cursor::from_slice(primes);
        if let Err(e) = self.walk(&mut cursor, root, 0, 0, &mut out) {
            log::debug!("[mtp-tl-dump] dump stopped: {e}");
            let _ = write!(out, "[ERROR] ({e})");
        } else if !cursor.is_empty() {
            log::trace!("[mtp-tl-dump] {} trailing primes not dumped", cursor.remaining());
        }
        out
    }

    fn walk(
        &self,
        cursor: &mut Cursor<'_>,
        root: Shape,
        level: usize,
        gzip_depth: usize,
        out: &mut String,
    ) -> Result<(), DumpError> {
        let mut stack = vec![Frame::Pending { shape: root, level }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Pending { shape, level } => {
                    self.start(shape, level, cursor, gzip_depth, &mut stack, out)?;
                }
                Frame::Object { info, stage, flags, level } => {
                    self.step_object(info, stage, flags, level, cursor, &mut stack, out)?;
                }
                Frame::Vector { elem, count, done, level } => {
                    if done > 0 {
                        out.push(',');
                    }
                    if done < count {
                        out.push('\n');
                        self.indent(level + 1, out);
                        stack.push(Frame::Vector { elem, count, done: done + 1, level });
                        let shape = self.registry.shape(elem);
                        stack.push(Frame::Pending { shape, level: level + 1 });
                    } else if count == 0 {
                        out.push_str(" ]");
                    } else {
                        out.push('\n');
                        self.indent(level, out);
                        out.push(']');
                    }
                }
            }
        }
        Ok(())
    }

    /// Read whatever `shape` needs to decide what the value is.
    fn start(
        &self,
        shape: Shape,
        level: usize,
        cursor: &mut Cursor<'_>,
        gzip_depth: usize,
        stack: &mut Vec<Frame<'r>>,
        out: &mut String,
    ) -> Result<(), DumpError> {
        match shape {
            Shape::Boxed => {
                let id = cursor.read_prime()?;
                self.start_id(id, level, cursor, gzip_depth, stack, out)
            }
            Shape::Bare(id) => self.start_id(id, level, cursor, gzip_depth, stack, out),
            Shape::Vector { boxed, elem } => {
                if boxed {
                    let id = cursor.read_prime()?;
                    if id != ids::VECTOR {
                        return Err(TlError::UnexpectedConstructor { id, context: "Vector" }.into());
                    }
                }
                self.open_vector(elem, level, cursor, stack, out)
            }
        }
    }

    fn start_id(
        &self,
        id: ConstructorId,
        level: usize,
        cursor: &mut Cursor<'_>,
        gzip_depth: usize,
        stack: &mut Vec<Frame<'r>>,
        out: &mut String,
    ) -> Result<(), DumpError> {
        match id {
            ids::VECTOR => self.open_vector(OBJECT_SHAPE, level, cursor, stack, out),
            ids::INT | ids::LONG | ids::INT128 | ids::INT256 | ids::DOUBLE | ids::STRING => {
                self.leaf(id, cursor, out)
            }
            ids::GZIP_PACKED => self.gzipped(level, cursor, gzip_depth, out),
            _ => match self.registry.get(id) {
                Some(info) => {
                    stack.push(Frame::Object { info, stage: 0, flags: Vec::new(), level });
                    Ok(())
                }
                None => {
                    log::warn!("[mtp-tl-dump] unknown constructor {id:#010x}");
                    let _ = write!(out, "[UNKNOWN_TYPE_ID {id:#010x}]");
                    Ok(())
                }
            },
        }
    }

    fn open_vector(
        &self,
        elem: ShapeId,
        level: usize,
        cursor: &mut Cursor<'_>,
        stack: &mut Vec<Frame<'r>>,
        out: &mut String,
    ) -> Result<(), DumpError> {
        let count = cursor.read_prime()?;
        if count as usize > cursor.remaining() {
            return Err(TlError::InsufficientData.into());
        }
        let _ = write!(out, "[ vector<{}>", self.registry.shape_name(elem));
        stack.push(Frame::Vector { elem, count, done: 0, level });
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn step_object(
        &self,
        info: &'r TypeInfo,
        stage: usize,
        mut flags: Vec<u32>,
        level: usize,
        cursor: &mut Cursor<'_>,
        stack: &mut Vec<Frame<'r>>,
        out: &mut String,
    ) -> Result<(), DumpError> {
        let n = info.fields.len();

        if stage == 0 {
            if !info.transparent {
                out.push_str("{ ");
                out.push_str(&info.name);
                if n == 0 {
                    out.push_str(" }");
                    return Ok(());
                }
            }
            stack.push(Frame::Object { info, stage: 1, flags, level });
            return Ok(());
        }

        if stage > n {
            if !info.transparent {
                out.push('\n');
                self.indent(level, out);
                out.push('}');
            }
            return Ok(());
        }

        let field = &info.fields[stage - 1];
        // Transparent frames keep their child at the same level.
        let child_level = if info.transparent { level } else { level + 1 };
        if !info.transparent {
            out.push_str(if stage == 1 { "\n" } else { ",\n" });
            self.indent(level + 1, out);
            out.push_str(&field.label);
            out.push_str(": ");
        }

        let present = field
            .flag
            .as_ref()
            .is_none_or(|f| flags.get(f.field).is_some_and(|w| (w >> f.bit) & 1 == 1));
        if !present {
            if let Some(f) = &field.flag {
                let _ = write!(out, "[ SKIPPED BY BIT {} IN FIELD {} ]", f.bit, f.name);
            }
            stack.push(Frame::Object { info, stage: stage + 1, flags, level });
            return Ok(());
        }

        match field.kind {
            FieldKind::Flags(_) => {
                let word = cursor.read_prime()?;
                flags.push(word);
                let _ = write!(out, "{word:#010x} [FLAGS]");
                stack.push(Frame::Object { info, stage: stage + 1, flags, level });
            }
            FieldKind::True => {
                match &field.flag {
                    Some(f) => {
                        let _ = write!(out, "YES [ BY BIT {} IN FIELD {} ]", f.bit, f.name);
                    }
                    None => out.push_str("YES"),
                }
                stack.push(Frame::Object { info, stage: stage + 1, flags, level });
            }
            FieldKind::Value(shape) => {
                stack.push(Frame::Object { info, stage: stage + 1, flags, level });
                stack.push(Frame::Pending { shape, level: child_level });
            }
        }
        Ok(())
    }

    /// Print a primitive value.
    fn leaf(&self, id: ConstructorId, cursor: &mut Cursor<'_>, out: &mut String) -> Result<(), DumpError> {
        match id {
            ids::INT => {
                let _ = write!(out, "{} [INT]", i32::deserialize(cursor)?);
            }
            ids::LONG => {
                let _ = write!(out, "{} [LONG]", i64::deserialize(cursor)?);
            }
            ids::INT128 => {
                let v = Int128::deserialize(cursor)?;
                let _ = write!(out, "0x{:016x}{:016x} [INT128]", v.high, v.low);
            }
            ids::INT256 => {
                let v = Int256::deserialize(cursor)?;
                let _ = write!(
                    out,
                    "0x{:016x}{:016x}{:016x}{:016x} [INT256]",
                    v.high.high, v.high.low, v.low.high, v.low.low
                );
            }
            ids::DOUBLE => {
                let _ = write!(out, "{} [DOUBLE]", f64::deserialize(cursor)?);
            }
            _ => {
                let bytes = read_bytes(cursor)?;
                self.bytes(&bytes, out);
            }
        }
        Ok(())
    }

    fn bytes(&self, bytes: &[u8], out: &mut String) {
        if let Ok(s) = std::str::from_utf8(bytes) {
            let _ = write!(out, "{s:?} [STRING]");
            return;
        }
        let shown = if bytes.len() >= self.config.long_bytes_threshold {
            &bytes[..self.config.bytes_preview.min(bytes.len())]
        } else {
            bytes
        };
        for (i, b) in shown.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{b:02x}");
        }
        if shown.len() < bytes.len() {
            out.push_str("...");
        }
        let _ = write!(out, " [{} BYTES]", bytes.len());
    }

    fn gzipped(
        &self,
        level: usize,
        cursor: &mut Cursor<'_>,
        gzip_depth: usize,
        out: &mut String,
    ) -> Result<(), DumpError> {
        let packed = read_bytes(cursor)?;
        out.push_str("[GZIPPED] ");
        if gzip_depth >= self.config.max_gzip_depth {
            return Err(DumpError::NestingTooDeep(self.config.max_gzip_depth));
        }
        self.gzip_body(&packed, level, gzip_depth, out)
    }

    #[cfg(feature = "gzip")]
    fn gzip_body(
        &self,
        packed: &[u8],
        level: usize,
        gzip_depth: usize,
        out: &mut String,
    ) -> Result<(), DumpError> {
        let inner = inflate(packed, self.config.max_inflated_bytes)?;
        let mut cursor = Cursor::from_slice(&inner);
        self.walk(&mut cursor, Shape::Boxed, level, gzip_depth + 1, out)
    }

    #[cfg(not(feature = "gzip"))]
    fn gzip_body(
        &self,
        packed: &[u8],
        _level: usize,
        _gzip_depth: usize,
        out: &mut String,
    ) -> Result<(), DumpError> {
        self.bytes(packed, out);
        Ok(())
    }

    fn indent(&self, level: usize, out: &mut String) {
        for _ in 0..level.min(self.config.max_indent) {
            out.push_str("  ");
        }
    }
}

/// Inflate a gzip (or bare zlib) payload of at most `limit` bytes.
///
/// Reading stops one byte past the limit, so a small bomb cannot allocate
/// more than `limit + 1` bytes.
#[cfg(feature = "gzip")]
fn inflate(data: &[u8], limit: usize) -> Result<Vec<Prime>, DumpError> {
    use std::io::Read;

    let cap = limit as u64 + 1;
    let mut out = Vec::new();
    let gzip = flate2::read::GzDecoder::new(data).take(cap).read_to_end(&mut out);
    if gzip.is_err() || out.is_empty() {
        out.clear();
        flate2::read::ZlibDecoder::new(data)
            .take(cap)
            .read_to_end(&mut out)
            .map_err(|e| DumpError::Inflate(e.to_string()))?;
    }
    if out.len() > limit {
        return Err(DumpError::Inflate(format!("payload exceeds {limit} bytes")));
    }
    Ok(mtp_tl_types::primes_from_bytes(&out)?)
}

/// Dump one boxed object against [`Registry::global`].
///
/// Never fails: decode problems end the text with `[ERROR] (...)`.
pub fn dump_to_text(primes: &[Prime]) -> String {
    TextDumper::new(Registry::global()).dump(primes)
}
