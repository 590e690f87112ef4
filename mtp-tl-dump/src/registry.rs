//! Constructor-ID → field-descriptor registry.
//!
//! The dumper never knows concrete Rust types; everything it needs about a
//! constructor is a name and a list of [`Field`]s, built here from schema
//! text.

use std::collections::HashMap;
use std::sync::OnceLock;

use mtp_tl_types::{ConstructorId, ids};

use crate::schema::{Category, Definition, ParameterType, ParseError, Type, parse_schema};

/// The MTProto service schema compiled into the crate.
pub const SERVICE_SCHEMA: &str = include_str!("../tl/mtproto.tl");

/// Index into the registry's shape table.
pub type ShapeId = usize;

/// Shape of the generic boxed `Object`.
pub const OBJECT_SHAPE: ShapeId = 0;

/// Shape of a bare `%Message` envelope.
pub const MESSAGE_SHAPE: ShapeId = 1;

/// How a value is laid out where a field expects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// A constructor ID followed by that constructor's fields.
    Boxed,
    /// The fields of a known constructor, without its ID.
    Bare(ConstructorId),
    /// A count and elements, preceded by the vector ID when `boxed`.
    Vector {
        /// `Vector<T>` rather than `vector<T>`.
        boxed: bool,
        /// Element shape.
        elem: ShapeId,
    },
}

/// What kind of value a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A `#` flags word; the `usize` is its index among the type's flag words.
    Flags(usize),
    /// A `true` field: no data, presence is the value.
    True,
    /// A value of the given shape.
    Value(Shape),
}

/// The bit that gates an optional field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagBit {
    /// Index of the flags word among the type's flag words.
    pub field: usize,
    /// Bit number.
    pub bit: u32,
    /// Label of the flags word, for output.
    pub name: String,
}

/// One field descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub label: String,
    /// Value kind.
    pub kind: FieldKind,
    /// Present only when this bit is set.
    pub flag: Option<FlagBit>,
}

/// Everything the dumper knows about one constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    /// Full constructor name, e.g. `help.configSimple`.
    pub name: String,
    /// Fields in wire order.
    pub fields: Vec<Field>,
    /// Printed without braces or labels.
    pub transparent: bool,
    /// Defined after `---functions---`.
    pub is_function: bool,
}

#[derive(Clone, Debug)]
struct ShapeEntry {
    shape: Shape,
    name: String,
}

/// Constructor registry.
///
/// Besides every parsed definition it always holds three pseudo-entries:
/// the `message` envelope ([`ids::MESSAGE`]), `msg_container`, and the
/// transparent dump root ([`ids::DUMP_ROOT`]) that wraps one boxed object.
#[derive(Clone, Debug)]
pub struct Registry {
    types: HashMap<ConstructorId, TypeInfo>,
    shapes: Vec<ShapeEntry>,
}

impl Registry {
    /// The process-wide registry over [`SERVICE_SCHEMA`], built on first use.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(|| Registry::builder().build())
    }

    /// Start a registry with the service schema.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder { schemas: vec![SERVICE_SCHEMA.to_owned()] }
    }

    /// Field descriptors of constructor `id`.
    pub fn get(&self, id: ConstructorId) -> Option<&TypeInfo> { self.types.get(&id) }

    /// True if `id` is known.
    pub fn contains(&self, id: ConstructorId) -> bool { self.types.contains_key(&id) }

    /// Number of known constructors, pseudo-entries included.
    pub fn len(&self) -> usize { self.types.len() }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    /// Constructor ID by full name.
    pub fn id_of(&self, name: &str) -> Option<ConstructorId> {
        self.types.iter().find(|(_, info)| info.name == name).map(|(&id, _)| id)
    }

    /// Shape stored at `id`.
    pub fn shape(&self, id: ShapeId) -> Shape {
        self.shapes.get(id).map_or(Shape::Boxed, |e| e.shape)
    }

    /// Display name of the shape at `id`, as written in the schema.
    pub fn shape_name(&self, id: ShapeId) -> &str {
        self.shapes.get(id).map_or("Object", |e| e.name.as_str())
    }
}

/// Collects schema texts for a [`Registry`].
#[derive(Clone, Debug)]
pub struct RegistryBuilder {
    schemas: Vec<String>,
}

impl RegistryBuilder {
    /// Add another schema text. Later definitions replace earlier ones with
    /// the same ID.
    pub fn schema(mut self, text: impl Into<String>) -> Self {
        self.schemas.push(text.into());
        self
    }

    /// Drop the service schema, keeping only texts added afterwards.
    pub fn without_service_schema(mut self) -> Self {
        self.schemas.retain(|s| s != SERVICE_SCHEMA);
        self
    }

    /// Build, skipping definitions that fail to parse.
    pub fn build(self) -> Registry {
        let mut definitions = Vec::new();
        for text in &self.schemas {
            for result in parse_schema(text) {
                match result {
                    Ok(def) => definitions.push(def),
                    Err(e) => log::warn!("[mtp-tl-dump] skipping schema definition: {e}"),
                }
            }
        }
        Resolver::new(&definitions).finish()
    }

    /// Build, failing on the first definition that does not parse.
    pub fn try_build(self) -> Result<Registry, ParseError> {
        let mut definitions = Vec::new();
        for text in &self.schemas {
            for result in parse_schema(text) {
                definitions.push(result?);
            }
        }
        Ok(Resolver::new(&definitions).finish())
    }
}

/// Name lookups used while turning parsed types into shapes.
struct Resolver<'d> {
    definitions: &'d [Definition],
    by_name: HashMap<String, ConstructorId>,
    by_type: HashMap<String, Vec<ConstructorId>>,
    shapes: Vec<ShapeEntry>,
}

impl<'d> Resolver<'d> {
    fn new(definitions: &'d [Definition]) -> Self {
        let mut by_name = HashMap::new();
        let mut by_type: HashMap<String, Vec<ConstructorId>> = HashMap::new();
        for def in definitions.iter().filter(|d| d.category == Category::Types) {
            by_name.insert(def.full_name(), def.id);
            let ctors = by_type.entry(def.ty.full_name()).or_default();
            if !ctors.contains(&def.id) {
                ctors.push(def.id);
            }
        }
        // Pseudo types, addressable as `message`, `%Message` and `msg_container`.
        by_name.insert("message".into(), ids::MESSAGE);
        by_type.insert("Message".into(), vec![ids::MESSAGE]);
        by_name.insert("msg_container".into(), ids::MSG_CONTAINER);
        by_type.insert("MessageContainer".into(), vec![ids::MSG_CONTAINER]);

        let shapes = vec![
            ShapeEntry { shape: Shape::Boxed, name: "Object".into() },
            ShapeEntry { shape: Shape::Bare(ids::MESSAGE), name: "%Message".into() },
        ];
        Self { definitions, by_name, by_type, shapes }
    }

    fn finish(mut self) -> Registry {
        let mut types = HashMap::new();
        for def in self.definitions {
            let info = self.type_info(def);
            if types.insert(def.id, info).is_some() {
                log::debug!("[mtp-tl-dump] {:#010x} redefined by {}", def.id, def.full_name());
            }
        }

        let value = |shape| FieldKind::Value(shape);
        let field = |label: &str, kind| Field { label: label.into(), kind, flag: None };
        types.insert(ids::MESSAGE, TypeInfo {
            name: "message".into(),
            fields: vec![
                field("msg_id", value(Shape::Bare(ids::LONG))),
                field("seqno", value(Shape::Bare(ids::INT))),
                field("bytes", value(Shape::Bare(ids::INT))),
                field("body", value(Shape::Boxed)),
            ],
            transparent: false,
            is_function: false,
        });
        types.insert(ids::MSG_CONTAINER, TypeInfo {
            name: "msg_container".into(),
            fields: vec![field(
                "messages",
                value(Shape::Vector { boxed: false, elem: MESSAGE_SHAPE }),
            )],
            transparent: false,
            is_function: false,
        });
        types.insert(ids::DUMP_ROOT, TypeInfo {
            name: String::new(),
            fields: vec![field("", value(Shape::Boxed))],
            transparent: true,
            is_function: false,
        });

        log::debug!(
            "[mtp-tl-dump] registry built: {} constructors, {} shapes",
            types.len(),
            self.shapes.len()
        );
        Registry { types, shapes: self.shapes }
    }

    fn type_info(&mut self, def: &Definition) -> TypeInfo {
        let flag_words: Vec<&str> = def.flag_fields().collect();
        let fields = def
            .params
            .iter()
            .map(|p| {
                let flag = match &p.ty {
                    ParameterType::Normal { flag: Some(f), .. } => {
                        flag_words.iter().position(|&w| w == f.name).map(|field| FlagBit {
                            field,
                            bit: f.index,
                            name: f.name.clone(),
                        })
                    }
                    _ => None,
                };
                let kind = match &p.ty {
                    ParameterType::Flags => FieldKind::Flags(
                        flag_words.iter().position(|&w| w == p.name).unwrap_or_default(),
                    ),
                    ParameterType::Normal { ty, .. } if is_true(ty) => FieldKind::True,
                    ParameterType::Normal { ty, .. } => FieldKind::Value(self.shape_of(ty)),
                };
                Field { label: p.name.clone(), kind, flag }
            })
            .collect();
        TypeInfo {
            name: def.full_name(),
            fields,
            transparent: false,
            is_function: def.category == Category::Functions,
        }
    }

    fn shape_of(&mut self, ty: &Type) -> Shape {
        if ty.generic_ref {
            return Shape::Boxed;
        }
        if let (true, Some(arg)) = (ty.is_vector(), &ty.generic_arg) {
            let elem = self.intern(arg);
            return Shape::Vector { boxed: !ty.bare, elem };
        }
        if !ty.bare {
            return Shape::Boxed;
        }
        if let Some(id) = builtin_bare(&ty.full_name()) {
            return Shape::Bare(id);
        }
        let name = ty.full_name();
        if let Some(&id) = self.by_name.get(&name) {
            return Shape::Bare(id);
        }
        match self.by_type.get(&name).map(Vec::as_slice) {
            Some(&[id]) => Shape::Bare(id),
            _ => {
                log::warn!("[mtp-tl-dump] cannot resolve bare type `{ty}`, reading it boxed");
                Shape::Boxed
            }
        }
    }

    fn intern(&mut self, ty: &Type) -> ShapeId {
        let name = ty.to_string();
        if let Some(pos) = self.shapes.iter().position(|e| e.name == name) {
            return pos;
        }
        let shape = self.shape_of(ty);
        self.shapes.push(ShapeEntry { shape, name });
        self.shapes.len() - 1
    }
}

fn is_true(ty: &Type) -> bool {
    ty.namespace.is_empty() && ty.name == "true" && ty.generic_arg.is_none()
}

fn builtin_bare(name: &str) -> Option<ConstructorId> {
    Some(match name {
        "int" => ids::INT,
        "long" => ids::LONG,
        "int128" => ids::INT128,
        "int256" => ids::INT256,
        "double" => ids::DOUBLE,
        "string" | "bytes" => ids::STRING,
        _ => return None,
    })
}
