// IR for .proto files as consumed by the generator.
// - Top-level has the file name, file-level options, package and types.
// - Messages keep their nested declarations in place; the generator decides
//   how nested types are emitted.
// - Field carries its cardinality label and tag.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProtoFile {
    pub file_name: String,
    pub package: Option<String>,
    pub options: BTreeMap<String, String>,
    pub types: Vec<TypeDecl>,
}

impl ProtoFile {
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// Java package of the protoc-generated outer class: the `java_package`
    /// option when present, otherwise the schema package.
    pub fn java_package(&self) -> Option<&str> {
        self.option("java_package").or(self.package.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Message(Message),
    Enum(Enum),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Message(m) => &m.name,
            TypeDecl::Enum(e) => &e.name,
        }
    }
}

// ---------------- Message & Fields ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
    pub nested: Vec<TypeDecl>,
}

impl Message {
    pub fn nested_enums(&self) -> impl Iterator<Item = &Enum> {
        self.nested.iter().filter_map(|t| match t {
            TypeDecl::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn nested_messages(&self) -> impl Iterator<Item = &Message> {
        self.nested.iter().filter_map(|t| match t {
            TypeDecl::Message(m) => Some(m),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: FieldType,
    pub name: String,
    pub cardinality: Cardinality,
    pub tag: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Required,
    Optional,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarType),
    Custom(String), // reference text as written in the schema
}

impl FieldType {
    /// The schema keyword or reference text, e.g. `"bool"` or `"OrderItem"`.
    pub fn keyword(&self) -> &str {
        match self {
            FieldType::Scalar(s) => s.as_str(),
            FieldType::Custom(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }
}

// ---------------- Enum ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}
