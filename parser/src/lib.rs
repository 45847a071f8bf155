mod model;

use pest::Parser as _;
use pest::iterators::Pair;
use pest_derive::Parser;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub use model::*;

#[derive(Parser)]
#[grammar = "resources/proto.pest"] // Path relative to the crate root
pub struct ProtoParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("syntax error: {0}")]
    Syntax(Box<pest::error::Error<Rule>>),
    #[error("{0}")]
    Message(&'static str),
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        ParseError::Syntax(Box::new(e))
    }
}

/// Parse a .proto file into the ProtoFile IR.
pub fn parse_proto_file<P: AsRef<Path>>(path: P) -> Result<ProtoFile, ParseError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_proto_source(&file_name, &content)
}

/// Parse already-loaded .proto source. `file_name` is recorded in the IR;
/// the generator derives the outer class name from it when the file carries
/// no explicit option.
pub fn parse_proto_source(file_name: &str, source: &str) -> Result<ProtoFile, ParseError> {
    let mut pairs = ProtoParser::parse(Rule::proto, source)?;
    let proto = pairs
        .next()
        .ok_or(ParseError::Message("expected proto root"))?;
    Ok(build_file(file_name, proto))
}

fn build_file(file_name: &str, proto: Pair<Rule>) -> ProtoFile {
    let mut file = ProtoFile {
        file_name: file_name.to_string(),
        ..ProtoFile::default()
    };

    for pair in proto.into_inner() {
        if pair.as_rule() != Rule::proto_body {
            continue;
        }
        for statement in pair.into_inner() {
            match statement.as_rule() {
                Rule::package_statement => {
                    file.package = statement
                        .into_inner()
                        .find(|p| p.as_rule() == Rule::package_name)
                        .map(|p| p.as_str().to_string());
                }
                Rule::option_statement => {
                    if let Some((name, value)) = build_option(statement) {
                        file.options.insert(name, value);
                    }
                }
                Rule::top_level_definition => {
                    for def in statement.into_inner() {
                        match def.as_rule() {
                            Rule::message_block => {
                                file.types.push(TypeDecl::Message(build_message(def)))
                            }
                            Rule::enum_block => file.types.push(TypeDecl::Enum(build_enum(def))),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }

    file
}

fn build_option(statement: Pair<Rule>) -> Option<(String, String)> {
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    for p in statement.into_inner() {
        match p.as_rule() {
            Rule::option_name => name = Some(p.as_str().to_string()),
            Rule::constant => value = Some(constant_text(p)),
            _ => {}
        }
    }
    name.zip(value)
}

// String constants are stored unquoted; everything else keeps its source text.
fn constant_text(constant: Pair<Rule>) -> String {
    match constant.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::string_literal => unquote(inner.as_str()).to_string(),
        Some(inner) => inner.as_str().to_string(),
        None => String::new(),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

fn build_message(block: Pair<Rule>) -> Message {
    let mut message = Message::default();

    for p in block.into_inner() {
        match p.as_rule() {
            Rule::message_name => message.name = p.as_str().to_string(),
            Rule::message_body => {
                for element in p.into_inner() {
                    // message_element wraps exactly one declaration
                    for inner in element.into_inner() {
                        match inner.as_rule() {
                            Rule::field => {
                                if let Some(field) = build_field(inner) {
                                    message.fields.push(field);
                                }
                            }
                            Rule::oneof => {
                                // Flatten oneof members into the message; a
                                // member is set or absent, so it is optional.
                                for member in oneof_fields(inner) {
                                    message.fields.push(member);
                                }
                            }
                            Rule::enum_block => {
                                message.nested.push(TypeDecl::Enum(build_enum(inner)))
                            }
                            Rule::message_block => {
                                message.nested.push(TypeDecl::Message(build_message(inner)))
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }
    }

    message
}

fn oneof_fields(oneof: Pair<Rule>) -> Vec<Field> {
    let mut fields = Vec::new();
    for element in oneof.into_inner() {
        if element.as_rule() != Rule::oneof_element {
            continue;
        }
        for member in element.into_inner() {
            if member.as_rule() == Rule::oneof_field {
                for f in member.into_inner() {
                    if f.as_rule() == Rule::field
                        && let Some(mut field) = build_field(f)
                    {
                        field.cardinality = Cardinality::Optional;
                        fields.push(field);
                    }
                }
            }
        }
    }
    fields
}

fn build_enum(block: Pair<Rule>) -> Enum {
    let mut decl = Enum::default();

    for p in block.into_inner() {
        match p.as_rule() {
            Rule::enum_name => decl.name = p.as_str().to_string(),
            Rule::enum_body => {
                for inner in p.into_inner() {
                    if inner.as_rule() != Rule::enum_field {
                        continue;
                    }
                    let mut name: Option<String> = None;
                    let mut number: Option<i32> = None;
                    for ef in inner.into_inner() {
                        match ef.as_rule() {
                            Rule::enum_field_name => name = Some(ef.as_str().to_string()),
                            Rule::enum_field_value => {
                                number = Some(parse_integer(ef.as_str()) as i32)
                            }
                            _ => {}
                        }
                    }
                    if let (Some(name), Some(number)) = (name, number) {
                        decl.values.push(EnumValue { name, number });
                    }
                }
            }
            _ => {}
        }
    }

    decl
}

fn build_field(pair: Pair<Rule>) -> Option<Field> {
    let mut cardinality = Cardinality::default();
    let mut ty: Option<FieldType> = None;
    let mut name: Option<String> = None;
    let mut tag: Option<u32> = None;

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::field_modifier => {
                cardinality = match p.as_str() {
                    "optional" => Cardinality::Optional,
                    "repeated" => Cardinality::Repeated,
                    _ => Cardinality::Required,
                }
            }
            Rule::type_reference => ty = Some(build_type_reference(p)),
            Rule::field_name => name = Some(p.as_str().to_string()),
            Rule::tag => tag = u32::try_from(parse_integer(p.as_str())).ok(),
            _ => {}
        }
    }

    match (ty, name, tag) {
        (Some(ty), Some(name), Some(tag)) => Some(Field {
            ty,
            name,
            cardinality,
            tag,
        }),
        _ => None,
    }
}

fn build_type_reference(pair: Pair<Rule>) -> FieldType {
    match pair.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::scalar_type => {
            FieldType::Scalar(scalar_from_keyword(inner.as_str()))
        }
        // The optional leading dot sits outside full_ident, so the
        // reference text is already dot-free at the front.
        Some(inner) => FieldType::Custom(inner.as_str().to_string()),
        None => FieldType::Custom(String::new()),
    }
}

fn scalar_from_keyword(s: &str) -> ScalarType {
    match s {
        "double" => ScalarType::Double,
        "float" => ScalarType::Float,
        "int32" => ScalarType::Int32,
        "int64" => ScalarType::Int64,
        "uint32" => ScalarType::Uint32,
        "uint64" => ScalarType::Uint64,
        "sint32" => ScalarType::Sint32,
        "sint64" => ScalarType::Sint64,
        "fixed32" => ScalarType::Fixed32,
        "fixed64" => ScalarType::Fixed64,
        "sfixed32" => ScalarType::Sfixed32,
        "sfixed64" => ScalarType::Sfixed64,
        "bool" => ScalarType::Bool,
        "string" => ScalarType::String,
        "bytes" => ScalarType::Bytes,
        _ => ScalarType::String, // unreachable per grammar
    }
}

// dec|hex|oct with optional minus, as protoc accepts for tags and enum values
fn parse_integer(text: &str) -> i64 {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, text),
    };
    let value: i64 = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(0)
    } else if rest.len() > 1 && rest.starts_with('0') {
        i64::from_str_radix(&rest[1..], 8).unwrap_or(0)
    } else {
        rest.parse().unwrap_or(0)
    };
    if negative { -value } else { value }
}
