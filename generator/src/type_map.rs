//! Schema type to Java type mapping.

use proto_parser::{Cardinality, FieldType, ScalarType};

use crate::naming::NamePolicy;

/// Outcome of mapping one field type.
///
/// `name` is the element type before any `List<>` wrapping;
/// `needs_container_default` is set exactly when the rendered field must be
/// initialized with an empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub name: String,
    pub needs_container_default: bool,
}

/// Map a schema field type and cardinality to a Java type name.
///
/// Primitives use the boxed form unless the field is required; `string` and
/// `bytes` have a single form. Custom references go through the policy;
/// nested-enum resolution happens in the renderer before this is consulted.
pub fn map_type(ty: &FieldType, cardinality: Cardinality, policy: &dyn NamePolicy) -> MappedType {
    let boxed = cardinality != Cardinality::Required;
    let name = match ty {
        FieldType::Scalar(scalar) => scalar_java_name(*scalar, boxed).to_string(),
        FieldType::Custom(reference) => policy.referenced_type_name_for(reference),
    };
    MappedType {
        name,
        needs_container_default: cardinality == Cardinality::Repeated,
    }
}

fn scalar_java_name(scalar: ScalarType, boxed: bool) -> &'static str {
    match scalar {
        ScalarType::Int32
        | ScalarType::Uint32
        | ScalarType::Sint32
        | ScalarType::Fixed32
        | ScalarType::Sfixed32 => {
            if boxed { "Integer" } else { "int" }
        }
        ScalarType::Int64
        | ScalarType::Uint64
        | ScalarType::Sint64
        | ScalarType::Fixed64
        | ScalarType::Sfixed64 => {
            if boxed { "Long" } else { "long" }
        }
        ScalarType::Float => {
            if boxed { "Float" } else { "float" }
        }
        ScalarType::Double => {
            if boxed { "Double" } else { "double" }
        }
        ScalarType::Bool => {
            if boxed { "Boolean" } else { "boolean" }
        }
        ScalarType::String => "String",
        ScalarType::Bytes => "byte[]",
    }
}
