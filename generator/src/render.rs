//! Rendering of message and enum declarations into Java source text.
//!
//! One declaration in, one completed text out. The render pass per
//! declaration is strictly sequential: package header, imports, then the
//! annotated body. Messages additionally run a nested-enum pre-pass so that
//! fields referencing a sibling enum resolve to its generated name.

use std::collections::{BTreeSet, HashMap};

use proto_parser::{Cardinality, Enum, Field, FieldType, Message};

use crate::GeneratedUnit;
use crate::naming::NamePolicy;
use crate::type_map::{MappedType, map_type};

const FIELD_ANNOTATION: &str = "com.shaubert.protomapper.annotations.Field";
const MAPPER_ANNOTATION: &str = "com.shaubert.protomapper.annotations.Mapper";
const LOMBOK_DATA: &str = "lombok.Data";
const SERIALIZABLE: &str = "java.io.Serializable";
const JAVA_LIST: &str = "java.util.List";
const JAVA_ARRAY_LIST: &str = "java.util.ArrayList";

pub(crate) struct DeclarationRenderer<'a> {
    /// Java package the generated classes are declared in.
    pub package: &'a str,
    /// Java package of the protoc-generated outer class.
    pub proto_package: &'a str,
    /// Outer class name of the enclosing schema file.
    pub outer_class: &'a str,
    pub policy: &'a dyn NamePolicy,
    /// Caller-supplied imports, merged into every message's import block.
    pub extra_imports: &'a [String],
}

impl DeclarationRenderer<'_> {
    /// Render `message` and everything nested inside it.
    ///
    /// Nested enums land in `out` before the message itself so their
    /// generated names are decided by the time the fields are rendered;
    /// nested messages follow as sibling units.
    pub fn render_message(&self, message: &Message, parents: &[String], out: &mut Vec<GeneratedUnit>) {
        let mut path = parents.to_vec();
        path.push(message.name.clone());

        // Registry scope is this message's render pass only.
        let mut enum_names: HashMap<String, String> = HashMap::new();
        for nested_enum in message.nested_enums() {
            let unit = self.render_enum(nested_enum, &path);
            enum_names.insert(nested_enum.name.clone(), unit.name.clone());
            out.push(unit);
        }

        let class_name = self.policy.class_name_for(&message.name);

        let mut text = String::new();
        self.push_package(&mut text);
        self.push_message_imports(&mut text, message);

        text.push_str("@Data\n");
        text.push_str(&format!(
            "@Mapper(protoClass = {}.class)\n",
            self.proto_path(parents, &message.name)
        ));
        text.push_str(&format!(
            "public class {class_name} implements Serializable {{\n"
        ));
        for field in &message.fields {
            self.push_field(&mut text, field, &enum_names);
        }
        text.push_str("}\n");

        out.push(GeneratedUnit {
            name: class_name,
            text,
        });

        for nested_message in message.nested_messages() {
            self.render_message(nested_message, &path, out);
        }
    }

    /// Render one enum declaration. `parents` is the chain of enclosing
    /// message schema names, empty for a top-level enum.
    pub fn render_enum(&self, decl: &Enum, parents: &[String]) -> GeneratedUnit {
        let enum_name = self
            .policy
            .class_name_for(&format!("{}{}", parents.concat(), decl.name));

        let mut text = String::new();
        self.push_package(&mut text);
        self.push_enum_imports(&mut text);

        text.push_str(&format!(
            "@Mapper(protoClass = {}.{}.class, isEnum = true)\n",
            self.proto_package,
            self.proto_path(parents, &decl.name)
        ));
        text.push_str(&format!("public enum {enum_name} {{\n"));
        for (index, value) in decl.values.iter().enumerate() {
            let terminator = if index + 1 == decl.values.len() { ';' } else { ',' };
            text.push_str(&format!("    {}({}){}\n", value.name, value.number, terminator));
        }
        text.push('\n');
        text.push_str("    @Field public final int code;\n\n");
        text.push_str(&format!("    private {enum_name}(int code) {{\n"));
        text.push_str("        this.code = code;\n");
        text.push_str("    }\n");
        text.push_str("}\n");

        GeneratedUnit {
            name: enum_name,
            text,
        }
    }

    // "Outer.Parent.Name" - the schema type's path inside the outer class
    fn proto_path(&self, parents: &[String], name: &str) -> String {
        let mut path = self.outer_class.to_string();
        for parent in parents {
            path.push('.');
            path.push_str(parent);
        }
        path.push('.');
        path.push_str(name);
        path
    }

    fn push_package(&self, text: &mut String) {
        text.push_str(&format!("package {};\n\n", self.package));
    }

    fn outer_class_import(&self) -> String {
        format!("{}.{}", self.proto_package, self.outer_class)
    }

    fn push_message_imports(&self, text: &mut String, message: &Message) {
        let mut imports: BTreeSet<String> = BTreeSet::new();
        imports.insert(FIELD_ANNOTATION.to_string());
        imports.insert(MAPPER_ANNOTATION.to_string());
        imports.insert(LOMBOK_DATA.to_string());
        imports.insert(self.outer_class_import());
        imports.extend(self.extra_imports.iter().cloned());
        push_import_block(text, &imports);

        imports.clear();
        imports.insert(SERIALIZABLE.to_string());
        if message
            .fields
            .iter()
            .any(|f| f.cardinality == Cardinality::Repeated)
        {
            imports.insert(JAVA_LIST.to_string());
            imports.insert(JAVA_ARRAY_LIST.to_string());
        }
        push_import_block(text, &imports);
    }

    fn push_enum_imports(&self, text: &mut String) {
        let mut imports: BTreeSet<String> = BTreeSet::new();
        imports.insert(FIELD_ANNOTATION.to_string());
        imports.insert(MAPPER_ANNOTATION.to_string());
        imports.insert(self.outer_class_import());
        push_import_block(text, &imports);
    }

    fn push_field(&self, text: &mut String, field: &Field, enum_names: &HashMap<String, String>) {
        // Nested-enum registry wins over the type mapper.
        let mapped = match &field.ty {
            FieldType::Custom(reference) if enum_names.contains_key(reference) => MappedType {
                name: enum_names[reference].clone(),
                needs_container_default: field.cardinality == Cardinality::Repeated,
            },
            other => map_type(other, field.cardinality, self.policy),
        };

        let field_name = self.policy.field_name_for(&field.name, field.ty.keyword());

        let mut annotation_args: Vec<String> = Vec::new();
        if field_name != field.name {
            annotation_args.push(format!("name = \"{}\"", field.name));
        }
        if field.cardinality == Cardinality::Optional {
            annotation_args.push("optional = true".to_string());
        }

        text.push_str("    @Field");
        if !annotation_args.is_empty() {
            text.push_str(&format!("({})", annotation_args.join(", ")));
        }
        text.push_str(" private ");
        if mapped.needs_container_default {
            text.push_str(&format!(
                "List<{0}> {1} = new ArrayList<{0}>()",
                mapped.name, field_name
            ));
        } else {
            text.push_str(&format!("{} {}", mapped.name, field_name));
        }
        text.push_str(";\n");
    }
}

fn push_import_block(text: &mut String, imports: &BTreeSet<String>) {
    for import in imports {
        text.push_str(&format!("import {import};\n"));
    }
    text.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::DefaultNamePolicy;
    use proto_parser::{EnumValue, ScalarType};

    fn renderer<'a>(policy: &'a DefaultNamePolicy, extra: &'a [String]) -> DeclarationRenderer<'a> {
        DeclarationRenderer {
            package: "com.example.generated",
            proto_package: "com.example.proto",
            outer_class: "ShopProtos",
            policy,
            extra_imports: extra,
        }
    }

    fn field(name: &str, ty: FieldType, cardinality: Cardinality, tag: u32) -> Field {
        Field {
            ty,
            name: name.to_string(),
            cardinality,
            tag,
        }
    }

    #[test]
    fn enum_body_carries_values_and_code_field() {
        let policy = DefaultNamePolicy::default();
        let decl = Enum {
            name: "Status".to_string(),
            values: vec![
                EnumValue {
                    name: "NEW".to_string(),
                    number: 0,
                },
                EnumValue {
                    name: "PAID".to_string(),
                    number: 1,
                },
            ],
        };

        let unit = renderer(&policy, &[]).render_enum(&decl, &["Order".to_string()]);

        assert_eq!(unit.name, "OrderStatus");
        assert!(unit.text.contains(
            "@Mapper(protoClass = com.example.proto.ShopProtos.Order.Status.class, isEnum = true)"
        ));
        assert!(unit.text.contains("public enum OrderStatus {"));
        assert!(unit.text.contains("    NEW(0),\n    PAID(1);\n"));
        assert!(unit.text.contains("    @Field public final int code;"));
        assert!(unit.text.contains("    private OrderStatus(int code) {"));
        // No data annotation on enums
        assert!(!unit.text.contains("lombok.Data"));
        assert!(!unit.text.contains("@Data"));
    }

    #[test]
    fn message_fields_resolve_nested_enums_before_the_mapper() {
        let policy = DefaultNamePolicy::default();
        let message = Message {
            name: "OrderProtobufDTO".to_string(),
            fields: vec![
                field(
                    "status",
                    FieldType::Custom("Status".to_string()),
                    Cardinality::Required,
                    1,
                ),
                field(
                    "item",
                    FieldType::Custom("LineItemDTO".to_string()),
                    Cardinality::Required,
                    2,
                ),
            ],
            nested: vec![proto_parser::TypeDecl::Enum(Enum {
                name: "Status".to_string(),
                values: vec![EnumValue {
                    name: "NEW".to_string(),
                    number: 0,
                }],
            })],
        };

        let mut units = Vec::new();
        renderer(&policy, &[]).render_message(&message, &[], &mut units);

        // Enum unit precedes the message unit
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "OrderStatus");
        assert_eq!(units[1].name, "Order");

        let order = &units[1].text;
        assert!(order.contains("    @Field private OrderStatus status;\n"));
        assert!(order.contains("    @Field private LineItem item;\n"));
        assert!(order.contains("@Mapper(protoClass = ShopProtos.OrderProtobufDTO.class)"));
    }

    #[test]
    fn repeated_fields_get_an_empty_list_default() {
        let policy = DefaultNamePolicy::default();
        let message = Message {
            name: "Cart".to_string(),
            fields: vec![
                field(
                    "counts",
                    FieldType::Scalar(ScalarType::Int32),
                    Cardinality::Repeated,
                    1,
                ),
                field(
                    "note",
                    FieldType::Scalar(ScalarType::String),
                    Cardinality::Required,
                    2,
                ),
            ],
            nested: vec![],
        };

        let mut units = Vec::new();
        renderer(&policy, &[]).render_message(&message, &[], &mut units);
        let cart = &units[0].text;

        assert!(cart.contains("    @Field private List<Integer> counts = new ArrayList<Integer>();\n"));
        assert!(cart.contains("    @Field private String note;\n"));
        assert!(cart.contains("import java.util.ArrayList;\n"));
        assert!(cart.contains("import java.util.List;\n"));
        // The list imports appear exactly once.
        assert_eq!(cart.matches("import java.util.List;").count(), 1);
    }

    #[test]
    fn renamed_and_optional_fields_annotate_their_schema_name() {
        let policy = DefaultNamePolicy::default();
        let message = Message {
            name: "Flags".to_string(),
            fields: vec![
                field(
                    "isPaid",
                    FieldType::Scalar(ScalarType::Bool),
                    Cardinality::Optional,
                    1,
                ),
                field(
                    "isActive",
                    FieldType::Scalar(ScalarType::Bool),
                    Cardinality::Required,
                    2,
                ),
                field(
                    "comment",
                    FieldType::Scalar(ScalarType::String),
                    Cardinality::Optional,
                    3,
                ),
            ],
            nested: vec![],
        };

        let mut units = Vec::new();
        renderer(&policy, &[]).render_message(&message, &[], &mut units);
        let flags = &units[0].text;

        assert!(flags.contains("    @Field(name = \"isPaid\", optional = true) private Boolean paid;\n"));
        assert!(flags.contains("    @Field(name = \"isActive\") private boolean active;\n"));
        assert!(flags.contains("    @Field(optional = true) private String comment;\n"));
    }

    #[test]
    fn extra_imports_are_merged_sorted_into_messages_only() {
        let policy = DefaultNamePolicy::default();
        let extra = vec!["com.example.common.Money".to_string()];
        let message = Message {
            name: "Invoice".to_string(),
            fields: vec![],
            nested: vec![proto_parser::TypeDecl::Enum(Enum {
                name: "Kind".to_string(),
                values: vec![EnumValue {
                    name: "PLAIN".to_string(),
                    number: 0,
                }],
            })],
        };

        let mut units = Vec::new();
        renderer(&policy, &extra).render_message(&message, &[], &mut units);

        let kind = &units[0].text;
        let invoice = &units[1].text;
        assert!(!kind.contains("com.example.common.Money"));
        assert!(invoice.contains("import com.example.common.Money;\n"));

        // First block is sorted: com.example... < com.shaubert... < lombok.Data
        let money = invoice.find("import com.example.common.Money;").unwrap();
        let mapper = invoice
            .find("import com.shaubert.protomapper.annotations.Mapper;")
            .unwrap();
        let lombok = invoice.find("import lombok.Data;").unwrap();
        assert!(money < mapper && mapper < lombok);
    }

    #[test]
    fn nested_messages_are_emitted_as_sibling_units() {
        let policy = DefaultNamePolicy::default();
        let message = Message {
            name: "Order".to_string(),
            fields: vec![field(
                "shipping",
                FieldType::Custom("Address".to_string()),
                Cardinality::Optional,
                1,
            )],
            nested: vec![proto_parser::TypeDecl::Message(Message {
                name: "Address".to_string(),
                fields: vec![field(
                    "city",
                    FieldType::Scalar(ScalarType::String),
                    Cardinality::Required,
                    1,
                )],
                nested: vec![],
            })],
        };

        let mut units = Vec::new();
        renderer(&policy, &[]).render_message(&message, &[], &mut units);

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "Order");
        assert_eq!(units[1].name, "Address");
        assert!(units[0].text.contains("    @Field(optional = true) private Address shipping;\n"));
        assert!(
            units[1]
                .text
                .contains("@Mapper(protoClass = ShopProtos.Order.Address.class)")
        );
    }
}
