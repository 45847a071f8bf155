//! Java POJO generation from parsed .proto files.
//!
//! The generator walks a [`proto_parser::ProtoFile`] and renders one Java
//! source unit per declaration: Lombok `@Data` classes for messages, enums
//! with a mapped `code` field for enum types. Nested enums become sibling
//! top-level units, emitted before the message that references them.
//!
//! ```no_run
//! use pojo_generator::{FileSink, SchemaGenerator};
//!
//! let file = proto_parser::parse_proto_file("order.proto")?;
//! let generator = SchemaGenerator::new("com.example.generated");
//! let mut sink = FileSink::new("out/com/example/generated");
//! generator.generate_into(&file, &[], &mut sink)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod naming;
mod render;
mod sink;
mod type_map;

use std::io;
use std::path::Path;

use proto_parser::{ProtoFile, TypeDecl};
use thiserror::Error;

use render::DeclarationRenderer;

pub use naming::{DefaultNamePolicy, NamePolicy, capitalize, format_camel_case};
pub use sink::{FileSink, MemorySink, OutputSink};
pub use type_map::{MappedType, map_type};

/// One generated source artifact: the generated type name plus the full
/// rendered text. Every declaration, nested ones included, yields exactly
/// one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub name: String,
    pub text: String,
}

/// A unit the sink refused to accept.
#[derive(Debug, Error)]
#[error("failed to write {name}: {source}")]
pub struct WriteFailure {
    pub name: String,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to write {} generated files", .0.len())]
    Sink(Vec<WriteFailure>),
}

/// Walks a parsed file's declarations and renders each one.
///
/// Construction fixes the output package and the [`NamePolicy`]; generation
/// itself keeps no state across files, so one generator can serve a whole
/// run.
pub struct SchemaGenerator {
    package: String,
    policy: Box<dyn NamePolicy>,
}

impl SchemaGenerator {
    /// Generator with the default DTO-marker-stripping policy.
    pub fn new(package: impl Into<String>) -> Self {
        Self::with_policy(package, DefaultNamePolicy::default())
    }

    pub fn with_policy(package: impl Into<String>, policy: impl NamePolicy + 'static) -> Self {
        Self {
            package: package.into(),
            policy: Box::new(policy),
        }
    }

    /// Render every declaration of `file` into generated units, in emission
    /// order. Pure: identical input produces byte-identical units.
    pub fn generate(&self, file: &ProtoFile, extra_imports: &[String]) -> Vec<GeneratedUnit> {
        let outer_class = outer_class_name(file);
        let proto_package = file.java_package().unwrap_or(&self.package).to_string();

        let renderer = DeclarationRenderer {
            package: &self.package,
            proto_package: &proto_package,
            outer_class: &outer_class,
            policy: self.policy.as_ref(),
            extra_imports,
        };

        let mut units = Vec::new();
        for decl in &file.types {
            match decl {
                TypeDecl::Message(message) => renderer.render_message(message, &[], &mut units),
                TypeDecl::Enum(decl) => units.push(renderer.render_enum(decl, &[])),
            }
        }
        units
    }

    /// Render and dispatch each unit to `sink` in emission order.
    ///
    /// A failed write does not stop the remaining writes; all failures are
    /// reported together once every unit has been attempted. Returns the
    /// number of units the sink accepted.
    pub fn generate_into(
        &self,
        file: &ProtoFile,
        extra_imports: &[String],
        sink: &mut dyn OutputSink,
    ) -> Result<usize, GenerateError> {
        let mut written = 0usize;
        let mut failures = Vec::new();
        for unit in self.generate(file, extra_imports) {
            match sink.accept(&unit.name, &unit.text) {
                Ok(()) => written += 1,
                Err(source) => failures.push(WriteFailure {
                    name: unit.name,
                    source,
                }),
            }
        }
        if failures.is_empty() {
            Ok(written)
        } else {
            Err(GenerateError::Sink(failures))
        }
    }
}

/// Outer class name of the schema file: the explicit
/// `java_outer_classname` option verbatim, otherwise derived from the file
/// name with the extension stripped and separators camel-cased.
fn outer_class_name(file: &ProtoFile) -> String {
    if let Some(name) = file.option("java_outer_classname") {
        return name.to_string();
    }
    let base = Path::new(&file.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    capitalize(&format_camel_case(&base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_parser::parse_proto_source;

    #[test]
    fn outer_class_prefers_the_explicit_option() {
        let file = parse_proto_source(
            "anything.proto",
            r#"option java_outer_classname = "ShopProtos";"#,
        )
        .expect("parse failed");
        assert_eq!(outer_class_name(&file), "ShopProtos");
    }

    #[test]
    fn outer_class_falls_back_to_the_camel_cased_file_name() {
        let file = parse_proto_source("my-cool_file.proto", "").expect("parse failed");
        assert_eq!(outer_class_name(&file), "MyCoolFile");
    }

    #[test]
    fn generate_into_keeps_writing_after_a_failure() {
        struct FlakySink {
            accepted: Vec<String>,
        }
        impl OutputSink for FlakySink {
            fn accept(&mut self, name: &str, _text: &str) -> io::Result<()> {
                if name == "Broken" {
                    return Err(io::Error::other("disk full"));
                }
                self.accepted.push(name.to_string());
                Ok(())
            }
        }

        let file = parse_proto_source(
            "shop.proto",
            r#"
            message Broken { required int32 id = 1; }
            message Fine { required int32 id = 1; }
            "#,
        )
        .expect("parse failed");

        let generator = SchemaGenerator::new("com.example.generated");
        let mut sink = FlakySink { accepted: vec![] };
        let result = generator.generate_into(&file, &[], &mut sink);

        // The failure is reported, and the later unit was still written.
        match result {
            Err(GenerateError::Sink(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].name, "Broken");
            }
            other => panic!("expected sink failure, got {other:?}"),
        }
        assert_eq!(sink.accepted, vec!["Fine".to_string()]);
    }

    #[test]
    fn generation_is_deterministic() {
        let source = r#"
            package com.example.shop;
            message Order {
                enum Status { NEW = 0; DONE = 1; }
                required Status status = 1;
                repeated string tags = 2;
            }
        "#;
        let file = parse_proto_source("shop.proto", source).expect("parse failed");
        let generator = SchemaGenerator::new("com.example.generated");

        let first = generator.generate(&file, &[]);
        let second = generator.generate(&file, &[]);
        assert_eq!(first, second);
    }
}
