//! Naming transforms applied to schema-declared identifiers.
//!
//! [`NamePolicy`] is the substitution point: the renderer only ever talks to
//! the trait, so a project with different boilerplate conventions plugs in
//! its own implementation without touching the rendering code.

/// Separator characters removed by [`format_camel_case`].
const SEPARATORS: [char; 4] = ['-', '_', '+', ' '];

/// Maps raw schema names to generated Java identifiers.
///
/// All three methods are total: they return a usable identifier for any
/// input and never fail.
pub trait NamePolicy {
    /// Name for a generated class or enum declaration.
    fn class_name_for(&self, schema_name: &str) -> String;

    /// Name for a generated field. `schema_type` is the field's schema
    /// keyword or reference text (e.g. `"bool"`, `"OrderItem"`).
    fn field_name_for(&self, schema_name: &str, schema_type: &str) -> String;

    /// Name for a referenced declared type that is not a locally resolved
    /// nested enum.
    fn referenced_type_name_for(&self, schema_type: &str) -> String;
}

/// Default policy: strips conventional DTO markers from type names and
/// rewrites `isFoo`-style boolean fields to `foo`.
#[derive(Debug, Clone)]
pub struct DefaultNamePolicy {
    markers: Vec<String>,
}

impl Default for DefaultNamePolicy {
    fn default() -> Self {
        Self::with_markers(["ProtobufDTO", "DTO"])
    }
}

impl DefaultNamePolicy {
    /// Markers are stripped in the given order, so a marker containing
    /// another ("ProtobufDTO" / "DTO") must come first.
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    fn strip_markers(&self, name: &str) -> String {
        let mut result = name.to_string();
        for marker in &self.markers {
            result = result.replace(marker.as_str(), "");
        }
        result
    }
}

impl NamePolicy for DefaultNamePolicy {
    fn class_name_for(&self, schema_name: &str) -> String {
        self.strip_markers(schema_name)
    }

    fn field_name_for(&self, schema_name: &str, schema_type: &str) -> String {
        if schema_type == "bool"
            && let Some(noun) = boolean_getter_noun(schema_name)
        {
            return lower_first(noun);
        }
        schema_name.to_string()
    }

    fn referenced_type_name_for(&self, schema_type: &str) -> String {
        self.strip_markers(schema_type)
    }
}

// "isEnabled" -> Some("Enabled"). Single- and two-letter nouns keep the
// prefix: "isX" and "isOk" read as deliberate names, not getter style.
fn boolean_getter_noun(name: &str) -> Option<&str> {
    let noun = name.strip_prefix("is")?;
    if noun.chars().next().is_some_and(char::is_uppercase) && noun.chars().count() > 2 {
        Some(noun)
    } else {
        None
    }
}

/// Remove each separator (`-`, `_`, `+`, space) and upper-case the character
/// that immediately followed it. The first character keeps its original
/// case: `"my-cool_file"` becomes `"myCoolFile"`.
pub fn format_camel_case(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut upper_next = false;
    for ch in raw.chars() {
        if SEPARATORS.contains(&ch) {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// Upper-case the first letter: `"order"` -> `"Order"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_name_strips_markers() {
        let policy = DefaultNamePolicy::default();
        assert_eq!(policy.class_name_for("FooProtobufDTO"), "Foo");
        assert_eq!(policy.class_name_for("FooDTO"), "Foo");
        assert_eq!(policy.class_name_for("Foo"), "Foo");
    }

    #[test]
    fn referenced_type_strips_markers() {
        let policy = DefaultNamePolicy::default();
        assert_eq!(policy.referenced_type_name_for("LineItemDTO"), "LineItem");
        assert_eq!(policy.referenced_type_name_for("Address"), "Address");
    }

    #[test]
    fn custom_markers_are_honored() {
        let policy = DefaultNamePolicy::with_markers(["Proto"]);
        assert_eq!(policy.class_name_for("UserProto"), "User");
        assert_eq!(policy.class_name_for("UserDTO"), "UserDTO");
    }

    #[test]
    fn boolean_getter_fields_are_renamed() {
        let policy = DefaultNamePolicy::default();
        assert_eq!(policy.field_name_for("isEnabled", "bool"), "enabled");
        assert_eq!(policy.field_name_for("isPaid", "bool"), "paid");
    }

    #[test]
    fn short_nouns_keep_the_prefix() {
        let policy = DefaultNamePolicy::default();
        assert_eq!(policy.field_name_for("isX", "bool"), "isX");
        assert_eq!(policy.field_name_for("isOk", "bool"), "isOk");
    }

    #[test]
    fn non_boolean_fields_pass_through() {
        let policy = DefaultNamePolicy::default();
        assert_eq!(policy.field_name_for("isEnabled", "string"), "isEnabled");
        assert_eq!(policy.field_name_for("island", "bool"), "island");
    }

    #[test]
    fn camel_case_removes_separators() {
        assert_eq!(format_camel_case("my-cool_file"), "myCoolFile");
        assert_eq!(format_camel_case("shop+orders v2"), "shopOrdersV2");
        assert_eq!(format_camel_case("already"), "already");
        assert_eq!(format_camel_case(""), "");
    }

    #[test]
    fn camel_case_handles_trailing_and_consecutive_separators() {
        assert_eq!(format_camel_case("foo__bar"), "fooBar");
        assert_eq!(format_camel_case("trailing_"), "trailing");
        assert_eq!(format_camel_case("_leading"), "Leading");
    }

    #[test]
    fn capitalize_upper_cases_first_letter() {
        assert_eq!(capitalize("order"), "Order");
        assert_eq!(capitalize("Order"), "Order");
        assert_eq!(capitalize(""), "");
    }
}
