//! Integration tests for descriptor construction and schema rendering.

use lodestar_schema::{
    DescriptorBuilder, EnumTable, PropertyType, RenderOptions, SchemaError, SchemaRenderer,
    SchemaType, ToolDescriptor, ToolFormat, TypedValue, render,
};
use serde_json::json;

fn forecast() -> ToolDescriptor {
    DescriptorBuilder::new("forecast")
        .doc(
            "/// Get forecast\n\
             ///\n\
             /// - Parameter city: City name\n\
             /// - Parameter units: Temperature units",
        )
        .param("city", "String")
        .param("units", "Option<String>")
        .build()
        .unwrap()
}

// ─────────────────────────────────────────────────────────────────────
// 1. Required sets
// ─────────────────────────────────────────────────────────────────────

#[test]
fn loose_required_is_non_optional_names() {
    let schema = render(&forecast(), false);
    assert_eq!(schema.parameters.required, ["city"]);
    assert_eq!(
        schema.parameters.properties["units"].kind,
        PropertyType::Single(SchemaType::String)
    );
}

#[test]
fn strict_required_is_every_name() {
    let schema = render(&forecast(), true);
    assert_eq!(schema.parameters.required, ["city", "units"]);

    let value = schema.to_value();
    assert_eq!(
        value["parameters"]["properties"]["units"]["type"],
        json!(["string", "null"])
    );
    assert_eq!(value["parameters"]["properties"]["city"]["type"], json!("string"));
}

#[test]
fn defaulted_parameter_is_optional_in_both_modes() {
    let descriptor = DescriptorBuilder::new("list_items")
        .param("category", "String")
        .param("limit", "usize")
        .default_value("limit", 100)
        .build()
        .unwrap();

    assert_eq!(render(&descriptor, false).parameters.required, ["category"]);

    let strict = render(&descriptor, true);
    assert_eq!(strict.parameters.required, ["category", "limit"]);
    assert_eq!(
        strict.parameters.properties["limit"].kind,
        PropertyType::Nullable(SchemaType::Integer)
    );
    // Defaults are dispatch-time only.
    assert!(strict.to_value()["parameters"]["properties"]["limit"].get("default").is_none());
}

// ─────────────────────────────────────────────────────────────────────
// 2. Enumerations
// ─────────────────────────────────────────────────────────────────────

#[test]
fn enum_cases_render_in_declaration_order() {
    let scope = EnumTable::new().with_enum("Priority", ["low", "medium", "high", "urgent"]);
    let descriptor = DescriptorBuilder::new("file_ticket")
        .scope(&scope)
        .param("priority", "Priority")
        .build()
        .unwrap();

    let value = render(&descriptor, true).to_value();
    assert_eq!(
        value["parameters"]["properties"]["priority"],
        json!({ "type": "string", "enum": ["low", "medium", "high", "urgent"] })
    );
}

#[test]
fn optional_enum_is_nullable_with_cases() {
    let scope = EnumTable::new().with_enum("Units", ["metric", "imperial"]);
    let descriptor = DescriptorBuilder::new("forecast")
        .scope(&scope)
        .param("units", "Option<Units>")
        .build()
        .unwrap();

    let value = render(&descriptor, true).to_value();
    assert_eq!(
        value["parameters"]["properties"]["units"],
        json!({ "type": ["string", "null"], "enum": ["metric", "imperial"] })
    );
}

#[test]
fn enum_default_must_be_a_case() {
    let scope = EnumTable::new().with_enum("Units", ["metric", "imperial"]);
    let err = DescriptorBuilder::new("forecast")
        .scope(&scope)
        .param("units", "Units")
        .default_value("units", "kelvin")
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::DefaultTypeMismatch { .. }));
}

// ─────────────────────────────────────────────────────────────────────
// 3. Descriptions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn empty_descriptions_are_omitted() {
    let descriptor = DescriptorBuilder::new("ping")
        .param("host", "String")
        .build()
        .unwrap();
    let value = render(&descriptor, false).to_value();
    assert!(value.get("description").is_none());
    assert_eq!(value["parameters"]["properties"]["host"], json!({ "type": "string" }));
}

#[test]
fn block_doc_comment_feeds_descriptions() {
    let descriptor = DescriptorBuilder::new("convert")
        .doc(
            "/**\n \
             * Convert a temperature.\n \
             *\n \
             * - Parameter value: Degrees to convert\n \
             * - parameter scale: Target scale\n \
             */",
        )
        .param("value", "f64")
        .param("scale", "String")
        .build()
        .unwrap();

    assert_eq!(descriptor.description, "Convert a temperature.");
    assert_eq!(descriptor.parameters[0].description, "Degrees to convert");
    assert_eq!(descriptor.parameters[1].description, "Target scale");
}

// ─────────────────────────────────────────────────────────────────────
// 4. Wire formats
// ─────────────────────────────────────────────────────────────────────

#[test]
fn every_format_is_derived_from_the_same_schema() {
    let descriptor = forecast();
    let schema = SchemaRenderer::strict().render(&descriptor);
    let parameters = schema.parameters.to_value();

    let function = ToolFormat::Function.shape(&schema);
    let chat = ToolFormat::ChatCompletions.shape(&schema);
    let anthropic = ToolFormat::Anthropic.shape(&schema);

    assert_eq!(function["parameters"], parameters);
    assert_eq!(chat["function"], function);
    assert_eq!(anthropic["input_schema"], parameters);
    assert_eq!(anthropic["description"], "Get forecast");
}

#[test]
fn render_options_deserialize_with_defaults() {
    let options: RenderOptions =
        serde_json::from_value(json!({ "strict": false, "format": "chat_completions" })).unwrap();
    assert_eq!(
        options,
        RenderOptions::default()
            .with_strict(false)
            .with_format(ToolFormat::ChatCompletions)
    );

    let value = options.definition(&forecast(), None);
    assert_eq!(value["function"]["parameters"]["required"], json!(["city"]));
    assert_eq!(value["function"]["strict"], json!(false));
}

// ─────────────────────────────────────────────────────────────────────
// 5. Definition-time failures
// ─────────────────────────────────────────────────────────────────────

#[test]
fn unsupported_parameter_blocks_descriptor() {
    let err = DescriptorBuilder::new("tag")
        .param("name", "String")
        .param("tags", "Vec<String>")
        .build()
        .unwrap_err();
    assert_eq!(err.unsupported_type(), Some("Vec<String>"));
    assert!(err.to_string().contains("tags"), "got: {err}");
}

#[test]
fn typed_default_widens_integer_to_number() {
    let descriptor = DescriptorBuilder::new("scale")
        .param("factor", "f64")
        .default_value("factor", 2)
        .build()
        .unwrap();
    assert_eq!(
        descriptor.parameters[0].default_value,
        Some(TypedValue::Number(2.0))
    );
}
