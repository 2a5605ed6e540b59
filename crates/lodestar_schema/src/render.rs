//! Rendering descriptors into JSON schema documents.
//!
//! [`FunctionSchema`] is the single normalized model every wire shape is
//! derived from (see [`ToolFormat`](crate::ToolFormat)). Two modes exist:
//!
//! - **loose**: a property's `type` is the bare type and `required` lists only
//!   the non-optional parameters;
//! - **strict** (the default): `required` lists every parameter and optional
//!   ones are typed `[base, "null"]`.

use crate::descriptor::{ToolDescriptor, ToolParameter};
use crate::enums::EnumTable;
use crate::types::{Enumeration, SchemaType};
use indexmap::IndexMap;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// Renders `descriptor` in strict or loose mode.
#[must_use]
pub fn render(descriptor: &ToolDescriptor, strict: bool) -> FunctionSchema {
    SchemaRenderer::new().with_strict(strict).render(descriptor)
}

/// Converts [`ToolDescriptor`]s into [`FunctionSchema`]s.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRenderer<'a> {
    strict: bool,
    enums: Option<&'a EnumTable>,
}

impl Default for SchemaRenderer<'_> {
    fn default() -> Self {
        Self {
            strict: true,
            enums: None,
        }
    }
}

impl<'a> SchemaRenderer<'a> {
    /// Creates a strict renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a strict renderer.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a loose renderer.
    #[must_use]
    pub fn loose() -> Self {
        Self::default().with_strict(false)
    }

    /// Sets the rendering mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolves deferred enumerations through `enums`. Deferred enums missing
    /// from the table render as plain strings.
    #[must_use]
    pub fn with_enums(mut self, enums: &'a EnumTable) -> Self {
        self.enums = Some(enums);
        self
    }

    /// Returns whether this renderer is in strict mode.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Renders a descriptor.
    #[must_use]
    pub fn render(&self, descriptor: &ToolDescriptor) -> FunctionSchema {
        let properties = descriptor
            .parameters
            .iter()
            .map(|param| (param.name.clone(), self.render_property(param)))
            .collect();

        let required = if self.strict {
            descriptor
                .parameters
                .iter()
                .map(|param| param.name.clone())
                .collect()
        } else {
            descriptor
                .required_names()
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        FunctionSchema {
            name: descriptor.name.clone(),
            description: non_empty(&descriptor.description),
            strict: self.strict,
            parameters: ObjectSchema {
                kind: ObjectKind::Object,
                properties,
                required,
                additional_properties: false,
            },
        }
    }

    fn render_property(&self, param: &ToolParameter) -> PropertySchema {
        let kind = if self.strict && param.optional {
            PropertyType::Nullable(param.schema_type)
        } else {
            PropertyType::Single(param.schema_type)
        };

        let cases = match &param.enumeration {
            Some(Enumeration::Cases(cases)) => Some(cases.as_slice()),
            Some(Enumeration::Deferred(key)) => {
                let cases = self.enums.and_then(|enums| enums.get(key));
                if cases.is_none() {
                    tracing::debug!(
                        parameter = %param.name,
                        enum_type = %key,
                        "deferred enum not in catalog, rendering as plain string"
                    );
                }
                cases
            }
            None => None,
        };

        PropertySchema {
            kind,
            description: non_empty(&param.description),
            enum_values: cases.filter(|cases| !cases.is_empty()).map(<[String]>::to_vec),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// Normalized, serializable schema of one function.
///
/// Serializes to the unwrapped function shape:
/// `{ name, description?, strict, parameters }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSchema {
    /// Function name.
    pub name: String,
    /// Function description, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this schema was rendered in strict mode.
    pub strict: bool,
    /// Object schema of the parameters.
    pub parameters: ObjectSchema,
}

impl FunctionSchema {
    /// Serializes to a JSON value in the unwrapped function shape.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self)
            .expect("function schemas hold only strings, booleans and string-keyed maps")
    }

    /// Returns the names of all properties, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.properties.keys().map(String::as_str)
    }
}

/// The `"type": "object"` marker of [`ObjectSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// `"object"`.
    Object,
}

/// Object schema of a function's parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSchema {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Property schemas keyed by parameter name, in declaration order.
    pub properties: IndexMap<String, PropertySchema>,
    /// Names that must be present.
    pub required: Vec<String>,
    /// Always `false`.
    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

impl ObjectSchema {
    /// Serializes to a JSON value.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self)
            .expect("object schemas hold only strings, booleans and string-keyed maps")
    }
}

/// Schema of one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    /// Property type.
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Description, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values, omitted unless non-empty.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

/// A property's `type`: a bare type, or `[type, "null"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// Serialized as `"string"`, `"integer"`, ...
    Single(SchemaType),
    /// Serialized as `["string", "null"]`, ...
    Nullable(SchemaType),
}

impl PropertyType {
    /// Returns the base schema type.
    #[must_use]
    pub fn base(self) -> SchemaType {
        match self {
            Self::Single(ty) | Self::Nullable(ty) => ty,
        }
    }

    /// Returns `true` for [`Nullable`](Self::Nullable).
    #[must_use]
    pub fn is_nullable(self) -> bool {
        matches!(self, Self::Nullable(_))
    }
}

impl Serialize for PropertyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(ty) => serializer.serialize_str(ty.as_str()),
            Self::Nullable(ty) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(ty.as_str())?;
                seq.serialize_element("null")?;
                seq.end()
            }
        }
    }
}
