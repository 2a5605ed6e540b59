//! Provider wire shapes.
//!
//! Every shape is derived from [`FunctionSchema`], so the property and
//! `required` rules of the chosen rendering mode carry over unchanged.

use crate::descriptor::ToolDescriptor;
use crate::enums::EnumTable;
use crate::render::{FunctionSchema, SchemaRenderer};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// Output shape of a tool definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFormat {
    /// `{ name, description?, strict, parameters }`.
    #[default]
    Function,
    /// `{ "type": "function", "function": { name, description?, strict, parameters } }`.
    ChatCompletions,
    /// `{ name, description?, input_schema }`.
    Anthropic,
}

impl ToolFormat {
    /// All formats, in declaration order.
    pub const ALL: [Self; 3] = [Self::Function, Self::ChatCompletions, Self::Anthropic];

    /// Returns the configuration name of this format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::ChatCompletions => "chat_completions",
            Self::Anthropic => "anthropic",
        }
    }

    /// Shapes a rendered schema.
    #[must_use]
    pub fn shape(self, schema: &FunctionSchema) -> Value {
        match self {
            Self::Function => schema.to_value(),
            Self::ChatCompletions => json!({
                "type": "function",
                "function": schema.to_value(),
            }),
            Self::Anthropic => {
                let mut value = json!({ "name": schema.name });
                if let Some(description) = &schema.description {
                    value["description"] = json!(description);
                }
                value["input_schema"] = schema.parameters.to_value();
                value
            }
        }
    }
}

impl fmt::Display for ToolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "function" => Ok(Self::Function),
            "chat_completions" | "chat" | "openai" => Ok(Self::ChatCompletions),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(format!(
                "unknown tool format `{other}`, \
                 expected one of: function, chat_completions, anthropic"
            )),
        }
    }
}

/// Options governing schema output.
///
/// ```
/// use lodestar_schema::{RenderOptions, ToolFormat};
///
/// let options: RenderOptions = serde_json::from_str(r#"{"format": "anthropic"}"#).unwrap();
/// assert!(options.strict);
/// assert_eq!(options, RenderOptions::default().with_format(ToolFormat::Anthropic));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Strict rendering. Defaults to `true`.
    pub strict: bool,
    /// Output shape. Defaults to [`ToolFormat::Function`].
    pub format: ToolFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            strict: true,
            format: ToolFormat::Function,
        }
    }
}

impl RenderOptions {
    /// Sets strict or loose rendering.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the output shape.
    #[must_use]
    pub fn with_format(mut self, format: ToolFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns a renderer configured by these options.
    #[must_use]
    pub fn renderer<'a>(&self, enums: Option<&'a EnumTable>) -> SchemaRenderer<'a> {
        let renderer = SchemaRenderer::new().with_strict(self.strict);
        match enums {
            Some(enums) => renderer.with_enums(enums),
            None => renderer,
        }
    }

    /// Renders and shapes a single descriptor.
    #[must_use]
    pub fn definition(&self, descriptor: &ToolDescriptor, enums: Option<&EnumTable>) -> Value {
        self.format.shape(&self.renderer(enums).render(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DescriptorBuilder;

    fn forecast() -> ToolDescriptor {
        DescriptorBuilder::new("forecast")
            .doc("Get forecast\n- Parameter city: City name")
            .param("city", "String")
            .param("days", "Option<u8>")
            .build()
            .unwrap()
    }

    #[test]
    fn chat_completions_wraps_function_shape() {
        let options = RenderOptions::default().with_format(ToolFormat::ChatCompletions);
        let value = options.definition(&forecast(), None);
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "forecast");
        assert_eq!(value["function"]["strict"], true);
        assert_eq!(value["function"]["parameters"]["required"], json!(["city", "days"]));
    }

    #[test]
    fn anthropic_uses_input_schema() {
        let options = RenderOptions::default()
            .with_strict(false)
            .with_format(ToolFormat::Anthropic);
        let value = options.definition(&forecast(), None);
        assert_eq!(
            value,
            json!({
                "name": "forecast",
                "description": "Get forecast",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "city": { "type": "string", "description": "City name" },
                        "days": { "type": "integer" }
                    },
                    "required": ["city"],
                    "additionalProperties": false
                }
            })
        );
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("chat-completions".parse(), Ok(ToolFormat::ChatCompletions));
        assert_eq!("Anthropic".parse(), Ok(ToolFormat::Anthropic));
        assert!("xml".parse::<ToolFormat>().is_err());
        for format in ToolFormat::ALL {
            assert_eq!(format.as_str().parse(), Ok(format));
        }
    }
}
