//! The canonical tool model and its builder.
//!
//! A [`ToolDescriptor`] describes one callable: its name, description and
//! ordered parameters. It is built with a [`DescriptorBuilder`], which runs
//! the doc-comment parser and the type mapper and validates the result.
//!
//! # Example
//!
//! ```
//! use lodestar_schema::{DescriptorBuilder, SchemaType};
//!
//! let descriptor = DescriptorBuilder::new("greet")
//!     .doc("/// Greet someone.\n/// - Parameter name: Who to greet")
//!     .param("name", "String")
//!     .default_value("name", "World")
//!     .build()
//!     .unwrap();
//!
//! let name = descriptor.parameter("name").unwrap();
//! assert_eq!(name.schema_type, SchemaType::String);
//! assert!(name.optional);
//! assert!(descriptor.required_names().is_empty());
//! ```

use crate::doc::DocComment;
use crate::enums::EnumTable;
use crate::error::SchemaError;
use crate::types::{DeclaredType, Enumeration, SchemaType, TypeMapper};
use crate::value::TypedValue;
use indexmap::IndexMap;

/// Schema information for a single tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParameter {
    /// Parameter name, unique within its tool.
    pub name: String,
    /// Schema type of the parameter value.
    pub schema_type: SchemaType,
    /// Description, possibly empty.
    pub description: String,
    /// Allowed values for closed string enums.
    pub enumeration: Option<Enumeration>,
    /// Whether the parameter may be omitted: declared `Option<_>` or defaulted.
    pub optional: bool,
    /// Value substituted at dispatch time when the argument is omitted.
    pub default_value: Option<TypedValue>,
}

impl ToolParameter {
    /// Creates a required, undocumented parameter of the given type.
    pub fn new(name: impl Into<String>, schema_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            schema_type,
            description: String::new(),
            enumeration: None,
            optional: false,
            default_value: None,
        }
    }

    /// Returns whether a default value was declared.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Returns the statically known enum cases, or an empty slice.
    #[must_use]
    pub fn enum_values(&self) -> &[String] {
        match &self.enumeration {
            Some(Enumeration::Cases(cases)) => cases,
            _ => &[],
        }
    }
}

/// Canonical description of one callable tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    /// Tool name.
    pub name: String,
    /// Tool description, possibly empty.
    pub description: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ToolParameter>,
}

impl ToolDescriptor {
    /// Creates a descriptor with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Names of all parameters that must be supplied, in declaration order.
    #[must_use]
    pub fn required_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|param| !param.optional)
            .map(|param| param.name.as_str())
            .collect()
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|param| param.name == name)
    }

    /// Returns the keys of every deferred enumeration used by this tool.
    pub fn deferred_enums(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter_map(|param| match &param.enumeration {
                Some(Enumeration::Deferred(key)) => Some(key.as_str()),
                _ => None,
            })
    }
}

/// Builds a [`ToolDescriptor`] from a name, raw doc text and declared
/// parameter types.
///
/// Failures are collected and reported by [`build`](Self::build), so the
/// builder can be chained without intermediate error handling.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    doc_regions: Vec<String>,
    params: Vec<(String, DeclaredType)>,
    defaults: IndexMap<String, TypedValue>,
    descriptions: IndexMap<String, String>,
    scope: EnumTable,
}

impl DescriptorBuilder {
    /// Starts a descriptor for the callable `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_regions: Vec::new(),
            params: Vec::new(),
            defaults: IndexMap::new(),
            descriptions: IndexMap::new(),
            scope: EnumTable::new(),
        }
    }

    /// Adds a region of raw doc-comment text. May be called repeatedly for
    /// comments split across several regions.
    #[must_use]
    pub fn doc(mut self, raw: impl Into<String>) -> Self {
        self.doc_regions.push(raw.into());
        self
    }

    /// Replaces the tool name. Optionality is unaffected.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declares the next parameter and its type.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.params.push((name.into(), ty.into()));
        self
    }

    /// Declares a default value, which also makes the parameter optional.
    ///
    /// [`TypedValue::Absent`] marks the parameter optional without a default.
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Sets a description used when the doc comment has no entry for `name`.
    #[must_use]
    pub fn describe(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptions.insert(name.into(), description.into());
        self
    }

    /// Declares a sibling enum the type mapper can resolve statically.
    #[must_use]
    pub fn declare_enum<I, S>(mut self, name: impl Into<String>, cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope.declare(name, cases);
        self
    }

    /// Uses `scope` as the set of sibling enum declarations.
    #[must_use]
    pub fn scope(mut self, scope: &EnumTable) -> Self {
        self.scope.merge(scope);
        self
    }

    /// Returns the tool name the descriptor will carry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of declared parameters.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Validates the declaration and builds the descriptor.
    pub fn build(self) -> Result<ToolDescriptor, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let doc = DocComment::parse_regions(self.doc_regions.iter().map(String::as_str));
        let mapper = TypeMapper::new(&self.scope);

        for name in self.defaults.keys().chain(self.descriptions.keys()) {
            if !self.params.iter().any(|(param, _)| param == name) {
                return Err(SchemaError::UnknownParameter(name.clone()));
            }
        }

        let mut parameters: Vec<ToolParameter> = Vec::with_capacity(self.params.len());
        for (name, declared) in &self.params {
            if parameters.iter().any(|param| &param.name == name) {
                return Err(SchemaError::DuplicateParameter(name.clone()));
            }

            let mapped = mapper
                .map(declared)
                .map_err(|source| SchemaError::unsupported(name, source))?;

            let description = doc
                .parameter(name)
                .or_else(|| self.descriptions.get(name).map(String::as_str))
                .unwrap_or_default()
                .to_string();

            let mut param = ToolParameter {
                name: name.clone(),
                schema_type: mapped.schema_type,
                description,
                enumeration: mapped.enumeration,
                optional: mapped.optional,
                default_value: None,
            };

            if let Some(default) = self.defaults.get(name) {
                param.optional = true;
                if !default.is_absent() {
                    param.default_value = Some(conform_default(&param, default.clone())?);
                }
            }

            parameters.push(param);
        }

        tracing::trace!(
            tool = %self.name,
            parameters = parameters.len(),
            "built tool descriptor"
        );

        Ok(ToolDescriptor {
            name: self.name,
            description: doc.summary,
            parameters,
        })
    }
}

fn conform_default(param: &ToolParameter, value: TypedValue) -> Result<TypedValue, SchemaError> {
    let mismatch = || SchemaError::DefaultTypeMismatch {
        parameter: param.name.clone(),
        expected: param.schema_type,
    };

    let value = value.conform_to(param.schema_type).ok_or_else(mismatch)?;
    if let (Some(Enumeration::Cases(cases)), Some(case)) = (&param.enumeration, value.as_str())
        && !cases.iter().any(|allowed| allowed == case)
    {
        return Err(mismatch());
    }
    Ok(value)
}
