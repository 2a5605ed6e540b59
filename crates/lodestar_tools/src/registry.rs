//! Tool registry and dispatcher.
//!
//! The [`ToolRegistry`] stores registered tools, renders their schemas and
//! dispatches calls by name. It is built once, then shared (`&ToolRegistry`
//! or `Arc<ToolRegistry>`) by any number of concurrent dispatches.
//! [`ToolRegistryView`]s restrict it to an allow-list of names without
//! copying or mutating it.
//!
//! # Usage
//!
//! ```
//! use lodestar_tools::{ArgumentBag, ToolBuilder, ToolOutput, ToolRegistry};
//! use std::convert::Infallible;
//!
//! async fn greet(name: String) -> Result<String, Infallible> {
//!     Ok(format!("Hello, {name}!"))
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register(
//!         ToolBuilder::new("greet")
//!             .param("name", "String")
//!             .default_value("name", "World")
//!             .handler(greet)
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let output = registry.dispatch("greet", &ArgumentBag::new()).await.unwrap();
//! assert_eq!(output, ToolOutput::Value("Hello, World!".into()));
//! # }
//! ```

use crate::args::{ArgumentBag, ToolCall};
use crate::coerce::ArgumentCoercer;
use crate::enums::{self, ToolEnum};
use crate::error::{DispatchError, RegistryError};
use crate::handler::{Arguments, ToolFuture, ToolOutput};
use crate::tool::Tool;
use crate::toolset::Toolset;
use indexmap::{IndexMap, IndexSet};
use lodestar_schema::{EnumTable, FunctionSchema, RenderOptions, ToolDescriptor};
use serde_json::Value;
use std::sync::Arc;

struct Entry {
    descriptor: ToolDescriptor,
    tool: Arc<dyn Tool>,
}

/// A tool registered under a name other than its own.
struct Renamed<T> {
    descriptor: ToolDescriptor,
    inner: T,
}

impl<T: Tool> Tool for Renamed<T> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn invoke(&self, args: Arguments) -> ToolFuture {
        self.inner.invoke(args)
    }

    fn enums(&self) -> Option<&EnumTable> {
        self.inner.enums()
    }
}

/// Registry of available tools.
///
/// Stores tools by name in registration order, together with the enum
/// catalog that resolves deferred enum parameters.
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Entry>,
    enums: EnumTable,
}

impl core::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .field("enums", &self.enums)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
            enums: EnumTable::new(),
        }
    }

    /// Registers a tool under its descriptor's name.
    pub fn register(&mut self, tool: impl Tool) -> Result<(), RegistryError> {
        let descriptor = tool.descriptor().clone();
        self.insert(descriptor, Arc::new(tool))
    }

    /// Registers a tool under `name` instead of its descriptor's name.
    pub fn register_as(
        &mut self,
        name: impl Into<String>,
        tool: impl Tool,
    ) -> Result<(), RegistryError> {
        let mut descriptor = tool.descriptor().clone();
        descriptor.name = name.into();
        let renamed = Renamed {
            descriptor: descriptor.clone(),
            inner: tool,
        };
        self.insert(descriptor, Arc::new(renamed))
    }

    /// Registers a boxed tool, such as one produced by a [`Toolset`].
    pub fn register_boxed(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let descriptor = tool.descriptor().clone();
        self.insert(descriptor, Arc::from(tool))
    }

    /// Registers all tools of a toolset, taking ownership of the instance.
    pub fn register_toolset<T: Toolset>(&mut self, toolset: T) -> Result<(), RegistryError> {
        self.register_shared(Arc::new(toolset))
    }

    /// Registers all tools of a shared toolset instance.
    ///
    /// Either every tool is registered or, on a name conflict, none is.
    pub fn register_shared<T: Toolset>(&mut self, toolset: Arc<T>) -> Result<(), RegistryError> {
        let tools = toolset.tools()?;

        let mut seen = IndexSet::new();
        for tool in &tools {
            let name = &tool.descriptor().name;
            if self.tools.contains_key(name) || !seen.insert(name.as_str()) {
                return Err(RegistryError::duplicate(name.as_str()));
            }
        }

        for tool in tools {
            self.register_boxed(tool)?;
        }
        Ok(())
    }

    /// Adds `E`'s cases to the enum catalog under `key`.
    pub fn register_enum<E: ToolEnum>(&mut self, key: impl Into<String>) -> &mut Self {
        self.enums.declare(key, enums::cases::<E>());
        self
    }

    /// Adds an enum to the catalog under `key`.
    pub fn declare_enum<I, S>(&mut self, key: impl Into<String>, cases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums.declare(key, cases);
        self
    }

    fn insert(
        &mut self,
        descriptor: ToolDescriptor,
        tool: Arc<dyn Tool>,
    ) -> Result<(), RegistryError> {
        if self.tools.contains_key(&descriptor.name) {
            return Err(RegistryError::duplicate(descriptor.name));
        }
        if let Some(enums) = tool.enums() {
            self.enums.merge(enums);
        }
        for key in descriptor.deferred_enums() {
            if !self.enums.contains(key) {
                tracing::debug!(
                    tool = %descriptor.name,
                    enum_type = %key,
                    "deferred enum not yet in catalog"
                );
            }
        }
        tracing::debug!(tool = %descriptor.name, "registered tool");
        self.tools
            .insert(descriptor.name.clone(), Entry { descriptor, tool });
        Ok(())
    }

    /// Returns the enum catalog.
    #[must_use]
    pub fn enums(&self) -> &EnumTable {
        &self.enums
    }

    /// Returns strict schemas for all tools, in registration order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<FunctionSchema> {
        self.list_tools_with(&RenderOptions::default())
    }

    /// Returns schemas for all tools, rendered with `options`.
    #[must_use]
    pub fn list_tools_with(&self, options: &RenderOptions) -> Vec<FunctionSchema> {
        self.schemas(options, self.tools.values())
    }

    /// Returns tool definitions in the wire shape chosen by `options`.
    #[must_use]
    pub fn tool_definitions(&self, options: &RenderOptions) -> Vec<Value> {
        self.definitions(options, self.tools.values())
    }

    fn schemas<'a>(
        &self,
        options: &RenderOptions,
        entries: impl Iterator<Item = &'a Entry>,
    ) -> Vec<FunctionSchema> {
        let renderer = options.renderer(Some(&self.enums));
        entries.map(|entry| renderer.render(&entry.descriptor)).collect()
    }

    fn definitions<'a>(
        &self,
        options: &RenderOptions,
        entries: impl Iterator<Item = &'a Entry>,
    ) -> Vec<Value> {
        entries
            .map(|entry| options.definition(&entry.descriptor, Some(&self.enums)))
            .collect()
    }

    /// Returns a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|entry| entry.tool.as_ref())
    }

    /// Returns the descriptor a tool is registered with.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name).map(|entry| &entry.descriptor)
    }

    /// Returns whether a tool with the given name is registered.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns the names of all registered tools.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` when no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatches a call: looks the tool up, coerces `args` and awaits it.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &ArgumentBag,
    ) -> Result<ToolOutput, DispatchError> {
        let entry = self.entry(name)?;
        self.invoke(name, entry, args).await
    }

    /// Dispatches a call with a raw JSON argument payload.
    ///
    /// The tool is looked up before the payload is parsed, so an unknown name
    /// is reported as such whatever the payload.
    pub async fn dispatch_json(
        &self,
        name: &str,
        args: &Value,
    ) -> Result<ToolOutput, DispatchError> {
        let entry = self.entry(name)?;
        let bag = ArgumentBag::from_json(args)?;
        self.invoke(name, entry, &bag).await
    }

    /// Dispatches an LLM-issued tool call.
    pub async fn dispatch_call(&self, call: &ToolCall) -> Result<ToolOutput, DispatchError> {
        self.dispatch_json(&call.name, &call.arguments).await
    }

    fn entry(&self, name: &str) -> Result<&Entry, DispatchError> {
        self.tools.get(name).ok_or_else(|| not_found(name))
    }

    async fn invoke(
        &self,
        name: &str,
        entry: &Entry,
        args: &ArgumentBag,
    ) -> Result<ToolOutput, DispatchError> {
        let arguments = ArgumentCoercer::new(&self.enums)
            .coerce(&entry.descriptor.parameters, args)
            .inspect_err(|err| {
                tracing::warn!(tool = %name, error = %err, "rejected tool arguments");
            })?;

        tracing::debug!(tool = %name, arguments = arguments.len(), "dispatching tool");
        entry.tool.invoke(arguments).await.inspect_err(|err| {
            tracing::warn!(tool = %name, error = %err, "tool call failed");
        })
    }

    /// Returns a view restricted to the names in `allow`.
    ///
    /// Names in `allow` that are not registered are ignored.
    pub fn filtered<I, S>(&self, allow: I) -> ToolRegistryView<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolRegistryView {
            base: self,
            allow: allow.into_iter().map(Into::into).collect(),
        }
    }
}

fn not_found(name: &str) -> DispatchError {
    tracing::debug!(tool = %name, "tool not found");
    DispatchError::FunctionNotFound(name.to_string())
}

/// A read-only view of a [`ToolRegistry`] limited to an allow-list.
///
/// Names outside the allow-list behave exactly like unregistered names.
#[derive(Debug, Clone)]
pub struct ToolRegistryView<'a> {
    base: &'a ToolRegistry,
    allow: IndexSet<String>,
}

impl<'a> ToolRegistryView<'a> {
    fn entries(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.base
            .tools
            .iter()
            .filter(|(name, _)| self.allow.contains(name.as_str()))
            .map(|(_, entry)| entry)
    }

    /// Returns whether `name` is registered and allowed.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.allow.contains(name) && self.base.has(name)
    }

    /// Returns an allowed tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a dyn Tool> {
        if self.allow.contains(name) {
            self.base.get(name)
        } else {
            None
        }
    }

    /// Returns the names of allowed tools, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        self.entries()
            .map(|entry| entry.descriptor.name.as_str())
            .collect()
    }

    /// Returns strict schemas for allowed tools.
    #[must_use]
    pub fn list_tools(&self) -> Vec<FunctionSchema> {
        self.list_tools_with(&RenderOptions::default())
    }

    /// Returns schemas for allowed tools, rendered with `options`.
    #[must_use]
    pub fn list_tools_with(&self, options: &RenderOptions) -> Vec<FunctionSchema> {
        self.base.schemas(options, self.entries())
    }

    /// Returns definitions of allowed tools in the wire shape chosen by `options`.
    #[must_use]
    pub fn tool_definitions(&self, options: &RenderOptions) -> Vec<Value> {
        self.base.definitions(options, self.entries())
    }

    /// Dispatches a call if `name` is allowed.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &ArgumentBag,
    ) -> Result<ToolOutput, DispatchError> {
        if !self.allow.contains(name) {
            return Err(not_found(name));
        }
        self.base.dispatch(name, args).await
    }

    /// Dispatches a call with a raw JSON argument payload if `name` is allowed.
    pub async fn dispatch_json(
        &self,
        name: &str,
        args: &Value,
    ) -> Result<ToolOutput, DispatchError> {
        if !self.allow.contains(name) {
            return Err(not_found(name));
        }
        self.base.dispatch_json(name, args).await
    }

    /// Dispatches an LLM-issued tool call if its name is allowed.
    pub async fn dispatch_call(&self, call: &ToolCall) -> Result<ToolOutput, DispatchError> {
        self.dispatch_json(&call.name, &call.arguments).await
    }

    /// Narrows this view to names that are also in `allow`.
    pub fn filtered<I, S>(&self, allow: I) -> ToolRegistryView<'a>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allow = allow
            .into_iter()
            .map(Into::into)
            .filter(|name| self.allow.contains(name))
            .collect();
        ToolRegistryView {
            base: self.base,
            allow,
        }
    }
}
