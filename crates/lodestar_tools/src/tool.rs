//! The core [`Tool`] trait and function-backed tools.

use crate::enums::{self, ToolEnum};
use crate::error::RegistryError;
use crate::handler::{Arguments, Handler, ToolFuture};
use lodestar_schema::{DeclaredType, DescriptorBuilder, EnumTable, ToolDescriptor, TypedValue};
use std::sync::Arc;

/// A tool that can be invoked by an LLM.
///
/// Tools expose a [`ToolDescriptor`] for schema rendering and an async
/// [`invoke`](Tool::invoke) that receives arguments already coerced against
/// that descriptor.
pub trait Tool: Send + Sync + 'static {
    /// Returns the tool's descriptor.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Invokes the tool.
    fn invoke(&self, args: Arguments) -> ToolFuture;

    /// Enum cases this tool contributes to the registry's catalog.
    fn enums(&self) -> Option<&EnumTable> {
        None
    }
}

type BoxHandler = Arc<dyn Fn(Arguments) -> ToolFuture + Send + Sync>;

/// A [`Tool`] backed by an async callable.
///
/// Built with [`ToolBuilder`] or generated by `#[tool]`.
#[derive(Clone)]
pub struct FunctionTool {
    descriptor: ToolDescriptor,
    enums: EnumTable,
    handler: BoxHandler,
}

impl core::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("descriptor", &self.descriptor)
            .field("enums", &self.enums)
            .finish_non_exhaustive()
    }
}

impl FunctionTool {
    /// Starts building a tool named `name`.
    pub fn builder(name: impl Into<String>) -> ToolBuilder {
        ToolBuilder::new(name)
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

impl Tool for FunctionTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn invoke(&self, args: Arguments) -> ToolFuture {
        (self.handler)(args)
    }

    fn enums(&self) -> Option<&EnumTable> {
        (!self.enums.is_empty()).then_some(&self.enums)
    }
}

/// Builder for [`FunctionTool`].
///
/// ```
/// use lodestar_tools::{ArgumentBag, ToolBuilder, ToolRegistry};
/// use std::convert::Infallible;
///
/// async fn add(a: i64, b: i64) -> Result<i64, Infallible> {
///     Ok(a + b)
/// }
///
/// let tool = ToolBuilder::new("add")
///     .doc("/// Add two integers.")
///     .param("a", "i64")
///     .param("b", "i64")
///     .handler(add)
///     .unwrap();
///
/// let mut registry = ToolRegistry::new();
/// registry.register(tool).unwrap();
/// assert_eq!(registry.names(), ["add"]);
/// ```
#[derive(Debug, Clone)]
pub struct ToolBuilder {
    descriptor: DescriptorBuilder,
    enums: EnumTable,
}

impl ToolBuilder {
    /// Starts a tool named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            descriptor: DescriptorBuilder::new(name),
            enums: EnumTable::new(),
        }
    }

    /// Adds a region of raw doc-comment text.
    #[must_use]
    pub fn doc(mut self, raw: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.doc(raw);
        self
    }

    /// Declares the next parameter and its type.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.descriptor = self.descriptor.param(name, ty);
        self
    }

    /// Declares a default value for a parameter.
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.descriptor = self.descriptor.default_value(name, value);
        self
    }

    /// Sets a fallback description for a parameter.
    #[must_use]
    pub fn describe(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.describe(name, description);
        self
    }

    /// Declares a sibling enum resolved statically into the descriptor.
    #[must_use]
    pub fn declare_enum<I, S>(mut self, name: impl Into<String>, cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptor = self.descriptor.declare_enum(name, cases);
        self
    }

    /// Contributes `E`'s cases to the registry catalog under `key`, resolving
    /// parameters whose type is the deferred enum `key`.
    #[must_use]
    pub fn enum_type<E: ToolEnum>(mut self, key: impl Into<String>) -> Self {
        self.enums.declare(key, enums::cases::<E>());
        self
    }

    /// Replaces the tool name.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.rename(name);
        self
    }

    /// Binds the callable and builds the tool.
    ///
    /// Fails when the descriptor is invalid or when the callable's arity does
    /// not match the declared parameters.
    pub fn handler<H, Args>(self, handler: H) -> Result<FunctionTool, RegistryError>
    where
        H: Handler<Args>,
        Args: 'static,
    {
        let parameters = self.descriptor.param_count();
        if parameters != H::ARITY {
            return Err(RegistryError::HandlerArity {
                tool: self.descriptor.name().to_string(),
                parameters,
                handler: H::ARITY,
            });
        }

        let descriptor = self.descriptor.build()?;
        Ok(FunctionTool {
            descriptor,
            enums: self.enums,
            handler: Arc::new(move |args: Arguments| handler.call(args)),
        })
    }
}
