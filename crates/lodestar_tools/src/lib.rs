//! Tool registration and dispatch for Lodestar.
//!
//! This crate turns async Rust functions into tools an LLM can call: it keeps
//! a [`ToolRegistry`] of them, renders their schemas through
//! [`lodestar_schema`], and dispatches incoming calls by validating and
//! coercing the loosely-typed arguments before invoking the function.
//!
//! # Quick Start
//!
//! ```
//! use lodestar_tools::{ArgumentBag, ToolRegistry, tool};
//!
//! #[tool]
//! /// Add two integers.
//! /// - Parameter a: First operand
//! /// - Parameter b: Second operand
//! async fn add(a: i64, b: i64) -> i64 {
//!     a + b
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut registry = ToolRegistry::new();
//! registry.register(add().unwrap()).unwrap();
//!
//! let schema = &registry.list_tools()[0];
//! assert_eq!(schema.parameters.required, ["a", "b"]);
//!
//! let bag = ArgumentBag::new().with("a", 2).with("b", 3);
//! let output = registry.dispatch("add", &bag).await.unwrap();
//! assert_eq!(output.into_value(), 5);
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`Tool`]: a descriptor plus an async invocation
//! - [`ToolBuilder`] / [`FunctionTool`]: tools backed by async callables
//! - [`Toolset`]: tools bound to a shared instance (via `#[toolset]`)
//! - [`ToolEnum`]: closed string enums as parameters (via `#[derive(ToolEnum)]`)
//! - [`ArgumentBag`] / [`ArgumentCoercer`]: raw arguments and their coercion
//! - [`ToolRegistry`] / [`ToolRegistryView`]: lookup, schemas and dispatch

// Self-reference so macro-generated `lodestar_tools::` paths resolve inside this crate.
extern crate self as lodestar_tools;

pub mod args;
pub mod coerce;
pub mod enums;
pub mod error;
pub mod handler;
pub mod registry;
pub mod tool;
pub mod toolset;

// Re-export core types at crate root.
pub use args::{ArgValue, ArgumentBag, ToolCall};
pub use coerce::ArgumentCoercer;
pub use enums::ToolEnum;
pub use error::{BoxError, DispatchError, ErrorKind, RegistryError};
pub use handler::{Argument, Arguments, FromArgument, Handler, ToolFuture, ToolOutput};
pub use registry::{ToolRegistry, ToolRegistryView};
pub use tool::{FunctionTool, Tool, ToolBuilder};
pub use toolset::Toolset;

// Schema types that appear in this crate's public API.
pub use lodestar_schema::{
    DescriptorBuilder, EnumTable, FunctionSchema, RenderOptions, SchemaType, ToolDescriptor,
    ToolFormat, TypedValue,
};

// Re-export proc macros.
pub use tool_macros::{ToolEnum, tool, toolset};
