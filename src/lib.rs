//! Typed tool descriptors and argument dispatch for LLM function calling.
//!
//! Lodestar turns annotated Rust functions into JSON-schema tool definitions
//! and routes model-issued calls back to them with checked arguments.
//!
//! ```
//! use lodestar::prelude::*;
//! use serde_json::json;
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
//! let output = registry
//!     .dispatch_json("add", &json!({ "a": 2, "b": 3 }))
//!     .await
//!     .unwrap();
//! assert_eq!(output.into_value(), json!(5));
//! # }
//! ```

/// Layer 1: descriptors, doc parsing, and schema rendering.
pub use lodestar_schema;

/// Layer 2: tools, registries, and dispatch.
pub use lodestar_tools;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use lodestar_schema::{EnumTable, RenderOptions, ToolDescriptor, ToolFormat, TypedValue};
    pub use lodestar_tools::{
        ArgumentBag, DispatchError, FunctionTool, RegistryError, Tool, ToolCall, ToolEnum,
        ToolOutput, ToolRegistry, Toolset, tool, toolset,
    };
}
