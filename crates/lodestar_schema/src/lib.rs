//! Tool descriptors and JSON schema rendering for Lodestar.
//!
//! This crate turns a documented callable into a [`ToolDescriptor`] and renders
//! that descriptor into the JSON shapes LLM providers expect for function
//! calling. Everything here is pure and synchronous: no I/O, no shared state.
//!
//! # Quick Start
//!
//! ```
//! use lodestar_schema::{DescriptorBuilder, SchemaRenderer};
//!
//! let descriptor = DescriptorBuilder::new("forecast")
//!     .doc("/// Get forecast\n/// - Parameter city: City name")
//!     .param("city", "String")
//!     .param("units", "Option<String>")
//!     .build()
//!     .unwrap();
//!
//! let schema = SchemaRenderer::strict().render(&descriptor);
//! assert_eq!(schema.parameters.required, ["city", "units"]);
//! ```
//!
//! # Architecture
//!
//! - [`DocComment`]: summary and `- Parameter` extraction from raw comments
//! - [`TypeMapper`] / [`DeclaredType`]: source types to [`SchemaType`]s
//! - [`EnumTable`]: named, ordered case lists for closed string enums
//! - [`ToolDescriptor`] / [`DescriptorBuilder`]: the canonical tool model
//! - [`SchemaRenderer`] / [`FunctionSchema`]: loose and strict rendering
//! - [`ToolFormat`]: provider wire shapes derived from [`FunctionSchema`]

pub mod descriptor;
pub mod doc;
pub mod enums;
pub mod error;
pub mod format;
pub mod render;
pub mod types;
pub mod value;

pub use descriptor::{DescriptorBuilder, ToolDescriptor, ToolParameter};
pub use doc::DocComment;
pub use enums::EnumTable;
pub use error::{SchemaError, UnsupportedType};
pub use format::{RenderOptions, ToolFormat};
pub use render::{
    FunctionSchema, ObjectKind, ObjectSchema, PropertySchema, PropertyType, SchemaRenderer, render,
};
pub use types::{DeclaredType, Enumeration, MappedType, SchemaType, TypeMapper};
pub use value::TypedValue;
