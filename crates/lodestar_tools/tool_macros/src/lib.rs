//! Procedural macros for the Lodestar tool framework.
//!
//! Provides `#[tool]` for standalone tool functions, `#[toolset]` for tools
//! bound to a shared instance, and `#[derive(ToolEnum)]` for closed string
//! enums. The macros only emit `ToolBuilder` calls; parameter types are
//! checked here with the same type mapper the runtime uses, so an
//! unsupported type is a compile error.

mod common;
mod tool_enum;
mod tool_fn;
mod toolset;

use proc_macro::TokenStream;

/// Defines a standalone tool from an async function.
///
/// Replaces the function with a constructor of the same name returning
/// `Result<FunctionTool, RegistryError>`. The return type of the original
/// function may be any `Serialize` value, or a `Result` whose error converts
/// into a boxed error.
///
/// # Attributes
///
/// - `#[tool(name = "...")]`: overrides the tool name
/// - `/// - Parameter <name>: <text>` in the function docs: parameter description
/// - `/// doc comment` on a parameter: description when the function docs have none
/// - `#[default(value)]` on a parameter: makes it optional with a default
///
/// # Example
///
/// ```
/// use lodestar_tools::{Tool, tool};
///
/// #[tool]
/// /// Search for documents.
/// /// - Parameter query: The search query
/// async fn search(
///     query: String,
///     /// Max results.
///     #[default(10)]
///     limit: usize,
/// ) -> String {
///     format!("{limit} results for: {query}")
/// }
///
/// let tool = search().unwrap();
/// let limit = tool.descriptor().parameter("limit").unwrap();
/// assert_eq!(limit.description, "Max results.");
/// assert!(limit.optional);
/// ```
///
/// Unsupported parameter types do not compile:
///
/// ```compile_fail
/// use lodestar_tools::tool;
///
/// #[tool]
/// async fn tag(names: Vec<String>) {}
/// ```
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    common::ToolArgs::parse(attr.into())
        .and_then(|args| tool_fn::generate_tool_fn(args, &input))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Defines a toolset from an impl block containing `#[tool]` methods.
///
/// Generates a `Toolset` impl whose tools all share one `Arc<Self>`.
/// Methods must take `&self`.
///
/// # Example
///
/// ```
/// use lodestar_tools::{ToolRegistry, toolset};
///
/// struct FileTools;
///
/// #[toolset]
/// impl FileTools {
///     #[tool]
///     /// List files.
///     async fn list_files(&self, path: String) -> String {
///         format!("files in {path}")
///     }
///
///     #[tool(name = "cat")]
///     /// Read a file.
///     async fn read_file(&self, path: String) -> String {
///         format!("contents of {path}")
///     }
/// }
///
/// let mut registry = ToolRegistry::new();
/// registry.register_toolset(FileTools).unwrap();
/// assert_eq!(registry.names(), ["list_files", "cat"]);
/// ```
///
/// Methods taking `&mut self` do not compile:
///
/// ```compile_fail
/// use lodestar_tools::toolset;
///
/// struct Counter(u32);
///
/// #[toolset]
/// impl Counter {
///     #[tool]
///     async fn bump(&mut self) -> u32 {
///         self.0 += 1;
///         self.0
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn toolset(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemImpl);
    toolset::generate_toolset(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `ToolEnum` for a unit-only enum.
///
/// Also implements `FromArgument` and `From<Self> for TypedValue`, so the enum
/// can be used as a tool parameter and as a `#[default]` value.
///
/// # Attributes
///
/// - `#[tool_enum(rename_all = "...")]` on the enum: `lowercase`, `UPPERCASE`,
///   `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`, `camelCase`, `PascalCase`
/// - `#[tool_enum(rename = "...")]` on a variant: explicit case name
///
/// ```
/// use lodestar_tools::ToolEnum;
///
/// #[derive(ToolEnum)]
/// #[tool_enum(rename_all = "snake_case")]
/// enum Sort {
///     MostRecent,
///     #[tool_enum(rename = "top")]
///     MostVoted,
/// }
///
/// assert_eq!(Sort::CASES, ["most_recent", "top"]);
/// ```
#[proc_macro_derive(ToolEnum, attributes(tool_enum))]
pub fn derive_tool_enum(item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::DeriveInput);
    tool_enum::generate_tool_enum(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
