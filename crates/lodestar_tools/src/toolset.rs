//! Groups of tools bound to a shared instance.

use crate::error::RegistryError;
use crate::tool::Tool;
use std::sync::Arc;

/// A type whose methods are exposed as tools.
///
/// Usually implemented with `#[toolset]`. Every tool holds an `Arc` to the
/// same instance, so calls observe its live state. Keep a clone of the `Arc`
/// passed to [`ToolRegistry::register_shared`](crate::ToolRegistry::register_shared)
/// to inspect that state from outside.
///
/// ```
/// use lodestar_tools::{Tool, Toolset, toolset};
/// use std::sync::Arc;
///
/// struct Notes {
///     prefix: String,
/// }
///
/// #[toolset]
/// impl Notes {
///     #[tool]
///     /// Label a note.
///     /// - Parameter text: Note body
///     async fn label(&self, text: String) -> String {
///         format!("{}: {text}", self.prefix)
///     }
/// }
///
/// let tools = Arc::new(Notes { prefix: "todo".into() }).tools().unwrap();
/// assert_eq!(tools[0].descriptor().name, "label");
/// ```
pub trait Toolset: Send + Sync + 'static {
    /// Builds one tool per exposed method.
    fn tools(self: Arc<Self>) -> Result<Vec<Box<dyn Tool>>, RegistryError>;
}
