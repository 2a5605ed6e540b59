//! Demo client for Lodestar.
//!
//! Registers a small set of tools and exposes the three things a host
//! application does with them: render their definitions for a model, dispatch
//! a single call, and replay a stream of calls.
//!
//! ```text
//! ┌──────────────┐   definitions   ┌───────┐
//! │ ToolRegistry │ ──────────────▶ │  LLM  │
//! │              │ ◀────────────── │       │
//! └──────┬───────┘    ToolCall     └───────┘
//!        │ dispatch
//!        ▼
//!  add · greet · forecast · request_count
//! ```

pub mod config;
pub mod logging;
pub mod tools;

use lodestar::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tools::WeatherTools;

/// Errors surfaced by the demo commands.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Tool registration failed at startup.
    #[error("failed to register tools: {0}")]
    Registry(#[from] RegistryError),
    /// Command-line arguments were not valid JSON.
    #[error("arguments are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The call was rejected or the tool failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The demo's registry together with the live weather service behind it.
#[derive(Debug)]
pub struct Demo {
    registry: ToolRegistry,
    weather: Arc<WeatherTools>,
}

impl Demo {
    /// Registers every demo tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if a tool descriptor is invalid or two tools
    /// share a name.
    pub fn new() -> Result<Self, RegistryError> {
        let weather = Arc::new(WeatherTools::new());

        let mut registry = ToolRegistry::new();
        registry.register(tools::add()?)?;
        registry.register(tools::greet()?)?;
        registry.register_shared(Arc::clone(&weather))?;

        tracing::debug!(tools = ?registry.names(), "demo tools registered");
        Ok(Self { registry, weather })
    }

    /// The underlying registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The weather service, shared with its registered tools.
    pub fn weather(&self) -> &WeatherTools {
        &self.weather
    }

    /// Renders tool definitions as a JSON array.
    ///
    /// An empty `allow` list means every tool.
    #[must_use]
    pub fn schema(&self, options: &RenderOptions, allow: &[String]) -> Value {
        let definitions = if allow.is_empty() {
            self.registry.tool_definitions(options)
        } else {
            self.registry.filtered(allow).tool_definitions(options)
        };
        Value::Array(definitions)
    }

    /// Dispatches one call whose arguments are JSON text.
    ///
    /// Blank `arguments` means no arguments.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Json`] for unparseable text and
    /// [`DemoError::Dispatch`] for any dispatch failure.
    pub async fn call(&self, name: &str, arguments: &str) -> Result<ToolOutput, DemoError> {
        let raw = if arguments.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(arguments)?
        };
        Ok(self.registry.dispatch_json(name, &raw).await?)
    }

    /// Dispatches one JSON-encoded [`ToolCall`] and returns a JSON reply.
    ///
    /// The reply echoes `id` and `name` and carries either `output` or
    /// `error: { kind, message }`. Lines that are not tool calls produce an
    /// error reply of kind `malformed_call`.
    pub async fn replay_line(&self, line: &str) -> Value {
        let call: ToolCall = match serde_json::from_str(line) {
            Ok(call) => call,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed tool call");
                return serde_json::json!({
                    "error": { "kind": "malformed_call", "message": err.to_string() }
                });
            }
        };

        let result = self.registry.dispatch_call(&call).await;

        let mut reply = Map::new();
        if let Some(id) = &call.id {
            reply.insert("id".into(), Value::from(id.as_str()));
        }
        reply.insert("name".into(), Value::from(call.name.as_str()));
        match result {
            Ok(output) => {
                reply.insert("output".into(), output.into_value());
            }
            Err(err) => {
                reply.insert(
                    "error".into(),
                    serde_json::json!({ "kind": err.kind(), "message": err.to_string() }),
                );
            }
        }
        Value::Object(reply)
    }
}
