//! Integration tests for the `lodestar_tools` crate.

use lodestar_tools::{
    ArgValue, ArgumentBag, Arguments, DispatchError, EnumTable, ErrorKind, RegistryError,
    RenderOptions, Tool, ToolCall, ToolDescriptor, ToolEnum, ToolFormat, ToolFuture, ToolOutput,
    ToolRegistry, TypedValue, tool, toolset,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────
// 1. Tool trait manual impl
// ─────────────────────────────────────────────────────────────────────

struct EchoTool {
    descriptor: ToolDescriptor,
}

impl EchoTool {
    fn new() -> Self {
        Self {
            descriptor: lodestar_tools::DescriptorBuilder::new("echo")
                .doc("/// Echo the input back.")
                .param("input", "String")
                .build()
                .unwrap(),
        }
    }
}

impl Tool for EchoTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn invoke(&self, args: Arguments) -> ToolFuture {
        let input = args.get("input").and_then(TypedValue::as_str).map(str::to_string);
        Box::pin(async move { Ok(ToolOutput::Value(json!({ "echo": input }))) })
    }
}

#[tokio::test]
async fn manual_tool_descriptor_and_dispatch() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool::new()).unwrap();

    let schema = &registry.list_tools()[0];
    assert_eq!(schema.name, "echo");
    assert_eq!(schema.description.as_deref(), Some("Echo the input back."));

    let output = registry
        .dispatch("echo", &ArgumentBag::new().with("input", "hello"))
        .await
        .unwrap();
    assert_eq!(output.into_value(), json!({ "echo": "hello" }));
}

// ─────────────────────────────────────────────────────────────────────
// 2. ToolRegistry basics
// ─────────────────────────────────────────────────────────────────────

#[tool]
/// Add two integers.
/// - Parameter a: First operand
/// - Parameter b: Second operand
async fn add(a: i64, b: i64) -> i64 {
    a + b
}

#[tool]
/// Greet someone.
/// - Parameter name: Who to greet
async fn greet(
    #[default(String::from("World"))]
    name: String,
) -> String {
    format!("Hello, {name}!")
}

fn calculator() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(add().unwrap()).unwrap();
    registry.register(greet().unwrap()).unwrap();
    registry
}

#[test]
fn registry_register_get_has_names() {
    let registry = calculator();

    assert!(registry.has("add"));
    assert!(!registry.has("nonexistent"));
    assert!(registry.get("greet").is_some());
    assert!(registry.get("nonexistent").is_none());
    assert_eq!(registry.names(), ["add", "greet"]);
}

#[test]
fn registry_duplicate_registration_is_an_error() {
    let mut registry = calculator();
    let err = registry.register(add().unwrap()).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateTool(name) if name == "add"));
    assert_eq!(registry.len(), 2);
}

// ─────────────────────────────────────────────────────────────────────
// 3. Dispatch: add and greet
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_returns_sum() {
    let registry = calculator();
    let output = registry
        .dispatch("add", &ArgumentBag::new().with("a", 2).with("b", 3))
        .await
        .unwrap();
    assert_eq!(output, ToolOutput::Value(json!(5)));
}

#[tokio::test]
async fn add_missing_argument_names_it() {
    let registry = calculator();
    let err = registry
        .dispatch("add", &ArgumentBag::new().with("a", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::MissingArgument(ref name) if name == "b"));
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);
}

#[tokio::test]
async fn greet_uses_default_when_omitted() {
    let registry = calculator();

    let output = registry.dispatch("greet", &ArgumentBag::new()).await.unwrap();
    assert_eq!(output.into_value(), json!("Hello, World!"));

    let output = registry
        .dispatch("greet", &ArgumentBag::new().with("name", "Sam"))
        .await
        .unwrap();
    assert_eq!(output.into_value(), json!("Hello, Sam!"));
}

#[tokio::test]
async fn unknown_function_is_not_found() {
    let registry = calculator();
    let err = registry
        .dispatch("subtract", &ArgumentBag::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::FunctionNotFound(ref name) if name == "subtract"));
    assert!(err.to_string().contains("subtract"), "got: {err}");
}

#[tokio::test]
async fn dispatch_json_accepts_encoded_arguments() {
    let registry = calculator();

    let output = registry
        .dispatch_json("add", &json!("{\"a\": 20, \"b\": 22}"))
        .await
        .unwrap();
    assert_eq!(output.into_value(), json!(42));

    let call = ToolCall::new("greet", serde_json::Value::Null).with_id("call_1");
    let output = registry.dispatch_call(&call).await.unwrap();
    assert_eq!(output.into_value(), json!("Hello, World!"));

    let err = registry.dispatch_json("add", &json!([1, 2])).await.unwrap_err();
    assert!(matches!(err, DispatchError::MalformedArguments(_)));
}

// ─────────────────────────────────────────────────────────────────────
// 4. Schemas
// ─────────────────────────────────────────────────────────────────────

#[test]
fn schemas_follow_strict_and_loose_rules() {
    let registry = calculator();

    let strict = registry.list_tools();
    assert_eq!(strict[1].parameters.required, ["name"]);
    assert_eq!(
        strict[1].to_value()["parameters"]["properties"]["name"],
        json!({ "type": ["string", "null"], "description": "Who to greet" })
    );

    let loose = registry.list_tools_with(&RenderOptions::default().with_strict(false));
    assert_eq!(loose[0].parameters.required, ["a", "b"]);
    assert!(loose[1].parameters.required.is_empty());
}

#[test]
fn tool_definitions_in_every_format() {
    let registry = calculator();

    let chat = registry
        .tool_definitions(&RenderOptions::default().with_format(ToolFormat::ChatCompletions));
    assert_eq!(chat[0]["type"], "function");
    assert_eq!(chat[0]["function"]["name"], "add");

    let anthropic =
        registry.tool_definitions(&RenderOptions::default().with_format(ToolFormat::Anthropic));
    assert_eq!(anthropic[0]["input_schema"]["required"], json!(["a", "b"]));
    assert_eq!(
        anthropic[0]["input_schema"]["properties"]["a"]["description"],
        "First operand"
    );
}

// ─────────────────────────────────────────────────────────────────────
// 5. Filtered views
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn filtered_view_hides_other_tools() {
    let registry = calculator();
    let view = registry.filtered(["greet"]);

    assert_eq!(view.names(), ["greet"]);
    assert_eq!(view.list_tools().len(), 1);
    assert!(view.get("add").is_none());

    let err = view
        .dispatch("add", &ArgumentBag::new().with("a", 1).with("b", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::FunctionNotFound(_)));

    // The base registry is untouched.
    assert_eq!(registry.names(), ["add", "greet"]);
    let output = view.dispatch("greet", &ArgumentBag::new()).await.unwrap();
    assert_eq!(output.into_value(), json!("Hello, World!"));
}

// ─────────────────────────────────────────────────────────────────────
// 6. Enums
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, ToolEnum)]
#[tool_enum(rename_all = "lowercase")]
enum Units {
    Celsius,
    Fahrenheit,
    Kelvin,
}

#[tool(name = "convert_temperature")]
/// Convert a temperature from Celsius.
/// - Parameter degrees: Degrees Celsius
/// - Parameter units: Target units
async fn convert(degrees: f64, #[default(Units::Fahrenheit)] units: Units) -> f64 {
    match units {
        Units::Celsius => degrees,
        Units::Fahrenheit => degrees * 9.0 / 5.0 + 32.0,
        Units::Kelvin => degrees + 273.15,
    }
}

#[test]
fn enum_cases_render_in_order() {
    let mut registry = ToolRegistry::new();
    registry.register(convert().unwrap()).unwrap();

    let schema = registry.list_tools()[0].to_value();
    assert_eq!(schema["name"], "convert_temperature");
    assert_eq!(
        schema["parameters"]["properties"]["units"]["enum"],
        json!(["celsius", "fahrenheit", "kelvin"])
    );
    assert_eq!(registry.enums().get("Units").map(<[String]>::len), Some(3));
}

#[tokio::test]
async fn enum_arguments_are_checked() {
    let mut registry = ToolRegistry::new();
    registry.register(convert().unwrap()).unwrap();

    let output = registry
        .dispatch("convert_temperature", &ArgumentBag::new().with("degrees", 100))
        .await
        .unwrap();
    assert_eq!(output.into_value(), json!(212.0));

    let output = registry
        .dispatch(
            "convert_temperature",
            &ArgumentBag::new().with("degrees", 0).with("units", "kelvin"),
        )
        .await
        .unwrap();
    assert_eq!(output.into_value(), json!(273.15));

    let err = registry
        .dispatch(
            "convert_temperature",
            &ArgumentBag::new().with("degrees", 0).with("units", "rankine"),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::InvalidEnumValue { ref parameter, ref value }
            if parameter == "units" && value == "rankine"
    ));
}

#[test]
fn derived_enum_round_trips_case_names() {
    assert_eq!(Units::CASES, ["celsius", "fahrenheit", "kelvin"]);
    assert_eq!(Units::from_case("kelvin"), Some(Units::Kelvin));
    assert_eq!(TypedValue::from(Units::Celsius), TypedValue::String("celsius".into()));
}

#[tokio::test]
async fn deferred_enum_without_catalog_entry_is_unsupported() {
    let tool = lodestar_tools::ToolBuilder::new("set_mode")
        .param("mode", "Mode")
        .handler(|mode: String| async move { Ok::<_, DispatchError>(mode) })
        .unwrap();

    let mut registry = ToolRegistry::new();
    registry.register(tool).unwrap();

    let bag = ArgumentBag::new().with("mode", "fast");
    let err = registry.dispatch("set_mode", &bag).await.unwrap_err();
    assert!(matches!(err, DispatchError::UnsupportedType(ref key) if key == "Mode"));

    registry.declare_enum("Mode", ["fast", "careful"]);
    let output = registry.dispatch("set_mode", &bag).await.unwrap();
    assert_eq!(output.into_value(), json!("fast"));
}

// ─────────────────────────────────────────────────────────────────────
// 7. #[toolset] with live state
// ─────────────────────────────────────────────────────────────────────

struct CounterTools {
    count: AtomicUsize,
}

#[toolset]
impl CounterTools {
    #[tool]
    /// Increment the counter.
    async fn increment(
        &self,
        /// Amount to add.
        #[default(1)]
        amount: usize,
    ) -> usize {
        self.count.fetch_add(amount, Ordering::SeqCst) + amount
    }

    #[tool]
    /// Read the counter.
    async fn current(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Not a tool.
    fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn toolset_observes_live_instance_state() {
    let counter = Arc::new(CounterTools {
        count: AtomicUsize::new(0),
    });

    let mut registry = ToolRegistry::new();
    registry.register_shared(Arc::clone(&counter)).unwrap();
    assert_eq!(registry.names(), ["increment", "current"]);

    let schema = registry.list_tools_with(&RenderOptions::default().with_strict(false));
    assert!(schema[0].parameters.required.is_empty());
    assert_eq!(
        schema[0].parameters.properties["amount"].description.as_deref(),
        Some("Amount to add.")
    );

    registry
        .dispatch("increment", &ArgumentBag::new().with("amount", 5))
        .await
        .unwrap();
    registry.dispatch("increment", &ArgumentBag::new()).await.unwrap();
    assert_eq!(counter.count.load(Ordering::SeqCst), 6);

    counter.reset();
    let output = registry.dispatch("current", &ArgumentBag::new()).await.unwrap();
    assert_eq!(output.into_value(), json!(0));
}

#[test]
fn toolset_name_conflicts_register_nothing() {
    let mut registry = ToolRegistry::new();
    registry
        .register_as("current", add().unwrap())
        .unwrap();

    let err = registry
        .register_toolset(CounterTools {
            count: AtomicUsize::new(0),
        })
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateTool(name) if name == "current"));
    assert_eq!(registry.names(), ["current"]);
}

// ─────────────────────────────────────────────────────────────────────
// 8. Errors raised by tools
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("quota exceeded for {0}")]
struct QuotaExceeded(String);

#[tool]
/// Fetch a resource.
async fn fetch(resource: String) -> Result<String, QuotaExceeded> {
    Err(QuotaExceeded(resource))
}

#[tool]
/// Does nothing.
async fn noop(flag: Option<bool>) {
    let _ = flag;
}

#[tokio::test]
async fn tool_errors_pass_through_unchanged() {
    let mut registry = ToolRegistry::new();
    registry.register(fetch().unwrap()).unwrap();

    let err = registry
        .dispatch("fetch", &ArgumentBag::new().with("resource", "maps"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Failed);
    assert_eq!(err.to_string(), "quota exceeded for maps");

    let DispatchError::Failed(source) = err else {
        panic!("expected a tool failure");
    };
    let quota = source.downcast::<QuotaExceeded>().unwrap();
    assert_eq!(quota.0, "maps");
}

#[tokio::test]
async fn unit_result_is_empty() {
    let mut registry = ToolRegistry::new();
    registry.register(noop().unwrap()).unwrap();

    let output = registry
        .dispatch("noop", &ArgumentBag::new().with("flag", ArgValue::Null))
        .await
        .unwrap();
    assert!(output.is_empty());
}

// ─────────────────────────────────────────────────────────────────────
// 9. Concurrency
// ─────────────────────────────────────────────────────────────────────

struct SlowTools {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[toolset]
impl SlowTools {
    #[tool]
    /// Sleep, then echo the id.
    async fn slow(&self, id: i64) -> i64 {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        id
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatches_are_independent() {
    let tools = Arc::new(SlowTools {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let mut registry = ToolRegistry::new();
    registry.register_shared(Arc::clone(&tools)).unwrap();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..8)
        .map(|id| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .dispatch("slow", &ArgumentBag::new().with("id", id))
                    .await
            })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        let output = handle.await.unwrap().unwrap();
        assert_eq!(output.into_value(), json!(id));
    }
    assert!(tools.peak.load(Ordering::SeqCst) > 1);
    assert_eq!(tools.in_flight.load(Ordering::SeqCst), 0);
}

#[test]
fn catalog_starts_empty() {
    assert!(ToolRegistry::new().enums().is_empty());
    assert_eq!(EnumTable::new().len(), 0);
}
