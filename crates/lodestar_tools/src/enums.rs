//! Closed string enumerations usable as tool parameters.

/// A unit-only enum whose variants are exposed to the model as string cases.
///
/// Usually derived with `#[derive(ToolEnum)]`, which also implements
/// [`FromArgument`](crate::FromArgument) and `From<Self> for TypedValue`.
///
/// ```
/// use lodestar_tools::ToolEnum;
///
/// #[derive(Debug, PartialEq, ToolEnum)]
/// #[tool_enum(rename_all = "lowercase")]
/// enum Units {
///     Celsius,
///     Fahrenheit,
/// }
///
/// assert_eq!(Units::CASES, ["celsius", "fahrenheit"]);
/// assert_eq!(Units::from_case("fahrenheit"), Some(Units::Fahrenheit));
/// assert_eq!(Units::Celsius.case_name(), "celsius");
/// ```
pub trait ToolEnum: Sized + Send + 'static {
    /// Case names, in declaration order.
    const CASES: &'static [&'static str];

    /// Returns the variant named `case`.
    fn from_case(case: &str) -> Option<Self>;

    /// Returns this variant's case name.
    fn case_name(&self) -> &'static str;
}

/// Returns `E`'s cases as owned strings.
pub fn cases<E: ToolEnum>() -> Vec<String> {
    E::CASES.iter().map(|case| (*case).to_string()).collect()
}
