//! Compile-fail tests for `#[tool]` and `#[toolset]` signature validation.

#[test]
fn compile_fail() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/*.rs");
}
