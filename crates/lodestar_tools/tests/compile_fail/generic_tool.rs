use lodestar_tools::tool;

#[tool]
/// A generic tool should be rejected.
async fn generic_tool<T: ToString>(name: T) -> String {
    name.to_string()
}

fn main() {}
