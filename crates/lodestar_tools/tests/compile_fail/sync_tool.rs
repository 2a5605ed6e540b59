use lodestar_tools::tool;

#[tool]
/// A synchronous tool should be rejected.
fn sync_tool(name: String) -> String {
    name
}

fn main() {}
