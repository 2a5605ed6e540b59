use lodestar_tools::tool;

#[tool]
/// An unsafe tool should be rejected.
async unsafe fn unsafe_tool(name: String) -> String {
    name
}

fn main() {}
