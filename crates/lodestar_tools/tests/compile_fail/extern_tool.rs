use lodestar_tools::tool;

#[tool]
/// An extern tool should be rejected.
async extern "C" fn extern_tool(name: String) -> String {
    name
}

fn main() {}
