use lodestar_tools::toolset;

struct Counter;

#[toolset]
impl Counter {
    #[tool]
    /// Missing `&self` receiver.
    async fn bump(label: String) -> String {
        label
    }
}

fn main() {
    let _ = Counter;
}
