use lodestar_tools::toolset;

struct Counter;

#[toolset]
impl Counter {
    #[tool]
    /// `&mut self` is not supported.
    async fn bump(&mut self, label: String) -> String {
        label
    }
}

fn main() {
    let _ = Counter;
}
