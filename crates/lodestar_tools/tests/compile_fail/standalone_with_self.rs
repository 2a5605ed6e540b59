use lodestar_tools::tool;

struct Forecaster;

impl Forecaster {
    #[tool]
    /// A standalone tool should not take `self`.
    async fn forecast(&self, city: String) -> String {
        city
    }
}

fn main() {
    let _ = Forecaster;
}
