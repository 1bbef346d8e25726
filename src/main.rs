#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pricebot::run().await
}
