use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    promptforge::run().await
}
