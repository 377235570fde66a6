use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    kvengine::run().await
}
