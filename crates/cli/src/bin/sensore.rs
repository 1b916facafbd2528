use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    sensore_cli::main_entry().await
}
