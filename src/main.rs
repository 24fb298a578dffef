use workflow_roi::cli::RoiCli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    RoiCli::run().await
}
