use workflow_roi::config::AppConfig;
use workflow_roi::telemetry::init_tracing;
use workflow_roi::web::serve;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(false);
    let config = AppConfig::from_env()?;
    serve(config).await
}
