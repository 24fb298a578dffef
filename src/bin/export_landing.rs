use std::path::Path;

use anyhow::Result;
use workflow_roi::config::AppConfig;
use workflow_roi::web::export_calculator_page;

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let path = export_calculator_page(Path::new("landing-page"), config.delivery)?;
    println!("Wrote {}", path.display());
    Ok(())
}
