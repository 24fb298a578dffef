mod routes;
pub mod state;
pub mod views;

pub use routes::{build_router, serve};
pub use state::AppState;
pub use views::{render_calculator_page, render_notice, render_results, Notice, NoticeKind};

use std::path::{Path, PathBuf};

use crate::config::DeliveryMode;

/// Writes the calculator page as `index.html` under `output_dir`.
pub fn export_calculator_page(output_dir: &Path, mode: DeliveryMode) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("index.html");
    std::fs::write(&path, render_calculator_page(mode))?;
    Ok(path)
}
