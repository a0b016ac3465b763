use anyhow::Result;
use chrono::Local;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wb_catalog_export::{run_export, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let started_at = Local::now();
    info!(started_at = %started_at.format("%Y-%m-%d %H:%M:%S"), "Starting catalog export");

    let settings = Settings::new()?;

    match run_export(&settings).await {
        Ok(summary) => {
            info!(
                spreadsheet = %settings.spreadsheet_name,
                spreadsheet_id = %summary.spreadsheet_id,
                records = summary.records_fetched,
                rows = summary.rows_written,
                elapsed_secs = (Local::now() - started_at).num_seconds(),
                "Export complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Export failed");
            Err(e.into())
        }
    }
}
