use std::path::Path;
use tracing::info;
use crate::config::Settings;
use crate::error::Result;
use crate::models::CatalogCard;
use crate::services::catalog::{CatalogSource, WildberriesCatalog};
use crate::services::projector::project;
use crate::storage::{GoogleSheetsClient, ServiceAccountKey, SheetWriter, SpreadsheetBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub spreadsheet_id: String,
    pub records_fetched: usize,
    pub rows_written: usize,
}

/// One export run: fetch the catalog, project it, overwrite the sheet.
pub struct ExportJob<C, B> {
    catalog: C,
    writer: SheetWriter<B>,
    spreadsheet_name: String,
    page_size: u32,
    min_target: u32,
}

impl<C: CatalogSource, B: SpreadsheetBackend> ExportJob<C, B> {
    pub fn new(catalog: C, backend: B, settings: &Settings) -> Self {
        Self {
            catalog,
            writer: SheetWriter::new(backend),
            spreadsheet_name: settings.spreadsheet_name.clone(),
            page_size: settings.page_size,
            min_target: settings.min_target,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        self.writer.backend()
    }

    /// Pages through the catalog while the next offset is below the minimum
    /// target. The check uses the offset, not the number of cards collected,
    /// so short pages can leave the total under the target. An empty page
    /// ends the loop immediately.
    pub async fn fetch_all(&self) -> Result<Vec<CatalogCard>> {
        let mut offset: u32 = 0;
        let mut cards = Vec::new();

        while offset < self.min_target {
            info!(
                from = offset,
                to = offset + self.page_size,
                "Fetching catalog page"
            );

            let page = self.catalog.fetch_page(offset, self.page_size).await?;
            if page.is_empty() {
                info!(offset = offset, "Empty page, end of catalog");
                break;
            }

            cards.extend(page);
            offset += self.page_size;
        }

        Ok(cards)
    }

    pub async fn run(&self) -> Result<ExportSummary> {
        let document = self.writer.open_or_create(&self.spreadsheet_name).await?;

        let cards = self.fetch_all().await?;
        info!(records = cards.len(), "Catalog fetched");

        let batch = project(&cards);
        let rows_written = self.writer.export(&document, &batch).await?;

        Ok(ExportSummary {
            spreadsheet_id: document.id,
            records_fetched: cards.len(),
            rows_written,
        })
    }
}

/// Validates settings, connects to both remotes and runs a single export.
/// Nothing touches the network until validation has passed.
pub async fn run_export(settings: &Settings) -> Result<ExportSummary> {
    settings.validate()?;

    let catalog = WildberriesCatalog::new(&settings.catalog_url, &settings.wb_api_token)?;
    let key = ServiceAccountKey::from_file(Path::new(&settings.google_credentials_file))?;
    let backend = GoogleSheetsClient::connect(&key, &settings.sheets_api_url, &settings.drive_api_url).await?;

    ExportJob::new(catalog, backend, settings).run().await
}
