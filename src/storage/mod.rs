pub mod google_auth;
pub mod sheets;

pub use google_auth::{ServiceAccountKey, fetch_access_token};
pub use sheets::GoogleSheetsClient;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};
use crate::error::Result;
use crate::models::ExportBatch;

pub const DEFAULT_SHEET_TITLE: &str = "Sheet1";
pub const DEFAULT_SHEET_ROWS: u32 = 100;
pub const DEFAULT_SHEET_COLUMNS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub id: i64,
    pub title: String,
}

/// Primitive document and sheet operations of a spreadsheet store.
#[async_trait]
pub trait SpreadsheetBackend: Send + Sync {
    async fn find_document(&self, name: &str) -> Result<Option<DocumentHandle>>;

    async fn create_document(&self, name: &str) -> Result<DocumentHandle>;

    async fn first_sheet(&self, document: &DocumentHandle) -> Result<Option<SheetRef>>;

    async fn add_sheet(
        &self,
        document: &DocumentHandle,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> Result<SheetRef>;

    async fn clear_sheet(&self, document: &DocumentHandle, sheet: &SheetRef) -> Result<()>;

    async fn write_rows(
        &self,
        document: &DocumentHandle,
        sheet: &SheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()>;
}

/// Full-replace writer for the first sheet of a named document.
pub struct SheetWriter<B> {
    backend: B,
}

impl<B: SpreadsheetBackend> SheetWriter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn open_or_create(&self, name: &str) -> Result<DocumentHandle> {
        if let Some(document) = self.backend.find_document(name).await? {
            debug!(spreadsheet_id = %document.id, name = name, "Opened existing spreadsheet");
            return Ok(document);
        }

        let document = self.backend.create_document(name).await?;
        info!(spreadsheet_id = %document.id, name = name, "Created spreadsheet");
        Ok(document)
    }

    /// Clears the first sheet and writes header plus rows. Returns the number
    /// of rows written, header included. Clear and write are separate calls,
    /// so a failed write leaves the sheet blank.
    pub async fn export(&self, document: &DocumentHandle, batch: &ExportBatch) -> Result<usize> {
        let sheet = match self.backend.first_sheet(document).await? {
            Some(sheet) => sheet,
            None => {
                self.backend
                    .add_sheet(document, DEFAULT_SHEET_TITLE, DEFAULT_SHEET_ROWS, DEFAULT_SHEET_COLUMNS)
                    .await?
            }
        };

        self.backend.clear_sheet(document, &sheet).await?;

        let values = batch.to_values();
        if values.is_empty() {
            info!(spreadsheet_id = %document.id, sheet = %sheet.title, "Batch empty, sheet left blank");
            return Ok(0);
        }

        let rows = values.len();
        self.backend.write_rows(document, &sheet, values).await?;

        info!(
            spreadsheet_id = %document.id,
            sheet = %sheet.title,
            rows = rows,
            "Sheet overwritten"
        );

        Ok(rows)
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryBackend;
    use super::*;
    use crate::error::Error;
    use crate::models::ProjectedRecord;
    use serde_json::json;

    fn batch(len: usize) -> ExportBatch {
        ExportBatch::new(
            (0..len)
                .map(|i| ProjectedRecord { nm_id: Some(i as i64), ..ProjectedRecord::default() })
                .collect(),
        )
    }

    #[tokio::test]
    async fn open_or_create_returns_existing_document() {
        let writer = SheetWriter::new(MemoryBackend::with_document("WB products", vec![]));

        let document = writer.open_or_create("WB products").await.unwrap();

        assert_eq!(document.id, "id-WB products");
        assert_eq!(writer.backend().calls(), vec!["find"]);
    }

    #[tokio::test]
    async fn open_or_create_creates_missing_document() {
        let writer = SheetWriter::new(MemoryBackend::with_document("Other", vec![]));

        let document = writer.open_or_create("WB products").await.unwrap();

        assert_eq!(document.name, "WB products");
        assert_eq!(writer.backend().calls(), vec!["find", "create"]);
    }

    #[tokio::test]
    async fn export_clears_then_writes_header_and_rows() {
        let sheet = SheetRef { id: 7, title: "Товары".to_string() };
        let writer = SheetWriter::new(MemoryBackend::with_document("WB products", vec![sheet]));
        writer.backend().written.lock().unwrap().push(vec![json!("stale")]);
        let document = writer.open_or_create("WB products").await.unwrap();

        let rows = writer.export(&document, &batch(3)).await.unwrap();

        assert_eq!(rows, 4);
        assert_eq!(writer.backend().calls(), vec!["find", "first_sheet", "clear Товары", "write Товары"]);
        let written = writer.backend().written.lock().unwrap().clone();
        assert_eq!(written.len(), 4);
        assert_eq!(written[0][0], json!("Артикул WB"));
        assert_eq!(written[3][0], json!(2));
    }

    #[tokio::test]
    async fn export_adds_default_sheet_when_document_has_none() {
        let writer = SheetWriter::new(MemoryBackend::with_document("WB products", vec![]));
        let document = writer.open_or_create("WB products").await.unwrap();

        writer.export(&document, &batch(1)).await.unwrap();

        assert_eq!(
            writer.backend().calls(),
            vec!["find", "first_sheet", "add_sheet Sheet1 100x20", "clear Sheet1", "write Sheet1"]
        );
    }

    #[tokio::test]
    async fn empty_batch_clears_without_writing() {
        let sheet = SheetRef { id: 0, title: "Sheet1".to_string() };
        let writer = SheetWriter::new(MemoryBackend::with_document("WB products", vec![sheet]));
        writer.backend().written.lock().unwrap().push(vec![json!("stale")]);
        let document = writer.open_or_create("WB products").await.unwrap();

        let rows = writer.export(&document, &ExportBatch::default()).await.unwrap();

        assert_eq!(rows, 0);
        assert_eq!(writer.backend().calls(), vec!["find", "first_sheet", "clear Sheet1"]);
        assert!(writer.backend().written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_sheet_cleared() {
        let sheet = SheetRef { id: 0, title: "Sheet1".to_string() };
        let backend = MemoryBackend {
            fail_write: true,
            ..MemoryBackend::with_document("WB products", vec![sheet])
        };
        backend.written.lock().unwrap().push(vec![json!("stale")]);
        let writer = SheetWriter::new(backend);
        let document = writer.open_or_create("WB products").await.unwrap();

        let err = writer.export(&document, &batch(2)).await.unwrap_err();

        assert!(matches!(err, Error::Backend(_)));
        assert!(writer.backend().written.lock().unwrap().is_empty());
    }
}
