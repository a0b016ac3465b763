pub mod catalog;
pub mod export;
pub mod projector;

pub use catalog::{CatalogSource, WildberriesCatalog};
pub use export::{run_export, ExportJob, ExportSummary};
pub use projector::{project, project_at};
