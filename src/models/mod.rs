mod card;
mod response;
mod row;

pub use card::CatalogCard;
pub use response::{CardsListRequest, CardsListResponse};
pub use row::{ExportBatch, ProjectedRecord, COLUMN_HEADERS, EXPORT_LABEL, EXPORT_TIMESTAMP_FORMAT};
