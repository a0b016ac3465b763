use chrono::{DateTime, TimeZone};
use serde_json::Value;

/// Sheet header row, in display order.
pub const COLUMN_HEADERS: [&str; 6] = [
    "Артикул WB",
    "Наименование товара",
    "Бренд",
    "Артикул продавца",
    "Дата создания",
    "Дата обновления",
];

pub const EXPORT_LABEL: &str = "Дата и время выгрузки:";
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// One sheet row. The trailing row of every batch reuses `created_at` and
/// `updated_at` for the export label and timestamp; see [`ProjectedRecord::export_marker`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedRecord {
    pub nm_id: Option<i64>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub imt_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ProjectedRecord {
    pub fn export_marker<Tz>(exported_at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            created_at: Some(EXPORT_LABEL.to_string()),
            updated_at: Some(exported_at.format(EXPORT_TIMESTAMP_FORMAT).to_string()),
            ..Self::default()
        }
    }

    /// Cell values in header order. Absent values are written as empty strings.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            id_cell(self.nm_id),
            text_cell(self.title.as_deref()),
            text_cell(self.brand.as_deref()),
            id_cell(self.imt_id),
            text_cell(self.created_at.as_deref()),
            text_cell(self.updated_at.as_deref()),
        ]
    }
}

fn id_cell(value: Option<i64>) -> Value {
    value.map(Value::from).unwrap_or_else(|| Value::from(""))
}

fn text_cell(value: Option<&str>) -> Value {
    Value::from(value.unwrap_or_default())
}

/// Everything written to the sheet in one overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportBatch {
    records: Vec<ProjectedRecord>,
}

impl ExportBatch {
    pub fn new(records: Vec<ProjectedRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ProjectedRecord] {
        &self.records
    }

    /// Header row followed by one row per record; empty when the batch is empty.
    pub fn to_values(&self) -> Vec<Vec<Value>> {
        if self.records.is_empty() {
            return Vec::new();
        }

        let header = COLUMN_HEADERS.iter().map(|h| Value::from(*h)).collect();
        std::iter::once(header)
            .chain(self.records.iter().map(ProjectedRecord::to_row))
            .collect()
    }
}
