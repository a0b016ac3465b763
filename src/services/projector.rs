use chrono::{DateTime, Local, TimeZone};
use crate::models::{CatalogCard, ExportBatch, ProjectedRecord};

/// Projects cards into sheet rows stamped with the current local time.
pub fn project(cards: &[CatalogCard]) -> ExportBatch {
    project_at(cards, &Local::now())
}

/// Same as [`project`] with an explicit export time. The result always holds
/// `cards.len() + 1` records, the last being the export marker.
pub fn project_at<Tz>(cards: &[CatalogCard], exported_at: &DateTime<Tz>) -> ExportBatch
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let records = cards
        .iter()
        .map(|card| ProjectedRecord {
            nm_id: card.nm_id,
            title: card.title.clone(),
            brand: card.brand.clone(),
            imt_id: card.imt_id,
            created_at: card.created_at.clone(),
            updated_at: card.updated_at.clone(),
        })
        .chain(std::iter::once(ProjectedRecord::export_marker(exported_at)))
        .collect();

    ExportBatch::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::EXPORT_LABEL;

    fn card(id: i64) -> CatalogCard {
        CatalogCard {
            nm_id: Some(id),
            title: Some(format!("Товар {id}")),
            brand: Some("Acme".to_string()),
            imt_id: Some(id * 10),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            updated_at: Some("2024-06-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn appends_one_marker_after_all_cards() {
        let cards: Vec<_> = (1..=3).map(card).collect();
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();

        let batch = project_at(&cards, &at);

        assert_eq!(batch.len(), 4);
        let marker = &batch.records()[3];
        assert_eq!(marker.created_at.as_deref(), Some(EXPORT_LABEL));
        assert_eq!(marker.updated_at.as_deref(), Some("31.12.2024 23:59:58"));
        assert_eq!(marker.nm_id, None);
        assert_eq!(marker.title, None);
        assert_eq!(marker.brand, None);
        assert_eq!(marker.imt_id, None);
    }

    #[test]
    fn copies_fields_in_order() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let batch = project_at(&[card(7)], &at);
        let first = &batch.records()[0];

        assert_eq!(first.nm_id, Some(7));
        assert_eq!(first.title.as_deref(), Some("Товар 7"));
        assert_eq!(first.brand.as_deref(), Some("Acme"));
        assert_eq!(first.imt_id, Some(70));
        assert_eq!(first.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(first.updated_at.as_deref(), Some("2024-06-01T00:00:00Z"));
    }

    #[test]
    fn missing_fields_stay_empty_without_failing() {
        let partial = CatalogCard {
            brand: Some("Acme".to_string()),
            ..CatalogCard::default()
        };
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let batch = project_at(&[partial, CatalogCard::default()], &at);

        assert_eq!(batch.len(), 3);
        let first = &batch.records()[0];
        assert_eq!(first.brand.as_deref(), Some("Acme"));
        assert!(first.nm_id.is_none() && first.title.is_none() && first.imt_id.is_none());
        assert!(first.created_at.is_none() && first.updated_at.is_none());
        assert_eq!(batch.records()[1], ProjectedRecord::default());
    }

    #[test]
    fn empty_input_yields_only_the_marker() {
        let batch = project(&[]);

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records()[0].created_at.as_deref(), Some(EXPORT_LABEL));
    }

    #[test]
    fn same_input_differs_only_in_timestamp() {
        let cards: Vec<_> = (1..=5).map(card).collect();

        let first = project(&cards);
        let second = project(&cards);

        let (first_rows, first_marker) = first.records().split_at(5);
        let (second_rows, second_marker) = second.records().split_at(5);
        assert_eq!(first_rows, second_rows);
        assert_eq!(first_marker[0].created_at, second_marker[0].created_at);
        let stamp = |r: &ProjectedRecord| r.updated_at.clone().unwrap();
        assert_eq!(stamp(&first_marker[0]).len(), stamp(&second_marker[0]).len());
    }
}
