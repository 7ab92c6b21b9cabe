//! Resources
//!
//! Per-screen configuration of a controller: which endpoint lists the
//! resource, how a wire row maps into a view record, and which optional write
//! operations the resource supports.

use serde::de::DeserializeOwned;

use crate::records::{CategoryRecord, ReceiptKey, ReceiptRecord, ReceiptRow};
use crate::transport::endpoints;

/// A remote list resource
pub trait Resource: 'static {
    /// Row as decoded from the `items` array
    type Row: DeserializeOwned;
    /// Row as rendered
    type Record: Clone + 'static;

    /// Short name used in log lines
    const NAME: &'static str;
    /// Read endpoint
    const LIST: &'static str;

    fn map(row: Self::Row) -> Self::Record;
}

/// Resource whose records can be written back one at a time
pub trait Mutable: Resource {
    const UPDATE: &'static str;
}

/// Resource that can be emptied server-side
pub trait Clearable: Resource {
    const CLEAR: &'static str;
}

/// Product categories screen
pub struct Categories;

impl Resource for Categories {
    type Row = CategoryRecord;
    type Record = CategoryRecord;

    const NAME: &'static str = "categories";
    const LIST: &'static str = endpoints::CATEGORIES_LIST;

    fn map(row: CategoryRecord) -> CategoryRecord {
        CategoryRecord {
            product: row.product,
            category: row.category,
            name: row.name,
        }
    }
}

impl Mutable for Categories {
    const UPDATE: &'static str = endpoints::CATEGORIES_UPDATE;
}

/// Receipts screen keyed by ticket
pub struct ReceiptsV1;

impl Resource for ReceiptsV1 {
    type Row = ReceiptRow;
    type Record = ReceiptRecord;

    const NAME: &'static str = "receipts-v1";
    const LIST: &'static str = endpoints::TICKETS_V1;

    fn map(mut row: ReceiptRow) -> ReceiptRecord {
        let key = ReceiptKey::Ticket(row.ticket.take().unwrap_or_default());
        ReceiptRecord::from_row(row, key)
    }
}

impl Clearable for ReceiptsV1 {
    const CLEAR: &'static str = endpoints::TICKETS_CLEAR;
}

/// Receipts screen keyed by purchase date
pub struct ReceiptsV2;

impl Resource for ReceiptsV2 {
    type Row = ReceiptRow;
    type Record = ReceiptRecord;

    const NAME: &'static str = "receipts-v2";
    const LIST: &'static str = endpoints::TICKETS_LIST;

    fn map(mut row: ReceiptRow) -> ReceiptRecord {
        let key = ReceiptKey::Date(row.date.take().unwrap_or_default());
        ReceiptRecord::from_row(row, key)
    }
}

impl Clearable for ReceiptsV2 {
    const CLEAR: &'static str = endpoints::TICKETS_CLEAR;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: &str) -> ReceiptRow {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_v1_maps_ticket() {
        let record = ReceiptsV1::map(row(
            r#"{"type":"Categorized","ticket":"T-1","date":"ignored","category":"Dairy","name":"Milk","quantity":1.5,"sum":89.9}"#,
        ));
        assert_eq!(record.key, ReceiptKey::Ticket("T-1".into()));
        assert_eq!(record.quantity.to_string(), "1.500");
        assert_eq!(record.sum.to_string(), "89.90");
        assert!(record.categorized);
    }

    #[test]
    fn test_v2_maps_date() {
        let record = ReceiptsV2::map(row(
            r#"{"type":"Uncategorized","date":"2023.01.02","product":"MILK 3.2%","quantity":1,"sum":2}"#,
        ));
        assert_eq!(record.key, ReceiptKey::Date("2023.01.02".into()));
        assert_eq!(record.product, "MILK 3.2%");
        assert!(!record.categorized);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let record = ReceiptsV1::map(row(r#"{"quantity":1,"sum":2}"#));
        assert_eq!(record.key.as_str(), "");
    }

    #[test]
    fn test_category_map_is_identity() {
        let record = CategoryRecord::new("P1", "Dairy", "Milk");
        assert_eq!(Categories::map(record.clone()), record);
    }
}
