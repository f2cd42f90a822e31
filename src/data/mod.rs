//! Data source boundary.
//!
//! The dashboard consumes a flat, immutable sales transaction log. The
//! contract is only "produce the full record set on demand"; this crate
//! backs it with a dataset bundled at compile time, the same way the
//! original dashboard ships its mock JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Lifecycle state of a sales transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Completed,
    Pending,
    Cancelled,
}

/// One immutable sales record. The log is never mutated, only filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub country: String,
    pub sales: f64,
    pub date: NaiveDate,
    pub status: TxStatus,
}

/// Produces the full record set on demand.
pub trait DataSource {
    fn fetch(&self) -> Result<Vec<TransactionRecord>>;
}

const BUNDLED_SALES: &str = include_str!("../../data/sales_data.json");

/// Data source backed by the dataset bundled with the crate.
#[derive(Debug, Default)]
pub struct StaticDataSource;

impl StaticDataSource {
    pub fn new() -> Self {
        Self
    }
}

impl DataSource for StaticDataSource {
    fn fetch(&self) -> Result<Vec<TransactionRecord>> {
        Ok(serde_json::from_str(BUNDLED_SALES)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses() {
        let records = StaticDataSource::new().fetch().unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.sales > 0.0));
    }

    #[test]
    fn record_parses_from_wire_shape() {
        let raw = r#"{
            "id": "tx-1",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "country": "UK",
            "sales": 1250.5,
            "date": "2025-07-14",
            "status": "completed"
        }"#;
        let record: TransactionRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.country, "UK");
        assert_eq!(record.status, TxStatus::Completed);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
    }
}
