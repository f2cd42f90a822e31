//! Table widget view model.
//!
//! The sales table is a pure view over the filtered transaction log:
//! free-text search across name/email/country, single-column sort, and
//! pagination. Nothing here mutates the records; a query applied to the
//! same slice always yields the same page.

use std::cmp::Ordering;

use crate::data::{TransactionRecord, TxStatus};

/// Columns the table displays and sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Name,
    Email,
    Country,
    Sales,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// View state for one table widget.
#[derive(Debug, Clone)]
pub struct TableQuery {
    pub search: String,
    pub sort: Option<(TableColumn, SortDirection)>,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            page_index: 0,
            page_size: 10,
        }
    }
}

/// One page of visible rows plus the filtered total for the paginator.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub rows: Vec<TransactionRecord>,
    pub filtered_total: usize,
}

impl TableQuery {
    /// Filter, sort, and paginate `records` into the visible page.
    pub fn apply(&self, records: &[TransactionRecord]) -> TablePage {
        let term = self.search.to_lowercase();
        let mut rows: Vec<TransactionRecord> = records
            .iter()
            .filter(|r| {
                term.is_empty()
                    || r.name.to_lowercase().contains(&term)
                    || r.email.to_lowercase().contains(&term)
                    || r.country.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();

        if let Some((column, direction)) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare(column, a, b);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let filtered_total = rows.len();
        let start = self.page_index.saturating_mul(self.page_size).min(rows.len());
        let end = start.saturating_add(self.page_size).min(rows.len());
        TablePage {
            rows: rows[start..end].to_vec(),
            filtered_total,
        }
    }
}

fn compare(column: TableColumn, a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
    match column {
        TableColumn::Name => a.name.cmp(&b.name),
        TableColumn::Email => a.email.cmp(&b.email),
        TableColumn::Country => a.country.cmp(&b.country),
        TableColumn::Sales => a.sales.total_cmp(&b.sales),
        TableColumn::Status => status_str(a.status).cmp(status_str(b.status)),
    }
}

fn status_str(status: TxStatus) -> &'static str {
    match status {
        TxStatus::Completed => "completed",
        TxStatus::Pending => "pending",
        TxStatus::Cancelled => "cancelled",
    }
}

/// Render records as CSV text with a header row. Empty input yields an
/// empty string; the caller decides whether that deserves a warning.
pub fn export_csv(records: &[TransactionRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = String::from("id,name,email,country,sales,date,status\n");
    for record in records {
        out.push_str(&csv_field(&record.id));
        out.push(',');
        out.push_str(&csv_field(&record.name));
        out.push(',');
        out.push_str(&csv_field(&record.email));
        out.push(',');
        out.push_str(&csv_field(&record.country));
        out.push(',');
        out.push_str(&record.sales.to_string());
        out.push(',');
        out.push_str(&record.date.format("%Y-%m-%d").to_string());
        out.push(',');
        out.push_str(status_str(record.status));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str, country: &str, sales: f64) -> TransactionRecord {
        TransactionRecord {
            id: format!("tx-{name}"),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            country: country.to_string(),
            sales,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            status: TxStatus::Completed,
        }
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            record("Alice", "USA", 300.0),
            record("Bob", "Germany", 100.0),
            record("Carol", "UK", 200.0),
        ]
    }

    #[test]
    fn search_matches_name_email_and_country() {
        let records = sample();
        let query = TableQuery {
            search: "german".to_string(),
            ..TableQuery::default()
        };
        let page = query.apply(&records);
        assert_eq!(page.filtered_total, 1);
        assert_eq!(page.rows[0].name, "Bob");

        let query = TableQuery {
            search: "ALICE@EXAMPLE".to_string(),
            ..TableQuery::default()
        };
        assert_eq!(query.apply(&records).filtered_total, 1);
    }

    #[test]
    fn sort_by_sales_descending() {
        let records = sample();
        let query = TableQuery {
            sort: Some((TableColumn::Sales, SortDirection::Desc)),
            ..TableQuery::default()
        };
        let page = query.apply(&records);
        let names: Vec<&str> = page.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol", "Bob"]);
    }

    #[test]
    fn pagination_slices_after_filter_and_sort() {
        let records = sample();
        let query = TableQuery {
            sort: Some((TableColumn::Name, SortDirection::Asc)),
            page_index: 1,
            page_size: 2,
            ..TableQuery::default()
        };
        let page = query.apply(&records);
        assert_eq!(page.filtered_total, 3);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].name, "Carol");
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let records = sample();
        let query = TableQuery {
            page_index: 9,
            ..TableQuery::default()
        };
        let page = query.apply(&records);
        assert!(page.rows.is_empty());
        assert_eq!(page.filtered_total, 3);
    }

    #[test]
    fn csv_export_quotes_awkward_fields() {
        let mut records = sample();
        records[0].name = "Alice \"Ace\", Jr".to_string();
        let csv = export_csv(&records);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "id,name,email,country,sales,date,status");
        assert!(lines.next().unwrap().contains("\"Alice \"\"Ace\"\", Jr\""));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn csv_export_of_nothing_is_empty() {
        assert_eq!(export_csv(&[]), "");
    }
}
