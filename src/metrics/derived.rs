use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::data::TransactionRecord;

/// Trailing date window selected by the user. The set is closed: the
/// dashboard offers exactly these three windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    Week,
    Month,
    #[default]
    Quarter,
}

impl DateRange {
    pub const ALL: [DateRange; 3] = [DateRange::Week, DateRange::Month, DateRange::Quarter];

    /// Number of calendar days the window covers, ending at "today".
    pub fn days(self) -> i64 {
        match self {
            DateRange::Week => 7,
            DateRange::Month => 30,
            DateRange::Quarter => 90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::Week => "Last 7 days",
            DateRange::Month => "Last 30 days",
            DateRange::Quarter => "Last 90 days",
        }
    }

    /// Whether `date` falls inside the trailing window ending at `today`.
    pub fn contains(self, today: NaiveDate, date: NaiveDate) -> bool {
        let start = today - Duration::days(self.days() - 1);
        date >= start && date <= today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

/// Aggregate value with its period-over-period movement.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSummary {
    pub value: f64,
    /// Percentage change against the preceding window, one decimal place.
    pub change: f64,
    pub trend: Trend,
}

/// A labelled time series feeding one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl TrendSeries {
    /// Chart consumers never receive a zero-length series; an empty window
    /// degrades to a single placeholder point.
    fn or_placeholder(mut self) -> Self {
        if self.labels.is_empty() {
            self.labels.push("No Data".to_string());
            self.values.push(0.0);
        }
        self
    }
}

/// Revenue contribution of one country within the filtered window.
#[derive(Debug, Clone, PartialEq)]
pub struct TopCountry {
    pub country: String,
    pub revenue: f64,
}

/// Everything the widgets consume, derived fresh from the transaction log.
/// Pure function of (records, range, today); no independent lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub total_sales: StatSummary,
    pub record_count: usize,
    pub sales_trend: TrendSeries,
    pub daily_transactions: TrendSeries,
    pub top_countries: Vec<TopCountry>,
}

/// Recompute every derived view for the window of `range.days()` calendar
/// dates ending at `today`. The preceding window of equal length feeds the
/// period-over-period comparison.
pub fn derive_metrics(
    records: &[TransactionRecord],
    range: DateRange,
    today: NaiveDate,
) -> DerivedMetrics {
    let days = range.days();
    let current_start = today - Duration::days(days - 1);
    let previous_start = current_start - Duration::days(days);

    let current: Vec<&TransactionRecord> = records
        .iter()
        .filter(|r| range.contains(today, r.date))
        .collect();
    let previous_total: f64 = records
        .iter()
        .filter(|r| r.date >= previous_start && r.date < current_start)
        .map(|r| r.sales)
        .sum();

    let current_total: f64 = current.iter().map(|r| r.sales).sum();
    let change = if previous_total > 0.0 {
        (current_total - previous_total) / previous_total * 100.0
    } else {
        0.0
    };
    let total_sales = StatSummary {
        value: current_total,
        change: round_one_decimal(change),
        trend: if change >= 0.0 { Trend::Up } else { Trend::Down },
    };

    let mut sales_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut count_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut countries: Vec<TopCountry> = Vec::new();
    for record in &current {
        *sales_by_date.entry(record.date).or_insert(0.0) += record.sales;
        *count_by_date.entry(record.date).or_insert(0.0) += 1.0;
        match countries.iter_mut().find(|c| c.country == record.country) {
            Some(entry) => entry.revenue += record.sales,
            None => countries.push(TopCountry {
                country: record.country.clone(),
                revenue: record.sales,
            }),
        }
    }

    // For the 7-day window every calendar date appears, zero or not, so a
    // quiet day shows as zero instead of vanishing. Wider windows chart
    // only the dates that carry data, chronologically.
    let dates: Vec<NaiveDate> = if range == DateRange::Week {
        (0..days)
            .rev()
            .map(|offset| today - Duration::days(offset))
            .collect()
    } else {
        sales_by_date.keys().copied().collect()
    };

    let labels: Vec<String> = dates.iter().map(|d| format_label(*d)).collect();
    let sales_trend = TrendSeries {
        label: "Sales Revenue".to_string(),
        labels: labels.clone(),
        values: dates
            .iter()
            .map(|d| sales_by_date.get(d).copied().unwrap_or(0.0))
            .collect(),
    }
    .or_placeholder();
    let daily_transactions = TrendSeries {
        label: "Daily Transactions".to_string(),
        labels,
        values: dates
            .iter()
            .map(|d| count_by_date.get(d).copied().unwrap_or(0.0))
            .collect(),
    }
    .or_placeholder();

    // Stable sort: equal revenues keep their encounter order.
    countries.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    countries.truncate(5);

    DerivedMetrics {
        total_sales,
        record_count: current.len(),
        sales_trend,
        daily_transactions,
        top_countries: countries,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn format_label(date: NaiveDate) -> String {
    date.format("%-m/%-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TxStatus;

    fn record(id: &str, country: &str, sales: f64, date: NaiveDate) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@example.com"),
            country: country.to_string(),
            sales,
            date,
            status: TxStatus::Completed,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_window_includes_only_trailing_seven_days() {
        let records = vec![
            record("tx-1", "USA", 100.0, day(2024, 1, 1)),
            record("tx-2", "USA", 200.0, day(2024, 1, 8)),
        ];
        let metrics = derive_metrics(&records, DateRange::Week, day(2024, 1, 8));

        assert_eq!(metrics.total_sales.value, 200.0);
        assert_eq!(metrics.record_count, 1);
        // Dense series: all seven calendar dates, six of them zero.
        assert_eq!(metrics.sales_trend.values.len(), 7);
        let zeros = metrics
            .sales_trend
            .values
            .iter()
            .filter(|v| **v == 0.0)
            .count();
        assert_eq!(zeros, 6);
        assert_eq!(*metrics.sales_trend.values.last().unwrap(), 200.0);
        assert_eq!(metrics.sales_trend.labels.first().unwrap(), "1/2");
        assert_eq!(metrics.sales_trend.labels.last().unwrap(), "1/8");
        assert_eq!(metrics.daily_transactions.values.len(), 7);
        assert_eq!(*metrics.daily_transactions.values.last().unwrap(), 1.0);
    }

    #[test]
    fn period_over_period_change_is_percentage() {
        // Previous window (the 7 days before the current 7) totals 100,
        // current totals 150.
        let records = vec![
            record("prev", "USA", 100.0, day(2024, 3, 5)),
            record("cur-1", "USA", 90.0, day(2024, 3, 12)),
            record("cur-2", "USA", 60.0, day(2024, 3, 14)),
        ];
        let metrics = derive_metrics(&records, DateRange::Week, day(2024, 3, 14));
        assert_eq!(metrics.total_sales.value, 150.0);
        assert_eq!(metrics.total_sales.change, 50.0);
        assert_eq!(metrics.total_sales.trend, Trend::Up);
    }

    #[test]
    fn empty_previous_window_yields_zero_change() {
        let records = vec![record("cur", "USA", 150.0, day(2024, 3, 14))];
        let metrics = derive_metrics(&records, DateRange::Week, day(2024, 3, 14));
        assert_eq!(metrics.total_sales.change, 0.0);
        assert!(metrics.total_sales.change.is_finite());
        assert_eq!(metrics.total_sales.trend, Trend::Up);
    }

    #[test]
    fn change_rounds_to_one_decimal() {
        let records = vec![
            record("prev", "USA", 300.0, day(2024, 3, 5)),
            record("cur", "USA", 400.0, day(2024, 3, 14)),
        ];
        let metrics = derive_metrics(&records, DateRange::Week, day(2024, 3, 14));
        // (400 - 300) / 300 * 100 = 33.333... → 33.3
        assert_eq!(metrics.total_sales.change, 33.3);
    }

    #[test]
    fn top_countries_break_ties_by_encounter_order() {
        let records = vec![
            record("tx-1", "A", 300.0, day(2024, 3, 12)),
            record("tx-2", "B", 300.0, day(2024, 3, 13)),
            record("tx-3", "C", 100.0, day(2024, 3, 14)),
        ];
        let metrics = derive_metrics(&records, DateRange::Week, day(2024, 3, 14));
        let order: Vec<&str> = metrics
            .top_countries
            .iter()
            .map(|c| c.country.as_str())
            .collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn top_countries_keeps_at_most_five() {
        let records: Vec<TransactionRecord> = (0..8)
            .map(|i| {
                record(
                    &format!("tx-{i}"),
                    &format!("country-{i}"),
                    100.0 * (i + 1) as f64,
                    day(2024, 3, 14),
                )
            })
            .collect();
        let metrics = derive_metrics(&records, DateRange::Week, day(2024, 3, 14));
        assert_eq!(metrics.top_countries.len(), 5);
        assert_eq!(metrics.top_countries[0].country, "country-7");
    }

    #[test]
    fn empty_wide_window_degrades_to_placeholder() {
        let metrics = derive_metrics(&[], DateRange::Quarter, day(2024, 3, 14));
        assert_eq!(metrics.sales_trend.labels, vec!["No Data"]);
        assert_eq!(metrics.sales_trend.values, vec![0.0]);
        assert_eq!(metrics.daily_transactions.labels, vec!["No Data"]);
        assert_eq!(metrics.record_count, 0);
        assert!(metrics.top_countries.is_empty());
    }

    #[test]
    fn wide_window_charts_only_dates_with_data() {
        let records = vec![
            record("tx-1", "USA", 100.0, day(2024, 2, 1)),
            record("tx-2", "USA", 50.0, day(2024, 2, 1)),
            record("tx-3", "USA", 200.0, day(2024, 2, 20)),
        ];
        let metrics = derive_metrics(&records, DateRange::Quarter, day(2024, 3, 14));
        assert_eq!(metrics.sales_trend.labels, vec!["2/1", "2/20"]);
        assert_eq!(metrics.sales_trend.values, vec![150.0, 200.0]);
        assert_eq!(metrics.daily_transactions.values, vec![2.0, 1.0]);
    }
}
