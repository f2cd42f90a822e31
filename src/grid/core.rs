use serde::{Deserialize, Serialize};

/// Number of columns in the dashboard grid.
pub const GRID_COLS: u8 = 12;

/// Number of rows in the dashboard grid.
pub const GRID_ROWS: u8 = 2;

/// Smallest span a widget may occupy during a resize.
pub const MIN_SPAN: u8 = 2;

/// Largest span a widget may occupy during a resize.
pub const MAX_SPAN: u8 = 10;

/// What a widget renders. The model carries this so the presentation layer
/// can pick a component; the core never interprets it beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Stat,
    Chart,
    Table,
}

/// Chart style for `WidgetKind::Chart` widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartVariant {
    Line,
    Bar,
    Pie,
}

/// One widget's position, size, and identity on the grid.
///
/// The wire names match the layout blob the dashboard has always persisted:
/// `cols`/`rows` for spans, `x`/`y` for offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetPlacement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: String,
    #[serde(rename = "cols")]
    pub col_span: u8,
    #[serde(rename = "rows")]
    pub row_span: u8,
    #[serde(rename = "x")]
    pub col_offset: u8,
    #[serde(rename = "y")]
    pub row_index: u8,
    #[serde(rename = "chartType", skip_serializing_if = "Option::is_none", default)]
    pub chart_variant: Option<ChartVariant>,
    #[serde(rename = "dataSource", skip_serializing_if = "Option::is_none", default)]
    pub data_source: Option<String>,
}

impl WidgetPlacement {
    /// One column past the widget's right edge.
    pub fn col_end(&self) -> u8 {
        self.col_offset.saturating_add(self.col_span)
    }
}

/// Ordered sequence of widget placements.
///
/// Sequence order does not encode grid position; `row_index` and
/// `col_offset` do. Row views sort by offset on demand. The container is a
/// view over its data, not a guard: it performs no validation on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutState {
    widgets: Vec<WidgetPlacement>,
}

impl LayoutState {
    pub fn new(widgets: Vec<WidgetPlacement>) -> Self {
        Self { widgets }
    }

    pub fn widgets(&self) -> &[WidgetPlacement] {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut [WidgetPlacement] {
        &mut self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WidgetPlacement> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// All placements in `row`, ordered by `col_offset` ascending.
    pub fn row(&self, row: u8) -> Vec<&WidgetPlacement> {
        let mut members: Vec<&WidgetPlacement> = self
            .widgets
            .iter()
            .filter(|w| w.row_index == row)
            .collect();
        members.sort_by_key(|w| w.col_offset);
        members
    }

    /// Indices into the underlying sequence for `row`, ordered left to
    /// right. The mutation engine works through these so offsets can be
    /// rewritten in place.
    pub(crate) fn row_indices(&self, row: u8) -> Vec<usize> {
        let mut members: Vec<usize> = (0..self.widgets.len())
            .filter(|&i| self.widgets[i].row_index == row)
            .collect();
        members.sort_by_key(|&i| self.widgets[i].col_offset);
        members
    }

    /// Sum of spans in `row`.
    pub fn row_total(&self, row: u8) -> u8 {
        self.row(row).iter().map(|w| w.col_span).sum()
    }

    /// Clamp rows whose spans overflow the grid.
    ///
    /// Persisted layouts are parsed best-effort, so an externally edited
    /// blob can claim more than 12 columns in a row. Rows that fit are left
    /// untouched (slack gaps from free resizes are legitimate); an
    /// overflowing row is repacked left to right, shrinking trailing
    /// widgets until the total fits.
    pub fn clamp_overflow(&mut self) {
        for row in 0..GRID_ROWS {
            if self.row_total(row) <= GRID_COLS {
                continue;
            }
            let order = self.row_indices(row);
            let count = order.len();
            let mut used = 0u8;
            for (position, idx) in order.into_iter().enumerate() {
                // Hold one column back for each widget still to place so a
                // greedy early widget cannot starve the rest of the row.
                let reserved = (count - 1 - position) as u8;
                let available = GRID_COLS
                    .saturating_sub(used)
                    .saturating_sub(reserved)
                    .max(1);
                let widget = &mut self.widgets[idx];
                widget.col_span = widget.col_span.clamp(1, available);
                widget.col_offset = used;
                used = used.saturating_add(widget.col_span);
            }
        }
    }

    /// The hard-coded default arrangement: a stat card and the sales table
    /// on the top row, three charts across the bottom row.
    pub fn default_layout() -> Self {
        let widget = |id: &str,
                      kind: WidgetKind,
                      title: &str,
                      col_span: u8,
                      col_offset: u8,
                      row_index: u8,
                      chart_variant: Option<ChartVariant>,
                      data_source: Option<&str>| {
            WidgetPlacement {
                id: id.to_string(),
                kind,
                title: title.to_string(),
                col_span,
                row_span: 1,
                col_offset,
                row_index,
                chart_variant,
                data_source: data_source.map(str::to_string),
            }
        };

        Self::new(vec![
            widget(
                "stat-1",
                WidgetKind::Stat,
                "Total Sales",
                3,
                0,
                0,
                None,
                Some("totalSales"),
            ),
            widget("table-1", WidgetKind::Table, "Recent Sales", 9, 3, 0, None, None),
            widget(
                "chart-1",
                WidgetKind::Chart,
                "Sales Trend",
                4,
                0,
                1,
                Some(ChartVariant::Line),
                Some("salesTrend"),
            ),
            widget(
                "chart-2",
                WidgetKind::Chart,
                "Daily Transactions",
                4,
                4,
                1,
                Some(ChartVariant::Bar),
                Some("userActivity"),
            ),
            widget(
                "chart-3",
                WidgetKind::Chart,
                "Revenue Distribution",
                4,
                8,
                1,
                Some(ChartVariant::Pie),
                Some("revenueDistribution"),
            ),
        ])
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::default_layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets_follow_spans(layout: &LayoutState, row: u8) -> bool {
        let mut expected = 0u8;
        for widget in layout.row(row) {
            if widget.col_offset != expected {
                return false;
            }
            expected += widget.col_span;
        }
        true
    }

    #[test]
    fn default_layout_fills_both_rows() {
        let layout = LayoutState::default_layout();
        assert_eq!(layout.len(), 5);
        for row in 0..GRID_ROWS {
            assert_eq!(layout.row_total(row), GRID_COLS);
            assert!(offsets_follow_spans(&layout, row));
        }
    }

    #[test]
    fn row_view_sorts_by_offset() {
        let mut layout = LayoutState::default_layout();
        // Scramble sequence order; row views must still come back sorted.
        layout.widgets.reverse();
        let row1: Vec<&str> = layout.row(1).iter().map(|w| w.id.as_str()).collect();
        assert_eq!(row1, vec!["chart-1", "chart-2", "chart-3"]);
    }

    #[test]
    fn clamp_overflow_repacks_oversized_row() {
        let mut layout = LayoutState::default_layout();
        layout.widgets_mut()[1].col_span = 12; // 3 + 12 on row 0
        layout.clamp_overflow();
        assert_eq!(layout.row_total(0), GRID_COLS);
        assert!(offsets_follow_spans(&layout, 0));
        // Row 1 was valid and must be untouched.
        let chart3 = layout.get("chart-3").unwrap();
        assert_eq!((chart3.col_span, chart3.col_offset), (4, 8));
    }

    #[test]
    fn clamp_overflow_preserves_slack_gaps() {
        let mut layout = LayoutState::default_layout();
        // Simulate a free shrink of the first row-1 widget: total < 12.
        layout.widgets_mut()[2].col_span = 2;
        let before = layout.clone();
        layout.clamp_overflow();
        assert_eq!(layout, before);
    }

    #[test]
    fn placement_round_trips_through_wire_names() {
        let layout = LayoutState::default_layout();
        let blob = serde_json::to_string(&layout).unwrap();
        assert!(blob.contains("\"chartType\":\"line\""));
        assert!(blob.contains("\"dataSource\":\"totalSales\""));
        assert!(blob.contains("\"cols\":9"));
        let parsed: LayoutState = serde_json::from_str(&blob).unwrap();
        assert_eq!(parsed, layout);
    }
}
