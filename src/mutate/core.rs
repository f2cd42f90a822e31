use crate::grid::{LayoutState, GRID_COLS, GRID_ROWS, MAX_SPAN, MIN_SPAN};

/// Move the widget at `from` to `to` within a row's left-to-right order.
///
/// Positions index the row's current ordering, not the underlying sequence.
/// Out-of-range positions are a guaranteed no-op. After the move every
/// offset in the row is re-derived as the running sum of preceding spans,
/// so the row's total column usage never changes.
pub fn reorder(layout: &mut LayoutState, row: u8, from: usize, to: usize) {
    let mut order = layout.row_indices(row);
    if from >= order.len() || to >= order.len() {
        return;
    }
    let moved = order.remove(from);
    order.insert(to, moved);
    reflow(layout, &order);
}

/// Redistribute every row into equal integer spans.
///
/// Each widget gets `floor(12 / count)` columns; the remainder column from
/// integer division is dropped, so the row total may land below 12. Empty
/// rows are skipped.
pub fn equalize(layout: &mut LayoutState) {
    for row in 0..GRID_ROWS {
        let order = layout.row_indices(row);
        if order.is_empty() {
            continue;
        }
        let span = GRID_COLS / order.len() as u8;
        for (position, idx) in order.into_iter().enumerate() {
            let widget = &mut layout.widgets_mut()[idx];
            widget.col_span = span;
            widget.col_offset = position as u8 * span;
        }
    }
}

fn reflow(layout: &mut LayoutState, order: &[usize]) {
    let mut used = 0u8;
    for &idx in order {
        let widget = &mut layout.widgets_mut()[idx];
        widget.col_offset = used;
        used = used.saturating_add(widget.col_span);
    }
}

/// Which edge of the widget the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Leading,
    Trailing,
}

/// Result of one resize sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The candidate spans were applied to the layout.
    Applied,
    /// The step would push the neighbor below the span floor; the layout
    /// keeps whatever the previous sample applied.
    Rejected,
}

/// Scoped resize gesture.
///
/// Created at gesture start, fed one cumulative pointer delta per sample,
/// and consumed at gesture end. Spans are captured once at gesture start;
/// every sample recomputes from those plus the current delta, so rejected
/// steps never accumulate drift. Dropping the session is the teardown —
/// there is no listener to leak.
#[derive(Debug)]
pub struct ResizeSession {
    widget_id: String,
    edge: ResizeEdge,
    row: u8,
    start_span: u8,
    /// Column one past the widget's right edge at gesture start. Anchors
    /// leading-edge free resizes.
    start_end: u8,
    /// Neighbor on the active side, with its gesture-start span.
    neighbor: Option<(String, u8)>,
    col_width: f64,
}

impl ResizeSession {
    /// Open a session for `widget_id`, grabbing `edge`, inside a container
    /// `container_width` pixels wide. Returns `None` when the widget does
    /// not exist; the caller treats that as a no-op gesture.
    pub fn begin(
        layout: &LayoutState,
        widget_id: &str,
        edge: ResizeEdge,
        container_width: f64,
    ) -> Option<Self> {
        let widget = layout.get(widget_id)?;
        let row = widget.row_index;
        let order = layout.row(row);
        let position = order.iter().position(|w| w.id == widget_id)?;

        let neighbor = match edge {
            ResizeEdge::Trailing => order.get(position + 1),
            ResizeEdge::Leading => position.checked_sub(1).and_then(|p| order.get(p)),
        }
        .map(|w| (w.id.clone(), w.col_span));

        let col_width = if container_width > 0.0 {
            container_width / GRID_COLS as f64
        } else {
            f64::INFINITY
        };

        Some(Self {
            widget_id: widget_id.to_string(),
            edge,
            row,
            start_span: widget.col_span,
            start_end: widget.col_end(),
            neighbor,
            col_width,
        })
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    /// Apply one pointer sample. `delta_px` is the cumulative horizontal
    /// displacement since gesture start, positive to the right.
    pub fn apply(&self, layout: &mut LayoutState, delta_px: f64) -> ResizeOutcome {
        let delta_cols = (delta_px / self.col_width).round() as i32;
        let candidate = match self.edge {
            ResizeEdge::Trailing => self.start_span as i32 + delta_cols,
            ResizeEdge::Leading => self.start_span as i32 - delta_cols,
        }
        .clamp(MIN_SPAN as i32, MAX_SPAN as i32) as u8;

        match &self.neighbor {
            Some((neighbor_id, neighbor_start)) => {
                // Combined span is conserved: the neighbor absorbs whatever
                // the dragged widget gives up, and vice versa.
                let combined = self.start_span as i32 + *neighbor_start as i32;
                let neighbor_span = combined - candidate as i32;
                if neighbor_span < MIN_SPAN as i32 {
                    return ResizeOutcome::Rejected;
                }
                self.apply_pair(layout, candidate, neighbor_id, neighbor_span as u8)
            }
            None => self.apply_free(layout, candidate),
        }
    }

    fn apply_pair(
        &self,
        layout: &mut LayoutState,
        candidate: u8,
        neighbor_id: &str,
        neighbor_span: u8,
    ) -> ResizeOutcome {
        let widget_offset = match layout.get(&self.widget_id) {
            Some(w) => w.col_offset,
            None => return ResizeOutcome::Rejected,
        };
        let neighbor_offset = match layout.get(neighbor_id) {
            Some(w) => w.col_offset,
            None => return ResizeOutcome::Rejected,
        };

        for widget in layout.widgets_mut() {
            if widget.id == self.widget_id {
                widget.col_span = candidate;
                if self.edge == ResizeEdge::Leading {
                    // Left neighbor keeps its offset; this widget slides to
                    // stay flush against the neighbor's new right edge.
                    widget.col_offset = neighbor_offset.saturating_add(neighbor_span);
                }
            } else if widget.id == neighbor_id {
                widget.col_span = neighbor_span;
                if self.edge == ResizeEdge::Trailing {
                    widget.col_offset = widget_offset.saturating_add(candidate);
                }
            }
        }
        ResizeOutcome::Applied
    }

    fn apply_free(&self, layout: &mut LayoutState, candidate: u8) -> ResizeOutcome {
        // No neighbor on the active side: resize freely within the span
        // bounds. The row total may drop below 12, leaving visual slack.
        let candidate = match self.edge {
            ResizeEdge::Trailing => candidate,
            // Keep the trailing edge fixed; the span cannot extend past the
            // left grid edge.
            ResizeEdge::Leading => candidate.min(self.start_end),
        };
        for widget in layout.widgets_mut() {
            if widget.id == self.widget_id {
                widget.col_span = candidate;
                if self.edge == ResizeEdge::Leading {
                    widget.col_offset = self.start_end - candidate;
                }
                return ResizeOutcome::Applied;
            }
        }
        ResizeOutcome::Rejected
    }
}
