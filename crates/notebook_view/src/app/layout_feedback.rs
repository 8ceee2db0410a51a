//! Deferred height feedback from measured content into the virtual list.
//!
//! Reports are queued while a frame renders and applied on the following
//! frame, after re-resolving each cell's position by identity. Applying them
//! inline would re-enter the list while it is still laying out.

use super::view_cell::ViewCell;
use super::virtual_list::VirtualList;
use notebook_core::CellId;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingHeight {
    cell: CellId,
    height: f32,
}

/// Outcome of one drain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub applied: usize,
    pub dropped: usize,
}

#[derive(Debug)]
pub struct LayoutCoordinator {
    pending: Vec<PendingHeight>,
    coalesce: bool,
    trace: bool,
}

impl LayoutCoordinator {
    pub(crate) fn new(coalesce: bool, trace: bool) -> Self {
        Self {
            pending: Vec::new(),
            coalesce,
            trace,
        }
    }

    /// Schedule a height update for the next drain. Never touches the list.
    pub fn layout_element(&mut self, cell: CellId, height: f32) {
        if self.coalesce {
            if let Some(existing) = self.pending.iter_mut().find(|entry| entry.cell == cell) {
                existing.height = height;
                return;
            }
        }
        self.pending.push(PendingHeight { cell, height });
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Apply every scheduled update against the current cell order.
    ///
    /// Updates for cells that are gone, or whose list slot no longer matches,
    /// are dropped silently. A cell latches its height only once the list
    /// accepts it.
    pub(crate) fn drain(
        &mut self,
        cells: &mut [ViewCell],
        list: &mut dyn VirtualList,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        for entry in std::mem::take(&mut self.pending) {
            let Some(index) = cells.iter().position(|cell| cell.id() == entry.cell) else {
                debug!(cell = %entry.cell, "dropping height update for removed cell");
                report.dropped += 1;
                continue;
            };
            if list.update_dynamic_height(index, entry.cell, entry.height) {
                cells[index].latch_measured_height(entry.height);
                report.applied += 1;
            } else {
                debug!(cell = %entry.cell, index, "list slot moved; height update skipped");
                report.dropped += 1;
            }
        }
        if self.trace && (report.applied > 0 || report.dropped > 0) {
            info!(
                target: "notebook_view::layout_trace",
                applied = report.applied,
                dropped = report.dropped,
                "height feedback drained"
            );
        }
        report
    }
}
