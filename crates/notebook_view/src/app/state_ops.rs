//! Input switching, backend event handling, and the per-frame loop.

use super::virtual_list::{ListItem, VirtualList};
use super::{NotebookEditor, ViewCell};
use crate::backend::{CoreCmd, CoreEvent, DocumentSource, InputId};
use crate::host::{HeadlessMeasurer, NodeId};
use crossbeam_channel::RecvTimeoutError;
use notebook_core::{CellId, NotebookDocument, NotebookError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Progress of the latest `set_input` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputStatus {
    Idle,
    Pending(InputId),
    Ready(InputId),
    Failed { input: InputId, message: String },
}

/// What one frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub edits_applied: usize,
    pub edits_failed: usize,
    pub inputs_completed: usize,
    pub heights_applied: usize,
    pub heights_dropped: usize,
    pub bound: usize,
    pub unbound: usize,
    pub heights_scheduled: usize,
}

impl FrameReport {
    /// Nothing changed and nothing is queued.
    pub fn is_quiet(&self) -> bool {
        *self == FrameReport::default()
    }
}

impl NotebookEditor {
    /// Ask the backend to resolve a new input.
    ///
    /// The current document stays on screen until the new one resolves. Any
    /// earlier request still in flight becomes stale.
    ///
    /// # Returns
    /// The id of the new request.
    ///
    /// # Errors
    /// Returns [`NotebookError::BackendUnavailable`] when the worker is gone.
    pub fn set_input(&mut self, source: DocumentSource) -> Result<InputId, NotebookError> {
        let input = InputId::next();
        debug!(%input, source = %source.describe(), "requesting document");
        self.backend
            .cmd_tx
            .send(CoreCmd::ResolveDocument { input, source })
            .map_err(|_| NotebookError::BackendUnavailable)?;
        self.input_status = InputStatus::Pending(input);
        Ok(input)
    }

    /// Request a new input and wait until it is built and rendered.
    ///
    /// # Errors
    /// Returns [`NotebookError::Resolve`] when loading fails (the previous
    /// document stays displayed), [`NotebookError::Timeout`] after the
    /// configured wait, or [`NotebookError::BackendUnavailable`].
    pub fn set_input_blocking(&mut self, source: DocumentSource) -> Result<(), NotebookError> {
        self.set_input(source)?;
        let deadline = Instant::now() + self.config.resolve_timeout();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let event = match self.backend.evt_rx.recv_timeout(remaining) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => return Err(NotebookError::Timeout),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(NotebookError::BackendUnavailable)
                }
            };
            // Answers for earlier inputs are ignored; keep waiting for ours.
            if !self.apply_event(event) {
                continue;
            }
            if let InputStatus::Failed { message, .. } = &self.input_status {
                return Err(NotebookError::Resolve(message.clone()));
            }
            self.render_window();
            return Ok(());
        }
    }

    /// Apply one backend event.
    ///
    /// # Returns
    /// `true` when the event completed the latest input request.
    pub(crate) fn apply_event(&mut self, event: CoreEvent) -> bool {
        let input = event.input();
        if self.input_status != InputStatus::Pending(input) {
            debug!(%input, "ignoring stale document resolution");
            return false;
        }
        match event {
            CoreEvent::DocumentResolved { input, document } => {
                self.install_document(document);
                self.input_status = InputStatus::Ready(input);
            }
            CoreEvent::ResolveFailed { input, message } => {
                warn!(%input, "input failed to resolve; keeping current document: {}", message);
                self.input_status = InputStatus::Failed { input, message };
            }
        }
        true
    }

    fn install_document(&mut self, document: NotebookDocument) {
        if self.document.as_ref().map(NotebookDocument::id) == Some(document.id()) {
            debug!(document = %document.id(), "document already displayed");
            return;
        }
        self.save_all();
        self.teardown();
        self.detached = self.document.take();

        let language = document
            .metadata
            .language
            .clone()
            .unwrap_or_else(|| self.config.default_language.clone());
        self.cells = document
            .cells()
            .iter()
            .map(|record| ViewCell::from_record(record, Some(language.clone())))
            .collect();
        let items: Vec<ListItem> = self.cells.iter().map(|cell| self.list_item(cell)).collect();
        info!(document = %document.id(), cells = self.cells.len(), "document installed");
        self.document = Some(document);
        self.list.splice(0, 0, items);
    }

    /// Unbind every slot, dispose every buffer, and empty the list.
    fn teardown(&mut self) {
        self.with_renderer(|list, renderer| list.unbind_all(renderer));
        let mut released = 0;
        for cell in &mut self.cells {
            if cell.dispose() {
                released += 1;
            }
        }
        let len = self.list.len();
        self.list.splice(0, len, Vec::new());
        self.cells.clear();
        debug!(released_buffers = released, "view torn down");
    }

    /// One event-loop turn.
    pub fn pump(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        while let Ok(request) = self.edit_rx.try_recv() {
            match self.apply_edit_request(request.clone()) {
                Ok(()) => report.edits_applied += 1,
                Err(err) => {
                    warn!(?request, "edit request failed: {}", err);
                    report.edits_failed += 1;
                }
            }
        }

        while let Ok(event) = self.backend.evt_rx.try_recv() {
            if self.apply_event(event) {
                report.inputs_completed += 1;
            }
        }

        let drained = self.coordinator.drain(&mut self.cells, &mut self.list);
        report.heights_applied = drained.applied;
        report.heights_dropped = drained.dropped;

        let stats = self.render_window();
        report.bound = stats.bound;
        report.unbound = stats.unbound;

        report.heights_scheduled = self.collect_measurements();
        report
    }

    /// Turn observed size changes into height reports for the next frame.
    fn collect_measurements(&mut self) -> usize {
        let changes = self.observer.take_changes();
        let mut touched: Vec<CellId> = Vec::new();
        for change in changes {
            let owner = self
                .list
                .rows()
                .iter()
                .find(|row| row.slot().owns_node(change.node))
                .map(|row| row.cell());
            if let Some(cell) = owner {
                if !touched.contains(&cell) {
                    touched.push(cell);
                }
            }
        }

        let mut scheduled = 0;
        for cell in touched {
            let Some(slot) = self.list.slot_for(cell) else {
                continue;
            };
            let delegate = self.delegates.get(slot.template());
            let Some(height) = delegate.measured_height(slot, &self.observer) else {
                continue;
            };
            let unchanged = self.cell(cell).is_some_and(|view| {
                !view.has_pending_measurement()
                    && (view.height(self.config.line_height) - height).abs() < 0.5
            });
            if unchanged {
                continue;
            }
            delegate.report_height_change(cell, height, &mut self.coordinator);
            scheduled += 1;
        }
        scheduled
    }

    /// Resize the viewport and re-render the window.
    pub fn layout(&mut self, width: f32, height: f32) {
        self.list.layout(width, height);
        self.render_window();
    }

    pub fn scroll_to(&mut self, top: f32) {
        self.list.scroll_to(top);
        self.render_window();
    }

    /// Save every cell and leave edit mode before the view is detached.
    pub fn on_hide(&mut self) {
        self.save_all();
        let mut editing = Vec::new();
        for cell in self.cells.iter_mut().filter(|cell| cell.is_editing()) {
            cell.set_editing(false);
            editing.push(cell.id());
        }
        for cell in &editing {
            self.rerender_cell(*cell);
        }
        debug!(left_editing = editing.len(), "editor hidden");
    }

    /// Report a node's rendered height, as a host renderer would.
    pub fn report_node_size(&mut self, node: NodeId, height: f32) {
        self.observer.set_size(node, height);
    }

    /// Measure every bound slot with `measurer` and report the sizes.
    ///
    /// # Returns
    /// How many node sizes were reported.
    pub fn measure_with(&mut self, measurer: &HeadlessMeasurer) -> usize {
        let (width, _) = self.list.viewport();
        let mut sizes = Vec::new();
        for row in self.list.rows() {
            if let Some(cell) = self.cell(row.cell()) {
                sizes.extend(measurer.measure_slot(row.slot(), cell, width));
            }
        }
        let reported = sizes.len();
        for (node, height) in sizes {
            self.observer.set_size(node, height);
        }
        reported
    }

    /// Pump and measure until a frame changes nothing, up to `max_frames`.
    ///
    /// # Returns
    /// The number of frames run.
    pub fn run_until_settled(&mut self, measurer: &HeadlessMeasurer, max_frames: usize) -> usize {
        for frame in 1..=max_frames {
            self.measure_with(measurer);
            let report = self.pump();
            if report.is_quiet() && self.coordinator.pending_len() == 0 {
                return frame;
            }
        }
        warn!(max_frames, "layout did not settle");
        max_frames
    }
}
