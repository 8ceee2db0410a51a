//! Notebook editor view core: cell view state, delegates, list, and feedback loop.

mod delegate;
mod edit_buffer;
mod edit_ops;
mod layout_feedback;
mod state_ops;
mod view_cell;
mod virtual_list;

#[cfg(test)]
mod tests;

pub use delegate::{
    CodeSlot, MarkdownSlot, MountedEditor, MountedOutput, SlotContent, SlotId, SlotListener,
    TemplateId, TemplateSlot,
};
pub use edit_buffer::{BufferId, EditBuffer};
pub use edit_ops::{ContextAction, EditRequest, InsertDirection, MoveDirection};
pub use layout_feedback::{DrainReport, LayoutCoordinator};
pub use state_ops::{FrameReport, InputStatus};
pub use view_cell::ViewCell;
pub use virtual_list::{DynamicHeightList, ListItem, RenderStats, RenderedRow, VirtualList};

use crate::backend::BackendHandle;
use crate::host::{CommonMarkRenderer, MarkdownRenderer, OutputRegistry, ResizeObserver};
use crossbeam_channel::{unbounded, Receiver};
use delegate::{DelegateSet, RenderContext};
use notebook_core::{CellId, Config, NotebookDocument};
use tracing::warn;
use virtual_list::ListRenderer;

/// Top-level notebook view.
///
/// Owns the backing document, one [`ViewCell`] per backing record, and the
/// virtual list showing them. The three stay in the same order outside a
/// single structural edit.
pub struct NotebookEditor {
    config: Config,
    backend: BackendHandle,
    input_status: InputStatus,
    document: Option<NotebookDocument>,
    detached: Option<NotebookDocument>,
    cells: Vec<ViewCell>,
    list: DynamicHeightList,
    delegates: DelegateSet,
    coordinator: LayoutCoordinator,
    observer: ResizeObserver,
    markdown: Box<dyn MarkdownRenderer>,
    outputs: OutputRegistry,
    edit_rx: Receiver<EditRequest>,
}

impl NotebookEditor {
    /// Build an empty editor using the CommonMark renderer and the default
    /// output registry.
    pub fn new(config: Config, backend: BackendHandle) -> Self {
        Self::with_collaborators(
            config,
            backend,
            Box::new(CommonMarkRenderer::default()),
            OutputRegistry::default(),
        )
    }

    pub fn with_collaborators(
        config: Config,
        backend: BackendHandle,
        markdown: Box<dyn MarkdownRenderer>,
        outputs: OutputRegistry,
    ) -> Self {
        let (edit_tx, edit_rx) = unbounded();
        Self {
            delegates: DelegateSet::new(edit_tx, config.line_height),
            coordinator: LayoutCoordinator::new(config.coalesce_heights, config.layout_trace),
            list: DynamicHeightList::new(config.overscan_px),
            config,
            backend,
            input_status: InputStatus::Idle,
            document: None,
            detached: None,
            cells: Vec::new(),
            observer: ResizeObserver::default(),
            markdown,
            outputs,
            edit_rx,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The displayed backing document, once an input has resolved.
    pub fn document(&self) -> Option<&NotebookDocument> {
        self.document.as_ref()
    }

    /// Take the document most recently replaced by `set_input`, already saved.
    pub fn take_detached_document(&mut self) -> Option<NotebookDocument> {
        self.detached.take()
    }

    pub fn cells(&self) -> &[ViewCell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&ViewCell> {
        self.cells.iter().find(|cell| cell.id() == id)
    }

    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.iter().map(ViewCell::id).collect()
    }

    pub fn list(&self) -> &DynamicHeightList {
        &self.list
    }

    pub fn observer(&self) -> &ResizeObserver {
        &self.observer
    }

    /// Height updates waiting for the next frame.
    pub fn pending_height_updates(&self) -> usize {
        self.coordinator.pending_len()
    }

    pub fn input_status(&self) -> &InputStatus {
        &self.input_status
    }

    fn list_item(&self, cell: &ViewCell) -> ListItem {
        ListItem {
            cell: cell.id(),
            template: TemplateId::for_kind(cell.kind()),
            height: cell.height(self.config.line_height),
            pending_measurement: cell.has_pending_measurement(),
        }
    }

    /// Language for code cells: the document's own, else the configured default.
    fn code_language(&self) -> String {
        self.document
            .as_ref()
            .and_then(|document| document.metadata.language.clone())
            .unwrap_or_else(|| self.config.default_language.clone())
    }

    fn position(&self, id: CellId) -> Option<usize> {
        self.cells.iter().position(|cell| cell.id() == id)
    }

    /// Run `f` with the list and a renderer over the disjoint editor fields.
    fn with_renderer<R>(
        &mut self,
        f: impl FnOnce(&mut DynamicHeightList, &mut CellRenderer<'_>) -> R,
    ) -> R {
        let Self {
            list,
            cells,
            delegates,
            observer,
            markdown,
            outputs,
            document,
            ..
        } = self;
        let mut renderer = CellRenderer {
            cells,
            delegates,
            ctx: RenderContext {
                observer,
                markdown: &**markdown,
                outputs,
                document: document.as_ref(),
            },
        };
        f(list, &mut renderer)
    }

    fn render_window(&mut self) -> RenderStats {
        self.with_renderer(|list, renderer| list.render(renderer))
    }

    fn rerender_cell(&mut self, cell: CellId) -> bool {
        self.with_renderer(|list, renderer| list.rerender(cell, renderer))
    }
}

/// Bridges list callbacks to the delegate chosen by each cell's kind.
struct CellRenderer<'a> {
    cells: &'a mut [ViewCell],
    delegates: &'a DelegateSet,
    ctx: RenderContext<'a>,
}

impl ListRenderer for CellRenderer<'_> {
    fn produce_template(&mut self, template: TemplateId, id: SlotId) -> TemplateSlot {
        self.delegates
            .get(template)
            .produce_template(id, self.ctx.observer)
    }

    fn bind(&mut self, cell: CellId, slot: &mut TemplateSlot) {
        let Some(view) = self.cells.iter_mut().find(|view| view.id() == cell) else {
            warn!(%cell, "list asked to bind a cell the editor does not hold");
            return;
        };
        self.delegates.for_cell(view).bind(view, slot, &mut self.ctx);
    }

    fn unbind(&mut self, slot: &mut TemplateSlot) {
        self.delegates
            .get(slot.template())
            .unbind(slot, self.ctx.observer);
    }
}
