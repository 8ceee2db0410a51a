//! Render delegates: per-kind template production, binding, and measurement.

mod code;
mod markdown;
pub mod template;

pub(crate) use code::CodeDelegate;
pub(crate) use markdown::MarkdownDelegate;
pub use template::{
    CodeSlot, MarkdownSlot, MountedEditor, MountedOutput, SlotContent, SlotId, SlotListener,
    TemplateId, TemplateSlot,
};

use super::edit_ops::{ContextAction, EditRequest, InsertDirection};
use super::layout_feedback::LayoutCoordinator;
use super::view_cell::ViewCell;
use crate::host::{MarkdownRenderer, OutputRegistry, ResizeObserver};
use crossbeam_channel::Sender;
use notebook_core::{CellId, CellKind, NotebookDocument, NotebookError};

/// Collaborators a delegate needs while binding.
pub(crate) struct RenderContext<'a> {
    pub(crate) observer: &'a mut ResizeObserver,
    pub(crate) markdown: &'a dyn MarkdownRenderer,
    pub(crate) outputs: &'a OutputRegistry,
    pub(crate) document: Option<&'a NotebookDocument>,
}

pub(crate) trait RenderDelegate {
    /// Build a fresh slot. Slots are recycled across cells.
    fn produce_template(&self, id: SlotId, observer: &mut ResizeObserver) -> TemplateSlot;

    /// Mount `cell` into `slot`. The slot is always unbound on entry.
    fn bind(&self, cell: &mut ViewCell, slot: &mut TemplateSlot, ctx: &mut RenderContext<'_>);

    /// Tear down everything `bind` installed.
    fn unbind(&self, slot: &mut TemplateSlot, observer: &mut ResizeObserver) {
        slot.release(observer);
    }

    /// Refresh mounted state after the cell's edit buffer changed.
    fn buffer_changed(
        &self,
        cell: &mut ViewCell,
        slot: &mut TemplateSlot,
        ctx: &mut RenderContext<'_>,
    );

    /// Whole-cell height from the slot's observed node sizes, once known.
    fn measured_height(&self, slot: &TemplateSlot, observer: &ResizeObserver) -> Option<f32>;

    /// Forward a measured height. Never touches the list directly.
    fn report_height_change(&self, cell: CellId, height: f32, coordinator: &mut LayoutCoordinator) {
        coordinator.layout_element(cell, height);
    }

    fn context_actions(&self, cell: &ViewCell) -> Vec<ContextAction>;

    fn requests(&self) -> &Sender<EditRequest>;

    fn request_structural_edit(
        &self,
        anchor: CellId,
        kind: CellKind,
        direction: InsertDirection,
    ) -> Result<(), NotebookError> {
        self.requests()
            .send(EditRequest::Insert {
                anchor,
                kind,
                direction,
            })
            .map_err(|_| NotebookError::BackendUnavailable)
    }

    fn request_delete(&self, anchor: CellId) -> Result<(), NotebookError> {
        self.requests()
            .send(EditRequest::Delete { cell: anchor })
            .map_err(|_| NotebookError::BackendUnavailable)
    }

    /// Turn a context-menu choice into a request.
    fn on_context_action(
        &self,
        cell: &ViewCell,
        action: ContextAction,
    ) -> Result<(), NotebookError> {
        match action {
            ContextAction::Insert { kind, direction } => {
                self.request_structural_edit(cell.id(), kind, direction)
            }
            ContextAction::Delete => self.request_delete(cell.id()),
            ContextAction::ToggleEditing => self
                .requests()
                .send(EditRequest::ToggleEditing { cell: cell.id() })
                .map_err(|_| NotebookError::BackendUnavailable),
            ContextAction::Move(direction) => self
                .requests()
                .send(EditRequest::Move {
                    cell: cell.id(),
                    direction,
                })
                .map_err(|_| NotebookError::BackendUnavailable),
        }
    }
}

/// Insert and delete entries shared by every cell kind.
fn structural_actions() -> Vec<ContextAction> {
    let mut actions = Vec::with_capacity(7);
    for kind in [CellKind::Code, CellKind::Markdown] {
        for direction in [InsertDirection::Above, InsertDirection::Below] {
            actions.push(ContextAction::Insert { kind, direction });
        }
    }
    actions.push(ContextAction::Delete);
    actions
}

/// Mount the cell's edit buffer, creating it on first use.
fn mount_editor(cell: &mut ViewCell) -> MountedEditor {
    let buffer = cell.edit_buffer();
    MountedEditor {
        buffer: buffer.id(),
        line_count: buffer.line_count(),
        language: buffer.language().map(str::to_string),
    }
}

/// The delegate set, looked up once per cell by template id.
pub(crate) struct DelegateSet {
    markdown: MarkdownDelegate,
    code: CodeDelegate,
}

impl DelegateSet {
    pub(crate) fn new(requests: Sender<EditRequest>, line_height: f32) -> Self {
        Self {
            markdown: MarkdownDelegate::new(requests.clone()),
            code: CodeDelegate::new(requests, line_height),
        }
    }

    pub(crate) fn get(&self, template: TemplateId) -> &dyn RenderDelegate {
        match template {
            TemplateId::Markdown => &self.markdown,
            TemplateId::Code => &self.code,
        }
    }

    pub(crate) fn for_cell(&self, cell: &ViewCell) -> &dyn RenderDelegate {
        self.get(TemplateId::for_kind(cell.kind()))
    }
}
