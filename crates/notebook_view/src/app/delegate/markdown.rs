//! Markdown delegate: rendered HTML, or buffer plus live preview in edit mode.

use super::{
    mount_editor, structural_actions, MarkdownSlot, RenderContext, RenderDelegate, SlotContent,
    SlotId, SlotListener, TemplateId, TemplateSlot,
};
use crate::app::edit_ops::{ContextAction, EditRequest, MoveDirection};
use crate::app::view_cell::ViewCell;
use crate::host::ResizeObserver;
use crossbeam_channel::Sender;
use notebook_core::CELL_CHROME_MARGIN;
use tracing::warn;

pub(crate) struct MarkdownDelegate {
    requests: Sender<EditRequest>,
}

impl MarkdownDelegate {
    pub(crate) fn new(requests: Sender<EditRequest>) -> Self {
        Self { requests }
    }
}

impl RenderDelegate for MarkdownDelegate {
    fn produce_template(&self, id: SlotId, observer: &mut ResizeObserver) -> TemplateSlot {
        let content = SlotContent::Markdown(MarkdownSlot {
            content_node: observer.create_node(),
            editor_node: observer.create_node(),
            rendered: None,
            editor: None,
            preview: None,
        });
        TemplateSlot::new(id, TemplateId::Markdown, content)
    }

    fn bind(&self, cell: &mut ViewCell, slot: &mut TemplateSlot, ctx: &mut RenderContext<'_>) {
        let SlotContent::Markdown(content) = &mut slot.content else {
            warn!(slot = ?slot.id, "markdown cell offered a non-markdown slot");
            return;
        };
        let content_node = content.content_node;
        let editor_node = content.editor_node;
        if cell.is_editing() {
            let editor = mount_editor(cell);
            let preview = ctx.markdown.render(&cell.edit_buffer().text());
            let buffer = editor.buffer;
            content.editor = Some(editor);
            content.preview = Some(preview);
            slot.listeners.push(SlotListener::BufferPreview(buffer));
            slot.observe(ctx.observer, editor_node);
        } else {
            content.rendered = cell.rendered_content(ctx.markdown).map(str::to_string);
        }
        slot.observe(ctx.observer, content_node);
        slot.bound = Some(cell.id());
    }

    fn buffer_changed(
        &self,
        cell: &mut ViewCell,
        slot: &mut TemplateSlot,
        ctx: &mut RenderContext<'_>,
    ) {
        let Some(buffer) = cell.existing_buffer() else {
            return;
        };
        let buffer_id = buffer.id();
        let line_count = buffer.line_count();
        let SlotContent::Markdown(content) = &mut slot.content else {
            return;
        };
        if let Some(editor) = content.editor.as_mut() {
            editor.line_count = line_count;
        }
        if slot.listeners.contains(&SlotListener::BufferPreview(buffer_id)) {
            content.preview = Some(ctx.markdown.render(&buffer.text()));
        }
    }

    fn measured_height(&self, slot: &TemplateSlot, observer: &ResizeObserver) -> Option<f32> {
        let SlotContent::Markdown(content) = &slot.content else {
            return None;
        };
        let mut height = observer.size(content.content_node)?;
        if content.editor.is_some() {
            height += observer.size(content.editor_node)?;
        }
        Some(height + CELL_CHROME_MARGIN)
    }

    fn context_actions(&self, _cell: &ViewCell) -> Vec<ContextAction> {
        let mut actions = structural_actions();
        actions.push(ContextAction::ToggleEditing);
        actions.push(ContextAction::Move(MoveDirection::Up));
        actions.push(ContextAction::Move(MoveDirection::Down));
        actions
    }

    fn requests(&self) -> &Sender<EditRequest> {
        &self.requests
    }
}
