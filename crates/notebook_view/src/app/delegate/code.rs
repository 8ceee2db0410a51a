//! Code delegate: an always-mounted editor plus one renderer per output.

use super::{
    mount_editor, structural_actions, CodeSlot, MountedOutput, RenderContext, RenderDelegate,
    SlotContent, SlotId, TemplateId, TemplateSlot,
};
use crate::app::edit_ops::{ContextAction, EditRequest, MoveDirection};
use crate::app::view_cell::ViewCell;
use crate::host::{OutputElement, ResizeObserver};
use crossbeam_channel::Sender;
use notebook_core::CELL_CHROME_MARGIN;
use tracing::warn;

pub(crate) struct CodeDelegate {
    requests: Sender<EditRequest>,
    line_height: f32,
}

impl CodeDelegate {
    pub(crate) fn new(requests: Sender<EditRequest>, line_height: f32) -> Self {
        Self {
            requests,
            line_height,
        }
    }
}

/// Height of an output whose size does not depend on layout.
pub(crate) fn intrinsic_height(element: &OutputElement, line_height: f32) -> f32 {
    element.display_text().lines().count().max(1) as f32 * line_height
}

impl RenderDelegate for CodeDelegate {
    fn produce_template(&self, id: SlotId, observer: &mut ResizeObserver) -> TemplateSlot {
        let content = SlotContent::Code(CodeSlot {
            editor_node: observer.create_node(),
            editor: None,
            outputs: Vec::new(),
        });
        TemplateSlot::new(id, TemplateId::Code, content)
    }

    fn bind(&self, cell: &mut ViewCell, slot: &mut TemplateSlot, ctx: &mut RenderContext<'_>) {
        let editor = mount_editor(cell);
        let mut outputs = Vec::new();
        for output in cell.outputs(ctx.document) {
            let rendered = ctx.outputs.render(output);
            let node = ctx.observer.create_node();
            slot.bound_nodes.push(node);
            outputs.push(MountedOutput {
                node,
                element: rendered.element,
                has_dynamic_height: rendered.has_dynamic_height,
            });
        }
        let SlotContent::Code(content) = &mut slot.content else {
            warn!(slot = ?slot.id, "code cell offered a non-code slot");
            return;
        };
        let editor_node = content.editor_node;
        let dynamic: Vec<_> = outputs
            .iter()
            .filter(|output| output.has_dynamic_height)
            .map(|output| output.node)
            .collect();
        content.editor = Some(editor);
        content.outputs = outputs;
        slot.observe(ctx.observer, editor_node);
        for node in dynamic {
            slot.observe(ctx.observer, node);
        }
        slot.bound = Some(cell.id());
    }

    fn buffer_changed(
        &self,
        cell: &mut ViewCell,
        slot: &mut TemplateSlot,
        _ctx: &mut RenderContext<'_>,
    ) {
        let Some(buffer) = cell.existing_buffer() else {
            return;
        };
        if let SlotContent::Code(CodeSlot {
            editor: Some(editor),
            ..
        }) = &mut slot.content
        {
            editor.line_count = buffer.line_count();
        }
    }

    fn measured_height(&self, slot: &TemplateSlot, observer: &ResizeObserver) -> Option<f32> {
        let SlotContent::Code(content) = &slot.content else {
            return None;
        };
        let mut height = observer.size(content.editor_node)?;
        for output in &content.outputs {
            let observed = output
                .has_dynamic_height
                .then(|| observer.size(output.node))
                .flatten();
            height += observed
                .unwrap_or_else(|| intrinsic_height(&output.element, self.line_height));
        }
        Some(height + CELL_CHROME_MARGIN)
    }

    fn context_actions(&self, _cell: &ViewCell) -> Vec<ContextAction> {
        let mut actions = structural_actions();
        actions.push(ContextAction::Move(MoveDirection::Up));
        actions.push(ContextAction::Move(MoveDirection::Down));
        actions
    }

    fn requests(&self) -> &Sender<EditRequest> {
        &self.requests
    }
}
