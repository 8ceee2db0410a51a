//! Recyclable visual slots and what a delegate mounts into them.

use crate::app::edit_buffer::BufferId;
use crate::host::{NodeId, OutputElement, ResizeObserver, Subscription};
use notebook_core::{CellId, CellKind};

/// Template lookup key; one per cell kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Markdown,
    Code,
}

impl TemplateId {
    pub fn for_kind(kind: CellKind) -> Self {
        match kind {
            CellKind::Markdown => TemplateId::Markdown,
            CellKind::Code => TemplateId::Code,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u64);

/// Edit buffer mounted into a slot.
#[derive(Clone, Debug, PartialEq)]
pub struct MountedEditor {
    pub buffer: BufferId,
    pub line_count: usize,
    pub language: Option<String>,
}

/// One rendered output item.
#[derive(Clone, Debug, PartialEq)]
pub struct MountedOutput {
    pub node: NodeId,
    pub element: OutputElement,
    pub has_dynamic_height: bool,
}

/// Markdown slot: a content node for rendered HTML or the live preview, and an
/// editor node used only in edit mode.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkdownSlot {
    pub content_node: NodeId,
    pub editor_node: NodeId,
    pub rendered: Option<String>,
    pub editor: Option<MountedEditor>,
    pub preview: Option<String>,
}

/// Code slot: an always-mounted editor plus per-output nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeSlot {
    pub editor_node: NodeId,
    pub editor: Option<MountedEditor>,
    pub outputs: Vec<MountedOutput>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SlotContent {
    Markdown(MarkdownSlot),
    Code(CodeSlot),
}

/// Listener installed by `bind` and removed by `unbind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotListener {
    /// Re-render the live preview when this buffer changes.
    BufferPreview(BufferId),
}

/// A reusable visual slot.
///
/// Persistent nodes live as long as the slot. Nodes allocated by `bind`,
/// subscriptions and listeners belong to the bound cell and must be released by
/// `unbind`.
#[derive(Debug)]
pub struct TemplateSlot {
    pub(crate) id: SlotId,
    pub(crate) template: TemplateId,
    pub(crate) bound: Option<CellId>,
    pub(crate) content: SlotContent,
    pub(crate) bound_nodes: Vec<NodeId>,
    pub(crate) subscriptions: Vec<Subscription>,
    pub(crate) listeners: Vec<SlotListener>,
}

impl TemplateSlot {
    pub(crate) fn new(id: SlotId, template: TemplateId, content: SlotContent) -> Self {
        Self {
            id,
            template,
            bound: None,
            content,
            bound_nodes: Vec::new(),
            subscriptions: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn bound_cell(&self) -> Option<CellId> {
        self.bound
    }

    pub fn content(&self) -> &SlotContent {
        &self.content
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn listeners(&self) -> &[SlotListener] {
        &self.listeners
    }

    /// Nodes that outlive any single binding.
    pub fn persistent_nodes(&self) -> Vec<NodeId> {
        match &self.content {
            SlotContent::Markdown(slot) => vec![slot.content_node, slot.editor_node],
            SlotContent::Code(slot) => vec![slot.editor_node],
        }
    }

    /// Whether `node` belongs to this slot.
    pub fn owns_node(&self, node: NodeId) -> bool {
        self.bound_nodes.contains(&node) || self.persistent_nodes().contains(&node)
    }

    pub(crate) fn observe(&mut self, observer: &mut ResizeObserver, node: NodeId) {
        self.subscriptions.push(observer.observe(node));
    }

    /// Release everything the current binding created and reset mounted
    /// content. Safe to call on an unbound slot.
    pub(crate) fn release(&mut self, observer: &mut ResizeObserver) {
        for subscription in self.subscriptions.drain(..) {
            observer.unobserve(subscription);
        }
        for node in self.bound_nodes.drain(..) {
            observer.release_node(node);
        }
        for node in self.persistent_nodes() {
            observer.clear_size(node);
        }
        self.listeners.clear();
        self.bound = None;
        match &mut self.content {
            SlotContent::Markdown(slot) => {
                slot.rendered = None;
                slot.editor = None;
                slot.preview = None;
            }
            SlotContent::Code(slot) => {
                slot.editor = None;
                slot.outputs.clear();
            }
        }
    }
}
