//! Windowed, template-recycling list with dynamic item heights.

mod layout;

use super::delegate::{SlotId, TemplateId, TemplateSlot};
use layout::HeightIndex;
use notebook_core::CellId;
use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

/// One list entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
    pub cell: CellId,
    pub template: TemplateId,
    pub height: f32,
    /// The height is an estimate still waiting for a measurement.
    pub pending_measurement: bool,
}

/// Mutation surface the view core drives.
pub trait VirtualList {
    /// Replace `delete_count` items at `start` with `items`, returning the
    /// removed ones. Keeps the scroll anchor for unaffected items.
    fn splice(&mut self, start: usize, delete_count: usize, items: Vec<ListItem>) -> Vec<ListItem>;

    /// Patch one item's height and reflow the items after it.
    ///
    /// # Returns
    /// `false`, without changing anything, when `index` no longer holds `cell`.
    fn update_dynamic_height(&mut self, index: usize, cell: CellId, height: f32) -> bool;

    /// Resize the viewport.
    fn layout(&mut self, width: f32, height: f32);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_at(&self, index: usize) -> Option<CellId>;
}

/// Callbacks the list uses to fill and clear slots.
pub(crate) trait ListRenderer {
    fn produce_template(&mut self, template: TemplateId, id: SlotId) -> TemplateSlot;
    fn bind(&mut self, cell: CellId, slot: &mut TemplateSlot);
    fn unbind(&mut self, slot: &mut TemplateSlot);
}

/// A slot currently showing a cell.
#[derive(Debug)]
pub struct RenderedRow {
    cell: CellId,
    slot: TemplateSlot,
}

impl RenderedRow {
    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn slot(&self) -> &TemplateSlot {
        &self.slot
    }
}

/// Bind/unbind counts for one reconcile pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub bound: usize,
    pub unbound: usize,
    pub produced: usize,
}

#[derive(Clone, Copy, Debug)]
struct ScrollAnchor {
    cell: CellId,
    offset: f32,
}

#[derive(Debug)]
pub struct DynamicHeightList {
    items: Vec<ListItem>,
    heights: HeightIndex,
    rows: Vec<RenderedRow>,
    pool: HashMap<TemplateId, Vec<TemplateSlot>>,
    next_slot: u64,
    scroll_top: f32,
    width: f32,
    viewport_height: f32,
    overscan: f32,
}

impl DynamicHeightList {
    pub fn new(overscan: f32) -> Self {
        Self {
            items: Vec::new(),
            heights: HeightIndex::default(),
            rows: Vec::new(),
            pool: HashMap::new(),
            next_slot: 0,
            scroll_top: 0.0,
            width: 0.0,
            viewport_height: 0.0,
            overscan: overscan.max(0.0),
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Cell ids in list order.
    pub fn cells(&self) -> Vec<CellId> {
        self.items.iter().map(|item| item.cell).collect()
    }

    pub fn index_of(&self, cell: CellId) -> Option<usize> {
        self.items.iter().position(|item| item.cell == cell)
    }

    pub fn item_top(&self, index: usize) -> f32 {
        self.heights.top(index)
    }

    pub fn item_height(&self, index: usize) -> Option<f32> {
        self.heights.height(index)
    }

    pub fn total_height(&self) -> f32 {
        self.heights.total_height()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.viewport_height)
    }

    /// Rows bound during the last reconcile, in list order.
    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn slot_for(&self, cell: CellId) -> Option<&TemplateSlot> {
        self.rows
            .iter()
            .find(|row| row.cell == cell)
            .map(|row| &row.slot)
    }

    pub(crate) fn slot_for_mut(&mut self, cell: CellId) -> Option<&mut TemplateSlot> {
        self.rows
            .iter_mut()
            .find(|row| row.cell == cell)
            .map(|row| &mut row.slot)
    }

    /// Idle slots waiting for reuse.
    pub fn pooled_slots(&self) -> usize {
        self.pool.values().map(Vec::len).sum()
    }

    pub fn scroll_to(&mut self, top: f32) {
        self.scroll_top = top;
        self.clamp_scroll();
    }

    /// Item range that should be bound for the current viewport.
    pub fn visible_range(&self) -> Range<usize> {
        self.heights
            .visible_range(self.scroll_top, self.viewport_height, self.overscan)
    }

    fn clamp_scroll(&mut self) {
        let max_top = (self.heights.total_height() - self.viewport_height).max(0.0);
        self.scroll_top = self.scroll_top.clamp(0.0, max_top);
    }

    // No anchoring while pinned to the top, so inserts above the first item
    // stay in view.
    fn capture_anchor(&self) -> Option<ScrollAnchor> {
        if self.scroll_top <= 0.0 || self.items.is_empty() {
            return None;
        }
        let index = self.heights.index_at(self.scroll_top);
        Some(ScrollAnchor {
            cell: self.items[index].cell,
            offset: self.scroll_top - self.heights.top(index),
        })
    }

    fn restore_anchor(&mut self, anchor: Option<ScrollAnchor>) {
        if let Some(anchor) = anchor {
            if let Some(index) = self.index_of(anchor.cell) {
                let height = self.heights.height(index).unwrap_or(0.0);
                self.scroll_top = self.heights.top(index) + anchor.offset.min(height);
            }
        }
        self.clamp_scroll();
    }

    fn allocate_slot_id(&mut self) -> SlotId {
        self.next_slot = self.next_slot.wrapping_add(1);
        SlotId(self.next_slot)
    }

    /// Reconcile bound slots with the visible range.
    ///
    /// Rows whose cell stays visible keep their slot untouched; rows leaving
    /// the window are unbound and pooled; entering rows reuse a pooled slot of
    /// the right template or get a new one.
    pub(crate) fn render(&mut self, renderer: &mut dyn ListRenderer) -> RenderStats {
        let mut stats = RenderStats::default();
        let range = self.visible_range();
        let wanted: HashMap<CellId, usize> = self.items[range.clone()]
            .iter()
            .enumerate()
            .map(|(offset, item)| (item.cell, range.start + offset))
            .collect();

        let mut kept: Vec<(usize, RenderedRow)> = Vec::with_capacity(wanted.len());
        for mut row in std::mem::take(&mut self.rows) {
            let still_wanted = wanted
                .get(&row.cell)
                .filter(|index| self.items[**index].template == row.slot.template());
            match still_wanted {
                Some(index) => kept.push((*index, row)),
                None => {
                    renderer.unbind(&mut row.slot);
                    stats.unbound += 1;
                    self.pool
                        .entry(row.slot.template())
                        .or_default()
                        .push(row.slot);
                }
            }
        }

        for index in range {
            let item = &self.items[index];
            let (cell, template) = (item.cell, item.template);
            if kept.iter().any(|(_, row)| row.cell == cell) {
                continue;
            }
            let pooled = self.pool.get_mut(&template).and_then(Vec::pop);
            let mut slot = match pooled {
                Some(slot) => slot,
                None => {
                    let id = self.allocate_slot_id();
                    stats.produced += 1;
                    renderer.produce_template(template, id)
                }
            };
            renderer.bind(cell, &mut slot);
            stats.bound += 1;
            kept.push((index, RenderedRow { cell, slot }));
        }

        kept.sort_by_key(|(index, _)| *index);
        self.rows = kept.into_iter().map(|(_, row)| row).collect();
        if stats.bound > 0 || stats.unbound > 0 {
            debug!(
                bound = stats.bound,
                unbound = stats.unbound,
                produced = stats.produced,
                rows = self.rows.len(),
                "list window reconciled"
            );
        }
        stats
    }

    /// Unbind every row and return its slot to the pool.
    pub(crate) fn unbind_all(&mut self, renderer: &mut dyn ListRenderer) -> usize {
        let rows = std::mem::take(&mut self.rows);
        let count = rows.len();
        for mut row in rows {
            renderer.unbind(&mut row.slot);
            self.pool.entry(row.slot.template()).or_default().push(row.slot);
        }
        count
    }

    /// Unbind and rebind the slot showing `cell`, if it is rendered.
    pub(crate) fn rerender(&mut self, cell: CellId, renderer: &mut dyn ListRenderer) -> bool {
        let Some(slot) = self.slot_for_mut(cell) else {
            return false;
        };
        renderer.unbind(slot);
        renderer.bind(cell, slot);
        true
    }
}

impl VirtualList for DynamicHeightList {
    fn splice(&mut self, start: usize, delete_count: usize, items: Vec<ListItem>) -> Vec<ListItem> {
        let anchor = self.capture_anchor();
        let start = start.min(self.items.len());
        let end = start.saturating_add(delete_count).min(self.items.len());
        let inserted: Vec<f32> = items.iter().map(|item| item.height).collect();
        let removed: Vec<ListItem> = self.items.splice(start..end, items).collect();
        self.heights.splice(start, end - start, &inserted);
        self.restore_anchor(anchor);
        removed
    }

    fn update_dynamic_height(&mut self, index: usize, cell: CellId, height: f32) -> bool {
        match self.items.get(index) {
            Some(item) if item.cell == cell => {}
            _ => return false,
        }
        let anchor = self.capture_anchor();
        self.heights.set_height(index, height);
        if let Some(item) = self.items.get_mut(index) {
            item.height = height;
            item.pending_measurement = false;
        }
        self.restore_anchor(anchor);
        true
    }

    fn layout(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.clamp_scroll();
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn cell_at(&self, index: usize) -> Option<CellId> {
        self.items.get(index).map(|item| item.cell)
    }
}
