//! Coalesced size observation over visual nodes.
//!
//! The host reports node sizes as layout settles; observers receive at most one
//! change per node per drain, carrying the latest size, and only when that size
//! differs from the last one delivered for the current subscription.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Handle to one visual node owned by a template slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Live observation of a node. Consumed by [`ResizeObserver::unobserve`].
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    node: NodeId,
}

impl Subscription {
    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// One coalesced size change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeChange {
    pub node: NodeId,
    pub height: f32,
}

fn same_size(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.5
}

#[derive(Debug, Default)]
pub struct ResizeObserver {
    next_node: u64,
    sizes: HashMap<NodeId, f32>,
    // Last height delivered per observed node; `None` until the first delivery.
    observed: BTreeMap<NodeId, Option<f32>>,
    dirty: BTreeSet<NodeId>,
}

impl ResizeObserver {
    /// Allocate a fresh node with no known size.
    pub fn create_node(&mut self) -> NodeId {
        self.next_node = self.next_node.wrapping_add(1);
        NodeId(self.next_node)
    }

    /// Drop a node together with any size and observation attached to it.
    pub fn release_node(&mut self, node: NodeId) {
        self.sizes.remove(&node);
        self.observed.remove(&node);
        self.dirty.remove(&node);
    }

    /// Forget the size of a node that is about to show different content.
    pub fn clear_size(&mut self, node: NodeId) {
        self.sizes.remove(&node);
        self.dirty.remove(&node);
    }

    pub fn observe(&mut self, node: NodeId) -> Subscription {
        self.observed.insert(node, None);
        if self.sizes.contains_key(&node) {
            self.dirty.insert(node);
        }
        Subscription { node }
    }

    pub fn unobserve(&mut self, subscription: Subscription) {
        self.observed.remove(&subscription.node);
        self.dirty.remove(&subscription.node);
    }

    /// Host-side: record the laid-out height of a node.
    pub fn set_size(&mut self, node: NodeId, height: f32) {
        self.sizes.insert(node, height);
        match self.observed.get(&node) {
            Some(Some(delivered)) if same_size(*delivered, height) => {
                self.dirty.remove(&node);
            }
            Some(_) => {
                self.dirty.insert(node);
            }
            None => {}
        }
    }

    pub fn size(&self, node: NodeId) -> Option<f32> {
        self.sizes.get(&node).copied()
    }

    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observed.contains_key(&node)
    }

    /// Number of live subscriptions.
    pub fn active_observations(&self) -> usize {
        self.observed.len()
    }

    /// Drain pending changes in node order.
    pub fn take_changes(&mut self) -> Vec<SizeChange> {
        let dirty = std::mem::take(&mut self.dirty);
        let mut changes = Vec::with_capacity(dirty.len());
        for node in dirty {
            let Some(height) = self.sizes.get(&node).copied() else {
                continue;
            };
            if let Some(delivered) = self.observed.get_mut(&node) {
                *delivered = Some(height);
                changes.push(SizeChange { node, height });
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_sizes_coalesce_to_latest_value() {
        let mut observer = ResizeObserver::default();
        let node = observer.create_node();
        let _sub = observer.observe(node);

        observer.set_size(node, 10.0);
        observer.set_size(node, 20.0);
        observer.set_size(node, 30.0);
        assert_eq!(
            observer.take_changes(),
            vec![SizeChange { node, height: 30.0 }]
        );

        observer.set_size(node, 30.0);
        assert!(observer.take_changes().is_empty());

        observer.set_size(node, 40.0);
        observer.set_size(node, 30.0);
        assert!(observer.take_changes().is_empty());
    }

    #[test]
    fn unobserved_nodes_never_report() {
        let mut observer = ResizeObserver::default();
        let node = observer.create_node();
        let sub = observer.observe(node);
        observer.unobserve(sub);
        observer.set_size(node, 12.0);
        assert!(observer.take_changes().is_empty());
        assert_eq!(observer.active_observations(), 0);
        assert_eq!(observer.size(node), Some(12.0));
    }

    #[test]
    fn observing_a_sized_node_delivers_its_current_size() {
        let mut observer = ResizeObserver::default();
        let node = observer.create_node();
        observer.set_size(node, 8.0);
        let _sub = observer.observe(node);
        assert_eq!(observer.take_changes(), vec![SizeChange { node, height: 8.0 }]);
    }

    #[test]
    fn release_forgets_everything() {
        let mut observer = ResizeObserver::default();
        let node = observer.create_node();
        let _sub = observer.observe(node);
        observer.set_size(node, 5.0);
        observer.release_node(node);
        assert!(observer.take_changes().is_empty());
        assert!(!observer.is_observed(node));
        assert_eq!(observer.size(node), None);
    }
}
