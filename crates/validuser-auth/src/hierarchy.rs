//! Domain closure resolution.
//!
//! Resolution rules:
//! - Only nodes reachable from an active root through active parents count.
//!   Anything under an inactive, missing, or cyclic ancestor is ignored.
//! - The closure of a reachable home domain is its ancestor chain (itself
//!   included) plus every reachable descendant.
//! - An unknown or unreachable home domain yields an empty closure.

use std::collections::{BTreeSet, HashMap, VecDeque};

use validuser_entity::{DomainGraph, DomainId, DomainNode};

/// The reachable part of the active domain forest.
#[derive(Debug, Clone, Default)]
pub struct DomainHierarchy {
    /// Parent of every reachable node; `None` for roots.
    parents: HashMap<DomainId, Option<DomainId>>,
    /// Reachable children of every reachable node.
    children: HashMap<DomainId, Vec<DomainId>>,
}

impl DomainHierarchy {
    /// Builds the hierarchy by walking down from every active root.
    ///
    /// Inactive nodes passed in are skipped.
    pub fn build(nodes: &[DomainNode]) -> Self {
        let mut by_parent: HashMap<DomainId, Vec<DomainId>> = HashMap::new();
        let mut queue = VecDeque::new();

        for node in nodes.iter().filter(|n| n.is_active()) {
            match node.parent_id {
                Some(parent) => by_parent.entry(parent).or_default().push(node.id),
                None => queue.push_back((node.id, None)),
            }
        }

        let mut hierarchy = Self::default();
        while let Some((id, parent)) = queue.pop_front() {
            if hierarchy.parents.contains_key(&id) {
                continue;
            }
            hierarchy.parents.insert(id, parent);
            if let Some(parent) = parent {
                hierarchy.children.entry(parent).or_default().push(id);
            }
            for &child in by_parent.get(&id).into_iter().flatten() {
                queue.push_back((child, Some(id)));
            }
        }

        hierarchy
    }

    /// Whether `id` is reachable from an active root.
    pub fn contains(&self, id: DomainId) -> bool {
        self.parents.contains_key(&id)
    }

    /// `home` and all of its ancestors up to the root.
    pub fn ancestors(&self, home: DomainId) -> BTreeSet<DomainId> {
        let mut chain = BTreeSet::new();
        let mut current = self.contains(home).then_some(home);
        while let Some(id) = current {
            if !chain.insert(id) {
                break;
            }
            current = self.parents.get(&id).copied().flatten();
        }
        chain
    }

    /// `home` and every reachable node below it.
    pub fn descendants(&self, home: DomainId) -> BTreeSet<DomainId> {
        let mut found = BTreeSet::new();
        if !self.contains(home) {
            return found;
        }

        let mut stack = vec![home];
        while let Some(id) = stack.pop() {
            if found.insert(id) {
                stack.extend(self.children.get(&id).into_iter().flatten().copied());
            }
        }
        found
    }

    /// Ancestor chain and descendants of `home`, in ascending order.
    pub fn closure(&self, home: DomainId) -> BTreeSet<DomainId> {
        let mut closure = self.ancestors(home);
        closure.extend(self.descendants(home));
        closure
    }
}

/// Resolves the domain closure for a loaded graph.
pub fn resolve_closure(graph: &DomainGraph) -> BTreeSet<DomainId> {
    let Some(home) = graph.home else {
        return BTreeSet::new();
    };
    DomainHierarchy::build(&graph.nodes).closure(home)
}
