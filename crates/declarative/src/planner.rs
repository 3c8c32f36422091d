//! Plan graph - resources plus ordering and notification edges

use crate::error::{Error, Result};
use crate::resource::{BoxedResource, Resource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Relation expressed by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// `from` must reach its desired state before `to` is applied
    Before,
    /// Ordering plus: when `from` changes, `to` is refreshed
    Notify,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::Notify => f.write_str("notifies"),
        }
    }
}

/// A directed edge between two resource ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// The resources for one convergence run and the edges between them
///
/// Building a plan is pure data assembly and never fails. Shape problems
/// (unknown ids, duplicates, cycles) surface from [`Plan::order`], before
/// any resource is touched.
#[derive(Default)]
pub struct Plan {
    resources: Vec<BoxedResource>,
    edges: Vec<Edge>,
}

impl Plan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, returning its id for use in edges
    pub fn add(&mut self, resource: BoxedResource) -> String {
        let id = resource.id();
        self.resources.push(resource);
        id
    }

    /// Declare that `from` must be applied before `to`
    pub fn before(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.push_edge(from.into(), to.into(), EdgeKind::Before);
    }

    /// Declare that `from` is applied before `to` and a change to `from`
    /// forces `to` to be refreshed
    pub fn notify(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.push_edge(from.into(), to.into(), EdgeKind::Notify);
    }

    fn push_edge(&mut self, from: String, to: String, kind: EdgeKind) {
        let edge = Edge { from, to, kind };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    /// Resources in insertion order
    pub fn resources(&self) -> &[BoxedResource] {
        &self.resources
    }

    /// All declared edges
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a resource by id
    pub fn get(&self, id: &str) -> Option<&dyn Resource> {
        self.resources
            .iter()
            .find(|r| r.id() == id)
            .map(AsRef::as_ref)
    }

    /// Ids refreshed when the given resource changes
    pub fn notify_targets<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.kind == EdgeKind::Notify && e.from == id)
            .map(|e| e.to.as_str())
    }

    /// Total number of resources in the plan
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in apply order
    ///
    /// Stable topological sort over both edge kinds: among resources whose
    /// predecessors are done, the one added first goes first.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateResource`, `UnknownResource` or `PlanCycle` for a
    /// malformed plan.
    pub fn order(&self) -> Result<Vec<&dyn Resource>> {
        Ok(self
            .ordered_indices()?
            .into_iter()
            .map(|i| self.resources[i].as_ref())
            .collect())
    }

    pub(crate) fn ordered_indices(&self) -> Result<Vec<usize>> {
        let ids: Vec<String> = self.resources.iter().map(|r| r.id()).collect();
        let mut index = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.as_str(), i).is_some() {
                return Err(Error::DuplicateResource { id: id.clone() });
            }
        }

        let lookup = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| Error::UnknownResource { id: id.to_string() })
        };

        let n = ids.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];
        for edge in &self.edges {
            let from = lookup(&edge.from)?;
            let to = lookup(&edge.to)?;
            successors[from].push(to);
            in_degree[to] += 1;
        }

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(next) = ready.pop_first() {
            order.push(next);
            for &succ in &successors[next] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.insert(succ);
                }
            }
        }

        if order.len() < n {
            let path = find_cycle(&successors, &in_degree)
                .into_iter()
                .map(|i| ids[i].clone())
                .collect();
            return Err(Error::PlanCycle { path });
        }

        Ok(order)
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("resources", &self.resources)
            .field("edges", &self.edges)
            .finish()
    }
}

/// Extract one cycle from the nodes the sort could not place.
///
/// Every unplaced node still has an unplaced predecessor, so walking
/// predecessors must revisit a node.
fn find_cycle(successors: &[Vec<usize>], in_degree: &[usize]) -> Vec<usize> {
    let n = successors.len();
    let unplaced = |i: usize| in_degree[i] > 0;

    let mut predecessor: Vec<Option<usize>> = vec![None; n];
    for (from, succs) in successors.iter().enumerate() {
        if !unplaced(from) {
            continue;
        }
        for &to in succs {
            if unplaced(to) && predecessor[to].is_none() {
                predecessor[to] = Some(from);
            }
        }
    }

    let Some(start) = (0..n).find(|&i| unplaced(i)) else {
        return Vec::new();
    };

    let mut seen = vec![false; n];
    let mut walk = Vec::new();
    let mut current = start;
    while !seen[current] {
        seen[current] = true;
        walk.push(current);
        match predecessor[current] {
            Some(p) => current = p,
            None => break,
        }
    }

    let pos = walk.iter().position(|&i| i == current).unwrap_or(0);
    let mut cycle = walk.split_off(pos);
    // Walked against the edges; flip to edge direction
    cycle.reverse();
    if let Some(&first) = cycle.first() {
        cycle.push(first);
    }
    cycle
}
