use crate::collectors::collector::StatCollector;
use crate::collectors::reference::RefTable;
use crate::collectors::report::Report;
use anyhow::Result;
use rust_htslib::bam;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Handle to a node stored in a [`CollectorTree`]. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("Unknown collector node {0}")]
    UnknownNode(NodeId),
    #[error("Collector node {child} is already a child of {parent}")]
    DuplicateChild { parent: NodeId, child: NodeId },
    #[error("Adding {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

struct Node {
    collector: Box<dyn StatCollector>,
    children: Vec<NodeId>,
}

/// Arena of statistics collectors linked into a tree.
///
/// The arena owns every collector; a parent only records the ids of its
/// children, in insertion order. Feeding a record or asking for a report on
/// a node applies the node's own logic first and then each child's, in
/// order, so the whole subtree behaves as a single collector.
///
/// A node may be the child of several parents. Ingestion visits it once per
/// parent, while a report includes it (and its subtree) only once, at its
/// first position in pre-order. Cycles and duplicate siblings are rejected
/// when linking.
#[derive(Default)]
pub struct CollectorTree {
    nodes: Vec<Option<Node>>,
    stack: Vec<NodeId>,
}

impl CollectorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<C: StatCollector + 'static>(&mut self, collector: C) -> NodeId {
        self.insert_boxed(Box::new(collector))
    }

    pub fn insert_boxed(&mut self, collector: Box<dyn StatCollector>) -> NodeId {
        let id = NodeId(self.nodes.len());
        log::trace!("Inserted collector '{}' as {}", collector.name(), id);
        self.nodes.push(Some(Node {
            collector,
            children: Vec::new(),
        }));
        id
    }

    /// Take a collector out of the arena.
    ///
    /// Every link pointing at it is dropped. Its own children stay in the
    /// arena and keep any other parents they have.
    pub fn remove(&mut self, id: NodeId) -> Result<Box<dyn StatCollector>, TreeError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(TreeError::UnknownNode(id))?;

        for other in self.nodes.iter_mut().flatten() {
            other.children.retain(|&c| c != id);
        }
        log::trace!("Removed collector '{}' ({})", node.collector.name(), id);
        Ok(node.collector)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn collector(&self, id: NodeId) -> Option<&dyn StatCollector> {
        self.node(id).ok().map(|n| n.collector.as_ref())
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(&self.node(id)?.children)
    }

    /// Append `child` to the end of `parent`'s children
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.node(child)?;
        if self.node(parent)?.children.contains(&child) {
            return Err(TreeError::DuplicateChild { parent, child });
        }
        if parent == child || self.reaches(child, parent)? {
            return Err(TreeError::Cycle { parent, child });
        }

        self.node_mut(parent)?.children.push(child);
        log::trace!("Linked {} under {}", child, parent);
        Ok(())
    }

    /// Unlink the first occurrence of `child` from `parent`.
    ///
    /// Returns whether a link was removed; an absent child leaves the
    /// children untouched.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, TreeError> {
        let children = &mut self.node_mut(parent)?.children;
        match children.iter().position(|&c| c == child) {
            Some(index) => {
                children.remove(index);
                log::trace!("Unlinked {} from {}", child, parent);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Feed one alignment to `root` and every node below it, in pre-order.
    ///
    /// The first collector error aborts the walk; nodes not yet visited do
    /// not see this record.
    pub fn process_alignment(
        &mut self,
        root: NodeId,
        record: &bam::Record,
        refs: &RefTable,
    ) -> Result<()> {
        let mut stack = std::mem::take(&mut self.stack);
        stack.clear();
        stack.push(root);
        let result = self.ingest(&mut stack, record, refs);
        self.stack = stack;
        result
    }

    fn ingest(&mut self, stack: &mut Vec<NodeId>, record: &bam::Record, refs: &RefTable) -> Result<()> {
        while let Some(id) = stack.pop() {
            let node = self.node_mut(id)?;
            node.collector.process_alignment(record, refs)?;
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(())
    }

    /// Assemble the statistics of `root` and its descendants.
    ///
    /// Fields are written into `report` when given, otherwise into a new
    /// empty report. Nodes write in the same pre-order used for ingestion;
    /// a node reachable through several parents writes only on its first visit.
    pub fn build_report(&self, root: NodeId, report: Option<Report>) -> Result<Report> {
        let mut report = report.unwrap_or_default();
        let mut emitted = HashSet::new();
        self.emit(root, &mut report, &mut emitted)?;
        Ok(report)
    }

    fn emit(&self, id: NodeId, report: &mut Report, emitted: &mut HashSet<NodeId>) -> Result<()> {
        let node = self.node(id)?;
        if !emitted.insert(id) {
            return Ok(());
        }
        match node.collector.nested_section() {
            Some(key) => {
                let mut nested = Report::new();
                self.emit_subtree(node, &mut nested, emitted)?;
                report.insert(key, nested)?;
            }
            None => self.emit_subtree(node, report, emitted)?,
        }
        Ok(())
    }

    fn emit_subtree(
        &self,
        node: &Node,
        report: &mut Report,
        emitted: &mut HashSet<NodeId>,
    ) -> Result<()> {
        node.collector.append_json(report)?;
        for &child in &node.children {
            self.emit(child, report, emitted)?;
        }
        Ok(())
    }

    /// Ids of `root` and its descendants in traversal order
    pub fn preorder(&self, root: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id)?.children.iter().rev().copied());
        }
        Ok(order)
    }

    fn reaches(&self, from: NodeId, target: NodeId) -> Result<bool, TreeError> {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return Ok(true);
            }
            if seen.insert(id) {
                stack.extend_from_slice(&self.node(id)?.children);
            }
        }
        Ok(false)
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownNode(id))
    }
}
