//! Arena-backed live tree: the editable mirror of a declarative tree.

use std::fmt;
use std::str::FromStr;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::instrument;

use crate::domain::controls::{make_option, Choice, ValueControl};
use crate::domain::entities::CombinatorKind;
use crate::domain::error::{DomainError, DomainResult};

/// Live combinator: carries its kind selector.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveConditional {
    pub kind_selector: Choice,
}

impl LiveConditional {
    pub fn new(kind: CombinatorKind) -> Self {
        let options = CombinatorKind::ALL_KINDS
            .iter()
            .map(|k| make_option(k.as_str(), k.label(), *k == kind))
            .collect();
        Self {
            kind_selector: Choice::new(options),
        }
    }

    pub fn kind(&self) -> DomainResult<CombinatorKind> {
        let selected = self.kind_selector.selected().unwrap_or_default();
        selected.parse()
    }

    pub fn set_kind(&mut self, kind: CombinatorKind) {
        self.kind_selector.select(kind.as_str());
    }
}

/// Live rule: field selector, operator selector and the trailing value controls.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRule {
    pub field: Choice,
    pub operator: Choice,
    /// The last control holds the effective value
    pub values: Vec<ValueControl>,
}

impl LiveRule {
    pub fn field_name(&self) -> &str {
        self.field.selected().unwrap_or_default()
    }

    pub fn operator_name(&self) -> &str {
        self.operator.selected().unwrap_or_default()
    }
}

/// Payload of a live node.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveContent {
    Conditional(LiveConditional),
    Rule(LiveRule),
}

impl fmt::Display for LiveContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveContent::Conditional(c) => match c.kind() {
                Ok(kind) => write!(f, "{} of the following conditions:", kind),
                Err(_) => write!(f, "? of the following conditions:"),
            },
            LiveContent::Rule(r) => {
                let values = r.values.iter().map(|v| v.value().to_string()).join(" ");
                write!(f, "{} {} {}", r.field_name(), r.operator_name(), values)
            }
        }
    }
}

/// Tree node in the arena-based live structure.
#[derive(Debug)]
pub struct LiveNode {
    pub content: LiveContent,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in document order
    pub children: Vec<Index>,
}

impl LiveNode {
    pub fn as_conditional(&self) -> Option<&LiveConditional> {
        match &self.content {
            LiveContent::Conditional(c) => Some(c),
            LiveContent::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&LiveRule> {
        match &self.content {
            LiveContent::Rule(r) => Some(r),
            LiveContent::Conditional(_) => None,
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self.content, LiveContent::Conditional(_))
    }
}

/// Position of a node as child offsets from the root: `/`, `/0`, `/0/2`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, position: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(position);
        Self(steps)
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.iter().join("/"))
    }
}

impl FromStr for NodePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('/')
            .ok_or_else(|| DomainError::InvalidPath {
                path: s.to_string(),
                reason: "must start with '/'".to_string(),
            })?;
        if body.is_empty() {
            return Ok(Self::root());
        }
        body.split('/')
            .map(|step| {
                step.parse::<usize>().map_err(|e| DomainError::InvalidPath {
                    path: s.to_string(),
                    reason: format!("'{}': {}", step, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Arena-based live tree.
///
/// Uses generational arena for memory-safe node references: indices of
/// detached nodes stop resolving instead of aliasing new nodes.
#[derive(Debug)]
pub struct LiveTree {
    arena: Arena<LiveNode>,
    root: Option<Index>,
}

impl Default for LiveTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Append a node under `parent` (or make it the root).
    #[instrument(level = "trace", skip(self, content))]
    pub fn insert_node(&mut self, content: LiveContent, parent: Option<Index>) -> DomainResult<Index> {
        if let Some(parent_idx) = parent {
            let parent_node = self.arena.get(parent_idx).ok_or(DomainError::NodeNotFound)?;
            if !parent_node.is_conditional() {
                return Err(DomainError::NotAConditional);
            }
        }

        let node_idx = self.arena.insert(LiveNode {
            content,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None => self.root = Some(node_idx),
        }
        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&LiveNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut LiveNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn conditional(&self, idx: Index) -> DomainResult<&LiveConditional> {
        self.get_node(idx)
            .ok_or(DomainError::NodeNotFound)?
            .as_conditional()
            .ok_or(DomainError::NotAConditional)
    }

    pub fn conditional_mut(&mut self, idx: Index) -> DomainResult<&mut LiveConditional> {
        match &mut self.get_node_mut(idx).ok_or(DomainError::NodeNotFound)?.content {
            LiveContent::Conditional(c) => Ok(c),
            LiveContent::Rule(_) => Err(DomainError::NotAConditional),
        }
    }

    pub fn rule(&self, idx: Index) -> DomainResult<&LiveRule> {
        self.get_node(idx)
            .ok_or(DomainError::NodeNotFound)?
            .as_rule()
            .ok_or(DomainError::NotARule)
    }

    pub fn rule_mut(&mut self, idx: Index) -> DomainResult<&mut LiveRule> {
        match &mut self.get_node_mut(idx).ok_or(DomainError::NodeNotFound)?.content {
            LiveContent::Rule(r) => Ok(r),
            LiveContent::Conditional(_) => Err(DomainError::NotARule),
        }
    }

    /// Detach `idx` and its whole subtree from the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, idx: Index) -> DomainResult<()> {
        let node = self.arena.get(idx).ok_or(DomainError::NodeNotFound)?;
        let parent = node.parent.ok_or(DomainError::RootRemoval)?;

        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.retain(|&child| child != idx);
        }

        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.arena.remove(current) {
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Resolve a node path to its arena index.
    pub fn resolve(&self, path: &NodePath) -> DomainResult<Index> {
        let mut current = self.root.ok_or(DomainError::EmptyTree)?;
        for &position in path.steps() {
            let node = self.get_node(current).ok_or(DomainError::NodeNotFound)?;
            current = *node
                .children
                .get(position)
                .ok_or_else(|| DomainError::InvalidPath {
                    path: path.to_string(),
                    reason: format!("no child at position {}", position),
                })?;
        }
        Ok(current)
    }

    /// Path of a node from the root.
    pub fn path_of(&self, idx: Index) -> DomainResult<NodePath> {
        let mut steps = Vec::new();
        let mut current = idx;
        while let Some(parent) = self.get_node(current).ok_or(DomainError::NodeNotFound)?.parent {
            let parent_node = self.get_node(parent).ok_or(DomainError::NodeNotFound)?;
            let position = parent_node
                .children
                .iter()
                .position(|&c| c == current)
                .ok_or(DomainError::NodeNotFound)?;
            steps.push(position);
            current = parent;
        }
        steps.reverse();
        Ok(NodePath(steps))
    }

    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Indices of all rule nodes in document order.
    pub fn rule_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| !node.is_conditional())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Pre-order, left-to-right traversal.
pub struct TreeIterator<'a> {
    tree: &'a LiveTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a LiveTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a LiveNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
