//! Tree: arena-backed node storage for the layout engine.
//!
//! Nodes live in a flat `Vec` and reference each other by [`NodeId`], so
//! the tree is a strict tree by construction: children hold no back
//! references beyond a parent id used for dirty marking, and no cycles
//! can form.
//!
//! The tree is owned by the caller and handed to
//! [`Renderer::render`](crate::Renderer::render) once per frame. Mutation
//! goes through this API so content changes that do not move any bounds
//! still get their region repainted.

use crate::layout::Bounds;
use crate::style::Style;

/// Identifier of a node inside a [`Tree`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The two node kinds.
///
/// The variant set is closed: every consumer matches exhaustively.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A styled rectangular region with ordered children.
    Box {
        /// Child nodes, in paint and layout order.
        children: Vec<NodeId>,
    },
    /// A run of text.
    Text {
        /// The text content; may contain line breaks.
        content: String,
    },
}

/// A single node: kind, style, and the layout slots owned by the layout
/// engine.
#[derive(Clone, Debug)]
pub struct Node {
    /// Box or text payload.
    pub kind: NodeKind,
    /// Style; `Style::default()` means unstyled.
    pub style: Style,
    /// Parent node, if any.
    pub parent: Option<NodeId>,
    /// Bounds committed by the current layout pass.
    pub layout: Bounds,
    /// Bounds committed by the previous frame's pass.
    pub previous_layout: Option<Bounds>,
    /// Set by mutations; consumed by the commit pass to mark this node's
    /// region dirty even when its bounds did not move.
    pub(crate) needs_paint: bool,
    /// Detached from the tree (its arena slot is retired).
    pub(crate) detached: bool,
}

/// Arena of nodes plus the root reference.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node, if one was inserted.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Borrow a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Borrow a node mutably.
    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of live (attached) nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| !n.detached).count()
    }

    /// Whether the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, kind: NodeKind, style: Style, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            kind,
            style,
            parent,
            layout: Bounds::ZERO,
            previous_layout: None,
            needs_paint: true,
            detached: false,
        });
        match parent {
            Some(p) => {
                if let NodeKind::Box { children } = &mut self.node_mut(p).kind {
                    children.push(id);
                }
                self.node_mut(p).needs_paint = true;
            }
            None => {
                if let Some(old_root) = self.root {
                    self.detach_subtree(old_root);
                }
                self.root = Some(id);
            }
        }
        id
    }

    fn detach_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend_from_slice(self.children(current));
            let node = self.node_mut(current);
            node.detached = true;
            node.parent = None;
        }
    }

    /// Insert a box node. `parent = None` makes it the root, replacing
    /// any previous root.
    pub fn insert_box(&mut self, parent: Option<NodeId>, style: Style) -> NodeId {
        self.push(NodeKind::Box { children: Vec::new() }, style, parent)
    }

    /// Insert a text node. `parent = None` makes it the root.
    pub fn insert_text(
        &mut self,
        parent: Option<NodeId>,
        content: impl Into<String>,
        style: Style,
    ) -> NodeId {
        self.push(NodeKind::Text { content: content.into() }, style, parent)
    }

    /// Replace a text node's content.
    ///
    /// No-op on box nodes. Marks the node for repaint.
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) {
        let node = self.node_mut(id);
        if let NodeKind::Text { content: slot } = &mut node.kind {
            let content = content.into();
            if *slot != content {
                *slot = content;
                node.needs_paint = true;
            }
        }
    }

    /// Replace a node's style, marking it for repaint when anything
    /// visible changed. Layout-affecting deltas are picked up by the
    /// commit pass through the resulting bounds movement.
    pub fn set_style(&mut self, id: NodeId, style: Style) {
        let node = self.node_mut(id);
        if node.style != style {
            node.style = style;
            node.needs_paint = true;
        }
    }

    /// Detach a node (and, transitively, its subtree) from the tree.
    ///
    /// The parent is marked for repaint so the vacated region is cleared
    /// on the next frame.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            if let NodeKind::Box { children } = &mut self.node_mut(parent).kind {
                children.retain(|&c| c != id);
            }
            self.node_mut(parent).needs_paint = true;
        } else if self.root == Some(id) {
            self.root = None;
        }
        self.detach_subtree(id);
    }

    /// The children of a box node; empty for text nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Box { children } => children,
            NodeKind::Text { .. } => &[],
        }
    }

    /// Committed bounds of a node.
    #[inline]
    pub fn layout_of(&self, id: NodeId) -> Bounds {
        self.node(id).layout
    }
}
