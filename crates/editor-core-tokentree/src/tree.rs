//! The token tree arena and its queries.

use editor_core::{Position, TextRange};

/// Index of a node in a [`TokenTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A token tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single token.
    Token {
        /// Covered range.
        range: TextRange,
    },
    /// An ordered sequence of nodes. Spans from its first child to its last; an empty list has
    /// no span of its own and borrows its parent's.
    List {
        /// Children, in document order. Never lists themselves.
        children: Vec<NodeId>,
    },
    /// A matched bracket pair and what lies between.
    Block {
        /// Opening bracket token.
        open: NodeId,
        /// Nodes between the brackets (always a [`Node::List`]).
        elements: NodeId,
        /// Closing bracket token.
        close: NodeId,
    },
}

#[derive(Debug, Clone)]
struct NodeData {
    node: Node,
    parent: Option<NodeId>,
}

/// Owned intermediate form produced by the builder.
#[derive(Debug)]
pub(crate) enum Built {
    Token(TextRange),
    List(Vec<Built>),
    Block {
        open: TextRange,
        elements: Vec<Built>,
        close: TextRange,
    },
}

/// Nested bracket structure of a document.
#[derive(Debug, Clone)]
pub struct TokenTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl TokenTree {
    pub(crate) fn from_built(built: Built) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(built, None);
        tree
    }

    fn alloc(&mut self, built: Built, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            node: Node::List {
                children: Vec::new(),
            },
            parent,
        });

        let node = match built {
            Built::Token(range) => Node::Token { range },
            Built::List(children) => Node::List {
                children: children
                    .into_iter()
                    .map(|child| self.alloc(child, Some(id)))
                    .collect(),
            },
            Built::Block {
                open,
                elements,
                close,
            } => {
                let open = self.alloc(Built::Token(open), Some(id));
                let elements = self.alloc(Built::List(elements), Some(id));
                let close = self.alloc(Built::Token(close), Some(id));
                Node::Block {
                    open,
                    elements,
                    close,
                }
            }
        };
        self.nodes[id.0].node = node;
        id
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, including block element lists.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the document produced no tokens.
    pub fn is_empty(&self) -> bool {
        self.is_empty_list(self.root)
    }

    /// The node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0].node
    }

    /// Parent of a node (`None` for the root).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|data| data.parent)
    }

    /// Children of a list node (empty for tokens and blocks).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::List { children } => children,
            _ => &[],
        }
    }

    fn is_empty_list(&self, id: NodeId) -> bool {
        matches!(self.node(id), Node::List { children } if children.is_empty())
    }

    /// Span of a node.
    ///
    /// `None` only for an empty root list.
    pub fn range(&self, id: NodeId) -> Option<TextRange> {
        match self.node(id) {
            Node::Token { range } => Some(*range),
            Node::List { children } => match (children.first(), children.last()) {
                (Some(first), Some(last)) => {
                    let start = self.range(*first)?.start;
                    let end = self.range(*last)?.end;
                    Some(TextRange::new(start, end))
                }
                _ => self.range(self.parent(id)?),
            },
            Node::Block { open, close, .. } => {
                let start = self.range(*open)?.start;
                let end = self.range(*close)?.end;
                Some(TextRange::new(start, end))
            }
        }
    }

    /// Returns `true` if some node of the tree contains `position`.
    pub fn contains(&self, position: Position) -> bool {
        self.find_in(self.root, position).is_some()
    }

    /// The innermost node containing `position`, or the root if none does.
    pub fn find(&self, position: Position) -> NodeId {
        self.find_in(self.root, position).unwrap_or(self.root)
    }

    /// The innermost node under `id` containing `position`.
    ///
    /// Span ends are inclusive. Empty lists are skipped. Inside a block the open bracket is
    /// searched first, then the elements, then the close bracket; the block itself is returned
    /// if none of them contains the position.
    pub fn find_in(&self, id: NodeId, position: Position) -> Option<NodeId> {
        if self.is_empty_list(id) {
            return None;
        }
        if !self.range(id)?.contains(position) {
            return None;
        }

        let inner = match self.node(id) {
            Node::Token { .. } => None,
            Node::List { children } => children
                .iter()
                .find_map(|child| self.find_in(*child, position)),
            Node::Block {
                open,
                elements,
                close,
            } => self
                .find_in(*open, position)
                .or_else(|| self.find_in(*elements, position))
                .or_else(|| self.find_in(*close, position)),
        };
        Some(inner.unwrap_or(id))
    }

    /// Ranges for smart selection at `position`: the innermost containing node's range, then
    /// each enclosing node's, with duplicates removed.
    pub fn selection_ranges(&self, position: Position) -> Vec<TextRange> {
        let mut ranges: Vec<TextRange> = Vec::new();
        let mut current = self.find_in(self.root, position);
        while let Some(id) = current {
            if let Some(range) = self.range(id)
                && ranges.last() != Some(&range)
            {
                ranges.push(range);
            }
            current = self.parent(id);
        }
        ranges
    }
}
