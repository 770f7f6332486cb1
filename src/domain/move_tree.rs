//! Game history as a tree of positions, so stepping back and playing a
//! different move keeps the old line as a variation.
//!
//! This is a pure domain module with no GPUI dependencies.

use shakmaty::Chess;

use crate::domain::chess::Coord;

/// Unique identifier for a node in the move tree
pub type MoveNodeId = usize;

/// The move that led into a node
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayedMove {
    pub from: Coord,
    pub to: Coord,
    /// Standard algebraic notation, e.g. "Nf3"
    pub san: String,
}

#[derive(Clone, Debug)]
pub struct MoveNode {
    pub id: MoveNodeId,
    /// Parent node ID (None for root)
    pub parent_id: Option<MoveNodeId>,
    pub position: Chess,
    /// None for the root
    pub played: Option<PlayedMove>,
    /// First child is the main line continuation, the rest are variations
    pub children: Vec<MoveNodeId>,
}

impl MoveNode {
    pub fn main_line_child(&self) -> Option<MoveNodeId> {
        self.children.first().copied()
    }
}

#[derive(Clone, Debug)]
pub struct MoveTree {
    nodes: Vec<MoveNode>,
    current_id: MoveNodeId,
}

impl MoveTree {
    /// Create a tree rooted at the standard starting position
    pub fn new() -> Self {
        Self::with_root(Chess::default())
    }

    /// Create a tree rooted at an arbitrary position
    pub fn with_root(position: Chess) -> Self {
        Self {
            nodes: vec![MoveNode {
                id: 0,
                parent_id: None,
                position,
                played: None,
                children: Vec::new(),
            }],
            current_id: 0,
        }
    }

    pub fn get(&self, id: MoveNodeId) -> Option<&MoveNode> {
        self.nodes.get(id)
    }

    pub fn current(&self) -> &MoveNode {
        &self.nodes[self.current_id]
    }

    pub fn current_id(&self) -> MoveNodeId {
        self.current_id
    }

    pub fn go_to_root(&mut self) {
        self.current_id = 0;
    }

    /// Step back one move. Returns false at the root.
    pub fn go_back(&mut self) -> bool {
        match self.current().parent_id {
            Some(parent_id) => {
                self.current_id = parent_id;
                true
            }
            None => false,
        }
    }

    /// Step forward along the main line. Returns false at a leaf.
    pub fn go_forward(&mut self) -> bool {
        match self.current().main_line_child() {
            Some(child_id) => {
                self.current_id = child_id;
                true
            }
            None => false,
        }
    }

    /// Follow the main line to its end
    pub fn go_to_end(&mut self) {
        while self.go_forward() {}
    }

    pub fn is_at_root(&self) -> bool {
        self.current_id == 0
    }

    /// Play a move from the current node and make the result current.
    ///
    /// An existing child with the same SAN is reused instead of growing a
    /// duplicate variation.
    pub fn add_move(&mut self, position: Chess, played: PlayedMove) -> MoveNodeId {
        let existing = self.nodes[self.current_id]
            .children
            .iter()
            .copied()
            .find(|&child_id| {
                self.nodes[child_id]
                    .played
                    .as_ref()
                    .is_some_and(|p| p.san == played.san)
            });
        if let Some(child_id) = existing {
            self.current_id = child_id;
            return child_id;
        }

        let new_id = self.nodes.len();
        self.nodes.push(MoveNode {
            id: new_id,
            parent_id: Some(self.current_id),
            position,
            played: Some(played),
            children: Vec::new(),
        });
        self.nodes[self.current_id].children.push(new_id);
        self.current_id = new_id;
        new_id
    }

    /// SAN of every move from the root to the current node
    pub fn history(&self) -> Vec<String> {
        let mut sans = Vec::new();
        let mut id = Some(self.current_id);
        while let Some(node) = id.and_then(|i| self.nodes.get(i)) {
            if let Some(played) = &node.played {
                sans.push(played.san.clone());
            }
            id = node.parent_id;
        }
        sans.reverse();
        sans
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::new()
    }
}
