//! Statistics tree for flat Monte Carlo search.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Each node owns
//! its children through a move-keyed map and refers back to its parent by
//! index, so there are no reference cycles. A node is created the first time
//! a rollout passes through its move sequence and keeps counting every later
//! rollout that does the same.
//!
//! When a real move is played, [`SearchTree::advance`] re-roots the tree at
//! the matching child. The arena is rebuilt from that child so the discarded
//! siblings are actually freed.
//!
//! The tree itself is not synchronized; the scheduler keeps it behind a
//! mutex and records each finished rollout under one lock acquisition.

use std::collections::{BTreeMap, VecDeque};

use crate::board::Move;
use crate::color::Color;
use crate::playout::Outcome;

/// Index of a node in the arena.
pub type NodeId = usize;

/// Aggregated rollout results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub simulations: u64,
    pub black_wins: u64,
    pub white_wins: u64,
    pub jigos: u64,
}

impl Stats {
    /// Number of rollouts won by `color`.
    pub fn wins_for(&self, color: Color) -> u64 {
        match color {
            Color::Black => self.black_wins,
            Color::White => self.white_wins,
        }
    }

    /// Fraction of rollouts won by `color`, or 0 for an unvisited node.
    pub fn winrate(&self, color: Color) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.wins_for(color) as f64 / self.simulations as f64
    }
}

#[derive(Debug, Default)]
struct Node {
    parent: Option<NodeId>,
    children: BTreeMap<Move, NodeId>,
    stats: Stats,
}

/// Rooted tree of move sequences with rollout statistics.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<Node>,
    max_depth: usize,
}

impl SearchTree {
    /// Root node id. The root is always stored first in the arena.
    pub const ROOT: NodeId = 0;

    /// Create a tree with a single empty root. Rollouts only create nodes up
    /// to `max_depth` plies below the root; 0 means no limit.
    pub fn new(max_depth: usize) -> Self {
        Self {
            nodes: vec![Node::default()],
            max_depth: if max_depth == 0 { usize::MAX } else { max_depth },
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn stats(&self, node: NodeId) -> Stats {
        self.nodes[node].stats
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    /// Existing child of `node` for `mv`.
    pub fn child(&self, node: NodeId, mv: Move) -> Option<NodeId> {
        self.nodes[node].children.get(&mv).copied()
    }

    /// Children of `node` in move order (pass first, then by field index).
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = (Move, NodeId)> + '_ {
        self.nodes[node].children.iter().map(|(&mv, &id)| (mv, id))
    }

    /// Child of `node` for `mv`, created with zeroed statistics on first visit.
    pub fn child_node(&mut self, node: NodeId, mv: Move) -> NodeId {
        if let Some(id) = self.child(node, mv) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            parent: Some(node),
            ..Node::default()
        });
        self.nodes[node].children.insert(mv, id);
        id
    }

    /// Add the given deltas to `node`'s statistics.
    pub fn increment_score(
        &mut self,
        node: NodeId,
        simulations: u64,
        black_wins: u64,
        white_wins: u64,
        jigos: u64,
    ) {
        let stats = &mut self.nodes[node].stats;
        stats.simulations += simulations;
        stats.black_wins += black_wins;
        stats.white_wins += white_wins;
        stats.jigos += jigos;
    }

    /// Count one rollout with `outcome` on `leaf` and every ancestor.
    pub fn backpropagate(&mut self, leaf: NodeId, outcome: Outcome) {
        let (b, w, j) = match outcome {
            Outcome::BlackWin => (1, 0, 0),
            Outcome::WhiteWin => (0, 1, 0),
            Outcome::Jigo => (0, 0, 1),
        };
        let mut node = Some(leaf);
        while let Some(id) = node {
            self.increment_score(id, 1, b, w, j);
            node = self.nodes[id].parent;
        }
    }

    /// Record a finished rollout: walk (and create) the nodes for `path`
    /// from the root, up to the depth limit, then backpropagate `outcome`.
    /// Returns the deepest node visited.
    pub fn record(&mut self, path: &[Move], outcome: Outcome) -> NodeId {
        let mut node = self.root();
        for &mv in path.iter().take(self.max_depth) {
            node = self.child_node(node, mv);
        }
        self.backpropagate(node, outcome);
        node
    }

    /// Drop every node and statistic, leaving a fresh root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::default());
    }

    /// Re-root the tree at the root's child for `mv`, creating it if needed.
    /// The child's subtree is kept, its siblings are dropped.
    pub fn advance(&mut self, mv: Move) {
        let new_root = self.child_node(self.root(), mv);
        let mut old = std::mem::take(&mut self.nodes);
        let mut queue: VecDeque<(NodeId, Option<(NodeId, Move)>)> = VecDeque::new();
        queue.push_back((new_root, None));

        while let Some((old_id, link)) = queue.pop_front() {
            let id = self.nodes.len();
            let node = &mut old[old_id];
            let children = std::mem::take(&mut node.children);
            self.nodes.push(Node {
                parent: link.map(|(parent, _)| parent),
                children: BTreeMap::new(),
                stats: node.stats,
            });
            if let Some((parent, via)) = link {
                self.nodes[parent].children.insert(via, id);
            }
            queue.extend(children.into_iter().map(|(m, c)| (c, Some((id, m)))));
        }
    }
}
