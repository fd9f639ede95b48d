//! Bookkeeping for the incremental A* search: the node arena holding parent-linked
//! [SearchNode]s, the insertion-ordered open set and the closed set.
use fxhash::FxBuildHasher;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::debug;

use crate::UNIT_COST;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Manhattan distance between `p` and `goal`, admissible and consistent for unit-cost
/// 4-connected moves.
pub fn heuristic(p: &Point, goal: &Point) -> i32 {
    p.manhattan_distance(goal) * UNIT_COST
}

/// Index of a [SearchNode] inside the arena of one search. Nodes are never removed during a
/// search, so an id stays valid until the search is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A step of path history: where we are, how we got here and at which cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    location: Point,
    parent: Option<NodeId>,
    g_value: i32,
}

impl SearchNode {
    pub fn location(&self) -> Point {
        self.location
    }
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    pub fn g_value(&self) -> i32 {
        self.g_value
    }
    pub fn f_value(&self, goal: &Point) -> i32 {
        self.g_value + heuristic(&self.location, goal)
    }
}

/// Result of offering a candidate node for a location to the open set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenUpdate {
    Discovered,
    Improved,
    Rejected,
}

/// Per-search state. Parents are stored as arena indices, so superseded nodes that are still
/// somebody's parent stay reachable while the open set only ever refers to the best node of
/// each location.
#[derive(Clone, Debug)]
pub struct SearchContext {
    nodes: Vec<SearchNode>,
    open: FxIndexMap<Point, NodeId>,
    closed: BoolGrid,
    closed_count: usize,
}

impl SearchContext {
    pub fn new(width: usize, height: usize, start: Point) -> SearchContext {
        let mut context = SearchContext {
            nodes: Vec::new(),
            open: FxIndexMap::default(),
            closed: BoolGrid::new(width, height, false),
            closed_count: 0,
        };
        let root = context.push_node(start, None, 0);
        context.open.insert(start, root);
        context
    }

    fn push_node(&mut self, location: Point, parent: Option<NodeId>, g_value: i32) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode {
            location,
            parent,
            g_value,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Best open node for `location`, if any.
    pub fn open_node(&self, location: &Point) -> Option<&SearchNode> {
        self.open.get(location).map(|&id| self.node(id))
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Scans the open set in insertion order and returns the entry with the lowest f-value. On
    /// ties the first one encountered wins.
    pub fn select_min(&self, goal: &Point) -> Option<NodeId> {
        let mut best: Option<(i32, NodeId)> = None;
        for &id in self.open.values() {
            let f = self.node(id).f_value(goal);
            match best {
                Some((best_f, _)) if best_f <= f => {}
                _ => best = Some((f, id)),
            }
        }
        best.map(|(_, id)| id)
    }

    /// Removes `location` from the open set, keeping the order of the remaining entries.
    pub fn take_open(&mut self, location: &Point) -> Option<NodeId> {
        self.open.shift_remove(location)
    }

    /// Offers a successor of `parent` at `location`. A first discovery is always inserted; an
    /// existing entry is only replaced by a strictly cheaper node and keeps its position in the
    /// enumeration order.
    pub fn offer(&mut self, location: Point, parent: NodeId, goal: &Point) -> OpenUpdate {
        let g_value = self.nodes[parent.0].g_value + UNIT_COST;
        let candidate_f = g_value + heuristic(&location, goal);
        let candidate = SearchNode {
            location,
            parent: Some(parent),
            g_value,
        };
        let nodes = &mut self.nodes;
        match self.open.entry(location) {
            Vacant(e) => {
                e.insert(NodeId(nodes.len()));
                nodes.push(candidate);
                OpenUpdate::Discovered
            }
            Occupied(mut e) => {
                let old = &nodes[e.get().0];
                if candidate_f < old.f_value(goal) {
                    debug!(
                        "Improved {} from g = {} to g = {}",
                        location, old.g_value, g_value
                    );
                    e.insert(NodeId(nodes.len()));
                    nodes.push(candidate);
                    OpenUpdate::Improved
                } else {
                    OpenUpdate::Rejected
                }
            }
        }
    }

    pub fn is_closed(&self, location: &Point) -> bool {
        self.closed.get_point(*location)
    }

    /// Marks `location` as expanded. Returns `false` if it already was.
    pub fn close(&mut self, location: Point) -> bool {
        if self.closed.get_point(location) {
            return false;
        }
        self.closed.set_point(location, true);
        self.closed_count += 1;
        true
    }

    pub fn closed_count(&self) -> usize {
        self.closed_count
    }

    /// Follows parent links from `goal` back to the root and returns the locations in
    /// start-to-goal order.
    pub fn reverse_path(&self, goal: NodeId) -> Vec<Point> {
        let mut path: Vec<Point> =
            std::iter::successors(Some(self.node(goal)), |node| node.parent.map(|p| self.node(p)))
                .map(SearchNode::location)
                .collect();
        path.reverse();
        path
    }
}
