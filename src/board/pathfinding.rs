//! A* route search over the battle board
//!
//! Searches run over a per-search passability snapshot, so search scratch
//! never aliases live board state. Costs are integers and the open set
//! breaks F ties by push order, making repeated searches byte-identical.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};

use crate::board::constants::STEP_COST;
use crate::core::types::GridPos;

/// Ordered cells from source to destination, both inclusive
pub type Route = Vec<GridPos>;

/// Passability snapshot for one search
#[derive(Debug, Clone)]
pub struct SearchGrid {
    width: u32,
    height: u32,
    passable: Vec<bool>,
}

impl SearchGrid {
    /// Fully passable snapshot
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            passable: vec![true; (width * height) as usize],
        }
    }

    /// Build a snapshot by sampling a predicate at every cell
    pub fn from_fn(width: u32, height: u32, mut passable: impl FnMut(GridPos) -> bool) -> Self {
        let mut grid = Self::new(width, height);
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let pos = GridPos::new(col, row);
                if !passable(pos) {
                    grid.block(pos);
                }
            }
        }
        grid
    }

    pub fn block(&mut self, pos: GridPos) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.passable[idx] = false;
        }
    }

    fn in_bounds(&self, pos: GridPos) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && pos.col < self.width as i32
            && pos.row < self.height as i32
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.row as usize * self.width as usize + pos.col as usize
    }

    pub fn is_passable(&self, pos: GridPos) -> bool {
        self.in_bounds(pos) && self.passable[self.index(pos)]
    }
}

/// Open-set entry: lowest F first, earliest push wins ties
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f: u32,
    seq: u64,
    pos: GridPos,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-search record for a discovered cell; discarded when the search ends
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    g: u32,
    parent: Option<GridPos>,
}

fn heuristic(from: GridPos, target: GridPos) -> u32 {
    STEP_COST * from.manhattan(&target)
}

/// Find an optimal 4-directional route from `start` to `target`.
///
/// Returns `None` when no route exists - a normal outcome, not an error.
/// `start` itself need not be passable (it usually holds the actor);
/// `target` must be. `start == target` yields the single-cell route.
pub fn find_route(grid: &SearchGrid, start: GridPos, target: GridPos) -> Option<Route> {
    if start == target {
        return Some(vec![start]);
    }
    if !grid.is_passable(target) {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut nodes: AHashMap<GridPos, SearchNode> = AHashMap::new();
    let mut closed: AHashSet<GridPos> = AHashSet::new();
    let mut seq: u64 = 0;

    nodes.insert(start, SearchNode { g: 0, parent: None });
    open.push(OpenNode {
        f: heuristic(start, target),
        seq,
        pos: start,
    });

    while let Some(current) = open.pop() {
        if !closed.insert(current.pos) {
            // stale heap entry for an already finalized cell
            continue;
        }

        if current.pos == target {
            return Some(reconstruct(&nodes, target));
        }

        let current_g = nodes.get(&current.pos).map(|n| n.g).unwrap_or(u32::MAX);

        for neighbor in current.pos.neighbors() {
            if !grid.is_passable(neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let tentative = current_g + STEP_COST;
            let known = nodes.get(&neighbor).map(|n| n.g);
            if known.map_or(true, |g| tentative < g) {
                nodes.insert(
                    neighbor,
                    SearchNode {
                        g: tentative,
                        parent: Some(current.pos),
                    },
                );
                seq += 1;
                open.push(OpenNode {
                    f: tentative + heuristic(neighbor, target),
                    seq,
                    pos: neighbor,
                });
            }
        }
    }

    None
}

fn reconstruct(nodes: &AHashMap<GridPos, SearchNode>, target: GridPos) -> Route {
    let mut route = vec![target];
    let mut current = target;
    while let Some(parent) = nodes.get(&current).and_then(|n| n.parent) {
        route.push(parent);
        current = parent;
    }
    route.reverse();
    route
}
