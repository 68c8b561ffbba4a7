use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::*;

/// Orthogonal neighbors of a cell, a cell has at most four.
pub type AdjacencyList = SmallVec<[Coord2; 4]>;

/// Undirected graph over the cells of a board, connecting each cell with its up, down, left and
/// right neighbors.
///
/// Flood fill walks this graph, so diagonal cells are never reached directly even though they
/// contribute to proximity counts. Built once with the board and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyGraph {
    adjacency: HashMap<Coord2, AdjacencyList>,
}

impl AdjacencyGraph {
    pub fn build(side: Coord) -> Self {
        let mut graph = Self {
            adjacency: HashMap::with_capacity(mult(side, side) as usize),
        };

        for x in 0..side {
            for y in 0..side {
                graph.add_vertex((x, y));
            }
        }

        // every cell pushes its own side of each edge, so both endpoints see it
        for x in 0..side {
            for y in 0..side {
                for neighbor in Neighborhood::Orthogonal.iter((x, y), side) {
                    graph.add_edge((x, y), neighbor);
                }
            }
        }

        graph
    }

    fn add_vertex(&mut self, node: Coord2) {
        self.adjacency.entry(node).or_default();
    }

    fn add_edge(&mut self, from: Coord2, to: Coord2) {
        self.adjacency.entry(from).or_default().push(to);
    }

    /// Cells adjacent to `node`, empty for coordinates that are not on the board.
    pub fn neighbors(&self, node: Coord2) -> &[Coord2] {
        self.adjacency
            .get(&node)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_adjacent(&self, a: Coord2, b: Coord2) -> bool {
        self.neighbors(a).contains(&b)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|list| list.len()).sum::<usize>() / 2
    }
}
