//! This module contains the directed multigraph both automata are built on.
//! The graph maps each vertex to the ordered list of its outgoing weighted edges. There is no
//! global edge index, all traversal starts at a vertex and goes outward.

use std::collections::BTreeMap;

/// A directed weighted edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<V, W> {
    from: V,
    to: V,
    weight: W,
}

impl<V: Copy, W> Edge<V, W> {
    /// Create a new edge.
    pub fn new(from: V, to: V, weight: W) -> Self {
        Edge { from, to, weight }
    }

    /// Get the source vertex of the edge.
    pub fn from(&self) -> V {
        self.from
    }

    /// Get the target vertex of the edge.
    pub fn to(&self) -> V {
        self.to
    }

    /// Get the weight of the edge.
    pub fn weight(&self) -> &W {
        &self.weight
    }
}

/// An owning multigraph keyed by vertex identity.
///
/// Parallel edges with equal weights are kept as they are, nothing is deduplicated.
/// Iteration runs in vertex order, which makes dumps and renderings reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<V, W> {
    map: BTreeMap<V, Vec<Edge<V, W>>>,
}

impl<V, W> Default for Graph<V, W> {
    fn default() -> Self {
        Graph {
            map: BTreeMap::new(),
        }
    }
}

impl<V: Copy + Ord, W> Graph<V, W> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Graph::default()
    }

    /// Add a vertex without any edges.
    /// Returns false if the vertex was already part of the graph.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.map.contains_key(&vertex) {
            return false;
        }
        self.map.insert(vertex, Vec::new());
        true
    }

    /// Append an edge to the outgoing edges of `from`.
    /// Both vertices become part of the graph if they aren't already.
    pub fn add_edge(&mut self, from: V, to: V, weight: W) {
        self.add_vertex(to);
        self.map
            .entry(from)
            .or_default()
            .push(Edge::new(from, to, weight));
    }

    /// Get the outgoing edges of a vertex. Unknown vertices have no edges.
    pub fn edges_of(&self, vertex: V) -> &[Edge<V, W>] {
        self.map.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove a vertex together with its outgoing edges.
    /// Edges of other vertices that point to it are left untouched.
    pub fn remove(&mut self, vertex: V) -> Option<Vec<Edge<V, W>>> {
        self.map.remove(&vertex)
    }

    /// Returns true if the vertex is part of the graph.
    pub fn contains(&self, vertex: V) -> bool {
        self.map.contains_key(&vertex)
    }

    /// Get the vertices of the graph in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.map.keys().copied()
    }

    /// Iterate over all vertices together with their outgoing edges.
    pub fn iter(&self) -> impl Iterator<Item = (V, &[Edge<V, W>])> + '_ {
        self.map.iter().map(|(v, edges)| (*v, edges.as_slice()))
    }

    /// Get the number of vertices.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// Move every vertex with its edge list from `other` into this graph.
    /// An entry of `other` replaces an entry of this graph with the same vertex, so callers that
    /// must not lose edges have to check for shared vertices first.
    pub fn absorb(&mut self, other: Graph<V, W>) {
        self.map.extend(other.map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_registers_both_vertices() {
        let mut graph: Graph<usize, char> = Graph::new();
        graph.add_edge(0, 1, 'a');
        assert!(graph.contains(0));
        assert!(graph.contains(1));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edges_of(0), &[Edge::new(0, 1, 'a')]);
        assert!(graph.edges_of(1).is_empty());
        assert!(graph.edges_of(42).is_empty());
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut graph: Graph<usize, char> = Graph::new();
        graph.add_edge(0, 1, 'a');
        graph.add_edge(0, 1, 'a');
        graph.add_edge(0, 0, 'b');
        assert_eq!(graph.edge_count(), 3);
        let weights: Vec<char> = graph.edges_of(0).iter().map(|e| *e.weight()).collect();
        assert_eq!(weights, vec!['a', 'a', 'b']);
    }

    #[test]
    fn test_remove() {
        let mut graph: Graph<usize, char> = Graph::new();
        graph.add_edge(0, 1, 'a');
        graph.add_edge(1, 2, 'b');
        let removed = graph.remove(1).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(!graph.contains(1));
        // Edges pointing at the removed vertex survive.
        assert_eq!(graph.edges_of(0)[0].to(), 1);
        assert!(graph.remove(1).is_none());
    }

    #[test]
    fn test_absorb() {
        let mut graph: Graph<usize, char> = Graph::new();
        graph.add_edge(0, 1, 'a');
        let mut other = Graph::new();
        other.add_edge(2, 3, 'b');
        graph.absorb(other);
        assert_eq!(graph.vertices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(graph.edge_count(), 2);
    }
}
