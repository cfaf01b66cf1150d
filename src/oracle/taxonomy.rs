//! Named-class hierarchy over a `petgraph` directed graph.
//!
//! Edges point from a class to each told super class. `Thing` is the implicit
//! root: any class that cannot reach it through told edges gets a direct edge
//! to it. `Nothing` is never a node. Direct views are the transitive reduction
//! of the told edges, transitive views are BFS closures.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::{NOTHING, THING};

/// Class hierarchy with direct and transitive super/sub class queries.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
    thing: NodeIndex,
}

impl Taxonomy {
    /// Build from declared classes and told `(sub, super)` pairs. Pairs naming
    /// an undeclared class are ignored, as is anything involving `Nothing`.
    pub fn build<C, S>(classes: C, subsumptions: S) -> Self
    where
        C: IntoIterator<Item = String>,
        S: IntoIterator<Item = (String, String)>,
    {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let thing = graph.add_node(THING.to_string());
        nodes.insert(THING.to_string(), thing);

        for class in classes {
            if class == NOTHING || nodes.contains_key(&class) {
                continue;
            }
            let idx = graph.add_node(class.clone());
            nodes.insert(class, idx);
        }

        for (sub, sup) in subsumptions {
            if sub == sup || sub == THING || sub == NOTHING || sup == NOTHING {
                continue;
            }
            if let (Some(&s), Some(&p)) = (nodes.get(&sub), nodes.get(&sup)) {
                graph.update_edge(s, p, ());
            }
        }

        // Attach everything that cannot reach the root.
        let rooted = bfs(&graph, thing, Direction::Incoming);
        let detached: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|&n| n != thing && !rooted.contains(&n))
            .collect();
        for node in detached {
            graph.add_edge(node, thing, ());
        }

        Self {
            graph,
            nodes,
            thing,
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.nodes.contains_key(class)
    }

    /// Number of classes, excluding `Thing`.
    pub fn len(&self) -> usize {
        self.graph.node_count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every class strictly above `class`.
    pub fn ancestors(&self, class: &str) -> BTreeSet<String> {
        self.closure(class, Direction::Outgoing)
    }

    /// Every class strictly below `class`.
    pub fn descendants(&self, class: &str) -> BTreeSet<String> {
        self.closure(class, Direction::Incoming)
    }

    /// Most specific told super classes of `class`.
    pub fn direct_supers(&self, class: &str) -> BTreeSet<String> {
        let Some(&idx) = self.nodes.get(class) else {
            return BTreeSet::new();
        };
        let told: BTreeSet<String> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].clone())
            .collect();
        let reduced = self.most_specific(&told);
        if reduced.is_empty() { told } else { reduced }
    }

    /// Classes whose most specific super classes include `class`.
    pub fn direct_subs(&self, class: &str) -> BTreeSet<String> {
        let Some(&idx) = self.nodes.get(class) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .filter(|sub| self.direct_supers(sub).contains(class))
            .map(str::to_string)
            .collect()
    }

    /// Members of `classes` with no other member below them.
    pub fn most_specific(&self, classes: &BTreeSet<String>) -> BTreeSet<String> {
        classes
            .iter()
            .filter(|&candidate| {
                !classes
                    .iter()
                    .any(|other| other != candidate && self.ancestors(other).contains(candidate))
            })
            .cloned()
            .collect()
    }

    /// Members of `classes` with no other member above them.
    pub fn most_general(&self, classes: &BTreeSet<String>) -> BTreeSet<String> {
        classes
            .iter()
            .filter(|&candidate| {
                !classes
                    .iter()
                    .any(|other| other != candidate && self.descendants(other).contains(candidate))
            })
            .cloned()
            .collect()
    }

    /// All classes except `Thing`.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.graph
            .node_indices()
            .filter(move |&n| n != self.thing)
            .map(move |n| self.graph[n].as_str())
    }

    fn closure(&self, class: &str, direction: Direction) -> BTreeSet<String> {
        let Some(&idx) = self.nodes.get(class) else {
            return BTreeSet::new();
        };
        bfs(&self.graph, idx, direction)
            .into_iter()
            .filter(|&n| n != idx)
            .map(|n| self.graph[n].clone())
            .collect()
    }
}

/// Nodes reachable from `start` along `direction`, including `start`.
fn bfs(graph: &DiGraph<String, ()>, start: NodeIndex, direction: Direction) -> HashSet<NodeIndex> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors_directed(current, direction) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited
}
