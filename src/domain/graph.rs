//! Dependency graph for tasks
//!
//! Builds a directed graph over a submitted task set and detects dependency
//! cycles. Uses petgraph for graph storage.
//!
//! Edge direction is `dependency -> dependent`: an edge `A -> B` means
//! "A must be considered complete before B". Only dependencies naming a task
//! in the same set become edges; anything else is recorded as dangling and
//! treated as an external, already satisfied prerequisite.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use super::id::TaskId;
use super::task::Task;

/// A dependency graph for one task set
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<TaskId, ()>,

    /// Map from TaskId to node index
    node_map: HashMap<TaskId, NodeIndex>,

    /// Dependencies naming tasks outside the set, as (task, missing dependency)
    dangling: Vec<(TaskId, TaskId)>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a task set
    ///
    /// Never fails: dangling references are dropped from the graph and
    /// self-dependencies become self-loops.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut graph = Self::new();

        // First pass: add all nodes
        let tasks: Vec<_> = tasks.into_iter().collect();
        for task in &tasks {
            graph.add_task(task.id.clone());
        }

        // Second pass: add edges for dependencies inside the set
        for task in &tasks {
            for dep_id in &task.dependencies {
                if !graph.add_dependency(&task.id, dep_id) {
                    graph.dangling.push((task.id.clone(), dep_id.clone()));
                }
            }
        }

        graph
    }

    /// Adds a task to the graph
    pub fn add_task(&mut self, task_id: TaskId) {
        if !self.node_map.contains_key(&task_id) {
            let idx = self.graph.add_node(task_id.clone());
            self.node_map.insert(task_id, idx);
        }
    }

    /// Adds a dependency edge: `task` depends on `depends_on`
    ///
    /// Returns false if either end is not in the graph.
    pub fn add_dependency(&mut self, task: &TaskId, depends_on: &TaskId) -> bool {
        let (Some(&task_idx), Some(&dep_idx)) =
            (self.node_map.get(task), self.node_map.get(depends_on))
        else {
            return false;
        };

        if self.graph.find_edge(dep_idx, task_idx).is_none() {
            self.graph.add_edge(dep_idx, task_idx, ());
        }
        true
    }

    /// Returns the direct in-set dependencies of a task
    pub fn dependencies(&self, task_id: &TaskId) -> Vec<TaskId> {
        self.neighbors(task_id, Direction::Incoming)
    }

    /// Returns the direct dependents of a task (tasks that depend on it)
    pub fn dependents(&self, task_id: &TaskId) -> Vec<TaskId> {
        self.neighbors(task_id, Direction::Outgoing)
    }

    fn neighbors(&self, task_id: &TaskId, direction: Direction) -> Vec<TaskId> {
        let Some(&idx) = self.node_map.get(task_id) else {
            return vec![];
        };

        let mut ids: Vec<TaskId> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        ids.sort();
        ids
    }

    /// Number of other tasks in the set that directly depend on this one
    pub fn dependent_count(&self, task_id: &TaskId) -> usize {
        let Some(&idx) = self.node_map.get(task_id) else {
            return 0;
        };

        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter(|&n| n != idx)
            .count()
    }

    /// Dependencies that named tasks outside the set
    pub fn dangling(&self) -> &[(TaskId, TaskId)] {
        &self.dangling
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.node_map.contains_key(task_id)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns the number of in-set dependency edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Finds every task that sits on a dependency cycle
    ///
    /// Depth-first search with three node states. A node stays in progress
    /// until the strongly connected component it belongs to is closed, so an
    /// edge into an in-progress node always closes a loop. Components with
    /// more than one node, or a single node with a self-loop, are cycles.
    /// Every node is visited, so disjoint cycles are all reported.
    pub fn detect_cycles(&self) -> CycleReport {
        let mut walk = Traversal::new(self.graph.node_count());
        let mut report = CycleReport::default();

        for root in self.graph.node_indices() {
            if walk.mark[root.index()] == Mark::Unvisited {
                self.visit(root, &mut walk, &mut report);
            }
        }

        report.cycles.sort();
        report
    }

    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect()
    }

    fn visit(&self, root: NodeIndex, walk: &mut Traversal, report: &mut CycleReport) {
        walk.enter(root);
        let mut frames = vec![(root, self.successors(root))];

        while let Some((node, pending)) = frames.last_mut() {
            let node = *node;

            if let Some(next) = pending.pop() {
                match walk.mark[next.index()] {
                    Mark::Unvisited => {
                        walk.enter(next);
                        frames.push((next, self.successors(next)));
                    }
                    Mark::InProgress => {
                        let seen = walk.order[next.index()];
                        walk.lower(node, seen);
                    }
                    Mark::Done => {}
                }
                continue;
            }

            frames.pop();
            if let Some((parent, _)) = frames.last() {
                let low = walk.low[node.index()];
                walk.lower(*parent, low);
            }

            if walk.low[node.index()] == walk.order[node.index()] {
                let component = walk.close(node);
                let cyclic = component.len() > 1 || self.graph.find_edge(node, node).is_some();
                if cyclic {
                    let mut ids: Vec<TaskId> = component
                        .into_iter()
                        .filter_map(|n| self.graph.node_weight(n).cloned())
                        .collect();
                    ids.sort();
                    report.flagged.extend(ids.iter().cloned());
                    report.cycles.push(ids);
                }
            }
        }
    }
}

/// Node state during cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Bookkeeping for one cycle-detection pass
struct Traversal {
    mark: Vec<Mark>,
    /// Discovery order of each node
    order: Vec<usize>,
    /// Earliest discovery order reachable from each node's subtree
    low: Vec<usize>,
    /// In-progress nodes, in discovery order
    open: Vec<NodeIndex>,
    next: usize,
}

impl Traversal {
    fn new(nodes: usize) -> Self {
        Self {
            mark: vec![Mark::Unvisited; nodes],
            order: vec![0; nodes],
            low: vec![0; nodes],
            open: Vec::new(),
            next: 0,
        }
    }

    fn enter(&mut self, node: NodeIndex) {
        let i = node.index();
        self.mark[i] = Mark::InProgress;
        self.order[i] = self.next;
        self.low[i] = self.next;
        self.next += 1;
        self.open.push(node);
    }

    fn lower(&mut self, node: NodeIndex, value: usize) {
        let low = &mut self.low[node.index()];
        *low = (*low).min(value);
    }

    /// Marks `head` and everything opened after it as done
    fn close(&mut self, head: NodeIndex) -> Vec<NodeIndex> {
        let mut component = Vec::new();
        while let Some(n) = self.open.pop() {
            self.mark[n.index()] = Mark::Done;
            component.push(n);
            if n == head {
                break;
            }
        }
        component
    }
}

/// Result of cycle detection
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleReport {
    flagged: HashSet<TaskId>,
    cycles: Vec<Vec<TaskId>>,
}

impl CycleReport {
    /// True if the task is part of a cycle
    pub fn is_circular(&self, task_id: &TaskId) -> bool {
        self.flagged.contains(task_id)
    }

    /// Each cycle as a sorted group of task IDs
    pub fn cycles(&self) -> &[Vec<TaskId>] {
        &self.cycles
    }

    /// Number of tasks flagged as circular
    pub fn flagged_count(&self) -> usize {
        self.flagged.len()
    }

    /// True if no cycles were found
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }
}
