//! IndieGraph: the immutable skill dependency graph.
//!
//! Uses petgraph to hold prerequisite edges (prerequisite -> dependent) and
//! validates at build time that every referenced skill exists and that the
//! prerequisite relation is acyclic. Direct prerequisite and dependent sets
//! are precomputed per node so the recommendation engine never rescans the
//! catalog.
//!
//! A `SkillGraph` is built once at startup and shared read-only (`Arc`)
//! across requests.

pub mod catalog;

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Control, Dfs, DfsEvent, Reversed, depth_first_search};

use indiepilot_types::error::GraphError;
use indiepilot_types::skill::{SkillDefinition, SkillId};

/// A skill with its precomputed direct edges.
#[derive(Debug, Clone)]
pub struct SkillNode {
    pub definition: SkillDefinition,
    prerequisites: BTreeSet<SkillId>,
    dependents: BTreeSet<SkillId>,
}

impl SkillNode {
    pub fn id(&self) -> &SkillId {
        &self.definition.id
    }

    /// Direct prerequisites (deduplicated).
    pub fn prerequisites(&self) -> &BTreeSet<SkillId> {
        &self.prerequisites
    }

    /// Skills that list this one as a direct prerequisite.
    pub fn dependents(&self) -> &BTreeSet<SkillId> {
        &self.dependents
    }

    /// True iff every prerequisite is in `completed`.
    pub fn is_unlocked(&self, completed: &BTreeSet<SkillId>) -> bool {
        self.prerequisites.is_subset(completed)
    }
}

/// Immutable skill graph keyed by skill id.
#[derive(Debug, Clone)]
pub struct SkillGraph {
    graph: DiGraph<SkillId, ()>,
    index: HashMap<SkillId, NodeIndex>,
    /// Catalog order; `nodes[i]` corresponds to `NodeIndex::new(i)`.
    nodes: Vec<SkillNode>,
}

impl SkillGraph {
    /// Build a graph from skill definitions.
    ///
    /// Fails with `DuplicateSkill` when an id appears twice, `UnknownSkill`
    /// when a prerequisite id is not defined, and `CyclicDependency` when
    /// the prerequisite relation has a cycle. No partially built graph is
    /// ever returned.
    pub fn build(definitions: Vec<SkillDefinition>) -> Result<Self, GraphError> {
        let edge_count = definitions.iter().map(|d| d.prerequisites.len()).sum();
        let mut graph = DiGraph::<SkillId, ()>::with_capacity(definitions.len(), edge_count);
        let mut index = HashMap::with_capacity(definitions.len());

        for def in &definitions {
            if index.contains_key(&def.id) {
                return Err(GraphError::DuplicateSkill(def.id.clone()));
            }
            let idx = graph.add_node(def.id.clone());
            index.insert(def.id.clone(), idx);
        }

        // Edge from prerequisite -> dependent
        for def in &definitions {
            let to = index[&def.id];
            for prereq in &def.prerequisites {
                let from = index.get(prereq).ok_or_else(|| {
                    tracing::warn!(skill = %def.id, prerequisite = %prereq, "undefined prerequisite");
                    GraphError::UnknownSkill(prereq.clone())
                })?;
                graph.update_edge(*from, to, ());
            }
        }

        detect_cycle(&graph)?;

        let nodes = definitions
            .into_iter()
            .map(|definition| {
                let idx = index[&definition.id];
                let prerequisites = graph
                    .neighbors_directed(idx, petgraph::Direction::Incoming)
                    .map(|n| graph[n].clone())
                    .collect();
                let dependents = graph
                    .neighbors_directed(idx, petgraph::Direction::Outgoing)
                    .map(|n| graph[n].clone())
                    .collect();
                SkillNode {
                    definition,
                    prerequisites,
                    dependents,
                }
            })
            .collect();

        tracing::debug!(
            skills = graph.node_count(),
            edges = graph.edge_count(),
            "skill graph built"
        );

        Ok(Self {
            graph,
            index,
            nodes,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in catalog order.
    pub fn nodes(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter()
    }

    pub fn node(&self, id: &SkillId) -> Result<&SkillNode, GraphError> {
        self.index
            .get(id)
            .map(|idx| &self.nodes[idx.index()])
            .ok_or_else(|| GraphError::UnknownSkill(id.clone()))
    }

    pub fn get(&self, id: &SkillId) -> Result<&SkillDefinition, GraphError> {
        self.node(id).map(|n| &n.definition)
    }

    /// Direct prerequisites of `id`.
    pub fn prerequisites_of(&self, id: &SkillId) -> Result<&BTreeSet<SkillId>, GraphError> {
        self.node(id).map(SkillNode::prerequisites)
    }

    /// Skills whose prerequisite set contains `id`.
    pub fn dependents_of(&self, id: &SkillId) -> Result<&BTreeSet<SkillId>, GraphError> {
        self.node(id).map(SkillNode::dependents)
    }

    /// True iff every prerequisite of `id` is in `completed`.
    pub fn is_unlocked(
        &self,
        id: &SkillId,
        completed: &BTreeSet<SkillId>,
    ) -> Result<bool, GraphError> {
        self.node(id).map(|n| n.is_unlocked(completed))
    }

    /// Skills with no prerequisites.
    pub fn roots(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.nodes
            .iter()
            .map(|n| &n.definition)
            .filter(|d| d.is_root())
    }

    /// Every transitive prerequisite of `id` (excluding `id`).
    pub fn ancestors(&self, id: &SkillId) -> Result<BTreeSet<SkillId>, GraphError> {
        let start = self.node_index(id)?;
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut found = BTreeSet::new();
        while let Some(nx) = dfs.next(reversed) {
            if nx != start {
                found.insert(self.graph[nx].clone());
            }
        }
        Ok(found)
    }

    /// Every skill that transitively depends on `id` (excluding `id`).
    pub fn descendants(&self, id: &SkillId) -> Result<BTreeSet<SkillId>, GraphError> {
        let start = self.node_index(id)?;
        let mut dfs = Dfs::new(&self.graph, start);
        let mut found = BTreeSet::new();
        while let Some(nx) = dfs.next(&self.graph) {
            if nx != start {
                found.insert(self.graph[nx].clone());
            }
        }
        Ok(found)
    }

    /// Not-yet-completed skills whose prerequisites are all completed.
    pub fn unlocked_set(&self, completed: &BTreeSet<SkillId>) -> BTreeSet<SkillId> {
        self.nodes
            .iter()
            .filter(|n| !completed.contains(n.id()) && n.is_unlocked(completed))
            .map(|n| n.id().clone())
            .collect()
    }

    /// The skills still to learn on the way to `target`, prerequisites first.
    ///
    /// Contains the not-completed transitive prerequisites of `target` plus
    /// `target` itself. Among skills that are ready at the same time the
    /// smaller id comes first. Empty when `target` is already completed.
    pub fn learning_path(
        &self,
        target: &SkillId,
        completed: &BTreeSet<SkillId>,
    ) -> Result<Vec<&SkillDefinition>, GraphError> {
        let mut needed = self.ancestors(target)?;
        if completed.contains(target) {
            return Ok(Vec::new());
        }
        needed.insert(target.clone());
        needed.retain(|id| !completed.contains(id));

        // Kahn's algorithm restricted to the needed subset
        let mut pending: HashMap<&SkillId, usize> = needed
            .iter()
            .map(|id| {
                let node = &self.nodes[self.index[id].index()];
                let open = node.prerequisites.iter().filter(|p| needed.contains(*p)).count();
                (id, open)
            })
            .collect();
        let mut ready: BTreeSet<&SkillId> = pending
            .iter()
            .filter(|(_, open)| **open == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut path = Vec::with_capacity(needed.len());
        while let Some(id) = ready.pop_first() {
            let node = &self.nodes[self.index[id].index()];
            path.push(&node.definition);
            for dependent in &node.dependents {
                if let Some(open) = pending.get_mut(dependent) {
                    *open -= 1;
                    if *open == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }
        Ok(path)
    }

    /// Case-insensitive substring search over title, description and category.
    pub fn search(&self, query: &str) -> Vec<&SkillDefinition> {
        let needle = query.to_lowercase();
        self.nodes
            .iter()
            .map(|n| &n.definition)
            .filter(|d| {
                d.title.to_lowercase().contains(&needle)
                    || d.description.to_lowercase().contains(&needle)
                    || d.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn node_index(&self, id: &SkillId) -> Result<NodeIndex, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownSkill(id.clone()))
    }
}

/// Depth-first traversal with an in-progress marker per node: reaching a
/// node that is still on the stack (a back edge) means a cycle.
fn detect_cycle(graph: &DiGraph<SkillId, ()>) -> Result<(), GraphError> {
    let back_edge = depth_first_search(graph, graph.node_indices(), |event| match event {
        DfsEvent::BackEdge(_, target) => Control::Break(target),
        _ => Control::Continue,
    });
    match back_edge.break_value() {
        Some(node) => Err(GraphError::CyclicDependency(graph[node].clone())),
        None => Ok(()),
    }
}
