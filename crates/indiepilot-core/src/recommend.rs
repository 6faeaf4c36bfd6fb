//! Next-best-skill recommendations over the IndieGraph.
//!
//! Candidates are the skills a user has not completed whose prerequisites
//! are all completed. Each candidate is scored with two degree heuristics:
//!
//! - centrality = |dependents| - |prerequisites| (leverage: opens many doors
//!   while requiring few; may be negative)
//! - coverage = number of direct dependents not yet completed
//!
//! and ranked by `centrality + coverage` descending, ties by ascending id.
//! Locked skills are never candidates.

use std::collections::BTreeSet;

use indiepilot_types::error::GraphError;
use indiepilot_types::skill::{Recommendation, SkillId};

use crate::graph::{SkillGraph, SkillNode};

/// Out-degree minus in-degree of a skill.
pub fn centrality(graph: &SkillGraph, id: &SkillId) -> Result<i64, GraphError> {
    graph.node(id).map(node_centrality)
}

/// Direct dependents of `id` that are not in `completed`.
pub fn coverage(
    graph: &SkillGraph,
    id: &SkillId,
    completed: &BTreeSet<SkillId>,
) -> Result<i64, GraphError> {
    graph.node(id).map(|n| node_coverage(n, completed))
}

pub(crate) fn node_centrality(node: &SkillNode) -> i64 {
    node.dependents().len() as i64 - node.prerequisites().len() as i64
}

fn node_coverage(node: &SkillNode, completed: &BTreeSet<SkillId>) -> i64 {
    node.dependents()
        .iter()
        .filter(|d| !completed.contains(*d))
        .count() as i64
}

/// Rank every unlocked, not-yet-completed skill, best first.
///
/// Returns the full ranking; callers truncate for display. An empty result
/// is valid (nothing unlocked, or everything completed).
pub fn recommend(graph: &SkillGraph, completed: &BTreeSet<SkillId>) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = graph
        .nodes()
        .filter(|n| !completed.contains(n.id()) && n.is_unlocked(completed))
        .map(|n| {
            let centrality = node_centrality(n);
            let coverage = node_coverage(n, completed);
            Recommendation {
                skill_id: n.id().clone(),
                centrality,
                coverage,
                combined: centrality + coverage,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.combined
            .cmp(&a.combined)
            .then_with(|| a.skill_id.cmp(&b.skill_id))
    });

    tracing::debug!(
        completed = completed.len(),
        candidates = ranked.len(),
        "ranked skill recommendations"
    );
    ranked
}
