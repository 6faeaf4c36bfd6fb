//! Per-user views over the skill graph.

use std::collections::{BTreeMap, BTreeSet};

use indiepilot_types::skill::{SkillId, SkillStats, SkillTreeNode};

use crate::graph::SkillGraph;
use crate::recommend::node_centrality;

/// Every skill in catalog order, flagged with the user's progress.
pub fn skill_tree(graph: &SkillGraph, completed: &BTreeSet<SkillId>) -> Vec<SkillTreeNode> {
    graph
        .nodes()
        .map(|node| SkillTreeNode {
            skill: node.definition.clone(),
            completed: completed.contains(node.id()),
            unlocked: node.is_unlocked(completed),
            centrality: node_centrality(node),
        })
        .collect()
}

/// Completion statistics. Completed ids that are not in the catalog are
/// not counted.
pub fn skill_stats(graph: &SkillGraph, completed: &BTreeSet<SkillId>) -> SkillStats {
    let total_skills = graph.len();
    let mut difficulty_breakdown = BTreeMap::new();
    let mut completed_skills = 0;
    for node in graph.nodes().filter(|n| completed.contains(n.id())) {
        completed_skills += 1;
        *difficulty_breakdown
            .entry(node.definition.difficulty.level())
            .or_insert(0) += 1;
    }

    let completion_rate = if total_skills == 0 {
        0.0
    } else {
        (completed_skills as f64 / total_skills as f64 * 1000.0).round() / 10.0
    };

    SkillStats {
        total_skills,
        completed_skills,
        unlocked_skills: graph.unlocked_set(completed).len(),
        completion_rate,
        difficulty_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{diamond, ids};

    #[test]
    fn test_skill_tree_flags() {
        let g = diamond();
        let tree = skill_tree(&g, &ids(&["A", "B"]));
        let by_id: BTreeMap<&str, &SkillTreeNode> =
            tree.iter().map(|n| (n.skill.id.as_str(), n)).collect();
        assert!(by_id["A"].completed && by_id["A"].unlocked);
        assert!(!by_id["C"].completed && by_id["C"].unlocked);
        assert!(!by_id["D"].unlocked);
        assert_eq!(by_id["A"].centrality, 2);
        assert_eq!(by_id["D"].centrality, -2);
    }

    #[test]
    fn test_skill_stats_counts_catalog_members_only() {
        let g = diamond();
        let stats = skill_stats(&g, &ids(&["A", "ghost"]));
        assert_eq!(stats.total_skills, 4);
        assert_eq!(stats.completed_skills, 1);
        assert_eq!(stats.unlocked_skills, 2);
        assert_eq!(stats.completion_rate, 25.0);
        assert_eq!(stats.difficulty_breakdown.values().sum::<usize>(), 1);
    }

    #[test]
    fn test_completion_rate_rounded_to_one_decimal() {
        let g = SkillGraph::builtin().unwrap();
        let stats = skill_stats(&g, &ids(&["time_management"]));
        // 1 / 15 = 6.666..%
        assert_eq!(stats.completion_rate, 6.7);
    }

    #[test]
    fn test_empty_graph_stats() {
        let g = SkillGraph::build(Vec::new()).unwrap();
        let stats = skill_stats(&g, &BTreeSet::new());
        assert_eq!(stats.total_skills, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }
}
