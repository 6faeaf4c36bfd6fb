//! Skill graph domain types.
//!
//! A skill is a node in the IndieGraph: a life skill with display metadata
//! and a set of prerequisite skills. Recommendations and tree views are
//! ephemeral values derived from a user's completed-skill set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identifier of a skill node (e.g. `"budget_tracking"`).
///
/// Ordered lexicographically; recommendation ties break on this ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SkillId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Skill difficulty on the 1-3 scale used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn level(self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Difficulty::Beginner),
            2 => Ok(Difficulty::Intermediate),
            3 => Ok(Difficulty::Advanced),
            other => Err(format!("difficulty must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.level()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Static definition of a skill node, as authored in the skill catalog.
///
/// Edges point from each prerequisite to this skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub difficulty: Difficulty,
    /// Rough effort to complete, in minutes.
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub prerequisites: Vec<SkillId>,
}

impl SkillDefinition {
    /// A skill with zero prerequisites is a root of the graph.
    pub fn is_root(&self) -> bool {
        self.prerequisites.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// A ranked next-skill suggestion.
///
/// `centrality` is out-degree minus in-degree and may be negative.
/// `coverage` counts direct dependents not yet completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub skill_id: SkillId,
    pub centrality: i64,
    pub coverage: i64,
    pub combined: i64,
}

/// A recommendation joined with the skill's display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedSkill {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub skill: SkillDefinition,
}

/// One node of the skill tree as seen by a particular user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTreeNode {
    pub skill: SkillDefinition,
    pub completed: bool,
    pub unlocked: bool,
    pub centrality: i64,
}

/// Progress statistics over the skill catalog for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillStats {
    pub total_skills: usize,
    pub completed_skills: usize,
    pub unlocked_skills: usize,
    /// Percentage of the catalog completed, rounded to one decimal.
    pub completion_rate: f64,
    /// Completed skills per difficulty level.
    pub difficulty_breakdown: BTreeMap<u8, usize>,
}
