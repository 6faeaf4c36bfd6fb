//! Activity record types and the per-request feature snapshot.
//!
//! Records mirror the rows the storage collaborator hands over (quest
//! completions, budget log entries, board posts and claims, simulation runs).
//! `ActivityFeatures` is the reduced, transient snapshot the scorer consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::skill::SkillId;

/// Identifier of a user as stored by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// The three budgeting jars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jar {
    Spend,
    Save,
    Share,
}

impl Jar {
    pub const ALL: [Jar; 3] = [Jar::Spend, Jar::Save, Jar::Share];
}

impl fmt::Display for Jar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jar::Spend => write!(f, "spend"),
            Jar::Save => write!(f, "save"),
            Jar::Share => write!(f, "share"),
        }
    }
}

impl FromStr for Jar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spend" => Ok(Jar::Spend),
            "save" => Ok(Jar::Save),
            "share" => Ok(Jar::Share),
            other => Err(format!("invalid jar: '{other}'")),
        }
    }
}

/// A signed budget log entry. Positive amounts are deposits, negative are
/// withdrawals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub id: Uuid,
    pub jar: Jar,
    pub amount: f64,
    pub logged_at: DateTime<Utc>,
}

/// Deposit and withdrawal totals for a single jar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JarTotals {
    pub deposited: f64,
    /// Sum of withdrawals as a positive magnitude.
    pub withdrawn: f64,
}

impl JarTotals {
    /// Running balance: deposits minus withdrawals.
    pub fn balance(&self) -> f64 {
        self.deposited - self.withdrawn
    }

    /// How far the jar is overdrawn, or 0 when the balance is non-negative.
    pub fn deficit(&self) -> f64 {
        (-self.balance()).max(0.0)
    }
}

/// Per-jar totals for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JarLedger {
    pub spend: JarTotals,
    pub save: JarTotals,
    pub share: JarTotals,
}

impl JarLedger {
    pub fn get(&self, jar: Jar) -> &JarTotals {
        match jar {
            Jar::Spend => &self.spend,
            Jar::Save => &self.save,
            Jar::Share => &self.share,
        }
    }

    pub fn get_mut(&mut self, jar: Jar) -> &mut JarTotals {
        match jar {
            Jar::Spend => &mut self.spend,
            Jar::Save => &mut self.save,
            Jar::Share => &mut self.share,
        }
    }

    pub fn total_deposited(&self) -> f64 {
        Jar::ALL.iter().map(|j| self.get(*j).deposited).sum()
    }
}

/// Achievement earned from budgeting behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBadge {
    FirstSteps,
    WeekWarrior,
    MonthlyMaster,
    Saver,
    Giver,
}

impl BudgetBadge {
    pub fn title(self) -> &'static str {
        match self {
            BudgetBadge::FirstSteps => "First Steps",
            BudgetBadge::WeekWarrior => "Week Warrior",
            BudgetBadge::MonthlyMaster => "Monthly Master",
            BudgetBadge::Saver => "Saver",
            BudgetBadge::Giver => "Giver",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BudgetBadge::FirstSteps => "Logged your first transaction",
            BudgetBadge::WeekWarrior => "7-day logging streak",
            BudgetBadge::MonthlyMaster => "30-day logging streak",
            BudgetBadge::Saver => "Saved $100 total",
            BudgetBadge::Giver => "Shared $50 total",
        }
    }
}

// ---------------------------------------------------------------------------
// Quests, board, simulations
// ---------------------------------------------------------------------------

/// A user's progress row for a quest/skill.
///
/// `completed` mirrors `completed_at IS NOT NULL` in storage. `completed_at`
/// may still be `None` on a completed row when the stored value could not be
/// read as a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user_id: UserId,
    pub skill_id: SkillId,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompletionRecord {
    /// A finished quest at a known time.
    pub fn finished(user_id: UserId, skill_id: SkillId, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            skill_id,
            completed: true,
            completed_at: Some(at),
        }
    }

    /// A quest that was started but not finished.
    pub fn open(user_id: UserId, skill_id: SkillId) -> Self {
        Self {
            user_id,
            skill_id,
            completed: false,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

/// A Youth Board post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardPost {
    pub id: String,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
}

/// A claim placed by `claimant` on post `post_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardClaim {
    pub id: String,
    pub post_id: String,
    pub claimant: UserId,
    pub claimed_at: DateTime<Utc>,
}

/// A finished decision-making simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRun {
    pub scenario_id: String,
    /// Overall score, nominally in [0, 100].
    pub score: f64,
    pub ran_at: DateTime<Utc>,
}

/// Raw records fetched for one user, as handed to the aggregator.
#[derive(Debug, Clone, Default)]
pub struct ActivityRecords {
    pub completions: Vec<CompletionRecord>,
    /// Budget entries, ordered by time.
    pub budget_entries: Vec<BudgetEntry>,
    pub posts_authored: Vec<BoardPost>,
    /// Claims placed against the user's own posts (any claimant).
    pub claims_on_own_posts: Vec<BoardClaim>,
    /// Claims the user placed.
    pub claims_made: Vec<BoardClaim>,
    /// Most recent simulation runs, newest first.
    pub recent_sim_runs: Vec<SimRun>,
}

/// Scalar inputs for the autonomy scorer, recomputed per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityFeatures {
    pub completed_quests: u32,
    pub streak_days: u32,
    pub jars: JarLedger,
    /// Save-jar deposits over all deposits, in [0, 1].
    pub health_proxy: f64,
    pub posts_created: u32,
    pub claims_received: u32,
    pub posts_claimed: u32,
    /// Chronological, most recent last.
    pub recent_sim_scores: Vec<f64>,
}
