//! Activity aggregation: raw records in, scalar features out.
//!
//! Every function here is a pure reduction over read-only record slices for
//! one user and a reference timestamp. Empty input yields the documented
//! default, never an error.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Days, NaiveDate, Utc};

use indiepilot_types::activity::{
    ActivityFeatures, ActivityRecords, BoardClaim, BoardPost, BudgetBadge, BudgetEntry,
    CompletionRecord, JarLedger, SimRun, UserId,
};
use indiepilot_types::config::ScoringConfig;
use indiepilot_types::skill::SkillId;

/// Board participation counts for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommunityCounts {
    pub posts_created: u32,
    /// Claims placed by other users on this user's posts.
    pub claims_received: u32,
    /// Distinct posts this user has claimed.
    pub posts_claimed: u32,
}

/// Number of progress rows that carry a completion timestamp.
pub fn completed_quest_count(completions: &[CompletionRecord]) -> u32 {
    saturating_u32(completions.iter().filter(|c| c.is_completed()).count())
}

/// Identifiers of completed skills.
pub fn completed_skill_set(completions: &[CompletionRecord]) -> BTreeSet<SkillId> {
    completions
        .iter()
        .filter(|c| c.is_completed())
        .map(|c| c.skill_id.clone())
        .collect()
}

/// Sum signed entries into per-jar deposit and withdrawal totals.
///
/// Non-finite amounts are skipped.
pub fn jar_ledger(entries: &[BudgetEntry]) -> JarLedger {
    let mut ledger = JarLedger::default();
    for entry in entries {
        if !entry.amount.is_finite() {
            tracing::warn!(entry = %entry.id, "skipping budget entry with non-finite amount");
            continue;
        }
        let totals = ledger.get_mut(entry.jar);
        if entry.amount >= 0.0 {
            totals.deposited += entry.amount;
        } else {
            totals.withdrawn += -entry.amount;
        }
    }
    ledger
}

/// Save-jar deposits divided by deposits across all jars, or 0 without
/// deposits.
pub fn health_proxy(ledger: &JarLedger) -> f64 {
    let total = ledger.total_deposited();
    if total > 0.0 {
        (ledger.save.deposited / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Consecutive UTC days with at least one budget entry, counted backward.
///
/// The count starts at today, or at yesterday when nothing has been logged
/// yet today. Entries dated after `now` are ignored.
pub fn logging_streak(entries: &[BudgetEntry], now: DateTime<Utc>) -> u32 {
    let today = now.date_naive();
    let days: HashSet<NaiveDate> = entries
        .iter()
        .map(|e| e.logged_at.date_naive())
        .filter(|d| *d <= today)
        .collect();

    let Some(mut cursor) = [Some(today), today.checked_sub_days(Days::new(1))]
        .into_iter()
        .flatten()
        .find(|d| days.contains(d))
    else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Count posts created, claims received from others, and posts claimed.
pub fn community_counts(
    user: &UserId,
    posts_authored: &[BoardPost],
    claims_on_own_posts: &[BoardClaim],
    claims_made: &[BoardClaim],
) -> CommunityCounts {
    let own_posts: HashSet<&str> = posts_authored
        .iter()
        .filter(|p| &p.author == user)
        .map(|p| p.id.as_str())
        .collect();

    let claims_received = claims_on_own_posts
        .iter()
        .filter(|c| &c.claimant != user && own_posts.contains(c.post_id.as_str()))
        .count();

    let posts_claimed: HashSet<&str> = claims_made
        .iter()
        .filter(|c| &c.claimant == user)
        .map(|c| c.post_id.as_str())
        .collect();

    CommunityCounts {
        posts_created: saturating_u32(own_posts.len()),
        claims_received: saturating_u32(claims_received),
        posts_claimed: saturating_u32(posts_claimed.len()),
    }
}

/// The newest `window` simulation scores, chronological (most recent last).
///
/// Scores are clamped into [0, 100]; non-finite scores are dropped.
pub fn recent_sim_scores(runs: &[SimRun], window: usize) -> Vec<f64> {
    let mut newest_first: Vec<&SimRun> = runs.iter().filter(|r| r.score.is_finite()).collect();
    newest_first.sort_by(|a, b| b.ran_at.cmp(&a.ran_at));
    let mut scores: Vec<f64> = newest_first
        .into_iter()
        .take(window)
        .map(|r| r.score.clamp(0.0, 100.0))
        .collect();
    scores.reverse();
    scores
}

/// Arithmetic mean of `scores`, or `default` when empty.
pub fn mean_or(scores: &[f64], default: f64) -> f64 {
    if scores.is_empty() {
        return default;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Reduce one user's records into the scorer's feature snapshot.
pub fn aggregate(
    user: &UserId,
    records: &ActivityRecords,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> ActivityFeatures {
    let jars = jar_ledger(&records.budget_entries);
    let community = community_counts(
        user,
        &records.posts_authored,
        &records.claims_on_own_posts,
        &records.claims_made,
    );

    let features = ActivityFeatures {
        completed_quests: completed_quest_count(&records.completions),
        streak_days: logging_streak(&records.budget_entries, now),
        health_proxy: health_proxy(&jars),
        jars,
        posts_created: community.posts_created,
        claims_received: community.claims_received,
        posts_claimed: community.posts_claimed,
        recent_sim_scores: recent_sim_scores(&records.recent_sim_runs, config.judgment_window),
    };

    tracing::debug!(
        user = %user,
        quests = features.completed_quests,
        streak = features.streak_days,
        posts = features.posts_created,
        sims = features.recent_sim_scores.len(),
        "aggregated activity features"
    );
    features
}

/// Badges earned from budgeting history.
pub fn budget_badges(entries: &[BudgetEntry], streak_days: u32, jars: &JarLedger) -> Vec<BudgetBadge> {
    let mut badges = Vec::new();
    if !entries.is_empty() {
        badges.push(BudgetBadge::FirstSteps);
    }
    if streak_days >= 7 {
        badges.push(BudgetBadge::WeekWarrior);
    }
    if streak_days >= 30 {
        badges.push(BudgetBadge::MonthlyMaster);
    }
    if jars.save.balance() >= 100.0 {
        badges.push(BudgetBadge::Saver);
    }
    if jars.share.balance() >= 50.0 {
        badges.push(BudgetBadge::Giver);
    }
    badges
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
