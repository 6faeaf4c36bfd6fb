//! Guidance derived from autonomy scores: per-area insights and the next
//! milestone in each area.

use indiepilot_types::activity::ActivityFeatures;
use indiepilot_types::autonomy::{Area, AutonomyResult, Insight, Milestone};

/// Score bands per area: below `low`, below `high`, or above.
struct Band {
    area: Area,
    low: f64,
    high: f64,
    messages: [&'static str; 3],
}

const BANDS: [Band; 4] = [
    Band {
        area: Area::Skills,
        low: 30.0,
        high: 70.0,
        messages: [
            "Try completing some beginner quests to build your life skills foundation.",
            "Great progress on skills! Consider tackling some intermediate quests.",
            "Excellent skills development! You're ready for advanced challenges.",
        ],
    },
    Band {
        area: Area::Budgeting,
        low: 40.0,
        high: 80.0,
        messages: [
            "Start logging your expenses regularly to improve your financial awareness.",
            "Good budgeting habits! Try to increase your savings ratio.",
            "Outstanding financial management! You're building great money habits.",
        ],
    },
    Band {
        area: Area::Community,
        low: 20.0,
        high: 60.0,
        messages: [
            "Connect with others on the Youth Board to build your community score.",
            "Nice community engagement! Try both creating and responding to posts.",
            "Excellent community participation! You're a great team player.",
        ],
    },
    Band {
        area: Area::Judgment,
        low: 50.0,
        high: 80.0,
        messages: [
            "Practice decision-making with simulation scenarios to improve your judgment.",
            "Good judgment skills! Keep practicing different scenarios.",
            "Outstanding decision-making! You show excellent judgment in complex situations.",
        ],
    },
];

/// One insight per area, in Skills, Budgeting, Community, Judgment order.
pub fn insights(result: &AutonomyResult) -> Vec<Insight> {
    BANDS
        .iter()
        .map(|band| {
            let score = result.score(band.area);
            let message = if score < band.low {
                band.messages[0]
            } else if score < band.high {
                band.messages[1]
            } else {
                band.messages[2]
            };
            Insight {
                area: band.area,
                message: message.to_string(),
            }
        })
        .collect()
}

/// Smallest multiple of `step` strictly greater than `current`, if within `cap`.
fn next_target(current: u32, step: u32, cap: u32) -> Option<u32> {
    let target = (current / step).checked_add(1)?.checked_mul(step)?;
    (target <= cap).then_some(target)
}

/// The next milestone in each area that still has one below its cap.
pub fn next_milestones(features: &ActivityFeatures, sim_run_count: u32) -> Vec<Milestone> {
    let mut milestones = Vec::with_capacity(4);

    let quests = features.completed_quests;
    if let Some(target) = next_target(quests, 5, 20) {
        milestones.push(Milestone {
            area: Area::Skills,
            description: format!("Complete {target} quests"),
            current: quests,
            target,
            reward: format!("+{} XP", target * 2),
        });
    }

    let streak = features.streak_days;
    if let Some(target) = next_target(streak, 7, 30) {
        milestones.push(Milestone {
            area: Area::Budgeting,
            description: format!("{target}-day logging streak"),
            current: streak,
            target,
            reward: "+15 Autonomy Points".to_string(),
        });
    }

    let posts = features.posts_created;
    if let Some(target) = next_target(posts, 3, 15) {
        milestones.push(Milestone {
            area: Area::Community,
            description: format!("Create {target} board posts"),
            current: posts,
            target,
            reward: "+10 Community Points".to_string(),
        });
    }

    if let Some(target) = next_target(sim_run_count, 2, 10) {
        milestones.push(Milestone {
            area: Area::Judgment,
            description: format!("Complete {target} simulation scenarios"),
            current: sim_run_count,
            target,
            reward: "+20 Judgment Points".to_string(),
        });
    }

    milestones
}
