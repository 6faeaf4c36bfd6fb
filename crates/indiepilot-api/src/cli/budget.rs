//! Budgeting commands: badges and the three-jar income split.

use anyhow::{Result, bail};
use console::style;

use indiepilot_types::activity::{BudgetBadge, UserId};

use crate::state::AppState;

/// Badges earned from budgeting history.
pub async fn badges(state: &AppState, user: &str, json: bool) -> Result<()> {
    let earned = state.autonomy.badges(&UserId::new(user)).await?;

    if json {
        let badges: Vec<_> = earned
            .iter()
            .map(|b| {
                serde_json::json!({
                    "badge": b,
                    "title": b.title(),
                    "description": b.description(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&badges)?);
        return Ok(());
    }

    println!();
    if earned.is_empty() {
        println!(
            "  No badges yet. Log your first budget entry to earn {}.",
            style(BudgetBadge::FirstSteps.title()).bold()
        );
    } else {
        for badge in &earned {
            println!(
                "  {} {} {}",
                style("🏅").bold(),
                style(badge.title()).bold(),
                style(format!("({})", badge.description())).dim()
            );
        }
    }
    println!();
    Ok(())
}

/// Split an income amount across the jars.
pub async fn split(state: &AppState, amount: f64, user: Option<&str>, json: bool) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("amount must be a non-negative number, got {amount}");
    }

    let user = user.map(UserId::new);
    let split = state.autonomy.split(user.as_ref(), amount).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&split)?);
        return Ok(());
    }

    println!();
    println!("  {} Splitting {:.2}", style("💰").bold(), amount);
    println!();
    println!("  Spend: {}", style(format!("{:>10.2}", split.spend)).cyan());
    println!("  Save:  {}", style(format!("{:>10.2}", split.save)).green());
    println!("  Share: {}", style(format!("{:>10.2}", split.share)).magenta());
    println!();
    Ok(())
}
