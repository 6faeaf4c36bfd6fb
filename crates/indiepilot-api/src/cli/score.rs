//! Autonomy Index commands: score, insights, milestones.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use indiepilot_core::repository::snapshot::SnapshotRepository;
use indiepilot_types::activity::UserId;
use indiepilot_types::autonomy::{Area, AutonomyReport};

use crate::state::AppState;

const BAR_WIDTH: usize = 20;

/// Compute and display the Autonomy Index, optionally persisting it.
pub async fn score(state: &AppState, user: &str, persist: bool, json: bool) -> Result<()> {
    let user = UserId::new(user);
    let report = state.autonomy.compute_autonomy_index(&user).await?;

    if persist {
        state.snapshots.save_snapshot(&report).await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    if persist {
        println!(
            "  {} Snapshot saved to {}",
            style("✓").green(),
            style(state.db_path.display()).dim()
        );
        println!();
    }
    Ok(())
}

fn print_report(report: &AutonomyReport) {
    let result = &report.result;
    println!();
    println!(
        "  {} Autonomy Index for {}: {}",
        style("⚡").bold(),
        style(&report.user_id).cyan(),
        style(format!("{:.1}", result.index)).bold()
    );
    println!();

    println!("  {}", style("── Sub-scores ──").dim());
    for area in Area::ALL {
        let value = result.score(area);
        println!(
            "  {:<10} {} {:>5.1}  {}",
            area.to_string(),
            score_bar(value),
            value,
            style(format!("weight {:.2}", report.weights.get(area))).dim()
        );
    }
    println!();

    let f = &report.features;
    println!("  {}", style("── Activity ──").dim());
    println!("  Quests completed: {}", f.completed_quests);
    println!("  Logging streak:   {} day(s)", f.streak_days);
    println!("  Savings ratio:    {:.1}%", f.health_proxy * 100.0);
    if f.jars.spend.deficit() > 0.0 {
        println!(
            "  Spend overdraft:  {}",
            style(format!("{:.2}", f.jars.spend.deficit())).red()
        );
    }
    println!(
        "  Board:            {} post(s), {} claim(s) received",
        f.posts_created, f.claims_received
    );
    println!("  Recent sims:      {}", f.recent_sim_scores.len());
    println!();
}

/// A fixed-width bar coloured by band.
fn score_bar(value: f64) -> String {
    let filled = ((value / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
    if value >= 70.0 {
        style(bar).green().to_string()
    } else if value >= 40.0 {
        style(bar).yellow().to_string()
    } else {
        style(bar).red().to_string()
    }
}

/// One guidance line per area.
pub async fn insights(state: &AppState, user: &str, json: bool) -> Result<()> {
    let insights = state.autonomy.insights(&UserId::new(user)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!();
    for insight in &insights {
        println!(
            "  {} {}",
            style(format!("{:<10}", insight.area.to_string())).cyan(),
            insight.message
        );
    }
    println!();
    Ok(())
}

/// The next milestone per area, as a table.
pub async fn milestones(state: &AppState, user: &str, json: bool) -> Result<()> {
    let milestones = state.autonomy.milestones(&UserId::new(user)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&milestones)?);
        return Ok(());
    }

    if milestones.is_empty() {
        println!();
        println!(
            "  {} Every milestone reached. Nice work!",
            style("🏆").bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Area").fg(Color::White),
        Cell::new("Milestone").fg(Color::White),
        Cell::new("Progress").fg(Color::White),
        Cell::new("Reward").fg(Color::White),
    ]);
    for m in &milestones {
        table.add_row(vec![
            Cell::new(m.area.to_string()).fg(Color::Cyan),
            Cell::new(&m.description),
            Cell::new(format!("{}/{}", m.current, m.target)),
            Cell::new(&m.reward).fg(Color::Green),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
