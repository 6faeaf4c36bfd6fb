//! Skill recommendation command.

use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use console::style;

use indiepilot_types::activity::UserId;

use crate::state::AppState;

/// Show the top-K next skills for a user.
pub async fn recommend(state: &AppState, user: &str, top_k: Option<usize>, json: bool) -> Result<()> {
    let user = UserId::new(user);
    let recs = state.autonomy.recommend_skills(&user, top_k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
        return Ok(());
    }

    if recs.is_empty() {
        println!();
        println!(
            "  {} Nothing to recommend for {}: every unlocked skill is done.",
            style("✓").green(),
            style(&user).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Skill").fg(Color::White),
        Cell::new("Difficulty").fg(Color::White),
        Cell::new("Centrality").fg(Color::White),
        Cell::new("Coverage").fg(Color::White),
        Cell::new("Score").fg(Color::White),
    ]);

    for (rank, rec) in recs.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{}\n{}", rec.skill.title, rec.skill.id)),
            Cell::new(rec.skill.difficulty.to_string()),
            Cell::new(rec.recommendation.centrality).set_alignment(CellAlignment::Right),
            Cell::new(rec.recommendation.coverage).set_alignment(CellAlignment::Right),
            Cell::new(rec.recommendation.combined)
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    println!();
    println!("  {} Next skills for {}", style("🧭").bold(), style(&user).cyan());
    println!();
    println!("{table}");
    println!();
    Ok(())
}
