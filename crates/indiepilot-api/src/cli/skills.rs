//! Skill catalog commands (list, show, search, path, tree, stats).

use std::collections::BTreeSet;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use indiepilot_core::recommend::centrality;
use indiepilot_types::activity::UserId;
use indiepilot_types::skill::{SkillDefinition, SkillId};

use crate::state::AppState;

fn skill_table<'a>(skills: impl IntoIterator<Item = &'a SkillDefinition>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Difficulty").fg(Color::White),
        Cell::new("Needs").fg(Color::White),
    ]);
    for skill in skills {
        let needs = skill
            .prerequisites
            .iter()
            .map(SkillId::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&skill.id).fg(Color::Cyan),
            Cell::new(&skill.title),
            Cell::new(&skill.category),
            Cell::new(skill.difficulty.to_string()),
            Cell::new(if needs.is_empty() { "-".to_string() } else { needs }),
        ]);
    }
    table
}

/// List every skill in catalog order.
pub fn list_skills(state: &AppState, json: bool) -> Result<()> {
    let skills: Vec<&SkillDefinition> = state.graph.nodes().map(|n| &n.definition).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }

    println!();
    println!("{}", skill_table(skills.iter().copied()));
    println!(
        "  {} skill(s), {} root(s)",
        skills.len(),
        state.graph.roots().count()
    );
    println!();
    Ok(())
}

/// Show one skill with its neighbourhood in the graph.
pub fn show_skill(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = SkillId::new(id);
    let node = state.graph.node(&id)?;
    let ancestors = state.graph.ancestors(&id)?;
    let descendants = state.graph.descendants(&id)?;
    let centrality = centrality(&state.graph, &id)?;

    if json {
        let detail = serde_json::json!({
            "skill": node.definition,
            "prerequisites": node.prerequisites(),
            "dependents": node.dependents(),
            "ancestors": ancestors,
            "descendants": descendants,
            "centrality": centrality,
        });
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let skill = &node.definition;
    println!();
    println!(
        "  {} {} {}",
        style("◆").cyan(),
        style(&skill.title).bold(),
        style(format!("({})", skill.id)).dim()
    );
    if !skill.description.is_empty() {
        println!("  {}", skill.description);
    }
    println!();
    println!("  Category:      {}", skill.category);
    println!("  Difficulty:    {}", skill.difficulty);
    if let Some(minutes) = skill.estimated_minutes {
        println!("  Effort:        ~{minutes} min");
    }
    println!("  Centrality:    {centrality}");
    println!("  Prerequisites: {}", join_ids(node.prerequisites()));
    println!("  Unlocks:       {}", join_ids(node.dependents()));
    println!(
        "  Upstream:      {} skill(s), downstream: {} skill(s)",
        ancestors.len(),
        descendants.len()
    );
    println!();
    Ok(())
}

fn join_ids(ids: &BTreeSet<SkillId>) -> String {
    if ids.is_empty() {
        return style("none").dim().to_string();
    }
    ids.iter().map(SkillId::as_str).collect::<Vec<_>>().join(", ")
}

/// Search titles, descriptions and categories.
pub fn search_skills(state: &AppState, query: &str, json: bool) -> Result<()> {
    let found = state.graph.search(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    println!();
    if found.is_empty() {
        println!("  No skills match '{}'.", style(query).yellow());
    } else {
        println!("{}", skill_table(found.iter().copied()));
    }
    println!();
    Ok(())
}

/// Ordered list of skills still needed to reach `target`.
pub async fn learning_path(
    state: &AppState,
    target: &str,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let target = SkillId::new(target);
    let path: Vec<SkillDefinition> = match user {
        Some(user) => state.autonomy.learning_path(&UserId::new(user), &target).await?,
        None => state
            .graph
            .learning_path(&target, &BTreeSet::new())?
            .into_iter()
            .cloned()
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&path)?);
        return Ok(());
    }

    println!();
    if path.is_empty() {
        println!("  {} '{}' is already completed.", style("✓").green(), target);
        println!();
        return Ok(());
    }

    let minutes: u32 = path.iter().filter_map(|s| s.estimated_minutes).sum();
    println!(
        "  {} Path to {} ({} step(s), ~{} min)",
        style("🧭").bold(),
        style(&target).cyan(),
        path.len(),
        minutes
    );
    println!();
    for (i, skill) in path.iter().enumerate() {
        println!(
            "  {:>2}. {} {}",
            i + 1,
            skill.title,
            style(format!("({}, {})", skill.id, skill.difficulty)).dim()
        );
    }
    println!();
    Ok(())
}

/// Every skill with the user's completed and unlocked flags.
pub async fn skill_tree(state: &AppState, user: &str, json: bool) -> Result<()> {
    let tree = state.autonomy.skill_tree(&UserId::new(user)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Status").fg(Color::White),
        Cell::new("Skill").fg(Color::White),
        Cell::new("Difficulty").fg(Color::White),
        Cell::new("Centrality").fg(Color::White),
    ]);
    for node in &tree {
        let status = if node.completed {
            Cell::new("done").fg(Color::Green)
        } else if node.unlocked {
            Cell::new("ready").fg(Color::Yellow)
        } else {
            Cell::new("locked").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            status,
            Cell::new(&node.skill.title),
            Cell::new(node.skill.difficulty.to_string()),
            Cell::new(node.centrality),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Completion statistics.
pub async fn skill_stats(state: &AppState, user: &str, json: bool) -> Result<()> {
    let stats = state.autonomy.skill_stats(&UserId::new(user)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Skills ──").dim());
    println!(
        "  Completed: {}/{} ({:.1}%)",
        style(stats.completed_skills).bold(),
        stats.total_skills,
        stats.completion_rate
    );
    println!("  Ready:     {}", style(stats.unlocked_skills).yellow());
    for (level, count) in &stats.difficulty_breakdown {
        println!("  Level {level}:   {count}");
    }
    println!();
    Ok(())
}
