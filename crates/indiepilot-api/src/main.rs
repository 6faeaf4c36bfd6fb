//! IndiePilot CLI entry point.
//!
//! Binary name: `indie`
//!
//! Parses CLI arguments, builds the skill graph, opens the database, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, SkillsCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,indiepilot_core=debug,indiepilot_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "indie", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.db.as_deref()).await?;

    match cli.command {
        Commands::Score { user, persist } => {
            cli::score::score(&state, &user, persist, cli.json).await?;
        }

        Commands::Recommend { user, top_k } => {
            cli::recommend::recommend(&state, &user, top_k, cli.json).await?;
        }

        Commands::Skills { action } => match action {
            SkillsCommand::List => cli::skills::list_skills(&state, cli.json)?,
            SkillsCommand::Show { id } => cli::skills::show_skill(&state, &id, cli.json)?,
            SkillsCommand::Search { query } => {
                cli::skills::search_skills(&state, &query, cli.json)?;
            }
            SkillsCommand::Path { target, user } => {
                cli::skills::learning_path(&state, &target, user.as_deref(), cli.json).await?;
            }
            SkillsCommand::Tree { user } => {
                cli::skills::skill_tree(&state, &user, cli.json).await?;
            }
            SkillsCommand::Stats { user } => {
                cli::skills::skill_stats(&state, &user, cli.json).await?;
            }
        },

        Commands::Insights { user } => {
            cli::score::insights(&state, &user, cli.json).await?;
        }

        Commands::Milestones { user } => {
            cli::score::milestones(&state, &user, cli.json).await?;
        }

        Commands::Badges { user } => {
            cli::budget::badges(&state, &user, cli.json).await?;
        }

        Commands::Split { amount, user } => {
            cli::budget::split(&state, amount, user.as_deref(), cli.json).await?;
        }

        // handled above
        Commands::Completions { .. } => {}
    }

    Ok(())
}
