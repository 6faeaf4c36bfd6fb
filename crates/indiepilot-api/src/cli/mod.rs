//! CLI command definitions for the `indie` binary.
//!
//! Uses clap derive macros for argument parsing. Every command that reports
//! on a user takes the user id as its first positional argument.

pub mod budget;
pub mod recommend;
pub mod score;
pub mod skills;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Skill recommendations and Autonomy Index for IndiePilot users.
#[derive(Parser)]
#[command(name = "indie", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the SQLite database (default: {data_dir}/indiepilot.db).
    #[arg(long, global = true, env = "INDIEPILOT_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the Autonomy Index and its four sub-scores.
    Score {
        /// User id.
        user: String,

        /// Store the result in the autonomy_snapshot table.
        #[arg(long)]
        persist: bool,
    },

    /// Recommend the next skills to learn.
    #[command(alias = "rec")]
    Recommend {
        /// User id.
        user: String,

        /// Number of recommendations to show (default from config.toml).
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Browse the IndieGraph skill catalog.
    Skills {
        #[command(subcommand)]
        action: SkillsCommand,
    },

    /// One guidance line per autonomy area.
    Insights {
        /// User id.
        user: String,
    },

    /// The next milestone in each autonomy area.
    Milestones {
        /// User id.
        user: String,
    },

    /// Budgeting badges earned.
    Badges {
        /// User id.
        user: String,
    },

    /// Split an income amount across the spend, save and share jars.
    Split {
        /// Amount to split.
        amount: f64,

        /// Use this user's allocation instead of the default 60/30/10.
        #[arg(long)]
        user: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SkillsCommand {
    /// List every skill in catalog order.
    #[command(alias = "ls")]
    List,

    /// Show one skill with its prerequisites and dependents.
    Show {
        /// Skill id.
        id: String,
    },

    /// Search titles, descriptions and categories.
    Search {
        /// Case-insensitive text to look for.
        query: String,
    },

    /// Ordered list of skills still needed to reach a target.
    Path {
        /// Target skill id.
        target: String,

        /// User whose completed skills are skipped.
        #[arg(long)]
        user: Option<String>,
    },

    /// Every skill with a user's completed and unlocked flags.
    Tree {
        /// User id.
        user: String,
    },

    /// Completion statistics for a user.
    Stats {
        /// User id.
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_with_persist() {
        let cli = Cli::try_parse_from(["indie", "score", "demo", "--persist", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Score { user, persist } => {
                assert_eq!(user, "demo");
                assert!(persist);
            }
            _ => panic!("expected score"),
        }
    }

    #[test]
    fn test_parse_recommend_top_k() {
        let cli = Cli::try_parse_from(["indie", "recommend", "demo", "-k", "5"]).unwrap();
        match cli.command {
            Commands::Recommend { top_k, .. } => assert_eq!(top_k, Some(5)),
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_parse_skills_path() {
        let cli = Cli::try_parse_from([
            "indie",
            "skills",
            "path",
            "job_interview",
            "--user",
            "demo",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Skills {
                action: SkillsCommand::Path { target, user },
            } => {
                assert_eq!(target, "job_interview");
                assert_eq!(user.as_deref(), Some("demo"));
            }
            _ => panic!("expected skills path"),
        }
    }

    #[test]
    fn test_global_db_flag() {
        let cli =
            Cli::try_parse_from(["indie", "badges", "demo", "--db", "/tmp/pilot.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/pilot.db")));
    }

    #[test]
    fn test_split_requires_amount() {
        assert!(Cli::try_parse_from(["indie", "split"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
