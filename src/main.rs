use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "backlogseed")]
#[command(version, about = "Seed a scrum project with epics, stories, subtasks, and sprints")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute the provisioning run against the configured tracker
    Run {
        /// Plan file (TOML). Defaults to the built-in sample plan
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Fabricate every response locally instead of calling the tracker
        #[arg(long)]
        dry_run: bool,

        /// Project key (overrides PROJECT_KEY)
        #[arg(long)]
        project: Option<String>,

        /// Board id for sprint creation (overrides BOARD_ID; discovered if absent)
        #[arg(long)]
        board: Option<u64>,

        /// How many stories, in creation order, go to sprint 1
        #[arg(long)]
        sprint_one_size: Option<usize>,

        /// Delay in milliseconds between consecutive write calls
        #[arg(long)]
        pace_ms: Option<u64>,

        /// Local file to attach to the first created epic (repeatable)
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,

        /// Directory for report artifacts
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Inspect or scaffold provisioning plans
    Plan {
        #[command(subcommand)]
        command: Option<PlanCommands>,

        /// Plan file (TOML). Defaults to the built-in sample plan
        #[arg(long, global = true)]
        plan: Option<PathBuf>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum PlanCommands {
    /// Show the plan that a run would provision
    Show,
    /// Write the built-in sample plan to a TOML file
    Init {
        #[arg(default_value = "seed.toml")]
        path: PathBuf,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the resolved configuration (token redacted)
    Show,
    /// Check that a real (non-dry-run) run could start
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A local .env is honored when present; the environment wins otherwise.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run {
            plan,
            dry_run,
            project,
            board,
            sprint_one_size,
            pace_ms,
            attachments,
            out_dir,
        } => {
            cmd::cmd_run(
                &cli,
                plan.as_deref(),
                *dry_run,
                project.clone(),
                *board,
                *sprint_one_size,
                *pace_ms,
                attachments.clone(),
                out_dir.clone(),
            )
            .await?;
        }
        Commands::Plan { command, plan } => {
            cmd::cmd_plan(command.clone(), plan.as_deref())?;
        }
        Commands::Config { command } => {
            cmd::cmd_config(command.clone())?;
        }
    }

    Ok(())
}
