//! The provisioning run — `backlogseed run`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::super::Cli;

pub async fn cmd_run(
    cli: &Cli,
    plan_path: Option<&Path>,
    dry_run: bool,
    project: Option<String>,
    board: Option<u64>,
    sprint_one_size: Option<usize>,
    pace_ms: Option<u64>,
    attachments: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    use backlogseed::client::{DryRunTracker, HttpTracker, Tracker};
    use backlogseed::config::{Config, EnvSnapshot, Overrides};
    use backlogseed::orchestrator::{Orchestrator, RunPhase};
    use backlogseed::plan::SeedPlan;
    use backlogseed::ui::ProvisionUi;

    let config = Config::build(
        EnvSnapshot::capture(),
        Overrides {
            project_key: project,
            board_id: board,
            dry_run,
            pace_ms,
            sprint_one_size,
            attachments,
            out_dir,
        },
    )?;

    let plan = match plan_path {
        Some(path) => SeedPlan::load(path)?,
        None => SeedPlan::sample(),
    };

    if cli.verbose {
        println!(
            "Project {} | board {} | {} epics, {} stories, {} subtasks planned{}",
            config.project_key,
            config
                .board_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "(discover)".to_string()),
            plan.epics.len(),
            plan.stories.len(),
            plan.planned_subtask_count(),
            if config.dry_run { " | DRY RUN" } else { "" },
        );
    }

    let tracker: Arc<dyn Tracker> = if config.dry_run {
        Arc::new(DryRunTracker::new())
    } else {
        Arc::new(HttpTracker::new(
            &config.base_url,
            &config.email,
            &config.api_token,
        ))
    };

    let ui = Arc::new(ProvisionUi::new(RunPhase::ALL.len() as u64));
    let summary = Orchestrator::new(tracker, config, plan)
        .with_ui(ui)
        .run()
        .await?;

    print!("{}", summary.render());
    Ok(())
}
