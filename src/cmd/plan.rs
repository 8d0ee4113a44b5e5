//! Plan inspection and scaffolding — `backlogseed plan`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use super::super::PlanCommands;

pub fn cmd_plan(command: Option<PlanCommands>, plan_path: Option<&Path>) -> Result<()> {
    use backlogseed::plan::SeedPlan;

    match command {
        None | Some(PlanCommands::Show) => {
            let plan = match plan_path {
                Some(path) => SeedPlan::load(path)?,
                None => SeedPlan::sample(),
            };
            show_plan(&plan);
        }
        Some(PlanCommands::Init { path }) => {
            if path.exists() {
                bail!("{} already exists; not overwriting", path.display());
            }
            let plan = SeedPlan::sample();
            std::fs::write(&path, plan.to_toml()?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote sample plan to {}", path.display());
        }
    }
    Ok(())
}

fn show_plan(plan: &backlogseed::plan::SeedPlan) {
    for epic in &plan.epics {
        println!("{} {}", style("Epic").bold().cyan(), epic.name);
        println!("       {}", style(&epic.summary).dim());
        for story in plan.stories.iter().filter(|s| s.epic == epic.id) {
            let points = story
                .points
                .map(|p| format!(" [{p} pts]"))
                .unwrap_or_default();
            println!(
                "  - {}{} ({} subtasks)",
                story.title,
                points,
                plan.subtasks_for(&story.title).len()
            );
        }
    }
    println!();
    for sprint in &plan.sprints {
        println!(
            "{} {} — {}",
            style("Sprint").bold().magenta(),
            sprint.name,
            sprint.goal
        );
    }
    println!(
        "\n{} epics, {} stories, {} subtasks planned",
        plan.epics.len(),
        plan.stories.len(),
        plan.planned_subtask_count()
    );
}
