//! Accumulated outcome of one provisioning run, rendered at the end.

use std::fmt::Display;
use std::path::PathBuf;

use console::style;

use crate::client::SprintRef;

#[derive(Debug, Clone)]
pub struct CreatedEpic {
    /// Plan handle (e.g. `EPIC-Auth`), used by stories to find their epic.
    pub handle: String,
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct CreatedStory {
    pub title: String,
    pub key: String,
    pub points: Option<u32>,
}

/// Everything a run produced, successes and failures alike. Partial
/// completion is an accepted end state, so the failure list is ordinary data
/// here, not an error path.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub epics: Vec<CreatedEpic>,
    pub stories: Vec<CreatedStory>,
    pub subtask_keys: Vec<String>,
    pub sprints: Vec<SprintRef>,
    pub sprints_skipped: bool,
    pub attachments_uploaded: usize,
    pub report_files: Vec<PathBuf>,
    pub failures: Vec<String>,
}

impl RunSummary {
    /// Key of a created epic by plan handle. `None` when that epic's
    /// creation failed and it is absent from later phases.
    pub fn epic_key(&self, handle: &str) -> Option<&str> {
        self.epics
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.key.as_str())
    }

    /// Story keys in creation order, the order sprint partitioning uses.
    pub fn story_keys(&self) -> Vec<String> {
        self.stories.iter().map(|s| s.key.clone()).collect()
    }

    pub fn record_failure(&mut self, what: &str, err: &dyn Display) {
        self.failures.push(format!("{what}: {err}"));
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Human-readable end-of-run block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", style("--- Done. Summary ---").bold()));
        out.push_str(&format!(
            "Epics:    {} created ({})\n",
            self.epics.len(),
            keys(self.epics.iter().map(|e| e.key.as_str()))
        ));
        out.push_str(&format!(
            "Stories:  {} created ({})\n",
            self.stories.len(),
            keys(self.stories.iter().map(|s| s.key.as_str()))
        ));
        out.push_str(&format!("Subtasks: {} created\n", self.subtask_keys.len()));
        if self.sprints_skipped {
            out.push_str("Sprints:  skipped (no board)\n");
        } else {
            out.push_str(&format!(
                "Sprints:  {} created ({})\n",
                self.sprints.len(),
                keys(self.sprints.iter().map(|s| s.name.as_str()))
            ));
        }
        if self.attachments_uploaded > 0 {
            out.push_str(&format!(
                "Attachments: {} uploaded\n",
                self.attachments_uploaded
            ));
        }
        for path in &self.report_files {
            out.push_str(&format!("Report artifact: {}\n", path.display()));
        }
        if self.failures.is_empty() {
            out.push_str(&format!("{}\n", style("No failures.").green()));
        } else {
            out.push_str(&format!(
                "{}\n",
                style(format!("{} failure(s):", self.failures.len())).red()
            ));
            for failure in &self.failures {
                out.push_str(&format!("  - {failure}\n"));
            }
        }
        out
    }
}

fn keys<'a>(iter: impl Iterator<Item = &'a str>) -> String {
    let all: Vec<&str> = iter.collect();
    if all.is_empty() {
        return "none".to_string();
    }
    // The first handful is enough for the console; the run log has the rest.
    const SHOWN: usize = 6;
    if all.len() <= SHOWN {
        all.join(", ")
    } else {
        format!("{}, … {} more", all[..SHOWN].join(", "), all.len() - SHOWN)
    }
}
