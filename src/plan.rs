//! Provisioning plan: the declarative input the orchestrator walks.
//!
//! A plan names epics, stories (each owned by one epic, with an optional
//! point estimate), per-story subtask templates, and the two sprint
//! definitions. Plans load from a TOML file (`--plan seed.toml`); a built-in
//! sample covering a payments-app backlog ships with the binary and is what
//! `plan init` writes out.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpicDef {
    /// Reference handle used by stories to name their owning epic. Never sent
    /// to the tracker.
    pub id: String,
    /// Epic name (the tracker's dedicated epic-name field).
    pub name: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryDef {
    pub title: String,
    /// Handle of the owning epic (`EpicDef::id`).
    pub epic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SprintDef {
    pub name: String,
    pub goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedPlan {
    pub epics: Vec<EpicDef>,
    pub stories: Vec<StoryDef>,
    /// Story title → explicit subtask summaries. Stories without an entry get
    /// the generic design/implement/test template.
    #[serde(default)]
    pub subtask_templates: BTreeMap<String, Vec<String>>,
    pub sprints: Vec<SprintDef>,
}

impl SeedPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?;
        let plan: SeedPlan = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse plan file {}", path.display()))?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize plan to TOML")
    }

    /// Reject plans the orchestrator cannot walk: dangling epic references or
    /// a sprint count other than two (the workflow creates exactly two
    /// back-to-back 14-day sprints).
    pub fn validate(&self) -> Result<()> {
        if self.epics.is_empty() {
            bail!("Plan defines no epics");
        }
        for story in &self.stories {
            if !self.epics.iter().any(|e| e.id == story.epic) {
                bail!(
                    "Story '{}' references unknown epic '{}'",
                    story.title,
                    story.epic
                );
            }
        }
        if self.sprints.len() != 2 {
            bail!(
                "Plan must define exactly 2 sprints, found {}",
                self.sprints.len()
            );
        }
        Ok(())
    }

    /// Subtask summaries for a story: the explicit template when one exists,
    /// otherwise the generic three-item fallback.
    pub fn subtasks_for(&self, story_title: &str) -> Vec<String> {
        match self.subtask_templates.get(story_title) {
            Some(template) => template.clone(),
            None => vec![
                format!("Design {story_title} UI"),
                format!("Implement backend for {story_title}"),
                format!("Add tests for {story_title}"),
            ],
        }
    }

    /// Total subtasks the plan implies across all stories.
    pub fn planned_subtask_count(&self) -> usize {
        self.stories
            .iter()
            .map(|s| self.subtasks_for(&s.title).len())
            .sum()
    }

    /// The built-in sample backlog: a UPI payments app with five epics,
    /// fifteen stories, and explicit subtask templates for the first four.
    pub fn sample() -> Self {
        let epics = vec![
            epic("EPIC-Auth", "User Authentication and Onboarding", "Signup, login, and bank linking"),
            epic("EPIC-UPI", "Money Transfer and UPI Payments", "Send, receive, and track UPI payments"),
            epic("EPIC-Bill", "Recharge and Bill Payments", "Mobile recharge and utility payments"),
            epic("EPIC-History", "Transaction History and Analytics", "History, statements, analytics"),
            epic("EPIC-Security", "Security, Notifications, and Support", "Notifications, PIN, and support"),
        ];
        let stories = vec![
            story("Signup with mobile number", "EPIC-Auth", 3),
            story("Login using OTP/Biometric", "EPIC-Auth", 2),
            story("Link bank account for UPI", "EPIC-Auth", 3),
            story("Send money using UPI", "EPIC-UPI", 5),
            story("Request money via UPI", "EPIC-UPI", 3),
            story("View transaction status", "EPIC-UPI", 2),
            story("Mobile recharge", "EPIC-Bill", 3),
            story("Pay electricity/water/DTH bills", "EPIC-Bill", 5),
            story("View past bills & recharges", "EPIC-Bill", 2),
            story("Transaction history view", "EPIC-History", 3),
            story("Download monthly statement", "EPIC-History", 2),
            story("Spending insights (charts)", "EPIC-History", 5),
            story("Notifications for transactions", "EPIC-Security", 2),
            story("Customer support and complaints", "EPIC-Security", 3),
            story("Set PIN and biometric security", "EPIC-Security", 3),
        ];
        let mut subtask_templates = BTreeMap::new();
        subtask_templates.insert(
            "Signup with mobile number".to_string(),
            strings(&["Design signup UI", "Implement OTP verification", "Store user data in DB"]),
        );
        subtask_templates.insert(
            "Login using OTP/Biometric".to_string(),
            strings(&["Create login UI", "Integrate biometric API", "Validate OTP flow"]),
        );
        subtask_templates.insert(
            "Link bank account for UPI".to_string(),
            strings(&[
                "Integrate with UPI provider API",
                "Implement bank account verification",
                "Store linked bank info securely",
            ]),
        );
        subtask_templates.insert(
            "Send money using UPI".to_string(),
            strings(&[
                "Create Send Money screen",
                "Integrate UPI transaction API",
                "Add success/failure messages",
            ]),
        );
        let sprints = vec![
            SprintDef {
                name: "Sprint 1 - Core Functionality".to_string(),
                goal: "Onboarding + UPI basics".to_string(),
            },
            SprintDef {
                name: "Sprint 2 - Enhancements & Support".to_string(),
                goal: "Recharge, Analytics, Support".to_string(),
            },
        ];
        Self {
            epics,
            stories,
            subtask_templates,
            sprints,
        }
    }
}

fn epic(id: &str, name: &str, summary: &str) -> EpicDef {
    EpicDef {
        id: id.to_string(),
        name: name.to_string(),
        summary: summary.to_string(),
    }
}

fn story(title: &str, epic: &str, points: u32) -> StoryDef {
    StoryDef {
        title: title.to_string(),
        epic: epic.to_string(),
        points: Some(points),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
