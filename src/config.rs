//! Runtime configuration for a provisioning run.
//!
//! Layering is environment-then-flags: the tracker coordinates come from the
//! environment (a local `.env` is honored), and CLI flags override the
//! workflow knobs. Missing credentials are fatal at startup — except in
//! dry-run mode, which talks to nothing.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Environment variables consumed, keeping the names the original tooling
/// around this tracker already uses.
pub const ENV_URL: &str = "JIRA_URL";
pub const ENV_EMAIL: &str = "JIRA_EMAIL";
pub const ENV_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_PROJECT: &str = "PROJECT_KEY";
pub const ENV_BOARD: &str = "BOARD_ID";

const DEFAULT_PROJECT_KEY: &str = "PHON";
const DEFAULT_PACE_MS: u64 = 500;
const DEFAULT_SPRINT_ONE_SIZE: usize = 6;

/// Raw environment values, captured once so construction is deterministic
/// and testable without mutating the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub project_key: Option<String>,
    pub board_id: Option<String>,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        let get = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            base_url: get(ENV_URL),
            email: get(ENV_EMAIL),
            api_token: get(ENV_TOKEN),
            project_key: get(ENV_PROJECT),
            board_id: get(ENV_BOARD),
        }
    }
}

/// CLI-level overrides applied on top of the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project_key: Option<String>,
    pub board_id: Option<u64>,
    pub dry_run: bool,
    pub pace_ms: Option<u64>,
    pub sprint_one_size: Option<usize>,
    pub attachments: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    /// Board to create sprints on. `None` means the orchestrator will try to
    /// discover one; discovery failure degrades the run (sprint phases skip).
    pub board_id: Option<u64>,
    pub dry_run: bool,
    /// Cooperative delay between consecutive write calls. Zero in dry-run.
    pub pace: Duration,
    /// How many of the created stories (by creation order) go to sprint 1;
    /// the remainder go to sprint 2.
    pub sprint_one_size: usize,
    /// Local files attached to the first created epic, best-effort.
    pub attachments: Vec<PathBuf>,
    /// Where report artifacts (`sprint1_report.json`, `velocity.json`) land.
    pub out_dir: PathBuf,
}

impl Config {
    pub fn build(env: EnvSnapshot, overrides: Overrides) -> Result<Self> {
        let dry_run = overrides.dry_run;

        let base_url = env
            .base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_default();
        let email = env.email.unwrap_or_default();
        let api_token = env.api_token.unwrap_or_default();

        if !dry_run {
            let mut missing = Vec::new();
            if base_url.is_empty() {
                missing.push(ENV_URL);
            }
            if email.is_empty() {
                missing.push(ENV_EMAIL);
            }
            if api_token.is_empty() {
                missing.push(ENV_TOKEN);
            }
            if !missing.is_empty() {
                bail!(
                    "Missing required configuration: {}. Set them in the environment or a .env file, or pass --dry-run.",
                    missing.join(", ")
                );
            }
        }

        let board_id = match overrides.board_id {
            Some(id) => Some(id),
            None => env
                .board_id
                .map(|raw| {
                    raw.parse::<u64>()
                        .with_context(|| format!("{ENV_BOARD} must be a number, got '{raw}'"))
                })
                .transpose()?,
        };

        let pace = if dry_run {
            Duration::ZERO
        } else {
            Duration::from_millis(overrides.pace_ms.unwrap_or(DEFAULT_PACE_MS))
        };

        Ok(Self {
            base_url,
            email,
            api_token,
            project_key: overrides
                .project_key
                .or(env.project_key)
                .unwrap_or_else(|| DEFAULT_PROJECT_KEY.to_string()),
            board_id,
            dry_run,
            pace,
            sprint_one_size: overrides.sprint_one_size.unwrap_or(DEFAULT_SPRINT_ONE_SIZE),
            attachments: overrides.attachments,
            out_dir: overrides.out_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Token rendering for `config show`: presence, never the value.
    pub fn redacted_token(&self) -> &'static str {
        if self.api_token.is_empty() {
            "(unset)"
        } else {
            "********"
        }
    }
}
