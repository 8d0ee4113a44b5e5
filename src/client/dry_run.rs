//! Dry-run implementation of the tracker client.
//!
//! Fabricates plausible responses locally so the full phase sequence can be
//! exercised without network access: issue keys are `{PROJECT}-1`,
//! `{PROJECT}-2`, … in creation order, sprint ids count up from 1, and the
//! board is always board 1.
//!
//! The tracker also records what it was asked to do (per-operation call
//! counts, created issues, sprint memberships) and supports targeted failure
//! injection, which is how the orchestrator and resolver tests observe
//! network behavior without a network.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::Tracker;
use super::types::{Board, FieldMeta, IssueInput, IssueRef, SprintInput, SprintRef};
use crate::errors::TrackerError;

/// Per-operation call tally.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub create_issue: AtomicU32,
    pub update_issue: AtomicU32,
    pub create_meta: AtomicU32,
    pub find_board: AtomicU32,
    pub create_sprint: AtomicU32,
    pub add_issues_to_sprint: AtomicU32,
    pub attach_file: AtomicU32,
    pub reports: AtomicU32,
}

/// One issue the dry-run tracker pretended to create.
#[derive(Debug, Clone)]
pub struct RecordedIssue {
    pub key: String,
    pub issue_type: String,
    pub summary: String,
    pub parent_key: Option<String>,
}

pub struct DryRunTracker {
    issue_seq: AtomicU64,
    sprint_seq: AtomicU64,
    pub calls: CallCounts,
    created: Mutex<Vec<RecordedIssue>>,
    memberships: Mutex<Vec<(u64, Vec<String>)>>,
    // failure injection for tests
    fail_summaries: Mutex<Vec<String>>,
    fail_meta: AtomicBool,
    no_board: AtomicBool,
    accepted_fields: Mutex<Option<HashSet<String>>>,
    meta_fields: Mutex<Option<Vec<FieldMeta>>>,
}

impl Default for DryRunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunTracker {
    pub fn new() -> Self {
        Self {
            issue_seq: AtomicU64::new(0),
            sprint_seq: AtomicU64::new(0),
            calls: CallCounts::default(),
            created: Mutex::new(Vec::new()),
            memberships: Mutex::new(Vec::new()),
            fail_summaries: Mutex::new(Vec::new()),
            fail_meta: AtomicBool::new(false),
            no_board: AtomicBool::new(false),
            accepted_fields: Mutex::new(None),
            meta_fields: Mutex::new(None),
        }
    }

    /// Make `create_issue` fail for any summary containing `needle`.
    pub fn fail_create_when_summary_contains(&self, needle: &str) {
        lock(&self.fail_summaries).push(needle.to_string());
    }

    /// Make `create_meta` return a remote error, forcing resolver fallback.
    pub fn fail_metadata(&self) {
        self.fail_meta.store(true, Ordering::SeqCst);
    }

    /// Replace the default `create_meta` field list with `(id, label)` pairs,
    /// simulating a deployment with non-standard ids or labels.
    pub fn use_metadata_fields(&self, fields: &[(&str, &str)]) {
        let fields = fields
            .iter()
            .map(|(id, name)| FieldMeta {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        *lock(&self.meta_fields) = Some(fields);
    }

    /// Pretend the project has no board, degrading the sprint phases.
    pub fn without_board(&self) {
        self.no_board.store(true, Ordering::SeqCst);
    }

    /// Restrict `update_issue` to accept only these field ids; patches naming
    /// any other field fail with a 400. Default is to accept everything.
    pub fn accept_only_fields(&self, ids: &[&str]) {
        let set: HashSet<String> = ids.iter().map(|s| s.to_string()).collect();
        *lock(&self.accepted_fields) = Some(set);
    }

    pub fn created_issues(&self) -> Vec<RecordedIssue> {
        lock(&self.created).clone()
    }

    pub fn memberships(&self) -> Vec<(u64, Vec<String>)> {
        lock(&self.memberships).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Tracker for DryRunTracker {
    async fn create_issue(&self, input: &IssueInput) -> Result<IssueRef, TrackerError> {
        self.calls.create_issue.fetch_add(1, Ordering::SeqCst);
        if lock(&self.fail_summaries)
            .iter()
            .any(|needle| input.summary.contains(needle))
        {
            return Err(TrackerError::Remote {
                op: "create issue",
                status: 400,
                body: format!("{{\"errors\":{{\"summary\":\"rejected: {}\"}}}}", input.summary),
            });
        }
        let n = self.issue_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let key = format!("{}-{}", input.project_key, n);
        lock(&self.created).push(RecordedIssue {
            key: key.clone(),
            issue_type: input.issue_type.clone(),
            summary: input.summary.clone(),
            parent_key: input.parent_key.clone(),
        });
        Ok(IssueRef {
            id: n.to_string(),
            key,
        })
    }

    async fn update_issue(
        &self,
        _key: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), TrackerError> {
        self.calls.update_issue.fetch_add(1, Ordering::SeqCst);
        if let Some(accepted) = lock(&self.accepted_fields).as_ref() {
            if let Some(unknown) = fields.keys().find(|id| !accepted.contains(*id)) {
                return Err(TrackerError::Remote {
                    op: "update issue",
                    status: 400,
                    body: format!("{{\"errors\":{{\"{unknown}\":\"cannot be set\"}}}}"),
                });
            }
        }
        Ok(())
    }

    async fn create_meta(
        &self,
        _project_key: &str,
        _issue_type: &str,
    ) -> Result<Vec<FieldMeta>, TrackerError> {
        self.calls.create_meta.fetch_add(1, Ordering::SeqCst);
        if self.fail_meta.load(Ordering::SeqCst) {
            return Err(TrackerError::Remote {
                op: "create metadata",
                status: 404,
                body: "createmeta unavailable".to_string(),
            });
        }
        if let Some(fields) = lock(&self.meta_fields).as_ref() {
            return Ok(fields.clone());
        }
        Ok(vec![
            FieldMeta {
                id: "summary".to_string(),
                name: "Summary".to_string(),
            },
            FieldMeta {
                id: "customfield_10014".to_string(),
                name: "Epic Link".to_string(),
            },
            FieldMeta {
                id: "customfield_10026".to_string(),
                name: "Story Points".to_string(),
            },
        ])
    }

    async fn find_board(&self, project_key: &str) -> Result<Option<Board>, TrackerError> {
        self.calls.find_board.fetch_add(1, Ordering::SeqCst);
        if self.no_board.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(Board {
            id: 1,
            name: format!("{project_key} board"),
        }))
    }

    async fn create_sprint(&self, input: &SprintInput) -> Result<SprintRef, TrackerError> {
        self.calls.create_sprint.fetch_add(1, Ordering::SeqCst);
        let id = self.sprint_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SprintRef {
            id,
            name: input.name.clone(),
        })
    }

    async fn add_issues_to_sprint(
        &self,
        sprint_id: u64,
        issue_keys: &[String],
    ) -> Result<(), TrackerError> {
        self.calls.add_issues_to_sprint.fetch_add(1, Ordering::SeqCst);
        lock(&self.memberships).push((sprint_id, issue_keys.to_vec()));
        Ok(())
    }

    async fn attach_file(
        &self,
        _issue_key: &str,
        _file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<(), TrackerError> {
        self.calls.attach_file.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn sprint_report(&self, board_id: u64, sprint_id: u64) -> Result<Value, TrackerError> {
        self.calls.reports.fetch_add(1, Ordering::SeqCst);
        Ok(json!({
            "sprint": { "id": sprint_id },
            "rapidViewId": board_id,
            "contents": {
                "completedIssues": [],
                "issuesNotCompletedInCurrentSprint": []
            }
        }))
    }

    async fn velocity_chart(&self, board_id: u64) -> Result<Value, TrackerError> {
        self.calls.reports.fetch_add(1, Ordering::SeqCst);
        Ok(json!({
            "rapidViewId": board_id,
            "velocityStatEntries": {}
        }))
    }
}
