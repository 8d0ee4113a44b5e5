//! Remote entity client: the seam between the orchestrator and the tracker.
//!
//! Two implementations exist:
//! - `HttpTracker` — real REST calls against a Jira-compatible instance
//! - `DryRunTracker` — deterministic local fabrication for offline runs/tests
//!
//! Every call is a single synchronous round trip from the orchestrator's point
//! of view: no retries, no backoff, no timeout overrides. A failure is
//! terminal for that one operation; the orchestrator decides whether the run
//! continues.

pub mod dry_run;
pub mod http;
pub mod types;

pub use dry_run::DryRunTracker;
pub use http::HttpTracker;
pub use types::{Board, FieldMeta, IssueInput, IssueRef, SprintInput, SprintRef};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::TrackerError;

/// Object-safe client for the tracker's REST surface.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Create an issue (epic, story, or subtask). Success is 200/201.
    async fn create_issue(&self, input: &IssueInput) -> Result<IssueRef, TrackerError>;

    /// Patch fields on an existing issue. Success is 200/204.
    async fn update_issue(&self, key: &str, fields: &Map<String, Value>)
    -> Result<(), TrackerError>;

    /// Fetch the create-metadata field definitions for one issue type.
    async fn create_meta(
        &self,
        project_key: &str,
        issue_type: &str,
    ) -> Result<Vec<FieldMeta>, TrackerError>;

    /// First board associated with the project, if any.
    async fn find_board(&self, project_key: &str) -> Result<Option<Board>, TrackerError>;

    /// Create a sprint on a board. Success is 200/201.
    async fn create_sprint(&self, input: &SprintInput) -> Result<SprintRef, TrackerError>;

    /// Bulk-add issues to a sprint. Success is 200/204. Membership is
    /// write-only: there is no read-back in this workflow.
    async fn add_issues_to_sprint(
        &self,
        sprint_id: u64,
        issue_keys: &[String],
    ) -> Result<(), TrackerError>;

    /// Attach already-read file bytes to an issue (multipart upload).
    /// Success is 200/201. Reading the file is the caller's problem so that
    /// local IO failures stay distinguishable from remote ones.
    async fn attach_file(
        &self,
        issue_key: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), TrackerError>;

    /// Read-only sprint report for one sprint on one board.
    async fn sprint_report(&self, board_id: u64, sprint_id: u64) -> Result<Value, TrackerError>;

    /// Read-only velocity chart for one board.
    async fn velocity_chart(&self, board_id: u64) -> Result<Value, TrackerError>;
}
