//! Wire types for the tracker REST API.
//!
//! Response structs deserialize only the fields this tool relies on; the
//! tracker sends far more, and callers must not assume anything beyond what is
//! declared here is populated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Reference to a created issue. The create endpoint guarantees `id` and
/// `key`; nothing else.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssueRef {
    pub id: String,
    pub key: String,
}

/// A scrum board associated with a project.
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    pub id: u64,
    pub name: String,
}

/// Paged board listing (subset of the agile API response).
#[derive(Debug, Deserialize)]
pub struct BoardList {
    #[serde(default)]
    pub values: Vec<Board>,
}

/// Reference to a created sprint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SprintRef {
    pub id: u64,
    pub name: String,
}

/// One field definition from the create-metadata endpoint: the schema id
/// (e.g. `customfield_10014`) and its human-readable label.
#[derive(Debug, Clone)]
pub struct FieldMeta {
    pub id: String,
    pub name: String,
}

/// Everything needed to create one issue. `extra` carries schema-specific
/// fields (epic name, resolved custom fields) keyed by field id.
#[derive(Debug, Clone)]
pub struct IssueInput {
    pub project_key: String,
    pub issue_type: String,
    pub summary: String,
    pub description: String,
    /// Strict parent key, only set for subtasks.
    pub parent_key: Option<String>,
    pub extra: Map<String, Value>,
}

impl IssueInput {
    pub fn new(project_key: &str, issue_type: &str, summary: &str, description: &str) -> Self {
        Self {
            project_key: project_key.to_string(),
            issue_type: issue_type.to_string(),
            summary: summary.to_string(),
            description: description.to_string(),
            parent_key: None,
            extra: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent_key: &str) -> Self {
        self.parent_key = Some(parent_key.to_string());
        self
    }

    pub fn with_field(mut self, field_id: &str, value: Value) -> Self {
        self.extra.insert(field_id.to_string(), value);
        self
    }

    /// Build the create-issue request body.
    pub fn to_payload(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("project".into(), json!({ "key": self.project_key }));
        fields.insert("summary".into(), json!(self.summary));
        fields.insert("description".into(), json!(self.description));
        fields.insert("issuetype".into(), json!({ "name": self.issue_type }));
        if let Some(parent) = &self.parent_key {
            fields.insert("parent".into(), json!({ "key": parent }));
        }
        for (k, v) in &self.extra {
            fields.insert(k.clone(), v.clone());
        }
        json!({ "fields": fields })
    }
}

/// Everything needed to create one sprint on a board. Serializes directly as
/// the sprint-creation request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintInput {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub origin_board_id: u64,
    pub goal: String,
}
