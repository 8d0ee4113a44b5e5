//! Schema field resolution.
//!
//! Custom field ids (`customfield_*`) are not stable across tracker
//! deployments, so a semantic field like "Epic Link" has to be mapped to the
//! real id at run time. Resolution is discovery-first: the create-metadata
//! endpoint is consulted on every cache miss, and the static candidate list
//! is strictly a degraded last resort. Whatever id works is cached for the
//! rest of the run, keyed by (issue type, semantic name), so later items of
//! the same kind skip discovery entirely.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::client::Tracker;
use crate::errors::ProvisionError;

/// Known epic-link field ids across common tracker deployments, in
/// preference order.
pub const EPIC_LINK_CANDIDATES: &[&str] = &["customfield_10014", "customfield_10011"];

/// Known story-points field ids.
pub const STORY_POINTS_CANDIDATES: &[&str] = &["customfield_10002", "customfield_10026"];

pub const EPIC_LINK_FIELD: &str = "Epic Link";
pub const STORY_POINTS_FIELD: &str = "Story Points";

/// Labels the epic-link field carries in create-metadata across deployments;
/// some label it just "Epic".
pub const EPIC_LINK_ALIASES: &[&str] = &["Epic Link", "Epic"];

pub const STORY_POINTS_ALIASES: &[&str] = &["Story Points"];

/// Outcome of a successful resolution, for the caller's logging.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub field_id: String,
    /// The id came from this run's cache; no discovery traffic happened.
    pub from_cache: bool,
    /// The id came from the static candidate list, not metadata discovery.
    pub degraded: bool,
}

/// Per-run field resolution cache. Owned by the orchestrator; never persisted.
#[derive(Debug, Default)]
pub struct FieldResolver {
    cache: HashMap<(String, String), String>,
}

impl FieldResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self, kind: &str, semantic: &str) -> Option<&str> {
        self.cache
            .get(&(kind.to_string(), semantic.to_string()))
            .map(|s| s.as_str())
    }

    /// Resolve the field id for `semantic` on issue type `kind` and apply
    /// `value` to `issue_key` through it.
    ///
    /// Cache hit: one update call, nothing else. Cache miss: metadata
    /// discovery (a field counts as discovered when its label matches any of
    /// `aliases`), then each candidate id is tried via `update_issue` until
    /// one sticks (a discovered id is tried first). The id that worked is
    /// cached. If nothing works the caller gets `ResolutionExhausted`, which
    /// is non-fatal by contract: the entity exists, just without this field.
    pub async fn resolve_and_apply(
        &mut self,
        tracker: &dyn Tracker,
        project_key: &str,
        kind: &str,
        semantic: &str,
        aliases: &[&str],
        candidates: &[&str],
        issue_key: &str,
        value: Value,
    ) -> Result<Resolution, ProvisionError> {
        if let Some(field_id) = self.cached(kind, semantic) {
            let field_id = field_id.to_string();
            tracker
                .update_issue(issue_key, &patch(&field_id, value))
                .await?;
            return Ok(Resolution {
                field_id,
                from_cache: true,
                degraded: false,
            });
        }

        let discovered = match tracker.create_meta(project_key, kind).await {
            Ok(fields) => fields
                .into_iter()
                .find(|f| aliases.iter().any(|alias| f.name.eq_ignore_ascii_case(alias)))
                .map(|f| f.id),
            // Discovery being unavailable is exactly what the candidate list
            // exists for; not an error yet.
            Err(_) => None,
        };

        let mut try_list: Vec<String> = Vec::new();
        if let Some(id) = &discovered {
            try_list.push(id.clone());
        }
        for candidate in candidates {
            if discovered.as_deref() != Some(candidate) {
                try_list.push(candidate.to_string());
            }
        }

        let mut tried = 0;
        for field_id in &try_list {
            tried += 1;
            if tracker
                .update_issue(issue_key, &patch(field_id, value.clone()))
                .await
                .is_ok()
            {
                self.cache
                    .insert((kind.to_string(), semantic.to_string()), field_id.clone());
                return Ok(Resolution {
                    field_id: field_id.clone(),
                    from_cache: false,
                    degraded: discovered.as_deref() != Some(field_id.as_str()),
                });
            }
        }

        Err(ProvisionError::ResolutionExhausted {
            semantic: semantic.to_string(),
            kind: kind.to_string(),
            tried,
        })
    }
}

fn patch(field_id: &str, value: Value) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(field_id.to_string(), value);
    fields
}
