//! HTTP implementation of the tracker client, against the Jira Cloud REST
//! surface (`/rest/api/3` for issues, `/rest/agile/1.0` for boards and
//! sprints, `/rest/greenhopper/1.0` for the read-only charts).
//!
//! Credentials are basic auth (account email + API token), attached to every
//! request. Success is a per-operation whitelist of status codes; anything
//! else surfaces as `TrackerError::Remote` with the raw body.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::Tracker;
use super::types::{Board, BoardList, FieldMeta, IssueInput, IssueRef, SprintInput, SprintRef};
use crate::errors::TrackerError;

pub struct HttpTracker {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl HttpTracker {
    /// Build a client for one tracker instance. A trailing slash on the base
    /// URL is tolerated.
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            api_token: api_token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
    }
}

/// Send a request and enforce the operation's status whitelist.
async fn expect_status(
    request: reqwest::RequestBuilder,
    op: &'static str,
    ok: &[u16],
) -> Result<reqwest::Response, TrackerError> {
    let resp = request
        .send()
        .await
        .map_err(|source| TrackerError::Transport { op, source })?;
    let status = resp.status().as_u16();
    if ok.contains(&status) {
        Ok(resp)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(TrackerError::Remote { op, status, body })
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    op: &'static str,
) -> Result<T, TrackerError> {
    resp.json::<T>()
        .await
        .map_err(|source| TrackerError::Transport { op, source })
}

// Create-metadata response, trimmed to the path
// projects[].issuetypes[].fields.{id => {name}}.
#[derive(Deserialize)]
struct CreateMeta {
    #[serde(default)]
    projects: Vec<MetaProject>,
}

#[derive(Deserialize)]
struct MetaProject {
    #[serde(default)]
    issuetypes: Vec<MetaIssueType>,
}

#[derive(Deserialize)]
struct MetaIssueType {
    #[serde(default)]
    fields: BTreeMap<String, MetaField>,
}

#[derive(Deserialize)]
struct MetaField {
    #[serde(default)]
    name: String,
}

fn flatten_create_meta(meta: CreateMeta) -> Vec<FieldMeta> {
    meta.projects
        .into_iter()
        .flat_map(|p| p.issuetypes)
        .flat_map(|t| t.fields)
        .map(|(id, field)| FieldMeta {
            id,
            name: field.name,
        })
        .collect()
}

#[async_trait]
impl Tracker for HttpTracker {
    async fn create_issue(&self, input: &IssueInput) -> Result<IssueRef, TrackerError> {
        const OP: &str = "create issue";
        let resp = expect_status(
            self.post("/rest/api/3/issue").json(&input.to_payload()),
            OP,
            &[200, 201],
        )
        .await?;
        decode(resp, OP).await
    }

    async fn update_issue(
        &self,
        key: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), TrackerError> {
        let payload = json!({ "fields": fields });
        expect_status(
            self.put(&format!("/rest/api/3/issue/{key}")).json(&payload),
            "update issue",
            &[200, 204],
        )
        .await?;
        Ok(())
    }

    async fn create_meta(
        &self,
        project_key: &str,
        issue_type: &str,
    ) -> Result<Vec<FieldMeta>, TrackerError> {
        const OP: &str = "create metadata";
        let resp = expect_status(
            self.get("/rest/api/3/issue/createmeta").query(&[
                ("projectKeys", project_key),
                ("issuetypeNames", issue_type),
                ("expand", "projects.issuetypes.fields"),
            ]),
            OP,
            &[200],
        )
        .await?;
        let meta: CreateMeta = decode(resp, OP).await?;
        Ok(flatten_create_meta(meta))
    }

    async fn find_board(&self, project_key: &str) -> Result<Option<Board>, TrackerError> {
        const OP: &str = "board lookup";
        let resp = expect_status(
            self.get("/rest/agile/1.0/board")
                .query(&[("projectKeyOrId", project_key)]),
            OP,
            &[200],
        )
        .await?;
        let boards: BoardList = decode(resp, OP).await?;
        Ok(boards.values.into_iter().next())
    }

    async fn create_sprint(&self, input: &SprintInput) -> Result<SprintRef, TrackerError> {
        const OP: &str = "create sprint";
        let resp = expect_status(
            self.post("/rest/agile/1.0/sprint").json(input),
            OP,
            &[200, 201],
        )
        .await?;
        decode(resp, OP).await
    }

    async fn add_issues_to_sprint(
        &self,
        sprint_id: u64,
        issue_keys: &[String],
    ) -> Result<(), TrackerError> {
        let payload = json!({ "issues": issue_keys });
        expect_status(
            self.post(&format!("/rest/agile/1.0/sprint/{sprint_id}/issue"))
                .json(&payload),
            "add issues to sprint",
            &[200, 204],
        )
        .await?;
        Ok(())
    }

    async fn attach_file(
        &self,
        issue_key: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), TrackerError> {
        const OP: &str = "attach file";
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|source| TrackerError::Transport { op: OP, source })?;
        let form = reqwest::multipart::Form::new().part("file", part);
        expect_status(
            self.client
                .post(self.url(&format!("/rest/api/3/issue/{issue_key}/attachments")))
                .basic_auth(&self.email, Some(&self.api_token))
                // Required by the attachments endpoint to bypass XSRF checks.
                .header("X-Atlassian-Token", "no-check")
                .multipart(form),
            OP,
            &[200, 201],
        )
        .await?;
        Ok(())
    }

    async fn sprint_report(&self, board_id: u64, sprint_id: u64) -> Result<Value, TrackerError> {
        const OP: &str = "sprint report";
        let resp = expect_status(
            self.get("/rest/greenhopper/1.0/rapid/charts/sprintreport")
                .query(&[("rapidViewId", board_id), ("sprintId", sprint_id)]),
            OP,
            &[200],
        )
        .await?;
        decode(resp, OP).await
    }

    async fn velocity_chart(&self, board_id: u64) -> Result<Value, TrackerError> {
        const OP: &str = "velocity chart";
        let resp = expect_status(
            self.get("/rest/greenhopper/1.0/rapid/charts/velocity")
                .query(&[("rapidViewId", board_id)]),
            OP,
            &[200],
        )
        .await?;
        decode(resp, OP).await
    }
}
