//! Scripted [`GraphQlTransport`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use board::{BoardError, BoardResult};
use serde_json::{json, Value};

use crate::{GraphQlTransport, QueryKind};

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<BoardResult<Value>>>,
    requests: Mutex<Vec<(QueryKind, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, data: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(data));
        self
    }

    pub fn fail(self, error: BoardError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<(QueryKind, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<QueryKind> {
        self.requests().into_iter().map(|(kind, _)| kind).collect()
    }
}

#[async_trait]
impl GraphQlTransport for ScriptedTransport {
    async fn execute(&self, query: QueryKind, variables: Value) -> BoardResult<Value> {
        self.requests.lock().unwrap().push((query, variables));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BoardError::malformed(format!("no scripted response for '{query}'"))))
    }
}

// ---------------------------------------------------------------------------
// Response builders
// ---------------------------------------------------------------------------

pub(crate) fn not_an_organization(owner: &str) -> BoardError {
    BoardError::RemoteQuery {
        errors: vec![json!({
            "type": "NOT_FOUND",
            "path": ["organization"],
            "message": format!("Could not resolve to an Organization with the login of '{owner}'."),
        })],
    }
}

pub(crate) fn projects_page(scope: &str, projects: &[(&str, &str)], next: Option<&str>) -> Value {
    let nodes: Vec<Value> = projects
        .iter()
        .map(|(id, title)| json!({ "id": id, "title": title }))
        .collect();
    json!({
        scope: {
            "projectsV2": {
                "nodes": nodes,
                "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
            }
        }
    })
}

pub(crate) fn status_field(id: &str, options: &[(&str, &str)]) -> Value {
    let options: Vec<Value> = options
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    json!({ "id": id, "name": "Status", "options": options })
}

pub(crate) fn fields(nodes: Vec<Value>) -> Value {
    json!({ "node": { "fields": { "nodes": nodes } } })
}

pub(crate) fn standard_fields() -> Value {
    fields(vec![
        json!({}),
        status_field(
            "PVTSSF_status",
            &[
                ("opt-backlog", "Backlog"),
                ("opt-ready", "Ready"),
                ("opt-progress", "In Progress"),
                ("opt-blocked", "Blocked"),
                ("opt-done", "Done"),
            ],
        ),
    ])
}

/// An issue-backed item whose only single-select value is the status field.
pub(crate) fn item(id: &str, status: Option<&str>, number: u64) -> Value {
    let values: Vec<Value> = status
        .map(|name| json!({ "name": name, "field": { "id": "PVTSSF_status" } }))
        .into_iter()
        .collect();
    json!({
        "id": id,
        "fieldValues": { "nodes": values },
        "content": { "number": number, "title": format!("Issue {number}") },
    })
}

pub(crate) fn items_page(items: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "node": {
            "items": {
                "nodes": items,
                "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
            }
        }
    })
}
