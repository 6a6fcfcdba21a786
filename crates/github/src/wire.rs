//! Typed views of the GraphQL `data` payloads.
//!
//! Fragments (`... on ProjectV2SingleSelectField`) make non-matching nodes
//! come back as `{}`, and any connection node may be `null`. Every field that
//! a fragment can drop is therefore optional here, and callers decide what a
//! missing value means.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use board::{BoardError, BoardResult};

use crate::QueryKind;

/// Decodes the `data` payload returned for `query`.
pub(crate) fn decode<T: DeserializeOwned>(query: QueryKind, data: serde_json::Value) -> BoardResult<T> {
    serde_json::from_value(data)
        .map_err(|e| BoardError::malformed(format!("unexpected '{query}' response: {e}")))
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor for the next page, or `None` when this was the last page.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` if more pages are announced without a cursor.
    pub fn next_cursor(self, query: QueryKind) -> BoardResult<Option<String>> {
        match (self.has_next_page, self.end_cursor) {
            (false, _) => Ok(None),
            (true, Some(cursor)) => Ok(Some(cursor)),
            (true, None) => Err(BoardError::malformed(format!(
                "'{query}' reported another page without an end cursor"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeList<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
}

// ---------------------------------------------------------------------------
// Project listing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct OrgProjects {
    pub organization: Option<ProjectOwner>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserProjects {
    pub user: Option<ProjectOwner>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectOwner {
    #[serde(rename = "projectsV2")]
    pub projects: Connection<ProjectNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectNode {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewerData {
    pub viewer: ViewerNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewerNode {
    pub login: String,
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct FieldsData {
    pub node: Option<FieldsHolder>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldsHolder {
    pub fields: Option<NodeList<FieldNode>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldNode {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptionNode {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsData {
    pub node: Option<ItemsHolder>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsHolder {
    pub items: Option<Connection<ItemNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemNode {
    pub id: String,
    pub field_values: Option<NodeList<FieldValueNode>>,
    pub content: Option<ContentNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldValueNode {
    pub name: Option<String>,
    pub field: Option<FieldRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldRef {
    pub id: Option<String>,
}

/// Issue content. Pull requests and draft issues decode with both fields
/// absent.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentNode {
    pub number: Option<u64>,
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct IdNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddItemData {
    #[serde(rename = "addProjectV2ItemById")]
    pub payload: Option<AddItemPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddItemPayload {
    pub item: Option<IdNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetStatusData {
    #[serde(rename = "updateProjectV2ItemFieldValue")]
    pub payload: Option<SetStatusPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetStatusPayload {
    #[serde(rename = "projectV2Item")]
    pub item: Option<IdNode>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fragment_misses_decode_as_empty_nodes() {
        let data = json!({
            "node": {
                "fields": {
                    "nodes": [
                        {},
                        null,
                        { "id": "F1", "name": "Status", "options": [{ "id": "o1", "name": "Ready" }] }
                    ]
                }
            }
        });

        let decoded: FieldsData = decode(QueryKind::StatusField, data).unwrap();
        let nodes = decoded.node.unwrap().fields.unwrap().nodes;
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].as_ref().unwrap().name.is_none());
        assert!(nodes[1].is_none());
        assert_eq!(nodes[2].as_ref().unwrap().options.len(), 1);
    }

    #[test]
    fn pull_request_content_has_no_issue_fields() {
        let item: ItemNode = serde_json::from_value(json!({
            "id": "PVTI_1",
            "fieldValues": { "nodes": [] },
            "content": {}
        }))
        .unwrap();
        let content = item.content.unwrap();
        assert!(content.number.is_none());
        assert!(content.title.is_none());
    }

    #[test]
    fn decode_failure_names_the_query() {
        let err = decode::<ViewerData>(QueryKind::Viewer, json!({ "viewer": null })).unwrap_err();
        assert!(matches!(err, BoardError::MalformedResponse { message } if message.contains("'viewer'")));
    }

    #[test]
    fn next_cursor_requires_cursor_when_more_pages() {
        let last = PageInfo {
            has_next_page: false,
            end_cursor: Some("c".into()),
        };
        assert_eq!(last.next_cursor(QueryKind::ItemsWithStatus).unwrap(), None);

        let broken = PageInfo {
            has_next_page: true,
            end_cursor: None,
        };
        assert!(broken.next_cursor(QueryKind::ItemsWithStatus).is_err());
    }
}
