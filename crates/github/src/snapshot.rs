//! Board snapshot reader.
//!
//! Pages through every item of a board and turns each GraphQL item node into
//! a [`BoardItem`]. Pagination is followed until `hasNextPage` is false; the
//! items of all pages are concatenated in response order.

use board::{
    BoardError, BoardItem, BoardResult, BoardSnapshot, FieldId, IssueNumber, IssueRef, ItemId,
    ProjectId, StatusName,
};
use serde_json::json;
use tracing::debug;

use crate::wire::{self, ItemNode, ItemsData};
use crate::{GraphQlTransport, QueryKind};

/// Reads [`BoardSnapshot`]s through a [`GraphQlTransport`].
pub struct SnapshotReader<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: GraphQlTransport + ?Sized> SnapshotReader<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Reads all items of `project_id`, taking each item's status from the
    /// field `status_field_id`.
    ///
    /// # Errors
    ///
    /// Any transport/query failure, or `MalformedResponse` if the node is not
    /// a project or a page announces more items without a cursor.
    #[tracing::instrument(skip_all, fields(project_id = %project_id))]
    pub async fn read(
        &self,
        project_id: &ProjectId,
        status_field_id: &FieldId,
    ) -> BoardResult<BoardSnapshot> {
        let query = QueryKind::ItemsWithStatus;
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            let data = self
                .transport
                .execute(
                    query,
                    json!({ "projectId": project_id.as_str(), "cursor": cursor }),
                )
                .await?;
            let page = wire::decode::<ItemsData>(query, data)?
                .node
                .and_then(|node| node.items)
                .ok_or_else(|| BoardError::malformed(format!("node '{project_id}' is not a project")))?;

            pages += 1;
            let before = items.len();
            for node in page.nodes.into_iter().flatten() {
                items.push(to_board_item(node, status_field_id)?);
            }
            debug!(page = pages, received = items.len() - before, "read board page");

            match page.page_info.next_cursor(query)? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(pages, items = items.len(), "read board snapshot");
        Ok(BoardSnapshot::new(items))
    }
}

fn to_board_item(node: ItemNode, status_field_id: &FieldId) -> BoardResult<BoardItem> {
    let id = ItemId::new(node.id).ok_or_else(|| BoardError::malformed("item with empty id"))?;

    let issue = node.content.and_then(|content| {
        content.number.map(|number| IssueRef {
            number: IssueNumber::new(number),
            title: content.title.unwrap_or_default(),
        })
    });

    // First value for the status field wins.
    let status = node
        .field_values
        .map(|values| values.nodes)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .find(|value| {
            value
                .field
                .as_ref()
                .and_then(|field| field.id.as_deref())
                == Some(status_field_id.as_str())
        })
        .and_then(|value| value.name)
        .and_then(StatusName::new);

    Ok(BoardItem { id, issue, status })
}
