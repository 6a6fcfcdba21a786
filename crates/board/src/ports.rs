//! Port trait implemented by board infrastructure adapters.
//!
//! The `github` crate implements [`ProjectBoard`] over the GitHub GraphQL
//! API. Nothing in this crate knows about HTTP, pagination, or query text.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    BoardResult, BoardSnapshot, ContentId, FieldId, ItemId, OptionId, ProjectId, ProjectMetadata,
    ProjectName,
};

/// Access to a remote Kanban board.
///
/// Implementations hold no board state between calls. Every `resolve` and
/// `read` goes back to the remote API.
#[async_trait]
pub trait ProjectBoard: Send + Sync {
    /// Resolves the project id, `Status` field id and option map for the board
    /// titled `project`.
    ///
    /// # Errors
    ///
    /// [`crate::BoardError::ProjectNotFound`],
    /// [`crate::BoardError::StatusFieldMissing`],
    /// [`crate::BoardError::DuplicateStatusField`],
    /// [`crate::BoardError::DuplicateOptionName`], or a transport/query error.
    async fn resolve(&self, project: &ProjectName) -> BoardResult<ProjectMetadata>;

    /// Reads every item of the board, following pagination to the end.
    ///
    /// Each item's status is the value of the field identified by
    /// `status_field_id`.
    async fn read(
        &self,
        project_id: &ProjectId,
        status_field_id: &FieldId,
    ) -> BoardResult<BoardSnapshot>;

    /// Attaches existing issue content to the board and returns the new item id.
    async fn add_item(&self, project_id: &ProjectId, content_id: &ContentId) -> BoardResult<ItemId>;

    /// Sets the item's single-select `field_id` to `option_id`.
    async fn set_status(
        &self,
        project_id: &ProjectId,
        item_id: &ItemId,
        field_id: &FieldId,
        option_id: &OptionId,
    ) -> BoardResult<()>;
}

#[async_trait]
impl<T: ProjectBoard + ?Sized> ProjectBoard for Arc<T> {
    async fn resolve(&self, project: &ProjectName) -> BoardResult<ProjectMetadata> {
        (**self).resolve(project).await
    }

    async fn read(
        &self,
        project_id: &ProjectId,
        status_field_id: &FieldId,
    ) -> BoardResult<BoardSnapshot> {
        (**self).read(project_id, status_field_id).await
    }

    async fn add_item(&self, project_id: &ProjectId, content_id: &ContentId) -> BoardResult<ItemId> {
        (**self).add_item(project_id, content_id).await
    }

    async fn set_status(
        &self,
        project_id: &ProjectId,
        item_id: &ItemId,
        field_id: &FieldId,
        option_id: &OptionId,
    ) -> BoardResult<()> {
        (**self)
            .set_status(project_id, item_id, field_id, option_id)
            .await
    }
}
