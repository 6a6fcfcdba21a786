//! [`ProjectBoard`] over the GitHub Projects V2 API.

use async_trait::async_trait;
use board::{
    BoardError, BoardResult, BoardSnapshot, ContentId, FieldId, ItemId, OptionId, Owner,
    ProjectBoard, ProjectId, ProjectMetadata, ProjectName,
};
use serde_json::json;
use tracing::info;

use crate::config::{ConfigError, GithubConfig};
use crate::wire::{self, AddItemData, SetStatusData};
use crate::{GraphQlTransport, HttpTransport, MetadataResolver, QueryKind, SnapshotReader};

/// GitHub-backed board adapter.
///
/// Holds only the transport and the configured owner. Metadata is resolved
/// again on every [`ProjectBoard::resolve`] call.
#[derive(Debug)]
pub struct GithubProjectBoard<T = HttpTransport> {
    transport: T,
    owner: Option<Owner>,
}

impl GithubProjectBoard<HttpTransport> {
    /// Builds the adapter with an HTTPS transport.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the configuration is invalid.
    pub fn from_config(config: &GithubConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(HttpTransport::new(config)?, config.owner.clone()))
    }
}

impl<T: GraphQlTransport> GithubProjectBoard<T> {
    /// `owner` is the organization or user owning the boards; `None` means the
    /// token's own user.
    pub fn new(transport: T, owner: Option<Owner>) -> Self {
        Self { transport, owner }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn owner(&self) -> BoardResult<Owner> {
        match &self.owner {
            Some(owner) => Ok(owner.clone()),
            None => MetadataResolver::new(&self.transport).viewer_login().await,
        }
    }
}

#[async_trait]
impl<T: GraphQlTransport> ProjectBoard for GithubProjectBoard<T> {
    async fn resolve(&self, project: &ProjectName) -> BoardResult<ProjectMetadata> {
        let owner = self.owner().await?;
        MetadataResolver::new(&self.transport)
            .resolve(&owner, project)
            .await
    }

    async fn read(
        &self,
        project_id: &ProjectId,
        status_field_id: &FieldId,
    ) -> BoardResult<BoardSnapshot> {
        SnapshotReader::new(&self.transport)
            .read(project_id, status_field_id)
            .await
    }

    #[tracing::instrument(skip_all, fields(project_id = %project_id, content = %content_id))]
    async fn add_item(&self, project_id: &ProjectId, content_id: &ContentId) -> BoardResult<ItemId> {
        let query = QueryKind::AddItem;
        let data = self
            .transport
            .execute(
                query,
                json!({
                    "projectId": project_id.as_str(),
                    "contentId": content_id.as_str(),
                }),
            )
            .await?;

        let item_id = wire::decode::<AddItemData>(query, data)?
            .payload
            .and_then(|payload| payload.item)
            .and_then(|item| ItemId::new(item.id))
            .ok_or_else(|| BoardError::malformed("'add-item-to-project' returned no item id"))?;
        info!(item = %item_id, "added item to project");
        Ok(item_id)
    }

    #[tracing::instrument(skip_all, fields(project_id = %project_id, item = %item_id, option = %option_id))]
    async fn set_status(
        &self,
        project_id: &ProjectId,
        item_id: &ItemId,
        field_id: &FieldId,
        option_id: &OptionId,
    ) -> BoardResult<()> {
        let query = QueryKind::SetItemStatus;
        let data = self
            .transport
            .execute(
                query,
                json!({
                    "projectId": project_id.as_str(),
                    "itemId": item_id.as_str(),
                    "fieldId": field_id.as_str(),
                    "optionId": option_id.as_str(),
                }),
            )
            .await?;

        wire::decode::<SetStatusData>(query, data)?
            .payload
            .and_then(|payload| payload.item)
            .ok_or_else(|| BoardError::malformed("'set-item-status' returned no item"))?;
        info!("updated item status");
        Ok(())
    }
}
