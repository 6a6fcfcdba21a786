//! Project metadata resolution.
//!
//! Finds a board by title and resolves its `Status` field. Boards are looked
//! up under the owner as an organization first; if that request fails for any
//! reason (most often "not an organization") the same owner is tried as a
//! user.

use board::{
    BoardError, BoardResult, FieldId, OptionId, Owner, ProjectId, ProjectMetadata, ProjectName,
    StatusName, StatusOptions, STATUS_FIELD_NAME,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::wire::{self, FieldsData, OrgProjects, ProjectOwner, UserProjects, ViewerData};
use crate::{GraphQlTransport, QueryKind};

/// Which kind of account owns the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnerScope {
    Organization,
    User,
}

impl OwnerScope {
    fn query(self) -> QueryKind {
        match self {
            Self::Organization => QueryKind::ProjectsByOrg,
            Self::User => QueryKind::ProjectsByUser,
        }
    }

    fn owner_of(self, data: serde_json::Value) -> BoardResult<Option<ProjectOwner>> {
        let query = self.query();
        Ok(match self {
            Self::Organization => wire::decode::<OrgProjects>(query, data)?.organization,
            Self::User => wire::decode::<UserProjects>(query, data)?.user,
        })
    }
}

/// Resolves [`ProjectMetadata`] through a [`GraphQlTransport`].
///
/// Every call goes to the remote API; nothing is cached.
pub struct MetadataResolver<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: GraphQlTransport + ?Sized> MetadataResolver<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Resolves the board titled `project` owned by `owner`.
    ///
    /// # Errors
    ///
    /// `ProjectNotFound`, `StatusFieldMissing`, `DuplicateStatusField`,
    /// `DuplicateOptionName`, or any transport/query failure.
    #[tracing::instrument(skip_all, fields(owner = %owner, project = %project))]
    pub async fn resolve(&self, owner: &Owner, project: &ProjectName) -> BoardResult<ProjectMetadata> {
        let project_id = self.find_project(owner, project).await?;
        let (status_field_id, status_options) = self.status_field(&project_id, project).await?;
        debug!(
            project_id = %project_id,
            options = status_options.len(),
            "resolved project metadata"
        );
        Ok(ProjectMetadata {
            project_id,
            title: project.clone(),
            status_field_id,
            status_options,
        })
    }

    /// Returns the id of the first board owned by `owner` whose title equals
    /// `project` exactly.
    ///
    /// When titles collide the first board returned wins.
    ///
    /// # Errors
    ///
    /// `ProjectNotFound` if no board matches, or the user-scope lookup
    /// failure when both scopes fail.
    pub async fn find_project(&self, owner: &Owner, project: &ProjectName) -> BoardResult<ProjectId> {
        let found = match self.search(OwnerScope::Organization, owner, project).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "organization lookup failed, trying user scope");
                self.search(OwnerScope::User, owner, project).await?
            }
        };
        found.ok_or_else(|| BoardError::ProjectNotFound {
            name: project.to_string(),
            owner: owner.to_string(),
        })
    }

    /// Pages through the owner's boards until `project` is found or the list
    /// ends.
    async fn search(
        &self,
        scope: OwnerScope,
        owner: &Owner,
        project: &ProjectName,
    ) -> BoardResult<Option<ProjectId>> {
        let query = scope.query();
        let mut cursor: Option<String> = None;
        loop {
            let data = self
                .transport
                .execute(query, json!({ "owner": owner.as_str(), "cursor": cursor }))
                .await?;
            let listing = scope
                .owner_of(data)?
                .ok_or_else(|| BoardError::malformed(format!("'{query}' returned no owner '{owner}'")))?
                .projects;

            let hit = listing
                .nodes
                .into_iter()
                .flatten()
                .find(|node| node.title == project.as_str());
            if let Some(node) = hit {
                return ProjectId::new(node.id)
                    .map(Some)
                    .ok_or_else(|| BoardError::malformed(format!("'{query}' returned an empty project id")));
            }

            match listing.page_info.next_cursor(query)? {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
    }

    /// Resolves the `Status` field id and its options.
    ///
    /// # Errors
    ///
    /// `StatusFieldMissing` when no single-select field is named `Status`,
    /// `DuplicateStatusField` when more than one is, `DuplicateOptionName`
    /// when option names repeat.
    pub async fn status_field(
        &self,
        project_id: &ProjectId,
        project: &ProjectName,
    ) -> BoardResult<(FieldId, StatusOptions)> {
        let query = QueryKind::StatusField;
        let data = self
            .transport
            .execute(query, json!({ "projectId": project_id.as_str() }))
            .await?;
        let fields = wire::decode::<FieldsData>(query, data)?
            .node
            .and_then(|node| node.fields)
            .ok_or_else(|| BoardError::malformed(format!("node '{project_id}' is not a project")))?;

        let mut candidates: Vec<_> = fields
            .nodes
            .into_iter()
            .flatten()
            .filter(|field| field.name.as_deref() == Some(STATUS_FIELD_NAME))
            .collect();

        let field = match candidates.len() {
            0 => {
                return Err(BoardError::StatusFieldMissing {
                    project: project.to_string(),
                });
            }
            1 => candidates.remove(0),
            count => {
                return Err(BoardError::DuplicateStatusField {
                    project: project.to_string(),
                    count,
                });
            }
        };

        let field_id = field
            .id
            .and_then(FieldId::new)
            .ok_or_else(|| BoardError::malformed("'Status' field has no id"))?;

        let pairs = field
            .options
            .into_iter()
            .map(|option| {
                let name = StatusName::new(option.name);
                let id = OptionId::new(option.id);
                name.zip(id)
                    .ok_or_else(|| BoardError::malformed("'Status' option with empty name or id"))
            })
            .collect::<BoardResult<Vec<_>>>()?;

        Ok((field_id, StatusOptions::from_pairs(pairs)?))
    }

    /// Returns the login of the token's own user.
    ///
    /// # Errors
    ///
    /// Any transport/query failure, or `MalformedResponse` for an empty login.
    pub async fn viewer_login(&self) -> BoardResult<Owner> {
        let query = QueryKind::Viewer;
        let data = self.transport.execute(query, json!({})).await?;
        let login = wire::decode::<ViewerData>(query, data)?.viewer.login;
        Owner::new(login).ok_or_else(|| BoardError::malformed("viewer login is empty"))
    }
}
