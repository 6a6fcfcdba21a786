//! Sprint-level operations composed from [`ProjectBoard`] calls.
//!
//! Each operation runs one sequential chain: resolve metadata, read a fresh
//! snapshot, then compute or mutate. Nothing is cached between operations.
//!
//! `move_top` is not transactional. The board may change between the read
//! and the write, and the write is not re-validated. Only one workflow may
//! drive a board at a time.

use tracing::{debug, info};

use crate::state;
use crate::{
    BoardError, BoardItem, BoardResult, BoardSnapshot, ContentId, ItemId, MovedItem,
    ProjectBoard, ProjectMetadata, ProjectName, SprintState,
};

/// Sprint predicates and status moves for boards reachable through `B`.
#[derive(Debug, Clone)]
pub struct SprintTracker<B> {
    board: B,
}

impl<B: ProjectBoard> SprintTracker<B> {
    pub fn new(board: B) -> Self {
        Self { board }
    }

    /// Returns the underlying board adapter.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Resolves metadata and reads a fresh snapshot of `project`.
    ///
    /// # Errors
    ///
    /// Propagates any resolution or read failure.
    pub async fn load(&self, project: &ProjectName) -> BoardResult<(ProjectMetadata, BoardSnapshot)> {
        let metadata = self.board.resolve(project).await?;
        let snapshot = self
            .board
            .read(&metadata.project_id, &metadata.status_field_id)
            .await?;
        debug!(
            project = %project,
            items = snapshot.len(),
            captured_at = %snapshot.captured_at,
            "loaded board snapshot"
        );
        Ok((metadata, snapshot))
    }

    /// Returns `true` if no issue-backed item is on the board.
    ///
    /// # Errors
    ///
    /// Propagates any resolution or read failure; a failure is never reported
    /// as "empty" or "not empty".
    #[tracing::instrument(skip_all, fields(project = %project))]
    pub async fn is_empty(&self, project: &ProjectName) -> BoardResult<bool> {
        let (_, snapshot) = self.load(project).await?;
        let empty = state::is_empty(&snapshot);
        info!(empty, "checked whether board has issues");
        Ok(empty)
    }

    /// Returns `true` if the sprint is blocked.
    ///
    /// # Errors
    ///
    /// Propagates any resolution or read failure.
    #[tracing::instrument(skip_all, fields(project = %project))]
    pub async fn is_blocked(&self, project: &ProjectName) -> BoardResult<bool> {
        let (_, snapshot) = self.load(project).await?;
        let blocked = state::is_blocked(&snapshot);
        info!(blocked, "checked whether sprint is blocked");
        Ok(blocked)
    }

    /// Returns `true` if exactly one item is being worked on.
    ///
    /// # Errors
    ///
    /// Propagates any resolution or read failure.
    #[tracing::instrument(skip_all, fields(project = %project))]
    pub async fn is_in_progress(&self, project: &ProjectName) -> BoardResult<bool> {
        let (_, snapshot) = self.load(project).await?;
        let active = state::active_count(&snapshot);
        info!(active, "counted active issues");
        Ok(state::is_in_progress(&snapshot))
    }

    /// Derives the sprint state from a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Propagates any resolution or read failure.
    #[tracing::instrument(skip_all, fields(project = %project))]
    pub async fn state(&self, project: &ProjectName) -> BoardResult<SprintState> {
        let (_, snapshot) = self.load(project).await?;
        let sprint = state::derive_state(&snapshot);
        info!(state = %sprint, "derived sprint state");
        Ok(sprint)
    }

    /// Returns the first issue-backed item holding `status`, or `None`.
    ///
    /// A status the board does not define simply matches nothing.
    ///
    /// # Errors
    ///
    /// Any resolution or read failure.
    #[tracing::instrument(skip_all, fields(project = %project, status = status))]
    pub async fn top_item(
        &self,
        project: &ProjectName,
        status: &str,
    ) -> BoardResult<Option<BoardItem>> {
        let (_, snapshot) = self.load(project).await?;
        Ok(state::find_top(&snapshot, status).cloned())
    }

    /// Moves the top item of `from` to `to`.
    ///
    /// `to` must be an option of the board. The move is a single
    /// `set_status` call on the item found by [`state::find_top`].
    ///
    /// # Errors
    ///
    /// - [`BoardError::UnknownStatus`] if `to` is not an option. Checked
    ///   before the board is read.
    /// - [`BoardError::NoSuchItem`] if no issue-backed item holds `from`,
    ///   including when `from` is not an option at all. No mutation is
    ///   attempted in that case.
    /// - Any resolution, read, or mutation failure.
    #[tracing::instrument(skip_all, fields(project = %project, from = from, to = to))]
    pub async fn move_top(
        &self,
        project: &ProjectName,
        from: &str,
        to: &str,
    ) -> BoardResult<MovedItem> {
        let metadata = self.board.resolve(project).await?;
        let (to_name, option_id) = metadata.status(to)?;

        let snapshot = self
            .board
            .read(&metadata.project_id, &metadata.status_field_id)
            .await?;

        let (item_id, issue, from_name) = match state::find_top(&snapshot, from) {
            Some(BoardItem {
                id,
                issue: Some(issue),
                status: Some(status),
            }) => (id.clone(), issue.clone(), status.clone()),
            _ => {
                return Err(BoardError::NoSuchItem {
                    status: from.to_string(),
                    project: project.to_string(),
                });
            }
        };

        info!(issue = %issue.number, item = %item_id, "moving top issue");
        self.board
            .set_status(
                &metadata.project_id,
                &item_id,
                &metadata.status_field_id,
                option_id,
            )
            .await?;

        Ok(MovedItem {
            item_id,
            issue,
            from: from_name,
            to: to_name.clone(),
        })
    }

    /// Adds an existing issue to the board and gives it `status`.
    ///
    /// The issue itself must already exist; `content_id` is its node id.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownStatus`] if `status` is not an option, checked
    /// before anything is written. Otherwise any resolution or mutation
    /// failure. If `set_status` fails the item stays on the board without a
    /// status.
    #[tracing::instrument(skip_all, fields(project = %project, content = %content_id, status = status))]
    pub async fn add_issue(
        &self,
        project: &ProjectName,
        content_id: &ContentId,
        status: &str,
    ) -> BoardResult<ItemId> {
        let metadata = self.board.resolve(project).await?;
        let option_id = metadata.option_id(status)?;

        let item_id = self.board.add_item(&metadata.project_id, content_id).await?;
        info!(item = %item_id, "added issue to board");

        self.board
            .set_status(
                &metadata.project_id,
                &item_id,
                &metadata.status_field_id,
                option_id,
            )
            .await?;
        Ok(item_id)
    }
}
