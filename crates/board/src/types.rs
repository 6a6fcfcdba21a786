//! Shared value types for the sprint board domain.
//!
//! Everything here is transient: a [`BoardSnapshot`] or [`ProjectMetadata`] is
//! rebuilt from the remote board for every operation and never cached. The
//! remote board is the only owner of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BoardError, FieldId, IssueNumber, ItemId, OptionId, ProjectId, ProjectName, StatusName};

// ---------------------------------------------------------------------------
// Well-known names
// ---------------------------------------------------------------------------

/// Name of the single-select field that carries the workflow stage.
pub const STATUS_FIELD_NAME: &str = "Status";

/// Status option for items that have not been scheduled yet.
pub const BACKLOG: &str = "Backlog";

/// Status option for items queued for the next sprint step.
pub const READY: &str = "Ready";

/// Status option for items that cannot proceed.
pub const BLOCKED: &str = "Blocked";

/// Status option for finished items.
pub const DONE: &str = "Done";

/// Statuses that do not count as "actively being worked on".
pub const INACTIVE_STATUSES: [&str; 3] = [READY, BACKLOG, DONE];

// ---------------------------------------------------------------------------
// Status options
// ---------------------------------------------------------------------------

/// Mapping from `Status` option name to option id.
///
/// Names are unique and case-sensitive. The order in which the board schema
/// lists the options is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOptions(Vec<(StatusName, OptionId)>);

impl StatusOptions {
    /// Builds the option map from `(name, id)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateOptionName`] if two options share a name.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (StatusName, OptionId)>,
    ) -> Result<Self, BoardError> {
        let mut options: Vec<(StatusName, OptionId)> = Vec::new();
        for (name, id) in pairs {
            if options.iter().any(|(existing, _)| *existing == name) {
                return Err(BoardError::DuplicateOptionName {
                    name: name.to_string(),
                });
            }
            options.push((name, id));
        }
        Ok(Self(options))
    }

    /// Returns the option id for `name`, if the board defines it.
    pub fn get(&self, name: &str) -> Option<&OptionId> {
        self.entry(name).map(|(_, id)| id)
    }

    /// Returns the option name and id for `name`, if the board defines it.
    pub fn entry(&self, name: &str) -> Option<(&StatusName, &OptionId)> {
        self.0
            .iter()
            .find(|(option, _)| option.as_str() == name)
            .map(|(option, id)| (option, id))
    }

    /// Returns `true` if the board defines an option called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Option names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &StatusName> {
        self.0.iter().map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Project metadata
// ---------------------------------------------------------------------------

/// Schema metadata resolved for one project board.
///
/// Produced by [`crate::ProjectBoard::resolve`]. Never cached: the schema may
/// change between workflow steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Opaque node id of the board.
    pub project_id: ProjectId,
    /// Title the board was looked up by.
    pub title: ProjectName,
    /// Id of the single-select field named `Status`.
    pub status_field_id: FieldId,
    /// Options of the `Status` field.
    pub status_options: StatusOptions,
}

impl ProjectMetadata {
    /// Looks up the option id for `status`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownStatus`] if the board has no such option.
    pub fn option_id(&self, status: &str) -> Result<&OptionId, BoardError> {
        self.status(status).map(|(_, id)| id)
    }

    /// Looks up both the option name and id for `status`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownStatus`] if the board has no such option.
    pub fn status(&self, status: &str) -> Result<(&StatusName, &OptionId), BoardError> {
        self.status_options
            .entry(status)
            .ok_or_else(|| BoardError::UnknownStatus {
                status: status.to_string(),
                project: self.title.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Board items
// ---------------------------------------------------------------------------

/// The issue backing a board item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub number: IssueNumber,
    pub title: String,
}

/// One entry on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardItem {
    /// Board item id (not the issue id).
    pub id: ItemId,

    /// Linked issue, or `None` for drafts and other non-issue content.
    pub issue: Option<IssueRef>,

    /// Current `Status` option name, or `None` when unset.
    pub status: Option<StatusName>,
}

impl BoardItem {
    /// Returns `true` if this item is backed by an issue.
    pub fn is_trackable(&self) -> bool {
        self.issue.is_some()
    }

    /// Returns `true` if the item's status equals `name`.
    pub fn has_status(&self, name: &str) -> bool {
        self.status.as_ref().is_some_and(|s| s.as_str() == name)
    }
}

/// All items of a board, in the order the API returned them, at one point in
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub items: Vec<BoardItem>,
    pub captured_at: Timestamp,
}

impl BoardSnapshot {
    /// Creates a snapshot stamped with the current time.
    pub fn new(items: Vec<BoardItem>) -> Self {
        Self {
            items,
            captured_at: Timestamp::now(),
        }
    }

    /// Items backed by an issue, in snapshot order.
    pub fn trackable(&self) -> impl Iterator<Item = &BoardItem> {
        self.items.iter().filter(|item| item.is_trackable())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Derived results
// ---------------------------------------------------------------------------

/// Externally observable state of the sprint, re-derived from every fresh
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintState {
    /// No issue-backed items on the board; the sprint has not started.
    Empty,
    /// An item is `Blocked`, or nothing is left in `Ready`/`Backlog`.
    Blocked,
    /// Exactly one item is being actively worked on.
    InProgress,
    /// Work is queued but nothing is active.
    Idle,
}

impl std::fmt::Display for SprintState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::Blocked => "blocked",
            Self::InProgress => "in_progress",
            Self::Idle => "idle",
        };
        f.write_str(s)
    }
}

/// Outcome of moving the top item of one status to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedItem {
    pub item_id: ItemId,
    pub issue: IssueRef,
    pub from: StatusName,
    pub to: StatusName,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pair(name: &str, id: &str) -> (StatusName, OptionId) {
        (StatusName::new(name).unwrap(), OptionId::new(id).unwrap())
    }

    #[test]
    fn status_options_keep_schema_order() {
        let options =
            StatusOptions::from_pairs([pair("Backlog", "o1"), pair("Ready", "o2"), pair("Done", "o3")])
                .unwrap();

        let names: Vec<&str> = options.names().map(StatusName::as_str).collect();
        assert_eq!(names, vec!["Backlog", "Ready", "Done"]);
        assert_eq!(options.get("Ready").map(OptionId::as_str), Some("o2"));
        assert!(!options.contains("ready"));
    }

    #[test]
    fn duplicate_option_names_are_rejected() {
        let err = StatusOptions::from_pairs([pair("Ready", "o1"), pair("Ready", "o2")]).unwrap_err();
        assert_eq!(
            err,
            BoardError::DuplicateOptionName {
                name: "Ready".to_string()
            }
        );
    }

    #[test]
    fn option_id_reports_unknown_status() {
        let metadata = ProjectMetadata {
            project_id: ProjectId::new("P").unwrap(),
            title: ProjectName::new("Release 1").unwrap(),
            status_field_id: FieldId::new("F").unwrap(),
            status_options: StatusOptions::from_pairs([pair("Backlog", "o1")]).unwrap(),
        };

        assert!(metadata.option_id("Backlog").is_ok());
        assert!(matches!(
            metadata.option_id("Doing"),
            Err(BoardError::UnknownStatus { status, project }) if status == "Doing" && project == "Release 1"
        ));
    }

    #[test]
    fn sprint_state_serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&SprintState::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn snapshot_records_when_it_was_taken() {
        let before = Timestamp::now();
        let snapshot = BoardSnapshot::new(Vec::new());
        assert!(snapshot.captured_at >= before);

        let rendered = snapshot.captured_at.to_string();
        assert!(DateTime::parse_from_rfc3339(&rendered).is_ok());
    }
}
