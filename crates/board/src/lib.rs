//! Sprint board domain.
//!
//! This crate holds every domain concept used to track a sprint on a remote
//! Kanban board: newtype identifiers, board snapshot types, the error
//! taxonomy, the pure sprint state engine, and the [`ProjectBoard`] port that
//! infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a board must answer; the `github` crate defines *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ProjectId`, `ItemId`, `StatusName`, etc.) |
//! | [`types`] | Board value types (`BoardItem`, `BoardSnapshot`, `ProjectMetadata`, etc.) |
//! | [`errors`] | [`BoardError`] taxonomy and [`RetryPolicy`] |
//! | [`state`] | Pure predicates: empty, blocked, in progress, top item |
//! | [`ports`] | [`ProjectBoard`] trait |
//! | [`sprint`] | [`SprintTracker`]: predicates and moves over a live board |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod sprint;
pub mod state;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{BoardError, BoardResult, RetryPolicy};
pub use identifiers::{
    ContentId, EmptyIdentifier, FieldId, IssueNumber, ItemId, OptionId, Owner, ProjectId, ProjectName, StatusName,
};
pub use ports::ProjectBoard;
pub use sprint::SprintTracker;
pub use types::{
    BoardItem, BoardSnapshot, IssueRef, MovedItem, ProjectMetadata, SprintState, StatusOptions,
    Timestamp, BACKLOG, BLOCKED, DONE, INACTIVE_STATUSES, READY, STATUS_FIELD_NAME,
};
