//! Sprint state engine.
//!
//! Pure functions over a [`BoardSnapshot`]. There is no stored "current
//! state": every answer is re-derived from whatever snapshot the caller just
//! read, so transitions happen implicitly as the remote board changes.
//!
//! Only items backed by an issue take part. Status values are already
//! filtered to the project's `Status` field by the snapshot reader.

use crate::types::{BLOCKED, BACKLOG, INACTIVE_STATUSES, READY};
use crate::{BoardItem, BoardSnapshot, SprintState};

/// Returns `true` if no item on the board is backed by an issue.
///
/// Draft items and other entries without issue content do not count.
pub fn is_empty(snapshot: &BoardSnapshot) -> bool {
    snapshot.trackable().next().is_none()
}

/// Returns the first issue-backed item (in API return order) whose status is
/// `status`.
///
/// "Top" means first returned. There is no secondary ordering, so a lower
/// issue number further down the board does not win.
pub fn find_top<'a>(snapshot: &'a BoardSnapshot, status: &str) -> Option<&'a BoardItem> {
    snapshot.trackable().find(|item| item.has_status(status))
}

/// Returns `true` if the sprint cannot move forward.
///
/// Two independent conditions, either one is enough:
/// - some item is `Blocked`;
/// - no item is `Ready` or `Backlog`.
pub fn is_blocked(snapshot: &BoardSnapshot) -> bool {
    let mut has_queued = false;
    for item in snapshot.trackable() {
        if item.has_status(BLOCKED) {
            return true;
        }
        if item.has_status(READY) || item.has_status(BACKLOG) {
            has_queued = true;
        }
    }
    !has_queued
}

/// Number of issue-backed items whose status is set and is not one of
/// `Ready`, `Backlog` or `Done`.
pub fn active_count(snapshot: &BoardSnapshot) -> usize {
    snapshot
        .trackable()
        .filter(|item| {
            item.status
                .as_ref()
                .is_some_and(|status| !INACTIVE_STATUSES.contains(&status.as_str()))
        })
        .count()
}

/// Returns `true` if exactly one item is actively being worked on.
///
/// The workflow drives at most one active item. Two or more active items
/// break that invariant and are reported as `false`, same as zero; use
/// [`active_count`] to tell the cases apart.
pub fn is_in_progress(snapshot: &BoardSnapshot) -> bool {
    active_count(snapshot) == 1
}

/// Derives the sprint state from a snapshot.
///
/// Precedence: `Empty`, then `Blocked`, then `InProgress`, otherwise `Idle`.
pub fn derive_state(snapshot: &BoardSnapshot) -> SprintState {
    if is_empty(snapshot) {
        SprintState::Empty
    } else if is_blocked(snapshot) {
        SprintState::Blocked
    } else if is_in_progress(snapshot) {
        SprintState::InProgress
    } else {
        SprintState::Idle
    }
}
