//! Sprint board GitHub infrastructure adapter.
//!
//! Implements the [`board::ProjectBoard`] port over the GitHub Projects V2
//! GraphQL API.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain sprint rules.
//! All GitHub API details (query text, pagination, authentication, response
//! shapes) are handled here; the [`board`] crate never sees them.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | [`GithubConfig`], [`ApiToken`], [`ConfigError`] |
//! | [`queries`] | [`QueryKind`] catalog and GraphQL documents |
//! | [`transport`] | [`GraphQlTransport`] port and [`HttpTransport`] |
//! | [`metadata`] | [`MetadataResolver`]: project id and `Status` field |
//! | [`snapshot`] | [`SnapshotReader`]: paginated item reads |
//! | [`project_board`] | [`GithubProjectBoard`]: the [`board::ProjectBoard`] implementation |

pub mod config;
pub mod metadata;
pub mod project_board;
pub mod queries;
pub mod snapshot;
pub mod transport;

mod wire;

#[cfg(test)]
mod testing;

pub use config::{ApiToken, ConfigError, GithubConfig, DEFAULT_ENDPOINT};
pub use metadata::MetadataResolver;
pub use project_board::GithubProjectBoard;
pub use queries::{QueryKind, PAGE_SIZE};
pub use snapshot::SnapshotReader;
pub use transport::{GraphQlTransport, HttpTransport};
