//! GraphQL query catalog.
//!
//! Every request this crate sends is one of the [`QueryKind`] variants, so
//! an unknown query name cannot exist at runtime.

/// Number of nodes requested per page for paginated connections.
pub const PAGE_SIZE: usize = 50;

/// The fixed set of requests sent to the Projects V2 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Organization-owned boards. Variables: `owner`, `cursor`.
    ProjectsByOrg,
    /// User-owned boards. Variables: `owner`, `cursor`.
    ProjectsByUser,
    /// Single-select fields of a board with their options. Variables: `projectId`.
    StatusField,
    /// Board items with single-select values and issue content. Variables:
    /// `projectId`, `cursor`.
    ItemsWithStatus,
    /// Attach issue content to a board. Variables: `projectId`, `contentId`.
    AddItem,
    /// Set an item's single-select value. Variables: `projectId`, `itemId`,
    /// `fieldId`, `optionId`.
    SetItemStatus,
    /// Login of the token's user. No variables.
    Viewer,
}

impl QueryKind {
    /// Stable name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::ProjectsByOrg => "list-projects-by-org",
            Self::ProjectsByUser => "list-projects-by-user",
            Self::StatusField => "get-status-field",
            Self::ItemsWithStatus => "list-items-with-status",
            Self::AddItem => "add-item-to-project",
            Self::SetItemStatus => "set-item-status",
            Self::Viewer => "viewer",
        }
    }

    /// Returns `true` for requests that change the board.
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::AddItem | Self::SetItemStatus)
    }

    /// GraphQL document sent for this request.
    pub fn template(self) -> &'static str {
        match self {
            Self::ProjectsByOrg => PROJECTS_BY_ORG,
            Self::ProjectsByUser => PROJECTS_BY_USER,
            Self::StatusField => STATUS_FIELD,
            Self::ItemsWithStatus => ITEMS_WITH_STATUS,
            Self::AddItem => ADD_ITEM,
            Self::SetItemStatus => SET_ITEM_STATUS,
            Self::Viewer => VIEWER,
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const PROJECTS_BY_ORG: &str = r"
query($owner: String!, $cursor: String) {
  organization(login: $owner) {
    projectsV2(first: 50, after: $cursor) {
      nodes { id title }
      pageInfo { hasNextPage endCursor }
    }
  }
}";

const PROJECTS_BY_USER: &str = r"
query($owner: String!, $cursor: String) {
  user(login: $owner) {
    projectsV2(first: 50, after: $cursor) {
      nodes { id title }
      pageInfo { hasNextPage endCursor }
    }
  }
}";

// Projects allow at most 50 fields, so one page covers them all.
const STATUS_FIELD: &str = r"
query($projectId: ID!) {
  node(id: $projectId) {
    ... on ProjectV2 {
      fields(first: 50) {
        nodes {
          ... on ProjectV2SingleSelectField {
            id
            name
            options { id name }
          }
        }
      }
    }
  }
}";

const ITEMS_WITH_STATUS: &str = r"
query($projectId: ID!, $cursor: String) {
  node(id: $projectId) {
    ... on ProjectV2 {
      items(first: 50, after: $cursor) {
        nodes {
          id
          fieldValues(first: 50) {
            nodes {
              ... on ProjectV2ItemFieldSingleSelectValue {
                name
                field { ... on ProjectV2SingleSelectField { id } }
              }
            }
          }
          content {
            ... on Issue { number title }
          }
        }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}";

const ADD_ITEM: &str = r"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: { projectId: $projectId, contentId: $contentId }) {
    item { id }
  }
}";

const SET_ITEM_STATUS: &str = r"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $projectId
    itemId: $itemId
    fieldId: $fieldId
    value: { singleSelectOptionId: $optionId }
  }) {
    projectV2Item { id }
  }
}";

const VIEWER: &str = r"
query {
  viewer { login }
}";

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const ALL: [QueryKind; 7] = [
        QueryKind::ProjectsByOrg,
        QueryKind::ProjectsByUser,
        QueryKind::StatusField,
        QueryKind::ItemsWithStatus,
        QueryKind::AddItem,
        QueryKind::SetItemStatus,
        QueryKind::Viewer,
    ];

    #[test]
    fn only_add_and_set_are_mutations() {
        for kind in ALL {
            let is_mutation_doc = kind.template().trim_start().starts_with("mutation");
            assert_eq!(kind.is_mutation(), is_mutation_doc, "{kind}");
        }
    }

    #[rstest]
    #[case(QueryKind::ProjectsByOrg, &["$owner", "$cursor"])]
    #[case(QueryKind::ProjectsByUser, &["$owner", "$cursor"])]
    #[case(QueryKind::StatusField, &["$projectId"])]
    #[case(QueryKind::ItemsWithStatus, &["$projectId", "$cursor"])]
    #[case(QueryKind::AddItem, &["$projectId", "$contentId"])]
    #[case(QueryKind::SetItemStatus, &["$projectId", "$itemId", "$fieldId", "$optionId"])]
    fn templates_declare_their_variables(#[case] kind: QueryKind, #[case] variables: &[&str]) {
        for variable in variables {
            assert!(
                kind.template().contains(&format!("{variable}:")),
                "{kind} does not declare {variable}"
            );
        }
    }

    #[test]
    fn paginated_templates_use_page_size() {
        let first = format!("first: {PAGE_SIZE}, after: $cursor");
        assert!(QueryKind::ItemsWithStatus.template().contains(&first));
        assert!(QueryKind::ProjectsByOrg.template().contains(&first));
    }
}
