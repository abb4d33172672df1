use serde::{Deserialize, Serialize};

pub const DEFAULT_BRANCH: &str = "main";

/// The repository a conversation is pinned to.
///
/// Owner and repo are non-empty once a selection exists; callers that only
/// have raw user input go through `gitcanvas-core`'s URL parser instead of
/// constructing this directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSelection {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl RepoSelection {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: default_branch(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// "owner/repo" form used for display and for tool-server scoping.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_defaults_to_main() {
        let sel = RepoSelection::new("octocat", "Hello-World");
        assert_eq!(sel.branch, "main");
        assert_eq!(sel.full_name(), "octocat/Hello-World");
    }

    #[test]
    fn deserialize_without_branch_uses_default() {
        let sel: RepoSelection =
            serde_json::from_str(r#"{"owner": "facebook", "repo": "react"}"#).unwrap();
        assert_eq!(sel.branch, "main");
    }
}
