use gitcanvas_protocol::RepoSelection;
use regex::Regex;
use std::sync::LazyLock;

/// A successfully recognized repository reference.
///
/// `branch` is only set when the input carried one (the HTTPS `/tree/...`
/// form); conversion into a [`RepoSelection`] applies the "main" default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRepoUrl {
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
}

impl ParsedRepoUrl {
    pub fn into_selection(self) -> RepoSelection {
        let selection = RepoSelection::new(self.owner, self.repo);
        match self.branch {
            Some(branch) => selection.with_branch(branch),
            None => selection,
        }
    }
}

static SSH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@github\.com:([A-Za-z0-9_-]+)/([A-Za-z0-9_.-]+)$").unwrap()
});

static HTTPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?github\.com/([A-Za-z0-9_-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:/tree/([^/?#]+))?(?:/.*)?$",
    )
    .unwrap()
});

static SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+)/([A-Za-z0-9_.-]+)$").unwrap());

/// Parse a free-text repository reference.
///
/// Recognized forms, tried in order with the first match winning:
/// SSH (`git@github.com:owner/repo`), HTTPS
/// (`github.com/owner/repo[/tree/branch][/...]`), and the `owner/repo`
/// shorthand. Anything else yields `None`; this function never panics.
pub fn parse_repo_url(input: &str) -> Option<ParsedRepoUrl> {
    let input = input.trim();

    if let Some(caps) = SSH_RE.captures(input) {
        let repo = caps[2].trim_end_matches(".git");
        if repo.is_empty() {
            return None;
        }
        return Some(ParsedRepoUrl {
            owner: caps[1].to_string(),
            repo: repo.to_string(),
            branch: None,
        });
    }

    if let Some(caps) = HTTPS_RE.captures(input) {
        return Some(ParsedRepoUrl {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            branch: caps.get(3).map(|m| m.as_str().to_string()),
        });
    }

    if let Some(caps) = SHORTHAND_RE.captures(input) {
        return Some(ParsedRepoUrl {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            branch: None,
        });
    }

    None
}
