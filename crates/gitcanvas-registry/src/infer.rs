use gitcanvas_protocol::RenderedComponent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The widget vocabulary the orchestration layer can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    CommitTimeline,
    ContributorNetwork,
    RiskHeatmap,
    PrSummary,
    RepoOverview,
    DiffViewer,
    FileExplorer,
    Unknown,
}

impl WidgetKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            WidgetKind::CommitTimeline => "Commit Timeline",
            WidgetKind::ContributorNetwork => "Contributor Network",
            WidgetKind::RiskHeatmap => "Risk Heatmap",
            WidgetKind::PrSummary => "PR Summary",
            WidgetKind::RepoOverview => "Repository Overview",
            WidgetKind::DiffViewer => "Diff Viewer",
            WidgetKind::FileExplorer => "File Explorer",
            WidgetKind::Unknown => "Component",
        }
    }

    /// Exact match on a machine tag or a widget class name.
    fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "committimeline" => Some(WidgetKind::CommitTimeline),
            "contributornetwork" => Some(WidgetKind::ContributorNetwork),
            "riskheatmap" => Some(WidgetKind::RiskHeatmap),
            "prsummary" | "pullrequestsummary" => Some(WidgetKind::PrSummary),
            "repooverview" | "reposummary" | "repositoryoverview" => {
                Some(WidgetKind::RepoOverview)
            }
            "diffviewer" => Some(WidgetKind::DiffViewer),
            "fileexplorer" => Some(WidgetKind::FileExplorer),
            _ => None,
        }
    }

    /// Substring fallback over a recovered name, for producers whose tags do
    /// not match the vocabulary exactly.
    fn from_keywords(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.contains("commit") {
            Some(WidgetKind::CommitTimeline)
        } else if name.contains("risk") || name.contains("heatmap") {
            Some(WidgetKind::RiskHeatmap)
        } else if name.contains("diff") {
            Some(WidgetKind::DiffViewer)
        } else if name.contains("pr") || name.contains("pull") {
            Some(WidgetKind::PrSummary)
        } else if name.contains("contributor") || name.contains("network") {
            Some(WidgetKind::ContributorNetwork)
        } else if name.contains("repo") || name.contains("summary") {
            Some(WidgetKind::RepoOverview)
        } else if name.contains("file") {
            Some(WidgetKind::FileExplorer)
        } else {
            None
        }
    }
}

/// Recover the widget kind of a rendered component.
///
/// The explicit `type_tag` set by the producing layer is authoritative.
/// Everything after it is the legacy fallback chain for untagged components,
/// in order: the declared display name, the same lookup on the sole child,
/// prop-shape sniffing, and finally keyword matching on whatever name was
/// recovered.
pub fn infer_widget_kind(component: &RenderedComponent) -> WidgetKind {
    if let Some(kind) = component.type_tag.as_deref().and_then(WidgetKind::from_tag) {
        return kind;
    }
    if let Some(kind) = component
        .display_name
        .as_deref()
        .and_then(WidgetKind::from_tag)
    {
        return kind;
    }

    if let Some(child) = &component.child {
        let kind = infer_widget_kind(child);
        if kind != WidgetKind::Unknown {
            return kind;
        }
    }

    if let Some(kind) = sniff_props(&component.props) {
        return kind;
    }

    for name in [&component.type_tag, &component.display_name]
        .into_iter()
        .flatten()
    {
        if let Some(kind) = WidgetKind::from_keywords(name) {
            return kind;
        }
    }

    WidgetKind::Unknown
}

fn sniff_props(props: &Value) -> Option<WidgetKind> {
    let map = props.as_object()?;

    // Named-key shapes first; the generic sha scan goes last because file
    // entries of other widgets can legitimately carry a sha as well.
    if map.contains_key("contributors") && map.contains_key("collaborations") {
        return Some(WidgetKind::ContributorNetwork);
    }
    if let Some(files) = map.get("files").and_then(Value::as_array) {
        if files
            .first()
            .and_then(Value::as_object)
            .is_some_and(|f| f.contains_key("riskScore"))
        {
            return Some(WidgetKind::RiskHeatmap);
        }
    }
    if map.contains_key("prNumber") || map.contains_key("prUrl") {
        return Some(WidgetKind::PrSummary);
    }
    if map.contains_key("fullName")
        && (map.contains_key("structure") || map.contains_key("topics"))
    {
        return Some(WidgetKind::RepoOverview);
    }
    if map.values().any(|v| {
        v.as_array()
            .and_then(|a| a.first())
            .and_then(Value::as_object)
            .is_some_and(has_sha_like_field)
    }) {
        return Some(WidgetKind::CommitTimeline);
    }

    None
}

fn has_sha_like_field(entry: &serde_json::Map<String, Value>) -> bool {
    entry
        .keys()
        .any(|k| k == "sha" || k.ends_with("Sha") || k.ends_with("_sha"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_tag_is_authoritative() {
        // The props look like a heatmap, but the tag wins.
        let component = RenderedComponent::tagged(
            "commit_timeline",
            json!({"files": [{"riskScore": 0.9}]}),
        );
        assert_eq!(infer_widget_kind(&component), WidgetKind::CommitTimeline);
    }

    #[test]
    fn display_name_matches_class_names() {
        let mut component = RenderedComponent::untagged(json!({}));
        component.display_name = Some("RiskHeatmap".to_string());
        assert_eq!(infer_widget_kind(&component), WidgetKind::RiskHeatmap);
    }

    #[test]
    fn sole_child_is_inspected() {
        let child = RenderedComponent::tagged("contributor_network", json!({}));
        let wrapper = RenderedComponent::untagged(json!({})).with_child(child);
        assert_eq!(infer_widget_kind(&wrapper), WidgetKind::ContributorNetwork);
    }

    #[test]
    fn sniffs_commit_array() {
        let component = RenderedComponent::untagged(json!({
            "commits": [{"sha": "abc123", "message": "fix"}]
        }));
        assert_eq!(infer_widget_kind(&component), WidgetKind::CommitTimeline);
    }

    #[test]
    fn sniffs_contributor_pair() {
        let component = RenderedComponent::untagged(json!({
            "contributors": [], "collaborations": []
        }));
        assert_eq!(infer_widget_kind(&component), WidgetKind::ContributorNetwork);
    }

    #[test]
    fn sniffs_risk_files_even_with_shas() {
        let component = RenderedComponent::untagged(json!({
            "files": [{"path": "src/lib.rs", "riskScore": 0.7, "sha": "abc"}]
        }));
        assert_eq!(infer_widget_kind(&component), WidgetKind::RiskHeatmap);
    }

    #[test]
    fn sniffs_pr_and_repo_shapes() {
        let pr = RenderedComponent::untagged(json!({"prNumber": 42, "title": "Fix"}));
        assert_eq!(infer_widget_kind(&pr), WidgetKind::PrSummary);

        let repo = RenderedComponent::untagged(json!({
            "fullName": "facebook/react", "topics": ["ui"]
        }));
        assert_eq!(infer_widget_kind(&repo), WidgetKind::RepoOverview);
    }

    #[test]
    fn keyword_fallback_applies_to_unmatched_tags() {
        let component = RenderedComponent::tagged("FancyCommitGraph", json!({}));
        assert_eq!(infer_widget_kind(&component), WidgetKind::CommitTimeline);
    }

    #[test]
    fn unrecognized_component_is_unknown() {
        let component = RenderedComponent::untagged(json!({"foo": "bar"}));
        assert_eq!(infer_widget_kind(&component), WidgetKind::Unknown);
        assert_eq!(WidgetKind::Unknown.display_name(), "Component");
    }
}
