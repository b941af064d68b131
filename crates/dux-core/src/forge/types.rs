use serde::{Deserialize, Serialize};

/// Issue data the identifier deriver and assistant prompts consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub url: String,
}

/// Minimal pull request view: where it lives and its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrSummary {
    pub url: String,
    #[serde(default = "unknown_state")]
    pub state: String,
}

fn unknown_state() -> String {
    "unknown".to_string()
}

impl PrSummary {
    /// Placeholder used when a PR could neither be created nor found.
    pub fn unavailable() -> Self {
        Self {
            url: "N/A".to_string(),
            state: unknown_state(),
        }
    }

    pub fn is_merged(&self) -> bool {
        self.state.eq_ignore_ascii_case("merged")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_record_body_defaults_to_empty() {
        let issue: IssueRecord = serde_json::from_str(
            r#"{"number": 12, "title": "Fix login", "url": "https://github.com/o/r/issues/12"}"#,
        )
        .unwrap();
        assert_eq!(issue.number, 12);
        assert_eq!(issue.body, "");
    }

    #[test]
    fn test_pr_summary_merged_is_case_insensitive() {
        let pr: PrSummary =
            serde_json::from_str(r#"{"url": "https://x/pull/1", "state": "MERGED"}"#).unwrap();
        assert!(pr.is_merged());
        assert!(!PrSummary::unavailable().is_merged());
    }
}
