use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Variables the action attaches to every pipeline it triggers.
pub const GITHUB_REF_NAME: &str = "GITHUB_REF_NAME";
pub const GITHUB_REF_TYPE: &str = "GITHUB_REF_TYPE";
pub const GITHUB_REPO: &str = "GITHUB_REPO";
pub const GITHUB_SHA: &str = "GITHUB_SHA";
pub const GITHUB_SCHEDULE: &str = "GITHUB_SCHEDULE";

/// GitLab pipeline id (the REST `id`, not the per-project `iid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct PipelineId(pub u64);

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pipeline as returned by the list and trigger endpoints.
///
/// Only the id is read; everything else in the response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabPipeline {
    pub id: PipelineId,
}

/// One entry of `GET /projects/:id/pipelines/:pipeline_id/variables`.
///
/// GitLab allows variables without a value, returned as `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineVariable {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Variables of a single pipeline, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct PipelineVariables(HashMap<String, Option<String>>);

impl PipelineVariables {
    /// Value of `key`; `None` when the variable is absent or has no value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.as_deref())
    }
}

impl FromIterator<PipelineVariable> for PipelineVariables {
    fn from_iter<I: IntoIterator<Item = PipelineVariable>>(iter: I) -> Self {
        Self(iter.into_iter().map(|v| (v.key, v.value)).collect())
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&str, &str); N]> for PipelineVariables {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_without_value() {
        let variables: Vec<PipelineVariable> = serde_json::from_str(
            r#"[
                {"key": "GITHUB_REF_NAME", "value": null},
                {"key": "GITHUB_REF_TYPE"},
                {"key": "GITHUB_SHA", "value": "deadbeef"}
            ]"#,
        )
        .unwrap();
        let variables: PipelineVariables = variables.into_iter().collect();

        assert_eq!(variables.get(GITHUB_REF_NAME), None);
        assert_eq!(variables.get(GITHUB_REF_TYPE), None);
        assert_eq!(variables.get(GITHUB_SHA), Some("deadbeef"));
        assert_eq!(variables.get("MISSING"), None);
    }
}
