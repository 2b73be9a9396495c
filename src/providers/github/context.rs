use log::debug;
use std::path::Path;

use crate::config::{get_env, EnvSource};
use crate::error::Result;

use super::types::{EventPayload, TriggerEvent};

/// Context of the workflow run that invoked the action.
///
/// Built from the variables the Actions runner exports and the webhook
/// payload it writes to `GITHUB_EVENT_PATH`.
#[derive(Debug, Clone)]
pub struct GithubContext {
    pub event: TriggerEvent,
    /// Commit the workflow runs on (`GITHUB_SHA`)
    pub sha: String,
    pub ref_name: String,
    /// `branch` or `tag`
    pub ref_type: String,
    /// Repository name without the owner
    pub repo: String,
    pub payload: EventPayload,
}

impl GithubContext {
    /// # Errors
    ///
    /// Returns `UnsupportedEvent` for events outside [`TriggerEvent`], and
    /// `Config` when a runner variable is missing.
    pub fn from_env(env: &impl EnvSource) -> Result<Self> {
        let event: TriggerEvent = get_env(env, "GITHUB_EVENT_NAME")?.parse()?;
        let repository = get_env(env, "GITHUB_REPOSITORY")?;

        let payload = match env.var("GITHUB_EVENT_PATH").filter(|p| !p.is_empty()) {
            Some(path) => Self::read_payload(Path::new(&path))?,
            None => EventPayload::default(),
        };

        let context = Self {
            event,
            sha: get_env(env, "GITHUB_SHA")?,
            ref_name: get_env(env, "GITHUB_REF_NAME")?,
            ref_type: get_env(env, "GITHUB_REF_TYPE")?,
            repo: repo_name(&repository).to_string(),
            payload,
        };
        debug!("Resolved GitHub context: {context:?}");

        Ok(context)
    }

    fn read_payload(path: &Path) -> Result<EventPayload> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn pull_request_head_sha(&self) -> Option<&str> {
        self.payload
            .pull_request
            .as_ref()
            .map(|pr| pr.head.sha.as_str())
    }
}

/// `owner/repo` -> `repo`
fn repo_name(repository: &str) -> &str {
    repository
        .split_once('/')
        .map_or(repository, |(_, repo)| repo)
}
