use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::GlPipeError;

/// GitHub Actions events this action can be triggered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    PullRequest,
    PullRequestTarget,
    Push,
    Schedule,
    MergeGroup,
}

impl TriggerEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PullRequest => "pull_request",
            Self::PullRequestTarget => "pull_request_target",
            Self::Push => "push",
            Self::Schedule => "schedule",
            Self::MergeGroup => "merge_group",
        }
    }

    pub fn is_pull_request(self) -> bool {
        matches!(self, Self::PullRequest | Self::PullRequestTarget)
    }
}

impl FromStr for TriggerEvent {
    type Err = GlPipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pull_request" => Ok(Self::PullRequest),
            "pull_request_target" => Ok(Self::PullRequestTarget),
            "push" => Ok(Self::Push),
            "schedule" => Ok(Self::Schedule),
            "merge_group" => Ok(Self::MergeGroup),
            other => Err(GlPipeError::UnsupportedEvent(other.to_string())),
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of the webhook payload (`GITHUB_EVENT_PATH`) we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub head: PullRequestHead,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    pub sha: String,
}
