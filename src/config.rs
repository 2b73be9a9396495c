use std::collections::HashMap;

use crate::auth::Token;
use crate::error::{GlPipeError, Result};
use crate::providers::github::GithubContext;

const TRUE_VALUES: [&str; 3] = ["true", "True", "TRUE"];
const FALSE_VALUES: [&str; 3] = ["false", "False", "FALSE"];

/// Source of environment variables.
///
/// The process environment in production, a plain map in tests.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Reads a required, non-empty environment variable.
pub fn get_env(env: &impl EnvSource, name: &str) -> Result<String> {
    match env.var(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(GlPipeError::Config(format!(
            "Environment variable expected, but not supplied: {name}"
        ))),
    }
}

/// Reads a required boolean environment variable.
///
/// Only the lower, capitalised and upper case spellings of `true`/`false` are accepted.
pub fn get_boolean_env(env: &impl EnvSource, name: &str) -> Result<bool> {
    let value = get_env(env, name)?;
    parse_bool_input(&value).ok_or_else(|| {
        GlPipeError::Config(format!(
            "Input could not be converted to boolean value: {name}"
        ))
    })
}

pub fn parse_bool_input(value: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&value) {
        Some(true)
    } else if FALSE_VALUES.contains(&value) {
        Some(false)
    } else {
        None
    }
}

/// Action inputs, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// GitLab REST v4 base URL (e.g. <https://gitlab.com/api/v4>)
    pub api_url: String,
    /// Token appended as `access_token` to every GitLab call
    pub access_token: Token,
    /// Pipeline trigger token, only used by the trigger call
    pub trigger_token: Token,
    /// Numeric id or `group/project` path
    pub project_id: String,
    /// GitLab branch or tag the pipeline runs against
    pub triggered_ref: String,
    pub schedule: bool,
    pub cancel_outdated_pipelines: bool,
}

impl InputConfig {
    pub fn from_env(env: &impl EnvSource) -> Result<Self> {
        Ok(Self {
            api_url: get_env(env, "CI_API_V4_URL")?,
            access_token: Token::from(get_env(env, "ACCESS_TOKEN")?),
            trigger_token: Token::from(get_env(env, "TRIGGER_TOKEN")?),
            project_id: get_env(env, "PROJECT_ID")?,
            triggered_ref: get_env(env, "TRIGGERED_REF")?,
            schedule: get_boolean_env(env, "SCHEDULE")?,
            cancel_outdated_pipelines: get_boolean_env(env, "CANCEL_OUTDATED_PIPELINES")?,
        })
    }
}

/// GitHub side of the run, forwarded to GitLab as pipeline variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GithubConfig {
    pub ref_name: String,
    pub ref_type: String,
    pub repo: String,
    pub sha: String,
}

impl GithubConfig {
    /// Builds the config from the triggering event.
    ///
    /// Pull request events run on a merge commit, so the head sha of the
    /// pull request is used instead of `GITHUB_SHA`.
    pub fn from_context(context: &GithubContext) -> Result<Self> {
        let sha = if context.event.is_pull_request() {
            context
                .pull_request_head_sha()
                .ok_or_else(|| {
                    GlPipeError::Config(format!(
                        "Event payload for {} does not contain pull_request.head.sha",
                        context.event
                    ))
                })?
                .to_owned()
        } else {
            context.sha.clone()
        };

        Ok(Self {
            ref_name: context.ref_name.clone(),
            ref_type: context.ref_type.clone(),
            repo: context.repo.clone(),
            sha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::github::{EventPayload, TriggerEvent};

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            ("CI_API_V4_URL", "https://gitlab.example.com/api/v4"),
            ("ACCESS_TOKEN", "glpat-access"),
            ("TRIGGER_TOKEN", "glptt-trigger"),
            ("PROJECT_ID", "42"),
            ("TRIGGERED_REF", "main"),
            ("SCHEDULE", "False"),
            ("CANCEL_OUTDATED_PIPELINES", "TRUE"),
        ])
    }

    #[test]
    fn test_boolean_literals() {
        for value in ["true", "True", "TRUE"] {
            assert_eq!(parse_bool_input(value), Some(true), "{value}");
        }
        for value in ["false", "False", "FALSE"] {
            assert_eq!(parse_bool_input(value), Some(false), "{value}");
        }
        for value in ["tRUE", "yes", "1", "0", "", " true", "falsE"] {
            assert_eq!(parse_bool_input(value), None, "{value}");
        }
    }

    #[test]
    fn test_boolean_env_rejects_other_literals() {
        let env = env(&[("SCHEDULE", "yes")]);
        let err = get_boolean_env(&env, "SCHEDULE").unwrap_err();

        assert!(matches!(err, GlPipeError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Input could not be converted to boolean value: SCHEDULE"
        );
    }

    #[test]
    fn test_input_config_from_env() {
        let config = InputConfig::from_env(&full_env()).unwrap();

        assert_eq!(config.api_url, "https://gitlab.example.com/api/v4");
        assert_eq!(config.access_token.as_str(), "glpat-access");
        assert_eq!(config.trigger_token.as_str(), "glptt-trigger");
        assert_eq!(config.project_id, "42");
        assert_eq!(config.triggered_ref, "main");
        assert!(!config.schedule);
        assert!(config.cancel_outdated_pipelines);
    }

    #[test]
    fn test_missing_or_empty_input_is_config_error() {
        let mut env = full_env();
        env.remove("TRIGGER_TOKEN");
        let err = InputConfig::from_env(&env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Environment variable expected, but not supplied: TRIGGER_TOKEN"
        );

        let mut env = full_env();
        env.insert("PROJECT_ID".to_string(), String::new());
        let err = InputConfig::from_env(&env).unwrap_err();
        assert!(matches!(err, GlPipeError::Config(msg) if msg.ends_with("PROJECT_ID")));
    }

    fn context(event: TriggerEvent, payload: EventPayload) -> GithubContext {
        GithubContext {
            event,
            sha: "push-sha".to_string(),
            ref_name: "feature/x".to_string(),
            ref_type: "branch".to_string(),
            repo: "widgets".to_string(),
            payload,
        }
    }

    #[test]
    fn test_pull_request_uses_head_sha() {
        let payload: EventPayload =
            serde_json::from_str(r#"{"pull_request": {"head": {"sha": "deadbeef"}}}"#).unwrap();

        for event in [TriggerEvent::PullRequest, TriggerEvent::PullRequestTarget] {
            let config = GithubConfig::from_context(&context(event, payload.clone())).unwrap();
            assert_eq!(config.sha, "deadbeef");
            assert_eq!(config.ref_name, "feature/x");
            assert_eq!(config.ref_type, "branch");
            assert_eq!(config.repo, "widgets");
        }
    }

    #[test]
    fn test_push_like_events_keep_sha() {
        let payload: EventPayload =
            serde_json::from_str(r#"{"pull_request": {"head": {"sha": "deadbeef"}}}"#).unwrap();

        for event in [
            TriggerEvent::Push,
            TriggerEvent::Schedule,
            TriggerEvent::MergeGroup,
        ] {
            let config = GithubConfig::from_context(&context(event, payload.clone())).unwrap();
            assert_eq!(config.sha, "push-sha");
        }
    }

    #[test]
    fn test_pull_request_without_head_sha_fails() {
        let err = GithubConfig::from_context(&context(
            TriggerEvent::PullRequest,
            EventPayload::default(),
        ))
        .unwrap_err();

        assert!(matches!(err, GlPipeError::Config(_)));
    }
}
