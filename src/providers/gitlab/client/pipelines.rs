use chrono::{DateTime, SecondsFormat, Utc};

use super::GitLabClient;
use crate::auth::Token;
use crate::error::Result;
use crate::providers::gitlab::types::{
    GitLabPipeline, PipelineId, PipelineVariable, PipelineVariables,
};

/// Largest page GitLab serves; only the first page is read.
pub const PAGE_SIZE: usize = 100;

impl GitLabClient {
    /// Running pipelines on `ref_` updated after `updated_after` (first page only).
    pub async fn fetch_running_pipelines(
        &self,
        project_id: &str,
        ref_: &str,
        updated_after: DateTime<Utc>,
    ) -> Result<Vec<GitLabPipeline>> {
        let mut url = self.project_url(project_id, &["pipelines"])?;
        url.query_pairs_mut()
            .append_pair("ref", ref_)
            .append_pair("status", "running")
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair(
                "updated_after",
                &updated_after.to_rfc3339_opts(SecondsFormat::Millis, true),
            );

        self.get(url).await
    }

    pub async fn fetch_pipeline_variables(
        &self,
        project_id: &str,
        pipeline_id: PipelineId,
    ) -> Result<PipelineVariables> {
        let url = self.project_url(
            project_id,
            &["pipelines", &pipeline_id.to_string(), "variables"],
        )?;

        let variables: Vec<PipelineVariable> = self.get(url).await?;
        Ok(variables.into_iter().collect())
    }

    pub async fn cancel_pipeline(&self, project_id: &str, pipeline_id: PipelineId) -> Result<()> {
        let url = self.project_url(
            project_id,
            &["pipelines", &pipeline_id.to_string(), "cancel"],
        )?;

        self.post_discard(url).await
    }

    /// Creates a pipeline through the trigger endpoint, passing `variables`
    /// as `variables[KEY]=VALUE` query parameters.
    pub async fn trigger_pipeline(
        &self,
        project_id: &str,
        trigger_token: &Token,
        ref_: &str,
        variables: &[(&str, &str)],
    ) -> Result<GitLabPipeline> {
        let mut url = self.project_url(project_id, &["trigger", "pipeline"])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("token", trigger_token.as_str())
                .append_pair("ref", ref_);
            for (key, value) in variables {
                query.append_pair(&format!("variables[{key}]"), value);
            }
        }

        self.post(url).await
    }
}
