use chrono::{Duration, Utc};
use futures::future::try_join_all;
use log::info;
use std::future::Future;

use crate::config::{GithubConfig, InputConfig};
use crate::error::Result;
use crate::output::PhaseProgress;

use super::client::GitLabClient;
use super::types::{
    PipelineId, PipelineVariables, GITHUB_REF_NAME, GITHUB_REF_TYPE, GITHUB_REPO,
    GITHUB_SCHEDULE, GITHUB_SHA,
};

/// Only pipelines updated this recently are considered outdated candidates.
const RUNNING_WINDOW_HOURS: i64 = 4;

/// Cancels outdated pipelines for the current GitHub ref and triggers a new one.
///
/// A pipeline is outdated when it is running on the configured GitLab ref and
/// was triggered for the same GitHub ref name and type as this run. Every step
/// is fail-fast: the first GitLab error aborts the run, and cancellations
/// already sent are not rolled back.
pub struct PipelineOrchestrator {
    client: GitLabClient,
    input: InputConfig,
    github: GithubConfig,
}

impl PipelineOrchestrator {
    /// # Errors
    ///
    /// Returns a `Config` error if `input.api_url` is not a usable base URL.
    pub fn new(input: InputConfig, github: GithubConfig) -> Result<Self> {
        let client = GitLabClient::new(&input.api_url, input.access_token.clone())?;

        Ok(Self {
            client,
            input,
            github,
        })
    }

    /// Ids of pipelines running on the triggered ref.
    ///
    /// Reads a single page of at most 100 pipelines updated within the last
    /// four hours; anything outside that window is never cancelled.
    pub async fn fetch_running_pipeline_ids(&self) -> Result<Vec<PipelineId>> {
        let updated_after = Utc::now() - Duration::hours(RUNNING_WINDOW_HOURS);

        let pipelines = self
            .client
            .fetch_running_pipelines(
                &self.input.project_id,
                &self.input.triggered_ref,
                updated_after,
            )
            .await?;

        Ok(pipelines.into_iter().map(|p| p.id).collect())
    }

    /// Keeps the pipelines that were triggered for the current GitHub ref.
    ///
    /// Variables are fetched concurrently; one failed fetch fails the whole step.
    pub async fn filter_by_github_ref(&self, ids: &[PipelineId]) -> Result<Vec<PipelineId>> {
        self.retain_matching(ids, |id| {
            self.client
                .fetch_pipeline_variables(&self.input.project_id, id)
        })
        .await
    }

    async fn retain_matching<F, Fut>(&self, ids: &[PipelineId], fetch: F) -> Result<Vec<PipelineId>>
    where
        F: Fn(PipelineId) -> Fut,
        Fut: Future<Output = Result<PipelineVariables>>,
    {
        // try_join_all yields results in input order, whatever order they complete in
        let variables = try_join_all(ids.iter().map(|id| fetch(*id))).await?;

        Ok(ids
            .iter()
            .zip(variables)
            .filter(|(_, variables)| self.matches_github_ref(variables))
            .map(|(id, _)| *id)
            .collect())
    }

    fn matches_github_ref(&self, variables: &PipelineVariables) -> bool {
        variables.get(GITHUB_REF_NAME) == Some(self.github.ref_name.as_str())
            && variables.get(GITHUB_REF_TYPE) == Some(self.github.ref_type.as_str())
    }

    /// Cancels all `ids` concurrently and waits for every request.
    pub async fn cancel_pipelines(&self, ids: &[PipelineId]) -> Result<()> {
        try_join_all(
            ids.iter()
                .map(|id| self.client.cancel_pipeline(&self.input.project_id, *id)),
        )
        .await?;
        Ok(())
    }

    /// Triggers a pipeline on the configured ref, forwarding the GitHub context
    /// as pipeline variables.
    pub async fn trigger_pipeline(&self) -> Result<PipelineId> {
        let schedule = self.input.schedule.to_string();
        let variables = [
            (GITHUB_REF_NAME, self.github.ref_name.as_str()),
            (GITHUB_REF_TYPE, self.github.ref_type.as_str()),
            (GITHUB_REPO, self.github.repo.as_str()),
            (GITHUB_SHA, self.github.sha.as_str()),
            (GITHUB_SCHEDULE, schedule.as_str()),
        ];

        let pipeline = self
            .client
            .trigger_pipeline(
                &self.input.project_id,
                &self.input.trigger_token,
                &self.input.triggered_ref,
                &variables,
            )
            .await?;

        Ok(pipeline.id)
    }

    /// Runs the whole workflow and returns the id of the new pipeline.
    pub async fn execute(&self) -> Result<PipelineId> {
        let cancel = self.input.cancel_outdated_pipelines;
        let mut progress = PhaseProgress::new(if cancel { 4 } else { 1 });

        if cancel {
            progress.start_phase("Fetching running pipelines");
            let running = self.fetch_running_pipeline_ids().await?;
            info!(
                "Found {} running pipelines on {}",
                running.len(),
                self.input.triggered_ref
            );
            progress.finish_phase("Fetched running pipelines");

            progress.start_phase("Matching pipelines to the GitHub ref");
            let outdated = self.filter_by_github_ref(&running).await?;
            info!(
                "{} pipelines were triggered for {} {}",
                outdated.len(),
                self.github.ref_type,
                self.github.ref_name
            );
            progress.finish_phase("Matched pipelines");

            progress.start_phase("Cancelling outdated pipelines");
            self.cancel_pipelines(&outdated).await?;
            if !outdated.is_empty() {
                let ids: Vec<String> = outdated.iter().map(ToString::to_string).collect();
                info!("Cancelled pipelines: {}", ids.join(", "));
            }
            progress.finish_phase("Cancelled outdated pipelines");
        }

        progress.start_phase("Triggering pipeline");
        let pipeline_id = self.trigger_pipeline().await?;
        info!(
            "Triggered pipeline {pipeline_id} on {}",
            self.input.triggered_ref
        );
        progress.finish_phase("Triggered pipeline");

        Ok(pipeline_id)
    }
}
