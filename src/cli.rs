use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn};
use std::fmt::Display;

use crate::auth::Token;
use crate::config::{parse_bool_input, EnvSource, GithubConfig, InputConfig, ProcessEnv};
use crate::output::actions;
use crate::providers::github::GithubContext;
use crate::providers::gitlab::PipelineOrchestrator;

#[derive(Parser)]
#[command(name = "glpipe")]
#[command(author, version, about = "Trigger GitLab pipelines from GitHub Actions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as a GitHub Actions step, reading inputs and event context from the environment
    Run,

    /// Run outside of GitHub Actions with explicit values
    ///
    /// Nothing is read from the environment; unset flags stay empty.
    Local {
        #[arg(long, default_value = "")]
        api_url: String,

        #[arg(long, default_value = "")]
        access_token: String,

        #[arg(long, default_value = "")]
        trigger_token: String,

        #[arg(short = 'P', long, default_value = "")]
        project_id: String,

        #[arg(long, default_value = "")]
        triggered_ref: String,

        #[arg(long, default_value_t = false, action = ArgAction::Set, value_parser = parse_bool_arg)]
        schedule: bool,

        #[arg(long, default_value_t = true, action = ArgAction::Set, value_parser = parse_bool_arg)]
        cancel_outdated_pipelines: bool,

        #[arg(long, default_value = "")]
        ref_name: String,

        #[arg(long, default_value = "")]
        ref_type: String,

        #[arg(long, default_value = "")]
        repo: String,

        #[arg(long, default_value = "")]
        sha: String,
    },
}

fn parse_bool_arg(value: &str) -> std::result::Result<bool, String> {
    parse_bool_input(value).ok_or_else(|| format!("expected true or false, got '{value}'"))
}

/// Reports the triggered pipeline to the workflow.
///
/// The pipeline already exists at this point, so a failure to write the step
/// output is only a warning and does not fail the run.
fn publish_pipeline_id(env: &impl EnvSource, pipeline_id: impl Display) {
    let pipeline_id = pipeline_id.to_string();
    actions::notice(&pipeline_id);

    match actions::set_output(env, "pipeline-id", &pipeline_id) {
        Ok(true) => info!("Pipeline id written to step outputs"),
        Ok(false) => {}
        Err(e) => warn!("Could not write pipeline id to step outputs: {e}"),
    }
}

impl Cli {
    async fn execute_run(&self) -> Result<()> {
        let env = ProcessEnv;

        let input = InputConfig::from_env(&env)?;
        let context = GithubContext::from_env(&env)?;
        info!(
            "Triggered by {} on {} {} of {}",
            context.event, context.ref_type, context.ref_name, context.repo
        );
        let github = GithubConfig::from_context(&context)?;

        info!(
            "Triggering pipeline for project {} on {}",
            input.project_id, input.triggered_ref
        );
        let pipeline_id = PipelineOrchestrator::new(input, github)?.execute().await?;

        publish_pipeline_id(&env, pipeline_id);

        Ok(())
    }

    async fn execute_local(&self, input: InputConfig, github: GithubConfig) -> Result<()> {
        info!("Running locally against: {}", input.api_url);

        let pipeline_id = PipelineOrchestrator::new(input, github)?.execute().await?;
        println!("{pipeline_id}");

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Run => self.execute_run().await,
            Commands::Local {
                api_url,
                access_token,
                trigger_token,
                project_id,
                triggered_ref,
                schedule,
                cancel_outdated_pipelines,
                ref_name,
                ref_type,
                repo,
                sha,
            } => {
                let input = InputConfig {
                    api_url: api_url.clone(),
                    access_token: Token::from(access_token.as_str()),
                    trigger_token: Token::from(trigger_token.as_str()),
                    project_id: project_id.clone(),
                    triggered_ref: triggered_ref.clone(),
                    schedule: *schedule,
                    cancel_outdated_pipelines: *cancel_outdated_pipelines,
                };
                let github = GithubConfig {
                    ref_name: ref_name.clone(),
                    ref_type: ref_type.clone(),
                    repo: repo.clone(),
                    sha: sha.clone(),
                };
                self.execute_local(input, github).await
            }
        }
    }
}
