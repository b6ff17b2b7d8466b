//! Decoding of GraphQL responses into typed outcomes.
//!
//! Transport-level problems (malformed JSON, a top-level `errors` array, a
//! missing `data` object) are returned as `Err` and end the session.
//! Typed error variants the backend reports inside `data` (unknown job,
//! invalid run config, failed termination) come back as `Ok` outcomes so the
//! UI can show them and carry on.

use crate::model::{JobEntry, JobRuns, RepositoryRef, RunEntry};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub enum JobsOutcome {
    Found(Vec<JobEntry>),
    /// `RepositoryNotFoundError`, `PythonError` or any other error variant.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunsOutcome {
    Found(JobRuns),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LaunchOutcome {
    Launched { run_id: String },
    Rejected(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TerminateOutcome {
    Terminated,
    NotFound,
    Failed(String),
}

impl TerminateOutcome {
    pub fn message(&self, run_id: &str) -> String {
        match self {
            TerminateOutcome::Terminated => format!("Run {run_id} terminated"),
            TerminateOutcome::NotFound => format!("Run {run_id} not found"),
            TerminateOutcome::Failed(msg) => format!("Failed to terminate run {run_id}: {msg}"),
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    let envelope: Envelope<T> =
        serde_json::from_str(json).wrap_err("Failed to decode GraphQL response")?;
    if !envelope.errors.is_empty() {
        let messages: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(eyre!("GraphQL error: {}", messages.join("; ")));
    }
    envelope
        .data
        .ok_or_else(|| eyre!("GraphQL response contained no data"))
}

fn union_message(typename: &str, message: Option<String>) -> String {
    message.unwrap_or_else(|| format!("Unexpected {typename} response"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoriesData {
    repositories_or_error: RepositoriesOrError,
}

#[derive(Deserialize)]
struct RepositoriesOrError {
    #[serde(rename = "__typename")]
    typename: String,
    nodes: Option<Vec<RepositoryNode>>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct RepositoryNode {
    name: String,
    location: LocationNode,
}

#[derive(Deserialize)]
struct LocationNode {
    name: String,
}

pub fn parse_repositories(json: &str) -> Result<Vec<RepositoryRef>> {
    let data: RepositoriesData = decode(json)?;
    let result = data.repositories_or_error;
    match (result.typename.as_str(), result.nodes) {
        ("RepositoryConnection", Some(nodes)) => Ok(nodes
            .into_iter()
            .map(|n| RepositoryRef::new(n.name, n.location.name))
            .collect()),
        (typename, _) => Err(eyre!(
            "Failed to list repositories: {}",
            union_message(typename, result.message)
        )),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobsData {
    repository_or_error: RepositoryOrError,
}

#[derive(Deserialize)]
struct RepositoryOrError {
    #[serde(rename = "__typename")]
    typename: String,
    jobs: Option<Vec<JobNode>>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct JobNode {
    name: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    description: Option<String>,
}

pub fn parse_jobs(json: &str) -> Result<JobsOutcome> {
    let data: JobsData = decode(json)?;
    let result = data.repository_or_error;
    match (result.typename.as_str(), result.jobs) {
        ("Repository", Some(jobs)) => Ok(JobsOutcome::Found(
            jobs.into_iter()
                .map(|j| JobEntry::new(j.name, j.id, j.description.unwrap_or_default()))
                .collect(),
        )),
        (typename, _) => Ok(JobsOutcome::Failed(union_message(typename, result.message))),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunsData {
    pipeline_or_error: PipelineOrError,
}

#[derive(Deserialize)]
struct PipelineOrError {
    #[serde(rename = "__typename")]
    typename: String,
    name: Option<String>,
    #[serde(default)]
    presets: Vec<PresetNode>,
    runs: Option<Vec<RunEntry>>,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetNode {
    #[serde(default)]
    run_config_yaml: String,
}

/// `job` is the requested name; used when the response omits it.
pub fn parse_runs(json: &str, job: &str) -> Result<RunsOutcome> {
    let data: RunsData = decode(json)?;
    let result = data.pipeline_or_error;
    match (result.typename.as_str(), result.runs) {
        ("Pipeline" | "Job", Some(runs)) => {
            let preset_run_config = result
                .presets
                .into_iter()
                .map(|p| p.run_config_yaml)
                .find(|c| !c.trim().is_empty());
            Ok(RunsOutcome::Found(JobRuns {
                job_name: result.name.unwrap_or_else(|| job.to_string()),
                preset_run_config,
                runs,
            }))
        }
        (typename, _) => Ok(RunsOutcome::Failed(union_message(typename, result.message))),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchData {
    launch_run: LaunchRunResult,
}

#[derive(Deserialize)]
struct LaunchRunResult {
    #[serde(rename = "__typename")]
    typename: String,
    run: Option<RunIdNode>,
    #[serde(default)]
    errors: Vec<ValidationError>,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunIdNode {
    run_id: String,
}

#[derive(Deserialize)]
struct ValidationError {
    message: String,
    #[serde(default)]
    reason: Option<String>,
}

/// Every non-success variant is a user-facing rejection, never fatal.
pub fn parse_launch(json: &str) -> Result<LaunchOutcome> {
    let data: LaunchData = decode(json)?;
    let result = data.launch_run;
    match (result.typename.as_str(), result.run) {
        ("LaunchRunSuccess", Some(run)) => Ok(LaunchOutcome::Launched { run_id: run.run_id }),
        ("RunConfigValidationInvalid", _) => Ok(LaunchOutcome::Rejected(
            result
                .errors
                .into_iter()
                .map(|e| match e.reason {
                    Some(reason) => format!("{reason}: {}", e.message),
                    None => e.message,
                })
                .collect(),
        )),
        (typename, _) => Ok(LaunchOutcome::Rejected(vec![union_message(
            typename,
            result.message,
        )])),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TerminateData {
    terminate_run: TerminateRunResult,
}

#[derive(Deserialize)]
struct TerminateRunResult {
    #[serde(rename = "__typename")]
    typename: String,
    message: Option<String>,
}

pub fn parse_terminate(json: &str) -> Result<TerminateOutcome> {
    let data: TerminateData = decode(json)?;
    let result = data.terminate_run;
    Ok(match result.typename.as_str() {
        "TerminateRunSuccess" => TerminateOutcome::Terminated,
        "RunNotFoundError" => TerminateOutcome::NotFound,
        typename => TerminateOutcome::Failed(union_message(typename, result.message)),
    })
}
