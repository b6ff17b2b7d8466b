use crate::dagster::traits::DagsterExecutor;
use crate::model::RepositoryRef;
use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result, WrapErr};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_LIMIT: usize = 200;

const REPOSITORIES_QUERY: &str = r"query RepositoriesQuery {
  repositoriesOrError {
    __typename
    ... on RepositoryConnection { nodes { name location { name } } }
    ... on Error { message }
  }
}";

const JOBS_QUERY: &str = r"query JobsQuery($repositoryLocationName: String!, $repositoryName: String!) {
  repositoryOrError(repositorySelector: {
    repositoryLocationName: $repositoryLocationName
    repositoryName: $repositoryName
  }) {
    __typename
    ... on Repository { jobs { name id description } }
    ... on Error { message }
  }
}";

const RUNS_QUERY: &str = r"query RunsQuery(
  $repositoryLocationName: String!
  $repositoryName: String!
  $pipelineName: String!
  $limit: Int!
) {
  pipelineOrError(params: {
    repositoryLocationName: $repositoryLocationName
    repositoryName: $repositoryName
    pipelineName: $pipelineName
  }) {
    __typename
    ... on Pipeline {
      id
      name
      presets { runConfigYaml }
      runs(limit: $limit) { runId status startTime endTime runConfigYaml }
    }
    ... on Error { message }
  }
}";

const LAUNCH_MUTATION: &str = r"mutation LaunchRunMutation(
  $repositoryLocationName: String!
  $repositoryName: String!
  $jobName: String!
  $runConfigData: RunConfigData!
) {
  launchRun(executionParams: {
    selector: {
      repositoryLocationName: $repositoryLocationName
      repositoryName: $repositoryName
      jobName: $jobName
    }
    runConfigData: $runConfigData
  }) {
    __typename
    ... on LaunchRunSuccess { run { runId } }
    ... on RunConfigValidationInvalid { errors { message reason } }
    ... on Error { message }
  }
}";

const TERMINATE_MUTATION: &str = r"mutation TerminateRunMutation($runId: String!) {
  terminateRun(runId: $runId) {
    __typename
    ... on TerminateRunSuccess { run { runId } }
    ... on RunNotFoundError { runId message }
    ... on Error { message }
  }
}";

/// Talks to `<backend>/graphql` over HTTP.
pub struct GraphqlExecutor {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlExecutor {
    pub fn new(backend_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: graphql_endpoint(backend_url),
        })
    }

    async fn post(&self, operation: &str, query: &str, variables: Value) -> Result<String> {
        let start = std::time::Instant::now();
        let body = json!({ "query": query, "variables": variables });
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    eyre!("{operation} timed out after {}s", REQUEST_TIMEOUT.as_secs())
                } else {
                    eyre!("{operation} request to {} failed: {e}", self.endpoint)
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| eyre!("Failed to read {operation} response: {e}"))?;

        if !status.is_success() {
            return Err(eyre!("{}", classify_http_error(status.as_u16(), &text)));
        }

        tracing::debug!(
            operation,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "graphql request completed"
        );
        Ok(text)
    }
}

pub fn graphql_endpoint(backend_url: &str) -> String {
    format!("{}/graphql", backend_url.trim_end_matches('/'))
}

fn repository_variables(repository: &RepositoryRef) -> Value {
    json!({
        "repositoryLocationName": repository.location,
        "repositoryName": repository.name,
    })
}

#[async_trait]
impl DagsterExecutor for GraphqlExecutor {
    async fn fetch_repositories(&self) -> Result<String> {
        self.post("RepositoriesQuery", REPOSITORIES_QUERY, json!({})).await
    }

    async fn fetch_jobs(&self, repository: &RepositoryRef) -> Result<String> {
        self.post("JobsQuery", JOBS_QUERY, repository_variables(repository))
            .await
    }

    async fn fetch_runs(&self, repository: &RepositoryRef, job: &str, limit: usize) -> Result<String> {
        let mut variables = repository_variables(repository);
        variables["pipelineName"] = json!(job);
        variables["limit"] = json!(limit);
        self.post("RunsQuery", RUNS_QUERY, variables).await
    }

    async fn launch_run(&self, repository: &RepositoryRef, job: &str, run_config: &str) -> Result<String> {
        let mut variables = repository_variables(repository);
        variables["jobName"] = json!(job);
        variables["runConfigData"] = json!(run_config);
        self.post("LaunchRunMutation", LAUNCH_MUTATION, variables)
            .await
    }

    async fn terminate_run(&self, run_id: &str) -> Result<String> {
        self.post(
            "TerminateRunMutation",
            TERMINATE_MUTATION,
            json!({ "runId": run_id }),
        )
        .await
    }

    fn open_in_browser(&self, url: &str) -> Result<()> {
        crate::dagster::browser::open_in_browser_impl(url)
    }
}

/// Turns a non-2xx response into a message for the user.
pub fn classify_http_error(status: u16, body: &str) -> String {
    match status {
        401 | 403 => format!("Not authorized by the Dagster server (HTTP {status})."),
        404 => "GraphQL endpoint not found (HTTP 404). Check the environment URL.".to_string(),
        _ => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("Dagster request failed with HTTP {status}")
            } else {
                let snippet: String = trimmed.chars().take(ERROR_BODY_LIMIT).collect();
                format!("Dagster request failed with HTTP {status}: {snippet}")
            }
        }
    }
}
