use crate::model::RepositoryRef;
use async_trait::async_trait;
use color_eyre::eyre::Result;

/// Backend operations. Each call returns the raw GraphQL response body;
/// decoding lives in [`crate::dagster::parser`].
#[async_trait]
pub trait DagsterExecutor: Send + Sync {
    async fn fetch_repositories(&self) -> Result<String>;
    async fn fetch_jobs(&self, repository: &RepositoryRef) -> Result<String>;
    async fn fetch_runs(&self, repository: &RepositoryRef, job: &str, limit: usize) -> Result<String>;
    async fn launch_run(&self, repository: &RepositoryRef, job: &str, run_config: &str) -> Result<String>;
    async fn terminate_run(&self, run_id: &str) -> Result<String>;
    fn open_in_browser(&self, url: &str) -> Result<()>;
}
