//! Session cache of repositories, jobs and runs fetched from the Dagster backend.
//!
//! The cache only ever grows within a session: repositories are keyed by location,
//! jobs are merged additively by name, and a job's runs are replaced wholesale each
//! time they are re-fetched.

use chrono::{DateTime, Local, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Format a duration in seconds into a human-readable string (e.g. "2m 5s").
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Convert backend timestamps (fractional seconds since the epoch) to UTC.
pub fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole, nanos)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Queued,
    NotStarted,
    Managed,
    Starting,
    Started,
    Success,
    Failure,
    Canceling,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "QUEUED",
            RunStatus::NotStarted => "NOT_STARTED",
            RunStatus::Managed => "MANAGED",
            RunStatus::Starting => "STARTING",
            RunStatus::Started => "STARTED",
            RunStatus::Success => "SUCCESS",
            RunStatus::Failure => "FAILURE",
            RunStatus::Canceling => "CANCELING",
            RunStatus::Canceled => "CANCELED",
            RunStatus::Unknown => "UNKNOWN",
        }
    }

    /// Runs that may still change state; their Run Info duration keeps counting.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            RunStatus::Queued
                | RunStatus::NotStarted
                | RunStatus::Managed
                | RunStatus::Starting
                | RunStatus::Started
                | RunStatus::Canceling
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses a repository on the backend. `location` is unique, `name` is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub name: String,
    pub location: String,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RepositoryEntry {
    pub name: String,
    pub location: String,
    /// `None` = not yet fetched, `Some(map)` = fetched (possibly empty).
    pub jobs: Option<BTreeMap<String, JobEntry>>,
}

impl RepositoryEntry {
    pub fn reference(&self) -> RepositoryRef {
        RepositoryRef::new(self.name.clone(), self.location.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobEntry {
    pub name: String,
    pub id: String,
    pub description: String,
    pub default_run_config: String,
    pub runs: Vec<RunEntry>,
}

impl JobEntry {
    pub fn new(name: impl Into<String>, id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            description: description.into(),
            default_run_config: String::new(),
            runs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunEntry {
    pub run_id: String,
    pub status: RunStatus,
    /// Seconds since the epoch; `None` while the run is queued.
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default, rename = "runConfigYaml")]
    pub run_config: String,
}

impl RunEntry {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.and_then(epoch_to_utc)
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.end_time.and_then(epoch_to_utc)
    }

    /// Elapsed time; counts up to now while the run has no end time.
    pub fn duration(&self) -> String {
        match (self.started_at(), self.ended_at()) {
            (Some(start), Some(end)) => format_duration(end.signed_duration_since(start).num_seconds()),
            (Some(start), None) => format_duration(Utc::now().signed_duration_since(start).num_seconds()),
            _ => "-".to_string(),
        }
    }

    /// Start, End, Duration and Status rows for the run info pane.
    pub fn summary(&self) -> Vec<(String, String)> {
        let local = |t: Option<DateTime<Utc>>| {
            t.map_or_else(
                || "-".to_string(),
                |t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            )
        };
        vec![
            ("Start".into(), local(self.started_at())),
            ("End".into(), local(self.ended_at())),
            ("Duration".into(), self.duration()),
            ("Status".into(), self.status.to_string()),
        ]
    }
}

/// Result of fetching a job's recent runs.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRuns {
    pub job_name: String,
    /// First preset's run config, if the backend returned a non-empty one.
    pub preset_run_config: Option<String>,
    pub runs: Vec<RunEntry>,
}

/// Root of the cache. One per session.
#[derive(Debug, Clone)]
pub struct Overview {
    pub backend_url: String,
    repositories: BTreeMap<String, RepositoryEntry>,
}

impl Overview {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            repositories: BTreeMap::new(),
        }
    }

    /// Register repositories by location. Known locations keep their cached jobs.
    pub fn add_repositories(&mut self, repos: Vec<RepositoryRef>) {
        for repo in repos {
            self.repositories
                .entry(repo.location.clone())
                .and_modify(|entry| entry.name.clone_from(&repo.name))
                .or_insert_with(|| RepositoryEntry {
                    name: repo.name,
                    location: repo.location,
                    jobs: None,
                });
        }
    }

    /// All known repositories, ordered by location.
    pub fn repository_refs(&self) -> Vec<RepositoryRef> {
        self.repositories.values().map(RepositoryEntry::reference).collect()
    }

    /// True when the repository is known but its jobs were never fetched.
    pub fn needs_jobs(&self, location: &str) -> bool {
        self.repositories
            .get(location)
            .is_some_and(|r| r.jobs.is_none())
    }

    /// Add jobs to a repository. Existing entries (and their runs) are never replaced.
    /// Returns `false` for an unknown location.
    pub fn merge_jobs(&mut self, location: &str, jobs: Vec<JobEntry>) -> bool {
        let Some(repo) = self.repositories.get_mut(location) else {
            return false;
        };
        let map = repo.jobs.get_or_insert_with(BTreeMap::new);
        for job in jobs {
            map.entry(job.name.clone()).or_insert(job);
        }
        true
    }

    /// Job names in a repository, ordered by name.
    pub fn job_names(&self, location: &str) -> Vec<String> {
        self.repositories
            .get(location)
            .and_then(|r| r.jobs.as_ref())
            .map(|jobs| jobs.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn job(&self, location: &str, job: &str) -> Option<&JobEntry> {
        self.repositories.get(location)?.jobs.as_ref()?.get(job)
    }

    /// Replace a job's runs with a fresh fetch. The default config is only
    /// overwritten when the fetch carried a non-empty preset.
    /// Returns `false` for an unknown location.
    pub fn replace_runs(&mut self, location: &str, fetched: JobRuns) -> bool {
        let Some(repo) = self.repositories.get_mut(location) else {
            return false;
        };
        let job = repo
            .jobs
            .get_or_insert_with(BTreeMap::new)
            .entry(fetched.job_name.clone())
            .or_insert_with(|| JobEntry::new(fetched.job_name.clone(), "", ""));
        if let Some(config) = fetched.preset_run_config.filter(|c| !c.trim().is_empty()) {
            job.default_run_config = config;
        }
        job.runs = fetched.runs;
        true
    }

    pub fn runs(&self, location: &str, job: &str) -> &[RunEntry] {
        self.job(location, job).map_or(&[], |j| j.runs.as_slice())
    }
}
