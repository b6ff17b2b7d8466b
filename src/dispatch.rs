//! Runs backend requests off the UI loop and routes results back through the event channel.
//!
//! Each request occupies a [`Slot`]. A second identical request while the first is
//! still running is skipped; a different request for the same read slot aborts the
//! old one. Mutations are never aborted. Every started request gets a [`Ticket`] that
//! travels with its result, so a late result never releases the slot of its successor.

use crate::dagster::parser::{self, JobsOutcome, LaunchOutcome, RunsOutcome, TerminateOutcome};
use crate::dagster::DagsterExecutor;
use crate::events::AppEvent;
use crate::model::RepositoryRef;
use color_eyre::eyre::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Repositories,
    Jobs {
        repository: RepositoryRef,
    },
    Runs {
        repository: RepositoryRef,
        job: String,
    },
    Launch {
        repository: RepositoryRef,
        job: String,
        run_config: String,
    },
    Terminate {
        repository: RepositoryRef,
        job: String,
        run_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Repositories,
    Jobs,
    Runs,
    Launch,
    Terminate,
}

impl Slot {
    fn is_mutation(self) -> bool {
        matches!(self, Slot::Launch | Slot::Terminate)
    }
}

impl Request {
    pub fn slot(&self) -> Slot {
        match self {
            Request::Repositories => Slot::Repositories,
            Request::Jobs { .. } => Slot::Jobs,
            Request::Runs { .. } => Slot::Runs,
            Request::Launch { .. } => Slot::Launch,
            Request::Terminate { .. } => Slot::Terminate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Request::Repositories => "fetch_repositories",
            Request::Jobs { .. } => "fetch_jobs",
            Request::Runs { .. } => "fetch_runs",
            Request::Launch { .. } => "launch_run",
            Request::Terminate { .. } => "terminate_run",
        }
    }
}

/// Decoded backend response, tagged with the target it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResult {
    Repositories(Vec<RepositoryRef>),
    Jobs {
        repository: RepositoryRef,
        outcome: JobsOutcome,
    },
    Runs {
        repository: RepositoryRef,
        job: String,
        outcome: RunsOutcome,
    },
    Launched {
        repository: RepositoryRef,
        job: String,
        outcome: LaunchOutcome,
    },
    Terminated {
        repository: RepositoryRef,
        job: String,
        run_id: String,
        outcome: TerminateOutcome,
    },
}

/// Perform one request against the executor and decode the response.
pub async fn execute(executor: &dyn DagsterExecutor, request: Request, runs_limit: usize) -> Result<BackendResult> {
    Ok(match request {
        Request::Repositories => {
            let json = executor.fetch_repositories().await?;
            BackendResult::Repositories(parser::parse_repositories(&json)?)
        }
        Request::Jobs { repository } => {
            let json = executor.fetch_jobs(&repository).await?;
            BackendResult::Jobs {
                outcome: parser::parse_jobs(&json)?,
                repository,
            }
        }
        Request::Runs { repository, job } => {
            let json = executor.fetch_runs(&repository, &job, runs_limit).await?;
            BackendResult::Runs {
                outcome: parser::parse_runs(&json, &job)?,
                repository,
                job,
            }
        }
        Request::Launch {
            repository,
            job,
            run_config,
        } => {
            let json = executor.launch_run(&repository, &job, &run_config).await?;
            BackendResult::Launched {
                outcome: parser::parse_launch(&json)?,
                repository,
                job,
            }
        }
        Request::Terminate {
            repository,
            job,
            run_id,
        } => {
            let json = executor.terminate_run(&run_id).await?;
            BackendResult::Terminated {
                outcome: parser::parse_terminate(&json)?,
                repository,
                job,
                run_id,
            }
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Started,
    /// The same request is already running.
    Skipped,
    /// An older request for the same slot was aborted.
    Replaced,
    /// A mutation is still running in this slot.
    Busy,
}

/// Identifies one started request. Returned with its result in `AppEvent::Backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    slot: Slot,
    id: u64,
}

struct InFlight {
    ticket: Ticket,
    request: Request,
    handle: AbortHandle,
}

pub struct Dispatcher {
    executor: Arc<dyn DagsterExecutor>,
    tx: UnboundedSender<AppEvent>,
    runs_limit: usize,
    in_flight: HashMap<Slot, InFlight>,
    next_id: u64,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn DagsterExecutor>, tx: UnboundedSender<AppEvent>, runs_limit: usize) -> Self {
        Self {
            executor,
            tx,
            runs_limit,
            in_flight: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn executor(&self) -> &dyn DagsterExecutor {
        &*self.executor
    }

    pub fn submit(&mut self, request: Request) -> Submitted {
        self.start(request, false)
    }

    /// Like [`submit`](Self::submit), but an identical read already in flight is
    /// restarted. Used for refreshes after a mutation, whose in-flight read predates it.
    pub fn refresh(&mut self, request: Request) -> Submitted {
        self.start(request, true)
    }

    fn start(&mut self, request: Request, restart: bool) -> Submitted {
        let slot = request.slot();
        let mut outcome = Submitted::Started;
        if let Some(running) = self.in_flight.get(&slot) {
            if !running.handle.is_finished() {
                if slot.is_mutation() {
                    if running.request == request {
                        return Submitted::Skipped;
                    }
                    return Submitted::Busy;
                }
                if running.request == request && !restart {
                    tracing::debug!(request = request.label(), "identical request in flight, skipped");
                    return Submitted::Skipped;
                }
                running.handle.abort();
                tracing::debug!(request = request.label(), "superseded request aborted");
                outcome = Submitted::Replaced;
            }
        }

        self.next_id += 1;
        let ticket = Ticket { slot, id: self.next_id };
        let label = request.label();
        let executor = self.executor.clone();
        let tx = self.tx.clone();
        let runs_limit = self.runs_limit;
        let task = request.clone();
        let handle = spawn_monitored(self.tx.clone(), label, async move {
            let event = match execute(&*executor, task, runs_limit).await {
                Ok(result) => AppEvent::Backend { ticket, result },
                Err(e) => AppEvent::Fatal(format!("{e:#}")),
            };
            if tx.send(event).is_err() {
                tracing::warn!("{label}: channel closed");
            }
        });
        self.in_flight.insert(slot, InFlight { ticket, request, handle });
        outcome
    }

    /// Release the slot a result arrived for, unless a newer request has taken it since.
    pub fn finish(&mut self, ticket: Ticket) {
        if self
            .in_flight
            .get(&ticket.slot)
            .is_some_and(|f| f.ticket == ticket)
        {
            self.in_flight.remove(&ticket.slot);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.values().any(|f| !f.handle.is_finished())
    }
}

/// Spawn a request task; a panic inside it is reported as an error toast.
/// Returns a handle that aborts the request itself.
fn spawn_monitored(
    tx: UnboundedSender<AppEvent>,
    label: &'static str,
    fut: impl Future<Output = ()> + Send + 'static,
) -> AbortHandle {
    let handle = tokio::spawn(fut);
    let abort = handle.abort_handle();
    tokio::spawn(async move {
        match handle.await {
            Ok(()) => {}
            Err(join_err) if join_err.is_cancelled() => {
                tracing::debug!("{label} cancelled");
            }
            Err(join_err) => {
                let payload = join_err.into_panic();
                let msg = payload
                    .downcast_ref::<String>()
                    .cloned()
                    .or_else(|| payload.downcast_ref::<&str>().map(ToString::to_string))
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!("{label} panicked: {msg}");
                if tx
                    .send(AppEvent::Error(format!("{label} crashed: {msg}")))
                    .is_err()
                {
                    tracing::warn!("{label}: channel closed while reporting panic");
                }
            }
        }
    });
    abort
}
