use crate::dagster::browser;
use crate::dagster::parser::{JobsOutcome, LaunchOutcome, RunsOutcome, TerminateOutcome};
use crate::dispatch::{BackendResult, Request};
use crate::editor::{LineInput, TextBuffer};
use crate::focus::{FocusController, Modal, Pane};
use crate::input::Action;
use crate::model::{Overview, RepositoryRef, RunEntry};
use crate::nav::ListPane;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Instant;

pub const NOTIFICATION_TTL_SECS: u64 = 5;
pub const ERROR_TTL_SECS: u64 = 10;
pub const SPINNER_FRAME_COUNT: usize = 10;
pub const NARROW_WIDTH_THRESHOLD: u16 = 80;
/// Wide enough for the longest status, `NOT_STARTED`.
const STATUS_COLUMN: usize = 11;

fn repository_label(repo: &RepositoryRef) -> String {
    repo.location.clone()
}

fn by_location(a: &RepositoryRef, b: &RepositoryRef) -> Ordering {
    a.location.cmp(&b.location)
}

pub fn run_label(run: &RunEntry) -> String {
    format!("{:<STATUS_COLUMN$} {}", run.status.as_str(), run.run_id)
}

/// Newest first; runs that have not started yet sort ahead of everything.
pub fn newest_first(a: &RunEntry, b: &RunEntry) -> Ordering {
    match (a.start_time, b.start_time) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.total_cmp(&x),
    }
}

/// Case-sensitive substring match on the repository's location.
pub fn matches_filter(repo: &RepositoryRef, term: &str) -> bool {
    repo.location.contains(term)
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub timestamp: Instant,
}

/// What the user has drilled into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub repository: Option<RepositoryRef>,
    pub job: Option<String>,
    pub run: Option<String>,
}

pub struct LaunchEditor {
    pub repository: RepositoryRef,
    pub job: String,
    pub buffer: TextBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
}

pub struct ConfirmOverlay {
    pub title: String,
    pub message: String,
    pub choice: ConfirmChoice,
    pub request: Request,
}

impl ConfirmOverlay {
    pub fn toggle(&mut self) {
        self.choice = match self.choice {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        };
    }
}

pub struct FeedbackOverlay {
    pub title: String,
    pub lines: Vec<String>,
}

/// Side effects the UI loop performs on behalf of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(Request),
    OpenUrl(String),
}

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub environment: String,
    pub backend_url: String,
    pub version_string: String,
}

pub struct AppState {
    pub config: AppConfig,
    pub overview: Overview,
    pub selection: Selection,
    pub focus: FocusController,

    // Panes
    pub repositories: ListPane<RepositoryRef>,
    pub jobs: ListPane<String>,
    pub runs: ListPane<RunEntry>,
    pub run_info: Vec<(String, String)>,
    pub repo_filter: LineInput,
    pub loading: HashSet<Pane>,

    // Modals
    pub editor: Option<LaunchEditor>,
    pub confirm: Option<ConfirmOverlay>,
    pub feedback: Option<FeedbackOverlay>,

    // Transient UI
    pub notifications: Vec<Notification>,
    pub error: Option<(String, Instant)>,
    pub spinner_frame: usize,
    pub busy: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(environment: String, backend_url: String) -> Self {
        Self {
            config: AppConfig {
                environment,
                backend_url: backend_url.clone(),
                version_string: String::new(),
            },
            overview: Overview::new(backend_url),
            selection: Selection::default(),
            focus: FocusController::new(),
            repositories: ListPane::new("Repositories", repository_label, by_location),
            jobs: ListPane::new("Jobs", String::clone, String::cmp),
            runs: ListPane::new("Runs", run_label, newest_first),
            run_info: Vec::new(),
            repo_filter: LineInput::default(),
            loading: HashSet::new(),
            editor: None,
            confirm: None,
            feedback: None,
            notifications: Vec::new(),
            error: None,
            spinner_frame: 0,
            busy: false,
            should_quit: false,
        }
    }

    /// The request issued at startup.
    pub fn load_repositories(&mut self) -> Request {
        self.loading.insert(Pane::Repositories);
        Request::Repositories
    }

    pub fn is_loading(&self, pane: Pane) -> bool {
        self.loading.contains(&pane)
    }

    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::FocusPrevious => self.focus.focus_previous(),
            Action::FocusNext => self.focus.focus_next(),
            Action::Select => return self.select_current().map(Effect::Request),
            Action::OpenHelp => self.focus.open_modal(Modal::KeyMapHelp),
            Action::OpenBrowser => return self.current_url().map(Effect::OpenUrl),
            Action::OpenFilter => self.open_filter(),
            Action::OpenLaunchEditor => self.open_launch_editor(),
            Action::TerminateWithConfirmation => return self.terminate_run(true).map(Effect::Request),
            Action::TerminateNow => return self.terminate_run(false).map(Effect::Request),
            Action::CloseModal => self.close_modal(),
            Action::EditorInsert(c) => self.edit(|b| b.insert_char(c)),
            Action::EditorIndent => self.edit(|b| {
                b.insert_char(' ');
                b.insert_char(' ');
            }),
            Action::EditorNewline => self.edit(TextBuffer::insert_newline),
            Action::EditorBackspace => self.edit(TextBuffer::backspace),
            Action::EditorDelete => self.edit(TextBuffer::delete),
            Action::EditorLeft => self.edit(TextBuffer::move_left),
            Action::EditorRight => self.edit(TextBuffer::move_right),
            Action::EditorUp => self.edit(TextBuffer::move_up),
            Action::EditorDown => self.edit(TextBuffer::move_down),
            Action::ToggleComment => self.edit(TextBuffer::toggle_comment),
            Action::SubmitLaunch => return self.launch_run().map(Effect::Request),
            Action::FilterInput(c) => {
                self.repo_filter.push(c);
                self.refilter();
            }
            Action::FilterBackspace => {
                self.repo_filter.backspace();
                self.refilter();
            }
            Action::ApplyFilter => {
                self.refilter();
                self.focus.dismiss(Modal::Filter);
            }
            Action::ConfirmToggle => {
                if let Some(confirm) = &mut self.confirm {
                    confirm.toggle();
                }
            }
            Action::ConfirmSubmit => return self.confirm_selected().map(Effect::Request),
            Action::ConfirmYes => {
                if let Some(confirm) = &mut self.confirm {
                    confirm.choice = ConfirmChoice::Yes;
                }
                return self.confirm_selected().map(Effect::Request);
            }
            Action::ConfirmNo => self.close_modal(),
        }
        None
    }

    pub fn apply_result(&mut self, result: BackendResult) -> Option<Request> {
        match result {
            BackendResult::Repositories(repos) => {
                self.apply_repositories(repos);
                None
            }
            BackendResult::Jobs { repository, outcome } => {
                self.apply_jobs(&repository, outcome);
                None
            }
            BackendResult::Runs {
                repository,
                job,
                outcome,
            } => {
                self.apply_runs(&repository, &job, outcome);
                None
            }
            BackendResult::Launched {
                repository,
                job,
                outcome,
            } => self.apply_launch(&repository, job, outcome),
            BackendResult::Terminated {
                repository,
                job,
                run_id,
                outcome,
            } => self.apply_terminate(&repository, job, &run_id, &outcome),
        }
    }

    // --- Navigation ---

    pub fn move_up(&mut self) {
        match self.focus.focused_pane() {
            Some(Pane::Repositories) => self.repositories.move_up(),
            Some(Pane::Jobs) => self.jobs.move_up(),
            Some(Pane::Runs) => {
                self.runs.move_up();
                self.update_run_info();
            }
            None => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.focus.focused_pane() {
            Some(Pane::Repositories) => self.repositories.move_down(),
            Some(Pane::Jobs) => self.jobs.move_down(),
            Some(Pane::Runs) => {
                self.runs.move_down();
                self.update_run_info();
            }
            None => {}
        }
    }

    pub fn set_viewport_heights(&mut self, repositories: usize, jobs: usize, runs: usize) {
        self.repositories.set_viewport_height(repositories);
        self.jobs.set_viewport_height(jobs);
        let before = self.runs.selected_index();
        self.runs.set_viewport_height(runs);
        if self.runs.selected_index() != before {
            self.update_run_info();
        }
    }

    fn select_current(&mut self) -> Option<Request> {
        match self.focus.focused_pane()? {
            Pane::Repositories => self.select_repository(),
            Pane::Jobs => self.select_job(),
            Pane::Runs => None,
        }
    }

    /// Recompute Run Info while the selected run is still going, so its duration keeps counting.
    pub fn refresh_live_run_info(&mut self) {
        if self
            .runs
            .selected()
            .is_some_and(|r| r.status.is_active() && r.end_time.is_none())
        {
            self.update_run_info();
        }
    }

    fn update_run_info(&mut self) {
        let run = self.runs.selected();
        self.selection.run = run.map(|r| r.run_id.clone());
        self.run_info = run.map(RunEntry::summary).unwrap_or_default();
    }

    // --- Drill-down ---

    pub fn apply_repositories(&mut self, repos: Vec<RepositoryRef>) {
        self.loading.remove(&Pane::Repositories);
        self.overview.add_repositories(repos);
        self.refilter();
    }

    /// Select the repository under the cursor. Returns a jobs request when they were never fetched.
    pub fn select_repository(&mut self) -> Option<Request> {
        let repository = self.repositories.selected()?.clone();
        self.select_repository_ref(repository)
    }

    pub fn select_repository_ref(&mut self, repository: RepositoryRef) -> Option<Request> {
        if self.selection.repository.as_ref() != Some(&repository) {
            self.selection.job = None;
            self.selection.run = None;
            self.runs.clear();
            self.runs.set_title("Runs");
            self.run_info.clear();
            self.loading.remove(&Pane::Runs);
        }
        self.selection.repository = Some(repository.clone());
        self.jobs.set_title(format!("{} - Jobs", repository.location));

        if self.overview.needs_jobs(&repository.location) {
            self.jobs.clear();
            self.loading.insert(Pane::Jobs);
            return Some(Request::Jobs { repository });
        }
        self.loading.remove(&Pane::Jobs);
        self.show_jobs(&repository.location);
        None
    }

    fn show_jobs(&mut self, location: &str) {
        self.jobs.render(self.overview.job_names(location));
        self.focus.focus(Pane::Jobs);
    }

    fn is_selected_repository(&self, repository: &RepositoryRef) -> bool {
        self.selection
            .repository
            .as_ref()
            .is_some_and(|r| r.location == repository.location)
    }

    fn is_selected_job(&self, repository: &RepositoryRef, job: &str) -> bool {
        self.is_selected_repository(repository) && self.selection.job.as_deref() == Some(job)
    }

    pub fn apply_jobs(&mut self, repository: &RepositoryRef, outcome: JobsOutcome) {
        let current = self.is_selected_repository(repository);
        match outcome {
            JobsOutcome::Found(jobs) => {
                self.overview.merge_jobs(&repository.location, jobs);
                if current {
                    self.loading.remove(&Pane::Jobs);
                    self.show_jobs(&repository.location);
                } else {
                    tracing::debug!(location = %repository.location, "jobs cached for unselected repository");
                }
            }
            JobsOutcome::Failed(message) => {
                if current {
                    self.loading.remove(&Pane::Jobs);
                    self.open_feedback(format!("Jobs of {}", repository.location), vec![message]);
                }
            }
        }
    }

    /// Select the job under the cursor. Always re-fetches its runs.
    pub fn select_job(&mut self) -> Option<Request> {
        let job = self.jobs.selected()?.clone();
        self.select_job_named(job)
    }

    pub fn select_job_named(&mut self, job: String) -> Option<Request> {
        let repository = self.selection.repository.clone()?;
        if self.selection.job.as_deref() != Some(job.as_str()) {
            self.selection.run = None;
        }
        self.selection.job = Some(job.clone());
        self.loading.insert(Pane::Runs);
        Some(Request::Runs { repository, job })
    }

    pub fn apply_runs(&mut self, repository: &RepositoryRef, job: &str, outcome: RunsOutcome) {
        let current = self.is_selected_job(repository, job);
        match outcome {
            RunsOutcome::Found(fetched) => {
                self.overview.replace_runs(&repository.location, fetched);
                if current {
                    self.loading.remove(&Pane::Runs);
                    self.show_runs(&repository.location, job);
                }
            }
            RunsOutcome::Failed(message) => {
                if current {
                    self.loading.remove(&Pane::Runs);
                    self.open_feedback(format!("Runs of {job}"), vec![message]);
                }
            }
        }
    }

    fn show_runs(&mut self, location: &str, job: &str) {
        self.runs.set_title(format!("{job} - Runs"));
        self.runs.render(self.overview.runs(location, job).to_vec());
        self.update_run_info();
        self.focus.focus(Pane::Runs);
    }

    // --- Launch ---

    pub fn open_launch_editor(&mut self) {
        let Some((repository, job, run_config)) = self.launch_target() else {
            return;
        };
        self.editor = Some(LaunchEditor {
            repository,
            job,
            buffer: TextBuffer::new(&run_config),
        });
        self.focus.open_modal(Modal::LaunchEditor);
    }

    /// Jobs pane: the job under the cursor and its default config.
    /// Runs pane: the selected job and the config of the run under the cursor.
    fn launch_target(&self) -> Option<(RepositoryRef, String, String)> {
        let repository = self.selection.repository.clone()?;
        match self.focus.focused_pane()? {
            Pane::Jobs => {
                let job = self.jobs.selected()?.clone();
                let config = self
                    .overview
                    .job(&repository.location, &job)
                    .map(|j| j.default_run_config.clone())
                    .unwrap_or_default();
                Some((repository, job, config))
            }
            Pane::Runs => {
                let job = self.selection.job.clone()?;
                let config = self.runs.selected()?.run_config.clone();
                Some((repository, job, config))
            }
            Pane::Repositories => None,
        }
    }

    pub fn launch_run(&mut self) -> Option<Request> {
        let editor = self.editor.as_ref()?;
        Some(Request::Launch {
            repository: editor.repository.clone(),
            job: editor.job.clone(),
            run_config: editor.buffer.text(),
        })
    }

    pub fn apply_launch(&mut self, repository: &RepositoryRef, job: String, outcome: LaunchOutcome) -> Option<Request> {
        match outcome {
            LaunchOutcome::Launched { run_id } => {
                tracing::info!(%run_id, job = %job, "run launched");
                self.editor = None;
                self.focus.dismiss(Modal::LaunchEditor);
                self.notify(format!("Launched run {run_id}"));
                if self.is_selected_repository(repository) {
                    return self.select_job_named(job);
                }
                None
            }
            LaunchOutcome::Rejected(errors) => {
                self.open_feedback(format!("Launch of {job} failed"), errors);
                None
            }
        }
    }

    // --- Terminate ---

    pub fn terminate_run(&mut self, with_confirmation: bool) -> Option<Request> {
        let run_id = self.runs.selected()?.run_id.clone();
        let repository = self.selection.repository.clone()?;
        let job = self.selection.job.clone()?;
        let request = Request::Terminate {
            repository,
            job,
            run_id: run_id.clone(),
        };
        if !with_confirmation {
            return Some(request);
        }
        self.confirm = Some(ConfirmOverlay {
            title: "Terminate run".to_string(),
            message: format!("Terminate run {run_id}?"),
            choice: ConfirmChoice::No,
            request,
        });
        self.focus.open_modal(Modal::Confirmation);
        None
    }

    /// Close the confirmation; the request goes out only when "Yes" is chosen.
    pub fn confirm_selected(&mut self) -> Option<Request> {
        let confirm = self.confirm.take()?;
        self.focus.dismiss(Modal::Confirmation);
        (confirm.choice == ConfirmChoice::Yes).then_some(confirm.request)
    }

    pub fn apply_terminate(
        &mut self,
        repository: &RepositoryRef,
        job: String,
        run_id: &str,
        outcome: &TerminateOutcome,
    ) -> Option<Request> {
        self.open_feedback("Terminate run".to_string(), vec![outcome.message(run_id)]);
        if self.is_selected_job(repository, &job) {
            return self.select_job_named(job);
        }
        None
    }

    // --- Filter ---

    pub fn open_filter(&mut self) {
        if self.focus.focused_pane() == Some(Pane::Repositories) {
            self.focus.open_modal(Modal::Filter);
        }
    }

    pub fn apply_filter(&mut self, term: &str) {
        self.repo_filter.set(term);
        self.refilter();
    }

    fn refilter(&mut self) {
        let term = self.repo_filter.as_str();
        let visible: Vec<_> = self
            .overview
            .repository_refs()
            .into_iter()
            .filter(|r| matches_filter(r, term))
            .collect();
        self.repositories.render(visible);
    }

    // --- Browser ---

    pub fn current_url(&self) -> Option<String> {
        let base = &self.overview.backend_url;
        match self.focus.focused_pane()? {
            Pane::Repositories => {
                let repo = self.repositories.selected()?;
                Some(browser::repository_url(base, &repo.name, &repo.location))
            }
            Pane::Jobs => {
                let repo = self.selection.repository.as_ref()?;
                let job = self.jobs.selected()?;
                Some(browser::job_url(base, &repo.name, &repo.location, job))
            }
            Pane::Runs => Some(browser::run_url(base, &self.runs.selected()?.run_id)),
        }
    }

    // --- Modals ---

    pub fn close_modal(&mut self) {
        match self.focus.close_modal() {
            Some(Modal::LaunchEditor) => self.editor = None,
            Some(Modal::Confirmation) => self.confirm = None,
            Some(Modal::Feedback) => self.feedback = None,
            Some(Modal::Filter | Modal::KeyMapHelp) | None => {}
        }
    }

    pub fn open_feedback(&mut self, title: String, lines: Vec<String>) {
        self.focus.dismiss(Modal::Feedback);
        self.feedback = Some(FeedbackOverlay { title, lines });
        self.focus.open_modal(Modal::Feedback);
    }

    fn edit(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        if let Some(editor) = &mut self.editor {
            f(&mut editor.buffer);
        }
    }

    // --- Transient UI ---

    pub fn notify(&mut self, message: String) {
        self.notifications.push(Notification {
            message,
            timestamp: Instant::now(),
        });
    }

    pub fn prune_notifications(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.timestamp).as_secs() < NOTIFICATION_TTL_SECS);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, Instant::now()));
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::Focus;
    use crate::model::{JobEntry, JobRuns, RunStatus};
    use pretty_assertions::assert_eq;

    fn run(id: &str, status: RunStatus, start: Option<f64>) -> RunEntry {
        RunEntry {
            run_id: id.to_string(),
            status,
            start_time: start,
            end_time: None,
            run_config: format!("ops:\n  {id}: {{}}"),
        }
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::new("r1", "loc1")
    }

    fn loaded_state() -> AppState {
        let mut s = AppState::new("default".into(), "https://dagster.example.com".into());
        s.set_viewport_heights(10, 10, 10);
        s.apply_repositories(vec![repo(), RepositoryRef::new("r1", "alpha")]);
        s
    }

    fn state_with_runs() -> AppState {
        let mut s = loaded_state();
        s.select_repository_ref(repo());
        s.apply_jobs(&repo(), JobsOutcome::Found(vec![JobEntry::new("job1", "1", "")]));
        s.select_job_named("job1".into());
        s.apply_runs(
            &repo(),
            "job1",
            RunsOutcome::Found(JobRuns {
                job_name: "job1".into(),
                preset_run_config: Some("ops: {}".into()),
                runs: vec![
                    run("old", RunStatus::Success, Some(100.0)),
                    run("new", RunStatus::Started, Some(200.0)),
                ],
            }),
        );
        s
    }

    #[test]
    fn run_label_pads_status() {
        assert_eq!(run_label(&run("abc", RunStatus::Success, None)), "SUCCESS     abc");
        assert_eq!(run_label(&run("abc", RunStatus::NotStarted, None)), "NOT_STARTED abc");
    }

    #[test]
    fn runs_sort_unstarted_then_newest() {
        let mut runs = vec![
            run("a", RunStatus::Success, Some(10.0)),
            run("q", RunStatus::Queued, None),
            run("b", RunStatus::Success, Some(30.0)),
        ];
        runs.sort_by(newest_first);
        let ids: Vec<_> = runs.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["q", "b", "a"]);
    }

    #[test]
    fn repositories_sorted_by_location() {
        let s = loaded_state();
        assert_eq!(s.repositories.labels(), &["alpha".to_string(), "loc1".to_string()]);
    }

    #[test]
    fn select_repository_requests_jobs_once() {
        let mut s = loaded_state();
        assert_eq!(
            s.select_repository_ref(repo()),
            Some(Request::Jobs { repository: repo() })
        );
        assert!(s.is_loading(Pane::Jobs));
        s.apply_jobs(&repo(), JobsOutcome::Found(Vec::new()));
        assert_eq!(s.select_repository_ref(repo()), None);
        assert!(s.focus.is_active(Pane::Jobs));
        assert_eq!(s.jobs.title(), "loc1 - Jobs");
    }

    #[test]
    fn changing_repository_clears_runs() {
        let mut s = state_with_runs();
        assert_eq!(s.runs.len(), 2);
        s.select_repository_ref(RepositoryRef::new("r1", "alpha"));
        assert!(s.runs.is_empty());
        assert!(s.run_info.is_empty());
        assert_eq!(s.selection.job, None);
        assert_eq!(s.selection.run, None);
    }

    #[test]
    fn running_duration_refreshes_on_tick() {
        let mut s = state_with_runs();
        assert_eq!(s.selection.run.as_deref(), Some("new"));
        s.run_info[2].1 = "stale".into();
        s.refresh_live_run_info();
        assert_ne!(s.run_info[2].1, "stale");

        s.move_down();
        assert_eq!(s.selection.run.as_deref(), Some("old"));
        s.run_info[2].1 = "stale".into();
        s.refresh_live_run_info();
        assert_eq!(s.run_info[2].1, "stale");
    }

    #[test]
    fn reselecting_same_repository_keeps_runs() {
        let mut s = state_with_runs();
        s.select_repository_ref(repo());
        assert_eq!(s.runs.len(), 2);
        assert_eq!(s.selection.job.as_deref(), Some("job1"));
    }

    #[test]
    fn stale_jobs_are_cached_not_shown() {
        let mut s = loaded_state();
        s.select_repository_ref(repo());
        let alpha = RepositoryRef::new("r1", "alpha");
        s.apply_jobs(&alpha, JobsOutcome::Found(vec![JobEntry::new("late", "", "")]));
        assert!(s.jobs.is_empty());
        assert_eq!(s.overview.job_names("alpha"), vec!["late"]);
    }

    #[test]
    fn runs_render_sorted_with_info() {
        let s = state_with_runs();
        assert!(s.focus.is_active(Pane::Runs));
        assert_eq!(s.runs.title(), "job1 - Runs");
        assert_eq!(s.runs.selected().map(|r| r.run_id.as_str()), Some("new"));
        assert_eq!(s.selection.run.as_deref(), Some("new"));
        assert_eq!(s.run_info[3], ("Status".to_string(), "STARTED".to_string()));
    }

    #[test]
    fn moving_in_runs_updates_info() {
        let mut s = state_with_runs();
        s.handle_action(Action::MoveDown);
        assert_eq!(s.selection.run.as_deref(), Some("old"));
        assert_eq!(s.run_info[3].1, "SUCCESS");
    }

    #[test]
    fn stale_runs_do_not_render() {
        let mut s = state_with_runs();
        s.apply_runs(
            &repo(),
            "other",
            RunsOutcome::Found(JobRuns {
                job_name: "other".into(),
                preset_run_config: None,
                runs: vec![run("x", RunStatus::Queued, None)],
            }),
        );
        assert_eq!(s.runs.len(), 2);
        assert_eq!(s.overview.runs("loc1", "other").len(), 1);
    }

    #[test]
    fn select_job_without_repository_is_noop() {
        let mut s = loaded_state();
        assert_eq!(s.select_job_named("job1".into()), None);
        assert_eq!(s.select_job(), None);
    }

    #[test]
    fn enter_on_empty_pane_is_noop() {
        let mut s = AppState::new("default".into(), "http://localhost:3000".into());
        assert_eq!(s.handle_action(Action::Select), None);
        s.focus.focus(Pane::Jobs);
        assert_eq!(s.handle_action(Action::Select), None);
        s.focus.focus(Pane::Runs);
        assert_eq!(s.handle_action(Action::TerminateNow), None);
        assert_eq!(s.handle_action(Action::OpenBrowser), None);
    }

    #[test]
    fn launch_editor_from_jobs_uses_default_config() {
        let mut s = state_with_runs();
        s.focus.focus(Pane::Jobs);
        s.handle_action(Action::OpenLaunchEditor);
        assert_eq!(s.focus.current(), Focus::Modal(Modal::LaunchEditor));
        assert_eq!(s.editor.as_ref().unwrap().buffer.text(), "ops: {}");
    }

    #[test]
    fn launch_editor_from_runs_uses_run_config() {
        let mut s = state_with_runs();
        s.handle_action(Action::OpenLaunchEditor);
        let editor = s.editor.as_ref().unwrap();
        assert_eq!(editor.job, "job1");
        assert_eq!(editor.buffer.text(), "ops:\n  new: {}");
    }

    #[test]
    fn submit_launch_sends_edited_text() {
        let mut s = state_with_runs();
        s.handle_action(Action::OpenLaunchEditor);
        s.handle_action(Action::ToggleComment);
        let effect = s.handle_action(Action::SubmitLaunch);
        assert_eq!(
            effect,
            Some(Effect::Request(Request::Launch {
                repository: repo(),
                job: "job1".into(),
                run_config: "#ops:\n  new: {}".into(),
            }))
        );
    }

    #[test]
    fn successful_launch_closes_editor_and_refreshes() {
        let mut s = state_with_runs();
        s.handle_action(Action::OpenLaunchEditor);
        let next = s.apply_launch(&repo(), "job1".into(), LaunchOutcome::Launched { run_id: "r9".into() });
        assert!(s.editor.is_none());
        assert_eq!(s.focus.current(), Focus::Pane(Pane::Runs));
        assert_eq!(s.notifications[0].message, "Launched run r9");
        assert_eq!(
            next,
            Some(Request::Runs {
                repository: repo(),
                job: "job1".into()
            })
        );
    }

    #[test]
    fn rejected_launch_keeps_editor_under_feedback() {
        let mut s = state_with_runs();
        s.handle_action(Action::OpenLaunchEditor);
        s.apply_launch(&repo(), "job1".into(), LaunchOutcome::Rejected(vec!["bad".into()]));
        assert_eq!(s.focus.top_modal(), Some(Modal::Feedback));
        assert_eq!(s.feedback.as_ref().unwrap().lines, vec!["bad".to_string()]);
        s.handle_action(Action::CloseModal);
        assert_eq!(s.focus.top_modal(), Some(Modal::LaunchEditor));
        assert!(s.editor.is_some());
    }

    #[test]
    fn closing_editor_discards_edits() {
        let mut s = state_with_runs();
        s.handle_action(Action::OpenLaunchEditor);
        s.handle_action(Action::EditorInsert('z'));
        s.handle_action(Action::CloseModal);
        assert!(s.editor.is_none());
        assert!(s.focus.is_active(Pane::Runs));
    }

    #[test]
    fn terminate_confirmation_defaults_to_no() {
        let mut s = state_with_runs();
        assert_eq!(s.handle_action(Action::TerminateWithConfirmation), None);
        assert_eq!(s.confirm.as_ref().unwrap().message, "Terminate run new?");
        assert_eq!(s.handle_action(Action::ConfirmSubmit), None);
        assert!(s.confirm.is_none());
        assert!(s.focus.is_active(Pane::Runs));
    }

    #[test]
    fn terminate_confirmed_with_toggle() {
        let mut s = state_with_runs();
        s.handle_action(Action::TerminateWithConfirmation);
        s.handle_action(Action::ConfirmToggle);
        let effect = s.handle_action(Action::ConfirmSubmit);
        assert_eq!(
            effect,
            Some(Effect::Request(Request::Terminate {
                repository: repo(),
                job: "job1".into(),
                run_id: "new".into(),
            }))
        );
    }

    #[test]
    fn terminate_y_shortcut() {
        let mut s = state_with_runs();
        s.handle_action(Action::TerminateWithConfirmation);
        assert!(matches!(
            s.handle_action(Action::ConfirmYes),
            Some(Effect::Request(Request::Terminate { .. }))
        ));
    }

    #[test]
    fn terminate_result_shows_feedback_and_refetches() {
        let mut s = state_with_runs();
        let next = s.apply_terminate(&repo(), "job1".into(), "new", &TerminateOutcome::Terminated);
        assert_eq!(s.feedback.as_ref().unwrap().lines, vec!["Run new terminated".to_string()]);
        assert_eq!(
            next,
            Some(Request::Runs {
                repository: repo(),
                job: "job1".into()
            })
        );
    }

    #[test]
    fn filter_is_live_and_case_sensitive() {
        let mut s = loaded_state();
        s.handle_action(Action::OpenFilter);
        assert_eq!(s.focus.top_modal(), Some(Modal::Filter));
        s.handle_action(Action::FilterInput('l'));
        s.handle_action(Action::FilterInput('o'));
        assert_eq!(s.repositories.labels(), &["loc1".to_string()]);
        s.handle_action(Action::FilterBackspace);
        assert_eq!(s.repositories.len(), 2);
        s.handle_action(Action::ApplyFilter);
        assert!(s.focus.is_active(Pane::Repositories));
        s.apply_filter("LOC");
        assert!(s.repositories.is_empty());
        s.apply_filter("");
        assert_eq!(s.repositories.len(), 2);
    }

    #[test]
    fn filter_term_survives_reload() {
        let mut s = loaded_state();
        s.apply_filter("alp");
        s.apply_repositories(vec![RepositoryRef::new("r2", "alpine")]);
        assert_eq!(s.repositories.labels(), &["alpha".to_string(), "alpine".to_string()]);
    }

    #[test]
    fn browser_urls_per_pane() {
        let mut s = state_with_runs();
        assert_eq!(s.current_url().as_deref(), Some("https://dagster.example.com/runs/new"));
        s.focus.focus(Pane::Jobs);
        assert_eq!(
            s.current_url().as_deref(),
            Some("https://dagster.example.com/locations/r1@loc1/jobs/job1/playground")
        );
        s.focus.focus(Pane::Repositories);
        assert_eq!(
            s.current_url().as_deref(),
            Some("https://dagster.example.com/locations/r1@alpha/jobs")
        );
    }

    #[test]
    fn help_stacks_over_feedback() {
        let mut s = state_with_runs();
        s.open_feedback("t".into(), vec!["m".into()]);
        s.handle_action(Action::OpenHelp);
        s.handle_action(Action::CloseModal);
        assert_eq!(s.focus.top_modal(), Some(Modal::Feedback));
        s.handle_action(Action::CloseModal);
        assert!(s.feedback.is_none());
        assert!(s.focus.is_active(Pane::Runs));
    }

    #[test]
    fn error_toast_lifecycle() {
        let mut s = loaded_state();
        s.set_error("no opener".into());
        assert_eq!(s.error_message(), Some("no opener"));
        s.prune_error();
        assert!(s.error.is_some());
    }

    #[test]
    fn spinner_wraps() {
        let mut s = loaded_state();
        for _ in 0..SPINNER_FRAME_COUNT {
            s.advance_spinner();
        }
        assert_eq!(s.spinner_frame, 0);
    }
}
