//! Job orchestrator
//!
//! Single entry point for the generation job lifecycle:
//!
//! - `start_job` submits a request, persists the returned handle and starts
//!   observing it
//! - observation polls until a terminal status, then clears the handle, stops
//!   polling and hands the outcome to the caller's callbacks exactly once
//! - `clear_job` abandons the job without firing any callback
//! - on construction a handle left behind by a previous process is resumed
//!
//! Each observation is tagged with an epoch. Poll results are applied only
//! while their epoch is still the active one, so a fetch that resolves after
//! the job was cleared, replaced or already finished is discarded.

use shiftwise_client::{ClientError, SchedulerApi};
use shiftwise_core::domain::job::{JobHandle, JobStatus};
use shiftwise_core::domain::request::GenerationRequest;
use shiftwise_core::dto::job::JobStatusResponse;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::handoff::{HandOffQueue, JobCallbacks, JobOutcome};
use super::poller::{JobPoller, PollConfig, PollEnd, PollUpdate};
use crate::store::{JobHandleStore, StoreError};

/// Errors returned by [`JobOrchestrator`] operations
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("failed to submit generation job: {0}")]
    Submit(#[from] ClientError),

    #[error("job {0} is already in progress")]
    JobInFlight(JobHandle),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Latest observable state of the current job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobState {
    /// Job being observed, `None` when idle
    pub job_id: Option<JobHandle>,
    /// Last status reported by the backend
    pub status: Option<JobStatus>,
    /// Last failed status check, cleared by the next successful one
    pub last_error: Option<String>,
}

impl JobState {
    pub fn is_in_flight(&self) -> bool {
        self.job_id.is_some()
    }
}

struct ActiveJob {
    handle: JobHandle,
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

struct Inner {
    api: Arc<dyn SchedulerApi>,
    store: Arc<dyn JobHandleStore>,
    poller: JobPoller,
    handoff: HandOffQueue,
    active: Mutex<Option<ActiveJob>>,
    next_epoch: AtomicU64,
    state: watch::Sender<JobState>,
    submit_lock: tokio::sync::Mutex<()>,
}

/// Coordinates submission, persistence, polling and completion of one job
///
/// Must be created inside a Tokio runtime. Dropping the orchestrator stops
/// polling but keeps the persisted handle, so the job is resumed next time.
pub struct JobOrchestrator {
    inner: Arc<Inner>,
}

impl JobOrchestrator {
    /// Creates the orchestrator and resumes any persisted job
    pub fn new(
        api: Arc<dyn SchedulerApi>,
        store: Arc<dyn JobHandleStore>,
        config: PollConfig,
        callbacks: Arc<dyn JobCallbacks>,
    ) -> Self {
        let (handoff, _dispatcher) = HandOffQueue::spawn(callbacks);
        let (state, _) = watch::channel(JobState::default());

        let orchestrator = Self {
            inner: Arc::new(Inner {
                poller: JobPoller::new(api.clone(), config),
                api,
                store,
                handoff,
                active: Mutex::new(None),
                next_epoch: AtomicU64::new(1),
                state,
                submit_lock: tokio::sync::Mutex::new(()),
            }),
        };
        orchestrator.resume();
        orchestrator
    }

    /// Resumes observation of the persisted job, if there is one
    ///
    /// No-op when the store is empty or that job is already being observed.
    pub fn resume(&self) -> Option<JobHandle> {
        let handle = self.inner.store.get()?;
        info!("Resuming generation job {}", handle);
        Inner::observe(&self.inner, handle.clone());
        Some(handle)
    }

    /// Submits a generation request and starts observing the new job
    ///
    /// A submission failure is also delivered to the error callback; no handle
    /// is stored in that case.
    pub async fn start_job(&self, request: GenerationRequest) -> Result<JobHandle, OrchestratorError> {
        let _submitting = self.inner.submit_lock.lock().await;

        if let Some(handle) = self.current_job() {
            return Err(OrchestratorError::JobInFlight(handle));
        }

        info!(
            "Starting generation job for venue {} ({} to {}, mode {})",
            request.venue_id, request.date_range.start_date, request.date_range.end_date, request.mode
        );

        let started = match self.inner.api.start_generation_job(&request).await {
            Ok(started) => started,
            Err(e) => {
                error!("Failed to start generation job: {}", e);
                self.inner.handoff.enqueue(JobOutcome::Failed(e.user_message()));
                return Err(e.into());
            }
        };

        let handle = started.job_id;
        if let Err(e) = self.inner.store.set(&handle) {
            warn!("Job {} will not survive a restart: {}", handle, e);
        }
        info!("Generation job {} accepted ({})", handle, started.status);

        Inner::observe(&self.inner, handle.clone());
        Ok(handle)
    }

    /// Abandons the current job without invoking any callback
    ///
    /// If the persisted handle cannot be removed the job keeps being observed.
    pub fn clear_job(&self) -> Result<(), OrchestratorError> {
        let job = {
            let mut active = self.inner.lock_active();
            self.inner.store.clear()?;
            active.take()
        };
        if let Some(job) = job {
            if let Some(task) = job.task {
                task.abort();
            }
            info!("Abandoned generation job {}", job.handle);
        }
        self.inner.state.send_replace(JobState::default());
        Ok(())
    }

    /// Handle of the job being observed
    pub fn current_job(&self) -> Option<JobHandle> {
        self.inner.lock_active().as_ref().map(|job| job.handle.clone())
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.lock_active().is_some()
    }

    /// Watches the latest status and query error of the current job
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.inner.state.subscribe()
    }
}

impl Drop for JobOrchestrator {
    fn drop(&mut self) {
        if let Some(job) = self.inner.lock_active().take() {
            debug!("Stopped observing job {}", job.handle);
            if let Some(task) = job.task {
                task.abort();
            }
        }
    }
}

impl Inner {
    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveJob>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.lock_active()
            .as_ref()
            .is_some_and(|job| job.epoch == epoch)
    }

    /// Starts polling `handle`, replacing any other observation
    fn observe(this: &Arc<Self>, handle: JobHandle) {
        let mut active = this.lock_active();
        if let Some(existing) = active.as_mut() {
            if existing.handle == handle {
                return;
            }
            if let Some(task) = existing.task.take() {
                task.abort();
            }
        }

        let epoch = this.next_epoch.fetch_add(1, Ordering::SeqCst);
        this.state.send_replace(JobState {
            job_id: Some(handle.clone()),
            status: None,
            last_error: None,
        });

        let inner = Arc::clone(this);
        let watched = handle.clone();
        let task = tokio::spawn(async move { inner.watch_job(watched, epoch).await });

        *active = Some(ActiveJob {
            handle,
            epoch,
            task: Some(task),
        });
    }

    async fn watch_job(self: Arc<Self>, handle: JobHandle, epoch: u64) {
        let end = self
            .poller
            .run(&handle, |update| {
                if !self.is_current(epoch) {
                    debug!("Discarding stale status of job {}", handle);
                    return ControlFlow::Break(());
                }
                self.record(update);
                ControlFlow::Continue(())
            })
            .await;

        let outcome = match end {
            PollEnd::Terminal(response) => terminal_outcome(response),
            PollEnd::Stopped => return,
            PollEnd::FailureLimit {
                failures,
                last_error,
            } => {
                warn!("Giving up on job {} after {} failed status checks", handle, failures);
                JobOutcome::Failed(format!(
                    "Lost track of the generation job after {} failed status checks: {}",
                    failures,
                    last_error.user_message()
                ))
            }
            PollEnd::DeadlineExceeded { elapsed } => {
                warn!("Job {} still running after {:?}, giving up", handle, elapsed);
                JobOutcome::Failed(format!(
                    "The generation job did not finish within {} seconds",
                    elapsed.as_secs()
                ))
            }
        };

        self.finish(epoch, outcome);
    }

    fn record(&self, update: &PollUpdate) {
        self.state.send_modify(|state| match update {
            PollUpdate::Status(response) => {
                state.status = Some(response.status);
                state.last_error = None;
            }
            PollUpdate::Error { error, .. } => {
                state.last_error = Some(error.user_message());
            }
        });
    }

    /// Ends observation `epoch` and schedules delivery of its outcome
    ///
    /// Returns false, without side effects, when `epoch` is no longer active.
    fn finish(&self, epoch: u64, outcome: JobOutcome) -> bool {
        let job = {
            let mut active = self.lock_active();
            match active.as_ref() {
                Some(job) if job.epoch == epoch => active.take(),
                _ => None,
            }
        };
        let Some(job) = job else {
            debug!("Ignoring outcome of an observation that already ended");
            return false;
        };

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted job {}: {}", job.handle, e);
        }

        match &outcome {
            JobOutcome::Completed(result) => info!(
                "Generation job {} completed with {} shift(s)",
                job.handle,
                result.shifts.len()
            ),
            JobOutcome::Failed(message) => warn!("Generation job {} failed: {}", job.handle, message),
        }

        self.state.send_modify(|state| state.job_id = None);
        self.handoff.enqueue(outcome);
        true
    }
}

fn terminal_outcome(response: JobStatusResponse) -> JobOutcome {
    if response.status == JobStatus::Failed {
        return JobOutcome::Failed(response.error_message());
    }
    match response.schedule() {
        Ok(Some(result)) => JobOutcome::Completed(result),
        Ok(None) => {
            JobOutcome::Failed("The generation job completed without a schedule".to_string())
        }
        Err(e) => JobOutcome::Failed(format!("Could not read the generated schedule: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::poller::tests::{ScriptedApi, failed, status};
    use crate::store::MemoryHandleStore;
    use chrono::{NaiveDate, TimeZone, Utc};
    use shiftwise_core::domain::request::{DateRange, GenerationMode};
    use shiftwise_core::domain::schedule::{ScheduleMetadata, ScheduleResult, ShiftAssignment};
    use shiftwise_core::dto::job::StartJobResponse;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Event {
        Completed {
            shifts: usize,
            stored: Option<JobHandle>,
        },
        Failed {
            message: String,
            stored: Option<JobHandle>,
        },
    }

    /// Records callbacks together with the store contents at delivery time
    struct Recorder {
        tx: mpsc::UnboundedSender<Event>,
        store: Arc<MemoryHandleStore>,
    }

    impl JobCallbacks for Recorder {
        fn on_complete(&self, result: ScheduleResult) {
            let _ = self.tx.send(Event::Completed {
                shifts: result.shifts.len(),
                stored: self.store.get(),
            });
        }

        fn on_error(&self, message: String) {
            let _ = self.tx.send(Event::Failed {
                message,
                stored: self.store.get(),
            });
        }
    }

    struct Harness {
        orchestrator: JobOrchestrator,
        api: Arc<ScriptedApi>,
        store: Arc<MemoryHandleStore>,
        events: mpsc::UnboundedReceiver<Event>,
    }

    impl Harness {
        fn new(api: ScriptedApi, store: MemoryHandleStore) -> Self {
            Self::with_config(api, store, PollConfig::default())
        }

        fn with_config(api: ScriptedApi, store: MemoryHandleStore, config: PollConfig) -> Self {
            let api = Arc::new(api);
            let store = Arc::new(store);
            let (tx, events) = mpsc::unbounded_channel();
            let recorder = Arc::new(Recorder {
                tx,
                store: store.clone(),
            });
            let orchestrator = JobOrchestrator::new(api.clone(), store.clone(), config, recorder);
            Self {
                orchestrator,
                api,
                store,
                events,
            }
        }

        /// Lets the paused clock run far past any poll interval
        async fn settle(&self) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            venue_id: "v1".to_string(),
            date_range: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            )
            .unwrap(),
            mode: GenerationMode::Balanced,
            staff_ids: None,
            phase_ids: None,
            phase_staff_overrides: None,
        }
    }

    fn accepted(job_id: &str) -> StartJobResponse {
        StartJobResponse {
            job_id: JobHandle::new(job_id),
            status: JobStatus::Pending,
            message: "queued".to_string(),
        }
    }

    fn schedule(shifts: usize) -> ScheduleResult {
        let shifts = (0..shifts)
            .map(|i| {
                let day = 6 + (i as u32 % 7);
                ShiftAssignment {
                    staff_id: format!("s{}", i),
                    staff_name: format!("Staff {}", i),
                    role: "WAITER".to_string(),
                    start_time: Utc.with_ymd_and_hms(2025, 1, day, 11, 0, 0).unwrap(),
                    end_time: Utc.with_ymd_and_hms(2025, 1, day, 15, 0, 0).unwrap(),
                    hours: 4.0,
                    cost: 50.0,
                    phase_id: Some("lunch".to_string()),
                    phase_name: None,
                }
            })
            .collect::<Vec<_>>();
        ScheduleResult {
            metadata: ScheduleMetadata {
                total_shifts: shifts.len() as u32,
                total_hours: 4.0 * shifts.len() as f64,
                total_cost: 50.0 * shifts.len() as f64,
                coverage_percentage: 100.0,
                reasoning: None,
            },
            shifts,
            daily_summaries: vec![],
            warnings: vec![],
        }
    }

    fn completed(job_id: &str, shifts: usize) -> JobStatusResponse {
        JobStatusResponse {
            result: Some(serde_json::to_value(schedule(shifts)).unwrap()),
            completed_at: Some(Utc::now()),
            ..status(job_id, JobStatus::Completed)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_poll_complete() {
        let api = ScriptedApi::with_polls(vec![
            Ok(status("j1", JobStatus::Pending)),
            Ok(status("j1", JobStatus::Pending)),
            Ok(completed("j1", 12)),
        ]);
        api.start.lock().unwrap().push_back(Ok(accepted("j1")));
        let mut h = Harness::new(api, MemoryHandleStore::new());

        let handle = h.orchestrator.start_job(request()).await.unwrap();
        assert_eq!(handle, JobHandle::new("j1"));
        assert_eq!(h.store.get(), Some(JobHandle::new("j1")));
        assert!(h.orchestrator.is_in_flight());

        let event = h.events.recv().await.unwrap();
        assert_eq!(
            event,
            Event::Completed {
                shifts: 12,
                stored: None
            }
        );
        assert_eq!(h.orchestrator.current_job(), None);
        assert_eq!(h.api.polls(), 3);

        h.settle().await;
        assert_eq!(h.api.polls(), 3);
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_reports_server_message() {
        let api = ScriptedApi::with_polls(vec![
            Ok(status("j1", JobStatus::Processing)),
            Ok(failed("j1", "no staff available")),
        ]);
        api.start.lock().unwrap().push_back(Ok(accepted("j1")));
        let mut h = Harness::new(api, MemoryHandleStore::new());

        h.orchestrator.start_job(request()).await.unwrap();

        assert_eq!(
            h.events.recv().await.unwrap(),
            Event::Failed {
                message: "no staff available".to_string(),
                stored: None
            }
        );
        h.settle().await;
        assert_eq!(h.api.polls(), 2);
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_without_message_uses_fallback() {
        let api = ScriptedApi::with_polls(vec![Ok(status("j1", JobStatus::Failed))]);
        let mut h = Harness::new(api, MemoryHandleStore::with_handle(JobHandle::new("j1")));

        match h.events.recv().await.unwrap() {
            Event::Failed { message, .. } => assert_eq!(message, "Schedule generation failed"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_error_stores_nothing() {
        let api = ScriptedApi::default();
        api.start
            .lock()
            .unwrap()
            .push_back(Err(ClientError::api_error(400, "venue has no phases")));
        let mut h = Harness::new(api, MemoryHandleStore::new());

        let err = h.orchestrator.start_job(request()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Submit(_)));
        assert_eq!(h.store.get(), None);
        assert!(!h.orchestrator.is_in_flight());
        assert_eq!(
            h.events.recv().await.unwrap(),
            Event::Failed {
                message: "venue has no phases".to_string(),
                stored: None
            }
        );

        h.settle().await;
        assert_eq!(h.api.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_after_restart() {
        let api = ScriptedApi::with_polls(vec![
            Ok(status("j9", JobStatus::Processing)),
            Ok(completed("j9", 3)),
        ]);
        let mut h = Harness::new(api, MemoryHandleStore::with_handle(JobHandle::new("j9")));

        assert_eq!(h.orchestrator.current_job(), Some(JobHandle::new("j9")));
        assert_eq!(
            h.events.recv().await.unwrap(),
            Event::Completed {
                shifts: 3,
                stored: None
            }
        );
        assert_eq!(h.api.start_count.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_store_is_idle() {
        let h = Harness::new(ScriptedApi::default(), MemoryHandleStore::new());
        assert_eq!(h.orchestrator.resume(), None);
        assert!(!h.orchestrator.is_in_flight());

        h.settle().await;
        assert_eq!(h.api.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_twice_keeps_single_poll_loop() {
        let h = Harness::new(
            ScriptedApi::default(),
            MemoryHandleStore::with_handle(JobHandle::new("j1")),
        );
        assert_eq!(h.orchestrator.resume(), Some(JobHandle::new("j1")));

        // First fetch at 0s, then one every 3s.
        tokio::time::sleep(Duration::from_millis(7500)).await;
        assert_eq!(h.api.polls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_outcome_delivered_once() {
        let mut h = Harness::new(
            ScriptedApi::default(),
            MemoryHandleStore::with_handle(JobHandle::new("j1")),
        );
        let epoch = h
            .orchestrator
            .inner
            .lock_active()
            .as_ref()
            .map(|job| job.epoch)
            .unwrap();

        // Two overlapping fetches both observed COMPLETED.
        assert!(h.orchestrator.inner.finish(epoch, JobOutcome::Completed(schedule(2))));
        assert!(!h.orchestrator.inner.finish(epoch, JobOutcome::Completed(schedule(2))));

        assert_eq!(
            h.events.recv().await.unwrap(),
            Event::Completed {
                shifts: 2,
                stored: None
            }
        );
        h.settle().await;
        assert!(h.events.try_recv().is_err());
        assert!(h.api.polls() <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_job_discards_in_flight_poll() {
        let api = ScriptedApi {
            poll_delay: Some(Duration::from_secs(2)),
            ..ScriptedApi::with_polls(vec![Ok(completed("j1", 5))])
        };
        api.start.lock().unwrap().push_back(Ok(accepted("j1")));
        let mut h = Harness::new(api, MemoryHandleStore::new());

        h.orchestrator.start_job(request()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.api.polls(), 1);

        h.orchestrator.clear_job().unwrap();
        assert_eq!(h.store.get(), None);
        assert!(!h.orchestrator.is_in_flight());

        h.settle().await;
        assert!(h.events.try_recv().is_err());
        assert_eq!(h.api.polls(), 1);
        assert_eq!(*h.orchestrator.subscribe().borrow(), JobState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_job_when_idle() {
        let h = Harness::new(ScriptedApi::default(), MemoryHandleStore::new());
        h.orchestrator.clear_job().unwrap();
        h.orchestrator.clear_job().unwrap();
        assert_eq!(h.store.get(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_rejected_while_in_flight() {
        let api = ScriptedApi::default();
        api.start.lock().unwrap().push_back(Ok(accepted("j1")));
        api.start.lock().unwrap().push_back(Ok(accepted("j2")));
        let h = Harness::new(api, MemoryHandleStore::new());

        h.orchestrator.start_job(request()).await.unwrap();
        let err = h.orchestrator.start_job(request()).await.unwrap_err();

        assert!(matches!(err, OrchestratorError::JobInFlight(ref id) if id.as_str() == "j1"));
        assert_eq!(h.api.start_count.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(h.store.get(), Some(JobHandle::new("j1")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_surface_without_clearing() {
        let api = ScriptedApi::with_polls(vec![
            Ok(status("j1", JobStatus::Processing)),
            Err(ClientError::api_error(503, "backend restarting")),
        ]);
        let h = Harness::new(api, MemoryHandleStore::with_handle(JobHandle::new("j1")));
        let state = h.orchestrator.subscribe();

        // Fetches at 0s (PROCESSING) and 3s (error).
        tokio::time::sleep(Duration::from_millis(4000)).await;
        let snapshot = state.borrow().clone();
        assert_eq!(snapshot.job_id, Some(JobHandle::new("j1")));
        assert_eq!(snapshot.status, Some(JobStatus::Processing));
        assert_eq!(snapshot.last_error.as_deref(), Some("backend restarting"));
        assert_eq!(h.store.get(), Some(JobHandle::new("j1")));

        // Next fetch at 6s succeeds and clears the error.
        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(state.borrow().last_error, None);
        assert!(h.orchestrator.is_in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_limit_abandons_job() {
        let api = ScriptedApi::with_polls(
            (0..3)
                .map(|_| Err(ClientError::api_error(404, "job not found")))
                .collect(),
        );
        let config = PollConfig {
            max_consecutive_failures: 3,
            ..PollConfig::default()
        };
        let mut h = Harness::with_config(
            api,
            MemoryHandleStore::with_handle(JobHandle::new("stale")),
            config,
        );

        match h.events.recv().await.unwrap() {
            Event::Failed { message, stored } => {
                assert!(message.contains("3 failed status checks"));
                assert!(message.contains("job not found"));
                assert_eq!(stored, None);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        h.settle().await;
        assert_eq!(h.api.polls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_without_result_is_an_error() {
        let api = ScriptedApi::with_polls(vec![Ok(status("j1", JobStatus::Completed))]);
        let mut h = Harness::new(api, MemoryHandleStore::with_handle(JobHandle::new("j1")));

        match h.events.recv().await.unwrap() {
            Event::Failed { message, .. } => assert!(message.contains("without a schedule")),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_schedule_ends_job_once() {
        let unreadable = JobStatusResponse {
            result: Some(serde_json::json!({
                "shifts": [],
                "metadata": { "totalShifts": 0, "totalHours": 0.0, "totalCost": 0.0 }
            })),
            ..status("j1", JobStatus::Completed)
        };
        let api = ScriptedApi::with_polls(vec![Ok(status("j1", JobStatus::Processing)), Ok(unreadable)]);
        let mut h = Harness::new(api, MemoryHandleStore::with_handle(JobHandle::new("j1")));

        match h.events.recv().await.unwrap() {
            Event::Failed { message, stored } => {
                assert!(message.starts_with("Could not read the generated schedule"));
                assert!(message.contains("coveragePercentage"));
                assert_eq!(stored, None);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(h.api.polls(), 2);

        h.settle().await;
        assert_eq!(h.api.polls(), 2);
        assert!(h.events.try_recv().is_err());
    }

    /// Store whose handle can be read and written but never removed
    struct StickyStore(MemoryHandleStore);

    impl JobHandleStore for StickyStore {
        fn get(&self) -> Option<JobHandle> {
            self.0.get()
        }

        fn set(&self, handle: &JobHandle) -> Result<(), StoreError> {
            self.0.set(handle)
        }

        fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only state dir")))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_job_keeps_observing_when_store_clear_fails() {
        let api = Arc::new(ScriptedApi::default());
        let store = Arc::new(StickyStore(MemoryHandleStore::with_handle(JobHandle::new("j1"))));
        let (tx, mut events) = mpsc::unbounded_channel();
        let recorder = Arc::new(Recorder {
            tx,
            store: Arc::new(MemoryHandleStore::new()),
        });
        let orchestrator =
            JobOrchestrator::new(api.clone(), store.clone(), PollConfig::default(), recorder);

        assert!(matches!(orchestrator.clear_job(), Err(OrchestratorError::Store(_))));
        assert_eq!(orchestrator.current_job(), Some(JobHandle::new("j1")));
        assert_eq!(store.get(), Some(JobHandle::new("j1")));
        assert!(orchestrator.subscribe().borrow().is_in_flight());

        let polls = api.polls();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(api.polls() > polls);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling_but_keeps_handle() {
        let h = Harness::new(
            ScriptedApi::default(),
            MemoryHandleStore::with_handle(JobHandle::new("j1")),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        let api = h.api.clone();
        let store = h.store.clone();
        let polls = api.polls();
        drop(h);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.polls(), polls);
        assert_eq!(store.get(), Some(JobHandle::new("j1")));
    }
}
