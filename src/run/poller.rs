use crate::guard::RequestId;
use crate::run::machine::{MatchRunMachine, PollResponse, PollSchedule, RunSnapshot, Step};
use crate::services::match_api::{MatchApiError, MatchRunApi};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Drives one [`MatchRunMachine`] against the match-run API.
///
/// Each poller owns at most one background task. `start` aborts the
/// previous task before beginning, `reset` and `Drop` abort it, so no
/// polling timer outlives its owner. Snapshots are published on a
/// `watch` channel after every transition.
pub struct MatchRunPoller<A: MatchRunApi> {
    api: Arc<A>,
    machine: Arc<Mutex<MatchRunMachine>>,
    updates: watch::Sender<RunSnapshot>,
    task: Option<JoinHandle<()>>,
}

fn lock(machine: &Mutex<MatchRunMachine>) -> MutexGuard<'_, MatchRunMachine> {
    machine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A: MatchRunApi> MatchRunPoller<A> {
    pub fn new(api: Arc<A>, schedule: PollSchedule) -> Self {
        let machine = MatchRunMachine::new(schedule);
        let (updates, _) = watch::channel(machine.snapshot());

        Self {
            api,
            machine: Arc::new(Mutex::new(machine)),
            updates,
            task: None,
        }
    }

    /// Start resolving `url`. Must be called within a tokio runtime.
    pub fn start(&mut self, url: impl Into<String>) -> RequestId {
        self.abort_task();
        let url = url.into();

        let request = {
            let mut machine = lock(&self.machine);
            let request = machine.start(url.clone());
            self.updates.send_replace(machine.snapshot());
            request
        };

        tracing::info!("Starting match run for {} (request {})", url, request);

        self.task = Some(tokio::spawn(drive(
            Arc::clone(&self.api),
            Arc::clone(&self.machine),
            self.updates.clone(),
            request,
            url,
        )));

        request
    }

    /// Cancel any pending poll and go back to idle
    pub fn reset(&mut self) {
        self.abort_task();
        let mut machine = lock(&self.machine);
        machine.reset();
        self.updates.send_replace(machine.snapshot());
    }

    pub fn snapshot(&self) -> RunSnapshot {
        lock(&self.machine).snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.updates.subscribe()
    }

    /// Wait until the current run is no longer creating or polling
    pub async fn wait_settled(&self) -> RunSnapshot {
        let mut rx = self.updates.subscribe();
        let settled = match rx.wait_for(|snap| !snap.state.is_active()).await {
            Ok(snap) => snap.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// Start `url` and wait for it to settle
    pub async fn resolve(&mut self, url: impl Into<String>) -> RunSnapshot {
        self.start(url);
        self.wait_settled().await
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<A: MatchRunApi> Drop for MatchRunPoller<A> {
    fn drop(&mut self) {
        self.abort_task();
    }
}

async fn drive<A: MatchRunApi>(
    api: Arc<A>,
    machine: Arc<Mutex<MatchRunMachine>>,
    updates: watch::Sender<RunSnapshot>,
    request: RequestId,
    url: String,
) {
    let created = api.create_run(&url).await.map_err(|e| e.to_string());

    let mut step = {
        let mut m = lock(&machine);
        let step = m.on_created(request, created, Instant::now());
        updates.send_replace(m.snapshot());
        step
    };

    while let Step::Wait(wake) = step {
        tokio::time::sleep_until(wake).await;

        let run_id = match lock(&machine).run_id() {
            Some(id) => id.to_string(),
            None => break,
        };

        let response = match api.get_run(&run_id).await {
            Ok(run) => PollResponse::Run(run),
            Err(MatchApiError::RateLimited) => PollResponse::RateLimited,
            Err(e) => PollResponse::Failed(e.to_string()),
        };

        step = {
            let mut m = lock(&machine);
            let step = m.on_poll(request, response, Instant::now());
            if step != Step::Stale {
                updates.send_replace(m.snapshot());
            }
            step
        };
    }

    if step == Step::Stale {
        tracing::debug!("Match run request {} superseded", request);
    }
}
