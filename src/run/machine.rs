use crate::guard::{DisplayState, FetchKind, Outcome, RequestId, ResultSet, ResultsController};
use crate::models::{MatchResult, MatchRun, MatchRunStatus};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Local lifecycle of a match run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Creating,
    Polling,
    Ready,
    Error,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Ready | RunState::Error)
    }

    pub fn is_active(self) -> bool {
        matches!(self, RunState::Creating | RunState::Polling)
    }
}

/// Polling speed, slowing down as a run stays unresolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PollPhase {
    Fast,
    Slow,
    VerySlow,
}

/// Fixed deceleration schedule for status polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub fast: Duration,
    pub slow: Duration,
    pub very_slow: Duration,
    /// Poll count at which `Slow` starts
    pub slow_after: u32,
    /// Poll count at which `VerySlow` starts
    pub very_slow_after: u32,
    /// Unresolved polls tolerated before giving up
    pub max_polls: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            fast: Duration::from_secs(2),
            slow: Duration::from_secs(5),
            very_slow: Duration::from_secs(10),
            slow_after: 15,
            very_slow_after: 30,
            max_polls: 60,
        }
    }
}

impl PollSchedule {
    pub fn phase_for(&self, poll_count: u32) -> PollPhase {
        if poll_count >= self.very_slow_after {
            PollPhase::VerySlow
        } else if poll_count >= self.slow_after {
            PollPhase::Slow
        } else {
            PollPhase::Fast
        }
    }

    pub fn interval(&self, phase: PollPhase) -> Duration {
        match phase {
            PollPhase::Fast => self.fast,
            PollPhase::Slow => self.slow,
            PollPhase::VerySlow => self.very_slow,
        }
    }
}

/// Result of one status fetch
#[derive(Debug, Clone)]
pub enum PollResponse {
    Run(MatchRun),
    /// HTTP 429; skip this tick
    RateLimited,
    /// Transport or parse failure
    Failed(String),
}

/// What the driver should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fetch status again at this instant
    Wait(Instant),
    Done,
    /// Response belonged to a superseded request; stop driving it
    Stale,
}

/// Rows delivered by a ready run. Emptiness follows the reported count,
/// not the number of rows that came back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMatches {
    pub count: u64,
    pub rows: Vec<MatchResult>,
}

impl ResultSet for RunMatches {
    fn is_empty_set(&self) -> bool {
        self.count == 0
    }
}

/// Serializable view of a match run for callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub state: RunState,
    pub display: DisplayState,
    pub request_id: RequestId,
    pub url: Option<String>,
    pub run_id: Option<String>,
    pub poll_count: u32,
    pub phase: PollPhase,
    pub match_count: Option<u64>,
    pub matches: Vec<MatchResult>,
    pub error: Option<String>,
}

/// Pure match-run state machine. Time comes in as `now`; the only
/// scheduling output is `next_wake`.
#[derive(Debug, Clone)]
pub struct MatchRunMachine {
    schedule: PollSchedule,
    state: RunState,
    request: RequestId,
    url: Option<String>,
    run_id: Option<String>,
    poll_count: u32,
    phase: PollPhase,
    next_wake: Option<Instant>,
    match_count: Option<u64>,
    results: ResultsController<RunMatches>,
}

impl MatchRunMachine {
    pub fn new(schedule: PollSchedule) -> Self {
        Self {
            schedule,
            state: RunState::Idle,
            request: 0,
            url: None,
            run_id: None,
            poll_count: 0,
            phase: PollPhase::Fast,
            next_wake: None,
            match_count: None,
            results: ResultsController::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    pub fn poll_count(&self) -> u32 {
        self.poll_count
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn next_wake(&self) -> Option<Instant> {
        self.next_wake
    }

    pub fn request(&self) -> RequestId {
        self.request
    }

    /// Begin a new run for `url`, discarding everything from before
    pub fn start(&mut self, url: impl Into<String>) -> RequestId {
        self.clear();
        self.url = Some(url.into());
        self.state = RunState::Creating;
        self.request = self.results.begin_fresh(FetchKind::Resolve);
        self.request
    }

    /// Apply the creation response
    pub fn on_created(
        &mut self,
        request: RequestId,
        created: Result<MatchRun, String>,
        now: Instant,
    ) -> Step {
        if request != self.request || self.state != RunState::Creating {
            return Step::Stale;
        }

        let run = match created {
            Ok(run) => run,
            Err(message) => return self.fail(message),
        };

        tracing::info!("Match run {} created with status {:?}", run.run_id, run.status);
        self.run_id = Some(run.run_id.clone());

        match run.status {
            MatchRunStatus::Ready | MatchRunStatus::Error => self.finish(run),
            _ => {
                self.state = RunState::Polling;
                self.results.mark_loading(self.request);
                self.phase = PollPhase::Fast;
                self.schedule_next(now)
            }
        }
    }

    /// Apply a status fetch
    pub fn on_poll(&mut self, request: RequestId, response: PollResponse, now: Instant) -> Step {
        if request != self.request {
            return Step::Stale;
        }
        if self.state != RunState::Polling {
            return Step::Done;
        }

        match response {
            PollResponse::RateLimited => {
                tracing::warn!(
                    "Rate limited polling run {:?}, retrying next tick",
                    self.run_id
                );
                self.schedule_next(now)
            }
            PollResponse::Failed(message) => self.fail(message),
            PollResponse::Run(run) if run.status.is_terminal() => self.finish(run),
            PollResponse::Run(_) => {
                self.poll_count += 1;
                if self.poll_count > self.schedule.max_polls {
                    return self.fail(format!(
                        "Match run timed out after {} status checks",
                        self.schedule.max_polls
                    ));
                }

                let phase = self.schedule.phase_for(self.poll_count);
                if phase != self.phase {
                    tracing::debug!(
                        "Run {:?} still pending after {} polls, slowing to {:?}",
                        self.run_id,
                        self.poll_count,
                        phase
                    );
                }
                self.phase = phase;
                self.results.apply(self.request, Outcome::Pending);
                self.schedule_next(now)
            }
        }
    }

    /// Cancel and return to idle
    pub fn reset(&mut self) {
        self.clear();
        self.results.reset();
        self.request = self.results.current_request();
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            state: self.state,
            display: self.results.state(),
            request_id: self.request,
            url: self.url.clone(),
            run_id: self.run_id.clone(),
            poll_count: self.poll_count,
            phase: self.phase,
            match_count: self.match_count,
            matches: self.results.data().map(|d| d.rows.clone()).unwrap_or_default(),
            error: self.results.error().map(str::to_string),
        }
    }

    fn clear(&mut self) {
        self.state = RunState::Idle;
        self.url = None;
        self.run_id = None;
        self.poll_count = 0;
        self.phase = PollPhase::Fast;
        self.next_wake = None;
        self.match_count = None;
    }

    fn schedule_next(&mut self, now: Instant) -> Step {
        let wake = now + self.schedule.interval(self.phase);
        self.next_wake = Some(wake);
        Step::Wait(wake)
    }

    fn finish(&mut self, run: MatchRun) -> Step {
        self.next_wake = None;

        if run.status == MatchRunStatus::Error {
            let reason = run.failure_reason();
            tracing::warn!("Match run {} failed: {}", run.run_id, reason);
            self.state = RunState::Error;
            self.results.apply(self.request, Outcome::Failed(reason));
            return Step::Done;
        }

        let count = run.count();
        tracing::info!("Match run {} ready with {} matches", run.run_id, count);
        self.state = RunState::Ready;
        self.match_count = Some(count);
        let rows = if count == 0 { Vec::new() } else { run.matches };
        self.results.apply(self.request, Outcome::Ready(RunMatches { count, rows }));
        Step::Done
    }

    fn fail(&mut self, message: String) -> Step {
        tracing::error!("Match run {:?} aborted: {}", self.run_id, message);
        self.next_wake = None;
        self.state = RunState::Error;
        self.results.apply(self.request, Outcome::Failed(message));
        Step::Done
    }
}

impl Default for MatchRunMachine {
    fn default() -> Self {
        Self::new(PollSchedule::default())
    }
}
