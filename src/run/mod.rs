// Match-run resolution
pub mod machine;
pub mod poller;

pub use machine::{
    MatchRunMachine, PollPhase, PollResponse, PollSchedule, RunMatches, RunSnapshot, RunState, Step,
};
pub use poller::MatchRunPoller;
