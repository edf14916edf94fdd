use crate::{JobId, JobUpdate, OutputFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the source-url input box.
    InputChanged(String),
    /// User picked an output format from the selector.
    FormatSelected(OutputFormat),
    /// User pressed the transcribe affordance.
    SubmitPressed,
    /// The remote service accepted the submission and assigned a task id.
    JobAccepted { job: JobId, task_id: String },
    /// The engine processed one non-terminal poll response.
    PollProgress {
        job: JobId,
        attempt: u32,
        update: JobUpdate,
    },
    /// The engine resolved the job to a terminal outcome.
    JobSettled { job: JobId, outcome: SettledOutcome },
    /// Elapsed-time ticker tick for the in-flight job.
    TimerTick { job: JobId, elapsed_ms: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Terminal outcome carried by [`Msg::JobSettled`]. Exactly one of the
/// transcript and the failure message exists, by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettledOutcome {
    Completed { transcript: String },
    Failed { message: String },
    TimedOut { attempts: u32 },
}
