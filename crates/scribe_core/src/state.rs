use std::fmt;

use crate::msg::SettledOutcome;
use crate::view_model::{format_timer, progress_status_text, ControllerViewModel};

/// Local job ticket, assigned per submission. Distinct from the remote task
/// id, which is an opaque string owned by the service.
pub type JobId = u64;

/// Output format selected before submission; immutable once a job is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    Timestamped,
    Srt,
    Vtt,
}

impl OutputFormat {
    /// Wire name sent to the remote service.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Timestamped => "timestamped",
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(OutputFormat::Plain),
            "timestamped" => Some(OutputFormat::Timestamped),
            "srt" => Some(OutputFormat::Srt),
            "vtt" => Some(OutputFormat::Vtt),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-terminal status as reported by one poll response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobUpdate {
    /// Waiting in the service queue.
    Queued,
    /// Picked up by a worker, no progress number yet.
    Started,
    /// Actively transcribing with a progress percentage.
    Processing { progress: u8 },
    /// Status string we do not know; the job keeps polling regardless.
    Unrecognized,
}

/// Terminal outcome tag exposed through the view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Timeout,
}

/// Position in the lifecycle. Transitions only move forward:
/// Idle -> Submitting -> Polling -> Settled, and a new submission is only
/// accepted once settled (or from Idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Settled(Outcome),
}

/// The single in-flight (or most recently settled) job.
#[derive(Debug, Clone, PartialEq, Eq)]
struct JobRecord {
    job: JobId,
    source_url: String,
    format: OutputFormat,
    task_id: Option<String>,
    attempts: u32,
    progress: u8,
    last_update: Option<JobUpdate>,
    elapsed_ms: u64,
    transcript: Option<String>,
    error: Option<String>,
}

impl JobRecord {
    fn new(job: JobId, source_url: String, format: OutputFormat) -> Self {
        Self {
            job,
            source_url,
            format,
            task_id: None,
            attempts: 0,
            progress: 0,
            last_update: None,
            elapsed_ms: 0,
            transcript: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
    input: String,
    format: OutputFormat,
    phase: Phase,
    next_job: JobId,
    job: Option<JobRecord>,
    dirty: bool,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of poll requests processed for the current job.
    pub fn attempts(&self) -> u32 {
        self.job.as_ref().map(|j| j.attempts).unwrap_or(0)
    }

    /// Remote task id, once the submission has been accepted.
    pub fn task_id(&self) -> Option<&str> {
        self.job.as_ref().and_then(|j| j.task_id.as_deref())
    }

    /// Source locator captured by the current job.
    pub fn source_url(&self) -> Option<&str> {
        self.job.as_ref().map(|j| j.source_url.as_str())
    }

    /// Output format captured by the current job; immutable once in flight,
    /// even if the selector changes afterwards.
    pub fn job_format(&self) -> Option<OutputFormat> {
        self.job.as_ref().map(|j| j.format)
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn in_flight(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Polling)
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn format(&self) -> OutputFormat {
        self.format
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn set_format(&mut self, format: OutputFormat) {
        if self.format != format {
            self.format = format;
            self.dirty = true;
        }
    }

    /// Opens a fresh job record and moves to Submitting. The previous settled
    /// job, if any, is discarded here; tickets never repeat.
    pub(crate) fn begin_submission(&mut self, source_url: String) -> JobId {
        self.next_job += 1;
        let job = self.next_job;
        self.job = Some(JobRecord::new(job, source_url, self.format));
        self.phase = Phase::Submitting;
        self.dirty = true;
        job
    }

    pub(crate) fn accept(&mut self, job: JobId, task_id: String) {
        if self.phase != Phase::Submitting {
            return;
        }
        let Some(record) = self.job.as_mut() else {
            return;
        };
        if record.job != job {
            return;
        }
        record.task_id = Some(task_id);
        self.phase = Phase::Polling;
        self.dirty = true;
    }

    pub(crate) fn apply_progress(&mut self, job: JobId, attempt: u32, update: JobUpdate) {
        if self.phase != Phase::Polling {
            return;
        }
        let Some(record) = self.job.as_mut() else {
            return;
        };
        if record.job != job {
            return;
        }
        record.attempts = attempt;
        record.last_update = Some(update);
        if let JobUpdate::Processing { progress } = update {
            // The service does not guarantee monotonic progress; render as-is.
            record.progress = progress.min(100);
        }
        self.dirty = true;
    }

    pub(crate) fn settle(&mut self, job: JobId, outcome: SettledOutcome) {
        if !self.in_flight() {
            return;
        }
        let Some(record) = self.job.as_mut() else {
            return;
        };
        if record.job != job {
            return;
        }
        self.phase = Phase::Settled(match outcome {
            SettledOutcome::Completed { transcript } => {
                record.transcript = Some(transcript);
                record.progress = 100;
                Outcome::Success
            }
            SettledOutcome::Failed { message } => {
                record.error = Some(message);
                Outcome::Failure
            }
            SettledOutcome::TimedOut { attempts } => {
                record.attempts = attempts;
                Outcome::Timeout
            }
        });
        self.dirty = true;
    }

    pub(crate) fn apply_tick(&mut self, job: JobId, elapsed_ms: u64) {
        if !self.in_flight() {
            return;
        }
        let Some(record) = self.job.as_mut() else {
            return;
        };
        if record.job != job {
            return;
        }
        record.elapsed_ms = elapsed_ms;
        self.dirty = true;
    }

    /// Projects the current state into the read-only snapshot consumed by the
    /// presentation adapter. Pure: identical states yield identical views.
    pub fn view(&self) -> ControllerViewModel {
        let in_flight = self.in_flight();
        let has_input = !self.input.trim().is_empty();
        let (progress, elapsed_ms) = self
            .job
            .as_ref()
            .map(|j| (j.progress, j.elapsed_ms))
            .unwrap_or((0, 0));

        ControllerViewModel {
            input_enabled: !in_flight,
            format_enabled: !in_flight,
            submit_enabled: has_input && !in_flight,
            submit_label: if in_flight { "Transcribing" } else { "Transcribe" },
            status_text: self.status_text(),
            progress_percent: progress,
            result_text: self.job.as_ref().and_then(|j| j.transcript.clone()),
            timer_text: format_timer(elapsed_ms, in_flight),
            outcome: match self.phase {
                Phase::Settled(outcome) => Some(outcome),
                _ => None,
            },
        }
    }

    fn status_text(&self) -> String {
        match self.phase {
            Phase::Idle => String::new(),
            Phase::Submitting => "Warming up the servers…".to_string(),
            Phase::Polling => match self.job.as_ref().and_then(|j| j.last_update) {
                // Accepted, but no poll response yet.
                None => "Warming up the servers…".to_string(),
                Some(JobUpdate::Queued) => "In line, preparing for transcription…".to_string(),
                Some(JobUpdate::Started) => "Transcription started…".to_string(),
                Some(JobUpdate::Processing { progress }) => progress_status_text(progress),
                Some(JobUpdate::Unrecognized) => "Working on it…".to_string(),
            },
            Phase::Settled(Outcome::Success) => "Transcription complete!".to_string(),
            Phase::Settled(Outcome::Failure) => {
                let message = self
                    .job
                    .as_ref()
                    .and_then(|j| j.error.as_deref())
                    .unwrap_or("unknown error");
                format!("Transcription failed: {message}")
            }
            Phase::Settled(Outcome::Timeout) => "Timed out waiting for the result.".to_string(),
        }
    }
}
