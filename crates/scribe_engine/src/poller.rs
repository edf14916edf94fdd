use std::time::Duration;

use tokio_util::sync::CancellationToken;

use scribe_logging::{scribe_debug, scribe_info, scribe_warn};

use crate::client::TranscribeService;
use crate::{ClientError, EngineEvent, FailureKind, JobId, RemoteStatus, StatusUpdate};

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Fixed delay between the response to one poll and the next request.
    /// Deliberately not exponential: job duration is bounded and predictable.
    pub interval: Duration,
    /// Hard ceiling on polls per job; exhausting it settles the job as timed
    /// out with no further network activity.
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1500),
            max_attempts: 240,
        }
    }
}

/// What to transcribe, captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub source_url: String,
    /// Wire name of the output format.
    pub format: String,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[derive(Clone)]
pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Drives one job from submission to a terminal event.
///
/// Polls are strictly sequential: request `n + 1` is only issued after the
/// response to request `n` has been fully processed. Every exit path emits
/// exactly one terminal event.
///
/// The cancellation token is a robustness addition over the original
/// behavior, which had no abort path; default callers never trigger it.
pub async fn run_job(
    service: &dyn TranscribeService,
    settings: &PollSettings,
    job: JobId,
    spec: &JobSpec,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) {
    let task_id = match service.submit(&spec.source_url, &spec.format).await {
        Ok(task_id) => task_id,
        Err(error) => {
            scribe_warn!("job {} submission failed: {}", job, error);
            sink.emit(EngineEvent::JobFailed { job, error });
            return;
        }
    };
    scribe_info!("job {} accepted as task {}", job, task_id);
    sink.emit(EngineEvent::JobAccepted {
        job,
        task_id: task_id.clone(),
    });

    for attempt in 1..=settings.max_attempts {
        if cancel.is_cancelled() {
            sink.emit(cancelled(job));
            return;
        }

        let update = match service.fetch_status(&task_id).await {
            Ok(RemoteStatus::Completed { transcript }) => {
                scribe_info!("job {} completed after {} polls", job, attempt);
                sink.emit(EngineEvent::JobCompleted { job, transcript });
                return;
            }
            Ok(RemoteStatus::Error { message }) => {
                scribe_warn!("job {} reported error: {}", job, message);
                sink.emit(EngineEvent::JobFailed {
                    job,
                    error: ClientError {
                        kind: FailureKind::RemoteError,
                        message,
                    },
                });
                return;
            }
            Ok(RemoteStatus::Pending) => StatusUpdate::Queued,
            Ok(RemoteStatus::Started) => StatusUpdate::Started,
            Ok(RemoteStatus::Processing { progress }) => StatusUpdate::Processing { progress },
            Ok(RemoteStatus::Unrecognized { status }) => {
                scribe_debug!("job {} unknown status {:?}, still polling", job, status);
                StatusUpdate::Unrecognized
            }
            // A failed poll is fatal for the job; no blip-vs-gone distinction.
            Err(error) => {
                scribe_warn!("job {} poll {} failed: {}", job, attempt, error);
                sink.emit(EngineEvent::JobFailed { job, error });
                return;
            }
        };

        sink.emit(EngineEvent::JobProgress {
            job,
            attempt,
            update,
        });

        if attempt < settings.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    sink.emit(cancelled(job));
                    return;
                }
                _ = tokio::time::sleep(settings.interval) => {}
            }
        }
    }

    scribe_warn!(
        "job {} timed out after {} polls",
        job,
        settings.max_attempts
    );
    sink.emit(EngineEvent::JobTimedOut {
        job,
        attempts: settings.max_attempts,
    });
}

fn cancelled(job: JobId) -> EngineEvent {
    EngineEvent::JobFailed {
        job,
        error: ClientError {
            kind: FailureKind::Cancelled,
            message: "job cancelled".to_string(),
        },
    }
}
