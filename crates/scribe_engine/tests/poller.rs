use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use scribe_engine::{
    run_job, ClientError, EngineEvent, EventSink, FailureKind, JobSpec, PollSettings,
    RemoteStatus, StatusUpdate, TranscribeService,
};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Plays back a scripted sequence of poll responses; once the script runs
/// dry it keeps answering with `fallback`. Records the virtual instant of
/// every poll.
struct ScriptedService {
    submit: Result<String, ClientError>,
    script: Mutex<VecDeque<Result<RemoteStatus, ClientError>>>,
    fallback: RemoteStatus,
    poll_times: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedService {
    fn accepting(script: Vec<Result<RemoteStatus, ClientError>>) -> Self {
        Self {
            submit: Ok("task-1".to_string()),
            script: Mutex::new(script.into()),
            fallback: RemoteStatus::Started,
            poll_times: Mutex::new(Vec::new()),
        }
    }

    fn poll_count(&self) -> usize {
        self.poll_times.lock().unwrap().len()
    }
}

#[async_trait]
impl TranscribeService for ScriptedService {
    async fn submit(&self, _source_url: &str, _format: &str) -> Result<String, ClientError> {
        self.submit.clone()
    }

    async fn fetch_status(&self, _task_id: &str) -> Result<RemoteStatus, ClientError> {
        self.poll_times.lock().unwrap().push(tokio::time::Instant::now());
        match self.script.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(self.fallback.clone()),
        }
    }
}

fn settings(interval_ms: u64, max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(interval_ms),
        max_attempts,
    }
}

fn spec() -> JobSpec {
    JobSpec {
        source_url: "https://example.com/clip".to_string(),
        format: "plain".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn happy_path_emits_accept_progress_and_completion() {
    let service = ScriptedService::accepting(vec![
        Ok(RemoteStatus::Pending),
        Ok(RemoteStatus::Processing { progress: 45 }),
        Ok(RemoteStatus::Completed {
            transcript: "hello world".to_string(),
        }),
    ]);
    let sink = TestSink::new();

    run_job(
        &service,
        &settings(1500, 240),
        7,
        &spec(),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(
        sink.take(),
        vec![
            EngineEvent::JobAccepted {
                job: 7,
                task_id: "task-1".to_string(),
            },
            EngineEvent::JobProgress {
                job: 7,
                attempt: 1,
                update: StatusUpdate::Queued,
            },
            EngineEvent::JobProgress {
                job: 7,
                attempt: 2,
                update: StatusUpdate::Processing { progress: 45 },
            },
            EngineEvent::JobCompleted {
                job: 7,
                transcript: "hello world".to_string(),
            },
        ]
    );
    assert_eq!(service.poll_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn failed_submission_polls_nothing() {
    let service = ScriptedService {
        submit: Err(ClientError {
            kind: FailureKind::HttpStatus(500),
            message: "server error: 500 boom".to_string(),
        }),
        script: Mutex::new(VecDeque::new()),
        fallback: RemoteStatus::Started,
        poll_times: Mutex::new(Vec::new()),
    };
    let sink = TestSink::new();

    run_job(
        &service,
        &settings(1500, 240),
        1,
        &spec(),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        EngineEvent::JobFailed { job: 1, error } if error.kind == FailureKind::HttpStatus(500)
    ));
    assert_eq!(service.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn exhausting_the_budget_times_out_with_exact_attempt_count() {
    let service = ScriptedService::accepting(Vec::new());
    let sink = TestSink::new();

    run_job(
        &service,
        &settings(1500, 5),
        3,
        &spec(),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    let events = sink.take();
    assert_eq!(service.poll_count(), 5);
    assert_eq!(
        events.last(),
        Some(&EngineEvent::JobTimedOut {
            job: 3,
            attempts: 5,
        })
    );
    // Attempts number strictly 1..=5, one progress event per poll.
    let attempts: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::JobProgress { attempt, .. } => Some(*attempt),
            _ => None,
        })
        .collect();
    assert_eq!(attempts, vec![1, 2, 3, 4, 5]);
}

#[tokio::test(start_paused = true)]
async fn polls_are_spaced_by_the_fixed_interval() {
    let service = ScriptedService::accepting(Vec::new());
    let sink = TestSink::new();

    run_job(
        &service,
        &settings(1500, 4),
        1,
        &spec(),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    let times = service.poll_times.lock().unwrap().clone();
    assert_eq!(times.len(), 4);
    for pair in times.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_millis(1500));
    }
}

#[tokio::test(start_paused = true)]
async fn remote_error_fails_the_job_with_the_service_message() {
    let service = ScriptedService::accepting(vec![
        Ok(RemoteStatus::Started),
        Ok(RemoteStatus::Error {
            message: "unsupported source".to_string(),
        }),
    ]);
    let sink = TestSink::new();

    run_job(
        &service,
        &settings(1500, 240),
        1,
        &spec(),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    let events = sink.take();
    assert_eq!(
        events.last(),
        Some(&EngineEvent::JobFailed {
            job: 1,
            error: ClientError {
                kind: FailureKind::RemoteError,
                message: "unsupported source".to_string(),
            },
        })
    );
    assert_eq!(service.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_during_polling_is_fatal() {
    let service = ScriptedService::accepting(vec![
        Ok(RemoteStatus::Pending),
        Err(ClientError {
            kind: FailureKind::Network,
            message: "connection reset".to_string(),
        }),
    ]);
    let sink = TestSink::new();

    run_job(
        &service,
        &settings(1500, 240),
        1,
        &spec(),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    let events = sink.take();
    assert!(matches!(
        events.last(),
        Some(EngineEvent::JobFailed { error, .. }) if error.kind == FailureKind::Network
    ));
    // No retry of a failed poll.
    assert_eq!(service.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_loop_before_the_next_poll() {
    let service = ScriptedService::accepting(Vec::new());
    let sink = TestSink::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    run_job(&service, &settings(1500, 240), 1, &spec(), &sink, &cancel).await;

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], EngineEvent::JobAccepted { .. }));
    assert!(matches!(
        &events[1],
        EngineEvent::JobFailed { error, .. } if error.kind == FailureKind::Cancelled
    ));
    assert_eq!(service.poll_count(), 0);
}
