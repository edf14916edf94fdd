use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use scribe_logging::scribe_error;

use crate::client::{ClientSettings, HttpTranscribeService};
use crate::poller::{run_job, ChannelEventSink, EventSink, JobSpec, PollSettings};
use crate::{EngineEvent, JobId};

/// Cosmetic clock cadence; well under the 500 ms blink half-period.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_base_url: String,
    pub poll: PollSettings,
    pub client: ClientSettings,
}

impl EngineConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            poll: PollSettings::default(),
            client: ClientSettings::default(),
        }
    }
}

enum EngineCommand {
    StartJob { job: JobId, spec: JobSpec },
}

/// Handle to the engine thread. Commands go in over a channel; events come
/// back on the receiver returned by [`EngineHandle::new`]. Jobs run strictly
/// one at a time on a dedicated tokio runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = Arc::new(Mutex::new(CancellationToken::new()));

        let thread_cancel = cancel.clone();
        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let service = HttpTranscribeService::new(&config.api_base_url, config.client.clone());
            if let Err(err) = &service {
                scribe_error!("engine unusable: {}", err);
            }

            while let Ok(EngineCommand::StartJob { job, spec }) = cmd_rx.recv() {
                let token = CancellationToken::new();
                if let Ok(mut current) = thread_cancel.lock() {
                    *current = token.clone();
                }
                let sink = ChannelEventSink::new(event_tx.clone());
                match &service {
                    Ok(service) => runtime.block_on(drive_job(
                        service,
                        &config.poll,
                        job,
                        &spec,
                        sink,
                        &token,
                    )),
                    Err(error) => sink.emit(EngineEvent::JobFailed {
                        job,
                        error: error.clone(),
                    }),
                }
            }
        });

        (Self { cmd_tx, cancel }, event_rx)
    }

    pub fn start_job(&self, job: JobId, spec: JobSpec) {
        let _ = self.cmd_tx.send(EngineCommand::StartJob { job, spec });
    }

    /// Cancels the job currently in flight, if any. Never called by the
    /// default wiring; see DESIGN notes on cancellation.
    pub fn cancel_current(&self) {
        if let Ok(token) = self.cancel.lock() {
            token.cancel();
        }
    }
}

async fn drive_job(
    service: &HttpTranscribeService,
    settings: &PollSettings,
    job: JobId,
    spec: &JobSpec,
    sink: ChannelEventSink,
    cancel: &CancellationToken,
) {
    let started = Instant::now();
    // The ticker lives exactly as long as the job: it is released the moment
    // run_job resolves, so no tick can follow the terminal event.
    let done = CancellationToken::new();
    let ticker = tokio::spawn(run_ticker(job, started, done.clone(), sink.clone()));

    run_job(service, settings, job, spec, &sink, cancel).await;

    done.cancel();
    let _ = ticker.await;
}

async fn run_ticker(job: JobId, started: Instant, done: CancellationToken, sink: ChannelEventSink) {
    loop {
        tokio::select! {
            _ = done.cancelled() => return,
            _ = tokio::time::sleep(TICK_INTERVAL) => {
                sink.emit(EngineEvent::Tick {
                    job,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
            }
        }
    }
}
