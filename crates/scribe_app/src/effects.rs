use std::sync::mpsc;
use std::thread;

use scribe_core::{Effect, JobUpdate, Msg, SettledOutcome};
use scribe_engine::{EngineConfig, EngineEvent, EngineHandle, JobSpec, StatusUpdate};
use scribe_logging::{scribe_info, scribe_warn};

/// Executes core effects against the engine and pumps engine events back
/// into the message channel as core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (engine, event_rx) = EngineHandle::new(config);
        spawn_event_pump(event_rx, msg_tx);
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob { job, url, format } => {
                    scribe_info!("StartJob job={} format={} url={}", job, format, url);
                    self.engine.start_job(
                        job,
                        JobSpec {
                            source_url: url,
                            format: format.as_str().to_string(),
                        },
                    );
                }
                Effect::PromptEmptyInput => {
                    eprintln!("Please paste a valid link first!");
                }
            }
        }
    }
}

fn spawn_event_pump(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                return;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobAccepted { job, task_id } => Msg::JobAccepted { job, task_id },
        EngineEvent::JobProgress {
            job,
            attempt,
            update,
        } => Msg::PollProgress {
            job,
            attempt,
            update: map_update(update),
        },
        EngineEvent::JobCompleted { job, transcript } => Msg::JobSettled {
            job,
            outcome: SettledOutcome::Completed { transcript },
        },
        EngineEvent::JobFailed { job, error } => {
            scribe_warn!("job {} failed: {}", job, error);
            Msg::JobSettled {
                job,
                outcome: SettledOutcome::Failed {
                    message: error.message,
                },
            }
        }
        EngineEvent::JobTimedOut { job, attempts } => Msg::JobSettled {
            job,
            outcome: SettledOutcome::TimedOut { attempts },
        },
        EngineEvent::Tick { job, elapsed_ms } => Msg::TimerTick { job, elapsed_ms },
    }
}

fn map_update(update: StatusUpdate) -> JobUpdate {
    match update {
        StatusUpdate::Queued => JobUpdate::Queued,
        StatusUpdate::Started => JobUpdate::Started,
        StatusUpdate::Processing { progress } => JobUpdate::Processing { progress },
        StatusUpdate::Unrecognized => JobUpdate::Unrecognized,
    }
}
