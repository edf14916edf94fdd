//! Scribe engine: remote transcription client, bounded polling loop, and
//! effect execution behind a channel-based handle.
mod client;
mod engine;
mod persist;
mod poller;
mod types;

pub use client::{ClientSettings, HttpTranscribeService, TranscribeService};
pub use engine::{EngineConfig, EngineHandle};
pub use persist::{write_transcript, PersistError};
pub use poller::{run_job, ChannelEventSink, EventSink, JobSpec, PollSettings};
pub use types::{
    ClientError, EngineEvent, FailureKind, JobId, RemoteStatus, StatusUpdate, TaskId,
};
