//! CLI argument definitions for the clipscribe terminal app.
//!
//! Uses `clap` with derive macros. The service base URL can come from the
//! `SCRIBE_API_BASE_URL` environment variable instead of the flag.

use clap::Parser;
use std::path::PathBuf;

/// Clipscribe — submit a clip URL for remote transcription and wait for the
/// transcript.
#[derive(Parser, Debug)]
#[command(name = "clipscribe", version, about)]
pub struct CliArgs {
    /// Source clip URL to transcribe. Prompted on stdin when omitted.
    pub url: Option<String>,

    /// Output format: plain, timestamped, srt or vtt.
    #[arg(short = 'f', long = "format")]
    pub format: Option<String>,

    /// Base URL of the transcription service.
    #[arg(long = "api-base", env = "SCRIBE_API_BASE_URL")]
    pub api_base: String,

    /// Delay between status polls, in milliseconds.
    #[arg(long = "poll-interval-ms", default_value_t = 1500)]
    pub poll_interval_ms: u64,

    /// Maximum number of status polls before giving up on the job.
    #[arg(long = "max-attempts", default_value_t = 240)]
    pub max_attempts: u32,

    /// Write the transcript to this file instead of stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Log destination: file, terminal or both.
    #[arg(long = "log", default_value = "file")]
    pub log: String,
}
