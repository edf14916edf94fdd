use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context};
use scribe_core::{update, ControllerState, Msg, Outcome, OutputFormat};
use scribe_engine::{write_transcript, EngineConfig};

use crate::cli::CliArgs;
use crate::effects::EffectRunner;
use crate::render::StatusLine;

/// Runs one job from submission to a terminal outcome and returns the
/// process exit code: 0 success, 1 failure or timeout, 2 rejected input.
pub fn run(args: CliArgs) -> anyhow::Result<i32> {
    let format = match args.format.as_deref() {
        Some(name) => OutputFormat::parse(name).with_context(|| {
            format!("unknown format {name:?} (expected plain, timestamped, srt or vtt)")
        })?,
        None => OutputFormat::default(),
    };
    let url = match args.url.clone() {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let mut config = EngineConfig::new(&args.api_base);
    config.poll.interval = Duration::from_millis(args.poll_interval_ms);
    config.poll.max_attempts = args.max_attempts;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(config, msg_tx);

    let mut state = ControllerState::new();
    let mut status_line = StatusLine::new();

    for msg in [
        Msg::FormatSelected(format),
        Msg::InputChanged(url),
        Msg::SubmitPressed,
    ] {
        state = dispatch(state, msg, &runner, &mut status_line);
    }
    if state.view().input_enabled {
        // Blank input was rejected before any network activity.
        return Ok(2);
    }

    while let Ok(msg) = msg_rx.recv() {
        state = dispatch(state, msg, &runner, &mut status_line);
        let view = state.view();
        if let Some(outcome) = view.outcome {
            status_line.finish();
            return finish(&args, outcome, view.result_text.as_deref(), &view.status_text);
        }
    }

    bail!("engine stopped before the job settled");
}

fn dispatch(
    state: ControllerState,
    msg: Msg,
    runner: &EffectRunner,
    status_line: &mut StatusLine,
) -> ControllerState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        status_line.render(&state.view());
    }
    state
}

fn finish(
    args: &CliArgs,
    outcome: Outcome,
    result_text: Option<&str>,
    status_text: &str,
) -> anyhow::Result<i32> {
    match outcome {
        Outcome::Success => {
            let transcript = result_text.unwrap_or_default();
            match &args.output {
                Some(path) => {
                    write_transcript(path, transcript).context("writing transcript")?;
                    eprintln!("Transcript written to {}", path.display());
                }
                None => println!("{transcript}"),
            }
            Ok(0)
        }
        Outcome::Failure | Outcome::Timeout => {
            eprintln!("{status_text}");
            Ok(1)
        }
    }
}

fn prompt_for_url() -> anyhow::Result<String> {
    use std::io::{BufRead, Write};

    eprint!("Clip URL: ");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading url from stdin")?;
    Ok(line.trim().to_string())
}
