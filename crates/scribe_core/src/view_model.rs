use crate::Outcome;

/// Read-only snapshot of controller state, emitted on every transition and
/// consumed by whatever presentation surface exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerViewModel {
    pub input_enabled: bool,
    pub format_enabled: bool,
    /// Enabled only with a non-blank input and no job in flight.
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub status_text: String,
    pub progress_percent: u8,
    /// The transcript; present only after a successful settle.
    pub result_text: Option<String>,
    pub timer_text: String,
    pub outcome: Option<Outcome>,
}

/// Human-readable phase label for a progress percentage.
///
/// Threshold boundaries (30, 70, 100) are load-bearing: 29 still analyzes,
/// 30 generates, 70 polishes, 100 finalises.
pub fn progress_phase_label(progress: u8) -> &'static str {
    match progress {
        0..=29 => "Analyzing audio…",
        30..=69 => "Generating text…",
        70..=99 => "Polishing results…",
        _ => "Finalising…",
    }
}

pub(crate) fn progress_status_text(progress: u8) -> String {
    if progress >= 100 {
        progress_phase_label(progress).to_string()
    } else {
        format!("{} ({progress}%)", progress_phase_label(progress))
    }
}

/// Formats elapsed wall-clock time as `MM:SS`. While a job is in flight the
/// separator blinks on a 500 ms cadence (visible on odd half-seconds); once
/// settled it is frozen visible.
pub fn format_timer(elapsed_ms: u64, blinking: bool) -> String {
    let total_sec = elapsed_ms / 1000;
    let minutes = total_sec / 60;
    let seconds = total_sec % 60;
    let separator = if !blinking || (elapsed_ms / 500) % 2 == 1 {
        ':'
    } else {
        ' '
    };
    format!("{minutes:02}{separator}{seconds:02}")
}
