use std::io::Write;

use scribe_core::ControllerViewModel;

const BAR_WIDTH: usize = 24;

/// Single rewriting status line on stderr. Stdout stays reserved for the
/// transcript itself.
pub struct StatusLine {
    last_len: usize,
}

impl StatusLine {
    pub fn new() -> Self {
        Self { last_len: 0 }
    }

    pub fn render(&mut self, view: &ControllerViewModel) {
        let line = render_line(view);
        let line_len = line.chars().count();
        let padding = self.last_len.saturating_sub(line_len);
        eprint!("\r{line}{}", " ".repeat(padding));
        let _ = std::io::stderr().flush();
        self.last_len = line_len;
    }

    /// Terminates the status line so subsequent output starts fresh.
    pub fn finish(&mut self) {
        if self.last_len > 0 {
            eprintln!();
            self.last_len = 0;
        }
    }
}

pub fn render_line(view: &ControllerViewModel) -> String {
    format!(
        "[{}] {:>3}%  {}  {}",
        progress_bar(view.progress_percent, BAR_WIDTH),
        view.progress_percent,
        view.timer_text,
        view.status_text
    )
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    let mut bar = String::with_capacity(width);
    for i in 0..width {
        bar.push(if i < filled { '=' } else { ' ' });
    }
    bar
}
