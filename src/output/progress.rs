use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Spinner per phase of a run, drawn on stderr.
///
/// Nothing is drawn when stderr is not a terminal, which is the case on
/// most CI runners.
pub struct PhaseProgress {
    total: usize,
    current: usize,
    pb: Option<ProgressBar>,
}

impl PhaseProgress {
    pub fn new(total: usize) -> Self {
        if console::Term::stderr().is_term() {
            eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        }
        Self {
            total,
            current: 0,
            pb: None,
        }
    }

    pub fn start_phase(&mut self, message: &str) {
        self.current += 1;
        self.pb = Some(create_spinner(
            bright_yellow(format!("Phase {}/{}: {message}", self.current, self.total))
                .to_string(),
        ));
    }

    pub fn finish_phase(&mut self, message: &str) {
        if let Some(pb) = self.pb.take() {
            pb.finish_with_message(
                bright_green(format!(
                    "Phase {}/{}: {message} ✓",
                    self.current, self.total
                ))
                .to_string(),
            );
        }
    }
}

impl Drop for PhaseProgress {
    fn drop(&mut self) {
        // a phase still running here has failed
        if let Some(pb) = self.pb.take() {
            pb.abandon();
        }
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
