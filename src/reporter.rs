use din_keeper::PassReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// CLI progress reporter: one spinner per pass, replaced by a check line
/// once the pass completes.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

fn describe(pass: &str) -> &'static str {
    match pass {
        "scan" => "Scanning files",
        "proprietary" => "Renaming proprietary date-in-name files",
        "integrity" => "Checking metadata date integrity",
        "edit-date" => "Moving edition dates",
        "consistency" => "Comparing name and metadata dates",
        "folder-bounds" => "Checking folder date bounds",
        _ => "Working",
    }
}

impl PassReporter for CliReporter {
    fn on_pass_start(&self, pass: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.set_message(format!("{}...", describe(pass)));
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_pass_complete(&self, pass: &str, affected: usize, duration_secs: f64) {
        self.finish_bar();
        let unit = if pass == "scan" { "files" } else { "entries" };
        eprintln!(
            "  \x1b[32m✓\x1b[0m {}: {} {} in {:.2}s",
            describe(pass),
            affected,
            unit,
            duration_secs
        );
    }
}
