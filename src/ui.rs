//! Terminal UI for a provisioning run, rendered via `indicatif`.
//!
//! Two bars are stacked vertically:
//! - Phase bar — tracks how many of the run's phases have completed
//! - Item bar — spinner showing the entity currently being created
//!
//! Outcome lines (created/linked/failed) are printed above the bars through
//! the `MultiProgress` so they do not tear the rendering.

use std::time::Duration;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const CHECK: &str = "✓";
const WARN: &str = "!";
const CROSS: &str = "✗";

pub struct ProvisionUi {
    multi: MultiProgress,
    phase_bar: ProgressBar,
    item_bar: ProgressBar,
}

impl ProvisionUi {
    /// Create the UI. `total_phases` sizes the phase bar; call once before
    /// the first `start_phase`.
    pub fn new(total_phases: u64) -> Self {
        let multi = MultiProgress::new();

        let phase_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let phase_bar = multi.add(ProgressBar::new(total_phases));
        phase_bar.set_style(phase_style);
        phase_bar.set_prefix("Phases");

        let item_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .expect("progress bar template is a valid static string");

        let item_bar = multi.add(ProgressBar::new_spinner());
        item_bar.set_style(item_style);
        item_bar.set_prefix("  Item");
        item_bar.enable_steady_tick(Duration::from_millis(120));

        Self {
            multi,
            phase_bar,
            item_bar,
        }
    }

    pub fn start_phase(&self, name: &str) {
        self.phase_bar.set_message(name.to_string());
        self.item_bar.set_message(String::new());
        self.println(&format!("{}", style(format!("--- {name} ---")).bold()));
    }

    pub fn finish_phase(&self) {
        self.phase_bar.inc(1);
    }

    /// Note the entity currently in flight on the spinner line.
    pub fn item(&self, msg: &str) {
        self.item_bar.set_message(msg.to_string());
    }

    pub fn log_ok(&self, msg: &str) {
        self.println(&format!("{} {msg}", style(CHECK).green()));
    }

    pub fn log_warn(&self, msg: &str) {
        self.println(&format!("{} {msg}", style(WARN).yellow()));
    }

    pub fn log_fail(&self, msg: &str) {
        self.println(&format!("{} {msg}", style(CROSS).red()));
    }

    pub fn finish(&self) {
        self.item_bar.finish_and_clear();
        self.phase_bar.finish_and_clear();
    }

    fn println(&self, line: &str) {
        // MultiProgress::println only fails on a broken terminal; a dropped
        // log line is not worth aborting the run.
        let _ = self.multi.println(line);
    }
}
