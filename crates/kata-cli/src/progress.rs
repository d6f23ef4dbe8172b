use indicatif::{ProgressBar, ProgressStyle};
use kata_core::ChallengeRecord;
use kata_session::LanguageScrape;

use crate::sync::SyncObserver;
use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

impl Progress {
    /// A progress handle that stays invisible until [`SyncObserver::scraping_started`].
    #[must_use]
    pub const fn hidden() -> Self {
        Self { bar: None }
    }

    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self::hidden();
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl SyncObserver for Progress {
    fn scraping_started(&mut self, languages: usize) {
        *self = Self::bar(languages as u64, "scraping solutions");
    }

    fn language_finished(&mut self, record: &ChallengeRecord, outcome: &LanguageScrape) {
        let language = match outcome {
            LanguageScrape::Collected(solution) => &solution.language,
            LanguageScrape::Skipped(skipped) => &skipped.language,
        };
        self.set_message(&format!("{} ({language})", record.name));
        self.inc(1);
    }

    fn scraping_finished(&mut self) {
        self.finish_clear();
    }
}
