//! Progress reporting for index builds.
//!
//! `IndicatifProgress` draws to stderr and hides itself when stderr is not a
//! terminal; `NoopProgress` is for tests and headless callers.

use indicatif::{ProgressBar, ProgressStyle};

pub trait Progress: Send + Sync {
    fn step(&self, _msg: &str) {}
    fn finish(&self, _msg: &str) {}
}

#[derive(Default, Clone, Copy, Debug)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Bounded bar (known total).
    pub fn bar(len: u64) -> Self {
        let pb = ProgressBar::new(len);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
        {
            pb.set_style(style);
        }
        Self { pb }
    }
}

impl Progress for IndicatifProgress {
    fn step(&self, msg: &str) {
        self.pb.inc(1);
        self.pb.set_message(msg.to_string());
    }
    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}
